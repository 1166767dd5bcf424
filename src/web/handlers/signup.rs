//! Signup page and account creation.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use crate::application::services::NewAccount;
use crate::error::AppError;
use crate::state::AppState;
use crate::web::forms::{FieldErrors, SignupForm, validate_form};
use crate::web::session::{invalid_request, session_cookie};

/// Template for the signup page.
#[derive(Template, WebTemplate)]
#[template(path = "signup.html")]
pub struct SignupTemplate {
    pub csrf_token: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub errors: FieldErrors,
}

fn render(st: &AppState, mut jar: CookieJar, form: &SignupForm, errors: FieldErrors) -> Response {
    let token = st.csrf.issue_into(&mut jar);
    let page = SignupTemplate {
        csrf_token: token.into_inner(),
        email: form.email.clone(),
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
        errors,
    };
    (jar, page).into_response()
}

/// Renders the signup page.
///
/// # Endpoint
///
/// `GET /auth/signup`
pub async fn signup_page(State(st): State<AppState>, jar: CookieJar) -> Response {
    render(&st, jar, &SignupForm::default(), FieldErrors::new())
}

/// Creates an account and its profile.
///
/// # Endpoint
///
/// `POST /auth/signup`
///
/// # Outcome
///
/// - Backend returned a session: set the session cookie, go to the dashboard
/// - Email confirmation required: go to the login page with a notice
/// - Backend or profile failure: error page
pub async fn signup_submit(
    State(st): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    if !st.csrf.verify_token(form.csrf_token.as_deref(), &jar) {
        return Ok(invalid_request().into_response());
    }

    if let Err(errors) = validate_form(form.clone()) {
        return Ok(render(&st, jar, &form, errors));
    }

    let outcome = st
        .accounts
        .signup(NewAccount {
            email: form.email,
            password: form.password,
            first_name: form.first_name,
            last_name: form.last_name,
        })
        .await?;

    Ok(match outcome.session {
        Some(session) => {
            let jar = jar.add(session_cookie(&session, st.secure_cookies));
            (jar, Redirect::to("/secure/dashboard")).into_response()
        }
        None => Redirect::to("/auth/login?notice=check_email").into_response(),
    })
}
