//! Login page and credential submission.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::state::AppState;
use crate::web::forms::{FieldErrors, LoginForm, validate_form};
use crate::web::session::{invalid_request, session_cookie};

/// Template for the login page.
///
/// Renders `templates/login.html` with the email/password form, the hidden
/// anti-forgery token, and any validation or sign-in errors.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub csrf_token: String,
    pub email: String,
    pub errors: FieldErrors,
    pub notice: Option<&'static str>,
}

/// Optional banner selected by the page that redirected here.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub notice: Option<String>,
}

fn notice_text(code: Option<&str>) -> Option<&'static str> {
    match code? {
        "check_email" => Some("Check your email to confirm your account, then sign in."),
        "signed_out" => Some("You have been signed out."),
        "account_deleted" => Some("Your account has been deleted."),
        _ => None,
    }
}

fn render(
    st: &AppState,
    mut jar: CookieJar,
    email: String,
    errors: FieldErrors,
    notice: Option<&'static str>,
) -> Response {
    let token = st.csrf.issue_into(&mut jar);
    let page = LoginTemplate {
        csrf_token: token.into_inner(),
        email,
        errors,
        notice,
    };
    (jar, page).into_response()
}

/// Renders the login page.
///
/// # Endpoint
///
/// `GET /auth/login`
pub async fn login_page(
    State(st): State<AppState>,
    jar: CookieJar,
    Query(query): Query<LoginQuery>,
) -> Response {
    render(
        &st,
        jar,
        String::new(),
        FieldErrors::new(),
        notice_text(query.notice.as_deref()),
    )
}

/// Signs the user in.
///
/// # Endpoint
///
/// `POST /auth/login`
///
/// # Flow
///
/// 1. Verify the anti-forgery token; on failure redirect to the error page
/// 2. Validate the fields; on failure re-render with field errors
/// 3. Sign in; on failure re-render with a form-level message
/// 4. Set the session cookie and redirect to `/secure/dashboard`
pub async fn login_submit(
    State(st): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    if !st.csrf.verify_token(form.csrf_token.as_deref(), &jar) {
        return invalid_request().into_response();
    }

    let email = form.email.clone();
    let form = match validate_form(form) {
        Ok(form) => form,
        Err(errors) => return render(&st, jar, email, errors, None),
    };

    match st.accounts.login(&form.email, &form.password).await {
        Ok(session) => {
            let jar = jar.add(session_cookie(&session, st.secure_cookies));
            (jar, Redirect::to("/secure/dashboard")).into_response()
        }
        Err(e) => render(&st, jar, form.email, FieldErrors::form(e.message()), None),
    }
}
