//! Profile page: names, email, password and account deletion.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Extension, Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use super::page::NavView;
use crate::error::AppError;
use crate::state::AppState;
use crate::web::forms::{
    DeleteAccountForm, EmailForm, FieldErrors, PasswordForm, ProfileForm, validate_form,
};
use crate::web::session::{CurrentUser, expired_session_cookie, invalid_request};

#[derive(Template, WebTemplate)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub csrf_token: String,
    pub nav: NavView,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub errors: FieldErrors,
    pub notice: Option<&'static str>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileQuery {
    pub updated: Option<String>,
}

fn notice_text(code: Option<&str>) -> Option<&'static str> {
    match code? {
        "profile" => Some("Profile updated successfully"),
        "email" => Some("Check your new email address to confirm the change"),
        "password" => Some("Password updated successfully"),
        _ => None,
    }
}

async fn render(
    st: &AppState,
    mut jar: CookieJar,
    current: &CurrentUser,
    errors: FieldErrors,
    notice: Option<&'static str>,
) -> Result<Response, AppError> {
    let profile = st.accounts.load_profile(current.user.id).await?;
    let token = st.csrf.issue_into(&mut jar);

    let page = ProfileTemplate {
        csrf_token: token.into_inner(),
        nav: NavView::new(&current.user, profile.as_ref()),
        email: current.user.email.clone(),
        first_name: profile
            .as_ref()
            .and_then(|p| p.first_name.clone())
            .unwrap_or_default(),
        last_name: profile
            .as_ref()
            .and_then(|p| p.last_name.clone())
            .unwrap_or_default(),
        errors,
        notice,
    };

    Ok((jar, page).into_response())
}

/// Renders the profile page.
///
/// # Endpoint
///
/// `GET /secure/profile`
pub async fn profile_page(
    State(st): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    jar: CookieJar,
    Query(query): Query<ProfileQuery>,
) -> Result<Response, AppError> {
    render(
        &st,
        jar,
        &current,
        FieldErrors::new(),
        notice_text(query.updated.as_deref()),
    )
    .await
}

/// Updates first and last name.
///
/// # Endpoint
///
/// `POST /secure/profile`
pub async fn profile_update(
    State(st): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    jar: CookieJar,
    Form(form): Form<ProfileForm>,
) -> Result<Response, AppError> {
    if !st.csrf.verify_token(form.csrf_token.as_deref(), &jar) {
        return Ok(invalid_request().into_response());
    }

    let form = match validate_form(form) {
        Ok(form) => form,
        Err(errors) => return render(&st, jar, &current, errors, None).await,
    };

    match st
        .accounts
        .update_profile(current.user.id, form.first_name.trim(), form.last_name.trim())
        .await
    {
        Ok(_) => Ok(Redirect::to("/secure/profile?updated=profile").into_response()),
        Err(e) => {
            tracing::error!(error = %e, "Error updating profile");
            let errors = FieldErrors::form("Failed to update profile");
            render(&st, jar, &current, errors, None).await
        }
    }
}

/// Starts an email change.
///
/// # Endpoint
///
/// `POST /secure/profile/email`
pub async fn email_update(
    State(st): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    jar: CookieJar,
    Form(form): Form<EmailForm>,
) -> Result<Response, AppError> {
    if !st.csrf.verify_token(form.csrf_token.as_deref(), &jar) {
        return Ok(invalid_request().into_response());
    }

    let form = match validate_form(form) {
        Ok(form) => form,
        Err(errors) => return render(&st, jar, &current, errors, None).await,
    };

    match st
        .accounts
        .update_email(&current.access_token, &form.email)
        .await
    {
        Ok(()) => Ok(Redirect::to("/secure/profile?updated=email").into_response()),
        Err(e) => {
            tracing::error!(error = %e, "Error updating email");
            let errors = FieldErrors::form("Failed to update email");
            render(&st, jar, &current, errors, None).await
        }
    }
}

/// Changes the password after re-checking the current one.
///
/// # Endpoint
///
/// `POST /secure/profile/password`
pub async fn password_update(
    State(st): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    jar: CookieJar,
    Form(form): Form<PasswordForm>,
) -> Result<Response, AppError> {
    if !st.csrf.verify_token(form.csrf_token.as_deref(), &jar) {
        return Ok(invalid_request().into_response());
    }

    let form = match validate_form(form) {
        Ok(form) => form,
        Err(errors) => return render(&st, jar, &current, errors, None).await,
    };

    let result = st
        .accounts
        .update_password(
            &current.access_token,
            &current.user,
            &form.current_password,
            &form.new_password,
        )
        .await;

    match result {
        Ok(()) => Ok(Redirect::to("/secure/profile?updated=password").into_response()),
        Err(AppError::Validation { message, .. }) => {
            let mut errors = FieldErrors::new();
            errors.insert("currentPassword", message);
            render(&st, jar, &current, errors, None).await
        }
        Err(e) => {
            tracing::error!(error = %e, "Error updating password");
            let errors = FieldErrors::form("Failed to update password");
            render(&st, jar, &current, errors, None).await
        }
    }
}

/// Deletes the account after password and typed confirmation.
///
/// # Endpoint
///
/// `POST /secure/profile/delete`
pub async fn account_delete(
    State(st): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    jar: CookieJar,
    Form(form): Form<DeleteAccountForm>,
) -> Result<Response, AppError> {
    if !st.csrf.verify_token(form.csrf_token.as_deref(), &jar) {
        return Ok(invalid_request().into_response());
    }

    let form = match validate_form(form) {
        Ok(form) => form,
        Err(errors) => return render(&st, jar, &current, errors, None).await,
    };

    match st
        .accounts
        .delete_account(&current.access_token, &current.user, &form.password)
        .await
    {
        Ok(()) => Ok((
            jar.remove(expired_session_cookie()),
            Redirect::to("/auth/login?notice=account_deleted"),
        )
            .into_response()),
        Err(AppError::Validation { message, .. }) => {
            let mut errors = FieldErrors::new();
            errors.insert("password", message);
            render(&st, jar, &current, errors, None).await
        }
        Err(e) => {
            tracing::error!(error = %e, "Error deleting account");
            let errors = FieldErrors::form("Failed to delete account");
            render(&st, jar, &current, errors, None).await
        }
    }
}
