//! Registration, login, logout and the home page

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::info;

use tally_core::Error as CoreError;

use crate::session::{end_session, session_ttl, start_session};
use crate::{pages, AppError, AppState, AuthUser};

/// Form body for register and login
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// GET /register
pub async fn register_form() -> Html<String> {
    Html(pages::register_page(None))
}

/// GET /login
pub async fn login_form() -> Html<String> {
    Html(pages::login_page(None))
}

/// POST /register - Create the account and log it in
pub async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let ttl = session_ttl(&state)?;
    let user = match state.db.create_user(&form.email, &form.password) {
        Ok(user) => user,
        Err(CoreError::Validation(msg)) => {
            return Ok(form_error(StatusCode::BAD_REQUEST, pages::register_page(Some(&msg))))
        }
        Err(CoreError::Duplicate(msg)) => {
            return Ok(form_error(StatusCode::CONFLICT, pages::register_page(Some(&msg))))
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = user.id, "User registered");
    let jar = start_session(&state, jar, user.id, ttl)?;
    Ok((jar, Redirect::to("/")).into_response())
}

/// POST /login - Verify credentials and start a session
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let ttl = session_ttl(&state)?;
    let user = match state.db.authenticate(&form.email, &form.password) {
        Ok(user) => user,
        Err(CoreError::Auth(msg)) => {
            return Ok(form_error(StatusCode::UNAUTHORIZED, pages::login_page(Some(&msg))))
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = user.id, "User logged in");
    let jar = start_session(&state, jar, user.id, ttl)?;
    Ok((jar, Redirect::to("/")).into_response())
}

/// GET /logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    let jar = end_session(&state, jar)?;
    Ok((jar, Redirect::to("/login")))
}

/// GET / - Home page, or a redirect to the login page
pub async fn home(user: Result<AuthUser, AppError>) -> Response {
    match user {
        Ok(user) => Html(pages::home_page(&user.email)).into_response(),
        Err(e) if e.status() == StatusCode::UNAUTHORIZED => Redirect::to("/login").into_response(),
        Err(e) => e.into_response(),
    }
}

fn form_error(status: StatusCode, page: String) -> Response {
    (status, Html(page)).into_response()
}
