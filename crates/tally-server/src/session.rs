//! Session cookie handling and the authenticated-user extractor

use std::sync::Arc;

use anyhow::anyhow;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Duration;
use tally_core::db::MAX_SESSION_TTL_DAYS;
use tracing::debug;

use crate::{AppError, AppState};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "tally_session";

/// The logged-in user, resolved from the session cookie
///
/// API handlers take `AuthUser` directly and reject with
/// `401 {"error": "Not logged in"}`. The home page takes
/// `Result<AuthUser, AppError>` and turns only the 401 into a redirect.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or_else(|| AppError::unauthorized("Not logged in"))?;

        match state.db.find_session(&token)? {
            Some(session) => Ok(AuthUser {
                user_id: session.user_id,
                email: session.email,
            }),
            None => {
                debug!("Unknown or expired session token");
                Err(AppError::unauthorized("Not logged in"))
            }
        }
    }
}

/// Configured session lifetime, rejected when outside `1..=MAX_SESSION_TTL_DAYS`
pub(crate) fn session_ttl(state: &AppState) -> Result<Duration, AppError> {
    let days = state.config.session_ttl_days;
    Duration::try_days(days)
        .filter(|_| (1..=MAX_SESSION_TTL_DAYS).contains(&days))
        .ok_or_else(|| anyhow!("session_ttl_days out of range: {}", days).into())
}

/// Create a session for `user_id` and attach its cookie to `jar`
pub(crate) fn start_session(
    state: &AppState,
    jar: CookieJar,
    user_id: i64,
    ttl: Duration,
) -> Result<CookieJar, AppError> {
    let token = state.db.create_session(user_id, ttl)?;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.secure_cookies);

    Ok(jar.add(cookie))
}

/// Delete the server-side session (if any) and clear the cookie
pub(crate) fn end_session(state: &AppState, jar: CookieJar) -> Result<CookieJar, AppError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.db.delete_session(cookie.value())?;
    }
    Ok(jar.remove(Cookie::build(SESSION_COOKIE).path("/")))
}
