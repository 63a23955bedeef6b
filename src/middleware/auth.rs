use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_cookies::{cookie::SameSite, Cookie, Cookies};

use crate::auth::{self, SESSION_COOKIE};
use crate::config;
use crate::error::WebError;

/// Authenticated super-administrator for the current request
#[derive(Clone, Debug)]
pub struct AdminSession {
    pub username: String,
}

/// Session gate: requests without a valid session cookie go back to the login page
pub async fn require_admin(cookies: Cookies, mut request: Request, next: Next) -> Response {
    let Some(token) = cookies.get(SESSION_COOKIE).map(|c| c.value().to_string()) else {
        return Redirect::to("/").into_response();
    };

    match auth::validate_session_token(&token) {
        Ok(claims) => {
            request.extensions_mut().insert(AdminSession { username: claims.sub });
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!("Rejected session cookie: {}", e);
            end_session(&cookies);
            Redirect::to("/").into_response()
        }
    }
}

/// Issue a fresh session cookie for `username`
pub fn start_session(cookies: &Cookies, username: &str) -> Result<(), WebError> {
    let token = auth::issue_session_token(username).map_err(|e| {
        tracing::error!("Failed to issue session token: {}", e);
        WebError::internal_server_error("Failed to start session")
    })?;

    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(config::config().security.secure_cookies);
    cookies.add(cookie);
    Ok(())
}

pub fn end_session(cookies: &Cookies) {
    let mut cookie = Cookie::from(SESSION_COOKIE);
    cookie.set_path("/");
    cookies.remove(cookie);
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminSession>()
            .cloned()
            .ok_or_else(|| Redirect::to("/").into_response())
    }
}
