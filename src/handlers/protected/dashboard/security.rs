use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::error::WebError;
use crate::handlers::credential_service;
use crate::handlers::protected::form_error;
use crate::middleware::{start_session, AdminSession};
use crate::services::CredentialError;
use crate::views;

const TEMPLATE: &str = "security.html";

#[derive(Debug, Deserialize)]
pub struct RotateForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// GET /dashboard/security
pub async fn security_get(session: AdminSession) -> Result<Response, WebError> {
    let current = credential_service().await?.current().await?;

    let mut context = views::page(Some(&session.username));
    context.insert(
        "current_username",
        current.as_ref().map(|a| a.username.as_str()).unwrap_or(&session.username),
    );
    Ok(views::render(TEMPLATE, &context)?.into_response())
}

/// POST /dashboard/security - replace the administrator credential
pub async fn security_post(
    session: AdminSession,
    cookies: Cookies,
    Form(form): Form<RotateForm>,
) -> Result<Response, WebError> {
    let credentials = credential_service().await?;

    match credentials.rotate(&form.username, &form.password).await {
        Ok(admin) => {
            // The session is re-issued under the new username
            start_session(&cookies, &admin.username)?;
            let mut context = views::page(Some(&admin.username));
            context.insert("current_username", &admin.username);
            context.insert("msg", "Credentials updated");
            tracing::info!("'{}' rotated the administrator credential to '{}'", session.username, admin.username);
            Ok(views::render(TEMPLATE, &context)?.into_response())
        }
        Err(CredentialError::Validation(message)) => {
            let mut context = views::page(Some(&session.username));
            context.insert("current_username", &session.username);
            form_error(TEMPLATE, context, StatusCode::BAD_REQUEST, &message)
        }
        Err(e) => Err(e.into()),
    }
}
