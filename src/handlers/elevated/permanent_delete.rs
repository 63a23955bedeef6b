use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::database::models::Tenant;
use crate::error::WebError;
use crate::handlers::protected::form_error;
use crate::handlers::{credential_service, tenant_service};
use crate::middleware::AdminSession;
use crate::services::CredentialError;
use crate::views;

const TEMPLATE: &str = "permanent_delete.html";

#[derive(Debug, Deserialize)]
pub struct ConfirmForm {
    #[serde(default)]
    pub password: String,
}

async fn load_tenant(id: i32) -> Result<Tenant, WebError> {
    tenant_service()
        .await?
        .get(id)
        .await?
        .ok_or_else(|| WebError::not_found(format!("HOA {} not found", id)))
}

/// GET /permanent-delete-hoa/:id - password confirmation form
pub async fn permanent_delete_get(session: AdminSession, Path(id): Path<i32>) -> Result<Response, WebError> {
    let tenant = load_tenant(id).await?;

    let mut context = views::page(Some(&session.username));
    context.insert("hoa", &tenant);
    Ok(views::render(TEMPLATE, &context)?.into_response())
}

/// POST /permanent-delete-hoa/:id - re-authenticate, then drop schema, users and row
pub async fn permanent_delete_post(
    session: AdminSession,
    Path(id): Path<i32>,
    Form(form): Form<ConfirmForm>,
) -> Result<Response, WebError> {
    let tenant = load_tenant(id).await?;
    let credentials = credential_service().await?;

    let confirmed = match credentials.reauthenticate(&session.username, &form.password).await {
        Ok(confirmed) => confirmed,
        Err(CredentialError::InvalidPassword) => {
            tracing::warn!("'{}' failed password confirmation for deleting tenant {}", session.username, id);
            let mut context = views::page(Some(&session.username));
            context.insert("hoa", &tenant);
            return form_error(TEMPLATE, context, StatusCode::FORBIDDEN, "Invalid password");
        }
        Err(e) => return Err(e.into()),
    };

    tenant_service().await?.hard_delete(id, &confirmed).await?;
    Ok(Redirect::to("/dashboard/recycle-bin").into_response())
}
