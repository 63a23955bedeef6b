use axum::{extract::Path, response::Redirect};

use crate::error::WebError;
use crate::handlers::user_service;
use crate::middleware::AdminSession;

fn back_to(tenant_id: Option<i32>) -> Redirect {
    match tenant_id {
        Some(id) => Redirect::to(&format!("/dashboard/manage-hoa/{}/users", id)),
        None => Redirect::to("/dashboard/manage-hoa"),
    }
}

/// GET /toggle-user/:id
pub async fn toggle_user(session: AdminSession, Path(id): Path<i32>) -> Result<Redirect, WebError> {
    let tenant_id = user_service().await?.toggle_enabled(id).await?;
    tracing::info!("'{}' toggled user {}", session.username, id);
    Ok(back_to(tenant_id))
}

/// GET /delete-user/:id
pub async fn delete_user(session: AdminSession, Path(id): Path<i32>) -> Result<Redirect, WebError> {
    let tenant_id = user_service().await?.delete(id).await?;
    tracing::info!("'{}' deleted user {}", session.username, id);
    Ok(back_to(tenant_id))
}
