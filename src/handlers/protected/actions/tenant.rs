use axum::{
    extract::Path,
    response::{IntoResponse, Redirect, Response},
};

use crate::error::WebError;
use crate::handlers::tenant_service;
use crate::middleware::AdminSession;
use crate::views;

/// GET /toggle-hoa/:id - flip enabled, then back to the listing
pub async fn toggle_hoa(session: AdminSession, Path(id): Path<i32>) -> Result<Redirect, WebError> {
    if tenant_service().await?.toggle_enabled(id).await? {
        tracing::info!("'{}' toggled tenant {}", session.username, id);
    } else {
        tracing::debug!("toggle-hoa: no tenant {}", id);
    }
    Ok(Redirect::to("/dashboard/manage-hoa"))
}

/// GET /delete-hoa/:id - confirmation page for the soft delete
pub async fn delete_hoa_get(session: AdminSession, Path(id): Path<i32>) -> Result<Response, WebError> {
    let tenant = tenant_service()
        .await?
        .get(id)
        .await?
        .ok_or_else(|| WebError::not_found(format!("HOA {} not found", id)))?;

    let mut context = views::page(Some(&session.username));
    context.insert("hoa", &tenant);
    Ok(views::render("delete_confirm.html", &context)?.into_response())
}

/// POST /delete-hoa/:id - move to the recycle bin
pub async fn delete_hoa_post(session: AdminSession, Path(id): Path<i32>) -> Result<Redirect, WebError> {
    if tenant_service().await?.soft_delete(id).await? {
        tracing::info!("'{}' moved tenant {} to the recycle bin", session.username, id);
    } else {
        tracing::debug!("delete-hoa: no tenant {}", id);
    }
    Ok(Redirect::to("/dashboard/manage-hoa"))
}

/// GET /restore-hoa/:id
pub async fn restore_hoa(session: AdminSession, Path(id): Path<i32>) -> Result<Redirect, WebError> {
    if tenant_service().await?.restore(id).await? {
        tracing::info!("'{}' restored tenant {}", session.username, id);
    } else {
        tracing::debug!("restore-hoa: no tenant {}", id);
    }
    Ok(Redirect::to("/dashboard/recycle-bin"))
}
