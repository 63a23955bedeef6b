use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::database::models::Tenant;
use crate::error::WebError;
use crate::handlers::protected::{form_error, TenantRow};
use crate::handlers::{parse_date, tenant_service, today, user_service};
use crate::middleware::AdminSession;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct SubscriptionForm {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

async fn load_tenant(id: i32) -> Result<Tenant, WebError> {
    tenant_service()
        .await?
        .get(id)
        .await?
        .ok_or_else(|| WebError::not_found(format!("HOA {} not found", id)))
}

/// GET /dashboard/manage-hoa - live tenants with their status
pub async fn manage_hoa(session: AdminSession) -> Result<Response, WebError> {
    let today = today();
    let rows: Vec<TenantRow> = tenant_service()
        .await?
        .list(false)
        .await?
        .into_iter()
        .map(|tenant| TenantRow::new(tenant, today))
        .collect();

    let mut context = views::page(Some(&session.username));
    context.insert("hoas", &rows);
    Ok(views::render("manage_hoa.html", &context)?.into_response())
}

/// GET /dashboard/manage-hoa/:id/users
pub async fn hoa_users(session: AdminSession, Path(id): Path<i32>) -> Result<Response, WebError> {
    let tenant = load_tenant(id).await?;
    let users = user_service().await?.list_for_tenant(id).await?;

    let mut context = views::page(Some(&session.username));
    context.insert("hoa", &tenant);
    context.insert("users", &users);
    Ok(views::render("hoa_users.html", &context)?.into_response())
}

/// GET /dashboard/manage-hoa/:id/edit
pub async fn hoa_edit_get(session: AdminSession, Path(id): Path<i32>) -> Result<Response, WebError> {
    let tenant = load_tenant(id).await?;

    let mut context = views::page(Some(&session.username));
    context.insert("hoa", &tenant);
    Ok(views::render("hoa_edit.html", &context)?.into_response())
}

/// POST /dashboard/manage-hoa/:id/edit - overwrite the window and re-enable
pub async fn hoa_edit_post(
    session: AdminSession,
    Path(id): Path<i32>,
    Form(form): Form<SubscriptionForm>,
) -> Result<Response, WebError> {
    let dates = parse_date("Start", &form.start).and_then(|start| Ok((start, parse_date("End", &form.end)?)));
    let (start, end) = match dates {
        Ok(dates) => dates,
        Err(message) => {
            let tenant = load_tenant(id).await?;
            let mut context = views::page(Some(&session.username));
            context.insert("hoa", &tenant);
            return form_error("hoa_edit.html", context, StatusCode::BAD_REQUEST, &message);
        }
    };

    if !tenant_service().await?.edit_subscription(id, start, end).await? {
        return Err(WebError::not_found(format!("HOA {} not found", id)));
    }

    tracing::info!("'{}' set subscription of tenant {} to {}..{}", session.username, id, start, end);
    Ok(Redirect::to("/dashboard/manage-hoa").into_response())
}
