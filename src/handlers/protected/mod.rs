// handlers/protected/mod.rs - require an administrator session
pub mod actions;
pub mod dashboard;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tera::Context;

use crate::database::models::Tenant;
use crate::error::WebError;
use crate::views;

/// Tenant as shown in listings, with its computed status label
#[derive(Debug, Serialize)]
pub struct TenantRow {
    pub id: i32,
    pub name: String,
    pub schema_name: String,
    pub subscription_start: NaiveDate,
    pub subscription_end: NaiveDate,
    pub enabled: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub status: &'static str,
}

impl TenantRow {
    pub fn new(tenant: Tenant, today: NaiveDate) -> Self {
        let status = tenant.status(today).label();
        Self {
            id: tenant.id,
            name: tenant.name,
            schema_name: tenant.schema_name,
            subscription_start: tenant.subscription_start,
            subscription_end: tenant.subscription_end,
            enabled: tenant.enabled,
            deleted_at: tenant.deleted_at,
            status,
        }
    }
}

/// Re-render a form page with an inline error message
pub(crate) fn form_error(
    template: &str,
    mut context: Context,
    status: StatusCode,
    message: &str,
) -> Result<Response, WebError> {
    context.insert("error", message);
    Ok((status, views::render(template, &context)?).into_response())
}
