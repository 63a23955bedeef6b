use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use serde::Deserialize;

use crate::database::models::Branding;
use crate::error::WebError;
use crate::handlers::protected::form_error;
use crate::handlers::{parse_date, tenant_service};
use crate::middleware::AdminSession;
use crate::services::TenantError;
use crate::views;

const TEMPLATE: &str = "hoa_create.html";

#[derive(Debug, Deserialize)]
pub struct CreateTenantForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub logo_url: String,
    #[serde(default)]
    pub primary_color: String,
}

/// GET /dashboard/hoa-create
pub async fn hoa_create_get(session: AdminSession) -> Result<Response, WebError> {
    Ok(views::render(TEMPLATE, &views::page(Some(&session.username)))?.into_response())
}

/// POST /dashboard/hoa-create - register the tenant and provision its schema
pub async fn hoa_create_post(
    session: AdminSession,
    Form(form): Form<CreateTenantForm>,
) -> Result<Response, WebError> {
    let mut context = views::page(Some(&session.username));

    let dates = parse_date("Start", &form.start).and_then(|start| Ok((start, parse_date("End", &form.end)?)));
    let (start, end) = match dates {
        Ok(dates) => dates,
        Err(message) => return form_error(TEMPLATE, context, StatusCode::BAD_REQUEST, &message),
    };

    let branding = Branding {
        logo_url: Some(form.logo_url),
        primary_color: Some(form.primary_color),
    };

    let tenants = tenant_service().await?;
    match tenants.create(&form.name, start, end, branding).await {
        Ok(tenant) => {
            context.insert("msg", &format!("HOA created: {}", tenant.schema_name));
            Ok(views::render(TEMPLATE, &context)?.into_response())
        }
        Err(TenantError::InvalidName(message)) => form_error(TEMPLATE, context, StatusCode::BAD_REQUEST, &message),
        Err(TenantError::AlreadyExists(_)) => form_error(
            TEMPLATE,
            context,
            StatusCode::CONFLICT,
            "An HOA with this name already exists",
        ),
        Err(e) => Err(e.into()),
    }
}
