use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use tera::Context;

use crate::error::WebError;
use crate::handlers::protected::form_error;
use crate::handlers::{tenant_service, user_service};
use crate::middleware::AdminSession;
use crate::services::UserError;
use crate::views;

const TEMPLATE: &str = "hoa_user_create.html";

#[derive(Debug, Deserialize)]
pub struct CreateUserForm {
    #[serde(default)]
    pub hoa: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl CreateUserForm {
    /// Tenant id from the picker, None when nothing usable was selected
    fn tenant_id(&self) -> Option<i32> {
        self.hoa.trim().parse().ok()
    }
}

/// Page context with the tenant picker (live tenants only)
async fn picker_context(admin: &str) -> Result<Context, WebError> {
    let mut context = views::page(Some(admin));
    let hoas = tenant_service().await?.list(false).await?;
    context.insert("hoas", &hoas);
    Ok(context)
}

/// GET /dashboard/hoa-user-create
pub async fn hoa_user_create_get(session: AdminSession) -> Result<Response, WebError> {
    let context = picker_context(&session.username).await?;
    Ok(views::render(TEMPLATE, &context)?.into_response())
}

/// POST /dashboard/hoa-user-create
pub async fn hoa_user_create_post(
    session: AdminSession,
    Form(form): Form<CreateUserForm>,
) -> Result<Response, WebError> {
    let Some(tenant_id) = form.tenant_id() else {
        let context = picker_context(&session.username).await?;
        return form_error(TEMPLATE, context, StatusCode::BAD_REQUEST, "Select an HOA");
    };

    let users = user_service().await?;
    let result = users.create(tenant_id, &form.email, &form.password).await;

    let mut context = picker_context(&session.username).await?;
    match result {
        Ok(user) => {
            context.insert("msg", &format!("User created: {}", user.email));
            Ok(views::render(TEMPLATE, &context)?.into_response())
        }
        Err(UserError::Validation(message)) => form_error(TEMPLATE, context, StatusCode::BAD_REQUEST, &message),
        Err(UserError::AlreadyExists(email)) => form_error(
            TEMPLATE,
            context,
            StatusCode::CONFLICT,
            &format!("User '{}' already exists for this HOA", email),
        ),
        Err(UserError::TenantNotFound(_)) => {
            form_error(TEMPLATE, context, StatusCode::NOT_FOUND, "HOA not found")
        }
        Err(e) => Err(e.into()),
    }
}
