use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::error::WebError;
use crate::handlers::credential_service;
use crate::middleware::start_session;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub u: String,
    #[serde(default)]
    pub p: String,
}

/// GET / - login form
pub async fn login_get() -> Result<Response, WebError> {
    Ok(views::render("login.html", &views::page(None))?.into_response())
}

/// POST / - check credentials and start a session
pub async fn login_post(cookies: Cookies, Form(form): Form<LoginForm>) -> Result<Response, WebError> {
    let credentials = credential_service().await?;

    match credentials.authenticate(&form.u, &form.p).await? {
        Some(admin) => {
            start_session(&cookies, &admin.username)?;
            tracing::info!("Administrator '{}' logged in", admin.username);
            Ok(Redirect::to("/dashboard/hoa-create").into_response())
        }
        None => {
            let mut context = views::page(None);
            context.insert("error", "Invalid login");
            context.insert("username", &form.u);
            Ok((StatusCode::UNAUTHORIZED, views::render("login.html", &context)?).into_response())
        }
    }
}
