// HTTP error types for the console
use axum::{http::StatusCode, response::IntoResponse};

use crate::database::manager::DatabaseError;
use crate::services::{CredentialError, TenantError, UserError};
use crate::views;

/// Error surfaced to the browser as an HTML error page
#[derive(Debug)]
pub enum WebError {
    // 400 Bad Request
    BadRequest(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl WebError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebError::Forbidden(_) => StatusCode::FORBIDDEN,
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::Conflict(_) => StatusCode::CONFLICT,
            WebError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WebError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Client-safe error message
    pub fn message(&self) -> &str {
        match self {
            WebError::BadRequest(msg)
            | WebError::Forbidden(msg)
            | WebError::NotFound(msg)
            | WebError::Conflict(msg)
            | WebError::InternalServerError(msg)
            | WebError::ServiceUnavailable(msg) => msg,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            WebError::BadRequest(_) => "BAD_REQUEST",
            WebError::Forbidden(_) => "FORBIDDEN",
            WebError::NotFound(_) => "NOT_FOUND",
            WebError::Conflict(_) => "CONFLICT",
            WebError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            WebError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        WebError::BadRequest(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        WebError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        WebError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        WebError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        WebError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        WebError::ServiceUnavailable(message.into())
    }
}

impl From<DatabaseError> for WebError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::ConfigMissing(_) | DatabaseError::InvalidDatabaseUrl => {
                tracing::error!("Database not configured: {}", err);
                WebError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::InvalidSchemaName(name) => {
                tracing::error!("Refusing to touch invalid schema name: {}", name);
                WebError::internal_server_error("An error occurred while processing your request")
            }
            DatabaseError::Sqlx(sqlx_err) => match sqlx_err {
                sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) | sqlx::Error::PoolClosed => {
                    tracing::error!("Database connection error: {}", sqlx_err);
                    WebError::service_unavailable("Database temporarily unavailable")
                }
                other => {
                    // Log the real error but return generic message
                    tracing::error!("SQLx error: {}", other);
                    WebError::internal_server_error("Database error occurred")
                }
            },
        }
    }
}

impl From<TenantError> for WebError {
    fn from(err: TenantError) -> Self {
        match err {
            TenantError::Database(e) => e.into(),
            TenantError::AlreadyExists(name) => {
                WebError::conflict(format!("An HOA named '{}' already exists", name))
            }
            TenantError::InvalidName(msg) => WebError::bad_request(msg),
            TenantError::NotFound(id) => WebError::not_found(format!("HOA {} not found", id)),
        }
    }
}

impl From<UserError> for WebError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Database(e) => e.into(),
            UserError::Password(e) => {
                tracing::error!("Password hashing error: {}", e);
                WebError::internal_server_error("An error occurred while processing your request")
            }
            UserError::Validation(msg) => WebError::bad_request(msg),
            UserError::TenantNotFound(id) => WebError::not_found(format!("HOA {} not found", id)),
            UserError::AlreadyExists(email) => {
                WebError::conflict(format!("User '{}' already exists for this HOA", email))
            }
        }
    }
}

impl From<CredentialError> for WebError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Database(e) => e.into(),
            CredentialError::Password(e) => {
                tracing::error!("Credential error: {}", e);
                WebError::internal_server_error("An error occurred while processing your request")
            }
            CredentialError::Validation(msg) => WebError::bad_request(msg),
            CredentialError::InvalidPassword => WebError::forbidden("Invalid password"),
        }
    }
}

impl std::fmt::Display for WebError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for WebError {}

impl IntoResponse for WebError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let mut context = views::page(None);
        context.insert("status", &status.as_u16());
        context.insert("message", self.message());
        context.insert("code", self.error_code());

        match views::render("error.html", &context) {
            Ok(page) => (status, page).into_response(),
            Err(_) => (status, self.message().to_string()).into_response(),
        }
    }
}
