use sqlx::PgPool;
use tracing::info;

use crate::auth::password::{self, PasswordError};
use crate::database::manager::{is_unique_violation, DatabaseError};
use crate::database::models::TenantUser;

const USER_COLUMNS: &str = "id, hoa_id, email, password_hash, enabled, created_at";

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error("{0}")]
    Validation(String),
    #[error("HOA not found: {0}")]
    TenantNotFound(i32),
    #[error("User already exists: {0}")]
    AlreadyExists(String),
}

impl From<sqlx::Error> for UserError {
    fn from(err: sqlx::Error) -> Self {
        UserError::Database(DatabaseError::Sqlx(err))
    }
}

/// Per-tenant login accounts
#[derive(Clone)]
pub struct TenantUserService {
    pool: PgPool,
}

impl TenantUserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, tenant_id: i32, email: &str, password: &str) -> Result<TenantUser, UserError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(UserError::Validation("Email is required".to_string()));
        }
        if password.is_empty() {
            return Err(UserError::Validation("Password is required".to_string()));
        }

        let live: Option<(i32,)> = sqlx::query_as("SELECT id FROM hoas WHERE id = $1 AND deleted_at IS NULL")
            .bind(tenant_id)
            .fetch_optional(&self.pool)
            .await?;
        if live.is_none() {
            return Err(UserError::TenantNotFound(tenant_id));
        }

        let hash = password::hash_password(password)?;
        let user = sqlx::query_as::<_, TenantUser>(&format!(
            "INSERT INTO hoa_users (hoa_id, email, password_hash, enabled) VALUES ($1, $2, $3, TRUE) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(tenant_id)
        .bind(email)
        .bind(hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                UserError::AlreadyExists(email.to_string())
            } else {
                e.into()
            }
        })?;

        info!("Created user '{}' for tenant {}", user.email, tenant_id);
        Ok(user)
    }

    pub async fn list_for_tenant(&self, tenant_id: i32) -> Result<Vec<TenantUser>, UserError> {
        let users = sqlx::query_as::<_, TenantUser>(&format!(
            "SELECT {USER_COLUMNS} FROM hoa_users WHERE hoa_id = $1 ORDER BY email, id"
        ))
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    /// Returns the owning tenant id, or None when no row matched
    pub async fn toggle_enabled(&self, id: i32) -> Result<Option<i32>, UserError> {
        let tenant: Option<(i32,)> =
            sqlx::query_as("UPDATE hoa_users SET enabled = NOT enabled WHERE id = $1 RETURNING hoa_id")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(tenant.map(|(hoa_id,)| hoa_id))
    }

    /// Returns the owning tenant id, or None when no row matched
    pub async fn delete(&self, id: i32) -> Result<Option<i32>, UserError> {
        let tenant: Option<(i32,)> = sqlx::query_as("DELETE FROM hoa_users WHERE id = $1 RETURNING hoa_id")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        if let Some((hoa_id,)) = tenant {
            info!("Deleted user {} from tenant {}", id, hoa_id);
        }
        Ok(tenant.map(|(hoa_id,)| hoa_id))
    }
}
