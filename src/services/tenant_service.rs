use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::database::manager::{is_unique_violation, DatabaseError};
use crate::database::models::{Branding, Tenant};
use crate::database::SchemaName;
use crate::services::credential_service::Reauthenticated;
use crate::services::provisioner;

const TENANT_COLUMNS: &str = "id, name, schema_name, subscription_start, subscription_end, \
     enabled, deleted_at, created_at, logo_url, primary_color";

#[derive(Debug, thiserror::Error)]
pub enum TenantError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Tenant already exists: {0}")]
    AlreadyExists(String),
    #[error("Invalid tenant name: {0}")]
    InvalidName(String),
    #[error("Tenant not found: {0}")]
    NotFound(i32),
}

impl From<sqlx::Error> for TenantError {
    fn from(err: sqlx::Error) -> Self {
        TenantError::Database(DatabaseError::Sqlx(err))
    }
}

/// A tenant whose schema was found incomplete and re-provisioned
#[derive(Debug, Clone)]
pub struct Repaired {
    pub tenant: Tenant,
    pub missing: Vec<&'static str>,
}

/// Registry of HOA tenants and their schemas
#[derive(Clone)]
pub struct TenantService {
    pool: PgPool,
}

impl TenantService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a tenant and provision its schema in one transaction
    pub async fn create(
        &self,
        name: &str,
        subscription_start: NaiveDate,
        subscription_end: NaiveDate,
        branding: Branding,
    ) -> Result<Tenant, TenantError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TenantError::InvalidName("Name is required".to_string()));
        }
        let schema = SchemaName::for_tenant(name)
            .map_err(|e| TenantError::InvalidName(e.to_string()))?;

        let mut tx = self.pool.begin().await?;

        let tenant = sqlx::query_as::<_, Tenant>(&format!(
            "INSERT INTO hoas (name, schema_name, subscription_start, subscription_end, enabled, logo_url, primary_color) \
             VALUES ($1, $2, $3, $4, TRUE, $5, $6) RETURNING {TENANT_COLUMNS}"
        ))
        .bind(name)
        .bind(schema.as_str())
        .bind(subscription_start)
        .bind(subscription_end)
        .bind(non_blank(branding.logo_url))
        .bind(non_blank(branding.primary_color))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                TenantError::AlreadyExists(name.to_string())
            } else {
                e.into()
            }
        })?;

        provisioner::provision(&mut tx, &schema).await?;
        tx.commit().await?;

        info!("Created tenant '{}' (id {}, schema {})", tenant.name, tenant.id, tenant.schema_name);
        Ok(tenant)
    }

    pub async fn get(&self, id: i32) -> Result<Option<Tenant>, TenantError> {
        let tenant = sqlx::query_as::<_, Tenant>(&format!("SELECT {TENANT_COLUMNS} FROM hoas WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tenant)
    }

    pub async fn list(&self, include_deleted: bool) -> Result<Vec<Tenant>, TenantError> {
        let tenants = sqlx::query_as::<_, Tenant>(&format!(
            "SELECT {TENANT_COLUMNS} FROM hoas WHERE ($1 OR deleted_at IS NULL) ORDER BY name, id"
        ))
        .bind(include_deleted)
        .fetch_all(&self.pool)
        .await?;
        Ok(tenants)
    }

    /// Soft-deleted tenants (the recycle bin)
    pub async fn list_deleted(&self) -> Result<Vec<Tenant>, TenantError> {
        let tenants = sqlx::query_as::<_, Tenant>(&format!(
            "SELECT {TENANT_COLUMNS} FROM hoas WHERE deleted_at IS NOT NULL ORDER BY name, id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(tenants)
    }

    /// Returns false when no row matched
    pub async fn toggle_enabled(&self, id: i32) -> Result<bool, TenantError> {
        let result = sqlx::query("UPDATE hoas SET enabled = NOT enabled WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Overwrite the subscription window. A renewal always re-enables the tenant.
    pub async fn edit_subscription(
        &self,
        id: i32,
        subscription_start: NaiveDate,
        subscription_end: NaiveDate,
    ) -> Result<bool, TenantError> {
        let result = sqlx::query(
            "UPDATE hoas SET subscription_start = $2, subscription_end = $3, enabled = TRUE WHERE id = $1",
        )
        .bind(id)
        .bind(subscription_start)
        .bind(subscription_end)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn soft_delete(&self, id: i32) -> Result<bool, TenantError> {
        let result = sqlx::query("UPDATE hoas SET deleted_at = now(), enabled = FALSE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() > 0 {
            info!("Moved tenant {} to the recycle bin", id);
        }
        Ok(result.rows_affected() > 0)
    }

    pub async fn restore(&self, id: i32) -> Result<bool, TenantError> {
        let result = sqlx::query("UPDATE hoas SET deleted_at = NULL, enabled = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() > 0 {
            info!("Restored tenant {}", id);
        }
        Ok(result.rows_affected() > 0)
    }

    /// Irreversibly remove a tenant: schema, then users, then the registry row.
    ///
    /// Requires proof that the operator re-entered the administrator password.
    pub async fn hard_delete(&self, id: i32, confirmed: &Reauthenticated) -> Result<Tenant, TenantError> {
        let mut tx = self.pool.begin().await?;

        let tenant = sqlx::query_as::<_, Tenant>(&format!(
            "SELECT {TENANT_COLUMNS} FROM hoas WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(TenantError::NotFound(id))?;

        let schema = SchemaName::parse(tenant.schema_name.clone())?;
        provisioner::drop_schema(&mut tx, &schema).await?;

        sqlx::query("DELETE FROM hoa_users WHERE hoa_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM hoas WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        warn!(
            "Permanently deleted tenant '{}' (id {}) confirmed by '{}'",
            tenant.name,
            tenant.id,
            confirmed.username()
        );
        Ok(tenant)
    }

    /// Disable every non-deleted tenant whose subscription ended before `today`
    pub async fn enforce_subscription_expiry(&self, today: NaiveDate) -> Result<u64, TenantError> {
        let result = sqlx::query(
            "UPDATE hoas SET enabled = FALSE \
             WHERE deleted_at IS NULL AND enabled AND subscription_end < $1",
        )
        .bind(today)
        .execute(&self.pool)
        .await?;

        let disabled = result.rows_affected();
        if disabled > 0 {
            info!("Disabled {} tenant(s) with lapsed subscriptions", disabled);
        }
        Ok(disabled)
    }

    /// Re-run provisioning for an existing tenant
    pub async fn provision(&self, id: i32) -> Result<Tenant, TenantError> {
        let tenant = self.get(id).await?.ok_or(TenantError::NotFound(id))?;
        let schema = SchemaName::parse(tenant.schema_name.clone())?;

        let mut tx = self.pool.begin().await?;
        provisioner::provision(&mut tx, &schema).await?;
        tx.commit().await?;
        Ok(tenant)
    }

    pub async fn verify_schema(&self, tenant: &Tenant) -> Result<Vec<&'static str>, TenantError> {
        let schema = SchemaName::parse(tenant.schema_name.clone())?;
        let mut conn = self.pool.acquire().await?;
        Ok(provisioner::missing_tables(&mut conn, &schema).await?)
    }

    /// Re-provision every live tenant whose schema is incomplete
    pub async fn reconcile(&self) -> Result<Vec<Repaired>, TenantError> {
        let mut repaired = Vec::new();

        for tenant in self.list(false).await? {
            if !tenant.enabled {
                continue;
            }
            let missing = self.verify_schema(&tenant).await?;
            if missing.is_empty() {
                continue;
            }

            warn!(
                "Tenant '{}' schema {} is missing {:?}; re-provisioning",
                tenant.name, tenant.schema_name, missing
            );
            self.provision(tenant.id).await?;
            repaired.push(Repaired { tenant, missing });
        }

        Ok(repaired)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
