// handlers/mod.rs - three security tiers
//
// Public (no session) → Protected (admin session) → Elevated (session plus
// password re-entry for irreversible operations)
pub mod public;
pub mod protected;
pub mod elevated;

use chrono::{NaiveDate, Utc};

use crate::database::DatabaseManager;
use crate::error::WebError;
use crate::services::{CredentialService, TenantService, TenantUserService};

pub(crate) async fn tenant_service() -> Result<TenantService, WebError> {
    Ok(TenantService::new(DatabaseManager::main_pool().await?))
}

pub(crate) async fn user_service() -> Result<TenantUserService, WebError> {
    Ok(TenantUserService::new(DatabaseManager::main_pool().await?))
}

pub(crate) async fn credential_service() -> Result<CredentialService, WebError> {
    Ok(CredentialService::new(DatabaseManager::main_pool().await?))
}

pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parse an `<input type=date>` value
pub(crate) fn parse_date(label: &str, value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("{} date must be in YYYY-MM-DD format", label))
}
