use axum::{extract::Request, middleware::Next, response::Response};
use chrono::Utc;

use crate::config;
use crate::database::DatabaseManager;
use crate::services::TenantService;

/// Runs before every request: disables tenants whose subscription has lapsed.
///
/// The sweep is best effort. A database failure is logged and the request
/// proceeds, so the login page stays reachable while the database is down.
pub async fn enforce_subscription_expiry(request: Request, next: Next) -> Response {
    if config::config().subscription.enforce_expiry {
        let today = Utc::now().date_naive();
        match DatabaseManager::main_pool().await {
            Ok(pool) => {
                if let Err(e) = TenantService::new(pool).enforce_subscription_expiry(today).await {
                    tracing::warn!("Subscription expiry sweep failed: {}", e);
                }
            }
            Err(e) => tracing::warn!("Subscription expiry sweep skipped: {}", e),
        }
    }

    next.run(request).await
}
