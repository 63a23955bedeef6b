use axum::response::{IntoResponse, Response};

use crate::error::WebError;
use crate::handlers::protected::TenantRow;
use crate::handlers::{tenant_service, today};
use crate::middleware::AdminSession;
use crate::views;

/// GET /dashboard/recycle-bin - soft-deleted tenants
pub async fn recycle_bin(session: AdminSession) -> Result<Response, WebError> {
    let today = today();
    let rows: Vec<TenantRow> = tenant_service()
        .await?
        .list_deleted()
        .await?
        .into_iter()
        .map(|tenant| TenantRow::new(tenant, today))
        .collect();

    let mut context = views::page(Some(&session.username));
    context.insert("hoas", &rows);
    Ok(views::render("recycle_bin.html", &context)?.into_response())
}
