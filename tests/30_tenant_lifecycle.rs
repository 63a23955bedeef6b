mod common;

use chrono::{NaiveDate, Utc};
use hoa_admin::database::models::{Branding, TenantStatus};
use hoa_admin::services::{TenantError, TenantService, TenantUserService, UserError};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn create_provisions_complete_schema() {
    let Some(pool) = common::test_pool().await else { return };
    let tenants = TenantService::new(pool);

    let name = common::unique_name("Oak Ridge");
    let tenant = tenants
        .create(&name, date(2024, 1, 1), date(2099, 12, 31), Branding::default())
        .await
        .unwrap();

    assert!(tenant.schema_name.starts_with("hoa_oak_ridge_"));
    assert!(tenant.enabled);
    assert!(tenant.deleted_at.is_none());
    assert!(tenants.verify_schema(&tenant).await.unwrap().is_empty());

    // Same slug, different spelling
    let clash = tenants
        .create(&name.to_uppercase(), date(2024, 1, 1), date(2099, 12, 31), Branding::default())
        .await;
    assert!(matches!(clash, Err(TenantError::AlreadyExists(_))));

    // Surrounding whitespace is trimmed before slugging
    let padded = common::unique_name("Birch");
    let trimmed = tenants
        .create(&format!("  {}  ", padded), date(2024, 1, 1), date(2099, 12, 31), Branding::default())
        .await
        .unwrap();
    assert_eq!(trimmed.name, padded);
    assert_eq!(trimmed.schema_name, format!("hoa_{}", hoa_admin::database::slug(&padded)));
    assert!(!trimmed.schema_name.ends_with('_'));

    // Provisioning is idempotent
    tenants.provision(tenant.id).await.unwrap();
    assert!(tenants.verify_schema(&tenant).await.unwrap().is_empty());
}

#[tokio::test]
async fn soft_delete_and_restore() {
    let Some(pool) = common::test_pool().await else { return };
    let tenants = TenantService::new(pool);

    let tenant = tenants
        .create(&common::unique_name("Maple"), date(2024, 1, 1), date(2099, 12, 31), Branding::default())
        .await
        .unwrap();

    assert!(tenants.toggle_enabled(tenant.id).await.unwrap());
    assert!(!tenants.get(tenant.id).await.unwrap().unwrap().enabled);
    assert!(tenants.toggle_enabled(tenant.id).await.unwrap());

    assert!(tenants.soft_delete(tenant.id).await.unwrap());
    let deleted = tenants.get(tenant.id).await.unwrap().unwrap();
    assert!(!deleted.enabled);
    assert_eq!(deleted.status(Utc::now().date_naive()), TenantStatus::Deleted);
    assert!(tenants.list(false).await.unwrap().iter().all(|t| t.id != tenant.id));
    assert!(tenants.list_deleted().await.unwrap().iter().any(|t| t.id == tenant.id));

    // Schema survives a soft delete
    assert!(tenants.verify_schema(&deleted).await.unwrap().is_empty());

    assert!(tenants.restore(tenant.id).await.unwrap());
    let restored = tenants.get(tenant.id).await.unwrap().unwrap();
    assert!(restored.enabled);
    assert!(restored.deleted_at.is_none());

    assert!(!tenants.toggle_enabled(i32::MAX).await.unwrap());
    assert!(!tenants.restore(i32::MAX).await.unwrap());
}

#[tokio::test]
async fn expiry_disables_and_renewal_reenables() {
    let Some(pool) = common::test_pool().await else { return };
    let tenants = TenantService::new(pool);

    let tenant = tenants
        .create(&common::unique_name("Lapsed"), date(2020, 1, 1), date(2020, 12, 31), Branding::default())
        .await
        .unwrap();

    let disabled = tenants.enforce_subscription_expiry(date(2021, 1, 1)).await.unwrap();
    assert!(disabled >= 1);
    let lapsed = tenants.get(tenant.id).await.unwrap().unwrap();
    assert!(!lapsed.enabled);

    // Expiry does not touch the schema
    assert!(tenants.verify_schema(&lapsed).await.unwrap().is_empty());

    // Renewal forces enabled even when the new end date is already past
    assert!(tenants.edit_subscription(tenant.id, date(2019, 1, 1), date(2019, 6, 30)).await.unwrap());
    let renewed = tenants.get(tenant.id).await.unwrap().unwrap();
    assert!(renewed.enabled);
    assert_eq!(renewed.subscription_end, date(2019, 6, 30));
}

#[tokio::test]
async fn tenant_users() {
    let Some(pool) = common::test_pool().await else { return };
    let tenants = TenantService::new(pool.clone());
    let users = TenantUserService::new(pool);

    let tenant = tenants
        .create(&common::unique_name("Cedar"), date(2024, 1, 1), date(2099, 12, 31), Branding::default())
        .await
        .unwrap();

    let user = users.create(tenant.id, "board@cedar.example", "hunter22").await.unwrap();
    assert!(user.enabled);
    assert!(user.password_hash.starts_with("$argon2"));

    let duplicate = users.create(tenant.id, "board@cedar.example", "other").await;
    assert!(matches!(duplicate, Err(UserError::AlreadyExists(_))));

    let blank = users.create(tenant.id, "  ", "hunter22").await;
    assert!(matches!(blank, Err(UserError::Validation(_))));

    assert_eq!(users.toggle_enabled(user.id).await.unwrap(), Some(tenant.id));
    assert!(!users.list_for_tenant(tenant.id).await.unwrap()[0].enabled);

    assert_eq!(users.delete(user.id).await.unwrap(), Some(tenant.id));
    assert_eq!(users.delete(user.id).await.unwrap(), None);
    assert!(users.list_for_tenant(tenant.id).await.unwrap().is_empty());

    tenants.soft_delete(tenant.id).await.unwrap();
    let orphan = users.create(tenant.id, "late@cedar.example", "hunter22").await;
    assert!(matches!(orphan, Err(UserError::TenantNotFound(_))));
}

#[tokio::test]
async fn expiry_leaves_other_tenants_alone() {
    let Some(pool) = common::test_pool().await else { return };
    let tenants = TenantService::new(pool.clone());

    let live = tenants
        .create(&common::unique_name("Live"), date(2020, 1, 1), date(2099, 12, 31), Branding::default())
        .await
        .unwrap();
    let off = tenants
        .create(&common::unique_name("Off"), date(2020, 1, 1), date(2099, 12, 31), Branding::default())
        .await
        .unwrap();
    tenants.toggle_enabled(off.id).await.unwrap();
    let binned = tenants
        .create(&common::unique_name("Binned"), date(2019, 1, 1), date(2019, 12, 31), Branding::default())
        .await
        .unwrap();
    tenants.soft_delete(binned.id).await.unwrap();
    // Soft-deleted rows are outside the sweep even when flagged enabled
    sqlx::query("UPDATE hoas SET enabled = TRUE WHERE id = $1")
        .bind(binned.id)
        .execute(&pool)
        .await
        .unwrap();

    tenants.enforce_subscription_expiry(date(2021, 1, 1)).await.unwrap();

    assert!(tenants.get(live.id).await.unwrap().unwrap().enabled);
    assert!(!tenants.get(off.id).await.unwrap().unwrap().enabled);
    assert!(tenants.get(binned.id).await.unwrap().unwrap().enabled);

    // Idempotent
    tenants.enforce_subscription_expiry(date(2021, 1, 1)).await.unwrap();
    assert!(tenants.get(live.id).await.unwrap().unwrap().enabled);
}

#[tokio::test]
async fn reconcile_restores_missing_tables() {
    let Some(pool) = common::test_pool().await else { return };
    let tenants = TenantService::new(pool.clone());

    let tenant = tenants
        .create(&common::unique_name("Spruce"), date(2024, 1, 1), date(2099, 12, 31), Branding::default())
        .await
        .unwrap();

    sqlx::query(&format!("DROP TABLE \"{}\".owner_proxies", tenant.schema_name))
        .execute(&pool)
        .await
        .unwrap();
    assert_eq!(tenants.verify_schema(&tenant).await.unwrap(), vec!["owner_proxies"]);

    let repaired = tenants.reconcile().await.unwrap();
    let entry = repaired
        .iter()
        .find(|r| r.tenant.id == tenant.id)
        .expect("tenant should be repaired");
    assert_eq!(entry.missing, vec!["owner_proxies"]);
    assert!(tenants.verify_schema(&tenant).await.unwrap().is_empty());
}
