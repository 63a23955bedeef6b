mod common;

use chrono::NaiveDate;
use hoa_admin::auth::password::legacy_sha256_hex;
use hoa_admin::database::models::Branding;
use hoa_admin::services::{CredentialError, CredentialService, TenantService, TenantUserService};

// Credential rotation changes the single active administrator, so everything
// that depends on it runs in one sequential test.
#[tokio::test]
async fn rotation_and_permanent_delete() {
    let Some(pool) = common::test_pool().await else { return };
    let credentials = CredentialService::new(pool.clone());
    let tenants = TenantService::new(pool.clone());
    let users = TenantUserService::new(pool.clone());

    let previous = common::unique_name("prev").replace(' ', "_");
    credentials.rotate(&previous, "prior-secret").await.unwrap();

    // Five characters is one short; the prior credential stays active
    let short = credentials.rotate("operator", "12345").await;
    assert!(matches!(short, Err(CredentialError::Validation(_))));
    assert!(credentials.authenticate(&previous, "prior-secret").await.unwrap().is_some());

    let username = common::unique_name("ops").replace(' ', "_");
    let admin = credentials.rotate(&username, "123456").await.unwrap();
    assert_eq!(admin.username, username);

    let current = credentials.current().await.unwrap().unwrap();
    assert_eq!(current.username, username);

    let enabled: (i64,) = sqlx::query_as("SELECT count(*) FROM super_admins WHERE enabled")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(enabled.0, 1);

    assert!(credentials.authenticate(&username, "123456").await.unwrap().is_some());
    assert!(credentials.authenticate(&username, "1234567").await.unwrap().is_none());
    // Previous credentials stop working
    assert!(credentials.authenticate(&previous, "prior-secret").await.unwrap().is_none());

    // Permanent delete needs the current password
    let tenant = tenants
        .create(
            &common::unique_name("Willow"),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2099, 12, 31).unwrap(),
            Branding::default(),
        )
        .await
        .unwrap();
    users.create(tenant.id, "resident@willow.example", "hunter22").await.unwrap();

    let wrong = credentials.reauthenticate(&username, "nope").await;
    assert!(matches!(wrong, Err(CredentialError::InvalidPassword)));
    let untouched = tenants.get(tenant.id).await.unwrap().unwrap();
    assert!(tenants.verify_schema(&untouched).await.unwrap().is_empty());
    assert_eq!(users.list_for_tenant(tenant.id).await.unwrap().len(), 1);

    let confirmed = credentials.reauthenticate(&username, "123456").await.unwrap();
    let removed = tenants.hard_delete(tenant.id, &confirmed).await.unwrap();
    assert_eq!(removed.id, tenant.id);

    assert!(tenants.get(tenant.id).await.unwrap().is_none());
    assert!(users.list_for_tenant(tenant.id).await.unwrap().is_empty());
    let schema: Option<(String,)> =
        sqlx::query_as("SELECT schema_name::text FROM information_schema.schemata WHERE schema_name = $1")
            .bind(&tenant.schema_name)
            .fetch_optional(&pool)
            .await
            .unwrap();
    assert!(schema.is_none(), "schema {} should be dropped", tenant.schema_name);

    // Legacy rows still log in and are rewritten as argon2
    for (legacy, password) in [
        (legacy_sha256_hex("legacy-pass"), "legacy-pass"),
        ("plain-pass".to_string(), "plain-pass"),
    ] {
        sqlx::query("UPDATE super_admins SET password_hash = $1 WHERE username = $2 AND enabled")
            .bind(&legacy)
            .bind(&username)
            .execute(&pool)
            .await
            .unwrap();

        assert!(credentials.authenticate(&username, "wrong-pass").await.unwrap().is_none());
        let admin = credentials.authenticate(&username, password).await.unwrap().unwrap();
        assert!(admin.password_hash.starts_with("$argon2"));

        let (stored,): (String,) =
            sqlx::query_as("SELECT password_hash FROM super_admins WHERE username = $1 AND enabled")
                .bind(&username)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert!(stored.starts_with("$argon2"));
        assert!(credentials.authenticate(&username, password).await.unwrap().is_some());
    }
}
