use sqlx::PgPool;
use tracing::info;

use crate::auth::password;
use crate::database::manager::DatabaseError;

/// Registry tables live in the default schema; tenant data never does.
const REGISTRY_DDL: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS super_admins (
        id            SERIAL PRIMARY KEY,
        username      TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        enabled       BOOLEAN NOT NULL DEFAULT TRUE,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS hoas (
        id                 SERIAL PRIMARY KEY,
        name               TEXT NOT NULL,
        schema_name        TEXT NOT NULL UNIQUE,
        subscription_start DATE NOT NULL,
        subscription_end   DATE NOT NULL,
        enabled            BOOLEAN NOT NULL DEFAULT TRUE,
        deleted_at         TIMESTAMPTZ,
        created_at         TIMESTAMPTZ NOT NULL DEFAULT now(),
        logo_url           TEXT,
        primary_color      TEXT
    )"#,
    r#"CREATE TABLE IF NOT EXISTS hoa_users (
        id            SERIAL PRIMARY KEY,
        hoa_id        INTEGER NOT NULL REFERENCES hoas(id),
        email         TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        enabled       BOOLEAN NOT NULL DEFAULT TRUE,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
        UNIQUE (hoa_id, email)
    )"#,
];

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error("failed to hash bootstrap password: {0}")]
    Password(#[from] password::PasswordError),
}

impl From<sqlx::Error> for BootstrapError {
    fn from(err: sqlx::Error) -> Self {
        BootstrapError::Database(DatabaseError::Sqlx(err))
    }
}

/// Create the registry tables and seed the first administrator.
///
/// Safe to run from several processes at once: the whole sequence holds a
/// transaction-scoped advisory lock. Returns true when an administrator was seeded.
pub async fn bootstrap(
    pool: &PgPool,
    admin_username: &str,
    admin_password: &str,
) -> Result<bool, BootstrapError> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock(hashtext('hoa_admin_bootstrap'))")
        .execute(&mut *tx)
        .await?;

    for ddl in REGISTRY_DDL {
        sqlx::query(ddl).execute(&mut *tx).await?;
    }

    let (admins,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM super_admins")
        .fetch_one(&mut *tx)
        .await?;

    let seeded = admins == 0;
    if seeded {
        let hash = password::hash_password(admin_password)?;
        sqlx::query("INSERT INTO super_admins (username, password_hash, enabled) VALUES ($1, $2, TRUE)")
            .bind(admin_username)
            .bind(hash)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    if seeded {
        info!("Seeded bootstrap administrator '{}'", admin_username);
    }
    Ok(seeded)
}
