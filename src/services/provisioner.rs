// Tenant schema provisioning: the fixed set of tables every HOA gets in its own schema
use sqlx::PgConnection;
use tracing::{debug, info};

use crate::database::{DatabaseError, SchemaName};

/// Tables created inside every tenant schema, in creation order
pub const TENANT_TABLES: &[&str] = &[
    "owners",
    "registrations",
    "topics",
    "options",
    "votes",
    "developer_settings",
    "developer_proxies",
    "owner_proxies",
];

/// Every statement is "if not exists", so the sequence can be replayed
/// against a partially provisioned schema.
pub fn provision_statements(schema: &SchemaName) -> Vec<String> {
    let owners = schema.qualify("owners");
    let registrations = schema.qualify("registrations");
    let topics = schema.qualify("topics");
    let options = schema.qualify("options");
    let votes = schema.qualify("votes");
    let developer_settings = schema.qualify("developer_settings");
    let developer_proxies = schema.qualify("developer_proxies");
    let owner_proxies = schema.qualify("owner_proxies");

    vec![
        format!("CREATE SCHEMA IF NOT EXISTS {}", schema.quoted()),
        format!(
            r#"CREATE TABLE IF NOT EXISTS {owners} (
                id            SERIAL PRIMARY KEY,
                unit_number   TEXT NOT NULL,
                full_name     TEXT NOT NULL,
                email         TEXT,
                phone         TEXT,
                voting_weight INTEGER NOT NULL DEFAULT 1,
                created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
                UNIQUE (unit_number)
            )"#
        ),
        format!(
            r#"CREATE TABLE IF NOT EXISTS {registrations} (
                id            SERIAL PRIMARY KEY,
                owner_id      INTEGER REFERENCES {owners}(id) ON DELETE CASCADE,
                email         TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                status        TEXT NOT NULL DEFAULT 'pending',
                created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
                UNIQUE (email)
            )"#
        ),
        format!(
            r#"CREATE TABLE IF NOT EXISTS {topics} (
                id          SERIAL PRIMARY KEY,
                title       TEXT NOT NULL,
                description TEXT,
                opens_at    TIMESTAMPTZ,
                closes_at   TIMESTAMPTZ,
                is_open     BOOLEAN NOT NULL DEFAULT TRUE,
                created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
            )"#
        ),
        format!(
            r#"CREATE TABLE IF NOT EXISTS {options} (
                id       SERIAL PRIMARY KEY,
                topic_id INTEGER NOT NULL REFERENCES {topics}(id) ON DELETE CASCADE,
                label    TEXT NOT NULL,
                position INTEGER NOT NULL DEFAULT 0
            )"#
        ),
        format!(
            r#"CREATE TABLE IF NOT EXISTS {votes} (
                id               SERIAL PRIMARY KEY,
                topic_id         INTEGER NOT NULL REFERENCES {topics}(id) ON DELETE CASCADE,
                option_id        INTEGER NOT NULL REFERENCES {options}(id) ON DELETE CASCADE,
                voter_identifier TEXT NOT NULL,
                cast_at          TIMESTAMPTZ NOT NULL DEFAULT now(),
                UNIQUE (topic_id, voter_identifier)
            )"#
        ),
        format!(
            r#"CREATE TABLE IF NOT EXISTS {developer_settings} (
                id                   INTEGER PRIMARY KEY DEFAULT 1 CHECK (id = 1),
                developer_name       TEXT,
                developer_units      INTEGER NOT NULL DEFAULT 0,
                proxy_voting_enabled BOOLEAN NOT NULL DEFAULT FALSE,
                updated_at           TIMESTAMPTZ NOT NULL DEFAULT now()
            )"#
        ),
        format!(
            r#"CREATE TABLE IF NOT EXISTS {developer_proxies} (
                id          SERIAL PRIMARY KEY,
                topic_id    INTEGER NOT NULL REFERENCES {topics}(id) ON DELETE CASCADE,
                unit_number TEXT NOT NULL,
                created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
                UNIQUE (topic_id, unit_number)
            )"#
        ),
        format!(
            r#"CREATE TABLE IF NOT EXISTS {owner_proxies} (
                id               SERIAL PRIMARY KEY,
                topic_id         INTEGER NOT NULL REFERENCES {topics}(id) ON DELETE CASCADE,
                grantor_owner_id INTEGER NOT NULL REFERENCES {owners}(id) ON DELETE CASCADE,
                proxy_owner_id   INTEGER NOT NULL REFERENCES {owners}(id) ON DELETE CASCADE,
                created_at       TIMESTAMPTZ NOT NULL DEFAULT now(),
                UNIQUE (topic_id, grantor_owner_id)
            )"#
        ),
        format!("INSERT INTO {developer_settings} (id) VALUES (1) ON CONFLICT (id) DO NOTHING"),
    ]
}

/// Run the provisioning sequence on the given connection.
///
/// Callers pass a transaction when provisioning must land together with
/// the registry row.
pub async fn provision(conn: &mut PgConnection, schema: &SchemaName) -> Result<(), DatabaseError> {
    for statement in provision_statements(schema) {
        debug!("provision {}: {}", schema, statement.lines().next().unwrap_or_default());
        sqlx::query(&statement).execute(&mut *conn).await?;
    }

    info!("Provisioned tenant schema '{}'", schema);
    Ok(())
}

/// Tenant tables that do not exist in the schema (all of them if the schema is missing)
pub async fn missing_tables(
    conn: &mut PgConnection,
    schema: &SchemaName,
) -> Result<Vec<&'static str>, DatabaseError> {
    let present: Vec<(String,)> = sqlx::query_as(
        "SELECT table_name::text FROM information_schema.tables WHERE table_schema = $1",
    )
    .bind(schema.as_str())
    .fetch_all(&mut *conn)
    .await?;

    Ok(TENANT_TABLES
        .iter()
        .copied()
        .filter(|table| !present.iter().any(|(name,)| name == table))
        .collect())
}

pub async fn drop_schema(conn: &mut PgConnection, schema: &SchemaName) -> Result<(), DatabaseError> {
    sqlx::query(&format!("DROP SCHEMA IF EXISTS {} CASCADE", schema.quoted()))
        .execute(&mut *conn)
        .await?;

    info!("Dropped tenant schema '{}'", schema);
    Ok(())
}
