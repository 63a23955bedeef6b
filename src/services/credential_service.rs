use sqlx::PgPool;
use tracing::{info, warn};

use crate::auth::password::{self, PasswordError, StoredCredential};
use crate::database::manager::DatabaseError;
use crate::database::models::Administrator;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

const ADMIN_COLUMNS: &str = "id, username, password_hash, enabled, created_at";

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error("{0}")]
    Validation(String),
    #[error("Invalid password")]
    InvalidPassword,
}

impl From<sqlx::Error> for CredentialError {
    fn from(err: sqlx::Error) -> Self {
        CredentialError::Database(DatabaseError::Sqlx(err))
    }
}

/// Proof that the acting administrator re-entered their password.
/// Only [`CredentialService::reauthenticate`] can produce one.
#[derive(Debug)]
pub struct Reauthenticated {
    username: String,
}

impl Reauthenticated {
    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Trim and length-check a requested credential pair
pub fn validate_new_credentials(username: &str, password: &str) -> Result<(String, String), CredentialError> {
    let username = username.trim();
    let password = password.trim();

    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(CredentialError::Validation("Username too short".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CredentialError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok((username.to_string(), password.to_string()))
}

/// The single active super-administrator credential
#[derive(Clone)]
pub struct CredentialService {
    pool: PgPool,
}

impl CredentialService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The enabled administrator, if any
    pub async fn current(&self) -> Result<Option<Administrator>, CredentialError> {
        let admin = sqlx::query_as::<_, Administrator>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM super_admins WHERE enabled ORDER BY id LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }

    /// Look up an enabled administrator by exact username and check the password.
    ///
    /// A match against a legacy credential rewrites the row with an argon2 hash.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<Administrator>, CredentialError> {
        let admin = sqlx::query_as::<_, Administrator>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM super_admins WHERE username = $1 AND enabled ORDER BY id LIMIT 1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut admin) = admin else {
            warn!("Login failed: no enabled administrator '{}'", username);
            return Ok(None);
        };

        let stored = StoredCredential::parse(&admin.password_hash);
        if !stored.verify(password)? {
            warn!("Login failed: wrong password for '{}'", username);
            return Ok(None);
        }

        if stored.needs_upgrade() {
            let upgraded = password::hash_password(password)?;
            sqlx::query("UPDATE super_admins SET password_hash = $1 WHERE id = $2")
                .bind(&upgraded)
                .bind(admin.id)
                .execute(&self.pool)
                .await?;
            info!("Upgraded legacy credential for administrator '{}'", admin.username);
            admin.password_hash = upgraded;
        }

        Ok(Some(admin))
    }

    /// Re-check the acting administrator before a destructive operation
    pub async fn reauthenticate(&self, username: &str, password: &str) -> Result<Reauthenticated, CredentialError> {
        match self.authenticate(username, password).await? {
            Some(admin) => Ok(Reauthenticated { username: admin.username }),
            None => Err(CredentialError::InvalidPassword),
        }
    }

    /// Replace the active credential: every row is disabled, then exactly one
    /// row carries the new username and password.
    pub async fn rotate(&self, new_username: &str, new_password: &str) -> Result<Administrator, CredentialError> {
        let (username, password) = validate_new_credentials(new_username, new_password)?;
        let hash = password::hash_password(&password)?;

        let mut tx = self.pool.begin().await?;

        let primary: Option<(i32,)> =
            sqlx::query_as("SELECT id FROM super_admins WHERE enabled ORDER BY id LIMIT 1 FOR UPDATE")
                .fetch_optional(&mut *tx)
                .await?;

        sqlx::query("UPDATE super_admins SET enabled = FALSE")
            .execute(&mut *tx)
            .await?;

        let admin = match primary {
            Some((id,)) => {
                sqlx::query_as::<_, Administrator>(&format!(
                    "UPDATE super_admins SET username = $1, password_hash = $2, enabled = TRUE \
                     WHERE id = $3 RETURNING {ADMIN_COLUMNS}"
                ))
                .bind(&username)
                .bind(&hash)
                .bind(id)
                .fetch_one(&mut *tx)
                .await?
            }
            None => {
                sqlx::query_as::<_, Administrator>(&format!(
                    "INSERT INTO super_admins (username, password_hash, enabled) \
                     VALUES ($1, $2, TRUE) RETURNING {ADMIN_COLUMNS}"
                ))
                .bind(&username)
                .bind(&hash)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        tx.commit().await?;

        info!("Administrator credentials rotated (now '{}')", admin.username);
        Ok(admin)
    }
}
