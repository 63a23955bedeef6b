use std::fmt;

use serde::{Deserialize, Serialize};

use super::manager::{DatabaseError, DatabaseManager};

/// Prefix carried by every tenant schema
pub const SCHEMA_PREFIX: &str = "hoa_";

/// Postgres truncates identifiers beyond NAMEDATALEN - 1 bytes
const MAX_IDENTIFIER_LEN: usize = 63;

/// Collapse a display name into `[a-z0-9_]`: lowercase, every run of other
/// characters becomes a single underscore.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_gap = false;
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
            in_gap = false;
        } else if !in_gap {
            out.push('_');
            in_gap = true;
        }
    }
    out
}

/// Validated name of a tenant's private schema.
///
/// Only `hoa_` followed by lowercase alphanumerics and underscores is
/// accepted, so the value is always safe to splice into DDL once quoted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaName(String);

impl SchemaName {
    /// Derive the schema name for a tenant display name
    pub fn for_tenant(name: &str) -> Result<Self, DatabaseError> {
        Self::parse(format!("{}{}", SCHEMA_PREFIX, slug(name)))
    }

    pub fn parse(raw: impl Into<String>) -> Result<Self, DatabaseError> {
        let raw = raw.into();
        let body = raw
            .strip_prefix(SCHEMA_PREFIX)
            .ok_or_else(|| DatabaseError::InvalidSchemaName(raw.clone()))?;

        let valid_body = !body.is_empty()
            && body
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

        if !valid_body || raw.len() > MAX_IDENTIFIER_LEN {
            return Err(DatabaseError::InvalidSchemaName(raw));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Quoted form for DDL
    pub fn quoted(&self) -> String {
        DatabaseManager::quote_identifier(&self.0)
    }

    /// Quoted `schema.table` reference
    pub fn qualify(&self, table: &str) -> String {
        format!("{}.{}", self.quoted(), DatabaseManager::quote_identifier(table))
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SchemaName {
    type Error = DatabaseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<SchemaName> for String {
    fn from(value: SchemaName) -> Self {
        value.0
    }
}
