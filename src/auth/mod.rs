pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;

/// Name of the cookie carrying the administrator session
pub const SESSION_COOKIE: &str = "hoa_admin_session";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Administrator username
    pub sub: String,
    pub sid: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(username: impl Into<String>, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: username.into(),
            sid: Uuid::new_v4(),
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session secret not configured")]
    InvalidSecret,
    #[error("session token generation error: {0}")]
    TokenGeneration(String),
    #[error("invalid session token: {0}")]
    InvalidToken(String),
}

pub fn issue_session_token(username: &str) -> Result<String, SessionError> {
    let security = &config::config().security;
    encode_claims(&Claims::new(username, security.session_expiry_hours), &security.session_secret)
}

pub fn validate_session_token(token: &str) -> Result<Claims, SessionError> {
    decode_claims(token, &config::config().security.session_secret)
}

fn encode_claims(claims: &Claims, secret: &str) -> Result<String, SessionError> {
    if secret.is_empty() {
        return Err(SessionError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| SessionError::TokenGeneration(e.to_string()))
}

fn decode_claims(token: &str, secret: &str) -> Result<Claims, SessionError> {
    if secret.is_empty() {
        return Err(SessionError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    decode::<Claims>(token, &decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| SessionError::InvalidToken(e.to_string()))
}
