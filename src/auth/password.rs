//! Stored administrator and tenant-user credentials.
//!
//! Rows written before hashing was introduced hold either the raw password or
//! an unsalted SHA-256 hex digest. Both still verify, and callers are told when
//! a row should be rewritten with an argon2 hash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Length of a hex-encoded SHA-256 digest
const LEGACY_DIGEST_LEN: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("invalid hash format: {0}")]
    InvalidHash(String),
    #[error("hashing failed: {0}")]
    Hashing(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredCredential<'a> {
    Argon2(&'a str),
    LegacySha256(&'a str),
    LegacyPlaintext(&'a str),
}

impl<'a> StoredCredential<'a> {
    pub fn parse(stored: &'a str) -> Self {
        if stored.starts_with("$argon2") {
            StoredCredential::Argon2(stored)
        } else if stored.len() == LEGACY_DIGEST_LEN {
            StoredCredential::LegacySha256(stored)
        } else {
            StoredCredential::LegacyPlaintext(stored)
        }
    }

    pub fn verify(&self, provided: &str) -> Result<bool, PasswordError> {
        match self {
            StoredCredential::Argon2(hash) => {
                let parsed = PasswordHash::new(hash)
                    .map_err(|e| PasswordError::InvalidHash(e.to_string()))?;
                if parsed.hash.is_none() {
                    return Err(PasswordError::InvalidHash("missing hash output".to_string()));
                }
                match Argon2::default().verify_password(provided.as_bytes(), &parsed) {
                    Ok(()) => Ok(true),
                    Err(argon2::password_hash::Error::Password) => Ok(false),
                    Err(e) => Err(PasswordError::InvalidHash(e.to_string())),
                }
            }
            StoredCredential::LegacySha256(digest) => {
                let computed = legacy_sha256_hex(provided);
                Ok(bool::from(computed.as_bytes().ct_eq(digest.as_bytes())))
            }
            StoredCredential::LegacyPlaintext(stored) => {
                Ok(bool::from(provided.as_bytes().ct_eq(stored.as_bytes())))
            }
        }
    }

    pub fn needs_upgrade(&self) -> bool {
        !matches!(self, StoredCredential::Argon2(_))
    }
}

/// Hash a password into an argon2id PHC string
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| PasswordError::Hashing(e.to_string()))
}

pub fn verify_password(stored: &str, provided: &str) -> Result<bool, PasswordError> {
    StoredCredential::parse(stored).verify(provided)
}

pub fn legacy_sha256_hex(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argon2_roundtrip() {
        let hash = hash_password("hunter22").unwrap();
        assert!(matches!(StoredCredential::parse(&hash), StoredCredential::Argon2(_)));
        assert!(verify_password(&hash, "hunter22").unwrap());
        assert!(!verify_password(&hash, "hunter23").unwrap());
        assert!(!StoredCredential::parse(&hash).needs_upgrade());
    }

    #[test]
    fn hashes_are_salted() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn legacy_digest_verifies() {
        let digest = legacy_sha256_hex("admin123");
        assert_eq!(
            digest,
            "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9"
        );
        let cred = StoredCredential::parse(&digest);
        assert!(matches!(cred, StoredCredential::LegacySha256(_)));
        assert!(cred.verify("admin123").unwrap());
        assert!(!cred.verify("admin124").unwrap());
        assert!(cred.needs_upgrade());
    }

    #[test]
    fn legacy_plaintext_verifies() {
        let cred = StoredCredential::parse("letmein");
        assert!(matches!(cred, StoredCredential::LegacyPlaintext(_)));
        assert!(cred.verify("letmein").unwrap());
        assert!(!cred.verify("letmein!").unwrap());
        assert!(!cred.verify("").unwrap());
        assert!(cred.needs_upgrade());
    }

    #[test]
    fn malformed_argon2_is_an_error() {
        // parses as a PHC string but carries no hash output
        assert!(matches!(
            verify_password("$argon2id$garbage", "pw"),
            Err(PasswordError::InvalidHash(_))
        ));
        assert!(verify_password("$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ", "pw").is_err());
    }
}
