//! Credential store seam: password hashing and verification.
//!
//! The core never stores plaintext. Hashes are PHC strings
//! (`$argon2id$v=19$...`) produced by [`Argon2Hasher`]; callers may plug in
//! another [`CredentialHasher`] (tests use a cheap one).

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Hashing or hash-parsing failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    Hash(String),
    MalformedHash(String),
}

impl Display for CredentialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hash(message) => write!(f, "failed to hash password: {message}"),
            Self::MalformedHash(message) => write!(f, "invalid password hash: {message}"),
        }
    }
}

impl Error for CredentialError {}

/// Password hash/verify primitive.
pub trait CredentialHasher {
    fn hash(&self, password: &str) -> Result<String, CredentialError>;
    /// `Ok(false)` on mismatch; `Err` only when `hash` cannot be parsed.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialError>;
}

/// Argon2id with the crate's default parameters and a random salt per hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| CredentialError::Hash(err.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialError> {
        let parsed =
            PasswordHash::new(hash).map_err(|err| CredentialError::MalformedHash(err.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::{Argon2Hasher, CredentialError, CredentialHasher};

    #[test]
    fn argon2_hash_verifies_only_the_original_password() {
        let hasher = Argon2Hasher;
        let hash = hasher.hash("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("correct horse", &hash).unwrap());
        assert!(!hasher.verify("battery staple", &hash).unwrap());
    }

    #[test]
    fn argon2_salts_every_hash() {
        let hasher = Argon2Hasher;
        assert_ne!(hasher.hash("same").unwrap(), hasher.hash("same").unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let err = Argon2Hasher.verify("pw", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, CredentialError::MalformedHash(_)));
    }
}
