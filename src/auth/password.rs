use argon2::password_hash::{PasswordHash as PhcHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use thiserror::Error;

use crate::domain::types::PasswordHash;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("produced hash is not storable: {0}")]
    Storage(String),
}

fn hasher() -> Result<Argon2<'static>, PasswordError> {
    let params =
        Params::new(19456, 2, 1, None).map_err(|e| PasswordError::Hash(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash `password` with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<PasswordHash, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let phc = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?
        .to_string();
    PasswordHash::new(phc).map_err(|e| PasswordError::Storage(e.to_string()))
}

/// Check `password` against a stored PHC string. Malformed hashes never
/// verify.
pub fn verify_password(hash: &PasswordHash, password: &str) -> bool {
    let Ok(parsed) = PhcHash::new(hash.as_str()) else {
        return false;
    };
    match hasher() {
        Ok(argon) => argon.verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_only_the_original_password() {
        let hash = hash_password("Secret_1").unwrap();
        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(verify_password(&hash, "Secret_1"));
        assert!(!verify_password(&hash, "secret_1"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("Secret_1").unwrap();
        let b = hash_password("Secret_1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_does_not_verify() {
        let hash = PasswordHash::new("not-a-phc-string").unwrap();
        assert!(!verify_password(&hash, "anything"));
    }
}
