//! Password hashing.

use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;

use crate::error::{AppError, Result};

/// Hash a password with a fresh salt (PHC string format).
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::auth(format!("failed to hash password: {e}")))
}

/// Check a password against a stored hash. Malformed hashes never verify.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("Stored password hash is malformed: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("segredo123").unwrap();
        assert_ne!(hash, "segredo123");
        assert!(verify_password("segredo123", &hash));
        assert!(!verify_password("segredo124", &hash));
    }

    #[test]
    fn test_salts_differ() {
        let a = hash_password("mesma-senha").unwrap();
        let b = hash_password("mesma-senha").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash() {
        assert!(!verify_password("qualquer", "not-a-phc-string"));
    }
}
