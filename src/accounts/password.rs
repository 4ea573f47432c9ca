use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;
use tracing::{error, warn};

use crate::accounts::errors::AccountError;

/// Hash a plaintext password with a fresh random salt. The salt and the
/// algorithm parameters travel inside the returned PHC string, so the same
/// password hashed twice never produces the same output.
pub fn hash_password(plain: &str) -> Result<String, AccountError> {
    if plain.trim().is_empty() {
        return Err(AccountError::invalid_argument("Password cannot be null or empty"));
    }
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Check a candidate password against a stored hash. A hash that does not
/// parse as a PHC string counts as a failed verification, not an error.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, AccountError> {
    if hash.trim().is_empty() || plain.trim().is_empty() {
        return Err(AccountError::invalid_argument(
            "Both hashed password and provided password must be non-empty",
        ));
    }
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "unparseable password hash");
            return Ok(false);
        }
    };
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn same_password_hashes_to_different_strings() {
        let password = "secret123";
        let first = hash_password(password).expect("hashing should succeed");
        let second = hash_password(password).expect("hashing should succeed");
        assert_ne!(first, second);
        assert!(verify_password(password, &first).unwrap());
        assert!(verify_password(password, &second).unwrap());
    }

    #[test]
    fn malformed_hash_is_a_failed_verification() {
        assert!(!verify_password("anything", "not-a-valid-hash").unwrap());
    }

    #[test]
    fn blank_password_is_rejected() {
        let err = hash_password("   ").unwrap_err();
        assert!(matches!(err, AccountError::InvalidArgument(_)));
    }

    #[test]
    fn verify_rejects_blank_inputs() {
        let hash = hash_password("secret123").unwrap();
        assert!(matches!(
            verify_password("", &hash),
            Err(AccountError::InvalidArgument(_))
        ));
        assert!(matches!(
            verify_password("secret123", " "),
            Err(AccountError::InvalidArgument(_))
        ));
    }
}
