/// Password hashing and verification using Argon2id
use crate::error::{AppError, Result};
use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};
use once_cell::sync::Lazy;

/// Hash of a throwaway password, verified against when the username is
/// unknown so both login failure paths cost one Argon2 run.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("kinship-dummy-password").ok());

/// Compute the dummy hash now instead of on the first unknown-username login.
pub fn prime_dummy_hash() -> bool {
    Lazy::force(&DUMMY_HASH).is_some()
}

/// Hash a password using Argon2id.
/// Returns the PHC string stored in `members.password_hash`.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(rand::thread_rng());

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?
        .to_string();

    Ok(hash)
}

/// Verify a password against a stored hash. `Ok(false)` means mismatch.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash format: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Verify against `hash` when present, otherwise burn an equivalent amount of
/// time on the dummy hash and report a mismatch.
pub fn verify_password_or_dummy(password: &str, hash: Option<&str>) -> Result<bool> {
    match hash {
        Some(hash) => verify_password(password, hash),
        None => {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(password, dummy);
            }
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse battery", &hash).unwrap());
    }

    #[test]
    fn test_wrong_password() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(!verify_password("wrong horse battery", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_is_internal_error() {
        assert!(matches!(
            verify_password("x", "not-a-phc-string"),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn test_dummy_hash_is_precomputed() {
        assert!(prime_dummy_hash());
        assert!(DUMMY_HASH.as_deref().is_some_and(|h| h.starts_with("$argon2id$")));
    }

    #[test]
    fn test_unknown_member_never_verifies() {
        assert!(!verify_password_or_dummy("kinship-dummy-password", None).unwrap());
    }
}
