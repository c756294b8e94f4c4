//! Password hashing and verification (Argon2id).

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a plaintext password with a fresh random salt.
pub(super) fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let digest = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| anyhow!("failed to hash password: {err}"))?;
    Ok(digest.to_string())
}

/// Verify a plaintext password against a stored digest.
///
/// A malformed digest verifies as `false` rather than erroring, so a corrupted
/// row can never authenticate anyone.
pub(super) fn verify_password(password: &str, digest: &str) -> bool {
    PasswordHash::new(digest).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let digest = hash_password("password123").expect("hashing should succeed");
        assert!(verify_password("password123", &digest));
        assert!(!verify_password("password124", &digest));
    }

    #[test]
    fn hash_is_salted() {
        let first = hash_password("password123").expect("hashing should succeed");
        let second = hash_password("password123").expect("hashing should succeed");
        assert_ne!(first, second);
    }

    #[test]
    fn malformed_digest_verifies_false() {
        assert!(!verify_password("password123", "not-a-phc-string"));
        assert!(!verify_password("password123", ""));
    }

    #[test]
    fn digest_does_not_contain_plaintext() {
        let digest = hash_password("password123").expect("hashing should succeed");
        assert!(!digest.contains("password123"));
        assert!(digest.starts_with("$argon2"));
    }
}
