//! Password hashing (bcrypt)

use anyhow::{Context, Result};
use bcrypt::{hash, verify};

pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    hash(password, cost).context("Failed to hash password")
}

/// A malformed digest counts as a mismatch.
pub fn verify_password(password: &str, digest: &str) -> bool {
    verify(password, digest).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_and_verify() {
        let digest = hash_password("wonderland123", TEST_COST).unwrap();
        assert!(digest.starts_with("$2"));
        assert_ne!(digest, "wonderland123");

        assert!(verify_password("wonderland123", &digest));
        assert!(!verify_password("wrongpassword", &digest));
    }

    #[test]
    fn test_malformed_digest_is_mismatch() {
        assert!(!verify_password("anything", "not-a-bcrypt-digest"));
    }
}
