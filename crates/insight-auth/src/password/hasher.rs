//! bcrypt password hashing and verification.

use insight_core::config::AuthConfig;
use insight_core::error::AppError;

/// bcrypt only keys from the first 72 bytes of input; longer passwords
/// are rejected outright rather than silently truncated.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Handles password hashing and verification using bcrypt.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Creates a hasher with the configured cost factor.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            cost: config.bcrypt_cost,
        }
    }

    /// Hashes a plaintext password with a random salt.
    ///
    /// Rejects passwords longer than [`MAX_PASSWORD_BYTES`] bytes.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AppError::validation(
                "Password exceeds the 72-byte bcrypt limit",
            ));
        }
        bcrypt::hash(password, self.cost)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
    }

    /// Verifies a plaintext password against a stored bcrypt hash.
    ///
    /// An empty or malformed stored hash never matches; it is treated as a
    /// failed verification rather than an error so callers take the same
    /// invalid-credentials path either way.
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        if hash.is_empty() {
            return false;
        }
        bcrypt::verify(password, hash).unwrap_or(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(&AuthConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_core::error::ErrorKind;

    fn hasher() -> PasswordHasher {
        // Minimum cost keeps the tests fast.
        PasswordHasher { cost: 4 }
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let h = hasher();
        let hash = h.hash_password("s3cret-pass").unwrap();
        assert!(h.verify_password("s3cret-pass", &hash));
        assert!(!h.verify_password("wrong-pass", &hash));
    }

    #[test]
    fn test_rejects_oversized_password() {
        let h = hasher();
        let long = "x".repeat(MAX_PASSWORD_BYTES + 1);
        let err = h.hash_password(&long).unwrap_err();
        assert!(err.is_kind(ErrorKind::Validation));
    }

    #[test]
    fn test_accepts_password_at_limit() {
        let h = hasher();
        let exact = "x".repeat(MAX_PASSWORD_BYTES);
        assert!(h.hash_password(&exact).is_ok());
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        let h = hasher();
        assert!(!h.verify_password("anything", ""));
        assert!(!h.verify_password("anything", "not-a-bcrypt-hash"));
    }
}
