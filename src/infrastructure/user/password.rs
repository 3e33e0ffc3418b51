//! Password hashing using Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher as Argon2PasswordHasher, SaltString},
    Argon2,
};

use crate::domain::DomainError;

/// Slow, salted one-way hashing of user passwords
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, DomainError>;
}

/// Argon2id hasher with a random salt per password
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }
}

#[cfg(test)]
impl Argon2Hasher {
    /// Check a plaintext password against a stored hash
    pub(crate) fn verify(&self, password: &str, hash: &str) -> bool {
        use argon2::password_hash::{PasswordHash, PasswordVerifier};

        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2Hasher::new();
        let hash = hasher.hash("password1").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert_ne!(hash, "password1");
        assert!(hasher.verify("password1", &hash));
        assert!(!hasher.verify("password2", &hash));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = Argon2Hasher::new();

        let hash1 = hasher.hash("password1").unwrap();
        let hash2 = hasher.hash("password1").unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = Argon2Hasher::new();
        assert!(!hasher.verify("password1", "not-a-phc-string"));
    }
}
