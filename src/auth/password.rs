// Password hashing with Argon2id in PHC string format.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),
}

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Check a plaintext password against a stored hash. `Ok(false)` means
/// the password does not match; a hash that cannot be parsed is an error
/// rather than a mismatch.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter2hunter2", &hash).unwrap());
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(!verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        let a = hash_password("repeatable").unwrap();
        let b = hash_password("repeatable").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(PasswordError::MalformedHash(_))
        ));
    }
}
