//! One-way Argon2 password hashing in PHC string format.

use argon2::password_hash::SaltString;
use argon2::Argon2;
use argon2::PasswordHash;
use argon2::PasswordHasher;
use argon2::PasswordVerifier;

pub use argon2::password_hash::Error as PasswordHashError;

fn salt() -> Result<SaltString, PasswordHashError> {
    use rand::Rng;
    let mut bytes = [0u8; 16];
    rand::rng().fill(&mut bytes);
    SaltString::encode_b64(&bytes)
}

/// Hash a plaintext password with default Argon2id parameters and a fresh salt.
pub fn hash(password: &str) -> Result<String, PasswordHashError> {
    Argon2::default()
        .hash_password(password.as_bytes(), &salt()?)
        .map(|h| h.to_string())
}

/// Check a plaintext password against a stored hash. A malformed hash never verifies.
pub fn verify(password: &str, hashword: &str) -> bool {
    PasswordHash::new(hashword)
        .ok()
        .as_ref()
        .map(|hash| {
            Argon2::default()
                .verify_password(password.as_bytes(), hash)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hashword = hash("correct horse").unwrap();
        assert!(hashword.starts_with("$argon2"));
        assert!(verify("correct horse", &hashword));
        assert!(!verify("battery staple", &hashword));
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(hash("same").unwrap(), hash("same").unwrap());
    }

    #[test]
    fn test_garbage_hash_does_not_verify() {
        assert!(!verify("anything", "not-a-phc-string"));
        assert!(!verify("", ""));
    }
}
