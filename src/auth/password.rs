//! Password Hashing
//! Mission: Salted one-way hashing of plaintext passwords (bcrypt)

use tracing::debug;

/// Lowest cost bcrypt accepts; only sensible in tests
pub const MIN_COST: u32 = 4;
/// Highest cost bcrypt accepts
pub const MAX_COST: u32 = 31;

#[derive(Debug)]
pub enum PasswordError {
    InvalidCost(u32),
    Hashing(bcrypt::BcryptError),
}

impl std::fmt::Display for PasswordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCost(cost) => write!(
                f,
                "bcrypt cost {} outside {}..={}",
                cost, MIN_COST, MAX_COST
            ),
            Self::Hashing(e) => write!(f, "Failed to hash password: {}", e),
        }
    }
}

impl std::error::Error for PasswordError {}

impl From<bcrypt::BcryptError> for PasswordError {
    fn from(e: bcrypt::BcryptError) -> Self {
        Self::Hashing(e)
    }
}

/// Hash a plaintext password. bcrypt draws a fresh random salt for every call
/// and embeds it in the returned string.
pub fn hash_password(plaintext: &str, cost: u32) -> Result<String, PasswordError> {
    if !(MIN_COST..=MAX_COST).contains(&cost) {
        return Err(PasswordError::InvalidCost(cost));
    }
    Ok(bcrypt::hash(plaintext, cost)?)
}

/// Compare a plaintext password against a stored hash.
///
/// A malformed stored hash is treated as a mismatch.
pub fn verify_password(plaintext: &str, hash: &str) -> bool {
    match bcrypt::verify(plaintext, hash) {
        Ok(valid) => valid,
        Err(e) => {
            debug!("Stored password hash could not be parsed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("pw1", MIN_COST).unwrap();

        assert_ne!(hash, "pw1");
        assert!(verify_password("pw1", &hash));
        assert!(!verify_password("pw2", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("same-password", MIN_COST).unwrap();
        let second = hash_password("same-password", MIN_COST).unwrap();

        // Different salts, both still verify
        assert_ne!(first, second);
        assert!(verify_password("same-password", &first));
        assert!(verify_password("same-password", &second));
    }

    #[test]
    fn test_malformed_hash_is_mismatch() {
        assert!(!verify_password("pw1", "not-a-bcrypt-hash"));
        assert!(!verify_password("pw1", ""));
    }

    #[test]
    fn test_cost_bounds() {
        assert!(matches!(
            hash_password("pw1", 3),
            Err(PasswordError::InvalidCost(3))
        ));
        assert!(matches!(
            hash_password("pw1", 32),
            Err(PasswordError::InvalidCost(32))
        ));
    }
}
