//! Salted password digests for players and members.
//!
//! Stored form is `<salt hex>$<sha256(salt || password) hex>`.

use rand::Rng;
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(plain: &str) -> Self {
        let salt: [u8; SALT_LEN] = rand::rng().random();
        Self(format!("{}${}", hex::encode(salt), digest(&salt, plain)))
    }

    /// Wraps a value loaded from storage.
    pub fn from_stored(stored: String) -> Self {
        Self(stored)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn verify(&self, plain: &str) -> bool {
        let Some((salt_hex, expected)) = self.0.split_once('$') else {
            return false;
        };
        let Ok(salt) = hex::decode(salt_hex) else {
            return false;
        };
        digest(&salt, plain) == expected
    }
}

fn digest(salt: &[u8], plain: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(plain.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_accepts_original_password() {
        let hash = PasswordHash::new("secret1");
        assert!(hash.verify("secret1"));
        assert!(!hash.verify("secret2"));
    }

    #[test]
    fn test_salts_differ() {
        let a = PasswordHash::new("same");
        let b = PasswordHash::new("same");
        assert_ne!(a, b);
        assert!(a.verify("same") && b.verify("same"));
    }

    #[test]
    fn test_malformed_stored_value_never_verifies() {
        assert!(!PasswordHash::from_stored("not-a-hash".into()).verify("x"));
        assert!(!PasswordHash::from_stored("zz$abc".into()).verify("x"));
    }
}
