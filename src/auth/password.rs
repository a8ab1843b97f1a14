use rand::RngCore;
use sha2::{Digest, Sha256};

use super::constant_time_eq;

const SALT_BYTES: usize = 16;
const ROUNDS: u32 = 10_000;

fn stretch(salt: &str, password: &str) -> String {
    let mut digest = Sha256::digest(format!("{}${}", salt, password).as_bytes());
    for _ in 1..ROUNDS {
        let mut hasher = Sha256::new();
        hasher.update(digest);
        hasher.update(password.as_bytes());
        digest = hasher.finalize();
    }
    format!("{:x}", digest)
}

/// Hash a password as `<salt-hex>$<digest-hex>`.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_BYTES];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt_hex: String = salt.iter().map(|b| format!("{:02x}", b)).collect();
    let digest = stretch(&salt_hex, password);
    format!("{}${}", salt_hex, digest)
}

/// Check a password against a stored hash; malformed hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, expected)) = stored.split_once('$') else {
        return false;
    };
    if salt.is_empty() || expected.is_empty() {
        return false;
    }
    let actual = stretch(salt, password);
    constant_time_eq(actual.as_bytes(), expected.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let stored = hash_password("admin123");
        assert!(verify_password("admin123", &stored));
        assert!(!verify_password("admin124", &stored));
    }

    #[test]
    fn test_salted() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn test_malformed_hash_rejected() {
        assert!(!verify_password("x", "no-separator"));
        assert!(!verify_password("x", "$"));
        assert!(!verify_password("x", ""));
    }
}
