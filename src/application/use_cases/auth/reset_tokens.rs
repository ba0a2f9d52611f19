//! Password-reset tokens. The plaintext token goes out by email; only its
//! SHA-256 digest (hex) is stored, so a database leak does not expose
//! usable tokens.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// 20 random bytes, hex encoded. This is the value the user receives.
pub fn generate() -> String {
    let mut bytes = [0u8; 20];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Digest stored in `users.reset_password_token`.
pub fn hash(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_unique_and_hex() {
        let a = generate();
        let b = generate();
        assert_ne!(a, b);
        assert_eq!(a.len(), 40);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn hash_is_deterministic_sha256_hex() {
        let t = "0123456789abcdef";
        assert_eq!(hash(t), hash(t));
        assert_eq!(hash(t).len(), 64);
        assert_ne!(hash(t), hash("something else"));
    }
}
