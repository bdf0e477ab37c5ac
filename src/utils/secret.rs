//! Per-link secret keys and token comparison.

use base64::Engine as _;
use sha2::{Digest, Sha256};

/// Random bytes behind each secret, encoded to 22 url-safe characters.
const SECRET_BYTES: usize = 16;

/// Generates an unguessable url-safe secret.
///
/// # Panics
///
/// Panics if the system random number generator fails.
pub fn generate_secret() -> String {
    generate_token(SECRET_BYTES)
}

/// Generates `bytes` random bytes encoded as url-safe base64 without padding.
///
/// # Panics
///
/// Panics if the system random number generator fails.
pub fn generate_token(bytes: usize) -> String {
    let mut buffer = vec![0u8; bytes];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer)
}

/// Compares two secrets without short-circuiting on the first differing byte.
///
/// Both inputs are hashed first so the comparison always runs over
/// 32 bytes regardless of the input lengths.
pub fn secrets_match(provided: &str, expected: &str) -> bool {
    let a = Sha256::digest(provided.as_bytes());
    let b = Sha256::digest(expected.as_bytes());

    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_length_and_charset() {
        let secret = generate_secret();
        assert_eq!(secret.len(), 22);
        assert!(
            secret
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_secrets_are_unique() {
        assert_ne!(generate_secret(), generate_secret());
    }

    #[test]
    fn test_generate_token_length() {
        assert_eq!(generate_token(32).len(), 43);
    }

    #[test]
    fn test_secrets_match() {
        assert!(secrets_match("abc", "abc"));
        assert!(!secrets_match("abc", "abd"));
        assert!(!secrets_match("abc", "abcd"));
        assert!(!secrets_match("", "abc"));
    }
}
