//! Content fingerprinting for atomic thoughts.
//!
//! The checksum is the idempotency key of a thought: two thoughts with the
//! same content collide on insert and the second one is dropped. The token
//! estimate is a sizing hint for downstream retrieval.

use sha2::{Digest, Sha256};

/// Approximate tokens produced per whitespace-separated word.
const TOKENS_PER_WORD: f64 = 1.33;

/// Lowercase hex SHA-256 of the UTF-8 bytes of `text` (64 characters).
pub fn checksum(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Rough token count: `floor(words * 1.33) + 1`.
pub fn estimate_tokens(text: &str) -> i64 {
    let words = text.split_whitespace().count();
    (words as f64 * TOKENS_PER_WORD) as i64 + 1
}
