//! Opaque access tokens. Only the SHA-256 digest of a token is ever stored.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Hex encoded SHA-256 digest of the input.
pub fn sha256(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hex::encode(hasher.finalize())
}

/// A freshly issued token and the digest to persist for it.
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// Handed to the user once, never stored.
    pub token: String,

    /// Stored digest of `token`.
    pub hash: String,
}

impl AccessToken {
    pub fn issue() -> Self {
        let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        let hash = sha256(token.as_bytes());
        Self { token, hash }
    }
}

/// Compute the digest used to look up `token`.
pub fn token_hash(token: &str) -> String {
    sha256(token.as_bytes())
}
