/// Opaque bearer tokens.
///
/// A token is `TOKEN_BYTES` bytes from the OS RNG, hex encoded. Callers persist
/// only `hash::sha256_hex(token)` and hand the raw token to the client once.
use rand::{rngs::OsRng, RngCore};

use crate::hash;

/// Entropy per token.
pub const TOKEN_BYTES: usize = 32;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has wrong length")]
    Length,
    #[error("token is not valid hex")]
    Encoding,
}

/// Generate a new token. Returns `(token, token_hash)`.
pub fn generate_token() -> (String, String) {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    let token = hex::encode(bytes);
    let token_hash = hash::sha256_hex(token.as_bytes());
    (token, token_hash)
}

/// Check the shape of a client-supplied token and return its storage hash.
pub fn parse_token(raw: &str) -> Result<String, TokenError> {
    let raw = raw.trim();
    if raw.len() != TOKEN_BYTES * 2 {
        return Err(TokenError::Length);
    }
    if !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(TokenError::Encoding);
    }
    Ok(hash::sha256_hex(raw.to_ascii_lowercase().as_bytes()))
}
