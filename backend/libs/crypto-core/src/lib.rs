//! # Crypto Core
//!
//! Small hashing and token helpers shared by Kinship services.
//!
//! ## Modules
//! - `hash`: SHA-256 digests
//! - `token`: opaque session tokens

pub mod hash;
pub mod token;

pub use token::{generate_token, parse_token, TokenError, TOKEN_BYTES};
