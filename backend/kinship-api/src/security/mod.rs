/// Password hashing and session-token handling
pub mod password;
pub mod session_token;

pub use password::{hash_password, prime_dummy_hash, verify_password, verify_password_or_dummy};
pub use session_token::{extract_token, NewSessionToken};
