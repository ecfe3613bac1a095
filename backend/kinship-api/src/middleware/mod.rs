/// HTTP middleware for kinship-api
pub mod session_auth;

pub use session_auth::{CurrentMember, SessionAuth};
