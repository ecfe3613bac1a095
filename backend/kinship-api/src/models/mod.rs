/// Data models for kinship-api
///
/// Row types (`FromRow`) mirror the tables in `migrations/`; request types
/// carry `validator` rules; response types are what handlers serialize.
pub mod chat;
pub mod comment;
pub mod friendship;
pub mod member;
pub mod post;
pub mod session;

pub use chat::*;
pub use comment::*;
pub use friendship::*;
pub use member::*;
pub use post::*;
pub use session::*;
