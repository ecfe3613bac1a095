/// Business logic layer
///
/// Services own validation and authorization; SQL lives in `crate::db`.
pub mod auth;
pub mod chats;
pub mod comments;
pub mod friends;
pub mod posts;
pub mod profile;

pub use auth::{AuthService, LoginOutcome};
pub use chats::ChatService;
pub use comments::CommentService;
pub use friends::{FriendRequestOutcome, FriendService};
pub use posts::PostService;
pub use profile::ProfileService;
