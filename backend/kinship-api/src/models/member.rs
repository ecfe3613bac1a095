use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidateUrl, ValidationError};

use super::Relation;

/// Letters, digits and `@ . + - _`, the usual social-site username alphabet.
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.@+\-]+$").expect("static username regex"));

#[derive(Debug, Clone, FromRow)]
pub struct Member {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub last_seen: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Full representation, only ever returned to the member themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
    pub last_seen: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&Member> for MemberResponse {
    fn from(m: &Member) -> Self {
        Self {
            id: m.id,
            username: m.username.clone(),
            email: m.email.clone(),
            avatar: m.avatar.clone(),
            last_seen: m.last_seen,
            last_login: m.last_login,
            created_at: m.created_at,
        }
    }
}

/// Public summary embedded in posts, comments, messages and friend lists.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct MemberSummary {
    pub id: i64,
    pub username: String,
    pub avatar: Option<String>,
    pub last_seen: DateTime<Utc>,
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        let mut err = ValidationError::new("username");
        err.message =
            Some("may contain only letters, digits and @/./+/-/_ characters".into());
        Err(err)
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        let mut err = ValidationError::new("password");
        err.message = Some("must not be entirely numeric".into());
        return Err(err);
    }
    Ok(())
}

/// Avatar must be a URL; blank means "no avatar".
pub fn validate_avatar(avatar: &str) -> Result<(), ValidationError> {
    let avatar = avatar.trim();
    if avatar.is_empty() || avatar.to_string().validate_url() {
        Ok(())
    } else {
        let mut err = ValidationError::new("url");
        err.message = Some("must be a valid URL".into());
        Err(err)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, max = 30, message = "must be between 3 and 30 characters"),
        custom(function = "validate_username")
    )]
    pub username: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(
        length(min = 8, max = 128, message = "must be between 8 and 128 characters"),
        custom(function = "validate_password")
    )]
    pub password: String,
    #[validate(custom(function = "validate_avatar"))]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct UpdateProfileRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    /// Empty string clears the avatar.
    #[validate(custom(function = "validate_avatar"))]
    pub avatar: Option<String>,
}

/// Public profile as seen by `viewer`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: i64,
    pub username: String,
    pub avatar: Option<String>,
    pub last_seen: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub friends_count: i64,
    pub posts_count: i64,
    pub friendship: Relation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            avatar: None,
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(register("alice_01", "alice@example.com", "correct horse").validate().is_ok());
    }

    #[test]
    fn username_rules() {
        assert!(register("al", "a@example.com", "password1").validate().is_err());
        assert!(register(&"a".repeat(31), "a@example.com", "password1").validate().is_err());
        assert!(register("has space", "a@example.com", "password1").validate().is_err());
        assert!(register("a.b+c@d-e", "a@example.com", "password1").validate().is_ok());
    }

    #[test]
    fn password_rules() {
        assert!(register("alice", "a@example.com", "short").validate().is_err());
        assert!(register("alice", "a@example.com", "12345678").validate().is_err());
        assert!(register("alice", "a@example.com", "1234567a").validate().is_ok());
    }

    #[test]
    fn email_and_avatar_rules() {
        assert!(register("alice", "nope", "password1").validate().is_err());

        let mut req = register("alice", "a@example.com", "password1");
        req.avatar = Some("not a url".into());
        assert!(req.validate().is_err());
        req.avatar = Some("https://cdn.example.com/a.png".into());
        assert!(req.validate().is_ok());
        req.avatar = Some(String::new());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn login_requires_both_fields() {
        let req: LoginRequest = serde_json::from_str(r#"{"username": "alice"}"#).unwrap();
        assert!(req.validate().is_err());
    }
}
