/// Registration, login and logout
use crate::config::SessionConfig;
use crate::db::{member_repo, session_repo};
use crate::error::{AppError, Result};
use crate::models::{LoginRequest, Member, RegisterRequest};
use crate::security::{hash_password, verify_password_or_dummy, NewSessionToken};
use chrono::{Duration, Utc};
use sqlx::PgPool;
use validator::Validate;

/// A successful login: the member and the raw token to hand back once.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub member: Member,
    pub token: String,
}

pub struct AuthService {
    pool: PgPool,
    session: SessionConfig,
}

impl AuthService {
    pub fn new(pool: PgPool, session: SessionConfig) -> Self {
        Self { pool, session }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<Member> {
        req.validate()?;

        let password_hash = hash_password(&req.password)?;
        let avatar = req.avatar.as_deref().filter(|a| !a.trim().is_empty());
        let member = member_repo::create_member(
            &self.pool,
            &req.username,
            &req.email,
            &password_hash,
            avatar,
        )
        .await?;

        tracing::info!(member_id = member.id, username = %member.username, "member registered");
        Ok(member)
    }

    pub async fn login(
        &self,
        req: LoginRequest,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<LoginOutcome> {
        req.validate()?;

        let member = member_repo::find_by_username(&self.pool, &req.username)
            .await?
            .filter(|m| m.is_active);

        let verified = verify_password_or_dummy(
            &req.password,
            member.as_ref().map(|m| m.password_hash.as_str()),
        )?;

        let member = match member {
            Some(member) if verified => member,
            _ => {
                tracing::warn!(username = %req.username, "login rejected");
                return Err(AppError::InvalidCredentials);
            }
        };

        let minted = NewSessionToken::generate();
        let expires_at = Utc::now() + Duration::hours(self.session.ttl_hours);
        let mut tx = self.pool.begin().await?;
        let session = session_repo::create_session(
            &mut *tx,
            member.id,
            &minted.token_hash,
            ip_address,
            user_agent,
            expires_at,
        )
        .await?;
        member_repo::record_login(&mut *tx, member.id).await?;
        tx.commit().await?;

        tracing::info!(member_id = member.id, session_id = session.id, "member logged in");
        Ok(LoginOutcome {
            member,
            token: minted.token,
        })
    }

    pub async fn logout(&self, member_id: i64, session_id: i64) -> Result<()> {
        session_repo::delete_session(&self.pool, session_id).await?;
        tracing::info!(member_id, session_id, "member logged out");
        Ok(())
    }

    pub async fn me(&self, member_id: i64) -> Result<Member> {
        member_repo::find_by_id(&self.pool, member_id)
            .await?
            .ok_or_else(|| AppError::not_found("Member"))
    }
}
