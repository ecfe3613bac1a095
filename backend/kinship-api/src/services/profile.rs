/// Public profiles and self-service profile edits
use crate::db::{friendship_repo, member_repo, post_repo};
use crate::error::{AppError, Result};
use crate::models::{Member, ProfileResponse, Relation, UpdateProfileRequest};
use sqlx::PgPool;
use validator::Validate;

pub struct ProfileService {
    pool: PgPool,
}

impl ProfileService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_profile(&self, viewer_id: i64, username: &str) -> Result<ProfileResponse> {
        let member = member_repo::find_by_username(&self.pool, username)
            .await?
            .ok_or_else(|| AppError::not_found("Member"))?;

        let edge = if member.id == viewer_id {
            None
        } else {
            friendship_repo::find_between(&self.pool, viewer_id, member.id).await?
        };
        let friends_count = friendship_repo::count_friends(&self.pool, member.id).await?;
        let posts_count = post_repo::count_by_author(&self.pool, member.id).await?;

        Ok(ProfileResponse {
            id: member.id,
            friendship: Relation::classify(viewer_id, member.id, edge.as_ref()),
            username: member.username,
            avatar: member.avatar,
            last_seen: member.last_seen,
            created_at: member.created_at,
            friends_count,
            posts_count,
        })
    }

    pub async fn update_profile(
        &self,
        viewer_id: i64,
        username: &str,
        req: UpdateProfileRequest,
    ) -> Result<Member> {
        let member = member_repo::find_by_username(&self.pool, username)
            .await?
            .ok_or_else(|| AppError::not_found("Member"))?;
        if member.id != viewer_id {
            tracing::warn!(viewer_id, owner_id = member.id, "profile edit by non-owner rejected");
            return Err(AppError::Forbidden(
                "You can only edit your own profile".to_string(),
            ));
        }

        req.validate()?;

        // An empty avatar string clears it.
        let avatar = req.avatar.as_deref().map(str::trim).map(|a| {
            if a.is_empty() {
                None
            } else {
                Some(a)
            }
        });

        let updated = member_repo::update_profile(
            &self.pool,
            member.id,
            req.email.as_deref().map(str::trim),
            avatar,
        )
        .await?;

        tracing::info!(member_id = updated.id, "profile updated");
        Ok(updated)
    }
}
