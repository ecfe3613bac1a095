/// Friend service - search, friend lists and the request lifecycle
///
/// Edges are directed rows; two members are friends when an accepted row
/// exists in either direction.
use crate::db::{escape_like, friendship_repo, member_repo};
use crate::error::{AppError, Result};
use crate::middleware::CurrentMember;
use crate::models::{
    FriendRequestResponse, Friendship, MemberSearchResult, MemberSummary, Relation,
    RequestDirection, SendFriendRequest,
};
use crate::pagination::{Page, PageRequest};
use sqlx::PgPool;
use validator::Validate;

/// Result of sending a request: a new pending request, or the acceptance of
/// the request the target had already sent.
#[derive(Debug, Clone)]
pub enum FriendRequestOutcome {
    Created(FriendRequestResponse),
    Accepted(FriendRequestResponse),
}

pub struct FriendService {
    pool: PgPool,
}

/// Friend endpoints are scoped by `{username}`, which must be the viewer.
fn ensure_self(viewer: &CurrentMember, username: &str) -> Result<()> {
    if viewer.username == username {
        Ok(())
    } else {
        tracing::warn!(
            member_id = viewer.id,
            path_username = %username,
            "friend operation on another member's behalf rejected"
        );
        Err(AppError::Forbidden(
            "You can only manage your own friends".to_string(),
        ))
    }
}

/// Relation to `other_id` from whichever of `edges` connects the two.
fn relation_from_edges(viewer_id: i64, other_id: i64, edges: &[Friendship]) -> Relation {
    let edge = edges
        .iter()
        .filter(|e| e.involves(other_id))
        .max_by_key(|e| e.is_accepted());
    Relation::classify(viewer_id, other_id, edge)
}

impl FriendService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn search(
        &self,
        viewer_id: i64,
        query: &str,
        page: PageRequest,
    ) -> Result<Page<MemberSearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::BadRequest(
                "Search query must not be empty".to_string(),
            ));
        }
        let pattern = escape_like(query);

        let members =
            member_repo::search(&self.pool, viewer_id, &pattern, page.limit, page.offset()).await?;
        let count = member_repo::count_search(&self.pool, viewer_id, &pattern).await?;

        let ids: Vec<i64> = members.iter().map(|m| m.id).collect();
        let edges = friendship_repo::find_edges_with(&self.pool, viewer_id, &ids).await?;

        Ok(Page::new(members, count, page).map(|member| MemberSearchResult {
            friendship: relation_from_edges(viewer_id, member.id, &edges),
            member,
        }))
    }

    pub async fn list_friends(
        &self,
        username: &str,
        page: PageRequest,
    ) -> Result<Page<MemberSummary>> {
        let member = member_repo::find_by_username(&self.pool, username)
            .await?
            .ok_or_else(|| AppError::not_found("Member"))?;

        let friends =
            friendship_repo::list_friends(&self.pool, member.id, page.limit, page.offset()).await?;
        let count = friendship_repo::count_friends(&self.pool, member.id).await?;
        Ok(Page::new(friends, count, page))
    }

    pub async fn send_request(
        &self,
        viewer: &CurrentMember,
        username: &str,
        req: SendFriendRequest,
    ) -> Result<FriendRequestOutcome> {
        ensure_self(viewer, username)?;
        req.validate()?;

        let target = member_repo::find_by_username(&self.pool, req.target_username.trim())
            .await?
            .filter(|m| m.is_active)
            .ok_or_else(|| AppError::not_found("Member"))?;
        if target.id == viewer.id {
            return Err(AppError::BadRequest(
                "You cannot send a friend request to yourself".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        member_repo::lock_pair(&mut *tx, viewer.id, target.id).await?;

        let outcome = match friendship_repo::find_between(&mut *tx, viewer.id, target.id).await? {
            Some(edge) if edge.is_accepted() => {
                return Err(AppError::Conflict("You are already friends".to_string()));
            }
            Some(edge) if edge.from_member_id == viewer.id => {
                return Err(AppError::Conflict("Friend request already sent".to_string()));
            }
            Some(edge) => {
                let accepted = friendship_repo::accept(&mut *tx, edge.id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Friend request"))?;
                tracing::info!(
                    friendship_id = accepted.id,
                    member_id = viewer.id,
                    friend_id = target.id,
                    "crossing friend request accepted"
                );
                FriendRequestOutcome::Accepted(self.load_request(&mut tx, accepted.id).await?)
            }
            None => {
                let created = friendship_repo::create_request(&mut *tx, viewer.id, target.id).await?;
                tracing::info!(
                    friendship_id = created.id,
                    from_id = viewer.id,
                    to_id = target.id,
                    "friend request sent"
                );
                FriendRequestOutcome::Created(self.load_request(&mut tx, created.id).await?)
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }

    async fn load_request(
        &self,
        tx: &mut sqlx::Transaction<'static, sqlx::Postgres>,
        id: i64,
    ) -> Result<FriendRequestResponse> {
        friendship_repo::find_request_row(&mut **tx, id)
            .await?
            .map(FriendRequestResponse::from)
            .ok_or_else(|| AppError::not_found("Friend request"))
    }

    pub async fn list_requests(
        &self,
        viewer: &CurrentMember,
        username: &str,
        direction: RequestDirection,
        page: PageRequest,
    ) -> Result<Page<FriendRequestResponse>> {
        ensure_self(viewer, username)?;

        let rows = friendship_repo::list_pending(
            &self.pool,
            viewer.id,
            direction,
            page.limit,
            page.offset(),
        )
        .await?;
        let count = friendship_repo::count_pending(&self.pool, viewer.id, direction).await?;
        Ok(Page::new(rows, count, page).map(FriendRequestResponse::from))
    }

    /// Accept a pending request addressed to the viewer
    pub async fn accept_request(
        &self,
        viewer: &CurrentMember,
        username: &str,
        request_id: i64,
    ) -> Result<FriendRequestResponse> {
        ensure_self(viewer, username)?;

        let request = friendship_repo::find_by_id(&self.pool, request_id)
            .await?
            .filter(|f| f.to_member_id == viewer.id && !f.is_accepted())
            .ok_or_else(|| AppError::not_found("Friend request"))?;

        let accepted = friendship_repo::accept(&self.pool, request.id)
            .await?
            .ok_or_else(|| AppError::not_found("Friend request"))?;
        tracing::info!(
            friendship_id = accepted.id,
            member_id = viewer.id,
            friend_id = accepted.from_member_id,
            "friend request accepted"
        );

        friendship_repo::find_request_row(&self.pool, accepted.id)
            .await?
            .map(FriendRequestResponse::from)
            .ok_or_else(|| AppError::not_found("Friend request"))
    }

    /// Reject an incoming or cancel an outgoing pending request
    pub async fn delete_request(
        &self,
        viewer: &CurrentMember,
        username: &str,
        request_id: i64,
    ) -> Result<()> {
        ensure_self(viewer, username)?;

        let request = friendship_repo::find_by_id(&self.pool, request_id)
            .await?
            .filter(|f| f.involves(viewer.id) && !f.is_accepted())
            .ok_or_else(|| AppError::not_found("Friend request"))?;

        friendship_repo::delete(&self.pool, request.id).await?;
        let action = if request.from_member_id == viewer.id {
            "cancelled"
        } else {
            "rejected"
        };
        tracing::info!(friendship_id = request.id, member_id = viewer.id, action, "friend request removed");
        Ok(())
    }

    /// Unfriend, whichever side sent the original request
    pub async fn remove_friend(
        &self,
        viewer: &CurrentMember,
        username: &str,
        friend_username: &str,
    ) -> Result<()> {
        ensure_self(viewer, username)?;

        let friend = member_repo::find_by_username(&self.pool, friend_username)
            .await?
            .ok_or_else(|| AppError::not_found("Member"))?;

        let removed =
            friendship_repo::delete_accepted_between(&self.pool, viewer.id, friend.id).await?;
        if removed == 0 {
            return Err(AppError::NotFound("You are not friends".to_string()));
        }

        tracing::info!(member_id = viewer.id, friend_id = friend.id, "friendship removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{STATUS_ACCEPTED, STATUS_PENDING};
    use chrono::Utc;

    fn viewer(username: &str) -> CurrentMember {
        CurrentMember {
            id: 1,
            username: username.to_string(),
            session_id: 1,
        }
    }

    fn edge(id: i64, from: i64, to: i64, status: &str) -> Friendship {
        Friendship {
            id,
            from_member_id: from,
            to_member_id: to,
            status: status.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn acting_for_another_member_is_forbidden() {
        assert!(ensure_self(&viewer("alice"), "alice").is_ok());
        assert!(matches!(
            ensure_self(&viewer("alice"), "bob"),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn relation_picks_the_edge_for_each_member() {
        let edges = vec![edge(1, 1, 2, STATUS_PENDING), edge(2, 3, 1, STATUS_ACCEPTED)];
        assert_eq!(relation_from_edges(1, 2, &edges), Relation::RequestSent);
        assert_eq!(relation_from_edges(1, 3, &edges), Relation::Friends);
        assert_eq!(relation_from_edges(1, 4, &edges), Relation::None);
    }

    #[test]
    fn accepted_edge_outranks_pending_one() {
        let edges = vec![edge(1, 2, 1, STATUS_PENDING), edge(2, 1, 2, STATUS_ACCEPTED)];
        assert_eq!(relation_from_edges(1, 2, &edges), Relation::Friends);
    }
}
