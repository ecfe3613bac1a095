/// Post service - feed, post CRUD and likes
use crate::db::{friendship_repo, like_repo, member_repo, post_repo};
use crate::error::{AppError, Result};
use crate::models::{CreatePostRequest, LikeToggleResponse, PostResponse};
use crate::pagination::{Page, PageRequest};
use sqlx::PgPool;
use validator::Validate;

pub struct PostService {
    pool: PgPool,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Own posts plus accepted friends' posts, newest first
    pub async fn feed(&self, viewer_id: i64, page: PageRequest) -> Result<Page<PostResponse>> {
        let rows = post_repo::feed(&self.pool, viewer_id, page.limit, page.offset()).await?;
        let count = post_repo::count_feed(&self.pool, viewer_id).await?;
        Ok(Page::new(rows, count, page).map(PostResponse::from))
    }

    pub async fn create_post(&self, author_id: i64, req: CreatePostRequest) -> Result<PostResponse> {
        req.validate()?;

        let media_urls: Vec<String> = req.media_urls.iter().map(|u| u.trim().to_string()).collect();
        let post = post_repo::create_post(&self.pool, author_id, req.content.trim(), &media_urls)
            .await?;

        tracing::info!(post_id = post.id, author_id, "post created");
        self.get_post(author_id, post.id).await
    }

    /// A post visible to the viewer; invisible and missing posts are both 404
    pub async fn get_post(&self, viewer_id: i64, post_id: i64) -> Result<PostResponse> {
        post_repo::find_visible(&self.pool, viewer_id, post_id)
            .await?
            .map(PostResponse::from)
            .ok_or_else(|| AppError::not_found("Post"))
    }

    pub async fn delete_post(&self, viewer_id: i64, post_id: i64) -> Result<()> {
        let post = self.get_post(viewer_id, post_id).await?;
        if post.author.id != viewer_id {
            tracing::warn!(post_id, viewer_id, "post delete by non-author rejected");
            return Err(AppError::Forbidden(
                "You can only delete your own posts".to_string(),
            ));
        }

        post_repo::delete_post(&self.pool, post_id).await?;
        tracing::info!(post_id, author_id = viewer_id, "post deleted");
        Ok(())
    }

    /// Posts by `username`, readable by that member and their friends only
    pub async fn member_posts(
        &self,
        viewer_id: i64,
        username: &str,
        page: PageRequest,
    ) -> Result<Page<PostResponse>> {
        let author = member_repo::find_by_username(&self.pool, username)
            .await?
            .ok_or_else(|| AppError::not_found("Member"))?;

        if author.id != viewer_id
            && !friendship_repo::are_friends(&self.pool, viewer_id, author.id).await?
        {
            return Err(AppError::Forbidden(
                "Only friends can see this member's posts".to_string(),
            ));
        }

        let rows =
            post_repo::list_by_author(&self.pool, viewer_id, author.id, page.limit, page.offset())
                .await?;
        let count = post_repo::count_by_author(&self.pool, author.id).await?;
        Ok(Page::new(rows, count, page).map(PostResponse::from))
    }

    /// Like the post if the viewer has not, unlike it otherwise. The like row
    /// and `likes_count` change in one transaction under the post's row lock.
    pub async fn toggle_like(&self, viewer_id: i64, post_id: i64) -> Result<LikeToggleResponse> {
        self.get_post(viewer_id, post_id).await?;

        let mut tx = self.pool.begin().await?;
        if !post_repo::lock_post(&mut *tx, post_id).await? {
            return Err(AppError::not_found("Post"));
        }

        let liked = if like_repo::delete_like(&mut *tx, viewer_id, post_id).await? {
            false
        } else {
            like_repo::create_like(&mut *tx, viewer_id, post_id).await?;
            true
        };
        let delta = if liked { 1 } else { -1 };
        let likes_count = post_repo::adjust_likes_count(&mut *tx, post_id, delta).await?;
        tx.commit().await?;

        tracing::info!(post_id, member_id = viewer_id, liked, likes_count, "like toggled");
        Ok(LikeToggleResponse { liked, likes_count })
    }
}
