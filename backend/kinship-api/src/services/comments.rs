/// Comment service - threaded comments on visible posts
use crate::db::{comment_repo, post_repo};
use crate::error::{AppError, Result};
use crate::models::{CommentResponse, CreateCommentRequest};
use crate::pagination::{Page, PageRequest};
use sqlx::PgPool;
use validator::Validate;

pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ensure_visible(&self, viewer_id: i64, post_id: i64) -> Result<()> {
        post_repo::find_visible(&self.pool, viewer_id, post_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Post"))
    }

    /// Add a comment (or a reply when `parent` is set). The comment insert and
    /// the `comments_count` bump share one transaction.
    pub async fn create_comment(
        &self,
        viewer_id: i64,
        post_id: i64,
        req: CreateCommentRequest,
    ) -> Result<CommentResponse> {
        req.validate()?;
        self.ensure_visible(viewer_id, post_id).await?;

        let mut tx = self.pool.begin().await?;
        if !post_repo::lock_post(&mut *tx, post_id).await? {
            return Err(AppError::not_found("Post"));
        }

        if let Some(parent_id) = req.parent {
            let parent = comment_repo::find_by_id(&mut *tx, parent_id).await?;
            if parent.map(|p| p.post_id) != Some(post_id) {
                return Err(AppError::BadRequest(
                    "Parent comment does not belong to this post".to_string(),
                ));
            }
        }

        let comment =
            comment_repo::create_comment(&mut *tx, post_id, viewer_id, req.parent, req.text.trim())
                .await?;
        post_repo::adjust_comments_count(&mut *tx, post_id, 1).await?;
        tx.commit().await?;

        tracing::info!(
            comment_id = comment.id,
            post_id,
            author_id = viewer_id,
            parent_id = ?comment.parent_id,
            "comment created"
        );

        comment_repo::find_row(&self.pool, comment.id)
            .await?
            .map(CommentResponse::from)
            .ok_or_else(|| AppError::not_found("Comment"))
    }

    /// Comments on a visible post, oldest first
    pub async fn list_comments(
        &self,
        viewer_id: i64,
        post_id: i64,
        page: PageRequest,
    ) -> Result<Page<CommentResponse>> {
        self.ensure_visible(viewer_id, post_id).await?;

        let rows = comment_repo::list_for_post(&self.pool, post_id, page.limit, page.offset()).await?;
        let count = comment_repo::count_for_post(&self.pool, post_id).await?;
        Ok(Page::new(rows, count, page).map(CommentResponse::from))
    }
}
