/// Comment handlers
use crate::error::Result;
use crate::middleware::CurrentMember;
use crate::models::CreateCommentRequest;
use crate::pagination::PageQuery;
use crate::services::CommentService;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

pub async fn create_comment(
    state: web::Data<AppState>,
    member: CurrentMember,
    path: web::Path<i64>,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    let comment = CommentService::new(state.db.clone())
        .create_comment(member.id, path.into_inner(), req.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

pub async fn list_comments(
    state: web::Data<AppState>,
    member: CurrentMember,
    path: web::Path<i64>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = query.resolve(&state.config.pagination)?;
    let comments = CommentService::new(state.db.clone())
        .list_comments(member.id, path.into_inner(), page)
        .await?;
    Ok(HttpResponse::Ok().json(comments))
}
