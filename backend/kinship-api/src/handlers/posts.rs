/// Post handlers - feed, CRUD, likes
use crate::error::Result;
use crate::middleware::CurrentMember;
use crate::models::CreatePostRequest;
use crate::pagination::PageQuery;
use crate::services::PostService;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

fn service(state: &AppState) -> PostService {
    PostService::new(state.db.clone())
}

/// News feed
pub async fn feed(
    state: web::Data<AppState>,
    member: CurrentMember,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = query.resolve(&state.config.pagination)?;
    let posts = service(&state).feed(member.id, page).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// Create a new post
pub async fn create_post(
    state: web::Data<AppState>,
    member: CurrentMember,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let post = service(&state).create_post(member.id, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(post))
}

/// Get a post by ID
pub async fn get_post(
    state: web::Data<AppState>,
    member: CurrentMember,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let post = service(&state).get_post(member.id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Delete own post
pub async fn delete_post(
    state: web::Data<AppState>,
    member: CurrentMember,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    service(&state).delete_post(member.id, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Posts of one member (self or friend)
pub async fn member_posts(
    state: web::Data<AppState>,
    member: CurrentMember,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = query.resolve(&state.config.pagination)?;
    let posts = service(&state).member_posts(member.id, &path, page).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// Like / unlike
pub async fn toggle_like(
    state: web::Data<AppState>,
    member: CurrentMember,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let result = service(&state).toggle_like(member.id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}
