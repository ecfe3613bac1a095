/// Friend handlers
use crate::error::Result;
use crate::middleware::CurrentMember;
use crate::models::{RequestDirection, SendFriendRequest};
use crate::pagination::PageQuery;
use crate::services::{FriendRequestOutcome, FriendService};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct RequestsQuery {
    #[serde(default)]
    pub direction: RequestDirection,
}

fn service(state: &AppState) -> FriendService {
    FriendService::new(state.db.clone())
}

/// Search members by username
pub async fn search(
    state: web::Data<AppState>,
    member: CurrentMember,
    search: web::Query<SearchQuery>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = query.resolve(&state.config.pagination)?;
    let results = service(&state).search(member.id, &search.q, page).await?;
    Ok(HttpResponse::Ok().json(results))
}

/// Accepted friends of a member
pub async fn list_friends(
    state: web::Data<AppState>,
    _member: CurrentMember,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = query.resolve(&state.config.pagination)?;
    let friends = service(&state).list_friends(&path, page).await?;
    Ok(HttpResponse::Ok().json(friends))
}

/// Send a friend request (or accept a crossing one)
pub async fn send_request(
    state: web::Data<AppState>,
    member: CurrentMember,
    path: web::Path<String>,
    req: web::Json<SendFriendRequest>,
) -> Result<HttpResponse> {
    let outcome = service(&state)
        .send_request(&member, &path, req.into_inner())
        .await?;
    Ok(match outcome {
        FriendRequestOutcome::Created(request) => HttpResponse::Created().json(request),
        FriendRequestOutcome::Accepted(request) => HttpResponse::Ok().json(request),
    })
}

/// Pending requests; `?direction=outgoing` for the ones the viewer sent
pub async fn list_requests(
    state: web::Data<AppState>,
    member: CurrentMember,
    path: web::Path<String>,
    filter: web::Query<RequestsQuery>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = query.resolve(&state.config.pagination)?;
    let requests = service(&state)
        .list_requests(&member, &path, filter.direction, page)
        .await?;
    Ok(HttpResponse::Ok().json(requests))
}

pub async fn accept_request(
    state: web::Data<AppState>,
    member: CurrentMember,
    path: web::Path<(String, i64)>,
) -> Result<HttpResponse> {
    let (username, request_id) = path.into_inner();
    let request = service(&state)
        .accept_request(&member, &username, request_id)
        .await?;
    Ok(HttpResponse::Ok().json(request))
}

pub async fn delete_request(
    state: web::Data<AppState>,
    member: CurrentMember,
    path: web::Path<(String, i64)>,
) -> Result<HttpResponse> {
    let (username, request_id) = path.into_inner();
    service(&state)
        .delete_request(&member, &username, request_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn remove_friend(
    state: web::Data<AppState>,
    member: CurrentMember,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (username, friend_username) = path.into_inner();
    service(&state)
        .remove_friend(&member, &username, &friend_username)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
