/// Chat and message handlers
use crate::error::Result;
use crate::middleware::CurrentMember;
use crate::models::{OpenChatRequest, SendMessageRequest};
use crate::pagination::PageQuery;
use crate::services::ChatService;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

fn service(state: &AppState) -> ChatService {
    ChatService::new(state.db.clone())
}

pub async fn list_chats(
    state: web::Data<AppState>,
    member: CurrentMember,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = query.resolve(&state.config.pagination)?;
    let chats = service(&state).list_chats(member.id, page).await?;
    Ok(HttpResponse::Ok().json(chats))
}

/// Get or create the direct chat with another member
pub async fn open_chat(
    state: web::Data<AppState>,
    member: CurrentMember,
    req: web::Json<OpenChatRequest>,
) -> Result<HttpResponse> {
    let (chat, created) = service(&state).open_chat(member.id, req.into_inner()).await?;
    if created {
        Ok(HttpResponse::Created().json(chat))
    } else {
        Ok(HttpResponse::Ok().json(chat))
    }
}

pub async fn list_messages(
    state: web::Data<AppState>,
    member: CurrentMember,
    path: web::Path<i64>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = query.resolve(&state.config.pagination)?;
    let messages = service(&state)
        .list_messages(member.id, path.into_inner(), page)
        .await?;
    Ok(HttpResponse::Ok().json(messages))
}

pub async fn send_message(
    state: web::Data<AppState>,
    member: CurrentMember,
    path: web::Path<i64>,
    req: web::Json<SendMessageRequest>,
) -> Result<HttpResponse> {
    let message = service(&state)
        .send_message(member.id, path.into_inner(), req.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(message))
}
