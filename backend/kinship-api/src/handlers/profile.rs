/// Profile handlers
use crate::error::Result;
use crate::middleware::CurrentMember;
use crate::models::{MemberResponse, UpdateProfileRequest};
use crate::services::ProfileService;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// Public profile with the viewer's friendship relation
pub async fn get_profile(
    state: web::Data<AppState>,
    member: CurrentMember,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let profile = ProfileService::new(state.db.clone())
        .get_profile(member.id, &path)
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Edit own email / avatar
pub async fn update_profile(
    state: web::Data<AppState>,
    member: CurrentMember,
    path: web::Path<String>,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    let updated = ProfileService::new(state.db.clone())
        .update_profile(member.id, &path, req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MemberResponse::from(&updated)))
}
