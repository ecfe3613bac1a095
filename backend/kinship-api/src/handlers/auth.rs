/// Auth handlers - register, login, logout, me
use crate::config::SessionConfig;
use crate::error::Result;
use crate::middleware::CurrentMember;
use crate::models::{LoginRequest, LoginResponse, MemberResponse, RegisterRequest};
use crate::services::AuthService;
use crate::state::AppState;
use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::http::header::USER_AGENT;
use actix_web::{web, HttpRequest, HttpResponse};

const MAX_IP_LEN: usize = 64;

fn service(state: &AppState) -> AuthService {
    AuthService::new(state.db.clone(), state.config.session.clone())
}

fn session_cookie(config: &SessionConfig, token: String) -> Cookie<'static> {
    Cookie::build(config.cookie_name.clone(), token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(CookieDuration::hours(config.ttl_hours))
        .finish()
}

fn removal_cookie(config: &SessionConfig) -> Cookie<'static> {
    let mut cookie = Cookie::build(config.cookie_name.clone(), "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .finish();
    cookie.make_removal();
    cookie
}

/// Register a new member
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let member = service(&state).register(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(MemberResponse::from(&member)))
}

/// Log in; the token is returned in the body and as the session cookie
pub async fn login(
    state: web::Data<AppState>,
    http_req: HttpRequest,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let ip_address = http_req
        .connection_info()
        .realip_remote_addr()
        .map(|ip| ip.chars().take(MAX_IP_LEN).collect::<String>());
    let user_agent = http_req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let outcome = service(&state)
        .login(req.into_inner(), ip_address.as_deref(), user_agent.as_deref())
        .await?;

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&state.config.session, outcome.token.clone()))
        .json(LoginResponse {
            message: "Logged in successfully".to_string(),
            token: outcome.token,
        }))
}

/// End the current session
pub async fn logout(state: web::Data<AppState>, member: CurrentMember) -> Result<HttpResponse> {
    service(&state).logout(member.id, member.session_id).await?;
    Ok(HttpResponse::NoContent()
        .cookie(removal_cookie(&state.config.session))
        .finish())
}

/// The authenticated member
pub async fn me(state: web::Data<AppState>, member: CurrentMember) -> Result<HttpResponse> {
    let member = service(&state).me(member.id).await?;
    Ok(HttpResponse::Ok().json(MemberResponse::from(&member)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_attributes() {
        let config = SessionConfig::default();
        let cookie = session_cookie(&config, "t0k3n".to_string());

        assert_eq!(cookie.name(), "sessionid");
        assert_eq!(cookie.value(), "t0k3n");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(CookieDuration::hours(336)));
    }

    #[test]
    fn removal_cookie_expires_immediately() {
        let cookie = removal_cookie(&SessionConfig::default());
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
    }
}
