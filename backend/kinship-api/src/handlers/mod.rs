/// HTTP handlers and route table
///
/// Everything under `/api` except register/login sits behind `SessionAuth`,
/// including unknown paths: they answer 401 without a session and a JSON 404
/// with one.
pub mod auth;
pub mod chats;
pub mod comments;
pub mod friends;
pub mod health;
pub mod posts;
pub mod profile;

use crate::error::{AppError, Result};
use crate::middleware::SessionAuth;
use actix_web::{web, HttpResponse};

async fn not_found() -> Result<HttpResponse> {
    Err(AppError::NotFound("Not found".to_string()))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health))
        .route("/health/ready", web::get().to(health::ready))
        .service(
            web::scope("/api/auth")
                .route("/register/", web::post().to(auth::register))
                .route("/login/", web::post().to(auth::login))
                .service(
                    web::scope("")
                        .wrap(SessionAuth)
                        .route("/logout/", web::post().to(auth::logout))
                        .route("/me/", web::get().to(auth::me)),
                ),
        )
        .service(
            web::scope("/api")
                .wrap(SessionAuth)
                .default_service(web::to(not_found))
                .service(
                    web::resource("/profile/{username}/")
                        .route(web::get().to(profile::get_profile))
                        .route(web::patch().to(profile::update_profile)),
                )
                .service(
                    web::resource("/posts/")
                        .route(web::get().to(posts::feed))
                        .route(web::post().to(posts::create_post)),
                )
                .service(
                    web::resource("/posts/{post_id}/")
                        .route(web::get().to(posts::get_post))
                        .route(web::delete().to(posts::delete_post)),
                )
                .route("/posts/{post_id}/like/", web::post().to(posts::toggle_like))
                .route("/posts/{post_id}/comment/", web::post().to(comments::create_comment))
                .route("/posts/{post_id}/comments/", web::get().to(comments::list_comments))
                .route("/members/{username}/posts/", web::get().to(posts::member_posts))
                .service(
                    web::scope("/friends")
                        .route("/search/", web::get().to(friends::search))
                        .service(
                            web::resource("/{username}/")
                                .route(web::get().to(friends::list_friends))
                                .route(web::post().to(friends::send_request)),
                        )
                        .route("/{username}/requests/", web::get().to(friends::list_requests))
                        .route(
                            "/{username}/accept/{request_id}/",
                            web::post().to(friends::accept_request),
                        )
                        .route(
                            "/{username}/requests/{request_id}/",
                            web::delete().to(friends::delete_request),
                        )
                        .route(
                            "/{username}/{friend_username}/",
                            web::delete().to(friends::remove_friend),
                        ),
                )
                .service(
                    web::resource("/messages/chats/")
                        .route(web::get().to(chats::list_chats))
                        .route(web::post().to(chats::open_chat)),
                )
                .route("/messages/chat/{chat_id}/", web::get().to(chats::list_messages))
                .route("/messages/chat/{chat_id}/send/", web::post().to(chats::send_message)),
        );
}
