use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// Liveness: the process is up.
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}

/// Readiness: PostgreSQL answers a round trip.
pub async fn ready(state: web::Data<AppState>) -> HttpResponse {
    match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "status": "ready" })),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unavailable",
                "error": "database unreachable",
            }))
        }
    }
}
