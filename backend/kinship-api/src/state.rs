use crate::config::Config;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state handed to every handler via `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}
