use actix_web::{web, App, HttpServer};
use anyhow::Context;
use db_pool::create_pool;
use kinship_api::db::{run_migrations, session_repo};
use kinship_api::logging::init_tracing;
use kinship_api::security::prime_dummy_hash;
use kinship_api::{AppState, Config};
use tracing_actix_web::TracingLogger;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(env = %config.app.env, "Starting kinship-api");

    if !prime_dummy_hash() {
        tracing::warn!("Failed to precompute dummy password hash");
    }

    config.database.log_config();
    let pool = create_pool(config.database.clone())
        .await
        .context("Failed to create database pool")?;

    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    match session_repo::delete_expired(&pool).await {
        Ok(removed) => tracing::info!(removed, "Expired sessions purged"),
        Err(e) => tracing::warn!(error = %e, "Failed to purge expired sessions"),
    }

    let bind_addr = (config.app.host.clone(), config.app.port);
    let cors_config = config.cors.clone();
    let state = web::Data::new(AppState::new(pool, config));

    tracing::info!(host = %bind_addr.0, port = bind_addr.1, "HTTP server listening");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(kinship_api::build_cors(&cors_config))
            .wrap(TracingLogger::default())
            .configure(kinship_api::configure)
    })
    .bind(bind_addr)?
    .run()
    .await?;

    tracing::info!("kinship-api shut down");
    Ok(())
}
