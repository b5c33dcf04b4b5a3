use actix_web::{web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod app;
mod db;
mod inference;
mod model;
mod pipeline;
mod service;

use app::AppState;
use model::Config;

/// Upper bound for uploaded PDF payloads (25 MiB)
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let bind_addr = config.bind_addr();

    let state = AppState::new(&config)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    let db_pool = web::Data::new(state.db_pool.clone());
    let repository = web::Data::new(state.repository.clone());
    let analysis_service = web::Data::new(state.analysis_service.clone());

    tracing::info!("Starting legal document intelligence server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            // PDF uploads arrive as a raw byte payload
            .app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES))
            .app_data(db_pool.clone())
            .app_data(repository.clone())
            .app_data(analysis_service.clone())
            .configure(api::analysis::configure)
            .configure(api::document::configure)
            .configure(api::health::configure)
            .configure(api::openapi::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
