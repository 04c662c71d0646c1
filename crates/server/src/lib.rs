//! Newsletter web server
//!
//! Axum-based JSON API over the newsletter pipeline, plus the built frontend.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::path::Path;

use anyhow::Context;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use newsletter_core::{Pipeline, Settings};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use config::ServerConfig;
use state::AppState;

/// Create the application router.
///
/// Paths outside `/api` are served from `static_dir`, with unknown paths
/// answered by its `index.html` so client-side routes resolve.
pub fn create_router(state: AppState, static_dir: &Path, max_body_bytes: usize) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    let api_routes = Router::new()
        .route("/generate-from-url", post(routes::generate::generate_from_url))
        .route("/generate-from-file", post(routes::generate::generate_from_file))
        .route("/models", get(routes::catalog::list_models))
        .route("/audiences", get(routes::catalog::list_audiences))
        .route("/health", get(routes::catalog::health))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state);

    let frontend = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .nest("/api", api_routes)
        .fallback_service(frontend)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Run the web server.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let settings = Settings::load(config.settings_path.as_deref()).context("Failed to load settings")?;
    tracing::info!(
        endpoint = %settings.generator.endpoint,
        mode = ?settings.compose.mode,
        "model runtime configured"
    );
    let pipeline = Pipeline::with_ollama(settings).context("Failed to set up the model backend")?;

    std::fs::create_dir_all(&config.upload_dir)
        .with_context(|| format!("Failed to create upload directory {}", config.upload_dir.display()))?;

    let state = AppState::new(pipeline, config.upload_dir.clone());
    let app = create_router(state, &config.static_dir, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!("Web server listening on http://{}", config.addr);

    axum::serve(listener, app).await?;
    Ok(())
}
