//! Conference Backend
//!
//! REST backend for a one-day conference site: bookings, admin-managed
//! content, a message board and live polls, persisted as JSON documents.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod export;
mod models;
mod notify;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, LogFormat, StorageBackend};
use db::Repository;

/// Multipart framing allowed on top of the largest accepted file.
const UPLOAD_OVERHEAD_BYTES: usize = 64 * 1024;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let json = config.log_format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Starting Conference Backend");
    match config.storage {
        StorageBackend::JsonFiles => tracing::info!("Data directory: {:?}", config.data_dir),
        StorageBackend::Sqlite => tracing::info!("Database path: {:?}", config.db_path),
    }
    tracing::info!("Upload directory: {:?}", config.upload_dir);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if PSK is not configured
    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (CONF_API_PSK). Admin routes are open!");
    }

    // Initialize storage
    let store = db::open_store(&config).await?;
    let repo = Arc::new(Repository::new(store));
    tokio::fs::create_dir_all(&config.upload_dir).await?;

    // Create application state
    let state = AppState {
        repo,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
///
/// Admin routes are guarded per handler by the `AdminAccess` extractor.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes + UPLOAD_OVERHEAD_BYTES);
    let uploads = ServeDir::new(&state.config.upload_dir);

    // API routes
    let api_routes = Router::new()
        // Registrations
        .route(
            "/registrations",
            get(api::list_registrations).post(api::create_registration),
        )
        .route(
            "/registrations/{id}",
            get(api::get_registration)
                .patch(api::update_registration_status)
                .delete(api::delete_registration),
        )
        // Content
        .route("/sponsors", get(api::list_sponsors).post(api::save_sponsors))
        .route("/sponsors/tiers", get(api::list_sponsor_tiers))
        .route("/agenda", get(api::list_agenda).post(api::save_agenda))
        .route("/agenda/{id}/move", post(api::move_agenda))
        .route("/tabs", get(api::list_tabs).post(api::save_tabs))
        .route("/tabs/{id}/move", post(api::move_tab))
        .route("/venue", get(api::get_venue).post(api::save_venue))
        .route("/branding", get(api::get_branding).post(api::save_branding))
        // Engagement
        .route("/messages", get(api::list_messages).post(api::create_message))
        .route(
            "/voting",
            get(api::get_polls)
                .post(api::post_voting)
                .patch(api::update_poll),
        )
        // Admin tools
        .route("/export", get(api::export_bookings))
        .route("/upload", post(api::upload_image).layer(upload_limit))
        .route("/revisions", get(api::get_revisions));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .nest_service(api::UPLOADS_PATH, uploads)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
