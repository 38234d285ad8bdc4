//! LinkIt Backend
//!
//! REST backend for the LinkIt bookmark manager: SQLite persistence, remote
//! metadata lookup and a per-user vault gate for private links.

mod api;
mod auth;
mod config;
mod db;
mod engine;
mod errors;
mod metadata;
mod models;
mod vault;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;
use engine::SystemClock;
use errors::AppError;
use metadata::MetadataClient;
use vault::VaultRegistry;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub metadata: Arc<MetadataClient>,
    pub vault: Arc<VaultRegistry>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting LinkIt backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Metadata service: {}", config.metadata_url);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (LINKIT_API_PSK). Authentication is disabled!");
    }

    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    let metadata = MetadataClient::new(&config.metadata_url, config.metadata_timeout)
        .map_err(AppError::from)?;

    let vault = VaultRegistry::new(Arc::new(SystemClock), config.vault_delays);

    let state = AppState {
        repo,
        metadata: Arc::new(metadata),
        vault: Arc::new(vault),
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let psk = state.config.api_psk.clone();

    let api_routes = Router::new()
        // Identity and snapshot
        .route("/me", get(api::get_me))
        .route("/snapshot", get(api::get_snapshot))
        .route("/snapshot/revision", get(api::get_revision))
        // Links
        .route("/links", get(api::list_links).post(api::create_link))
        .route(
            "/links/{id}",
            get(api::get_link)
                .put(api::update_link)
                .delete(api::delete_link),
        )
        .route("/links/{id}/trash", post(api::trash_link))
        .route("/links/{id}/restore", post(api::restore_link))
        .route("/trash", delete(api::empty_trash))
        .route("/tags", get(api::list_tags))
        // Preview
        .route("/preview", post(api::preview_link))
        // Vault
        .route("/vault", get(api::get_vault))
        .route("/vault/open", post(api::open_vault))
        .route("/vault/cancel", post(api::cancel_vault))
        .route("/vault/lock", post(api::lock_vault))
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
