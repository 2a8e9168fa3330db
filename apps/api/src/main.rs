mod assistant;
mod catalog;
mod config;
mod errors;
mod llm_client;
mod matching;
mod models;
mod resume;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assistant::session::SessionStore;
use crate::catalog::CatalogIndex;
use crate::config::Config;
use crate::llm_client::TextGeneration;
use crate::matching::scorer::CandidateScorer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on unparseable env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting InternMatch API v{}", env!("CARGO_PKG_VERSION"));

    // A catalog that fails to load is fatal
    let catalog = match &config.catalog_path {
        Some(path) => CatalogIndex::from_path(path)
            .with_context(|| format!("failed to load catalog from {}", path.display()))?,
        None => {
            info!("CATALOG_PATH not set, using the built-in sample catalog");
            CatalogIndex::sample().context("failed to load the built-in sample catalog")?
        }
    };

    let generation = TextGeneration::from_config(&config);
    let sessions = SessionStore::new(Duration::from_secs(config.session_ttl_secs));

    info!(
        postings = catalog.len(),
        text_generation = generation.is_enabled(),
        session_ttl_secs = config.session_ttl_secs,
        "Application state ready"
    );

    let state = AppState {
        catalog: Arc::new(catalog),
        scorer: CandidateScorer::default(),
        generation,
        sessions: Arc::new(sessions),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
