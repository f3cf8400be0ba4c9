mod chat;
mod config;
mod context;
mod db;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;
mod store;
mod training;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::chat::timestamps::TimestampKeywords;
use crate::config::Config;
use crate::context::tables::PromptTables;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::PgDataStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HorseCoach API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let pool = create_pool(&config.database_url).await?;
    let store = Arc::new(PgDataStore::new(pool));

    // Initialize LLM client
    let llm = LlmClient::new(config.llm_settings()).context("Failed to build LLM client")?;
    info!(
        "LLM client initialized (model: {}, timeout: {}s, max retries: {})",
        llm.model(),
        config.llm_timeout_secs,
        config.llm_max_retries
    );

    // Build app state
    let state = AppState {
        store,
        llm,
        tables: Arc::new(PromptTables::default()),
        keywords: Arc::new(TimestampKeywords::default()),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the mobile app's API gateway

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
