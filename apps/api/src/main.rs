mod catalog;
mod config;
mod errors;
mod generation;
mod llm_client;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::PgExerciseCatalog;
use crate::config::Config;
use crate::generation::client::GenerationClient;
use crate::generation::generator::ProgramGenerator;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Trainer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL-backed exercise catalog
    let catalog = PgExerciseCatalog::connect(&config.database_url).await?;

    // Initialize LLM client
    let llm = LlmClient::new(config.llm.clone())?;
    info!("LLM client initialized (model: {})", llm.model());

    let client = GenerationClient::new(Arc::new(llm), config.retry);
    info!(
        "Generation retries: {} attempts, {}ms base delay, empty sessions: {:?}",
        config.retry.max_attempts,
        config.retry.base_delay.as_millis(),
        config.empty_session_policy
    );

    let generator = ProgramGenerator::new(
        Arc::new(catalog),
        client,
        config.empty_session_policy,
        config.fallback_seed,
    );

    let state = AppState {
        generator: Arc::new(generator),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
