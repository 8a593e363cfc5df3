mod config;
mod errors;
mod llm_client;
mod models;
mod pipeline;
mod ranking;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::pipeline::invoker::StageInvoker;
use crate::ranking::RankEngine;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting job pipeline API v{}", env!("CARGO_PKG_VERSION"));

    // Generative ranking is optional: without a credential, the keyword
    // fallback carries every rank call.
    let gemini = config
        .gemini_api_key
        .clone()
        .map(|key| GeminiClient::new(key, config.gemini_model.clone()));
    match &gemini {
        Some(_) => info!("Gemini client initialized (model: {})", config.gemini_model),
        None => info!("Gemini unavailable: missing GEMINI_API_KEY/GOOGLE_API_KEY"),
    }

    let ranker = Arc::new(RankEngine::with_default_chain(gemini));
    let invoker = StageInvoker::new(Duration::from_secs(config.stage_timeout_secs));

    let state = AppState {
        config: config.clone(),
        invoker,
        ranker,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
