mod config;
mod db;
mod errors;
mod llm_client;
mod matching;
mod models;
mod profile;
mod roadmap;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::{DisabledNarrative, LlmClient, NarrativeGenerator};
use crate::roadmap::builder::RoadmapBuilder;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::Stores;

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

    info!("Starting Pathwise API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;

    // Initialize Narrative Generator
    let narrative: Arc<dyn NarrativeGenerator> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone(), config.narrative_timeout)?;
            info!(
                "Narrative generator initialized (model: {}, timeout: {:?})",
                llm_client::MODEL,
                config.narrative_timeout
            );
            Arc::new(llm)
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; roadmaps will use fallback narrative text");
            Arc::new(DisabledNarrative)
        }
    };

    let roadmap_builder = RoadmapBuilder::new(
        narrative,
        config.narrative_timeout,
        config.narrative_enrich_steps,
    );

    // Build app state
    let state = AppState {
        stores: Stores::postgres(db),
        roadmap_builder,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS origins once the web client's domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
