mod candidates;
mod config;
mod db;
mod errors;
mod extractors;
mod jobs;
mod llm_client;
mod models;
mod ranking;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, RecommendationBackend};
use crate::db::{create_pool, run_migrations};
use crate::llm_client::LlmClient;
use crate::ranking::engine::RankingEngine;
use crate::ranking::recommendation::{
    LlmRecommendationProvider, RecommendationProvider, RuleBasedRecommendationProvider,
};
use crate::ranking::store::PgRankingStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Ranking API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    // Initialize LLM client
    let llm = LlmClient::new(
        config.ai_gateway_url.clone(),
        config.ai_gateway_api_key.clone(),
    )?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Recommendations are best-effort: a single attempt, no retries
    let recommender: Arc<dyn RecommendationProvider> = match config.recommendation_backend {
        RecommendationBackend::Llm => Arc::new(LlmRecommendationProvider::new(
            Arc::new(llm.clone().with_temperature(0.7).with_max_attempts(1)),
            Duration::from_secs(config.recommendation_timeout_secs),
        )),
        RecommendationBackend::Rules => Arc::new(RuleBasedRecommendationProvider),
    };
    info!(
        "Recommendation backend: {:?} (timeout {}s)",
        config.recommendation_backend, config.recommendation_timeout_secs
    );

    let ranking_engine = Arc::new(RankingEngine::new(
        Arc::new(PgRankingStore::new(db.clone())),
        recommender,
    ));

    // Build app state
    let state = AppState {
        db,
        extractor: Arc::new(llm),
        ranking_engine,
    };

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
