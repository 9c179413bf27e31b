use std::sync::Arc;

use sqlx::PgPool;

use crate::llm_client::TextGenerator;
use crate::ranking::engine::RankingEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Resume → profile extraction. Default: the gateway `LlmClient` with retries.
    pub extractor: Arc<dyn TextGenerator>,
    /// Owns the ranking store and the recommendation provider.
    pub ranking_engine: Arc<RankingEngine>,
}
