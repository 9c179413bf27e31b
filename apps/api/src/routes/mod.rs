pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::candidates::handlers::{self as candidates, MAX_RESUME_BYTES};
use crate::jobs::handlers as jobs;
use crate::ranking::handlers as ranking;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Job requirements
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route("/api/v1/jobs/:id", get(jobs::handle_get_job))
        .route(
            "/api/v1/jobs/:id/rankings",
            get(ranking::handle_list_job_rankings),
        )
        // Candidates
        .route(
            "/api/v1/candidates",
            get(candidates::handle_list_candidates).post(candidates::handle_upload_resume),
        )
        .layer(DefaultBodyLimit::max(MAX_RESUME_BYTES))
        // Ranking runs
        .route("/api/v1/rankings", post(ranking::handle_rank_candidates))
        .with_state(state)
}
