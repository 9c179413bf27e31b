//! Axum route handlers for the Ranking API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extractors::{AppJson, AppPath};
use crate::models::ranking::{RankedCandidateRow, RankingRecord};
use crate::ranking::engine::RankingOutcome;
use crate::state::AppState;

const NO_CANDIDATES_MESSAGE: &str = "No analyzed candidates found";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankRequest {
    pub job_requirement_id: Option<String>,
    #[serde(default)]
    pub candidate_ids: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub rankings: Vec<RankingRecord>,
    pub persistence_failures: Vec<Uuid>,
    /// Candidates whose recommendation fell back to the fixed text.
    pub recommendation_fallbacks: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct RankedCandidate {
    pub rank: usize,
    #[serde(flatten)]
    pub ranking: RankedCandidateRow,
}

#[derive(Debug, Serialize)]
pub struct JobRankingsResponse {
    pub job_requirement_id: Uuid,
    pub rankings: Vec<RankedCandidate>,
}

/// Validated form of [`RankRequest`].
#[derive(Debug, PartialEq)]
struct RankParams {
    job_requirement_id: Uuid,
    candidate_ids: Option<Vec<Uuid>>,
}

fn validate_rank_request(request: RankRequest) -> Result<RankParams, AppError> {
    let raw_id = request
        .job_requirement_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("Job requirement ID is required".to_string()))?;

    let job_requirement_id = Uuid::parse_str(raw_id).map_err(|_| {
        AppError::Validation(format!("Job requirement ID '{raw_id}' is not a valid UUID"))
    })?;

    let candidate_ids = request
        .candidate_ids
        .map(|ids| {
            ids.iter()
                .map(|id| {
                    Uuid::parse_str(id.trim()).map_err(|_| {
                        AppError::Validation(format!("Candidate ID '{id}' is not a valid UUID"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?;

    Ok(RankParams {
        job_requirement_id,
        candidate_ids,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/rankings
///
/// Runs the ranking engine for one job, optionally restricted to `candidateIds`.
/// An empty analyzed pool is a success with an informational message.
pub async fn handle_rank_candidates(
    State(state): State<AppState>,
    AppJson(request): AppJson<RankRequest>,
) -> Result<Json<RankResponse>, AppError> {
    let params = validate_rank_request(request)?;

    let outcome = state
        .ranking_engine
        .rank(params.job_requirement_id, params.candidate_ids.as_deref())
        .await?;

    let response = match outcome {
        RankingOutcome::NoEligibleCandidates => RankResponse {
            success: true,
            message: Some(NO_CANDIDATES_MESSAGE.to_string()),
            rankings: vec![],
            persistence_failures: vec![],
            recommendation_fallbacks: vec![],
        },
        RankingOutcome::Ranked(run) => RankResponse {
            success: true,
            message: None,
            rankings: run.records,
            persistence_failures: run.persistence_failures,
            recommendation_fallbacks: run.recommendation_fallbacks,
        },
    };

    Ok(Json(response))
}

/// GET /api/v1/jobs/:id/rankings
///
/// Persisted rankings for a job, best first.
pub async fn handle_list_job_rankings(
    State(state): State<AppState>,
    AppPath(job_id): AppPath<Uuid>,
) -> Result<Json<JobRankingsResponse>, AppError> {
    let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM job_requirements WHERE id = $1")
        .bind(job_id)
        .fetch_optional(&state.db)
        .await?;
    if exists.is_none() {
        return Err(AppError::NotFound(format!(
            "Job requirement {job_id} not found"
        )));
    }

    let rows = sqlx::query_as::<_, RankedCandidateRow>(
        r#"
        SELECT r.id, r.candidate_id, c.full_name, r.match_score,
               r.matched_skills, r.missing_skills, r.recommendation, r.created_at
        FROM candidate_rankings r
        JOIN candidates c ON c.id = r.candidate_id
        WHERE r.job_requirement_id = $1
        ORDER BY r.match_score DESC, c.full_name ASC
        "#,
    )
    .bind(job_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(JobRankingsResponse {
        job_requirement_id: job_id,
        rankings: assign_ranks(rows),
    }))
}

/// 1-based positions in the order given.
fn assign_ranks(rows: Vec<RankedCandidateRow>) -> Vec<RankedCandidate> {
    rows.into_iter()
        .enumerate()
        .map(|(i, ranking)| RankedCandidate {
            rank: i + 1,
            ranking,
        })
        .collect()
}
