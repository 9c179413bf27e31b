use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The outcome of matching one candidate against one job.
/// At most one exists per (candidate_id, job_requirement_id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRecord {
    pub candidate_id: Uuid,
    pub job_requirement_id: Uuid,
    /// 0 – 100
    pub match_score: u32,
    /// Candidate-side strings.
    pub matched_skills: Vec<String>,
    /// Job-side strings.
    pub missing_skills: Vec<String>,
    pub recommendation: String,
}

/// A persisted ranking joined with its candidate's name, for listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RankedCandidateRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub full_name: String,
    pub match_score: i32,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub recommendation: String,
    pub created_at: DateTime<Utc>,
}
