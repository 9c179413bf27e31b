//! Ranking Engine — orchestrates one ranking run for a job requirement.
//!
//! Flow: resolve job → resolve analyzed pool → per candidate, sequentially:
//!       match skills → score → recommend (fallback on failure) → assemble record
//!       → upsert every record → return all records.
//!
//! Failures scoped to one candidate (recommendation) or one record (upsert) are
//! contained. Only failures that prevent reading the job or the pool abort a run.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::candidate::{CandidateProfile, CandidateStatus};
use crate::models::job::JobRequirement;
use crate::models::ranking::RankingRecord;
use crate::ranking::recommendation::{
    RecommendationContext, RecommendationProvider, FALLBACK_RECOMMENDATION,
};
use crate::ranking::score::score;
use crate::ranking::skills::match_skills;
use crate::ranking::store::{RankingStore, StoreError};

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("job requirement {0} not found")]
    JobNotFound(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub enum RankingOutcome {
    /// No analyzed candidates matched the filter. Not an error.
    NoEligibleCandidates,
    Ranked(RankingRun),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankingRun {
    /// Same order as the candidate pool.
    pub records: Vec<RankingRecord>,
    /// Candidates whose record could not be persisted.
    pub persistence_failures: Vec<Uuid>,
    /// Candidates that received the fallback recommendation.
    pub recommendation_fallbacks: Vec<Uuid>,
}

pub struct RankingEngine {
    store: Arc<dyn RankingStore>,
    recommender: Arc<dyn RecommendationProvider>,
}

impl RankingEngine {
    pub fn new(store: Arc<dyn RankingStore>, recommender: Arc<dyn RecommendationProvider>) -> Self {
        Self { store, recommender }
    }

    /// Ranks the analyzed pool (optionally filtered) against one job.
    /// An empty filter means no filter.
    pub async fn rank(
        &self,
        job_requirement_id: Uuid,
        candidate_ids: Option<&[Uuid]>,
    ) -> Result<RankingOutcome, RankingError> {
        let job = self
            .store
            .get_job_requirement(job_requirement_id)
            .await?
            .ok_or(RankingError::JobNotFound(job_requirement_id))?;

        let filter = candidate_ids.filter(|ids| !ids.is_empty());
        let mut candidates = self.store.list_analyzed_candidates(filter).await?;
        candidates.retain(|c| c.status == CandidateStatus::Analyzed);

        if candidates.is_empty() {
            info!("No analyzed candidates to rank for job {}", job.id);
            return Ok(RankingOutcome::NoEligibleCandidates);
        }

        info!(
            "Ranking {} candidates for job {} ({}, {})",
            candidates.len(),
            job.id,
            job.title,
            job.status
        );

        let mut records = Vec::with_capacity(candidates.len());
        let mut recommendation_fallbacks = Vec::new();

        for candidate in &candidates {
            let (record, used_fallback) = self.rank_candidate(&job, candidate).await;
            if used_fallback {
                recommendation_fallbacks.push(candidate.id);
            }
            records.push(record);
        }

        let mut persistence_failures = Vec::new();
        for record in &records {
            if let Err(e) = self.store.upsert_ranking(record).await {
                error!(
                    "Failed to upsert ranking for candidate {} / job {}: {e}",
                    record.candidate_id, record.job_requirement_id
                );
                persistence_failures.push(record.candidate_id);
            }
        }

        info!(
            "Ranking complete for job {}: {} records, {} persistence failures, {} fallbacks",
            job.id,
            records.len(),
            persistence_failures.len(),
            recommendation_fallbacks.len()
        );

        Ok(RankingOutcome::Ranked(RankingRun {
            records,
            persistence_failures,
            recommendation_fallbacks,
        }))
    }

    /// Returns the record and whether the fallback recommendation was used.
    async fn rank_candidate(
        &self,
        job: &JobRequirement,
        candidate: &CandidateProfile,
    ) -> (RankingRecord, bool) {
        let skill_match = match_skills(&candidate.skills, &job.required_skills);
        let match_score = score(candidate, job, &skill_match);

        let context = RecommendationContext {
            job,
            candidate,
            matched_skills: &skill_match.matched,
            missing_skills: &skill_match.missing,
            match_score,
        };

        let (recommendation, used_fallback) = match self.recommender.recommend(&context).await {
            Ok(text) => (text, false),
            Err(e) => {
                warn!(
                    "Recommendation failed for candidate {}, using fallback: {e}",
                    candidate.id
                );
                (FALLBACK_RECOMMENDATION.to_string(), true)
            }
        };

        let record = RankingRecord {
            candidate_id: candidate.id,
            job_requirement_id: job.id,
            match_score,
            matched_skills: skill_match.matched,
            missing_skills: skill_match.missing,
            recommendation,
        };
        (record, used_fallback)
    }
}
