//! Store boundary for ranking runs: read a job, read the analyzed pool,
//! upsert one ranking keyed by (candidate_id, job_requirement_id).

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::candidate::{
    group_skill_names, CandidateProfile, CandidateRow, CandidateStatus,
};
use crate::models::job::{JobRequirement, JobRequirementRow};
use crate::models::ranking::RankingRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait RankingStore: Send + Sync {
    async fn get_job_requirement(&self, id: Uuid) -> Result<Option<JobRequirement>, StoreError>;

    /// Analyzed candidates, optionally restricted to `id_filter`. Ids outside the
    /// analyzed pool are silently dropped; repeated ids yield one candidate.
    async fn list_analyzed_candidates(
        &self,
        id_filter: Option<&[Uuid]>,
    ) -> Result<Vec<CandidateProfile>, StoreError>;

    /// Insert, or overwrite the existing record for the same pair.
    async fn upsert_ranking(&self, record: &RankingRecord) -> Result<(), StoreError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PgRankingStore {
    pool: PgPool,
}

impl PgRankingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RankingStore for PgRankingStore {
    async fn get_job_requirement(&self, id: Uuid) -> Result<Option<JobRequirement>, StoreError> {
        if self.pool.is_closed() {
            return Err(StoreError::Unavailable(
                "connection pool is closed".to_string(),
            ));
        }
        let row = sqlx::query_as::<_, JobRequirementRow>(
            "SELECT * FROM job_requirements WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(JobRequirement::from))
    }

    async fn list_analyzed_candidates(
        &self,
        id_filter: Option<&[Uuid]>,
    ) -> Result<Vec<CandidateProfile>, StoreError> {
        let rows = match id_filter {
            Some(ids) => {
                sqlx::query_as::<_, CandidateRow>(
                    r#"
                    SELECT * FROM candidates
                    WHERE status = $1 AND id = ANY($2)
                    ORDER BY created_at, id
                    "#,
                )
                .bind(CandidateStatus::Analyzed.as_str())
                .bind(ids)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, CandidateRow>(
                    "SELECT * FROM candidates WHERE status = $1 ORDER BY created_at, id",
                )
                .bind(CandidateStatus::Analyzed.as_str())
                .fetch_all(&self.pool)
                .await?
            }
        };

        if rows.is_empty() {
            return Ok(vec![]);
        }

        let candidate_ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let skill_rows: Vec<(Uuid, String)> = sqlx::query_as(
            r#"
            SELECT candidate_id, skill_name FROM candidate_skills
            WHERE candidate_id = ANY($1)
            ORDER BY created_at, id
            "#,
        )
        .bind(&candidate_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut skills_by_candidate = group_skill_names(skill_rows);

        Ok(rows
            .iter()
            .map(|row| {
                let skills = skills_by_candidate.remove(&row.id).unwrap_or_default();
                CandidateProfile::from_row(row, skills)
            })
            .collect())
    }

    async fn upsert_ranking(&self, record: &RankingRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO candidate_rankings
                (candidate_id, job_requirement_id, match_score,
                 matched_skills, missing_skills, recommendation)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (candidate_id, job_requirement_id) DO UPDATE SET
                match_score = EXCLUDED.match_score,
                matched_skills = EXCLUDED.matched_skills,
                missing_skills = EXCLUDED.missing_skills,
                recommendation = EXCLUDED.recommendation,
                created_at = now()
            "#,
        )
        .bind(record.candidate_id)
        .bind(record.job_requirement_id)
        .bind(record.match_score as i32)
        .bind(&record.matched_skills)
        .bind(&record.missing_skills)
        .bind(&record.recommendation)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory store for engine and router tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub mod memory {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::RwLock;

    #[derive(Default)]
    pub struct MemoryRankingStore {
        jobs: RwLock<Vec<JobRequirement>>,
        candidates: RwLock<Vec<CandidateProfile>>,
        rankings: RwLock<HashMap<(Uuid, Uuid), RankingRecord>>,
        /// Candidates whose upserts fail.
        failing_upserts: RwLock<HashSet<Uuid>>,
        unavailable: RwLock<bool>,
    }

    fn poisoned<T>(_: T) -> StoreError {
        StoreError::Unavailable("lock poisoned".to_string())
    }

    impl MemoryRankingStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_job(&self, job: JobRequirement) {
            self.jobs.write().unwrap().push(job);
        }

        pub fn add_candidate(&self, candidate: CandidateProfile) {
            self.candidates.write().unwrap().push(candidate);
        }

        pub fn fail_upserts_for(&self, candidate_id: Uuid) {
            self.failing_upserts.write().unwrap().insert(candidate_id);
        }

        pub fn set_unavailable(&self) {
            *self.unavailable.write().unwrap() = true;
        }

        pub fn rankings(&self) -> Vec<RankingRecord> {
            self.rankings.read().unwrap().values().cloned().collect()
        }

        fn check_available(&self) -> Result<(), StoreError> {
            if *self.unavailable.read().map_err(poisoned)? {
                return Err(StoreError::Unavailable("memory store offline".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl RankingStore for MemoryRankingStore {
        async fn get_job_requirement(
            &self,
            id: Uuid,
        ) -> Result<Option<JobRequirement>, StoreError> {
            self.check_available()?;
            let jobs = self.jobs.read().map_err(poisoned)?;
            Ok(jobs.iter().find(|j| j.id == id).cloned())
        }

        async fn list_analyzed_candidates(
            &self,
            id_filter: Option<&[Uuid]>,
        ) -> Result<Vec<CandidateProfile>, StoreError> {
            self.check_available()?;
            let candidates = self.candidates.read().map_err(poisoned)?;
            Ok(candidates
                .iter()
                .filter(|c| c.status == CandidateStatus::Analyzed)
                .filter(|c| id_filter.map_or(true, |ids| ids.contains(&c.id)))
                .cloned()
                .collect())
        }

        async fn upsert_ranking(&self, record: &RankingRecord) -> Result<(), StoreError> {
            if self
                .failing_upserts
                .read()
                .map_err(poisoned)?
                .contains(&record.candidate_id)
            {
                return Err(StoreError::Unavailable(format!(
                    "upsert rejected for candidate {}",
                    record.candidate_id
                )));
            }
            self.rankings.write().map_err(poisoned)?.insert(
                (record.candidate_id, record.job_requirement_id),
                record.clone(),
            );
            Ok(())
        }
    }
}
