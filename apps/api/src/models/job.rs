use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::non_negative_years;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRequirementRow {
    pub id: Uuid,
    pub job_title: String,
    pub description: Option<String>,
    pub required_skills: Vec<String>,
    pub required_experience_years: Option<i32>,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A posted role as seen by the ranking engine. Read-only for a ranking run.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRequirement {
    pub id: Uuid,
    pub title: String,
    /// Case-preserved; compared case-insensitively.
    pub required_skills: Vec<String>,
    pub required_experience_years: Option<u32>,
    pub status: String,
}

impl From<JobRequirementRow> for JobRequirement {
    fn from(row: JobRequirementRow) -> Self {
        JobRequirement {
            id: row.id,
            title: row.job_title,
            required_skills: row.required_skills,
            required_experience_years: non_negative_years(row.required_experience_years),
            status: row.status.unwrap_or_else(|| "active".to_string()),
        }
    }
}
