use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::non_negative_years;

/// Only `Analyzed` candidates are eligible for ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    Pending,
    Analyzed,
}

impl CandidateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStatus::Pending => "pending",
            CandidateStatus::Analyzed => "analyzed",
        }
    }

    /// Unknown or missing status values are treated as pending.
    pub fn from_db(value: Option<&str>) -> Self {
        match value {
            Some("analyzed") => CandidateStatus::Analyzed,
            _ => CandidateStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub years_of_experience: Option<i32>,
    pub education: Option<String>,
    pub summary: Option<String>,
    pub resume_filename: Option<String>,
    pub resume_url: Option<String>,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateSkillRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub skill_name: String,
    pub skill_category: Option<String>,
    pub proficiency_level: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkExperienceRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub company_name: String,
    pub position: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A parsed resume as seen by the ranking engine.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateProfile {
    pub id: Uuid,
    pub full_name: String,
    pub years_of_experience: Option<u32>,
    /// In extraction order.
    pub skills: Vec<String>,
    pub status: CandidateStatus,
}

impl CandidateProfile {
    pub fn from_row(row: &CandidateRow, skills: Vec<String>) -> Self {
        CandidateProfile {
            id: row.id,
            full_name: row.full_name.clone(),
            years_of_experience: non_negative_years(row.years_of_experience),
            skills,
            status: CandidateStatus::from_db(row.status.as_deref()),
        }
    }
}

/// Groups `(candidate_id, skill_name)` pairs, keeping per-candidate order.
pub fn group_skill_names(rows: Vec<(Uuid, String)>) -> HashMap<Uuid, Vec<String>> {
    let mut grouped: HashMap<Uuid, Vec<String>> = HashMap::new();
    for (candidate_id, skill_name) in rows {
        grouped.entry(candidate_id).or_default().push(skill_name);
    }
    grouped
}
