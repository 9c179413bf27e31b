//! Axum route handlers for candidates.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::candidates::extraction::{
    extract_profile, resume_text, ExtractedProfile, ExtractedWorkExperience,
};
use crate::errors::AppError;
use crate::models::candidate::{
    group_skill_names, CandidateRow, CandidateSkillRow, CandidateStatus, WorkExperienceRow,
};
use crate::state::AppState;

/// Multipart field carrying the resume file.
const RESUME_FIELD: &str = "resume";
/// Upload size limit, applied to the route in `routes`.
pub const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;
/// Name shown while a resume is being analyzed.
const PLACEHOLDER_NAME: &str = "Processing...";

#[derive(Debug, Serialize)]
pub struct CandidateDetailResponse {
    pub candidate: CandidateRow,
    pub skills: Vec<CandidateSkillRow>,
    pub work_experiences: Vec<WorkExperienceRow>,
}

#[derive(Debug, Serialize)]
pub struct CandidateSummary {
    #[serde(flatten)]
    pub candidate: CandidateRow,
    pub skills: Vec<String>,
}

struct ResumeUpload {
    file_name: String,
    content_type: Option<String>,
    data: Bytes,
}

async fn read_resume_field(multipart: &mut Multipart) -> Result<ResumeUpload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("resume").to_string();
        let content_type = field.content_type().map(String::from);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read resume upload: {e}")))?;
        return Ok(ResumeUpload {
            file_name,
            content_type,
            data,
        });
    }
    Err(AppError::Validation(format!(
        "Multipart field '{RESUME_FIELD}' is required"
    )))
}

/// POST /api/v1/candidates
///
/// Creates a pending candidate from an uploaded resume, extracts a profile with
/// the AI gateway, and marks the candidate analyzed. If extraction fails the
/// candidate stays pending.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<CandidateDetailResponse>), AppError> {
    let mut multipart = multipart?;
    let upload = read_resume_field(&mut multipart).await?;

    let text = resume_text(
        &upload.file_name,
        upload.content_type.as_deref(),
        upload.data,
    )
    .await
    .map_err(|e| AppError::Validation(e.to_string()))?;

    let candidate_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO candidates (full_name, status, resume_filename)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(PLACEHOLDER_NAME)
    .bind(CandidateStatus::Pending.as_str())
    .bind(&upload.file_name)
    .fetch_one(&state.db)
    .await?;

    info!(
        "Analyzing resume '{}' for candidate {candidate_id}",
        upload.file_name
    );

    let profile = extract_profile(state.extractor.as_ref(), &text)
        .await
        .map_err(|e| AppError::Llm(format!("Resume analysis failed for {candidate_id}: {e}")))?;

    apply_profile(&state.db, candidate_id, &profile).await?;
    info!("Analysis complete for candidate {candidate_id}");

    let detail = load_candidate_detail(&state.db, candidate_id).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/v1/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
) -> Result<Json<Vec<CandidateSummary>>, AppError> {
    let candidates =
        sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await?;

    let skill_rows: Vec<(Uuid, String)> = sqlx::query_as(
        "SELECT candidate_id, skill_name FROM candidate_skills ORDER BY created_at, id",
    )
    .fetch_all(&state.db)
    .await?;
    let mut skills = group_skill_names(skill_rows);

    Ok(Json(
        candidates
            .into_iter()
            .map(|candidate| CandidateSummary {
                skills: skills.remove(&candidate.id).unwrap_or_default(),
                candidate,
            })
            .collect(),
    ))
}

/// One write made while applying an extracted profile.
#[derive(Debug, PartialEq)]
enum ProfileWrite<'a> {
    Skill {
        name: String,
        category: String,
        proficiency: String,
    },
    WorkExperience(&'a ExtractedWorkExperience),
    /// Profile fields plus `status = analyzed`. Always last, so a concurrent
    /// ranking run never sees an analyzed candidate without its skills.
    MarkAnalyzed,
}

fn profile_writes(profile: &ExtractedProfile) -> Vec<ProfileWrite<'_>> {
    let mut writes: Vec<ProfileWrite<'_>> = profile
        .normalized_skills()
        .into_iter()
        .map(|(name, category, proficiency)| ProfileWrite::Skill {
            name,
            category,
            proficiency,
        })
        .collect();
    writes.extend(
        profile
            .valid_work_experiences()
            .map(ProfileWrite::WorkExperience),
    );
    writes.push(ProfileWrite::MarkAnalyzed);
    writes
}

/// Writes an extracted profile onto a candidate and marks it analyzed.
/// Skill and work-experience inserts are best-effort: failures are logged only.
async fn apply_profile(
    pool: &PgPool,
    candidate_id: Uuid,
    profile: &ExtractedProfile,
) -> Result<(), AppError> {
    for write in profile_writes(profile) {
        match write {
            ProfileWrite::Skill {
                name,
                category,
                proficiency,
            } => {
                let inserted = sqlx::query(
                    r#"
                    INSERT INTO candidate_skills
                        (candidate_id, skill_name, skill_category, proficiency_level)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(candidate_id)
                .bind(&name)
                .bind(&category)
                .bind(&proficiency)
                .execute(pool)
                .await;
                if let Err(e) = inserted {
                    error!("Failed to insert skill '{name}' for candidate {candidate_id}: {e}");
                }
            }
            ProfileWrite::WorkExperience(experience) => {
                let inserted = sqlx::query(
                    r#"
                    INSERT INTO work_experiences
                        (candidate_id, company_name, position, start_date, end_date, description)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(candidate_id)
                .bind(experience.company_name.trim())
                .bind(experience.position.trim())
                .bind(&experience.start_date)
                .bind(&experience.end_date)
                .bind(&experience.description)
                .execute(pool)
                .await;
                if let Err(e) = inserted {
                    error!(
                        "Failed to insert work experience at '{}' for candidate {candidate_id}: {e}",
                        experience.company_name
                    );
                }
            }
            ProfileWrite::MarkAnalyzed => {
                sqlx::query(
                    r#"
                    UPDATE candidates SET
                        full_name = $2, email = $3, phone = $4, location = $5,
                        years_of_experience = $6, education = $7, summary = $8,
                        status = $9, updated_at = now()
                    WHERE id = $1
                    "#,
                )
                .bind(candidate_id)
                .bind(profile.display_name())
                .bind(&profile.email)
                .bind(&profile.phone)
                .bind(&profile.location)
                .bind(profile.whole_years())
                .bind(&profile.education)
                .bind(&profile.summary)
                .bind(CandidateStatus::Analyzed.as_str())
                .execute(pool)
                .await?;
            }
        }
    }

    Ok(())
}

async fn load_candidate_detail(
    pool: &PgPool,
    candidate_id: Uuid,
) -> Result<CandidateDetailResponse, AppError> {
    let candidate = sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE id = $1")
        .bind(candidate_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;

    let skills = sqlx::query_as::<_, CandidateSkillRow>(
        "SELECT * FROM candidate_skills WHERE candidate_id = $1 ORDER BY created_at, id",
    )
    .bind(candidate_id)
    .fetch_all(pool)
    .await?;

    let work_experiences = sqlx::query_as::<_, WorkExperienceRow>(
        "SELECT * FROM work_experiences WHERE candidate_id = $1 ORDER BY created_at, id",
    )
    .bind(candidate_id)
    .fetch_all(pool)
    .await?;

    Ok(CandidateDetailResponse {
        candidate,
        skills,
        work_experiences,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> ExtractedProfile {
        serde_json::from_str(
            r#"{
                "full_name": "Samir Haddad",
                "skills": [
                    {"skill_name": "Rust"},
                    {"skill_name": "  "},
                    {"skill_name": "SQL", "skill_category": "Technical"}
                ],
                "work_experiences": [
                    {"company_name": "Careem", "position": "Engineer"},
                    {"company_name": "", "position": "Intern"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_candidate_is_marked_analyzed_after_skills_are_written() {
        let profile = profile();
        let writes = profile_writes(&profile);

        assert_eq!(writes.len(), 4);
        assert_eq!(writes.last(), Some(&ProfileWrite::MarkAnalyzed));
        assert!(matches!(&writes[0], ProfileWrite::Skill { name, .. } if name == "Rust"));
        assert!(matches!(&writes[1], ProfileWrite::Skill { name, .. } if name == "SQL"));
        assert!(matches!(writes[2], ProfileWrite::WorkExperience(_)));
    }

    #[test]
    fn test_empty_profile_still_marks_analyzed() {
        let profile = ExtractedProfile::default();
        assert_eq!(profile_writes(&profile), vec![ProfileWrite::MarkAnalyzed]);
    }
}
