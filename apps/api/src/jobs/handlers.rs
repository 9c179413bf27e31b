//! Axum route handlers for job requirements.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extractors::{AppJson, AppPath};
use crate::models::job::JobRequirementRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub job_title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    pub required_experience_years: Option<i32>,
}

/// A job request after trimming and validation.
#[derive(Debug, PartialEq)]
struct NewJob {
    job_title: String,
    description: Option<String>,
    required_skills: Vec<String>,
    required_experience_years: Option<i32>,
}

fn validate_new_job(request: CreateJobRequest) -> Result<NewJob, AppError> {
    let job_title = request.job_title.trim().to_string();
    if job_title.is_empty() {
        return Err(AppError::Validation("job_title cannot be empty".to_string()));
    }

    let required_skills: Vec<String> = request
        .required_skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if required_skills.is_empty() {
        return Err(AppError::Validation(
            "required_skills must contain at least one skill".to_string(),
        ));
    }

    if matches!(request.required_experience_years, Some(y) if y < 0) {
        return Err(AppError::Validation(
            "required_experience_years cannot be negative".to_string(),
        ));
    }

    let description = request
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    Ok(NewJob {
        job_title,
        description,
        required_skills,
        required_experience_years: request.required_experience_years,
    })
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobRequirementRow>), AppError> {
    let job = validate_new_job(request)?;

    let row = sqlx::query_as::<_, JobRequirementRow>(
        r#"
        INSERT INTO job_requirements
            (job_title, description, required_skills, required_experience_years, status)
        VALUES ($1, $2, $3, $4, 'active')
        RETURNING *
        "#,
    )
    .bind(&job.job_title)
    .bind(&job.description)
    .bind(&job.required_skills)
    .bind(job.required_experience_years)
    .fetch_one(&state.db)
    .await?;

    info!("Created job requirement {} ({})", row.id, row.job_title);
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobRequirementRow>>, AppError> {
    let jobs = sqlx::query_as::<_, JobRequirementRow>(
        "SELECT * FROM job_requirements ORDER BY created_at DESC",
    )
    .fetch_all(&state.db)
    .await?;
    Ok(Json(jobs))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    AppPath(job_id): AppPath<Uuid>,
) -> Result<Json<JobRequirementRow>, AppError> {
    let job = sqlx::query_as::<_, JobRequirementRow>(
        "SELECT * FROM job_requirements WHERE id = $1",
    )
    .bind(job_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Job requirement {job_id} not found")))?;
    Ok(Json(job))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str, skills: &[&str], years: Option<i32>) -> CreateJobRequest {
        CreateJobRequest {
            job_title: title.to_string(),
            description: Some("  ".to_string()),
            required_skills: skills.iter().map(|s| s.to_string()).collect(),
            required_experience_years: years,
        }
    }

    #[test]
    fn test_trims_and_drops_blank_skills() {
        let job = validate_new_job(request(
            "  Data Analyst ",
            &[" SQL ", "", "  ", "Power BI"],
            Some(2),
        ))
        .unwrap();
        assert_eq!(job.job_title, "Data Analyst");
        assert_eq!(job.required_skills, vec!["SQL", "Power BI"]);
        assert_eq!(job.description, None);
        assert_eq!(job.required_experience_years, Some(2));
    }

    #[test]
    fn test_blank_title_is_rejected() {
        assert!(matches!(
            validate_new_job(request("  ", &["SQL"], None)),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_requires_at_least_one_skill() {
        assert!(matches!(
            validate_new_job(request("Analyst", &[" "], None)),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_negative_years_rejected() {
        assert!(matches!(
            validate_new_job(request("Analyst", &["SQL"], Some(-1))),
            Err(AppError::Validation(_))
        ));
    }
}
