//! Resume extraction — uploaded bytes → plain text → structured profile.

use bytes::Bytes;
use serde::Deserialize;
use thiserror::Error;

use crate::candidates::prompts::{RESUME_PARSE_PROMPT_TEMPLATE, RESUME_PARSE_SYSTEM};
use crate::llm_client::prompts::{fill_template, JSON_ONLY_SYSTEM};
use crate::llm_client::{generate_json, LlmError, TextGenerator};

/// Longer resumes are cut to this many characters before the AI call.
const MAX_RESUME_CHARS: usize = 20_000;

pub const DEFAULT_SKILL_CATEGORY: &str = "Other";
pub const DEFAULT_PROFICIENCY: &str = "Intermediate";
pub const UNKNOWN_NAME: &str = "Unknown";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("resume upload is empty")]
    EmptyUpload,

    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("resume is not valid UTF-8 text")]
    NotText,

    #[error("no text found in resume")]
    NoText,

    #[error("profile extraction failed: {0}")]
    Llm(#[from] LlmError),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractedSkill {
    #[serde(default)]
    pub skill_name: String,
    pub skill_category: Option<String>,
    pub proficiency_level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExtractedWorkExperience {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub position: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

/// What the model returns for one resume.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractedProfile {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    /// Models occasionally answer with fractions ("3.5").
    pub years_of_experience: Option<f64>,
    pub education: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub skills: Vec<ExtractedSkill>,
    #[serde(default)]
    pub work_experiences: Vec<ExtractedWorkExperience>,
}

impl ExtractedProfile {
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(UNKNOWN_NAME)
    }

    /// Whole years, negatives treated as unknown.
    pub fn whole_years(&self) -> Option<i32> {
        self.years_of_experience
            .filter(|y| y.is_finite() && *y >= 0.0)
            .map(|y| y.round() as i32)
    }

    /// Skills with a non-blank name, trimmed, category and proficiency defaulted.
    pub fn normalized_skills(&self) -> Vec<(String, String, String)> {
        self.skills
            .iter()
            .filter(|s| !s.skill_name.trim().is_empty())
            .map(|s| {
                (
                    s.skill_name.trim().to_string(),
                    non_blank(s.skill_category.as_deref())
                        .unwrap_or(DEFAULT_SKILL_CATEGORY)
                        .to_string(),
                    non_blank(s.proficiency_level.as_deref())
                        .unwrap_or(DEFAULT_PROFICIENCY)
                        .to_string(),
                )
            })
            .collect()
    }

    /// Experiences with both company and position present.
    pub fn valid_work_experiences(&self) -> impl Iterator<Item = &ExtractedWorkExperience> {
        self.work_experiences
            .iter()
            .filter(|w| !w.company_name.trim().is_empty() && !w.position.trim().is_empty())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn looks_like_pdf(file_name: &str, content_type: Option<&str>, bytes: &[u8]) -> bool {
    content_type == Some("application/pdf")
        || file_name.to_ascii_lowercase().ends_with(".pdf")
        || bytes.starts_with(b"%PDF")
}

/// Parses a PDF on the blocking pool. A parser panic surfaces as `Pdf`.
async fn pdf_text(bytes: Bytes) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| ExtractionError::Pdf(format!("PDF parser aborted: {e}")))?
    .map_err(ExtractionError::Pdf)
}

/// Turns an uploaded resume into plain text. PDFs go through `pdf-extract`;
/// anything else must be UTF-8.
pub async fn resume_text(
    file_name: &str,
    content_type: Option<&str>,
    bytes: Bytes,
) -> Result<String, ExtractionError> {
    if bytes.is_empty() {
        return Err(ExtractionError::EmptyUpload);
    }

    let text = if looks_like_pdf(file_name, content_type, &bytes) {
        pdf_text(bytes).await?
    } else {
        String::from_utf8(bytes.to_vec()).map_err(|_| ExtractionError::NotText)?
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(ExtractionError::NoText);
    }
    Ok(text.chars().take(MAX_RESUME_CHARS).collect())
}

/// Asks the model for a structured profile of `resume_text`.
pub async fn extract_profile(
    generator: &dyn TextGenerator,
    resume_text: &str,
) -> Result<ExtractedProfile, ExtractionError> {
    let system = format!("{RESUME_PARSE_SYSTEM}\n{JSON_ONLY_SYSTEM}");
    let prompt = fill_template(RESUME_PARSE_PROMPT_TEMPLATE, &[("resume_text", resume_text)]);
    Ok(generate_json::<ExtractedProfile>(generator, &system, &prompt).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGenerator;

    const PROFILE_JSON: &str = r#"```json
{
  "full_name": "Huda Mansour",
  "email": "huda@example.com",
  "phone": null,
  "location": "Amman",
  "years_of_experience": 4.6,
  "education": "BSc Computer Science",
  "summary": "Backend developer",
  "skills": [
    {"skill_name": " Python ", "skill_category": "Technical", "proficiency_level": "Advanced"},
    {"skill_name": "Teamwork", "skill_category": "", "proficiency_level": null},
    {"skill_name": "   "}
  ],
  "work_experiences": [
    {"company_name": "Aramex", "position": "Developer", "start_date": "2020-01", "end_date": "Present", "description": "APIs"},
    {"company_name": "", "position": "Intern"}
  ]
}
```"#;

    #[tokio::test]
    async fn test_extract_profile_parses_fenced_json() {
        let generator = ScriptedGenerator::text(PROFILE_JSON);
        let profile = extract_profile(&generator, "resume text").await.unwrap();

        assert_eq!(profile.display_name(), "Huda Mansour");
        assert_eq!(profile.whole_years(), Some(5));
        assert_eq!(
            profile.normalized_skills(),
            vec![
                (
                    "Python".to_string(),
                    "Technical".to_string(),
                    "Advanced".to_string()
                ),
                (
                    "Teamwork".to_string(),
                    DEFAULT_SKILL_CATEGORY.to_string(),
                    DEFAULT_PROFICIENCY.to_string()
                ),
            ]
        );
        assert_eq!(profile.valid_work_experiences().count(), 1);
    }

    #[tokio::test]
    async fn test_extract_profile_surfaces_malformed_output() {
        let generator = ScriptedGenerator::text("Sorry, I cannot read this file.");
        let result = extract_profile(&generator, "resume text").await;
        assert!(matches!(
            result,
            Err(ExtractionError::Llm(LlmError::Parse(_)))
        ));
    }

    #[test]
    fn test_missing_name_defaults_to_unknown() {
        let profile: ExtractedProfile = serde_json::from_str(r#"{"full_name": "  "}"#).unwrap();
        assert_eq!(profile.display_name(), UNKNOWN_NAME);
        assert!(profile.skills.is_empty());
        assert_eq!(profile.whole_years(), None);
    }

    #[test]
    fn test_negative_years_are_unknown() {
        let profile: ExtractedProfile =
            serde_json::from_str(r#"{"years_of_experience": -3}"#).unwrap();
        assert_eq!(profile.whole_years(), None);
    }

    #[tokio::test]
    async fn test_resume_text_reads_plain_text() {
        let text = resume_text(
            "cv.txt",
            Some("text/plain"),
            Bytes::from_static(b"  Jane Doe\nRust, SQL  "),
        )
        .await
        .unwrap();
        assert_eq!(text, "Jane Doe\nRust, SQL");
    }

    #[tokio::test]
    async fn test_resume_text_rejects_empty_and_binary() {
        assert!(matches!(
            resume_text("cv.txt", None, Bytes::new()).await,
            Err(ExtractionError::EmptyUpload)
        ));
        assert!(matches!(
            resume_text("cv.txt", None, Bytes::from_static(b"   \n ")).await,
            Err(ExtractionError::NoText)
        ));
        assert!(matches!(
            resume_text("cv.bin", None, Bytes::from_static(&[0xff, 0xfe, 0xfd])).await,
            Err(ExtractionError::NotText)
        ));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_a_pdf_error() {
        let result = resume_text(
            "cv.pdf",
            Some("application/pdf"),
            Bytes::from_static(b"%PDF-1.7\nthis is not a real document"),
        )
        .await;
        assert!(matches!(result, Err(ExtractionError::Pdf(_))));
    }

    #[test]
    fn test_pdf_detection() {
        assert!(looks_like_pdf("CV.PDF", None, b"anything"));
        assert!(looks_like_pdf("cv", Some("application/pdf"), b"anything"));
        assert!(looks_like_pdf("cv", None, b"%PDF-1.7"));
        assert!(!looks_like_pdf("cv.txt", Some("text/plain"), b"hello"));
    }
}
