//! Recommendation text — pluggable, trait-based, best-effort.
//!
//! `LlmRecommendationProvider` asks the AI gateway for a short justification.
//! `RuleBasedRecommendationProvider` derives one from the score band and gaps.
//! The engine substitutes [`FALLBACK_RECOMMENDATION`] whenever a provider fails.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::llm_client::prompts::{fill_template, NOT_SPECIFIED};
use crate::llm_client::{LlmError, TextGenerator};
use crate::models::candidate::CandidateProfile;
use crate::models::job::JobRequirement;
use crate::ranking::prompts::{RECOMMENDATION_PROMPT_TEMPLATE, RECOMMENDATION_SYSTEM};

/// Used in place of a recommendation whenever generation fails.
pub const FALLBACK_RECOMMENDATION: &str = "Please review this candidate's profile carefully.";

#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error("text generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("recommendation timed out after {0:?}")]
    Timeout(Duration),

    #[error("recommendation was empty")]
    Empty,
}

/// Everything a provider may look at for one candidate.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationContext<'a> {
    pub job: &'a JobRequirement,
    pub candidate: &'a CandidateProfile,
    pub matched_skills: &'a [String],
    pub missing_skills: &'a [String],
    pub match_score: u32,
}

/// Held by the ranking engine as `Arc<dyn RecommendationProvider>`.
#[async_trait]
pub trait RecommendationProvider: Send + Sync {
    async fn recommend(
        &self,
        context: &RecommendationContext<'_>,
    ) -> Result<String, RecommendationError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmRecommendationProvider
// ────────────────────────────────────────────────────────────────────────────

/// One gateway call per candidate, no retry, bounded by `timeout`.
pub struct LlmRecommendationProvider {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl LlmRecommendationProvider {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }
}

#[async_trait]
impl RecommendationProvider for LlmRecommendationProvider {
    async fn recommend(
        &self,
        context: &RecommendationContext<'_>,
    ) -> Result<String, RecommendationError> {
        let prompt = build_prompt(context);
        let text = tokio::time::timeout(
            self.timeout,
            self.generator.generate(RECOMMENDATION_SYSTEM, &prompt),
        )
        .await
        .map_err(|_| RecommendationError::Timeout(self.timeout))??;

        let text = text.trim();
        if text.is_empty() {
            return Err(RecommendationError::Empty);
        }
        Ok(text.to_string())
    }
}

fn years_or_not_specified(years: Option<u32>) -> String {
    years
        .map(|y| y.to_string())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

fn build_prompt(context: &RecommendationContext<'_>) -> String {
    let job = context.job;
    let candidate = context.candidate;
    let required_skills = job.required_skills.join(", ");
    let required_experience = years_or_not_specified(job.required_experience_years);
    let candidate_skills = candidate.skills.join(", ");
    let candidate_experience = years_or_not_specified(candidate.years_of_experience);
    let matched_skills = context.matched_skills.join(", ");
    let missing_skills = context.missing_skills.join(", ");

    fill_template(
        RECOMMENDATION_PROMPT_TEMPLATE,
        &[
            ("job_title", job.title.as_str()),
            ("required_skills", required_skills.as_str()),
            ("required_experience", required_experience.as_str()),
            ("candidate_name", candidate.full_name.as_str()),
            ("candidate_skills", candidate_skills.as_str()),
            ("candidate_experience", candidate_experience.as_str()),
            ("matched_skills", matched_skills.as_str()),
            ("missing_skills", missing_skills.as_str()),
        ],
    )
}

// ────────────────────────────────────────────────────────────────────────────
// RuleBasedRecommendationProvider
// ────────────────────────────────────────────────────────────────────────────

/// Deterministic, no network. Selected with `RECOMMENDATION_PROVIDER=rules`.
pub struct RuleBasedRecommendationProvider;

#[async_trait]
impl RecommendationProvider for RuleBasedRecommendationProvider {
    async fn recommend(
        &self,
        context: &RecommendationContext<'_>,
    ) -> Result<String, RecommendationError> {
        Ok(build_rule_recommendation(
            &context.candidate.full_name,
            context.match_score,
            context.missing_skills,
        ))
    }
}

fn build_rule_recommendation(name: &str, score: u32, missing: &[String]) -> String {
    let top_gaps: Vec<&str> = missing.iter().take(3).map(String::as_str).collect();

    if score >= 80 {
        format!("Strong match ({score}/100). {name} covers the key requirements; proceed to interview.")
    } else if score >= 60 {
        if top_gaps.is_empty() {
            format!("Moderate match ({score}/100). Verify {name}'s experience level in a screening call.")
        } else {
            format!(
                "Moderate match ({score}/100). Probe {name} on: {}.",
                top_gaps.join(", ")
            )
        }
    } else if top_gaps.is_empty() {
        format!("Weak match ({score}/100). {name}'s experience is far from the target; consider other roles.")
    } else {
        format!(
            "Weak match ({score}/100). Significant gaps: {}.",
            top_gaps.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGenerator;
    use crate::models::candidate::CandidateStatus;
    use uuid::Uuid;

    fn job() -> JobRequirement {
        JobRequirement {
            id: Uuid::new_v4(),
            title: "Backend Engineer".to_string(),
            required_skills: vec!["Rust".to_string(), "Kafka".to_string()],
            required_experience_years: None,
            status: "active".to_string(),
        }
    }

    fn candidate() -> CandidateProfile {
        CandidateProfile {
            id: Uuid::new_v4(),
            full_name: "Nour Khalil".to_string(),
            years_of_experience: Some(4),
            skills: vec!["Rust".to_string(), "Go".to_string()],
            status: CandidateStatus::Analyzed,
        }
    }

    struct SlowGenerator;

    #[async_trait]
    impl TextGenerator for SlowGenerator {
        async fn generate(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("too late".to_string())
        }
    }

    #[test]
    fn test_prompt_includes_match_details() {
        let job = job();
        let candidate = candidate();
        let matched = vec!["Rust".to_string()];
        let missing = vec!["Kafka".to_string()];
        let prompt = build_prompt(&RecommendationContext {
            job: &job,
            candidate: &candidate,
            matched_skills: &matched,
            missing_skills: &missing,
            match_score: 70,
        });
        assert!(prompt.contains("Job: Backend Engineer"));
        assert!(prompt.contains("Required Experience: Not specified years"));
        assert!(prompt.contains("Experience: 4 years"));
        assert!(prompt.contains("Matched Skills: Rust"));
        assert!(prompt.contains("Missing Skills: Kafka"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_prompt_keeps_braces_in_job_data_literal() {
        let mut job = job();
        job.title = "Platform {candidate_name} Engineer".to_string();
        job.required_experience_years = Some(0);
        let candidate = candidate();
        let prompt = build_prompt(&RecommendationContext {
            job: &job,
            candidate: &candidate,
            matched_skills: &[],
            missing_skills: &[],
            match_score: 40,
        });
        assert!(prompt.contains("Job: Platform {candidate_name} Engineer"));
        assert!(prompt.contains("Candidate: Nour Khalil"));
        assert!(prompt.contains("Required Experience: 0 years"));
    }

    #[tokio::test]
    async fn test_llm_provider_rejects_blank_text() {
        let provider = LlmRecommendationProvider::new(
            Arc::new(ScriptedGenerator::text("   \n ")),
            Duration::from_secs(5),
        );
        let (job, candidate) = (job(), candidate());
        let result = provider
            .recommend(&RecommendationContext {
                job: &job,
                candidate: &candidate,
                matched_skills: &[],
                missing_skills: &[],
                match_score: 50,
            })
            .await;
        assert!(matches!(result, Err(RecommendationError::Empty)));
    }

    #[tokio::test]
    async fn test_llm_provider_returns_trimmed_text() {
        let provider = LlmRecommendationProvider::new(
            Arc::new(ScriptedGenerator::text("  Interview this candidate.  \n")),
            Duration::from_secs(5),
        );
        let (job, candidate) = (job(), candidate());
        let text = provider
            .recommend(&RecommendationContext {
                job: &job,
                candidate: &candidate,
                matched_skills: &[],
                missing_skills: &[],
                match_score: 50,
            })
            .await
            .unwrap();
        assert_eq!(text, "Interview this candidate.");
    }

    #[tokio::test]
    async fn test_llm_provider_propagates_generation_failure() {
        let provider = LlmRecommendationProvider::new(
            Arc::new(ScriptedGenerator::new(vec![Err(LlmError::Api {
                status: 402,
                message: "payment required".to_string(),
            })])),
            Duration::from_secs(5),
        );
        let (job, candidate) = (job(), candidate());
        let result = provider
            .recommend(&RecommendationContext {
                job: &job,
                candidate: &candidate,
                matched_skills: &[],
                missing_skills: &[],
                match_score: 50,
            })
            .await;
        assert!(matches!(result, Err(RecommendationError::Generation(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_llm_provider_times_out() {
        let provider =
            LlmRecommendationProvider::new(Arc::new(SlowGenerator), Duration::from_secs(2));
        let (job, candidate) = (job(), candidate());
        let result = provider
            .recommend(&RecommendationContext {
                job: &job,
                candidate: &candidate,
                matched_skills: &[],
                missing_skills: &[],
                match_score: 50,
            })
            .await;
        assert!(matches!(result, Err(RecommendationError::Timeout(_))));
    }

    #[test]
    fn test_rule_recommendation_strong() {
        let rec = build_rule_recommendation("Nour", 85, &[]);
        assert!(rec.contains("Strong match"));
        assert!(rec.contains("85"));
    }

    #[test]
    fn test_rule_recommendation_moderate_lists_gaps() {
        let rec = build_rule_recommendation("Nour", 65, &["Kafka".to_string()]);
        assert!(rec.contains("Kafka"));
        assert!(rec.contains("65"));
    }

    #[test]
    fn test_rule_recommendation_weak_caps_gap_list_at_three() {
        let missing: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
        let rec = build_rule_recommendation("Nour", 20, &missing);
        assert!(rec.contains("A, B, C"));
        assert!(!rec.contains('D'));
    }
}
