//! Match score: skill coverage (weight 60) plus experience proximity (weight 40).
//!
//! Pure and deterministic. The recommendation text never feeds back into it.

use crate::models::candidate::CandidateProfile;
use crate::models::job::JobRequirement;
use crate::ranking::skills::SkillMatch;

pub const SKILL_WEIGHT: f64 = 60.0;
pub const EXPERIENCE_WEIGHT: f64 = 40.0;
/// Points lost per year of distance from the required experience.
pub const EXPERIENCE_PENALTY_PER_YEAR: f64 = 5.0;

/// Breakdown kept separate so callers and tests can inspect each half.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub skill_component: f64,
    pub experience_component: f64,
}

impl ScoreBreakdown {
    /// Rounded total, always within 0 – 100.
    pub fn total(&self) -> u32 {
        (self.skill_component + self.experience_component)
            .round()
            .clamp(0.0, 100.0) as u32
    }
}

/// No required skills contributes nothing: required skills are mandatory in the job model.
pub fn skill_component(skill_match: &SkillMatch, required_count: usize) -> f64 {
    if required_count == 0 {
        return 0.0;
    }
    SKILL_WEIGHT * (skill_match.satisfied_required as f64 / required_count as f64)
}

/// Zero is a known value on both sides; only `None` means unspecified.
pub fn experience_component(required_years: Option<u32>, candidate_years: Option<u32>) -> f64 {
    match (required_years, candidate_years) {
        (None, _) => EXPERIENCE_WEIGHT,
        (Some(_), None) => 0.0,
        (Some(required), Some(actual)) => {
            let distance = (i64::from(actual) - i64::from(required)).unsigned_abs() as f64;
            (EXPERIENCE_WEIGHT - EXPERIENCE_PENALTY_PER_YEAR * distance).max(0.0)
        }
    }
}

pub fn score_breakdown(
    candidate: &CandidateProfile,
    job: &JobRequirement,
    skill_match: &SkillMatch,
) -> ScoreBreakdown {
    ScoreBreakdown {
        skill_component: skill_component(skill_match, job.required_skills.len()),
        experience_component: experience_component(
            job.required_experience_years,
            candidate.years_of_experience,
        ),
    }
}

pub fn score(candidate: &CandidateProfile, job: &JobRequirement, skill_match: &SkillMatch) -> u32 {
    score_breakdown(candidate, job, skill_match).total()
}
