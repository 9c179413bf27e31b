// Prompt constants for candidate recommendations.

/// System prompt for per-candidate recommendations.
pub const RECOMMENDATION_SYSTEM: &str = "You are an expert recruitment consultant. \
    Provide a brief, actionable recommendation for this candidate match.";

/// Recommendation prompt template.
/// Replace: {job_title}, {required_skills}, {required_experience},
///          {candidate_name}, {candidate_skills}, {candidate_experience},
///          {matched_skills}, {missing_skills}
pub const RECOMMENDATION_PROMPT_TEMPLATE: &str = r#"Job: {job_title}
Required Skills: {required_skills}
Required Experience: {required_experience} years

Candidate: {candidate_name}
Skills: {candidate_skills}
Experience: {candidate_experience} years
Matched Skills: {matched_skills}
Missing Skills: {missing_skills}

Provide a 2-3 sentence recommendation in Arabic or English based on the resume language."#;
