// Prompt constants for resume extraction.

/// System prompt for resume parsing. Combined with `JSON_ONLY_SYSTEM` at call time.
pub const RESUME_PARSE_SYSTEM: &str = r#"You are an expert resume parser. Extract structured information from resumes in Arabic and English.
Return a JSON object with this exact structure:
{
  "full_name": "string",
  "email": "string or null",
  "phone": "string or null",
  "location": "string or null",
  "years_of_experience": number or null,
  "education": "string",
  "summary": "brief professional summary",
  "skills": [{"skill_name": "string", "skill_category": "Technical/Soft/Language/Other", "proficiency_level": "Beginner/Intermediate/Advanced/Expert"}],
  "work_experiences": [{"company_name": "string", "position": "string", "start_date": "string", "end_date": "string or Present", "description": "string"}]
}"#;

/// Resume parsing prompt template. Replace `{resume_text}` before sending.
pub const RESUME_PARSE_PROMPT_TEMPLATE: &str = r#"Analyze this resume and extract all relevant information. Return only the JSON object.

RESUME:
{resume_text}"#;
