//! Skill matching: case-insensitive substring equivalence in either direction.
//!
//! The two halves of a [`SkillMatch`] are deliberately asymmetric. `matched`
//! reports what the candidate has (candidate-side strings), `missing` reports
//! what the job still needs (job-side strings).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    /// Candidate skills related to at least one required skill, in candidate order.
    pub matched: Vec<String>,
    /// Required skills no candidate skill relates to, in job order.
    pub missing: Vec<String>,
    /// Number of required skills satisfied by some candidate skill.
    pub satisfied_required: usize,
}

/// Lowercased once so each comparison doesn't re-fold.
struct Folded<'a> {
    original: &'a str,
    lower: String,
}

fn fold(skills: &[String]) -> Vec<Folded<'_>> {
    skills
        .iter()
        .map(|s| Folded {
            original: s.as_str(),
            lower: s.to_lowercase(),
        })
        .collect()
}

/// `a` and `b` are already lowercased.
fn related(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Partitions skills into matched (candidate side) and missing (job side).
/// An empty required list yields an empty match.
pub fn match_skills(candidate_skills: &[String], required_skills: &[String]) -> SkillMatch {
    if required_skills.is_empty() {
        return SkillMatch::default();
    }

    let candidate = fold(candidate_skills);
    let required = fold(required_skills);

    let matched = candidate
        .iter()
        .filter(|c| required.iter().any(|r| related(&c.lower, &r.lower)))
        .map(|c| c.original.to_string())
        .collect();

    let mut missing = Vec::new();
    let mut satisfied_required = 0;
    for r in &required {
        if candidate.iter().any(|c| related(&c.lower, &r.lower)) {
            satisfied_required += 1;
        } else {
            missing.push(r.original.to_string());
        }
    }

    SkillMatch {
        matched,
        missing,
        satisfied_required,
    }
}
