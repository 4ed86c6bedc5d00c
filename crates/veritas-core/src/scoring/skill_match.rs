//! JD skill match: share of required skills the resume covers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::claim::Claim;
use crate::extraction::{JobDescription, ResumeProfile};
use crate::skills;
use crate::types::ClaimKind;

/// Where a required skill was found on the resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillSource {
    Skills,
    Technologies,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedSkill {
    pub required: String,
    pub found_in: String,
    pub source: SkillSource,
}

/// Result of matching resume skills against a JD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub matched: Vec<MatchedSkill>,
    pub missing: Vec<String>,
    pub required_count: usize,

    /// matched / required × 100
    pub percentage: f64,
}

/// Match the resume against the JD's required skills.
///
/// Returns `None` when the JD lists no required skill; the factor is then
/// treated as absent.
pub fn match_skills(
    jd: &JobDescription,
    claims: &[Claim],
    profile: &ResumeProfile,
) -> Option<SkillMatch> {
    if !jd.has_requirements() {
        return None;
    }

    let resume_skills: Vec<&str> = claims
        .iter()
        .filter(|c| c.kind == ClaimKind::Skill)
        .map(|c| c.subject())
        .chain(profile.skills.iter().map(String::as_str))
        .collect();

    let technologies: Vec<&str> = profile
        .project_technologies()
        .chain(profile.work_technologies())
        .map(String::as_str)
        .collect();

    let mut matched = Vec::new();
    let mut missing = Vec::new();

    let mut seen = BTreeSet::new();
    for required in jd.required() {
        // "Rust" and "rust", or "JS" and "JavaScript", are one requirement
        if !seen.insert(skills::normalize(required)) {
            continue;
        }

        let hit = resume_skills
            .iter()
            .find(|s| skills::skills_match(required, s))
            .map(|s| (*s, SkillSource::Skills))
            .or_else(|| {
                technologies
                    .iter()
                    .find(|t| skills::skills_match(required, t))
                    .map(|t| (*t, SkillSource::Technologies))
            });

        match hit {
            Some((found, source)) => matched.push(MatchedSkill {
                required: required.clone(),
                found_in: found.to_string(),
                source,
            }),
            None => missing.push(required.clone()),
        }
    }

    let required_count = matched.len() + missing.len();
    let percentage = matched.len() as f64 / required_count as f64 * 100.0;

    tracing::debug!(
        matched = matched.len(),
        required = required_count,
        percentage,
        "matched JD skills"
    );

    Some(SkillMatch {
        matched,
        missing,
        required_count,
        percentage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::ProjectEntry;

    fn jd(skills: &[&str]) -> JobDescription {
        JobDescription {
            title: Some("Backend Engineer".to_string()),
            required_skills: skills.iter().map(|s| s.to_string()).collect(),
            preferred_skills: vec![],
        }
    }

    #[test]
    fn test_five_of_six() {
        let claims: Vec<Claim> = ["Rust", "JS", "Postgres", "Docker", "k8s"]
            .iter()
            .enumerate()
            .map(|(i, s)| Claim::new(format!("s{}", i).as_str(), ClaimKind::Skill, *s, *s))
            .collect();

        let result = match_skills(
            &jd(&["rust", "JavaScript", "PostgreSQL", "Docker", "Kubernetes", "Haskell"]),
            &claims,
            &ResumeProfile::default(),
        )
        .unwrap();

        assert_eq!(result.matched.len(), 5);
        assert_eq!(result.missing, vec!["Haskell".to_string()]);
        assert!((result.percentage - 83.333).abs() < 0.01);
    }

    #[test]
    fn test_technology_fallback() {
        let profile = ResumeProfile {
            projects: vec![ProjectEntry {
                name: "api".to_string(),
                technologies: vec!["Flask".to_string()],
                ..Default::default()
            }],
            ..Default::default()
        };
        let result = match_skills(&jd(&["Python"]), &[], &profile).unwrap();
        assert_eq!(result.matched[0].source, SkillSource::Technologies);
        assert_eq!(result.percentage, 100.0);
    }

    #[test]
    fn test_empty_requirements_is_absent() {
        assert!(match_skills(&jd(&[]), &[], &ResumeProfile::default()).is_none());
        assert!(match_skills(&jd(&["  "]), &[], &ResumeProfile::default()).is_none());
    }

    #[test]
    fn test_repeated_requirement_counted_once() {
        let claims = vec![Claim::new("s0", ClaimKind::Skill, "Rust", "Rust")];
        let result = match_skills(&jd(&["Rust", "rust", "Go"]), &claims, &ResumeProfile::default()).unwrap();

        assert_eq!(result.required_count, 2);
        assert_eq!(result.matched.len(), 1);
        assert_eq!(result.missing, vec!["Go".to_string()]);
        assert_eq!(result.percentage, 50.0);
    }
}
