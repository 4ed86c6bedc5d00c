//! Tech consistency report: claimed skills versus demonstrated technologies.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::claim::{Claim, ClaimId};
use crate::extraction::ResumeProfile;
use crate::skills;
use crate::types::{ClaimKind, VerificationStatus};

/// Credit a partially verified skill earns towards the consistency score.
const PARTIAL_CREDIT: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillFinding {
    pub skill: String,
    pub claim_id: ClaimId,

    /// Agent whose evidence decided the status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TechConsistencyReport {
    pub verified_skills: Vec<SkillFinding>,
    pub partially_verified_skills: Vec<SkillFinding>,
    pub unverified_skills: Vec<String>,
    pub contradicted_skills: Vec<String>,

    /// Technologies used in projects or work but never claimed as a skill
    pub undeclared_technologies: Vec<String>,

    /// (verified + 0.7 × partial) / claimed × 100
    pub consistency_score: f64,
}

/// Build the report from reconciled skill claims and the profile.
pub fn check_consistency(claims: &[Claim], profile: &ResumeProfile) -> TechConsistencyReport {
    let mut report = TechConsistencyReport::default();
    let mut claimed: BTreeSet<String> = BTreeSet::new();

    for claim in claims
        .iter()
        .filter(|c| c.kind == ClaimKind::Skill && c.verifiable)
    {
        let skill = skills::normalize(claim.subject());
        claimed.insert(skill.clone());

        let finding = || SkillFinding {
            skill: skill.clone(),
            claim_id: claim.id.clone(),
            found_by: claim.deciding_evidence().map(|r| r.agent_name.clone()),
        };

        match claim.verification_status() {
            VerificationStatus::Verified => report.verified_skills.push(finding()),
            VerificationStatus::PartiallyVerified => report.partially_verified_skills.push(finding()),
            VerificationStatus::Unverified => report.unverified_skills.push(skill.clone()),
            VerificationStatus::Contradicted => report.contradicted_skills.push(skill.clone()),
        }
    }

    claimed.extend(skills::normalize_all(&profile.skills));

    let demonstrated = skills::normalize_all(profile.project_technologies().chain(profile.work_technologies()));
    report.undeclared_technologies = demonstrated
        .into_iter()
        .filter(|tech| !claimed.iter().any(|c| skills::skills_match(c, tech) || skills::skills_match(tech, c)))
        .collect();

    let total = report.verified_skills.len()
        + report.partially_verified_skills.len()
        + report.unverified_skills.len()
        + report.contradicted_skills.len();

    if total > 0 {
        let credit = report.verified_skills.len() as f64
            + PARTIAL_CREDIT * report.partially_verified_skills.len() as f64;
        report.consistency_score = credit / total as f64 * 100.0;
    }

    tracing::debug!(
        claimed = total,
        verified = report.verified_skills.len(),
        undeclared = report.undeclared_technologies.len(),
        score = report.consistency_score,
        "tech consistency checked"
    );

    report
}
