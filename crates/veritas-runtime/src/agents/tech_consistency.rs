//! Tech-consistency agent: a claimed skill is partially corroborated when the
//! resume itself shows it in use in a project or role.

use async_trait::async_trait;

use veritas_core::skills;
use veritas_core::{Claim, ClaimKind, EvidenceRecord, ResumeProfile};

use super::traits::{AgentContext, AgentError, AgentOutcomes, VerificationAgent};

const DEMONSTRATED_CONFIDENCE: u8 = 72;

pub struct TechConsistencyAgent;

impl TechConsistencyAgent {
    pub fn new() -> Self {
        Self
    }

    /// Where on the resume the skill is put to use.
    fn demonstrated_in(skill: &str, profile: &ResumeProfile) -> Option<String> {
        let uses = |techs: &[String]| techs.iter().any(|t| skills::skills_match(skill, t));

        profile
            .projects
            .iter()
            .find(|p| uses(&p.technologies))
            .map(|p| format!("project '{}'", p.name))
            .or_else(|| {
                profile
                    .experience
                    .iter()
                    .find(|e| uses(&e.technologies))
                    .map(|e| format!("role at {}", e.organization))
            })
    }
}

impl Default for TechConsistencyAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VerificationAgent for TechConsistencyAgent {
    fn name(&self) -> &'static str {
        "tech_consistency"
    }

    fn interested_in(&self, claim: &Claim) -> bool {
        claim.verifiable && claim.kind == ClaimKind::Skill
    }

    async fn verify(
        &self,
        claims: &[Claim],
        ctx: &AgentContext<'_>,
    ) -> Result<AgentOutcomes, AgentError> {
        Ok(claims
            .iter()
            .map(|claim| {
                let record = match Self::demonstrated_in(claim.subject(), ctx.profile) {
                    Some(place) => EvidenceRecord::supports(
                        self.name(),
                        format!("used in {}", place),
                        DEMONSTRATED_CONFIDENCE,
                    ),
                    None => EvidenceRecord::inconclusive(
                        self.name(),
                        "not used in any listed project or role",
                    ),
                };
                (claim.id.clone(), record)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::CredentialSet;
    use veritas_core::extraction::ProjectEntry;
    use veritas_core::{ClaimId, EvidenceOutcome, ExperienceEntry, YearMonth};

    #[tokio::test]
    async fn test_demonstrated_skills_partially_supported() {
        let profile = ResumeProfile {
            projects: vec![ProjectEntry {
                name: "api".to_string(),
                technologies: vec!["FastAPI".to_string()],
                ..Default::default()
            }],
            experience: vec![ExperienceEntry {
                organization: "Acme".to_string(),
                technologies: vec!["k8s".to_string()],
                ..Default::default()
            }],
            ..Default::default()
        };
        let claims = vec![
            Claim::new("s0", ClaimKind::Skill, "Python", "Python"),
            Claim::new("s1", ClaimKind::Skill, "Kubernetes", "Kubernetes"),
            Claim::new("s2", ClaimKind::Skill, "Erlang", "Erlang"),
        ];
        let creds = CredentialSet::new();
        let ctx = AgentContext {
            profile: &profile,
            credentials: &creds,
            as_of: YearMonth::new(2025, 1).unwrap(),
        };

        let outcomes = TechConsistencyAgent::new().verify(&claims, &ctx).await.unwrap();

        assert_eq!(outcomes[&ClaimId::new("s0")].confidence, 72);
        assert!(outcomes[&ClaimId::new("s0")].detail.contains("project 'api'"));
        assert!(outcomes[&ClaimId::new("s1")].detail.contains("role at Acme"));
        assert_eq!(outcomes[&ClaimId::new("s2")].outcome, EvidenceOutcome::Inconclusive);
    }
}
