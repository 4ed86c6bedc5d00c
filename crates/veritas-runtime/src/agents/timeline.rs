//! Timeline agent: weak support for experience claims whose dates are consistent.

use async_trait::async_trait;

use veritas_core::timeline::EntryStatus;
use veritas_core::{Claim, ClaimKind, EvidenceRecord, TimelineTolerance, TimelineValidator};

use super::traits::{AgentContext, AgentError, AgentOutcomes, VerificationAgent};

const CONSISTENT_CONFIDENCE: u8 = 60;

pub struct TimelineAgent {
    validator: TimelineValidator,
}

impl TimelineAgent {
    pub fn new(tolerance: TimelineTolerance) -> Self {
        Self {
            validator: TimelineValidator::new(tolerance),
        }
    }
}

#[async_trait]
impl VerificationAgent for TimelineAgent {
    fn name(&self) -> &'static str {
        "timeline"
    }

    fn interested_in(&self, claim: &Claim) -> bool {
        claim.verifiable && claim.kind == ClaimKind::Experience
    }

    async fn verify(
        &self,
        claims: &[Claim],
        ctx: &AgentContext<'_>,
    ) -> Result<AgentOutcomes, AgentError> {
        let report = self.validator.validate(&ctx.profile.experience, ctx.as_of);

        Ok(claims
            .iter()
            .map(|claim| {
                let entry: Option<&EntryStatus> = report.entry_for_claim(&claim.id).or_else(|| {
                    report
                        .entries
                        .iter()
                        .find(|e| e.claim_id.is_none() && e.organization.eq_ignore_ascii_case(claim.subject()))
                });

                let record = match entry {
                    Some(e) if e.consistent => EvidenceRecord::supports(
                        self.name(),
                        "dates consistent with the rest of the timeline",
                        CONSISTENT_CONFIDENCE,
                    ),
                    Some(e) => EvidenceRecord::inconclusive(self.name(), e.issues.join("; ")),
                    None => EvidenceRecord::inconclusive(self.name(), "no dated experience entry"),
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
    use veritas_core::{ClaimId, EvidenceOutcome, ExperienceEntry, ResumeProfile, YearMonth};

    #[tokio::test]
    async fn test_consistent_and_overlapping_entries() {
        let profile = ResumeProfile {
            experience: vec![
                ExperienceEntry {
                    claim_id: Some(ClaimId::new("e0")),
                    organization: "Acme".to_string(),
                    start: Some("2018-01".to_string()),
                    end: Some("2020-06".to_string()),
                    ..Default::default()
                },
                ExperienceEntry {
                    claim_id: Some(ClaimId::new("e1")),
                    organization: "Globex".to_string(),
                    start: Some("2020-01".to_string()),
                    end: Some("2022-01".to_string()),
                    ..Default::default()
                },
                ExperienceEntry {
                    organization: "Initech".to_string(),
                    start: Some("2022-02".to_string()),
                    end: Some("present".to_string()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let claims = vec![
            Claim::new("e0", ClaimKind::Experience, "Engineer at Acme", "Acme"),
            Claim::new("e2", ClaimKind::Experience, "Lead at Initech", "Initech"),
            Claim::new("e3", ClaimKind::Experience, "Founder at Hooli", "Hooli"),
        ];
        let creds = CredentialSet::new();
        let ctx = AgentContext {
            profile: &profile,
            credentials: &creds,
            as_of: YearMonth::new(2025, 1).unwrap(),
        };

        let outcomes = TimelineAgent::new(TimelineTolerance::default())
            .verify(&claims, &ctx)
            .await
            .unwrap();

        // Acme and Globex overlap by six months
        assert_eq!(outcomes[&ClaimId::new("e0")].outcome, EvidenceOutcome::Inconclusive);
        assert!(outcomes[&ClaimId::new("e2")].is_support());
        assert_eq!(outcomes[&ClaimId::new("e2")].confidence, 60);
        assert_eq!(outcomes[&ClaimId::new("e3")].detail, "no dated experience entry");
    }
}
