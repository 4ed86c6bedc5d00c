//! Contradicted claims.

use super::{FlagCategory, RedFlag, RedFlagRule, RuleContext, RuleError};
use crate::types::{Severity, VerificationStatus};

/// One high-severity flag per contradicted claim.
pub struct ContradictedClaimRule;

impl ContradictedClaimRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ContradictedClaimRule {
    fn default() -> Self {
        Self::new()
    }
}

impl RedFlagRule for ContradictedClaimRule {
    fn category(&self) -> FlagCategory {
        FlagCategory::ContradictedClaim
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<RedFlag>, RuleError> {
        let flags = ctx
            .claims
            .iter()
            .filter(|c| c.verification_status() == VerificationStatus::Contradicted)
            .map(|c| {
                let mut flag = RedFlag::new(
                    self.category(),
                    Severity::High,
                    format!("{} claim '{}' is contradicted by evidence", c.kind, c.subject()),
                )
                .with_claims([c.id.clone()]);

                for record in c.evidence().iter().filter(|r| r.is_contradiction()) {
                    flag = flag.with_evidence(format!("{}: {}", record.agent_name, record.detail));
                }
                flag
            })
            .collect();

        Ok(flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::Claim;
    use crate::config::Thresholds;
    use crate::evidence::EvidenceRecord;
    use crate::extraction::ResumeProfile;
    use crate::types::ClaimKind;

    #[test]
    fn test_contradicted_claim_flagged_with_evidence() {
        let t = Thresholds::default();
        let mut project = Claim::new("p0", ClaimKind::Project, "Built a chess engine", "chess-engine");
        project.record_evidence(EvidenceRecord::supports("tech_consistency", "", 72), &t);
        project.record_evidence(EvidenceRecord::contradicts("github", "no matching repository", 80), &t);
        let fine = Claim::new("s0", ClaimKind::Skill, "Rust", "Rust");

        let profile = ResumeProfile::default();
        let claims = vec![project, fine];
        let flags = ContradictedClaimRule::new().evaluate(&RuleContext::new(&claims, &profile)).unwrap();

        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].severity, Severity::High);
        assert_eq!(flags[0].evidence, vec!["github: no matching repository".to_string()]);
    }
}
