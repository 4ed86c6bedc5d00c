//! Share of uncorroborated skills.

use super::{FlagCategory, RedFlag, RedFlagRule, RuleContext, RuleError};
use crate::types::{ClaimKind, Severity, VerificationStatus};

/// Share of skill claims above which the whole skill section is flagged.
const MAX_UNVERIFIED_SHARE: f64 = 0.5;

/// Fires once when more than half of the verifiable skill claims are
/// unverified or contradicted.
pub struct HighUnverifiedRateRule;

impl HighUnverifiedRateRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighUnverifiedRateRule {
    fn default() -> Self {
        Self::new()
    }
}

impl RedFlagRule for HighUnverifiedRateRule {
    fn category(&self) -> FlagCategory {
        FlagCategory::HighUnverifiedRate
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<RedFlag>, RuleError> {
        let skills: Vec<_> = ctx
            .claims
            .iter()
            .filter(|c| c.kind == ClaimKind::Skill && c.verifiable)
            .collect();

        if skills.is_empty() {
            return Ok(Vec::new());
        }

        let unverified: Vec<_> = skills
            .iter()
            .filter(|c| {
                matches!(
                    c.verification_status(),
                    VerificationStatus::Unverified | VerificationStatus::Contradicted
                )
            })
            .collect();

        let share = unverified.len() as f64 / skills.len() as f64;
        if share <= MAX_UNVERIFIED_SHARE {
            return Ok(Vec::new());
        }

        let flag = RedFlag::new(
            self.category(),
            Severity::High,
            format!("{:.0}% of claimed skills have no supporting evidence", share * 100.0),
        )
        .with_claims(unverified.iter().map(|c| c.id.clone()))
        .with_evidence(format!("{} of {} skills unverified", unverified.len(), skills.len()));

        Ok(vec![flag])
    }
}
