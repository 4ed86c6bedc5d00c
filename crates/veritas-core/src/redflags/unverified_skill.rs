//! Unverified skill: no corroborating evidence and no code-hosting profile.

use super::{FlagCategory, RedFlag, RedFlagRule, RuleContext, RuleError};
use crate::types::{ClaimKind, LinkKind, Severity, VerificationStatus};

/// Flags each verifiable skill that stayed unverified without any support
/// when the resume links neither GitHub nor Kaggle.
pub struct UnverifiedSkillRule;

impl UnverifiedSkillRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UnverifiedSkillRule {
    fn default() -> Self {
        Self::new()
    }
}

impl RedFlagRule for UnverifiedSkillRule {
    fn category(&self) -> FlagCategory {
        FlagCategory::UnverifiedSkill
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<RedFlag>, RuleError> {
        let links = &ctx.profile.links;
        if links.has(LinkKind::Github) || links.has(LinkKind::Kaggle) {
            return Ok(Vec::new());
        }

        let flags = ctx
            .claims
            .iter()
            .filter(|c| c.kind == ClaimKind::Skill && c.verifiable)
            .filter(|c| c.verification_status() == VerificationStatus::Unverified && !c.has_support())
            .map(|c| {
                RedFlag::new(
                    self.category(),
                    Severity::Medium,
                    format!("Skill '{}' has no corroborating evidence", c.subject()),
                )
                .with_claims([c.id.clone()])
                .with_evidence("no GitHub or Kaggle profile linked")
            })
            .collect();

        Ok(flags)
    }
}
