//! Missing external verification links.

use super::{FlagCategory, RedFlag, RedFlagRule, RuleContext, RuleError};
use crate::claim::Claim;
use crate::types::{ClaimKind, LinkKind, Severity};

/// One low-severity flag per link kind that is missing while claims it
/// could verify exist: GitHub for skills and projects, LinkedIn for
/// experience and education, Kaggle for Kaggle metrics.
pub struct MissingExternalLinkRule;

impl MissingExternalLinkRule {
    pub fn new() -> Self {
        Self
    }

    fn relevant(kind: LinkKind, claim: &Claim) -> bool {
        match kind {
            LinkKind::Github => matches!(claim.kind, ClaimKind::Skill | ClaimKind::Project),
            LinkKind::Linkedin => matches!(claim.kind, ClaimKind::Experience | ClaimKind::Education),
            LinkKind::Kaggle => claim.concerns_kaggle(),
        }
    }
}

impl Default for MissingExternalLinkRule {
    fn default() -> Self {
        Self::new()
    }
}

impl RedFlagRule for MissingExternalLinkRule {
    fn category(&self) -> FlagCategory {
        FlagCategory::MissingExternalLink
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<RedFlag>, RuleError> {
        let mut flags = Vec::new();

        for kind in [LinkKind::Github, LinkKind::Kaggle, LinkKind::Linkedin] {
            if ctx.profile.links.has(kind) {
                continue;
            }

            let related: Vec<_> = ctx
                .claims
                .iter()
                .filter(|c| c.verifiable && Self::relevant(kind, c))
                .map(|c| c.id.clone())
                .collect();

            if related.is_empty() {
                continue;
            }

            let mut flag = RedFlag::new(
                self.category(),
                Severity::Low,
                format!(
                    "No {} profile linked; {} claim(s) cannot be checked against it",
                    kind.label(),
                    related.len()
                ),
            )
            .with_claims(related);

            if let Some(raw) = ctx.profile.links.raw(kind) {
                flag = flag.with_evidence(format!("unrecognised {} link '{}'", kind.label(), raw));
            }

            flags.push(flag);
        }

        Ok(flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{ProfileLinks, ResumeProfile};

    #[test]
    fn test_flags_per_missing_link_kind() {
        let claims = vec![
            Claim::new("s0", ClaimKind::Skill, "Rust", "Rust"),
            Claim::new("p0", ClaimKind::Project, "Chess engine", ""),
            Claim::new("e0", ClaimKind::Experience, "Engineer at Acme", "Acme"),
            Claim::new("m0", ClaimKind::Metric, "Reduced latency by 40%", ""),
        ];
        let profile = ResumeProfile {
            links: ProfileLinks {
                linkedin: Some("https://linkedin.com/in/jane".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let flags = MissingExternalLinkRule::new()
            .evaluate(&RuleContext::new(&claims, &profile))
            .unwrap();

        // GitHub only: LinkedIn is linked and no metric concerns Kaggle.
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].severity, Severity::Low);
        assert_eq!(flags[0].related_claim_ids.len(), 2);
        assert!(flags[0].description.contains("GitHub"));
    }

    #[test]
    fn test_kaggle_metric_needs_kaggle_link() {
        let claims = vec![Claim::new("m0", ClaimKind::Metric, "Kaggle Expert", "Expert")];
        let profile = ResumeProfile {
            links: ProfileLinks {
                kaggle: Some("kaggle.com".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let flags = MissingExternalLinkRule::new()
            .evaluate(&RuleContext::new(&claims, &profile))
            .unwrap();
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].evidence.len(), 1);
    }
}
