//! Kaggle agent: checks tier and competition claims against the public profile.

use async_trait::async_trait;
use std::sync::Arc;

use veritas_core::{Claim, EvidenceRecord, LinkKind};

use super::traits::{AgentContext, AgentError, AgentOutcomes, VerificationAgent};
use crate::sources::{KaggleProfile, KaggleSource};

const TIER_CONFIDENCE: u8 = 90;
const COMPETITION_CONFIDENCE: u8 = 80;
const MISSING_PROFILE_CONFIDENCE: u8 = 85;

/// Progression tiers, most specific first so "grandmaster" wins over "master".
const TIERS: [&str; 5] = ["grandmaster", "master", "expert", "contributor", "novice"];

pub struct KaggleAgent {
    source: Arc<dyn KaggleSource>,
}

impl KaggleAgent {
    pub fn new(source: Arc<dyn KaggleSource>) -> Self {
        Self { source }
    }

    fn check(&self, claim: &Claim, profile: &KaggleProfile) -> EvidenceRecord {
        let text = format!("{} {}", claim.text, claim.claimed_value).to_lowercase();

        if let Some(claimed) = claimed_tier(&text) {
            let actual = profile.tier.as_deref().map(str::to_lowercase);
            return match actual.as_deref() {
                Some(tier) if tier == claimed => EvidenceRecord::supports(
                    self.name(),
                    format!("profile tier is {}", tier),
                    TIER_CONFIDENCE,
                ),
                Some(tier) => EvidenceRecord::contradicts(
                    self.name(),
                    format!("claims {} but profile tier is {}", claimed, tier),
                    TIER_CONFIDENCE,
                ),
                None => EvidenceRecord::inconclusive(self.name(), "profile tier not published"),
            };
        }

        let about_competitions = text.contains("competition") || text.contains("medal");
        if about_competitions && (profile.competitions > 0 || profile.medals.total() > 0) {
            return EvidenceRecord::supports(
                self.name(),
                format!(
                    "{} competitions, {} medals",
                    profile.competitions,
                    profile.medals.total()
                ),
                COMPETITION_CONFIDENCE,
            );
        }

        EvidenceRecord::inconclusive(self.name(), "profile does not show the claimed achievement")
    }
}

fn claimed_tier(text: &str) -> Option<&'static str> {
    TIERS.iter().copied().find(|tier| text.contains(tier))
}

#[async_trait]
impl VerificationAgent for KaggleAgent {
    fn name(&self) -> &'static str {
        "kaggle"
    }

    fn interested_in(&self, claim: &Claim) -> bool {
        claim.verifiable && claim.concerns_kaggle()
    }

    async fn verify(
        &self,
        claims: &[Claim],
        ctx: &AgentContext<'_>,
    ) -> Result<AgentOutcomes, AgentError> {
        let Some(username) = ctx.profile.links.username(LinkKind::Kaggle) else {
            return Ok(claims
                .iter()
                .map(|c| {
                    (
                        c.id.clone(),
                        EvidenceRecord::inconclusive(self.name(), "no Kaggle profile linked"),
                    )
                })
                .collect());
        };

        let profile = self.source.profile(&username).await?;

        Ok(claims
            .iter()
            .map(|claim| {
                let record = match &profile {
                    Some(p) => self.check(claim, p),
                    None => EvidenceRecord::contradicts(
                        self.name(),
                        format!("Kaggle user '{}' does not exist", username),
                        MISSING_PROFILE_CONFIDENCE,
                    ),
                };
                (claim.id.clone(), record)
            })
            .collect())
    }
}
