//! LinkedIn agent: matches experience and education claims against profile positions.

use async_trait::async_trait;
use std::sync::Arc;

use veritas_core::timeline::Period;
use veritas_core::{Claim, ClaimKind, EvidenceRecord, ExperienceEntry, LinkKind, YearMonth};

use super::traits::{AgentContext, AgentError, AgentOutcomes, VerificationAgent};
use crate::sources::{LinkedInProfile, LinkedInSource};

const DATED_MATCH_CONFIDENCE: u8 = 90;
const NAME_MATCH_CONFIDENCE: u8 = 72;

pub struct LinkedInAgent {
    source: Arc<dyn LinkedInSource>,
}

impl LinkedInAgent {
    pub fn new(source: Arc<dyn LinkedInSource>) -> Self {
        Self { source }
    }

    fn check_experience(
        &self,
        claim: &Claim,
        entry: Option<&ExperienceEntry>,
        profile: &LinkedInProfile,
        as_of: YearMonth,
    ) -> EvidenceRecord {
        let organization = entry
            .map(|e| e.organization.as_str())
            .unwrap_or_else(|| claim.subject());

        let positions: Vec<_> = profile
            .positions
            .iter()
            .filter(|p| same_name(&p.organization, organization))
            .collect();

        if positions.is_empty() {
            return EvidenceRecord::inconclusive(
                self.name(),
                format!("no LinkedIn position at '{}'", organization),
            );
        }

        let claimed = entry.and_then(|e| Period::resolve(e.start.as_deref(), e.end.as_deref(), as_of).ok());
        let dated = claimed.and_then(|claimed| {
            positions.iter().find(|p| {
                Period::resolve(p.start.as_deref(), p.end.as_deref(), as_of)
                    .map(|listed| listed.overlap_months(&claimed) > 0)
                    .unwrap_or(false)
            })
        });

        match dated {
            Some(p) => EvidenceRecord::supports(
                self.name(),
                format!("position at {} with overlapping dates", p.organization),
                DATED_MATCH_CONFIDENCE,
            ),
            None => EvidenceRecord::supports(
                self.name(),
                format!("position at {} found, dates not confirmed", positions[0].organization),
                NAME_MATCH_CONFIDENCE,
            ),
        }
    }

    fn check_education(&self, claim: &Claim, profile: &LinkedInProfile) -> EvidenceRecord {
        let institution = claim.subject();
        let hit = profile
            .education
            .iter()
            .find(|e| same_name(&e.institution, institution) || contains_name(&claim.text, &e.institution));

        match hit {
            Some(e) => {
                let degree_matches = e
                    .degree
                    .as_deref()
                    .map(|d| contains_name(&claim.text, d))
                    .unwrap_or(false);
                let confidence = if degree_matches {
                    DATED_MATCH_CONFIDENCE
                } else {
                    NAME_MATCH_CONFIDENCE
                };
                EvidenceRecord::supports(
                    self.name(),
                    format!("education at {} listed", e.institution),
                    confidence,
                )
            }
            None => EvidenceRecord::inconclusive(
                self.name(),
                format!("no LinkedIn education at '{}'", institution),
            ),
        }
    }
}

#[async_trait]
impl VerificationAgent for LinkedInAgent {
    fn name(&self) -> &'static str {
        "linkedin"
    }

    fn interested_in(&self, claim: &Claim) -> bool {
        claim.verifiable && matches!(claim.kind, ClaimKind::Experience | ClaimKind::Education)
    }

    async fn verify(
        &self,
        claims: &[Claim],
        ctx: &AgentContext<'_>,
    ) -> Result<AgentOutcomes, AgentError> {
        let Some(username) = ctx.profile.links.username(LinkKind::Linkedin) else {
            return Ok(claims
                .iter()
                .map(|c| {
                    (
                        c.id.clone(),
                        EvidenceRecord::inconclusive(self.name(), "no LinkedIn profile linked"),
                    )
                })
                .collect());
        };

        let Some(profile) = self.source.profile(&username).await? else {
            return Ok(claims
                .iter()
                .map(|c| {
                    (
                        c.id.clone(),
                        EvidenceRecord::inconclusive(
                            self.name(),
                            format!("LinkedIn profile '{}' not available", username),
                        ),
                    )
                })
                .collect());
        };

        Ok(claims
            .iter()
            .map(|claim| {
                let record = match claim.kind {
                    ClaimKind::Education => self.check_education(claim, &profile),
                    _ => {
                        let entry = ctx
                            .profile
                            .experience
                            .iter()
                            .find(|e| e.claim_id.as_ref() == Some(&claim.id));
                        self.check_experience(claim, entry, &profile, ctx.as_of)
                    }
                };
                (claim.id.clone(), record)
            })
            .collect())
    }
}

fn simplify(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn same_name(a: &str, b: &str) -> bool {
    let (a, b) = (simplify(a), simplify(b));
    !a.is_empty() && !b.is_empty() && (a.contains(&b) || b.contains(&a))
}

fn contains_name(haystack: &str, needle: &str) -> bool {
    let needle = simplify(needle);
    !needle.is_empty() && simplify(haystack).contains(&needle)
}
