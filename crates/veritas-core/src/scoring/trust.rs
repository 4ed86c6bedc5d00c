//! Trust scoring.
//!
//! Per-claim trust maps status to a band and interpolates within it by
//! confidence. Overall trust is the mean over verifiable claims.

use serde::{Deserialize, Serialize};

use super::{clamp_score, ScoreBreakdown, ScoreComponent};
use crate::claim::Claim;
use crate::config::Thresholds;
use crate::types::VerificationStatus;

/// Trust band (low, high) for a status.
fn band(status: VerificationStatus) -> (f64, f64) {
    match status {
        VerificationStatus::Contradicted => (0.0, 20.0),
        VerificationStatus::Unverified => (20.0, 40.0),
        VerificationStatus::PartiallyVerified => (40.0, 75.0),
        VerificationStatus::Verified => (75.0, 100.0),
    }
}

/// Trust for a single claim (0-100).
pub fn claim_trust(status: VerificationStatus, confidence: u8) -> f64 {
    let (low, high) = band(status);
    let confidence = f64::from(confidence.min(100));
    low + (high - low) * confidence / 100.0
}

/// Human-readable label for an overall trust score.
pub fn trust_label(score: f64, thresholds: &Thresholds) -> &'static str {
    if score >= f64::from(thresholds.verified) {
        "Highly Trustworthy"
    } else if score >= f64::from(thresholds.partial) {
        "Partially Trustworthy"
    } else if score >= 50.0 {
        "Moderately Trustworthy"
    } else {
        "Low Trustworthiness"
    }
}

/// Overall trust result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustScore {
    pub score: f64,
    pub label: String,
    pub breakdown: ScoreBreakdown,
    pub verified: usize,
    pub partially_verified: usize,
    pub unverified: usize,
    pub contradicted: usize,

    /// Claims excluded as non-verifiable by design
    pub excluded: usize,
    pub reasoning: String,
}

/// Computes overall trust over the claim set.
pub struct TrustScorer {
    thresholds: Thresholds,
}

impl TrustScorer {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn score(&self, claims: &[Claim]) -> TrustScore {
        let scored: Vec<&Claim> = claims.iter().filter(|c| c.verifiable).collect();
        let excluded = claims.len() - scored.len();

        let count = |status: VerificationStatus| {
            scored
                .iter()
                .filter(|c| c.verification_status() == status)
                .count()
        };
        let verified = count(VerificationStatus::Verified);
        let partially_verified = count(VerificationStatus::PartiallyVerified);
        let unverified = count(VerificationStatus::Unverified);
        let contradicted = count(VerificationStatus::Contradicted);

        let mut breakdown = ScoreBreakdown::new();
        let score = if scored.is_empty() {
            0.0
        } else {
            let weight = 1.0 / scored.len() as f64;
            for claim in &scored {
                let trust = claim_trust(claim.verification_status(), claim.confidence());
                breakdown.insert(claim.id.as_str(), ScoreComponent::measured(trust, weight));
            }
            clamp_score(breakdown.weighted_sum())
        };

        let label = trust_label(score, &self.thresholds).to_string();
        let reasoning = self.reasoning(score, scored.len(), verified, unverified, contradicted);

        TrustScore {
            score,
            label,
            breakdown,
            verified,
            partially_verified,
            unverified,
            contradicted,
            excluded,
            reasoning,
        }
    }

    fn reasoning(
        &self,
        score: f64,
        total: usize,
        verified: usize,
        unverified: usize,
        contradicted: usize,
    ) -> String {
        if total == 0 {
            return "No verifiable claims; trust could not be established.".to_string();
        }

        let mut text = if score >= f64::from(self.thresholds.verified) {
            format!("{} of {} claims verified against external evidence.", verified, total)
        } else if score >= f64::from(self.thresholds.partial) {
            format!(
                "Most claims are supported; {} remain unverified or flagged.",
                unverified + contradicted
            )
        } else if score >= 50.0 {
            format!(
                "Mixed evidence: {} of {} claims lack corroboration.",
                unverified + contradicted,
                total
            )
        } else {
            "Little external evidence supports the resume's claims.".to_string()
        };

        if contradicted > 0 {
            text.push_str(&format!(" {} claim(s) contradicted by evidence.", contradicted));
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::EvidenceRecord;
    use crate::types::ClaimKind;
    use proptest::prelude::*;

    fn claim_with(id: &str, record: Option<EvidenceRecord>) -> Claim {
        let mut claim = Claim::new(id, ClaimKind::Skill, id, id);
        if let Some(r) = record {
            claim.record_evidence(r, &Thresholds::default());
        }
        claim
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(claim_trust(VerificationStatus::Contradicted, 0), 0.0);
        assert_eq!(claim_trust(VerificationStatus::Unverified, 0), 20.0);
        assert_eq!(claim_trust(VerificationStatus::PartiallyVerified, 100), 75.0);
        assert_eq!(claim_trust(VerificationStatus::Verified, 100), 100.0);
        assert_eq!(claim_trust(VerificationStatus::Verified, 60), 90.0);
    }

    #[test]
    fn test_mean_excludes_non_verifiable() {
        let claims = vec![
            claim_with("rust", Some(EvidenceRecord::supports("github", "", 100))),
            claim_with("go", None),
            Claim::new("lead", ClaimKind::Skill, "Leadership", "Leadership").non_verifiable(),
        ];
        let result = TrustScorer::new(Thresholds::default()).score(&claims);

        assert_eq!(result.excluded, 1);
        assert_eq!(result.breakdown.components.len(), 2);
        assert!((result.score - 60.0).abs() < 1e-9);
        assert!(result.breakdown.reproduces(result.score));
        assert_eq!(result.label, "Moderately Trustworthy");
    }

    #[test]
    fn test_no_verifiable_claims() {
        let claims = vec![Claim::new("lead", ClaimKind::Skill, "Leadership", "").non_verifiable()];
        let result = TrustScorer::new(Thresholds::default()).score(&claims);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.label, "Low Trustworthiness");
    }

    fn status_strategy() -> impl Strategy<Value = VerificationStatus> {
        prop_oneof![
            Just(VerificationStatus::Contradicted),
            Just(VerificationStatus::Unverified),
            Just(VerificationStatus::PartiallyVerified),
            Just(VerificationStatus::Verified),
        ]
    }

    proptest! {
        #[test]
        fn prop_claim_trust_bounded_and_monotonic(
            status in status_strategy(),
            a in 0u8..=100,
            b in 0u8..=100,
        ) {
            let (lo, hi) = (a.min(b), a.max(b));
            let t_lo = claim_trust(status, lo);
            let t_hi = claim_trust(status, hi);
            prop_assert!((0.0..=100.0).contains(&t_lo));
            prop_assert!((0.0..=100.0).contains(&t_hi));
            prop_assert!(t_lo <= t_hi);
        }

        #[test]
        fn prop_overall_trust_bounded_and_monotonic(
            confidences in proptest::collection::vec(0u8..=100, 1..12),
            bump_index in any::<proptest::sample::Index>(),
            bump in 0u8..=100,
        ) {
            // With zero thresholds any support verifies, so raising a
            // confidence never changes a claim's status.
            let thresholds = Thresholds { verified: 0, partial: 0 };
            let build = |confs: &[u8]| -> Vec<Claim> {
                confs
                    .iter()
                    .enumerate()
                    .map(|(i, c)| {
                        let mut claim = Claim::new(format!("c{}", i).as_str(), ClaimKind::Skill, "x", "x");
                        claim.record_evidence(EvidenceRecord::supports("github", "", *c), &thresholds);
                        claim
                    })
                    .collect()
            };

            let scorer = TrustScorer::new(thresholds);
            let before = scorer.score(&build(&confidences));

            let mut raised = confidences.clone();
            let i = bump_index.index(raised.len());
            raised[i] = raised[i].max(bump);
            let after = scorer.score(&build(&raised));

            prop_assert!((0.0..=100.0).contains(&before.score));
            prop_assert!((0.0..=100.0).contains(&after.score));
            prop_assert!(after.score + 1e-9 >= before.score);
            prop_assert!(before.breakdown.reproduces(before.score));
        }
    }
}
