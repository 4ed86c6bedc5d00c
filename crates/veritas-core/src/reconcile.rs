//! Reconciliation of agent results onto claims.
//!
//! The merge rule depends only on the set of outcomes attached to a claim,
//! never on the order in which agents completed:
//!
//! 1. Any `contradicts` record → `contradicted`
//! 2. Else supporting confidence ≥ verified threshold → `verified`
//! 3. Else supporting confidence ≥ partial threshold → `partially_verified`
//! 4. Else → `unverified`
//!
//! Confidence is the maximum confidence among supporting records.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::claim::{Claim, ClaimId};
use crate::config::Thresholds;
use crate::evidence::EvidenceRecord;
use crate::types::VerificationStatus;

/// Output of one agent invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerificationResult {
    pub agent_name: String,

    /// Claims the agent was dispatched for
    pub claims_addressed: BTreeSet<ClaimId>,

    /// The agent's finding per claim
    pub per_claim_outcome: BTreeMap<ClaimId, EvidenceRecord>,

    /// Set when the agent errored, timed out or was cancelled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_error: Option<String>,
}

impl VerificationResult {
    /// A successful invocation.
    pub fn completed(
        agent: impl Into<String>,
        claims_addressed: BTreeSet<ClaimId>,
        per_claim_outcome: BTreeMap<ClaimId, EvidenceRecord>,
    ) -> Self {
        Self {
            agent_name: agent.into(),
            claims_addressed,
            per_claim_outcome,
            agent_error: None,
        }
    }

    /// A failed invocation: every addressed claim gets a synthetic inconclusive record.
    pub fn failed(
        agent: impl Into<String>,
        claims_addressed: BTreeSet<ClaimId>,
        error: impl Into<String>,
    ) -> Self {
        let agent = agent.into();
        let error = error.into();
        let per_claim_outcome = claims_addressed
            .iter()
            .map(|id| (id.clone(), EvidenceRecord::agent_unavailable(&agent, &error)))
            .collect();

        Self {
            agent_name: agent,
            claims_addressed,
            per_claim_outcome,
            agent_error: Some(error),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.agent_error.is_some()
    }
}

/// Compute status and confidence from a claim's evidence.
pub fn derive_status(evidence: &[EvidenceRecord], thresholds: &Thresholds) -> (VerificationStatus, u8) {
    let confidence = deciding_support(evidence).map(|r| r.confidence).unwrap_or(0);

    if evidence.iter().any(EvidenceRecord::is_contradiction) {
        return (VerificationStatus::Contradicted, confidence);
    }

    let has_support = evidence.iter().any(EvidenceRecord::is_support);
    let status = if has_support && confidence >= thresholds.verified {
        VerificationStatus::Verified
    } else if has_support && confidence >= thresholds.partial {
        VerificationStatus::PartiallyVerified
    } else {
        VerificationStatus::Unverified
    };

    (status, confidence)
}

/// The supporting record with the highest confidence; ties go to the most recent.
pub fn deciding_support(evidence: &[EvidenceRecord]) -> Option<&EvidenceRecord> {
    evidence
        .iter()
        .filter(|r| r.is_support())
        .max_by(|a, b| {
            a.confidence
                .cmp(&b.confidence)
                .then_with(|| a.timestamp.cmp(&b.timestamp))
        })
}

/// Counts of what a merge touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub records_applied: usize,
    pub unknown_claims: usize,
}

/// Merge agent results onto the claim set.
///
/// Outcomes for claims outside `claims_addressed`, or for ids not in the claim
/// set, are ignored.
pub fn apply_results(
    claims: &mut [Claim],
    results: &[VerificationResult],
    thresholds: &Thresholds,
) -> MergeSummary {
    let mut summary = MergeSummary::default();

    let index: BTreeMap<ClaimId, usize> = claims
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id.clone(), i))
        .collect();

    for result in results {
        for (claim_id, record) in &result.per_claim_outcome {
            if !result.claims_addressed.contains(claim_id) {
                tracing::warn!(
                    agent = %result.agent_name,
                    claim = %claim_id,
                    "ignoring outcome for claim outside agent subset"
                );
                continue;
            }

            let Some(&i) = index.get(claim_id) else {
                summary.unknown_claims += 1;
                continue;
            };

            claims[i].record_evidence(record.clone(), thresholds);
            summary.records_applied += 1;

            tracing::debug!(
                agent = %result.agent_name,
                claim = %claim_id,
                outcome = %record.outcome,
                status = %claims[i].verification_status(),
                "merged evidence"
            );
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClaimKind;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn ids(list: &[&str]) -> BTreeSet<ClaimId> {
        list.iter().map(|s| ClaimId::new(*s)).collect()
    }

    #[test]
    fn test_contradiction_wins() {
        let evidence = vec![
            EvidenceRecord::supports("github", "found", 99),
            EvidenceRecord::contradicts("kaggle", "missing", 50),
        ];
        let (status, confidence) = derive_status(&evidence, &Thresholds::default());
        assert_eq!(status, VerificationStatus::Contradicted);
        assert_eq!(confidence, 99);
    }

    #[test]
    fn test_threshold_bands() {
        let t = Thresholds::default();
        let at = |c| derive_status(&[EvidenceRecord::supports("a", "", c)], &t).0;
        assert_eq!(at(85), VerificationStatus::Verified);
        assert_eq!(at(84), VerificationStatus::PartiallyVerified);
        assert_eq!(at(70), VerificationStatus::PartiallyVerified);
        assert_eq!(at(69), VerificationStatus::Unverified);
    }

    #[test]
    fn test_no_support_is_unverified_even_with_zero_threshold() {
        let t = Thresholds { verified: 0, partial: 0 };
        let (status, _) = derive_status(&[EvidenceRecord::inconclusive("a", "")], &t);
        assert_eq!(status, VerificationStatus::Unverified);
    }

    #[test]
    fn test_tie_broken_by_most_recent() {
        let older = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let evidence = vec![
            crate::evidence::EvidenceBuilder::new("linkedin")
                .outcome(crate::types::EvidenceOutcome::Supports)
                .confidence(90)
                .at(newer)
                .build(),
            crate::evidence::EvidenceBuilder::new("github")
                .outcome(crate::types::EvidenceOutcome::Supports)
                .confidence(90)
                .at(older)
                .build(),
        ];
        assert_eq!(deciding_support(&evidence).unwrap().agent_name, "linkedin");
    }

    #[test]
    fn test_failed_result_yields_unavailable_records() {
        let result = VerificationResult::failed("github", ids(&["s0", "s1"]), "timed out");
        assert!(result.is_failed());
        assert_eq!(result.per_claim_outcome.len(), 2);
        assert!(result.per_claim_outcome.values().all(|r| r.is_agent_unavailable()));

        let mut claims = vec![Claim::new("s0", ClaimKind::Skill, "Rust", "Rust")];
        let summary = apply_results(&mut claims, &[result], &Thresholds::default());
        assert_eq!(summary.records_applied, 1);
        assert_eq!(summary.unknown_claims, 1);
        assert_eq!(claims[0].verification_status(), VerificationStatus::Unverified);
    }

    #[test]
    fn test_outcome_outside_subset_ignored() {
        let mut outcomes = BTreeMap::new();
        outcomes.insert(ClaimId::new("s1"), EvidenceRecord::contradicts("github", "x", 90));
        let result = VerificationResult::completed("github", ids(&["s0"]), outcomes);

        let mut claims = vec![Claim::new("s1", ClaimKind::Skill, "Go", "Go")];
        apply_results(&mut claims, &[result], &Thresholds::default());
        assert!(claims[0].evidence().is_empty());
    }

    fn outcome_strategy() -> impl Strategy<Value = (u8, u8, u8)> {
        // (agent index, outcome kind, confidence)
        (0u8..4, 0u8..3, 0u8..=100)
    }

    proptest! {
        #[test]
        fn prop_merge_is_order_independent(
            outcomes in proptest::collection::vec(outcome_strategy(), 1..8),
            seed in any::<u64>(),
        ) {
            let claim_ids = ["c0", "c1", "c2"];
            let results: Vec<VerificationResult> = outcomes
                .iter()
                .enumerate()
                .map(|(i, (agent, kind, conf))| {
                    let id = ClaimId::new(claim_ids[i % claim_ids.len()]);
                    let name = format!("agent{}", agent);
                    let record = match kind {
                        0 => EvidenceRecord::supports(&name, "s", *conf),
                        1 => EvidenceRecord::contradicts(&name, "c", *conf),
                        _ => EvidenceRecord::inconclusive(&name, "i"),
                    };
                    let mut map = BTreeMap::new();
                    map.insert(id.clone(), record);
                    VerificationResult::completed(name, [id].into_iter().collect(), map)
                })
                .collect();

            let fresh = || -> Vec<Claim> {
                claim_ids
                    .iter()
                    .map(|id| Claim::new(*id, ClaimKind::Skill, *id, *id))
                    .collect()
            };

            let mut forward = fresh();
            apply_results(&mut forward, &results, &Thresholds::default());

            let mut shuffled = results.clone();
            let n = shuffled.len();
            let mut state = seed;
            for i in (1..n).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let j = (state >> 33) as usize % (i + 1);
                shuffled.swap(i, j);
            }
            let mut permuted = fresh();
            apply_results(&mut permuted, &shuffled, &Thresholds::default());

            for (a, b) in forward.iter().zip(permuted.iter()) {
                prop_assert_eq!(a.verification_status(), b.verification_status());
                prop_assert_eq!(a.confidence(), b.confidence());
            }
        }
    }
}
