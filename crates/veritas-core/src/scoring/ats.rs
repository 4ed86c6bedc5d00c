//! ATS composite score.
//!
//! `ATS = Σ(component_value × weight)` over the four factors. Omitted
//! factors (no JD, failed timeline stage) have their weight redistributed
//! proportionally across the remaining factors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{clamp_score, round1, ComponentStatus, ScoreBreakdown, ScoreComponent};
use crate::claim::Claim;
use crate::config::{AtsFactor, AtsWeights};

/// Value supplied for one factor.
#[derive(Debug, Clone, PartialEq)]
pub enum FactorValue {
    Measured(f64),
    Estimated { value: f64, note: String },
    Omitted { reason: String },
}

impl FactorValue {
    pub fn estimated(value: f64, note: impl Into<String>) -> Self {
        FactorValue::Estimated {
            value,
            note: note.into(),
        }
    }

    pub fn omitted(reason: impl Into<String>) -> Self {
        FactorValue::Omitted {
            reason: reason.into(),
        }
    }

    pub fn is_omitted(&self) -> bool {
        matches!(self, FactorValue::Omitted { .. })
    }
}

/// Inputs of the ATS calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct AtsInputs {
    pub jd_skill_match: FactorValue,
    pub verified_claims: FactorValue,
    pub resume_completeness: FactorValue,
    pub timeline_consistency: FactorValue,
}

impl AtsInputs {
    pub fn get(&self, factor: AtsFactor) -> &FactorValue {
        match factor {
            AtsFactor::JdSkillMatch => &self.jd_skill_match,
            AtsFactor::VerifiedClaims => &self.verified_claims,
            AtsFactor::ResumeCompleteness => &self.resume_completeness,
            AtsFactor::TimelineConsistency => &self.timeline_consistency,
        }
    }

    /// Share of all claims that are verified, partial claims counting half.
    ///
    /// Non-verifiable claims stay in the denominator; only the trust score
    /// leaves them out.
    pub fn verified_claims_from(claims: &[Claim]) -> FactorValue {
        if claims.is_empty() {
            return FactorValue::estimated(0.0, "no claims");
        }

        let credit: f64 = claims
            .iter()
            .filter(|c| c.verifiable)
            .map(|c| c.verification_status().verification_credit())
            .sum();
        FactorValue::Measured(credit / claims.len() as f64 * 100.0)
    }
}

/// ATS result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsScore {
    pub value: f64,
    pub status: String,
    pub breakdown: ScoreBreakdown,

    /// Weights actually applied, after redistribution
    pub effective_weights: BTreeMap<AtsFactor, f64>,

    /// Human-readable formula with the applied weights
    pub formula: String,
}

impl AtsScore {
    /// Integer score as published in the report.
    pub fn rounded(&self) -> u8 {
        self.value.round().clamp(0.0, 100.0) as u8
    }
}

/// Status label for an ATS value.
pub fn ats_status(value: f64) -> &'static str {
    if value >= 80.0 {
        "Strong Match"
    } else if value >= 60.0 {
        "Moderate Match"
    } else if value >= 40.0 {
        "Weak Match"
    } else {
        "Poor Match"
    }
}

/// Computes the ATS composite with a validated weight table.
pub struct AtsCalculator {
    weights: AtsWeights,
}

impl AtsCalculator {
    pub fn new(weights: AtsWeights) -> Self {
        Self { weights }
    }

    /// Weights after removing omitted factors and re-normalising to 1.0.
    pub fn effective_weights(&self, inputs: &AtsInputs) -> BTreeMap<AtsFactor, f64> {
        let active: Vec<AtsFactor> = AtsFactor::ALL
            .into_iter()
            .filter(|f| !inputs.get(*f).is_omitted())
            .collect();

        let active_sum: f64 = active.iter().map(|f| self.weights.weight(*f)).sum();

        active
            .iter()
            .map(|f| {
                let w = if active_sum > 0.0 {
                    self.weights.weight(*f) / active_sum
                } else {
                    // Every remaining factor had zero weight; share equally.
                    1.0 / active.len() as f64
                };
                (*f, w)
            })
            .collect()
    }

    pub fn calculate(&self, inputs: &AtsInputs) -> AtsScore {
        let effective_weights = self.effective_weights(inputs);
        let mut breakdown = ScoreBreakdown::new();

        for factor in AtsFactor::ALL {
            let weight = effective_weights.get(&factor).copied().unwrap_or(0.0);
            let component = match inputs.get(factor) {
                FactorValue::Measured(v) => ScoreComponent::measured(clamp_score(*v), weight),
                FactorValue::Estimated { value, note } => {
                    ScoreComponent::estimated(clamp_score(*value), weight, note.clone())
                }
                FactorValue::Omitted { reason } => ScoreComponent::omitted(reason.clone()),
            };
            breakdown.insert(factor.as_str(), component);
        }

        let value = clamp_score(breakdown.weighted_sum());
        let status = ats_status(value).to_string();
        let formula = formula(&effective_weights);

        tracing::debug!(
            ats = round1(value),
            factors = effective_weights.len(),
            "calculated ATS score"
        );

        AtsScore {
            value,
            status,
            breakdown,
            effective_weights,
            formula,
        }
    }
}

fn formula(weights: &BTreeMap<AtsFactor, f64>) -> String {
    let terms: Vec<String> = AtsFactor::ALL
        .iter()
        .filter_map(|f| {
            weights
                .get(f)
                .map(|w| format!("({} % × {:.2})", f.label(), w))
        })
        .collect();

    if terms.is_empty() {
        "ATS = 0".to_string()
    } else {
        format!("ATS = {}", terms.join(" + "))
    }
}

/// Whether a breakdown component was excluded from the composite.
pub fn is_omitted(component: &ScoreComponent) -> bool {
    component.status == ComponentStatus::Omitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Thresholds;
    use crate::evidence::EvidenceRecord;
    use crate::types::ClaimKind;
    use proptest::prelude::*;

    fn inputs(jd: FactorValue, verified: f64, completeness: f64, timeline: f64) -> AtsInputs {
        AtsInputs {
            jd_skill_match: jd,
            verified_claims: FactorValue::Measured(verified),
            resume_completeness: FactorValue::Measured(completeness),
            timeline_consistency: FactorValue::Measured(timeline),
        }
    }

    #[test]
    fn test_reference_scenario() {
        let calc = AtsCalculator::new(AtsWeights::default());
        let score = calc.calculate(&inputs(
            FactorValue::Measured(5.0 / 6.0 * 100.0),
            70.0,
            90.0,
            70.0,
        ));

        // (83.3 × 0.4) + (70 × 0.3) + (90 × 0.2) + (70 × 0.1)
        assert!((score.value - 79.333).abs() < 0.01);
        assert_eq!(score.rounded(), 79);
        assert_eq!(score.status, "Moderate Match");
        assert!(score.breakdown.reproduces(score.value));
    }

    #[test]
    fn test_jd_absent_redistributes() {
        let calc = AtsCalculator::new(AtsWeights::default());
        let score = calc.calculate(&inputs(FactorValue::omitted("no job description"), 100.0, 100.0, 100.0));

        assert_eq!(score.effective_weights.len(), 3);
        let sum: f64 = score.effective_weights.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!((score.effective_weights[&AtsFactor::VerifiedClaims] - 0.5).abs() < 1e-9);
        assert!((score.value - 100.0).abs() < 1e-9);

        let jd = score.breakdown.get("jd_skill_match").unwrap();
        assert!(is_omitted(jd));
        assert!(!score.formula.contains("JD Match"));
    }

    #[test]
    fn test_estimated_component_marked() {
        let calc = AtsCalculator::new(AtsWeights::default());
        let mut i = inputs(FactorValue::Measured(50.0), 50.0, 50.0, 0.0);
        i.timeline_consistency = FactorValue::estimated(100.0, "no dated entries");
        let score = calc.calculate(&i);

        let timeline = score.breakdown.get("timeline_consistency").unwrap();
        assert_eq!(timeline.status, ComponentStatus::Estimated);
        assert_eq!(timeline.raw_value, 100.0);
    }

    #[test]
    fn test_verified_claims_half_credit() {
        let t = Thresholds::default();
        let mut verified = Claim::new("a", ClaimKind::Skill, "Rust", "Rust");
        verified.record_evidence(EvidenceRecord::supports("github", "", 95), &t);
        let mut partial = Claim::new("b", ClaimKind::Skill, "Go", "Go");
        partial.record_evidence(EvidenceRecord::supports("tech_consistency", "", 72), &t);
        let unverified = Claim::new("c", ClaimKind::Skill, "Zig", "Zig");
        let soft = Claim::new("d", ClaimKind::Skill, "Leadership", "").non_verifiable();

        let value = AtsInputs::verified_claims_from(&[verified, partial, unverified, soft]);
        match value {
            FactorValue::Measured(v) => assert!((v - 37.5).abs() < 1e-9),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_soft_skills_count_against_verified_share() {
        let t = Thresholds::default();
        let mut claims: Vec<Claim> = (0..8)
            .map(|i| {
                let mut c = Claim::new(format!("s{}", i), ClaimKind::Skill, "Rust", "Rust");
                c.record_evidence(EvidenceRecord::supports("github", "", 95), &t);
                c
            })
            .collect();
        claims.push(Claim::new("soft0", ClaimKind::Skill, "Leadership", "Leadership").non_verifiable());
        claims.push(Claim::new("soft1", ClaimKind::Skill, "Teamwork", "Teamwork").non_verifiable());

        match AtsInputs::verified_claims_from(&claims) {
            FactorValue::Measured(v) => assert!((v - 80.0).abs() < 1e-9),
            other => panic!("unexpected {:?}", other),
        }
    }

    fn weights_strategy() -> impl Strategy<Value = AtsWeights> {
        proptest::collection::vec(0.0f64..1.0, 4).prop_filter_map("non-zero", |raw| {
            let sum: f64 = raw.iter().sum();
            (sum > 1e-3).then(|| AtsWeights {
                jd_skill_match: raw[0] / sum,
                verified_claims: raw[1] / sum,
                resume_completeness: raw[2] / sum,
                timeline_consistency: raw[3] / sum,
            })
        })
    }

    proptest! {
        #[test]
        fn prop_breakdown_sums_to_score(
            weights in weights_strategy(),
            values in proptest::collection::vec(0.0f64..=100.0, 4),
            jd_present in any::<bool>(),
        ) {
            let jd = if jd_present {
                FactorValue::Measured(values[0])
            } else {
                FactorValue::omitted("no job description")
            };
            let score = AtsCalculator::new(weights).calculate(&inputs(jd, values[1], values[2], values[3]));

            prop_assert!((0.0..=100.0).contains(&score.value));
            prop_assert!((score.breakdown.weighted_sum() - score.value).abs() <= 0.5);

            let weight_sum: f64 = score.effective_weights.values().sum();
            prop_assert!((weight_sum - 1.0).abs() < 1e-9);
            if !jd_present {
                prop_assert!(!score.effective_weights.contains_key(&AtsFactor::JdSkillMatch));
            }
        }
    }
}
