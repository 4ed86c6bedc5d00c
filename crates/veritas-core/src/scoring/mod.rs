//! Scoring engine.
//!
//! Every scorer is a pure function over the finalised claim set (plus profile
//! or JD data) returning a value in [0, 100] and a [`ScoreBreakdown`] whose
//! weighted contributions sum to that value.

mod ats;
mod completeness;
mod skill_match;
mod trust;

pub use ats::{ats_status, is_omitted, AtsCalculator, AtsInputs, AtsScore, FactorValue};
pub use completeness::{score_completeness, CompletenessScore, ProfileSection};
pub use skill_match::{match_skills, MatchedSkill, SkillMatch, SkillSource};
pub use trust::{claim_trust, trust_label, TrustScore, TrustScorer};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum allowed difference between a composite and its breakdown sum.
pub const BREAKDOWN_TOLERANCE: f64 = 0.5;

/// How a component's value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    #[default]
    Measured,
    /// Value assumed rather than measured (e.g., no dated entries)
    Estimated,
    /// Factor excluded; its weight was redistributed
    Omitted,
}

/// One line of a score breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub raw_value: f64,
    pub weight: f64,
    pub weighted_contribution: f64,
    #[serde(default)]
    pub status: ComponentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ScoreComponent {
    pub fn measured(raw_value: f64, weight: f64) -> Self {
        Self {
            raw_value,
            weight,
            weighted_contribution: raw_value * weight,
            status: ComponentStatus::Measured,
            note: None,
        }
    }

    pub fn estimated(raw_value: f64, weight: f64, note: impl Into<String>) -> Self {
        Self {
            status: ComponentStatus::Estimated,
            note: Some(note.into()),
            ..Self::measured(raw_value, weight)
        }
    }

    pub fn omitted(note: impl Into<String>) -> Self {
        Self {
            raw_value: 0.0,
            weight: 0.0,
            weighted_contribution: 0.0,
            status: ComponentStatus::Omitted,
            note: Some(note.into()),
        }
    }
}

/// Named components of a composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ScoreBreakdown {
    pub components: BTreeMap<String, ScoreComponent>,
}

impl ScoreBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, component: ScoreComponent) {
        self.components.insert(name.into(), component);
    }

    pub fn get(&self, name: &str) -> Option<&ScoreComponent> {
        self.components.get(name)
    }

    /// Sum of weighted contributions.
    pub fn weighted_sum(&self) -> f64 {
        self.components.values().map(|c| c.weighted_contribution).sum()
    }

    /// Sum of the weights of non-omitted components.
    pub fn active_weight(&self) -> f64 {
        self.components
            .values()
            .filter(|c| c.status != ComponentStatus::Omitted)
            .map(|c| c.weight)
            .sum()
    }

    /// Whether the breakdown reproduces `total` within tolerance.
    pub fn reproduces(&self, total: f64) -> bool {
        (self.weighted_sum() - total).abs() <= BREAKDOWN_TOLERANCE
    }
}

/// Round to one decimal place for display.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_sum() {
        let mut breakdown = ScoreBreakdown::new();
        breakdown.insert("a", ScoreComponent::measured(80.0, 0.5));
        breakdown.insert("b", ScoreComponent::measured(60.0, 0.5));
        breakdown.insert("c", ScoreComponent::omitted("not supplied"));

        assert_eq!(breakdown.weighted_sum(), 70.0);
        assert_eq!(breakdown.active_weight(), 1.0);
        assert!(breakdown.reproduces(70.4));
        assert!(!breakdown.reproduces(71.0));
    }

    #[test]
    fn test_clamp_and_round() {
        assert_eq!(clamp_score(120.0), 100.0);
        assert_eq!(clamp_score(f64::NAN), 0.0);
        assert_eq!(round1(79.26), 79.3);
    }
}
