//! Executive summary: folds scores and flags into a recommendation.
//!
//! The rules are fixed and evaluated top to bottom:
//! 1. ATS ≥ 80, trust ≥ 85 and no high-severity flag → strong
//! 2. ATS ≥ 60, trust ≥ 70 and at most one high-severity flag → moderate
//! 3. ATS ≥ 40 or trust ≥ 50 → weak
//! 4. Otherwise → not recommended
//!
//! Scores are compared as the integers published in the report so that the
//! recommendation always agrees with the numbers a reader sees.

use serde::{Deserialize, Serialize};

use crate::redflags::RedFlagReport;
use crate::types::{Recommendation, Severity};

/// Final recommendation with its reasoning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub recommendation: Recommendation,
    pub headline: String,
    pub reasoning: String,
    pub ats_score: u8,
    pub trust_score: u8,
    pub red_flags_count: usize,
    pub high_severity_flags: usize,
}

/// Builds the executive summary.
pub struct Summarizer;

impl Summarizer {
    pub fn new() -> Self {
        Self
    }

    pub fn summarize(&self, ats_score: u8, trust_score: u8, flags: &RedFlagReport) -> ExecutiveSummary {
        let high = flags.count(Severity::High);
        let recommendation = self.recommend(ats_score, trust_score, high);
        let reasoning = self.build_reasoning(recommendation, ats_score, trust_score, flags);

        tracing::info!(
            recommendation = %recommendation,
            ats = ats_score,
            trust = trust_score,
            high_flags = high,
            "executive summary"
        );

        ExecutiveSummary {
            recommendation,
            headline: recommendation.headline().to_string(),
            reasoning,
            ats_score,
            trust_score,
            red_flags_count: flags.flags.len(),
            high_severity_flags: high,
        }
    }

    pub fn recommend(&self, ats: u8, trust: u8, high_severity_flags: usize) -> Recommendation {
        if ats >= 80 && trust >= 85 && high_severity_flags == 0 {
            Recommendation::Strong
        } else if ats >= 60 && trust >= 70 && high_severity_flags <= 1 {
            Recommendation::Moderate
        } else if ats >= 40 || trust >= 50 {
            Recommendation::Weak
        } else {
            Recommendation::NotRecommended
        }
    }

    fn build_reasoning(
        &self,
        recommendation: Recommendation,
        ats: u8,
        trust: u8,
        flags: &RedFlagReport,
    ) -> String {
        let mut reasoning = match recommendation {
            Recommendation::Strong => {
                "Excellent ATS match, high trust score, and no major red flags.".to_string()
            }
            Recommendation::Moderate => {
                "Good ATS match with minor concerns. Recommend additional verification during interview."
                    .to_string()
            }
            Recommendation::Weak => {
                "Moderate fit with several verification concerns. Additional scrutiny recommended."
                    .to_string()
            }
            Recommendation::NotRecommended => {
                "Poor ATS match and/or low trust score.".to_string()
            }
        };

        reasoning.push_str(&format!(" ATS {} / trust {}.", ats, trust));

        let high = flags.count(Severity::High);
        if high > 0 {
            reasoning.push_str(&format!(" {} high-severity red flag(s)", high));
            let categories: Vec<&str> = flags
                .flags
                .iter()
                .filter(|f| f.severity == Severity::High)
                .map(|f| f.category.as_str())
                .fold(Vec::new(), |mut acc, c| {
                    if !acc.contains(&c) {
                        acc.push(c);
                    }
                    acc
                });
            reasoning.push_str(&format!(": {}.", categories.join(", ")));
        }

        if !flags.skipped_rules.is_empty() {
            reasoning.push_str(&format!(
                " {} red-flag rule(s) could not be evaluated.",
                flags.skipped_rules.len()
            ));
        }

        reasoning
    }
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::new()
    }
}
