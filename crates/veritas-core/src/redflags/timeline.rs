//! Timeline rules: overlapping roles and employment gaps.

use super::{FlagCategory, RedFlag, RedFlagRule, RuleContext, RuleError};
use crate::types::Severity;

/// One high-severity flag per pair of roles overlapping beyond tolerance.
pub struct TimelineOverlapRule;

impl TimelineOverlapRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TimelineOverlapRule {
    fn default() -> Self {
        Self::new()
    }
}

impl RedFlagRule for TimelineOverlapRule {
    fn category(&self) -> FlagCategory {
        FlagCategory::TimelineOverlap
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<RedFlag>, RuleError> {
        let timeline = ctx.timeline()?;

        let flags = timeline
            .overlaps
            .iter()
            .map(|overlap| {
                let related = [overlap.first_claim.clone(), overlap.second_claim.clone()]
                    .into_iter()
                    .flatten();

                let mut flag = RedFlag::new(
                    self.category(),
                    Severity::High,
                    format!(
                        "{} and {} overlap by {} months",
                        overlap.first_organization, overlap.second_organization, overlap.months
                    ),
                )
                .with_claims(related);

                for index in [overlap.first, overlap.second] {
                    if let Some(period) = timeline.entries.get(index).and_then(|e| e.period) {
                        flag = flag.with_evidence(format!(
                            "{}: {} to {}",
                            timeline.entries[index].organization, period.start, period.end
                        ));
                    }
                }
                flag
            })
            .collect();

        Ok(flags)
    }
}

/// One low-severity flag per gap beyond tolerance.
pub struct EmploymentGapRule;

impl EmploymentGapRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EmploymentGapRule {
    fn default() -> Self {
        Self::new()
    }
}

impl RedFlagRule for EmploymentGapRule {
    fn category(&self) -> FlagCategory {
        FlagCategory::EmploymentGap
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<RedFlag>, RuleError> {
        let timeline = ctx.timeline()?;

        let flags = timeline
            .gaps
            .iter()
            .map(|gap| {
                RedFlag::new(
                    self.category(),
                    Severity::Low,
                    format!("Unexplained {}-month gap between roles", gap.months),
                )
                .with_claims(gap.after_claim.clone())
                .with_evidence(format!("no role between {} and {}", gap.from, gap.to))
            })
            .collect();

        Ok(flags)
    }
}
