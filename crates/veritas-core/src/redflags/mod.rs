//! Red flag detection.
//!
//! Deterministic predicates over the verified claim set and timeline data.
//! Every rule runs independently; a rule may fire several times (one flag per
//! rule-claim pair) and flags from different rules are never merged.
//!
//! A rule that cannot evaluate (e.g., timeline data missing) is recorded as
//! skipped and never aborts detection.

mod contradiction;
mod missing_link;
mod timeline;
mod unverified_rate;
mod unverified_skill;

pub use contradiction::ContradictedClaimRule;
pub use missing_link::MissingExternalLinkRule;
pub use timeline::{EmploymentGapRule, TimelineOverlapRule};
pub use unverified_rate::HighUnverifiedRateRule;
pub use unverified_skill::UnverifiedSkillRule;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::claim::{Claim, ClaimId};
use crate::extraction::ResumeProfile;
use crate::timeline::TimelineReport;
use crate::types::Severity;

/// Errors a rule may return instead of flags.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("Missing input: {0}")]
    MissingInput(&'static str),

    #[error("Rule evaluation failed: {0}")]
    Failed(String),
}

/// What a flag is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagCategory {
    UnverifiedSkill,
    TimelineOverlap,
    ContradictedClaim,
    MissingExternalLink,
    HighUnverifiedRate,
    EmploymentGap,
}

impl FlagCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagCategory::UnverifiedSkill => "unverified_skill",
            FlagCategory::TimelineOverlap => "timeline_overlap",
            FlagCategory::ContradictedClaim => "contradicted_claim",
            FlagCategory::MissingExternalLink => "missing_external_link",
            FlagCategory::HighUnverifiedRate => "high_unverified_rate",
            FlagCategory::EmploymentGap => "employment_gap",
        }
    }
}

impl fmt::Display for FlagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A severity-tagged finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedFlag {
    pub category: FlagCategory,
    pub severity: Severity,
    pub description: String,
    pub related_claim_ids: Vec<ClaimId>,
    #[serde(default)]
    pub evidence: Vec<String>,
}

impl RedFlag {
    pub fn new(category: FlagCategory, severity: Severity, description: impl Into<String>) -> Self {
        Self {
            category,
            severity,
            description: description.into(),
            related_claim_ids: Vec::new(),
            evidence: Vec::new(),
        }
    }

    pub fn with_claims(mut self, ids: impl IntoIterator<Item = ClaimId>) -> Self {
        self.related_claim_ids.extend(ids);
        self
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence.push(evidence.into());
        self
    }
}

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub claims: &'a [Claim],
    pub profile: &'a ResumeProfile,

    /// Absent when the timeline stage failed
    pub timeline: Option<&'a TimelineReport>,
}

impl<'a> RuleContext<'a> {
    pub fn new(claims: &'a [Claim], profile: &'a ResumeProfile) -> Self {
        Self {
            claims,
            profile,
            timeline: None,
        }
    }

    pub fn with_timeline(mut self, timeline: &'a TimelineReport) -> Self {
        self.timeline = Some(timeline);
        self
    }

    pub fn timeline(&self) -> Result<&'a TimelineReport, RuleError> {
        self.timeline.ok_or(RuleError::MissingInput("timeline report"))
    }
}

/// A deterministic red-flag predicate.
pub trait RedFlagRule: Send + Sync {
    fn category(&self) -> FlagCategory;

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<RedFlag>, RuleError>;
}

/// A rule that could not be evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRule {
    pub category: FlagCategory,
    pub reason: String,
}

/// Flags from all rules, in rule order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RedFlagReport {
    pub flags: Vec<RedFlag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_rules: Vec<SkippedRule>,
}

impl RedFlagReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.flags.iter().filter(|f| f.severity == severity).count()
    }

    pub fn of(&self, category: FlagCategory) -> impl Iterator<Item = &RedFlag> {
        self.flags.iter().filter(move |f| f.category == category)
    }
}

/// Runs the configured rules.
pub struct RedFlagDetector {
    rules: Vec<Box<dyn RedFlagRule>>,
}

impl RedFlagDetector {
    /// Detector with every built-in rule.
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(UnverifiedSkillRule::new()),
                Box::new(TimelineOverlapRule::new()),
                Box::new(ContradictedClaimRule::new()),
                Box::new(MissingExternalLinkRule::new()),
                Box::new(HighUnverifiedRateRule::new()),
                Box::new(EmploymentGapRule::new()),
            ],
        }
    }

    pub fn with_rules(rules: Vec<Box<dyn RedFlagRule>>) -> Self {
        Self { rules }
    }

    pub fn detect(&self, ctx: &RuleContext<'_>) -> RedFlagReport {
        let mut report = RedFlagReport::default();

        for rule in &self.rules {
            match rule.evaluate(ctx) {
                Ok(flags) => {
                    if !flags.is_empty() {
                        tracing::debug!(rule = %rule.category(), flags = flags.len(), "rule fired");
                    }
                    report.flags.extend(flags);
                }
                Err(e) => {
                    tracing::warn!(rule = %rule.category(), error = %e, "red flag rule skipped");
                    report.skipped_rules.push(SkippedRule {
                        category: rule.category(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        report
    }
}

impl Default for RedFlagDetector {
    fn default() -> Self {
        Self::new()
    }
}
