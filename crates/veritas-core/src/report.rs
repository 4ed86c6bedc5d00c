//! The externally visible analysis report.
//!
//! The JSON shape is consumed unaltered by the CLI and dashboard:
//!
//! ```json
//! {
//!   "recommendation": "moderate",
//!   "trust_score": 72,
//!   "ats_score": {
//!     "value": 79,
//!     "status": "Moderate Match",
//!     "breakdown": {
//!       "jd_skill_match": { "percentage": 83.3, "weight": 0.4, "weighted_contribution": 33.3 }
//!     }
//!   },
//!   "red_flags": [],
//!   "verification_summary": { "verified": 7, "unverified": 2, "contradicted": 1 }
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::claim::ClaimId;
use crate::consistency::TechConsistencyReport;
use crate::evidence::EvidenceRecord;
use crate::redflags::{RedFlag, SkippedRule};
use crate::scoring::{ComponentStatus, ProfileSection, SkillMatch};
use crate::session::{AnalysisSession, Stage, StageRecord};
use crate::timeline::TimelineReport;
use crate::types::{ClaimKind, Recommendation, VerificationStatus};
use crate::AnalysisError;

/// One ATS factor as published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorReport {
    pub percentage: f64,
    pub weight: f64,
    pub weighted_contribution: f64,
    #[serde(default)]
    pub status: ComponentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsReport {
    pub value: u8,
    pub status: String,
    pub breakdown: BTreeMap<String, FactorReport>,
    pub formula: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSummary {
    pub name: String,
    pub claims_addressed: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimSummary {
    pub id: ClaimId,
    pub kind: ClaimKind,
    pub text: String,
    pub status: VerificationStatus,
    pub confidence: u8,
    pub verifiable: bool,
    pub evidence: Vec<EvidenceRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VerificationSummary {
    pub total_claims: usize,
    pub verified: usize,
    pub partially_verified: usize,
    pub unverified: usize,
    pub contradicted: usize,
    pub non_verifiable: usize,
    pub agents: Vec<AgentSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_consistency: Option<TechConsistencyReport>,
    pub claims: Vec<ClaimSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletenessReport {
    pub percentage: f64,
    pub missing_sections: Vec<ProfileSection>,
}

/// Final artifact of one analysis session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub resume_id: String,
    pub generated_at: DateTime<Utc>,
    pub recommendation: Recommendation,
    pub headline: String,
    pub reasoning: String,
    pub trust_score: u8,
    pub trust_label: String,
    pub ats_score: AtsReport,
    pub red_flags: Vec<RedFlag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_rules: Vec<SkippedRule>,
    pub verification_summary: VerificationSummary,
    pub completeness: CompletenessReport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_match: Option<SkillMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<TimelineReport>,
    pub stages: Vec<StageRecord>,
}

impl Report {
    /// Assemble the report from a finalised session.
    pub fn from_session(session: &AnalysisSession) -> Result<Self, AnalysisError> {
        let summary = session
            .summary()
            .ok_or(AnalysisError::SessionIncomplete(Stage::ExecutiveSummary))?;
        let ats = session
            .ats()
            .ok_or(AnalysisError::SessionIncomplete(Stage::AtsCalculator))?;
        let trust = session
            .trust()
            .ok_or(AnalysisError::SessionIncomplete(Stage::TrustScorer))?;
        let completeness = session
            .completeness()
            .ok_or(AnalysisError::SessionIncomplete(Stage::CompletenessScorer))?;

        let breakdown = ats
            .breakdown
            .components
            .iter()
            .map(|(name, c)| {
                (
                    name.clone(),
                    FactorReport {
                        percentage: round1(c.raw_value),
                        weight: round3(c.weight),
                        weighted_contribution: round1(c.weighted_contribution),
                        status: c.status,
                        note: c.note.clone(),
                    },
                )
            })
            .collect();

        Ok(Self {
            resume_id: session.resume_id().to_string(),
            generated_at: Utc::now(),
            recommendation: summary.recommendation,
            headline: summary.headline.clone(),
            reasoning: summary.reasoning.clone(),
            trust_score: summary.trust_score,
            trust_label: trust.label.clone(),
            ats_score: AtsReport {
                value: summary.ats_score,
                status: ats.status.clone(),
                breakdown,
                formula: ats.formula.clone(),
            },
            red_flags: session.red_flags().flags.clone(),
            skipped_rules: session.red_flags().skipped_rules.clone(),
            verification_summary: verification_summary(session),
            completeness: CompletenessReport {
                percentage: round1(completeness.score),
                missing_sections: completeness.missing_sections.clone(),
            },
            skill_match: session.skill_match().cloned(),
            timeline: session.timeline().cloned(),
            stages: session.stages().to_vec(),
        })
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn verification_summary(session: &AnalysisSession) -> VerificationSummary {
    let mut summary = VerificationSummary {
        total_claims: session.claims().len(),
        tech_consistency: session.tech_consistency().cloned(),
        ..Default::default()
    };

    for claim in session.claims() {
        if !claim.verifiable {
            summary.non_verifiable += 1;
        } else {
            match claim.verification_status() {
                VerificationStatus::Verified => summary.verified += 1,
                VerificationStatus::PartiallyVerified => summary.partially_verified += 1,
                VerificationStatus::Unverified => summary.unverified += 1,
                VerificationStatus::Contradicted => summary.contradicted += 1,
            }
        }

        summary.claims.push(ClaimSummary {
            id: claim.id.clone(),
            kind: claim.kind,
            text: claim.text.clone(),
            status: claim.verification_status(),
            confidence: claim.confidence(),
            verifiable: claim.verifiable,
            evidence: claim.evidence().to_vec(),
        });
    }

    summary.agents = session
        .results()
        .iter()
        .map(|r| AgentSummary {
            name: r.agent_name.clone(),
            claims_addressed: r.claims_addressed.len(),
            error: r.agent_error.clone(),
        })
        .collect();

    summary
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::Claim;
    use crate::config::ScoringConfig;
    use crate::extraction::{ExtractionResult, ResumeProfile};
    use crate::reconcile::VerificationResult;
    use crate::session::JdInput;
    use crate::timeline::YearMonth;

    fn finalised() -> AnalysisSession {
        let claims = vec![
            Claim::new("s0", ClaimKind::Skill, "Rust", "Rust"),
            Claim::new("s1", ClaimKind::Skill, "Teamwork", "Teamwork").non_verifiable(),
        ];
        let config = ScoringConfig::default();
        let mut session = AnalysisSession::open(
            ExtractionResult::new("resume-7", claims, ResumeProfile::default()),
            JdInput::Absent,
        )
        .unwrap();

        session.run_skill_matcher();
        let failed = VerificationResult::failed(
            "github",
            [ClaimId::new("s0")].into_iter().collect(),
            "timed out after 10s",
        );
        session.apply_verification(vec![failed], &config);
        session.finalize(&config, YearMonth::new(2025, 6).unwrap());
        session
    }

    #[test]
    fn test_report_requires_finalised_session() {
        let session = AnalysisSession::open(
            ExtractionResult::new(
                "r",
                vec![Claim::new("s0", ClaimKind::Skill, "Rust", "Rust")],
                ResumeProfile::default(),
            ),
            JdInput::Absent,
        )
        .unwrap();

        let err = Report::from_session(&session).unwrap_err();
        assert!(matches!(err, AnalysisError::SessionIncomplete(Stage::ExecutiveSummary)));
    }

    #[test]
    fn test_degraded_session_still_reports() {
        let report = Report::from_session(&finalised()).unwrap();

        assert_eq!(report.resume_id, "resume-7");
        assert_eq!(report.verification_summary.total_claims, 2);
        assert_eq!(report.verification_summary.unverified, 1);
        assert_eq!(report.verification_summary.non_verifiable, 1);
        assert_eq!(report.verification_summary.agents.len(), 1);
        assert!(report.verification_summary.agents[0].error.is_some());

        let jd = &report.ats_score.breakdown["jd_skill_match"];
        assert_eq!(jd.status, ComponentStatus::Omitted);
        assert_eq!(jd.weight, 0.0);
    }

    #[test]
    fn test_report_json_shape() {
        let report = Report::from_session(&finalised()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();

        assert!(value["recommendation"].is_string());
        assert!(value["trust_score"].is_u64());
        assert!(value["ats_score"]["value"].is_u64());
        let completeness = &value["ats_score"]["breakdown"]["resume_completeness"];
        assert!(completeness["percentage"].is_number());
        assert!(completeness["weight"].is_number());
        assert!(completeness["weighted_contribution"].is_number());
        assert!(value["red_flags"].is_array());
        assert!(value["verification_summary"]["claims"].is_array());
    }
}
