//! Claim model - the atomic verifiable assertion extracted from a resume.
//!
//! Claims are created by the external extraction step and enter the core
//! unverified. Only reconciliation may change their verification state, and
//! it does so by appending evidence; nothing is ever removed.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Thresholds;
use crate::evidence::EvidenceRecord;
use crate::extraction::patterns;
use crate::reconcile;
use crate::types::{ClaimKind, VerificationStatus};

/// Identifier assigned to a claim by the extraction step (e.g., "skill_0").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimId(String);

impl ClaimId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClaimId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ClaimId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Where in the resume a claim was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    /// Resume section (e.g., "skills", "experience")
    pub section: String,

    /// Byte offset of the start of the claim text
    pub start: usize,

    /// Byte offset one past the end of the claim text
    pub end: usize,
}

impl SourceSpan {
    pub fn new(section: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            section: section.into(),
            start,
            end,
        }
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}:{}]", self.section, self.start, self.end)
    }
}

fn default_verifiable() -> bool {
    true
}

/// An assertion made by the resume plus its verification state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claim {
    pub id: ClaimId,

    pub kind: ClaimKind,

    /// The assertion as written (e.g., "Proficient in Rust")
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_span: Option<SourceSpan>,

    /// The value being asserted (e.g., "Rust", "Acme Corp", "Kaggle Expert")
    #[serde(default)]
    pub claimed_value: String,

    /// False for claims no agent can check by design (soft skills)
    #[serde(default = "default_verifiable")]
    pub verifiable: bool,

    #[serde(default, skip_deserializing)]
    verification_status: VerificationStatus,

    #[serde(default, skip_deserializing)]
    confidence: u8,

    #[serde(default, skip_deserializing)]
    evidence: Vec<EvidenceRecord>,
}

impl Claim {
    /// Create an unverified claim with no evidence.
    pub fn new(
        id: impl Into<ClaimId>,
        kind: ClaimKind,
        text: impl Into<String>,
        claimed_value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            text: text.into(),
            source_span: None,
            claimed_value: claimed_value.into(),
            verifiable: true,
            verification_status: VerificationStatus::Unverified,
            confidence: 0,
            evidence: Vec::new(),
        }
    }

    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.source_span = Some(span);
        self
    }

    /// Mark the claim as not verifiable by design.
    pub fn non_verifiable(mut self) -> Self {
        self.verifiable = false;
        self
    }

    pub fn verification_status(&self) -> VerificationStatus {
        self.verification_status
    }

    pub fn confidence(&self) -> u8 {
        self.confidence
    }

    pub fn evidence(&self) -> &[EvidenceRecord] {
        &self.evidence
    }

    /// Append a record and recompute status and confidence.
    pub fn record_evidence(&mut self, record: EvidenceRecord, thresholds: &Thresholds) {
        self.evidence.push(record);
        self.refresh(thresholds);
    }

    /// Append several records, recomputing once.
    pub fn record_all(
        &mut self,
        records: impl IntoIterator<Item = EvidenceRecord>,
        thresholds: &Thresholds,
    ) {
        self.evidence.extend(records);
        self.refresh(thresholds);
    }

    /// The supporting record that sets the claim's confidence, if any.
    pub fn deciding_evidence(&self) -> Option<&EvidenceRecord> {
        reconcile::deciding_support(&self.evidence)
    }

    /// Whether any agent produced a supporting record.
    pub fn has_support(&self) -> bool {
        self.evidence.iter().any(EvidenceRecord::is_support)
    }

    /// The value used for matching: `claimed_value`, or the text when empty.
    pub fn subject(&self) -> &str {
        if self.claimed_value.trim().is_empty() {
            &self.text
        } else {
            &self.claimed_value
        }
    }

    /// Whether this is a metric claim about Kaggle standing.
    pub fn concerns_kaggle(&self) -> bool {
        self.kind == ClaimKind::Metric
            && (patterns::mentions_kaggle(&self.text) || patterns::mentions_kaggle(&self.claimed_value))
    }

    fn refresh(&mut self, thresholds: &Thresholds) {
        let (status, confidence) = reconcile::derive_status(&self.evidence, thresholds);
        self.verification_status = status;
        self.confidence = confidence;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claim_is_unverified() {
        let claim = Claim::new("skill_0", ClaimKind::Skill, "Proficient in Rust", "Rust");
        assert_eq!(claim.verification_status(), VerificationStatus::Unverified);
        assert_eq!(claim.confidence(), 0);
        assert!(claim.evidence().is_empty());
        assert!(claim.verifiable);
    }

    #[test]
    fn test_record_evidence_updates_status() {
        let thresholds = Thresholds::default();
        let mut claim = Claim::new("skill_0", ClaimKind::Skill, "Proficient in Rust", "Rust");

        claim.record_evidence(EvidenceRecord::supports("github", "3 repositories", 95), &thresholds);
        assert_eq!(claim.verification_status(), VerificationStatus::Verified);
        assert_eq!(claim.confidence(), 95);

        claim.record_evidence(EvidenceRecord::contradicts("linkedin", "conflict", 60), &thresholds);
        assert_eq!(claim.verification_status(), VerificationStatus::Contradicted);
        assert_eq!(claim.evidence().len(), 2);
    }

    #[test]
    fn test_deserialize_ignores_verification_state() {
        let json = r#"{
            "id": "skill_1",
            "kind": "skill",
            "text": "Proficient in Go",
            "claimed_value": "Go",
            "verification_status": "verified",
            "confidence": 99
        }"#;

        let claim: Claim = serde_json::from_str(json).unwrap();
        assert_eq!(claim.verification_status(), VerificationStatus::Unverified);
        assert_eq!(claim.confidence(), 0);
    }

    #[test]
    fn test_subject_falls_back_to_text() {
        let claim = Claim::new("m_0", ClaimKind::Metric, "Solved 500+ problems", "");
        assert_eq!(claim.subject(), "Solved 500+ problems");
    }

    #[test]
    fn test_span_display() {
        let span = SourceSpan::new("skills", 10, 14);
        assert_eq!(span.to_string(), "skills[10:14]");
    }
}
