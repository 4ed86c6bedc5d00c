//! Shared vocabulary types for claims, evidence and findings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of assertion a claim makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimKind {
    Skill,
    Project,
    Experience,
    Education,
    Metric,
}

impl ClaimKind {
    pub const ALL: [ClaimKind; 5] = [
        ClaimKind::Skill,
        ClaimKind::Project,
        ClaimKind::Experience,
        ClaimKind::Education,
        ClaimKind::Metric,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimKind::Skill => "skill",
            ClaimKind::Project => "project",
            ClaimKind::Experience => "experience",
            ClaimKind::Education => "education",
            ClaimKind::Metric => "metric",
        }
    }
}

impl fmt::Display for ClaimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reconciled verification state of a claim.
///
/// Ordered from least to most trustworthy so that `Ord` follows the trust bands.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Contradicted,
    #[default]
    Unverified,
    PartiallyVerified,
    Verified,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Contradicted => "contradicted",
            VerificationStatus::Unverified => "unverified",
            VerificationStatus::PartiallyVerified => "partially_verified",
            VerificationStatus::Verified => "verified",
        }
    }

    /// Credit the claim earns towards the verified-claims ATS factor.
    pub fn verification_credit(&self) -> f64 {
        match self {
            VerificationStatus::Verified => 1.0,
            VerificationStatus::PartiallyVerified => 0.5,
            VerificationStatus::Unverified | VerificationStatus::Contradicted => 0.0,
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a single agent concluded about a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceOutcome {
    Supports,
    Contradicts,
    Inconclusive,
}

impl fmt::Display for EvidenceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvidenceOutcome::Supports => f.write_str("supports"),
            EvidenceOutcome::Contradicts => f.write_str("contradicts"),
            EvidenceOutcome::Inconclusive => f.write_str("inconclusive"),
        }
    }
}

/// Severity of a red flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => f.write_str("low"),
            Severity::Medium => f.write_str("medium"),
            Severity::High => f.write_str("high"),
        }
    }
}

/// Final hiring recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Strong,
    Moderate,
    Weak,
    NotRecommended,
}

impl Recommendation {
    pub fn headline(&self) -> &'static str {
        match self {
            Recommendation::Strong => "STRONG RECOMMEND - Proceed to interview",
            Recommendation::Moderate => "MODERATE RECOMMEND - Review before interview",
            Recommendation::Weak => "WEAK RECOMMEND - Conduct detailed verification",
            Recommendation::NotRecommended => "NOT RECOMMENDED - Consider rejection",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Strong => f.write_str("strong"),
            Recommendation::Moderate => f.write_str("moderate"),
            Recommendation::Weak => f.write_str("weak"),
            Recommendation::NotRecommended => f.write_str("not_recommended"),
        }
    }
}

/// External profile kinds a resume may link to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    Github,
    Kaggle,
    Linkedin,
}

impl LinkKind {
    pub fn label(&self) -> &'static str {
        match self {
            LinkKind::Github => "GitHub",
            LinkKind::Kaggle => "Kaggle",
            LinkKind::Linkedin => "LinkedIn",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_order_follows_trust() {
        assert!(VerificationStatus::Contradicted < VerificationStatus::Unverified);
        assert!(VerificationStatus::Unverified < VerificationStatus::PartiallyVerified);
        assert!(VerificationStatus::PartiallyVerified < VerificationStatus::Verified);
    }

    #[test]
    fn test_partial_counts_half() {
        assert_eq!(VerificationStatus::Verified.verification_credit(), 1.0);
        assert_eq!(VerificationStatus::PartiallyVerified.verification_credit(), 0.5);
        assert_eq!(VerificationStatus::Contradicted.verification_credit(), 0.0);
    }

    #[test]
    fn test_snake_case_serialization() {
        let json = serde_json::to_string(&VerificationStatus::PartiallyVerified).unwrap();
        assert_eq!(json, "\"partially_verified\"");

        let json = serde_json::to_string(&Recommendation::NotRecommended).unwrap();
        assert_eq!(json, "\"not_recommended\"");
    }
}
