//! # veritas-core
//!
//! Deterministic claim reconciliation, scoring and red-flag engine for resume
//! verification.
//!
//! This crate answers, for one resume and an optional job description:
//! - Which claims are backed by third-party evidence?
//! - How well does the candidate fit the role?
//! - What looks wrong?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: same claims and agent results always produce the same report
//! 2. **Order-independent merge**: agent completion order never changes a claim's status
//! 3. **Explainable**: every composite score carries a breakdown that reproduces it
//! 4. **Degrades, never aborts**: only zero claims or invalid configuration are fatal
//!
//! Network-bound verification agents live in `veritas-runtime`; this crate
//! consumes their typed [`VerificationResult`]s.
//!
//! ## Example
//!
//! ```rust,ignore
//! use veritas_core::{analyze, ExtractionResult, JdInput, ScoringConfig, YearMonth};
//!
//! let extraction = ExtractionResult::from_json_file("resume.json")?;
//! let config = ScoringConfig::from_file("veritas.yaml")?;
//! let report = analyze(extraction, JdInput::Absent, results, &config, YearMonth::now())?;
//!
//! println!("{} (ATS {}, trust {})", report.recommendation, report.ats_score.value, report.trust_score);
//! ```

pub mod claim;
pub mod config;
pub mod consistency;
pub mod evidence;
pub mod extraction;
pub mod reconcile;
pub mod redflags;
pub mod report;
pub mod scoring;
pub mod session;
pub mod skills;
pub mod summary;
pub mod timeline;
pub mod types;

use thiserror::Error;

// Re-export main types at crate root
pub use claim::{Claim, ClaimId, SourceSpan};
pub use config::{
    AtsFactor, AtsWeights, ConfigError, ScoringConfig, Thresholds, TimelineTolerance,
};
pub use consistency::{check_consistency, TechConsistencyReport};
pub use evidence::{EvidenceBuilder, EvidenceRecord};
pub use extraction::{
    ExperienceEntry, ExtractionError, ExtractionResult, JobDescription, ProfileLinks,
    ResumeProfile,
};
pub use reconcile::{apply_results, derive_status, VerificationResult};
pub use redflags::{FlagCategory, RedFlag, RedFlagDetector, RedFlagReport, RedFlagRule};
pub use report::Report;
pub use scoring::{
    AtsCalculator, AtsScore, ComponentStatus, ScoreBreakdown, ScoreComponent, TrustScore,
    TrustScorer,
};
pub use session::{AnalysisSession, JdInput, Stage, StageOutcome};
pub use summary::{ExecutiveSummary, Summarizer};
pub use timeline::{TimelineReport, TimelineValidator, YearMonth};
pub use types::{
    ClaimKind, EvidenceOutcome, LinkKind, Recommendation, Severity, VerificationStatus,
};

/// Failures surfaced to the caller. Everything else degrades the session.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No claims extracted from resume")]
    NoClaimsExtracted,

    #[error("Invalid ATS weight configuration: weights sum to {sum:.6}, expected 1.0")]
    InvalidWeightConfiguration { sum: f64 },

    #[error("Configuration error: {0}")]
    Config(ConfigError),

    #[error("Extraction input error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Session incomplete: stage {0} has not run")]
    SessionIncomplete(Stage),
}

impl From<ConfigError> for AnalysisError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::InvalidWeights { sum } => AnalysisError::InvalidWeightConfiguration { sum },
            other => AnalysisError::Config(other),
        }
    }
}

/// Run every stage after verification over already-collected agent results.
///
/// This is the synchronous path: agent results are supplied by the caller
/// (e.g. replayed from a previous run). The async pipeline in
/// `veritas-runtime` drives the same session stages around live agents.
pub fn analyze(
    extraction: ExtractionResult,
    jd: JdInput,
    results: Vec<VerificationResult>,
    config: &ScoringConfig,
    as_of: YearMonth,
) -> Result<Report, AnalysisError> {
    config.validate()?;

    let mut session = AnalysisSession::open(extraction, jd)?;
    session.run_skill_matcher();
    session.apply_verification(results, config);
    session.finalize(config, as_of);

    Report::from_session(&session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{Contact, ProfileLinks};
    use std::collections::{BTreeMap, BTreeSet};

    fn ids(values: &[&str]) -> BTreeSet<ClaimId> {
        values.iter().map(|v| ClaimId::new(*v)).collect()
    }

    #[test]
    fn test_zero_claims_produces_no_report() {
        let extraction = ExtractionResult::new("empty", vec![], ResumeProfile::default());
        let err = analyze(
            extraction,
            JdInput::Absent,
            vec![],
            &ScoringConfig::default(),
            YearMonth::new(2025, 1).unwrap(),
        )
        .unwrap_err();

        assert!(matches!(err, AnalysisError::NoClaimsExtracted));
    }

    #[test]
    fn test_invalid_weights_are_fatal() {
        let mut config = ScoringConfig::default();
        config.ats_weights.jd_skill_match = 0.9;

        let extraction = ExtractionResult::new(
            "r",
            vec![Claim::new("s0", ClaimKind::Skill, "Rust", "Rust")],
            ResumeProfile::default(),
        );
        let err = analyze(extraction, JdInput::Absent, vec![], &config, YearMonth::new(2025, 1).unwrap())
            .unwrap_err();

        assert!(matches!(err, AnalysisError::InvalidWeightConfiguration { .. }));
    }

    #[test]
    fn test_contradiction_drives_report() {
        let claims = vec![
            Claim::new("p0", ClaimKind::Project, "Built ray tracer", "raytracer"),
            Claim::new("s0", ClaimKind::Skill, "Rust", "Rust"),
        ];
        let profile = ResumeProfile {
            skills: vec!["Rust".to_string()],
            links: ProfileLinks {
                github: Some("https://github.com/jane".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let mut outcomes = BTreeMap::new();
        outcomes.insert(
            ClaimId::new("p0"),
            EvidenceRecord::contradicts("github", "no repository matches 'raytracer'", 90),
        );
        outcomes.insert(
            ClaimId::new("s0"),
            EvidenceRecord::supports("github", "Rust used in 3 repositories", 95),
        );
        let results = vec![VerificationResult::completed("github", ids(&["p0", "s0"]), outcomes)];

        let jd = JobDescription {
            title: Some("Systems Engineer".to_string()),
            required_skills: vec!["Rust".to_string(), "Go".to_string()],
            preferred_skills: vec![],
        };

        let report = analyze(
            ExtractionResult::new("jane", claims, profile),
            JdInput::Extracted(jd),
            results,
            &ScoringConfig::default(),
            YearMonth::new(2025, 1).unwrap(),
        )
        .unwrap();

        assert_eq!(report.verification_summary.contradicted, 1);
        assert_eq!(report.verification_summary.verified, 1);
        assert!(report
            .red_flags
            .iter()
            .any(|f| f.category == FlagCategory::ContradictedClaim && f.severity == Severity::High));
        assert_eq!(report.ats_score.breakdown["jd_skill_match"].percentage, 50.0);
        assert_ne!(report.recommendation, Recommendation::Strong);
    }

    #[test]
    fn test_ats_breakdown_for_full_scenario() {
        let skills = [
            "Rust", "JavaScript", "PostgreSQL", "Docker", "Kubernetes", "Python", "Terraform", "Ansible",
        ];
        let mut claims: Vec<Claim> = skills
            .iter()
            .enumerate()
            .map(|(i, skill)| Claim::new(format!("s{}", i), ClaimKind::Skill, *skill, *skill))
            .collect();
        claims.push(Claim::new("p0", ClaimKind::Project, "Built a ray tracer", "raytracer"));
        claims.push(Claim::new("e0", ClaimKind::Experience, "Backend Engineer at Acme", "Acme"));

        let job = |organization: &str, start: &str, end: &str| ExperienceEntry {
            organization: organization.to_string(),
            start: Some(start.to_string()),
            end: Some(end.to_string()),
            ..Default::default()
        };
        let profile = ResumeProfile {
            contact: Contact {
                email: Some("jane@example.com".to_string()),
                ..Default::default()
            },
            experience: vec![job("Initech", "2019-01", "2021-12"), job("Acme", "2022-01", "2024-12")],
            skills: skills.iter().map(|s| s.to_string()).collect(),
            links: ProfileLinks {
                github: Some("https://github.com/jane".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        // six verified, two partial, the project contradicted, the role unverified
        let mut outcomes = BTreeMap::new();
        for i in 0..6 {
            outcomes.insert(
                ClaimId::new(format!("s{}", i)),
                EvidenceRecord::supports("github", "language found in repositories", 95),
            );
        }
        for i in 6..8 {
            outcomes.insert(
                ClaimId::new(format!("s{}", i)),
                EvidenceRecord::supports("github", "mentioned in one README", 72),
            );
        }
        outcomes.insert(
            ClaimId::new("p0"),
            EvidenceRecord::contradicts("github", "no repository matches 'raytracer'", 90),
        );
        let addressed = outcomes.keys().cloned().collect();
        let results = vec![VerificationResult::completed("github", addressed, outcomes)];

        let jd = JobDescription {
            title: Some("Platform Engineer".to_string()),
            required_skills: ["Rust", "JavaScript", "PostgreSQL", "Docker", "Kubernetes", "Haskell"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            preferred_skills: vec![],
        };

        let report = analyze(
            ExtractionResult::new("jane", claims, profile),
            JdInput::Extracted(jd),
            results,
            &ScoringConfig::default(),
            YearMonth::new(2025, 1).unwrap(),
        )
        .unwrap();

        let summary = &report.verification_summary;
        assert_eq!(summary.total_claims, 10);
        assert_eq!(summary.verified, 6);
        assert_eq!(summary.partially_verified, 2);
        assert_eq!(summary.contradicted, 1);
        assert_eq!(summary.unverified, 1);

        let factor = |name: &str| &report.ats_score.breakdown[name];
        assert_eq!(factor("jd_skill_match").percentage, 83.3);
        assert_eq!(factor("verified_claims").percentage, 70.0);
        assert_eq!(factor("resume_completeness").percentage, 85.0);
        assert_eq!(factor("timeline_consistency").percentage, 100.0);
        for name in ["jd_skill_match", "verified_claims", "resume_completeness", "timeline_consistency"] {
            assert_eq!(factor(name).status, ComponentStatus::Measured);
        }

        // 0.4 * 83.33 + 0.3 * 70 + 0.2 * 85 + 0.1 * 100 = 81.33
        let composite: f64 = report
            .ats_score
            .breakdown
            .values()
            .map(|f| f.weighted_contribution)
            .sum();
        assert!((composite - 81.3).abs() < 0.15);
        assert_eq!(report.ats_score.value, 81);
    }
}
