//! Scoring configuration.
//!
//! Configuration is immutable after construction and passed explicitly to the
//! reconciler and scorers. It is validated once, at load time; an invalid
//! weight table is fatal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Tolerance used when checking that the ATS weights sum to 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Errors that can occur when loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("ATS weights must sum to 1.0 (got {sum:.6})")]
    InvalidWeights { sum: f64 },

    #[error("Weight for {factor} must be non-negative (got {value})")]
    NegativeWeight { factor: AtsFactor, value: f64 },

    #[error("Thresholds must satisfy 0 <= partial ({partial}) <= verified ({verified}) <= 100")]
    InvalidThresholds { verified: u8, partial: u8 },
}

/// The four factors of the ATS composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtsFactor {
    JdSkillMatch,
    VerifiedClaims,
    ResumeCompleteness,
    TimelineConsistency,
}

impl AtsFactor {
    pub const ALL: [AtsFactor; 4] = [
        AtsFactor::JdSkillMatch,
        AtsFactor::VerifiedClaims,
        AtsFactor::ResumeCompleteness,
        AtsFactor::TimelineConsistency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AtsFactor::JdSkillMatch => "jd_skill_match",
            AtsFactor::VerifiedClaims => "verified_claims",
            AtsFactor::ResumeCompleteness => "resume_completeness",
            AtsFactor::TimelineConsistency => "timeline_consistency",
        }
    }

    /// Short label used in the human-readable formula.
    pub fn label(&self) -> &'static str {
        match self {
            AtsFactor::JdSkillMatch => "JD Match",
            AtsFactor::VerifiedClaims => "Verified Claims",
            AtsFactor::ResumeCompleteness => "Completeness",
            AtsFactor::TimelineConsistency => "Timeline",
        }
    }
}

impl fmt::Display for AtsFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed weights of the ATS composite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AtsWeights {
    #[serde(alias = "JD_SKILL_MATCH", alias = "jd_match")]
    pub jd_skill_match: f64,

    #[serde(alias = "VERIFIED_CLAIMS")]
    pub verified_claims: f64,

    #[serde(alias = "RESUME_COMPLETENESS", alias = "completeness")]
    pub resume_completeness: f64,

    #[serde(alias = "TIMELINE_CONSISTENCY", alias = "timeline")]
    pub timeline_consistency: f64,
}

impl Default for AtsWeights {
    fn default() -> Self {
        Self {
            jd_skill_match: 0.4,
            verified_claims: 0.3,
            resume_completeness: 0.2,
            timeline_consistency: 0.1,
        }
    }
}

impl AtsWeights {
    pub fn weight(&self, factor: AtsFactor) -> f64 {
        match factor {
            AtsFactor::JdSkillMatch => self.jd_skill_match,
            AtsFactor::VerifiedClaims => self.verified_claims,
            AtsFactor::ResumeCompleteness => self.resume_completeness,
            AtsFactor::TimelineConsistency => self.timeline_consistency,
        }
    }

    pub fn sum(&self) -> f64 {
        AtsFactor::ALL.iter().map(|f| self.weight(*f)).sum()
    }

    /// Check that every weight is non-negative and the total is 1.0.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for factor in AtsFactor::ALL {
            let value = self.weight(factor);
            if !(value >= 0.0) {
                return Err(ConfigError::NegativeWeight { factor, value });
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::InvalidWeights { sum });
        }

        Ok(())
    }
}

/// Verification thresholds used by the merge rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Minimum supporting confidence for `verified`
    pub verified: u8,

    /// Minimum supporting confidence for `partially_verified`
    pub partial: u8,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            verified: 85,
            partial: 70,
        }
    }
}

/// Tolerances applied by the timeline validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineTolerance {
    /// Overlap between two entries tolerated before it counts as a conflict
    #[serde(default = "default_overlap_tolerance")]
    pub overlap_tolerance_months: u32,

    /// Gap between consecutive entries tolerated before it counts as a conflict
    #[serde(default = "default_gap_tolerance")]
    pub gap_tolerance_months: u32,
}

fn default_overlap_tolerance() -> u32 {
    1
}

fn default_gap_tolerance() -> u32 {
    6
}

impl Default for TimelineTolerance {
    fn default() -> Self {
        Self {
            overlap_tolerance_months: default_overlap_tolerance(),
            gap_tolerance_months: default_gap_tolerance(),
        }
    }
}

fn default_verified_threshold() -> u8 {
    85
}

fn default_partial_threshold() -> u8 {
    70
}

/// Configuration of the deterministic scoring core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringConfig {
    #[serde(alias = "VERIFIED_THRESHOLD", default = "default_verified_threshold")]
    pub verified_threshold: u8,

    #[serde(alias = "PARTIAL_MATCH_THRESHOLD", default = "default_partial_threshold")]
    pub partial_match_threshold: u8,

    #[serde(alias = "ATS_WEIGHTS", default)]
    pub ats_weights: AtsWeights,

    #[serde(default)]
    pub timeline: TimelineTolerance,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            verified_threshold: default_verified_threshold(),
            partial_match_threshold: default_partial_threshold(),
            ats_weights: AtsWeights::default(),
            timeline: TimelineTolerance::default(),
        }
    }
}

impl ScoringConfig {
    /// Parse and validate a config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: ScoringConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ScoringConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, choosing the format from the extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&contents),
            _ => Self::from_yaml(&contents),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.partial_match_threshold > self.verified_threshold || self.verified_threshold > 100 {
            return Err(ConfigError::InvalidThresholds {
                verified: self.verified_threshold,
                partial: self.partial_match_threshold,
            });
        }

        self.ats_weights.validate()
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            verified: self.verified_threshold,
            partial: self.partial_match_threshold,
        }
    }
}
