//! Evidence records attached to claims.
//!
//! Every verification outcome is an evidence record naming the agent that
//! produced it. Records are append-only: once attached to a claim they are
//! never edited or removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::EvidenceOutcome;

/// Detail used for the synthetic record written when an agent fails.
pub const AGENT_UNAVAILABLE_DETAIL: &str = "inconclusive - agent unavailable";

/// A single agent's finding about a claim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvidenceRecord {
    /// Agent that produced the finding (e.g., "github")
    pub agent_name: String,

    /// What the agent concluded
    pub outcome: EvidenceOutcome,

    /// Human-readable explanation
    pub detail: String,

    /// Strength of the finding (0-100)
    pub confidence: u8,

    /// When the finding was produced
    pub timestamp: DateTime<Utc>,
}

impl EvidenceRecord {
    /// Create a supporting record.
    pub fn supports(agent: impl Into<String>, detail: impl Into<String>, confidence: u8) -> Self {
        EvidenceBuilder::new(agent)
            .outcome(EvidenceOutcome::Supports)
            .detail(detail)
            .confidence(confidence)
            .build()
    }

    /// Create a contradicting record.
    pub fn contradicts(agent: impl Into<String>, detail: impl Into<String>, confidence: u8) -> Self {
        EvidenceBuilder::new(agent)
            .outcome(EvidenceOutcome::Contradicts)
            .detail(detail)
            .confidence(confidence)
            .build()
    }

    /// Create an inconclusive record.
    pub fn inconclusive(agent: impl Into<String>, detail: impl Into<String>) -> Self {
        EvidenceBuilder::new(agent)
            .outcome(EvidenceOutcome::Inconclusive)
            .detail(detail)
            .build()
    }

    /// Synthetic record for claims whose agent errored, timed out or was cancelled.
    pub fn agent_unavailable(agent: impl Into<String>, reason: impl AsRef<str>) -> Self {
        Self::inconclusive(
            agent,
            format!("{}: {}", AGENT_UNAVAILABLE_DETAIL, reason.as_ref()),
        )
    }

    pub fn is_support(&self) -> bool {
        self.outcome == EvidenceOutcome::Supports
    }

    pub fn is_contradiction(&self) -> bool {
        self.outcome == EvidenceOutcome::Contradicts
    }

    /// Whether this is the synthetic record of an unavailable agent.
    pub fn is_agent_unavailable(&self) -> bool {
        self.outcome == EvidenceOutcome::Inconclusive
            && self.detail.starts_with(AGENT_UNAVAILABLE_DETAIL)
    }
}

/// Builder for evidence records with fluent API.
pub struct EvidenceBuilder {
    agent_name: String,
    outcome: EvidenceOutcome,
    detail: String,
    confidence: u8,
    timestamp: Option<DateTime<Utc>>,
}

impl EvidenceBuilder {
    /// Start building a record for an agent.
    pub fn new(agent: impl Into<String>) -> Self {
        Self {
            agent_name: agent.into(),
            outcome: EvidenceOutcome::Inconclusive,
            detail: String::new(),
            confidence: 0,
            timestamp: None,
        }
    }

    pub fn outcome(mut self, outcome: EvidenceOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    /// Set the confidence, clamped to 100.
    pub fn confidence(mut self, confidence: u8) -> Self {
        self.confidence = confidence.min(100);
        self
    }

    /// Pin the timestamp (defaults to now).
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn build(self) -> EvidenceRecord {
        EvidenceRecord {
            agent_name: self.agent_name,
            outcome: self.outcome,
            detail: self.detail,
            confidence: self.confidence,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
        }
    }
}
