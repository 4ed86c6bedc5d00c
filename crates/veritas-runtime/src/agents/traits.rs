//! Verification agent trait and common types.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

use veritas_core::{Claim, ClaimId, EvidenceRecord, ResumeProfile, YearMonth};

use crate::sources::{CredentialSet, SourceError};

/// Errors from verification agents.
///
/// Every variant is recovered by the orchestrator: the agent's claims stay
/// unverified with an "agent unavailable" evidence record.
#[derive(Error, Debug, Clone)]
pub enum AgentError {
    #[error("Agent unavailable: {0}")]
    Unavailable(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Cancelled: session deadline reached")]
    Cancelled,

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Source error: {0}")]
    Source(SourceError),
}

impl From<SourceError> for AgentError {
    fn from(e: SourceError) -> Self {
        match e {
            SourceError::RateLimited => AgentError::RateLimited,
            other => AgentError::Source(other),
        }
    }
}

/// Read-only inputs shared by all agents of one session.
#[derive(Debug, Clone, Copy)]
pub struct AgentContext<'a> {
    pub profile: &'a ResumeProfile,
    pub credentials: &'a CredentialSet,

    /// Month that ongoing roles end at
    pub as_of: YearMonth,
}

/// Per-claim findings of one invocation.
pub type AgentOutcomes = BTreeMap<ClaimId, EvidenceRecord>;

/// A verification capability registered in the orchestrator's roster.
///
/// # Isolation Contract
/// - No shared mutable state between agents
/// - No access to other agents' findings
/// - Outbound calls are read-only
#[async_trait]
pub trait VerificationAgent: Send + Sync {
    /// Stable name, used in evidence records and the dispatch ledger.
    fn name(&self) -> &'static str;

    /// Whether the agent wants to see this claim.
    fn interested_in(&self, claim: &Claim) -> bool;

    /// Verify the dispatched subset.
    ///
    /// Outcomes for claims outside `claims` are discarded by the orchestrator.
    async fn verify(
        &self,
        claims: &[Claim],
        ctx: &AgentContext<'_>,
    ) -> Result<AgentOutcomes, AgentError>;
}
