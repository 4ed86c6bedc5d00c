//! Agent output validation.
//!
//! An agent may only speak about the claims it was dispatched for, and only
//! in its own name. Outcomes that break either rule are dropped before the
//! merge, never repaired.

use std::collections::BTreeSet;
use thiserror::Error;

use veritas_core::{ClaimId, EvidenceRecord};

use crate::agents::AgentOutcomes;

/// Why an outcome was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OutcomeValidationError {
    #[error("{agent} reported on claim {claim} it was not dispatched for")]
    UndispatchedClaim { agent: String, claim: ClaimId },

    #[error("{agent} returned a record attributed to {recorded} for claim {claim}")]
    ForeignAttribution {
        agent: String,
        recorded: String,
        claim: ClaimId,
    },
}

/// Checks one agent's outcomes against the subset it was given.
pub struct OutcomeValidator<'a> {
    agent: &'a str,
    dispatched: &'a BTreeSet<ClaimId>,
}

impl<'a> OutcomeValidator<'a> {
    pub fn new(agent: &'a str, dispatched: &'a BTreeSet<ClaimId>) -> Self {
        Self { agent, dispatched }
    }

    /// Validate a single outcome.
    pub fn validate(&self, claim: &ClaimId, record: &EvidenceRecord) -> Result<(), OutcomeValidationError> {
        if !self.dispatched.contains(claim) {
            return Err(OutcomeValidationError::UndispatchedClaim {
                agent: self.agent.to_string(),
                claim: claim.clone(),
            });
        }

        if record.agent_name != self.agent {
            return Err(OutcomeValidationError::ForeignAttribution {
                agent: self.agent.to_string(),
                recorded: record.agent_name.clone(),
                claim: claim.clone(),
            });
        }

        Ok(())
    }

    /// Keep the valid outcomes; return the rejected ones' errors alongside.
    pub fn filter(&self, outcomes: AgentOutcomes) -> (AgentOutcomes, Vec<OutcomeValidationError>) {
        let mut accepted = AgentOutcomes::new();
        let mut rejected = Vec::new();

        for (claim, record) in outcomes {
            match self.validate(&claim, &record) {
                Ok(()) => {
                    accepted.insert(claim, record);
                }
                Err(e) => {
                    tracing::warn!(agent = self.agent, error = %e, "discarding agent outcome");
                    rejected.push(e);
                }
            }
        }

        (accepted, rejected)
    }
}
