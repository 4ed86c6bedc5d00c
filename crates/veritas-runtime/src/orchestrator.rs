//! Verification orchestrator.
//!
//! Fans the claim set out to the agent roster and collects one
//! [`VerificationResult`] per invoked agent:
//! - Each agent sees only the claims it declares interest in, and never the
//!   same claim twice in one session (dispatch ledger on the session)
//! - Agents run concurrently, at most `max_concurrent_agents` at a time
//! - Every call has its own timeout; the whole stage has a session deadline
//! - A failed, timed-out or cancelled agent yields `agent_error` for its
//!   subset and never aborts the session
//!
//! Results come back in roster order; the merge itself is order-independent.

use futures::future::join_all;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::time::Instant;

use veritas_core::{AnalysisSession, Claim, ClaimId, VerificationResult, YearMonth};

use crate::agents::{AgentContext, AgentError, VerificationAgent};
use crate::config::{RuntimeConfig, RuntimeConfigError};
use crate::evidence::OutcomeValidator;
use crate::sources::CredentialSet;

/// One agent's share of the claim set.
struct Dispatch {
    agent: Arc<dyn VerificationAgent>,
    claims: Vec<Claim>,
    ids: BTreeSet<ClaimId>,
}

/// Schedules verification agents over a session's claims.
pub struct VerificationOrchestrator {
    agents: Vec<Arc<dyn VerificationAgent>>,
    config: RuntimeConfig,
    credentials: Arc<CredentialSet>,
    permits: Arc<Semaphore>,
}

impl VerificationOrchestrator {
    pub fn new(config: RuntimeConfig, credentials: CredentialSet) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_concurrent_agents.max(1)));

        tracing::debug!(
            max_concurrent = config.max_concurrent_agents,
            credentials = ?credentials.configured(),
            "verification orchestrator created"
        );

        Self {
            agents: Vec::new(),
            config,
            credentials: Arc::new(credentials),
            permits,
        }
    }

    /// Register an agent at the end of the roster.
    pub fn register_agent(&mut self, agent: Arc<dyn VerificationAgent>) {
        self.agents.push(agent);
    }

    pub fn roster(&self) -> Vec<&'static str> {
        self.agents.iter().map(|a| a.name()).collect()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Run every applicable agent once over the session's claims.
    pub async fn verify(&self, session: &mut AnalysisSession, as_of: YearMonth) -> Vec<VerificationResult> {
        let plan = self.plan(session);
        if plan.is_empty() {
            tracing::info!("no claims to dispatch");
            return Vec::new();
        }

        let deadline = Instant::now() + self.config.session_timeout;
        let ctx = AgentContext {
            profile: session.profile(),
            credentials: &self.credentials,
            as_of,
        };

        tracing::info!(
            agents = plan.len(),
            session_timeout = ?self.config.session_timeout,
            "verification started"
        );

        join_all(plan.into_iter().map(|d| self.invoke(d, &ctx, deadline))).await
    }

    /// Split the claims among enabled agents, recording each pair in the ledger.
    fn plan(&self, session: &mut AnalysisSession) -> Vec<Dispatch> {
        let mut plan = Vec::new();

        for agent in &self.agents {
            let name = agent.name();
            if !self.config.agents.is_enabled(name) {
                tracing::debug!(agent = name, "agent disabled");
                continue;
            }

            let wanted: Vec<Claim> = session
                .claims()
                .iter()
                .filter(|c| agent.interested_in(c))
                .cloned()
                .collect();

            let claims: Vec<Claim> = wanted
                .into_iter()
                .filter(|c| {
                    let fresh = session.try_dispatch(&c.id, name);
                    if !fresh {
                        tracing::debug!(agent = name, claim = %c.id, "already dispatched");
                    }
                    fresh
                })
                .collect();

            if claims.is_empty() {
                continue;
            }

            let ids = claims.iter().map(|c| c.id.clone()).collect();
            plan.push(Dispatch {
                agent: agent.clone(),
                claims,
                ids,
            });
        }

        plan
    }

    async fn invoke(&self, dispatch: Dispatch, ctx: &AgentContext<'_>, deadline: Instant) -> VerificationResult {
        let Dispatch { agent, claims, ids } = dispatch;
        let name = agent.name();
        let agent_timeout = self.config.agent_timeout;

        let call = async {
            let _permit = self
                .permits
                .acquire()
                .await
                .map_err(|_| AgentError::Unavailable("dispatcher closed".to_string()))?;

            tracing::debug!(agent = name, claims = claims.len(), "dispatching agent");

            match tokio::time::timeout(agent_timeout, agent.verify(&claims, ctx)).await {
                Ok(result) => result,
                Err(_) => Err(AgentError::Timeout(agent_timeout)),
            }
        };

        let outcome = tokio::time::timeout_at(deadline, call)
            .await
            .unwrap_or(Err(AgentError::Cancelled));

        match outcome {
            Ok(outcomes) => {
                let (accepted, rejected) = OutcomeValidator::new(name, &ids).filter(outcomes);
                tracing::info!(
                    agent = name,
                    claims = ids.len(),
                    outcomes = accepted.len(),
                    rejected = rejected.len(),
                    "agent completed"
                );
                VerificationResult::completed(name, ids, accepted)
            }
            Err(e) => {
                tracing::warn!(agent = name, claims = ids.len(), error = %e, "agent unavailable");
                VerificationResult::failed(name, ids, e.to_string())
            }
        }
    }
}

/// Builder for [`VerificationOrchestrator`].
pub struct OrchestratorBuilder {
    config: RuntimeConfig,
    credentials: CredentialSet,
    agents: Vec<Arc<dyn VerificationAgent>>,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            credentials: CredentialSet::default(),
            agents: Vec::new(),
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn credentials(mut self, credentials: CredentialSet) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn agent(mut self, agent: Arc<dyn VerificationAgent>) -> Self {
        self.agents.push(agent);
        self
    }

    pub fn agents(mut self, agents: impl IntoIterator<Item = Arc<dyn VerificationAgent>>) -> Self {
        self.agents.extend(agents);
        self
    }

    pub fn build(self) -> Result<VerificationOrchestrator, RuntimeConfigError> {
        self.config.validate()?;

        let mut orchestrator = VerificationOrchestrator::new(self.config, self.credentials);
        for agent in self.agents {
            orchestrator.register_agent(agent);
        }

        Ok(orchestrator)
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
