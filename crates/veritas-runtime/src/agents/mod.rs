//! Verification agents.
//!
//! Each agent declares which claims it wants and returns one evidence record
//! per claim it was given. Agents are registered in a fixed roster when the
//! orchestrator is built.

mod github;
mod kaggle;
mod linkedin;
mod tech_consistency;
mod timeline;
mod traits;

pub use github::GithubAgent;
pub use kaggle::KaggleAgent;
pub use linkedin::LinkedInAgent;
pub use tech_consistency::TechConsistencyAgent;
pub use timeline::TimelineAgent;
pub use traits::{AgentContext, AgentError, AgentOutcomes, VerificationAgent};

use std::sync::Arc;

use veritas_core::TimelineTolerance;

use crate::sources::SourceSet;

/// The built-in roster, in dispatch order.
pub fn default_roster(sources: &SourceSet, tolerance: TimelineTolerance) -> Vec<Arc<dyn VerificationAgent>> {
    vec![
        Arc::new(GithubAgent::new(sources.github.clone())),
        Arc::new(KaggleAgent::new(sources.kaggle.clone())),
        Arc::new(LinkedInAgent::new(sources.linkedin.clone())),
        Arc::new(TechConsistencyAgent::new()),
        Arc::new(TimelineAgent::new(tolerance)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roster_names_are_unique() {
        let roster = default_roster(&SourceSet::empty(), TimelineTolerance::default());
        let names: Vec<&str> = roster.iter().map(|a| a.name()).collect();

        assert_eq!(
            names,
            vec!["github", "kaggle", "linkedin", "tech_consistency", "timeline"]
        );
    }
}
