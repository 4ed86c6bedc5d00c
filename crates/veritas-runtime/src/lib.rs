//! # veritas-runtime
//!
//! Async verification for VERITAS.
//!
//! `veritas-core` is deterministic and never performs I/O. This crate holds
//! everything that waits on the outside world:
//! - Typed third-party sources (GitHub, Kaggle, LinkedIn) and their cache
//! - The verification agents and their roster
//! - The orchestrator that fans claims out under a concurrency cap,
//!   per-agent timeouts and a session deadline
//! - The pipeline controller that drives a session end to end
//!
//! ## Example
//!
//! ```rust,ignore
//! use veritas_runtime::{AnalysisConfig, CredentialSet, PipelineController, SnapshotSource, SourceSet};
//! use veritas_core::{ExtractionResult, JdInput};
//!
//! let config = AnalysisConfig::from_file("veritas.yaml")?;
//! let sources = SourceSet::from_snapshot(SnapshotSource::from_file("evidence.json")?);
//! let controller = PipelineController::new(config, &sources, CredentialSet::from_env())?;
//!
//! let extraction = ExtractionResult::from_json_file("resume.json")?;
//! let report = controller.run(extraction, JdInput::Absent).await?;
//! println!("{}", report.to_json_pretty()?);
//! ```

pub mod agents;
pub mod config;
pub mod evidence;
pub mod orchestrator;
pub mod pipeline;
pub mod sources;

pub use agents::{
    default_roster, AgentContext, AgentError, AgentOutcomes, GithubAgent, KaggleAgent, LinkedInAgent,
    TechConsistencyAgent, TimelineAgent, VerificationAgent,
};
pub use config::{AgentToggles, AnalysisConfig, RuntimeConfig, RuntimeConfigError};
pub use evidence::{OutcomeValidationError, OutcomeValidator};
pub use orchestrator::{OrchestratorBuilder, VerificationOrchestrator};
pub use pipeline::{PipelineController, PipelineError};
pub use sources::{
    ApiCredential, CachedGithubSource, CredentialSet, CredentialSource, GithubProfile, GithubRepo,
    GithubSource, KaggleProfile, KaggleSource, LinkedInProfile, LinkedInSource, SnapshotSource,
    SourceError, SourceSet,
};
