//! Pipeline controller.
//!
//! Drives one analysis session through its stages: open the session from the
//! extraction result, match skills against the job description, fan out to
//! the verification agents, then run the deterministic scoring stages and
//! build the report. Only a configuration error or an empty claim set stops
//! a run; everything else degrades the report.

use std::time::Instant;
use thiserror::Error;

use veritas_core::{
    AnalysisError, AnalysisSession, ExtractionResult, JdInput, Report, YearMonth,
};

use crate::agents::default_roster;
use crate::config::{AnalysisConfig, RuntimeConfigError};
use crate::orchestrator::{OrchestratorBuilder, VerificationOrchestrator};
use crate::sources::{CredentialSet, SourceSet};

/// Fatal pipeline errors.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Invalid runtime configuration: {0}")]
    Config(#[from] RuntimeConfigError),
}

pub struct PipelineController {
    config: AnalysisConfig,
    orchestrator: VerificationOrchestrator,
    as_of: Option<YearMonth>,
}

impl PipelineController {
    /// Build a controller with the default agent roster over `sources`.
    pub fn new(config: AnalysisConfig, sources: &SourceSet, credentials: CredentialSet) -> Result<Self, PipelineError> {
        let orchestrator = OrchestratorBuilder::new()
            .config(config.runtime.clone())
            .credentials(credentials)
            .agents(default_roster(sources, config.scoring.timeline))
            .build()?;

        Self::with_orchestrator(config, orchestrator)
    }

    /// Build a controller around a custom orchestrator.
    pub fn with_orchestrator(config: AnalysisConfig, orchestrator: VerificationOrchestrator) -> Result<Self, PipelineError> {
        config.scoring.validate().map_err(AnalysisError::from)?;
        config.runtime.validate()?;

        Ok(Self {
            config,
            orchestrator,
            as_of: None,
        })
    }

    /// Pin the reference month used for ongoing roles.
    pub fn with_as_of(mut self, as_of: YearMonth) -> Self {
        self.as_of = Some(as_of);
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run one session end to end.
    pub async fn run(&self, extraction: ExtractionResult, jd: JdInput) -> Result<Report, PipelineError> {
        let started = Instant::now();
        let as_of = self.as_of.unwrap_or_else(YearMonth::now);

        let mut session = AnalysisSession::open(extraction, jd)?;
        session.run_skill_matcher();

        let results = self.orchestrator.verify(&mut session, as_of).await;
        session.apply_verification(results, &self.config.scoring);
        session.finalize(&self.config.scoring, as_of);

        let report = Report::from_session(&session)?;
        tracing::info!(
            resume = %report.resume_id,
            recommendation = ?report.recommendation,
            ats = report.ats_score.value,
            trust = report.trust_score,
            red_flags = report.red_flags.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "analysis complete"
        );

        Ok(report)
    }
}
