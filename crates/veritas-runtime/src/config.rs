//! Runtime configuration.
//!
//! Durations are human-readable strings (`"10s"`, `"1m 30s"`) parsed with
//! `humantime`. The full [`AnalysisConfig`] bundles the scoring configuration
//! of `veritas-core` with the runtime knobs; it is validated once at startup
//! and immutable afterwards.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use veritas_core::{ConfigError, ScoringConfig};

/// Errors from loading or validating the analysis configuration.
#[derive(Error, Debug)]
pub enum RuntimeConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Scoring(#[from] ConfigError),

    #[error("max_concurrent_agents must be at least 1")]
    InvalidConcurrency,

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Serde adapter for `humantime` durations.
mod duration_str {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}

/// Which agents of the default roster are enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentToggles {
    pub github: bool,
    pub kaggle: bool,
    pub linkedin: bool,
    pub tech_consistency: bool,
    pub timeline: bool,
}

impl Default for AgentToggles {
    fn default() -> Self {
        Self {
            github: true,
            kaggle: true,
            // Profile scraping is off unless explicitly enabled
            linkedin: false,
            tech_consistency: true,
            timeline: true,
        }
    }
}

impl AgentToggles {
    /// Whether the agent with this name may run. Unknown agents are enabled.
    pub fn is_enabled(&self, agent: &str) -> bool {
        match agent {
            "github" => self.github,
            "kaggle" => self.kaggle,
            "linkedin" => self.linkedin,
            "tech_consistency" => self.tech_consistency,
            "timeline" => self.timeline,
            _ => true,
        }
    }
}

fn default_max_concurrent_agents() -> usize {
    4
}

fn default_agent_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_session_timeout() -> Duration {
    Duration::from_secs(60)
}

/// Knobs of the verification runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Agents allowed to run at once
    #[serde(default = "default_max_concurrent_agents")]
    pub max_concurrent_agents: usize,

    /// Budget of a single agent invocation
    #[serde(with = "duration_str", default = "default_agent_timeout")]
    pub agent_timeout: Duration,

    /// Deadline for the whole verification stage
    #[serde(with = "duration_str", default = "default_session_timeout")]
    pub session_timeout: Duration,

    #[serde(default)]
    pub agents: AgentToggles,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_concurrent_agents: default_max_concurrent_agents(),
            agent_timeout: default_agent_timeout(),
            session_timeout: default_session_timeout(),
            agents: AgentToggles::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn validate(&self) -> Result<(), RuntimeConfigError> {
        if self.max_concurrent_agents == 0 {
            return Err(RuntimeConfigError::InvalidConcurrency);
        }
        if self.agent_timeout.is_zero() {
            return Err(RuntimeConfigError::ZeroTimeout("agent_timeout"));
        }
        if self.session_timeout.is_zero() {
            return Err(RuntimeConfigError::ZeroTimeout("session_timeout"));
        }
        Ok(())
    }

    pub fn with_agent_timeout(mut self, timeout: Duration) -> Self {
        self.agent_timeout = timeout;
        self
    }

    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = timeout;
        self
    }

    pub fn with_max_concurrent_agents(mut self, max: usize) -> Self {
        self.max_concurrent_agents = max;
        self
    }
}

/// Complete configuration of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AnalysisConfig {
    #[serde(default, flatten)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub runtime: RuntimeConfig,
}

impl AnalysisConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, RuntimeConfigError> {
        let config: AnalysisConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, RuntimeConfigError> {
        let config: AnalysisConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, choosing the format from the extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RuntimeConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&contents),
            _ => Self::from_yaml(&contents),
        }
    }

    pub fn validate(&self) -> Result<(), RuntimeConfigError> {
        self.scoring.validate()?;
        self.runtime.validate()
    }
}
