//! Typed third-party profile sources.
//!
//! The raw HTTP clients for GitHub, Kaggle and LinkedIn live outside this
//! crate; agents only see the typed profiles these traits return. A lookup
//! for a user that does not exist is `Ok(None)`, not an error.

mod cache;
mod credentials;
mod snapshot;

pub use cache::CachedGithubSource;
pub use credentials::{ApiCredential, CredentialSet, CredentialSource};
pub use snapshot::SnapshotSource;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Repositories considered per GitHub profile, most recently pushed first.
pub const MAX_REPOS: usize = 10;

/// Errors from a profile source.
#[derive(Error, Debug, Clone)]
pub enum SourceError {
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GithubRepo {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Primary language reported by GitHub
    #[serde(default)]
    pub language: Option<String>,

    /// All languages detected in the repository
    #[serde(default)]
    pub languages: Vec<String>,

    #[serde(default)]
    pub topics: Vec<String>,

    #[serde(default)]
    pub stars: u32,

    #[serde(default)]
    pub fork: bool,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
}

impl GithubRepo {
    /// Languages and topics, primary language first.
    pub fn technologies(&self) -> impl Iterator<Item = &String> {
        self.language
            .iter()
            .chain(self.languages.iter())
            .chain(self.topics.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GithubProfile {
    pub username: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub public_repos: u32,

    #[serde(default)]
    pub followers: u32,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub repos: Vec<GithubRepo>,
}

impl GithubProfile {
    /// Keep only the [`MAX_REPOS`] most recently pushed repositories.
    pub fn capped(mut self) -> Self {
        self.repos.sort_by(|a, b| b.pushed_at.cmp(&a.pushed_at));
        self.repos.truncate(MAX_REPOS);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Medals {
    #[serde(default)]
    pub gold: u32,
    #[serde(default)]
    pub silver: u32,
    #[serde(default)]
    pub bronze: u32,
}

impl Medals {
    pub fn total(&self) -> u32 {
        self.gold + self.silver + self.bronze
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct KaggleProfile {
    pub username: String,

    /// Progression tier ("Expert", "Master", ...)
    #[serde(default)]
    pub tier: Option<String>,

    #[serde(default)]
    pub medals: Medals,

    #[serde(default)]
    pub competitions: u32,

    #[serde(default)]
    pub datasets: u32,

    #[serde(default)]
    pub notebooks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LinkedInPosition {
    pub organization: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub start: Option<String>,

    #[serde(default)]
    pub end: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LinkedInEducation {
    pub institution: String,

    #[serde(default)]
    pub degree: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LinkedInProfile {
    pub username: String,

    #[serde(default)]
    pub positions: Vec<LinkedInPosition>,

    #[serde(default)]
    pub education: Vec<LinkedInEducation>,
}

#[async_trait]
pub trait GithubSource: Send + Sync {
    async fn profile(&self, username: &str) -> Result<Option<GithubProfile>, SourceError>;
}

#[async_trait]
pub trait KaggleSource: Send + Sync {
    async fn profile(&self, username: &str) -> Result<Option<KaggleProfile>, SourceError>;
}

#[async_trait]
pub trait LinkedInSource: Send + Sync {
    async fn profile(&self, username: &str) -> Result<Option<LinkedInProfile>, SourceError>;
}

/// The sources handed to the default agent roster.
#[derive(Clone)]
pub struct SourceSet {
    pub github: Arc<dyn GithubSource>,
    pub kaggle: Arc<dyn KaggleSource>,
    pub linkedin: Arc<dyn LinkedInSource>,
}

impl SourceSet {
    /// Every source served from one snapshot, GitHub behind a cache.
    pub fn from_snapshot(snapshot: SnapshotSource) -> Self {
        let snapshot = Arc::new(snapshot);
        Self {
            github: Arc::new(CachedGithubSource::new(snapshot.clone())),
            kaggle: snapshot.clone(),
            linkedin: snapshot,
        }
    }

    /// Sources that know no profile at all.
    pub fn empty() -> Self {
        Self::from_snapshot(SnapshotSource::default())
    }
}
