//! Offline profile source backed by a JSON snapshot.
//!
//! ```json
//! {
//!   "github":   { "jane": { "username": "jane", "repos": [ ... ] } },
//!   "kaggle":   { "jane": { "username": "jane", "tier": "Expert" } },
//!   "linkedin": { "jane-doe": { "username": "jane-doe", "positions": [ ... ] } }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::{
    GithubProfile, GithubSource, KaggleProfile, KaggleSource, LinkedInProfile, LinkedInSource,
    SourceError,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotSource {
    #[serde(default)]
    github: BTreeMap<String, GithubProfile>,

    #[serde(default)]
    kaggle: BTreeMap<String, KaggleProfile>,

    #[serde(default)]
    linkedin: BTreeMap<String, LinkedInProfile>,
}

impl SnapshotSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        let raw: SnapshotSource =
            serde_json::from_str(json).map_err(|e| SourceError::Malformed(e.to_string()))?;
        Ok(raw.normalized())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| SourceError::Unavailable(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&contents)
    }

    pub fn with_github(mut self, profile: GithubProfile) -> Self {
        self.github.insert(profile.username.to_lowercase(), profile);
        self
    }

    pub fn with_kaggle(mut self, profile: KaggleProfile) -> Self {
        self.kaggle.insert(profile.username.to_lowercase(), profile);
        self
    }

    pub fn with_linkedin(mut self, profile: LinkedInProfile) -> Self {
        self.linkedin.insert(profile.username.to_lowercase(), profile);
        self
    }

    /// Usernames are matched case-insensitively.
    fn normalized(self) -> Self {
        fn lower<V>(map: BTreeMap<String, V>) -> BTreeMap<String, V> {
            map.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect()
        }

        Self {
            github: lower(self.github),
            kaggle: lower(self.kaggle),
            linkedin: lower(self.linkedin),
        }
    }
}

#[async_trait]
impl GithubSource for SnapshotSource {
    async fn profile(&self, username: &str) -> Result<Option<GithubProfile>, SourceError> {
        Ok(self
            .github
            .get(&username.to_lowercase())
            .cloned()
            .map(GithubProfile::capped))
    }
}

#[async_trait]
impl KaggleSource for SnapshotSource {
    async fn profile(&self, username: &str) -> Result<Option<KaggleProfile>, SourceError> {
        Ok(self.kaggle.get(&username.to_lowercase()).cloned())
    }
}

#[async_trait]
impl LinkedInSource for SnapshotSource {
    async fn profile(&self, username: &str) -> Result<Option<LinkedInProfile>, SourceError> {
        Ok(self.linkedin.get(&username.to_lowercase()).cloned())
    }
}
