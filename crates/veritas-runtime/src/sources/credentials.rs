//! API credentials for the profile sources.
//!
//! Tokens are wrapped in `SecretString` as soon as they are read and never
//! appear in `Debug` or `Display` output. Credentials are read-only and
//! injected when the orchestrator is built.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";
pub const KAGGLE_KEY_VAR: &str = "KAGGLE_KEY";

/// Where a credential was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Environment,
    Programmatic,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Programmatic => write!(f, "programmatic"),
        }
    }
}

/// A securely-stored API token.
pub struct ApiCredential {
    value: SecretString,
    source: CredentialSource,
    name: &'static str,
}

impl ApiCredential {
    pub fn new(value: impl Into<String>, source: CredentialSource, name: &'static str) -> Self {
        Self {
            value: SecretString::from(value.into()),
            source,
            name,
        }
    }

    /// Read a credential from an environment variable; blank values count as unset.
    pub fn from_env(env_var: &str, name: &'static str) -> Option<Self> {
        std::env::var(env_var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| Self::new(v, CredentialSource::Environment, name))
    }

    /// Expose the token at the point of use (e.g. an HTTP header).
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {} [REDACTED]", self.name, self.source)
    }
}

/// Credentials for every source. All are optional: without a token the
/// sources fall back to rate-limited public access.
#[derive(Debug, Default)]
pub struct CredentialSet {
    pub github: Option<ApiCredential>,
    pub kaggle: Option<ApiCredential>,
}

impl CredentialSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `GITHUB_TOKEN` and `KAGGLE_KEY`.
    pub fn from_env() -> Self {
        Self {
            github: ApiCredential::from_env(GITHUB_TOKEN_VAR, "GitHub token"),
            kaggle: ApiCredential::from_env(KAGGLE_KEY_VAR, "Kaggle key"),
        }
    }

    pub fn with_github(mut self, token: impl Into<String>) -> Self {
        self.github = Some(ApiCredential::new(token, CredentialSource::Programmatic, "GitHub token"));
        self
    }

    pub fn with_kaggle(mut self, key: impl Into<String>) -> Self {
        self.kaggle = Some(ApiCredential::new(key, CredentialSource::Programmatic, "Kaggle key"));
        self
    }

    /// Names of the configured credentials, for diagnostics.
    pub fn configured(&self) -> Vec<String> {
        [&self.github, &self.kaggle]
            .into_iter()
            .flatten()
            .map(|c| c.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_redacted_in_debug() {
        let secret = "ghp_super-secret-12345";
        let cred = ApiCredential::new(secret, CredentialSource::Programmatic, "GitHub token");

        let debug = format!("{:?}", cred);
        assert!(!debug.contains(secret), "Secret exposed in Debug!");
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_credential_set_redacted() {
        let creds = CredentialSet::new().with_github("ghp_abc").with_kaggle("kg_xyz");

        let debug = format!("{:?}", creds);
        assert!(!debug.contains("ghp_abc"));
        assert!(!debug.contains("kg_xyz"));
        assert_eq!(creds.configured().len(), 2);
        assert_eq!(creds.github.as_ref().unwrap().expose(), "ghp_abc");
    }

    #[test]
    fn test_from_env_ignores_blank() {
        std::env::set_var("VERITAS_TEST_BLANK_TOKEN", "  ");
        assert!(ApiCredential::from_env("VERITAS_TEST_BLANK_TOKEN", "t").is_none());
        std::env::remove_var("VERITAS_TEST_BLANK_TOKEN");

        std::env::set_var("VERITAS_TEST_SET_TOKEN", "value");
        let cred = ApiCredential::from_env("VERITAS_TEST_SET_TOKEN", "t").unwrap();
        assert_eq!(cred.source(), CredentialSource::Environment);
        std::env::remove_var("VERITAS_TEST_SET_TOKEN");
    }
}
