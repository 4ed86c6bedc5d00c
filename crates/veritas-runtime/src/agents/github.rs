//! GitHub agent: corroborates skill and project claims against public repositories.

use async_trait::async_trait;
use std::sync::Arc;

use veritas_core::skills;
use veritas_core::{Claim, ClaimKind, EvidenceRecord, LinkKind};

use super::traits::{AgentContext, AgentError, AgentOutcomes, VerificationAgent};
use crate::sources::{GithubProfile, GithubSource};

const PROJECT_MATCH_CONFIDENCE: u8 = 90;
const MISSING_PROFILE_CONFIDENCE: u8 = 90;
const SKILL_MULTI_REPO_CONFIDENCE: u8 = 95;
const SKILL_SINGLE_REPO_CONFIDENCE: u8 = 80;

pub struct GithubAgent {
    source: Arc<dyn GithubSource>,
}

impl GithubAgent {
    pub fn new(source: Arc<dyn GithubSource>) -> Self {
        Self { source }
    }

    fn check_project(&self, claim: &Claim, profile: &GithubProfile) -> EvidenceRecord {
        let wanted = compact(claim.subject());
        let hit = profile.repos.iter().find(|repo| {
            let name = compact(&repo.name);
            !name.is_empty() && !wanted.is_empty() && (name.contains(&wanted) || wanted.contains(&name))
        });

        match hit {
            Some(repo) => EvidenceRecord::supports(
                self.name(),
                format!("project matches repository '{}'", repo.name),
                PROJECT_MATCH_CONFIDENCE,
            ),
            None => EvidenceRecord::inconclusive(
                self.name(),
                format!("no repository of '{}' matches the project", profile.username),
            ),
        }
    }

    fn check_skill(&self, claim: &Claim, profile: &GithubProfile) -> EvidenceRecord {
        let skill = claim.subject();
        let repos: Vec<&str> = profile
            .repos
            .iter()
            .filter(|repo| repo.technologies().any(|tech| skills::skills_match(skill, tech)))
            .map(|repo| repo.name.as_str())
            .collect();

        let confidence = match repos.len() {
            0 => {
                return EvidenceRecord::inconclusive(
                    self.name(),
                    format!("{} not found in recent repositories", skills::normalize(skill)),
                )
            }
            1 => SKILL_SINGLE_REPO_CONFIDENCE,
            _ => SKILL_MULTI_REPO_CONFIDENCE,
        };

        EvidenceRecord::supports(
            self.name(),
            format!("used in {} repositories: {}", repos.len(), repos.join(", ")),
            confidence,
        )
    }
}

#[async_trait]
impl VerificationAgent for GithubAgent {
    fn name(&self) -> &'static str {
        "github"
    }

    fn interested_in(&self, claim: &Claim) -> bool {
        claim.verifiable && matches!(claim.kind, ClaimKind::Skill | ClaimKind::Project)
    }

    async fn verify(
        &self,
        claims: &[Claim],
        ctx: &AgentContext<'_>,
    ) -> Result<AgentOutcomes, AgentError> {
        let Some(username) = ctx.profile.links.username(LinkKind::Github) else {
            return Ok(claims
                .iter()
                .map(|c| {
                    (
                        c.id.clone(),
                        EvidenceRecord::inconclusive(self.name(), "no GitHub profile linked"),
                    )
                })
                .collect());
        };

        if ctx.credentials.github.is_none() {
            tracing::debug!("no GitHub token configured, using rate-limited public access");
        }

        let profile = self.source.profile(&username).await?;
        tracing::debug!(username = %username, found = profile.is_some(), "github profile lookup");

        let outcomes = claims
            .iter()
            .map(|claim| {
                let record = match (&profile, claim.kind) {
                    (None, ClaimKind::Project) => EvidenceRecord::contradicts(
                        self.name(),
                        format!("GitHub user '{}' does not exist", username),
                        MISSING_PROFILE_CONFIDENCE,
                    ),
                    (None, _) => EvidenceRecord::inconclusive(
                        self.name(),
                        format!("GitHub user '{}' does not exist", username),
                    ),
                    (Some(p), ClaimKind::Project) => self.check_project(claim, p),
                    (Some(p), _) => self.check_skill(claim, p),
                };
                (claim.id.clone(), record)
            })
            .collect();

        Ok(outcomes)
    }
}

/// Lower-case alphanumerics only, so "Ray-Tracer" matches "ray_tracer".
fn compact(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
