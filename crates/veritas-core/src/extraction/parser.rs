//! Extraction input parsing and canonicalisation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::patterns;
use super::schema::{validate_extraction_schema, validate_job_description_schema};
use crate::claim::{Claim, ClaimId};
use crate::skills;
use crate::types::{ClaimKind, LinkKind};

/// Errors that can occur when loading extraction output.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Failed to read extraction file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Schema validation failed: {}", .0.join("; "))]
    SchemaError(Vec<String>),
}

/// Contact details.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Contact {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,
}

impl Contact {
    pub fn is_present(&self) -> bool {
        [&self.name, &self.email, &self.phone]
            .iter()
            .any(|field| field.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }
}

/// An education entry.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EducationEntry {
    #[serde(default)]
    pub claim_id: Option<ClaimId>,

    pub institution: String,

    #[serde(default)]
    pub degree: Option<String>,

    #[serde(default)]
    pub start: Option<String>,

    #[serde(default)]
    pub end: Option<String>,
}

/// A work experience entry.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ExperienceEntry {
    /// The experience claim this entry backs, if extraction linked one
    #[serde(default)]
    pub claim_id: Option<ClaimId>,

    pub organization: String,

    #[serde(default)]
    pub title: Option<String>,

    /// Start date ("2021-03")
    #[serde(default)]
    pub start: Option<String>,

    /// End date; absent or "present" for an ongoing role
    #[serde(default)]
    pub end: Option<String>,

    #[serde(default)]
    pub technologies: Vec<String>,
}

/// A project listed on the resume.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProjectEntry {
    #[serde(default)]
    pub claim_id: Option<ClaimId>,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub technologies: Vec<String>,
}

/// External profile links as written on the resume.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProfileLinks {
    #[serde(default)]
    pub github: Option<String>,

    #[serde(default)]
    pub kaggle: Option<String>,

    #[serde(default)]
    pub linkedin: Option<String>,
}

impl ProfileLinks {
    pub fn raw(&self, kind: LinkKind) -> Option<&str> {
        match kind {
            LinkKind::Github => self.github.as_deref(),
            LinkKind::Kaggle => self.kaggle.as_deref(),
            LinkKind::Linkedin => self.linkedin.as_deref(),
        }
    }

    /// The username behind a link, if the link parses.
    pub fn username(&self, kind: LinkKind) -> Option<String> {
        self.raw(kind)
            .and_then(|link| patterns::extract_username(kind, link))
    }

    pub fn has(&self, kind: LinkKind) -> bool {
        self.username(kind).is_some()
    }

    pub fn any(&self) -> bool {
        [LinkKind::Github, LinkKind::Kaggle, LinkKind::Linkedin]
            .iter()
            .any(|k| self.has(*k))
    }
}

/// Structured resume sections produced alongside the claims.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ResumeProfile {
    #[serde(default)]
    pub contact: Contact,

    #[serde(default)]
    pub education: Vec<EducationEntry>,

    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,

    #[serde(default)]
    pub projects: Vec<ProjectEntry>,

    #[serde(default)]
    pub skills: Vec<String>,

    #[serde(default)]
    pub links: ProfileLinks,
}

impl ResumeProfile {
    /// Technologies demonstrated in projects.
    pub fn project_technologies(&self) -> impl Iterator<Item = &String> {
        self.projects.iter().flat_map(|p| p.technologies.iter())
    }

    /// Technologies demonstrated in work experience.
    pub fn work_technologies(&self) -> impl Iterator<Item = &String> {
        self.experience.iter().flat_map(|e| e.technologies.iter())
    }
}

/// Requirements extracted from a job description.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct JobDescription {
    #[serde(default, alias = "job_title")]
    pub title: Option<String>,

    #[serde(default)]
    pub required_skills: Vec<String>,

    #[serde(default)]
    pub preferred_skills: Vec<String>,
}

impl JobDescription {
    pub fn from_json(json: &str) -> Result<Self, ExtractionError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        validate_job_description_schema(&value).map_err(ExtractionError::SchemaError)?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ExtractionError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Required skills with blanks removed.
    pub fn required(&self) -> impl Iterator<Item = &String> {
        self.required_skills.iter().filter(|s| !s.trim().is_empty())
    }

    /// A JD with no usable required skill is treated as absent for scoring.
    pub fn has_requirements(&self) -> bool {
        self.required().next().is_some()
    }
}

/// Output of the external extraction step: ordered claims plus profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractionResult {
    pub resume_id: String,

    #[serde(default)]
    pub claims: Vec<Claim>,

    #[serde(default)]
    pub profile: ResumeProfile,
}

impl ExtractionResult {
    pub fn new(resume_id: impl Into<String>, claims: Vec<Claim>, profile: ResumeProfile) -> Self {
        Self {
            resume_id: resume_id.into(),
            claims,
            profile,
        }
    }

    /// Parse, schema-validate and canonicalise extraction JSON.
    pub fn from_json(json: &str) -> Result<Self, ExtractionError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        validate_extraction_schema(&value).map_err(ExtractionError::SchemaError)?;

        let mut result: ExtractionResult = serde_json::from_value(value)?;
        result.canonicalize();
        Ok(result)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ExtractionError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Drop duplicate claims and mark soft skills as non-verifiable.
    ///
    /// A claim duplicates an earlier one when it repeats its id, or when it
    /// has the same kind and normalised value (text if the value is empty).
    /// The first occurrence wins. Returns the ids of dropped claims.
    pub fn canonicalize(&mut self) -> Vec<ClaimId> {
        let mut seen_ids: HashSet<ClaimId> = HashSet::new();
        let mut seen_values: HashSet<(ClaimKind, String)> = HashSet::new();
        let mut dropped = Vec::new();

        let claims = std::mem::take(&mut self.claims);
        for mut claim in claims {
            let key = (claim.kind, dedup_key(&claim));

            if seen_ids.contains(&claim.id) || seen_values.contains(&key) {
                tracing::debug!(claim = %claim.id, kind = %claim.kind, "dropping duplicate claim");
                dropped.push(claim.id);
                continue;
            }

            if claim.kind == ClaimKind::Skill && skills::is_soft_skill(claim.subject()) {
                claim.verifiable = false;
            }

            seen_ids.insert(claim.id.clone());
            seen_values.insert(key);
            self.claims.push(claim);
        }

        if !dropped.is_empty() {
            tracing::info!(dropped = dropped.len(), "canonicalised duplicate claims");
        }

        dropped
    }

    /// Claims of one kind, in extraction order.
    pub fn claims_of(&self, kind: ClaimKind) -> impl Iterator<Item = &Claim> {
        self.claims.iter().filter(move |c| c.kind == kind)
    }
}

fn dedup_key(claim: &Claim) -> String {
    match claim.kind {
        ClaimKind::Skill => skills::normalize(claim.subject()),
        _ => claim
            .subject()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase(),
    }
}
