//! Resume completeness: weighted presence check over fixed sections.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ScoreBreakdown, ScoreComponent};
use crate::claim::Claim;
use crate::extraction::ResumeProfile;
use crate::types::ClaimKind;

/// Sections checked for presence, with their fixed weights (summing to 100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSection {
    Contact,
    Education,
    Experience,
    Skills,
    ExternalLinks,
}

impl ProfileSection {
    pub const ALL: [ProfileSection; 5] = [
        ProfileSection::Contact,
        ProfileSection::Education,
        ProfileSection::Experience,
        ProfileSection::Skills,
        ProfileSection::ExternalLinks,
    ];

    pub fn weight(&self) -> f64 {
        match self {
            ProfileSection::Contact => 20.0,
            ProfileSection::Education => 15.0,
            ProfileSection::Experience => 25.0,
            ProfileSection::Skills => 20.0,
            ProfileSection::ExternalLinks => 20.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileSection::Contact => "contact",
            ProfileSection::Education => "education",
            ProfileSection::Experience => "experience",
            ProfileSection::Skills => "skills",
            ProfileSection::ExternalLinks => "external_links",
        }
    }

    fn is_present(&self, profile: &ResumeProfile, claims: &[Claim]) -> bool {
        let has_claims = |kind: ClaimKind| claims.iter().any(|c| c.kind == kind);
        match self {
            ProfileSection::Contact => profile.contact.is_present(),
            ProfileSection::Education => {
                !profile.education.is_empty() || has_claims(ClaimKind::Education)
            }
            ProfileSection::Experience => {
                !profile.experience.is_empty() || has_claims(ClaimKind::Experience)
            }
            ProfileSection::Skills => {
                profile.skills.iter().any(|s| !s.trim().is_empty()) || has_claims(ClaimKind::Skill)
            }
            ProfileSection::ExternalLinks => profile.links.any(),
        }
    }
}

impl fmt::Display for ProfileSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Completeness result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletenessScore {
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    pub missing_sections: Vec<ProfileSection>,
}

/// Score resume completeness (0-100).
pub fn score_completeness(profile: &ResumeProfile, claims: &[Claim]) -> CompletenessScore {
    let total_weight: f64 = ProfileSection::ALL.iter().map(|s| s.weight()).sum();

    let mut breakdown = ScoreBreakdown::new();
    let mut missing_sections = Vec::new();

    for section in ProfileSection::ALL {
        let present = section.is_present(profile, claims);
        if !present {
            missing_sections.push(section);
        }
        let raw = if present { 100.0 } else { 0.0 };
        breakdown.insert(
            section.as_str(),
            ScoreComponent::measured(raw, section.weight() / total_weight),
        );
    }

    CompletenessScore {
        score: breakdown.weighted_sum(),
        breakdown,
        missing_sections,
    }
}
