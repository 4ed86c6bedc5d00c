//! Analysis session: the aggregate root of one analysis run.
//!
//! A session owns the claim set, every verification result and all derived
//! scores and flags. It is never shared between runs.
//!
//! Stages and their dependencies are a fixed table checked at compile time;
//! each stage consumes exactly its dependencies' outputs and either completes
//! or leaves an absent value for its consumers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::claim::{Claim, ClaimId};
use crate::config::ScoringConfig;
use crate::consistency::{check_consistency, TechConsistencyReport};
use crate::extraction::{ExtractionResult, JobDescription, ResumeProfile};
use crate::redflags::{RedFlagDetector, RedFlagReport, RuleContext};
use crate::reconcile::{apply_results, VerificationResult};
use crate::scoring::{
    match_skills, score_completeness, AtsCalculator, AtsInputs, AtsScore, CompletenessScore,
    FactorValue, SkillMatch, TrustScore, TrustScorer,
};
use crate::summary::{ExecutiveSummary, Summarizer};
use crate::timeline::{TimelineReport, TimelineValidator, YearMonth};
use crate::AnalysisError;

/// A node of the analysis graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Extraction,
    ClaimDetection,
    JdExtraction,
    SkillMatcher,
    Verification,
    TimelineValidator,
    CompletenessScorer,
    TrustScorer,
    RedFlagDetector,
    TechConsistency,
    AtsCalculator,
    ExecutiveSummary,
}

impl Stage {
    /// Execution order; every stage appears after all of its dependencies.
    pub const ORDER: [Stage; 12] = [
        Stage::Extraction,
        Stage::ClaimDetection,
        Stage::JdExtraction,
        Stage::SkillMatcher,
        Stage::Verification,
        Stage::TimelineValidator,
        Stage::CompletenessScorer,
        Stage::TrustScorer,
        Stage::RedFlagDetector,
        Stage::TechConsistency,
        Stage::AtsCalculator,
        Stage::ExecutiveSummary,
    ];

    pub const fn dependencies(self) -> &'static [Stage] {
        match self {
            Stage::Extraction => &[],
            Stage::ClaimDetection => &[Stage::Extraction],
            Stage::JdExtraction => &[Stage::Extraction],
            Stage::SkillMatcher => &[Stage::ClaimDetection, Stage::JdExtraction],
            Stage::Verification => &[Stage::SkillMatcher],
            Stage::TimelineValidator => &[Stage::ClaimDetection],
            Stage::CompletenessScorer => &[Stage::ClaimDetection],
            Stage::TrustScorer => &[Stage::Verification],
            Stage::RedFlagDetector => &[Stage::Verification, Stage::TimelineValidator],
            Stage::TechConsistency => &[Stage::Verification],
            Stage::AtsCalculator => &[
                Stage::TrustScorer,
                Stage::SkillMatcher,
                Stage::CompletenessScorer,
                Stage::TimelineValidator,
            ],
            Stage::ExecutiveSummary => &[
                Stage::AtsCalculator,
                Stage::TrustScorer,
                Stage::RedFlagDetector,
            ],
        }
    }

    /// Stages performed outside this crate.
    pub const fn is_external(self) -> bool {
        matches!(
            self,
            Stage::Extraction | Stage::ClaimDetection | Stage::JdExtraction
        )
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Stage::Extraction => "extraction",
            Stage::ClaimDetection => "claim_detection",
            Stage::JdExtraction => "jd_extraction",
            Stage::SkillMatcher => "skill_matcher",
            Stage::Verification => "verification",
            Stage::TimelineValidator => "timeline_validator",
            Stage::CompletenessScorer => "completeness_scorer",
            Stage::TrustScorer => "trust_scorer",
            Stage::RedFlagDetector => "red_flag_detector",
            Stage::TechConsistency => "tech_consistency",
            Stage::AtsCalculator => "ats_calculator",
            Stage::ExecutiveSummary => "executive_summary",
        }
    }

    const fn position(self) -> usize {
        let mut i = 0;
        while i < Self::ORDER.len() {
            if Self::ORDER[i] as usize == self as usize {
                return i;
            }
            i += 1;
        }
        usize::MAX
    }

    /// Whether `ORDER` lists every stage after its dependencies.
    pub const fn order_is_topological() -> bool {
        let mut i = 0;
        while i < Self::ORDER.len() {
            let deps = Self::ORDER[i].dependencies();
            let mut j = 0;
            while j < deps.len() {
                if deps[j].position() >= i {
                    return false;
                }
                j += 1;
            }
            i += 1;
        }
        true
    }
}

const _: () = assert!(Stage::order_is_topological(), "stage order violates dependencies");

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a stage ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StageOutcome {
    Completed,
    /// Not run because an input was absent
    Skipped { reason: String },
    /// Ran and failed; downstream consumers see an absent value
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    pub stage: Stage,
    #[serde(flatten)]
    pub outcome: StageOutcome,
}

/// Job description as handed to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum JdInput {
    Absent,
    Extracted(JobDescription),
    Failed(String),
}

impl From<Option<JobDescription>> for JdInput {
    fn from(value: Option<JobDescription>) -> Self {
        match value {
            Some(jd) => JdInput::Extracted(jd),
            None => JdInput::Absent,
        }
    }
}

/// One analysis run over one resume.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    resume_id: String,
    job_description: Option<JobDescription>,
    profile: ResumeProfile,
    claims: Vec<Claim>,
    results: Vec<VerificationResult>,
    dispatched: BTreeSet<(ClaimId, String)>,
    skill_match: Option<SkillMatch>,
    timeline: Option<TimelineReport>,
    completeness: Option<CompletenessScore>,
    trust: Option<TrustScore>,
    red_flags: RedFlagReport,
    tech_consistency: Option<TechConsistencyReport>,
    ats: Option<AtsScore>,
    summary: Option<ExecutiveSummary>,
    stages: Vec<StageRecord>,
    started_at: DateTime<Utc>,
}

impl AnalysisSession {
    /// Open a session from extraction output.
    ///
    /// Claims are canonicalised first: duplicates are dropped and soft skills
    /// marked non-verifiable. Fails with `NoClaimsExtracted` when extraction
    /// produced no claim.
    pub fn open(mut extraction: ExtractionResult, jd: JdInput) -> Result<Self, AnalysisError> {
        extraction.canonicalize();
        if extraction.claims.is_empty() {
            tracing::error!(resume = %extraction.resume_id, "no claims extracted");
            return Err(AnalysisError::NoClaimsExtracted);
        }

        let mut session = Self {
            resume_id: extraction.resume_id,
            job_description: None,
            profile: extraction.profile,
            claims: extraction.claims,
            results: Vec::new(),
            dispatched: BTreeSet::new(),
            skill_match: None,
            timeline: None,
            completeness: None,
            trust: None,
            red_flags: RedFlagReport::default(),
            tech_consistency: None,
            ats: None,
            summary: None,
            stages: Vec::new(),
            started_at: Utc::now(),
        };

        session.record(Stage::Extraction, StageOutcome::Completed);
        session.record(Stage::ClaimDetection, StageOutcome::Completed);

        match jd {
            JdInput::Extracted(jd) => {
                session.job_description = Some(jd);
                session.record(Stage::JdExtraction, StageOutcome::Completed);
            }
            JdInput::Absent => session.record(
                Stage::JdExtraction,
                StageOutcome::Skipped {
                    reason: "no job description supplied".to_string(),
                },
            ),
            JdInput::Failed(reason) => {
                tracing::warn!(error = %reason, "job description extraction failed");
                session.record(Stage::JdExtraction, StageOutcome::Failed { reason });
            }
        }

        tracing::info!(
            resume = %session.resume_id,
            claims = session.claims.len(),
            jd = session.job_description.is_some(),
            "analysis session opened"
        );

        Ok(session)
    }

    pub fn resume_id(&self) -> &str {
        &self.resume_id
    }

    pub fn job_description(&self) -> Option<&JobDescription> {
        self.job_description.as_ref()
    }

    pub fn profile(&self) -> &ResumeProfile {
        &self.profile
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    pub fn results(&self) -> &[VerificationResult] {
        &self.results
    }

    pub fn skill_match(&self) -> Option<&SkillMatch> {
        self.skill_match.as_ref()
    }

    pub fn timeline(&self) -> Option<&TimelineReport> {
        self.timeline.as_ref()
    }

    pub fn completeness(&self) -> Option<&CompletenessScore> {
        self.completeness.as_ref()
    }

    pub fn trust(&self) -> Option<&TrustScore> {
        self.trust.as_ref()
    }

    pub fn red_flags(&self) -> &RedFlagReport {
        &self.red_flags
    }

    pub fn tech_consistency(&self) -> Option<&TechConsistencyReport> {
        self.tech_consistency.as_ref()
    }

    pub fn ats(&self) -> Option<&AtsScore> {
        self.ats.as_ref()
    }

    pub fn summary(&self) -> Option<&ExecutiveSummary> {
        self.summary.as_ref()
    }

    pub fn stages(&self) -> &[StageRecord] {
        &self.stages
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn stage_outcome(&self, stage: Stage) -> Option<&StageOutcome> {
        self.stages
            .iter()
            .rev()
            .find(|r| r.stage == stage)
            .map(|r| &r.outcome)
    }

    /// Mark a stage as failed; its consumers see an absent value.
    pub fn fail_stage(&mut self, stage: Stage, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!(stage = %stage, error = %reason, "stage failed");
        self.record(stage, StageOutcome::Failed { reason });
    }

    fn is_failed(&self, stage: Stage) -> bool {
        matches!(self.stage_outcome(stage), Some(StageOutcome::Failed { .. }))
    }

    fn record(&mut self, stage: Stage, outcome: StageOutcome) {
        self.stages.push(StageRecord { stage, outcome });
    }

    /// Claim this (claim, agent) pair for dispatch.
    ///
    /// Returns false when the agent already processed the claim in this session.
    pub fn try_dispatch(&mut self, claim: &ClaimId, agent: &str) -> bool {
        self.dispatched.insert((claim.clone(), agent.to_string()))
    }

    pub fn was_dispatched(&self, claim: &ClaimId, agent: &str) -> bool {
        self.dispatched.contains(&(claim.clone(), agent.to_string()))
    }

    /// Match resume skills against the JD's required skills.
    pub fn run_skill_matcher(&mut self) {
        let outcome = match &self.job_description {
            None if self.is_failed(Stage::JdExtraction) => StageOutcome::Skipped {
                reason: "job description extraction failed".to_string(),
            },
            None => StageOutcome::Skipped {
                reason: "no job description supplied".to_string(),
            },
            Some(jd) => match match_skills(jd, &self.claims, &self.profile) {
                Some(result) => {
                    self.skill_match = Some(result);
                    StageOutcome::Completed
                }
                None => StageOutcome::Skipped {
                    reason: "job description lists no required skills".to_string(),
                },
            },
        };
        self.record(Stage::SkillMatcher, outcome);
    }

    /// Merge agent results onto the claim set.
    pub fn apply_verification(&mut self, results: Vec<VerificationResult>, config: &ScoringConfig) {
        let summary = apply_results(&mut self.claims, &results, &config.thresholds());
        let failed = results.iter().filter(|r| r.is_failed()).count();

        tracing::info!(
            agents = results.len(),
            failed_agents = failed,
            records = summary.records_applied,
            "verification merged"
        );

        self.results.extend(results);
        self.record(Stage::Verification, StageOutcome::Completed);
    }

    /// Run every post-verification stage in dependency order.
    pub fn finalize(&mut self, config: &ScoringConfig, as_of: YearMonth) {
        if !self.is_failed(Stage::TimelineValidator) {
            let report = TimelineValidator::new(config.timeline).validate(&self.profile.experience, as_of);
            self.timeline = Some(report);
            self.record(Stage::TimelineValidator, StageOutcome::Completed);
        }

        self.completeness = Some(score_completeness(&self.profile, &self.claims));
        self.record(Stage::CompletenessScorer, StageOutcome::Completed);

        self.trust = Some(TrustScorer::new(config.thresholds()).score(&self.claims));
        self.record(Stage::TrustScorer, StageOutcome::Completed);

        let mut ctx = RuleContext::new(&self.claims, &self.profile);
        if let Some(timeline) = &self.timeline {
            ctx = ctx.with_timeline(timeline);
        }
        self.red_flags = RedFlagDetector::new().detect(&ctx);
        self.record(Stage::RedFlagDetector, StageOutcome::Completed);

        self.tech_consistency = Some(check_consistency(&self.claims, &self.profile));
        self.record(Stage::TechConsistency, StageOutcome::Completed);

        let ats = AtsCalculator::new(config.ats_weights).calculate(&self.ats_inputs());
        let trust_score = self.trust.as_ref().map(|t| t.score).unwrap_or(0.0);
        let summary = Summarizer::new().summarize(ats.rounded(), rounded(trust_score), &self.red_flags);
        self.ats = Some(ats);
        self.record(Stage::AtsCalculator, StageOutcome::Completed);

        self.summary = Some(summary);
        self.record(Stage::ExecutiveSummary, StageOutcome::Completed);
    }

    fn ats_inputs(&self) -> AtsInputs {
        let jd_skill_match = match &self.skill_match {
            Some(m) => FactorValue::Measured(m.percentage),
            None => FactorValue::omitted(self.skip_reason(Stage::SkillMatcher)),
        };

        let timeline_consistency = match &self.timeline {
            Some(t) if t.estimated => FactorValue::estimated(t.score, "no dated experience entries"),
            Some(t) => FactorValue::Measured(t.score),
            None => FactorValue::omitted(self.skip_reason(Stage::TimelineValidator)),
        };

        let resume_completeness = match &self.completeness {
            Some(c) => FactorValue::Measured(c.score),
            None => FactorValue::omitted("completeness not scored"),
        };

        AtsInputs {
            jd_skill_match,
            verified_claims: AtsInputs::verified_claims_from(&self.claims),
            resume_completeness,
            timeline_consistency,
        }
    }

    fn skip_reason(&self, stage: Stage) -> String {
        match self.stage_outcome(stage) {
            Some(StageOutcome::Skipped { reason }) | Some(StageOutcome::Failed { reason }) => {
                reason.clone()
            }
            _ => format!("{} did not run", stage),
        }
    }
}

/// Round a [0, 100] score to the published integer.
pub(crate) fn rounded(score: f64) -> u8 {
    score.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::EvidenceRecord;
    use crate::extraction::ExperienceEntry;
    use crate::scoring::ComponentStatus;
    use crate::types::ClaimKind;
    use std::collections::BTreeMap;

    fn extraction(claims: Vec<Claim>) -> ExtractionResult {
        ExtractionResult::new("resume-1", claims, ResumeProfile::default())
    }

    fn as_of() -> YearMonth {
        YearMonth::new(2025, 1).unwrap()
    }

    #[test]
    fn test_stage_order_is_topological() {
        assert!(Stage::order_is_topological());
        for stage in Stage::ORDER {
            for dep in stage.dependencies() {
                assert!(dep.position() < stage.position(), "{} before {}", dep, stage);
            }
        }
    }

    #[test]
    fn test_zero_claims_fails() {
        let err = AnalysisSession::open(extraction(vec![]), JdInput::Absent).unwrap_err();
        assert!(matches!(err, AnalysisError::NoClaimsExtracted));
    }

    #[test]
    fn test_open_canonicalises_claims() {
        let claims = vec![
            Claim::new("s0", ClaimKind::Skill, "Rust", "Rust"),
            Claim::new("s1", ClaimKind::Skill, "rust", "rust"),
            Claim::new("s2", ClaimKind::Skill, "Leadership", "Leadership"),
        ];
        let session = AnalysisSession::open(extraction(claims), JdInput::Absent).unwrap();

        let ids: Vec<&str> = session.claims().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["s0", "s2"]);
        assert!(!session.claims()[1].verifiable);
    }

    #[test]
    fn test_dispatch_is_idempotent() {
        let claims = vec![Claim::new("s0", ClaimKind::Skill, "Rust", "Rust")];
        let mut session = AnalysisSession::open(extraction(claims), JdInput::Absent).unwrap();
        let id = ClaimId::new("s0");

        assert!(session.try_dispatch(&id, "github"));
        assert!(!session.try_dispatch(&id, "github"));
        assert!(session.try_dispatch(&id, "tech_consistency"));
        assert!(session.was_dispatched(&id, "github"));
    }

    #[test]
    fn test_absent_jd_omits_factor() {
        let claims = vec![Claim::new("s0", ClaimKind::Skill, "Rust", "Rust")];
        let config = ScoringConfig::default();
        let mut session = AnalysisSession::open(extraction(claims), JdInput::Absent).unwrap();

        session.run_skill_matcher();
        session.apply_verification(vec![], &config);
        session.finalize(&config, as_of());

        let ats = session.ats().unwrap();
        let jd = ats.breakdown.get("jd_skill_match").unwrap();
        assert_eq!(jd.status, ComponentStatus::Omitted);
        assert_eq!(jd.note.as_deref(), Some("no job description supplied"));

        let timeline = ats.breakdown.get("timeline_consistency").unwrap();
        assert_eq!(timeline.status, ComponentStatus::Estimated);
        assert!(session.summary().is_some());
    }

    #[test]
    fn test_failed_jd_stage_recorded() {
        let claims = vec![Claim::new("s0", ClaimKind::Skill, "Rust", "Rust")];
        let mut session =
            AnalysisSession::open(extraction(claims), JdInput::Failed("LLM timeout".into())).unwrap();
        session.run_skill_matcher();

        assert!(matches!(
            session.stage_outcome(Stage::JdExtraction),
            Some(StageOutcome::Failed { .. })
        ));
        assert_eq!(
            session.stage_outcome(Stage::SkillMatcher),
            Some(&StageOutcome::Skipped {
                reason: "job description extraction failed".to_string()
            })
        );
    }

    #[test]
    fn test_failed_timeline_stage_is_omitted_and_rules_skipped() {
        let claims = vec![Claim::new("e0", ClaimKind::Experience, "Engineer at Acme", "Acme")];
        let config = ScoringConfig::default();
        let mut profile = ResumeProfile::default();
        profile.experience.push(ExperienceEntry {
            organization: "Acme".to_string(),
            start: Some("2020-01".to_string()),
            ..Default::default()
        });
        let mut session = AnalysisSession::open(
            ExtractionResult::new("r", claims, profile),
            JdInput::Absent,
        )
        .unwrap();

        session.fail_stage(Stage::TimelineValidator, "validator unavailable");
        session.apply_verification(vec![], &config);
        session.finalize(&config, as_of());

        assert!(session.timeline().is_none());
        let ats = session.ats().unwrap();
        let timeline = ats.breakdown.get("timeline_consistency").unwrap();
        assert_eq!(timeline.status, ComponentStatus::Omitted);
        assert_eq!(ats.effective_weights.len(), 2);
        assert_eq!(session.red_flags().skipped_rules.len(), 2);
    }

    #[test]
    fn test_verification_applied_to_claims() {
        let claims = vec![Claim::new("s0", ClaimKind::Skill, "Rust", "Rust")];
        let config = ScoringConfig::default();
        let mut session = AnalysisSession::open(extraction(claims), JdInput::Absent).unwrap();

        let mut outcomes = BTreeMap::new();
        outcomes.insert(ClaimId::new("s0"), EvidenceRecord::supports("github", "3 repos", 95));
        let result = VerificationResult::completed(
            "github",
            [ClaimId::new("s0")].into_iter().collect(),
            outcomes,
        );
        session.apply_verification(vec![result], &config);
        session.finalize(&config, as_of());

        assert_eq!(session.claims()[0].confidence(), 95);
        assert_eq!(session.results().len(), 1);
        assert!(session.trust().unwrap().score > 90.0);
    }
}
