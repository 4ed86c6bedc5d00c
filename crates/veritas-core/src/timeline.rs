//! Timeline validation over work experience entries.
//!
//! Dates are month-granular and inclusive: a role from 2020-01 to 2021-03
//! covers 15 months. An ongoing role ends at the `as_of` month.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::claim::ClaimId;
use crate::config::TimelineTolerance;
use crate::extraction::patterns::{ONGOING_PATTERN, YEAR_MONTH_PATTERN};
use crate::extraction::ExperienceEntry;

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// Returns None for a month outside 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
        }
    }

    /// The current month (UTC).
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Months since year 0, for arithmetic.
    fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    /// Signed number of months from `self` to `other`.
    pub fn months_until(&self, other: YearMonth) -> i64 {
        other.ordinal() - self.ordinal()
    }

    /// Parse "2021-03" or "2021". A bare year resolves to `default_month`.
    fn parse(raw: &str, default_month: u32) -> Option<Self> {
        let caps = YEAR_MONTH_PATTERN.captures(raw)?;
        let year = caps.get(1)?.as_str().parse().ok()?;
        let month = match caps.get(2) {
            Some(m) => m.as_str().parse().ok()?,
            None => default_month,
        };
        Self::new(year, month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.trim(), 1).ok_or_else(|| format!("invalid month '{}', expected YYYY-MM", s))
    }
}

/// A resolved employment period with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: YearMonth,
    pub end: YearMonth,
    pub ongoing: bool,
}

impl Period {
    /// Resolve an entry's raw dates. A bare start year means January, a bare end year December.
    pub fn resolve(
        start: Option<&str>,
        end: Option<&str>,
        as_of: YearMonth,
    ) -> Result<Self, String> {
        let raw_start = start.map(str::trim).filter(|s| !s.is_empty());
        let start = match raw_start {
            Some(s) => YearMonth::parse(s, 1).ok_or_else(|| format!("unparseable start date '{}'", s))?,
            None => return Err("missing start date".to_string()),
        };

        let raw_end = end.map(str::trim).filter(|s| !s.is_empty());
        let (end, ongoing) = match raw_end {
            None => (as_of, true),
            Some(s) if ONGOING_PATTERN.is_match(s) => (as_of, true),
            Some(s) => (
                YearMonth::parse(s, 12).ok_or_else(|| format!("unparseable end date '{}'", s))?,
                false,
            ),
        };

        if end < start {
            return Err(format!("end {} precedes start {}", end, start));
        }

        Ok(Self { start, end, ongoing })
    }

    /// Inclusive length in months.
    pub fn months(&self) -> i64 {
        self.start.months_until(self.end) + 1
    }

    /// Number of months covered by both periods.
    pub fn overlap_months(&self, other: &Period) -> i64 {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start.months_until(end) + 1).max(0)
    }
}

/// Two entries whose periods overlap beyond tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineOverlap {
    pub first: usize,
    pub second: usize,
    pub first_organization: String,
    pub second_organization: String,
    pub first_claim: Option<ClaimId>,
    pub second_claim: Option<ClaimId>,
    pub months: i64,
}

/// An unexplained gap between consecutive entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineGap {
    /// Entry the gap follows
    pub before: usize,
    /// Entry the gap precedes
    pub after: usize,
    pub after_claim: Option<ClaimId>,
    pub from: YearMonth,
    pub to: YearMonth,
    pub months: i64,
}

/// Per-entry verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryStatus {
    pub index: usize,
    pub organization: String,
    pub claim_id: Option<ClaimId>,
    pub period: Option<Period>,
    pub consistent: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
}

/// Result of validating all experience entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineReport {
    pub entries: Vec<EntryStatus>,
    pub overlaps: Vec<TimelineOverlap>,
    pub gaps: Vec<TimelineGap>,
    pub consistent_entries: usize,
    pub total_entries: usize,

    /// Share of consistent entries (0-100)
    pub score: f64,

    /// True when there were no entries to check and the score is assumed
    pub estimated: bool,
}

impl TimelineReport {
    pub fn entry_for_claim(&self, claim: &ClaimId) -> Option<&EntryStatus> {
        self.entries
            .iter()
            .find(|e| e.claim_id.as_ref() == Some(claim))
    }
}

/// Checks experience entries for overlaps, gaps and invalid dates.
pub struct TimelineValidator {
    tolerance: TimelineTolerance,
}

impl TimelineValidator {
    pub fn new(tolerance: TimelineTolerance) -> Self {
        Self { tolerance }
    }

    pub fn validate(&self, entries: &[ExperienceEntry], as_of: YearMonth) -> TimelineReport {
        let mut statuses: Vec<EntryStatus> = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let resolved = Period::resolve(entry.start.as_deref(), entry.end.as_deref(), as_of);
                let (period, issues) = match resolved {
                    Ok(p) => (Some(p), Vec::new()),
                    Err(issue) => (None, vec![issue]),
                };
                EntryStatus {
                    index,
                    organization: entry.organization.clone(),
                    claim_id: entry.claim_id.clone(),
                    period,
                    consistent: false,
                    issues,
                }
            })
            .collect();

        let overlaps = self.find_overlaps(&statuses);
        for overlap in &overlaps {
            statuses[overlap.first].issues.push(format!(
                "overlaps {} by {} months",
                overlap.second_organization, overlap.months
            ));
            statuses[overlap.second].issues.push(format!(
                "overlaps {} by {} months",
                overlap.first_organization, overlap.months
            ));
        }

        let gaps = self.find_gaps(&statuses);
        for gap in &gaps {
            statuses[gap.after]
                .issues
                .push(format!("preceded by a {}-month gap", gap.months));
        }

        for status in &mut statuses {
            status.consistent = status.issues.is_empty();
        }

        let total_entries = statuses.len();
        let consistent_entries = statuses.iter().filter(|s| s.consistent).count();
        let (score, estimated) = if total_entries == 0 {
            (100.0, true)
        } else {
            (consistent_entries as f64 / total_entries as f64 * 100.0, false)
        };

        tracing::debug!(
            total = total_entries,
            consistent = consistent_entries,
            overlaps = overlaps.len(),
            gaps = gaps.len(),
            "timeline validated"
        );

        TimelineReport {
            entries: statuses,
            overlaps,
            gaps,
            consistent_entries,
            total_entries,
            score,
            estimated,
        }
    }

    fn find_overlaps(&self, statuses: &[EntryStatus]) -> Vec<TimelineOverlap> {
        let tolerance = self.tolerance.overlap_tolerance_months as i64;
        let mut overlaps = Vec::new();

        for (i, a) in statuses.iter().enumerate() {
            let Some(pa) = a.period else { continue };
            for b in statuses.iter().skip(i + 1) {
                let Some(pb) = b.period else { continue };
                let months = pa.overlap_months(&pb);
                if months > tolerance {
                    overlaps.push(TimelineOverlap {
                        first: a.index,
                        second: b.index,
                        first_organization: a.organization.clone(),
                        second_organization: b.organization.clone(),
                        first_claim: a.claim_id.clone(),
                        second_claim: b.claim_id.clone(),
                        months,
                    });
                }
            }
        }

        overlaps
    }

    fn find_gaps(&self, statuses: &[EntryStatus]) -> Vec<TimelineGap> {
        let tolerance = self.tolerance.gap_tolerance_months as i64;

        let mut dated: Vec<(usize, Period)> = statuses
            .iter()
            .filter_map(|s| s.period.map(|p| (s.index, p)))
            .collect();
        dated.sort_by_key(|(index, p)| (p.start, *index));

        let mut gaps = Vec::new();
        let mut covered: Option<(usize, YearMonth)> = None;

        for (index, period) in dated {
            if let Some((before, covered_to)) = covered {
                let months = covered_to.months_until(period.start) - 1;
                if months > tolerance {
                    gaps.push(TimelineGap {
                        before,
                        after: index,
                        after_claim: statuses[index].claim_id.clone(),
                        from: covered_to,
                        to: period.start,
                        months,
                    });
                }
            }

            covered = match covered {
                Some((before, end)) if end >= period.end => Some((before, end)),
                _ => Some((index, period.end)),
            };
        }

        gaps
    }
}
