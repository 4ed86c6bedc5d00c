//! Report rendering.

use std::fmt::{self, Write};

use veritas_core::{ComponentStatus, Report, StageOutcome};

use crate::cli::OutputFormat;

pub fn render(report: &Report, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => report.to_json_pretty()?,
        OutputFormat::Text => render_text(report)?,
    })
}

/// Human-readable summary of a report.
pub fn render_text(report: &Report) -> Result<String, fmt::Error> {
    let mut out = String::new();

    writeln!(out, "VERITAS report: {}", report.resume_id)?;
    writeln!(out, "{}", report.headline)?;
    writeln!(out, "{}", report.reasoning)?;
    writeln!(out)?;

    writeln!(out, "Trust score: {}/100 ({})", report.trust_score, report.trust_label)?;
    writeln!(out, "ATS score:   {}/100 ({})", report.ats_score.value, report.ats_score.status)?;
    for (name, factor) in &report.ats_score.breakdown {
        match factor.status {
            ComponentStatus::Omitted => writeln!(
                out,
                "  {:<22} omitted ({})",
                name,
                factor.note.as_deref().unwrap_or("no data")
            )?,
            status => {
                let marker = if status == ComponentStatus::Estimated { " (estimated)" } else { "" };
                writeln!(
                    out,
                    "  {:<22} {:>5.1}% x {:.2} = {:>5.1}{}",
                    name, factor.percentage, factor.weight, factor.weighted_contribution, marker
                )?
            }
        }
    }
    writeln!(out, "  {}", report.ats_score.formula)?;
    writeln!(out)?;

    let v = &report.verification_summary;
    writeln!(
        out,
        "Claims: {} total, {} verified, {} partially verified, {} unverified, {} contradicted, {} non-verifiable",
        v.total_claims, v.verified, v.partially_verified, v.unverified, v.contradicted, v.non_verifiable
    )?;
    for agent in &v.agents {
        match &agent.error {
            Some(err) => writeln!(out, "  {:<18} {} claims, failed: {}", agent.name, agent.claims_addressed, err)?,
            None => writeln!(out, "  {:<18} {} claims", agent.name, agent.claims_addressed)?,
        }
    }
    writeln!(out)?;

    if report.red_flags.is_empty() {
        writeln!(out, "Red flags: none")?;
    } else {
        writeln!(out, "Red flags ({}):", report.red_flags.len())?;
        for flag in &report.red_flags {
            writeln!(
                out,
                "  [{}] {}: {}",
                flag.severity.to_string().to_uppercase(),
                flag.category,
                flag.description
            )?;
        }
    }
    for skipped in &report.skipped_rules {
        writeln!(out, "  skipped {}: {}", skipped.category, skipped.reason)?;
    }

    let degraded: Vec<_> = report
        .stages
        .iter()
        .filter_map(|record| match &record.outcome {
            StageOutcome::Completed => None,
            StageOutcome::Skipped { reason } => Some(format!("{} skipped: {}", record.stage, reason)),
            StageOutcome::Failed { reason } => Some(format!("{} failed: {}", record.stage, reason)),
        })
        .collect();
    if !degraded.is_empty() {
        writeln!(out)?;
        writeln!(out, "Degraded stages:")?;
        for line in degraded {
            writeln!(out, "  {}", line)?;
        }
    }

    Ok(out)
}
