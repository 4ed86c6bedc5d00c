//! VERITAS CLI - verify resume claims and score candidate fit.

mod cli;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use veritas_core::{ExtractionResult, JdInput, JobDescription, YearMonth};
use veritas_runtime::{AnalysisConfig, CredentialSet, PipelineController, SnapshotSource, SourceSet};

use cli::{AnalyzeArgs, CheckConfigArgs, Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Analyze(args) => analyze(args).await,
        Command::CheckConfig(args) => check_config(args),
    }
}

/// Logs go to stderr so the report on stdout stays machine-readable.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn analyze(args: AnalyzeArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    let extraction = ExtractionResult::from_json_file(&args.extraction)
        .with_context(|| format!("Failed to load extraction result from {}", args.extraction.display()))?;

    let jd = load_jd(args.jd.as_deref());

    let sources = match &args.sources {
        Some(path) => {
            let snapshot = SnapshotSource::from_file(path)
                .with_context(|| format!("Failed to load evidence snapshot from {}", path.display()))?;
            SourceSet::from_snapshot(snapshot)
        }
        None => {
            tracing::warn!("no evidence snapshot given; profile agents will find nothing");
            SourceSet::empty()
        }
    };

    let mut controller = PipelineController::new(config, &sources, CredentialSet::from_env())
        .context("Invalid analysis configuration")?;
    if let Some(raw) = &args.as_of {
        let as_of: YearMonth = raw.parse().map_err(anyhow::Error::msg)?;
        controller = controller.with_as_of(as_of);
    }

    let report = controller.run(extraction, jd).await.context("Analysis failed")?;
    println!("{}", output::render(&report, args.format)?);

    Ok(())
}

/// An unreadable job description degrades the run instead of aborting it.
fn load_jd(path: Option<&Path>) -> JdInput {
    let Some(path) = path else {
        return JdInput::Absent;
    };

    match JobDescription::from_json_file(path) {
        Ok(jd) => JdInput::Extracted(jd),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "job description unusable; scoring without it");
            JdInput::Failed(e.to_string())
        }
    }
}

#[derive(Serialize)]
struct EffectiveConfig<'a> {
    #[serde(flatten)]
    config: &'a AnalysisConfig,
    credentials: Vec<String>,
}

fn check_config(args: CheckConfigArgs) -> Result<()> {
    let config = AnalysisConfig::from_file(&args.path)
        .with_context(|| format!("Failed to load config from {}", args.path.display()))?;

    let effective = EffectiveConfig {
        config: &config,
        credentials: CredentialSet::from_env().configured(),
    };

    print!("{}", serde_yaml::to_string(&effective)?);
    eprintln!("{}: OK", args.path.display());

    Ok(())
}
