//! Command-line arguments.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// VERITAS - verify resume claims and score candidate fit.
#[derive(Debug, Parser)]
#[command(name = "veritas")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Verify an extracted resume and print the report
    Analyze(AnalyzeArgs),

    /// Validate a configuration file and print the effective values
    CheckConfig(CheckConfigArgs),
}

#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Extraction result (JSON)
    #[arg(short, long)]
    pub extraction: PathBuf,

    /// Extracted job description (JSON)
    #[arg(short, long)]
    pub jd: Option<PathBuf>,

    /// Offline evidence snapshot for GitHub, Kaggle and LinkedIn (JSON)
    #[arg(short, long)]
    pub sources: Option<PathBuf>,

    /// Analysis configuration (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Reference month for ongoing roles (YYYY-MM); defaults to the current month
    #[arg(long)]
    pub as_of: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,
}

#[derive(Debug, Parser)]
pub struct CheckConfigArgs {
    /// Configuration file (YAML or JSON)
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The report JSON
    Json,
    /// Human-readable summary
    Text,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::parse_from([
            "veritas",
            "-v",
            "analyze",
            "--extraction",
            "resume.json",
            "--jd",
            "jd.json",
            "--format",
            "text",
        ]);

        assert_eq!(cli.verbose, 1);
        match cli.command {
            Command::Analyze(args) => {
                assert_eq!(args.extraction, PathBuf::from("resume.json"));
                assert_eq!(args.jd, Some(PathBuf::from("jd.json")));
                assert_eq!(args.format, OutputFormat::Text);
                assert!(args.sources.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_check_config() {
        let cli = Cli::parse_from(["veritas", "check-config", "veritas.yaml"]);
        assert!(matches!(cli.command, Command::CheckConfig(_)));
    }
}
