//! CLI interface for the resume screener

use crate::config::OutputFormat;
use crate::processing::SortKey;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-screener")]
#[command(about = "Batch resume screening against a job description")]
#[command(long_about = "Score, tier and rank a batch of resumes against one job description using skill coverage, semantic similarity and a learned scorer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Screen resumes against a job description
    Screen {
        /// Path to job description file (TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Resume files (PDF, TXT, MD) or directories containing them
        #[arg(short, long, num_args = 1.., required = true)]
        resumes: Vec<PathBuf>,

        /// Minimum score to shortlist (0-100)
        #[arg(long)]
        cutoff: Option<f32>,

        /// Minimum years of experience
        #[arg(long)]
        min_experience: Option<f32>,

        /// Output format: console, json, markdown, csv
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file (format inferred from extension unless --output is given)
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Skip the embedding model and learned scorer (lexical fallback only)
        #[arg(long)]
        no_model: bool,

        /// Per-resume timeout in seconds (at least 1)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: Option<u64>,

        /// Include contact details, skills and assessments
        #[arg(short, long)]
        detailed: bool,

        /// Sort order: score, name, status
        #[arg(long, default_value = "score")]
        sort: String,
    },

    /// Show or manage configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "csv" => Ok(OutputFormat::Csv),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown, csv", format)),
    }
}

pub fn parse_sort_key(key: &str) -> Result<SortKey, String> {
    match key.to_lowercase().as_str() {
        "score" => Ok(SortKey::Score),
        "name" => Ok(SortKey::Name),
        "status" => Ok(SortKey::Status),
        _ => Err(format!("Invalid sort order: {}. Supported: score, name, status", key)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_screen_accepts_several_resumes() {
        let cli = Cli::try_parse_from([
            "resume-screener",
            "screen",
            "--job",
            "job.txt",
            "--resumes",
            "a.pdf",
            "cvs/",
            "--cutoff",
            "70",
            "--no-model",
        ])
        .unwrap();

        match cli.command {
            Commands::Screen { resumes, cutoff, no_model, sort, .. } => {
                assert_eq!(resumes, vec![PathBuf::from("a.pdf"), PathBuf::from("cvs/")]);
                assert_eq!(cutoff, Some(70.0));
                assert!(no_model);
                assert_eq!(sort, "score");
            }
            _ => panic!("expected screen command"),
        }
    }

    #[test]
    fn test_screen_requires_resumes() {
        assert!(Cli::try_parse_from(["resume-screener", "screen", "--job", "job.txt"]).is_err());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let args = |timeout: &'static str| {
            Cli::try_parse_from([
                "resume-screener",
                "screen",
                "--job",
                "job.txt",
                "--resumes",
                "a.pdf",
                "--timeout",
                timeout,
            ])
        };

        assert!(args("0").is_err());
        match args("5").unwrap().command {
            Commands::Screen { timeout, .. } => assert_eq!(timeout, Some(5)),
            _ => panic!("expected screen command"),
        }
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_output_format("MD"), Ok(OutputFormat::Markdown));
        assert_eq!(parse_output_format("csv"), Ok(OutputFormat::Csv));
        assert!(parse_output_format("html").is_err());
        assert_eq!(parse_sort_key("Status"), Ok(SortKey::Status));
        assert!(parse_sort_key("age").is_err());
        assert!(validate_file_extension(Path::new("job.md"), &["txt", "md"]).is_ok());
        assert!(validate_file_extension(Path::new("job"), &["txt", "md"]).is_err());
    }
}
