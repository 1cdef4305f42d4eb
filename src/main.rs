//! Resume screener: batch resume screening against a job description

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use resume_screener::cli::{self, Cli, Commands, ConfigAction};
use resume_screener::config::{Config, OutputFormat};
use resume_screener::error::{Result, ScreenerError};
use resume_screener::input::InputManager;
use resume_screener::output::formatter::{format_for_path, save_report_to_file, ReportGenerator};
use resume_screener::output::report::ScreeningReport;
use resume_screener::processing::events::FanoutSink;
use resume_screener::processing::{EventSink, LogSink, ModelRegistry, Screener, ScreeningCriteria, ScreeningEvent};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config, cli.config, cli.verbose).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>, verbose: bool) -> Result<()> {
    match command {
        Commands::Screen {
            job,
            resumes,
            cutoff,
            min_experience,
            output,
            save,
            no_model,
            timeout,
            detailed,
            sort,
        } => {
            cli::validate_file_extension(&job, &["txt", "md", "pdf"])
                .map_err(|e| ScreenerError::InvalidInput(format!("Job description file: {}", e)))?;

            let output_format = match (&output, &save) {
                (Some(format), _) => cli::parse_output_format(format).map_err(ScreenerError::InvalidInput)?,
                (None, Some(path)) => format_for_path(path).unwrap_or(config.output.format),
                (None, None) => config.output.format,
            };
            let sort_key = cli::parse_sort_key(&sort).map_err(ScreenerError::InvalidInput)?;

            let criteria = ScreeningCriteria::new(
                cutoff.unwrap_or(config.screening.cutoff_score),
                min_experience.unwrap_or(config.screening.min_experience),
            )?;

            let registry = if no_model || !config.models.enabled {
                info!("Model scoring disabled, using lexical fallback");
                ModelRegistry::disabled()
            } else {
                ModelRegistry::new(config.models.clone())
            };

            let mut screener = Screener::new(&config, Arc::new(registry))?;
            if let Some(secs) = timeout {
                screener = screener.with_timeout(Duration::from_secs(secs));
            }

            let input_manager = InputManager::new();
            let job_text = input_manager.extract_text(&job).await?;
            let paths = input_manager.collect_paths(&resumes).await?;
            info!("Screening {} resume(s) against {}", paths.len(), job.display());
            let uploads = input_manager.read_uploads(&paths).await;

            let progress = ProgressSink::new();
            let run = if verbose {
                let sink = FanoutSink::new(vec![&progress as &dyn EventSink, &LogSink as &dyn EventSink]);
                screener.screen(&job_text, uploads, criteria, &sink).await?
            } else {
                screener.screen(&job_text, uploads, criteria, &progress).await?
            };

            let report = ScreeningReport::from_run(&run, sort_key);
            let use_colors = config.output.color_output && save.is_none();
            let generator = ReportGenerator::with_options(use_colors, detailed || config.output.detailed);
            let content = generator.generate_report(&report, &output_format)?;

            match save {
                Some(path) => {
                    save_report_to_file(&content, &path)?;
                    println!("Results saved to {}", path.display());
                    if output_format != OutputFormat::Console {
                        println!(
                            "{} screened, {} shortlisted, {} skipped",
                            report.summary.resumes_screened, report.summary.shortlisted, report.summary.resumes_skipped
                        );
                    }
                }
                None => println!("{}", content),
            }
        }

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    println!("Configuration ({})\n", path.display());
                    println!("Models:");
                    println!("  Enabled: {}", config.models.enabled);
                    println!("  Embedding model: {}", config.models.embedding_model);
                    match &config.models.score_model_path {
                        Some(weights) => println!("  Score model: {}", weights.display()),
                        None => println!("  Score model: not configured"),
                    }
                    println!("\nScreening:");
                    println!("  Cutoff score: {:.0}", config.screening.cutoff_score);
                    println!("  Minimum experience: {:.1} yrs", config.screening.min_experience);
                    println!("  Per-resume timeout: {}s", config.screening.resume_timeout_secs);
                    println!("\nScoring weights:");
                    println!("  Model: {:.1}%", config.scoring.model_weight * 100.0);
                    println!("  Skill coverage: {:.1}%", config.scoring.coverage_weight * 100.0);
                    println!("  Semantic: {:.1}%", config.scoring.semantic_weight * 100.0);
                    println!("\nOutput: {:?} (detailed: {}, colour: {})", config.output.format, config.output.detailed, config.output.color_output);
                }

                Some(ConfigAction::Reset) => {
                    Config::default().save_to(&path)?;
                    println!("Configuration reset to defaults at {}", path.display());
                }

                Some(ConfigAction::Path) => {
                    println!("{}", path.display());
                }
            }
        }
    }

    Ok(())
}

/// Drives a progress bar, one tick per resume.
struct ProgressSink {
    bar: ProgressBar,
}

impl ProgressSink {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}") {
            bar.set_style(style.progress_chars("=> "));
        }
        Self { bar }
    }
}

impl EventSink for ProgressSink {
    fn emit(&self, event: &ScreeningEvent) {
        match event {
            ScreeningEvent::BatchStarted { total, .. } => self.bar.set_length(*total as u64),
            ScreeningEvent::ResumeProcessed { resume, .. } | ScreeningEvent::ResumeSkipped { resume, .. } => {
                if let Some((done, _)) = event.progress() {
                    self.bar.set_position(done as u64);
                }
                self.bar.set_message(resume.clone());
            }
            ScreeningEvent::BatchCompleted { .. } => self.bar.finish_and_clear(),
        }
    }
}
