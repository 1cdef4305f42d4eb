//! Output formatters: console, JSON, Markdown and CSV

use crate::config::OutputFormat;
use crate::error::{Result, ScreenerError};
use crate::output::report::*;
use crate::processing::tiering::PredictedStatus;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for rendering a screening report
pub trait OutputFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console table with colours
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Candidate rows as CSV, skipped resumes appended with their reason
pub struct CsvFormatter;

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    csv_formatter: CsvFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn status_color(status: PredictedStatus) -> Color {
        match status {
            PredictedStatus::Shortlisted => Color::Green,
            PredictedStatus::RejectedSkillGap => Color::Yellow,
            PredictedStatus::RejectedExperience | PredictedStatus::RejectedScore => Color::Red,
        }
    }

    fn score_color(score: f32) -> Color {
        if score >= 80.0 {
            Color::Green
        } else if score >= 60.0 {
            Color::Yellow
        } else {
            Color::Red
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        let summary = &report.summary;
        let meta = &report.metadata;
        let mut output = String::new();

        output.push_str(&self.format_header("RESUME SCREENING RESULTS", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            meta.generated_at.format("%Y-%m-%d %H:%M:%S"),
            meta.processing_time_ms
        ));
        output.push_str(&format!(
            "Cutoff: {:.0}% | Minimum experience: {:.1} yrs | Job skills: {}\n",
            meta.cutoff_score,
            meta.min_experience,
            meta.job_skills.len()
        ));
        if summary.degraded {
            output.push_str(&self.colorize(
                "Models unavailable: scores use the lexical fallback and semantic similarity is 0.\n",
                Color::Yellow,
            ));
        }

        output.push_str(&self.format_header("Summary", 2));
        output.push_str(&format!(
            "Screened: {} | Shortlisted: {} | Skipped: {}\n",
            summary.resumes_screened,
            self.colorize(&summary.shortlisted.to_string(), Color::Green),
            summary.resumes_skipped
        ));
        output.push_str(&format!(
            "Average score: {:.2}% | Average experience: {:.1} yrs\n",
            summary.average_score, summary.average_experience
        ));

        output.push_str(&self.format_header("Candidates", 2));
        output.push_str(&format!(
            "{:<4} {:<24} {:>8} {:>6} {:>6}  {:<26} {:<7} {}\n",
            "#", "Candidate", "Score", "Yrs", "Sem", "Status", "Match", "Tag"
        ));
        for (i, row) in report.candidates.iter().enumerate() {
            // Pad before colouring so escape codes don't break alignment
            let score = format!("{:>7.2}%", row.score);
            let status = format!("{:<26}", row.predicted_status.to_string());
            output.push_str(&format!(
                "{:<4} {:<24} {} {:>6.1} {:>6.2}  {} {:<7} {}\n",
                i + 1,
                truncate(&row.candidate_name, 24),
                self.colorize(&score, Self::score_color(row.score)),
                row.years_experience,
                row.semantic_similarity,
                self.colorize(&status, Self::status_color(row.predicted_status)),
                row.match_level,
                row.tag
            ));

            if self.detailed {
                output.push_str(&format!("     Email: {} | Phone: {} | File: {}\n", row.email, row.phone, row.resume_name));
                output.push_str(&format!("     Matched: {}\n", self.colorize(&row.matched_skills, Color::Green)));
                output.push_str(&format!("     Missing: {}\n", self.colorize(&row.missing_skills, Color::Red)));
                output.push_str(&format!("     Suggestion: {}\n", row.suggestion));
            }
        }

        if !report.skipped.is_empty() {
            output.push_str(&self.format_header("Skipped Resumes", 2));
            for row in &report.skipped {
                output.push_str(&format!("  • {}: {}\n", row.resume_name, self.colorize(&row.reason, Color::Red)));
            }
        }

        if self.detailed {
            output.push_str(&self.format_header("Tag Distribution", 3));
            for tag in summary.tag_distribution.iter().filter(|t| t.count > 0) {
                output.push_str(&format!("  • {}: {}\n", tag.label, tag.count));
            }

            output.push_str(&self.format_header("Experience Distribution", 3));
            for bucket in &summary.experience_buckets {
                output.push_str(&format!("  • {}: {}\n", bucket.label, bucket.count));
            }

            if !summary.top_missing_skills.is_empty() {
                output.push_str(&self.format_header("Most Common Missing Skills", 3));
                for skill in &summary.top_missing_skills {
                    output.push_str(&format!("  • {} ({})\n", skill.label, skill.count));
                }
            }

            if !report.top_assessments.is_empty() {
                output.push_str(&self.format_header("Top Candidate Assessments", 2));
                for assessment in &report.top_assessments {
                    output.push_str(&format!(
                        "{} ({:.2}%)\n  {}\n\n",
                        self.colorize(&assessment.candidate_name, Color::Cyan),
                        assessment.score,
                        assessment.assessment
                    ));
                }
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        let summary = &report.summary;
        let mut output = String::new();

        output.push_str("# Resume Screening Results\n\n");

        if self.include_metadata {
            let meta = &report.metadata;
            output.push_str(&format!(
                "**Generated:** {}  \n**Cutoff:** {:.0}%  \n**Minimum experience:** {:.1} yrs  \n**Job skills:** {}\n\n",
                meta.generated_at.format("%Y-%m-%d %H:%M:%S"),
                meta.cutoff_score,
                meta.min_experience,
                if meta.job_skills.is_empty() {
                    "None".to_string()
                } else {
                    meta.job_skills.join(", ")
                }
            ));
        }

        if summary.degraded {
            output.push_str("> Models were unavailable; scores use the lexical fallback.\n\n");
        }

        output.push_str("## Summary\n\n");
        output.push_str(&format!(
            "| Screened | Shortlisted | Skipped | Avg. score | Avg. experience |\n|---|---|---|---|---|\n| {} | {} | {} | {:.2}% | {:.1} yrs |\n\n",
            summary.resumes_screened,
            summary.shortlisted,
            summary.resumes_skipped,
            summary.average_score,
            summary.average_experience
        ));

        output.push_str("## Candidates\n\n");
        output.push_str("| Candidate Name | Email | Score (%) | Years Experience | Semantic Similarity | Predicted Status | Match Level | Tag | Missing Skills |\n");
        output.push_str("|---|---|---|---|---|---|---|---|---|\n");
        for row in &report.candidates {
            output.push_str(&format!(
                "| {} | {} | {:.2} | {:.1} | {:.2} | {} | {} | {} | {} |\n",
                Self::cell(&row.candidate_name),
                Self::cell(&row.email),
                row.score,
                row.years_experience,
                row.semantic_similarity,
                row.predicted_status,
                row.match_level,
                row.tag,
                Self::cell(&row.missing_skills)
            ));
        }
        output.push('\n');

        if !report.skipped.is_empty() {
            output.push_str("## Skipped Resumes\n\n");
            for row in &report.skipped {
                output.push_str(&format!("- **{}**: {}\n", row.resume_name, row.reason));
            }
            output.push('\n');
        }

        if !report.top_assessments.is_empty() {
            output.push_str("## Top Candidates\n\n");
            for assessment in &report.top_assessments {
                output.push_str(&format!(
                    "### {} ({:.2}%)\n\n{}\n\n",
                    assessment.candidate_name, assessment.score, assessment.assessment
                ));
            }
        }

        if !summary.top_matched_skills.is_empty() || !summary.top_missing_skills.is_empty() {
            output.push_str("## Skills\n\n");
            let list = |items: &[LabelCount]| {
                items
                    .iter()
                    .map(|s| format!("{} ({})", s.label, s.count))
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            output.push_str(&format!("- **Most matched:** {}\n", list(&summary.top_matched_skills)));
            output.push_str(&format!("- **Most missing:** {}\n", list(&summary.top_missing_skills)));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl OutputFormatter for CsvFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(CandidateRow::HEADERS)?;

        for row in &report.candidates {
            writer.write_record(row.record())?;
        }

        let resume_col = skipped_column("Resume Name")?;
        let status_col = skipped_column("Predicted Status")?;
        let reason_col = skipped_column("Suggestion")?;
        for skipped in &report.skipped {
            let mut record = vec![String::new(); CandidateRow::HEADERS.len()];
            record[resume_col] = skipped.resume_name.clone();
            record[status_col] = "Skipped".to_string();
            record[reason_col] = skipped.reason.clone();
            writer.write_record(&record)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ScreenerError::OutputFormatting(format!("Failed to flush CSV: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| ScreenerError::OutputFormatting(format!("CSV is not UTF-8: {}", e)))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Csv
    }
}

fn skipped_column(header: &str) -> Result<usize> {
    CandidateRow::column(header)
        .ok_or_else(|| ScreenerError::OutputFormatting(format!("CSV has no '{}' column", header)))
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    pub fn with_options(use_colors: bool, detailed: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
            csv_formatter: CsvFormatter,
        }
    }

    pub fn generate_report(&self, report: &ScreeningReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Csv => self.csv_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

/// Output format implied by a file extension, if any.
pub fn format_for_path(path: &Path) -> Option<OutputFormat> {
    match path.extension()?.to_str()?.to_lowercase().as_str() {
        "json" => Some(OutputFormat::Json),
        "md" | "markdown" => Some(OutputFormat::Markdown),
        "csv" => Some(OutputFormat::Csv),
        "txt" => Some(OutputFormat::Console),
        _ => None,
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::report::tests::run;
    use crate::processing::screener::SortKey;
    use tempfile::TempDir;

    fn report() -> ScreeningReport {
        ScreeningReport::from_run(&run(), SortKey::Score)
    }

    #[test]
    fn test_console_without_colors() {
        let output = ConsoleFormatter::new(false, true).format_report(&report()).unwrap();

        assert!(output.contains("RESUME SCREENING RESULTS"));
        assert!(output.contains("Erin"));
        assert!(output.contains("scan.pdf: no text could be extracted"));
        assert!(output.contains("Models unavailable"));
        assert!(output.contains("Erin assessment."));
        assert!(!output.contains("\u{1b}["));
    }

    #[test]
    fn test_csv_has_export_header_and_skips() {
        let output = CsvFormatter.format_report(&report()).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("Candidate Name,Email,Phone,Resume Name,Score (%)"));
        assert!(lines[1].starts_with("Erin,erin@example.com,N/A,erin.pdf,90.00,12.0"));
        assert_eq!(lines.len(), 5);
        assert!(lines[4].contains("scan.pdf"));
        assert!(lines[4].contains("Skipped"));
    }

    #[test]
    fn test_csv_round_trips_rows() {
        let output = CsvFormatter.format_report(&report()).unwrap();
        let mut reader = csv::Reader::from_reader(output.as_bytes());

        let first = reader.records().next().unwrap().unwrap();

        assert_eq!(&first[0], "Erin");
        assert_eq!(&first[10], "python, sql");
    }

    #[test]
    fn test_csv_skipped_rows_fill_named_columns() {
        let output = CsvFormatter.format_report(&report()).unwrap();
        let mut reader = csv::Reader::from_reader(output.as_bytes());
        let headers = reader.headers().unwrap().clone();
        let skipped = reader.records().last().unwrap().unwrap();
        let cell = |name: &str| {
            let i = headers.iter().position(|h| h == name).unwrap();
            skipped[i].to_string()
        };

        assert_eq!(cell("Resume Name"), "scan.pdf");
        assert_eq!(cell("Predicted Status"), "Skipped");
        assert_eq!(cell("Suggestion"), "no text could be extracted");
        assert_eq!(cell("Keywords in JD & Resume"), "");
    }

    #[test]
    fn test_status_colors_follow_the_status() {
        assert_eq!(ConsoleFormatter::status_color(PredictedStatus::Shortlisted), Color::Green);
        assert_eq!(ConsoleFormatter::status_color(PredictedStatus::RejectedSkillGap), Color::Yellow);
        assert_eq!(ConsoleFormatter::status_color(PredictedStatus::RejectedExperience), Color::Red);
        assert_eq!(ConsoleFormatter::status_color(PredictedStatus::RejectedScore), Color::Red);
    }

    #[test]
    fn test_json_report_parses() {
        let output = JsonFormatter::new(false).format_report(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["summary"]["resumes_screened"], 3);
        assert_eq!(value["candidates"][0]["Score (%)"], 90.0);
        assert_eq!(value["skipped"][0]["Resume Name"], "scan.pdf");
    }

    #[test]
    fn test_markdown_tables() {
        let output = MarkdownFormatter::new(true).format_report(&report()).unwrap();

        assert!(output.contains("# Resume Screening Results"));
        assert!(output.contains("| Erin | erin@example.com | 90.00 | 12.0 |"));
        assert!(output.contains("- **scan.pdf**: no text could be extracted"));
        assert!(output.contains("**Job skills:** docker, python, sql"));
    }

    #[test]
    fn test_format_for_path_and_save() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("results.csv");

        assert_eq!(format_for_path(&path), Some(OutputFormat::Csv));
        assert_eq!(format_for_path(Path::new("results")), None);

        save_report_to_file("a,b\n", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,b\n");
    }

    #[test]
    fn test_generator_routes_formats() {
        let generator = ReportGenerator::with_options(false, false);
        let report = report();

        assert!(generator.generate_report(&report, &OutputFormat::Json).unwrap().starts_with('{'));
        assert!(generator
            .generate_report(&report, &OutputFormat::Csv)
            .unwrap()
            .starts_with("Candidate Name"));
    }
}
