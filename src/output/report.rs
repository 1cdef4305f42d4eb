//! Screening report: exported candidate rows plus dashboard aggregates

use crate::processing::contact::NOT_FOUND;
use crate::processing::screener::{ScoreResult, ScreeningRun, SkippedResume, SortKey};
use crate::processing::tiering::{CandidateTag, PredictedStatus};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const TOP_MATCHED_SKILLS: usize = 5;
const TOP_MISSING_SKILLS: usize = 10;
const TOP_ASSESSMENTS: usize = 3;

/// Everything a formatter renders for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub summary: RunSummary,
    /// Candidates in display order.
    pub candidates: Vec<CandidateRow>,
    pub skipped: Vec<SkippedRow>,
    /// Narratives for the highest scoring candidates.
    pub top_assessments: Vec<CandidateAssessment>,
    pub metadata: ReportMetadata,
}

/// One scored resume under the field names downstream tools read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRow {
    #[serde(rename = "Candidate Name")]
    pub candidate_name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Resume Name")]
    pub resume_name: String,
    #[serde(rename = "Score (%)")]
    pub score: f32,
    #[serde(rename = "Years Experience")]
    pub years_experience: f32,
    #[serde(rename = "Semantic Similarity")]
    pub semantic_similarity: f32,
    #[serde(rename = "Predicted Status")]
    pub predicted_status: PredictedStatus,
    #[serde(rename = "Match Level")]
    pub match_level: String,
    #[serde(rename = "Tag")]
    pub tag: String,
    #[serde(rename = "Matched Skills")]
    pub matched_skills: String,
    #[serde(rename = "Missing Skills")]
    pub missing_skills: String,
    #[serde(rename = "Keywords in JD & Resume")]
    pub shared_keywords: String,
    #[serde(rename = "Suggestion")]
    pub suggestion: String,
}

impl CandidateRow {
    pub const HEADERS: [&'static str; 14] = [
        "Candidate Name",
        "Email",
        "Phone",
        "Resume Name",
        "Score (%)",
        "Years Experience",
        "Semantic Similarity",
        "Predicted Status",
        "Match Level",
        "Tag",
        "Matched Skills",
        "Missing Skills",
        "Keywords in JD & Resume",
        "Suggestion",
    ];

    /// Position of a header in `HEADERS`.
    pub fn column(header: &str) -> Option<usize> {
        Self::HEADERS.iter().position(|h| *h == header)
    }

    pub fn from_result(result: &ScoreResult) -> Self {
        Self {
            candidate_name: result.candidate_name.clone(),
            email: result.email.clone().unwrap_or_else(|| NOT_FOUND.to_string()),
            phone: result.phone.clone().unwrap_or_else(|| NOT_FOUND.to_string()),
            resume_name: result.resume_name.clone(),
            score: result.score,
            years_experience: result.years_experience,
            semantic_similarity: result.semantic_similarity,
            predicted_status: result.status,
            match_level: result.match_level.to_string(),
            tag: result.tag.to_string(),
            matched_skills: join_skills(&result.matched_skills),
            missing_skills: join_skills(&result.missing_skills),
            shared_keywords: join_skills(&result.shared_keywords),
            suggestion: result.concise_suggestion.clone(),
        }
    }

    /// Values in `HEADERS` order.
    pub fn record(&self) -> Vec<String> {
        vec![
            self.candidate_name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.resume_name.clone(),
            format!("{:.2}", self.score),
            format!("{:.1}", self.years_experience),
            format!("{:.2}", self.semantic_similarity),
            self.predicted_status.to_string(),
            self.match_level.clone(),
            self.tag.clone(),
            self.matched_skills.clone(),
            self.missing_skills.clone(),
            self.shared_keywords.clone(),
            self.suggestion.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRow {
    #[serde(rename = "Resume Name")]
    pub resume_name: String,
    #[serde(rename = "Reason")]
    pub reason: String,
}

impl From<&SkippedResume> for SkippedRow {
    fn from(skipped: &SkippedResume) -> Self {
        Self {
            resume_name: skipped.filename.clone(),
            reason: skipped.reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateAssessment {
    pub candidate_name: String,
    pub score: f32,
    pub assessment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

/// Dashboard aggregates over the scored resumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub resumes_screened: usize,
    pub resumes_skipped: usize,
    pub shortlisted: usize,
    pub average_score: f32,
    pub average_experience: f32,
    pub tag_distribution: Vec<LabelCount>,
    pub experience_buckets: Vec<LabelCount>,
    pub top_matched_skills: Vec<LabelCount>,
    pub top_missing_skills: Vec<LabelCount>,
    pub degraded: bool,
}

impl RunSummary {
    pub fn from_run(run: &ScreeningRun) -> Self {
        let results = &run.results;
        let count = results.len();

        let average = |value: fn(&ScoreResult) -> f32| {
            if count == 0 {
                0.0
            } else {
                results.iter().map(value).sum::<f32>() / count as f32
            }
        };

        let tag_distribution = CandidateTag::ALL
            .iter()
            .map(|tag| LabelCount {
                label: tag.to_string(),
                count: results.iter().filter(|r| r.tag == *tag).count(),
            })
            .collect();

        let mut buckets = [0usize; 4];
        for result in results {
            buckets[experience_bucket(result.years_experience)] += 1;
        }
        let experience_buckets = EXPERIENCE_BUCKETS
            .iter()
            .zip(buckets)
            .map(|(label, count)| LabelCount {
                label: label.to_string(),
                count,
            })
            .collect();

        Self {
            resumes_screened: count,
            resumes_skipped: run.skipped.len(),
            shortlisted: run.shortlisted().len(),
            average_score: round_to(average(|r| r.score), 100.0),
            average_experience: round_to(average(|r| r.years_experience), 10.0),
            tag_distribution,
            experience_buckets,
            top_matched_skills: most_common(results.iter().flat_map(|r| &r.matched_skills), TOP_MATCHED_SKILLS),
            top_missing_skills: most_common(results.iter().flat_map(|r| &r.missing_skills), TOP_MISSING_SKILLS),
            degraded: run.degraded,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Local>,
    pub screener_version: String,
    pub run_started_at: DateTime<Local>,
    pub processing_time_ms: u64,
    pub cutoff_score: f32,
    pub min_experience: f32,
    pub job_skills: Vec<String>,
}

impl ScreeningReport {
    pub fn from_run(run: &ScreeningRun, order: SortKey) -> Self {
        let candidates = run.sorted(order).into_iter().map(CandidateRow::from_result).collect();

        let top_assessments = run
            .sorted(SortKey::Score)
            .into_iter()
            .take(TOP_ASSESSMENTS)
            .map(|result| CandidateAssessment {
                candidate_name: result.candidate_name.clone(),
                score: result.score,
                assessment: result.detailed_assessment.clone(),
            })
            .collect();

        Self {
            summary: RunSummary::from_run(run),
            candidates,
            skipped: run.skipped.iter().map(SkippedRow::from).collect(),
            top_assessments,
            metadata: ReportMetadata {
                generated_at: Local::now(),
                screener_version: env!("CARGO_PKG_VERSION").to_string(),
                run_started_at: run.started_at,
                processing_time_ms: run.elapsed_ms,
                cutoff_score: run.criteria.cutoff_score,
                min_experience: run.criteria.min_experience,
                job_skills: run.job.skills.iter().cloned().collect(),
            },
        }
    }
}

const EXPERIENCE_BUCKETS: [&str; 4] = ["0-2 yrs", "3-5 yrs", "6-10 yrs", "10+ yrs"];

fn experience_bucket(years: f32) -> usize {
    if years < 2.0 {
        0
    } else if years < 5.0 {
        1
    } else if years < 10.0 {
        2
    } else {
        3
    }
}

/// Most frequent labels, ties broken alphabetically.
fn most_common<'a>(labels: impl Iterator<Item = &'a String>, limit: usize) -> Vec<LabelCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label.as_str()).or_insert(0) += 1;
    }

    let mut sorted: Vec<(&str, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    sorted
        .into_iter()
        .take(limit)
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
        })
        .collect()
}

fn join_skills(skills: &[String]) -> String {
    if skills.is_empty() {
        "None".to_string()
    } else {
        skills.join(", ")
    }
}

fn round_to(value: f32, factor: f32) -> f32 {
    (value * factor).round() / factor
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::processing::document::{DocumentMetadata, JobDescription};
    use crate::processing::screener::SkipReason;
    use crate::processing::similarity::ScoringMode;
    use crate::processing::tiering::{MatchLevel, PredictedStatus, ScreeningCriteria};

    pub(crate) fn result(index: usize, name: &str, score: f32, years: f32, tag: CandidateTag) -> ScoreResult {
        ScoreResult {
            index,
            resume_name: format!("{}.pdf", name.to_lowercase()),
            candidate_name: name.to_string(),
            email: Some(format!("{}@example.com", name.to_lowercase())),
            phone: None,
            score,
            semantic_similarity: 0.5,
            years_experience: years,
            matched_skills: vec!["python".to_string(), "sql".to_string()],
            missing_skills: if score > 50.0 { vec![] } else { vec!["docker".to_string()] },
            shared_keywords: vec!["pipelines".to_string(), "python".to_string()],
            required_skill_count: 3,
            status: if score >= 80.0 {
                PredictedStatus::Shortlisted
            } else {
                PredictedStatus::RejectedScore
            },
            match_level: MatchLevel::Medium,
            tag,
            concise_suggestion: "Moderate fit.".to_string(),
            detailed_assessment: format!("{} assessment.", name),
            scoring_mode: ScoringMode::Fallback,
            word_cloud_text: String::new(),
        }
    }

    pub(crate) fn run() -> ScreeningRun {
        ScreeningRun {
            job: JobDescription {
                raw: "Python, SQL, Docker".to_string(),
                loose: "Python, SQL, Docker".to_string(),
                skills: ["docker", "python", "sql"].iter().map(|s| s.to_string()).collect(),
                keywords: ["docker", "python", "sql"].iter().map(|s| s.to_string()).collect(),
                metadata: DocumentMetadata::of("Python, SQL, Docker"),
            },
            criteria: ScreeningCriteria::new(80.0, 2.0).unwrap(),
            results: vec![
                result(0, "Carol", 85.0, 6.5, CandidateTag::Strong),
                result(1, "Dave", 40.0, 1.0, CandidateTag::NeedsReview),
                result(3, "Erin", 90.0, 12.0, CandidateTag::Exceptional),
            ],
            skipped: vec![SkippedResume {
                index: 2,
                filename: "scan.pdf".to_string(),
                reason: SkipReason::EmptyText,
            }],
            degraded: true,
            started_at: Local::now(),
            elapsed_ms: 12,
        }
    }

    #[test]
    fn test_summary_aggregates() {
        let summary = RunSummary::from_run(&run());

        assert_eq!(summary.resumes_screened, 3);
        assert_eq!(summary.resumes_skipped, 1);
        assert_eq!(summary.shortlisted, 2);
        assert_eq!(summary.average_score, 71.67);
        assert_eq!(summary.average_experience, 6.5);
        assert!(summary.degraded);
    }

    #[test]
    fn test_experience_buckets_are_half_open() {
        assert_eq!(experience_bucket(0.0), 0);
        assert_eq!(experience_bucket(1.9), 0);
        assert_eq!(experience_bucket(2.0), 1);
        assert_eq!(experience_bucket(5.0), 2);
        assert_eq!(experience_bucket(10.0), 3);
        assert_eq!(experience_bucket(25.0), 3);

        let summary = RunSummary::from_run(&run());
        let counts: Vec<usize> = summary.experience_buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 0, 1, 1]);
    }

    #[test]
    fn test_tag_distribution_lists_every_tag() {
        let summary = RunSummary::from_run(&run());

        assert_eq!(summary.tag_distribution.len(), 5);
        assert_eq!(summary.tag_distribution[0].label, "Exceptional Match");
        assert_eq!(summary.tag_distribution[0].count, 1);
        assert_eq!(summary.tag_distribution[4].count, 0);
    }

    #[test]
    fn test_most_common_skills() {
        let summary = RunSummary::from_run(&run());

        assert_eq!(summary.top_matched_skills[0], LabelCount { label: "python".to_string(), count: 3 });
        assert_eq!(summary.top_matched_skills[1].label, "sql");
        assert_eq!(summary.top_missing_skills, vec![LabelCount { label: "docker".to_string(), count: 1 }]);
    }

    #[test]
    fn test_candidate_rows_use_export_field_names() {
        let report = ScreeningReport::from_run(&run(), SortKey::Score);
        let json = serde_json::to_value(&report.candidates[0]).unwrap();

        assert_eq!(json["Candidate Name"], "Erin");
        assert_eq!(json["Predicted Status"], "Shortlisted");
        assert_eq!(json["Phone"], NOT_FOUND);
        assert_eq!(json["Matched Skills"], "python, sql");
        assert_eq!(json["Keywords in JD & Resume"], "pipelines, python");
        assert_eq!(report.candidates[2].missing_skills, "docker");
        assert_eq!(report.skipped[0].reason, "no text could be extracted");
        assert_eq!(report.top_assessments[0].assessment, "Erin assessment.");
    }
}
