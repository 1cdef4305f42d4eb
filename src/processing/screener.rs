//! Batch orchestration: one job description against many uploaded resumes
//!
//! Resumes are processed strictly in upload order. Each one runs on the
//! blocking pool under a timeout, so a slow, hanging or panicking PDF is
//! recorded as a skip and the batch carries on.

use crate::config::Config;
use crate::error::{Result, ScreenerError};
use crate::input::{DocumentExtractor, ResumeUpload, UploadExtractor};
use crate::processing::analyzer::DocumentAnalyzer;
use crate::processing::document::{JobDescription, ResumeDocument};
use crate::processing::events::{EventSink, ScreeningEvent};
use crate::processing::models::ModelRegistry;
use crate::processing::similarity::{ScoringMode, Similarity, SimilarityScorer};
use crate::processing::tiering::{
    CandidateTag, MatchLevel, PredictedStatus, ScreeningCriteria, TierInput, Tiering,
};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkipReason {
    #[error("text extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("no text could be extracted")]
    EmptyText,

    #[error("processing failed: {0}")]
    ProcessingFailed(String),

    #[error("timed out after {0}s")]
    Timeout(u64),

    #[error("extraction crashed")]
    Panicked,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedResume {
    /// Position in the upload list.
    pub index: usize,
    pub filename: String,
    pub reason: SkipReason,
}

/// Outcome for one scored resume. Never modified once built; re-tiering
/// produces new values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Position in the upload list.
    pub index: usize,
    pub resume_name: String,
    pub candidate_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub score: f32,
    pub semantic_similarity: f32,
    pub years_experience: f32,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    /// Any non stop-word token in both texts, vocabulary or not.
    pub shared_keywords: Vec<String>,
    pub required_skill_count: usize,
    pub status: PredictedStatus,
    pub match_level: MatchLevel,
    pub tag: CandidateTag,
    pub concise_suggestion: String,
    pub detailed_assessment: String,
    pub scoring_mode: ScoringMode,
    pub word_cloud_text: String,
}

impl ScoreResult {
    fn build(
        index: usize,
        resume: &ResumeDocument,
        job: &JobDescription,
        similarity: Similarity,
        criteria: &ScreeningCriteria,
        tiering: &Tiering,
    ) -> Self {
        let matched_skills: Vec<String> = resume.matched_skills(job).into_iter().collect();
        let missing_skills: Vec<String> = resume.missing_skills(job).into_iter().collect();
        let candidate_name = resume.candidate_name();

        let mut result = Self {
            index,
            resume_name: resume.filename.clone(),
            candidate_name,
            email: resume.contact.email.clone(),
            phone: resume.contact.phone.clone(),
            score: similarity.score,
            semantic_similarity: similarity.semantic_similarity,
            years_experience: resume.years_experience,
            matched_skills,
            missing_skills,
            shared_keywords: resume.shared_keywords(job).into_iter().collect(),
            required_skill_count: job.skills.len(),
            status: PredictedStatus::RejectedScore,
            match_level: MatchLevel::Low,
            tag: CandidateTag::LimitedMatch,
            concise_suggestion: String::new(),
            detailed_assessment: String::new(),
            scoring_mode: similarity.mode,
            word_cloud_text: resume.word_cloud_text.clone(),
        };
        result.apply_tiers(criteria, tiering);
        result
    }

    pub fn tier_input(&self) -> TierInput {
        TierInput {
            score: self.score,
            years_experience: self.years_experience,
            semantic_similarity: self.semantic_similarity,
            missing_skills: self.missing_skills.len(),
            required_skills: self.required_skill_count,
        }
    }

    fn apply_tiers(&mut self, criteria: &ScreeningCriteria, tiering: &Tiering) {
        let input = self.tier_input();
        self.status = tiering.status(&input, criteria);
        self.match_level = tiering.match_level(self.score);
        self.tag = tiering.tag(&input);
        self.concise_suggestion = tiering.concise_suggestion(&input, criteria);
        self.detailed_assessment = tiering.detailed_assessment(&self.candidate_name, &input, criteria);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Score descending, ties in upload order.
    Score,
    Name,
    Status,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningRun {
    pub job: JobDescription,
    pub criteria: ScreeningCriteria,
    /// Upload order.
    pub results: Vec<ScoreResult>,
    pub skipped: Vec<SkippedResume>,
    /// True when any resume was scored without the model collaborators.
    pub degraded: bool,
    pub started_at: DateTime<Local>,
    pub elapsed_ms: u64,
}

impl ScreeningRun {
    pub fn shortlisted(&self) -> Vec<&ScoreResult> {
        self.results.iter().filter(|r| r.status.is_shortlisted()).collect()
    }

    /// Highest score; the earliest upload wins a tie.
    pub fn top_candidate(&self) -> Option<&ScoreResult> {
        self.results.iter().fold(None, |best, candidate| match best {
            Some(top) if top.score >= candidate.score => Some(top),
            _ => Some(candidate),
        })
    }

    pub fn sorted(&self, key: SortKey) -> Vec<&ScoreResult> {
        let mut results: Vec<&ScoreResult> = self.results.iter().collect();
        match key {
            SortKey::Score => results.sort_by(|a, b| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(Ordering::Equal)
                    .then(a.index.cmp(&b.index))
            }),
            SortKey::Name => results.sort_by(|a, b| {
                a.candidate_name
                    .to_lowercase()
                    .cmp(&b.candidate_name.to_lowercase())
                    .then(a.index.cmp(&b.index))
            }),
            SortKey::Status => results.sort_by(|a, b| {
                status_rank(a.status)
                    .cmp(&status_rank(b.status))
                    .then(b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
                    .then(a.index.cmp(&b.index))
            }),
        }
        results
    }

    pub fn total_uploads(&self) -> usize {
        self.results.len() + self.skipped.len()
    }
}

fn status_rank(status: PredictedStatus) -> u8 {
    match status {
        PredictedStatus::Shortlisted => 0,
        PredictedStatus::RejectedSkillGap => 1,
        PredictedStatus::RejectedScore => 2,
        PredictedStatus::RejectedExperience => 3,
    }
}

/// Everything one resume needs, cheap to clone into a blocking task.
#[derive(Clone)]
struct Pipeline {
    extractor: Arc<dyn DocumentExtractor>,
    analyzer: Arc<DocumentAnalyzer>,
    scorer: Arc<SimilarityScorer>,
    tiering: Arc<Tiering>,
}

impl Pipeline {
    fn process(
        &self,
        index: usize,
        upload: &ResumeUpload,
        job: &JobDescription,
        criteria: &ScreeningCriteria,
    ) -> std::result::Result<ScoreResult, SkipReason> {
        if let Some(error) = &upload.read_error {
            return Err(SkipReason::ExtractionFailed(error.clone()));
        }

        let text = self
            .extractor
            .extract(&upload.filename, &upload.bytes)
            .map_err(|e| SkipReason::ExtractionFailed(e.to_string()))?;

        if text.trim().is_empty() {
            return Err(SkipReason::EmptyText);
        }

        let resume = self
            .analyzer
            .resume(&upload.filename, &text)
            .map_err(|e| SkipReason::ProcessingFailed(e.to_string()))?;

        let similarity = self
            .scorer
            .score_documents(&resume, job)
            .map_err(|e| SkipReason::ProcessingFailed(e.to_string()))?;

        Ok(ScoreResult::build(index, &resume, job, similarity, criteria, &self.tiering))
    }
}

pub struct Screener {
    pipeline: Pipeline,
    registry: Arc<ModelRegistry>,
    timeout: Duration,
}

impl Screener {
    pub fn new(config: &Config, registry: Arc<ModelRegistry>) -> Result<Self> {
        let analyzer = DocumentAnalyzer::from_config(&config.vocabulary)?;
        Ok(Self::from_parts(analyzer, registry, config))
    }

    pub fn from_parts(analyzer: DocumentAnalyzer, registry: Arc<ModelRegistry>, config: &Config) -> Self {
        let scorer = SimilarityScorer::new(
            Arc::clone(&registry),
            analyzer.skill_extractor(),
            config.scoring.clone(),
        );

        Self {
            pipeline: Pipeline {
                extractor: Arc::new(UploadExtractor::new()),
                analyzer: Arc::new(analyzer),
                scorer: Arc::new(scorer),
                tiering: Arc::new(Tiering::new(config.tiering.clone())),
            },
            registry,
            timeout: Duration::from_secs(config.screening.resume_timeout_secs),
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn DocumentExtractor>) -> Self {
        self.pipeline.extractor = extractor;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn analyzer(&self) -> &DocumentAnalyzer {
        &self.pipeline.analyzer
    }

    /// Screen `uploads` against `job_text`. Only input errors are returned
    /// as `Err`; every per-resume failure becomes a skip.
    pub async fn screen(
        &self,
        job_text: &str,
        uploads: Vec<ResumeUpload>,
        criteria: ScreeningCriteria,
        sink: &dyn EventSink,
    ) -> Result<ScreeningRun> {
        criteria.validate()?;
        if uploads.is_empty() {
            return Err(ScreenerError::InvalidInput("No resumes uploaded".to_string()));
        }
        let job = Arc::new(self.pipeline.analyzer.job(job_text)?);

        let started_at = Local::now();
        let batch_start = Instant::now();
        let total = uploads.len();

        // Loading the models can take a while; keep it off the async workers
        let registry = Arc::clone(&self.registry);
        let mut degraded = tokio::task::spawn_blocking(move || registry.is_degraded())
            .await
            .map_err(|e| ScreenerError::Processing(format!("Model loading task failed: {}", e)))?;

        sink.emit(&ScreeningEvent::BatchStarted {
            total,
            cutoff_score: criteria.cutoff_score,
            min_experience: criteria.min_experience,
            job_skill_count: job.skills.len(),
            degraded,
        });

        let mut results = Vec::with_capacity(total);
        let mut skipped = Vec::new();

        for (index, upload) in uploads.into_iter().enumerate() {
            let resume_start = Instant::now();
            let filename = upload.filename.clone();

            match self.process_one(index, upload, &job, criteria).await {
                Ok(result) => {
                    degraded |= result.scoring_mode == ScoringMode::Fallback;
                    sink.emit(&ScreeningEvent::ResumeProcessed {
                        index,
                        total,
                        resume: filename,
                        score: result.score,
                        status: result.status,
                        years_experience: result.years_experience,
                        elapsed_ms: resume_start.elapsed().as_millis() as u64,
                    });
                    results.push(result);
                }
                Err(reason) => {
                    sink.emit(&ScreeningEvent::ResumeSkipped {
                        index,
                        total,
                        resume: filename.clone(),
                        reason: reason.to_string(),
                    });
                    skipped.push(SkippedResume {
                        index,
                        filename,
                        reason,
                    });
                }
            }
        }

        let elapsed_ms = batch_start.elapsed().as_millis() as u64;
        let run = ScreeningRun {
            job: Arc::unwrap_or_clone(job),
            criteria,
            results,
            skipped,
            degraded,
            started_at,
            elapsed_ms,
        };

        sink.emit(&ScreeningEvent::BatchCompleted {
            scored: run.results.len(),
            skipped: run.skipped.len(),
            shortlisted: run.shortlisted().len(),
            degraded: run.degraded,
            elapsed_ms,
        });

        Ok(run)
    }

    /// Same results tiered against new criteria; scores are not recomputed.
    pub fn retier(&self, run: &ScreeningRun, criteria: ScreeningCriteria) -> Result<ScreeningRun> {
        criteria.validate()?;

        let results = run
            .results
            .iter()
            .map(|result| {
                let mut updated = result.clone();
                updated.apply_tiers(&criteria, &self.pipeline.tiering);
                updated
            })
            .collect();

        Ok(ScreeningRun {
            criteria,
            results,
            ..run.clone()
        })
    }

    async fn process_one(
        &self,
        index: usize,
        upload: ResumeUpload,
        job: &Arc<JobDescription>,
        criteria: ScreeningCriteria,
    ) -> std::result::Result<ScoreResult, SkipReason> {
        let pipeline = self.pipeline.clone();
        let job = Arc::clone(job);
        let task = tokio::task::spawn_blocking(move || pipeline.process(index, &upload, &job, &criteria));

        // A timed-out task keeps running on the blocking pool; its result is dropped
        match tokio::time::timeout(self.timeout, task).await {
            Err(_) => {
                log::warn!("Resume {} timed out after {:?}", index, self.timeout);
                Err(SkipReason::Timeout(self.timeout.as_secs().max(1)))
            }
            Ok(Err(join_error)) if join_error.is_panic() => Err(SkipReason::Panicked),
            Ok(Err(join_error)) => Err(SkipReason::ProcessingFailed(join_error.to_string())),
            Ok(Ok(outcome)) => outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::processing::embeddings::EmbeddingProvider;
    use crate::processing::events::MemorySink;
    use crate::processing::score_model::ScoreModel;

    const JOB: &str = "Backend engineer: Python, SQL, Docker and AWS. 3+ years required.";

    const STRONG: &str = "Alice Johnson\nalice@example.com\nBackend Engineer, Jan 2017 - Jan 2023\n\
        Python, SQL, Docker and AWS in production";

    const WEAK: &str = "Bob Stone\nbob@example.com\nBarista, Mar 2022 - Sep 2022\nLatte art";

    fn screener(registry: ModelRegistry) -> Screener {
        Screener::new(&Config::default(), Arc::new(registry)).unwrap()
    }

    fn criteria() -> ScreeningCriteria {
        ScreeningCriteria::new(60.0, 2.0).unwrap()
    }

    struct SlowExtractor;

    impl DocumentExtractor for SlowExtractor {
        fn extract(&self, filename: &str, bytes: &[u8]) -> Result<String> {
            if filename.starts_with("slow") {
                std::thread::sleep(Duration::from_millis(500));
            }
            if filename.starts_with("crash") {
                panic!("extractor bug");
            }
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }
    }

    struct ConstantEmbedder;

    impl EmbeddingProvider for ConstantEmbedder {
        fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![0.0, 1.0])
        }

        fn dimension(&self) -> usize {
            2
        }

        fn name(&self) -> &str {
            "constant"
        }
    }

    struct WrongShapeModel;

    impl ScoreModel for WrongShapeModel {
        fn predict(&self, features: &[f32]) -> Result<f32> {
            Err(ScreenerError::FeatureShape {
                expected: 10,
                actual: features.len(),
            })
        }

        fn input_dim(&self) -> usize {
            10
        }
    }

    #[tokio::test]
    async fn test_one_corrupt_upload_is_skipped() {
        let screener = screener(ModelRegistry::disabled());
        let sink = MemorySink::new();
        let uploads = vec![
            ResumeUpload::new("alice.txt", STRONG),
            ResumeUpload::new("broken.pdf", b"%PDF-1.4 this is not really a pdf".to_vec()),
            ResumeUpload::new("bob.txt", WEAK),
        ];

        let run = screener.screen(JOB, uploads, criteria(), &sink).await.unwrap();

        assert_eq!(run.results.len(), 2);
        assert_eq!(run.skipped.len(), 1);
        assert_eq!(run.skipped[0].filename, "broken.pdf");
        assert_eq!(run.skipped[0].index, 1);
        assert_eq!(run.results[0].resume_name, "alice.txt");
        assert_eq!(run.results[1].resume_name, "bob.txt");
        assert!(run.degraded);
    }

    #[tokio::test]
    async fn test_unreadable_upload_is_skipped() {
        let screener = screener(ModelRegistry::disabled());
        let sink = MemorySink::new();
        let uploads = vec![
            ResumeUpload::unreadable("gone.pdf", "failed to read file: not found"),
            ResumeUpload::new("alice.txt", STRONG),
        ];

        let run = screener.screen(JOB, uploads, criteria(), &sink).await.unwrap();

        assert_eq!(run.results.len(), 1);
        assert_eq!(run.results[0].resume_name, "alice.txt");
        assert_eq!(
            run.skipped[0].reason,
            SkipReason::ExtractionFailed("failed to read file: not found".to_string())
        );
    }

    #[tokio::test]
    async fn test_results_are_tiered_and_ranked() {
        let screener = screener(ModelRegistry::disabled());
        let uploads = vec![ResumeUpload::new("bob.txt", WEAK), ResumeUpload::new("alice.txt", STRONG)];

        let run = screener.screen(JOB, uploads, criteria(), &MemorySink::new()).await.unwrap();

        let alice = &run.results[1];
        assert_eq!(alice.candidate_name, "Alice Johnson");
        assert_eq!(alice.years_experience, 6.0);
        // 70 * 4/4 + min(6 * 5, 30)
        assert_eq!(alice.score, 100.0);
        assert_eq!(alice.status, PredictedStatus::Shortlisted);
        assert_eq!(alice.semantic_similarity, 0.0);
        assert!(alice.missing_skills.is_empty());

        let bob = &run.results[0];
        assert_eq!(bob.status, PredictedStatus::RejectedExperience);
        assert_eq!(bob.missing_skills.len(), 4);

        assert_eq!(run.top_candidate().unwrap().resume_name, "alice.txt");
        assert_eq!(run.shortlisted().len(), 1);
        assert_eq!(run.sorted(SortKey::Score)[0].resume_name, "alice.txt");
        assert_eq!(run.sorted(SortKey::Name)[0].candidate_name, "Alice Johnson");
    }

    #[tokio::test]
    async fn test_top_candidate_ties_go_to_first_upload() {
        let screener = screener(ModelRegistry::disabled());
        let uploads = vec![ResumeUpload::new("first.txt", STRONG), ResumeUpload::new("second.txt", STRONG)];

        let run = screener.screen(JOB, uploads, criteria(), &MemorySink::new()).await.unwrap();

        assert_eq!(run.results[0].score, run.results[1].score);
        assert_eq!(run.top_candidate().unwrap().resume_name, "first.txt");
        assert_eq!(run.sorted(SortKey::Score)[0].resume_name, "first.txt");
    }

    #[tokio::test]
    async fn test_empty_upload_is_skipped_with_reason() {
        let screener = screener(ModelRegistry::disabled());
        let uploads = vec![ResumeUpload::new("empty.txt", "  \n"), ResumeUpload::new("alice.txt", STRONG)];

        let run = screener.screen(JOB, uploads, criteria(), &MemorySink::new()).await.unwrap();

        assert_eq!(run.skipped[0].reason, SkipReason::EmptyText);
        assert_eq!(run.results.len(), 1);
    }

    #[tokio::test]
    async fn test_slow_and_crashing_uploads_are_skipped() {
        let screener = screener(ModelRegistry::disabled())
            .with_extractor(Arc::new(SlowExtractor))
            .with_timeout(Duration::from_millis(50));
        let uploads = vec![
            ResumeUpload::new("slow.txt", STRONG),
            ResumeUpload::new("crash.txt", STRONG),
            ResumeUpload::new("alice.txt", STRONG),
        ];

        let run = screener.screen(JOB, uploads, criteria(), &MemorySink::new()).await.unwrap();

        assert!(matches!(run.skipped[0].reason, SkipReason::Timeout(_)));
        assert_eq!(run.skipped[1].reason, SkipReason::Panicked);
        assert_eq!(run.results.len(), 1);
        assert_eq!(run.results[0].resume_name, "alice.txt");
    }

    #[tokio::test]
    async fn test_feature_shape_violation_skips_resume() {
        let registry = ModelRegistry::with_providers(Some(Arc::new(ConstantEmbedder)), Some(Arc::new(WrongShapeModel)));
        let screener = screener(registry);

        let run = screener
            .screen(JOB, vec![ResumeUpload::new("alice.txt", STRONG)], criteria(), &MemorySink::new())
            .await
            .unwrap();

        assert!(run.results.is_empty());
        assert!(matches!(run.skipped[0].reason, SkipReason::ProcessingFailed(_)));
    }

    #[tokio::test]
    async fn test_input_errors_are_refused_up_front() {
        let screener = screener(ModelRegistry::disabled());
        let sink = MemorySink::new();

        let no_job = screener
            .screen("  ", vec![ResumeUpload::new("a.txt", STRONG)], criteria(), &sink)
            .await;
        let no_uploads = screener.screen(JOB, Vec::new(), criteria(), &sink).await;
        let bad_criteria = screener
            .screen(
                JOB,
                vec![ResumeUpload::new("a.txt", STRONG)],
                ScreeningCriteria {
                    cutoff_score: 150.0,
                    min_experience: 1.0,
                },
                &sink,
            )
            .await;

        assert!(matches!(no_job, Err(ScreenerError::InvalidInput(_))));
        assert!(matches!(no_uploads, Err(ScreenerError::InvalidInput(_))));
        assert!(matches!(bad_criteria, Err(ScreenerError::InvalidInput(_))));
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn test_events_track_progress() {
        let screener = screener(ModelRegistry::disabled());
        let sink = MemorySink::new();
        let uploads = vec![ResumeUpload::new("alice.txt", STRONG), ResumeUpload::new("empty.txt", "")];

        screener.screen(JOB, uploads, criteria(), &sink).await.unwrap();

        let events = sink.events();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], ScreeningEvent::BatchStarted { total: 2, degraded: true, .. }));
        assert_eq!(events[1].progress(), Some((1, 2)));
        assert!(matches!(events[2], ScreeningEvent::ResumeSkipped { index: 1, .. }));
        assert!(matches!(
            events[3],
            ScreeningEvent::BatchCompleted {
                scored: 1,
                skipped: 1,
                shortlisted: 1,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_retier_never_promotes_on_higher_cutoff() {
        let screener = screener(ModelRegistry::disabled());
        let uploads = vec![ResumeUpload::new("alice.txt", STRONG), ResumeUpload::new("bob.txt", WEAK)];
        let run = screener.screen(JOB, uploads, criteria(), &MemorySink::new()).await.unwrap();

        let strict = screener.retier(&run, ScreeningCriteria::new(100.0, 2.0).unwrap()).unwrap();
        let stricter = screener.retier(&run, ScreeningCriteria::new(100.0, 10.0).unwrap()).unwrap();

        assert_eq!(strict.results[0].score, run.results[0].score);
        assert_eq!(strict.shortlisted().len(), 1);
        assert!(stricter.shortlisted().is_empty());
        assert_eq!(stricter.results[0].status, PredictedStatus::RejectedExperience);
    }
}
