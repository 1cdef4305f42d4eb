//! Turns raw text into analyzed job descriptions and resumes

use crate::config::VocabularyConfig;
use crate::error::{Result, ScreenerError};
use crate::processing::contact::ContactExtractor;
use crate::processing::document::{DocumentMetadata, JobDescription, ResumeDocument};
use crate::processing::experience::ExperienceEstimator;
use crate::processing::skill_extractor::SkillExtractor;
use crate::processing::text_processor::TextProcessor;
use crate::processing::vocabulary;
use chrono::{Local, NaiveDate};
use std::sync::Arc;

/// Runs the normalizer, skill extractor, experience estimator and contact
/// extractor over a document.
pub struct DocumentAnalyzer {
    skills: Arc<SkillExtractor>,
    experience: ExperienceEstimator,
    contact: ContactExtractor,
}

impl DocumentAnalyzer {
    pub fn new(skills: Arc<SkillExtractor>) -> Self {
        Self {
            skills,
            experience: ExperienceEstimator::new(),
            contact: ContactExtractor::new(),
        }
    }

    /// Analyzer over the configured vocabulary and stop-word files, or the
    /// built-in sets when none are configured.
    pub fn from_config(config: &VocabularyConfig) -> Result<Self> {
        let skills = match &config.skills_path {
            Some(path) => vocabulary::load_list(path)?,
            None => vocabulary::default_skills(),
        };
        let stop_words = match &config.stop_words_path {
            Some(path) => vocabulary::load_list(path)?.into_iter().collect(),
            None => vocabulary::default_stop_words(),
        };

        log::debug!(
            "Vocabulary: {} skills, {} stop words",
            skills.len(),
            stop_words.len()
        );

        let processor = Arc::new(TextProcessor::with_stop_words(stop_words));
        let extractor = SkillExtractor::new(&skills, processor)?;
        Ok(Self::new(Arc::new(extractor)))
    }

    pub fn skill_extractor(&self) -> Arc<SkillExtractor> {
        Arc::clone(&self.skills)
    }

    pub fn job(&self, text: &str) -> Result<JobDescription> {
        if text.trim().is_empty() {
            return Err(ScreenerError::InvalidInput("Job description is empty".to_string()));
        }

        let skills = self.skills.extract(text);
        if skills.is_empty() {
            log::warn!("No skills found in the job description; coverage will be zero");
        }

        Ok(JobDescription {
            raw: text.to_string(),
            loose: self.skills.processor().loose(text),
            skills,
            keywords: self.skills.processor().keyword_set(text),
            metadata: DocumentMetadata::of(text),
        })
    }

    pub fn resume(&self, filename: &str, text: &str) -> Result<ResumeDocument> {
        self.resume_at(filename, text, Local::now().date_naive())
    }

    /// Like [`resume`](Self::resume) with a fixed date standing in for "present".
    pub fn resume_at(&self, filename: &str, text: &str, today: NaiveDate) -> Result<ResumeDocument> {
        if text.trim().is_empty() {
            return Err(ScreenerError::TextProcessing(format!("No text in {}", filename)));
        }

        Ok(ResumeDocument {
            filename: filename.to_string(),
            raw: text.to_string(),
            loose: self.skills.processor().loose(text),
            contact: self.contact.extract(text),
            years_experience: self.experience.estimate_at(text, today),
            skills: self.skills.extract(text),
            keywords: self.skills.processor().keyword_set(text),
            word_cloud_text: self.skills.word_cloud_text(text),
            metadata: DocumentMetadata::of(text),
        })
    }
}
