//! Blended 0-100 resume/job similarity score
//!
//! The primary path mixes three signals: the learned scorer's prediction
//! over both embeddings plus engineered features, the share of job skills
//! the resume covers, and the embedding cosine similarity. Whenever either
//! model collaborator is missing or fails at runtime the score falls back
//! to a lexical overlap plus experience formula with no semantic term.

use crate::config::ScoringConfig;
use crate::error::{Result, ScreenerError};
use crate::processing::document::{JobDescription, ResumeDocument};
use crate::processing::embeddings::{cosine_similarity, EmbeddingProvider};
use crate::processing::models::ModelRegistry;
use crate::processing::score_model::ScoreModel;
use crate::processing::skill_extractor::SkillExtractor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoringMode {
    Model,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Similarity {
    /// 0-100, rounded to 2 decimals.
    pub score: f32,
    /// 0-1; always 0.0 in fallback mode.
    pub semantic_similarity: f32,
    pub mode: ScoringMode,
}

/// Texts and skill sets for one resume/job pair.
pub struct ScoringInput<'a> {
    pub resume_text: &'a str,
    pub jd_text: &'a str,
    pub resume_skills: &'a BTreeSet<String>,
    pub jd_skills: &'a BTreeSet<String>,
    pub years_experience: f32,
}

impl ScoringInput<'_> {
    fn overlap_count(&self) -> usize {
        self.resume_skills.intersection(self.jd_skills).count()
    }

    fn overlap_ratio(&self) -> f32 {
        if self.jd_skills.is_empty() {
            0.0
        } else {
            self.overlap_count() as f32 / self.jd_skills.len() as f32
        }
    }
}

pub struct SimilarityScorer {
    registry: Arc<ModelRegistry>,
    skills: Arc<SkillExtractor>,
    weights: ScoringConfig,
}

impl SimilarityScorer {
    pub fn new(registry: Arc<ModelRegistry>, skills: Arc<SkillExtractor>, weights: ScoringConfig) -> Self {
        Self {
            registry,
            skills,
            weights,
        }
    }

    /// Score raw texts, extracting both skill sets first.
    pub fn score(&self, resume_text: &str, jd_text: &str, years_experience: f32) -> Result<Similarity> {
        let resume_loose = self.skills.processor().loose(resume_text);
        let jd_loose = self.skills.processor().loose(jd_text);
        let resume_skills = self.skills.extract(resume_text);
        let jd_skills = self.skills.extract(jd_text);

        self.score_input(&ScoringInput {
            resume_text: &resume_loose,
            jd_text: &jd_loose,
            resume_skills: &resume_skills,
            jd_skills: &jd_skills,
            years_experience,
        })
    }

    /// Score already analyzed documents.
    pub fn score_documents(&self, resume: &ResumeDocument, job: &JobDescription) -> Result<Similarity> {
        self.score_input(&ScoringInput {
            resume_text: &resume.loose,
            jd_text: &job.loose,
            resume_skills: &resume.skills,
            jd_skills: &job.skills,
            years_experience: resume.years_experience,
        })
    }

    /// Only a feature-shape contract violation is returned as an error;
    /// every other collaborator failure degrades to the fallback formula.
    pub fn score_input(&self, input: &ScoringInput<'_>) -> Result<Similarity> {
        // Score model first: without it the embedder is never needed
        let Some(model) = self.registry.score_model() else {
            return Ok(self.fallback(input));
        };
        let Some(embedder) = self.registry.embedder() else {
            return Ok(self.fallback(input));
        };

        match self.model_score(embedder.as_ref(), model.as_ref(), input) {
            Ok(similarity) => Ok(similarity),
            Err(e) if e.is_contract_violation() => Err(e),
            Err(e) => {
                log::warn!("Model scoring failed, using fallback: {}", e);
                Ok(self.fallback(input))
            }
        }
    }

    /// `clamp(70 * overlapRatio + min(5 * years, 30), 0, 100)` with the
    /// configured weights.
    pub fn fallback(&self, input: &ScoringInput<'_>) -> Similarity {
        let w = &self.weights;
        let experience_points = (input.years_experience * w.fallback_points_per_year).min(w.fallback_experience_cap);
        let raw = w.fallback_overlap_weight * input.overlap_ratio() + experience_points;

        Similarity {
            score: round2(raw.clamp(0.0, 100.0)),
            semantic_similarity: 0.0,
            mode: ScoringMode::Fallback,
        }
    }

    fn model_score(
        &self,
        embedder: &dyn EmbeddingProvider,
        model: &dyn ScoreModel,
        input: &ScoringInput<'_>,
    ) -> Result<Similarity> {
        let jd_embedding = embedder.embed(input.jd_text)?;
        let resume_embedding = embedder.embed(input.resume_text)?;

        let cosine = cosine_similarity(&jd_embedding, &resume_embedding)?;
        if !cosine.is_finite() {
            return Err(ScreenerError::Embedding(format!("Non-finite cosine similarity: {}", cosine)));
        }
        let semantic_similarity = cosine.clamp(0.0, 1.0);

        let overlap_count = input.overlap_count();
        let mut features = Vec::with_capacity(jd_embedding.len() + resume_embedding.len() + 2);
        features.extend_from_slice(&jd_embedding);
        features.extend_from_slice(&resume_embedding);
        features.push(input.years_experience);
        features.push(overlap_count as f32);

        let predicted = model.predict(&features)?;
        let coverage_pct = 100.0 * input.overlap_ratio();

        let w = &self.weights;
        let mut blended = w.model_weight * predicted
            + w.coverage_weight * coverage_pct
            + w.semantic_weight * (semantic_similarity * 100.0);

        if semantic_similarity > w.bonus_semantic_threshold && input.years_experience >= w.bonus_min_experience {
            blended += w.bonus_points;
        }

        if !blended.is_finite() {
            return Err(ScreenerError::ModelError(format!("Non-finite blended score: {}", blended)));
        }

        Ok(Similarity {
            score: round2(blended.clamp(0.0, 100.0)),
            semantic_similarity,
            mode: ScoringMode::Model,
        })
    }
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::text_processor::TextProcessor;

    /// Letter histogram; deterministic and sensitive to content.
    struct HistogramEmbedder;

    impl EmbeddingProvider for HistogramEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let mut counts = vec![0.0; 26];
            for c in text.to_ascii_lowercase().bytes().filter(u8::is_ascii_lowercase) {
                counts[(c - b'a') as usize] += 1.0;
            }
            Ok(counts)
        }

        fn dimension(&self) -> usize {
            26
        }

        fn name(&self) -> &str {
            "histogram"
        }
    }

    struct ConstantEmbedder;

    impl EmbeddingProvider for ConstantEmbedder {
        fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0, 0.0, 0.0])
        }

        fn dimension(&self) -> usize {
            3
        }

        fn name(&self) -> &str {
            "constant"
        }
    }

    struct FixedModel {
        input_dim: usize,
        prediction: f32,
    }

    impl ScoreModel for FixedModel {
        fn predict(&self, features: &[f32]) -> Result<f32> {
            if features.len() != self.input_dim {
                return Err(ScreenerError::FeatureShape {
                    expected: self.input_dim,
                    actual: features.len(),
                });
            }
            Ok(self.prediction)
        }

        fn input_dim(&self) -> usize {
            self.input_dim
        }
    }

    struct FailingModel;

    impl ScoreModel for FailingModel {
        fn predict(&self, _features: &[f32]) -> Result<f32> {
            Err(ScreenerError::ModelError("inference backend crashed".to_string()))
        }

        fn input_dim(&self) -> usize {
            8
        }
    }

    fn scorer(registry: ModelRegistry) -> SimilarityScorer {
        let vocabulary = vec!["Python".to_string(), "SQL".to_string(), "Docker".to_string()];
        let skills = SkillExtractor::new(&vocabulary, Arc::new(TextProcessor::new())).unwrap();
        SimilarityScorer::new(Arc::new(registry), Arc::new(skills), ScoringConfig::default())
    }

    const JD: &str = "We need Python and SQL skills";
    const RESUME: &str = "Python developer";

    #[test]
    fn test_failing_classifier_uses_fallback_formula() {
        let scorer = scorer(ModelRegistry::with_providers(
            Some(Arc::new(ConstantEmbedder)),
            Some(Arc::new(FailingModel)),
        ));

        let similarity = scorer.score(RESUME, JD, 4.0).unwrap();

        // 70 * (1 / 2) + min(4 * 5, 30)
        assert_eq!(similarity.score, 55.0);
        assert_eq!(similarity.semantic_similarity, 0.0);
        assert_eq!(similarity.mode, ScoringMode::Fallback);
    }

    #[test]
    fn test_missing_models_use_fallback_formula() {
        let scorer = scorer(ModelRegistry::disabled());

        assert_eq!(scorer.score(RESUME, JD, 4.0).unwrap().score, 55.0);
        // Experience points are capped at 30
        assert_eq!(scorer.score(RESUME, JD, 12.0).unwrap().score, 65.0);
        assert_eq!(scorer.score("Gardener", JD, 0.0).unwrap().score, 0.0);
    }

    #[test]
    fn test_fallback_with_no_job_skills() {
        let scorer = scorer(ModelRegistry::disabled());

        let similarity = scorer.score(RESUME, "Friendly team player", 2.0).unwrap();

        assert_eq!(similarity.score, 10.0);
    }

    #[test]
    fn test_blended_score_with_bonus() {
        let scorer = scorer(ModelRegistry::with_providers(
            Some(Arc::new(ConstantEmbedder)),
            Some(Arc::new(FixedModel {
                input_dim: 8,
                prediction: 50.0,
            })),
        ));

        let similarity = scorer.score(RESUME, JD, 4.0).unwrap();

        // 0.6 * 50 + 0.1 * 50 + 0.3 * 100 + 5 bonus
        assert_eq!(similarity.semantic_similarity, 1.0);
        assert_eq!(similarity.score, 70.0);
        assert_eq!(similarity.mode, ScoringMode::Model);

        // No bonus below the experience floor
        assert_eq!(scorer.score(RESUME, JD, 2.0).unwrap().score, 65.0);
    }

    #[test]
    fn test_blended_score_is_clamped() {
        let scorer = scorer(ModelRegistry::with_providers(
            Some(Arc::new(ConstantEmbedder)),
            Some(Arc::new(FixedModel {
                input_dim: 8,
                prediction: 400.0,
            })),
        ));

        assert_eq!(scorer.score(RESUME, JD, 10.0).unwrap().score, 100.0);
    }

    #[test]
    fn test_feature_shape_mismatch_is_an_error() {
        let scorer = scorer(ModelRegistry::with_providers(
            Some(Arc::new(ConstantEmbedder)),
            Some(Arc::new(FixedModel {
                input_dim: 5,
                prediction: 50.0,
            })),
        ));

        let err = scorer.score(RESUME, JD, 4.0).unwrap_err();

        assert!(matches!(err, ScreenerError::FeatureShape { expected: 5, actual: 8 }));
    }

    #[test]
    fn test_scores_are_deterministic_and_in_range() {
        let scorer = scorer(ModelRegistry::with_providers(
            Some(Arc::new(HistogramEmbedder)),
            Some(Arc::new(FixedModel {
                input_dim: 54,
                prediction: 73.0,
            })),
        ));

        let resumes = [
            "Python developer with SQL and Docker",
            "Chef and sommelier",
            "",
            "zzzz qqqq",
        ];
        for resume in resumes {
            for years in [0.0, 1.5, 3.0, 25.0] {
                let first = scorer.score(resume, JD, years).unwrap();
                let second = scorer.score(resume, JD, years).unwrap();

                assert_eq!(first, second);
                assert!((0.0..=100.0).contains(&first.score));
                assert!((0.0..=1.0).contains(&first.semantic_similarity));
            }
        }
    }
}
