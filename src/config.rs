//! Configuration management for the resume screener

use crate::error::{Result, ScreenerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub models: ModelConfig,
    #[serde(default)]
    pub screening: ScreeningConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub tiering: TieringConfig,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Turn off to always score with the lexical fallback.
    pub enabled: bool,
    /// Model2Vec repo id on the HuggingFace Hub, or a local model folder.
    pub embedding_model: String,
    /// Safetensors weights of the learned scorer. No path means no learned scorer.
    pub score_model_path: Option<PathBuf>,
    /// Hidden layer widths of the learned scorer, input to output.
    pub score_model_hidden: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningConfig {
    pub cutoff_score: f32,
    pub min_experience: f32,
    pub resume_timeout_secs: u64,
}

/// Weights of the blended score and of the fallback formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub model_weight: f32,
    pub coverage_weight: f32,
    pub semantic_weight: f32,
    pub bonus_semantic_threshold: f32,
    pub bonus_min_experience: f32,
    pub bonus_points: f32,
    pub fallback_overlap_weight: f32,
    pub fallback_points_per_year: f32,
    pub fallback_experience_cap: f32,
}

/// Thresholds for status, match level, suggestions, assessments and tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TieringConfig {
    pub high_match_score: f32,
    pub medium_match_score: f32,
    pub max_skill_gap_ratio: f32,

    pub concise_high_score: f32,
    pub concise_high_semantic: f32,
    pub concise_moderate_semantic: f32,

    pub exceptional_score: f32,
    pub exceptional_experience_offset: f32,
    pub exceptional_semantic: f32,
    pub strong_score: f32,
    pub strong_semantic: f32,
    pub promising_experience_offset: f32,
    pub promising_semantic: f32,
    pub promising_low_semantic: f32,
    pub marginal_score_band: f32,

    pub tag_exceptional: TagThreshold,
    pub tag_strong: TagThreshold,
    pub tag_promising: TagThreshold,
    pub tag_needs_review_score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagThreshold {
    pub score: f32,
    pub experience: f32,
    pub semantic: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VocabularyConfig {
    /// One skill per line; replaces the built-in vocabulary.
    pub skills_path: Option<PathBuf>,
    /// One stop word per line; replaces the built-in stop-word set.
    pub stop_words_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Csv,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            embedding_model: "minishlab/potion-base-8M".to_string(),
            score_model_path: dirs::home_dir().map(|home| {
                home.join(".resume-screener")
                    .join("models")
                    .join("score_head.safetensors")
            }),
            score_model_hidden: vec![64],
        }
    }
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            cutoff_score: 80.0,
            min_experience: 2.0,
            resume_timeout_secs: 30,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            model_weight: 0.6,
            coverage_weight: 0.1,
            semantic_weight: 0.3,
            bonus_semantic_threshold: 0.7,
            bonus_min_experience: 3.0,
            bonus_points: 5.0,
            fallback_overlap_weight: 70.0,
            fallback_points_per_year: 5.0,
            fallback_experience_cap: 30.0,
        }
    }
}

impl Default for TieringConfig {
    fn default() -> Self {
        Self {
            high_match_score: 80.0,
            medium_match_score: 60.0,
            max_skill_gap_ratio: 0.5,

            concise_high_score: 85.0,
            concise_high_semantic: 0.75,
            concise_moderate_semantic: 0.4,

            exceptional_score: 90.0,
            exceptional_experience_offset: 3.0,
            exceptional_semantic: 0.85,
            strong_score: 80.0,
            strong_semantic: 0.7,
            promising_experience_offset: -1.0,
            promising_semantic: 0.35,
            promising_low_semantic: 0.5,
            marginal_score_band: 5.0,

            tag_exceptional: TagThreshold { score: 90.0, experience: 5.0, semantic: 0.85 },
            tag_strong: TagThreshold { score: 80.0, experience: 3.0, semantic: 0.7 },
            tag_promising: TagThreshold { score: 60.0, experience: 1.0, semantic: 0.0 },
            tag_needs_review_score: 40.0,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first use.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ScreenerError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ScreenerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-screener")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let screening = &self.screening;
        if !(0.0..=100.0).contains(&screening.cutoff_score) {
            return Err(ScreenerError::Configuration(format!(
                "screening.cutoff_score must be within 0-100, got {}",
                screening.cutoff_score
            )));
        }
        if screening.min_experience < 0.0 {
            return Err(ScreenerError::Configuration(format!(
                "screening.min_experience must not be negative, got {}",
                screening.min_experience
            )));
        }
        if screening.resume_timeout_secs == 0 {
            return Err(ScreenerError::Configuration(
                "screening.resume_timeout_secs must be at least 1".to_string(),
            ));
        }

        let scoring = &self.scoring;
        let weights = [scoring.model_weight, scoring.coverage_weight, scoring.semantic_weight];
        if weights.iter().any(|w| *w < 0.0) {
            return Err(ScreenerError::Configuration(
                "scoring weights must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
