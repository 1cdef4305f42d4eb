//! Lazily loaded, process-wide model collaborators

use crate::config::ModelConfig;
use crate::processing::embeddings::{EmbeddingProvider, Model2VecEmbedder};
use crate::processing::score_model::{ScoreHead, ScoreModel};
use std::sync::{Arc, OnceLock};

/// Owns the embedding provider and the learned scorer.
///
/// Each slot is loaded at most once, on first use, and is read-only
/// afterwards. A failed load is remembered as `None`, which puts every
/// run that uses this registry on the fallback scoring path.
pub struct ModelRegistry {
    config: ModelConfig,
    embedder: OnceLock<Option<Arc<dyn EmbeddingProvider>>>,
    score_model: OnceLock<Option<Arc<dyn ScoreModel>>>,
}

impl ModelRegistry {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            embedder: OnceLock::new(),
            score_model: OnceLock::new(),
        }
    }

    /// Registry with pre-built collaborators. `None` marks a slot as unavailable.
    pub fn with_providers(
        embedder: Option<Arc<dyn EmbeddingProvider>>,
        score_model: Option<Arc<dyn ScoreModel>>,
    ) -> Self {
        let registry = Self::new(ModelConfig {
            enabled: true,
            score_model_path: None,
            ..ModelConfig::default()
        });
        let _ = registry.embedder.set(embedder);
        let _ = registry.score_model.set(score_model);
        registry
    }

    /// Registry that never loads anything; every score uses the fallback.
    pub fn disabled() -> Self {
        Self::with_providers(None, None)
    }

    pub fn embedder(&self) -> Option<Arc<dyn EmbeddingProvider>> {
        self.embedder
            .get_or_init(|| {
                if !self.config.enabled {
                    log::info!("Models disabled; using lexical fallback scoring");
                    return None;
                }

                match Model2VecEmbedder::load(&self.config.embedding_model) {
                    Ok(embedder) => Some(Arc::new(embedder) as Arc<dyn EmbeddingProvider>),
                    Err(e) => {
                        log::warn!("Embedding model unavailable, falling back: {}", e);
                        None
                    }
                }
            })
            .clone()
    }

    pub fn score_model(&self) -> Option<Arc<dyn ScoreModel>> {
        self.score_model
            .get_or_init(|| {
                if !self.config.enabled {
                    return None;
                }

                let Some(path) = self.config.score_model_path.as_ref() else {
                    log::warn!("No score model configured, falling back");
                    return None;
                };
                if !path.exists() {
                    log::warn!("Score model weights not found at {}, falling back", path.display());
                    return None;
                }

                // Features are both embeddings plus experience and overlap count
                let embedder = self.embedder()?;
                let input_dim = embedder.dimension() * 2 + 2;

                match ScoreHead::load(path, input_dim, &self.config.score_model_hidden) {
                    Ok(head) => Some(Arc::new(head) as Arc<dyn ScoreModel>),
                    Err(e) => {
                        log::warn!("Score model unavailable, falling back: {}", e);
                        None
                    }
                }
            })
            .clone()
    }

    /// True when either collaborator is missing. The score model is checked
    /// first so missing weights never trigger an embedding model load.
    pub fn is_degraded(&self) -> bool {
        self.score_model().is_none() || self.embedder().is_none()
    }
}
