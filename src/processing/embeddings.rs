//! Sentence embeddings behind the `EmbeddingProvider` seam

use crate::error::{Result, ScreenerError};
use model2vec_rs::model::StaticModel;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Instant;

/// Fixed-size, deterministic text embeddings.
pub trait EmbeddingProvider: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Vector length, fixed for the lifetime of the provider.
    fn dimension(&self) -> usize;

    fn name(&self) -> &str;
}

/// Entries kept by the embedding cache. The job description is looked up
/// for every resume, so it stays cached while resumes cycle through.
const CACHE_CAPACITY: usize = 16;

/// Model2Vec static embeddings with a small bounded cache.
pub struct Model2VecEmbedder {
    model: StaticModel,
    model_name: String,
    dimension: usize,
    cache: Mutex<EmbeddingCache>,
}

/// Text-keyed cache that evicts the least recently used entry once full.
struct EmbeddingCache {
    capacity: usize,
    entries: HashMap<String, Vec<f32>>,
    order: VecDeque<String>,
}

impl EmbeddingCache {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    fn get(&mut self, text: &str) -> Option<Vec<f32>> {
        let hit = self.entries.get(text).cloned()?;
        self.touch(text);
        Some(hit)
    }

    fn insert(&mut self, text: &str, embedding: Vec<f32>) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.contains_key(text) {
            self.touch(text);
            return;
        }
        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
        self.order.push_back(text.to_string());
        self.entries.insert(text.to_string(), embedding);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn touch(&mut self, text: &str) {
        if let Some(position) = self.order.iter().position(|key| key == text) {
            if let Some(key) = self.order.remove(position) {
                self.order.push_back(key);
            }
        }
    }
}

impl Model2VecEmbedder {
    /// Load from a local model folder or a HuggingFace repo id.
    pub fn load(repo_or_path: &str) -> Result<Self> {
        let start_time = Instant::now();
        log::info!("Loading Model2Vec embedding model from: {}", repo_or_path);

        let model = StaticModel::from_pretrained(
            repo_or_path,
            None, // token
            None, // normalize
            None, // subfolder
        )
        .map_err(|e| ScreenerError::ModelLoading(format!("Failed to load embedding model: {}", e)))?;

        let dimension = model.encode_single("dimension check").len();
        if dimension == 0 {
            return Err(ScreenerError::ModelLoading(format!(
                "Embedding model '{}' produced an empty vector",
                repo_or_path
            )));
        }

        log::info!(
            "Embedding model loaded in {:.2?} ({} dimensions)",
            start_time.elapsed(),
            dimension
        );

        Ok(Self {
            model,
            model_name: repo_or_path.to_string(),
            dimension,
            cache: Mutex::new(EmbeddingCache::new(CACHE_CAPACITY)),
        })
    }
}

impl EmbeddingProvider for Model2VecEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(hit) = cache.get(text) {
                return Ok(hit);
            }
        }

        let embedding = self.model.encode_single(text);
        if embedding.len() != self.dimension {
            return Err(ScreenerError::Embedding(format!(
                "Expected {} dimensions, got {}",
                self.dimension,
                embedding.len()
            )));
        }

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(text, embedding.clone());
            log::debug!("Embedding cache holds {} entries", cache.len());
        }
        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

/// Cosine similarity of two equally sized vectors; 0.0 when either is all zeros.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(ScreenerError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot_product / (norm_a * norm_b))
    }
}
