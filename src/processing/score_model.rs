//! Learned scorer behind the `ScoreModel` seam
//!
//! `ScoreHead` is a small feed-forward network (ReLU between layers) whose
//! single output logit is squashed into a 0-100 shortlist probability.
//! Weights are read from safetensors with tensors named
//! `layers.{i}.weight` / `layers.{i}.bias`.

use crate::error::{Result, ScreenerError};
use candle_core::{DType, Device, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use std::collections::HashMap;
use std::path::Path;

/// Maps a feature vector to a predicted score in 0-100.
pub trait ScoreModel: Send + Sync {
    fn predict(&self, features: &[f32]) -> Result<f32>;

    /// Required feature vector length.
    fn input_dim(&self) -> usize;
}

pub struct ScoreHead {
    layers: Vec<Linear>,
    input_dim: usize,
    device: Device,
}

impl ScoreHead {
    pub fn load(path: &Path, input_dim: usize, hidden: &[usize]) -> Result<Self> {
        if !path.exists() {
            return Err(ScreenerError::ModelLoading(format!(
                "Score model weights not found: {}",
                path.display()
            )));
        }

        let device = Device::Cpu;
        let tensors = candle_core::safetensors::load(path, &device)?;
        log::info!(
            "Loaded {} score model tensors from {}",
            tensors.len(),
            path.display()
        );
        Self::from_tensors(tensors, input_dim, hidden, device)
    }

    pub fn from_tensors(
        tensors: HashMap<String, Tensor>,
        input_dim: usize,
        hidden: &[usize],
        device: Device,
    ) -> Result<Self> {
        let vb = VarBuilder::from_tensors(tensors, DType::F32, &device);

        let mut dims = Vec::with_capacity(hidden.len() + 2);
        dims.push(input_dim);
        dims.extend_from_slice(hidden);
        dims.push(1);

        let layers = dims
            .windows(2)
            .enumerate()
            .map(|(i, pair)| {
                candle_nn::linear(pair[0], pair[1], vb.pp(format!("layers.{}", i))).map_err(|e| {
                    ScreenerError::ModelLoading(format!("Score model layer {} ({}x{}): {}", i, pair[0], pair[1], e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            layers,
            input_dim,
            device,
        })
    }
}

impl ScoreModel for ScoreHead {
    fn predict(&self, features: &[f32]) -> Result<f32> {
        if features.len() != self.input_dim {
            return Err(ScreenerError::FeatureShape {
                expected: self.input_dim,
                actual: features.len(),
            });
        }

        let mut x = Tensor::from_slice(features, (1, self.input_dim), &self.device)?;
        let last = self.layers.len() - 1;
        for (i, layer) in self.layers.iter().enumerate() {
            x = layer.forward(&x)?;
            if i < last {
                x = x.relu()?;
            }
        }

        let logit = x
            .flatten_all()?
            .to_vec1::<f32>()?
            .first()
            .copied()
            .ok_or_else(|| ScreenerError::ModelError("Score model produced no output".to_string()))?;

        let score = 100.0 / (1.0 + (-logit).exp());
        if !score.is_finite() {
            return Err(ScreenerError::ModelError(format!("Non-finite prediction from logit {}", logit)));
        }
        Ok(score)
    }

    fn input_dim(&self) -> usize {
        self.input_dim
    }
}
