//! Bag-of-tokens logistic classifier.
//!
//! Two-class linear model over mask-weighted token counts, trained with plain
//! SGD on the softmax cross-entropy. Deliberately simple: it exists so the
//! pipeline runs and trains end to end without a transformer backbone, and so
//! the trainer can be exercised against a model that actually learns.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::TokenBatch;
use crate::error::{Result, ToxPipeError};
use crate::metrics::softmax_positive;

use super::{ClassifierOutput, SequenceClassifier};

#[derive(Serialize, Deserialize)]
struct BowState {
    buckets: u32,
    // Flattened [2][buckets] weight matrix.
    weights: Vec<f32>,
    bias: [f32; 2],
}

pub struct BowClassifier {
    buckets: u32,
    weights: Vec<f32>,
    bias: [f32; 2],
    train: bool,
    // Sparse accumulated gradients between optimize calls.
    grad_weights: HashMap<u32, [f64; 2]>,
    grad_bias: [f64; 2],
    grad_batches: usize,
}

impl BowClassifier {
    /// `buckets` must match the encoder's id space (ids in `0..buckets`).
    pub fn new(buckets: u32) -> Self {
        Self {
            buckets,
            weights: vec![0.0; 2 * buckets as usize],
            bias: [0.0; 2],
            train: false,
            grad_weights: HashMap::new(),
            grad_bias: [0.0; 2],
            grad_batches: 0,
        }
    }

    pub fn buckets(&self) -> u32 {
        self.buckets
    }

    /// Mask-weighted normalized token counts for one sample.
    fn features(token_ids: &[u32], mask: &[u8]) -> HashMap<u32, f64> {
        let real: usize = mask.iter().map(|&m| m as usize).sum();
        let mut counts: HashMap<u32, f64> = HashMap::new();
        if real == 0 {
            return counts;
        }
        let weight = 1.0 / real as f64;
        for (&id, &m) in token_ids.iter().zip(mask) {
            if m == 1 {
                *counts.entry(id).or_insert(0.0) += weight;
            }
        }
        counts
    }

    fn logits_for(&self, features: &HashMap<u32, f64>) -> [f32; 2] {
        let mut out = [f64::from(self.bias[0]), f64::from(self.bias[1])];
        for (&id, &x) in features {
            let base = 2 * id as usize;
            out[0] += f64::from(self.weights[base]) * x;
            out[1] += f64::from(self.weights[base + 1]) * x;
        }
        [out[0] as f32, out[1] as f32]
    }
}

impl SequenceClassifier for BowClassifier {
    fn set_train(&mut self, train: bool) {
        self.train = train;
        if !train {
            self.grad_weights.clear();
            self.grad_bias = [0.0; 2];
            self.grad_batches = 0;
        }
    }

    fn forward(&mut self, batch: &TokenBatch, targets: Option<&[u8]>) -> ClassifierOutput {
        let n = batch.len();
        let mut logits = Vec::with_capacity(n);
        let mut loss_sum = 0.0f64;

        for i in 0..n {
            let features = Self::features(&batch.token_ids[i], &batch.attention_masks[i]);
            let sample_logits = self.logits_for(&features);
            let p1 = softmax_positive(sample_logits);

            if let Some(targets) = targets {
                let y = f64::from(targets[i]);
                let p = p1.clamp(1e-12, 1.0 - 1e-12);
                loss_sum += -(y * p.ln() + (1.0 - y) * (1.0 - p).ln());

                if self.train {
                    // d(loss)/d(logit1) = p1 - y; the two logits mirror.
                    let g = (p1 - y) / n as f64;
                    for (&id, &x) in &features {
                        let grad = self.grad_weights.entry(id).or_insert([0.0; 2]);
                        grad[0] -= g * x;
                        grad[1] += g * x;
                    }
                    self.grad_bias[0] -= g;
                    self.grad_bias[1] += g;
                }
            }
            logits.push(sample_logits);
        }

        if targets.is_some() && self.train {
            self.grad_batches += 1;
        }

        ClassifierOutput {
            loss: targets.map(|_| if n > 0 { loss_sum / n as f64 } else { 0.0 }),
            logits,
        }
    }

    fn optimize(&mut self, lr: f64) {
        if self.grad_batches == 0 {
            return;
        }
        let scale = lr / self.grad_batches as f64;
        for (&id, grad) in &self.grad_weights {
            let base = 2 * id as usize;
            self.weights[base] -= (scale * grad[0]) as f32;
            self.weights[base + 1] -= (scale * grad[1]) as f32;
        }
        self.bias[0] -= (scale * self.grad_bias[0]) as f32;
        self.bias[1] -= (scale * self.grad_bias[1]) as f32;
        self.grad_weights.clear();
        self.grad_bias = [0.0; 2];
        self.grad_batches = 0;
    }

    fn save(&self, path: &Path) -> Result<()> {
        let state = BowState {
            buckets: self.buckets,
            weights: self.weights.clone(),
            bias: self.bias,
        };
        let file = std::fs::File::create(path)?;
        serde_json::to_writer(std::io::BufWriter::new(file), &state)
            .map_err(|e| ToxPipeError::CheckpointSave(e.to_string()))
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        let file = std::fs::File::open(path)
            .map_err(|e| ToxPipeError::CheckpointLoad(format!("{}: {e}", path.display())))?;
        let state: BowState = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| ToxPipeError::CheckpointLoad(e.to_string()))?;
        if state.buckets != self.buckets {
            return Err(ToxPipeError::CheckpointLoad(format!(
                "bucket mismatch: checkpoint has {}, model has {}",
                state.buckets, self.buckets
            )));
        }
        self.weights = state.weights;
        self.bias = state.bias;
        Ok(())
    }
}
