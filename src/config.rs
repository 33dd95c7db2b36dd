//! Pipeline and training configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::{DEFAULT_AUGMENT_P, MIN_REAL_TOKENS};
use crate::error::{Result, ToxPipeError};

/// Fixed token-sequence length used for truncation/padding.
pub const MAX_LENGTH: usize = 224;

/// Data-side knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Fixed encoded sequence length.
    pub max_length: usize,
    /// Real-token floor below which train samples get synthetic mixing.
    pub min_real_tokens: usize,
    /// Per-transform probability in the augmentation chain.
    pub augment_p: f64,
    /// Base RNG seed for shuffling and augmentation.
    pub seed: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_length: MAX_LENGTH,
            min_real_tokens: MIN_REAL_TOKENS,
            augment_p: DEFAULT_AUGMENT_P,
            seed: 42,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_length == 0 {
            return Err(ToxPipeError::Config("max_length must be positive".into()));
        }
        if self.min_real_tokens > self.max_length {
            return Err(ToxPipeError::Config(format!(
                "min_real_tokens ({}) cannot exceed max_length ({})",
                self.min_real_tokens, self.max_length
            )));
        }
        if !(0.0..=1.0).contains(&self.augment_p) {
            return Err(ToxPipeError::Config(format!(
                "augment_p must be in [0,1], got {}",
                self.augment_p
            )));
        }
        Ok(())
    }

    /// Persists the run configuration next to its artifacts.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ToxPipeError::Config(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
