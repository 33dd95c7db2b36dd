//! The trainable classifier seam.
//!
//! The pipeline never looks inside the model: it forwards batches, applies
//! optimizer steps, and serializes state through this trait. The pretrained
//! transformer backbone lives behind it; `BowClassifier` is the self-contained
//! reference implementation used by the CLI default and the test suites.

mod linear;
mod scheduler;
mod trainer;

pub use linear::BowClassifier;
pub use scheduler::{PlateauScheduler, SchedulerConfig};
pub use trainer::{FitConfig, FitSummary, Fitter};

use std::path::Path;

use crate::data::TokenBatch;
use crate::error::Result;

/// Forward-pass result: per-sample 2-class logits, plus the batch loss when
/// targets were supplied.
#[derive(Debug, Clone)]
pub struct ClassifierOutput {
    pub loss: Option<f64>,
    pub logits: Vec<[f32; 2]>,
}

/// Contract for the opaque trainable classifier.
pub trait SequenceClassifier {
    /// Toggles train/eval mode (dropout, gradient accumulation, ...).
    fn set_train(&mut self, train: bool);

    /// Runs the batch through the model. With targets in train mode the
    /// implementation accumulates gradients for the next `optimize` call;
    /// with targets in eval mode it only reports the loss.
    fn forward(&mut self, batch: &TokenBatch, targets: Option<&[u8]>) -> ClassifierOutput;

    /// Applies accumulated gradients at the given learning rate.
    fn optimize(&mut self, lr: f64);

    /// Serializes model state to an opaque blob.
    fn save(&self, path: &Path) -> Result<()>;

    /// Restores model state from `save` output.
    fn load(&mut self, path: &Path) -> Result<()>;
}
