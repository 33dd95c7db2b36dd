//! Multilingual toxic-comment classification pipeline.
//!
//! Cleaning, augmentation, synthetic mixing, batching, training with
//! reduce-on-plateau scheduling, rolling ROC-AUC tracking, and
//! checkpoint-gated submission generation.

pub mod commands;
pub mod config;
pub mod data;
pub mod encoder;
pub mod error;
pub mod logger;
pub mod metrics;
pub mod model;
pub mod utils;

pub use config::{PipelineConfig, MAX_LENGTH};
pub use data::{
    AugmentationPipeline, BatchLoader, SampleSource, SyntheticMixer, SyntheticPool, TextCleaner,
};
pub use error::{Result, ToxPipeError};
pub use metrics::RocAucMeter;
pub use model::{BowClassifier, FitConfig, Fitter, SequenceClassifier};
