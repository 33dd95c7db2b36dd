// src/data/mod.rs

mod augment;
mod cleaner;
mod corpus;
mod dataset;
mod language;
mod sentences;
mod synthetic;

pub use augment::{AugmentationPipeline, DEFAULT_AUGMENT_P};
pub use cleaner::{exclude_duplicate_sentences, TextCleaner};
pub use corpus::{load_test, load_train, load_validation, SampleSplit, ValidationSplits};
pub use dataset::{BatchLoader, Fetched, SampleMode, SampleSource, TokenBatch, MIN_REAL_TOKENS};
pub use language::Language;
pub use sentences::{split_sentences, SentenceRules};
pub use synthetic::{SyntheticMixer, SyntheticPool};
