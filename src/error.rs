use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToxPipeError {
    // --- I/O ---
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    // --- Data ---
    #[error("Failed to read CSV {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("Missing column `{column}` in {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Dataset empty: {0}")]
    DatasetEmpty(PathBuf),

    #[error("Synthetic pool for label {label} is empty after cleaning: {path}")]
    EmptyPool { path: PathBuf, label: u8 },

    // --- Encoder ---
    #[error("Encoder error: {0}")]
    Encoder(String),

    #[error("Encoder load failed: {0}")]
    EncoderLoad(String),

    // --- Model ---
    #[error("No checkpoint has been saved in this run")]
    CheckpointMissing,

    #[error("Checkpoint load failed: {0}")]
    CheckpointLoad(String),

    #[error("Checkpoint save failed: {0}")]
    CheckpointSave(String),

    // --- Config ---
    #[error("Invalid config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ToxPipeError>;
