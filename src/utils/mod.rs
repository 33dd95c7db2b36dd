// src/utils/mod.rs

mod format;
mod paths;

pub use format::{format_duration, format_number};
pub use paths::RunPaths;
