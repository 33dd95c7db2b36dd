//! CLI subcommand implementations.

pub mod clean;
pub mod infer;
pub mod train;
