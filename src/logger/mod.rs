// src/logger/mod.rs

mod metrics_csv;
mod train_log;

pub use metrics_csv::MetricsCsv;
pub use train_log::TrainLogger;
