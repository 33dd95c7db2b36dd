//! Per-run append-only text log.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use chrono::Utc;

/// Free-form progress log, one file per run. Write failures are swallowed:
/// a full disk should never kill an epoch.
pub struct TrainLogger {
    file: File,
    start_time: Instant,
}

impl TrainLogger {
    pub fn new(log_path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;
        Ok(Self {
            file,
            start_time: Instant::now(),
        })
    }

    fn write_line(&mut self, line: &str) {
        let elapsed = self.start_time.elapsed().as_secs();
        let _ = writeln!(self.file, "[{:>6}s] {}", elapsed, line);
        let _ = self.file.flush();
    }

    pub fn log_message(&mut self, msg: &str) {
        self.write_line(msg);
    }

    pub fn log_epoch_start(&mut self, epoch: usize, total: usize, lr: f64) {
        self.write_line(&format!(
            "=== EPOCH {}/{} === {} LR: {:.2e}",
            epoch,
            total,
            Utc::now().to_rfc3339(),
            lr
        ));
    }

    pub fn log_step(&mut self, step: usize, loss: f64, score: f64, secs: f64) {
        self.write_line(&format!(
            "Train Step {:>6} | Loss: {:.5} | RocAuc: {:.5} | time: {:.1}s",
            step, loss, score, secs
        ));
    }

    pub fn log_result(&mut self, phase: &str, epoch: usize, loss: f64, score: f64, secs: f64) {
        self.write_line(&format!(
            "[RESULT] {}. Epoch: {} | Loss: {:.5} | RocAuc: {:.5} | time: {:.1}s",
            phase, epoch, loss, score, secs
        ));
    }

    pub fn log_checkpoint(&mut self, path: &Path) {
        self.write_line(&format!("CHECKPOINT -> {}", path.display()));
    }

    pub fn log_submission(&mut self, path: &Path, rows: usize) {
        self.write_line(&format!("SUBMISSION {} rows -> {}", rows, path.display()));
    }
}
