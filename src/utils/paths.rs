//! Run artifact naming.
//!
//! Checkpoint, submission and log names carry a per-run counter owned here
//! plus a run token minted at construction (UTC microseconds and a
//! process-wide sequence number), never derived from directory scans, so two
//! runs sharing an output directory never reuse a name, sequentially or in
//! parallel. The most recently saved checkpoint is tracked explicitly;
//! inference asks for it instead of reconstructing a name from a file count.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;

use crate::error::Result;

static RUN_SEQ: AtomicUsize = AtomicUsize::new(0);

pub struct RunPaths {
    checkpoints_dir: PathBuf,
    submissions_dir: PathBuf,
    logs_dir: PathBuf,
    run_token: String,
    checkpoint_count: usize,
    submission_count: usize,
    log_count: usize,
    last_checkpoint: Option<PathBuf>,
}

impl RunPaths {
    pub fn new(output_dir: &Path) -> Result<Self> {
        let checkpoints_dir = output_dir.join("checkpoints");
        let submissions_dir = output_dir.join("submissions");
        let logs_dir = output_dir.join("logs");
        std::fs::create_dir_all(&checkpoints_dir)?;
        std::fs::create_dir_all(&submissions_dir)?;
        std::fs::create_dir_all(&logs_dir)?;
        let run_token = format!(
            "{}-{}",
            Utc::now().timestamp_micros(),
            RUN_SEQ.fetch_add(1, Ordering::Relaxed)
        );
        Ok(Self {
            checkpoints_dir,
            submissions_dir,
            logs_dir,
            run_token,
            checkpoint_count: 0,
            submission_count: 0,
            log_count: 0,
            last_checkpoint: None,
        })
    }

    /// Next checkpoint path; remembers it as the latest.
    pub fn next_checkpoint(&mut self) -> PathBuf {
        let path = self.checkpoints_dir.join(format!(
            "best_model_{}_{}.ckpt",
            self.checkpoint_count, self.run_token
        ));
        self.checkpoint_count += 1;
        self.last_checkpoint = Some(path.clone());
        path
    }

    /// Latest checkpoint saved in this run, if any.
    pub fn last_checkpoint(&self) -> Option<&Path> {
        self.last_checkpoint.as_deref()
    }

    /// Marks an externally supplied checkpoint (infer-only runs) as latest.
    pub fn set_last_checkpoint(&mut self, path: PathBuf) {
        self.last_checkpoint = Some(path);
    }

    /// Next submission path: counter plus the run token.
    pub fn next_submission(&mut self) -> PathBuf {
        let path = self.submissions_dir.join(format!(
            "submission_{}_{}.csv",
            self.submission_count, self.run_token
        ));
        self.submission_count += 1;
        path
    }

    pub fn next_log(&mut self) -> PathBuf {
        let path = self
            .logs_dir
            .join(format!("log_{}_{}.txt", self.log_count, self.run_token));
        self.log_count += 1;
        path
    }

    pub fn checkpoint_count(&self) -> usize {
        self.checkpoint_count
    }

    pub fn submission_count(&self) -> usize {
        self.submission_count
    }
}
