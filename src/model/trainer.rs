//! Epoch-level training orchestration.
//!
//! `Fitter` drives the opaque classifier over SampleSource batches: train one
//! epoch, validate, feed the scheduler, and on every validation improvement
//! save a checkpoint and immediately score the test split into a submission
//! file.

use std::path::PathBuf;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::data::{BatchLoader, SampleSource, TokenBatch};
use crate::encoder::TextEncoder;
use crate::error::{Result, ToxPipeError};
use crate::logger::{MetricsCsv, TrainLogger};
use crate::metrics::{softmax_positive, AverageMeter, RocAucMeter};
use crate::utils::RunPaths;

use super::{PlateauScheduler, SchedulerConfig, SequenceClassifier};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitConfig {
    pub n_epochs: usize,
    pub batch_size: usize,
    pub lr: f64,
    pub verbose: bool,
    /// Steps between verbose progress lines.
    pub verbose_step: usize,
    /// Minimum positive share per train batch; sparser batches are skipped so
    /// the loss signal never collapses to the negative class.
    pub positive_floor: f64,
    pub seed: u64,
    pub scheduler: SchedulerConfig,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            n_epochs: 3,
            batch_size: 7,
            lr: 2e-5,
            verbose: true,
            verbose_step: 50,
            positive_floor: 0.15,
            seed: 42,
            scheduler: SchedulerConfig::default(),
        }
    }
}

/// End-of-run report.
#[derive(Debug, Clone)]
pub struct FitSummary {
    pub best_score: f64,
    pub epochs_run: usize,
    pub checkpoints_saved: usize,
    pub submissions_written: usize,
}

pub struct Fitter<C: SequenceClassifier> {
    model: C,
    config: FitConfig,
    scheduler: PlateauScheduler,
    paths: RunPaths,
    logger: TrainLogger,
    metrics: MetricsCsv,
    best_score: f64,
    epoch: usize,
    // Persists across train epochs; validation scores use fresh meters.
    final_scores: RocAucMeter,
}

impl<C: SequenceClassifier> Fitter<C> {
    pub fn new(model: C, config: FitConfig, mut paths: RunPaths) -> Result<Self> {
        let log_path = paths.next_log();
        let logger = TrainLogger::new(&log_path)?;
        let metrics = MetricsCsv::new(&log_path.with_extension("csv"))?;
        let scheduler = PlateauScheduler::new(config.lr, config.scheduler.clone());
        Ok(Self {
            model,
            config,
            scheduler,
            paths,
            logger,
            metrics,
            best_score: 0.0,
            epoch: 0,
            final_scores: RocAucMeter::new(),
        })
    }

    pub fn best_score(&self) -> f64 {
        self.best_score
    }

    /// Full training run over `n_epochs`.
    pub fn fit<E: TextEncoder>(
        &mut self,
        train: &SampleSource<E>,
        validation: &SampleSource<E>,
        test: &SampleSource<E>,
    ) -> Result<FitSummary> {
        for e in 0..self.config.n_epochs {
            let lr = self.scheduler.lr();
            println!("Epoch {}/{}", e + 1, self.config.n_epochs);
            if self.config.verbose {
                self.logger.log_epoch_start(e + 1, self.config.n_epochs, lr);
            }

            let t = Instant::now();
            let (loss, score) = self.train_one_epoch(train)?;
            let secs = t.elapsed().as_secs_f64();
            self.logger.log_result("Train", self.epoch, loss, score, secs);
            self.metrics.record(self.epoch, "train", loss, score, lr, secs);

            let t = Instant::now();
            let (val_loss, val_score) = self.validation(validation)?;
            let secs = t.elapsed().as_secs_f64();
            self.logger
                .log_result("Validation", self.epoch, val_loss, val_score, secs);
            self.metrics
                .record(self.epoch, "validation", val_loss, val_score, lr, secs);

            self.scheduler.step(val_score);
            self.epoch += 1;

            if self.record_validation_score(val_score) {
                let path = self.save_checkpoint()?;
                println!("  saved {}", path.display());
                self.run_inference(test)?;
            }
        }

        Ok(FitSummary {
            best_score: self.best_score,
            epochs_run: self.epoch,
            checkpoints_saved: self.paths.checkpoint_count(),
            submissions_written: self.paths.submission_count(),
        })
    }

    /// Extra pass over the validation split with train transforms at the base
    /// LR, then inference. Run after `fit` when squeezing out the last bit of
    /// score is worth the leakage.
    pub fn tune<E: TextEncoder>(
        &mut self,
        validation_tune: &SampleSource<E>,
        test: &SampleSource<E>,
    ) -> Result<()> {
        self.scheduler.reset_lr();
        let t = Instant::now();
        let (loss, score) = self.train_one_epoch(validation_tune)?;
        self.logger
            .log_result("Tune", self.epoch, loss, score, t.elapsed().as_secs_f64());
        if score > self.best_score {
            self.best_score = score;
            let path = self.save_checkpoint()?;
            println!("  saved {}", path.display());
        }
        self.run_inference(test)?;
        Ok(())
    }

    fn train_one_epoch<E: TextEncoder>(&mut self, train: &SampleSource<E>) -> Result<(f64, f64)> {
        self.model.set_train(true);
        let mut losses = AverageMeter::new();
        let t = Instant::now();
        let lr = self.scheduler.lr();

        let seed = self.config.seed + self.epoch as u64;
        let loader = BatchLoader::shuffled(train, self.config.batch_size, seed);

        for (step, batch) in loader.enumerate() {
            let batch = batch?;
            let targets = batch.targets();

            if self.config.verbose && step % self.config.verbose_step == 0 {
                self.logger
                    .log_step(step, losses.avg, self.final_scores.avg(), t.elapsed().as_secs_f64());
            }

            // Skip batches with too few positives; they teach the model
            // nothing but "predict zero".
            let positives: usize = targets.iter().map(|&t| t as usize).sum();
            if (positives as f64) < self.config.batch_size as f64 * self.config.positive_floor {
                continue;
            }

            let output = self.model.forward(&batch, Some(&targets));
            self.final_scores.update(&targets, &output.logits);
            losses.update(output.loss.unwrap_or(0.0), batch.len());
            self.model.optimize(lr);
        }

        self.model.set_train(false);
        Ok((losses.avg, self.final_scores.avg()))
    }

    fn validation<E: TextEncoder>(&mut self, validation: &SampleSource<E>) -> Result<(f64, f64)> {
        self.model.set_train(false);
        let mut losses = AverageMeter::new();
        let mut scores = RocAucMeter::new();

        let loader = BatchLoader::sequential(validation, self.config.batch_size, self.config.seed);
        for batch in loader {
            let batch = batch?;
            let targets = batch.targets();
            let output = self.model.forward(&batch, Some(&targets));
            scores.update(&targets, &output.logits);
            losses.update(output.loss.unwrap_or(0.0), batch.len());
        }
        Ok((losses.avg, scores.avg()))
    }

    /// Checkpoint-on-improvement policy. Returns whether `score` beat the
    /// best seen so far (and became the new best).
    pub fn record_validation_score(&mut self, score: f64) -> bool {
        if score > self.best_score {
            self.logger.log_message(&format!(
                "final_score improved from {:.5} to {:.5}, saving model",
                self.best_score, score
            ));
            self.best_score = score;
            true
        } else {
            self.logger.log_message(&format!(
                "final_score did not improve from {:.5}",
                self.best_score
            ));
            false
        }
    }

    fn save_checkpoint(&mut self) -> Result<PathBuf> {
        let path = self.paths.next_checkpoint();
        self.model.save(&path)?;
        self.logger.log_checkpoint(&path);
        Ok(path)
    }

    /// Scores the test split with the most recently saved checkpoint and
    /// writes a submission CSV (`id,toxic`). Fails fast when no checkpoint
    /// exists yet: scoring with unsaved weights would not be reproducible.
    pub fn run_inference<E: TextEncoder>(&mut self, test: &SampleSource<E>) -> Result<PathBuf> {
        let checkpoint = self
            .paths
            .last_checkpoint()
            .ok_or(ToxPipeError::CheckpointMissing)?
            .to_path_buf();
        self.model.load(&checkpoint)?;
        self.model.set_train(false);

        let submission_path = self.paths.next_submission();
        let mut writer = csv::Writer::from_path(&submission_path)
            .map_err(|source| ToxPipeError::Csv {
                path: submission_path.clone(),
                source,
            })?;
        writer
            .write_record(["id", "toxic"])
            .map_err(|source| ToxPipeError::Csv {
                path: submission_path.clone(),
                source,
            })?;

        let mut rows = 0usize;
        let loader = BatchLoader::sequential(test, self.config.batch_size, self.config.seed);
        for batch in loader {
            let batch: TokenBatch = batch?;
            let output = self.model.forward(&batch, None);
            for (id, logits) in batch.labels_or_ids.iter().zip(&output.logits) {
                let toxic = softmax_positive(*logits);
                writer
                    .write_record([id.to_string(), format!("{toxic:.6}")])
                    .map_err(|source| ToxPipeError::Csv {
                        path: submission_path.clone(),
                        source,
                    })?;
                rows += 1;
            }
        }
        writer.flush()?;
        self.logger.log_submission(&submission_path, rows);
        Ok(submission_path)
    }
}
