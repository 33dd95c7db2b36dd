//! Reduce-on-plateau learning-rate schedule, stepped once per validation
//! epoch on the rolling AUC (higher is better).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Multiplier applied when the score plateaus.
    pub factor: f64,
    /// Non-improving epochs tolerated before reducing.
    pub patience: usize,
    /// Absolute improvement needed to count as progress.
    pub threshold: f64,
    /// Floor for the learning rate.
    pub min_lr: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            factor: 0.7,
            patience: 0,
            threshold: 1e-4,
            min_lr: 1e-8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlateauScheduler {
    config: SchedulerConfig,
    base_lr: f64,
    lr: f64,
    best: f64,
    bad_epochs: usize,
}

impl PlateauScheduler {
    pub fn new(lr: f64, config: SchedulerConfig) -> Self {
        Self {
            config,
            base_lr: lr,
            lr,
            best: f64::NEG_INFINITY,
            bad_epochs: 0,
        }
    }

    pub fn lr(&self) -> f64 {
        self.lr
    }

    /// Puts the learning rate back at its starting value; plateau tracking
    /// keeps going. Used by the tuning pass.
    pub fn reset_lr(&mut self) {
        self.lr = self.base_lr;
    }

    /// Feeds one validation score and returns the (possibly reduced) LR.
    pub fn step(&mut self, score: f64) -> f64 {
        if score > self.best + self.config.threshold {
            self.best = score;
            self.bad_epochs = 0;
        } else {
            self.bad_epochs += 1;
            if self.bad_epochs > self.config.patience {
                self.lr = (self.lr * self.config.factor).max(self.config.min_lr);
                self.bad_epochs = 0;
            }
        }
        self.lr
    }
}
