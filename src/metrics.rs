//! Online training metrics: rolling ROC-AUC and a running average.

use std::collections::VecDeque;

/// Number of most recent (label, probability) pairs the AUC is scored over.
pub const ROLLING_WINDOW: usize = 10_000;

/// Rolling ROC-AUC over the most recent `ROLLING_WINDOW` predictions.
///
/// `reset` seeds the window with one pair per class at probability 0.5 so the
/// score is defined even before both classes have shown up in real data. The
/// backing store is bounded at the window size; entries older than the window
/// can never influence the score, so they are dropped instead of retained.
pub struct RocAucMeter {
    window: VecDeque<(u8, f64)>,
    score: f64,
}

impl RocAucMeter {
    pub fn new() -> Self {
        let mut meter = Self {
            window: VecDeque::with_capacity(ROLLING_WINDOW),
            score: 0.0,
        };
        meter.reset();
        meter
    }

    /// Clears the window back to the two seed points and zeroes the score.
    /// The score stays 0 until the next `update`.
    pub fn reset(&mut self) {
        self.window.clear();
        self.window.push_back((0, 0.5));
        self.window.push_back((1, 0.5));
        self.score = 0.0;
    }

    /// Pushes a batch of targets and 2-class logits, then rescores the window.
    /// Logits are converted to class-1 probability via softmax.
    pub fn update(&mut self, targets: &[u8], logits: &[[f32; 2]]) {
        debug_assert_eq!(targets.len(), logits.len());
        for (&target, logit) in targets.iter().zip(logits) {
            if self.window.len() == ROLLING_WINDOW {
                self.window.pop_front();
            }
            self.window.push_back((target, softmax_positive(*logit)));
        }
        self.score = roc_auc(self.window.make_contiguous());
    }

    /// Most recently computed score.
    pub fn avg(&self) -> f64 {
        self.score
    }
}

impl Default for RocAucMeter {
    fn default() -> Self {
        Self::new()
    }
}

/// Class-1 probability from a 2-class logit pair.
pub fn softmax_positive(logits: [f32; 2]) -> f64 {
    let (l0, l1) = (f64::from(logits[0]), f64::from(logits[1]));
    // Subtract the max before exponentiating for numerical stability.
    let m = l0.max(l1);
    let e0 = (l0 - m).exp();
    let e1 = (l1 - m).exp();
    e1 / (e0 + e1)
}

/// Area under the ROC curve via the rank-sum (Mann-Whitney) statistic with
/// tie-averaged ranks. Returns 0.5 when only one class is present.
pub fn roc_auc(pairs: &[(u8, f64)]) -> f64 {
    let n = pairs.len();
    let positives = pairs.iter().filter(|(label, _)| *label == 1).count();
    let negatives = n - positives;
    if positives == 0 || negatives == 0 {
        return 0.5;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| pairs[a].1.partial_cmp(&pairs[b].1).unwrap_or(std::cmp::Ordering::Equal));

    // Average ranks across tied scores (1-based ranks).
    let mut ranks = vec![0.0f64; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && pairs[order[j + 1]].1 == pairs[order[i]].1 {
            j += 1;
        }
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg_rank;
        }
        i = j + 1;
    }

    let positive_rank_sum: f64 = pairs
        .iter()
        .zip(&ranks)
        .filter(|((label, _), _)| *label == 1)
        .map(|(_, rank)| rank)
        .sum();

    let p = positives as f64;
    let q = negatives as f64;
    (positive_rank_sum - p * (p + 1.0) / 2.0) / (p * q)
}

/// Computes and stores the running average of a scalar (loss, mostly).
#[derive(Debug, Clone, Default)]
pub struct AverageMeter {
    pub val: f64,
    pub avg: f64,
    pub sum: f64,
    pub count: usize,
}

impl AverageMeter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn update(&mut self, val: f64, n: usize) {
        self.val = val;
        self.sum += val * n as f64;
        self.count += n;
        if self.count > 0 {
            self.avg = self.sum / self.count as f64;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roc_auc_perfect_separation() {
        let pairs = [(0, 0.1), (0, 0.2), (1, 0.8), (1, 0.9)];
        assert!((roc_auc(&pairs) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_roc_auc_inverted_ranking() {
        let pairs = [(1, 0.1), (1, 0.2), (0, 0.8), (0, 0.9)];
        assert!(roc_auc(&pairs).abs() < 1e-12);
    }

    #[test]
    fn test_roc_auc_ties_average_to_half() {
        let pairs = [(0, 0.5), (1, 0.5), (0, 0.5), (1, 0.5)];
        assert!((roc_auc(&pairs) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_update_with_single_class_batch_does_not_panic() {
        let mut meter = RocAucMeter::new();
        // Seed points guarantee both classes are present in the window.
        meter.update(&[0, 0, 0], &[[1.0, -1.0], [2.0, -2.0], [0.5, -0.5]]);
        assert!(meter.avg() > 0.0);
    }

    #[test]
    fn test_score_zero_after_reset_until_update() {
        let mut meter = RocAucMeter::new();
        meter.update(&[1], &[[0.0, 3.0]]);
        assert!(meter.avg() > 0.0);
        meter.reset();
        assert_eq!(meter.avg(), 0.0);
    }

    #[test]
    fn test_window_is_bounded() {
        let mut meter = RocAucMeter::new();
        let targets: Vec<u8> = (0..1000).map(|i| (i % 2) as u8).collect();
        let logits: Vec<[f32; 2]> = targets
            .iter()
            .map(|&t| if t == 1 { [0.0, 1.0] } else { [1.0, 0.0] })
            .collect();
        for _ in 0..15 {
            meter.update(&targets, &logits);
        }
        assert!(meter.window.len() <= ROLLING_WINDOW);
        assert!(meter.avg() > 0.99);
    }

    #[test]
    fn test_softmax_positive_bounds() {
        assert!(softmax_positive([0.0, 10.0]) > 0.99);
        assert!(softmax_positive([10.0, 0.0]) < 0.01);
        assert!((softmax_positive([1.5, 1.5]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_average_meter() {
        let mut meter = AverageMeter::new();
        meter.update(2.0, 2);
        meter.update(5.0, 1);
        assert!((meter.avg - 3.0).abs() < 1e-12);
        assert_eq!(meter.val, 5.0);
        meter.reset();
        assert_eq!(meter.count, 0);
    }
}
