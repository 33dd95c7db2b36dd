//! Sample retrieval and batching.
//!
//! `SampleSource` owns one split's parallel arrays and produces fixed-length
//! tokenized samples per index. Train mode runs the augmentation chain and
//! falls back to synthetic mixing when a sample tokenizes too short;
//! eval/test mode tokenizes the pre-cleaned text directly.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::data::augment::AugmentationPipeline;
use crate::data::corpus::SampleSplit;
use crate::data::synthetic::SyntheticMixer;
use crate::encoder::{TextEncoder, TokenizedSample};
use crate::error::Result;

/// Real-token floor below which a train sample is rebuilt by the mixer.
pub const MIN_REAL_TOKENS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleMode {
    /// Augmentation + synthetic mixing; `labels_or_ids` are binary labels.
    Train,
    /// Direct tokenization; `labels_or_ids` are binary labels.
    Eval,
    /// Direct tokenization; `labels_or_ids` are opaque row ids.
    Test,
}

/// One fetched sample.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub label_or_id: i64,
    pub sample: TokenizedSample,
}

pub struct SampleSource<E: TextEncoder> {
    split: SampleSplit,
    mode: SampleMode,
    encoder: Arc<E>,
    max_length: usize,
    min_real_tokens: usize,
    augment: Option<AugmentationPipeline>,
    mixer: Option<Arc<SyntheticMixer>>,
}

impl<E: TextEncoder> SampleSource<E> {
    /// Train-mode source with the full augment + mix path.
    pub fn train(
        split: SampleSplit,
        encoder: Arc<E>,
        max_length: usize,
        augment: AugmentationPipeline,
        mixer: Arc<SyntheticMixer>,
    ) -> Self {
        Self {
            split,
            mode: SampleMode::Train,
            encoder,
            max_length,
            min_real_tokens: MIN_REAL_TOKENS,
            augment: Some(augment),
            mixer: Some(mixer),
        }
    }

    /// Eval-mode source over pre-cleaned text with supervised labels.
    pub fn eval(split: SampleSplit, encoder: Arc<E>, max_length: usize) -> Self {
        Self {
            split,
            mode: SampleMode::Eval,
            encoder,
            max_length,
            min_real_tokens: MIN_REAL_TOKENS,
            augment: None,
            mixer: None,
        }
    }

    /// Test-mode source; ids are opaque and pass straight through.
    pub fn test(split: SampleSplit, encoder: Arc<E>, max_length: usize) -> Self {
        Self {
            split,
            mode: SampleMode::Test,
            encoder,
            max_length,
            min_real_tokens: MIN_REAL_TOKENS,
            augment: None,
            mixer: None,
        }
    }

    /// Overrides the synthetic-mixing floor (train mode only cares).
    pub fn with_min_real_tokens(mut self, min_real_tokens: usize) -> Self {
        self.min_real_tokens = min_real_tokens;
        self
    }

    pub fn len(&self) -> usize {
        self.split.len()
    }

    pub fn is_empty(&self) -> bool {
        self.split.is_empty()
    }

    /// Produces the (label_or_id, token_ids, attention_mask) triple for one
    /// index. The RNG is passed in so parallel fetchers stay uncorrelated and
    /// tests stay reproducible.
    pub fn fetch<R: Rng>(&self, idx: usize, rng: &mut R) -> Result<Fetched> {
        let text = &self.split.texts[idx];
        let lang = self.split.langs[idx];
        let label_or_id = self.split.labels_or_ids[idx];

        if self.mode == SampleMode::Train {
            let augment = self.augment.as_ref().expect("train source has a pipeline");
            let mixer = self.mixer.as_ref().expect("train source has a mixer");

            let augmented = augment.augment(text, lang, rng);
            let sample = self.encoder.encode_padded(&augmented, self.max_length)?;
            if sample.real_tokens() >= self.min_real_tokens {
                return Ok(Fetched { label_or_id, sample });
            }

            // Too short to carry signal: rebuild from the synthetic pool and
            // tokenize the mixed text from scratch.
            let label = u8::from(label_or_id != 0);
            let mixed = mixer.mix(&augmented, label, rng);
            let sample = self.encoder.encode_padded(&mixed, self.max_length)?;
            return Ok(Fetched { label_or_id, sample });
        }

        let sample = self.encoder.encode_padded(text, self.max_length)?;
        Ok(Fetched { label_or_id, sample })
    }
}

/// One batch of tokenized samples ready for the classifier.
#[derive(Debug, Clone)]
pub struct TokenBatch {
    pub labels_or_ids: Vec<i64>,
    pub token_ids: Vec<Vec<u32>>,
    pub attention_masks: Vec<Vec<u8>>,
}

impl TokenBatch {
    pub fn len(&self) -> usize {
        self.labels_or_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels_or_ids.is_empty()
    }

    /// Binary targets for supervised batches.
    pub fn targets(&self) -> Vec<u8> {
        self.labels_or_ids.iter().map(|&l| u8::from(l != 0)).collect()
    }
}

/// Batched iterator over a `SampleSource`.
///
/// Train loaders shuffle indices per epoch and drop the trailing partial
/// batch; eval/test loaders run sequentially and keep it.
pub struct BatchLoader<'a, E: TextEncoder> {
    source: &'a SampleSource<E>,
    indices: Vec<usize>,
    batch_size: usize,
    drop_last: bool,
    current: usize,
    rng: ChaCha8Rng,
}

impl<'a, E: TextEncoder> BatchLoader<'a, E> {
    /// Shuffled loader for training. `seed` should vary per epoch.
    pub fn shuffled(source: &'a SampleSource<E>, batch_size: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut indices: Vec<usize> = (0..source.len()).collect();
        indices.shuffle(&mut rng);
        Self {
            source,
            indices,
            batch_size,
            drop_last: true,
            current: 0,
            rng,
        }
    }

    /// Sequential loader for validation and inference.
    pub fn sequential(source: &'a SampleSource<E>, batch_size: usize, seed: u64) -> Self {
        Self {
            source,
            indices: (0..source.len()).collect(),
            batch_size,
            drop_last: false,
            current: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn total_batches(&self) -> usize {
        if self.drop_last {
            self.indices.len() / self.batch_size
        } else {
            self.indices.len().div_ceil(self.batch_size)
        }
    }
}

impl<'a, E: TextEncoder> Iterator for BatchLoader<'a, E> {
    type Item = Result<TokenBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.indices.len() {
            return None;
        }
        let end = (self.current + self.batch_size).min(self.indices.len());
        if self.drop_last && end - self.current < self.batch_size {
            self.current = self.indices.len();
            return None;
        }

        let mut batch = TokenBatch {
            labels_or_ids: Vec::with_capacity(end - self.current),
            token_ids: Vec::with_capacity(end - self.current),
            attention_masks: Vec::with_capacity(end - self.current),
        };
        for &idx in &self.indices[self.current..end] {
            match self.source.fetch(idx, &mut self.rng) {
                Ok(fetched) => {
                    batch.labels_or_ids.push(fetched.label_or_id);
                    batch.token_ids.push(fetched.sample.token_ids);
                    batch.attention_masks.push(fetched.sample.attention_mask);
                }
                Err(e) => return Some(Err(e)),
            }
        }
        self.current = end;
        Some(Ok(batch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::corpus::SampleSplit;
    use crate::data::language::Language;
    use crate::data::synthetic::{SyntheticMixer, SyntheticPool};
    use crate::encoder::HashingEncoder;

    fn split(texts: &[&str], labels: &[i64]) -> SampleSplit {
        SampleSplit {
            labels_or_ids: labels.to_vec(),
            texts: texts.iter().map(|t| t.to_string()).collect(),
            langs: vec![Language::En; texts.len()],
        }
    }

    fn mixer() -> Arc<SyntheticMixer> {
        Arc::new(SyntheticMixer::new(SyntheticPool::from_fragments(
            vec!["angry pool sentence".into()],
            vec!["calm pool sentence".into()],
        )))
    }

    #[test]
    fn test_eval_fetch_has_exact_lengths() {
        let source = SampleSource::eval(
            split(&["short text", ""], &[1, 0]),
            Arc::new(HashingEncoder::new(1 << 16)),
            32,
        );
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for idx in 0..source.len() {
            let fetched = source.fetch(idx, &mut rng).unwrap();
            assert_eq!(fetched.sample.token_ids.len(), 32);
            assert_eq!(fetched.sample.attention_mask.len(), 32);
        }
    }

    #[test]
    fn test_empty_text_fetch_does_not_error() {
        let source = SampleSource::eval(
            split(&[""], &[0]),
            Arc::new(HashingEncoder::new(1 << 16)),
            16,
        );
        let fetched = source.fetch(0, &mut ChaCha8Rng::seed_from_u64(0)).unwrap();
        assert_eq!(fetched.sample.real_tokens(), 0);
    }

    #[test]
    fn test_short_train_sample_triggers_mixing() {
        // Two real tokens, far below the floor: the mixer must fire and the
        // token count must grow past the bare text's.
        let source = SampleSource::train(
            split(&["tiny text"], &[0]),
            Arc::new(HashingEncoder::new(1 << 16)),
            128,
            AugmentationPipeline::new(0.0),
            mixer(),
        );
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let fetched = source.fetch(0, &mut rng).unwrap();
        assert!(fetched.sample.real_tokens() > 2);
    }

    #[test]
    fn test_long_train_sample_skips_mixing() {
        let long_text = "unique".to_string()
            + &(0..80).map(|i| format!(" word{i}")).collect::<String>();
        let source = SampleSource::train(
            split(&[long_text.as_str()], &[1]),
            Arc::new(HashingEncoder::new(1 << 16)),
            224,
            AugmentationPipeline::new(0.0),
            mixer(),
        );
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let fetched = source.fetch(0, &mut rng).unwrap();
        // 81 real tokens, no pool fragments mixed in.
        assert_eq!(fetched.sample.real_tokens(), 81);
    }

    #[test]
    fn test_test_mode_passes_ids_through() {
        let source = SampleSource::test(
            split(&["whatever text"], &[987_654]),
            Arc::new(HashingEncoder::new(1 << 16)),
            16,
        );
        let fetched = source.fetch(0, &mut ChaCha8Rng::seed_from_u64(0)).unwrap();
        assert_eq!(fetched.label_or_id, 987_654);
    }

    #[test]
    fn test_shuffled_loader_drops_partial_batch() {
        let texts: Vec<String> = (0..10).map(|i| format!("text number {i}")).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let source = SampleSource::eval(
            split(&refs, &(0..10).collect::<Vec<i64>>()),
            Arc::new(HashingEncoder::new(1 << 16)),
            8,
        );
        let loader = BatchLoader::shuffled(&source, 4, 42);
        assert_eq!(loader.total_batches(), 2);
        let batches: Vec<_> = loader.map(|b| b.unwrap()).collect();
        assert_eq!(batches.len(), 2);
        assert!(batches.iter().all(|b| b.len() == 4));
    }

    #[test]
    fn test_sequential_loader_keeps_partial_batch_and_order() {
        let texts: Vec<String> = (0..5).map(|i| format!("text number {i}")).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let source = SampleSource::eval(
            split(&refs, &(0..5).collect::<Vec<i64>>()),
            Arc::new(HashingEncoder::new(1 << 16)),
            8,
        );
        let batches: Vec<_> = BatchLoader::sequential(&source, 2, 0)
            .map(|b| b.unwrap())
            .collect();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[2].len(), 1);
        let ids: Vec<i64> = batches.iter().flat_map(|b| b.labels_or_ids.clone()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_targets_from_labels() {
        let batch = TokenBatch {
            labels_or_ids: vec![0, 1, 1, 0],
            token_ids: vec![vec![]; 4],
            attention_masks: vec![vec![]; 4],
        };
        assert_eq!(batch.targets(), vec![0, 1, 1, 0]);
    }
}
