//! Train-time text augmentation.
//!
//! A chain of independently gated transforms, evaluated per sample per fetch.
//! Each transform fires with probability `p` and re-collapses whitespace so
//! downstream sentence splitting never sees double spaces.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::data::cleaner::{exclude_duplicate_sentences, PATTERNS};
use crate::data::language::Language;
use crate::data::sentences::split_sentences;

/// Default per-transform probability.
pub const DEFAULT_AUGMENT_P: f64 = 0.95;

#[derive(Debug, Clone)]
pub struct AugmentationPipeline {
    p: f64,
}

impl AugmentationPipeline {
    pub fn new(p: f64) -> Self {
        Self { p }
    }

    /// Runs the whole chain. The chain itself always runs; each step is gated
    /// independently, so any subset may fire on a given call.
    pub fn augment<R: Rng>(&self, text: &str, lang: Language, rng: &mut R) -> String {
        let mut text = text.to_string();
        if rng.gen_bool(self.p) {
            text = exclude_mentions(&text);
        }
        if rng.gen_bool(self.p) {
            text = exclude_urls(&text);
        }
        if rng.gen_bool(self.p) {
            text = exclude_numbers(&text);
        }
        if rng.gen_bool(self.p) {
            text = exclude_hashtags(&text);
        }
        if rng.gen_bool(self.p) {
            text = collapse_spaces(&exclude_duplicate_sentences(&text, lang));
        }
        text
    }

    /// Reorders sentences uniformly at random. Not part of the default chain;
    /// kept available for experiments with long comments.
    pub fn shuffle_sentences<R: Rng>(&self, text: &str, lang: Language, rng: &mut R) -> String {
        let mut sentences = split_sentences(text, lang.sentence_rules());
        sentences.shuffle(rng);
        sentences.join(" ")
    }
}

impl Default for AugmentationPipeline {
    fn default() -> Self {
        Self::new(DEFAULT_AUGMENT_P)
    }
}

fn collapse_spaces(text: &str) -> String {
    PATTERNS.multi_space.replace_all(text, " ").to_string()
}

fn exclude_mentions(text: &str) -> String {
    collapse_spaces(&PATTERNS.mention.replace_all(text, ""))
}

fn exclude_urls(text: &str) -> String {
    collapse_spaces(&PATTERNS.url.replace_all(text, ""))
}

fn exclude_numbers(text: &str) -> String {
    collapse_spaces(&PATTERNS.digits.replace_all(text, ""))
}

fn exclude_hashtags(text: &str) -> String {
    collapse_spaces(&PATTERNS.hashtag.replace_all(text, ""))
}
