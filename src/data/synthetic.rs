//! Synthetic sample mixing from an auxiliary subtitles corpus.
//!
//! Short comments carry too few real tokens for a stable encoding. Mixing in
//! label-consistent fragments from a large held-out corpus raises the token
//! count without mislabeling the sample.

use std::collections::HashSet;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;
use serde::Deserialize;

use crate::data::cleaner::TextCleaner;
use crate::data::language::Language;
use crate::error::{Result, ToxPipeError};

#[derive(Debug, Deserialize)]
struct SubtitleRow {
    #[allow(dead_code)]
    id: i64,
    #[serde(default)]
    comment_text: Option<String>,
    toxic: f64,
    lang: String,
}

/// Two disjoint sets of cleaned, deduplicated fragments partitioned by label.
/// Immutable after construction; shared read-only across fetches.
pub struct SyntheticPool {
    toxic: Vec<String>,
    non_toxic: Vec<String>,
}

impl SyntheticPool {
    /// Builds the pool from the auxiliary corpus CSV
    /// (columns `id`, `comment_text`, `toxic`, `lang`).
    ///
    /// Rows with missing text are dropped, each text is cleaned (parallel map
    /// over independent rows), duplicates keep the first occurrence, and the
    /// fractional `toxic` column is rounded to a binary label.
    pub fn from_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path).map_err(|source| ToxPipeError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        let mut rows: Vec<(String, Language, u8)> = Vec::new();
        for record in reader.deserialize::<SubtitleRow>() {
            let row = record.map_err(|source| ToxPipeError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
            let Some(text) = row.comment_text else { continue };
            if text.trim().is_empty() {
                continue;
            }
            let label = if row.toxic >= 0.5 { 1 } else { 0 };
            rows.push((text, Language::from_code(&row.lang), label));
        }

        let cleaner = TextCleaner::new();
        let cleaned: Vec<(String, u8)> = rows
            .par_iter()
            .map(|(text, lang, label)| (cleaner.clean(text, *lang), *label))
            .collect();

        let mut seen = HashSet::new();
        let mut toxic = Vec::new();
        let mut non_toxic = Vec::new();
        for (text, label) in cleaned {
            if text.is_empty() || !seen.insert(text.clone()) {
                continue;
            }
            if label == 1 {
                toxic.push(text);
            } else {
                non_toxic.push(text);
            }
        }

        if non_toxic.is_empty() {
            return Err(ToxPipeError::EmptyPool {
                path: path.to_path_buf(),
                label: 0,
            });
        }
        if toxic.is_empty() {
            return Err(ToxPipeError::EmptyPool {
                path: path.to_path_buf(),
                label: 1,
            });
        }

        Ok(Self { toxic, non_toxic })
    }

    /// Builds a pool from already-cleaned fragments. Test seam.
    pub fn from_fragments(toxic: Vec<String>, non_toxic: Vec<String>) -> Self {
        Self { toxic, non_toxic }
    }

    pub fn toxic_len(&self) -> usize {
        self.toxic.len()
    }

    pub fn non_toxic_len(&self) -> usize {
        self.non_toxic.len()
    }
}

/// Builds composite samples by appending label-consistent pool fragments.
pub struct SyntheticMixer {
    pool: SyntheticPool,
}

impl SyntheticMixer {
    pub fn new(pool: SyntheticPool) -> Self {
        Self { pool }
    }

    /// Appends pool fragments to `text` according to its label, shuffles the
    /// fragment order (original text included) and rejoins with spaces.
    ///
    /// label 0: 1..=5 non-toxic fragments.
    /// label 1: 0..=2 non-toxic plus 1..=3 toxic fragments, so a toxic mix
    /// always carries at least one toxic-pool fragment.
    pub fn mix<R: Rng>(&self, text: &str, label: u8, rng: &mut R) -> String {
        let mut texts: Vec<&str> = vec![text];
        if label == 0 {
            for _ in 0..rng.gen_range(1..=5) {
                texts.push(self.pool.non_toxic.choose(rng).map(String::as_str).unwrap_or(""));
            }
        } else {
            for _ in 0..rng.gen_range(0..=2) {
                texts.push(self.pool.non_toxic.choose(rng).map(String::as_str).unwrap_or(""));
            }
            for _ in 0..rng.gen_range(1..=3) {
                texts.push(self.pool.toxic.choose(rng).map(String::as_str).unwrap_or(""));
            }
        }
        texts.shuffle(rng);
        texts.join(" ")
    }
}
