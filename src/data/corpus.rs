//! CSV split loading.
//!
//! All splits are read once at startup into parallel arrays and never mutated
//! afterwards. Validation and test text is cleaned eagerly (parallel map over
//! rows); train text stays raw because cleaning happens lazily inside the
//! augmentation chain at fetch time.

use std::path::Path;

use rayon::prelude::*;
use serde::Deserialize;

use crate::data::cleaner::TextCleaner;
use crate::data::language::Language;
use crate::error::{Result, ToxPipeError};

/// Parallel arrays backing one data split.
///
/// `labels_or_ids` holds the rounded binary label for supervised splits and
/// the opaque row id for the test split.
#[derive(Debug, Clone)]
pub struct SampleSplit {
    pub labels_or_ids: Vec<i64>,
    pub texts: Vec<String>,
    pub langs: Vec<Language>,
}

impl SampleSplit {
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

}

/// The validation CSV feeds two splits: `tune` keeps raw text for the optional
/// extra training pass with train transforms, `eval` carries cleaned text for
/// scoring.
#[derive(Debug, Clone)]
pub struct ValidationSplits {
    pub tune: SampleSplit,
    pub eval: SampleSplit,
}

#[derive(Debug, Deserialize)]
struct TrainRow {
    comment_text: String,
    toxic: f64,
    lang: String,
}

#[derive(Debug, Deserialize)]
struct ValidationRow {
    #[allow(dead_code)]
    id: i64,
    comment_text: String,
    toxic: f64,
    lang: String,
}

#[derive(Debug, Deserialize)]
struct TestRow {
    id: i64,
    content: String,
    lang: String,
}

fn csv_reader(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    if !path.exists() {
        return Err(ToxPipeError::FileNotFound(path.to_path_buf()));
    }
    csv::Reader::from_path(path).map_err(|source| ToxPipeError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

fn csv_row_error(path: &Path, source: csv::Error) -> ToxPipeError {
    ToxPipeError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

fn round_label(toxic: f64) -> i64 {
    if toxic >= 0.5 {
        1
    } else {
        0
    }
}

/// Loads the training CSV (`comment_text`, `toxic`, `lang`). Text stays raw.
pub fn load_train(path: &Path) -> Result<SampleSplit> {
    let mut reader = csv_reader(path)?;
    let mut split = SampleSplit {
        labels_or_ids: Vec::new(),
        texts: Vec::new(),
        langs: Vec::new(),
    };
    for record in reader.deserialize::<TrainRow>() {
        let row = record.map_err(|e| csv_row_error(path, e))?;
        split.labels_or_ids.push(round_label(row.toxic));
        split.texts.push(row.comment_text);
        split.langs.push(Language::from_code(&row.lang));
    }
    if split.is_empty() {
        return Err(ToxPipeError::DatasetEmpty(path.to_path_buf()));
    }
    Ok(split)
}

/// Loads the validation CSV (`id`, `comment_text`, `toxic`, `lang`) into the
/// raw tune split and the eagerly-cleaned eval split.
pub fn load_validation(path: &Path, cleaner: &TextCleaner) -> Result<ValidationSplits> {
    let mut reader = csv_reader(path)?;
    let mut labels = Vec::new();
    let mut texts = Vec::new();
    let mut langs = Vec::new();
    for record in reader.deserialize::<ValidationRow>() {
        let row = record.map_err(|e| csv_row_error(path, e))?;
        labels.push(round_label(row.toxic));
        texts.push(row.comment_text);
        langs.push(Language::from_code(&row.lang));
    }
    if texts.is_empty() {
        return Err(ToxPipeError::DatasetEmpty(path.to_path_buf()));
    }

    let cleaned: Vec<String> = texts
        .par_iter()
        .zip(&langs)
        .map(|(text, lang)| cleaner.clean(text, *lang))
        .collect();

    Ok(ValidationSplits {
        tune: SampleSplit {
            labels_or_ids: labels.clone(),
            texts,
            langs: langs.clone(),
        },
        eval: SampleSplit {
            labels_or_ids: labels,
            texts: cleaned,
            langs,
        },
    })
}

/// Loads the test CSV (`id`, `content`, `lang`); content is cleaned eagerly
/// and the row id becomes the opaque identifier.
pub fn load_test(path: &Path, cleaner: &TextCleaner) -> Result<SampleSplit> {
    let mut reader = csv_reader(path)?;
    let mut ids = Vec::new();
    let mut texts = Vec::new();
    let mut langs = Vec::new();
    for record in reader.deserialize::<TestRow>() {
        let row = record.map_err(|e| csv_row_error(path, e))?;
        ids.push(row.id);
        texts.push(row.content);
        langs.push(Language::from_code(&row.lang));
    }
    if texts.is_empty() {
        return Err(ToxPipeError::DatasetEmpty(path.to_path_buf()));
    }

    let cleaned: Vec<String> = texts
        .par_iter()
        .zip(&langs)
        .map(|(text, lang)| cleaner.clean(text, *lang))
        .collect();

    Ok(SampleSplit {
        labels_or_ids: ids,
        texts: cleaned,
        langs,
    })
}
