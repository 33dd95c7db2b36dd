//! Clean command.
//!
//! Applies the text cleaner to one CSV column and writes the result as a new
//! CSV with all other columns untouched. Useful for eyeballing what the
//! pipeline actually feeds the encoder.

use std::path::Path;

use crate::data::{Language, TextCleaner};
use crate::error::{Result, ToxPipeError};
use crate::utils::format_number;

pub fn execute(input: &Path, output: &Path, text_column: &str) -> Result<()> {
    println!("═══════════════════════════════════════════════════════════");
    println!("  🧹 Cleaning corpus column `{}`", text_column);
    println!("═══════════════════════════════════════════════════════════");

    if !input.exists() {
        return Err(ToxPipeError::FileNotFound(input.to_path_buf()));
    }
    let mut reader = csv::Reader::from_path(input).map_err(|source| ToxPipeError::Csv {
        path: input.to_path_buf(),
        source,
    })?;
    let headers = reader
        .headers()
        .map_err(|source| ToxPipeError::Csv {
            path: input.to_path_buf(),
            source,
        })?
        .clone();

    let text_idx = headers
        .iter()
        .position(|h| h == text_column)
        .ok_or_else(|| ToxPipeError::MissingColumn {
            path: input.to_path_buf(),
            column: text_column.to_string(),
        })?;
    // Rows without a lang column fall back to the English sentence rules.
    let lang_idx = headers.iter().position(|h| h == "lang");

    let cleaner = TextCleaner::new();
    let mut writer = csv::Writer::from_path(output).map_err(|source| ToxPipeError::Csv {
        path: output.to_path_buf(),
        source,
    })?;
    writer
        .write_record(&headers)
        .map_err(|source| ToxPipeError::Csv {
            path: output.to_path_buf(),
            source,
        })?;

    let mut rows = 0usize;
    let mut chars_before = 0usize;
    let mut chars_after = 0usize;
    for record in reader.records() {
        let record = record.map_err(|source| ToxPipeError::Csv {
            path: input.to_path_buf(),
            source,
        })?;
        let lang = lang_idx
            .map(|i| Language::from_code(&record[i]))
            .unwrap_or_default();
        let cleaned = cleaner.clean(&record[text_idx], lang);
        chars_before += record[text_idx].len();
        chars_after += cleaned.len();

        let out: Vec<&str> = record
            .iter()
            .enumerate()
            .map(|(i, field)| if i == text_idx { cleaned.as_str() } else { field })
            .collect();
        writer
            .write_record(&out)
            .map_err(|source| ToxPipeError::Csv {
                path: output.to_path_buf(),
                source,
            })?;
        rows += 1;
    }
    writer.flush()?;

    let reduction = if chars_before > 0 {
        100.0 * (1.0 - chars_after as f64 / chars_before as f64)
    } else {
        0.0
    };
    println!();
    println!("═══════════════════════════════════════════════════════════");
    println!("  ✅ Cleaning complete");
    println!("  Rows: {}", format_number(rows));
    println!("  Chars: {} -> {}", format_number(chars_before), format_number(chars_after));
    println!("  Reduction: {:.1}%", reduction);
    println!("═══════════════════════════════════════════════════════════");
    Ok(())
}
