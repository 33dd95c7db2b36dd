//! Shared helpers for integration tests.

use std::io::Write;
use std::path::{Path, PathBuf};

pub fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).expect("Failed to create CSV");
    file.write_all(content.as_bytes()).expect("Failed to write CSV");
    path
}

/// Separable train split: toxic rows share insult vocabulary, non-toxic rows
/// share neutral vocabulary.
pub fn train_csv(dir: &Path, rows: usize) -> PathBuf {
    let mut content = String::from("comment_text,toxic,lang\n");
    for i in 0..rows {
        if i % 2 == 0 {
            content.push_str(&format!("you utter moron idiot fool variant{i},1.0,en\n"));
        } else {
            content.push_str(&format!("what a pleasant sunny day variant{i},0.0,en\n"));
        }
    }
    write_csv(dir, "train.csv", &content)
}

pub fn validation_csv(dir: &Path, rows: usize) -> PathBuf {
    let mut content = String::from("id,comment_text,toxic,lang\n");
    for i in 0..rows {
        if i % 2 == 0 {
            content.push_str(&format!("{i},such a moron idiot clown variant{i},1.0,en\n"));
        } else {
            content.push_str(&format!("{i},thanks for the lovely day variant{i},0.0,en\n"));
        }
    }
    write_csv(dir, "validation.csv", &content)
}

pub fn test_csv(dir: &Path, rows: usize) -> PathBuf {
    let mut content = String::from("id,content,lang\n");
    for i in 0..rows {
        if i % 2 == 0 {
            content.push_str(&format!("{},complete moron idiot variant{i},tr\n", 1000 + i));
        } else {
            content.push_str(&format!("{},wonderful weather today variant{i},fr\n", 1000 + i));
        }
    }
    write_csv(dir, "test.csv", &content)
}

/// Auxiliary corpus backing the synthetic mixer. Fragments stay vocabulary
/// consistent with the train split so mixing keeps the classes separable.
pub fn subtitles_csv(dir: &Path, rows: usize) -> PathBuf {
    let mut content = String::from("id,comment_text,toxic,lang\n");
    for i in 0..rows {
        if i % 2 == 0 {
            content.push_str(&format!("{i},filthy scumbag insult moron line{i},1.0,en\n"));
        } else {
            content.push_str(&format!("{i},gentle calm weather talk line{i},0.0,en\n"));
        }
    }
    write_csv(dir, "subtitles.csv", &content)
}
