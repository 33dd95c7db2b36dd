//! Infer command.
//!
//! Scores a test CSV with an existing checkpoint and writes a submission file.

use std::path::PathBuf;
use std::sync::Arc;

use crate::data::{load_test, SampleSource, TextCleaner};
use crate::encoder::{HashingEncoder, PretrainedEncoder, TextEncoder};
use crate::error::{Result, ToxPipeError};
use crate::model::{BowClassifier, FitConfig, Fitter};
use crate::utils::{format_number, RunPaths};

pub struct InferArgs {
    pub test_csv: PathBuf,
    pub checkpoint: PathBuf,
    pub tokenizer: Option<PathBuf>,
    pub output: PathBuf,
    pub buckets: u32,
    pub batch_size: usize,
    pub max_length: usize,
}

pub fn execute(args: &InferArgs) -> Result<()> {
    println!("═══════════════════════════════════════════════════════════");
    println!("  🔎 Scoring test split");
    println!("═══════════════════════════════════════════════════════════");
    println!("  Checkpoint: {:?}", args.checkpoint);

    if !args.checkpoint.exists() {
        return Err(ToxPipeError::FileNotFound(args.checkpoint.clone()));
    }

    let cleaner = TextCleaner::new();
    let test = load_test(&args.test_csv, &cleaner)?;
    println!("  Test rows: {}", format_number(test.len()));

    match &args.tokenizer {
        Some(path) => {
            let encoder = PretrainedEncoder::from_file(path)?;
            let buckets = encoder.vocab_size();
            run(args, Arc::new(encoder), buckets, test)
        }
        None => run(args, Arc::new(HashingEncoder::new(args.buckets)), args.buckets, test),
    }
}

fn run<E: TextEncoder>(
    args: &InferArgs,
    encoder: Arc<E>,
    buckets: u32,
    test: crate::data::SampleSplit,
) -> Result<()> {
    let test_source = SampleSource::test(test, encoder, args.max_length);

    let mut paths = RunPaths::new(&args.output)?;
    paths.set_last_checkpoint(args.checkpoint.clone());

    let config = FitConfig {
        batch_size: args.batch_size,
        ..FitConfig::default()
    };
    let mut fitter = Fitter::new(BowClassifier::new(buckets), config, paths)?;
    let submission = fitter.run_inference(&test_source)?;

    println!();
    println!("  ✅ Submission written: {:?}", submission);
    println!("═══════════════════════════════════════════════════════════");
    Ok(())
}
