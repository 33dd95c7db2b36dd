//! Train command.
//!
//! Loads the three splits and the auxiliary subtitles corpus, wires up the
//! encoder and augmentation chain, and runs the full fit (plus the optional
//! tuning pass) with checkpoint-on-improvement inference.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::data::{
    load_test, load_train, load_validation, AugmentationPipeline, SampleSource, SyntheticMixer,
    SyntheticPool, TextCleaner, ValidationSplits,
};
use crate::encoder::{HashingEncoder, PretrainedEncoder, TextEncoder};
use crate::error::Result;
use crate::model::{BowClassifier, FitConfig, Fitter};
use crate::utils::{format_duration, format_number, RunPaths};

pub struct TrainArgs {
    pub train_csv: PathBuf,
    pub validation_csv: PathBuf,
    pub test_csv: PathBuf,
    pub subtitles_csv: PathBuf,
    pub tokenizer: Option<PathBuf>,
    pub output: PathBuf,
    pub buckets: u32,
    pub tune: bool,
    pub pipeline: PipelineConfig,
    pub config: FitConfig,
}

pub fn execute(args: &TrainArgs) -> Result<()> {
    args.pipeline.validate()?;
    println!("═══════════════════════════════════════════════════════════");
    println!("  🚀 Training toxicity classifier");
    println!("═══════════════════════════════════════════════════════════");
    println!("  Train: {:?}", args.train_csv);
    println!("  Validation: {:?}", args.validation_csv);
    println!("  Test: {:?}", args.test_csv);
    println!("  Epochs: {} | Batch: {} | LR: {:.2e}", args.config.n_epochs, args.config.batch_size, args.config.lr);
    println!();

    let cleaner = TextCleaner::new();
    let train = load_train(&args.train_csv)?;
    let validation = load_validation(&args.validation_csv, &cleaner)?;
    let test = load_test(&args.test_csv, &cleaner)?;

    println!("  Train rows: {}", format_number(train.len()));
    println!("  Validation rows: {}", format_number(validation.eval.len()));
    println!("  Test rows: {}", format_number(test.len()));

    let pool = SyntheticPool::from_csv(&args.subtitles_csv)?;
    println!(
        "  Pool fragments: {} toxic / {} non-toxic",
        format_number(pool.toxic_len()),
        format_number(pool.non_toxic_len())
    );
    println!();
    let mixer = Arc::new(SyntheticMixer::new(pool));

    match &args.tokenizer {
        Some(path) => {
            let encoder = PretrainedEncoder::from_file(path)?;
            let buckets = encoder.vocab_size();
            run(args, Arc::new(encoder), buckets, train, validation, test, mixer)
        }
        None => {
            let encoder = HashingEncoder::new(args.buckets);
            run(args, Arc::new(encoder), args.buckets, train, validation, test, mixer)
        }
    }
}

fn run<E: TextEncoder>(
    args: &TrainArgs,
    encoder: Arc<E>,
    buckets: u32,
    train: crate::data::SampleSplit,
    validation: ValidationSplits,
    test: crate::data::SampleSplit,
    mixer: Arc<SyntheticMixer>,
) -> Result<()> {
    let start = std::time::Instant::now();
    let max_length = args.pipeline.max_length;
    let train_source = SampleSource::train(
        train,
        encoder.clone(),
        max_length,
        AugmentationPipeline::new(args.pipeline.augment_p),
        mixer.clone(),
    )
    .with_min_real_tokens(args.pipeline.min_real_tokens);
    let eval_source = SampleSource::eval(validation.eval, encoder.clone(), max_length);
    let test_source = SampleSource::test(test, encoder.clone(), max_length);

    let model = BowClassifier::new(buckets);
    let paths = RunPaths::new(&args.output)?;
    args.pipeline.save_json(&args.output.join("pipeline.json"))?;
    let mut fitter = Fitter::new(model, args.config.clone(), paths)?;

    let summary = fitter.fit(&train_source, &eval_source, &test_source)?;

    if args.tune {
        println!("  Tuning pass over validation split...");
        let tune_source = SampleSource::train(
            validation.tune,
            encoder,
            max_length,
            AugmentationPipeline::new(args.pipeline.augment_p),
            mixer,
        )
        .with_min_real_tokens(args.pipeline.min_real_tokens);
        fitter.tune(&tune_source, &test_source)?;
    }

    println!();
    println!("═══════════════════════════════════════════════════════════");
    println!("  ✅ Training complete");
    println!("  Best RocAuc: {:.5}", fitter.best_score());
    println!("  Epochs: {}", summary.epochs_run);
    println!("  Checkpoints: {}", summary.checkpoints_saved);
    println!("  Submissions: {}", summary.submissions_written);
    println!("  Time: {}", format_duration(start.elapsed().as_secs()));
    println!("═══════════════════════════════════════════════════════════");
    Ok(())
}
