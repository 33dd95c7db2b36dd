//! End-to-end training pipeline tests.
//!
//! Fits the reference classifier on a tiny separable corpus and checks the
//! checkpoint/submission side effects.

mod common;

use std::sync::Arc;

use tempfile::tempdir;
use toxpipe::data::{
    load_test, load_train, load_validation, AugmentationPipeline, SampleSource, SyntheticMixer,
    SyntheticPool, TextCleaner,
};
use toxpipe::commands::infer;
use toxpipe::encoder::HashingEncoder;
use toxpipe::model::{BowClassifier, FitConfig, Fitter, SequenceClassifier};
use toxpipe::utils::RunPaths;
use toxpipe::ToxPipeError;

const BUCKETS: u32 = 1 << 12;
const MAX_LEN: usize = 128;

fn fit_config() -> FitConfig {
    FitConfig {
        n_epochs: 3,
        batch_size: 4,
        // High LR so the bag-of-tokens model separates the toy corpus fast.
        lr: 0.5,
        verbose: false,
        seed: 7,
        ..FitConfig::default()
    }
}

struct Fixture {
    train: toxpipe::data::SampleSplit,
    validation: toxpipe::data::ValidationSplits,
    test: toxpipe::data::SampleSplit,
    mixer: Arc<SyntheticMixer>,
    encoder: Arc<HashingEncoder>,
}

fn fixture(dir: &std::path::Path) -> Fixture {
    let cleaner = TextCleaner::new();
    let train = load_train(&common::train_csv(dir, 40)).expect("train split");
    let validation =
        load_validation(&common::validation_csv(dir, 20), &cleaner).expect("validation split");
    let test = load_test(&common::test_csv(dir, 10), &cleaner).expect("test split");
    let pool = SyntheticPool::from_csv(&common::subtitles_csv(dir, 20)).expect("pool");
    Fixture {
        train,
        validation,
        test,
        mixer: Arc::new(SyntheticMixer::new(pool)),
        encoder: Arc::new(HashingEncoder::new(BUCKETS)),
    }
}

#[test]
fn test_fit_trains_saves_and_submits() {
    let data_dir = tempdir().expect("data dir");
    let out_dir = tempdir().expect("out dir");
    let fx = fixture(data_dir.path());

    let train_source = SampleSource::train(
        fx.train,
        fx.encoder.clone(),
        MAX_LEN,
        AugmentationPipeline::new(0.95),
        fx.mixer.clone(),
    );
    let eval_source = SampleSource::eval(fx.validation.eval, fx.encoder.clone(), MAX_LEN);
    let test_source = SampleSource::test(fx.test, fx.encoder.clone(), MAX_LEN);

    let paths = RunPaths::new(out_dir.path()).expect("run paths");
    let mut fitter =
        Fitter::new(BowClassifier::new(BUCKETS), fit_config(), paths).expect("fitter");

    let summary = fitter
        .fit(&train_source, &eval_source, &test_source)
        .expect("fit");

    assert_eq!(summary.epochs_run, 3);
    // The first validation score always beats the initial 0.0.
    assert!(summary.checkpoints_saved >= 1);
    assert_eq!(summary.submissions_written, summary.checkpoints_saved);
    assert!(
        summary.best_score > 0.6,
        "separable corpus should score well, got {}",
        summary.best_score
    );

    let checkpoints: Vec<_> = std::fs::read_dir(out_dir.path().join("checkpoints"))
        .expect("checkpoints dir")
        .map(|e| e.expect("entry").path())
        .collect();
    assert_eq!(checkpoints.len(), summary.checkpoints_saved);
    for path in &checkpoints {
        let name = path.file_name().expect("name").to_string_lossy().into_owned();
        assert!(name.starts_with("best_model_"), "unexpected name: {name}");
        assert!(name.ends_with(".ckpt"), "unexpected name: {name}");
    }

    let submissions: Vec<_> = std::fs::read_dir(out_dir.path().join("submissions"))
        .expect("submissions dir")
        .map(|e| e.expect("entry").path())
        .collect();
    assert_eq!(submissions.len(), summary.submissions_written);

    let content = std::fs::read_to_string(&submissions[0]).expect("submission file");
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("id,toxic"));
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 10);
    for row in rows {
        let (id, prob) = row.split_once(',').expect("two columns");
        assert!(id.parse::<i64>().is_ok());
        let prob: f64 = prob.parse().expect("probability");
        assert!((0.0..=1.0).contains(&prob), "out of range: {prob}");
    }

    // The tuning pass reuses the saved checkpoint and adds a submission.
    let tune_source = SampleSource::train(
        fx.validation.tune,
        fx.encoder.clone(),
        MAX_LEN,
        AugmentationPipeline::new(0.95),
        fx.mixer,
    );
    fitter.tune(&tune_source, &test_source).expect("tune");
    let after_tune = std::fs::read_dir(out_dir.path().join("submissions"))
        .expect("submissions dir")
        .count();
    assert_eq!(after_tune, summary.submissions_written + 1);
}

#[test]
fn test_checkpoint_policy_saves_only_on_improvement() {
    let out_dir = tempdir().expect("out dir");
    let paths = RunPaths::new(out_dir.path()).expect("run paths");
    let mut fitter =
        Fitter::new(BowClassifier::new(BUCKETS), fit_config(), paths).expect("fitter");

    assert!(fitter.record_validation_score(0.80));
    assert!(fitter.record_validation_score(0.85));
    assert!(!fitter.record_validation_score(0.75));
    // Matching the best is not an improvement.
    assert!(!fitter.record_validation_score(0.85));
    assert!(fitter.record_validation_score(0.86));
    assert_eq!(fitter.best_score(), 0.86);
}

#[test]
fn test_inference_without_checkpoint_is_fatal() {
    let data_dir = tempdir().expect("data dir");
    let out_dir = tempdir().expect("out dir");

    let cleaner = TextCleaner::new();
    let test = load_test(&common::test_csv(data_dir.path(), 4), &cleaner).expect("test split");
    let test_source = SampleSource::test(test, Arc::new(HashingEncoder::new(BUCKETS)), MAX_LEN);

    let paths = RunPaths::new(out_dir.path()).expect("run paths");
    let mut fitter =
        Fitter::new(BowClassifier::new(BUCKETS), fit_config(), paths).expect("fitter");

    let err = fitter.run_inference(&test_source).unwrap_err();
    assert!(matches!(err, ToxPipeError::CheckpointMissing));
}

#[test]
fn test_infer_command_honors_sequence_length_flag() {
    let data_dir = tempdir().expect("data dir");
    let out_dir = tempdir().expect("out dir");

    let checkpoint = out_dir.path().join("model.ckpt");
    BowClassifier::new(BUCKETS)
        .save(&checkpoint)
        .expect("checkpoint");

    infer::execute(&infer::InferArgs {
        test_csv: common::test_csv(data_dir.path(), 6),
        checkpoint,
        tokenizer: None,
        output: out_dir.path().to_path_buf(),
        buckets: BUCKETS,
        batch_size: 4,
        // Deliberately shorter than the default to prove the flag is wired
        // through to the encoding stage.
        max_length: 32,
    })
    .expect("infer");

    let submissions: Vec<_> = std::fs::read_dir(out_dir.path().join("submissions"))
        .expect("submissions dir")
        .map(|e| e.expect("entry").path())
        .collect();
    assert_eq!(submissions.len(), 1);

    let content = std::fs::read_to_string(&submissions[0]).expect("submission file");
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("id,toxic"));
    assert_eq!(lines.count(), 6);
}
