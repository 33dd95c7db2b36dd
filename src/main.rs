use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use toxpipe::commands::{clean, infer, train};
use toxpipe::config::PipelineConfig;
use toxpipe::model::FitConfig;

#[derive(Parser)]
#[command(name = "toxpipe")]
#[command(version = "0.1.0")]
#[command(about = "Multilingual toxic-comment classification pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the classifier and emit submissions on every improvement
    Train {
        #[arg(long)]
        train_csv: PathBuf,
        #[arg(long)]
        validation_csv: PathBuf,
        #[arg(long)]
        test_csv: PathBuf,
        /// Auxiliary corpus feeding the synthetic mixer
        #[arg(long)]
        subtitles_csv: PathBuf,
        /// Pretrained tokenizer.json; hashing encoder when omitted
        #[arg(long)]
        tokenizer: Option<PathBuf>,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value = "3")]
        epochs: usize,
        #[arg(long, default_value = "7")]
        batch_size: usize,
        #[arg(long, default_value = "2e-5")]
        learning_rate: f64,
        #[arg(long, default_value = "42")]
        seed: u64,
        /// Fixed encoded sequence length
        #[arg(long, default_value = "224")]
        max_length: usize,
        /// Id space of the hashing encoder (ignored with --tokenizer)
        #[arg(long, default_value = "262144")]
        buckets: u32,
        /// Extra pass over the validation split before the final inference
        #[arg(long)]
        tune: bool,
    },

    /// Score a test CSV with an existing checkpoint
    Infer {
        #[arg(long)]
        test_csv: PathBuf,
        #[arg(short, long)]
        checkpoint: PathBuf,
        #[arg(long)]
        tokenizer: Option<PathBuf>,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value = "262144")]
        buckets: u32,
        #[arg(long, default_value = "7")]
        batch_size: usize,
        /// Fixed encoded sequence length; must match the training run
        #[arg(long, default_value = "224")]
        max_length: usize,
    },

    /// Clean one text column of a CSV in place
    Clean {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value = "comment_text")]
        text_column: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Train {
            train_csv,
            validation_csv,
            test_csv,
            subtitles_csv,
            tokenizer,
            output,
            epochs,
            batch_size,
            learning_rate,
            seed,
            max_length,
            buckets,
            tune,
        } => train::execute(&train::TrainArgs {
            train_csv,
            validation_csv,
            test_csv,
            subtitles_csv,
            tokenizer,
            output,
            buckets,
            tune,
            pipeline: PipelineConfig {
                max_length,
                seed,
                ..PipelineConfig::default()
            },
            config: FitConfig {
                n_epochs: epochs,
                batch_size,
                lr: learning_rate,
                seed,
                ..FitConfig::default()
            },
        }),
        Commands::Infer {
            test_csv,
            checkpoint,
            tokenizer,
            output,
            buckets,
            batch_size,
            max_length,
        } => infer::execute(&infer::InferArgs {
            test_csv,
            checkpoint,
            tokenizer,
            output,
            buckets,
            batch_size,
            max_length,
        }),
        Commands::Clean {
            input,
            output,
            text_column,
        } => clean::execute(&input, &output, &text_column),
    };

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        process::exit(1);
    }
}
