// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `stats`, `train`, `classify`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::application::train_use_case::TrainConfig;
use crate::data::balance::BalanceStrategy;

/// The three top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the major-code frequency histogram for a lithology CSV
    Stats(StatsArgs),

    /// Train the lithology classifier on a CSV of log entries
    Train(TrainArgs),

    /// Classify one description using a trained checkpoint
    Classify(ClassifyArgs),
}

/// CLI face of the balance strategy. Kept separate from the
/// data-layer enum so clap types never leak below Layer 1.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum BalanceArg {
    /// Class-weighted loss (default)
    Weights,
    /// Resample each class to a fixed row count
    Resample,
    /// No imbalance correction
    None,
}

impl From<BalanceArg> for BalanceStrategy {
    fn from(a: BalanceArg) -> Self {
        match a {
            BalanceArg::Weights  => BalanceStrategy::Weights,
            BalanceArg::Resample => BalanceStrategy::Resample,
            BalanceArg::None     => BalanceStrategy::None,
        }
    }
}

/// All arguments for the `stats` command
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Path to the lithology log CSV
    #[arg(long, default_value = "data/NGIS_LithologyLog.csv")]
    pub csv_path: String,

    /// How many of the most frequent codes to show
    #[arg(long, default_value_t = 50)]
    pub top_n: usize,

    /// Also print sampled descriptions for this code
    #[arg(long)]
    pub sample_code: Option<String>,

    /// How many descriptions to sample
    #[arg(long, default_value_t = 50)]
    pub samples: usize,

    /// Seed for description sampling
    #[arg(long, default_value_t = 123)]
    pub seed: u64,
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Path to the lithology log CSV
    #[arg(long, default_value = "data/NGIS_LithologyLog.csv")]
    pub csv_path: String,

    /// Directory for tokenizer, labels, checkpoints and metrics
    #[arg(long, default_value = "artifacts")]
    pub artifacts_dir: String,

    /// Keep only this many of the most frequent major codes
    #[arg(long, default_value_t = 17)]
    pub top_n: usize,

    /// Sentinel label to drop even when it ranks inside the top N
    #[arg(long, default_value = "None")]
    pub drop_label: String,

    /// Class-imbalance strategy
    #[arg(long, value_enum, default_value = "weights")]
    pub balance: BalanceArg,

    /// Target rows per class when --balance resample
    #[arg(long, default_value_t = 10_000)]
    pub resample_to: usize,

    /// Maximum number of tokens per input sequence
    /// Format: [CLS] description [SEP] + padding
    #[arg(long, default_value_t = 128)]
    pub max_seq_len: usize,

    /// Number of samples processed together in one forward pass
    #[arg(long, default_value_t = 128)]
    pub batch_size: usize,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 5)]
    pub epochs: usize,

    /// Peak learning rate of the cosine schedule
    #[arg(long, default_value_t = 8e-5)]
    pub lr: f64,

    /// L2 weight decay applied by the optimiser
    #[arg(long, default_value_t = 0.01)]
    pub weight_decay: f64,

    /// Fraction of all optimiser steps spent ramping the lr up
    #[arg(long, default_value_t = 0.1)]
    pub warmup_ratio: f64,

    /// Fraction of samples held out for the test set
    #[arg(long, default_value_t = 0.25)]
    pub test_fraction: f64,

    /// Seed for the shuffle, split and resampling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Hidden dimension of the transformer (d_model in the paper)
    #[arg(long, default_value_t = 256)]
    pub d_model: usize,

    /// Number of attention heads in multi-head attention
    /// d_model must be divisible by num_heads
    #[arg(long, default_value_t = 8)]
    pub num_heads: usize,

    /// Number of stacked encoder layers
    #[arg(long, default_value_t = 6)]
    pub num_layers: usize,

    /// Inner dimension of the feed-forward network
    /// Typically 4x d_model
    #[arg(long, default_value_t = 1024)]
    pub d_ff: usize,

    /// Dropout probability — randomly zeroes activations during training
    /// to prevent overfitting
    #[arg(long, default_value_t = 0.1)]
    pub dropout: f64,

    /// Vocabulary cap for the word-level tokenizer
    #[arg(long, default_value_t = 8192)]
    pub vocab_size: usize,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            csv_path:      a.csv_path,
            artifacts_dir: a.artifacts_dir,
            top_n:         a.top_n,
            drop_label:    a.drop_label,
            balance:       a.balance.into(),
            resample_to:   a.resample_to,
            max_seq_len:   a.max_seq_len,
            batch_size:    a.batch_size,
            epochs:        a.epochs,
            lr:            a.lr,
            weight_decay:  a.weight_decay,
            warmup_ratio:  a.warmup_ratio,
            test_fraction: a.test_fraction,
            seed:          a.seed,
            d_model:       a.d_model,
            num_heads:     a.num_heads,
            num_layers:    a.num_layers,
            d_ff:          a.d_ff,
            dropout:       a.dropout,
            vocab_size:    a.vocab_size,
            num_labels:    0,
        }
    }
}

/// All arguments for the `classify` command
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// The lithology description to classify, e.g. "CLAY, VERY SANDY"
    #[arg(long)]
    pub description: String,

    /// Directory where artifacts were saved during training
    #[arg(long, default_value = "artifacts")]
    pub artifacts_dir: String,
}
