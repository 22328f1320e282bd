// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Three commands are supported:
//   1. `stats`    — frequency analysis of a lithology CSV
//   2. `train`    — trains the classifier end to end
//   3. `classify` — loads a checkpoint and classifies a description
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{ClassifyArgs, Commands, StatsArgs, TrainArgs};

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "litho-classify",
    version = "0.1.0",
    about = "Train a transformer classifier for borehole lithology descriptions."
)]
pub struct Cli {
    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This keeps the CLI layer thin — it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Stats(args)    => Self::run_stats(args),
            Commands::Train(args)    => Self::run_train(args),
            Commands::Classify(args) => Self::run_classify(args),
        }
    }

    /// Handles the `stats` subcommand.
    fn run_stats(args: StatsArgs) -> Result<()> {
        use crate::application::stats_use_case::StatsUseCase;

        let use_case = StatsUseCase::new(&args.csv_path);
        use_case.show_frequencies(args.top_n)?;

        if let Some(code) = &args.sample_code {
            println!();
            use_case.show_samples(code, args.samples, args.seed)?;
        }
        Ok(())
    }

    /// Handles the `train` subcommand.
    /// Converts CLI args into a TrainConfig and hands off to Layer 2.
    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting training on '{}'", args.csv_path);

        // Convert CLI args → application config (separates presentation from domain)
        let use_case = TrainUseCase::new(args.into());
        use_case.execute()?;

        println!("Training complete. Artifacts saved.");
        Ok(())
    }

    /// Handles the `classify` subcommand.
    /// Loads the model from the artifacts directory and prints the
    /// predicted lithology code.
    fn run_classify(args: ClassifyArgs) -> Result<()> {
        use crate::application::classify_use_case::ClassifyUseCase;

        let use_case   = ClassifyUseCase::new(&args.artifacts_dir)?;
        let prediction = use_case.classify(&args.description)?;

        println!(
            "\n{}  (confidence {:.1}%)",
            prediction.code,
            prediction.confidence * 100.0,
        );
        if let Some((code, p)) = prediction.runner_up {
            println!("runner-up: {}  ({:.1}%)", code, p * 100.0);
        }
        Ok(())
    }
}
