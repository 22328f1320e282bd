// ============================================================
// Layer 2 — StatsUseCase
// ============================================================
// Prints the major-code frequency picture of a lithology CSV:
// a ranked table with an ASCII histogram, and optionally a
// seeded sample of descriptions recorded under one code.
//
// This is the look-before-you-train step. The histogram shows
// the long tail that motivates top-N subsetting, and sampling
// a suspicious code (say, "UNKN") shows whether its
// descriptions carry real signal or are genuinely unknowable.
//
// Reference: Rust Book §12 (CLI output)

use anyhow::Result;

use crate::data::frequency::{count_codes, render_histogram, sample_descriptions};
use crate::data::loader::CsvLogSource;
use crate::domain::traits::RecordSource;

const BAR_WIDTH: usize = 50;

pub struct StatsUseCase {
    csv_path: String,
}

impl StatsUseCase {
    pub fn new(csv_path: impl Into<String>) -> Self {
        Self { csv_path: csv_path.into() }
    }

    /// Print the frequency table for the top `n` codes.
    pub fn show_frequencies(&self, n: usize) -> Result<()> {
        let entries = CsvLogSource::new(&self.csv_path).load_all()?;
        let ranked  = count_codes(&entries);

        println!(
            "{} rows, {} distinct major codes. Top {}:\n",
            entries.len(),
            ranked.len(),
            n.min(ranked.len()),
        );
        print!("{}", render_histogram(&ranked, n, BAR_WIDTH));
        Ok(())
    }

    /// Print `n` randomly sampled descriptions for one code.
    pub fn show_samples(&self, code: &str, n: usize, seed: u64) -> Result<()> {
        let entries = CsvLogSource::new(&self.csv_path).load_all()?;
        let sampled = sample_descriptions(&entries, code, n, seed);

        if sampled.is_empty() {
            println!("No rows recorded under code '{}'", code);
            return Ok(());
        }

        println!("{} sampled descriptions for '{}':\n", sampled.len(), code);
        for desc in sampled {
            println!("  {}", desc);
        }
        Ok(())
    }
}
