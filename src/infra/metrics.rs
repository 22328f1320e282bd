// ============================================================
// Layer 6 — Metrics
// ============================================================
// Two jobs live here:
//
//   1. ConfusionTally — accumulates (true class, predicted
//      class) pairs during validation and derives accuracy,
//      per-class precision/recall/F1, and the weighted F1.
//
//      Why weighted F1 and not plain accuracy?
//        With a skewed label distribution a model that answers
//        "clay" for everything scores a flattering accuracy.
//        Weighted F1 averages each class's F1 weighted by its
//        support, so collapsing onto the majority class shows
//        up immediately.
//
//   2. MetricsLogger — appends one CSV row per epoch so runs
//      can be compared and learning curves plotted later.
//
// Example CSV output:
//   epoch,train_loss,val_loss,accuracy,weighted_f1
//   1,2.124500,2.089200,0.523000,0.418000
//   2,1.890100,1.854300,0.584000,0.502000
//
// How to read the metrics:
//   - Loss should decrease each epoch (model is learning)
//   - If val_loss increases while train_loss decreases → overfitting
//   - accuracy far above weighted_f1 → majority-class collapse
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

// ─── ConfusionTally ───────────────────────────────────────────────────────────
/// Running confusion counts over `num_labels` classes.
/// `counts[t][p]` is how often true class t was predicted as p.
#[derive(Debug, Clone)]
pub struct ConfusionTally {
    counts: Vec<Vec<usize>>,
    total:  usize,
}

impl ConfusionTally {
    pub fn new(num_labels: usize) -> Self {
        Self { counts: vec![vec![0; num_labels]; num_labels], total: 0 }
    }

    /// Record one observation. Out-of-range indices are ignored
    /// with a warning — a corrupt prediction must not poison the
    /// whole epoch's numbers.
    pub fn record(&mut self, true_class: usize, predicted: usize) {
        let k = self.counts.len();
        if true_class >= k || predicted >= k {
            tracing::warn!("Ignoring out-of-range tally ({true_class}, {predicted})");
            return;
        }
        self.counts[true_class][predicted] += 1;
        self.total += 1;
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Fraction of observations on the diagonal
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let correct: usize = (0..self.counts.len()).map(|c| self.counts[c][c]).sum();
        correct as f64 / self.total as f64
    }

    /// F1 score for one class: harmonic mean of precision and recall.
    /// A class that was never seen and never predicted scores 0.
    pub fn class_f1(&self, class: usize) -> f64 {
        let k  = self.counts.len();
        let tp = self.counts[class][class];
        let fp: usize = (0..k).filter(|&t| t != class).map(|t| self.counts[t][class]).sum();
        let fn_: usize = (0..k).filter(|&p| p != class).map(|p| self.counts[class][p]).sum();

        if tp == 0 {
            return 0.0;
        }
        let precision = tp as f64 / (tp + fp) as f64;
        let recall    = tp as f64 / (tp + fn_) as f64;
        2.0 * precision * recall / (precision + recall)
    }

    /// Support-weighted mean of per-class F1 scores
    pub fn weighted_f1(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (0..self.counts.len())
            .map(|c| {
                let support: usize = self.counts[c].iter().sum();
                self.class_f1(c) * support as f64
            })
            .sum::<f64>()
            / self.total as f64
    }
}

// ─── EpochMetrics ─────────────────────────────────────────────────────────────
/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Average cross-entropy loss over all training batches
    pub train_loss: f64,

    /// Average cross-entropy loss on the test split
    /// Should track train_loss — divergence indicates overfitting
    pub val_loss: f64,

    /// Fraction of test descriptions classified correctly
    pub accuracy: f64,

    /// Support-weighted F1 over all classes — the headline number
    /// for an imbalanced label set
    pub weighted_f1: f64,
}

impl EpochMetrics {
    pub fn new(
        epoch:       usize,
        train_loss:  f64,
        val_loss:    f64,
        accuracy:    f64,
        weighted_f1: f64,
    ) -> Self {
        Self { epoch, train_loss, val_loss, accuracy, weighted_f1 }
    }

    /// Returns true if this epoch improved over the previous best val_loss
    pub fn is_improvement(&self, best_val_loss: f64) -> bool {
        self.val_loss < best_val_loss
    }
}

// ─── MetricsLogger ────────────────────────────────────────────────────────────
/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let csv_path = dir.join("metrics.csv");

        // Write the header only if the file is new — this allows
        // appending to an existing log across runs
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,train_loss,val_loss,accuracy,weighted_f1")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6},{:.6}",
            m.epoch,
            m.train_loss,
            m.val_loss,
            m.accuracy,
            m.weighted_f1,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_loss={:.4}",
            m.epoch,
            m.train_loss,
            m.val_loss,
        );

        Ok(())
    }

    /// Return the path to the metrics CSV file
    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_is_diagonal_share() {
        let mut t = ConfusionTally::new(2);
        t.record(0, 0);
        t.record(0, 0);
        t.record(0, 1);
        t.record(1, 1);
        assert!((t.accuracy() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_perfect_predictions_score_one() {
        let mut t = ConfusionTally::new(3);
        for c in 0..3 {
            t.record(c, c);
            t.record(c, c);
        }
        assert!((t.accuracy() - 1.0).abs() < 1e-9);
        assert!((t.weighted_f1() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_class_f1_known_values() {
        // Class 0: tp=2, fp=1, fn=1 → precision 2/3, recall 2/3, f1 = 2/3
        let mut t = ConfusionTally::new(2);
        t.record(0, 0);
        t.record(0, 0);
        t.record(0, 1); // fn for class 0
        t.record(1, 0); // fp for class 0
        assert!((t.class_f1(0) - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_majority_collapse_drops_weighted_f1() {
        // Model predicts class 0 for everything; class 0 has 8 of 10 rows
        let mut t = ConfusionTally::new(2);
        for _ in 0..8 { t.record(0, 0); }
        for _ in 0..2 { t.record(1, 0); }
        // Accuracy looks fine, weighted F1 tells the truth
        assert!((t.accuracy() - 0.8).abs() < 1e-9);
        assert!(t.weighted_f1() < t.accuracy());
        assert!((t.class_f1(1) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_tally_is_zero() {
        let t = ConfusionTally::new(4);
        assert_eq!(t.total(), 0);
        assert_eq!(t.accuracy(), 0.0);
        assert_eq!(t.weighted_f1(), 0.0);
    }

    #[test]
    fn test_out_of_range_ignored() {
        let mut t = ConfusionTally::new(2);
        t.record(0, 5);
        t.record(7, 0);
        assert_eq!(t.total(), 0);
    }

    #[test]
    fn test_is_improvement() {
        let m = EpochMetrics::new(2, 2.5, 2.3, 0.4, 0.35);
        assert!(m.is_improvement(3.0));
        assert!(!m.is_improvement(2.0));
    }
}
