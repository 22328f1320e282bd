// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load the lithology CSV       (Layer 4 - data)
//   Step 2: Rank codes by frequency      (Layer 4 - data)
//   Step 3: Build the label set          (Layer 3 - domain)
//   Step 4: Apply the balance strategy   (Layer 4 - data)
//   Step 5: Clean descriptions           (Layer 4 - data)
//   Step 6: Build / load tokenizer       (Layer 6 - infra)
//   Step 7: Encode training samples      (Layer 4 - data)
//   Step 8: Split train/test             (Layer 4 - data)
//   Step 9: Save config + labels         (Layer 6 - infra)
//   Step 10: Run training loop           (Layer 5 - ml)
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::{
    balance::{class_weights, resample_per_class, BalanceStrategy},
    dataset::{LithoDataset, LithoSample},
    encoder::SampleEncoder,
    frequency::count_codes,
    loader::CsvLogSource,
    preprocessor::Preprocessor,
    splitter::split_train_test,
};
use crate::domain::label_set::LabelSet;
use crate::domain::log_entry::LithoLogEntry;
use crate::domain::traits::{Persistable, RecordSource};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::MetricsLogger,
    tokenizer_store::TokenizerStore,
};
use crate::ml::trainer::run_training;

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Serialisable so it can be saved to disk and reloaded for
// classification. num_labels is NOT user-facing — it is derived
// from the data once the label set is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub csv_path:      String,
    pub artifacts_dir: String,
    pub top_n:         usize,
    pub drop_label:    String,
    pub balance:       BalanceStrategy,
    pub resample_to:   usize,
    pub max_seq_len:   usize,
    pub batch_size:    usize,
    pub epochs:        usize,
    pub lr:            f64,
    pub weight_decay:  f64,
    pub warmup_ratio:  f64,
    pub test_fraction: f64,
    pub seed:          u64,
    pub d_model:       usize,
    pub num_heads:     usize,
    pub num_layers:    usize,
    pub d_ff:          usize,
    pub dropout:       f64,
    pub vocab_size:    usize,
    /// Derived from the label set during training, recorded so
    /// classification can rebuild the exact architecture
    #[serde(default)]
    pub num_labels:    usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            csv_path:      "data/NGIS_LithologyLog.csv".to_string(),
            artifacts_dir: "artifacts".to_string(),
            top_n:         17,
            drop_label:    "None".to_string(),
            balance:       BalanceStrategy::Weights,
            resample_to:   10_000,
            max_seq_len:   128,
            batch_size:    128,
            epochs:        5,
            lr:            8e-5,
            weight_decay:  0.01,
            warmup_ratio:  0.1,
            test_fraction: 0.25,
            seed:          42,
            d_model:       256,
            num_heads:     8,
            num_layers:    6,
            d_ff:          1024,
            dropout:       0.1,
            vocab_size:    8192,
            num_labels:    0,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
// Owns the config and runs the full training pipeline.
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    /// Create a new TrainUseCase with the given configuration
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Load the lithology log ────────────────────────────────────
        tracing::info!("Loading lithology log from '{}'", cfg.csv_path);
        let source  = CsvLogSource::new(&cfg.csv_path);
        let entries = source.load_all()?;

        // ── Step 2: Rank major codes by frequency ─────────────────────────────
        let ranked = count_codes(&entries);
        tracing::info!("Found {} distinct major codes", ranked.len());

        // ── Step 3: Build the label set ───────────────────────────────────────
        // Top-N codes in frequency-rank order, minus the sentinel.
        // The sentinel is an absence-of-data marker, not a rock type.
        let labels = build_label_set(&ranked, cfg.top_n, &cfg.drop_label)?;
        tracing::info!("Retained {} classes: {:?}", labels.len(), labels.codes());

        // Rows outside the retained codes are dropped from training
        let kept: Vec<LithoLogEntry> = entries
            .into_iter()
            .filter(|e| labels.code_to_index(&e.major_code).is_some())
            .collect();
        tracing::info!("{} rows carry a retained code", kept.len());

        // ── Step 4: Apply the balance strategy ────────────────────────────────
        // Weights and Resample are mutually exclusive remedies for
        // the same skew — weighting the loss AND equalising the rows
        // would correct for the imbalance twice.
        let (kept, weights) = match cfg.balance {
            BalanceStrategy::Weights => {
                let w = class_weights(&kept, &labels);
                tracing::info!("Class weights: {:?}", w);
                (kept, Some(w))
            }
            BalanceStrategy::Resample => {
                let resampled = resample_per_class(&kept, &labels, cfg.resample_to, cfg.seed);
                tracing::info!("Resampled to {} rows", resampled.len());
                (resampled, None)
            }
            BalanceStrategy::None => (kept, None),
        };

        // ── Step 5: Clean descriptions ────────────────────────────────────────
        // Lowercase + whitespace normalisation, paired with each
        // row's class index
        let preprocessor = Preprocessor::new();
        let cleaned: Vec<(String, usize)> = kept
            .iter()
            .filter_map(|e| {
                labels
                    .code_to_index(&e.major_code)
                    .map(|idx| (preprocessor.clean(&e.description), idx))
            })
            .collect();

        // ── Step 6: Build / load tokenizer ────────────────────────────────────
        // Cached in the artifacts directory — later runs reload it
        // instead of re-scanning the corpus
        let corpus: Vec<String> = cleaned.iter().map(|(d, _)| d.clone()).collect();
        let tok_store = TokenizerStore::new(&cfg.artifacts_dir);
        let tokenizer = tok_store.load_or_build(&corpus, cfg.vocab_size)?;

        // ── Step 7: Encode training samples ───────────────────────────────────
        let encoder = SampleEncoder::new(&tokenizer, cfg.max_seq_len);
        let samples: Vec<LithoSample> = cleaned
            .iter()
            .map(|(desc, idx)| encoder.encode(desc, *idx))
            .collect::<Result<_>>()?;
        tracing::info!("Encoded {} training samples", samples.len());

        // ── Step 8: Train/test split ──────────────────────────────────────────
        let (train_samples, test_samples) =
            split_train_test(samples, cfg.test_fraction, cfg.seed);
        tracing::info!(
            "Split: {} train, {} test",
            train_samples.len(),
            test_samples.len()
        );

        let train_dataset = LithoDataset::new(train_samples);
        let test_dataset  = LithoDataset::new(test_samples);

        // ── Step 9: Save config and labels for classification ─────────────────
        // The classifier needs both to rebuild the model and to turn
        // predicted indices back into codes
        let mut recorded = cfg.clone();
        recorded.num_labels = labels.len();

        let ckpt_manager = CheckpointManager::new(&cfg.artifacts_dir);
        ckpt_manager.save_config(&recorded)?;
        labels.save(&ckpt_manager.labels_path())?;

        let metrics = MetricsLogger::new(&cfg.artifacts_dir)?;

        // ── Step 10: Run training loop (Layer 5) ──────────────────────────────
        run_training(&recorded, train_dataset, test_dataset, weights, ckpt_manager, metrics)?;

        Ok(())
    }
}

/// Top-N codes minus the sentinel, in frequency-rank order.
fn build_label_set(
    ranked:     &[crate::data::frequency::CodeCount],
    top_n:      usize,
    drop_label: &str,
) -> Result<LabelSet> {
    let codes: Vec<String> = ranked
        .iter()
        .take(top_n)
        .map(|cc| cc.code.clone())
        .filter(|code| code != drop_label)
        .collect();

    if codes.is_empty() {
        anyhow::bail!("No labels left after subsetting — is the CSV empty?");
    }
    LabelSet::new(codes)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::frequency::CodeCount;

    fn ranked(counts: &[(&str, usize)]) -> Vec<CodeCount> {
        counts
            .iter()
            .map(|(c, n)| CodeCount { code: c.to_string(), count: *n })
            .collect()
    }

    #[test]
    fn test_label_set_keeps_top_n_in_rank_order() {
        let r = ranked(&[("CLAY", 50), ("SAND", 30), ("SHLE", 10), ("COAL", 1)]);
        let labels = build_label_set(&r, 3, "None").unwrap();
        assert_eq!(labels.codes(), &["CLAY", "SAND", "SHLE"]);
        assert_eq!(labels.code_to_index("COAL"), None);
    }

    #[test]
    fn test_sentinel_dropped_inside_top_n() {
        // "None" ranks second but is an absence marker, not a class
        let r = ranked(&[("CLAY", 50), ("None", 40), ("SAND", 30)]);
        let labels = build_label_set(&r, 3, "None").unwrap();
        assert_eq!(labels.codes(), &["CLAY", "SAND"]);
        // Indices close up over the gap
        assert_eq!(labels.code_to_index("SAND"), Some(1));
    }

    #[test]
    fn test_empty_ranking_is_an_error() {
        assert!(build_label_set(&[], 17, "None").is_err());
    }

    #[test]
    fn test_default_config_values() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.top_n, 17);
        assert_eq!(cfg.max_seq_len, 128);
        assert_eq!(cfg.test_fraction, 0.25);
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.balance, BalanceStrategy::Weights);
    }
}
