// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's CompactRecorder.
//
// What gets saved per checkpoint:
//   1. Model weights (.mpk.gz file) — all learned parameters
//   2. latest_epoch.json            — which epoch was last saved
//   3. train_config.json            — model architecture config
//
// Why save the config separately?
//   When loading for classification, we need the exact model
//   architecture (d_model, num_layers, label count, etc.) to
//   rebuild the model before loading the weights into it.
//   It also carries the label COUNT, which the classifier
//   cross-checks against labels.json — weights from one
//   training run silently paired with another run's label set
//   is the failure mode this store exists to prevent.
//
// Burn's CompactRecorder:
//   - Serialises model parameters to MessagePack format
//   - Compresses with gzip for smaller file size
//   - Type-safe: loading fails if architecture doesn't match
//
// File naming convention:
//   artifacts/
//     model_epoch_1.mpk.gz   ← weights after epoch 1
//     model_epoch_2.mpk.gz   ← weights after epoch 2
//     ...
//     latest_epoch.json      ← contains the number of latest epoch
//     train_config.json      ← model hyperparameters
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::LithoClassifierModel;

/// Manages saving and loading of model checkpoints.
/// All files are stored in the configured artifacts directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager.
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        // create_dir_all creates parent directories too, like `mkdir -p`
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    /// Save model weights for a given epoch and advance the
    /// latest-epoch pointer.
    pub fn save_model<B: AutodiffBackend>(
        &self,
        model: &LithoClassifierModel<B>,
        epoch: usize,
    ) -> Result<()> {
        // Build the file path (without extension — recorder adds it)
        let path = self.dir.join(format!("model_epoch_{epoch}"));

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| {
                format!("Failed to save checkpoint to '{}'", path.display())
            })?;

        // The pointer tells the classifier which file to load
        let latest_path = self.dir.join("latest_epoch.json");
        fs::write(&latest_path, serde_json::to_string(&epoch)?)
            .with_context(|| "Failed to write latest_epoch.json")?;

        tracing::debug!("Saved checkpoint: epoch {}", epoch);
        Ok(())
    }

    /// Load model weights from the latest saved checkpoint.
    ///
    /// The model parameter must have the correct architecture
    /// (matching the saved checkpoint) or loading will fail.
    pub fn load_model<B: Backend>(
        &self,
        model:  LithoClassifierModel<B>,
        device: &B::Device,
    ) -> Result<LithoClassifierModel<B>> {
        let epoch = self.latest_epoch()?;
        let path  = self.dir.join(format!("model_epoch_{epoch}"));

        tracing::info!("Loading checkpoint from epoch {}", epoch);

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("Cannot load checkpoint '{}'. Have you trained the model first?",
                    path.display())
            })?;

        // load_record() returns a new model with the loaded weights
        Ok(model.load_record(record))
    }

    /// Save the training configuration to JSON.
    ///
    /// Must be called before training starts so the classifier
    /// can reconstruct the exact model architecture.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join("train_config.json");
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| {
                format!("Cannot write config to '{}'", path.display())
            })?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// Load the training configuration from JSON.
    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join("train_config.json");

        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read config from '{}'. \
                     Make sure you have run 'train' before 'classify'.",
                    path.display()
                )
            })?;

        Ok(serde_json::from_str(&json)?)
    }

    /// Path to the persisted label set, kept next to the weights
    /// so the two travel together.
    pub fn labels_path(&self) -> PathBuf {
        self.dir.join("labels.json")
    }

    /// Read latest_epoch.json and return the epoch number.
    /// Returns an error if training hasn't been run yet.
    fn latest_epoch(&self) -> Result<usize> {
        let path = self.dir.join("latest_epoch.json");

        let s = fs::read_to_string(&path)
            .with_context(|| {
                "Cannot find 'latest_epoch.json'. \
                 Have you run 'train' first?"
            })?;

        Ok(serde_json::from_str::<usize>(&s)?)
    }
}
