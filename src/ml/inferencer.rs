// ============================================================
// Layer 5 — Classifier (Inference)
// ============================================================
use anyhow::Result;
use burn::prelude::*;
use tokenizers::Tokenizer;

use crate::data::encoder::SampleEncoder;
use crate::data::preprocessor::Preprocessor;
use crate::domain::label_set::LabelSet;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{LithoClassifierConfig, LithoClassifierModel};

type InferBackend = burn::backend::Wgpu;

/// One classification result: the winning code plus the
/// runner-up, which is often the interesting part on ambiguous
/// descriptions ("sandy clay" vs "clayey sand").
#[derive(Debug, Clone)]
pub struct Prediction {
    pub code:       String,
    pub confidence: f32,
    pub runner_up:  Option<(String, f32)>,
}

pub struct Classifier {
    model:       LithoClassifierModel<InferBackend>,
    labels:      LabelSet,
    tokenizer:   Tokenizer,
    max_seq_len: usize,
    device:      burn::backend::wgpu::WgpuDevice,
}

impl Classifier {
    /// Rebuild the trained model from the artifacts directory.
    ///
    /// The architecture comes from the recorded config, with
    /// dropout forced to 0.0 — inference must be deterministic.
    /// A label-count mismatch between labels.json and the
    /// recorded config means the artifacts are from different
    /// runs, and is a hard error.
    pub fn from_artifacts(
        ckpt_manager: &CheckpointManager,
        labels:       LabelSet,
        tokenizer:    Tokenizer,
    ) -> Result<Self> {
        let device = burn::backend::wgpu::WgpuDevice::default();
        let cfg    = ckpt_manager.load_config()?;

        if labels.len() != cfg.num_labels {
            anyhow::bail!(
                "Label set has {} codes but the checkpoint was trained with {} — \
                 the artifacts directory mixes training runs. Re-train.",
                labels.len(),
                cfg.num_labels,
            );
        }

        let model_cfg = LithoClassifierConfig::new(
            cfg.vocab_size, cfg.max_seq_len, cfg.d_model,
            cfg.num_heads, cfg.num_layers, cfg.d_ff, 0.0,
            cfg.num_labels,
        );
        let model: LithoClassifierModel<InferBackend> = model_cfg.init(&device);
        let model = ckpt_manager.load_model(model, &device)?;
        tracing::info!("Model loaded from checkpoint");

        Ok(Self { model, labels, tokenizer, max_seq_len: cfg.max_seq_len, device })
    }

    /// Classify one raw description.
    pub fn predict(&self, description: &str) -> Result<Prediction> {
        // Same normalisation and encoding as the training pipeline —
        // anything else and the model sees a distribution it never trained on
        let cleaned = Preprocessor::new().clean(description);
        let encoder = SampleEncoder::new(&self.tokenizer, self.max_seq_len);
        let sample  = encoder.encode(&cleaned, 0)?;

        let input_flat: Vec<i32> = sample.input_ids.iter().map(|&x| x as i32).collect();
        let mask_flat:  Vec<i32> = sample.attention_mask.iter().map(|&x| x as i32).collect();

        let input_ids = Tensor::<InferBackend, 1, Int>::from_ints(
            input_flat.as_slice(), &self.device,
        ).unsqueeze::<2>();
        let attention_mask = Tensor::<InferBackend, 1, Int>::from_ints(
            mask_flat.as_slice(), &self.device,
        ).unsqueeze::<2>();

        let logits = self.model.forward(input_ids, attention_mask); // [1, num_labels]

        let probs: Vec<f32> = burn::tensor::activation::softmax(logits, 1)
            .squeeze::<1>()
            .into_data()
            .to_vec::<f32>()
            .unwrap_or_default();

        // Best and second-best class by probability
        let mut indexed: Vec<(usize, f32)> = probs.iter().copied().enumerate().collect();
        indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let (best_idx, best_p) = *indexed
            .first()
            .ok_or_else(|| anyhow::anyhow!("Model produced no class probabilities"))?;
        let code = self.labels
            .index_to_code(best_idx)
            .ok_or_else(|| anyhow::anyhow!("Predicted class {} has no code", best_idx))?
            .to_string();

        let runner_up = indexed.get(1).and_then(|&(idx, p)| {
            self.labels.index_to_code(idx).map(|c| (c.to_string(), p))
        });

        tracing::debug!("'{}' → {} (p={:.4})", cleaned, code, best_p);

        Ok(Prediction { code, confidence: best_p, runner_up })
    }
}
