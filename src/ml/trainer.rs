// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full train + validation loop using Burn's DataLoader and Adam.
//
// Key Burn 0.20 insight:
//   - Training uses MyBackend (Autodiff<Wgpu>) for gradients
//   - model.valid() returns model on MyInnerBackend (Wgpu)
//   - Validation batcher must also use MyInnerBackend
//   - argmax(1) returns [batch,1] so we flatten before reading
//
// The learning rate follows a cosine decay with linear warmup:
// ramp up over the first warmup_ratio of all optimiser steps,
// then decay to zero along a half cosine. Computed per step
// and handed straight to optim.step(), which takes the current
// lr as its first argument — no scheduler object needed.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam,
//            Loshchilov & Hutter (2017) SGDR (cosine schedule)

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{decay::WeightDecayConfig, AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::LithoBatcher, dataset::LithoDataset};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{ConfusionTally, EpochMetrics, MetricsLogger};
use crate::ml::model::{LithoClassifierConfig, LithoClassifierModel};

type MyBackend      = burn::backend::Autodiff<burn::backend::Wgpu>;
type MyInnerBackend = burn::backend::Wgpu;

/// Cosine learning-rate schedule with linear warmup.
/// `step` is 0-based; returns the lr for that optimiser step.
fn scheduled_lr(step: usize, total_steps: usize, warmup_steps: usize, peak_lr: f64) -> f64 {
    if total_steps == 0 {
        return peak_lr;
    }
    if step < warmup_steps {
        // Linear ramp from peak/warmup up to peak
        return peak_lr * (step + 1) as f64 / warmup_steps as f64;
    }
    let decay_steps = (total_steps - warmup_steps).max(1);
    let progress    = (step - warmup_steps) as f64 / decay_steps as f64;
    0.5 * peak_lr * (1.0 + (std::f64::consts::PI * progress.min(1.0)).cos())
}

pub fn run_training(
    cfg:           &TrainConfig,
    train_dataset: LithoDataset,
    val_dataset:   LithoDataset,
    class_weights: Option<Vec<f32>>,
    ckpt_manager:  CheckpointManager,
    metrics:       MetricsLogger,
) -> Result<()> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);
    train_loop(cfg, train_dataset, val_dataset, class_weights, ckpt_manager, metrics, device)
}

fn train_loop(
    cfg:           &TrainConfig,
    train_dataset: LithoDataset,
    val_dataset:   LithoDataset,
    class_weights: Option<Vec<f32>>,
    ckpt_manager:  CheckpointManager,
    metrics:       MetricsLogger,
    device:        burn::backend::wgpu::WgpuDevice,
) -> Result<()> {

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = LithoClassifierConfig::new(
        cfg.vocab_size, cfg.max_seq_len, cfg.d_model,
        cfg.num_heads, cfg.num_layers, cfg.d_ff, cfg.dropout,
        cfg.num_labels,
    );
    let mut model: LithoClassifierModel<MyBackend> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: {} layers, d_model={}, {} classes",
        cfg.num_layers, cfg.d_model, cfg.num_labels,
    );
    if let Some(w) = &class_weights {
        tracing::info!("Training with class-weighted loss ({} weights)", w.len());
    }

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let optim_cfg = AdamConfig::new()
        .with_epsilon(1e-8)
        .with_weight_decay(Some(WeightDecayConfig::new(cfg.weight_decay as f32)));
    let mut optim = optim_cfg.init();

    // ── Learning-rate schedule bookkeeping ────────────────────────────────────
    let steps_per_epoch = train_dataset.sample_count().div_ceil(cfg.batch_size);
    let total_steps     = steps_per_epoch * cfg.epochs;
    let warmup_steps    = ((total_steps as f64) * cfg.warmup_ratio).round() as usize;
    let mut global_step = 0usize;

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_batcher = LithoBatcher::<MyBackend>::new(device.clone());
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    // ── Validation data loader (InnerBackend — no autodiff overhead) ──────────
    let val_batcher = LithoBatcher::<MyInnerBackend>::new(device.clone());
    let val_loader  = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(val_dataset);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_batches  = 0usize;

        for batch in train_loader.iter() {
            let lr = scheduled_lr(global_step, total_steps, warmup_steps, cfg.lr);
            global_step += 1;

            let (loss, _) = model.forward_loss(
                batch.input_ids,
                batch.attention_mask,
                batch.labels,
                class_weights.as_deref(),
            );

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            train_loss_sum += loss_val;
            train_batches  += 1;

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(lr, model, grads);
        }

        let avg_train_loss = if train_batches > 0 {
            train_loss_sum / train_batches as f64
        } else { f64::NAN };

        // ── Validation phase ──────────────────────────────────────────────────
        // model.valid() → LithoClassifierModel<MyInnerBackend>
        // dropout disabled for deterministic evaluation
        let model_valid = model.valid();

        let mut val_loss_sum = 0.0f64;
        let mut val_batches  = 0usize;
        let mut tally        = ConfusionTally::new(cfg.num_labels);

        for batch in val_loader.iter() {
            let logits = model_valid.forward(
                batch.input_ids.clone(),
                batch.attention_mask.clone(),
            );

            // Same weighting as training so the two losses are comparable
            let mut ce_cfg = burn::nn::loss::CrossEntropyLossConfig::new();
            if let Some(w) = &class_weights {
                ce_cfg = ce_cfg.with_weights(Some(w.clone()));
            }
            let ce = ce_cfg.init(&logits.device());

            let batch_loss: f64 = ce
                .forward(logits.clone(), batch.labels.clone())
                .into_scalar().elem::<f64>();
            val_loss_sum += batch_loss;
            val_batches  += 1;

            // argmax(1) returns shape [batch, 1] — flatten to [batch]
            // before reading out the per-sample predictions
            let preds = logits.argmax(1).flatten::<1>(0, 1);
            let preds: Vec<i32> = preds.into_data().to_vec().unwrap_or_default();
            let truth: Vec<i32> = batch.labels.into_data().to_vec().unwrap_or_default();

            for (&t, &p) in truth.iter().zip(preds.iter()) {
                tally.record(t as usize, p as usize);
            }
        }

        let avg_val_loss = if val_batches > 0 { val_loss_sum / val_batches as f64 } else { f64::NAN };
        let row = EpochMetrics::new(
            epoch,
            avg_train_loss,
            avg_val_loss,
            tally.accuracy(),
            tally.weighted_f1(),
        );

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | val_loss={:.4} | acc={:.1}% | weighted_f1={:.3}",
            epoch, cfg.epochs, row.train_loss, row.val_loss,
            row.accuracy * 100.0, row.weighted_f1,
        );

        metrics.log(&row)?;
        ckpt_manager.save_model(&model, epoch)?;
        tracing::info!("Checkpoint saved for epoch {}", epoch);
    }

    tracing::info!("Training complete!");
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warmup_ramps_to_peak() {
        // 10 warmup steps out of 100, peak 1.0
        let lrs: Vec<f64> = (0..10).map(|s| scheduled_lr(s, 100, 10, 1.0)).collect();
        for pair in lrs.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        assert!((lrs[9] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_decays_to_zero() {
        let peak = 8e-5;
        let mid  = scheduled_lr(55, 100, 10, peak);
        let last = scheduled_lr(99, 100, 10, peak);
        assert!(mid < peak);
        assert!(last < mid);
        // Final step sits at the tail of the half cosine
        assert!(last < peak * 0.01);
    }

    #[test]
    fn test_schedule_is_monotonic_after_warmup() {
        let lrs: Vec<f64> = (10..100).map(|s| scheduled_lr(s, 100, 10, 1.0)).collect();
        for pair in lrs.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
    }

    #[test]
    fn test_no_warmup_starts_at_peak() {
        let lr = scheduled_lr(0, 100, 0, 1.0);
        assert!((lr - 1.0).abs() < 1e-9);
    }
}
