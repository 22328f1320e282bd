// ============================================================
// Layer 4 — Classification Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<LithoSample>
// into GPU-ready tensors.
//
// How batching works here:
//   Input:  Vec of N LithoSamples, each with sequences of length S
//   Output: LithoBatch with tensors of shape [N, S] plus a
//           label tensor of shape [N]
//
//   We flatten all input_ids into one long Vec, then reshape:
//   [s1_t1, s1_t2, ..., s1_tS, s2_t1, ..., sN_tS] → [N, S]
//
// This stays a plain reshape because every sample was already
// padded to the same length by the SampleEncoder. If they
// weren't, we'd need dynamic padding here.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::LithoSample;

// ─── LithoBatch ───────────────────────────────────────────────────────────────
/// A batch of samples ready for the model forward pass.
/// All tensors have batch_size as their first dimension.
///
/// B is the Burn Backend (e.g. Wgpu, NdArray) —
/// generic so the same batcher works on any device.
#[derive(Debug, Clone)]
pub struct LithoBatch<B: Backend> {
    /// Token ID sequences — shape: [batch_size, seq_len]
    pub input_ids: Tensor<B, 2, Int>,

    /// Attention masks — shape: [batch_size, seq_len]
    /// 1 = real token, 0 = padding
    pub attention_mask: Tensor<B, 2, Int>,

    /// Ground truth class indices — shape: [batch_size]
    pub labels: Tensor<B, 1, Int>,
}

// ─── LithoBatcher ─────────────────────────────────────────────────────────────
/// The batcher struct — holds the target device so tensors
/// are created on the correct GPU/CPU.
#[derive(Clone, Debug)]
pub struct LithoBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> LithoBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

// The DataLoader calls .batch(items) with each mini-batch of samples.
impl<B: Backend> Batcher<B, LithoSample, LithoBatch<B>> for LithoBatcher<B> {
    fn batch(&self, items: Vec<LithoSample>, _device: &B::Device) -> LithoBatch<B> {
        let batch_size = items.len();
        // All sequences have the same length (pre-padded)
        let seq_len    = items[0].input_ids.len();

        // Burn uses i32 for Int tensors — flatten and widen in one pass
        let input_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.input_ids.iter().map(|&x| x as i32))
            .collect();

        let mask_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.attention_mask.iter().map(|&x| x as i32))
            .collect();

        let label_flat: Vec<i32> = items
            .iter()
            .map(|s| s.label as i32)
            .collect();

        let input_ids = Tensor::<B, 1, Int>::from_ints(
            input_flat.as_slice(), &self.device
        ).reshape([batch_size, seq_len]);

        let attention_mask = Tensor::<B, 1, Int>::from_ints(
            mask_flat.as_slice(), &self.device
        ).reshape([batch_size, seq_len]);

        let labels = Tensor::<B, 1, Int>::from_ints(
            label_flat.as_slice(), &self.device
        );

        LithoBatch { input_ids, attention_mask, labels }
    }
}
