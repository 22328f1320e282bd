// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports from burn directly — only this one
// and the data plumbing (dataset + batcher).
//
// Why isolate Burn code here?
//   - If Burn's API changes, we only update this layer
//   - Other layers are testable without a GPU
//   - The model architecture is clearly separated from
//     data loading and application logic
//
// What's in this layer:
//
//   model.rs     — The transformer encoder classifier
//                  Token + positional embeddings, stacked
//                  self-attention encoder blocks, and a
//                  classification head over the [CLS] state.
//                  The position table is sized from the
//                  configured sequence length, so there is no
//                  pretrained table for the input to outgrow.
//
//   trainer.rs   — The training loop
//                  Forward pass with weighted cross-entropy,
//                  backward pass, Adam step under a cosine
//                  schedule, per-epoch validation metrics and
//                  checkpoint saving
//
//   inferencer.rs — The inference engine
//                  Loads a checkpoint, encodes a description,
//                  runs the model, decodes the predicted code
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Vaswani et al. (2017) Attention Is All You Need

/// Transformer encoder classification model architecture
pub mod model;

/// Full training loop with validation and checkpointing
pub mod trainer;

/// Inference engine — loads checkpoint and predicts codes
pub mod inferencer;
