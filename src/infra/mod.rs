// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Handles all cross-cutting concerns that don't belong in
// any specific business layer:
//
//   checkpoint.rs      — Saving and loading model weights
//                        Uses Burn's CompactRecorder to
//                        serialise model parameters to disk.
//                        Also saves/loads TrainConfig as JSON
//                        so inference can rebuild the model.
//
//   tokenizer_store.rs — Tokenizer persistence
//                        Builds a word-level tokenizer from the
//                        description corpus if none exists, or
//                        loads a previously saved one. Ensures
//                        the same vocabulary is used for
//                        training and classification.
//
//   metrics.rs         — Evaluation and metrics logging
//                        Confusion tallying with weighted F1,
//                        plus a per-epoch CSV log for later
//                        analysis and plotting.
//
// Everything the pipeline persists lives in ONE artifacts
// directory: tokenizer.json, labels.json, train_config.json,
// the per-epoch model weights, and metrics.csv. Keeping them
// together is what lets `classify` check that its pieces
// actually belong to the same training run.
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Tokenizer building, saving, and loading
pub mod tokenizer_store;

/// Confusion tally, weighted F1, and the epoch CSV logger
pub mod metrics;
