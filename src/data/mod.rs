// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from the raw lithology log CSV
// all the way to GPU-ready tensor batches.
//
// The pipeline flows in this order:
//
//   NGIS lithology CSV
//       │
//       ▼
//   CsvLogSource      → reads rows, skips unusable ones
//       │
//       ▼
//   frequency         → counts codes, ranks them
//       │
//       ▼
//   LabelSet          → top-N codes minus the sentinel (Layer 3)
//       │
//       ▼
//   balance           → class weights OR per-class resampling
//       │
//       ▼
//   Preprocessor      → lowercases and normalises descriptions
//       │
//       ▼
//   SampleEncoder     → fixed-length token ids + attention mask
//       │
//       ▼
//   splitter          → seeded train/test split
//       │
//       ▼
//   LithoDataset      → implements Burn's Dataset trait
//       │
//       ▼
//   LithoBatcher      → stacks samples into tensor batches
//
// Each module is responsible for exactly one step.
// This makes each step independently testable and replaceable.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Rust Book §13 (Iterators and Closures)

/// Loads lithology log rows from a CSV file
pub mod loader;

/// Code frequency counting, ranking, and description sampling
pub mod frequency;

/// Class-imbalance strategies: loss weights and resampling
pub mod balance;

/// Lowercases and normalises description text
pub mod preprocessor;

/// Turns descriptions into fixed-length token sequences
pub mod encoder;

/// Implements Burn's Dataset trait for classification samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Shuffles and splits data into train/test sets
pub mod splitter;
