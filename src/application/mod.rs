// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// a specific goal (inspecting the data, training, or
// classifying a description).
//
// Rules for this layer:
//   - No ML math or model code here
//   - No UI or printing here beyond use-case output (Layer 1
//     owns argument handling)
//   - No direct file parsing (that's Layer 4 and 6)
//   - Only workflow coordination
//
// Think of this layer as the "director" — it tells other
// layers what to do but doesn't do the work itself.
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The training workflow
pub mod train_use_case;

// The classification workflow
pub mod classify_use_case;

// Label frequency inspection
pub mod stats_use_case;
