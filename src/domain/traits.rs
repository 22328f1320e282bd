// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// Traits are Rust's way of defining shared behaviour —
// similar to interfaces in Java or abstract classes in Python.
//
// By programming against traits instead of concrete types,
// we can swap implementations without changing the code
// that uses them. For example:
//   - CsvLogSource implements RecordSource
//   - A future DatabaseSource could also implement RecordSource
//   - The application layer only sees RecordSource
//     and works with both without any changes
//
// This is the Dependency Inversion Principle from SOLID,
// applied using Rust's trait system.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)
//            Rust Book §17 (Object Oriented Patterns)

use anyhow::Result;
use std::path::Path;

use crate::domain::log_entry::LithoLogEntry;

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Any component that can load lithology log entries.
///
/// Implementations:
///   - CsvLogSource → loads from a lithology log CSV file
///   - (future) DatabaseSource → loads from a groundwater database
pub trait RecordSource {
    /// Load all available log entries from this source.
    /// Returns a Vec of entries or an error.
    fn load_all(&self) -> Result<Vec<LithoLogEntry>>;
}

// ─── Persistable ──────────────────────────────────────────────────────────────
/// Any component whose state can be saved and restored from disk.
///
/// Implementations:
///   - LabelSet → saves/loads the code-to-class mapping
pub trait Persistable: Sized {
    /// Save this component's state to the given path
    fn save(&self, path: &Path) -> Result<()>;

    /// Load a component's state from the given path.
    /// Returns Self so callers can use the loaded instance directly.
    fn load(path: &Path) -> Result<Self>;
}
