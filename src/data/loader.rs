// ============================================================
// Layer 4 — CSV Log Loader
// ============================================================
// Loads borehole lithology log rows from a CSV export using
// the csv crate.
//
// The expected header row (fixed by the data supplier):
//   FromDepth,ToDepth,MajorLithCode,MinorLithCode,Description
//
// csv + serde work together here: the csv crate reads each
// record, serde deserialises it straight into a LithoLogEntry
// using the #[serde(rename)] attributes on the struct. No
// hand-written field indexing, no header bookkeeping.
//
// Policy for bad rows: a row that fails to deserialise, or
// that has no major code / no description, is logged and
// skipped. One malformed row out of hundreds of thousands
// must not kill a training run. A missing FILE is an error
// though — there is nothing meaningful to train on.
//
// Reference: csv crate tutorial (Reading with serde)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::domain::log_entry::LithoLogEntry;
use crate::domain::traits::RecordSource;

/// Loads all rows from a lithology log CSV file.
/// Implements the RecordSource trait from Layer 3.
pub struct CsvLogSource {
    /// Path to the CSV file
    path: PathBuf,
}

impl CsvLogSource {
    /// Create a new CsvLogSource pointed at a CSV file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for CsvLogSource {
    fn load_all(&self) -> Result<Vec<LithoLogEntry>> {
        let path = Path::new(&self.path);
        if !path.exists() {
            anyhow::bail!("Lithology CSV '{}' does not exist", path.display());
        }

        let mut reader = csv::ReaderBuilder::new()
            // Some exports have ragged trailing columns; tolerate them
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Cannot open CSV '{}'", path.display()))?;

        let mut entries  = Vec::new();
        let mut skipped  = 0usize;

        for (row_idx, record) in reader.deserialize::<LithoLogEntry>().enumerate() {
            match record {
                Ok(entry) if entry.is_trainable() => entries.push(entry),
                Ok(_) => {
                    // Structurally fine but missing code or description
                    skipped += 1;
                }
                Err(e) => {
                    skipped += 1;
                    tracing::warn!("Skipping row {}: {}", row_idx + 2, e);
                }
            }
        }

        if skipped > 0 {
            tracing::info!("Skipped {} unusable rows", skipped);
        }
        tracing::info!("Loaded {} lithology log entries", entries.len());
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> PathBuf {
        let dir  = std::env::temp_dir();
        let path = dir.join(format!("litho_test_{}.csv", std::process::id()));
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "{}", contents).unwrap();
        path
    }

    #[test]
    fn test_loads_rows_and_skips_unusable() {
        let path = write_csv(
            "FromDepth,ToDepth,MajorLithCode,MinorLithCode,Description\n\
             0,1.5,CLAY,,\"CLAY, VERY SANDY\"\n\
             1.5,3,,,no code on this row\n\
             3,6,SAND,CLAY,COARSE SAND\n",
        );
        let source  = CsvLogSource::new(&path);
        let entries = source.load_all().unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].major_code, "CLAY");
        assert_eq!(entries[0].description, "CLAY, VERY SANDY");
        assert_eq!(entries[1].to_depth, "6");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let source = CsvLogSource::new("/no/such/file.csv");
        assert!(source.load_all().is_err());
    }
}
