// ============================================================
// Layer 3 — LabelSet Domain Type
// ============================================================
// The ordered set of major lithology codes the classifier is
// trained on, with a bijective mapping to integer class
// indices. The order is frequency rank (most common code
// first), fixed at build time — class 0 is always the most
// frequent retained code.
//
// Why does the mapping have to be persisted?
//   The model only ever sees integer class indices. Without
//   the exact same code-to-index mapping at inference time,
//   a predicted index cannot be turned back into a lithology
//   code — or worse, is silently turned into the WRONG code.
//   LabelSet is therefore Persistable and saved next to the
//   model checkpoint.
//
// Reference: Rust Book §8 (HashMaps)

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::traits::Persistable;

/// Ordered retained codes with their class-index mapping.
///
/// Only `codes` is serialized — the reverse map is rebuilt on
/// load, so the two can never disagree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelSet {
    /// Retained codes in class-index order: codes[i] is class i
    codes: Vec<String>,

    /// Reverse lookup, rebuilt from `codes`
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl LabelSet {
    /// Build a LabelSet from codes already in the desired order.
    /// Duplicate codes are rejected — the mapping must be bijective.
    pub fn new(codes: Vec<String>) -> Result<Self> {
        let mut index = HashMap::with_capacity(codes.len());
        for (i, code) in codes.iter().enumerate() {
            if index.insert(code.clone(), i).is_some() {
                anyhow::bail!("duplicate label code '{}'", code);
            }
        }
        Ok(Self { codes, index })
    }

    /// Class index for a code, or None if the code was not retained
    pub fn code_to_index(&self, code: &str) -> Option<usize> {
        self.index.get(code).copied()
    }

    /// Code string for a class index, or None if out of range
    pub fn index_to_code(&self, index: usize) -> Option<&str> {
        self.codes.get(index).map(String::as_str)
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// The retained codes in class-index order
    pub fn codes(&self) -> &[String] {
        &self.codes
    }
}

impl Persistable for LabelSet {
    fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Cannot write label set to '{}'", path.display()))?;
        Ok(())
    }

    fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read label set from '{}'", path.display()))?;
        let loaded: LabelSet = serde_json::from_str(&json)?;
        // The reverse map is #[serde(skip)] — rebuild it
        LabelSet::new(loaded.codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_mapping_is_bijective() {
        let set = LabelSet::new(codes(&["CLAY", "SAND", "SHLE"])).unwrap();
        assert_eq!(set.len(), 3);
        for i in 0..set.len() {
            let code = set.index_to_code(i).unwrap();
            assert_eq!(set.code_to_index(code), Some(i));
        }
    }

    #[test]
    fn test_order_is_class_index() {
        // Class 0 must be the first code given, not alphabetical order
        let set = LabelSet::new(codes(&["SAND", "CLAY"])).unwrap();
        assert_eq!(set.code_to_index("SAND"), Some(0));
        assert_eq!(set.code_to_index("CLAY"), Some(1));
    }

    #[test]
    fn test_unknown_code_is_none() {
        let set = LabelSet::new(codes(&["CLAY"])).unwrap();
        assert_eq!(set.code_to_index("GRVL"), None);
        assert_eq!(set.index_to_code(5), None);
    }

    #[test]
    fn test_duplicate_codes_rejected() {
        assert!(LabelSet::new(codes(&["CLAY", "CLAY"])).is_err());
    }
}
