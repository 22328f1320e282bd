// ============================================================
// Layer 3 — LithoLogEntry Domain Type
// ============================================================
// Represents a single interval from a borehole lithology log.
// This is a plain data struct with no behaviour — a depth
// range, the recorded lithology codes, and the driller's
// free-text description of the material.
//
// The depth fields are deliberately Strings, not floats:
// the source CSV mixes numeric depths with entries such as
// "?" or "12.5?" and parsing them is not this system's job.
// We carry them through untouched for traceability.
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};

/// One row of a lithology log as recorded in the source CSV.
///
/// The serde rename attributes map the CSV header names
/// (PascalCase, fixed by the data supplier) onto idiomatic
/// snake_case field names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LithoLogEntry {
    /// Top of the logged interval, as written in the source
    #[serde(rename = "FromDepth")]
    pub from_depth: String,

    /// Bottom of the logged interval, as written in the source
    #[serde(rename = "ToDepth")]
    pub to_depth: String,

    /// Dominant rock type recorded for the interval, e.g. "CLAY"
    #[serde(rename = "MajorLithCode")]
    pub major_code: String,

    /// Secondary rock type, often empty
    #[serde(rename = "MinorLithCode")]
    pub minor_code: String,

    /// The driller's free-text description, e.g. "CLAY, VERY SANDY"
    #[serde(rename = "Description")]
    pub description: String,
}

impl LithoLogEntry {
    /// Create a new entry. Uses impl Into<String> so callers can
    /// pass &str or String — idiomatic for flexible string arguments.
    pub fn new(
        from_depth:  impl Into<String>,
        to_depth:    impl Into<String>,
        major_code:  impl Into<String>,
        minor_code:  impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            from_depth:  from_depth.into(),
            to_depth:    to_depth.into(),
            major_code:  major_code.into(),
            minor_code:  minor_code.into(),
            description: description.into(),
        }
    }

    /// A row is usable for training only if it carries both a
    /// major code and a non-empty description.
    pub fn is_trainable(&self) -> bool {
        !self.major_code.trim().is_empty() && !self.description.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trainable_requires_code_and_description() {
        let good = LithoLogEntry::new("0", "1.5", "CLAY", "", "CLAY, VERY SANDY");
        assert!(good.is_trainable());

        let no_code = LithoLogEntry::new("0", "1.5", "  ", "", "CLAY, VERY SANDY");
        assert!(!no_code.is_trainable());

        let no_desc = LithoLogEntry::new("0", "1.5", "CLAY", "", "");
        assert!(!no_desc.is_trainable());
    }
}
