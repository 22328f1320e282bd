// ============================================================
// Layer 4 — Description Preprocessor
// ============================================================
// Normalises driller descriptions before tokenisation.
//
// Two things are wrong with the raw text:
//
//   1. Case. Descriptions are upper-case in the source data
//      ("CLAY, VERY SANDY") but the vocabulary is built
//      lowercase — an upper-case description would shatter
//      into unknown tokens. Everything is lowercased.
//
//   2. Whitespace. Decades of data entry leave tabs,
//      non-breaking spaces, stray control characters and
//      double spaces in the free text. These would otherwise
//      become distinct "words" during vocabulary building.
//
// Descriptions are single short lines, so unlike a document
// pipeline there is no paragraph or blank-line handling here.
//
// Reference: Rust Book §8 (Strings in Rust)
//            Rust Book §13 (Iterators)

pub struct Preprocessor;

impl Preprocessor {
    /// Create a new Preprocessor instance
    pub fn new() -> Self {
        Self
    }

    /// Normalise one description for downstream tokenisation.
    /// Takes a &str and returns an owned String.
    pub fn clean(&self, text: &str) -> String {
        // ── Step 1: Normalise characters ──────────────────────────────────────
        // Lowercase, and map whitespace variants and control
        // characters to a plain space. to_lowercase() may expand
        // one char to several, hence flat_map over chars.
        let normalised: String = text
            .chars()
            .flat_map(|c| {
                let c = match c {
                    '\t' | '\n' | '\r' => ' ',
                    // Non-breaking space
                    '\u{00A0}' => ' ',
                    // Zero-width space
                    '\u{200B}' => ' ',
                    // Byte order mark
                    '\u{FEFF}' => ' ',
                    c if c.is_control() => ' ',
                    c => c,
                };
                c.to_lowercase()
            })
            .collect();

        // ── Step 2: Collapse space runs and trim ──────────────────────────────
        let mut out        = String::with_capacity(normalised.len());
        let mut last_space = false;

        for c in normalised.chars() {
            if c == ' ' {
                if !last_space {
                    out.push(' ');
                }
                last_space = true;
            } else {
                out.push(c);
                last_space = false;
            }
        }

        out.trim().to_string()
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_descriptions() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("CLAY, VERY SANDY"), "clay, very sandy");
    }

    #[test]
    fn test_collapses_multiple_spaces() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("brown   clay"), "brown clay");
    }

    #[test]
    fn test_trims_edges() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("  gravel  "), "gravel");
    }

    #[test]
    fn test_removes_control_chars_and_tabs() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("sand\tand\x01shale"), "sand and shale");
    }

    #[test]
    fn test_newlines_become_spaces() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("topsoil\r\nwith roots"), "topsoil with roots");
    }

    #[test]
    fn test_empty_string() {
        let p = Preprocessor::new();
        assert_eq!(p.clean(""), "");
    }
}
