// ============================================================
// Layer 4 — Code Frequency Analysis
// ============================================================
// Counts how often each major lithology code occurs in the
// log, ranks codes by frequency, and renders the ranking as a
// terminal histogram.
//
// Why does frequency matter?
//   The label distribution is long-tailed: a handful of codes
//   (clay, sand, shale...) cover most of the log while dozens
//   of rare codes appear a few times each. The frequency
//   ranking drives two later decisions:
//     - which codes are retained as classes (top-N subsetting)
//     - the per-class loss weights for imbalance handling
//
// Also provides seeded sampling of descriptions recorded
// under one code — the quickest way to eyeball whether a
// label like "UNKN" actually means anything.
//
// Reference: Rust Book §8 (HashMaps and Counting)

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::domain::log_entry::LithoLogEntry;

/// One code with its occurrence count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeCount {
    pub code:  String,
    pub count: usize,
}

/// Count major-code occurrences, most frequent first.
///
/// Ties are broken by code string so the ranking — and with it
/// the class-index assignment derived from it — is fully
/// deterministic for a given input.
pub fn count_codes(entries: &[LithoLogEntry]) -> Vec<CodeCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        *counts.entry(entry.major_code.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<CodeCount> = counts
        .into_iter()
        .map(|(code, count)| CodeCount { code: code.to_string(), count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.code.cmp(&b.code)));
    ranked
}

/// Render the top `n` codes as an ASCII bar chart, one code
/// per line, bars scaled to the most frequent code.
pub fn render_histogram(ranked: &[CodeCount], n: usize, bar_width: usize) -> String {
    let top = &ranked[..n.min(ranked.len())];
    let max = top.first().map(|c| c.count).unwrap_or(0);
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    for cc in top {
        let bar_len = (cc.count * bar_width) / max;
        out.push_str(&format!(
            "{:<10} {:>8}  {}\n",
            cc.code,
            cc.count,
            "#".repeat(bar_len.max(1)),
        ));
    }
    out
}

/// Seeded random sample of descriptions recorded under `code`.
/// Returns at most `n` descriptions, fewer if the code is rare.
pub fn sample_descriptions(
    entries: &[LithoLogEntry],
    code:    &str,
    n:       usize,
    seed:    u64,
) -> Vec<String> {
    let mut matching: Vec<&str> = entries
        .iter()
        .filter(|e| e.major_code == code)
        .map(|e| e.description.as_str())
        .collect();

    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    matching.shuffle(&mut rng);
    matching.truncate(n);
    matching.into_iter().map(String::from).collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn entry(code: &str, desc: &str) -> LithoLogEntry {
        LithoLogEntry::new("0", "1", code, "", desc)
    }

    #[test]
    fn test_counts_are_descending() {
        let entries = vec![
            entry("CLAY", "a"), entry("CLAY", "b"), entry("CLAY", "c"),
            entry("SAND", "d"), entry("SAND", "e"),
            entry("COAL", "f"),
        ];
        let ranked = count_codes(&entries);
        assert_eq!(ranked[0], CodeCount { code: "CLAY".into(), count: 3 });
        assert_eq!(ranked[1], CodeCount { code: "SAND".into(), count: 2 });
        assert_eq!(ranked[2], CodeCount { code: "COAL".into(), count: 1 });
    }

    #[test]
    fn test_ties_break_alphabetically() {
        let entries = vec![entry("SHLE", "a"), entry("GRVL", "b")];
        let ranked  = count_codes(&entries);
        // Same count — GRVL sorts before SHLE
        assert_eq!(ranked[0].code, "GRVL");
        assert_eq!(ranked[1].code, "SHLE");
    }

    #[test]
    fn test_histogram_scales_to_top_code() {
        let ranked = vec![
            CodeCount { code: "CLAY".into(), count: 40 },
            CodeCount { code: "SAND".into(), count: 10 },
        ];
        let chart = render_histogram(&ranked, 10, 40);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].matches('#').count(), 40);
        assert_eq!(lines[1].matches('#').count(), 10);
    }

    #[test]
    fn test_sampling_is_seeded_and_bounded() {
        let entries: Vec<LithoLogEntry> =
            (0..20).map(|i| entry("UNKN", &format!("desc {i}"))).collect();

        let a = sample_descriptions(&entries, "UNKN", 5, 123);
        let b = sample_descriptions(&entries, "UNKN", 5, 123);
        assert_eq!(a, b);
        assert_eq!(a.len(), 5);

        // Asking for more than exist returns all of them
        let all = sample_descriptions(&entries, "UNKN", 100, 123);
        assert_eq!(all.len(), 20);
    }

    #[test]
    fn test_sampling_unknown_code_is_empty() {
        let entries = vec![entry("CLAY", "a")];
        assert!(sample_descriptions(&entries, "BSLT", 5, 0).is_empty());
    }
}
