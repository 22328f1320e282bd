// ============================================================
// Layer 4 — Class-Imbalance Handling
// ============================================================
// Even after subsetting to the most frequent codes, the label
// distribution is badly skewed — the clay count is an order of
// magnitude above the coal count. Two standard remedies are
// provided, mutually exclusive:
//
//   Weights — keep the data as-is and scale the loss so that
//     mistakes on rare classes cost more. Per class c:
//
//         w_c = 1 - n_c / N
//
//     where n_c is the class row count and N the total row
//     count. Frequent classes get weights near 1 - share,
//     i.e. LOWER than rare ones. Property worth testing: the
//     weights of k classes always sum to k - 1.
//
//   Resample — draw a fixed number of rows per class, with
//     replacement when the class has fewer rows than the
//     target. Simple, but repeating rare-class rows thousands
//     of times invites overfitting, which is exactly why
//     Weights is the default strategy.
//
// The weight vector is indexed by CLASS INDEX. Building it in
// any other order (say, alphabetical by code) silently pairs
// every class with the wrong weight — the kind of bug that
// trains without erroring and evaluates garbage.
//
// Reference: He & Garcia (2009), Learning from Imbalanced Data
//            rand crate documentation

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::domain::label_set::LabelSet;
use crate::domain::log_entry::LithoLogEntry;

/// Which imbalance remedy the training pipeline applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceStrategy {
    /// Weighted cross-entropy loss (the default)
    Weights,
    /// Per-class resampling to a fixed row count
    Resample,
    /// No correction at all
    None,
}

/// Compute per-class loss weights, indexed by class index.
///
/// Entries whose code is not in the label set are ignored —
/// they are dropped from training anyway.
pub fn class_weights(entries: &[LithoLogEntry], labels: &LabelSet) -> Vec<f32> {
    let mut counts = vec![0usize; labels.len()];
    let mut total  = 0usize;

    for entry in entries {
        if let Some(idx) = labels.code_to_index(&entry.major_code) {
            counts[idx] += 1;
            total       += 1;
        }
    }

    if total == 0 {
        return vec![1.0; labels.len()];
    }

    counts
        .iter()
        .map(|&n| 1.0 - (n as f32 / total as f32))
        .collect()
}

/// Resample to `target` rows per retained class, seeded.
///
/// Classes with fewer rows than the target are drawn WITH
/// replacement (rows repeat); classes with more are drawn
/// without (a plain subsample). Output order is class by
/// class — shuffle before splitting, which the splitter does.
pub fn resample_per_class(
    entries: &[LithoLogEntry],
    labels:  &LabelSet,
    target:  usize,
    seed:    u64,
) -> Vec<LithoLogEntry> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(target * labels.len());

    for code in labels.codes() {
        let class_rows: Vec<&LithoLogEntry> = entries
            .iter()
            .filter(|e| &e.major_code == code)
            .collect();

        if class_rows.is_empty() {
            continue;
        }

        if class_rows.len() >= target {
            // Enough rows — subsample without replacement
            let mut idx: Vec<usize> = (0..class_rows.len()).collect();
            idx.shuffle(&mut rng);
            out.extend(idx[..target].iter().map(|&i| class_rows[i].clone()));
        } else {
            // Too few rows — draw with replacement up to the target
            for _ in 0..target {
                let i = rng.gen_range(0..class_rows.len());
                out.push(class_rows[i].clone());
            }
        }
    }

    out
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn entry(code: &str) -> LithoLogEntry {
        LithoLogEntry::new("0", "1", code, "", "some description")
    }

    fn labels(codes: &[&str]) -> LabelSet {
        LabelSet::new(codes.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_weights_follow_inverse_share() {
        // 3 CLAY + 1 SAND → shares 0.75 / 0.25 → weights 0.25 / 0.75
        let entries = vec![entry("CLAY"), entry("CLAY"), entry("CLAY"), entry("SAND")];
        let set = labels(&["CLAY", "SAND"]);
        let w   = class_weights(&entries, &set);
        assert!((w[0] - 0.25).abs() < 1e-6);
        assert!((w[1] - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_weights_sum_to_k_minus_one() {
        let entries = vec![
            entry("CLAY"), entry("CLAY"), entry("CLAY"), entry("CLAY"),
            entry("SAND"), entry("SAND"),
            entry("SHLE"),
        ];
        let set = labels(&["CLAY", "SAND", "SHLE"]);
        let sum: f32 = class_weights(&entries, &set).iter().sum();
        // k classes with shares summing to 1 → weights sum to k - 1
        assert!((sum - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_weights_indexed_by_class_not_alphabet() {
        // SAND is class 0 here even though CLAY sorts first
        let entries = vec![entry("SAND"), entry("SAND"), entry("SAND"), entry("CLAY")];
        let set = labels(&["SAND", "CLAY"]);
        let w   = class_weights(&entries, &set);
        // SAND has share 0.75 → the SMALLER weight, and it is at index 0
        assert!(w[0] < w[1]);
    }

    #[test]
    fn test_weights_ignore_unretained_codes() {
        let entries = vec![entry("CLAY"), entry("BSLT")];
        let set = labels(&["CLAY"]);
        let w   = class_weights(&entries, &set);
        // CLAY is 100% of the retained rows
        assert!((w[0] - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_resample_equalises_counts() {
        let mut entries: Vec<LithoLogEntry> = Vec::new();
        for _ in 0..50 { entries.push(entry("CLAY")); }
        for _ in 0..3  { entries.push(entry("COAL")); }

        let set = labels(&["CLAY", "COAL"]);
        let out = resample_per_class(&entries, &set, 10, 0);

        let clay = out.iter().filter(|e| e.major_code == "CLAY").count();
        let coal = out.iter().filter(|e| e.major_code == "COAL").count();
        // CLAY subsampled down, COAL drawn with replacement up
        assert_eq!(clay, 10);
        assert_eq!(coal, 10);
    }

    #[test]
    fn test_resample_is_seeded() {
        let entries: Vec<LithoLogEntry> = (0..30)
            .map(|i| LithoLogEntry::new(i.to_string(), "1", "CLAY", "", format!("desc {i}")))
            .collect();
        let set = labels(&["CLAY"]);
        let a = resample_per_class(&entries, &set, 5, 7);
        let b = resample_per_class(&entries, &set, 5, 7);
        let descs = |v: &[LithoLogEntry]| -> Vec<String> {
            v.iter().map(|e| e.description.clone()).collect()
        };
        assert_eq!(descs(&a), descs(&b));
    }
}
