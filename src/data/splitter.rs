// ============================================================
// Layer 4 — Train/Test Splitter
// ============================================================
// Randomly shuffles samples and splits them into two sets:
//   - Training set: used to update model weights
//   - Test set:     used to measure performance on unseen data
//
// Why shuffle before splitting?
//   Log rows arrive grouped by borehole, and boreholes are
//   geographically clustered. Without shuffling, the test set
//   would be a handful of boreholes from one corner of the
//   catchment instead of a representative mix.
//
// Why a SEEDED RNG instead of thread_rng?
//   So a run is reproducible: the same seed always produces
//   the same split, which makes metric changes attributable
//   to the model rather than to split luck.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom
// which is the standard unbiased shuffle algorithm.
//
// Reference: rand crate documentation

use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Shuffle `samples` with the given seed and split off a test
/// fraction.
///
/// # Arguments
/// * `samples`       - All available samples (consumed by this function)
/// * `test_fraction` - Proportion for the test set, e.g. 0.25 = 25%
/// * `seed`          - RNG seed for the shuffle
///
/// # Returns
/// A tuple (train_samples, test_samples)
pub fn split_train_test<T>(
    mut samples:   Vec<T>,
    test_fraction: f64,
    seed:          u64,
) -> (Vec<T>, Vec<T>) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    // Fisher-Yates shuffle — every permutation is equally likely
    samples.shuffle(&mut rng);

    let total    = samples.len();
    let n_test   = ((total as f64) * test_fraction).round() as usize;
    let split_at = total.saturating_sub(n_test);

    // split_off(n) removes elements [n..] from the Vec and returns them
    let test = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} train, {} test",
        samples.len(),
        test.len(),
    );

    (samples, test)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_split_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let (train, test)     = split_train_test(items, 0.25, 42);
        assert_eq!(train.len(), 75);
        assert_eq!(test.len(),  25);
    }

    #[test]
    fn test_all_items_preserved() {
        // No items should be lost in the split
        let items: Vec<usize> = (0..50).collect();
        let (mut train, test) = split_train_test(items, 0.3, 1);
        train.extend(test);
        train.sort_unstable();
        assert_eq!(train, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_split() {
        let a = split_train_test((0..40).collect::<Vec<usize>>(), 0.25, 42);
        let b = split_train_test((0..40).collect::<Vec<usize>>(), 0.25, 42);
        assert_eq!(a.0, b.0);
        assert_eq!(a.1, b.1);
    }

    #[test]
    fn test_different_seed_different_shuffle() {
        let a = split_train_test((0..40).collect::<Vec<usize>>(), 0.25, 1);
        let b = split_train_test((0..40).collect::<Vec<usize>>(), 0.25, 2);
        // Sizes match but the ordering should differ
        assert_eq!(a.0.len(), b.0.len());
        assert_ne!(a.0, b.0);
    }

    #[test]
    fn test_empty_dataset() {
        let items: Vec<usize> = Vec::new();
        let (train, test)     = split_train_test(items, 0.25, 0);
        assert!(train.is_empty());
        assert!(test.is_empty());
    }

    #[test]
    fn test_zero_fraction_keeps_everything() {
        let items: Vec<usize> = (0..10).collect();
        let (train, test)     = split_train_test(items, 0.0, 0);
        assert_eq!(train.len(), 10);
        assert!(test.is_empty());
    }
}
