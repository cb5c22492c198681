//! Seeded train/test partitioning

use emotion_core::{Error, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Shuffle `items` with a seeded RNG and hold out `ceil(n * test_size)` of them
///
/// Returns `(train, test)`. The same seed always yields the same partition.
pub fn train_test_split<T: Clone>(
    items: &[T],
    test_size: f64,
    seed: u64,
) -> Result<(Vec<T>, Vec<T>)> {
    if !(0.0..1.0).contains(&test_size) {
        return Err(Error::config(format!(
            "test_size must be in [0, 1), got {}",
            test_size
        )));
    }

    let n = items.len();
    let n_test = (n as f64 * test_size).ceil() as usize;
    if n_test >= n {
        return Err(Error::training(format!(
            "corpus of {} examples leaves no training data with test_size {}",
            n, test_size
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(n_test);
    let train = train_idx.iter().map(|&i| items[i].clone()).collect();
    let test = test_idx.iter().map(|&i| items[i].clone()).collect();
    Ok((train, test))
}
