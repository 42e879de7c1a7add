//! Seeded train/test split

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Row indices of the two partitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n` with a seeded RNG and hold out `ceil(n * test_ratio)` rows
pub fn train_test_split(n: usize, test_ratio: f64, seed: u64) -> SplitIndices {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n as f64) * test_ratio.clamp(0.0, 1.0)).ceil() as usize;
    let train = indices.split_off(n_test.min(n));
    SplitIndices {
        train,
        test: indices,
    }
}
