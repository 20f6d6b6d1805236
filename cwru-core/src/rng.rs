//! Deterministic shuffling.
//!
//! Partitions are reordered with a Fisher–Yates shuffle driven by
//! `rand::rngs::StdRng::seed_from_u64(seed)`:
//!
//! ```text
//! order = [0, 1, ..., len - 1]
//! for i in (1..len).rev():
//!     j = rng.gen_range(0..=i)
//!     order.swap(i, j)
//! ```
//!
//! `StdRng` output is stable for a given `rand` release, and the lockfile pins
//! it, so the same seed always yields the same order. Every shuffle starts
//! from a freshly seeded generator; the train and test permutations do not
//! share generator state.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seed used for both the train and the test shuffle.
pub const SHUFFLE_SEED: u64 = 0;

/// Create a seeded StdRng.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A permutation of `0..len` produced by a seeded Fisher–Yates shuffle.
pub fn seeded_permutation(len: usize, seed: u64) -> Vec<usize> {
    let mut rng = seeded_rng(seed);
    let mut order: Vec<usize> = (0..len).collect();
    for i in (1..len).rev() {
        let j = rng.gen_range(0..=i);
        order.swap(i, j);
    }
    order
}
