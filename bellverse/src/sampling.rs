//! Seed splitting and trial partitioning for reproducible parallel runs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Hands out sub-stream seeds drawn from a single seeded parent generator.
///
/// Every experiment run and every partition of a run gets its own generator seeded from
/// here, so runs never share a random stream while the whole session stays reproducible
/// from one `u64`.
pub struct SeedSplitter {
    parent: StdRng,
}

impl SeedSplitter {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        SeedSplitter {
            parent: StdRng::seed_from_u64(seed),
        }
    }

    /// A splitter seeded from the thread-local generator.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    pub fn next_seed(&mut self) -> u64 {
        self.parent.gen()
    }

    /// A fresh generator on the next sub-stream.
    pub fn next_source(&mut self) -> StdRng {
        StdRng::seed_from_u64(self.next_seed())
    }
}

/// Split `total` trials into `partitions` contiguous sizes that differ by at most one.
///
/// The first `total % partitions` partitions take the extra trial. With more partitions
/// than trials the trailing sizes are zero.
///
/// # Panics
///
/// Debug-asserts that `partitions` is positive.
pub fn partition_sizes(total: usize, partitions: usize) -> impl Iterator<Item = usize> {
    debug_assert!(partitions > 0, "partitions must be positive");
    let base = total / partitions;
    let remainder = total % partitions;
    (0..partitions).map(move |index| base + usize::from(index < remainder))
}
