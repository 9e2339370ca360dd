//! Index generation for layers that carry no `ind`.
//!
//! The generated value is an opaque identity only. Decoders draw from the
//! source in document order, so two decoders handed equal sources assign
//! equal indices.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait IndexSource {
    fn next_index(&mut self) -> i64;
}

/// Uniform random indices over the whole `i64` range.
pub struct RandomIndices {
    rng: StdRng,
}

impl RandomIndices {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomIndices {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexSource for RandomIndices {
    fn next_index(&mut self) -> i64 {
        self.rng.gen()
    }
}

/// Counts upward from a starting value.
#[derive(Debug, Clone)]
pub struct SequentialIndices {
    next: i64,
}

impl SequentialIndices {
    pub fn starting_at(first: i64) -> Self {
        Self { next: first }
    }
}

impl IndexSource for SequentialIndices {
    fn next_index(&mut self) -> i64 {
        let index = self.next;
        self.next = self.next.wrapping_add(1);
        index
    }
}

/// Any closure works as a caller-supplied source.
impl<F> IndexSource for F
where
    F: FnMut() -> i64,
{
    fn next_index(&mut self) -> i64 {
        self()
    }
}
