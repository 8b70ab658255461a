//! Seeded operation streams for simulation clients.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::model::{ModelValue, Operation};

/// Deterministic generator of client operations.
///
/// The mix leans towards inserts so the list grows while deletes still find
/// their targets often.
#[derive(Debug, Clone)]
pub struct Workload {
    rng: ChaCha8Rng,
    /// Values are drawn from `-value_range..value_range`.
    value_range: ModelValue,
}

impl Workload {
    /// Workload seeded for reproducibility.
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed), value_range: 8 }
    }

    /// Narrow or widen the value range. Smaller ranges mean more duplicates.
    #[must_use]
    pub fn with_value_range(mut self, value_range: ModelValue) -> Self {
        self.value_range = value_range.max(1);
        self
    }

    /// Draw the next operation.
    pub fn next_operation(&mut self) -> Operation {
        let value = self.rng.gen_range(-self.value_range..self.value_range);
        match self.rng.gen_range(0..10) {
            0..=5 => Operation::Insert { value, at_start: self.rng.gen_bool(0.5) },
            6..=8 => Operation::Delete { value },
            _ => Operation::Snapshot,
        }
    }

    /// Draw `count` operations.
    pub fn operations(&mut self, count: usize) -> Vec<Operation> {
        (0..count).map(|_| self.next_operation()).collect()
    }
}
