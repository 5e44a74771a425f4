use rand::Rng;

use crate::error::{Error, Result};
use crate::pattern::Pattern;

/// One retained (input, category) association.
#[derive(Debug, Clone)]
pub struct Sample {
    pub pattern: Pattern,
    pub category: usize,
}

/// Bounded reservoir of `(pattern, category)` pairs. Reservoir sampling
/// (Algorithm R) guarantees uniform coverage of the entire stream
/// regardless of its length, unlike a strict FIFO window which would
/// always favor the most recent arrivals.
#[derive(Debug, Clone)]
pub struct ReplayBuffer {
    capacity: usize,
    items: Vec<Sample>,
    seen: u64,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidParameters("capacity must be positive".into()));
        }
        Ok(Self {
            capacity,
            items: Vec::with_capacity(capacity),
            seen: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn samples(&self) -> &[Sample] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.seen = 0;
    }

    /// Offers one new sample to the reservoir. If the buffer is not yet
    /// full, it is appended unconditionally; otherwise a uniformly random
    /// existing slot is overwritten with probability `capacity / k`, where
    /// `k` is this sample's 1-based arrival index.
    pub fn offer(&mut self, pattern: Pattern, category: usize, rng: &mut impl Rng) {
        self.seen += 1;
        let sample = Sample { pattern, category };
        if self.items.len() < self.capacity {
            self.items.push(sample);
            return;
        }
        let k = self.seen;
        if rng.gen_range(0..k) < self.capacity as u64 {
            let slot = rng.gen_range(0..self.capacity);
            self.items[slot] = sample;
        }
    }

    /// Draws `n` samples uniformly at random, with replacement.
    pub fn sample_batch(&self, n: usize, rng: &mut impl Rng) -> Result<Vec<&Sample>> {
        if self.items.is_empty() {
            return Err(Error::InvalidInput("replay buffer is empty".into()));
        }
        Ok((0..n)
            .map(|_| &self.items[rng.gen_range(0..self.items.len())])
            .collect())
    }
}
