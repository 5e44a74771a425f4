use crate::error::{Error, Result};
use crate::pattern::Pattern;
use serde::{Deserialize, Serialize};

/// Tuning for a `WorkingMemory` buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkingMemoryParams {
    pub capacity: usize,
    pub primacy: f32,
}

impl Default for WorkingMemoryParams {
    fn default() -> Self {
        Self {
            capacity: 7,
            primacy: 0.9,
        }
    }
}

impl WorkingMemoryParams {
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::InvalidParameters("capacity must be positive".into()));
        }
        if !(0.0..1.0).contains(&self.primacy) {
            return Err(Error::InvalidParameters(
                "primacy must be in (0,1)".into(),
            ));
        }
        Ok(())
    }
}

/// A buffered item: its pattern, the primacy strength assigned at insertion,
/// its position in the overall insertion sequence, and the arrival time
/// (a separate monotonic counter, distinct from position so a chunk can
/// report how much time its items span even after slots are overwritten
/// in place).
#[derive(Debug, Clone)]
pub struct Item {
    pub pattern: Pattern,
    pub strength: f32,
    pub position: u32,
    pub time: u64,
}

/// Bounded buffer with a primacy gradient: item `i`'s strength is fixed at
/// `gamma^i` where `i` is its position in the overall insertion sequence, so
/// earlier items keep a lasting advantage over later arrivals. On
/// overflow the weakest currently-held item is evicted, regardless of the
/// newcomer's own strength — an early, strong item is never displaced.
#[derive(Debug, Clone)]
pub struct WorkingMemory {
    params: WorkingMemoryParams,
    items: Vec<Item>,
    next_index: u32,
    clock: u64,
}

impl WorkingMemory {
    pub fn new(params: WorkingMemoryParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            items: Vec::with_capacity(params.capacity),
            next_index: 0,
            clock: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.params.capacity
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.next_index = 0;
        self.clock = 0;
    }

    /// Inserts `pattern`, returning the evicted item if the buffer was full.
    pub fn insert(&mut self, pattern: Pattern) -> Option<Item> {
        let position = self.next_index;
        let strength = self.params.primacy.powi(position as i32);
        self.next_index = self.next_index.saturating_add(1);
        let time = self.clock;
        self.clock = self.clock.saturating_add(1);
        let incoming = Item {
            pattern,
            strength,
            position,
            time,
        };

        if self.items.len() < self.params.capacity {
            self.items.push(incoming);
            return None;
        }

        let weakest = self
            .items
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.strength.partial_cmp(&b.strength).unwrap())
            .map(|(idx, _)| idx)
            .expect("buffer at capacity implies at least one item");
        let evicted = std::mem::replace(&mut self.items[weakest], incoming);
        Some(evicted)
    }
}
