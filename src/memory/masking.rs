use crate::error::{Error, Result};
use crate::memory::working::Item;
use crate::metrics::{Metrics, Snapshot};
use crate::pattern::Pattern;
use serde::{Deserialize, Serialize};

/// The three competing segmentation scales, in inhibition order —
/// `List` inhibits `Chunk` and `Item` more strongly than the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scale {
    Item,
    Chunk,
    List,
}

const SCALES: [Scale; 3] = [Scale::Item, Scale::Chunk, Scale::List];
/// Preferred subsequence length range per scale, in `SCALES` order.
const PREFERRED_RANGE: [(usize, usize); 3] = [(1, 2), (3, 4), (5, 7)];

fn scale_index(scale: Scale) -> usize {
    match scale {
        Scale::Item => 0,
        Scale::Chunk => 1,
        Scale::List => 2,
    }
}

/// A chunk's coarse size class. A pure function of `size`, extending the
/// three scales' preferred ranges with a fourth tier for anything beyond
/// the `List` scale's preferred maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChunkType {
    Small,
    Medium,
    Large,
    Super,
}

impl ChunkType {
    pub fn classify(size: usize) -> Self {
        match size {
            0..=2 => ChunkType::Small,
            3..=4 => ChunkType::Medium,
            5..=7 => ChunkType::Large,
            _ => ChunkType::Super,
        }
    }
}

/// How the items covered by a chunk are pooled into a single pattern before
/// being fed to the ART step engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pooling {
    Average,
    WinnerTakeAll,
}

/// A chunk emitted when one scale wins the competition: the working-memory
/// items it covers, the derived size/span/strength summary, and its coarse
/// size class. Invariant: `size == items.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct ListChunk {
    pub items: Vec<Item>,
    pub size: usize,
    pub temporal_span: u64,
    pub strength: f32,
    pub chunk_type: ChunkType,
}

/// Tuning for a `MaskingField`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaskingParams {
    pub asymmetry_factor: f32,
    pub winner_threshold: f32,
    pub min_chunk_interval: u64,
    pub min_chunk_size: usize,
    pub max_chunk_size: usize,
    pub reset_after_chunk: bool,
    pub ceiling: f32,
    pub floor: f32,
    pub decay: f32,
    pub time_step: f32,
    pub pooling: Pooling,
}

impl Default for MaskingParams {
    fn default() -> Self {
        Self {
            asymmetry_factor: 2.0,
            winner_threshold: 0.6,
            min_chunk_interval: 5,
            min_chunk_size: 1,
            max_chunk_size: 7,
            reset_after_chunk: true,
            ceiling: 1.0,
            floor: 0.0,
            decay: 0.2,
            time_step: 0.05,
            pooling: Pooling::Average,
        }
    }
}

impl MaskingParams {
    pub fn validate(&self) -> Result<()> {
        if self.asymmetry_factor <= 0.0 {
            return Err(Error::InvalidParameters(
                "asymmetry_factor must be > 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.winner_threshold) {
            return Err(Error::InvalidParameters(
                "winner_threshold must be in [0,1]".into(),
            ));
        }
        if self.min_chunk_size == 0 || self.min_chunk_size > self.max_chunk_size {
            return Err(Error::InvalidParameters(
                "min_chunk_size must be positive and <= max_chunk_size".into(),
            ));
        }
        if self.ceiling <= self.floor {
            return Err(Error::InvalidParameters(
                "ceiling must be > floor".into(),
            ));
        }
        if self.time_step <= 0.0 {
            return Err(Error::InvalidParameters("time_step must be > 0".into()));
        }
        Ok(())
    }
}

/// Three-scale competitive chunker driven by shunting dynamics with
/// asymmetric lateral inhibition: a larger scale suppresses a smaller one
/// more strongly than the reverse.
#[derive(Debug)]
pub struct MaskingField {
    params: MaskingParams,
    activations: [f32; 3],
    steps_since_chunk: u64,
    metrics: Metrics,
}

impl MaskingField {
    pub fn new(params: MaskingParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            activations: [params.floor; 3],
            // Allow a chunk on the very first qualifying step rather than
            // waiting a full interval before the field has even competed.
            steps_since_chunk: params.min_chunk_interval,
            params,
            metrics: Metrics::default(),
        })
    }

    pub fn params(&self) -> &MaskingParams {
        &self.params
    }

    pub fn activations(&self) -> [f32; 3] {
        self.activations
    }

    pub fn metrics(&self) -> Snapshot {
        self.metrics.snapshot()
    }

    pub fn reset(&mut self) {
        self.activations = [self.params.floor; 3];
        self.steps_since_chunk = self.params.min_chunk_interval;
    }

    /// One integration step over the current working-memory window.
    /// Returns the emitted chunk — the most recent `size` items of `window`,
    /// by arrival time — if a scale won this step.
    pub fn step(&mut self, window: &[Item]) -> Option<ListChunk> {
        let window_len = window.len();
        let drive = SCALES.map(|s| fit_score(window_len, PREFERRED_RANGE[scale_index(s)]));
        let mut next = [0.0f32; 3];
        for i in 0..3 {
            let mut inhibition = 0.0f32;
            for j in 0..3 {
                if j == i {
                    continue;
                }
                let coupling = if j > i {
                    self.params.asymmetry_factor
                } else {
                    1.0
                };
                inhibition += coupling * self.activations[j];
            }
            let x_i = self.activations[i];
            let s_plus = drive[i].max(0.0);
            let s_minus = inhibition.max(0.0);
            let dx = -self.params.decay * x_i + (self.params.ceiling - x_i) * s_plus
                - (x_i - self.params.floor) * s_minus;
            next[i] = (x_i + self.params.time_step * dx).clamp(self.params.floor, self.params.ceiling);
        }
        self.activations = next;
        self.steps_since_chunk = self.steps_since_chunk.saturating_add(1);

        let (winner_idx, &winner_activation) = self
            .activations
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .expect("activations is non-empty");

        if winner_activation <= self.params.winner_threshold
            || self.steps_since_chunk < self.params.min_chunk_interval
            || window.is_empty()
        {
            return None;
        }

        let (lo, hi) = PREFERRED_RANGE[winner_idx];
        let size = window_len
            .clamp(lo, hi)
            .clamp(self.params.min_chunk_size, self.params.max_chunk_size)
            .min(window_len);

        self.steps_since_chunk = 0;
        if self.params.reset_after_chunk {
            self.activations = [self.params.floor; 3];
        }

        let mut ordered: Vec<&Item> = window.iter().collect();
        ordered.sort_by_key(|item| item.time);
        let mut items: Vec<Item> = ordered.into_iter().rev().take(size).cloned().collect();
        items.reverse();

        let earliest = items.iter().map(|item| item.time).min().unwrap_or(0);
        let latest = items.iter().map(|item| item.time).max().unwrap_or(0);
        let temporal_span = latest.saturating_sub(earliest);
        let strength = items.iter().map(|item| item.strength).sum::<f32>() / items.len() as f32;
        let chunk_type = ChunkType::classify(size);

        self.metrics.record_chunk_emitted();
        log::debug!(
            "masking-field: emitted {chunk_type:?} chunk of size {size}, span {temporal_span}"
        );

        Some(ListChunk {
            items,
            size,
            temporal_span,
            strength,
            chunk_type,
        })
    }
}

/// How well a window of `len` items fits a scale's preferred `[lo, hi]`
/// subsequence length: 1.0 inside the range, decaying linearly outside it.
fn fit_score(len: usize, (lo, hi): (usize, usize)) -> f32 {
    if len >= lo && len <= hi {
        return 1.0;
    }
    let distance = if len < lo { lo - len } else { len - hi } as f32;
    (1.0 - distance / hi as f32).max(0.0)
}

/// Pools a chunk's items into a single pattern by componentwise average.
pub fn pool_average(items: &[Pattern]) -> Result<Pattern> {
    let first = items
        .first()
        .ok_or_else(|| Error::InvalidInput("cannot pool an empty chunk".into()))?;
    let dim = first.dim();
    let mut sums = vec![0.0f32; dim];
    for item in items {
        if item.dim() != dim {
            return Err(Error::InvalidInput(
                "all pooled items must share one dimension".into(),
            ));
        }
        for (sum, v) in sums.iter_mut().zip(item.as_slice()) {
            *sum += v;
        }
    }
    let n = items.len() as f32;
    for sum in sums.iter_mut() {
        *sum /= n;
    }
    Ok(Pattern::new(sums))
}

/// Pools a chunk's items by winner-take-all: the item with the highest
/// `strengths` entry is returned as-is.
pub fn pool_winner_take_all(items: &[Pattern], strengths: &[f32]) -> Result<Pattern> {
    if items.len() != strengths.len() || items.is_empty() {
        return Err(Error::InvalidInput(
            "items and strengths must be non-empty and equal length".into(),
        ));
    }
    let winner = strengths
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
        .map(|(idx, _)| idx)
        .expect("non-empty checked above");
    Ok(items[winner].clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window_of(n: usize) -> Vec<Item> {
        (0..n)
            .map(|i| Item {
                pattern: Pattern::new(vec![i as f32]),
                strength: 0.9f32.powi(i as i32),
                position: i as u32,
                time: i as u64,
            })
            .collect()
    }

    #[test]
    fn converges_and_emits_chunk_within_bounds() {
        let params = MaskingParams {
            min_chunk_interval: 2,
            ..MaskingParams::default()
        };
        let mut field = MaskingField::new(params).unwrap();
        let window = window_of(4);
        let mut emitted = Vec::new();
        for _ in 0..50 {
            if let Some(chunk) = field.step(&window) {
                emitted.push(chunk);
            }
        }
        for chunk in &emitted {
            assert!(chunk.size >= params.min_chunk_size);
            assert!(chunk.size <= params.max_chunk_size);
            assert_eq!(chunk.size, chunk.items.len());
        }
    }

    #[test]
    fn chunk_size_never_exceeds_window_span() {
        let mut field = MaskingField::new(MaskingParams::default()).unwrap();
        let window = window_of(10);
        let mut any = false;
        for _ in 0..50 {
            if let Some(chunk) = field.step(&window) {
                assert!(chunk.size <= 10);
                assert_eq!(chunk.chunk_type, ChunkType::classify(chunk.size));
                any = true;
            }
        }
        let _ = any;
    }

    #[test]
    fn empty_window_never_emits() {
        let mut field = MaskingField::new(MaskingParams {
            min_chunk_interval: 1,
            ..MaskingParams::default()
        })
        .unwrap();
        for _ in 0..20 {
            assert!(field.step(&[]).is_none());
        }
    }

    #[test]
    fn pool_average_matches_hand_computation() {
        let items = vec![Pattern::new(vec![1.0, 1.0]), Pattern::new(vec![3.0, 5.0])];
        let pooled = pool_average(&items).unwrap();
        assert_eq!(pooled.as_slice(), &[2.0, 3.0]);
    }

    #[test]
    fn pool_wta_picks_strongest() {
        let items = vec![Pattern::new(vec![1.0]), Pattern::new(vec![9.0])];
        let pooled = pool_winner_take_all(&items, &[0.2, 0.9]).unwrap();
        assert_eq!(pooled.as_slice(), &[9.0]);
    }

    #[test]
    fn invalid_params_rejected() {
        let params = MaskingParams {
            min_chunk_size: 5,
            max_chunk_size: 3,
            ..MaskingParams::default()
        };
        assert!(MaskingField::new(params).is_err());
    }
}
