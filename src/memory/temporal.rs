use crate::art::{ArtEngine, LearnOutcome};
use crate::error::Result;
use crate::memory::masking::{pool_average, pool_winner_take_all, MaskingField, MaskingParams, Pooling};
use crate::memory::working::{WorkingMemory, WorkingMemoryParams};
use crate::pattern::Pattern;

/// Drives the temporal path end to end: an item is inserted into working
/// memory, the masking field is stepped over the current window, and any
/// emitted chunk is pooled into a single pattern and fed to an `ArtEngine`
/// for temporal categorization.
pub struct TemporalChunker {
    memory: WorkingMemory,
    field: MaskingField,
}

impl TemporalChunker {
    pub fn new(memory_params: WorkingMemoryParams, field_params: MaskingParams) -> Result<Self> {
        Ok(Self {
            memory: WorkingMemory::new(memory_params)?,
            field: MaskingField::new(field_params)?,
        })
    }

    pub fn memory(&self) -> &WorkingMemory {
        &self.memory
    }

    pub fn field(&self) -> &MaskingField {
        &self.field
    }

    /// Inserts `item`, steps the masking field over the resulting window,
    /// and — if a chunk wins the competition — pools its items per
    /// `field.params().pooling` and runs the pooled pattern through `art`.
    /// Returns `None` when no chunk was emitted this step.
    pub fn offer(&mut self, item: Pattern, art: &mut ArtEngine) -> Result<Option<LearnOutcome>> {
        self.memory.insert(item);
        let Some(chunk) = self.field.step(self.memory.items()) else {
            return Ok(None);
        };

        let patterns: Vec<Pattern> = chunk.items.iter().map(|it| it.pattern.clone()).collect();
        let pooled = match self.field.params().pooling {
            Pooling::Average => pool_average(&patterns)?,
            Pooling::WinnerTakeAll => {
                let strengths: Vec<f32> = chunk.items.iter().map(|it| it.strength).collect();
                pool_winner_take_all(&patterns, &strengths)?
            }
        };
        Ok(Some(art.learn(&pooled)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::art::Params;
    use crate::kernel::KernelKind;

    fn art_params() -> Params {
        let mut params = Params::default();
        params.kernel = KernelKind::Fuzzy { alpha: 0.01 };
        params.vigilance = 0.5;
        params
    }

    #[test]
    fn offering_items_eventually_feeds_a_chunk_to_art() {
        let field_params = MaskingParams {
            min_chunk_interval: 1,
            ..MaskingParams::default()
        };
        let mut chunker = TemporalChunker::new(WorkingMemoryParams::default(), field_params).unwrap();
        let mut art = ArtEngine::new(art_params()).unwrap();

        let mut any_learned = false;
        for i in 0..30 {
            let v = (i % 2) as f32;
            let outcome = chunker
                .offer(Pattern::new(vec![v, 1.0 - v]), &mut art)
                .unwrap();
            if outcome.is_some() {
                any_learned = true;
            }
        }
        assert!(any_learned, "a chunk should eventually be emitted and learned");
        assert!(art.category_count() >= 1);
    }

    #[test]
    fn winner_take_all_pooling_returns_a_verbatim_item() {
        let field_params = MaskingParams {
            min_chunk_interval: 1,
            pooling: Pooling::WinnerTakeAll,
            ..MaskingParams::default()
        };
        let mut chunker = TemporalChunker::new(WorkingMemoryParams::default(), field_params).unwrap();
        let mut art = ArtEngine::new(art_params()).unwrap();

        for i in 0..30 {
            let v = (i % 2) as f32;
            chunker
                .offer(Pattern::new(vec![v, 1.0 - v]), &mut art)
                .unwrap();
        }
        assert!(art.category_count() >= 1);
    }
}
