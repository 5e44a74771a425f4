use crate::art::{ArtEngine, LearnOutcome, Params, PredictOutcome};
use crate::artmap::mapfield::MapField;
use crate::artmap::matchtrack::{self, MatchTrackOutcome};
use crate::error::{Error, Result};
use crate::metrics::{Metrics, Snapshot};
use crate::pattern::Pattern;
use serde::{Deserialize, Serialize};

/// ARTMAP-specific tuning layered over the two underlying ART engines'
/// `Params`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapParams {
    /// Vigilance ART_A starts each training cycle at (`rho_0`).
    pub baseline_vigilance: f32,
    /// `delta_rho`, added to the rejected candidate's match ratio each
    /// escalation.
    pub vigilance_increment: f32,
    /// Ceiling `rho` is clamped to; reaching it does not stop escalation,
    /// it only stops raising further.
    pub max_vigilance: f32,
    /// Bound on escalation attempts per training pair before a fresh
    /// A-category is forced.
    pub max_search_attempts: usize,
}

impl Default for MapParams {
    fn default() -> Self {
        Self {
            baseline_vigilance: 0.5,
            vigilance_increment: 0.05,
            max_vigilance: 0.999,
            max_search_attempts: 20,
        }
    }
}

impl MapParams {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.baseline_vigilance) {
            return Err(Error::InvalidParameters(format!(
                "baseline_vigilance must be in [0,1], got {}",
                self.baseline_vigilance
            )));
        }
        if self.vigilance_increment <= 0.0 {
            return Err(Error::InvalidParameters(
                "vigilance_increment must be > 0".into(),
            ));
        }
        if !(self.baseline_vigilance..=1.0).contains(&self.max_vigilance) {
            return Err(Error::InvalidParameters(
                "max_vigilance must be in [baseline_vigilance, 1]".into(),
            ));
        }
        if self.max_search_attempts == 0 {
            return Err(Error::InvalidParameters(
                "max_search_attempts must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Outcome of one `train` call.
#[derive(Debug, Clone, PartialEq)]
pub enum TrainOutcome {
    Success { a: usize, b: usize, attempts: usize },
    CapacityExceeded,
}

/// Outcome of one `predict` call: ART_A resonates with `a`, and the
/// map-field's association (if any) is reported alongside ART_A's own
/// confidence in `a`.
#[derive(Debug, Clone, PartialEq)]
pub enum MapPredictOutcome {
    Success { a: usize, b: Option<usize>, activation: f32 },
    NoMatch,
}

/// Two ART networks bound by a many-to-one map-field, trained by bounded
/// vigilance-escalation match-tracking on ART_A whenever its candidate
/// disagrees with the map-field's existing association.
pub struct ArtMapEngine {
    art_a: ArtEngine,
    art_b: ArtEngine,
    map: MapField,
    map_params: MapParams,
    metrics: Metrics,
}

impl ArtMapEngine {
    pub fn new(params_a: Params, params_b: Params, map_params: MapParams) -> Result<Self> {
        map_params.validate()?;
        Ok(Self {
            art_a: ArtEngine::new(params_a)?,
            art_b: ArtEngine::new(params_b)?,
            map: MapField::new(),
            map_params,
            metrics: Metrics::default(),
        })
    }

    /// Assembles an engine from already-built parts. Used only by
    /// persistence restore, which reconstructs `art_a`/`art_b` from a
    /// snapshot rather than starting from empty stores.
    pub(crate) fn from_parts(
        art_a: ArtEngine,
        art_b: ArtEngine,
        map: MapField,
        map_params: MapParams,
    ) -> Result<Self> {
        map_params.validate()?;
        Ok(Self {
            art_a,
            art_b,
            map,
            map_params,
            metrics: Metrics::default(),
        })
    }

    pub fn map_params(&self) -> &MapParams {
        &self.map_params
    }

    pub fn art_a(&self) -> &ArtEngine {
        &self.art_a
    }

    pub fn art_b(&self) -> &ArtEngine {
        &self.art_b
    }

    pub fn map_field(&self) -> &MapField {
        &self.map
    }

    pub fn metrics(&self) -> Snapshot {
        self.metrics.snapshot()
    }

    pub fn clear(&mut self) {
        self.art_a.clear();
        self.art_b.clear();
        self.map.clear();
    }

    /// Trains one `(input_a, input_b)` association: ART_B learns `input_b`
    /// unconditionally (its own vigilance, no match-tracking), then ART_A is
    /// driven by match-tracking until its candidate agrees with the
    /// map-field's record for the resulting `b`.
    pub fn train(&mut self, input_a: &Pattern, input_b: &Pattern) -> Result<TrainOutcome> {
        let b = match self.art_b.learn(input_b)? {
            LearnOutcome::Success { id, .. } => id,
            LearnOutcome::CapacityExceeded => return Ok(TrainOutcome::CapacityExceeded),
        };

        let outcome = matchtrack::run(
            &mut self.art_a,
            &mut self.map,
            input_a,
            b,
            self.map_params.baseline_vigilance,
            self.map_params.vigilance_increment,
            self.map_params.max_vigilance,
            self.map_params.max_search_attempts,
            &self.metrics,
        )?;

        Ok(match outcome {
            MatchTrackOutcome::Settled { a, attempts } => TrainOutcome::Success { a, b, attempts },
            MatchTrackOutcome::Allocated { a } => TrainOutcome::Success {
                a,
                b,
                attempts: self.map_params.max_search_attempts,
            },
            MatchTrackOutcome::CapacityExceeded => TrainOutcome::CapacityExceeded,
        })
    }

    /// Predicts `b` for `input_a` by resonating ART_A alone (no learning)
    /// and following the map-field association, if one exists, for the
    /// winning A-category.
    pub fn predict(&mut self, input_a: &Pattern) -> Result<MapPredictOutcome> {
        match self.art_a.predict(input_a)? {
            PredictOutcome::Success { id, activation } => Ok(MapPredictOutcome::Success {
                a: id,
                b: self.map.get(id),
                activation,
            }),
            PredictOutcome::NoMatch => Ok(MapPredictOutcome::NoMatch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::KernelKind;

    fn pat(v: Vec<f32>) -> Pattern {
        Pattern::new(v)
    }

    fn fuzzy_params(vigilance: f32) -> Params {
        let mut p = Params::default();
        p.kernel = KernelKind::Fuzzy { alpha: 0.01 };
        p.vigilance = vigilance;
        p
    }

    #[test]
    fn train_then_predict_recovers_association() {
        let mut engine = ArtMapEngine::new(
            fuzzy_params(0.7),
            fuzzy_params(0.7),
            MapParams::default(),
        )
        .unwrap();

        let a1 = pat(vec![0.9, 0.8, 0.1, 0.2]);
        let b1 = pat(vec![1.0, 0.0]);
        let outcome = engine.train(&a1, &b1).unwrap();
        assert!(matches!(outcome, TrainOutcome::Success { .. }));

        let predicted = engine.predict(&a1).unwrap();
        match predicted {
            MapPredictOutcome::Success { b, .. } => assert_eq!(b, Some(0)),
            MapPredictOutcome::NoMatch => panic!("expected a match for the trained input"),
        }
    }

    #[test]
    fn distinct_classes_map_to_distinct_b_categories() {
        let mut engine = ArtMapEngine::new(
            fuzzy_params(0.7),
            fuzzy_params(0.7),
            MapParams::default(),
        )
        .unwrap();

        engine
            .train(&pat(vec![0.9, 0.9, 0.1, 0.1]), &pat(vec![1.0, 0.0]))
            .unwrap();
        engine
            .train(&pat(vec![0.1, 0.1, 0.9, 0.9]), &pat(vec![0.0, 1.0]))
            .unwrap();

        assert_eq!(engine.art_b().category_count(), 2);
        let p1 = engine.predict(&pat(vec![0.9, 0.9, 0.1, 0.1])).unwrap();
        let p2 = engine.predict(&pat(vec![0.1, 0.1, 0.9, 0.9])).unwrap();
        match (p1, p2) {
            (
                MapPredictOutcome::Success { b: b1, .. },
                MapPredictOutcome::Success { b: b2, .. },
            ) => assert_ne!(b1, b2),
            _ => panic!("expected both inputs to resonate"),
        }
    }

    #[test]
    fn invalid_map_params_are_rejected() {
        let mut bad = MapParams::default();
        bad.vigilance_increment = 0.0;
        let result = ArtMapEngine::new(fuzzy_params(0.7), fuzzy_params(0.7), bad);
        assert!(result.is_err());
    }
}
