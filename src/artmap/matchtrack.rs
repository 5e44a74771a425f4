use std::collections::HashSet;

use crate::art::{ArtEngine, LearnOutcome};
use crate::artmap::mapfield::MapField;
use crate::error::Result;
use crate::metrics::Metrics;
use crate::pattern::Pattern;

/// Result of one match-tracking cycle over a single `(input_a, b)` pair.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchTrackOutcome {
    /// `a` settled on an A-category consistent with the map-field, after
    /// `attempts` escalations (0 means the first candidate already agreed).
    Settled { a: usize, attempts: usize },
    /// `max_attempts` candidates were all inconsistent with `b`; a fresh
    /// A-category was allocated and mapped to `b`.
    Allocated { a: usize },
    /// `art_a`'s store was full and no further A-category could be created.
    CapacityExceeded,
}

/// Runs the bounded vigilance-escalation loop against `art_a` for a single
/// `(input_a, b)` association, mutating `art_a` and `map` as it commits.
///
/// State carried across attempts: the current vigilance floor `rho`
/// (starting at `baseline_vigilance`) and the set of A-ids already tried and
/// rejected by the map-field this cycle. `rho` is local to this call and is
/// never written back into `art_a`'s params, so the cycle's escalation
/// never leaks into the next one.
#[allow(clippy::too_many_arguments)]
pub fn run(
    art_a: &mut ArtEngine,
    map: &mut MapField,
    input_a: &Pattern,
    b: usize,
    baseline_vigilance: f32,
    vigilance_increment: f32,
    max_vigilance: f32,
    max_attempts: usize,
    metrics: &Metrics,
) -> Result<MatchTrackOutcome> {
    let mut rho = baseline_vigilance;
    let mut excluded: HashSet<usize> = HashSet::new();
    let mut attempts = 0usize;

    loop {
        let outcome = art_a.learn_at_vigilance(input_a, rho, &excluded)?;
        let a = match outcome {
            LearnOutcome::CapacityExceeded => return Ok(MatchTrackOutcome::CapacityExceeded),
            LearnOutcome::Success { id, .. } => id,
        };

        match map.get(a) {
            None => {
                map.set(a, b);
                return Ok(MatchTrackOutcome::Settled { a, attempts });
            }
            Some(existing) if existing == b => {
                return Ok(MatchTrackOutcome::Settled { a, attempts });
            }
            Some(_) => {
                attempts += 1;
                log::debug!(
                    "artmap: match-tracking escalation {attempts} for A-category {a} (target b={b})"
                );
                metrics.record_match_tracking_escalation();
                if attempts >= max_attempts {
                    return match art_a.force_allocate(input_a)? {
                        LearnOutcome::CapacityExceeded => Ok(MatchTrackOutcome::CapacityExceeded),
                        LearnOutcome::Success { id, .. } => {
                            map.set(id, b);
                            Ok(MatchTrackOutcome::Allocated { a: id })
                        }
                    };
                }
                let match_ratio = art_a.match_ratio_for(input_a, a);
                rho = (match_ratio + vigilance_increment).min(max_vigilance);
                excluded.insert(a);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::art::Params;
    use crate::kernel::KernelKind;

    fn pat(v: Vec<f32>) -> Pattern {
        Pattern::new(v)
    }

    fn engine(vigilance: f32) -> ArtEngine {
        let mut params = Params::default();
        params.kernel = KernelKind::Fuzzy { alpha: 0.01 };
        params.vigilance = vigilance;
        ArtEngine::new(params).unwrap()
    }

    #[test]
    fn first_candidate_agreeing_with_map_settles_immediately() {
        let mut art_a = engine(0.1);
        let mut map = MapField::new();
        let metrics = Metrics::default();

        let outcome = run(
            &mut art_a,
            &mut map,
            &pat(vec![0.8, 0.6, 0.4, 0.2]),
            7,
            0.1,
            0.05,
            0.95,
            10,
            &metrics,
        )
        .unwrap();

        assert!(matches!(outcome, MatchTrackOutcome::Settled { attempts: 0, .. }));
        assert_eq!(map.get(0), Some(7));
    }

    #[test]
    fn conflicting_map_entry_escalates_vigilance_and_allocates() {
        let mut art_a = engine(0.0);
        let mut map = MapField::new();
        let metrics = Metrics::default();

        // First association claims category 0 for b=1 at very low vigilance,
        // so any near input merges into it.
        run(
            &mut art_a,
            &mut map,
            &pat(vec![0.9, 0.9, 0.1, 0.1]),
            1,
            0.0,
            0.2,
            0.95,
            10,
            &metrics,
        )
        .unwrap();

        // A dissimilar-but-still-mergeable-at-rho=0 input now wants b=2: it
        // must be steered away from category 0 via escalation.
        let outcome = run(
            &mut art_a,
            &mut map,
            &pat(vec![0.1, 0.1, 0.9, 0.9]),
            2,
            0.0,
            0.2,
            0.95,
            10,
            &metrics,
        )
        .unwrap();

        match outcome {
            MatchTrackOutcome::Settled { a, .. } => assert_eq!(map.get(a), Some(2)),
            MatchTrackOutcome::Allocated { a } => assert_eq!(map.get(a), Some(2)),
            MatchTrackOutcome::CapacityExceeded => panic!("capacity should not be exceeded"),
        }
    }

    #[test]
    fn capacity_exhaustion_surfaces_as_capacity_exceeded() {
        let mut params = Params::default();
        params.kernel = KernelKind::Fuzzy { alpha: 0.01 };
        params.vigilance = 0.999;
        params.max_categories = 1;
        let mut art_a = ArtEngine::new(params).unwrap();
        let mut map = MapField::new();
        let metrics = Metrics::default();

        run(&mut art_a, &mut map, &pat(vec![1.0, 0.0]), 1, 0.999, 0.0, 0.999, 1, &metrics).unwrap();
        let outcome = run(
            &mut art_a,
            &mut map,
            &pat(vec![0.0, 1.0]),
            2,
            0.999,
            0.0,
            0.999,
            1,
            &metrics,
        )
        .unwrap();

        assert_eq!(outcome, MatchTrackOutcome::CapacityExceeded);
    }
}
