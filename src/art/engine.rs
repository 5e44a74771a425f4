use std::sync::Arc;
use std::time::Instant;

use crate::art::params::Params;
use crate::art::scorer;
use crate::category::CategoryStore;
use crate::error::{Error, Result};
use crate::kernel::{self, backprop, fuzzy, hypersphere, CategoryWeight, KernelKind};
use crate::metrics::{Metrics, Snapshot};
use crate::pattern::Pattern;
use crate::resonance::{self, ResonanceState};
use crate::vigilance::{self, Verdict};
use crate::workers::Pool;

/// Outcome of a `learn` call. `CapacityExceeded` is not an `Err` — it is
/// ordinary control flow a caller may react to (e.g. by widening vigilance
/// and retrying), not a caller mistake.
#[derive(Debug, Clone, PartialEq)]
pub enum LearnOutcome {
    Success { id: usize, activation: f32 },
    CapacityExceeded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredictOutcome {
    Success { id: usize, activation: f32 },
    NoMatch,
}

/// One ART network: a category store plus the kernel/vigilance machinery
/// that scores, arbitrates, and updates it. Owns (or borrows) a worker pool
/// for parallel scoring above `params.parallel_threshold`.
pub struct ArtEngine {
    params: Params,
    store: CategoryStore,
    pool: Pool,
    metrics: Metrics,
    closed: bool,
}

impl ArtEngine {
    pub fn new(params: Params) -> Result<Self> {
        params.validate()?;
        let pool = Pool::build(params.parallelism_level);
        Ok(Self {
            store: CategoryStore::new(params.max_categories),
            params,
            pool,
            metrics: Metrics::default(),
            closed: false,
        })
    }

    /// Builds an engine that borrows a caller-owned pool rather than
    /// building its own.
    pub fn with_pool(params: Params, pool: Arc<rayon::ThreadPool>) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            store: CategoryStore::new(params.max_categories),
            params,
            pool: Pool::borrowed(pool),
            metrics: Metrics::default(),
            closed: false,
        })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn category_count(&self) -> usize {
        self.store.len()
    }

    pub fn category(&self, id: usize) -> Option<&Pattern> {
        self.store.get(id).map(|c| c.weight.as_pattern())
    }

    pub fn metrics(&self) -> Snapshot {
        self.metrics.snapshot()
    }

    /// Iterates stored categories in id order. Used by persistence to write
    /// a snapshot and by diagnostics that need the full prototype set.
    pub fn categories(&self) -> impl Iterator<Item = &crate::category::Category> {
        self.store.iter()
    }

    /// Appends an already-constructed category (a specific id, weight,
    /// timestamps) rather than deriving one from a live input. Used only by
    /// persistence restore, which must reproduce a prior snapshot exactly
    /// rather than re-running `learn`.
    pub fn restore_category(&mut self, category: crate::category::Category) -> Result<()> {
        self.store.restore(category)
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Drains outstanding work, releases an owned pool, and clears caches.
    /// Idempotent — calling `close` twice is not an error.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.pool.drain();
        self.closed = true;
        log::info!("art-engine: closed with {} categories", self.store.len());
    }

    fn check_open(&self) -> Result<()> {
        if self.closed {
            Err(Error::ResourceClosed)
        } else {
            Ok(())
        }
    }

    /// One learn/predict cycle's common scoring + vigilance walk. Returns
    /// the first accepted candidate, if any.
    fn search(&self, input: &Pattern) -> Option<(usize, Verdict)> {
        self.search_excluding(input, self.params.vigilance, &std::collections::HashSet::new())
    }

    /// Generalized search used directly by ARTMAP match-tracking,
    /// which must override vigilance per attempt and exclude the candidate
    /// a prior attempt already rejected at the map-field level.
    pub(crate) fn search_excluding(
        &self,
        input: &Pattern,
        vigilance: f32,
        excluded: &std::collections::HashSet<usize>,
    ) -> Option<(usize, Verdict)> {
        let ranked = self.pool.install(|| {
            scorer::rank(
                self.params.kernel,
                input,
                &self.store,
                self.params.enable_simd,
                self.params.parallel_threshold,
            )
        });
        for candidate in ranked {
            if excluded.contains(&candidate.id) {
                continue;
            }
            let category = self.store.get(candidate.id).expect("ranked id exists");
            let verdict = vigilance::test(
                self.params.kernel,
                input,
                &category.weight,
                vigilance,
                self.params.enable_simd,
            );
            if verdict.is_accepted() {
                return Some((candidate.id, verdict));
            }
            log::debug!(
                "art-engine: vigilance rejected category {} at rho={vigilance} (match_ratio={})",
                candidate.id,
                verdict.match_ratio()
            );
            self.metrics.record_vigilance_rejection();
        }
        None
    }

    /// Match ratio of `input` against an already-existing category, without
    /// an accept/reject decision. Used by match-tracking to compute the next
    /// vigilance floor: `M(I_A, W_a) + delta_rho`.
    pub(crate) fn match_ratio_for(&self, input: &Pattern, id: usize) -> f32 {
        let category = self.store.get(id).expect("id must exist in this store");
        vigilance::test(
            self.params.kernel,
            input,
            &category.weight,
            0.0,
            self.params.enable_simd,
        )
        .match_ratio()
    }

    /// Variant of `learn` used by ARTMAP: searches with an overridden
    /// vigilance and exclusion set, then applies the normal update/allocate
    /// logic. Unlike `learn`, never reads `self.params.vigilance` directly.
    pub(crate) fn learn_at_vigilance(
        &mut self,
        input: &Pattern,
        vigilance: f32,
        excluded: &std::collections::HashSet<usize>,
    ) -> Result<LearnOutcome> {
        self.check_open()?;
        self.validate_input(input)?;
        let started = Instant::now();
        let outcome = match self.search_excluding(input, vigilance, excluded) {
            Some((id, verdict)) => {
                self.apply_update(id, input, None, None);
                LearnOutcome::Success {
                    id,
                    activation: verdict.match_ratio(),
                }
            }
            None => {
                if self.store.is_full() {
                    LearnOutcome::CapacityExceeded
                } else {
                    let weight = kernel::create_initial_weight(self.params.kernel, input);
                    let id = self
                        .store
                        .allocate(weight)
                        .expect("capacity already checked via is_full");
                    self.metrics.record_category_created();
                    LearnOutcome::Success { id, activation: 1.0 }
                }
            }
        };
        self.metrics.record_learn(started.elapsed());
        Ok(outcome)
    }

    /// Allocates a fresh category unconditionally, skipping the search/
    /// vigilance walk. Used only by ARTMAP match-tracking once it has
    /// exhausted `max_search_attempts` against the existing store and needs
    /// a new A-category regardless of what it resembles.
    pub(crate) fn force_allocate(&mut self, input: &Pattern) -> Result<LearnOutcome> {
        self.check_open()?;
        self.validate_input(input)?;
        if self.store.is_full() {
            return Ok(LearnOutcome::CapacityExceeded);
        }
        let weight = kernel::create_initial_weight(self.params.kernel, input);
        let id = self
            .store
            .allocate(weight)
            .expect("capacity already checked via is_full");
        self.metrics.record_category_created();
        Ok(LearnOutcome::Success { id, activation: 1.0 })
    }

    pub fn learn(&mut self, input: &Pattern) -> Result<LearnOutcome> {
        self.learn_with_resonance(input, None, None)
    }

    /// Full form of `learn`, accepting an optional `ResonanceState`
    /// and an optional supervised `target` activation for the backprop
    /// kernel (ignored by the fuzzy/hypersphere kernels).
    pub fn learn_with_resonance(
        &mut self,
        input: &Pattern,
        resonance: Option<&ResonanceState>,
        backprop_target: Option<f32>,
    ) -> Result<LearnOutcome> {
        self.check_open()?;
        self.validate_input(input)?;
        let started = Instant::now();

        let outcome = match self.search(input) {
            Some((id, verdict)) => {
                self.apply_update(id, input, resonance, backprop_target);
                LearnOutcome::Success {
                    id,
                    activation: verdict.match_ratio(),
                }
            }
            None => {
                if self.store.is_full() {
                    log::warn!("art-engine: capacity exceeded at {} categories", self.store.max_categories());
                    LearnOutcome::CapacityExceeded
                } else {
                    let weight = kernel::create_initial_weight(self.params.kernel, input);
                    let id = self
                        .store
                        .allocate(weight)
                        .expect("capacity already checked via is_full");
                    self.metrics.record_category_created();
                    log::info!("art-engine: allocated category {id}");
                    LearnOutcome::Success { id, activation: 1.0 }
                }
            }
        };

        self.metrics.record_learn(started.elapsed());
        Ok(outcome)
    }

    pub fn predict(&mut self, input: &Pattern) -> Result<PredictOutcome> {
        self.check_open()?;
        self.validate_input(input)?;
        self.metrics.record_predict();
        match self.search(input) {
            Some((id, verdict)) => Ok(PredictOutcome::Success {
                id,
                activation: verdict.match_ratio(),
            }),
            None => Ok(PredictOutcome::NoMatch),
        }
    }

    fn validate_input(&self, input: &Pattern) -> Result<()> {
        if input.dim() == 0 {
            return Err(Error::InvalidInput("pattern must not be empty".into()));
        }
        if let Some(first) = self.store.get(0) {
            if first.weight.dim() != input.dim() {
                return Err(Error::InvalidInput(format!(
                    "expected dimension {}, got {}",
                    first.weight.dim(),
                    input.dim()
                )));
            }
        }
        if matches!(self.params.kernel, KernelKind::Fuzzy { .. }) {
            if let Some(bad) = input.as_slice().iter().find(|v| !(0.0..=1.0).contains(*v)) {
                return Err(Error::InvalidInput(format!(
                    "component {bad} out of [0,1] range required by fuzzy-min kernel"
                )));
            }
        }
        Ok(())
    }

    fn apply_update(
        &mut self,
        id: usize,
        input: &Pattern,
        resonance_state: Option<&ResonanceState>,
        backprop_target: Option<f32>,
    ) {
        let rate = resonance::gate_learning_rate(
            resonance_state,
            self.params.resonance_threshold,
            self.params.learning_rate,
        );
        let Some(beta) = rate else {
            // Resonance gating suppressed this update entirely.
            return;
        };
        let category = self.store.get_mut(id).expect("id returned by search");
        category.weight = match &category.weight {
            CategoryWeight::Fuzzy(w) => {
                CategoryWeight::Fuzzy(fuzzy::update_weight(input, w, beta))
            }
            CategoryWeight::Hypersphere { centroid, radius } => {
                let new_centroid = hypersphere::update_centroid(centroid, input, beta);
                let r_max = match self.params.kernel {
                    KernelKind::Hypersphere { r_max } => r_max,
                    _ => unreachable!("hypersphere category implies hypersphere kernel"),
                };
                let new_radius = hypersphere::grown_radius(&new_centroid, input, *radius, r_max);
                CategoryWeight::Hypersphere {
                    centroid: new_centroid,
                    radius: new_radius,
                }
            }
            CategoryWeight::Backprop(state) => {
                let target = backprop_target.unwrap_or(1.0);
                CategoryWeight::Backprop(backprop::update(
                    input,
                    state,
                    target,
                    beta,
                    0.9,
                    1e-4,
                    0.0,
                    self.params.enable_simd,
                ))
            }
        };
        category.update_count += 1;
        category.last_activation = 1.0;
    }
}

impl Drop for ArtEngine {
    fn drop(&mut self) {
        self.close();
    }
}
