use crate::error::{Error, Result};
use crate::shunting::lateral;
use crate::shunting::params::ShuntingParams;

/// On-center/off-surround competitive field over `d` neurons. Holds
/// only the committed activation vector; `excitatory`/`inhibitory` drive is
/// a per-step input passed in fresh on each `update`/`has_converged` call,
/// never stored between steps.
#[derive(Debug, Clone)]
pub struct NeuronArray {
    params: ShuntingParams,
    activations: Vec<f32>,
}

impl NeuronArray {
    pub fn new(params: ShuntingParams, dim: usize) -> Result<Self> {
        params.validate()?;
        if dim == 0 {
            return Err(Error::InvalidInput("dim must be positive".into()));
        }
        Ok(Self {
            activations: vec![params.initial_activation; dim],
            params,
        })
    }

    pub fn len(&self) -> usize {
        self.activations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activations.is_empty()
    }

    pub fn activations(&self) -> &[f32] {
        &self.activations
    }

    pub fn reset(&mut self) {
        self.activations.fill(self.params.initial_activation);
    }

    /// Advances the field by one Euler step under the given external drive,
    /// clamping every component to `[floor, ceiling]`. Parallelizes across
    /// the index range via work-stealing fork/join once `len()` exceeds
    /// `params.parallel_threshold`.
    pub fn update(&mut self, excitatory: &[f32], inhibitory: &[f32]) -> Result<()> {
        self.check_drive_shapes(excitatory, inhibitory)?;
        let mut next = vec![0.0f32; self.activations.len()];
        fill_range(
            &self.activations,
            excitatory,
            inhibitory,
            &self.params,
            &mut next,
            0,
        );
        self.activations = next;
        Ok(())
    }

    /// Side-effect-free convergence probe: one
    /// trial Euler step is computed into a scratch buffer and compared
    /// against the committed state. `self` is never mutated.
    pub fn has_converged(
        &self,
        excitatory: &[f32],
        inhibitory: &[f32],
        tolerance: f32,
    ) -> Result<bool> {
        self.check_drive_shapes(excitatory, inhibitory)?;
        let mut scratch = vec![0.0f32; self.activations.len()];
        fill_range(
            &self.activations,
            excitatory,
            inhibitory,
            &self.params,
            &mut scratch,
            0,
        );
        let max_delta = self
            .activations
            .iter()
            .zip(scratch.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f32, f32::max);
        Ok(max_delta < tolerance)
    }

    fn check_drive_shapes(&self, excitatory: &[f32], inhibitory: &[f32]) -> Result<()> {
        if excitatory.len() != self.activations.len() || inhibitory.len() != self.activations.len()
        {
            return Err(Error::InvalidInput(format!(
                "excitatory/inhibitory drive must have length {}",
                self.activations.len()
            )));
        }
        Ok(())
    }
}

/// One neuron's next-state computation: on-center excitatory drive minus
/// off-surround inhibitory drive, shunted against the bounded range.
fn compute_one(
    i: usize,
    current: &[f32],
    ext_exc: &[f32],
    ext_inh: &[f32],
    params: &ShuntingParams,
) -> f32 {
    let x_i = current[i];
    let mut exc = params.self_excitation * x_i;
    let mut inh = 0.0f32;
    for (j, &x_j) in current.iter().enumerate() {
        if j == i {
            continue;
        }
        let dist = (i as f32 - j as f32).abs();
        exc += lateral::gaussian(dist, params.exc_range) * params.exc_strength * x_j;
        inh += lateral::gaussian(dist, params.inh_range) * params.inh_strength * x_j;
    }
    exc += ext_exc[i];
    inh += ext_inh[i];
    let s_plus = exc.max(0.0);
    let s_minus = inh.max(0.0);
    let dx = -params.decay * x_i + (params.ceiling - x_i) * s_plus - (x_i - params.floor) * s_minus;
    (x_i + params.time_step * dx).clamp(params.floor, params.ceiling)
}

/// Fills `out[lo..lo+out.len()]`'s worth of next-state values, bisecting the
/// range via `rayon::join` once it is larger than `parallel_threshold` — the
/// same divide-until-small-enough shape used for the category-store bound
/// recomputation this crate's ART scorer is modeled on.
fn fill_range(
    current: &[f32],
    ext_exc: &[f32],
    ext_inh: &[f32],
    params: &ShuntingParams,
    out: &mut [f32],
    lo: usize,
) {
    if out.len() <= params.parallel_threshold {
        for (offset, slot) in out.iter_mut().enumerate() {
            *slot = compute_one(lo + offset, current, ext_exc, ext_inh, params);
        }
        return;
    }
    let mid = out.len() / 2;
    let (left, right) = out.split_at_mut(mid);
    rayon::join(
        || fill_range(current, ext_exc, ext_inh, params, left, lo),
        || fill_range(current, ext_exc, ext_inh, params, right, lo + mid),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ShuntingParams {
        ShuntingParams {
            parallel_threshold: 2,
            ..ShuntingParams::default()
        }
    }

    #[test]
    fn stays_within_floor_and_ceiling() {
        let mut field = NeuronArray::new(params(), 7).unwrap();
        let exc = vec![0.3, 0.4, 1.0, 0.4, 0.3, 0.2, 0.2];
        let inh = vec![0.0; 7];
        for _ in 0..200 {
            field.update(&exc, &inh).unwrap();
            for &x in field.activations() {
                assert!(x >= field.params.floor && x <= field.params.ceiling);
            }
        }
    }

    #[test]
    fn has_converged_does_not_mutate_state() {
        let mut field = NeuronArray::new(params(), 5).unwrap();
        let exc = vec![0.2, 0.2, 0.2, 0.2, 0.2];
        let inh = vec![0.0; 5];
        for _ in 0..50 {
            field.update(&exc, &inh).unwrap();
        }
        let before = field.activations().to_vec();
        let _ = field.has_converged(&exc, &inh, 1e-6).unwrap();
        assert_eq!(field.activations(), before.as_slice());
    }

    #[test]
    fn parallel_update_matches_sequential_within_tolerance() {
        let exc = vec![0.3, 0.4, 1.0, 0.4, 0.3, 0.2, 0.2];
        let inh = vec![0.0; 7];

        let mut parallel = NeuronArray::new(
            ShuntingParams {
                parallel_threshold: 1,
                ..ShuntingParams::default()
            },
            7,
        )
        .unwrap();
        let mut sequential = NeuronArray::new(
            ShuntingParams {
                parallel_threshold: usize::MAX,
                ..ShuntingParams::default()
            },
            7,
        )
        .unwrap();

        for _ in 0..200 {
            parallel.update(&exc, &inh).unwrap();
            sequential.update(&exc, &inh).unwrap();
        }

        for (p, s) in parallel.activations().iter().zip(sequential.activations()) {
            assert!((p - s).abs() < 1e-10);
        }
    }

    #[test]
    fn peak_input_wins_central_neurons() {
        let mut field = NeuronArray::new(params(), 7).unwrap();
        let exc = vec![0.3, 0.4, 1.0, 0.4, 0.3, 0.2, 0.2];
        let inh = vec![0.0; 7];
        for _ in 0..200 {
            field.update(&exc, &inh).unwrap();
        }
        let (max_idx, _) = field
            .activations()
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .unwrap();
        assert!((1..=3).contains(&max_idx));
    }

    #[test]
    fn rejects_mismatched_drive_length() {
        let mut field = NeuronArray::new(params(), 4).unwrap();
        let bad = vec![0.0; 3];
        let ok = vec![0.0; 4];
        assert!(field.update(&bad, &ok).is_err());
    }
}
