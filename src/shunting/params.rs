use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Tuning for a `NeuronArray`'s Euler integration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShuntingParams {
    pub ceiling: f32,
    pub floor: f32,
    pub decay: f32,
    pub self_excitation: f32,
    pub exc_strength: f32,
    pub exc_range: f32,
    pub inh_strength: f32,
    pub inh_range: f32,
    pub time_step: f32,
    pub initial_activation: f32,
    /// Above this neuron count, `update` bisects the index range via
    /// `rayon::join` instead of updating in a single sequential pass.
    pub parallel_threshold: usize,
}

impl Default for ShuntingParams {
    fn default() -> Self {
        Self {
            ceiling: 1.0,
            floor: -1.0,
            decay: 0.1,
            self_excitation: 0.0,
            exc_strength: 1.0,
            exc_range: 1.0,
            inh_strength: 1.0,
            inh_range: 3.0,
            time_step: 0.01,
            initial_activation: 0.0,
            parallel_threshold: 32,
        }
    }
}

impl ShuntingParams {
    pub fn validate(&self) -> Result<(), Error> {
        if self.ceiling <= self.floor {
            return Err(Error::InvalidParameters(format!(
                "ceiling ({}) must be > floor ({})",
                self.ceiling, self.floor
            )));
        }
        if self.decay < 0.0 {
            return Err(Error::InvalidParameters("decay must be >= 0".into()));
        }
        if self.time_step <= 0.0 {
            return Err(Error::InvalidParameters("time_step must be > 0".into()));
        }
        if !(self.floor..=self.ceiling).contains(&self.initial_activation) {
            return Err(Error::InvalidParameters(
                "initial_activation must lie within [floor, ceiling]".into(),
            ));
        }
        if self.exc_range <= 0.0 || self.inh_range <= 0.0 {
            return Err(Error::InvalidParameters(
                "exc_range and inh_range must be > 0".into(),
            ));
        }
        Ok(())
    }
}
