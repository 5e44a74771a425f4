use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Tuning for a `TransmitterArray`'s habituation ODE.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransmitterParams {
    pub recovery: f32,
    pub linear_depletion: f32,
    pub quadratic_depletion: f32,
    pub baseline: f32,
    pub time_step: f32,
}

impl Default for TransmitterParams {
    fn default() -> Self {
        Self {
            recovery: 0.1,
            linear_depletion: 0.5,
            quadratic_depletion: 0.0,
            baseline: 1.0,
            time_step: 0.01,
        }
    }
}

impl TransmitterParams {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.baseline) {
            return Err(Error::InvalidParameters(
                "baseline must be in [0,1]".into(),
            ));
        }
        if self.recovery < 0.0 {
            return Err(Error::InvalidParameters("recovery must be >= 0".into()));
        }
        if self.linear_depletion < 0.0 || self.quadratic_depletion < 0.0 {
            return Err(Error::InvalidParameters(
                "depletion coefficients must be >= 0".into(),
            ));
        }
        if self.time_step <= 0.0 {
            return Err(Error::InvalidParameters("time_step must be > 0".into()));
        }
        Ok(())
    }
}

/// Per-channel habituation gate `Z_i in [0,1]`. Depletes under signal
/// use and recovers toward 1 at rest.
#[derive(Debug, Clone)]
pub struct TransmitterArray {
    params: TransmitterParams,
    gates: Vec<f32>,
}

impl TransmitterArray {
    pub fn new(params: TransmitterParams, dim: usize) -> Result<Self> {
        params.validate()?;
        if dim == 0 {
            return Err(Error::InvalidInput("dim must be positive".into()));
        }
        Ok(Self {
            gates: vec![params.baseline; dim],
            params,
        })
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    pub fn gates(&self) -> &[f32] {
        &self.gates
    }

    pub fn reset(&mut self) {
        self.gates.fill(self.params.baseline);
    }

    /// Advances every channel's gate by one Euler step under signal vector
    /// `signals` (non-negative): `dZ_i/dt = eps(1-Z_i) - Z_i(lambda*s_i + mu*s_i^2)`.
    pub fn update(&mut self, signals: &[f32]) -> Result<()> {
        if signals.len() != self.gates.len() {
            return Err(Error::InvalidInput(format!(
                "signals must have length {}",
                self.gates.len()
            )));
        }
        for (z, &s) in self.gates.iter_mut().zip(signals) {
            let depletion = *z * (self.params.linear_depletion * s
                + self.params.quadratic_depletion * s * s);
            let recovery = self.params.recovery * (1.0 - *z);
            *z = (*z + self.params.time_step * (recovery - depletion)).clamp(0.0, 1.0);
        }
        Ok(())
    }

    /// Multiplicative gating of a parallel activation vector `x`: `y_i = x_i * Z_i`.
    pub fn gate(&self, x: &[f32]) -> Result<Vec<f32>> {
        if x.len() != self.gates.len() {
            return Err(Error::InvalidInput(format!(
                "x must have length {}",
                self.gates.len()
            )));
        }
        Ok(x.iter().zip(&self.gates).map(|(xi, zi)| xi * zi).collect())
    }

    /// Blends every gate toward `baseline` by factor `f in [0,1]` and
    /// returns the factor `(1-f)` signals should be scaled by going forward.
    pub fn partial_reset(&mut self, f: f32) -> Result<f32> {
        if !(0.0..=1.0).contains(&f) {
            return Err(Error::InvalidParameters(
                "partial_reset factor must be in [0,1]".into(),
            ));
        }
        for z in self.gates.iter_mut() {
            *z += f * (self.params.baseline - *z);
        }
        Ok(1.0 - f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sustained_signal_depletes_gate() {
        let mut gates = TransmitterArray::new(TransmitterParams::default(), 3).unwrap();
        let signal = vec![1.0, 1.0, 1.0];
        let before = gates.gates().to_vec();
        for _ in 0..100 {
            gates.update(&signal).unwrap();
        }
        for (b, a) in before.iter().zip(gates.gates()) {
            assert!(a < b);
        }
    }

    #[test]
    fn zero_signal_recovers_toward_baseline() {
        let params = TransmitterParams {
            baseline: 1.0,
            ..TransmitterParams::default()
        };
        let mut gates = TransmitterArray::new(params, 2).unwrap();
        gates.update(&[1.0, 1.0]).unwrap();
        let depleted = gates.gates()[0];
        for _ in 0..500 {
            gates.update(&[0.0, 0.0]).unwrap();
        }
        assert!(gates.gates()[0] > depleted);
        assert!((gates.gates()[0] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn gate_multiplies_elementwise() {
        let gates = TransmitterArray::new(TransmitterParams::default(), 2).unwrap();
        let y = gates.gate(&[2.0, 4.0]).unwrap();
        assert_eq!(y, vec![2.0, 4.0]);
    }

    #[test]
    fn partial_reset_blends_toward_baseline() {
        let params = TransmitterParams {
            baseline: 1.0,
            ..TransmitterParams::default()
        };
        let mut gates = TransmitterArray::new(params, 1).unwrap();
        for _ in 0..50 {
            gates.update(&[1.0]).unwrap();
        }
        let depleted = gates.gates()[0];
        let scale = gates.partial_reset(0.5).unwrap();
        assert_eq!(scale, 0.5);
        assert!(gates.gates()[0] > depleted);
        assert!(gates.gates()[0] < 1.0);
    }
}
