use crate::error::Error;

/// Dense, fixed-dimension numerical vector.
///
/// `Pattern` and `WeightVector` are the same representation at the type
/// level; the distinction is ownership, not shape. A `Pattern` arrives from
/// outside the engine on every call; a `WeightVector` is owned by exactly
/// one `Category` and mutated only by its owning step engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern(Vec<f32>);

pub type WeightVector = Pattern;

impl Pattern {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    /// Validates dimension and, when `require_unit_interval` is set (the
    /// fuzzy-min kernel's requirement), that every component lies in [0,1].
    pub fn validated(values: Vec<f32>, expected_dim: Option<usize>, require_unit_interval: bool) -> Result<Self, Error> {
        if values.is_empty() {
            return Err(Error::InvalidInput("pattern must not be empty".into()));
        }
        if let Some(d) = expected_dim {
            if values.len() != d {
                return Err(Error::InvalidInput(format!(
                    "expected dimension {d}, got {}",
                    values.len()
                )));
            }
        }
        if require_unit_interval {
            if let Some((i, v)) = values
                .iter()
                .enumerate()
                .find(|(_, v)| !(0.0..=1.0).contains(*v))
            {
                return Err(Error::InvalidInput(format!(
                    "component {i} = {v} out of [0,1] range required by fuzzy-min kernel"
                )));
            }
        }
        Ok(Self(values))
    }

    pub fn dim(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.0
    }

    pub fn get(&self, i: usize) -> f32 {
        self.0[i]
    }

    pub fn l1_norm(&self) -> f32 {
        self.0.iter().map(|v| v.abs()).sum()
    }

    pub fn l2_norm(&self) -> f32 {
        self.0.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    /// Element-wise minimum (fuzzy-AND), used by the fuzzy-ART kernel.
    pub fn fuzzy_and(&self, other: &Pattern) -> Pattern {
        debug_assert_eq!(self.dim(), other.dim());
        Pattern(
            self.0
                .iter()
                .zip(other.0.iter())
                .map(|(a, b)| a.min(*b))
                .collect(),
        )
    }

    pub fn euclidean_distance(&self, other: &Pattern) -> f32 {
        debug_assert_eq!(self.dim(), other.dim());
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f32>()
            .sqrt()
    }

    pub fn dot(&self, other: &Pattern) -> f32 {
        debug_assert_eq!(self.dim(), other.dim());
        self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
    }

    /// Interpolate toward `target` by factor `beta` in [0,1]: `self + beta*(target - self)`.
    pub fn interpolate_toward(&self, target: &Pattern, beta: f32) -> Pattern {
        debug_assert_eq!(self.dim(), target.dim());
        Pattern(
            self.0
                .iter()
                .zip(target.0.iter())
                .map(|(w, i)| beta * i + (1.0 - beta) * w)
                .collect(),
        )
    }
}

impl From<Vec<f32>> for Pattern {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_pattern() {
        assert!(Pattern::validated(vec![], None, false).is_err());
    }

    #[test]
    fn rejects_wrong_dimension() {
        assert!(Pattern::validated(vec![0.1, 0.2], Some(3), false).is_err());
    }

    #[test]
    fn rejects_out_of_unit_interval_for_fuzzy_kernel() {
        assert!(Pattern::validated(vec![0.1, 1.5], None, true).is_err());
        assert!(Pattern::validated(vec![0.1, 0.9], None, true).is_ok());
    }

    #[test]
    fn fuzzy_and_is_elementwise_min() {
        let a = Pattern::new(vec![0.2, 0.8, 0.5]);
        let b = Pattern::new(vec![0.5, 0.3, 0.9]);
        assert_eq!(a.fuzzy_and(&b).as_slice(), &[0.2, 0.3, 0.5]);
    }

    #[test]
    fn euclidean_distance_matches_hand_computation() {
        let a = Pattern::new(vec![0.0, 0.0, 0.0, 0.0]);
        let b = Pattern::new(vec![3.0, 4.0, 0.0, 0.0]);
        assert!((a.euclidean_distance(&b) - 5.0).abs() < 1e-6);
    }
}
