use super::vector::Pattern;
use crate::error::Error;

/// A pattern of dimension `2d` formed by appending `1 - p_i` after min-max
/// normalization, giving fuzzy-ART a stable L1 norm (`|I|_1 == d` for any
/// input, once normalized and complement-coded).
#[derive(Debug, Clone, PartialEq)]
pub struct ComplementCodedPattern(Pattern);

impl ComplementCodedPattern {
    /// Min-max normalizes `raw` against `(lo, hi)` per-component bounds, then
    /// appends the complement. `lo`/`hi` may be scalars shared across all
    /// components (the common case: known sensor range) or per-component.
    pub fn encode(raw: &[f32], lo: f32, hi: f32) -> Result<Self, Error> {
        if raw.is_empty() {
            return Err(Error::InvalidInput("pattern must not be empty".into()));
        }
        if hi <= lo {
            return Err(Error::InvalidParameters(format!(
                "normalization range must satisfy hi > lo, got lo={lo} hi={hi}"
            )));
        }
        let span = hi - lo;
        let normalized: Vec<f32> = raw
            .iter()
            .map(|v| ((v - lo) / span).clamp(0.0, 1.0))
            .collect();
        let mut coded = normalized.clone();
        coded.extend(normalized.iter().map(|v| 1.0 - v));
        Ok(Self(Pattern::new(coded)))
    }

    pub fn inner(&self) -> &Pattern {
        &self.0
    }

    pub fn into_inner(self) -> Pattern {
        self.0
    }

    pub fn dim(&self) -> usize {
        self.0.dim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complement_coding_doubles_dimension_and_sums_to_one_per_pair() {
        let cc = ComplementCodedPattern::encode(&[0.8, 0.6, 0.4], 0.0, 1.0).unwrap();
        assert_eq!(cc.dim(), 6);
        let s = cc.inner().as_slice();
        for i in 0..3 {
            assert!((s[i] + s[i + 3] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn rejects_degenerate_range() {
        assert!(ComplementCodedPattern::encode(&[0.1, 0.2], 1.0, 1.0).is_err());
    }
}
