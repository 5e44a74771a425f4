use crate::error::Error;
use crate::kernel::KernelKind;
use serde::{Deserialize, Serialize};

/// Per-call and per-engine tuning for the ART step engine. `kernel` picks
/// the variant; the remaining fields are the shared vigilance, learning-rate,
/// and search knobs every variant reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Params {
    pub kernel: KernelKind,
    pub vigilance: f32,
    pub learning_rate: f32,
    pub alpha: f32,
    pub max_categories: usize,
    pub enable_simd: bool,
    pub parallelism_level: usize,
    pub parallel_threshold: usize,
    pub max_cache_size: usize,
    /// Threshold `tau` for resonance-gated learning; irrelevant when
    /// `learn` is called without a `ResonanceState`.
    pub resonance_threshold: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            kernel: KernelKind::Fuzzy { alpha: 0.01 },
            vigilance: 0.75,
            learning_rate: 0.5,
            alpha: 0.01,
            max_categories: 1000,
            enable_simd: true,
            parallelism_level: num_cpus::get(),
            parallel_threshold: 64,
            max_cache_size: 4096,
            resonance_threshold: 0.5,
        }
    }
}

impl Params {
    pub fn validate(&self) -> Result<(), Error> {
        if !(0.0..=1.0).contains(&self.vigilance) {
            return Err(Error::InvalidParameters(format!(
                "vigilance must be in [0,1], got {}",
                self.vigilance
            )));
        }
        if !(0.0..=1.0).contains(&self.learning_rate) || self.learning_rate <= 0.0 {
            return Err(Error::InvalidParameters(format!(
                "learning_rate must be in (0,1], got {}",
                self.learning_rate
            )));
        }
        if self.alpha <= 0.0 {
            return Err(Error::InvalidParameters(format!(
                "alpha must be > 0, got {}",
                self.alpha
            )));
        }
        if self.max_categories == 0 {
            return Err(Error::InvalidParameters(
                "max_categories must be positive".into(),
            ));
        }
        if self.parallelism_level == 0 {
            return Err(Error::InvalidParameters(
                "parallelism_level must be positive".into(),
            ));
        }
        if let KernelKind::Hypersphere { r_max } = self.kernel {
            if r_max <= 0.0 {
                return Err(Error::InvalidParameters(format!(
                    "r_max must be > 0, got {r_max}"
                )));
            }
        }
        Ok(())
    }
}
