pub mod backprop;
pub mod fuzzy;
pub mod hypersphere;
pub mod simd;

pub use backprop::BackpropWeight;

use crate::pattern::Pattern;
use serde::{Deserialize, Serialize};

/// The closed set of ART variants, dispatched from a single selection step
/// rather than an open subclass hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum KernelKind {
    Fuzzy { alpha: f32 },
    Hypersphere { r_max: f32 },
    Backprop,
}

impl KernelKind {
    /// Persistence header variant code.
    pub fn variant_code(&self) -> u8 {
        match self {
            KernelKind::Fuzzy { .. } => 0,
            KernelKind::Hypersphere { .. } => 1,
            KernelKind::Backprop => 2,
        }
    }
}

/// A category's learned state, shaped by which `KernelKind` owns it. Fuzzy
/// and hypersphere categories are a bare prototype; hypersphere additionally
/// tracks a grown radius; backprop categories carry bias and momentum state.
#[derive(Debug, Clone)]
pub enum CategoryWeight {
    Fuzzy(Pattern),
    Hypersphere { centroid: Pattern, radius: f32 },
    Backprop(BackpropWeight),
}

impl CategoryWeight {
    pub fn dim(&self) -> usize {
        match self {
            CategoryWeight::Fuzzy(p) => p.dim(),
            CategoryWeight::Hypersphere { centroid, .. } => centroid.dim(),
            CategoryWeight::Backprop(b) => b.weight.dim(),
        }
    }

    /// A read-only view of the raw numeric prototype, for callers (e.g.
    /// persistence, `category(i)`) that only need the vector.
    pub fn as_pattern(&self) -> &Pattern {
        match self {
            CategoryWeight::Fuzzy(p) => p,
            CategoryWeight::Hypersphere { centroid, .. } => centroid,
            CategoryWeight::Backprop(b) => &b.weight,
        }
    }
}

/// Activation `T` for a candidate category under the given kernel.
pub fn activation(kind: KernelKind, input: &Pattern, weight: &CategoryWeight, use_simd: bool) -> f32 {
    match (kind, weight) {
        (KernelKind::Fuzzy { alpha }, CategoryWeight::Fuzzy(w)) => {
            fuzzy::choice(input, w, alpha, use_simd)
        }
        (KernelKind::Hypersphere { r_max }, CategoryWeight::Hypersphere { centroid, .. }) => {
            hypersphere::activation(input, centroid, r_max, use_simd)
        }
        (KernelKind::Backprop, CategoryWeight::Backprop(b)) => backprop::activation(input, b, use_simd),
        _ => unreachable!("category weight variant must match engine kernel kind"),
    }
}

pub fn create_initial_weight(kind: KernelKind, input: &Pattern) -> CategoryWeight {
    match kind {
        KernelKind::Fuzzy { .. } => CategoryWeight::Fuzzy(fuzzy::create_initial_weight(input)),
        KernelKind::Hypersphere { .. } => CategoryWeight::Hypersphere {
            centroid: hypersphere::create_initial_weight(input),
            radius: 0.0,
        },
        KernelKind::Backprop => CategoryWeight::Backprop(backprop::create_initial_weight(input)),
    }
}
