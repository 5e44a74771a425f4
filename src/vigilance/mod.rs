use crate::kernel::{self, fuzzy, hypersphere, CategoryWeight, KernelKind};
use crate::pattern::Pattern;

/// Outcome of testing a candidate category against the current vigilance.
/// Never mutates weights — the arbiter is a pure predicate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Accepted { match_ratio: f32, rho: f32 },
    Rejected { match_ratio: f32, rho: f32 },
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted { .. })
    }

    pub fn match_ratio(&self) -> f32 {
        match self {
            Verdict::Accepted { match_ratio, .. } | Verdict::Rejected { match_ratio, .. } => {
                *match_ratio
            }
        }
    }
}

/// Tests `input` against `weight` under `kind`'s matching rule and `rho`.
pub fn test(kind: KernelKind, input: &Pattern, weight: &CategoryWeight, rho: f32, use_simd: bool) -> Verdict {
    match (kind, weight) {
        (KernelKind::Fuzzy { .. }, CategoryWeight::Fuzzy(w)) => {
            let m = fuzzy::match_ratio(input, w, use_simd);
            if m >= rho {
                Verdict::Accepted { match_ratio: m, rho }
            } else {
                Verdict::Rejected { match_ratio: m, rho }
            }
        }
        (KernelKind::Hypersphere { r_max }, CategoryWeight::Hypersphere { centroid, .. }) => {
            let d = hypersphere::distance(input, centroid, use_simd);
            let accept = hypersphere::accepts(input, centroid, r_max, rho, use_simd);
            // Express the hypersphere match on the same [0,1]-larger-is-better
            // scale as the fuzzy variant, so callers can compare uniformly:
            // m = 1 - d/R_max, accepted iff m >= rho.
            let m = (1.0 - d / r_max).max(0.0);
            debug_assert_eq!(accept, m >= rho || d <= r_max * (1.0 - rho));
            if accept {
                Verdict::Accepted { match_ratio: m, rho }
            } else {
                Verdict::Rejected { match_ratio: m, rho }
            }
        }
        (KernelKind::Backprop, CategoryWeight::Backprop(b)) => {
            let m = kernel::activation(KernelKind::Backprop, input, &CategoryWeight::Backprop(b.clone()), use_simd);
            if m >= rho {
                Verdict::Accepted { match_ratio: m, rho }
            } else {
                Verdict::Rejected { match_ratio: m, rho }
            }
        }
        _ => unreachable!("category weight variant must match engine kernel kind"),
    }
}
