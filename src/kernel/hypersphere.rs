use crate::kernel::simd;
use crate::pattern::Pattern;

/// `T = max(0, 1 - d(I,W)/R_max)`.
pub fn activation(input: &Pattern, centroid: &Pattern, r_max: f32, use_simd: bool) -> f32 {
    let d = simd::euclidean_distance(input.as_slice(), centroid.as_slice(), use_simd);
    (1.0 - d / r_max).max(0.0)
}

/// Accept iff `d(I,W) <= R_max * (1 - rho)`.
pub fn accepts(input: &Pattern, centroid: &Pattern, r_max: f32, rho: f32, use_simd: bool) -> bool {
    let d = simd::euclidean_distance(input.as_slice(), centroid.as_slice(), use_simd);
    d <= r_max * (1.0 - rho)
}

pub fn distance(input: &Pattern, centroid: &Pattern, use_simd: bool) -> f32 {
    simd::euclidean_distance(input.as_slice(), centroid.as_slice(), use_simd)
}

/// Moves the centroid toward `input` by `beta`; the category's radius (kept
/// alongside the centroid by the caller) is grown separately to cover the
/// new point, up to `r_max`.
pub fn update_centroid(centroid: &Pattern, input: &Pattern, beta: f32) -> Pattern {
    centroid.interpolate_toward(input, beta)
}

/// `max(current_radius, min(r_max, d(input, new_centroid)))`.
pub fn grown_radius(new_centroid: &Pattern, input: &Pattern, current_radius: f32, r_max: f32) -> f32 {
    let needed = new_centroid.euclidean_distance(input);
    current_radius.max(needed).min(r_max)
}

pub fn create_initial_weight(input: &Pattern) -> Pattern {
    input.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_within_radius_limit() {
        let a = Pattern::new(vec![0.0, 0.0, 0.0, 0.0]);
        let b = Pattern::new(vec![3.0, 4.0, 0.0, 0.0]);
        // distance is 5; R_max=1.0, rho=0.8 => threshold = 1.0*(1-0.8) = 0.2
        assert!(!accepts(&b, &a, 1.0, 0.8, false));
        assert!(accepts(&a, &a, 1.0, 0.8, false));
    }

    #[test]
    fn activation_is_zero_past_r_max() {
        let a = Pattern::new(vec![0.0, 0.0]);
        let b = Pattern::new(vec![10.0, 0.0]);
        assert_eq!(activation(&a, &b, 1.0, false), 0.0);
    }
}
