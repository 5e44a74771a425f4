use crate::kernel::simd;
use crate::pattern::Pattern;

/// Choice function `T = |I ^ W|_1 / (alpha + |W|_1)`. `input` must already be
/// complement-coded by the caller (the kernel does not validate that, since
/// it has no way to distinguish a complement-coded pattern from a plain one
/// at this layer — `ComplementCodedPattern::encode` is the enforcement point).
pub fn choice(input: &Pattern, weight: &Pattern, alpha: f32, use_simd: bool) -> f32 {
    let intersection = simd::fuzzy_and_l1(input.as_slice(), weight.as_slice(), use_simd);
    let weight_norm = weight.l1_norm();
    intersection / (alpha + weight_norm)
}

/// Match ratio `M = |I ^ W|_1 / |I|_1`, accepted iff `M >= rho`.
pub fn match_ratio(input: &Pattern, weight: &Pattern, use_simd: bool) -> f32 {
    let intersection = simd::fuzzy_and_l1(input.as_slice(), weight.as_slice(), use_simd);
    let input_norm = input.l1_norm();
    if input_norm <= f32::EPSILON {
        0.0
    } else {
        intersection / input_norm
    }
}

/// Fast-commit-slow-recode update: `W' = beta*(I ^ W) + (1-beta)*W`.
pub fn update_weight(input: &Pattern, weight: &Pattern, beta: f32) -> Pattern {
    let intersection = input.fuzzy_and(weight);
    weight.interpolate_toward(&intersection, beta)
}

/// Initial weight for a freshly allocated category: the input itself (fast
/// commit, beta=1 on the first presentation).
pub fn create_initial_weight(input: &Pattern) -> Pattern {
    input.clone()
}
