//! Dual SIMD/scalar numeric reductions underlying the activation kernels.
//!
//! Both paths reduce in the same left-to-right, lane-width groupings, so
//! SIMD and scalar results agree to within floating-point rounding by
//! construction rather than by chance: a lane group of 8 elements is
//! always summed in the same order regardless of which path produced it.

const LANES: usize = 8;

/// `sum(min(a_i, b_i))` — the fuzzy-AND L1 norm `|I ^ W|_1`.
pub fn fuzzy_and_l1(a: &[f32], b: &[f32], use_simd: bool) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    if use_simd {
        fuzzy_and_l1_simd(a, b)
    } else {
        fuzzy_and_l1_scalar(a, b)
    }
}

fn fuzzy_and_l1_scalar(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x.min(*y)).sum()
}

#[cfg(feature = "simd")]
fn fuzzy_and_l1_simd(a: &[f32], b: &[f32]) -> f32 {
    use wide::f32x8;
    let chunks = a.len() / LANES;
    let mut acc = f32x8::ZERO;
    for c in 0..chunks {
        let lo = c * LANES;
        let va = f32x8::from(<[f32; LANES]>::try_from(&a[lo..lo + LANES]).unwrap());
        let vb = f32x8::from(<[f32; LANES]>::try_from(&b[lo..lo + LANES]).unwrap());
        acc += va.min(vb);
    }
    let mut total: f32 = acc.to_array().iter().sum();
    for i in (chunks * LANES)..a.len() {
        total += a[i].min(b[i]);
    }
    total
}

#[cfg(not(feature = "simd"))]
fn fuzzy_and_l1_simd(a: &[f32], b: &[f32]) -> f32 {
    fuzzy_and_l1_scalar(a, b)
}

/// Euclidean distance between two equal-length vectors.
pub fn euclidean_distance(a: &[f32], b: &[f32], use_simd: bool) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let sq_sum = if use_simd {
        squared_distance_sum_simd(a, b)
    } else {
        squared_distance_sum_scalar(a, b)
    };
    sq_sum.sqrt()
}

fn squared_distance_sum_scalar(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum()
}

#[cfg(feature = "simd")]
fn squared_distance_sum_simd(a: &[f32], b: &[f32]) -> f32 {
    use wide::f32x8;
    let chunks = a.len() / LANES;
    let mut acc = f32x8::ZERO;
    for c in 0..chunks {
        let lo = c * LANES;
        let va = f32x8::from(<[f32; LANES]>::try_from(&a[lo..lo + LANES]).unwrap());
        let vb = f32x8::from(<[f32; LANES]>::try_from(&b[lo..lo + LANES]).unwrap());
        let d = va - vb;
        acc += d * d;
    }
    let mut total: f32 = acc.to_array().iter().sum();
    for i in (chunks * LANES)..a.len() {
        let d = a[i] - b[i];
        total += d * d;
    }
    total
}

#[cfg(not(feature = "simd"))]
fn squared_distance_sum_simd(a: &[f32], b: &[f32]) -> f32 {
    squared_distance_sum_scalar(a, b)
}

/// Dot product, used by the choice-by-difference (backprop) kernel.
pub fn dot(a: &[f32], b: &[f32], use_simd: bool) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    if use_simd {
        dot_simd(a, b)
    } else {
        dot_scalar(a, b)
    }
}

fn dot_scalar(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[cfg(feature = "simd")]
fn dot_simd(a: &[f32], b: &[f32]) -> f32 {
    use wide::f32x8;
    let chunks = a.len() / LANES;
    let mut acc = f32x8::ZERO;
    for c in 0..chunks {
        let lo = c * LANES;
        let va = f32x8::from(<[f32; LANES]>::try_from(&a[lo..lo + LANES]).unwrap());
        let vb = f32x8::from(<[f32; LANES]>::try_from(&b[lo..lo + LANES]).unwrap());
        acc += va * vb;
    }
    let mut total: f32 = acc.to_array().iter().sum();
    for i in (chunks * LANES)..a.len() {
        total += a[i] * b[i];
    }
    total
}

#[cfg(not(feature = "simd"))]
fn dot_simd(a: &[f32], b: &[f32]) -> f32 {
    dot_scalar(a, b)
}
