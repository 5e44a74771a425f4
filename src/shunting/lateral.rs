/// Gaussian lateral-interaction kernel `G(dist, range) = exp(-dist^2 / (2 range^2))`.
/// Narrow `range` gives the on-center excitatory kernel, broad `range` the
/// off-surround inhibitory one.
pub fn gaussian(distance: f32, range: f32) -> f32 {
    (-(distance * distance) / (2.0 * range * range)).exp()
}
