use crate::kernel::simd;
use crate::pattern::Pattern;

/// Choice-by-difference weight state: signed weights, a learned bias, and the
/// previous update (for momentum). Unlike the fuzzy/hypersphere variants this
/// kernel needs state beyond the raw prototype, so it is kept as its own type
/// rather than a bare `Pattern`.
#[derive(Debug, Clone)]
pub struct BackpropWeight {
    pub weight: Pattern,
    pub bias: f32,
    prev_delta: Pattern,
}

impl BackpropWeight {
    pub fn new(weight: Pattern, bias: f32) -> Self {
        let dim = weight.dim();
        Self {
            weight,
            bias,
            prev_delta: Pattern::new(vec![0.0; dim]),
        }
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// `T = sigma(W . I + b)`.
pub fn activation(input: &Pattern, state: &BackpropWeight, use_simd: bool) -> f32 {
    let z = simd::dot(input.as_slice(), state.weight.as_slice(), use_simd) + state.bias;
    sigmoid(z)
}

/// One-step gradient descent with momentum `mu`, weight decay `lambda`, and
/// the light-induction bias `epsilon` folded into the error term as:
///
/// `delta_i = eta * (target + epsilon) * (1 - output) * I_i + mu*prev_delta_i - lambda*W_i`
///
/// Sign fixed per spec (`W <- W + eta*(O*+eps)*(1-O)*I`); any other sign
/// convention is a defect, not an allowed variant.
pub fn update(
    input: &Pattern,
    state: &BackpropWeight,
    target: f32,
    eta: f32,
    momentum: f32,
    weight_decay: f32,
    epsilon: f32,
    use_simd: bool,
) -> BackpropWeight {
    let output = activation(input, state, use_simd);
    let scale = (target + epsilon) * (1.0 - output);
    let dim = state.weight.dim();
    let mut new_weight = vec![0.0f32; dim];
    let mut new_delta = vec![0.0f32; dim];
    for i in 0..dim {
        let w = state.weight.get(i);
        let d = eta * scale * input.get(i) + momentum * state.prev_delta.get(i) - weight_decay * w;
        new_delta[i] = d;
        new_weight[i] = w + d;
    }
    let new_bias = state.bias + eta * scale;
    // Normalize to prevent unbounded growth across repeated updates.
    let mut weight = Pattern::new(new_weight);
    let norm = weight.l2_norm();
    if norm > 1e-6 {
        let scale = 1.0 / norm.max(1.0);
        for v in weight.as_mut_slice() {
            *v *= scale;
        }
    }
    BackpropWeight {
        weight,
        bias: new_bias,
        prev_delta: Pattern::new(new_delta),
    }
}

pub fn create_initial_weight(input: &Pattern) -> BackpropWeight {
    BackpropWeight::new(input.clone(), 0.0)
}
