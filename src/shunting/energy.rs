use crate::shunting::lateral;
use crate::shunting::params::ShuntingParams;

/// `E = 1/2 sum_i A_i x_i^2 - sum_{i<j} (G_exc(i,j) - G_inh(i,j)) x_i x_j`
/// A testable property only: non-increasing on convergent trajectories,
/// not on every single step.
pub fn energy(activations: &[f32], params: &ShuntingParams) -> f32 {
    let decay_term: f32 = activations.iter().map(|x| 0.5 * params.decay * x * x).sum();
    let mut coupling_term = 0.0f32;
    for i in 0..activations.len() {
        for j in (i + 1)..activations.len() {
            let dist = (i as f32 - j as f32).abs();
            let g_exc = lateral::gaussian(dist, params.exc_range) * params.exc_strength;
            let g_inh = lateral::gaussian(dist, params.inh_range) * params.inh_strength;
            coupling_term += (g_exc - g_inh) * activations[i] * activations[j];
        }
    }
    decay_term - coupling_term
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shunting::neuron::NeuronArray;

    #[test]
    fn energy_does_not_increase_as_trajectory_settles() {
        let params = ShuntingParams {
            parallel_threshold: usize::MAX,
            time_step: 0.01,
            ..ShuntingParams::default()
        };
        let mut field = NeuronArray::new(params, 7).unwrap();
        let exc = vec![0.3, 0.4, 1.0, 0.4, 0.3, 0.2, 0.2];
        let inh = vec![0.0; 7];

        let e0 = energy(field.activations(), &params);
        for _ in 0..500 {
            field.update(&exc, &inh).unwrap();
        }
        let e_final = energy(field.activations(), &params);

        assert!(e_final <= e0 + 1e-3);
    }
}
