/// Joint match-quality / phase-coherence state gating whether (and how
/// strongly) a learning step is allowed to proceed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResonanceState {
    pub art_resonance: f32,
    pub phase_sync: f32,
    pub both_in_gamma: bool,
    pub consciousness_likelihood: f32,
    pub match_quality: f32,
}

/// Result of gating a learning-rate `beta` by an optional `ResonanceState`
/// against threshold `tau`. `None` resonance falls back to unconditional
/// update at the unscaled rate.
pub fn gate_learning_rate(resonance: Option<&ResonanceState>, tau: f32, beta: f32) -> Option<f32> {
    match resonance {
        None => Some(beta),
        Some(state) => {
            if state.consciousness_likelihood < tau {
                None
            } else {
                Some(beta * state.consciousness_likelihood)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(likelihood: f32) -> ResonanceState {
        ResonanceState {
            art_resonance: 1.0,
            phase_sync: 1.0,
            both_in_gamma: true,
            consciousness_likelihood: likelihood,
            match_quality: 1.0,
        }
    }

    #[test]
    fn no_resonance_state_is_unconditional() {
        assert_eq!(gate_learning_rate(None, 0.5, 0.3), Some(0.3));
    }

    #[test]
    fn below_threshold_suppresses_update() {
        assert_eq!(gate_learning_rate(Some(&state(0.2)), 0.5, 0.3), None);
    }

    #[test]
    fn at_threshold_is_permitted() {
        assert_eq!(gate_learning_rate(Some(&state(0.5)), 0.5, 0.3), Some(0.15));
    }

    #[test]
    fn above_threshold_scales_rate_up() {
        assert_eq!(gate_learning_rate(Some(&state(0.9)), 0.5, 0.3), Some(0.27));
    }
}
