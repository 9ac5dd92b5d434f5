//! Quantum Tunneling Model
//!
//! Closed-form WKB estimate of the probability that a particle of energy E
//! crosses a rectangular barrier of height V₀ and width a.

use crate::constants::KAPPA_SCALE;
use crate::params::SimulationParameters;

/// Rectangular potential barrier centred on the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectangularBarrier {
    pub height: f32,
    pub width: f32,
}

impl RectangularBarrier {
    pub fn new(height: f32, width: f32) -> Self {
        Self { height, width }
    }

    /// Barrier described by the current parameters
    pub fn from_params(params: &SimulationParameters) -> Self {
        Self::new(params.barrier_height, params.barrier_width)
    }

    /// Transmission probability for a particle of the given energy
    pub fn transmission(&self, energy: f32) -> f32 {
        transmission_probability(energy, self.height, self.width)
    }
}

/// Decay constant κ = √(2(V₀-E)) / 10 inside the barrier; zero above it
pub fn decay_constant(energy: f32, barrier_height: f32) -> f32 {
    if energy >= barrier_height {
        0.0
    } else {
        (2.0 * (barrier_height - energy)).sqrt() / KAPPA_SCALE
    }
}

/// WKB transmission probability T ≈ exp(-2κa).
///
/// Returns exactly `1.0` when `energy >= barrier_height`. Inputs are not
/// validated: a negative width yields values above one.
pub fn transmission_probability(energy: f32, barrier_height: f32, barrier_width: f32) -> f32 {
    if energy >= barrier_height {
        return 1.0;
    }

    let kappa = decay_constant(energy, barrier_height);
    (-2.0 * kappa * barrier_width).exp()
}

/// Outcome of a single launch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TunnelingResult {
    pub probability: f32,
}

impl TunnelingResult {
    pub fn evaluate(params: &SimulationParameters) -> Self {
        let barrier = RectangularBarrier::from_params(params);
        Self {
            probability: barrier.transmission(params.particle_energy),
        }
    }

    /// True when the barrier is effectively opaque at display precision
    pub fn is_blocked(&self) -> bool {
        self.probability < 1e-3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_over_barrier_is_exactly_one() {
        for width in [0.0, 1.0, 20.0, 100.0, 1e6] {
            assert_eq!(transmission_probability(80.0, 70.0, width), 1.0);
            assert_eq!(transmission_probability(70.0, 70.0, width), 1.0);
        }
    }

    #[test]
    fn test_default_scenario_is_blocked() {
        let kappa = decay_constant(50.0, 70.0);
        assert_relative_eq!(kappa, 0.632_455_5, epsilon = 1e-6);

        let t = transmission_probability(50.0, 70.0, 20.0);
        assert_relative_eq!(t, (-25.298_22f32).exp(), max_relative = 1e-4);
        assert!(t > 0.0 && t < 2e-11);
        assert!(TunnelingResult::evaluate(&SimulationParameters::default()).is_blocked());
    }

    #[test]
    fn test_non_increasing_in_width() {
        let mut previous = f32::INFINITY;
        for step in 0..=50 {
            let t = transmission_probability(30.0, 60.0, step as f32 * 2.0);
            assert!(t <= previous);
            previous = t;
        }
    }

    #[test]
    fn test_non_decreasing_in_energy_below_barrier() {
        let mut previous = 0.0;
        for step in 0..70 {
            let t = transmission_probability(step as f32, 70.0, 5.0);
            assert!(t >= previous);
            previous = t;
        }
    }

    #[test]
    fn test_extreme_inputs_underflow_to_zero() {
        let t = transmission_probability(0.0, 1e30, 1e30);
        assert_eq!(t, 0.0);
        assert!(!t.is_nan());
    }

    #[test]
    fn test_negative_width_is_not_clamped() {
        assert!(transmission_probability(10.0, 50.0, -10.0) > 1.0);
    }
}
