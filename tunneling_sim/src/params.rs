//! Simulation parameters
//!
//! Single owner of the user-facing inputs and the simulation clock value.
//! Setters overwrite without validation; range limits belong to the UI.

/// Current inputs of the tunneling visualization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParameters {
    /// Particle energy E (nominal 0..100)
    pub particle_energy: f32,
    /// Barrier height V₀ (nominal 0..100)
    pub barrier_height: f32,
    /// Barrier width a (nominal 0..100)
    pub barrier_width: f32,
    pub is_animating: bool,
    /// Animated time, never wall clock. Narrowed to f32 only for the shader.
    pub simulation_time: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            particle_energy: 50.0,
            barrier_height: 70.0,
            barrier_width: 20.0,
            is_animating: true,
            simulation_time: 0.0,
        }
    }
}

/// Owns [`SimulationParameters`]; all mutation goes through here
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    params: SimulationParameters,
}

impl ParameterStore {
    pub fn new(params: SimulationParameters) -> Self {
        Self { params }
    }

    /// Snapshot of every parameter
    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn particle_energy(&self) -> f32 {
        self.params.particle_energy
    }

    pub fn set_particle_energy(&mut self, value: f32) {
        self.params.particle_energy = value;
    }

    pub fn barrier_height(&self) -> f32 {
        self.params.barrier_height
    }

    pub fn set_barrier_height(&mut self, value: f32) {
        self.params.barrier_height = value;
    }

    pub fn barrier_width(&self) -> f32 {
        self.params.barrier_width
    }

    pub fn set_barrier_width(&mut self, value: f32) {
        self.params.barrier_width = value;
    }

    pub fn is_animating(&self) -> bool {
        self.params.is_animating
    }

    pub fn set_animating(&mut self, animating: bool) {
        self.params.is_animating = animating;
    }

    pub fn simulation_time(&self) -> f64 {
        self.params.simulation_time
    }

    /// Advance the clock. Non-positive steps are ignored so time never runs backwards.
    pub fn advance_time(&mut self, dt: f64) {
        if dt > 0.0 {
            self.params.simulation_time += dt;
        }
    }

    /// Reset the clock to exactly zero
    pub fn reset_time(&mut self) {
        self.params.simulation_time = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let store = ParameterStore::default();
        assert_eq!(store.particle_energy(), 50.0);
        assert_eq!(store.barrier_height(), 70.0);
        assert_eq!(store.barrier_width(), 20.0);
        assert!(store.is_animating());
        assert_eq!(store.simulation_time(), 0.0);
    }

    #[test]
    fn test_setters_do_not_clamp() {
        let mut store = ParameterStore::default();
        store.set_particle_energy(-12.5);
        store.set_barrier_height(250.0);
        store.set_barrier_width(-3.0);
        assert_eq!(store.particle_energy(), -12.5);
        assert_eq!(store.barrier_height(), 250.0);
        assert_eq!(store.barrier_width(), -3.0);
    }

    #[test]
    fn test_time_only_moves_forward_or_resets() {
        let mut store = ParameterStore::default();
        store.advance_time(0.5);
        store.advance_time(-1.0);
        store.advance_time(0.0);
        assert_eq!(store.simulation_time(), 0.5);

        store.reset_time();
        assert_eq!(store.simulation_time(), 0.0);
    }
}
