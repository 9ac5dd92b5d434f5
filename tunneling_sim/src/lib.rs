//! Quantum Tunneling Visualization
//!
//! Interactive visualization of a particle meeting a rectangular potential barrier.
//! The core is GPU-free and drives any renderer through [`signals::SceneSink`]:
//!
//! - [`params`]: the parameter store (energy, barrier geometry, simulation clock)
//! - [`tunneling`]: WKB transmission probability
//! - [`signals`]: mapping from parameters to uniforms and transforms
//! - [`clock`]: the fixed-step animation clock
//! - [`controller`]: event dispatch and particle launch
//!
//! The [`renderer`] and [`equations_ui`] modules provide the wgpu scene and egui panel
//! used by the `quantum_tunneling` binary.

pub mod params;
pub mod tunneling;
pub mod signals;
pub mod clock;
pub mod controller;
pub mod config;
pub mod renderer;
pub mod equations_ui;

pub use controller::{SimEvent, SimulationController};
pub use params::{ParameterStore, SimulationParameters};
pub use signals::{SceneSink, Uniform, VisualSignals};
pub use tunneling::{transmission_probability, TunnelingResult};

/// Fixed constants of the visualization
pub mod constants {
    /// Unit normalization applied to the decay constant: κ = √(2(V-E)) / KAPPA_SCALE
    pub const KAPPA_SCALE: f32 = 10.0;

    /// Simulation time advanced per animation tick (nominal 60 Hz)
    pub const FRAME_DT: f64 = 0.016;

    /// Barrier width that maps to unit x-scale
    pub const WIDTH_PER_SCALE: f32 = 20.0;

    /// Barrier height that maps to unit y-scale
    pub const HEIGHT_PER_SCALE: f32 = 35.0;

    /// Energy that maps to unit wave amplitude
    pub const ENERGY_PER_AMPLITUDE: f32 = 100.0;

    /// x coordinate the wave is moved back to on launch (left of the view)
    pub const LAUNCH_START_X: f32 = -5.0;

    /// Saturation and lightness of the launch color
    pub const LAUNCH_SATURATION: f32 = 1.0;
    pub const LAUNCH_LIGHTNESS: f32 = 0.5;

    /// Nominal slider range for energy, height and width
    pub const PARAM_MIN: f32 = 0.0;
    pub const PARAM_MAX: f32 = 100.0;
}
