//! Visual signal mapping
//!
//! Translates simulation parameters into what the renderer consumes: the
//! barrier transform (pushed only when the geometry changes) and the wave
//! shader uniforms (pushed every running frame).

use glam::Vec3;

use crate::constants::{
    ENERGY_PER_AMPLITUDE, HEIGHT_PER_SCALE, LAUNCH_LIGHTNESS, LAUNCH_SATURATION,
    LAUNCH_START_X, WIDTH_PER_SCALE,
};
use crate::params::SimulationParameters;

/// A named shader uniform of the wave material
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Uniform {
    Time(f32),
    Amplitude(f32),
    /// HSL color, each component in [0, 1]
    Color { hue: f32, saturation: f32, lightness: f32 },
}

/// Receiver of everything the core draws
pub trait SceneSink {
    type Error;

    fn set_uniform(&mut self, uniform: Uniform);

    /// Scale of the barrier object
    fn set_transform(&mut self, scale: Vec3);

    /// Spatial origin of the wave object
    fn set_position(&mut self, position: Vec3);

    /// Draw the current state. Called once per tick whether or not time advanced.
    fn render_frame(&mut self) -> Result<(), Self::Error>;
}

/// Last values pushed to the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualSignals {
    pub barrier_scale_x: f32,
    pub barrier_scale_y: f32,
    pub amplitude: f32,
    pub time: f32,
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
    pub wave_position: Vec3,
}

impl Default for VisualSignals {
    fn default() -> Self {
        // Cyan wave at unit amplitude until the first update
        Self {
            barrier_scale_x: 1.0,
            barrier_scale_y: 1.0,
            amplitude: 1.0,
            time: 0.0,
            hue: 0.5,
            saturation: 1.0,
            lightness: 0.5,
            wave_position: Vec3::ZERO,
        }
    }
}

impl VisualSignals {
    pub fn barrier_scale(&self) -> Vec3 {
        Vec3::new(self.barrier_scale_x, self.barrier_scale_y, 1.0)
    }

    pub fn color(&self) -> Uniform {
        Uniform::Color {
            hue: self.hue,
            saturation: self.saturation,
            lightness: self.lightness,
        }
    }
}

/// Owns [`VisualSignals`] and keeps the scene in sync with them
#[derive(Debug, Clone, Default)]
pub struct VisualSignalMapper {
    signals: VisualSignals,
}

impl VisualSignalMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signals(&self) -> &VisualSignals {
        &self.signals
    }

    /// Barrier scale from geometry. Call once per height or width change.
    pub fn apply_discrete<S: SceneSink>(&mut self, params: &SimulationParameters, scene: &mut S) {
        self.signals.barrier_scale_x = params.barrier_width / WIDTH_PER_SCALE;
        self.signals.barrier_scale_y = params.barrier_height / HEIGHT_PER_SCALE;
        scene.set_transform(self.signals.barrier_scale());
    }

    /// Amplitude and time uniforms. Call every running tick and on energy change.
    pub fn apply_continuous<S: SceneSink>(&mut self, params: &SimulationParameters, scene: &mut S) {
        self.signals.amplitude = params.particle_energy / ENERGY_PER_AMPLITUDE;
        self.signals.time = params.simulation_time as f32;
        scene.set_uniform(Uniform::Time(self.signals.time));
        scene.set_uniform(Uniform::Amplitude(self.signals.amplitude));
    }

    /// Color the wave by transmission probability: hue = probability.
    ///
    /// Both 0 and 1 land on red; the wrap-around is kept as is.
    pub fn apply_launch_color<S: SceneSink>(&mut self, probability: f32, scene: &mut S) {
        self.signals.hue = probability;
        self.signals.saturation = LAUNCH_SATURATION;
        self.signals.lightness = LAUNCH_LIGHTNESS;
        scene.set_uniform(self.signals.color());
    }

    /// Move the wave back to its launch origin left of the view
    pub fn reset_wave_origin<S: SceneSink>(&mut self, scene: &mut S) {
        self.signals.wave_position = Vec3::new(LAUNCH_START_X, 0.0, 0.0);
        scene.set_position(self.signals.wave_position);
    }

    /// Push every signal, used once at startup so the scene starts consistent
    pub fn sync_all<S: SceneSink>(&self, scene: &mut S) {
        scene.set_transform(self.signals.barrier_scale());
        scene.set_position(self.signals.wave_position);
        scene.set_uniform(Uniform::Time(self.signals.time));
        scene.set_uniform(Uniform::Amplitude(self.signals.amplitude));
        scene.set_uniform(self.signals.color());
    }
}

/// Convert HSL (all components in [0, 1]) to RGB
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    if s == 0.0 {
        return [l, l, l];
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    [
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
    ]
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
