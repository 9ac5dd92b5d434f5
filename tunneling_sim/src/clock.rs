//! Animation clock
//!
//! Advances simulation time by a fixed step per display tick. The step is a
//! nominal 60 Hz frame, not measured wall time, so playback speed follows the
//! actual refresh rate.

use crate::constants::FRAME_DT;
use crate::params::ParameterStore;
use crate::signals::{SceneSink, VisualSignalMapper};

/// Whether the clock advances on tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Running,
    Paused,
}

impl ClockState {
    pub fn from_animating(is_animating: bool) -> Self {
        if is_animating {
            ClockState::Running
        } else {
            ClockState::Paused
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ClockState::Running => ClockState::Paused,
            ClockState::Paused => ClockState::Running,
        }
    }
}

/// Per-frame driver of the continuous signal path
#[derive(Debug, Clone)]
pub struct AnimationClock {
    dt: f64,
    frames: u64,
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationClock {
    pub fn new() -> Self {
        Self {
            dt: FRAME_DT,
            frames: 0,
        }
    }

    /// Number of frames rendered so far, running or not
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn state(&self, store: &ParameterStore) -> ClockState {
        ClockState::from_animating(store.is_animating())
    }

    /// Flip between running and paused; returns the new state
    pub fn toggle(&self, store: &mut ParameterStore) -> ClockState {
        let next = self.state(store).toggled();
        store.set_animating(next == ClockState::Running);
        next
    }

    /// One display tick: advance and push uniforms when running, then always render
    pub fn tick<S: SceneSink>(
        &mut self,
        store: &mut ParameterStore,
        mapper: &mut VisualSignalMapper,
        scene: &mut S,
    ) -> Result<(), S::Error> {
        if self.state(store) == ClockState::Running {
            store.advance_time(self.dt);
            mapper.apply_continuous(store.params(), scene);
        }

        self.frames += 1;
        scene.render_frame()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec3;
    use crate::signals::Uniform;

    #[derive(Default)]
    struct FrameCounter {
        renders: usize,
        uniforms: usize,
    }

    impl SceneSink for FrameCounter {
        type Error = ();

        fn set_uniform(&mut self, _uniform: Uniform) {
            self.uniforms += 1;
        }

        fn set_transform(&mut self, _scale: Vec3) {}

        fn set_position(&mut self, _position: Vec3) {}

        fn render_frame(&mut self) -> Result<(), ()> {
            self.renders += 1;
            Ok(())
        }
    }

    #[test]
    fn test_running_accumulates_fixed_step() {
        let mut clock = AnimationClock::new();
        let mut store = ParameterStore::default();
        let mut mapper = VisualSignalMapper::new();
        let mut scene = FrameCounter::default();

        for _ in 0..100 {
            clock.tick(&mut store, &mut mapper, &mut scene).unwrap();
        }

        assert_relative_eq!(store.simulation_time(), 100.0 * 0.016, max_relative = 1e-4);
        assert_eq!(mapper.signals().time, store.simulation_time() as f32);
        assert_eq!(scene.renders, 100);
        assert_eq!(clock.frames(), 100);
    }

    #[test]
    fn test_long_run_keeps_fixed_step() {
        let mut clock = AnimationClock::new();
        let mut store = ParameterStore::default();
        let mut mapper = VisualSignalMapper::new();
        let mut scene = FrameCounter::default();

        for _ in 0..2_000_000 {
            clock.tick(&mut store, &mut mapper, &mut scene).unwrap();
        }

        assert_relative_eq!(store.simulation_time(), 2_000_000.0 * 0.016, max_relative = 1e-6);
        assert_eq!(clock.frames(), 2_000_000);
    }

    #[test]
    fn test_time_keeps_advancing_at_large_values() {
        let mut clock = AnimationClock::new();
        let mut store = ParameterStore::default();
        let mut mapper = VisualSignalMapper::new();
        let mut scene = FrameCounter::default();

        // 2^19: an f32 accumulator stops moving here with a 0.016 step
        store.advance_time(524_288.0);
        for _ in 0..1000 {
            clock.tick(&mut store, &mut mapper, &mut scene).unwrap();
        }

        assert_relative_eq!(store.simulation_time(), 524_288.0 + 16.0, max_relative = 1e-9);
    }

    #[test]
    fn test_paused_freezes_time_but_still_renders() {
        let mut clock = AnimationClock::new();
        let mut store = ParameterStore::default();
        let mut mapper = VisualSignalMapper::new();
        let mut scene = FrameCounter::default();

        clock.tick(&mut store, &mut mapper, &mut scene).unwrap();
        assert_eq!(clock.toggle(&mut store), ClockState::Paused);
        let frozen = store.simulation_time();
        let uniforms_before = scene.uniforms;

        for _ in 0..50 {
            clock.tick(&mut store, &mut mapper, &mut scene).unwrap();
        }

        assert_eq!(store.simulation_time(), frozen);
        assert_eq!(scene.uniforms, uniforms_before);
        assert_eq!(scene.renders, 51);
    }

    #[test]
    fn test_toggle_round_trip() {
        let clock = AnimationClock::new();
        let mut store = ParameterStore::default();
        assert_eq!(clock.state(&store), ClockState::Running);
        clock.toggle(&mut store);
        clock.toggle(&mut store);
        assert_eq!(clock.state(&store), ClockState::Running);
        assert!(store.is_animating());
    }
}
