use approx::assert_relative_eq;
use glam::Vec3;
use std::convert::Infallible;
use tunneling_sim::clock::ClockState;
use tunneling_sim::config::SimulationConfig;
use tunneling_sim::{transmission_probability, SceneSink, SimEvent, SimulationController, Uniform};

/// Scene that records every call in order
#[derive(Debug, Default)]
struct RecordingScene {
    calls: Vec<Call>,
}

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Uniform(Uniform),
    Transform(Vec3),
    Position(Vec3),
    Render,
}

impl RecordingScene {
    fn renders(&self) -> usize {
        self.calls.iter().filter(|c| **c == Call::Render).count()
    }

    fn transforms(&self) -> Vec<Vec3> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Transform(scale) => Some(*scale),
                _ => None,
            })
            .collect()
    }

    fn last_amplitude(&self) -> Option<f32> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::Uniform(Uniform::Amplitude(a)) => Some(*a),
            _ => None,
        })
    }

    fn clear(&mut self) {
        self.calls.clear();
    }
}

impl SceneSink for RecordingScene {
    type Error = Infallible;

    fn set_uniform(&mut self, uniform: Uniform) {
        self.calls.push(Call::Uniform(uniform));
    }

    fn set_transform(&mut self, scale: Vec3) {
        self.calls.push(Call::Transform(scale));
    }

    fn set_position(&mut self, position: Vec3) {
        self.calls.push(Call::Position(position));
    }

    fn render_frame(&mut self) -> Result<(), Infallible> {
        self.calls.push(Call::Render);
        Ok(())
    }
}

fn attached() -> (SimulationController, RecordingScene) {
    let mut sim = SimulationController::default();
    let mut scene = RecordingScene::default();
    sim.attach(&mut scene);
    scene.clear();
    (sim, scene)
}

fn tick(sim: &mut SimulationController, scene: &mut RecordingScene, n: usize) {
    for _ in 0..n {
        sim.on_tick(scene).unwrap();
    }
}

#[test]
fn attach_pushes_consistent_initial_state() {
    let mut sim = SimulationController::default();
    let mut scene = RecordingScene::default();
    sim.attach(&mut scene);

    assert_eq!(scene.transforms().last(), Some(&Vec3::new(1.0, 2.0, 1.0)));
    assert!(scene.calls.contains(&Call::Uniform(Uniform::Color {
        hue: 0.5,
        saturation: 1.0,
        lightness: 0.5,
    })));
    assert_eq!(scene.renders(), 0);
}

#[test]
fn default_launch_is_blocked() {
    let (mut sim, mut scene) = attached();
    sim.dispatch(SimEvent::LaunchRequested, &mut scene);

    let hue = sim.signals().hue;
    assert!(hue > 0.0 && hue < 2e-11);
    assert_relative_eq!(hue, (-25.298_22f32).exp(), max_relative = 1e-4);
    assert_eq!(
        scene.calls,
        vec![
            Call::Uniform(Uniform::Color { hue, saturation: 1.0, lightness: 0.5 }),
            Call::Position(Vec3::new(-5.0, 0.0, 0.0)),
        ]
    );
}

#[test]
fn over_barrier_launch_is_certain() {
    let (mut sim, mut scene) = attached();
    sim.dispatch(SimEvent::EnergyChanged(80.0), &mut scene);
    for width in [1.0, 20.0, 100.0] {
        sim.dispatch(SimEvent::BarrierWidthChanged(width), &mut scene);
        sim.dispatch(SimEvent::LaunchRequested, &mut scene);
        assert_eq!(sim.signals().hue, 1.0);
    }
}

#[test]
fn running_clock_advances_fixed_step() {
    let (mut sim, mut scene) = attached();
    tick(&mut sim, &mut scene, 250);

    assert_relative_eq!(sim.params().simulation_time, 250.0 * 0.016, max_relative = 1e-4);
    assert_eq!(scene.renders(), 250);
}

#[test]
fn paused_clock_still_renders_every_tick() {
    let (mut sim, mut scene) = attached();
    tick(&mut sim, &mut scene, 10);
    sim.dispatch(SimEvent::AnimationToggled, &mut scene);
    assert_eq!(sim.clock_state(), ClockState::Paused);

    let frozen = sim.params().simulation_time;
    scene.clear();
    tick(&mut sim, &mut scene, 40);

    assert_eq!(sim.params().simulation_time, frozen);
    assert_eq!(scene.calls, vec![Call::Render; 40]);
}

#[test]
fn double_toggle_resumes_without_jump() {
    let (mut sim, mut scene) = attached();
    tick(&mut sim, &mut scene, 10);
    sim.dispatch(SimEvent::AnimationToggled, &mut scene);
    let frozen = sim.params().simulation_time;
    tick(&mut sim, &mut scene, 25);
    sim.dispatch(SimEvent::AnimationToggled, &mut scene);

    assert!(sim.params().is_animating);
    assert_eq!(sim.params().simulation_time, frozen);

    tick(&mut sim, &mut scene, 1);
    assert_relative_eq!(sim.params().simulation_time, frozen + 0.016, max_relative = 1e-5);
}

#[test]
fn frame_count_includes_paused_ticks() {
    let (mut sim, mut scene) = attached();
    tick(&mut sim, &mut scene, 7);
    sim.dispatch(SimEvent::AnimationToggled, &mut scene);
    tick(&mut sim, &mut scene, 5);

    assert_eq!(sim.frames(), 12);
    assert_relative_eq!(sim.params().simulation_time, 7.0 * 0.016, max_relative = 1e-12);
}

#[test]
fn launch_resets_clock_from_any_value() {
    let (mut sim, mut scene) = attached();
    tick(&mut sim, &mut scene, 500);
    sim.dispatch(SimEvent::AnimationToggled, &mut scene);
    sim.dispatch(SimEvent::LaunchRequested, &mut scene);
    assert_eq!(sim.params().simulation_time, 0.0);

    // Paused launches stay at zero until resumed
    tick(&mut sim, &mut scene, 5);
    assert_eq!(sim.params().simulation_time, 0.0);
}

#[test]
fn energy_change_updates_amplitude_immediately() {
    let (mut sim, mut scene) = attached();
    sim.dispatch(SimEvent::AnimationToggled, &mut scene);
    sim.dispatch(SimEvent::EnergyChanged(30.0), &mut scene);

    assert_eq!(scene.last_amplitude(), Some(0.3));
    assert!(scene.transforms().is_empty());
}

#[test]
fn repeated_steps_before_a_frame_accumulate() {
    let (mut sim, mut scene) = attached();
    let mut pending = Vec::new();

    // Two energy steps and one width step queued before the next frame
    for _ in 0..2 {
        let energy = sim.params_after(&pending).particle_energy;
        pending.push(SimEvent::EnergyChanged(energy + 5.0));
    }
    let width = sim.params_after(&pending).barrier_width;
    pending.push(SimEvent::BarrierWidthChanged(width - 5.0));

    for event in pending.drain(..) {
        sim.dispatch(event, &mut scene);
    }

    assert_eq!(sim.params().particle_energy, 60.0);
    assert_eq!(sim.params().barrier_width, 15.0);
    assert_eq!(scene.last_amplitude(), Some(0.6));
}

#[test]
fn geometry_change_pushes_one_transform() {
    let (mut sim, mut scene) = attached();
    sim.dispatch(SimEvent::BarrierHeightChanged(35.0), &mut scene);
    sim.dispatch(SimEvent::BarrierWidthChanged(40.0), &mut scene);
    tick(&mut sim, &mut scene, 20);

    assert_eq!(
        scene.transforms(),
        vec![Vec3::new(1.0, 1.0, 1.0), Vec3::new(2.0, 1.0, 1.0)]
    );
}

#[test]
fn out_of_range_parameters_are_accepted() {
    let (mut sim, mut scene) = attached();
    sim.dispatch(SimEvent::EnergyChanged(-40.0), &mut scene);
    sim.dispatch(SimEvent::BarrierWidthChanged(-10.0), &mut scene);
    sim.dispatch(SimEvent::LaunchRequested, &mut scene);

    assert_eq!(sim.params().particle_energy, -40.0);
    assert!(sim.signals().hue > 1.0);
    assert_eq!(sim.signals().barrier_scale_x, -0.5);
}

#[test]
fn predicted_matches_model() {
    let (mut sim, mut scene) = attached();
    sim.dispatch(SimEvent::EnergyChanged(65.0), &mut scene);
    sim.dispatch(SimEvent::BarrierWidthChanged(2.0), &mut scene);

    assert_eq!(sim.predicted().probability, transmission_probability(65.0, 70.0, 2.0));
}

#[test]
fn config_sets_starting_parameters() {
    let config = SimulationConfig::from_json(
        r#"{ "initial": { "particle_energy": 90.0, "animating": false } }"#,
    )
    .unwrap();
    let mut sim = SimulationController::new(config.initial_parameters());
    let mut scene = RecordingScene::default();

    assert_eq!(sim.clock_state(), ClockState::Paused);
    tick(&mut sim, &mut scene, 3);
    assert_eq!(sim.params().simulation_time, 0.0);
    assert_eq!(sim.predicted().probability, 1.0);
}
