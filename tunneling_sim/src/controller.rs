//! Simulation controller
//!
//! Owns the parameter store, signal mapper and clock. UI input arrives as
//! [`SimEvent`]s, the display refresh calls [`SimulationController::on_tick`];
//! both run on the same thread and never interleave.

use crate::clock::{AnimationClock, ClockState};
use crate::params::{ParameterStore, SimulationParameters};
use crate::signals::{SceneSink, VisualSignalMapper, VisualSignals};
use crate::tunneling::TunnelingResult;

/// Semantic input events from the UI
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    EnergyChanged(f32),
    BarrierHeightChanged(f32),
    BarrierWidthChanged(f32),
    LaunchRequested,
    AnimationToggled,
}

impl SimEvent {
    /// Effect of this event on the inputs alone, without touching a scene
    pub fn apply_to(self, params: &mut SimulationParameters) {
        match self {
            SimEvent::EnergyChanged(value) => params.particle_energy = value,
            SimEvent::BarrierHeightChanged(value) => params.barrier_height = value,
            SimEvent::BarrierWidthChanged(value) => params.barrier_width = value,
            SimEvent::LaunchRequested => params.simulation_time = 0.0,
            SimEvent::AnimationToggled => params.is_animating = !params.is_animating,
        }
    }
}

pub struct SimulationController {
    store: ParameterStore,
    mapper: VisualSignalMapper,
    clock: AnimationClock,
}

impl Default for SimulationController {
    fn default() -> Self {
        Self::new(SimulationParameters::default())
    }
}

impl SimulationController {
    pub fn new(params: SimulationParameters) -> Self {
        Self {
            store: ParameterStore::new(params),
            mapper: VisualSignalMapper::new(),
            clock: AnimationClock::new(),
        }
    }

    pub fn params(&self) -> &SimulationParameters {
        self.store.params()
    }

    pub fn signals(&self) -> &VisualSignals {
        self.mapper.signals()
    }

    pub fn clock_state(&self) -> ClockState {
        self.clock.state(&self.store)
    }

    /// Parameters as they will be once `pending` has been dispatched in order
    pub fn params_after(&self, pending: &[SimEvent]) -> SimulationParameters {
        pending.iter().fold(*self.store.params(), |mut params, event| {
            event.apply_to(&mut params);
            params
        })
    }

    /// Ticks rendered since startup, paused ones included
    pub fn frames(&self) -> u64 {
        self.clock.frames()
    }

    /// Transmission probability a launch would produce right now
    pub fn predicted(&self) -> TunnelingResult {
        TunnelingResult::evaluate(self.store.params())
    }

    /// Bring a freshly created scene in line with the current state
    pub fn attach<S: SceneSink>(&mut self, scene: &mut S) {
        self.mapper.sync_all(scene);
        self.mapper.apply_discrete(self.store.params(), scene);
    }

    /// Apply one UI event
    pub fn dispatch<S: SceneSink>(&mut self, event: SimEvent, scene: &mut S) {
        match event {
            SimEvent::EnergyChanged(value) => {
                log::debug!("particle energy -> {value}");
                self.store.set_particle_energy(value);
                self.mapper.apply_continuous(self.store.params(), scene);
            }
            SimEvent::BarrierHeightChanged(value) => {
                log::debug!("barrier height -> {value}");
                self.store.set_barrier_height(value);
                self.mapper.apply_discrete(self.store.params(), scene);
            }
            SimEvent::BarrierWidthChanged(value) => {
                log::debug!("barrier width -> {value}");
                self.store.set_barrier_width(value);
                self.mapper.apply_discrete(self.store.params(), scene);
            }
            SimEvent::LaunchRequested => self.launch(scene),
            SimEvent::AnimationToggled => {
                let state = self.clock.toggle(&mut self.store);
                log::debug!("animation {state:?}");
            }
        }
    }

    /// Launch a particle: color the wave by its transmission probability,
    /// move the wave back to the start and restart the clock
    pub fn launch<S: SceneSink>(&mut self, scene: &mut S) {
        let params = *self.store.params();
        let result = TunnelingResult::evaluate(&params);
        log::info!(
            "launch: E={} V0={} a={} -> T={:e}",
            params.particle_energy,
            params.barrier_height,
            params.barrier_width,
            result.probability
        );

        self.mapper.apply_launch_color(result.probability, scene);
        self.mapper.reset_wave_origin(scene);
        self.store.reset_time();
    }

    /// One display refresh
    pub fn on_tick<S: SceneSink>(&mut self, scene: &mut S) -> Result<(), S::Error> {
        self.clock.tick(&mut self.store, &mut self.mapper, scene)
    }
}
