//! Quantum Tunneling Visualization
//!
//! A wave of probability amplitude meets a rectangular barrier. Launching a
//! particle colors the wave by its WKB transmission probability.
//!
//! Usage: `quantum_tunneling [config.json]` (or set `TUNNELING_CONFIG`)
//!
//! Controls:
//! - Space: Pause/resume animation
//! - Enter/L: Launch particle
//! - +/-: Adjust particle energy
//! - Up/Down: Adjust barrier height
//! - Left/Right: Adjust barrier width

use anyhow::Result;
use common::{Camera3D, GraphicsContext};
use glam::Vec3;
use tunneling_sim::config::SimulationConfig;
use tunneling_sim::equations_ui::{
    draw_control_panel, draw_equations_sidebar, EguiLayer, TUNNELING_EQUATIONS, TUNNELING_VARIABLES,
};
use tunneling_sim::renderer::{GpuScene, TunnelingRenderer};
use tunneling_sim::{SimEvent, SimulationController};
use winit::{
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

/// Slider step applied by keyboard shortcuts
const KEY_STEP: f32 = 5.0;

struct App {
    ctx: GraphicsContext,
    renderer: TunnelingRenderer,
    simulation: SimulationController,
    camera: Camera3D,
    egui: EguiLayer,
    /// UI events waiting for the next frame, in arrival order
    pending: Vec<SimEvent>,
}

impl App {
    fn new(ctx: GraphicsContext, config: &SimulationConfig) -> Self {
        let mut simulation = SimulationController::new(config.initial_parameters());
        let mut renderer = TunnelingRenderer::new(&ctx, simulation.signals());
        simulation.attach(&mut GpuScene::new(&ctx, &mut renderer));

        let camera = Camera3D::looking_at(Vec3::new(0.0, 2.0, 5.0), Vec3::ZERO, 75.0, ctx.aspect_ratio());
        renderer.update_camera(&ctx.queue, &camera);

        let egui = EguiLayer::new(&ctx);

        Self {
            ctx,
            renderer,
            simulation,
            camera,
            egui,
            pending: Vec::new(),
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(new_size);
        self.camera.update_aspect_ratio(self.ctx.aspect_ratio());
        self.renderer.update_camera(&self.ctx.queue, &self.camera);
    }

    /// Drain queued events, then tick once (which always renders)
    fn frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let simulation = &self.simulation;
        let pending = &mut self.pending;
        let mut overlay = self.egui.run(&self.ctx, |ctx| {
            draw_control_panel(ctx, simulation, pending);
            draw_equations_sidebar(ctx, "Quantum Tunneling", TUNNELING_EQUATIONS, TUNNELING_VARIABLES);
        });

        let mut scene = GpuScene::new(&self.ctx, &mut self.renderer).with_overlay(&mut overlay);
        for event in self.pending.drain(..) {
            self.simulation.dispatch(event, &mut scene);
        }
        self.simulation.on_tick(&mut scene)
    }

    fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        if state != ElementState::Pressed {
            return;
        }

        // Step from the last queued value so repeats within one frame add up
        let params = self.simulation.params_after(&self.pending);
        let event = match key {
            KeyCode::Space => SimEvent::AnimationToggled,
            KeyCode::Enter | KeyCode::KeyL => SimEvent::LaunchRequested,
            KeyCode::Equal => SimEvent::EnergyChanged(params.particle_energy + KEY_STEP),
            KeyCode::Minus => SimEvent::EnergyChanged(params.particle_energy - KEY_STEP),
            KeyCode::ArrowUp => SimEvent::BarrierHeightChanged(params.barrier_height + KEY_STEP),
            KeyCode::ArrowDown => SimEvent::BarrierHeightChanged(params.barrier_height - KEY_STEP),
            KeyCode::ArrowRight => SimEvent::BarrierWidthChanged(params.barrier_width + KEY_STEP),
            KeyCode::ArrowLeft => SimEvent::BarrierWidthChanged(params.barrier_width - KEY_STEP),
            _ => return,
        };
        self.pending.push(event);
    }

    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.egui.handle_window_event(&self.ctx.window, event)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let config = SimulationConfig::resolve(std::env::args_os().nth(1).map(Into::into))?;

    let (ctx, event_loop) = pollster::block_on(GraphicsContext::new(
        &config.window.title,
        config.window.width,
        config.window.height,
    ))?;

    let mut app = App::new(ctx, &config);

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { ref event, .. } => {
                let consumed = app.handle_window_event(event);

                if !consumed {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(size) => app.resize(*size),
                        WindowEvent::KeyboardInput {
                            event:
                                KeyEvent {
                                    physical_key: PhysicalKey::Code(key),
                                    state,
                                    ..
                                },
                            ..
                        } => app.handle_key(*key, *state),
                        WindowEvent::RedrawRequested => match app.frame() {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                app.resize(app.ctx.size)
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                log::error!("surface out of memory, exiting");
                                elwt.exit()
                            }
                            Err(e) => log::warn!("render error: {e:?}"),
                        },
                        _ => {}
                    }
                }
            }
            Event::AboutToWait => {
                app.ctx.window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}
