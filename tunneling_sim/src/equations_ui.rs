//! Control panel and equations sidebar
//!
//! egui widgets emit [`SimEvent`]s instead of touching the simulation; the
//! app queues them and hands them to the controller on the next frame.

use common::GraphicsContext;
use egui::{Color32, Context, FontFamily, FontId, RichText};
use winit::{event::WindowEvent, window::Window};

use crate::clock::ClockState;
use crate::constants::{PARAM_MAX, PARAM_MIN};
use crate::controller::{SimEvent, SimulationController};
use crate::renderer::Overlay;
use crate::tunneling::decay_constant;

/// Equation entry with label and formula
pub struct Equation {
    pub name: &'static str,
    pub formula: &'static str,
    pub description: &'static str,
}

pub const TUNNELING_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Decay Constant",
        formula: "κ = √(2(V₀-E)) / 10",
        description: "Attenuation inside the barrier (E < V₀)",
    },
    Equation {
        name: "Transmission (WKB)",
        formula: "T ≈ e^(-2κa)",
        description: "T = 1 when E ≥ V₀",
    },
    Equation {
        name: "Wave",
        formula: "ψ = A sin(kx - ωt)",
        description: "k = ω = 2, A = E / 100",
    },
    Equation {
        name: "Probability Density",
        formula: "ρ = |ψ|²",
        description: "Brightness and opacity of the wave",
    },
];

pub const TUNNELING_VARIABLES: &[(&str, &str)] = &[
    ("E", "Particle energy"),
    ("V₀", "Barrier height"),
    ("a", "Barrier width"),
    ("κ", "Decay constant"),
    ("T", "Transmission probability (wave hue)"),
    ("t", "Simulation time"),
];

/// Draw a styled equation sidebar
pub fn draw_equations_sidebar(
    ctx: &Context,
    title: &str,
    equations: &[Equation],
    variables: &[(&str, &str)],
) {
    egui::SidePanel::right("equations_panel")
        .min_width(280.0)
        .max_width(350.0)
        .resizable(true)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(RichText::new(title).color(Color32::from_rgb(100, 200, 255)));
            });

            ui.add_space(10.0);
            ui.separator();
            ui.add_space(5.0);

            ui.label(RichText::new("Equations").strong().color(Color32::from_rgb(255, 200, 100)));
            ui.add_space(5.0);

            for eq in equations {
                draw_equation(ui, eq);
                ui.add_space(8.0);
            }

            ui.add_space(10.0);
            ui.separator();
            ui.add_space(5.0);

            ui.label(RichText::new("Variables").strong().color(Color32::from_rgb(255, 200, 100)));
            ui.add_space(5.0);

            for (symbol, meaning) in variables {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(*symbol).color(Color32::from_rgb(150, 255, 150))
                        .font(FontId::new(14.0, FontFamily::Monospace)));
                    ui.label(RichText::new("=").color(Color32::GRAY));
                    ui.label(RichText::new(*meaning).color(Color32::LIGHT_GRAY));
                });
            }
        });
}

/// Draw a single equation with name, formula, and description
fn draw_equation(ui: &mut egui::Ui, eq: &Equation) {
    ui.group(|ui| {
        ui.label(RichText::new(eq.name).strong().color(Color32::WHITE));
        ui.label(
            RichText::new(eq.formula)
                .font(FontId::new(16.0, FontFamily::Monospace))
                .color(Color32::from_rgb(200, 220, 255))
        );
        ui.label(RichText::new(eq.description).small().color(Color32::GRAY));
    });
}

/// Sliders and buttons; every interaction becomes a [`SimEvent`]
pub fn draw_control_panel(ctx: &Context, sim: &SimulationController, events: &mut Vec<SimEvent>) {
    let params = *sim.params();

    egui::SidePanel::left("controls_panel")
        .min_width(240.0)
        .resizable(false)
        .show(ctx, |ui| {
            ui.heading(RichText::new("Controls").color(Color32::from_rgb(100, 200, 255)));
            ui.add_space(8.0);

            let mut energy = params.particle_energy;
            if ui
                .add(egui::Slider::new(&mut energy, PARAM_MIN..=PARAM_MAX).text("Particle Energy"))
                .changed()
            {
                events.push(SimEvent::EnergyChanged(energy));
            }

            let mut height = params.barrier_height;
            if ui
                .add(egui::Slider::new(&mut height, PARAM_MIN..=PARAM_MAX).text("Barrier Height"))
                .changed()
            {
                events.push(SimEvent::BarrierHeightChanged(height));
            }

            let mut width = params.barrier_width;
            if ui
                .add(egui::Slider::new(&mut width, PARAM_MIN..=PARAM_MAX).text("Barrier Width"))
                .changed()
            {
                events.push(SimEvent::BarrierWidthChanged(width));
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Launch Particle").clicked() {
                    events.push(SimEvent::LaunchRequested);
                }
                let toggle_label = match sim.clock_state() {
                    ClockState::Running => "Pause Animation",
                    ClockState::Paused => "Resume Animation",
                };
                if ui.button(toggle_label).clicked() {
                    events.push(SimEvent::AnimationToggled);
                }
            });

            ui.add_space(10.0);
            ui.separator();

            let predicted = sim.predicted();
            let kappa = decay_constant(params.particle_energy, params.barrier_height);
            ui.label(format!("κ = {kappa:.4}"));
            ui.label(format!("T = {:.3e}", predicted.probability));
            if predicted.is_blocked() {
                ui.label(RichText::new("Barrier effectively opaque").color(Color32::from_rgb(255, 120, 120)));
            }
            ui.label(format!("t = {:.2}   frame {}", params.simulation_time, sim.frames()));
            if sim.clock_state() == ClockState::Paused {
                ui.label(RichText::new("PAUSED").color(Color32::YELLOW));
            }
        });
}

/// egui context plus its winit and wgpu glue
pub struct EguiLayer {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl EguiLayer {
    pub fn new(gfx: &GraphicsContext) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            &gfx.window,
            Some(gfx.window.scale_factor() as f32),
            None,
        );
        let renderer = egui_wgpu::Renderer::new(&gfx.device, gfx.config.format, None, 1);

        Self { ctx, state, renderer }
    }

    /// Returns true when egui consumed the event
    pub fn handle_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Run the UI for this frame and tessellate it for painting
    pub fn run(&mut self, gfx: &GraphicsContext, mut build: impl FnMut(&Context)) -> EguiFrame<'_> {
        let raw_input = self.state.take_egui_input(&gfx.window);
        let full_output = self.ctx.run(raw_input, |ctx| build(ctx));

        self.state.handle_platform_output(&gfx.window, full_output.platform_output);
        let primitives = self.ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        EguiFrame {
            renderer: &mut self.renderer,
            primitives,
            textures_delta: full_output.textures_delta,
            screen_descriptor: egui_wgpu::ScreenDescriptor {
                size_in_pixels: [gfx.size.width, gfx.size.height],
                pixels_per_point: full_output.pixels_per_point,
            },
        }
    }
}

/// One frame of tessellated UI waiting to be painted
pub struct EguiFrame<'a> {
    renderer: &'a mut egui_wgpu::Renderer,
    primitives: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    screen_descriptor: egui_wgpu::ScreenDescriptor,
}

impl Overlay for EguiFrame<'_> {
    fn paint(&mut self, ctx: &GraphicsContext, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        for (id, image_delta) in &self.textures_delta.set {
            self.renderer.update_texture(&ctx.device, &ctx.queue, *id, image_delta);
        }

        self.renderer.update_buffers(
            &ctx.device,
            &ctx.queue,
            encoder,
            &self.primitives,
            &self.screen_descriptor,
        );
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.renderer.render(&mut render_pass, &self.primitives, &self.screen_descriptor);
        }

        for id in &self.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
