//! Tunneling scene renderer
//!
//! Draws the barrier box and the wave plane with wgpu. [`GpuScene`] adapts the
//! renderer to [`SceneSink`] for the duration of one frame.

use common::{
    create_index_buffer, create_uniform_buffer, create_vertex_buffer, Camera3D, CameraUniform,
    GraphicsContext, MeshVertex,
};
use glam::{Mat4, Vec3};

use crate::signals::{hsl_to_rgb, SceneSink, Uniform, VisualSignals};

/// Segments along the wave plane's x axis
const WAVE_SEGMENTS: u16 = 100;
const WAVE_WIDTH: f32 = 10.0;
const WAVE_HEIGHT: f32 = 2.0;

const BARRIER_SIZE: [f32; 3] = [1.0, 2.0, 1.0];
const BARRIER_COLOR: [f32; 4] = [0.0, 1.0, 0.0, 0.5];
const LIGHT_POSITION: [f32; 4] = [5.0, 5.0, 5.0, 1.0];
const AMBIENT: f32 = 0.5;
const LIGHT_INTENSITY: f32 = 1.0;

/// Wave material uniforms
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct WaveUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub time: f32,
    pub amplitude: f32,
    pub _padding: [f32; 2],
}

/// Barrier material uniforms
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BarrierUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub light_position: [f32; 4],
    pub lighting: [f32; 4],
}

/// Indexed mesh on the GPU
struct Mesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl Mesh {
    fn new(device: &wgpu::Device, vertices: &[MeshVertex], indices: &[u16]) -> Self {
        Self {
            vertex_buffer: create_vertex_buffer(device, vertices),
            index_buffer: create_index_buffer(device, indices),
            index_count: indices.len() as u32,
        }
    }
}

/// Opaque wave color for an HSL triple given in sRGB space.
///
/// Shaders work in linear space and the sRGB surface encodes on write, so the
/// channels are decoded here first.
pub fn wave_color(hue: f32, saturation: f32, lightness: f32) -> [f32; 4] {
    let [r, g, b] = hsl_to_rgb(hue, saturation, lightness).map(srgb_to_linear);
    [r, g, b, 1.0]
}

/// sRGB transfer function, decoded to linear light
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Plane of `WAVE_WIDTH` x `WAVE_HEIGHT` in the xy plane, split along x
pub fn wave_plane_geometry() -> (Vec<MeshVertex>, Vec<u16>) {
    let columns = WAVE_SEGMENTS + 1;
    let mut vertices = Vec::with_capacity(columns as usize * 2);

    for row in 0..2u16 {
        let v = 1.0 - row as f32;
        let y = (v - 0.5) * WAVE_HEIGHT;
        for col in 0..columns {
            let u = col as f32 / WAVE_SEGMENTS as f32;
            let x = (u - 0.5) * WAVE_WIDTH;
            vertices.push(MeshVertex::new([x, y, 0.0], [0.0, 0.0, 1.0], [u, v]));
        }
    }

    let mut indices = Vec::with_capacity(WAVE_SEGMENTS as usize * 6);
    for col in 0..WAVE_SEGMENTS {
        let top_left = col;
        let top_right = col + 1;
        let bottom_left = col + columns;
        let bottom_right = col + columns + 1;
        indices.extend_from_slice(&[top_left, bottom_left, top_right]);
        indices.extend_from_slice(&[bottom_left, bottom_right, top_right]);
    }

    (vertices, indices)
}

/// Axis-aligned box centred on the origin, one quad per face
pub fn box_geometry(size: [f32; 3]) -> (Vec<MeshVertex>, Vec<u16>) {
    let [hx, hy, hz] = [size[0] / 2.0, size[1] / 2.0, size[2] / 2.0];

    // (normal, four corners counter-clockwise seen from outside)
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        ([1.0, 0.0, 0.0], [[hx, -hy, hz], [hx, -hy, -hz], [hx, hy, -hz], [hx, hy, hz]]),
        ([-1.0, 0.0, 0.0], [[-hx, -hy, -hz], [-hx, -hy, hz], [-hx, hy, hz], [-hx, hy, -hz]]),
        ([0.0, 1.0, 0.0], [[-hx, hy, hz], [hx, hy, hz], [hx, hy, -hz], [-hx, hy, -hz]]),
        ([0.0, -1.0, 0.0], [[-hx, -hy, -hz], [hx, -hy, -hz], [hx, -hy, hz], [-hx, -hy, hz]]),
        ([0.0, 0.0, 1.0], [[-hx, -hy, hz], [hx, -hy, hz], [hx, hy, hz], [-hx, hy, hz]]),
        ([0.0, 0.0, -1.0], [[hx, -hy, -hz], [-hx, -hy, -hz], [-hx, hy, -hz], [hx, hy, -hz]]),
    ];
    let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, corners) in faces.iter() {
        let base = vertices.len() as u16;
        for (corner, uv) in corners.iter().zip(uvs.iter()) {
            vertices.push(MeshVertex::new(*corner, *normal, *uv));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    (vertices, indices)
}

/// Renderer for the barrier and wave objects
pub struct TunnelingRenderer {
    wave_pipeline: wgpu::RenderPipeline,
    barrier_pipeline: wgpu::RenderPipeline,
    wave_mesh: Mesh,
    barrier_mesh: Mesh,

    // Camera
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,

    // Per-object materials
    wave: WaveUniform,
    wave_buffer: wgpu::Buffer,
    wave_bind_group: wgpu::BindGroup,
    barrier: BarrierUniform,
    barrier_buffer: wgpu::Buffer,
    barrier_bind_group: wgpu::BindGroup,
}

impl TunnelingRenderer {
    pub fn new(ctx: &GraphicsContext, signals: &VisualSignals) -> Self {
        let device = &ctx.device;

        let wave_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Wave Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/wave.wgsl").into()),
        });
        let barrier_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Barrier Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/barrier.wgsl").into()),
        });

        let uniform_layout_entry = wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let camera_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Camera Bind Group Layout"),
            entries: &[uniform_layout_entry],
        });
        let object_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Bind Group Layout"),
            entries: &[uniform_layout_entry],
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let wave = WaveUniform {
            model: Mat4::from_translation(signals.wave_position).to_cols_array_2d(),
            color: wave_color(signals.hue, signals.saturation, signals.lightness),
            time: signals.time,
            amplitude: signals.amplitude,
            _padding: [0.0; 2],
        };
        let wave_buffer = create_uniform_buffer(device, &wave);
        let wave_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Wave Bind Group"),
            layout: &object_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wave_buffer.as_entire_binding(),
            }],
        });

        let barrier = BarrierUniform {
            model: Mat4::from_scale(signals.barrier_scale()).to_cols_array_2d(),
            color: BARRIER_COLOR,
            light_position: LIGHT_POSITION,
            lighting: [AMBIENT, LIGHT_INTENSITY, 0.0, 0.0],
        };
        let barrier_buffer = create_uniform_buffer(device, &barrier);
        let barrier_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Barrier Bind Group"),
            layout: &object_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: barrier_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Tunneling Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &object_bind_group_layout],
            push_constant_ranges: &[],
        });

        let wave_pipeline =
            create_blended_pipeline(device, &pipeline_layout, &wave_shader, ctx.config.format, "Wave Pipeline");
        let barrier_pipeline = create_blended_pipeline(
            device,
            &pipeline_layout,
            &barrier_shader,
            ctx.config.format,
            "Barrier Pipeline",
        );

        let (vertices, indices) = wave_plane_geometry();
        let wave_mesh = Mesh::new(device, &vertices, &indices);
        let (vertices, indices) = box_geometry(BARRIER_SIZE);
        let barrier_mesh = Mesh::new(device, &vertices, &indices);

        Self {
            wave_pipeline,
            barrier_pipeline,
            wave_mesh,
            barrier_mesh,
            camera_buffer,
            camera_bind_group,
            wave,
            wave_buffer,
            wave_bind_group,
            barrier,
            barrier_buffer,
            barrier_bind_group,
        }
    }

    pub fn update_camera(&self, queue: &wgpu::Queue, camera: &Camera3D) {
        let uniform = CameraUniform::from_camera_3d(camera);
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    pub fn set_uniform(&mut self, queue: &wgpu::Queue, uniform: Uniform) {
        match uniform {
            Uniform::Time(time) => self.wave.time = time,
            Uniform::Amplitude(amplitude) => self.wave.amplitude = amplitude,
            Uniform::Color { hue, saturation, lightness } => {
                self.wave.color = wave_color(hue, saturation, lightness);
            }
        }
        self.write_wave(queue);
    }

    pub fn set_barrier_scale(&mut self, queue: &wgpu::Queue, scale: Vec3) {
        self.barrier.model = Mat4::from_scale(scale).to_cols_array_2d();
        queue.write_buffer(&self.barrier_buffer, 0, bytemuck::cast_slice(&[self.barrier]));
    }

    pub fn set_wave_position(&mut self, queue: &wgpu::Queue, position: Vec3) {
        self.wave.model = Mat4::from_translation(position).to_cols_array_2d();
        self.write_wave(queue);
    }

    fn write_wave(&self, queue: &wgpu::Queue) {
        queue.write_buffer(&self.wave_buffer, 0, bytemuck::cast_slice(&[self.wave]));
    }

    /// Clear to black, then draw the barrier followed by the wave
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&self.barrier_pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_bind_group(1, &self.barrier_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.barrier_mesh.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.barrier_mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..self.barrier_mesh.index_count, 0, 0..1);

        render_pass.set_pipeline(&self.wave_pipeline);
        render_pass.set_bind_group(1, &self.wave_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.wave_mesh.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.wave_mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..self.wave_mesh.index_count, 0, 0..1);
    }
}

/// Alpha-blended, double-sided triangle pipeline over [`MeshVertex`]
fn create_blended_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: "vs_main",
            buffers: &[MeshVertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState {
                    color: wgpu::BlendComponent {
                        src_factor: wgpu::BlendFactor::SrcAlpha,
                        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                        operation: wgpu::BlendOperation::Add,
                    },
                    alpha: wgpu::BlendComponent::OVER,
                }),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
    })
}

/// Something drawn on top of the scene in the same frame, such as the UI
pub trait Overlay {
    fn paint(&mut self, ctx: &GraphicsContext, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView);
}

/// The renderer bound to a graphics context for one frame
pub struct GpuScene<'a> {
    ctx: &'a GraphicsContext,
    renderer: &'a mut TunnelingRenderer,
    overlay: Option<&'a mut dyn Overlay>,
}

impl<'a> GpuScene<'a> {
    pub fn new(ctx: &'a GraphicsContext, renderer: &'a mut TunnelingRenderer) -> Self {
        Self {
            ctx,
            renderer,
            overlay: None,
        }
    }

    pub fn with_overlay(mut self, overlay: &'a mut dyn Overlay) -> Self {
        self.overlay = Some(overlay);
        self
    }
}

impl SceneSink for GpuScene<'_> {
    type Error = wgpu::SurfaceError;

    fn set_uniform(&mut self, uniform: Uniform) {
        self.renderer.set_uniform(&self.ctx.queue, uniform);
    }

    fn set_transform(&mut self, scale: Vec3) {
        self.renderer.set_barrier_scale(&self.ctx.queue, scale);
    }

    fn set_position(&mut self, position: Vec3) {
        self.renderer.set_wave_position(&self.ctx.queue, position);
    }

    fn render_frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.render(&mut encoder, &view);
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.paint(self.ctx, &mut encoder, &view);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
