//! Rendering system with wgpu pipeline, shader uniforms and egui overlay.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::driver::FrameSnapshot;
use crate::error::{Result, WaterError};
use crate::panel;
use crate::params::WaterParams;
use crate::water::{self, Vertex, WaterGrid};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Uniform block for `shader.wgsl` (must match `struct Water` field for field)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct WaterUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub depth_color: [f32; 3],
    pub color_offset: f32,
    pub surface_color: [f32; 3],
    pub color_multiplier: f32,
    pub big_wave_frequency: [f32; 2],
    pub big_wave_elevation: f32,
    pub big_wave_speed: f32,
    pub small_wave_elevation: f32,
    pub small_wave_frequency: f32,
    pub small_wave_speed: f32,
    /// Already floored and capped, see `water::octave_count`
    pub small_wave_octaves: u32,
    pub time: f32,
    pub _padding: [f32; 3], // WGSL struct size rounds up to 16 bytes
}

impl WaterUniforms {
    pub fn new(view_proj: Mat4, time: f32, params: &WaterParams) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            depth_color: params.depth_color.to_array(),
            color_offset: params.color_offset,
            surface_color: params.surface_color.to_array(),
            color_multiplier: params.color_multiplier,
            big_wave_frequency: params.big_wave_frequency,
            big_wave_elevation: params.big_wave_elevation,
            big_wave_speed: params.big_wave_speed,
            small_wave_elevation: params.small_wave_elevation,
            small_wave_frequency: params.small_wave_frequency,
            small_wave_speed: params.small_wave_speed,
            small_wave_octaves: water::octave_count(params.small_wave_iterations),
            time,
            _padding: [0.0; 3],
        }
    }
}

/// Pixels per point for drawing the panel onto the surface
///
/// egui lays out against the window at its native scale. When the pixel
/// ratio cap makes the surface smaller than the window, points map to
/// proportionally fewer surface pixels so the panel keeps its place and
/// pointer hits stay aligned.
fn overlay_pixels_per_point(egui_ppp: f32, surface_width: u32, window_width: u32) -> f32 {
    if window_width == 0 {
        return egui_ppp;
    }
    egui_ppp * surface_width as f32 / window_width as f32
}

/// Tessellated panel waiting to be drawn with the next frame
struct PreparedUi {
    primitives: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    pixels_per_point: f32,
}

/// Rendering system managing wgpu device, pipeline, buffers and the panel overlay
pub struct RenderSystem {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    index_count: u32,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    prepared_ui: Option<PreparedUi>,
}

impl RenderSystem {
    /// Create new rendering system
    pub async fn new(window: Arc<Window>, water_grid: &WaterGrid) -> Result<Self> {
        let size = window.inner_size();

        // Create wgpu instance
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Create surface (window must have 'static lifetime via Arc)
        let surface = instance.create_surface(Arc::clone(&window))?;

        // Request adapter
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(WaterError::NoAdapter)?;

        log::info!("Using adapter: {}", adapter.get_info().name);

        // Request device
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        // Colors are authored as display values and written unconverted,
        // so prefer a non-sRGB target
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Load shader
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Water Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        // Create buffers
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(&water_grid.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&water_grid.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniforms = WaterUniforms::new(Mat4::IDENTITY, 0.0, &WaterParams::default());
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Water Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Water Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Water Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Water Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Water Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x3,
                        },
                        wgpu::VertexAttribute {
                            offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32x2,
                        },
                    ],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let depth_view = Self::create_depth_view(&device, &config);

        // Panel overlay
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            render_pipeline,
            vertex_buffer,
            index_buffer,
            uniform_buffer,
            uniform_bind_group,
            depth_view,
            index_count: water_grid.indices.len() as u32,
            egui_ctx,
            egui_state,
            egui_renderer,
            prepared_ui: None,
        })
    }

    fn create_depth_view(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Reconfigure the surface for a new drawable size
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = Self::create_depth_view(&self.device, &self.config);
    }

    /// Reconfigure with the current size (after a lost or outdated surface)
    pub fn reconfigure(&mut self) {
        self.resize(self.config.width, self.config.height);
    }

    /// Let the panel see a window event; returns true if it consumed it
    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.egui_state.on_window_event(window, event).consumed
    }

    /// Run the parameter panel, applying edits to `params` before the frame snapshot.
    /// Returns true if a value changed.
    pub fn run_panel(&mut self, window: &Window, params: &mut WaterParams) -> bool {
        let raw_input = self.egui_state.take_egui_input(window);
        let mut changed = false;
        let output = self.egui_ctx.run(raw_input, |ctx| {
            changed |= panel::draw(ctx, params);
        });

        self.egui_state
            .handle_platform_output(window, output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(output.shapes, output.pixels_per_point);

        self.prepared_ui = Some(PreparedUi {
            primitives,
            textures_delta: output.textures_delta,
            pixels_per_point: overlay_pixels_per_point(
                output.pixels_per_point,
                self.config.width,
                window.inner_size().width,
            ),
        });
        changed
    }

    /// Render one frame from its snapshot, with the panel on top
    pub fn render(&mut self, snapshot: &FrameSnapshot) -> std::result::Result<(), wgpu::SurfaceError> {
        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&[snapshot.uniforms]),
        );

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let ui = self.prepared_ui.take();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: ui.as_ref().map_or(1.0, |ui| ui.pixels_per_point),
        };

        let mut panel_commands = Vec::new();
        if let Some(ui) = &ui {
            for (id, image_delta) in &ui.textures_delta.set {
                self.egui_renderer
                    .update_texture(&self.device, &self.queue, *id, image_delta);
            }
            panel_commands = self.egui_renderer.update_buffers(
                &self.device,
                &self.queue,
                &mut encoder,
                &ui.primitives,
                &screen_descriptor,
            );
        }

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Water Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..self.index_count, 0, 0..1);
        }

        if let Some(ui) = &ui {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Panel Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();

            self.egui_renderer
                .render(&mut render_pass, &ui.primitives, &screen_descriptor);
        }

        self.queue
            .submit(panel_commands.into_iter().chain(std::iter::once(encoder.finish())));
        output.present();

        if let Some(ui) = ui {
            for id in &ui.textures_delta.free {
                self.egui_renderer.free_texture(id);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_block_size() {
        // mat4 (64) + two vec3/f32 pairs (32) + vec2 (8) + 7 scalars (28) + pad (12)
        assert_eq!(std::mem::size_of::<WaterUniforms>(), 144);
        assert_eq!(std::mem::size_of::<WaterUniforms>() % 16, 0);
    }

    #[test]
    fn test_uniforms_mirror_params() {
        let params = WaterParams {
            small_wave_iterations: 3.6,
            ..WaterParams::default()
        };
        let u = WaterUniforms::new(Mat4::IDENTITY, 4.5, &params);
        assert_eq!(u.time, 4.5);
        assert_eq!(u.big_wave_frequency, [4.0, 1.5]);
        assert_eq!(u.small_wave_octaves, 3);
        assert_eq!(u.depth_color, params.depth_color.to_array());
    }

    #[test]
    fn test_overlay_scale_follows_capped_surface() {
        // 900x600 window at 3x, surface capped to 600x400
        let ppp = overlay_pixels_per_point(3.0, 600, 900);
        assert_eq!(ppp, 2.0);
        // egui's 300-point-wide screen fills the 600-pixel surface exactly
        assert_eq!(600.0 / ppp, 900.0 / 3.0);

        assert_eq!(overlay_pixels_per_point(2.0, 1600, 1600), 2.0);
        assert_eq!(overlay_pixels_per_point(1.5, 800, 0), 1.5);
    }

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 20);
    }
}
