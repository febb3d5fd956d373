//! Raging Sea - animated procedural water surface
//!
//! A big sine swell with octaves of gradient noise carved out of it, shaded
//! from depth color to surface color, with a live parameter panel.

use std::cell::Cell;
use std::f32::consts::TAU;
use std::rc::Rc;
use std::sync::Arc;

use clap::Parser;
use env_logger::Env;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalPosition,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use ragingsea::cli::Args;
use ragingsea::driver::{SceneDriver, Viewport};
use ragingsea::error::Result;
use ragingsea::events::Subscription;
use ragingsea::noise::ClassicNoise;
use ragingsea::params::SceneConfig;
use ragingsea::rendering::RenderSystem;
use ragingsea::snapshot;
use ragingsea::water::WaterGrid;

/// Zoom per wheel line
const ZOOM_PER_LINE: f32 = 0.1;
const ZOOM_PER_PIXEL: f32 = 0.002;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Scene
    driver: SceneDriver,
    pending_resize: Rc<Cell<Option<Viewport>>>,
    _resize_subscription: Subscription,

    // Orbit input
    dragging: bool,
    last_cursor: Option<PhysicalPosition<f64>>,
}

impl App {
    fn new(config: SceneConfig) -> Self {
        let driver = SceneDriver::new(config.water, config.render);

        let pending_resize = Rc::new(Cell::new(None));
        let sink = Rc::clone(&pending_resize);
        let resize_subscription = driver.on_resize(move |viewport| sink.set(Some(*viewport)));

        Self {
            window: None,
            render_system: None,
            driver,
            pending_resize,
            _resize_subscription: resize_subscription,
            dragging: false,
            last_cursor: None,
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let render_config = self.driver.render_config();
        let window_attributes = Window::default_attributes()
            .with_title("Raging Sea")
            .with_inner_size(winit::dpi::LogicalSize::new(
                render_config.window_width,
                render_config.window_height,
            ));
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let mut grid = WaterGrid::new(render_config.plane_size, render_config.plane_segments);
        log::info!(
            "Water grid: {} segments, {} vertices, {} triangles",
            grid.segments(),
            grid.vertices.len(),
            grid.indices.len() / 3
        );
        grid.update_elevations(0.0, self.driver.params());
        let (low, high) = grid.elevation_bounds();
        log::debug!("Initial elevation range [{:.3}, {:.3}]", low, high);

        let render_system = pollster::block_on(RenderSystem::new(Arc::clone(&window), &grid))?;

        self.window = Some(Arc::clone(&window));
        self.render_system = Some(render_system);

        let size = window.inner_size();
        self.driver
            .resize(size.width, size.height, window.scale_factor());
        self.apply_pending_resize();

        log::info!("Drag to orbit, scroll to zoom, ESC to quit");
        Ok(())
    }

    /// Forward a viewport change published by the driver to the renderer
    fn apply_pending_resize(&mut self) {
        if let (Some(viewport), Some(render_system)) =
            (self.pending_resize.take(), self.render_system.as_mut())
        {
            render_system.resize(viewport.width, viewport.height);
        }
    }

    fn handle_cursor(&mut self, position: PhysicalPosition<f64>) {
        if self.dragging {
            if let Some(last) = self.last_cursor {
                // One full turn per window height, like a mouse-driven orbit control
                let height = self
                    .window
                    .as_ref()
                    .map_or(1.0, |w| w.inner_size().height.max(1) as f32);
                let dx = (position.x - last.x) as f32;
                let dy = (position.y - last.y) as f32;
                self.driver
                    .camera_mut()
                    .rotate(-TAU * dx / height, -TAU * dy / height);
            }
        }
        self.last_cursor = Some(position);
    }

    fn handle_wheel(&mut self, delta: MouseScrollDelta) {
        let amount = match delta {
            MouseScrollDelta::LineDelta(_, y) => y * ZOOM_PER_LINE,
            MouseScrollDelta::PixelDelta(p) => p.y as f32 * ZOOM_PER_PIXEL,
        };
        self.driver.camera_mut().zoom(amount);
    }

    /// Render a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(render_system)) = (&self.window, self.render_system.as_mut()) else {
            return;
        };

        // Panel edits land before the snapshot so the whole frame sees them
        render_system.run_panel(window, self.driver.params_mut());
        let snapshot = self.driver.tick_clock();

        match render_system.render(&snapshot) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_system.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        if let Err(e) = self.init_window(event_loop) {
            log::error!("Failed to initialize: {}", e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(window), Some(render_system)) = (&self.window, self.render_system.as_mut()) {
            if render_system.handle_event(window, &event) {
                self.dragging = false;
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                let scale_factor = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                self.driver.resize(size.width, size.height, scale_factor);
                self.apply_pending_resize();
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = state == ElementState::Pressed;
            }
            WindowEvent::CursorMoved { position, .. } => self.handle_cursor(position),
            WindowEvent::MouseWheel { delta, .. } => self.handle_wheel(delta),
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = args.scene_config()?;

    if let Some(path) = &args.save_config {
        config.to_file(path)?;
        log::info!("Saved preset to {}", path.display());
    }

    if args.is_headless() {
        if let Some(path) = &args.snapshot {
            snapshot::save_top_down(path, &config.water, args.time, args.snapshot_size)?;
        }
        if let Some(path) = &args.noise_preview {
            snapshot::save_noise_preview(
                path,
                &ClassicNoise,
                args.snapshot_size,
                args.noise_frequency,
                (args.time * config.water.small_wave_speed) as f64,
            )?;
        }
        return Ok(());
    }

    let mut app = App::new(config);
    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Raging Sea starting");

    if let Err(e) = run(args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
