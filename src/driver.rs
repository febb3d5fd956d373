//! Scene driver: clock, viewport, camera and the per-frame parameter snapshot.

use std::time::Instant;

use glam::Mat4;

use crate::camera::OrbitCamera;
use crate::events::{EventHub, Subscription};
use crate::params::{RenderConfig, WaterParams};
use crate::rendering::WaterUniforms;

/// Monotonic clock starting at zero on construction
#[derive(Debug, Clone)]
pub struct Clock {
    start: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Seconds since construction
    pub fn elapsed_s(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Drawable size in pixels, after the pixel ratio cap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    /// Device pixel ratio, capped by `RenderConfig::max_pixel_ratio`
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Everything one frame reads, captured once so every vertex sees the same values
#[derive(Debug, Clone, Copy)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub elapsed_s: f32,
    pub view_proj: Mat4,
    pub uniforms: WaterUniforms,
}

/// Owns the animation state and hands out frame snapshots
///
/// The host calls [`SceneDriver::tick`] once per presented frame. Tests call
/// it directly with synthetic time values.
pub struct SceneDriver {
    params: WaterParams,
    render_config: RenderConfig,
    camera: OrbitCamera,
    viewport: Viewport,
    clock: Clock,
    elapsed_s: f32,
    frame: u64,
    resize_events: EventHub<Viewport>,
}

impl SceneDriver {
    pub fn new(params: WaterParams, render_config: RenderConfig) -> Self {
        let camera = OrbitCamera::from_config(&render_config);
        let viewport = Viewport {
            width: render_config.window_width,
            height: render_config.window_height,
            pixel_ratio: 1.0,
        };

        Self {
            params,
            render_config,
            camera,
            viewport,
            clock: Clock::new(),
            elapsed_s: 0.0,
            frame: 0,
            resize_events: EventHub::new(),
        }
    }

    /// Produce the snapshot for a frame at `elapsed_s`
    ///
    /// Time never runs backwards: an earlier value than the previous tick is
    /// treated as no time passing. Parameters are read, never written.
    pub fn tick(&mut self, elapsed_s: f32) -> FrameSnapshot {
        if elapsed_s > self.elapsed_s {
            self.elapsed_s = elapsed_s;
        }
        self.camera.update();
        self.frame += 1;

        let view_proj = self
            .camera
            .view_proj(self.viewport.aspect_ratio(), &self.render_config);

        FrameSnapshot {
            frame: self.frame,
            elapsed_s: self.elapsed_s,
            view_proj,
            uniforms: WaterUniforms::new(view_proj, self.elapsed_s, &self.params),
        }
    }

    /// Tick with the driver's own clock
    pub fn tick_clock(&mut self) -> FrameSnapshot {
        let now = self.clock.elapsed_s();
        self.tick(now)
    }

    /// Apply a new window size and notify resize subscribers
    ///
    /// `width`/`height` are physical pixels at `scale_factor`. The drawable
    /// size is rescaled so its pixel ratio never exceeds the configured cap.
    pub fn resize(&mut self, width: u32, height: u32, scale_factor: f64) {
        let scale_factor = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        let pixel_ratio = scale_factor.min(self.render_config.max_pixel_ratio);
        let rescale = |physical: u32| ((physical as f64 / scale_factor * pixel_ratio).round() as u32).max(1);

        let viewport = Viewport {
            width: rescale(width),
            height: rescale(height),
            pixel_ratio,
        };
        if viewport == self.viewport {
            return;
        }

        log::debug!(
            "Viewport {}x{} @ {:.2}x",
            viewport.width,
            viewport.height,
            viewport.pixel_ratio
        );
        self.viewport = viewport;
        self.resize_events.emit(&viewport);
    }

    /// Listen for viewport changes until the returned guard is dropped
    pub fn on_resize(&self, listener: impl FnMut(&Viewport) + 'static) -> Subscription {
        self.resize_events.subscribe(listener)
    }

    pub fn params(&self) -> &WaterParams {
        &self.params
    }

    /// Panel access; call between ticks
    pub fn params_mut(&mut self) -> &mut WaterParams {
        &mut self.params
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn render_config(&self) -> &RenderConfig {
        &self.render_config
    }

    pub fn elapsed_s(&self) -> f32 {
        self.elapsed_s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn driver() -> SceneDriver {
        SceneDriver::new(WaterParams::default(), RenderConfig::default())
    }

    #[test]
    fn test_tick_with_synthetic_time() {
        let mut driver = driver();
        let a = driver.tick(0.5);
        let b = driver.tick(1.25);
        assert_eq!(a.frame, 1);
        assert_eq!(b.frame, 2);
        assert_eq!(a.uniforms.time, 0.5);
        assert_eq!(b.uniforms.time, 1.25);
    }

    #[test]
    fn test_time_is_monotonic() {
        let mut driver = driver();
        driver.tick(2.0);
        let snapshot = driver.tick(1.0);
        assert_eq!(snapshot.elapsed_s, 2.0);
    }

    #[test]
    fn test_tick_does_not_mutate_params() {
        let mut driver = driver();
        let before = driver.params().clone();
        for i in 0..10 {
            driver.tick(i as f32 * 0.016);
        }
        assert_eq!(driver.params(), &before);
    }

    #[test]
    fn test_panel_change_lands_in_next_snapshot() {
        let mut driver = driver();
        let first = driver.tick(0.1);
        driver.params_mut().big_wave_elevation = 0.9;
        let second = driver.tick(0.2);
        assert_eq!(first.uniforms.big_wave_elevation, 0.2);
        assert_eq!(second.uniforms.big_wave_elevation, 0.9);
    }

    #[test]
    fn test_resize_caps_pixel_ratio_and_notifies() {
        let mut driver = driver();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let subscription = driver.on_resize(move |v| sink.borrow_mut().push(*v));

        driver.resize(900, 600, 3.0);
        driver.resize(900, 600, 3.0); // unchanged, no event
        drop(subscription);
        driver.resize(640, 480, 1.0);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!((seen[0].width, seen[0].height), (600, 400));
        assert_eq!(seen[0].pixel_ratio, 2.0);
        assert_eq!(driver.viewport().width, 640);
    }

    #[test]
    fn test_resize_changes_projection() {
        let mut driver = driver();
        let wide = driver.tick(0.0).view_proj;
        driver.resize(400, 800, 1.0);
        let tall = driver.tick(0.0).view_proj;
        assert_ne!(wide, tall);
    }

    #[test]
    fn test_clock_tick_advances() {
        let mut driver = driver();
        let a = driver.tick_clock();
        let b = driver.tick_clock();
        assert!(b.elapsed_s >= a.elapsed_s);
    }
}
