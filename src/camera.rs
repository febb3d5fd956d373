//! Damped orbit camera around the water plane.

use glam::{Mat4, Vec3};

use crate::params::RenderConfig;

/// Keeps the eye off the poles so `look_at` stays well defined
const POLAR_MARGIN: f32 = 0.01;
const MIN_DISTANCE: f32 = 0.1;

/// Orbit camera in spherical coordinates around a target point
///
/// Input (`rotate`, `zoom`) accumulates into velocities which `update` applies
/// and then decays by the damping factor, giving the eased motion of a damped
/// orbit control.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    target: Vec3,
    distance: f32,
    /// Angle around +Y, measured from +Z towards +X (radians)
    azimuth: f32,
    /// Angle down from +Y (radians)
    polar: f32,
    azimuth_velocity: f32,
    polar_velocity: f32,
    zoom_velocity: f32,
    damping: f32,
    max_distance: f32,
}

impl OrbitCamera {
    /// Create a camera at `eye` looking at the origin
    pub fn new(eye: Vec3, config: &RenderConfig) -> Self {
        let distance = eye.length().max(MIN_DISTANCE);
        let polar = (eye.y / distance).clamp(-1.0, 1.0).acos();
        let azimuth = eye.x.atan2(eye.z);

        Self {
            target: Vec3::ZERO,
            distance,
            azimuth,
            polar: polar.clamp(POLAR_MARGIN, std::f32::consts::PI - POLAR_MARGIN),
            azimuth_velocity: 0.0,
            polar_velocity: 0.0,
            zoom_velocity: 0.0,
            damping: config.orbit_damping.clamp(0.0, 1.0),
            max_distance: config.far_plane * 0.5,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(Vec3::from_array(config.camera_position), config)
    }

    /// Queue a rotation (radians); applied gradually by `update`
    pub fn rotate(&mut self, delta_azimuth: f32, delta_polar: f32) {
        self.azimuth_velocity += delta_azimuth;
        self.polar_velocity += delta_polar;
    }

    /// Queue a zoom; positive values move the eye closer
    pub fn zoom(&mut self, delta: f32) {
        self.zoom_velocity += delta;
    }

    /// Advance one tick
    pub fn update(&mut self) {
        let d = self.damping;

        self.azimuth += self.azimuth_velocity * d;
        self.polar = (self.polar + self.polar_velocity * d)
            .clamp(POLAR_MARGIN, std::f32::consts::PI - POLAR_MARGIN);
        self.distance = (self.distance * (1.0 - self.zoom_velocity * d))
            .clamp(MIN_DISTANCE, self.max_distance.max(MIN_DISTANCE));

        self.azimuth_velocity *= 1.0 - d;
        self.polar_velocity *= 1.0 - d;
        self.zoom_velocity *= 1.0 - d;
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = self.azimuth.sin_cos();
        self.target
            + self.distance * Vec3::new(sin_polar * sin_azimuth, cos_polar, sin_polar * cos_azimuth)
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Create view-projection matrix for rendering
    pub fn view_proj(&self, aspect: f32, render_config: &RenderConfig) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye(), self.target, Vec3::Y);
        let proj = Mat4::perspective_rh(
            render_config.fov_degrees.to_radians(),
            aspect,
            render_config.near_plane,
            render_config.far_plane,
        );
        proj * view
    }
}
