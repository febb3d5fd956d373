//! Window, camera and mesh configuration.

use serde::{Deserialize, Serialize};

/// Rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Vertical field of view (degrees)
    /// 100° = very wide, the surface fills the view from the starting eye
    pub fov_degrees: f32,

    /// Near clipping plane (world units)
    pub near_plane: f32,

    /// Far clipping plane (world units)
    pub far_plane: f32,

    /// Upper bound on the device pixel ratio used for the surface
    pub max_pixel_ratio: f64,

    /// Side length of the square water plane (world units)
    pub plane_size: f32,

    /// Subdivisions per side of the water plane
    pub plane_segments: u32,

    /// Initial camera eye, orbiting the origin
    pub camera_position: [f32; 3],

    /// Fraction of orbit velocity applied (and removed) per tick
    pub orbit_damping: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fov_degrees: 100.0,
            near_plane: 0.1,
            far_plane: 100.0,
            max_pixel_ratio: 2.0,
            plane_size: 2.0,
            plane_segments: 512,
            camera_position: [1.0, 1.0, 1.0],
            orbit_damping: 0.05,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio() {
        let config = RenderConfig::default();
        assert!((config.aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_aspect_ratio_zero_height() {
        let config = RenderConfig {
            window_height: 0,
            ..RenderConfig::default()
        };
        assert!(config.aspect_ratio().is_finite());
    }
}
