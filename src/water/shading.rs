//! Elevation → color, same as `fs_main` in `shader.wgsl`.

use crate::params::{Rgb, WaterParams};

/// Blend factor between depth and surface color, clamped to [0, 1]
pub fn mix_factor(elevation: f32, params: &WaterParams) -> f32 {
    ((elevation + params.color_offset) * params.color_multiplier).clamp(0.0, 1.0)
}

/// Water color for a given elevation
pub fn shade(elevation: f32, params: &WaterParams) -> Rgb {
    params
        .depth_color
        .lerp(params.surface_color, mix_factor(elevation, params))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_troughs_use_depth_color() {
        let params = WaterParams::default();
        assert_eq!(shade(-1.0, &params), params.depth_color);
    }

    #[test]
    fn test_crests_use_surface_color() {
        let params = WaterParams::default();
        assert_eq!(shade(1.0, &params), params.surface_color);
    }

    #[test]
    fn test_mix_factor_linear_in_band() {
        let params = WaterParams::default();
        // (0.02 + 0.08) * 5 = 0.5
        assert!((mix_factor(0.02, &params) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_mix_factor_nan_passes_through() {
        // clamp keeps NaN; the evaluator never produces it for finite input
        let params = WaterParams::default();
        assert!(mix_factor(f32::NAN, &params).is_nan());
    }
}
