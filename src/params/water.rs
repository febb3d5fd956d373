//! Water surface parameters and their panel ranges.

use serde::{Deserialize, Serialize};

use super::color::Rgb;

/// Slider bounds for a tunable parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn as_inclusive(&self) -> std::ops::RangeInclusive<f32> {
        self.min..=self.max
    }
}

/// Panel ranges. Only the sliders enforce these; the evaluator takes any value.
pub mod ranges {
    use super::ParamRange;

    pub const BIG_WAVE_ELEVATION: ParamRange = ParamRange::new(0.0, 1.0, 0.001);
    pub const BIG_WAVE_FREQUENCY: ParamRange = ParamRange::new(0.0, 10.0, 0.001);
    pub const BIG_WAVE_SPEED: ParamRange = ParamRange::new(0.0, 4.0, 0.001);
    pub const SMALL_WAVE_ELEVATION: ParamRange = ParamRange::new(0.0, 1.0, 0.001);
    pub const SMALL_WAVE_FREQUENCY: ParamRange = ParamRange::new(0.0, 30.0, 0.001);
    pub const SMALL_WAVE_SPEED: ParamRange = ParamRange::new(0.0, 4.0, 0.001);
    pub const SMALL_WAVE_ITERATIONS: ParamRange = ParamRange::new(0.0, 5.0, 1.0);
    pub const COLOR_OFFSET: ParamRange = ParamRange::new(0.0, 1.0, 0.001);
    pub const COLOR_MULTIPLIER: ParamRange = ParamRange::new(0.0, 10.0, 0.001);
}

/// Tunable water parameters, read as one snapshot per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterParams {
    // === Big waves (long-wavelength swell) ===
    /// Swell amplitude (world units)
    pub big_wave_elevation: f32,

    /// Spatial frequency along world X and world Z
    pub big_wave_frequency: [f32; 2],

    /// Phase speed (radians per second)
    pub big_wave_speed: f32,

    // === Small waves (noise detail carved out of the swell) ===
    pub small_wave_elevation: f32,
    pub small_wave_frequency: f32,

    /// Scroll speed of the noise along its time axis
    pub small_wave_speed: f32,

    /// Octave count. Integer-valued; fractional values are floored
    pub small_wave_iterations: f32,

    // === Coloring ===
    pub depth_color: Rgb,
    pub surface_color: Rgb,
    pub color_offset: f32,
    pub color_multiplier: f32,
}

impl Default for WaterParams {
    fn default() -> Self {
        Self {
            big_wave_elevation: 0.2,
            big_wave_frequency: [4.0, 1.5],
            big_wave_speed: 0.75,

            small_wave_elevation: 0.15,
            small_wave_frequency: 3.0,
            small_wave_speed: 0.2,
            small_wave_iterations: 4.0,

            depth_color: Rgb::new(24.0 / 255.0, 102.0 / 255.0, 145.0 / 255.0), // #186691
            surface_color: Rgb::new(155.0 / 255.0, 216.0 / 255.0, 1.0),        // #9bd8ff
            color_offset: 0.08,
            color_multiplier: 5.0,
        }
    }
}

impl WaterParams {
    /// Names of fields holding values outside their panel range
    pub fn out_of_range_fields(&self) -> Vec<&'static str> {
        let checks = [
            ("big_wave_elevation", self.big_wave_elevation, ranges::BIG_WAVE_ELEVATION),
            ("big_wave_frequency.x", self.big_wave_frequency[0], ranges::BIG_WAVE_FREQUENCY),
            ("big_wave_frequency.y", self.big_wave_frequency[1], ranges::BIG_WAVE_FREQUENCY),
            ("big_wave_speed", self.big_wave_speed, ranges::BIG_WAVE_SPEED),
            ("small_wave_elevation", self.small_wave_elevation, ranges::SMALL_WAVE_ELEVATION),
            ("small_wave_frequency", self.small_wave_frequency, ranges::SMALL_WAVE_FREQUENCY),
            ("small_wave_speed", self.small_wave_speed, ranges::SMALL_WAVE_SPEED),
            ("small_wave_iterations", self.small_wave_iterations, ranges::SMALL_WAVE_ITERATIONS),
            ("color_offset", self.color_offset, ranges::COLOR_OFFSET),
            ("color_multiplier", self.color_multiplier, ranges::COLOR_MULTIPLIER),
        ];

        checks
            .into_iter()
            .filter(|(_, value, range)| !range.contains(*value))
            .map(|(name, _, _)| name)
            .collect()
    }
}
