//! Per-vertex wave elevation.
//!
//! `elevation = sin(x·fx + t·s) · sin(z·fz + t·s) · A`
//! `          − Σ_{i=1..n} |noise(x·f·i, z·f·i, t·s') · a / i|`
//!
//! Mirrors `vs_main` in `shader.wgsl` step for step.

use crate::noise::classic_noise3;
use crate::params::WaterParams;

/// Hard cap on the octave loop, so non-finite iteration counts still terminate.
pub const MAX_OCTAVES: u32 = 64;

/// Number of detail octaves for an iteration control value.
///
/// Fractional values are floored; negative and NaN values give zero octaves.
pub fn octave_count(iterations: f32) -> u32 {
    if iterations >= 1.0 {
        (iterations.floor() as u32).min(MAX_OCTAVES)
    } else {
        0
    }
}

/// Long-wavelength swell: product of two travelling sines.
#[inline]
pub fn big_wave(x: f32, z: f32, time: f32, params: &WaterParams) -> f32 {
    let phase = time * params.big_wave_speed;
    (x * params.big_wave_frequency[0] + phase).sin()
        * (z * params.big_wave_frequency[1] + phase).sin()
        * params.big_wave_elevation
}

/// Contribution of one detail octave (`octave` starts at 1). Always ≥ 0 for
/// non-negative elevation; it is subtracted from the swell.
#[inline]
pub fn small_wave_octave(x: f32, z: f32, time: f32, params: &WaterParams, octave: u32) -> f32 {
    let i = octave as f32;
    let scale = params.small_wave_frequency * i;
    let n = classic_noise3(x * scale, z * scale, time * params.small_wave_speed);
    (n * params.small_wave_elevation / i).abs()
}

/// Surface elevation at world position `(x, z)` after `time` seconds.
pub fn evaluate(x: f32, z: f32, time: f32, params: &WaterParams) -> f32 {
    let mut elevation = big_wave(x, z, time, params);

    for octave in 1..=octave_count(params.small_wave_iterations) {
        elevation -= small_wave_octave(x, z, time, params, octave);
    }

    elevation
}
