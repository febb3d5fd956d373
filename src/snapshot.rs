//! Headless CPU renders: a top-down view of the shaded water and raw noise
//! previews, both written as PNG.

use std::path::Path;

use image::{GrayImage, RgbImage};
use noise::NoiseFn;
use rayon::prelude::*;

use crate::error::Result;
use crate::params::WaterParams;
use crate::water;

/// Map a pixel index to the center of its cell on the [-1, 1] plane
fn plane_coord(pixel: u32, size: u32) -> f32 {
    -1.0 + 2.0 * (pixel as f32 + 0.5) / size as f32
}

/// Top-down render of the plane at `time`, one elevation sample per pixel
///
/// Image X follows world X and image Y follows world Z.
pub fn render_top_down(params: &WaterParams, time: f32, size: u32) -> RgbImage {
    let size = size.max(1);
    let mut img = RgbImage::new(size, size);
    let row_len = size as usize * 3;

    img.par_chunks_mut(row_len).enumerate().for_each(|(py, row)| {
        let z = plane_coord(py as u32, size);
        for (px, pixel) in row.chunks_exact_mut(3).enumerate() {
            let x = plane_coord(px as u32, size);
            let elevation = water::evaluate(x, z, time, params);
            pixel.copy_from_slice(&water::shade(elevation, params).to_rgb8());
        }
    });

    img
}

/// Grayscale slice of a 3D noise function at depth `z`
///
/// Noise in [-1, 1] maps to [0, 255]; values outside are clamped.
pub fn noise_preview<N>(noise: &N, size: u32, frequency: f64, z: f64) -> GrayImage
where
    N: NoiseFn<f64, 3> + Sync,
{
    let size = size.max(1);
    let mut img = GrayImage::new(size, size);

    img.par_chunks_mut(size as usize)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, gray) in row.iter_mut().enumerate() {
                let value = noise.get([x as f64 * frequency, y as f64 * frequency, z]);
                *gray = ((value + 1.0) * 127.5).clamp(0.0, 255.0) as u8;
            }
        });

    img
}

/// Render the water top-down and save it as PNG
pub fn save_top_down(path: &Path, params: &WaterParams, time: f32, size: u32) -> Result<()> {
    let img = render_top_down(params, time, size);
    img.save(path)?;
    log::info!("Wrote {}x{} snapshot at t={:.2}s to {}", size, size, time, path.display());
    Ok(())
}

/// Render a noise preview and save it as PNG
pub fn save_noise_preview<N>(path: &Path, noise: &N, size: u32, frequency: f64, z: f64) -> Result<()>
where
    N: NoiseFn<f64, 3> + Sync,
{
    let img = noise_preview(noise, size, frequency, z);
    img.save(path)?;
    log::info!("Wrote {}x{} noise preview to {}", size, size, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::ClassicNoise;
    use crate::params::Rgb;

    #[test]
    fn test_plane_coord_covers_plane() {
        assert!((plane_coord(0, 2) + 0.5).abs() < 1e-6);
        assert!((plane_coord(1, 2) - 0.5).abs() < 1e-6);
        assert!(plane_coord(0, 512) > -1.0);
        assert!(plane_coord(511, 512) < 1.0);
    }

    #[test]
    fn test_top_down_matches_evaluator() {
        let params = WaterParams::default();
        let img = render_top_down(&params, 1.5, 16);
        assert_eq!(img.dimensions(), (16, 16));

        let (px, py) = (5, 11);
        let elevation = water::evaluate(plane_coord(px, 16), plane_coord(py, 16), 1.5, &params);
        let expected = water::shade(elevation, &params).to_rgb8();
        assert_eq!(img.get_pixel(px, py).0, expected);
    }

    #[test]
    fn test_flat_water_is_single_color() {
        let params = WaterParams {
            big_wave_elevation: 0.0,
            small_wave_iterations: 0.0,
            color_offset: 0.0,
            depth_color: Rgb::new(1.0, 0.0, 0.0),
            ..Default::default()
        };
        let img = render_top_down(&params, 0.0, 8);
        assert!(img.pixels().all(|p| p.0 == [255, 0, 0]));
    }

    #[test]
    fn test_noise_preview_lattice_is_mid_gray() {
        // Integer coordinates sit on lattice points where the noise is zero
        let img = noise_preview(&ClassicNoise, 8, 1.0, 0.0);
        assert!(img.pixels().all(|p| p.0[0] == 127));
    }

    #[test]
    fn test_noise_preview_has_contrast() {
        let img = noise_preview(&ClassicNoise, 64, 0.07, 0.5);
        let min = img.pixels().map(|p| p.0[0]).min().unwrap();
        let max = img.pixels().map(|p| p.0[0]).max().unwrap();
        assert!(max - min > 64, "range {}..{}", min, max);
    }

    #[test]
    fn test_save_top_down_writes_png() {
        let path = std::env::temp_dir().join(format!("ragingsea-{}-top.png", std::process::id()));
        save_top_down(&path, &WaterParams::default(), 0.0, 8).unwrap();
        let loaded = image::open(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.width(), 8);
    }
}
