//! Water plane mesh and CPU-side elevation buffer.

use bytemuck::{Pod, Zeroable};
use rayon::prelude::*;

use super::elevation;
use crate::params::WaterParams;

/// Vertex data for the water mesh (position + UV coordinates)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Flat, subdivided XZ plane centred on the origin
///
/// Vertices stay flat; displacement happens per frame in the vertex shader.
/// `elevations` holds the same displacement computed on the CPU, refreshed by
/// [`WaterGrid::update_elevations`].
pub struct WaterGrid {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub elevations: Vec<f32>,
    segments: u32,
    size: f32,
}

/// Largest subdivision count; keeps every vertex index inside `u32`
pub const MAX_SEGMENTS: u32 = 4096;

/// Clamp a requested subdivision count to `1..=MAX_SEGMENTS`
pub fn clamp_segments(segments: u32) -> u32 {
    if segments > MAX_SEGMENTS {
        log::warn!("{} segments requested, using {}", segments, MAX_SEGMENTS);
    }
    segments.clamp(1, MAX_SEGMENTS)
}

impl WaterGrid {
    /// Create a `size` × `size` plane split into `segments` cells per side
    ///
    /// `segments` goes through [`clamp_segments`].
    pub fn new(size: f32, segments: u32) -> Self {
        let segments = clamp_segments(segments);
        let half_size = size / 2.0;
        let step = size / segments as f32;
        let row = segments + 1;

        let cells = segments as usize * segments as usize;
        let mut vertices = Vec::with_capacity(row as usize * row as usize);
        let mut indices = Vec::with_capacity(cells * 6);

        // Row-major from -Z to +Z
        for z in 0..=segments {
            for x in 0..=segments {
                vertices.push(Vertex {
                    position: [x as f32 * step - half_size, 0.0, z as f32 * step - half_size],
                    uv: [x as f32 / segments as f32, z as f32 / segments as f32],
                });
            }
        }

        // Counter-clockwise seen from +Y
        for z in 0..segments {
            for x in 0..segments {
                let top_left = z * row + x;
                let top_right = top_left + 1;
                let bottom_left = (z + 1) * row + x;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }

        let elevations = vec![0.0; vertices.len()];

        Self {
            vertices,
            indices,
            elevations,
            segments,
            size,
        }
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Recompute every vertex elevation for one frame snapshot
    ///
    /// Vertices are independent, so rows are evaluated in parallel; the
    /// result is identical to a sequential pass.
    pub fn update_elevations(&mut self, time_s: f32, params: &WaterParams) {
        self.elevations
            .par_iter_mut()
            .zip(self.vertices.par_iter())
            .for_each(|(elevation, vertex)| {
                *elevation =
                    elevation::evaluate(vertex.position[0], vertex.position[2], time_s, params);
            });
    }

    /// Elevation range `(min, max)` of the last update
    pub fn elevation_bounds(&self) -> (f32, f32) {
        self.elevations
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &e| {
                (lo.min(e), hi.max(e))
            })
    }
}
