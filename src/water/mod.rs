//! Water surface: elevation field, shading and plane mesh.

pub mod elevation;
mod mesh;
pub mod shading;

// Re-export public types
pub use elevation::{evaluate, octave_count, MAX_OCTAVES};
pub use mesh::{clamp_segments, Vertex, WaterGrid, MAX_SEGMENTS};
pub use shading::shade;
