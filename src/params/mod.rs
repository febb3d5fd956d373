//! Parameter definitions with documented ranges and defaults.
//!
//! All magic numbers of the scene live here:
//! - Water shape and color parameters (panel-tunable)
//! - Window, camera and mesh setup
//! - JSON presets combining both

mod color;
mod render;
mod scene;
mod water;

// Re-export all types
pub use color::Rgb;
pub use render::RenderConfig;
pub use scene::SceneConfig;
pub use water::{ranges, ParamRange, WaterParams};
