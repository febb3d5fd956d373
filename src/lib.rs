//! Raging Sea library - procedural water surface evaluation and rendering

pub mod camera;
pub mod cli;
pub mod driver;
pub mod error;
pub mod events;
pub mod noise;
pub mod panel;
pub mod params;
pub mod rendering;
pub mod snapshot;
pub mod water;
