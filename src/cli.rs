//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::error::Result;
use crate::params::SceneConfig;
use crate::water;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "ragingsea")]
#[command(about = "Animated procedural water surface", long_about = None)]
pub struct Args {
    /// Load a scene preset (JSON)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the effective scene preset to FILE
    #[arg(long, value_name = "FILE")]
    pub save_config: Option<PathBuf>,

    /// Override the plane subdivision count
    #[arg(long, value_name = "N")]
    pub segments: Option<u32>,

    /// Render a top-down PNG on the CPU and exit
    #[arg(long, value_name = "PNG")]
    pub snapshot: Option<PathBuf>,

    /// Edge length of headless images (pixels)
    #[arg(long, value_name = "PX", default_value_t = 512)]
    pub snapshot_size: u32,

    /// Scene time for the snapshot (seconds)
    #[arg(long, value_name = "SECONDS", default_value_t = 0.0)]
    pub time: f32,

    /// Write a grayscale preview of the small-wave noise and exit
    #[arg(long, value_name = "PNG")]
    pub noise_preview: Option<PathBuf>,

    /// Noise preview sampling frequency (lattice cells per pixel)
    #[arg(long, value_name = "F", default_value_t = 0.05)]
    pub noise_frequency: f64,
}

impl Args {
    /// Build the scene from the preset file (if any) plus flag overrides
    pub fn scene_config(&self) -> Result<SceneConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let config = SceneConfig::from_file(path)?;
                log::info!("Loaded preset {}", path.display());
                config
            }
            None => SceneConfig::default(),
        };

        if let Some(segments) = self.segments {
            config.render.plane_segments = water::clamp_segments(segments);
        }

        Ok(config)
    }

    /// True when the run only writes files and never opens a window
    pub fn is_headless(&self) -> bool {
        self.snapshot.is_some() || self.noise_preview.is_some()
    }
}
