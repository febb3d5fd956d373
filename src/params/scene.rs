//! Scene presets stored as JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::render::RenderConfig;
use super::water::WaterParams;
use crate::error::{Result, WaterError};

/// Everything needed to build a scene: water parameters plus render setup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub water: WaterParams,
    pub render: RenderConfig,
}

impl SceneConfig {
    /// Load a preset from a JSON file
    ///
    /// Missing fields fall back to their defaults. Values outside the panel
    /// ranges are kept as-is and only reported.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| WaterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SceneConfig =
            serde_json::from_str(&contents).map_err(|source| WaterError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        for field in config.water.out_of_range_fields() {
            log::warn!("{}: {} is outside its panel range", path.display(), field);
        }

        Ok(config)
    }

    /// Save as pretty-printed JSON
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self).map_err(WaterError::Serialize)?;
        fs::write(path, contents).map_err(|source| WaterError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("ragingsea-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_file_roundtrip() {
        let path = temp_path("roundtrip.json");
        let mut config = SceneConfig::default();
        config.water.small_wave_iterations = 2.0;
        config.render.plane_segments = 64;

        config.to_file(&path).unwrap();
        let loaded = SceneConfig::from_file(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded.water.small_wave_iterations, 2.0);
        assert_eq!(loaded.render.plane_segments, 64);
        assert_eq!(loaded.water.depth_color.to_hex(), "#186691");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SceneConfig::from_file(temp_path("does-not-exist.json")).unwrap_err();
        assert!(matches!(err, WaterError::Io { .. }));
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let path = temp_path("bad.json");
        fs::write(&path, "{ water: ").unwrap();
        let err = SceneConfig::from_file(&path).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(matches!(err, WaterError::Parse { .. }));
    }

    #[test]
    fn test_bad_color_is_parse_error() {
        let path = temp_path("bad-color.json");
        fs::write(&path, r##"{"water": {"depth_color": "#xyz"}}"##).unwrap();
        let err = SceneConfig::from_file(&path).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(matches!(err, WaterError::Parse { .. }));
    }

    #[test]
    fn test_out_of_range_values_are_kept() {
        let path = temp_path("wild.json");
        fs::write(&path, r#"{"water": {"small_wave_iterations": 9.5}}"#).unwrap();
        let config = SceneConfig::from_file(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(config.water.small_wave_iterations, 9.5);
    }
}
