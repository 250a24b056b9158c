//! Engine configuration
//!
//! Every constant the engine recognises lives here so it can be loaded from
//! JSON, validated once, and tested in isolation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::world::MIN_TILE_LEN;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// World units per cell edge
    pub tile_len: f32,
    /// Horizontal field of view, degrees
    pub fov_deg: f32,
    pub screen_width: usize,
    pub screen_height: usize,
    /// Rays cast per frame, nominally one per screen column
    pub ray_count: usize,
    /// World units advanced per update tick
    pub move_speed: f32,
    /// Degrees turned per update tick
    pub turn_speed_deg: f32,
    /// Corrected distance at which the shade factor reaches zero
    pub shade_range: f32,
    pub minimap_scale: f32,
    /// Frontend update rate
    pub tick_hz: u32,
    /// Start position in world units; the map centre when absent
    pub start: Option<[f32; 2]>,
    pub start_angle_deg: f32,
    /// Map text file; the built-in layout when absent
    pub map: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tile_len: 64.0,
            fov_deg: 60.0,
            screen_width: 960,
            screen_height: 704,
            ray_count: 960,
            move_speed: 4.0,
            turn_speed_deg: 4.0,
            shade_range: 1000.0,
            minimap_scale: 0.25,
            tick_hz: 60,
            start: None,
            start_angle_deg: 90.0,
            map: None,
        }
    }
}

impl EngineConfig {
    /// Read and validate a JSON config. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json(&text)?;
        // Map paths are relative to the config file, not the working directory
        if let (Some(map), Some(dir)) = (&config.map, path.parent()) {
            if map.is_relative() {
                config.map = Some(dir.join(map));
            }
        }
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tile_len > MIN_TILE_LEN) {
            return Err(invalid(format!(
                "tile_len must exceed the {MIN_TILE_LEN}-unit probe nudge, got {}",
                self.tile_len
            )));
        }
        if !(self.fov_deg > 0.0 && self.fov_deg < 180.0) {
            return Err(invalid(format!("fov_deg must be in (0, 180), got {}", self.fov_deg)));
        }
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(invalid(format!(
                "screen size must be non-zero, got {}x{}",
                self.screen_width, self.screen_height
            )));
        }
        if self.ray_count == 0 {
            return Err(invalid("ray_count must be non-zero".to_string()));
        }
        if !(self.shade_range > 0.0) {
            return Err(invalid(format!(
                "shade_range must be positive, got {}",
                self.shade_range
            )));
        }
        if !(0.0..=1.0).contains(&self.minimap_scale) {
            return Err(invalid(format!(
                "minimap_scale must be in [0, 1], got {}",
                self.minimap_scale
            )));
        }
        if self.tick_hz == 0 {
            return Err(invalid("tick_hz must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Field of view in radians
    #[inline]
    pub fn fov(&self) -> f32 {
        self.fov_deg.to_radians()
    }

    /// Angular speed in radians per tick
    #[inline]
    pub fn turn_speed(&self) -> f32 {
        self.turn_speed_deg.to_radians()
    }

    #[inline]
    pub fn start_angle(&self) -> f32 {
        self.start_angle_deg.to_radians()
    }
}

fn invalid(msg: String) -> ConfigError {
    ConfigError::Invalid(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ray_count, config.screen_width);
        assert!((config.fov() - std::f32::consts::FRAC_PI_3).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{ "tile_len": 32.0, "ray_count": 320 }"#).unwrap();
        assert_eq!(config.tile_len, 32.0);
        assert_eq!(config.ray_count, 320);
        assert_eq!(config.shade_range, 1000.0);
        assert_eq!(config.map, None);
    }

    #[test]
    fn test_rejects_bad_values() {
        for json in [
            r#"{ "tile_len": 0.0 }"#,
            r#"{ "tile_len": 1.0 }"#,
            r#"{ "tile_len": 0.5 }"#,
            r#"{ "minimap_scale": 1000000.0 }"#,
            r#"{ "minimap_scale": -0.1 }"#,
            r#"{ "fov_deg": 180.0 }"#,
            r#"{ "ray_count": 0 }"#,
            r#"{ "screen_height": 0 }"#,
            r#"{ "shade_range": -5.0 }"#,
        ] {
            let err = EngineConfig::from_json(json).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{json}: {err}");
        }
    }

    #[test]
    fn test_load_resolves_map_next_to_config() {
        let dir = std::env::temp_dir().join(format!("grid-raycaster-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("level.json");
        std::fs::write(&path, r#"{ "map": "level.map" }"#).unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.map, Some(dir.join("level.map")));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_keeps_absolute_map() {
        let dir = std::env::temp_dir().join(format!("grid-raycaster-abs-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let map = dir.join("elsewhere.map");
        let path = dir.join("level.json");
        std::fs::write(&path, serde_json::json!({ "map": map }).to_string()).unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.map, Some(map));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_malformed_json() {
        let err = EngineConfig::from_json("{ tile_len: ").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
