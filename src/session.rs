//! Session context: one grid, one viewer, and the frame last computed.

use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::error::ConfigError;
use crate::projection::{Projector, Strip};
use crate::raycast::{Ray, cast_all};
use crate::world::{EMPTY, Grid};

/// Output of one frame. Replaced wholesale every step.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub rays: Vec<Ray>,
    pub strips: Vec<Strip>,
}

pub struct Session {
    config: EngineConfig,
    grid: Grid,
    pub camera: Camera,
    projector: Projector,
    frame: Frame,
}

impl Session {
    /// Build a session, loading the map named by the config if any.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let grid = match &config.map {
            Some(path) => Grid::load(path, config.tile_len)?,
            None => Grid::default_layout(config.tile_len),
        };
        Self::with_grid(config, grid)
    }

    pub fn with_grid(config: EngineConfig, grid: Grid) -> Result<Self, ConfigError> {
        config.validate()?;
        if grid.tile_len() != config.tile_len {
            return Err(ConfigError::Invalid(format!(
                "grid tile length {} does not match configured tile_len {}",
                grid.tile_len(),
                config.tile_len
            )));
        }
        let start = config.start.unwrap_or_else(|| grid.center());
        if grid.has_wall_at(start[0], start[1]) != EMPTY {
            return Err(ConfigError::Invalid(format!(
                "start position ({}, {}) is inside a wall",
                start[0], start[1]
            )));
        }

        log::info!(
            "Session: {}x{} map, tile {}, {} rays over {} deg",
            grid.rows(),
            grid.cols(),
            grid.tile_len(),
            config.ray_count,
            config.fov_deg
        );

        let camera = Camera::new(
            start,
            config.start_angle(),
            config.move_speed,
            config.turn_speed(),
        );
        let projector = Projector::new(&config);

        Ok(Self {
            config,
            grid,
            camera,
            projector,
            frame: Frame::default(),
        })
    }

    /// Kinematics, then casting against the updated pose, then projection.
    pub fn step(&mut self) -> &Frame {
        self.camera.update(&self.grid);
        self.recast()
    }

    /// Recompute the frame for the current pose without moving.
    pub fn recast(&mut self) -> &Frame {
        let rays = cast_all(
            &self.camera,
            &self.grid,
            self.config.fov(),
            self.config.ray_count,
        );
        let strips = self.projector.project_all(&rays, self.camera.angle());
        self.frame = Frame { rays, strips };
        &self.frame
    }

    #[inline]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Intent;

    fn small_config() -> EngineConfig {
        EngineConfig {
            screen_width: 120,
            screen_height: 80,
            ray_count: 120,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_default_session_starts_at_center() {
        let session = Session::new(small_config()).unwrap();
        assert_eq!(session.camera.pos, [480.0, 352.0]);
        assert!(session.frame().rays.is_empty());
    }

    #[test]
    fn test_step_produces_one_strip_per_ray() {
        let mut session = Session::new(small_config()).unwrap();
        let frame = session.step();
        assert_eq!(frame.rays.len(), 120);
        assert_eq!(frame.strips.len(), 120);
        assert!(frame.rays.iter().all(|r| r.is_hit()));
    }

    #[test]
    fn test_step_casts_from_updated_pose() {
        let mut session = Session::new(small_config()).unwrap();
        session.camera.turn = Intent::Positive;
        let before = session.camera.angle();
        let frame = session.step().clone();
        let after = session.camera.angle();
        assert!(after > before);
        let mid = &frame.rays[60];
        assert!((mid.angle - after).abs() < 1e-5);
    }

    #[test]
    fn test_rejects_grid_with_other_tile_len() {
        let grid = Grid::parse("11111\n10001\n10001\n11111\n", 32.0).unwrap();
        let config = EngineConfig {
            start: Some([80.0, 80.0]),
            ..small_config()
        };
        assert!(matches!(
            Session::with_grid(config.clone(), grid.clone()),
            Err(ConfigError::Invalid(_))
        ));

        // Matching tile lengths project a tile-tall wall at its true height
        let config = EngineConfig {
            tile_len: 32.0,
            start_angle_deg: 0.0,
            ..config
        };
        let plane = Projector::new(&config).plane_distance();
        let mut session = Session::with_grid(config, grid).unwrap();
        let frame = session.recast();

        // East face at x = 128, 48 units ahead
        let strip = &frame.strips[60];
        assert!((strip.corrected_distance - 48.0).abs() < 1e-3);
        assert!((strip.half_height - 0.5 * 32.0 / 48.0 * plane).abs() < 1e-3);
    }

    #[test]
    fn test_rejects_start_inside_wall() {
        let config = EngineConfig {
            start: Some([10.0, 10.0]),
            ..small_config()
        };
        assert!(matches!(
            Session::new(config),
            Err(ConfigError::Invalid(_))
        ));
    }
}
