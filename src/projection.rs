//! Distance to screen-space strips

use crate::config::EngineConfig;
use crate::raycast::Ray;
use crate::world::WallKind;

/// One screen column's wall segment, ready for a renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strip {
    pub column: usize,
    pub center_y: f32,
    pub half_height: f32,
    pub corrected_distance: f32,
    /// Linear distance falloff; not clamped, see `clamped_shade`
    pub shade: f32,
    pub kind: WallKind,
    pub vertical: bool,
}

impl Strip {
    /// Shade limited to `[0, 1]`; far hits go fully dark.
    #[inline]
    pub fn clamped_shade(&self) -> f32 {
        self.shade.clamp(0.0, 1.0)
    }

    /// Row range `[top, bottom)` covered by the strip, clipped to the screen.
    pub fn pixel_span(&self, screen_height: usize) -> (usize, usize) {
        let h = screen_height as f32;
        let top = (self.center_y - self.half_height).clamp(0.0, h);
        let bottom = (self.center_y + self.half_height).clamp(0.0, h);
        (top as usize, bottom as usize)
    }
}

/// Maps raw ray distances to strips. Constants are fixed once per session.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    tile_len: f32,
    plane_distance: f32,
    center_y: f32,
    shade_range: f32,
}

impl Projector {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            tile_len: config.tile_len,
            plane_distance: plane_distance(config.screen_width as f32, config.fov()),
            center_y: config.screen_height as f32 * 0.5,
            shade_range: config.shade_range,
        }
    }

    #[inline]
    pub fn plane_distance(&self) -> f32 {
        self.plane_distance
    }

    /// Similar-triangles height of a tile-tall wall at `corrected` distance.
    #[inline]
    pub fn strip_height(&self, corrected: f32) -> f32 {
        self.tile_len / corrected * self.plane_distance
    }

    #[inline]
    pub fn shade(&self, corrected: f32) -> f32 {
        1.0 - corrected / self.shade_range
    }

    pub fn project(&self, column: usize, ray: &Ray, view_angle: f32) -> Strip {
        let corrected = fisheye_correct(ray.distance, ray.angle, view_angle);
        let height = self.strip_height(corrected);
        Strip {
            column,
            center_y: self.center_y,
            half_height: height * 0.5,
            corrected_distance: corrected,
            shade: self.shade(corrected),
            kind: ray.kind,
            vertical: ray.was_hit_vertical,
        }
    }

    pub fn project_all(&self, rays: &[Ray], view_angle: f32) -> Vec<Strip> {
        rays.iter()
            .enumerate()
            .map(|(i, ray)| self.project(i, ray, view_angle))
            .collect()
    }
}

/// Radial distance to perpendicular distance from the view plane.
#[inline]
pub fn fisheye_correct(distance: f32, ray_angle: f32, view_angle: f32) -> f32 {
    distance * (ray_angle - view_angle).cos()
}

/// Distance from the eye to a projection plane `width` pixels wide.
#[inline]
pub fn plane_distance(width: f32, fov: f32) -> f32 {
    0.5 * width / (0.5 * fov).tan()
}
