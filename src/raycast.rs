//! Grid DDA ray casting
//!
//! Each cast runs two independent walks, one over horizontal grid lines
//! (`y = k * tile`) and one over vertical grid lines (`x = k * tile`), and
//! keeps the nearer hit.

use std::f32::consts::{FRAC_PI_2, PI};

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::camera::{Camera, normalize_angle};
use crate::world::{EMPTY, Grid, WallKind};

/// Below this, a sine or cosine counts as exactly zero: the ray runs parallel
/// to one family of grid lines and never crosses it.
const AXIS_EPS: f32 = 1e-6;

/// Result of one cast. Disposable, one per column per frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Ray {
    pub angle: f32,
    pub hit: [f32; 2],
    /// Euclidean distance from the viewer to `hit`; infinite when nothing was hit
    pub distance: f32,
    pub was_hit_vertical: bool,
    /// Raw cell code at the hit, `0` when nothing was hit
    pub content: u8,
    pub kind: WallKind,
    pub facing_down: bool,
    pub facing_right: bool,
}

impl Ray {
    #[inline]
    pub fn facing_up(&self) -> bool {
        !self.facing_down
    }

    #[inline]
    pub fn facing_left(&self) -> bool {
        !self.facing_right
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        self.distance.is_finite()
    }
}

#[derive(Debug, Clone, Copy)]
struct Hit {
    point: [f32; 2],
    distance: f32,
    content: u8,
}

/// Cast a single ray from the camera position.
pub fn cast(angle: f32, camera: &Camera, grid: &Grid) -> Ray {
    let angle = normalize_angle(angle);
    let facing_down = angle > 0.0 && angle < PI;
    let facing_right = angle < FRAC_PI_2 || angle > 1.5 * PI;

    let (sin, cos) = angle.sin_cos();
    let horz = if sin.abs() < AXIS_EPS {
        None
    } else {
        horizontal_hit(angle, cos.abs() < AXIS_EPS, facing_down, facing_right, camera.pos, grid)
    };
    let vert = if cos.abs() < AXIS_EPS {
        None
    } else {
        vertical_hit(angle, sin.abs() < AXIS_EPS, facing_down, facing_right, camera.pos, grid)
    };

    let (best, was_hit_vertical) = nearest(horz, vert);

    let mut ray = Ray {
        angle,
        hit: camera.pos,
        distance: f32::INFINITY,
        was_hit_vertical,
        content: EMPTY,
        kind: WallKind::Plain,
        facing_down,
        facing_right,
    };
    if let Some(hit) = best {
        ray.hit = hit.point;
        ray.distance = hit.distance;
        ray.content = hit.content;
        ray.kind = WallKind::from_code(hit.content);
    }
    ray
}

/// Pick the closer hit and report whether it came from the vertical walk.
/// Ties go to the horizontal crossing.
fn nearest(horz: Option<Hit>, vert: Option<Hit>) -> (Option<Hit>, bool) {
    match (horz, vert) {
        (Some(h), Some(v)) if v.distance < h.distance => (Some(v), true),
        (Some(h), _) => (Some(h), false),
        (None, Some(v)) => (Some(v), true),
        (None, None) => (None, false),
    }
}

/// Walk crossings of `y = k * tile`.
fn horizontal_hit(
    angle: f32,
    vertical_ray: bool,
    facing_down: bool,
    facing_right: bool,
    origin: [f32; 2],
    grid: &Grid,
) -> Option<Hit> {
    let tile = grid.tile_len();
    let tan = angle.tan();

    let mut y = (origin[1] / tile).floor() * tile;
    if facing_down {
        y += tile;
    }
    let x = if vertical_ray {
        origin[0]
    } else {
        origin[0] + (y - origin[1]) / tan
    };

    let y_step = if facing_down { tile } else { -tile };
    let mut x_step = if vertical_ray { 0.0 } else { tile / tan };
    if (!facing_right && x_step > 0.0) || (facing_right && x_step < 0.0) {
        x_step = -x_step;
    }

    // Probe one unit above the line when moving up so the lookup lands in
    // the tile being entered.
    let probe_dy = if facing_down { 0.0 } else { -1.0 };
    walk(grid, [x, y], [x_step, y_step], [0.0, probe_dy])
        .map(|(point, content)| make_hit(origin, point, content))
}

/// Walk crossings of `x = k * tile`.
fn vertical_hit(
    angle: f32,
    horizontal_ray: bool,
    facing_down: bool,
    facing_right: bool,
    origin: [f32; 2],
    grid: &Grid,
) -> Option<Hit> {
    let tile = grid.tile_len();
    let tan = angle.tan();

    let mut x = (origin[0] / tile).floor() * tile;
    if facing_right {
        x += tile;
    }
    let y = if horizontal_ray {
        origin[1]
    } else {
        origin[1] + (x - origin[0]) * tan
    };

    let x_step = if facing_right { tile } else { -tile };
    let mut y_step = if horizontal_ray { 0.0 } else { tile * tan };
    if (!facing_down && y_step > 0.0) || (facing_down && y_step < 0.0) {
        y_step = -y_step;
    }

    let probe_dx = if facing_right { 0.0 } else { -1.0 };
    walk(grid, [x, y], [x_step, y_step], [probe_dx, 0.0])
        .map(|(point, content)| make_hit(origin, point, content))
}

/// Step from `start` by `step` until the probe (point + `nudge`) reads an
/// occupied cell or the point leaves the map rectangle.
fn walk(grid: &Grid, start: [f32; 2], step: [f32; 2], nudge: [f32; 2]) -> Option<([f32; 2], u8)> {
    let (w, h) = (grid.world_width(), grid.world_height());
    let [mut x, mut y] = start;

    while x >= 0.0 && x <= w && y >= 0.0 && y <= h {
        let content = grid.has_wall_at(x + nudge[0], y + nudge[1]);
        if content != EMPTY {
            return Some(([x, y], content));
        }
        x += step[0];
        y += step[1];
    }
    None
}

#[inline]
fn make_hit(origin: [f32; 2], point: [f32; 2], content: u8) -> Hit {
    let dx = point[0] - origin[0];
    let dy = point[1] - origin[1];
    Hit {
        point,
        distance: (dx * dx + dy * dy).sqrt(),
        content,
    }
}

/// Fan `ray_count` rays across `fov` centred on the camera heading, ordered
/// left-to-right by screen column. Columns are cast in parallel; each one only
/// reads the grid and the already-updated pose.
pub fn cast_all(camera: &Camera, grid: &Grid, fov: f32, ray_count: usize) -> Vec<Ray> {
    let first = camera.angle() - fov / 2.0;
    let step = fov / ray_count as f32;

    (0..ray_count)
        .into_par_iter()
        .map(|i| cast(first + step * i as f32, camera, grid))
        .collect()
}
