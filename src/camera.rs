use std::f32::consts::TAU;

use crate::world::{EMPTY, Grid};

/// Wrap an angle into `[0, 2π)`.
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU { 0.0 } else { a }
}

/// Tri-state walk/turn intent set by input handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Intent {
    Negative,
    #[default]
    None,
    Positive,
}

impl Intent {
    /// Combine two held keys; holding both cancels out.
    pub fn from_keys(negative: bool, positive: bool) -> Self {
        match (negative, positive) {
            (true, false) => Intent::Negative,
            (false, true) => Intent::Positive,
            _ => Intent::None,
        }
    }

    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Intent::Negative => -1.0,
            Intent::None => 0.0,
            Intent::Positive => 1.0,
        }
    }
}

/// Viewer pose and its per-tick kinematics.
#[derive(Debug, Clone)]
pub struct Camera {
    pub pos: [f32; 2], // (x, y) position in world space
    angle: f32,        // radians in [0, 2π), +x is east, +y is south
    pub walk: Intent,  // forward is Positive
    pub turn: Intent,  // clockwise on screen is Positive
    pub move_speed: f32,
    pub turn_speed: f32,
}

impl Camera {
    pub fn new(pos: [f32; 2], angle: f32, move_speed: f32, turn_speed: f32) -> Self {
        Self {
            pos,
            angle: normalize_angle(angle),
            walk: Intent::None,
            turn: Intent::None,
            move_speed,
            turn_speed,
        }
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn set_angle(&mut self, angle: f32) {
        self.angle = normalize_angle(angle);
    }

    /// Advance one tick. Rotation always commits; the translation is applied
    /// whole or not at all, depending on the destination cell.
    pub fn update(&mut self, grid: &Grid) {
        self.angle = normalize_angle(self.angle + self.turn.sign() * self.turn_speed);

        let step = self.walk.sign() * self.move_speed;
        if step == 0.0 {
            return;
        }

        let (s, c) = self.angle.sin_cos();
        let next = [self.pos[0] + c * step, self.pos[1] + s * step];

        if grid.has_wall_at(next[0], next[1]) == EMPTY {
            self.pos = next;
        } else {
            log::trace!("move to ({:.1}, {:.1}) blocked", next[0], next[1]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn open_room() -> Grid {
        Grid::parse("11111\n10001\n10001\n10001\n11111\n", 64.0).unwrap()
    }

    #[test]
    fn test_normalize_angle() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert!((normalize_angle(-FRAC_PI_2) - 3.0 * FRAC_PI_2).abs() < 1e-6);
        assert!((normalize_angle(5.0 * PI) - PI).abs() < 1e-5);
        let tiny = normalize_angle(-1e-9);
        assert!((0.0..TAU).contains(&tiny));
    }

    #[test]
    fn test_intent_from_keys() {
        assert_eq!(Intent::from_keys(true, false), Intent::Negative);
        assert_eq!(Intent::from_keys(false, true), Intent::Positive);
        assert_eq!(Intent::from_keys(true, true), Intent::None);
        assert_eq!(Intent::from_keys(false, false), Intent::None);
    }

    #[test]
    fn test_forward_moves_along_heading() {
        let grid = open_room();
        let mut cam = Camera::new([160.0, 160.0], 0.0, 4.0, 0.1);
        cam.walk = Intent::Positive;
        cam.update(&grid);
        assert!((cam.pos[0] - 164.0).abs() < 1e-4);
        assert!((cam.pos[1] - 160.0).abs() < 1e-4);

        cam.walk = Intent::Negative;
        cam.set_angle(FRAC_PI_2);
        cam.update(&grid);
        assert!((cam.pos[0] - 164.0).abs() < 1e-4);
        assert!((cam.pos[1] - 156.0).abs() < 1e-4);
    }

    #[test]
    fn test_turn_wraps() {
        let grid = open_room();
        let mut cam = Camera::new([160.0, 160.0], 0.05, 4.0, 0.1);
        cam.turn = Intent::Negative;
        cam.update(&grid);
        assert!((cam.angle() - (TAU - 0.05)).abs() < 1e-5);
        assert_eq!(cam.pos, [160.0, 160.0]);
    }

    #[test]
    fn test_blocked_move_keeps_position() {
        let grid = open_room();
        // One step short of the east wall at x = 256
        let mut cam = Camera::new([254.0, 160.0], 0.0, 4.0, 0.1);
        cam.walk = Intent::Positive;
        cam.update(&grid);
        assert_eq!(cam.pos, [254.0, 160.0]);
    }
}
