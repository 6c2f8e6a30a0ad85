use std::f32::consts::{FRAC_1_SQRT_2, TAU};

use crate::config::Config;
use crate::input::InputState;
use crate::world::WorldGrid;

/// Per-tick movement rates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    pub move_speed: f32,     // world units per tick
    pub rotation_speed: f32, // radians per tick
}

impl Motion {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            move_speed: cfg.move_speed,
            rotation_speed: cfg.rotation_speed(),
        }
    }
}

/// Wraps an angle into [0, 2π).
#[inline]
pub fn normalize_angle(a: f32) -> f32 {
    let r = a.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if r >= TAU { 0.0 } else { r }
}

/// The player: a point in world space plus a heading.
///
/// Heading 0 looks along +X (east); it grows clockwise on screen because
/// world Y points down, matching the map's row order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Actor {
    pub x: f32,
    pub y: f32,
    heading: f32,
}

impl Actor {
    pub fn new(x: f32, y: f32, heading: f32) -> Self {
        Self {
            x,
            y,
            heading: normalize_angle(heading),
        }
    }

    #[inline]
    pub fn heading(&self) -> f32 {
        self.heading
    }

    #[inline]
    pub fn set_heading(&mut self, heading: f32) {
        self.heading = normalize_angle(heading);
    }

    /// Unit vector along the heading.
    #[inline]
    pub fn forward(&self) -> [f32; 2] {
        let (s, c) = self.heading.sin_cos();
        [c, s]
    }

    /// Applies one tick of input. Each axis of the move is committed
    /// separately, so a blocked diagonal still slides along the wall.
    pub fn update(&mut self, input: &InputState, motion: &Motion, grid: &WorldGrid) {
        let turn = input.turn_axis();
        if turn != 0.0 {
            self.set_heading(self.heading + turn * motion.rotation_speed);
        }

        let mut fwd = input.walk_axis();
        let mut strafe = input.strafe_axis();
        if fwd == 0.0 && strafe == 0.0 {
            return;
        }
        // Normalize diagonal speed
        if fwd != 0.0 && strafe != 0.0 {
            fwd *= FRAC_1_SQRT_2;
            strafe *= FRAC_1_SQRT_2;
        }

        let (s, c) = self.heading.sin_cos();
        // forward = (c, s), right = (-s, c)
        let dx = (c * fwd - s * strafe) * motion.move_speed;
        let dy = (s * fwd + c * strafe) * motion.move_speed;

        let nx = self.x + dx;
        if !grid.wall_at(nx, self.y) {
            self.x = nx;
        }
        let ny = self.y + dy;
        if !grid.wall_at(self.x, ny) {
            self.y = ny;
        }
    }
}
