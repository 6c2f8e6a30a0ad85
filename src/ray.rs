//! Grid-line (DDA) ray casting against a [`WorldGrid`].
//!
//! The ray keeps two running candidates, the next vertical grid line and
//! the next horizontal grid line it will cross, and always advances the
//! closer one. Every cell the ray enters is tested, so thin walls cannot be
//! skipped the way fixed-increment marching skips them.

use crate::actor::{Actor, normalize_angle};
use crate::world::{Cell, WorldGrid};

/// Material reported for hits on the implicit wall around the grid.
pub const BOUNDARY_MATERIAL: Cell = 1;

/// Which kind of grid line the ray crossed last.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitOrientation {
    /// Crossed an x = k·tile line; the face runs along Y.
    Vertical,
    /// Crossed a y = k·tile line; the face runs along X.
    Horizontal,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub angle: f32,
    /// Distance projected onto the actor's heading (fish-eye corrected).
    pub distance: f32,
    /// Euclidean distance from the actor to the hit point.
    pub raw_distance: f32,
    pub hit_x: f32,
    pub hit_y: f32,
    pub orientation: HitOrientation,
    pub material: Cell,
    /// Cell struck, in signed cell indices (may lie outside the grid).
    pub cell: (i64, i64),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub angle: f32,
}

impl Ray {
    pub fn new(angle: f32) -> Self {
        Self {
            angle: normalize_angle(angle),
        }
    }

    /// Upper bound on grid-line crossings before the ray must leave the grid.
    #[inline]
    pub fn step_budget(grid: &WorldGrid) -> usize {
        grid.width() + grid.height()
    }

    pub fn cast(&self, actor: &Actor, grid: &WorldGrid) -> RayHit {
        let tile = grid.tile_size();
        let (sin, cos) = self.angle.sin_cos();
        let (ox, oy) = (actor.x, actor.y);

        let mut cx = (ox / tile).floor() as i64;
        let mut cy = (oy / tile).floor() as i64;

        let (step_x, delta_x, mut side_x) = axis_setup(ox, cx, cos, tile);
        let (step_y, delta_y, mut side_y) = axis_setup(oy, cy, sin, tile);

        let mut dist = 0.0;
        let mut orientation = HitOrientation::Horizontal;
        for _ in 0..Self::step_budget(grid) {
            if side_x < side_y {
                cx += step_x;
                dist = side_x;
                side_x += delta_x;
                orientation = HitOrientation::Vertical;
            } else {
                cy += step_y;
                dist = side_y;
                side_y += delta_y;
                orientation = HitOrientation::Horizontal;
            }
            if grid.is_solid_cell(cx, cy) {
                return self.finish(actor, grid, dist, orientation, (cx, cy), sin, cos);
            }
        }

        // Unreachable for a finite actor position: every path leaves the
        // grid within the budget and outside counts as solid.
        debug_assert!(
            false,
            "ray at {:.4} rad from ({}, {}) exceeded step budget",
            self.angle, ox, oy
        );
        log::error!(
            "ray at {:.4} rad from ({ox}, {oy}) exceeded step budget; stopping at cell ({cx}, {cy})",
            self.angle
        );
        self.finish(actor, grid, dist, orientation, (cx, cy), sin, cos)
    }

    #[allow(clippy::too_many_arguments)]
    fn finish(
        &self,
        actor: &Actor,
        grid: &WorldGrid,
        raw: f32,
        orientation: HitOrientation,
        cell: (i64, i64),
        sin: f32,
        cos: f32,
    ) -> RayHit {
        let (cx, cy) = cell;
        let in_bounds =
            cx >= 0 && cy >= 0 && (cx as usize) < grid.width() && (cy as usize) < grid.height();
        let material = if in_bounds {
            grid.material_at(cx as usize, cy as usize)
        } else {
            BOUNDARY_MATERIAL
        };
        RayHit {
            angle: self.angle,
            distance: raw * (self.angle - actor.heading()).cos(),
            raw_distance: raw,
            hit_x: actor.x + cos * raw,
            hit_y: actor.y + sin * raw,
            orientation,
            material,
            cell,
        }
    }
}

/// Returns (cell step, distance between crossings, distance to first crossing)
/// along one axis. A direction with no component on this axis never crosses.
#[inline]
fn axis_setup(origin: f32, cell: i64, dir: f32, tile: f32) -> (i64, f32, f32) {
    if dir.abs() < f32::EPSILON {
        return (0, f32::INFINITY, f32::INFINITY);
    }
    let inv = 1.0 / dir.abs();
    if dir < 0.0 {
        (-1, tile * inv, (origin - cell as f32 * tile) * inv)
    } else {
        (1, tile * inv, ((cell + 1) as f32 * tile - origin) * inv)
    }
}
