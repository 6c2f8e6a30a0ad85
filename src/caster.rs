//! One ray per screen column, projected into textured wall strips.

use crate::actor::Actor;
use crate::config::{Config, Shading};
use crate::ray::{HitOrientation, Ray, RayHit};
use crate::renderer::FrameBuffer;
use crate::texture::TextureSet;
use crate::world::WorldGrid;

/// Distances below this are clamped before projecting.
const MIN_DISTANCE: f32 = 1e-3;

/// On-screen wall height for a corrected distance.
#[inline]
pub fn projected_height(tile_size: f32, distance: f32, projection_scale: f32) -> f32 {
    (tile_size / distance) * projection_scale
}

/// Texture column for a hit: the coordinate along the struck face,
/// Y for vertical faces and X for horizontal ones, wrapped to the texture.
#[inline]
pub fn texture_column_index(
    orientation: HitOrientation,
    hit_x: f32,
    hit_y: f32,
    texture_size: usize,
) -> usize {
    let along = match orientation {
        HitOrientation::Vertical => hit_y,
        HitOrientation::Horizontal => hit_x,
    };
    (along.floor() as i64).rem_euclid(texture_size.max(1) as i64) as usize
}

pub struct RayCaster {
    rays: Vec<RayHit>,
    num_rays: usize,
    fov: f32,
    tile_size: f32,
    projection_scale: f32,
    shading: Shading,
    textures: TextureSet,
}

impl RayCaster {
    pub fn new(cfg: &Config, textures: TextureSet) -> Self {
        let num_rays = cfg.num_rays().max(1);
        Self {
            rays: Vec::with_capacity(num_rays),
            num_rays,
            fov: cfg.fov(),
            tile_size: cfg.tile_size,
            projection_scale: cfg.projection_scale,
            shading: cfg.shading,
            textures,
        }
    }

    #[inline]
    pub fn num_rays(&self) -> usize {
        self.num_rays
    }

    #[inline]
    pub fn rays(&self) -> &[RayHit] {
        &self.rays
    }

    #[inline]
    pub fn textures(&self) -> &TextureSet {
        &self.textures
    }

    /// Angle of screen column `i`. Columns span the field of view edge to
    /// edge: column 0 looks at heading - fov/2, the last at heading + fov/2.
    pub fn ray_angle(&self, heading: f32, i: usize) -> f32 {
        if self.num_rays == 1 {
            return heading;
        }
        let t = i as f32 / (self.num_rays - 1) as f32;
        heading + (t - 0.5) * self.fov
    }

    /// Replaces last frame's rays with a fresh sweep, reusing the buffer.
    pub fn cast_all(&mut self, actor: &Actor, grid: &WorldGrid) {
        self.rays.clear();
        for i in 0..self.num_rays {
            let angle = self.ray_angle(actor.heading(), i);
            self.rays.push(Ray::new(angle).cast(actor, grid));
        }
    }

    /// Draws the current sweep. A buffer wider than the ray count gets
    /// each ray repeated across `width / num_rays` columns.
    pub fn render(&self, fb: &mut FrameBuffer) {
        if self.rays.is_empty() {
            return;
        }
        let stride = (fb.width() / self.rays.len()).max(1);
        let half_h = fb.height() as f32 * 0.5;

        for (i, hit) in self.rays.iter().enumerate() {
            let distance = hit.distance.max(MIN_DISTANCE);
            let line_h = projected_height(self.tile_size, distance, self.projection_scale);
            let top = half_h - line_h * 0.5;

            let texture = self.textures.get(hit.material);
            let tx = texture_column_index(hit.orientation, hit.hit_x, hit.hit_y, texture.size());
            let column = texture.column(tx);
            let shade = self.shade(hit.orientation, distance);

            for x in i * stride..(i + 1) * stride {
                fb.draw_column(x, top, line_h, column, shade);
            }
        }
    }

    fn shade(&self, orientation: HitOrientation, distance: f32) -> f32 {
        let mut k = match orientation {
            HitOrientation::Vertical => 1.0,
            HitOrientation::Horizontal => self.shading.horizontal_face,
        };
        if self.shading.fog_distance > 0.0 {
            k *= (1.0 - distance / self.shading.fog_distance).clamp(0.0, 1.0);
        }
        k
    }
}
