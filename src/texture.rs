//! Wall textures and the material → texture table.
//!
//! Textures are square and stored column-major so a wall strip is one
//! contiguous slice.

use std::collections::HashMap;
use std::path::Path;

use crate::config::TextureBinding;
use crate::renderer::pack_rgb;
use crate::world::Cell;

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("texture must be square, got {width}x{height}")]
    NotSquare { width: u32, height: u32 },
    #[error("expected {expected} bytes of RGBA data, got {found}")]
    BadLength { expected: usize, found: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    size: usize,
    texels: Vec<u32>, // column-major: texels[x * size + y]
}

impl Texture {
    /// Builds a texture from row-major RGBA8 bytes.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self, TextureError> {
        if width != height || width == 0 {
            return Err(TextureError::NotSquare { width, height });
        }
        let size = width as usize;
        let expected = size * size * 4;
        if rgba.len() != expected {
            return Err(TextureError::BadLength {
                expected,
                found: rgba.len(),
            });
        }
        let mut texels = vec![0u32; size * size];
        for (i, px) in rgba.chunks_exact(4).enumerate() {
            let (x, y) = (i % size, i / size);
            texels[x * size + y] = pack_rgb(px[0], px[1], px[2]);
        }
        Ok(Self { size, texels })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let img = image::open(path)?.to_rgba8();
        let (w, h) = img.dimensions();
        Self::from_rgba(w, h, img.as_raw())
    }

    /// Procedural brick wall: red-brown bricks, dark mortar courses every
    /// quarter of the texture and joints staggered on alternate courses.
    pub fn brick(size: usize) -> Self {
        let size = size.max(4);
        let base = pack_rgb(180, 60, 40);
        let mortar = pack_rgb(120, 30, 20);
        let course = size / 4;
        let brick_w = size / 2;

        let mut texels = vec![base; size * size];
        for x in 0..size {
            for y in 0..size {
                let in_course = matches!(y % course, 0 | 1) || y % course == course - 1;
                let offset = if (y / course) % 2 == 0 { 0 } else { brick_w / 2 };
                let jx = (x + brick_w - offset) % brick_w;
                let in_joint = jx == 0 || jx == 1 || jx == brick_w - 1;
                if in_course || in_joint {
                    texels[x * size + y] = mortar;
                }
            }
        }
        Self { size, texels }
    }

    /// Single-colour texture.
    pub fn solid(size: usize, color: u32) -> Self {
        let size = size.max(1);
        Self {
            size,
            texels: vec![color; size * size],
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Full-height vertical slice at texture column `x` (wrapped).
    #[inline]
    pub fn column(&self, x: usize) -> &[u32] {
        let x = x % self.size;
        &self.texels[x * self.size..(x + 1) * self.size]
    }

    #[inline]
    pub fn sample(&self, x: usize, y: usize) -> u32 {
        self.column(x)[y % self.size]
    }
}

/// Material id → texture, with a guaranteed fallback for unbound ids.
#[derive(Debug)]
pub struct TextureSet {
    default_material: Cell,
    fallback: Texture,
    bound: HashMap<Cell, Texture>,
}

impl TextureSet {
    pub fn new(default_material: Cell, default_texture: Texture) -> Self {
        Self {
            default_material,
            fallback: default_texture,
            bound: HashMap::new(),
        }
    }

    /// Brick fallback plus whatever bindings load; failures are logged and skipped.
    pub fn from_bindings(default_material: Cell, bindings: &[TextureBinding]) -> Self {
        let mut set = Self::new(default_material, Texture::brick(64));
        let loaded = set.load_bindings(bindings);
        log::info!(
            "textures: {loaded}/{} bound, default material {default_material}",
            bindings.len()
        );
        set
    }

    pub fn load_bindings(&mut self, bindings: &[TextureBinding]) -> usize {
        let mut loaded = 0;
        for b in bindings {
            match Texture::load(&b.path) {
                Ok(tex) => {
                    log::debug!("material {} <- {}", b.material, b.path.display());
                    self.bind(b.material, tex);
                    loaded += 1;
                }
                Err(e) => log::warn!(
                    "material {}: failed to load {} ({e}); using default texture",
                    b.material,
                    b.path.display()
                ),
            }
        }
        loaded
    }

    /// Binding the default material replaces the fallback texture too.
    pub fn bind(&mut self, material: Cell, texture: Texture) {
        if material == self.default_material {
            self.fallback = texture;
        } else {
            self.bound.insert(material, texture);
        }
    }

    pub fn is_bound(&self, material: Cell) -> bool {
        material == self.default_material || self.bound.contains_key(&material)
    }

    #[inline]
    pub fn get(&self, material: Cell) -> &Texture {
        self.bound.get(&material).unwrap_or(&self.fallback)
    }

    #[inline]
    pub fn default_material(&self) -> Cell {
        self.default_material
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_is_stored_column_major() {
        // 2x2: red, green / blue, white
        let rgba = [
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 255, 255, 255, 255,
        ];
        let t = Texture::from_rgba(2, 2, &rgba).unwrap();
        assert_eq!(t.column(0), &[pack_rgb(255, 0, 0), pack_rgb(0, 0, 255)]);
        assert_eq!(t.column(1), &[pack_rgb(0, 255, 0), pack_rgb(255, 255, 255)]);
        assert_eq!(t.sample(3, 2), pack_rgb(0, 255, 0));
    }

    #[test]
    fn rejects_non_square_and_short_data() {
        assert!(matches!(
            Texture::from_rgba(4, 2, &[0; 32]),
            Err(TextureError::NotSquare { width: 4, height: 2 })
        ));
        assert!(matches!(
            Texture::from_rgba(2, 2, &[0; 15]),
            Err(TextureError::BadLength { expected: 16, found: 15 })
        ));
    }

    #[test]
    fn brick_has_mortar_courses_and_brick_faces() {
        let t = Texture::brick(64);
        let mortar = pack_rgb(120, 30, 20);
        let base = pack_rgb(180, 60, 40);
        assert_eq!(t.size(), 64);
        assert_eq!(t.sample(10, 0), mortar);
        assert_eq!(t.sample(10, 16), mortar);
        assert_eq!(t.sample(10, 8), base);
        // Joints are staggered between neighbouring courses
        assert_eq!(t.sample(0, 8), mortar);
        assert_eq!(t.sample(0, 24), base);
        assert_eq!(t.sample(16, 24), mortar);
    }

    #[test]
    fn unbound_material_falls_back() {
        let red = pack_rgb(255, 0, 0);
        let blue = pack_rgb(0, 0, 255);
        let mut set = TextureSet::new(1, Texture::solid(4, red));
        set.bind(2, Texture::solid(4, blue));
        assert_eq!(set.get(2).sample(0, 0), blue);
        assert_eq!(set.get(7).sample(0, 0), red);
        assert!(set.is_bound(1) && set.is_bound(2) && !set.is_bound(7));

        set.bind(1, Texture::solid(4, blue));
        assert_eq!(set.get(7).sample(0, 0), blue);
    }

    #[test]
    fn missing_file_is_not_fatal() {
        let set = TextureSet::from_bindings(
            1,
            &[TextureBinding {
                material: 3,
                path: "definitely/not/here.png".into(),
            }],
        );
        assert!(!set.is_bound(3));
        assert_eq!(set.get(3), &Texture::brick(64));
    }
}
