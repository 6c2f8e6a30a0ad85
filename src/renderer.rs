//! CPU frame buffer and the column primitive the caster draws with.

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    // BGRA8 in little-endian memory
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
    // Alpha at 0
}

/// Scales the colour channels of a packed pixel by `k` in [0, 1].
#[inline]
pub fn shade_rgb(c: u32, k: f32) -> u32 {
    if k >= 1.0 {
        return c;
    }
    let k = (k.max(0.0) * 256.0) as u32;
    let rb = ((c & 0x00FF00FF) * k >> 8) & 0x00FF00FF;
    let g = ((c & 0x0000FF00) * k >> 8) & 0x0000FF00;
    rb | g
}

pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    /// Ceiling colour above the horizon, floor colour below.
    pub fn clear_split(&mut self, ceiling: u32, floor: u32) {
        let mid = self.height / 2;
        let (top, bottom) = self.pixels.split_at_mut(mid * self.width);
        top.fill(ceiling);
        bottom.fill(floor);
    }

    /// Draws `column` stretched over screen rows `[top, top + height)` at
    /// screen column `x`, clipped to the buffer. `shade` multiplies every
    /// texel (1.0 leaves them unchanged).
    pub fn draw_column(&mut self, x: usize, top: f32, height: f32, column: &[u32], shade: f32) {
        if x >= self.width || column.is_empty() || !(height > 0.0) {
            return;
        }
        let y0 = top.max(0.0).floor() as usize;
        let y1 = ((top + height).ceil().max(0.0) as usize).min(self.height);
        let last = column.len() - 1;
        let scale = column.len() as f32 / height;

        let mut idx = y0 * self.width + x;
        for y in y0..y1 {
            // Sample at the pixel centre
            let v = ((y as f32 + 0.5 - top) * scale) as usize;
            self.pixels[idx] = shade_rgb(column[v.min(last)], shade);
            idx += self.width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_and_shade() {
        let c = pack_rgb(200, 100, 50);
        assert_eq!(c, 0x00C86432);
        assert_eq!(shade_rgb(c, 1.0), c);
        assert_eq!(shade_rgb(c, 0.5), pack_rgb(100, 50, 25));
        assert_eq!(shade_rgb(c, 0.0), 0);
    }

    #[test]
    fn clear_split_fills_halves() {
        let mut fb = FrameBuffer::new(3, 4);
        fb.clear_split(1, 2);
        assert_eq!(fb.get(2, 1), Some(1));
        assert_eq!(fb.get(0, 2), Some(2));
        assert_eq!(fb.get(3, 0), None);
    }

    #[test]
    fn column_is_stretched_and_centred() {
        let mut fb = FrameBuffer::new(1, 8);
        fb.clear_split(0, 0);
        fb.draw_column(0, 2.0, 4.0, &[10, 20], 1.0);
        let col: Vec<u32> = (0..8).map(|y| fb.get(0, y).unwrap()).collect();
        assert_eq!(col, vec![0, 0, 10, 10, 20, 20, 0, 0]);
    }

    #[test]
    fn tall_column_is_clipped() {
        let mut fb = FrameBuffer::new(2, 4);
        fb.draw_column(1, -4.0, 12.0, &[1, 2, 3], 1.0);
        let col: Vec<u32> = (0..4).map(|y| fb.get(1, y).unwrap()).collect();
        // Only the middle texel is visible
        assert_eq!(col, vec![2, 2, 2, 2]);
        assert_eq!(fb.get(0, 0), Some(0));
    }
}
