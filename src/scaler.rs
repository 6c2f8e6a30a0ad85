//! Stretches the one-pixel-per-ray frame onto the window surface.

use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::renderer::FrameBuffer;

/// Precomputed source taps and 8.8 fixed-point weights for each
/// destination row and column.
pub struct StretchLut {
    dst_w: usize,
    dst_h: usize,
    src_w: usize,
    src_h: usize,
    x0: Vec<usize>,
    x1: Vec<usize>,
    wx: Vec<u16>,
    y0: Vec<usize>,
    y1: Vec<usize>,
    wy: Vec<u16>,
}

fn axis_taps(dst: usize, src: usize) -> (Vec<usize>, Vec<usize>, Vec<u16>) {
    let mut t0 = vec![0; dst];
    let mut t1 = vec![0; dst];
    let mut w = vec![0; dst];
    if src == 0 {
        return (t0, t1, w);
    }
    let step = src as f32 / dst as f32;
    let last = src as isize - 1;
    for i in 0..dst {
        // Map destination pixel centres onto source pixel centres
        let f = ((i as f32 + 0.5) * step - 0.5).max(0.0);
        let a = (f.floor() as isize).min(last);
        t0[i] = a as usize;
        t1[i] = (a + 1).min(last) as usize;
        w[i] = ((f - a as f32).clamp(0.0, 1.0) * 256.0).round() as u16;
    }
    (t0, t1, w)
}

impl StretchLut {
    pub fn new(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> Self {
        let (x0, x1, wx) = axis_taps(dst_w, src_w);
        let (y0, y1, wy) = axis_taps(dst_h, src_h);
        Self {
            dst_w,
            dst_h,
            src_w,
            src_h,
            x0,
            x1,
            wx,
            y0,
            y1,
            wy,
        }
    }

    /// True when the table was built for these sizes.
    pub fn matches(&self, dst_w: usize, dst_h: usize, src: &FrameBuffer) -> bool {
        self.dst_w == dst_w && self.dst_h == dst_h && self.src_w == src.width() && self.src_h == src.height()
    }

    /// Bilinear stretch of `src` into `dst` (row-major, `dst_w` wide).
    /// Rows are filled in parallel.
    pub fn stretch(&self, dst: &mut [u32], src: &FrameBuffer) {
        if self.src_w == 0 || self.src_h == 0 || self.dst_w == 0 {
            return;
        }
        let px = src.pixels();
        let sw = self.src_w;
        dst.par_chunks_mut(self.dst_w)
            .take(self.dst_h)
            .enumerate()
            .for_each(|(y, row)| {
                let row0 = self.y0[y] * sw;
                let row1 = self.y1[y] * sw;
                let wy = self.wy[y] as u32;
                for (x, out) in row.iter_mut().enumerate() {
                    let (x0, x1, wx) = (self.x0[x], self.x1[x], self.wx[x] as u32);
                    let top = lerp_color_u32(px[row0 + x0], px[row0 + x1], wx);
                    let bot = lerp_color_u32(px[row1 + x0], px[row1 + x1], wx);
                    *out = lerp_color_u32(top, bot, wy);
                }
            });
    }
}

#[inline]
fn lerp_color_u32(a: u32, b: u32, w256: u32) -> u32 {
    // w256 in [0, 256]; inv = 256 - w256
    let inv = 256 - w256;
    // Interpolate R and B together (00RR00BB), with mask 0x00FF00FF,
    let rb = ((a & 0x00FF00FF) * inv + (b & 0x00FF00FF) * w256) >> 8 & 0x00FF00FF;
    // Interpolate G separately (0000GG00), with mask 0x0000FF00
    let g = ((a & 0x0000FF00) * inv + (b & 0x0000FF00) * w256) >> 8 & 0x0000FF00;
    rb | g // alpha stays 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_stretch_copies() {
        let mut src = FrameBuffer::new(3, 2);
        for (i, (x, y)) in [(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)].into_iter().enumerate() {
            src.set(x, y, 0x00010101 * (i as u32 + 1));
        }
        let lut = StretchLut::new(3, 2, 3, 2);
        let mut dst = vec![0u32; 6];
        lut.stretch(&mut dst, &src);
        assert_eq!(dst, src.pixels());
        assert!(lut.matches(3, 2, &src));
        assert!(!lut.matches(6, 2, &src));
    }

    #[test]
    fn flat_colour_survives_upscale() {
        let mut src = FrameBuffer::new(2, 2);
        src.clear_split(0x00336699, 0x00336699);
        let lut = StretchLut::new(8, 5, 2, 2);
        let mut dst = vec![0u32; 40];
        lut.stretch(&mut dst, &src);
        assert!(dst.iter().all(|&c| c == 0x00336699));
    }
}
