pub const GRID_DIM: usize = 8;
pub const CHANNELS_PER_CELL: usize = 3;

/// A cubic grid of RGB voxels stored flat in x-major, y, z, channel order.
///
/// Channel values are expected to stay within `[0.0, 1.0]`; nothing enforces
/// it, but quantization to the wire format assumes it.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    dim: usize,
    channels: Vec<f64>,
}

impl Framebuffer {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            channels: vec![0.0; dim * dim * dim * CHANNELS_PER_CELL],
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn cell_count(&self) -> usize {
        self.dim * self.dim * self.dim
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn channels(&self) -> &[f64] {
        &self.channels
    }

    pub fn channels_mut(&mut self) -> &mut [f64] {
        &mut self.channels
    }

    #[inline]
    fn index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        let dim = self.dim as i32;
        if x < 0 || y < 0 || z < 0 || x >= dim || y >= dim || z >= dim {
            return None;
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        Some(((x * self.dim + y) * self.dim + z) * CHANNELS_PER_CELL)
    }

    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<[f64; 3]> {
        self.index(x, y, z).map(|i| {
            [
                self.channels[i],
                self.channels[i + 1],
                self.channels[i + 2],
            ]
        })
    }

    pub fn set(&mut self, x: i32, y: i32, z: i32, r: f64, g: f64, b: f64) {
        if let Some(i) = self.index(x, y, z) {
            self.channels[i] = r;
            self.channels[i + 1] = g;
            self.channels[i + 2] = b;
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn blend(&mut self, x: i32, y: i32, z: i32, r: f64, g: f64, b: f64, alpha: f64) {
        if let Some(i) = self.index(x, y, z) {
            let keep = 1.0 - alpha;
            for (channel, value) in self.channels[i..i + 3].iter_mut().zip([r, g, b]) {
                *channel = *channel * keep + value * alpha;
            }
        }
    }

    pub fn fill(&mut self, r: f64, g: f64, b: f64) {
        for cell in self.channels.chunks_exact_mut(CHANNELS_PER_CELL) {
            cell[0] = r;
            cell[1] = g;
            cell[2] = b;
        }
    }

    pub fn clear(&mut self) {
        self.channels.fill(0.0);
    }

    /// Scales every channel by `factor`. Repeated calls decay exponentially.
    pub fn dim_by(&mut self, factor: f64) {
        for channel in &mut self.channels {
            *channel *= factor;
        }
    }

    /// Interpolates `a` towards `b` by `t` into `dst`.
    ///
    /// The endpoints copy their source buffer so `t == 0.0` and `t == 1.0`
    /// reproduce `a` and `b` bit for bit.
    ///
    /// # Panics
    ///
    /// Panics if the three buffers do not share the same dimension.
    pub fn merge(dst: &mut Framebuffer, a: &Framebuffer, b: &Framebuffer, t: f64) {
        assert!(
            dst.dim == a.dim && a.dim == b.dim,
            "merge requires buffers of equal dimension"
        );

        if t == 0.0 {
            dst.channels.copy_from_slice(&a.channels);
            return;
        }
        if t == 1.0 {
            dst.channels.copy_from_slice(&b.channels);
            return;
        }

        let keep = 1.0 - t;
        for ((out, &from), &to) in dst.channels.iter_mut().zip(&a.channels).zip(&b.channels) {
            *out = from * keep + to * t;
        }
    }

    pub fn copy_from(&mut self, other: &Framebuffer) {
        self.channels.copy_from_slice(&other.channels);
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new(GRID_DIM)
    }
}

/// Converts a `[0, 1]` channel value to its wire byte by truncation.
#[inline]
pub fn quantize(value: f64) -> u8 {
    (value * 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterned() -> Framebuffer {
        let mut fb = Framebuffer::new(4);
        for (i, c) in fb.channels_mut().iter_mut().enumerate() {
            *c = (i % 17) as f64 / 16.0;
        }
        fb
    }

    #[test]
    fn quantize_truncates() {
        assert_eq!(quantize(0.0), 0);
        assert_eq!(quantize(1.0), 255);
        assert_eq!(quantize(0.5), 127);
        assert_eq!(quantize(0.999), 254);
    }

    #[test]
    fn layout_is_x_major() {
        let mut fb = Framebuffer::new(GRID_DIM);
        fb.set(1, 2, 3, 0.1, 0.2, 0.3);
        let base = ((8 + 2) * 8 + 3) * 3;
        assert_eq!(&fb.channels()[base..base + 3], &[0.1, 0.2, 0.3]);
        assert_eq!(fb.channel_count(), 1536);
        assert_eq!(fb.cell_count(), 512);
    }

    #[test]
    fn out_of_range_writes_are_ignored() {
        let mut fb = patterned();
        let before = fb.clone();

        for (x, y, z) in [(-1, 0, 0), (0, -1, 0), (0, 0, -1), (4, 0, 0), (0, 4, 0), (0, 0, 4), (100, -100, 2)] {
            fb.set(x, y, z, 1.0, 1.0, 1.0);
            fb.blend(x, y, z, 1.0, 1.0, 1.0, 0.5);
        }

        assert_eq!(fb, before);
        assert_eq!(fb.get(4, 0, 0), None);
    }

    #[test]
    fn blend_identity() {
        let mut blended = patterned();
        let mut set = patterned();
        blended.blend(1, 2, 3, 0.25, 0.5, 0.75, 1.0);
        set.set(1, 2, 3, 0.25, 0.5, 0.75);
        assert_eq!(blended, set);

        let mut untouched = patterned();
        untouched.blend(1, 2, 3, 0.25, 0.5, 0.75, 0.0);
        assert_eq!(untouched, patterned());
    }

    #[test]
    fn blend_composites_per_channel() {
        let mut fb = Framebuffer::new(2);
        fb.set(0, 0, 0, 1.0, 0.0, 0.5);
        fb.blend(0, 0, 0, 0.0, 1.0, 0.5, 0.25);
        let [r, g, b] = fb.get(0, 0, 0).unwrap();
        assert!((r - 0.75).abs() < 1e-12);
        assert!((g - 0.25).abs() < 1e-12);
        assert!((b - 0.5).abs() < 1e-12);
    }

    #[test]
    fn fill_and_dim() {
        let mut fb = Framebuffer::new(3);
        fb.fill(0.5, 1.0, 0.2);
        fb.dim_by(0.5);
        fb.dim_by(0.5);
        for cell in fb.channels().chunks_exact(3) {
            assert_eq!(cell, &[0.125, 0.25, 0.05]);
        }
        fb.clear();
        assert!(fb.channels().iter().all(|&c| c == 0.0));
    }

    #[test]
    fn merge_endpoints_are_exact() {
        let a = patterned();
        let mut b = Framebuffer::new(4);
        b.fill(0.3, 0.6, 0.9);
        let mut dst = Framebuffer::new(4);

        Framebuffer::merge(&mut dst, &a, &b, 0.0);
        assert_eq!(dst, a);

        Framebuffer::merge(&mut dst, &a, &b, 1.0);
        assert_eq!(dst, b);
    }

    #[test]
    fn merge_interpolates_linearly() {
        let mut a = Framebuffer::new(2);
        let mut b = Framebuffer::new(2);
        a.fill(0.0, 1.0, 0.5);
        b.fill(1.0, 0.0, 0.5);
        let mut dst = Framebuffer::new(2);

        Framebuffer::merge(&mut dst, &a, &b, 0.25);
        let [r, g, bl] = dst.get(1, 1, 1).unwrap();
        assert!((r - 0.25).abs() < 1e-12);
        assert!((g - 0.75).abs() < 1e-12);
        assert!((bl - 0.5).abs() < 1e-12);
    }
}
