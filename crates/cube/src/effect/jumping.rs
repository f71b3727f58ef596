use rand::prelude::*;

use super::Effect;
use crate::frame::Framebuffer;

const BACKGROUND: [f64; 3] = [0.0, 0.3, 0.0];

/// One white voxel per column bobbing up and down, each column phase-shifted
/// by a random offset chosen when the effect starts.
pub struct JumpingPixels {
    rng: StdRng,
    offsets: Vec<f64>,
}

impl JumpingPixels {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            offsets: Vec::new(),
        }
    }

    fn ensure_offsets(&mut self, dim: usize) {
        if self.offsets.len() == dim * dim {
            return;
        }
        let span = dim.saturating_sub(1) as f64;
        self.offsets = (0..dim * dim)
            .map(|_| self.rng.gen_range(0.0..1.0) * span - span / 2.0)
            .collect();
    }
}

impl Default for JumpingPixels {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for JumpingPixels {
    fn render(&mut self, fb: &mut Framebuffer, t: f64) {
        let dim = fb.dim();
        self.ensure_offsets(dim);

        fb.fill(BACKGROUND[0], BACKGROUND[1], BACKGROUND[2]);

        let span = dim.saturating_sub(1) as f64;
        let ceiling = (span - 0.01).max(0.0);

        for x in 0..dim {
            for y in 0..dim {
                let offset = self.offsets[x * dim + y];
                let z = (t.sin() * span + offset + span / 2.0).clamp(0.0, ceiling);
                let floor = z.floor();
                let frac = z - floor;
                let (x, y, base) = (x as i32, y as i32, floor as i32);

                fb.blend(x, y, base + 1, 1.0, 1.0, 1.0, frac);
                fb.blend(x, y, base, 1.0, 1.0, 1.0, 1.0 - frac);
            }
        }
    }
}
