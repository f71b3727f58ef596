use rand::prelude::*;

use super::Effect;
use crate::frame::Framebuffer;

const BLIPS_PER_TICK: usize = 5;
const DECAY: f64 = 0.99;

/// Random voxels flash up in random colours and slowly fade out.
pub struct RandomBlips {
    rng: StdRng,
}

impl RandomBlips {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomBlips {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for RandomBlips {
    fn render(&mut self, fb: &mut Framebuffer, _t: f64) {
        fb.dim_by(DECAY);

        let dim = fb.dim() as i32;
        if dim == 0 {
            return;
        }

        for _ in 0..BLIPS_PER_TICK {
            let x = self.rng.gen_range(0..dim);
            let y = self.rng.gen_range(0..dim);
            let z = self.rng.gen_range(0..dim);
            let r = self.rng.gen_range(0.0..1.0);
            let g = self.rng.gen_range(0.0..1.0);
            let b = self.rng.gen_range(0.0..1.0);

            fb.set(x, y, z, r, g, b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn previous_frame_decays() {
        let mut fb = Framebuffer::new(8);
        fb.fill(1.0, 1.0, 1.0);

        RandomBlips::with_seed(7).render(&mut fb, 0.0);

        let untouched = fb
            .channels()
            .chunks_exact(3)
            .filter(|cell| cell == &[DECAY; 3])
            .count();
        assert!(untouched >= 512 - BLIPS_PER_TICK);
    }

    #[test]
    fn seeded_runs_repeat() {
        let mut a = Framebuffer::new(8);
        let mut b = Framebuffer::new(8);
        let mut first = RandomBlips::with_seed(42);
        let mut second = RandomBlips::with_seed(42);

        for _ in 0..10 {
            first.render(&mut a, 0.0);
            second.render(&mut b, 0.0);
        }
        assert_eq!(a, b);
    }
}
