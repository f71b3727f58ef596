use std::f64::consts::PI;

use super::Effect;
use crate::frame::Framebuffer;

/// A blue ripple surface on a black background.
pub struct Wave;

impl Effect for Wave {
    fn render(&mut self, fb: &mut Framebuffer, t: f64) {
        fb.clear();

        let dim = fb.dim() as i32;
        let top = (dim - 1).max(1) as f64;

        for x in 0..dim {
            for y in 0..dim {
                let u = (x as f64 / top - 0.5) * 0.8 * PI;
                let v = (y as f64 / top - 0.5) * 0.8 * PI;
                let z = (u.hypot(v) + t).sin() * 0.7 + 0.7;
                let floor = z.floor();
                let frac = z - floor;

                fb.set(x, y, floor as i32 + 1, 0.0, 0.0, frac);
                fb.set(x, y, floor as i32, 0.0, 0.0, 1.0 - frac);
            }
        }
    }
}
