use std::f64::consts::TAU;

use super::Effect;
use crate::frame::Framebuffer;

/// A green radar sweep rotating about the vertical axis once every 2π
/// seconds, with a bright leading edge and a fading trail.
pub struct RadarScan;

impl Effect for RadarScan {
    fn render(&mut self, fb: &mut Framebuffer, t: f64) {
        let dim = fb.dim() as i32;
        let center = (dim - 1) as f64 / 2.0;
        let inner = center;
        let outer = center + 1.0;

        for x in 0..dim {
            for y in 0..dim {
                let u = x as f64 - center;
                let v = y as f64 - center;
                let r = u.hypot(v);

                let [red, green, blue] = if r < outer {
                    let alpha = if r < inner { 1.0 } else { outer - r };
                    let phi = (TAU + v.atan2(u) + t).rem_euclid(TAU);
                    let trail = (2.0 - phi).max(0.0) / 2.0;
                    [
                        trail * alpha,
                        (0.4 + 0.6 * trail) * alpha,
                        trail * alpha,
                    ]
                } else {
                    [0.0; 3]
                };

                for z in 0..dim {
                    fb.set(x, y, z, red, green, blue);
                }
            }
        }
    }
}
