use std::f64::consts::PI;

use glam::DVec3;

use super::Effect;
use crate::frame::{Framebuffer, blend_column_fractional, render_blob};

const BACKGROUND: DVec3 = DVec3::new(0.0, 0.0, 0.4);
const SURFACE: DVec3 = DVec3::new(1.0, 0.0, 0.0);
const BALLOON: DVec3 = DVec3::new(1.0, 1.0, 0.0);
const BALLOON_PERIOD: f64 = 4.0;

/// A red ripple surface over a blue background with a yellow blob rising
/// through it every four seconds.
pub struct LavaBalloon;

impl Effect for LavaBalloon {
    fn render(&mut self, fb: &mut Framebuffer, t: f64) {
        fb.fill(BACKGROUND.x, BACKGROUND.y, BACKGROUND.z);

        let dim = fb.dim() as i32;
        let top = (dim - 1).max(1) as f64;

        for x in 0..dim {
            for y in 0..dim {
                let u = (x as f64 / top - 0.5) * 0.8 * PI;
                let v = (y as f64 / top - 0.5) * 0.8 * PI;
                let z = (u.hypot(v) + t).sin() * 0.7 + 0.7;

                blend_column_fractional(fb, x, y, z, SURFACE);
            }
        }

        let mid = top * 0.125;
        let rise = t.rem_euclid(BALLOON_PERIOD) - 1.0;
        render_blob(fb, DVec3::new(mid, mid, rise), BALLOON, 0.75, 1.0);
    }
}
