use std::f64::consts::FRAC_PI_2;

use glam::DVec3;

use super::Effect;
use crate::frame::Framebuffer;

const BACKGROUND: DVec3 = DVec3::new(0.2, 0.0, 0.0);
const PANEL: DVec3 = DVec3::new(1.0, 0.8, 0.0);
const FLIP_SECS: f64 = 2.0;
const FLIP_COUNT: f64 = 6.0;
const PANEL_THICKNESS: f64 = 0.7;

/// A square panel tipping over from face to face around the cube's edges,
/// completing a six-flip tour every twelve seconds.
pub struct RectFlip;

impl RectFlip {
    /// Plane normal, plane offset, and the panel's hinge edge for a flip at
    /// `angle` radians into stage `stage`.
    fn stage(stage: u32, angle: f64, top: f64) -> (DVec3, f64, fn(DVec3, f64) -> f64) {
        let (s, c) = angle.sin_cos();

        match stage {
            0 => {
                let n = DVec3::new(s, 0.0, -c);
                (n, top * (n.x + n.z), |p, top| (top - p.x).hypot(top - p.z))
            }
            1 => {
                let n = DVec3::new(c, s, 0.0);
                (n, top * n.x, |p, top| (top - p.x).hypot(p.y))
            }
            2 => (DVec3::new(0.0, c, -s), 0.0, |p, _| p.y.hypot(p.z)),
            3 => (DVec3::new(-s, 0.0, c), 0.0, |p, _| p.x.hypot(p.z)),
            4 => {
                let n = DVec3::new(-c, -s, 0.0);
                (n, top * n.y, |p, top| p.x.hypot(top - p.y))
            }
            _ => {
                let n = DVec3::new(0.0, -c, s);
                (n, top * (n.y + n.z), |p, top| (top - p.y).hypot(top - p.z))
            }
        }
    }
}

impl Effect for RectFlip {
    fn render(&mut self, fb: &mut Framebuffer, t: f64) {
        let stage = (t.rem_euclid(FLIP_SECS * FLIP_COUNT) / FLIP_SECS) as u32;
        let progress = t.rem_euclid(FLIP_SECS) / FLIP_SECS;
        let angle = progress.powi(3) * FRAC_PI_2;

        fb.fill(BACKGROUND.x, BACKGROUND.y, BACKGROUND.z);

        let dim = fb.dim() as i32;
        let top = (dim - 1).max(0) as f64;
        let (normal, offset, hinge_distance) = Self::stage(stage, angle, top);

        for x in 0..dim {
            for y in 0..dim {
                for z in 0..dim {
                    let p = DVec3::new(x as f64, y as f64, z as f64);
                    let d = (normal.dot(p) - offset).abs();
                    if d >= PANEL_THICKNESS {
                        continue;
                    }

                    let len = hinge_distance(p, top);
                    let coverage = 1.0 - (len - top).clamp(0.0, 1.0);
                    fb.blend(x, y, z, PANEL.x, PANEL.y, PANEL.z, coverage * (1.0 - d));
                }
            }
        }
    }
}
