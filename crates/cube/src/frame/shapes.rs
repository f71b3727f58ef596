use glam::DVec3;

use super::Framebuffer;

/// Spacing between voxel centres in blob space.
const BLOB_VOXEL_SPACING: f64 = 0.25;

/// Draws a point at fractional height `z` in column `(x, y)`, splitting its
/// weight between the two neighbouring cells.
pub fn blend_column_fractional(fb: &mut Framebuffer, x: i32, y: i32, z: f64, color: DVec3) {
    let floor = z.floor();
    let frac = z - floor;
    let base = floor as i32;

    fb.blend(x, y, base + 1, color.x, color.y, color.z, frac);
    fb.blend(x, y, base, color.x, color.y, color.z, 1.0 - frac);
}

/// Composites a soft sphere onto the buffer.
///
/// Voxel `(X, Y, Z)` sits at `(X, Y, Z) * 0.25` in blob space. `sharpness`
/// steepens the falloff around half the radius.
pub fn render_blob(fb: &mut Framebuffer, center: DVec3, color: DVec3, radius: f64, sharpness: f64) {
    let dim = fb.dim() as i32;

    for x in 0..dim {
        for y in 0..dim {
            for z in 0..dim {
                let pos = DVec3::new(x as f64, y as f64, z as f64) * BLOB_VOXEL_SPACING;
                let d = pos.distance(center) / radius;
                let d = ((d - 0.5) * sharpness + 0.5).clamp(0.0, 1.0);
                let d = d.powf(sharpness);

                fb.blend(x, y, z, color.x, color.y, color.z, 1.0 - d);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractional_column_splits_weight() {
        let mut fb = Framebuffer::new(8);
        blend_column_fractional(&mut fb, 2, 3, 4.25, DVec3::new(1.0, 0.0, 0.0));

        let lower = fb.get(2, 3, 4).unwrap();
        let upper = fb.get(2, 3, 5).unwrap();
        assert!((lower[0] - 0.75).abs() < 1e-12);
        assert!((upper[0] - 0.25).abs() < 1e-12);
        assert_eq!(fb.get(2, 3, 6).unwrap(), [0.0; 3]);
    }

    #[test]
    fn fractional_column_tolerates_top_overshoot() {
        let mut fb = Framebuffer::new(8);
        blend_column_fractional(&mut fb, 0, 0, 7.5, DVec3::ONE);
        let top = fb.get(0, 0, 7).unwrap();
        assert!((top[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn blob_is_brightest_at_center() {
        let mut fb = Framebuffer::new(8);
        render_blob(&mut fb, DVec3::splat(0.875), DVec3::new(1.0, 1.0, 0.0), 0.75, 1.0);

        let center = fb.get(3, 3, 3).unwrap()[0];
        let corner = fb.get(0, 0, 0).unwrap()[0];
        assert!(center > corner);
        assert!(fb.channels().iter().all(|c| (0.0..=1.0).contains(c)));
    }
}
