// Transform utilities for Mat3
//
// Extends glam::Mat3 with box transformation for instanced (rotated) geometry.

use crate::Aabb;
use glam::{Mat3, Vec3};

/// Extension trait for Mat3 to provide additional transform utilities
pub trait Mat3Ext {
    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat3Ext for Mat3 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let lo = aabb.min_corner();
        let hi = aabb.max_corner();

        let mut result_min = Vec3::splat(f32::INFINITY);
        let mut result_max = Vec3::splat(f32::NEG_INFINITY);

        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            );
            let transformed = *self * corner;
            result_min = result_min.min(transformed);
            result_max = result_max.max(transformed);
        }

        Aabb::from_points(result_min, result_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_transform_aabb_identity() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(1.0, 3.0, 4.0));
        assert_eq!(Mat3::IDENTITY.transform_aabb(&aabb), aabb);
    }

    #[test]
    fn test_transform_aabb_rotation_y() {
        // Box spanning x in [1, 2]; a quarter turn about Y sends +X to -Z
        let aabb = Aabb::from_points(Vec3::new(1.0, 0.0, -0.5), Vec3::new(2.0, 1.0, 0.5));
        let rotated = Mat3::from_rotation_y(FRAC_PI_2).transform_aabb(&aabb);

        assert!((rotated.z.min - -2.0).abs() < 1e-5);
        assert!((rotated.z.max - -1.0).abs() < 1e-5);
        assert!((rotated.x.min - -0.5).abs() < 1e-5);
        assert!((rotated.x.max - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_transform_aabb_rotation_grows_box() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let rotated = Mat3::from_rotation_z(std::f32::consts::FRAC_PI_4).transform_aabb(&aabb);

        let half_diagonal = 2.0_f32.sqrt();
        assert!((rotated.x.max - half_diagonal).abs() < 1e-5);
        assert!((rotated.y.min + half_diagonal).abs() < 1e-5);
        assert!((rotated.z.max - 1.0).abs() < 1e-5);
    }
}
