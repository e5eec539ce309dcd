//! Parallelogram primitive and the box built from six of them.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    HittableList, Material,
};
use glint_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// A parallelogram with corner `q` and edges `u` and `v`:
///
/// ```text
///  q+v ______ q+u+v
///     /      /
///    /      /
///  q/______/ q+u
/// ```
pub struct Quad {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    /// Unit plane normal
    normal: Vec3,
    /// Plane offset, `normal · x = d` for points on the plane
    d: f32,
    /// `n / (n · n)` for the unnormalized normal, maps plane points to (a, b)
    w: Vec3,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Quad {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: Arc<Material>) -> Self {
        let n = u.cross(v);
        let normal = n.normalize_or_zero();
        let d = normal.dot(q);
        let w = n / n.dot(n);

        // Box over both diagonals; from_points pads the flat axis
        let diagonal0 = Aabb::from_points(q, q + u + v);
        let diagonal1 = Aabb::from_points(q + u, q + v);

        Self {
            q,
            u,
            v,
            normal,
            d,
            w,
            material,
            bbox: Aabb::surrounding(&diagonal0, &diagonal1),
        }
    }
}

impl Hittable for Quad {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        // No hit if the ray is parallel to the plane
        let denom = self.normal.dot(ray.direction());
        if denom.abs() < 1e-8 {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return None;
        }

        // Express the plane hit in the (u, v) basis
        let planar_hit = ray.at(t) - self.q;
        let alpha = self.w.dot(planar_hit.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hit));

        let unit = Interval::new(0.0, 1.0);
        if !unit.contains(alpha) || !unit.contains(beta) {
            return None;
        }

        Some(HitRecord::new(
            ray,
            t,
            self.normal,
            &self.material,
            (alpha, beta),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// The six sides of the axis-aligned box with opposite corners `a` and `b`.
pub fn cuboid(a: Vec3, b: Vec3, material: Arc<Material>) -> HittableList {
    let mut sides = HittableList::new();

    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    sides.add(Quad::new(Vec3::new(min.x, min.y, max.z), dx, dy, material.clone())); // front
    sides.add(Quad::new(Vec3::new(max.x, min.y, max.z), -dz, dy, material.clone())); // right
    sides.add(Quad::new(Vec3::new(max.x, min.y, min.z), -dx, dy, material.clone())); // back
    sides.add(Quad::new(Vec3::new(min.x, min.y, min.z), dz, dy, material.clone())); // left
    sides.add(Quad::new(Vec3::new(min.x, max.y, max.z), dx, -dz, material.clone())); // top
    sides.add(Quad::new(Vec3::new(min.x, min.y, min.z), dx, dz, material)); // bottom

    sides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Lambertian};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)).into())
    }

    /// Unit square in the z = -1 plane with corner at (-0.5, -0.5)
    fn square() -> Quad {
        Quad::new(Vec3::new(-0.5, -0.5, -1.0), Vec3::X, Vec3::Y, gray())
    }

    #[test]
    fn test_quad_hit_reports_local_coordinates() {
        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new_simple(Vec3::new(0.25, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));

        let quad = square();
        let rec = quad
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .unwrap();

        assert!((rec.t - 1.0).abs() < 1e-6);
        assert!((rec.u - 0.75).abs() < 1e-6);
        assert!((rec.v - 0.5).abs() < 1e-6);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
    }

    #[test]
    fn test_quad_miss_outside_edges() {
        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new_simple(Vec3::new(0.75, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(square()
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .is_none());
    }

    #[test]
    fn test_quad_rejects_parallel_ray() {
        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new_simple(Vec3::new(-2.0, 0.0, -1.0), Vec3::X);
        assert!(square()
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .is_none());
    }

    #[test]
    fn test_quad_bbox_is_not_degenerate() {
        let bbox = square().bounding_box();
        assert!(bbox.z.size() > 0.0);
        assert!(bbox.z.surrounds(-1.0));
        assert_eq!(bbox.x, Interval::new(-0.5, 0.5));
    }

    #[test]
    fn test_cuboid_is_closed() {
        let mut rng = StdRng::seed_from_u64(0);
        let sides = cuboid(Vec3::ZERO, Vec3::splat(2.0), gray());
        assert_eq!(sides.len(), 6);

        // Rays from the center leave through exactly one face at distance 1
        for direction in [Vec3::X, -Vec3::X, Vec3::Y, -Vec3::Y, Vec3::Z, -Vec3::Z] {
            let ray = Ray::new_simple(Vec3::ONE, direction);
            let rec = sides
                .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
                .unwrap();
            assert!((rec.t - 1.0).abs() < 1e-5, "direction {direction:?}");
            assert!(!rec.front_face, "direction {direction:?}");
        }
    }
}
