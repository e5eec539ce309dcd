//! Sphere primitive for ray tracing, optionally moving for motion blur.

use std::f32::consts::PI;
use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use glint_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// A sphere whose center moves linearly from `center` at time 0 to
/// `center + motion` at time 1. A static sphere has zero motion.
pub struct Sphere {
    center: Vec3,
    motion: Vec3,
    radius: f32,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a stationary sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            motion: Vec3::ZERO,
            radius,
            material,
            bbox,
        }
    }

    /// Create a sphere moving from `center0` (time 0) to `center1` (time 1).
    pub fn moving(center0: Vec3, center1: Vec3, radius: f32, material: Arc<Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);

        // Bounds of the entire range of motion
        let box0 = Aabb::from_points(center0 - rvec, center0 + rvec);
        let box1 = Aabb::from_points(center1 - rvec, center1 + rvec);

        Self {
            center: center0,
            motion: center1 - center0,
            radius,
            material,
            bbox: Aabb::surrounding(&box0, &box1),
        }
    }

    /// Center of the sphere at the given shutter time.
    #[inline]
    pub fn center(&self, time: f32) -> Vec3 {
        self.center + time * self.motion
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        // theta: angle up from -Y
        // phi: angle around Y axis from -X
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let center = self.center(ray.time());
        let oc = center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - center) / self.radius;
        Some(HitRecord::new(
            ray,
            root,
            outward_normal,
            &self.material,
            Self::get_sphere_uv(outward_normal),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
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

    #[test]
    fn test_unit_sphere_hit_from_outside() {
        let mut rng = StdRng::seed_from_u64(0);
        let sphere = Sphere::new(Vec3::ZERO, 1.0, gray());
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

        let rec = sphere
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .unwrap();

        assert_eq!(rec.t, 4.0);
        assert_eq!(rec.p, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(rec.normal, Vec3::new(0.0, 0.0, 1.0));
        assert!(rec.front_face);
    }

    #[test]
    fn test_sphere_hit_from_inside_uses_far_root() {
        let mut rng = StdRng::seed_from_u64(0);
        let sphere = Sphere::new(Vec3::ZERO, 1.0, gray());
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::X);

        let rec = sphere
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .unwrap();

        assert!((rec.t - 1.0).abs() < 1e-6);
        assert!(!rec.front_face);
        // Normal flipped to face the ray
        assert!((rec.normal - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_sphere_miss() {
        let mut rng = StdRng::seed_from_u64(0);
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray());

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(sphere
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .is_none());

        // Both roots outside the window
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert!(sphere.hit(&ray, Interval::new(0.001, 0.4), &mut rng).is_none());
    }

    #[test]
    fn test_moving_sphere_follows_ray_time() {
        let mut rng = StdRng::seed_from_u64(0);
        let sphere = Sphere::moving(Vec3::ZERO, Vec3::new(0.0, 4.0, 0.0), 1.0, gray());
        let window = Interval::new(0.001, f32::INFINITY);

        // At time 1 the sphere sits at y = 4
        let ray = Ray::new(Vec3::new(0.0, 4.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 1.0);
        assert!(sphere.hit(&ray, window, &mut rng).is_some());

        let ray = Ray::new(Vec3::new(0.0, 4.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(sphere.hit(&ray, window, &mut rng).is_none());

        // The box covers the whole sweep
        let bbox = sphere.bounding_box();
        assert_eq!(bbox.y, Interval::new(-1.0, 5.0));
    }

    #[test]
    fn test_sphere_uv() {
        let (u, v) = Sphere::get_sphere_uv(Vec3::new(0.0, -1.0, 0.0));
        assert!(v.abs() < 1e-6);
        assert!((0.0..=1.0).contains(&u));

        let (u, v) = Sphere::get_sphere_uv(Vec3::new(-1.0, 0.0, 0.0));
        assert!(u.abs() < 1e-6 || (u - 1.0).abs() < 1e-6);
        assert!((v - 0.5).abs() < 1e-6);
    }
}
