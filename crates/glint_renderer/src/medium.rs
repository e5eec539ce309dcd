//! Constant-density participating medium (smoke, fog).

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    sampling::gen_f32,
    Color, Isotropic, Material, Primitive, Texture,
};
use glint_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Volume of uniform density filling a convex boundary.
///
/// A ray passing through scatters after an exponentially distributed free
/// path; the scatter point carries an isotropic phase function.
pub struct ConstantMedium {
    boundary: Arc<Primitive>,
    neg_inv_density: f32,
    phase_function: Material,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<Primitive>, density: f32, albedo: Color) -> Self {
        Self::from_texture(boundary, density, Texture::Solid(albedo))
    }

    pub fn from_texture(boundary: Arc<Primitive>, density: f32, albedo: Texture) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Isotropic::from_texture(albedo).into(),
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        // Entry and exit along the whole line, then clip to the query window
        let enter = self.boundary.hit(ray, Interval::UNIVERSE, rng)?;
        let exit = self
            .boundary
            .hit(ray, Interval::new(enter.t + 0.0001, f32::INFINITY), rng)?;

        let t_enter = enter.t.max(ray_t.min);
        let t_exit = exit.t.min(ray_t.max);
        if t_enter >= t_exit {
            return None;
        }
        let t_enter = t_enter.max(0.0);

        let ray_length = ray.direction().length();
        let distance_inside_boundary = (t_exit - t_enter) * ray_length;
        let hit_distance = self.neg_inv_density * gen_f32(rng).ln();

        if hit_distance > distance_inside_boundary {
            return None;
        }

        let t = t_enter + hit_distance / ray_length;
        Some(HitRecord {
            p: ray.at(t),
            // Arbitrary; the phase function ignores it
            normal: Vec3::X,
            material: &self.phase_function,
            t,
            u: 0.0,
            v: 0.0,
            front_face: true,
        })
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}
