//! Affine instance wrappers.
//!
//! Rather than transforming geometry, these move the incoming ray into the
//! wrapped object's local frame, delegate the query, and carry the hit back
//! out to world space.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Primitive,
};
use glint_math::{Aabb, EulerRot, Interval, Mat3, Mat3Ext, Ray, Vec3};
use rand::RngCore;

/// An object displaced by a fixed offset.
pub struct Translate {
    object: Arc<Primitive>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Arc<Primitive>, offset: Vec3) -> Self {
        let bbox = object.bounding_box().translate(offset);
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl Hittable for Translate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let local_ray = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());

        let mut rec = self.object.hit(&local_ray, ray_t, rng)?;
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// An object rotated about the origin.
///
/// Angles are Euler angles in degrees, applied about X first, then Y, then Z.
pub struct Rotate {
    object: Arc<Primitive>,
    /// Local-to-world rotation
    rotation: Mat3,
    /// World-to-local rotation (the transpose)
    inverse: Mat3,
    bbox: Aabb,
}

impl Rotate {
    pub fn new(object: Arc<Primitive>, degrees: Vec3) -> Self {
        let rotation = Mat3::from_euler(
            EulerRot::ZYX,
            degrees.z.to_radians(),
            degrees.y.to_radians(),
            degrees.x.to_radians(),
        );
        let bbox = rotation.transform_aabb(&object.bounding_box());

        Self {
            object,
            rotation,
            inverse: rotation.transpose(),
            bbox,
        }
    }

    /// Rotation about the Y axis only.
    pub fn y(object: Arc<Primitive>, degrees: f32) -> Self {
        Self::new(object, Vec3::new(0.0, degrees, 0.0))
    }
}

impl Hittable for Rotate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let local_ray = Ray::new(
            self.inverse * ray.origin(),
            self.inverse * ray.direction(),
            ray.time(),
        );

        // Rotation preserves lengths and angles: t and front_face carry over
        let mut rec = self.object.hit(&local_ray, ray_t, rng)?;
        rec.p = self.rotation * rec.p;
        rec.normal = self.rotation * rec.normal;
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
