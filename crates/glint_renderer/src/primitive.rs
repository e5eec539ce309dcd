//! Closed set of scene geometry.
//!
//! Every hittable the renderer knows about is one variant of [`Primitive`],
//! so intersection dispatch is a single exhaustive `match`. Composite
//! variants hold their children as `Arc<Primitive>`, which lets the same
//! object appear in a list, a BVH and an instance wrapper at once.

use crate::{
    BvhNode, ConstantMedium, HitRecord, Hittable, HittableList, Quad, Rotate, Sphere, Translate,
    Triangle,
};
use glint_math::{Aabb, Interval, Ray};
use rand::RngCore;

pub enum Primitive {
    Sphere(Sphere),
    Quad(Quad),
    Triangle(Triangle),
    List(HittableList),
    Bvh(BvhNode),
    ConstantMedium(ConstantMedium),
    Translate(Translate),
    Rotate(Rotate),
}

impl Primitive {
    /// Short variant name, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Sphere(_) => "sphere",
            Primitive::Quad(_) => "quad",
            Primitive::Triangle(_) => "triangle",
            Primitive::List(_) => "list",
            Primitive::Bvh(_) => "bvh",
            Primitive::ConstantMedium(_) => "constant_medium",
            Primitive::Translate(_) => "translate",
            Primitive::Rotate(_) => "rotate",
        }
    }
}

impl Hittable for Primitive {
    #[inline]
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        match self {
            Primitive::Sphere(s) => s.hit(ray, ray_t, rng),
            Primitive::Quad(q) => q.hit(ray, ray_t, rng),
            Primitive::Triangle(t) => t.hit(ray, ray_t, rng),
            Primitive::List(l) => l.hit(ray, ray_t, rng),
            Primitive::Bvh(b) => b.hit(ray, ray_t, rng),
            Primitive::ConstantMedium(m) => m.hit(ray, ray_t, rng),
            Primitive::Translate(t) => t.hit(ray, ray_t, rng),
            Primitive::Rotate(r) => r.hit(ray, ray_t, rng),
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            Primitive::Sphere(s) => s.bounding_box(),
            Primitive::Quad(q) => q.bounding_box(),
            Primitive::Triangle(t) => t.bounding_box(),
            Primitive::List(l) => l.bounding_box(),
            Primitive::Bvh(b) => b.bounding_box(),
            Primitive::ConstantMedium(m) => m.bounding_box(),
            Primitive::Translate(t) => t.bounding_box(),
            Primitive::Rotate(r) => r.bounding_box(),
        }
    }
}

macro_rules! impl_from_variant {
    ($($ty:ident),*) => {
        $(
            impl From<$ty> for Primitive {
                fn from(value: $ty) -> Self {
                    Primitive::$ty(value)
                }
            }
        )*
    };
}

impl_from_variant!(Sphere, Quad, Triangle, ConstantMedium, Translate, Rotate);

impl From<HittableList> for Primitive {
    fn from(list: HittableList) -> Self {
        Primitive::List(list)
    }
}

impl From<BvhNode> for Primitive {
    fn from(node: BvhNode) -> Self {
        Primitive::Bvh(node)
    }
}
