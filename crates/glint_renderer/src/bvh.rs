//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree of boxes over the scene's primitives. Each node owns
//! exactly two children; a single leftover object is stored on both sides.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::{HitRecord, Hittable, HittableList, Primitive};
use glint_math::{Aabb, Interval, Ray};
use rand::{Rng, RngCore};

/// BVH node with two children and the box enclosing both.
pub struct BvhNode {
    left: Arc<Primitive>,
    right: Arc<Primitive>,
    bbox: Aabb,
}

impl BvhNode {
    /// Build a BVH over `objects`. Returns `None` for an empty slice.
    ///
    /// The split axis at every node is drawn from `rng`.
    pub fn new(objects: &[Arc<Primitive>], rng: &mut dyn RngCore) -> Option<Self> {
        if objects.is_empty() {
            return None;
        }

        // Work on a copy; construction reorders it
        let mut working = objects.to_vec();
        let node = Self::build(&mut working, rng);

        log::debug!(
            "Built BVH over {} objects, bbox: {:?}",
            objects.len(),
            node.bbox
        );

        Some(node)
    }

    /// Build a BVH over the members of a list.
    pub fn from_list(list: &HittableList, rng: &mut dyn RngCore) -> Option<Self> {
        Self::new(list.objects(), rng)
    }

    pub fn left(&self) -> &Arc<Primitive> {
        &self.left
    }

    pub fn right(&self) -> &Arc<Primitive> {
        &self.right
    }

    /// Recursive construction over a non-empty slice.
    fn build(objects: &mut [Arc<Primitive>], rng: &mut dyn RngCore) -> Self {
        let axis = rng.gen_range(0..3);

        let (left, right) = match objects.len() {
            1 => (objects[0].clone(), objects[0].clone()),
            2 => {
                if box_compare(&objects[0], &objects[1], axis) == Ordering::Greater {
                    (objects[1].clone(), objects[0].clone())
                } else {
                    (objects[0].clone(), objects[1].clone())
                }
            }
            n => {
                objects.sort_by(|a, b| box_compare(a, b, axis));

                let (lower, upper) = objects.split_at_mut(n / 2);
                (
                    Arc::new(Self::build(lower, rng).into()),
                    Arc::new(Self::build(upper, rng).into()),
                )
            }
        };

        let bbox = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());
        Self { left, right, bbox }
    }
}

/// Order two objects by the low end of their boxes along `axis`.
fn box_compare(a: &Arc<Primitive>, b: &Arc<Primitive>, axis: usize) -> Ordering {
    let a_min = a.bounding_box().axis_interval(axis).min;
    let b_min = b.bounding_box().axis_interval(axis).min;
    a_min.partial_cmp(&b_min).unwrap_or(Ordering::Equal)
}

impl Hittable for BvhNode {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        if !self.bbox.hit(ray, ray_t) {
            return None;
        }

        let hit_left = self.left.hit(ray, ray_t, rng);

        // Only check right up to closest hit
        let right_max = hit_left.map_or(ray_t.max, |rec| rec.t);
        let hit_right = self
            .right
            .hit(ray, Interval::new(ray_t.min, right_max), rng);

        hit_right.or(hit_left)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::{gen_range_f32, random_unit_vector, random_vec3};
    use crate::{Color, Lambertian, Material, Quad, Sphere};
    use glint_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<Material> {
        Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)).into())
    }

    fn sphere(center: Vec3, radius: f32) -> Arc<Primitive> {
        Arc::new(Sphere::new(center, radius, gray()).into())
    }

    #[test]
    fn test_bvh_empty() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(BvhNode::new(&[], &mut rng).is_none());
    }

    #[test]
    fn test_bvh_single_object_is_duplicated() {
        let mut rng = StdRng::seed_from_u64(0);
        let objects = vec![sphere(Vec3::new(0.0, 0.0, -1.0), 0.5)];
        let bvh = BvhNode::new(&objects, &mut rng).unwrap();

        assert!(Arc::ptr_eq(bvh.left(), bvh.right()));
        assert_eq!(bvh.bounding_box(), objects[0].bounding_box());

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let rec = bvh
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .unwrap();
        assert!((rec.t - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_bvh_two_objects_ordered_by_box_min() {
        // Ordered the same way on every axis, so the random axis does not matter
        let near = sphere(Vec3::ZERO, 1.0);
        let far = sphere(Vec3::splat(5.0), 1.0);

        for seed in 0..8 {
            let mut rng = StdRng::seed_from_u64(seed);
            let bvh = BvhNode::new(&[far.clone(), near.clone()], &mut rng).unwrap();
            assert!(Arc::ptr_eq(bvh.left(), &near));
            assert!(Arc::ptr_eq(bvh.right(), &far));
        }
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let mut rng = StdRng::seed_from_u64(0);
        let spheres: Vec<Arc<Primitive>> = (0..10)
            .map(|i| sphere(Vec3::new(i as f32, 0.0, -5.0), 0.5))
            .collect();

        let bvh = BvhNode::new(&spheres, &mut rng).unwrap();

        // Test ray that hits sphere at x=5
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let rec = bvh
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .unwrap();

        // Hit point should be near z = -4.5 (sphere at z=-5, radius 0.5)
        assert!((rec.p.z - (-4.5)).abs() < 0.01);
    }

    #[test]
    fn test_bvh_matches_linear_scan() {
        let mut rng = StdRng::seed_from_u64(1234);

        let mut list = HittableList::new();
        for _ in 0..60 {
            let center = random_vec3(&mut rng, -10.0, 10.0);
            list.add_shared(sphere(center, gen_range_f32(&mut rng, 0.2, 1.5)));
        }
        for _ in 0..10 {
            let q = random_vec3(&mut rng, -10.0, 10.0);
            let u = random_vec3(&mut rng, -2.0, 2.0);
            let v = random_vec3(&mut rng, -2.0, 2.0);
            list.add(Quad::new(q, u, v, gray()));
        }

        let bvh = BvhNode::from_list(&list, &mut rng).unwrap();
        assert_eq!(bvh.bounding_box(), list.bounding_box());

        let mut hits = 0;
        for _ in 0..2000 {
            let origin = random_vec3(&mut rng, -15.0, 15.0);
            let target = random_vec3(&mut rng, -8.0, 8.0);
            let direction = if (target - origin).length_squared() > 1e-6 {
                target - origin
            } else {
                random_unit_vector(&mut rng)
            };
            let ray = Ray::new_simple(origin, direction);
            let interval = Interval::new(0.001, f32::INFINITY);

            let linear = list.hit(&ray, interval, &mut rng);
            let fast = bvh.hit(&ray, interval, &mut rng);

            match (linear, fast) {
                (None, None) => {}
                (Some(a), Some(b)) => {
                    hits += 1;
                    assert_eq!(a.t, b.t);
                    assert_eq!(a.p, b.p);
                    assert_eq!(a.normal, b.normal);
                    assert_eq!(a.front_face, b.front_face);
                }
                (a, b) => panic!(
                    "hit mismatch for {:?}: linear {:?}, bvh {:?}",
                    ray,
                    a.map(|r| r.t),
                    b.map(|r| r.t)
                ),
            }
        }
        assert!(hits > 100, "only {} rays hit", hits);
    }
}
