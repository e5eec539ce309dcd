use crate::{Interval, Ray, Vec3};

/// Minimum thickness of any axis, so planar shapes stay hittable by the slab test.
const MIN_EXTENT: f32 = 0.0001;

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create an AABB from two corner points, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self::new(
            Interval::new(a.x.min(b.x), a.x.max(b.x)),
            Interval::new(a.y.min(b.y), a.y.max(b.y)),
            Interval::new(a.z.min(b.z), a.z.max(b.z)),
        )
    }

    /// Create the smallest AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Slab method. A zero direction component yields an infinite reciprocal;
    /// the resulting `±inf` (or NaN for an origin exactly on a slab plane)
    /// leaves the running interval untouched through `f32::max`/`f32::min`.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        let origin = r.origin.to_array();
        let direction = r.direction.to_array();

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let adinv = 1.0 / direction[axis];

            let mut t0 = (slab.min - origin[axis]) * adinv;
            let mut t1 = (slab.max - origin[axis]) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }

        true
    }

    /// Pad intervals to avoid zero-width AABBs (degenerate cases).
    fn pad_to_minimums(&mut self) {
        if self.x.size() < MIN_EXTENT {
            self.x = self.x.expand(MIN_EXTENT);
        }
        if self.y.size() < MIN_EXTENT {
            self.y = self.y.expand(MIN_EXTENT);
        }
        if self.z.size() < MIN_EXTENT {
            self.z = self.z.expand(MIN_EXTENT);
        }
    }

    /// Translate (move) the AABB by an offset vector.
    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb::new(
            self.x.add_scalar(offset.x),
            self.y.add_scalar(offset.y),
            self.z.add_scalar(offset.z),
        )
    }

    pub fn min_corner(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    pub fn max_corner(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub const UNIVERSE: Aabb = Aabb {
        x: Interval::UNIVERSE,
        y: Interval::UNIVERSE,
        z: Interval::UNIVERSE,
    };
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    /// Reference implementation: intersect the three per-axis parameter
    /// intervals and report whether anything is left.
    fn per_axis_overlap(aabb: &Aabb, r: &Ray, ray_t: Interval) -> bool {
        let mut window = ray_t;
        for axis in 0..3 {
            let slab = aabb.axis_interval(axis);
            let o = r.origin.to_array()[axis];
            let d = r.direction.to_array()[axis];
            let (lo, hi) = if d == 0.0 {
                if slab.contains(o) {
                    (f32::NEG_INFINITY, f32::INFINITY)
                } else {
                    return false;
                }
            } else {
                let a = (slab.min - o) / d;
                let b = (slab.max - o) / d;
                (a.min(b), a.max(b))
            };
            window = Interval::new(window.min.max(lo), window.max.min(hi));
        }
        window.max > window.min
    }

    #[test]
    fn test_aabb_from_points_any_order() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 10.0), Vec3::new(0.0, 10.0, 0.0));

        assert_eq!(aabb.x, Interval::new(0.0, 10.0));
        assert_eq!(aabb.y, Interval::new(0.0, 10.0));
        assert_eq!(aabb.z, Interval::new(0.0, 10.0));
    }

    #[test]
    fn test_aabb_pads_planar_boxes() {
        let flat = Aabb::from_points(Vec3::new(0.0, 0.0, 2.0), Vec3::new(1.0, 1.0, 2.0));
        assert!(flat.z.size() >= MIN_EXTENT);
        assert!(flat.z.surrounds(2.0));

        // A ray perpendicular to the plane still hits the padded box
        let ray = Ray::new_simple(Vec3::new(0.5, 0.5, 0.0), Vec3::Z);
        assert!(flat.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_aabb_surrounding_is_smallest_enclosing() {
        let box1 = Aabb::from_points(Vec3::ZERO, Vec3::new(5.0, 5.0, 5.0));
        let box2 = Aabb::from_points(Vec3::new(3.0, -3.0, 3.0), Vec3::new(10.0, 1.0, 10.0));
        let surrounding = Aabb::surrounding(&box1, &box2);

        assert_eq!(surrounding.x, Interval::new(0.0, 10.0));
        assert_eq!(surrounding.y, Interval::new(-3.0, 5.0));
        assert_eq!(surrounding.z, Interval::new(0.0, 10.0));
        assert_eq!(Aabb::surrounding(&Aabb::EMPTY, &box1), box1);
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = unit_box();

        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Pointing away
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Parallel to the box, outside the x slab
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Interval ends before the box starts
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 3.0)));
    }

    #[test]
    fn test_aabb_hit_origin_on_slab_plane() {
        // Zero x direction with origin exactly on the x.max plane: 0 * inf = NaN
        let aabb = unit_box();
        let ray = Ray::new_simple(Vec3::new(1.0, 0.0, -5.0), Vec3::Z);
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_aabb_hit_matches_per_axis_overlap() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, -2.0, 0.5), Vec3::new(3.0, 1.0, 4.0));
        let ray_t = Interval::new(0.001, f32::INFINITY);

        // A deterministic spread of origins and directions, including axis-aligned ones
        let coords = [-6.0_f32, -1.5, 0.0, 0.7, 2.0, 5.5];
        let dirs = [-1.0_f32, -0.3, 0.0, 0.45, 1.0];
        for &ox in &coords {
            for &oy in &coords {
                for &dx in &dirs {
                    for &dy in &dirs {
                        let origin = Vec3::new(ox, oy, -3.0);
                        let direction = Vec3::new(dx, dy, 0.8);
                        let ray = Ray::new_simple(origin, direction);
                        assert_eq!(
                            aabb.hit(&ray, ray_t),
                            per_axis_overlap(&aabb, &ray, ray_t),
                            "origin={origin:?} direction={direction:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_aabb_translate() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0));
        let translated = aabb.translate(Vec3::new(5.0, 0.0, 0.0));

        assert_eq!(translated.x, Interval::new(5.0, 6.0));
        assert_eq!(translated.y, Interval::new(0.0, 1.0));
    }
}
