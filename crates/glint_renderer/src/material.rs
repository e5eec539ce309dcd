//! Materials describing how light interacts with surfaces.

use glint_math::{Ray, Vec3};
use rand::RngCore;

use crate::{
    hittable::HitRecord,
    sampling::{gen_f32, near_zero, random_in_unit_sphere, random_unit_vector},
    Texture,
};

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Outcome of a successful scatter.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Fraction of the incoming radiance carried by the scattered ray
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Capability shared by every material.
pub trait Scatter {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult>;

    /// Get emitted light from this material.
    ///
    /// Most materials return black (no emission).
    fn emitted(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        Color::ZERO
    }
}

/// The closed set of materials.
pub enum Material {
    Lambertian(Lambertian),
    Metal(Metal),
    Dielectric(Dielectric),
    Isotropic(Isotropic),
    DiffuseLight(DiffuseLight),
}

impl Scatter for Material {
    #[inline]
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match self {
            Material::Lambertian(m) => m.scatter(ray_in, rec, rng),
            Material::Metal(m) => m.scatter(ray_in, rec, rng),
            Material::Dielectric(m) => m.scatter(ray_in, rec, rng),
            Material::Isotropic(m) => m.scatter(ray_in, rec, rng),
            Material::DiffuseLight(m) => m.scatter(ray_in, rec, rng),
        }
    }

    #[inline]
    fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        match self {
            Material::DiffuseLight(m) => m.emitted(u, v, p),
            _ => Color::ZERO,
        }
    }
}

/// Lambertian (diffuse) material.
pub struct Lambertian {
    albedo: Texture,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self::from_texture(Texture::Solid(albedo))
    }

    pub fn from_texture(albedo: Texture) -> Self {
        Self { albedo }
    }
}

impl Scatter for Lambertian {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if near_zero(scatter_direction) {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, scatter_direction, ray_in.time()),
        })
    }
}

/// Metal (specular) material.
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Scatter for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let scattered_dir = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Only scatter if the reflected ray is in the same hemisphere as the normal
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, scattered_dir, ray_in.time()),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance
    pub fn reflectance(cosine: f32, ratio: f32) -> f32 {
        let r0 = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Scatter for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.ior
        } else {
            self.ior
        };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction =
            if cannot_refract || Self::reflectance(cos_theta, refraction_ratio) > gen_f32(rng) {
                reflect(unit_direction, rec.normal)
            } else {
                refract(unit_direction, rec.normal, refraction_ratio)
            };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

/// Phase function of a uniform participating medium.
pub struct Isotropic {
    albedo: Texture,
}

impl Isotropic {
    pub fn new(albedo: Color) -> Self {
        Self::from_texture(Texture::Solid(albedo))
    }

    pub fn from_texture(albedo: Texture) -> Self {
        Self { albedo }
    }
}

impl Scatter for Isotropic {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        Some(ScatterResult {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, random_unit_vector(rng), ray_in.time()),
        })
    }
}

/// Diffuse light emitter.
pub struct DiffuseLight {
    emit: Texture,
}

impl DiffuseLight {
    /// Create a new diffuse light with the given emission color.
    ///
    /// Components above 1 make the light brighter than white.
    pub fn new(emit: Color) -> Self {
        Self::from_texture(Texture::Solid(emit))
    }

    pub fn from_texture(emit: Texture) -> Self {
        Self { emit }
    }
}

impl Scatter for DiffuseLight {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        // Lights don't scatter rays
        None
    }

    fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        self.emit.value(u, v, p)
    }
}

macro_rules! impl_from_material {
    ($($ty:ident),*) => {
        $(
            impl From<$ty> for Material {
                fn from(value: $ty) -> Self {
                    Material::$ty(value)
                }
            }
        )*
    };
}

impl_from_material!(Lambertian, Metal, Dielectric, Isotropic, DiffuseLight);

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with normal `n`.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(material: &Material, normal: Vec3, front_face: bool) -> HitRecord<'_> {
        HitRecord {
            p: Vec3::ZERO,
            normal,
            material,
            t: 1.0,
            u: 0.0,
            v: 0.0,
            front_face,
        }
    }

    #[test]
    fn test_lambertian_stays_in_hemisphere() {
        let mut rng = StdRng::seed_from_u64(42);
        let material: Material = Lambertian::new(Color::splat(0.5)).into();
        let normal = Vec3::new(1.0, 2.0, -0.5).normalize();
        let rec = record(&material, normal, true);
        let ray_in = Ray::new_simple(Vec3::ONE, -normal);

        for _ in 0..10_000 {
            let result = material.scatter(&ray_in, &rec, &mut rng).unwrap();
            assert!(result.scattered.direction().dot(normal) >= -1e-5);
            assert_eq!(result.attenuation, Color::splat(0.5));
        }
    }

    #[test]
    fn test_metal_mirror_reflection() {
        let mut rng = StdRng::seed_from_u64(1);
        let material: Material = Metal::new(Color::new(0.8, 0.6, 0.2), 0.0).into();
        let rec = record(&material, Vec3::Y, true);
        let ray_in = Ray::new_simple(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));

        let result = material.scatter(&ray_in, &rec, &mut rng).unwrap();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((result.scattered.direction() - expected).length() < 1e-6);
        assert_eq!(result.attenuation, Color::new(0.8, 0.6, 0.2));
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        assert_eq!(Metal::new(Color::ONE, 3.0).fuzz, 1.0);
        assert_eq!(Metal::new(Color::ONE, -1.0).fuzz, 0.0);
    }

    #[test]
    fn test_metal_absorbs_grazing_fuzz_below_surface() {
        let mut rng = StdRng::seed_from_u64(8);
        let material: Material = Metal::new(Color::ONE, 1.0).into();
        let rec = record(&material, Vec3::Y, true);
        // Nearly tangent incoming ray: fuzz pushes many reflections under the surface
        let ray_in = Ray::new_simple(Vec3::ZERO, Vec3::new(1.0, -0.01, 0.0));

        let mut absorbed = 0;
        for _ in 0..1000 {
            match material.scatter(&ray_in, &rec, &mut rng) {
                Some(result) => assert!(result.scattered.direction().dot(Vec3::Y) > 0.0),
                None => absorbed += 1,
            }
        }
        assert!(absorbed > 0);
    }

    #[test]
    fn test_reflectance_bounds() {
        for ci in 0..=100 {
            let cosine = ci as f32 / 100.0;
            for ratio in [1.0 / 2.4, 1.0 / 1.5, 1.0, 1.33, 1.5, 2.4] {
                let r = Dielectric::reflectance(cosine, ratio);
                assert!((0.0..=1.0).contains(&r), "cos {} ratio {} -> {}", cosine, ratio, r);
            }
        }
    }

    #[test]
    fn test_reflectance_at_normal_incidence() {
        for ratio in [1.0_f32 / 1.5, 1.5, 2.4] {
            let fresnel = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
            assert!((Dielectric::reflectance(1.0, ratio) - fresnel).abs() < 1e-7);
        }
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let mut rng = StdRng::seed_from_u64(2);
        let material: Material = Dielectric::new(1.5).into();
        // Exiting glass at a steep angle: 1.5 * sin(60°) > 1
        let rec = record(&material, Vec3::Y, false);
        let direction = Vec3::new(60f32.to_radians().sin(), -60f32.to_radians().cos(), 0.0);
        let ray_in = Ray::new_simple(Vec3::ZERO, direction);

        for _ in 0..100 {
            let result = material.scatter(&ray_in, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::ONE);
            assert!(result.scattered.direction().y > 0.0);
        }
    }

    #[test]
    fn test_refract_straight_through_at_normal_incidence() {
        let out = refract(-Vec3::Y, Vec3::Y, 1.0 / 1.5);
        assert!((out - -Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_isotropic_scatters_unit_directions() {
        let mut rng = StdRng::seed_from_u64(4);
        let material: Material = Isotropic::new(Color::splat(0.3)).into();
        let rec = record(&material, Vec3::X, true);
        let ray_in = Ray::new(Vec3::ZERO, Vec3::Z, 0.25);

        for _ in 0..100 {
            let result = material.scatter(&ray_in, &rec, &mut rng).unwrap();
            assert!((result.scattered.direction().length() - 1.0).abs() < 1e-5);
            assert_eq!(result.scattered.time(), 0.25);
            assert_eq!(result.attenuation, Color::splat(0.3));
        }
    }

    #[test]
    fn test_diffuse_light_emits_and_absorbs() {
        let mut rng = StdRng::seed_from_u64(0);
        let material: Material = DiffuseLight::new(Color::splat(4.0)).into();
        let rec = record(&material, Vec3::Y, true);
        let ray_in = Ray::new_simple(Vec3::Y, -Vec3::Y);

        assert!(material.scatter(&ray_in, &rec, &mut rng).is_none());
        assert_eq!(material.emitted(0.0, 0.0, Vec3::ZERO), Color::splat(4.0));

        let diffuse: Material = Lambertian::new(Color::ONE).into();
        assert_eq!(diffuse.emitted(0.0, 0.0, Vec3::ZERO), Color::ZERO);
    }
}
