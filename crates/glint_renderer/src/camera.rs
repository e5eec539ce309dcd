//! Camera for ray generation.

use glint_core::CameraSettings;
use glint_math::{Ray, Vec3};
use rand::RngCore;

use crate::{
    sampling::{gen_f32, random_in_unit_disk},
    Color,
};

/// Camera for generating rays into the scene.
///
/// Builder setters configure it; [`Camera::initialize`] derives the pixel
/// grid and lens geometry, after which it is read-only.
#[derive(Clone, Debug)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32,          // Vertical field of view in degrees
    defocus_angle: f32, // Variation angle of rays through each pixel
    focus_dist: f32,    // Distance from camera to plane of perfect focus

    // Background color
    pub background: Color,

    // Cached computed values (set by initialize())
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
    sqrt_spp: u32,
    recip_sqrt_spp: f32,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 100,
            image_height: 100,
            samples_per_pixel: 10,
            max_depth: 10,
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            background: Color::ZERO,
            // Cached values (initialized to defaults)
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
            sqrt_spp: 1,
            recip_sqrt_spp: 1.0,
        }
    }

    /// Camera configured from plain settings.
    pub fn from_settings(settings: &CameraSettings) -> Self {
        Self::new()
            .with_resolution(settings.image_width, settings.image_height())
            .with_quality(settings.samples_per_pixel, settings.max_depth)
            .with_position(settings.look_from, settings.look_at, settings.vup)
            .with_lens(settings.vfov, settings.defocus_angle, settings.focus_dist)
            .with_background(settings.background)
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height.max(1);
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Set background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Initialize the camera (must be called before generating rays).
    pub fn initialize(&mut self) {
        self.image_height = self.image_height.max(1);
        self.sqrt_spp = ((self.samples_per_pixel as f32).sqrt() as u32).max(1);
        self.recip_sqrt_spp = 1.0 / self.sqrt_spp as f32;
        self.center = self.look_from;

        // Calculate viewport dimensions
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width = viewport_height * (self.image_width as f32 / self.image_height as f32);

        // Calculate camera basis vectors
        self.w = (self.look_from - self.look_at).normalize_or_zero();
        self.u = self.vup.cross(self.w).normalize_or_zero();
        self.v = self.w.cross(self.u);

        // Calculate viewport vectors
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        // Pixel spacing divides the viewport by the pixel count; samples are
        // taken around pixel centers
        self.pixel_delta_u = viewport_u / self.image_width.max(1) as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        // Calculate upper left pixel location
        let viewport_upper_left =
            self.center - self.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;

        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        // Calculate defocus disk basis vectors
        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;
    }

    /// Generate a ray for pixel (i, j) through stratum (s_i, s_j) of the
    /// pixel's `sqrt_spp x sqrt_spp` sample grid.
    pub fn get_ray(&self, i: u32, j: u32, s_i: u32, s_j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = self.sample_square_stratified(s_i, s_j, rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        let ray_direction = pixel_sample - ray_origin;
        let ray_time = gen_f32(rng);

        Ray::new(ray_origin, ray_direction, ray_time)
    }

    /// Random point in the (s_i, s_j) cell of the unit square centered on the origin.
    fn sample_square_stratified(&self, s_i: u32, s_j: u32, rng: &mut dyn RngCore) -> Vec3 {
        let px = ((s_i as f32 + gen_f32(rng)) * self.recip_sqrt_spp) - 0.5;
        let py = ((s_j as f32 + gen_f32(rng)) * self.recip_sqrt_spp) - 0.5;
        Vec3::new(px, py, 0.0)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    /// Side of the stratified sample grid.
    pub fn sqrt_spp(&self) -> u32 {
        self.sqrt_spp
    }

    /// Samples actually taken per pixel, `sqrt_spp²`.
    pub fn effective_samples(&self) -> u32 {
        self.sqrt_spp * self.sqrt_spp
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
