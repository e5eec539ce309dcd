//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Depth-bounded path continuation as an explicit loop
//! - Stratified, jittered sampling per pixel
//! - Row-by-row distribution of pixels over a worker pool
//! - Gamma correction

use std::io;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use glint_core::RenderSettings;
use glint_math::{Interval, Ray};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::{
    output::{ImageBuffer, RowSink},
    sampling::pixel_seed,
    Camera, Color, Hittable, Primitive, Scatter, ThreadPool,
};

/// Ray parameters below this are treated as self-intersection.
const T_MIN: f32 = 0.001;

/// Render configuration beyond the camera.
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Seed for every random draw made while rendering
    pub seed: u64,
    /// Worker threads, 0 = one per hardware thread
    pub threads: usize,
}

impl RenderConfig {
    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self {
            seed: settings.seed,
            threads: settings.threads,
        }
    }
}

/// Compute the radiance carried back along a ray.
///
/// Follows the path for at most `depth` bounces, adding emission weighted
/// by the running product of attenuations. A path cut off by the depth
/// budget contributes nothing further; a ray escaping the scene picks up
/// `background`.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    background: Color,
    rng: &mut dyn RngCore,
) -> Color {
    let mut radiance = Color::ZERO;
    let mut throughput = Color::ONE;
    let mut ray = *ray;

    for _ in 0..depth {
        let Some(rec) = world.hit(&ray, Interval::new(T_MIN, f32::INFINITY), rng) else {
            return radiance + throughput * background;
        };

        // Get emission from material (for lights)
        radiance += throughput * rec.material.emitted(rec.u, rec.v, rec.p);

        match rec.material.scatter(&ray, &rec, rng) {
            Some(result) => {
                throughput *= result.attenuation;
                ray = result.scattered;
            }
            // Ray was absorbed
            None => return radiance,
        }
    }

    radiance
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Turn an averaged linear color into a display value in [0, 0.999].
pub fn finalize_color(color: Color) -> Color {
    let finalize = |c: f32| {
        // A NaN sample must not poison the pixel
        let c = if c.is_nan() { 0.0 } else { c };
        Interval::new(0.0, 0.999).clamp(linear_to_gamma(c))
    };
    Color::new(finalize(color.x), finalize(color.y), finalize(color.z))
}

/// Average linear radiance over the stratified samples of pixel (x, y).
///
/// `camera` must be initialized.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for s_j in 0..camera.sqrt_spp() {
        for s_i in 0..camera.sqrt_spp() {
            let ray = camera.get_ray(x, y, s_i, s_j, rng);
            pixel_color += ray_color(&ray, world, camera.max_depth, camera.background, rng);
        }
    }

    // Average the samples
    pixel_color / camera.effective_samples() as f32
}

/// Render `world` through `camera`, streaming finished rows into `sink`.
///
/// Rows go top to bottom. Within a row every pixel is an independent task
/// on the worker pool, with its own generator seeded from
/// `(config.seed, x, y)`, so the output does not depend on thread count.
pub fn render(
    camera: &Camera,
    world: Arc<Primitive>,
    config: &RenderConfig,
    sink: &mut dyn RowSink,
) -> io::Result<()> {
    let mut camera = camera.clone();
    camera.initialize();
    let camera = Arc::new(camera);

    let width = camera.image_width;
    let height = camera.image_height;
    let pool = ThreadPool::new(config.threads)?;

    log::info!(
        "Rendering {}x{} at {} spp, max depth {}, {} threads, world: {} {:?}",
        width,
        height,
        camera.effective_samples(),
        camera.max_depth,
        pool.worker_count(),
        world.kind(),
        world.bounding_box()
    );
    let start = Instant::now();

    sink.begin(width, height)?;

    for y in 0..height {
        let slots: Arc<[OnceLock<Color>]> = (0..width).map(|_| OnceLock::new()).collect();

        for x in 0..width {
            let camera = camera.clone();
            let world = world.clone();
            let slots = slots.clone();
            let seed = config.seed;

            pool.execute(move || {
                let mut rng = StdRng::seed_from_u64(pixel_seed(seed, x, y));
                let color = render_pixel(&camera, world.as_ref(), x, y, &mut rng);
                // Each slot has exactly one writer
                let _ = slots[x as usize].set(finalize_color(color));
            });
        }

        pool.wait();

        let row = slots
            .iter()
            .enumerate()
            .map(|(x, slot)| {
                slot.get().copied().ok_or_else(|| {
                    io::Error::other(format!("pixel ({}, {}) failed to render", x, y))
                })
            })
            .collect::<io::Result<Vec<Color>>>()?;

        sink.write_row(&row)?;
        log::debug!("Row {}/{} done", y + 1, height);
    }

    sink.finish()?;

    log::info!("Render finished in {:.2?}", start.elapsed());
    Ok(())
}

/// Render into an in-memory RGB8 image.
pub fn render_image(
    camera: &Camera,
    world: Arc<Primitive>,
    config: &RenderConfig,
) -> io::Result<ImageBuffer> {
    let mut image = ImageBuffer::new();
    render(camera, world, config, &mut image)?;
    Ok(image)
}
