//! Glint Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer over a closed set of primitives and materials:
//!
//! - **Geometry**: spheres (optionally moving), quads, triangles, constant
//!   density media, translate/rotate instances, lists and a BVH
//! - **Materials**: diffuse, metal, dielectric, isotropic and emissive
//! - **Textures**: solid, checker, Perlin noise and image-backed
//! - **Integrator**: stratified sampling, depth of field, motion blur
//! - **Execution**: a persistent worker pool filling one row at a time,
//!   handed to a [`RowSink`]

mod bvh;
mod camera;
mod hittable;
mod instance;
mod material;
mod medium;
mod output;
mod perlin;
mod primitive;
mod quad;
mod renderer;
pub mod sampling;
mod sphere;
mod texture;
mod thread_pool;
mod triangle;

pub use bvh::BvhNode;
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use instance::{Rotate, Translate};
pub use material::{
    reflect, refract, Color, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal,
    Scatter, ScatterResult,
};
pub use medium::ConstantMedium;
pub use output::{color_to_rgb8, ImageBuffer, PpmWriter, RowSink};
pub use perlin::Perlin;
pub use primitive::Primitive;
pub use quad::{cuboid, Quad};
pub use renderer::{
    finalize_color, linear_to_gamma, ray_color, render, render_image, render_pixel, RenderConfig,
};
pub use sphere::Sphere;
pub use texture::{Checker, ImageTexture, Noise, Texture};
pub use thread_pool::ThreadPool;
pub use triangle::Triangle;

/// Re-export Vec3 and common math types from glint_math
pub use glint_math::{Aabb, Interval, Ray, Vec3};
