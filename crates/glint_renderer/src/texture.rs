//! Surface color lookups.

use std::sync::Arc;

use glint_core::ImageData;
use glint_math::{Interval, Vec3};

use crate::{Color, Perlin};

/// Octaves summed by the marble-like noise texture.
const TURBULENCE_DEPTH: usize = 7;

/// Maps surface coordinates and hit point to a color.
pub enum Texture {
    Solid(Color),
    Checker(Checker),
    Noise(Noise),
    Image(ImageTexture),
}

impl Texture {
    pub fn solid(color: Color) -> Self {
        Texture::Solid(color)
    }

    /// A 3D checkerboard alternating two solid colors every `scale` units.
    pub fn checker(scale: f32, even: Color, odd: Color) -> Self {
        Texture::Checker(Checker::new(
            scale,
            Arc::new(Texture::Solid(even)),
            Arc::new(Texture::Solid(odd)),
        ))
    }

    pub fn noise(perlin: Perlin, scale: f32) -> Self {
        Texture::Noise(Noise { perlin, scale })
    }

    pub fn image(image: ImageData) -> Self {
        Texture::Image(ImageTexture { image })
    }

    pub fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        match self {
            Texture::Solid(color) => *color,
            Texture::Checker(checker) => checker.value(u, v, p),
            Texture::Noise(noise) => noise.value(p),
            Texture::Image(image) => image.value(u, v),
        }
    }
}

impl From<Color> for Texture {
    fn from(color: Color) -> Self {
        Texture::Solid(color)
    }
}

/// Spatial checkerboard choosing between two sub-textures.
pub struct Checker {
    inv_scale: f32,
    even: Arc<Texture>,
    odd: Arc<Texture>,
}

impl Checker {
    pub fn new(scale: f32, even: Arc<Texture>, odd: Arc<Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let cell = (self.inv_scale * p).floor();
        let sum = cell.x as i64 + cell.y as i64 + cell.z as i64;

        if sum % 2 == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Marble-like grey pattern from phase-shifted turbulence.
pub struct Noise {
    perlin: Perlin,
    scale: f32,
}

impl Noise {
    fn value(&self, p: Vec3) -> Color {
        let phase = self.scale * p.z + 10.0 * self.perlin.turbulence(p, TURBULENCE_DEPTH);
        Color::splat(0.5 * (1.0 + phase.sin()))
    }
}

/// Texture backed by decoded image data.
pub struct ImageTexture {
    image: ImageData,
}

impl ImageTexture {
    fn value(&self, u: f32, v: f32) -> Color {
        // Image rows run top to bottom, v runs bottom to top
        let unit = Interval::new(0.0, 1.0);
        let u = unit.clamp(u);
        let v = 1.0 - unit.clamp(v);

        let i = (u * self.image.width() as f32) as i32;
        let j = (v * self.image.height() as f32) as i32;
        let [r, g, b] = self.image.pixel(i, j);

        Color::new(r as f32, g as f32, b as f32) / 255.0
    }
}
