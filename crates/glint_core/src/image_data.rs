//! Texture image loading.
//!
//! Decodes images from disk into tightly packed RGB8 data for the
//! image-backed texture. Missing images are not fatal: the caller gets an
//! empty image whose every lookup returns magenta.

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable naming an extra directory searched for texture images.
pub const IMAGES_DIR_VAR: &str = "GLINT_IMAGES";

/// Lookup result for an image without data.
pub const MAGENTA: [u8; 3] = [255, 0, 255];

const BYTES_PER_PIXEL: usize = 3;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Pixel buffer of {actual} bytes does not match {width}x{height} RGB8")]
    SizeMismatch {
        width: u32,
        height: u32,
        actual: usize,
    },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Decoded RGB8 image data, row-major, top row first.
#[derive(Clone, Debug, Default)]
pub struct ImageData {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl ImageData {
    /// An image with no data; every lookup returns [`MAGENTA`].
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap already decoded RGB8 bytes.
    pub fn from_rgb8(width: u32, height: u32, bytes: Vec<u8>) -> TextureResult<Self> {
        if bytes.len() != width as usize * height as usize * BYTES_PER_PIXEL {
            return Err(TextureError::SizeMismatch {
                width,
                height,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            width,
            height,
            bytes,
        })
    }

    /// Load and decode an image file.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let rgb = image::open(path.as_ref())?.to_rgb8();
        let (width, height) = rgb.dimensions();
        Self::from_rgb8(width, height, rgb.into_raw())
    }

    /// Hunt for an image in the likely locations.
    ///
    /// Tries `name` as given, then the `GLINT_IMAGES` directory, then
    /// `images/` up to two parent directories away. Falls back to an empty
    /// image so a render can still be produced.
    pub fn locate(name: &str) -> Self {
        for candidate in search_paths(name) {
            match Self::load(&candidate) {
                Ok(image) => {
                    log::debug!(
                        "Loaded texture image {} ({}x{})",
                        candidate.display(),
                        image.width,
                        image.height
                    );
                    return image;
                }
                Err(e) => log::trace!("Skipping {}: {}", candidate.display(), e),
            }
        }

        log::error!("Could not load image file '{}'", name);
        Self::empty()
    }

    /// Width in pixels, 0 when empty.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels, 0 when empty.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// RGB bytes at pixel (x, y), with coordinates clamped to the image.
    pub fn pixel(&self, x: i32, y: i32) -> [u8; 3] {
        if self.is_empty() {
            return MAGENTA;
        }

        let x = x.clamp(0, self.width as i32 - 1) as usize;
        let y = y.clamp(0, self.height as i32 - 1) as usize;
        let idx = (y * self.width as usize + x) * BYTES_PER_PIXEL;
        [self.bytes[idx], self.bytes[idx + 1], self.bytes[idx + 2]]
    }
}

fn search_paths(name: &str) -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(name)];
    if let Ok(dir) = env::var(IMAGES_DIR_VAR) {
        paths.push(Path::new(&dir).join(name));
    }
    for prefix in ["images", "../images", "../../images"] {
        paths.push(Path::new(prefix).join(name));
    }
    paths
}
