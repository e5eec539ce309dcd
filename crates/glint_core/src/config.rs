//! Render configuration records.
//!
//! Plain values handed to the renderer before a render starts. Scene presets
//! provide a full [`RenderSettings`]; a JSON file and command-line flags can
//! then patch individual fields through [`SettingsOverrides`].

use std::path::Path;

use glint_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while reading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Largest accepted image width or height in pixels.
pub const MAX_IMAGE_DIMENSION: u32 = 16_384;

/// Camera and image parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Ratio of image width over height
    pub aspect_ratio: f32,
    /// Rendered image width in pixels
    pub image_width: u32,
    /// Requested samples per pixel (rounded down to a square grid)
    pub samples_per_pixel: u32,
    /// Maximum number of ray bounces
    pub max_depth: u32,
    /// Vertical field of view in degrees
    pub vfov: f32,
    pub look_from: Vec3,
    pub look_at: Vec3,
    /// Camera-relative "up" direction
    pub vup: Vec3,
    /// Variation angle of rays through each pixel, in degrees
    pub defocus_angle: f32,
    /// Distance from camera to plane of perfect focus
    pub focus_dist: f32,
    /// Radiance returned by rays that escape the scene
    pub background: Vec3,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 10,
            max_depth: 10,
            vfov: 90.0,
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            background: Vec3::ZERO,
        }
    }
}

impl CameraSettings {
    /// Image height derived from width and aspect ratio, at least 1.
    ///
    /// Only meaningful for settings that pass [`CameraSettings::validate`].
    pub fn image_height(&self) -> u32 {
        ((self.image_width as f32 / self.aspect_ratio) as u32).max(1)
    }

    /// Reject settings that cannot describe a finite image.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image_width == 0 || self.image_width > MAX_IMAGE_DIMENSION {
            return Err(ConfigError::Invalid {
                field: "image_width",
                reason: format!(
                    "{} is outside 1..={}",
                    self.image_width, MAX_IMAGE_DIMENSION
                ),
            });
        }

        if !self.aspect_ratio.is_finite() || self.aspect_ratio <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "aspect_ratio",
                reason: format!("{} is not a positive finite number", self.aspect_ratio),
            });
        }

        let height = self.image_width as f32 / self.aspect_ratio;
        if height > MAX_IMAGE_DIMENSION as f32 {
            return Err(ConfigError::Invalid {
                field: "aspect_ratio",
                reason: format!(
                    "{} gives an image height of {} for width {}, above {}",
                    self.aspect_ratio, height, self.image_width, MAX_IMAGE_DIMENSION
                ),
            });
        }

        Ok(())
    }
}

/// Everything a render invocation needs besides the scene itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub camera: CameraSettings,
    /// Seed for every random draw made while rendering
    pub seed: u64,
    /// Worker threads, 0 = one per hardware thread
    pub threads: usize,
}

impl RenderSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.camera.validate()
    }
}

/// Optional patches to [`RenderSettings`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsOverrides {
    pub aspect_ratio: Option<f32>,
    pub image_width: Option<u32>,
    pub samples_per_pixel: Option<u32>,
    pub max_depth: Option<u32>,
    pub vfov: Option<f32>,
    pub look_from: Option<Vec3>,
    pub look_at: Option<Vec3>,
    pub vup: Option<Vec3>,
    pub defocus_angle: Option<f32>,
    pub focus_dist: Option<f32>,
    pub background: Option<Vec3>,
    pub seed: Option<u64>,
    pub threads: Option<usize>,
}

impl SettingsOverrides {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Combine two patches; fields set in `other` win.
    pub fn merge(self, other: SettingsOverrides) -> SettingsOverrides {
        SettingsOverrides {
            aspect_ratio: other.aspect_ratio.or(self.aspect_ratio),
            image_width: other.image_width.or(self.image_width),
            samples_per_pixel: other.samples_per_pixel.or(self.samples_per_pixel),
            max_depth: other.max_depth.or(self.max_depth),
            vfov: other.vfov.or(self.vfov),
            look_from: other.look_from.or(self.look_from),
            look_at: other.look_at.or(self.look_at),
            vup: other.vup.or(self.vup),
            defocus_angle: other.defocus_angle.or(self.defocus_angle),
            focus_dist: other.focus_dist.or(self.focus_dist),
            background: other.background.or(self.background),
            seed: other.seed.or(self.seed),
            threads: other.threads.or(self.threads),
        }
    }

    /// Overwrite the fields of `settings` that this patch sets.
    pub fn apply(&self, settings: &mut RenderSettings) {
        let camera = &mut settings.camera;
        set(&mut camera.aspect_ratio, self.aspect_ratio);
        set(&mut camera.image_width, self.image_width);
        set(&mut camera.samples_per_pixel, self.samples_per_pixel);
        set(&mut camera.max_depth, self.max_depth);
        set(&mut camera.vfov, self.vfov);
        set(&mut camera.look_from, self.look_from);
        set(&mut camera.look_at, self.look_at);
        set(&mut camera.vup, self.vup);
        set(&mut camera.defocus_angle, self.defocus_angle);
        set(&mut camera.focus_dist, self.focus_dist);
        set(&mut camera.background, self.background);
        set(&mut settings.seed, self.seed);
        set(&mut settings.threads, self.threads);
    }
}

fn set<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}
