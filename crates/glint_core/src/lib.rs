//! Glint Core - configuration and texture image plumbing.
//!
//! This crate provides:
//!
//! - **Configuration**: `CameraSettings`, `RenderSettings` and JSON-driven overrides
//! - **Texture images**: decoding image files into RGB8 lookups with a
//!   visible fallback for missing data

pub mod config;
pub mod image_data;

// Re-export commonly used types
pub use config::{CameraSettings, ConfigError, RenderSettings, SettingsOverrides};
pub use image_data::{ImageData, TextureError, TextureResult};
