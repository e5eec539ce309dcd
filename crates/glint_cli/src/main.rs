//! Glint - command-line front end for the path tracer.

mod scenes;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use glint_core::{RenderSettings, SettingsOverrides};
use glint_renderer::{render, render_image, Camera, PpmWriter, RenderConfig};
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::SeedableRng;

use scenes::SceneName;

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser)]
#[command(name = "glint", version, about = "Offline Monte Carlo path tracer")]
struct Args {
    /// Scene preset to render
    #[arg(long, value_enum, default_value_t = SceneName::BouncingSpheres)]
    scene: SceneName,

    /// JSON file overriding camera and render settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Samples per pixel (rounded down to a square number)
    #[arg(long)]
    samples: Option<u32>,

    /// Maximum bounces per path
    #[arg(long)]
    depth: Option<u32>,

    /// Seed for scene placement and sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads, 0 = one per hardware thread
    #[arg(long)]
    threads: Option<usize>,

    /// Output image, .ppm or .png
    #[arg(short, long, default_value = "image.ppm")]
    output: PathBuf,

    /// Logging level; RUST_LOG applies when not given
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,
}

impl Args {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            image_width: self.width,
            samples_per_pixel: self.samples,
            max_depth: self.depth,
            seed: self.seed,
            threads: self.threads,
            ..Default::default()
        }
    }
}

enum OutputFormat {
    Ppm,
    Png,
}

fn output_format(path: &Path) -> Result<OutputFormat> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("ppm") => Ok(OutputFormat::Ppm),
        Some("png") => Ok(OutputFormat::Png),
        _ => bail!(
            "Unsupported output file {}: expected .ppm or .png",
            path.display()
        ),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = args.log_level {
        logger.filter_level(level.into());
    }
    logger.init();

    let format = output_format(&args.output)?;

    // File first, then flags
    let file_overrides = match &args.config {
        Some(path) => SettingsOverrides::from_json_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => SettingsOverrides::default(),
    };
    let overrides = file_overrides.merge(args.overrides());

    let scene_seed = overrides.seed.unwrap_or_default();
    let scene = scenes::build(args.scene, &mut StdRng::seed_from_u64(scene_seed));
    log::info!("Built scene {:?}", args.scene);

    let mut settings = RenderSettings {
        camera: scene.camera,
        ..Default::default()
    };
    overrides.apply(&mut settings);
    settings.validate().context("Invalid render settings")?;

    let camera = Camera::from_settings(&settings.camera);
    let config = RenderConfig::from_settings(&settings);
    let world = Arc::clone(&scene.world);

    match format {
        OutputFormat::Ppm => {
            let file = File::create(&args.output)
                .with_context(|| format!("Failed to create {}", args.output.display()))?;
            let mut writer = PpmWriter::new(BufWriter::new(file));
            render(&camera, world, &config, &mut writer).context("Render failed")?;
        }
        OutputFormat::Png => {
            let rendered = render_image(&camera, world, &config).context("Render failed")?;
            let buffer = image::RgbImage::from_raw(
                rendered.width,
                rendered.height,
                rendered.to_rgb_bytes(),
            )
            .context("Rendered pixel count does not match image size")?;
            buffer
                .save(&args.output)
                .with_context(|| format!("Failed to write {}", args.output.display()))?;
        }
    }

    log::info!("Wrote {}", args.output.display());
    Ok(())
}
