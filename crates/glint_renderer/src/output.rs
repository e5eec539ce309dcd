//! Handoff of finished pixel rows to an image consumer.

use std::io::{self, Write};

use crate::Color;

/// Receives the rendered image one row at a time, top row first.
pub trait RowSink {
    /// Called once before the first row.
    fn begin(&mut self, width: u32, height: u32) -> io::Result<()>;

    /// One row of final colors, components in [0, 1).
    fn write_row(&mut self, row: &[Color]) -> io::Result<()>;

    /// Called once after the last row.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Quantize a final color to 8 bits per channel.
#[inline]
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let quantize = |c: f32| (256.0 * c.clamp(0.0, 0.999)) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Plain-text PPM (`P3`) encoder.
pub struct PpmWriter<W: Write> {
    out: W,
}

impl<W: Write> PpmWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RowSink for PpmWriter<W> {
    fn begin(&mut self, width: u32, height: u32) -> io::Result<()> {
        writeln!(self.out, "P3")?;
        writeln!(self.out, "{} {}", width, height)?;
        writeln!(self.out, "255")
    }

    fn write_row(&mut self, row: &[Color]) -> io::Result<()> {
        for &color in row {
            let [r, g, b] = color_to_rgb8(color);
            writeln!(self.out, "{} {} {}", r, g, b)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// In-memory RGB8 image, row-major, top row first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 3]>,
}

impl ImageBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pixel at column `x`, row `y`.
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Flattened `r, g, b, r, g, b, ...` bytes.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }
}

impl RowSink for ImageBuffer {
    fn begin(&mut self, width: u32, height: u32) -> io::Result<()> {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.reserve(width as usize * height as usize);
        Ok(())
    }

    fn write_row(&mut self, row: &[Color]) -> io::Result<()> {
        if row.len() != self.width as usize {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("row of {} pixels in a {} pixel wide image", row.len(), self.width),
            ));
        }
        self.pixels.extend(row.iter().map(|&c| color_to_rgb8(c)));
        Ok(())
    }
}
