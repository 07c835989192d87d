//! Image sink: tone mapping and raster output.
//!
//! Radiance is unbounded linear RGB; display output is 8-bit. The
//! mapping is the ACES filmic fit followed by gamma 1/2.2, matching the
//! look of the reference renders this engine is validated against.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use lumo_math::{Color, Vec3};
use thiserror::Error;

use crate::renderer::RadianceBuffer;

/// Errors surfaced while writing the output raster.
#[derive(Error, Debug)]
pub enum ImageWriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("unsupported output format '{0}' (expected .png or .ppm)")]
    UnsupportedFormat(String),
}

/// Map linear radiance to display color in [0, 1].
///
/// ACES filmic curve, then gamma correction.
pub fn tone_map(color: Color) -> Color {
    const A: f32 = 2.51;
    const B: f32 = 0.03;
    const C: f32 = 2.43;
    const D: f32 = 0.59;
    const E: f32 = 0.14;

    let x = color;
    let mapped = (x * (A * x + B)) / (x * (C * x + D) + E);

    const GAMMA: f32 = 1.0 / 2.2;
    let corrected = Vec3::new(
        mapped.x.powf(GAMMA),
        mapped.y.powf(GAMMA),
        mapped.z.powf(GAMMA),
    );

    corrected.clamp(Vec3::ZERO, Vec3::ONE)
}

/// Quantize a display-space channel to 8 bits, rounded.
#[inline]
fn to_channel(x: f32) -> u8 {
    (x * 255.0).round() as u8
}

/// Tone-map a finished buffer into packed 8-bit RGB rows.
pub fn tone_map_to_rgb8(buffer: &RadianceBuffer) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(buffer.pixels.len() * 3);
    for color in &buffer.pixels {
        let display = tone_map(*color);
        bytes.push(to_channel(display.x));
        bytes.push(to_channel(display.y));
        bytes.push(to_channel(display.z));
    }
    bytes
}

/// Tone-map and write the buffer to `path`, chosen by extension.
///
/// `.png` goes through the image crate; `.ppm` is written as binary P6.
pub fn save_image(buffer: &RadianceBuffer, path: impl AsRef<Path>) -> Result<(), ImageWriteError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let bytes = tone_map_to_rgb8(buffer);

    match extension.as_str() {
        "png" => {
            let img = image::RgbImage::from_raw(buffer.width, buffer.height, bytes)
                .expect("buffer dimensions match the byte count");
            img.save(path)?;
        }
        "ppm" => {
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            write!(writer, "P6\n{} {}\n255\n", buffer.width, buffer.height)?;
            writer.write_all(&bytes)?;
            writer.flush()?;
        }
        other => {
            return Err(ImageWriteError::UnsupportedFormat(other.to_string()));
        }
    }

    log::info!("wrote {}x{} image to {}", buffer.width, buffer.height, path.display());
    Ok(())
}
