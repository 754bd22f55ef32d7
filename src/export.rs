//! Raw array export
//!
//! Flattens the full layer stack into one of four in-memory encodings
//! without touching storage. Every export performs one full composite pass
//! over all pixels; nothing is cached between calls.

use log::debug;

use crate::error::{LaminaError, Result};
use crate::raster::{luminance, Image};

/// Grayscale values below this export as a set (black) bit in `Binary1`
const BINARY_THRESHOLD: u8 = 128;

/// Target encoding for a raw array export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayDataFormat {
    /// One packed 0xAARRGGBB value per pixel
    Rgba32,
    /// Three bytes per pixel: R, G, B
    Rgb24,
    /// One luminance byte per pixel
    Grayscale8,
    /// Packed bits over the whole buffer, MSB first; 1 = black
    Binary1,
}

/// An exported pixel buffer in one of the raw encodings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelArray {
    /// Packed 32-bit ARGB values, length `width * height`
    Rgba32(Vec<u32>),
    /// RGB byte triplets, length `width * height * 3`
    Rgb24(Vec<u8>),
    /// Luminance bytes, length `width * height`
    Grayscale8(Vec<u8>),
    /// Packed bits, length `ceil(width * height / 8)`
    Binary1(Vec<u8>),
}

impl PixelArray {
    /// Number of elements in the array, in the encoding's own unit
    /// (32-bit values for `Rgba32`, bytes otherwise)
    pub fn len(&self) -> usize {
        match self {
            PixelArray::Rgba32(values) => values.len(),
            PixelArray::Rgb24(bytes) => bytes.len(),
            PixelArray::Grayscale8(bytes) => bytes.len(),
            PixelArray::Binary1(bytes) => bytes.len(),
        }
    }

    /// Whether the array holds no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Flatten an image into a raw in-memory array.
///
/// # Errors
/// Returns `AllocationFailure` if the output buffer cannot be obtained;
/// a failed export never yields a partially filled array.
pub fn export_to_array(image: &Image, format: ArrayDataFormat) -> Result<PixelArray> {
    let pixel_count = image.width() as usize * image.height() as usize;
    debug!(
        "exporting {}x{} image ({} layers) as {:?}",
        image.width(),
        image.height(),
        image.layer_count(),
        format
    );

    match format {
        ArrayDataFormat::Rgba32 => {
            let mut values = try_buffer::<u32>(pixel_count)?;
            for index in 0..pixel_count {
                values.push(image.flatten_pixel(index).to_u32());
            }
            Ok(PixelArray::Rgba32(values))
        }
        ArrayDataFormat::Rgb24 => {
            let mut bytes = try_buffer::<u8>(pixel_count * 3)?;
            for index in 0..pixel_count {
                let color = image.flatten_pixel(index);
                bytes.push(color.r());
                bytes.push(color.g());
                bytes.push(color.b());
            }
            Ok(PixelArray::Rgb24(bytes))
        }
        ArrayDataFormat::Grayscale8 => {
            let mut bytes = try_buffer::<u8>(pixel_count)?;
            for index in 0..pixel_count {
                bytes.push(luminance(image.flatten_pixel(index)));
            }
            Ok(PixelArray::Grayscale8(bytes))
        }
        ArrayDataFormat::Binary1 => {
            let mut bytes = try_buffer::<u8>(pixel_count.div_ceil(8))?;
            bytes.resize(pixel_count.div_ceil(8), 0);
            for index in 0..pixel_count {
                let gray = luminance(image.flatten_pixel(index));
                if gray < BINARY_THRESHOLD {
                    bytes[index / 8] |= 1 << (7 - (index % 8));
                }
            }
            Ok(PixelArray::Binary1(bytes))
        }
    }
}

/// Reserve an output buffer, reporting failure instead of aborting
fn try_buffer<T>(len: usize) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| LaminaError::AllocationFailure {
            context: format!("export buffer of {} elements", len),
        })?;
    Ok(buf)
}
