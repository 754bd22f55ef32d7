//! Netpbm encoding
//!
//! Flattens the full layer stack row-major through the compositor and
//! serializes the result. One row buffer is reused across the image; a
//! short write surfaces as an I/O error and leaves the partial output
//! as-is, with no truncation or rollback.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::codec::{sample_buffer, PnmFormat};
use crate::error::Result;
use crate::raster::{luminance, Image};

/// Grayscale values below this encode as a black (set) PBM bit
const BITMAP_THRESHOLD: u8 = 128;

/// Encode a flattened image to a Netpbm file.
///
/// Convenience wrapper around [`encode`] with a buffered file writer.
pub fn encode_file(path: &Path, image: &Image, format: PnmFormat) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    encode(&mut writer, image, format)?;
    writer.flush()?;
    Ok(())
}

/// Encode a flattened image to a Netpbm stream.
///
/// Every pixel is composited fresh from the layer stack; the stack itself
/// is not modified.
pub fn encode<W: Write>(mut writer: W, image: &Image, format: PnmFormat) -> Result<()> {
    debug!(
        "encoding {}x{} image ({} layers) as {}",
        image.width(),
        image.height(),
        image.layer_count(),
        format
    );
    match format {
        PnmFormat::Bitmap => encode_bitmap(&mut writer, image),
        PnmFormat::Graymap => encode_graymap(&mut writer, image),
        PnmFormat::Pixmap => encode_pixmap(&mut writer, image),
    }
}

/// PPM (P6): RGB triplets, no padding
fn encode_pixmap<W: Write>(writer: &mut W, image: &Image) -> Result<()> {
    write!(writer, "P6\n{} {}\n255\n", image.width(), image.height())?;

    let width = image.width() as usize;
    let mut row = sample_buffer(width * 3, "PPM row buffer")?;

    for y in 0..image.height() as usize {
        for x in 0..width {
            let color = image.flatten_pixel(y * width + x);
            let base = x * 3;
            row[base] = color.r();
            row[base + 1] = color.g();
            row[base + 2] = color.b();
        }
        writer.write_all(&row)?;
    }
    Ok(())
}

/// PGM (P5): one luminance byte per pixel
fn encode_graymap<W: Write>(writer: &mut W, image: &Image) -> Result<()> {
    write!(writer, "P5\n{} {}\n255\n", image.width(), image.height())?;

    let width = image.width() as usize;
    let mut row = sample_buffer(width, "PGM row buffer")?;

    for y in 0..image.height() as usize {
        for (x, byte) in row.iter_mut().enumerate() {
            *byte = luminance(image.flatten_pixel(y * width + x));
        }
        writer.write_all(&row)?;
    }
    Ok(())
}

/// PBM (P4): packed bits, MSB first, rows padded to a byte boundary.
/// No max-value line. Bit 1 is black; pad bits stay 0.
fn encode_bitmap<W: Write>(writer: &mut W, image: &Image) -> Result<()> {
    write!(writer, "P4\n{} {}\n", image.width(), image.height())?;

    let width = image.width() as usize;
    let row_bytes = width.div_ceil(8);
    let mut row = sample_buffer(row_bytes, "PBM row buffer")?;

    for y in 0..image.height() as usize {
        row.fill(0);
        for x in 0..width {
            let gray = luminance(image.flatten_pixel(y * width + x));
            if gray < BITMAP_THRESHOLD {
                row[x / 8] |= 1 << (7 - (x % 8));
            }
        }
        writer.write_all(&row)?;
    }
    Ok(())
}
