//! Netpbm decoding
//!
//! Parses the ASCII header, then reads the raw binary samples into a new
//! [`Layer`]. The header grammar is tolerant: any run of whitespace and
//! `#`-to-end-of-line comments may precede or separate tokens. Exactly one
//! whitespace byte separates the last header token from the sample data.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use log::debug;

use crate::codec::{sample_buffer, PnmFormat, COMMENT_CHAR};
use crate::error::{LaminaError, Result};
use crate::raster::{Argb, Layer};

/// Decode a Netpbm file into a single layer.
///
/// Convenience wrapper around [`decode`] with a buffered file reader.
pub fn decode_file(path: &Path) -> Result<(Layer, PnmFormat)> {
    let file = File::open(path)?;
    decode(BufReader::new(file))
}

/// Decode a Netpbm stream into a single layer.
///
/// Returns the new layer, ownership transferred to the caller, together
/// with the detected format tag.
///
/// # Errors
/// - `MalformedHeader` on any header-token mismatch.
/// - `UnsupportedFormat` for an unknown magic digit, or a PGM/PPM max value
///   other than 255 (samples are never rescaled).
/// - `Io` if the sample data is shorter than the header promises.
pub fn decode<R: BufRead>(mut reader: R) -> Result<(Layer, PnmFormat)> {
    let format = parse_magic(&mut reader)?;
    let width = read_header_uint(&mut reader, "width")?;
    let height = read_header_uint(&mut reader, "height")?;

    // PBM carries no max-value token
    if format != PnmFormat::Bitmap {
        let max_value = read_header_uint(&mut reader, "max value")?;
        if max_value != 255 {
            return Err(LaminaError::UnsupportedFormat {
                format: format!("{} with max value {} (only 255)", format, max_value),
            });
        }
    }

    consume_sample_delimiter(&mut reader)?;
    debug!("parsed {} header: {}x{}", format, width, height);

    let mut layer = Layer::new(width, height)?;
    match format {
        PnmFormat::Bitmap => read_bitmap_samples(&mut reader, &mut layer)?,
        PnmFormat::Graymap => read_graymap_samples(&mut reader, &mut layer)?,
        PnmFormat::Pixmap => read_pixmap_samples(&mut reader, &mut layer)?,
    }

    Ok((layer, format))
}

/// Look at the next byte without consuming it; `None` at end of stream
fn peek_byte<R: BufRead>(reader: &mut R) -> Result<Option<u8>> {
    Ok(reader.fill_buf()?.first().copied())
}

/// Skip any run of whitespace and comments between header tokens
fn skip_whitespace_and_comments<R: BufRead>(reader: &mut R) -> Result<()> {
    loop {
        match peek_byte(reader)? {
            Some(c) if c.is_ascii_whitespace() => reader.consume(1),
            Some(COMMENT_CHAR) => {
                reader.consume(1);
                loop {
                    match peek_byte(reader)? {
                        Some(b'\n') => {
                            reader.consume(1);
                            break;
                        }
                        Some(_) => reader.consume(1),
                        None => break,
                    }
                }
            }
            _ => return Ok(()),
        }
    }
}

/// Parse the "P" + digit magic number and map it to a format
fn parse_magic<R: BufRead>(reader: &mut R) -> Result<PnmFormat> {
    skip_whitespace_and_comments(reader)?;

    match peek_byte(reader)? {
        Some(b'P') => reader.consume(1),
        Some(c) => {
            return Err(LaminaError::MalformedHeader {
                reason: format!("expected magic 'P', found byte 0x{:02x}", c),
            })
        }
        None => {
            return Err(LaminaError::MalformedHeader {
                reason: "empty stream, expected magic number".to_string(),
            })
        }
    }

    let digit = match peek_byte(reader)? {
        Some(c) if c.is_ascii_digit() => {
            reader.consume(1);
            c - b'0'
        }
        _ => {
            return Err(LaminaError::MalformedHeader {
                reason: "expected digit after magic 'P'".to_string(),
            })
        }
    };

    PnmFormat::from_magic_digit(digit).ok_or_else(|| LaminaError::UnsupportedFormat {
        format: format!("unknown magic number P{}", digit),
    })
}

/// Read one unsigned decimal header token
fn read_header_uint<R: BufRead>(reader: &mut R, what: &str) -> Result<u32> {
    skip_whitespace_and_comments(reader)?;

    let mut value: u64 = 0;
    let mut digits = 0usize;
    while let Some(c) = peek_byte(reader)? {
        if !c.is_ascii_digit() {
            break;
        }
        reader.consume(1);
        digits += 1;
        value = value * 10 + (c - b'0') as u64;
        if value > u32::MAX as u64 {
            return Err(LaminaError::MalformedHeader {
                reason: format!("{} is too large", what),
            });
        }
    }

    if digits == 0 {
        return Err(LaminaError::MalformedHeader {
            reason: format!("expected unsigned integer for {}", what),
        });
    }

    Ok(value as u32)
}

/// Consume the single whitespace byte separating the header from samples
fn consume_sample_delimiter<R: BufRead>(reader: &mut R) -> Result<()> {
    match peek_byte(reader)? {
        Some(c) if c.is_ascii_whitespace() => {
            reader.consume(1);
            Ok(())
        }
        Some(c) => Err(LaminaError::MalformedHeader {
            reason: format!("expected whitespace before samples, found byte 0x{:02x}", c),
        }),
        None => Err(LaminaError::MalformedHeader {
            reason: "missing sample delimiter".to_string(),
        }),
    }
}

/// PGM body: one gray byte per pixel, expanded to opaque ARGB
fn read_graymap_samples<R: Read>(reader: &mut R, layer: &mut Layer) -> Result<()> {
    let pixel_count = layer.pixels().len();
    let mut samples = sample_buffer(pixel_count, "PGM sample buffer")?;
    reader.read_exact(&mut samples)?;

    for (pixel, &gray) in layer.pixels_mut().iter_mut().zip(samples.iter()) {
        *pixel = Argb::opaque(gray, gray, gray);
    }
    Ok(())
}

/// PPM body: R, G, B byte triplets, expanded to opaque ARGB
fn read_pixmap_samples<R: Read>(reader: &mut R, layer: &mut Layer) -> Result<()> {
    let pixel_count = layer.pixels().len();
    let mut samples = sample_buffer(pixel_count * 3, "PPM sample buffer")?;
    reader.read_exact(&mut samples)?;

    for (pixel, rgb) in layer.pixels_mut().iter_mut().zip(samples.chunks_exact(3)) {
        *pixel = Argb::opaque(rgb[0], rgb[1], rgb[2]);
    }
    Ok(())
}

/// PBM body: packed bits, MSB first, each row padded to a byte boundary.
/// Bit 1 is black, bit 0 is white; both decode as fully opaque.
fn read_bitmap_samples<R: Read>(reader: &mut R, layer: &mut Layer) -> Result<()> {
    let width = layer.width() as usize;
    let height = layer.height() as usize;
    let row_bytes = width.div_ceil(8);

    let mut samples = sample_buffer(row_bytes * height, "PBM sample buffer")?;
    reader.read_exact(&mut samples)?;

    const BLACK: Argb = Argb::opaque(0, 0, 0);
    const WHITE: Argb = Argb::opaque(255, 255, 255);

    let pixels = layer.pixels_mut();
    for y in 0..height {
        let row = &samples[y * row_bytes..(y + 1) * row_bytes];
        for x in 0..width {
            let bit = (row[x / 8] >> (7 - (x % 8))) & 1;
            pixels[y * width + x] = if bit == 1 { BLACK } else { WHITE };
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn decode_bytes(bytes: &[u8]) -> Result<(Layer, PnmFormat)> {
        decode(Cursor::new(bytes.to_vec()))
    }

    #[test]
    fn test_decode_pgm() {
        let (layer, format) = decode_bytes(b"P5\n2 2\n255\n\x00\x40\x80\xff").unwrap();
        assert_eq!(format, PnmFormat::Graymap);
        assert_eq!(layer.width(), 2);
        assert_eq!(layer.height(), 2);
        assert_eq!(layer.pixel(0, 0), Some(Argb::opaque(0, 0, 0)));
        assert_eq!(layer.pixel(1, 0), Some(Argb::opaque(0x40, 0x40, 0x40)));
        assert_eq!(layer.pixel(0, 1), Some(Argb::opaque(0x80, 0x80, 0x80)));
        assert_eq!(layer.pixel(1, 1), Some(Argb::opaque(0xff, 0xff, 0xff)));
    }

    #[test]
    fn test_decode_ppm() {
        let (layer, format) =
            decode_bytes(b"P6\n2 1\n255\n\xff\x00\x00\x00\x00\xff").unwrap();
        assert_eq!(format, PnmFormat::Pixmap);
        assert_eq!(layer.pixel(0, 0), Some(Argb::opaque(255, 0, 0)));
        assert_eq!(layer.pixel(1, 0), Some(Argb::opaque(0, 0, 255)));
        // Decoded samples are always fully opaque
        assert_eq!(layer.pixel(0, 0).unwrap().a(), 255);
    }

    #[test]
    fn test_decode_pbm_msb_first_with_row_padding() {
        // 9 pixels wide: bit 0 of the row is the MSB of byte 0, pixel 8 is
        // the MSB of byte 1, the remaining 7 bits of byte 1 are padding.
        let (layer, format) = decode_bytes(b"P4\n9 2\n\x80\x80\x01\x00").unwrap();
        assert_eq!(format, PnmFormat::Bitmap);

        let black = Argb::opaque(0, 0, 0);
        let white = Argb::opaque(255, 255, 255);
        assert_eq!(layer.pixel(0, 0), Some(black));
        assert_eq!(layer.pixel(1, 0), Some(white));
        assert_eq!(layer.pixel(8, 0), Some(black));
        // Second row: only bit 7 of byte 0 set -> pixel x=7 black
        assert_eq!(layer.pixel(7, 1), Some(black));
        assert_eq!(layer.pixel(8, 1), Some(white));
    }

    #[test]
    fn test_header_comments_and_whitespace() {
        let data = b"# leading comment\nP5 # after magic\n  \t 3\n# width done\n1 \n255\t\x01\x02\x03";
        let (layer, format) = decode_bytes(data).unwrap();
        assert_eq!(format, PnmFormat::Graymap);
        assert_eq!(layer.width(), 3);
        assert_eq!(layer.height(), 1);
        assert_eq!(layer.pixel(2, 0), Some(Argb::opaque(3, 3, 3)));
    }

    #[test]
    fn test_unknown_magic_digit_is_unsupported() {
        let err = decode_bytes(b"P7\n1 1\n255\n\x00").unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
        assert!(err.to_string().contains("P7"));
    }

    #[test]
    fn test_bad_magic_letter() {
        let err = decode_bytes(b"Q5\n1 1\n255\n\x00").unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_HEADER");
    }

    #[test]
    fn test_missing_dimension() {
        let err = decode_bytes(b"P5\n3\nx").unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_HEADER");
        assert!(err.to_string().contains("height"));
    }

    #[test]
    fn test_max_value_other_than_255_rejected() {
        let err = decode_bytes(b"P5\n1 1\n16\n\x00").unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
        assert!(err.to_string().contains("16"));
    }

    #[test]
    fn test_truncated_samples_is_io_error() {
        let err = decode_bytes(b"P6\n2 2\n255\n\xff\x00").unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
    }

    #[test]
    fn test_empty_stream() {
        let err = decode_bytes(b"").unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_HEADER");
    }

    #[test]
    fn test_oversized_dimension_rejected() {
        let err = decode_bytes(b"P5\n99999999999 1\n255\n\x00").unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_HEADER");
    }
}
