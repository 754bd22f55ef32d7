//! Netpbm Codec Module
//!
//! Binary Netpbm (PBM/PGM/PPM) support:
//! - Decoding a file or stream into a single layer
//! - Encoding a flattened image stack into any of the three formats
//!
//! Headers are ASCII with whitespace/comment tolerance; sample data is raw
//! binary. The formats are identified by their "P" + digit magic number.

mod decode;
mod encode;

use std::fmt;

use serde::Serialize;

use crate::error::{LaminaError, Result};

pub use decode::{decode, decode_file};
pub use encode::{encode, encode_file};

/// Comment character in Netpbm headers; comments run to end of line
/// and count as whitespace
pub(crate) const COMMENT_CHAR: u8 = b'#';

/// A Netpbm file format, identified by its magic digit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PnmFormat {
    /// PBM: 1 bit per pixel, MSB first, rows padded to a byte boundary
    Bitmap,
    /// PGM: 1 grayscale byte per pixel
    Graymap,
    /// PPM: 3 bytes per pixel, R then G then B
    Pixmap,
}

impl PnmFormat {
    /// The digit following "P" in the format's magic number
    pub fn magic_digit(self) -> u8 {
        match self {
            PnmFormat::Bitmap => 4,
            PnmFormat::Graymap => 5,
            PnmFormat::Pixmap => 6,
        }
    }

    /// Map a magic digit back to its format
    pub fn from_magic_digit(digit: u8) -> Option<Self> {
        match digit {
            4 => Some(PnmFormat::Bitmap),
            5 => Some(PnmFormat::Graymap),
            6 => Some(PnmFormat::Pixmap),
            _ => None,
        }
    }

    /// The two-byte magic string, e.g. "P6"
    pub fn magic(self) -> &'static str {
        match self {
            PnmFormat::Bitmap => "P4",
            PnmFormat::Graymap => "P5",
            PnmFormat::Pixmap => "P6",
        }
    }

    /// Conventional file extension for the format
    pub fn extension(self) -> &'static str {
        match self {
            PnmFormat::Bitmap => "pbm",
            PnmFormat::Graymap => "pgm",
            PnmFormat::Pixmap => "ppm",
        }
    }

    /// Guess the format from a file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pbm" => Some(PnmFormat::Bitmap),
            "pgm" => Some(PnmFormat::Graymap),
            "ppm" => Some(PnmFormat::Pixmap),
            _ => None,
        }
    }
}

impl fmt::Display for PnmFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PnmFormat::Bitmap => "PBM",
            PnmFormat::Graymap => "PGM",
            PnmFormat::Pixmap => "PPM",
        };
        write!(f, "{} ({})", name, self.magic())
    }
}

/// Allocate a zeroed byte buffer, reporting failure instead of aborting
pub(crate) fn sample_buffer(len: usize, context: &str) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| LaminaError::AllocationFailure {
            context: context.to_string(),
        })?;
    buf.resize(len, 0);
    Ok(buf)
}
