//! Error handling for Lamina
//!
//! One error enum covers the whole crate; every fallible operation
//! reports success or failure explicitly and never retries on its own.

use thiserror::Error;

/// Result type alias for Lamina operations
pub type Result<T> = std::result::Result<T, LaminaError>;

/// Main error type for Lamina operations
#[derive(Error, Debug)]
pub enum LaminaError {
    // Resource Errors
    #[error("Allocation failure: {context}")]
    AllocationFailure { context: String },

    // Codec Errors
    #[error("Malformed header: {reason}")]
    MalformedHeader { reason: String },

    #[error("Unsupported format: {format}")]
    UnsupportedFormat { format: String },

    // Container Errors
    #[error(
        "Layer dimensions {layer_width}x{layer_height} do not match \
         image dimensions {image_width}x{image_height}"
    )]
    DimensionMismatch {
        layer_width: u32,
        layer_height: u32,
        image_width: u32,
        image_height: u32,
    },

    #[error("Invalid layer index {index} (image has {count} layers)")]
    InvalidIndex { index: usize, count: usize },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LaminaError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            LaminaError::AllocationFailure { .. } => "ALLOCATION_FAILURE",
            LaminaError::MalformedHeader { .. } => "MALFORMED_HEADER",
            LaminaError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            LaminaError::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            LaminaError::InvalidIndex { .. } => "INVALID_INDEX",
            LaminaError::Io(_) => "IO_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = LaminaError::MalformedHeader {
            reason: "expected width".to_string(),
        };
        assert_eq!(err.error_code(), "MALFORMED_HEADER");

        let err = LaminaError::InvalidIndex { index: 3, count: 2 };
        assert_eq!(err.error_code(), "INVALID_INDEX");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read");
        let err: LaminaError = io.into();
        assert_eq!(err.error_code(), "IO_ERROR");
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let err = LaminaError::DimensionMismatch {
            layer_width: 10,
            layer_height: 20,
            image_width: 30,
            image_height: 40,
        };
        let msg = err.to_string();
        assert!(msg.contains("10x20"));
        assert!(msg.contains("30x40"));
    }
}
