//! Error types for textdetect-core

use thiserror::Error;

/// Errors raised by the image containers and their operations
#[derive(Error, Debug)]
pub enum Error {
    /// Width or height is zero or too large to address
    #[error("bad image size {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Pixel, tile or array index past the end
    #[error("index {index} out of range (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Two images that must share a depth do not
    #[error("depth mismatch: {0} bpp vs {1} bpp")]
    IncompatibleDepths(u32, u32),

    /// An image does not have the size an operation requires
    #[error("size mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// The depth exists but the operation does not handle it
    #[error("operation not available at {0} bpp")]
    UnsupportedDepth(u32),

    /// Argument out of its valid range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A pixel buffer could not be reserved
    #[error("pixel buffer allocation failed")]
    AllocationFailed,
}

/// Result alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
