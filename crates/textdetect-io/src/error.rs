//! I/O error types
//!
//! The PNG module maps encoder and decoder failures into `IoError`
//! variants so that callers only need to handle one error type.

use thiserror::Error;

/// Error type for image I/O operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// Standard I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format or pixel layout is not supported
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The PNG decoder returned an error
    #[error("decode error: {0}")]
    DecodeError(String),

    /// The PNG encoder returned an error
    #[error("encode error: {0}")]
    EncodeError(String),

    /// An error from the core library (e.g. pixel depth mismatch)
    #[error("core error: {0}")]
    Core(#[from] textdetect_core::Error),
}

/// Convenience alias for I/O results.
pub type IoResult<T> = Result<T, IoError>;
