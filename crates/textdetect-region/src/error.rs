//! Error types for textdetect-region

use thiserror::Error;

/// Errors from component extraction
#[derive(Debug, Error)]
pub enum RegionError {
    /// Failure in an image operation
    #[error("core error: {0}")]
    Core(#[from] textdetect_core::Error),

    /// The input is not a binary mask
    #[error("component extraction needs a {expected} image, got {actual} bpp")]
    UnsupportedDepth { expected: &'static str, actual: u32 },
}

/// Result alias for region operations
pub type RegionResult<T> = Result<T, RegionError>;
