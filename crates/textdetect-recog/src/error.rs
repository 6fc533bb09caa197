//! Error types for textdetect-recog

use thiserror::Error;

/// Errors that can occur during text-region detection
#[derive(Debug, Error)]
pub enum RecogError {
    /// The input image or the tuning parameters are unusable
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An intermediate image could not be allocated
    #[error("allocation failure")]
    AllocationFailure,

    /// Core library error
    #[error("core error: {0}")]
    Core(#[source] textdetect_core::Error),

    /// Region library error
    #[error("region error: {0}")]
    Region(#[source] textdetect_region::RegionError),
}

impl RecogError {
    /// True for errors caused by the caller's image or parameters rather
    /// than by a failure inside the pipeline.
    pub fn is_invalid_input(&self) -> bool {
        use textdetect_core::Error as CoreError;
        match self {
            RecogError::InvalidInput(_) => true,
            RecogError::Core(e) | RecogError::Region(textdetect_region::RegionError::Core(e)) => {
                matches!(
                    e,
                    CoreError::InvalidDimension { .. }
                        | CoreError::UnsupportedDepth(_)
                        | CoreError::IncompatibleDepths(..)
                        | CoreError::InvalidParameter(_)
                )
            }
            RecogError::Region(textdetect_region::RegionError::UnsupportedDepth { .. }) => true,
            RecogError::AllocationFailure => false,
        }
    }
}

impl From<textdetect_core::Error> for RecogError {
    fn from(e: textdetect_core::Error) -> Self {
        match e {
            textdetect_core::Error::AllocationFailed => RecogError::AllocationFailure,
            e => RecogError::Core(e),
        }
    }
}

impl From<textdetect_region::RegionError> for RecogError {
    fn from(e: textdetect_region::RegionError) -> Self {
        match e {
            textdetect_region::RegionError::Core(textdetect_core::Error::AllocationFailed) => {
                RecogError::AllocationFailure
            }
            e => RecogError::Region(e),
        }
    }
}

/// Result type for recognition operations
pub type RecogResult<T> = Result<T, RecogError>;
