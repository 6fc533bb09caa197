//! textdetect - Text-region detection for grayscale page images
//!
//! Locates rectangular regions that are likely to contain lines of printed
//! text, both dark-on-light and light-on-dark, ahead of OCR or document
//! layout analysis.
//!
//! # Overview
//!
//! - Tile-adaptive thresholding driven by Fisher's discriminant ratio
//! - Connected component extraction
//! - Geometric validation of components
//! - Clustering of components into text lines
//!
//! # Example
//!
//! ```
//! use textdetect::{Pix, PixelDepth, TextDetectOptions, detect_text};
//!
//! let page = Pix::new(64, 64, PixelDepth::Bit8).unwrap();
//! let regions = detect_text(&page, &TextDetectOptions::default()).unwrap();
//! assert!(regions.is_empty());
//! ```

// Re-export core types (primary data structures used everywhere)
pub use textdetect_core::*;

// Re-export the detector entry points
pub use textdetect_recog::{
    DebugSink, DetectionReport, MemorySink, NullSink, PngDirSink, RecogError, RecogResult,
    TextDetectOptions, TextDetector, detect_text,
};

// Re-export domain crates as modules to avoid name conflicts
pub use textdetect_io as io;
pub use textdetect_recog as recog;
pub use textdetect_region as region;
