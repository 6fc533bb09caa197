//! textdetect-recog - Text region detection in grayscale page images
//!
//! Finds rectangular regions likely to hold lines of printed text, in both
//! dark-on-light and light-on-dark polarity, without recognizing any
//! characters.
//!
//! # Quick Start
//!
//! ```no_run
//! use textdetect_recog::{TextDetectOptions, TextDetector, PngDirSink};
//!
//! let page = textdetect_io::read_image("page.png").unwrap();
//! let detector = TextDetector::new(TextDetectOptions::default())
//!     .with_debug_sink(PngDirSink::new("/tmp/textdetect"));
//! let regions = detector.detect(&page, true).unwrap();
//! for (_, b) in regions.iter() {
//!     println!("text at {},{} {}x{}", b.x, b.y, b.w, b.h);
//! }
//! ```
//!
//! # Modules
//!
//! - [`threshold`]: Tile-adaptive Fisher thresholding
//! - [`validate`]: Component shape and neighbor filters
//! - [`cluster`]: Chaining components into text lines
//! - [`detect`]: The full pipeline
//! - [`debug`]: Debug artifact sinks

pub mod cluster;
pub mod debug;
pub mod detect;
mod error;
pub mod options;
pub mod threshold;
pub mod validate;

pub use error::{RecogError, RecogResult};

pub use cluster::cluster_components;
pub use debug::{DebugSink, MemorySink, NullSink, PngDirSink, render_components};
pub use detect::{
    DetectionReport, PolarityReport, TextDetector, detect_text, remove_inner_boxes,
};
pub use options::{
    ClusterOptions, DEFAULT_CLUSTER_MIN_BLOBS, DEFAULT_FDR_THRESHOLD, DEFAULT_MIN_BLOB_AREA,
    DEFAULT_SCORE_FRACTION, DEFAULT_TILE_SIZE, MIN_TILE_SIZE, TextDetectOptions,
    ThresholdOptions, ValidateOptions,
};
pub use threshold::{
    FisherThresholdResult, TileThreshold, fisher_adaptive_threshold,
    fisher_adaptive_threshold_with, fisher_discriminant_ratio, get_fisher_threshold,
    threshold_to_binary,
};
pub use validate::{neighbor_filter, select_valid, shape_filter, validate_components};

// Re-export the crates the public API is built on
pub use textdetect_core;
pub use textdetect_region::ConnectivityType;
