//! Tuning parameters for text-region detection

use textdetect_region::ConnectivityType;

/// Nominal tile width and height for adaptive thresholding
pub const DEFAULT_TILE_SIZE: u32 = 32;
/// Smallest accepted tile width or height
pub const MIN_TILE_SIZE: u32 = 8;
/// Fisher discriminant ratio a tile must exceed to count as textured
pub const DEFAULT_FDR_THRESHOLD: f32 = 3.5;
/// Fraction of the best split score searched for the histogram valley
pub const DEFAULT_SCORE_FRACTION: f32 = 0.01;
/// Smallest component area (w*h) kept by the shape filter
pub const DEFAULT_MIN_BLOB_AREA: i64 = 20;
/// Fewest members a cluster needs to be reported
pub const DEFAULT_CLUSTER_MIN_BLOBS: usize = 3;

/// Options for the tile thresholder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdOptions {
    /// Nominal tile width (default: 32)
    pub tile_width: u32,
    /// Nominal tile height (default: 32)
    pub tile_height: u32,
    /// Score fraction passed to the histogram split (default: 0.01)
    pub score_fraction: f32,
    /// Minimum Fisher discriminant ratio of a textured tile (default: 3.5)
    pub fdr_threshold: f32,
}

impl Default for ThresholdOptions {
    fn default() -> Self {
        Self {
            tile_width: DEFAULT_TILE_SIZE,
            tile_height: DEFAULT_TILE_SIZE,
            score_fraction: DEFAULT_SCORE_FRACTION,
            fdr_threshold: DEFAULT_FDR_THRESHOLD,
        }
    }
}

impl ThresholdOptions {
    /// Set the nominal tile size
    pub fn with_tile_size(mut self, width: u32, height: u32) -> Self {
        self.tile_width = width;
        self.tile_height = height;
        self
    }

    /// Set the split score fraction
    pub fn with_score_fraction(mut self, fraction: f32) -> Self {
        self.score_fraction = fraction;
        self
    }

    /// Set the textured-tile FDR threshold
    pub fn with_fdr_threshold(mut self, threshold: f32) -> Self {
        self.fdr_threshold = threshold;
        self
    }
}

/// Options for the component validator
///
/// Aspect bounds are in tenths: a component passes when
/// `min_aspect_x10 <= 10*w/h <= max_aspect_x10` (integer division).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Smallest area `w*h` (default: 20)
    pub min_blob_area: i64,
    /// Lowest accepted `10*w/h` (default: 1)
    pub min_aspect_x10: i32,
    /// Highest accepted `10*w/h` (default: 20)
    pub max_aspect_x10: i32,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            min_blob_area: DEFAULT_MIN_BLOB_AREA,
            min_aspect_x10: 1,
            max_aspect_x10: 20,
        }
    }
}

impl ValidateOptions {
    /// Set the minimum blob area
    pub fn with_min_blob_area(mut self, area: i64) -> Self {
        self.min_blob_area = area;
        self
    }

    /// Set the accepted aspect range, in tenths
    pub fn with_aspect_range_x10(mut self, min: i32, max: i32) -> Self {
        self.min_aspect_x10 = min;
        self.max_aspect_x10 = max;
        self
    }
}

/// Options for the component clusterer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterOptions {
    /// Fewest members of a reported cluster (default: 3)
    pub min_blobs: usize,
    /// Largest integer ratio between the widths, and between the heights,
    /// of two linked components (default: 5)
    pub max_size_ratio: i32,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            min_blobs: DEFAULT_CLUSTER_MIN_BLOBS,
            max_size_ratio: 5,
        }
    }
}

impl ClusterOptions {
    /// Set the minimum member count
    pub fn with_min_blobs(mut self, n: usize) -> Self {
        self.min_blobs = n;
        self
    }
}

/// Options for the whole detector
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextDetectOptions {
    /// Tile thresholder settings
    pub threshold: ThresholdOptions,
    /// Component validator settings
    pub validate: ValidateOptions,
    /// Component clusterer settings
    pub cluster: ClusterOptions,
    /// Connectivity used for component extraction (default: 4-way)
    pub connectivity: ConnectivityType,
    /// Drop results whose box lies inside another result's box
    /// (default: false)
    pub remove_inner_boxes: bool,
}

impl TextDetectOptions {
    /// Set the nominal tile size
    pub fn with_tile_size(mut self, width: u32, height: u32) -> Self {
        self.threshold = self.threshold.with_tile_size(width, height);
        self
    }

    /// Set the textured-tile FDR threshold
    pub fn with_fdr_threshold(mut self, threshold: f32) -> Self {
        self.threshold = self.threshold.with_fdr_threshold(threshold);
        self
    }

    /// Set the split score fraction
    pub fn with_score_fraction(mut self, fraction: f32) -> Self {
        self.threshold = self.threshold.with_score_fraction(fraction);
        self
    }

    /// Set the minimum blob area
    pub fn with_min_blob_area(mut self, area: i64) -> Self {
        self.validate = self.validate.with_min_blob_area(area);
        self
    }

    /// Set the minimum cluster member count
    pub fn with_cluster_min_blobs(mut self, n: usize) -> Self {
        self.cluster = self.cluster.with_min_blobs(n);
        self
    }

    /// Set the connectivity used for component extraction
    pub fn with_connectivity(mut self, connectivity: ConnectivityType) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Enable or disable the inner-box post-filter
    pub fn with_remove_inner_boxes(mut self, enable: bool) -> Self {
        self.remove_inner_boxes = enable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = TextDetectOptions::default();
        assert_eq!(opts.threshold.tile_width, 32);
        assert_eq!(opts.threshold.tile_height, 32);
        assert_eq!(opts.threshold.fdr_threshold, 3.5);
        assert_eq!(opts.threshold.score_fraction, 0.01);
        assert_eq!(opts.validate.min_blob_area, 20);
        assert_eq!(opts.cluster.min_blobs, 3);
        assert_eq!(opts.connectivity, ConnectivityType::FourWay);
        assert!(!opts.remove_inner_boxes);
    }

    #[test]
    fn test_builders() {
        let opts = TextDetectOptions::default()
            .with_tile_size(16, 24)
            .with_fdr_threshold(2.0)
            .with_cluster_min_blobs(2)
            .with_remove_inner_boxes(true);
        assert_eq!(opts.threshold.tile_width, 16);
        assert_eq!(opts.threshold.tile_height, 24);
        assert_eq!(opts.threshold.fdr_threshold, 2.0);
        assert_eq!(opts.cluster.min_blobs, 2);
        assert!(opts.remove_inner_boxes);
    }
}
