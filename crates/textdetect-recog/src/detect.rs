//! Text region detection
//!
//! The detector runs the whole pipeline on an 8 bpp grayscale page:
//!
//! 1. Tile-adaptive Fisher thresholding into a normal and an inverted mask
//! 2. Connected components of each mask
//! 3. Shape and neighbor validation of the components
//! 4. Left-to-right clustering of the survivors into text lines
//!
//! Both polarities are processed independently. The result lists the
//! regions found in the normal mask (dark text on a light background)
//! followed by those found in the inverted mask.

use std::fmt;

use crate::cluster::cluster_components;
use crate::debug::{DebugSink, NullSink, new_run_id, render_components};
use crate::error::RecogResult;
use crate::options::TextDetectOptions;
use crate::threshold::{
    check_gray, check_score_fraction, check_tile_size, fisher_adaptive_threshold_with,
};
use crate::validate::{neighbor_filter, select_valid, shape_filter};
use textdetect_core::{Pix, Pixa};
use textdetect_region::conncomp_pixa;

/// Stage counts for one polarity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolarityReport {
    /// Connected components in the threshold mask
    pub components: usize,
    /// Components left after the shape pass
    pub after_shape_filter: usize,
    /// Components left after the neighbor pass
    pub after_neighbor_filter: usize,
    /// Regions emitted by the clusterer
    pub clusters: usize,
}

/// Detection result together with per-stage counts
#[derive(Debug, Clone)]
pub struct DetectionReport {
    /// Detected regions, normal polarity first
    pub regions: Pixa,
    /// Tiles in the threshold grid
    pub tiles_total: usize,
    /// Tiles whose FDR exceeded the threshold
    pub tiles_textured: usize,
    /// Dark-on-light counts
    pub normal: PolarityReport,
    /// Light-on-dark counts
    pub inverted: PolarityReport,
}

/// Text region detector
///
/// Holds the tuning options and the sink that receives intermediate images
/// when a detection runs with debugging on. Without a configured sink the
/// artifacts are discarded.
///
/// # Examples
///
/// ```
/// use textdetect_core::{Pix, PixelDepth};
/// use textdetect_recog::{TextDetectOptions, TextDetector};
///
/// let page = Pix::new(64, 64, PixelDepth::Bit8).unwrap();
/// let detector = TextDetector::new(TextDetectOptions::default());
/// let regions = detector.detect(&page, false).unwrap();
/// assert!(regions.is_empty());
/// ```
pub struct TextDetector {
    options: TextDetectOptions,
    sink: Box<dyn DebugSink>,
}

impl fmt::Debug for TextDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextDetector")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for TextDetector {
    fn default() -> Self {
        Self::new(TextDetectOptions::default())
    }
}

impl TextDetector {
    /// Create a detector with the given options
    pub fn new(options: TextDetectOptions) -> Self {
        Self {
            options,
            sink: Box::new(NullSink),
        }
    }

    /// Send debug artifacts to `sink`
    pub fn with_debug_sink(mut self, sink: impl DebugSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// The detector's options
    pub fn options(&self) -> &TextDetectOptions {
        &self.options
    }

    /// Detect text regions in an 8 bpp grayscale page.
    ///
    /// Each returned entry is a merged 1 bpp mask with its bounding box in
    /// page coordinates. `debug` only controls whether intermediate images
    /// go to the debug sink; it never changes the result.
    ///
    /// # Errors
    ///
    /// Returns [`RecogError::InvalidInput`](crate::RecogError::InvalidInput)
    /// if a tile dimension is below 8 or the score fraction is outside
    /// `[0, 1]` (both checked before the image is looked at), or the image
    /// is not 8 bpp single-channel.
    pub fn detect(&self, pix: &Pix, debug: bool) -> RecogResult<Pixa> {
        Ok(self.detect_with_report(pix, debug)?.regions)
    }

    /// [`detect`](Self::detect), also returning per-stage counts.
    pub fn detect_with_report(&self, pix: &Pix, debug: bool) -> RecogResult<DetectionReport> {
        let opts = &self.options;
        check_tile_size(opts.threshold.tile_width, opts.threshold.tile_height)?;
        check_score_fraction(opts.threshold.score_fraction)?;
        check_gray(pix)?;

        let run = debug.then(new_run_id);
        self.emit(run, "input", || Ok(pix.clone()));

        let masks = fisher_adaptive_threshold_with(pix, &opts.threshold)?;
        let tiles_textured = masks.textured_tiles();
        tracing::debug!(
            width = pix.width(),
            height = pix.height(),
            nx = masks.nx,
            ny = masks.ny,
            tiles_textured,
            "thresholded"
        );
        self.emit(run, "mask_normal", || Ok(masks.mask_normal.clone()));
        self.emit(run, "mask_inverted", || Ok(masks.mask_inverted.clone()));

        let (mut regions, normal) = self.process_polarity(&masks.mask_normal, "normal", run)?;
        let (inverted_regions, inverted) =
            self.process_polarity(&masks.mask_inverted, "inverted", run)?;
        regions.join(&inverted_regions);

        if opts.remove_inner_boxes {
            let before = regions.len();
            regions = remove_inner_boxes(&regions)?;
            tracing::debug!(before, after = regions.len(), "removed inner boxes");
        }
        self.emit(run, "clusters", || {
            render_components(&regions, pix.width(), pix.height())
        });

        tracing::info!(
            regions = regions.len(),
            normal = normal.clusters,
            inverted = inverted.clusters,
            "text detection done"
        );

        Ok(DetectionReport {
            regions,
            tiles_total: masks.tiles.len(),
            tiles_textured,
            normal,
            inverted,
        })
    }

    fn process_polarity(
        &self,
        mask: &Pix,
        polarity: &str,
        run: Option<u64>,
    ) -> RecogResult<(Pixa, PolarityReport)> {
        let opts = &self.options;
        let (_, components) = conncomp_pixa(mask, opts.connectivity)?;
        let shape_removed = shape_filter(&components, &opts.validate);
        let removed = neighbor_filter(&components, &shape_removed);
        let clusters = cluster_components(&components, &removed, &opts.cluster)?;

        let report = PolarityReport {
            components: components.len(),
            after_shape_filter: shape_removed.iter().filter(|&&r| !r).count(),
            after_neighbor_filter: removed.iter().filter(|&&r| !r).count(),
            clusters: clusters.len(),
        };
        tracing::debug!(
            polarity,
            components = report.components,
            after_shape_filter = report.after_shape_filter,
            after_neighbor_filter = report.after_neighbor_filter,
            clusters = report.clusters,
            "polarity processed"
        );

        let (w, h) = (mask.width(), mask.height());
        self.emit(run, &format!("components_{}", polarity), || {
            render_components(&components, w, h)
        });
        self.emit(run, &format!("valid_{}", polarity), || {
            render_components(&select_valid(&components, &removed)?, w, h)
        });

        Ok((clusters, report))
    }

    /// Hand one artifact to the sink. Nothing happens outside a debug run;
    /// failures are logged and otherwise ignored.
    fn emit<F>(&self, run: Option<u64>, tag: &str, make: F)
    where
        F: FnOnce() -> RecogResult<Pix>,
    {
        let Some(run_id) = run else {
            return;
        };
        let pix = match make() {
            Ok(pix) => pix,
            Err(e) => {
                tracing::warn!(tag, error = %e, "could not render debug artifact");
                return;
            }
        };
        if let Err(e) = self.sink.write_pix(run_id, tag, &pix) {
            tracing::warn!(tag, run_id, error = %e, "debug sink write failed");
        }
    }
}

/// Detect text regions with a one-off detector.
///
/// See [`TextDetector::detect`].
pub fn detect_text(pix: &Pix, options: &TextDetectOptions) -> RecogResult<Pixa> {
    TextDetector::new(*options).detect(pix, false)
}

/// Drop every entry whose box lies inside another entry's box.
///
/// Pairs are scanned in index order. Of two identical boxes the earlier
/// one is dropped.
pub fn remove_inner_boxes(regions: &Pixa) -> RecogResult<Pixa> {
    let boxes = regions.boxa().boxes();
    let n = boxes.len();
    let mut inner = vec![false; n];
    for i in 0..n.saturating_sub(1) {
        for j in (i + 1)..n {
            if inner[i] {
                break;
            }
            if inner[j] {
                continue;
            }
            if boxes[j].contains_box(&boxes[i]) {
                inner[i] = true;
            } else if boxes[i].contains_box(&boxes[j]) {
                inner[j] = true;
            }
        }
    }
    let keep: Vec<bool> = inner.iter().map(|&m| !m).collect();
    Ok(regions.select(&keep)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecogError;
    use crate::debug::MemorySink;
    use textdetect_core::{Box, PixelDepth};
    use textdetect_io::{IoError, IoResult};
    use textdetect_test::synth::{blob_row, page_with_blocks};

    struct FailingSink;

    impl DebugSink for FailingSink {
        fn write_pix(&self, _run_id: u64, _tag: &str, _pix: &Pix) -> IoResult<()> {
            Err(IoError::EncodeError("disk full".to_string()))
        }
    }

    fn pixa_of(boxes: &[Box]) -> Pixa {
        let mut pixa = Pixa::new();
        for b in boxes {
            let pix = Pix::new(b.w as u32, b.h as u32, PixelDepth::Bit1).unwrap();
            pixa.push_with_box(pix, *b).unwrap();
        }
        pixa
    }

    fn text_line() -> Pix {
        page_with_blocks(96, 32, 255, 0, &blob_row(10, 10, 8, 12, 12, 5)).unwrap()
    }

    #[test]
    fn test_remove_inner_boxes() {
        let pixa = pixa_of(&[
            Box::new_unchecked(5, 5, 10, 10),
            Box::new_unchecked(0, 0, 40, 20),
            Box::new_unchecked(50, 0, 10, 10),
            Box::new_unchecked(10, 2, 4, 4),
        ]);
        let out = remove_inner_boxes(&pixa).unwrap();
        let kept: Vec<Box> = out.boxa().boxes().to_vec();
        assert_eq!(
            kept,
            vec![Box::new_unchecked(0, 0, 40, 20), Box::new_unchecked(50, 0, 10, 10)]
        );
    }

    #[test]
    fn test_identical_boxes_keep_the_later_one() {
        let b = Box::new_unchecked(0, 0, 10, 10);
        let out = remove_inner_boxes(&pixa_of(&[b, b])).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_report_counts() {
        let detector = TextDetector::default();
        let report = detector.detect_with_report(&text_line(), false).unwrap();
        assert_eq!(report.tiles_total, 3);
        assert_eq!(report.normal.components, 5);
        assert_eq!(report.normal.after_neighbor_filter, 5);
        assert_eq!(report.normal.clusters, 1);
        assert_eq!(report.regions.len(), report.normal.clusters + report.inverted.clusters);
    }

    #[test]
    fn test_sink_failure_does_not_fail_detection() {
        let pix = text_line();
        let plain = TextDetector::default().detect(&pix, false).unwrap();
        let failing = TextDetector::default().with_debug_sink(FailingSink);
        let debugged = failing.detect(&pix, true).unwrap();
        assert_eq!(plain, debugged);
    }

    #[test]
    fn test_debug_artifacts() {
        let sink = std::sync::Arc::new(MemorySink::new());
        let detector = TextDetector::default().with_debug_sink(sink.clone());
        detector.detect(&text_line(), true).unwrap();
        assert_eq!(
            sink.tags(),
            vec![
                "input",
                "mask_normal",
                "mask_inverted",
                "components_normal",
                "valid_normal",
                "components_inverted",
                "valid_inverted",
                "clusters",
            ]
        );
        assert_eq!(sink.run_ids().len(), 1);
        detector.detect(&text_line(), false).unwrap();
        assert_eq!(sink.len(), 8);
    }

    #[test]
    fn test_tile_size_checked_before_depth() {
        let opts = TextDetectOptions::default().with_tile_size(4, 32);
        let bin = Pix::new(16, 16, PixelDepth::Bit1).unwrap();
        match detect_text(&bin, &opts) {
            Err(RecogError::InvalidInput(msg)) => assert!(msg.contains("tile size")),
            other => panic!("unexpected result: {:?}", other.map(|p| p.len())),
        }
    }
}
