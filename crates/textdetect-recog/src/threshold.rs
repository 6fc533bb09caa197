//! Tile-adaptive thresholding with Fisher's discriminant ratio
//!
//! The image is cut into a grid of tiles. Each tile's histogram is split
//! into a dark and a light class; the Fisher discriminant ratio (FDR) of
//! that split measures how clearly the tile is two-level. Only tiles whose
//! FDR exceeds the configured threshold are binarized, so flat background
//! and smooth gradients produce no foreground at all.
//!
//! Two masks are produced so that both dark-on-light and light-on-dark text
//! become foreground in one of them.

use crate::error::{RecogError, RecogResult};
use crate::options::{MIN_TILE_SIZE, ThresholdOptions};
use textdetect_core::{Numa, Pix, PixTiling, PixelDepth, SplitDistribution};

/// Threshold and FDR of one tile (or of a whole image)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileThreshold {
    /// Pixels with a value strictly below this are the dark class
    pub threshold: u8,
    /// Fisher discriminant ratio of the split (>= 0)
    pub discriminant_ratio: f32,
}

/// Output of [`fisher_adaptive_threshold`]
#[derive(Debug, Clone)]
pub struct FisherThresholdResult {
    /// Foreground where a textured tile is darker than its threshold
    pub mask_normal: Pix,
    /// Foreground where a textured tile is at or above its threshold
    pub mask_inverted: Pix,
    /// Per-tile results in row-major order (`nx * ny` entries)
    pub tiles: Vec<TileThreshold>,
    /// Number of tile columns
    pub nx: u32,
    /// Number of tile rows
    pub ny: u32,
    fdr_threshold: f32,
}

impl FisherThresholdResult {
    /// Number of tiles that were binarized
    pub fn textured_tiles(&self) -> usize {
        self.tiles
            .iter()
            .filter(|t| t.discriminant_ratio > self.fdr_threshold)
            .count()
    }
}

/// Check that `pix` is a single-channel 8 bpp image.
pub(crate) fn check_gray(pix: &Pix) -> RecogResult<()> {
    if pix.depth() != PixelDepth::Bit8 || pix.spp() != 1 {
        return Err(RecogError::InvalidInput(format!(
            "expected 8 bpp single-channel image, got {} bpp with {} samples",
            pix.depth().bits(),
            pix.spp()
        )));
    }
    Ok(())
}

/// Check the tile size before any pixel is read.
pub(crate) fn check_tile_size(sx: u32, sy: u32) -> RecogResult<()> {
    if sx < MIN_TILE_SIZE || sy < MIN_TILE_SIZE {
        return Err(RecogError::InvalidInput(format!(
            "tile size must be at least {}x{}, got {}x{}",
            MIN_TILE_SIZE, MIN_TILE_SIZE, sx, sy
        )));
    }
    Ok(())
}

/// Fisher discriminant ratio of a two-class split.
///
/// `variance` is the total variance of the histogram in intensity units.
/// A split with no separation scores 0; when the remaining within-class
/// variance is at most 1 the between-class variance is returned as is.
pub fn fisher_discriminant_ratio(split: &SplitDistribution, variance: f32) -> f32 {
    let sum = split.sum_below + split.sum_above;
    if sum <= 0.0 {
        return 0.0;
    }
    let fraction = split.sum_below / sum;
    let diff = split.mean_below - split.mean_above;
    let between = fraction * (1.0 - fraction) * diff * diff;
    let within = variance - between;
    if between == 0.0 {
        0.0
    } else if within <= 1.0 {
        between
    } else {
        between / within
    }
}

/// Check that the valley search fraction lies in `[0, 1]`.
pub(crate) fn check_score_fraction(score_fraction: f32) -> RecogResult<()> {
    if !(0.0..=1.0).contains(&score_fraction) {
        return Err(RecogError::InvalidInput(format!(
            "score fraction must be in [0, 1], got {}",
            score_fraction
        )));
    }
    Ok(())
}

fn threshold_histogram(hist: &Numa, score_fraction: f32) -> RecogResult<TileThreshold> {
    let split = hist.split_distribution(score_fraction)?;
    let variance = hist
        .variance(0.0, 1.0)
        .ok_or_else(|| RecogError::InvalidInput("histogram has no mass".to_string()))?;
    Ok(TileThreshold {
        threshold: split.threshold.min(255) as u8,
        discriminant_ratio: fisher_discriminant_ratio(&split, variance),
    })
}

/// Threshold and FDR of a whole 8 bpp image.
///
/// With `factor > 1` only every `factor`-th pixel on each axis is counted;
/// a `score_fraction` around 0.1 suits such subsampled histograms.
///
/// # Errors
///
/// Returns [`RecogError::InvalidInput`] if the image is not 8 bpp
/// single-channel, `factor` is 0 or `score_fraction` is outside `[0, 1]`.
pub fn get_fisher_threshold(pix: &Pix, score_fraction: f32, factor: u32) -> RecogResult<TileThreshold> {
    check_score_fraction(score_fraction)?;
    check_gray(pix)?;
    if factor == 0 {
        return Err(RecogError::InvalidInput("factor must be >= 1".to_string()));
    }
    let hist = pix.gray_histogram(factor)?;
    threshold_histogram(&hist, score_fraction)
}

/// Binarize an 8 bpp image: foreground (1) where the value is below
/// `threshold`.
///
/// A threshold of 0 yields an empty mask.
pub fn threshold_to_binary(pix: &Pix, threshold: u32) -> RecogResult<Pix> {
    check_gray(pix)?;
    let mut mask = Pix::new(pix.width(), pix.height(), PixelDepth::Bit1)?.to_mut();
    for y in 0..pix.height() {
        let src = pix.row_data(y);
        let dst = mask.row_data_mut(y);
        for x in 0..pix.width() {
            if textdetect_core::pix::get_data_byte(src, x) < threshold {
                textdetect_core::pix::set_data_bit_val(dst, x);
            }
        }
    }
    Ok(mask.into())
}

/// Tile-adaptive two-polarity thresholding.
///
/// The grid has `max(1, W/sx)` by `max(1, H/sy)` tiles, the last column
/// and row absorbing the remainder. For every tile whose FDR exceeds
/// `fdr_threshold`, `mask_normal` gets the pixels below the tile threshold
/// and `mask_inverted` the rest of the tile. Other tiles stay background in
/// both masks.
///
/// # Errors
///
/// Returns [`RecogError::InvalidInput`] if `sx` or `sy` is below 8,
/// `score_fraction` is outside `[0, 1]` or the image is not 8 bpp
/// single-channel.
pub fn fisher_adaptive_threshold(
    pix: &Pix,
    sx: u32,
    sy: u32,
    score_fraction: f32,
    fdr_threshold: f32,
) -> RecogResult<FisherThresholdResult> {
    check_tile_size(sx, sy)?;
    check_score_fraction(score_fraction)?;
    check_gray(pix)?;

    let tiling = PixTiling::for_pix(pix, sx, sy)?;
    let mut mask_normal = Pix::new(pix.width(), pix.height(), PixelDepth::Bit1)?.to_mut();
    let mut mask_inverted = Pix::new(pix.width(), pix.height(), PixelDepth::Bit1)?.to_mut();
    let mut tiles = Vec::with_capacity(tiling.count());

    for (ix, iy, b) in tiling.tiles() {
        let tile = tiling.get_tile(pix, ix, iy)?;
        let hist = tile.gray_histogram(1)?;
        let tt = threshold_histogram(&hist, score_fraction)?;
        let textured = tt.discriminant_ratio > fdr_threshold;
        tracing::trace!(
            ix,
            iy,
            x = b.x,
            y = b.y,
            threshold = tt.threshold,
            fdr = tt.discriminant_ratio,
            textured,
            "tile threshold"
        );

        if textured {
            let dark = threshold_to_binary(&tile, tt.threshold as u32)?;
            tiling.paint_tile(&mut mask_normal, ix, iy, &dark)?;
            tiling.paint_tile(&mut mask_inverted, ix, iy, &dark.invert())?;
        }
        tiles.push(tt);
    }

    Ok(FisherThresholdResult {
        mask_normal: mask_normal.into(),
        mask_inverted: mask_inverted.into(),
        tiles,
        nx: tiling.nx(),
        ny: tiling.ny(),
        fdr_threshold,
    })
}

/// [`fisher_adaptive_threshold`] driven by an options struct.
pub fn fisher_adaptive_threshold_with(
    pix: &Pix,
    options: &ThresholdOptions,
) -> RecogResult<FisherThresholdResult> {
    fisher_adaptive_threshold(
        pix,
        options.tile_width,
        options.tile_height,
        options.score_fraction,
        options.fdr_threshold,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use textdetect_core::Box;
    use textdetect_test::synth::{page_with_blocks, uniform_page};

    #[test]
    fn test_fdr_of_two_spikes_is_large() {
        // Half black, half white
        let pix = page_with_blocks(16, 16, 255, 0, &[Box::new_unchecked(0, 0, 8, 16)]).unwrap();
        let tt = get_fisher_threshold(&pix, 0.01, 1).unwrap();
        assert_eq!(tt.threshold, 1);
        assert!(tt.discriminant_ratio > 1000.0);
    }

    #[test]
    fn test_fdr_of_flat_image_is_zero() {
        let pix = uniform_page(16, 16, 128).unwrap();
        let tt = get_fisher_threshold(&pix, 0.01, 1).unwrap();
        assert_eq!(tt.discriminant_ratio, 0.0);
    }

    #[test]
    fn test_fdr_formula_branches() {
        let split = SplitDistribution {
            threshold: 100,
            mean_below: 10.0,
            mean_above: 30.0,
            sum_below: 50.0,
            sum_above: 50.0,
        };
        // between = 0.25 * 400 = 100
        assert_eq!(fisher_discriminant_ratio(&split, 100.5), 100.0);
        assert_eq!(fisher_discriminant_ratio(&split, 300.0), 0.5);
        let flat = SplitDistribution {
            mean_above: 10.0,
            ..split
        };
        assert_eq!(fisher_discriminant_ratio(&flat, 50.0), 0.0);
    }

    #[test]
    fn test_subsampled_threshold() {
        let pix = page_with_blocks(64, 64, 200, 20, &[Box::new_unchecked(0, 0, 32, 64)]).unwrap();
        let tt = get_fisher_threshold(&pix, 0.1, 4).unwrap();
        assert!(tt.threshold > 20 && tt.threshold <= 200);
        assert!(tt.discriminant_ratio > 3.5);
        assert!(get_fisher_threshold(&pix, 0.1, 0).is_err());
    }

    #[test]
    fn test_valley_pixels_go_to_the_inverted_mask() {
        // Every level twice except a single 127, plus two heavy modes
        let mut values = Vec::with_capacity(2048);
        for level in 0..=255u8 {
            let copies = if level == 127 { 1 } else { 2 };
            values.extend(std::iter::repeat_n(level, copies));
        }
        values.extend(std::iter::repeat_n(40u8, 768));
        values.resize(2048, 215);
        let pix = Pix::from_gray_bytes(64, 32, &values).unwrap();

        let res = fisher_adaptive_threshold(&pix, 64, 32, 0.01, 3.5).unwrap();
        assert_eq!(res.tiles.len(), 1);
        assert_eq!(res.tiles[0].threshold, 127);
        assert_eq!(res.textured_tiles(), 1);
        assert_eq!(res.mask_normal.count_pixels(), 254 + 768);
        assert_eq!(res.mask_inverted.count_pixels(), 2048 - 254 - 768);
        // The lone 127 sits at index 254
        assert_eq!(res.mask_normal.get_pixel(62, 3), Some(0));
        assert_eq!(res.mask_inverted.get_pixel(62, 3), Some(1));
    }

    #[test]
    fn test_bad_score_fraction_is_invalid_input() {
        let pix = uniform_page(64, 64, 255).unwrap();
        for fraction in [-0.1, 1.5, f32::NAN] {
            assert!(matches!(
                fisher_adaptive_threshold(&pix, 32, 32, fraction, 3.5),
                Err(RecogError::InvalidInput(_))
            ));
            assert!(matches!(
                get_fisher_threshold(&pix, fraction, 1),
                Err(RecogError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_threshold_to_binary() {
        let pix = Pix::from_gray_bytes(4, 1, &[0, 99, 100, 255]).unwrap();
        let mask = threshold_to_binary(&pix, 100).unwrap();
        assert_eq!(mask.depth(), PixelDepth::Bit1);
        assert_eq!(mask.count_pixels(), 2);
        assert_eq!(mask.get_pixel(1, 0), Some(1));
        assert_eq!(mask.get_pixel(2, 0), Some(0));
        assert_eq!(threshold_to_binary(&pix, 0).unwrap().count_pixels(), 0);
    }

    #[test]
    fn test_masks_are_complementary_in_textured_tiles() {
        let pix = page_with_blocks(64, 32, 255, 0, &[Box::new_unchecked(4, 4, 10, 20)]).unwrap();
        let res = fisher_adaptive_threshold(&pix, 32, 32, 0.01, 3.5).unwrap();
        assert_eq!((res.nx, res.ny), (2, 1));
        assert_eq!(res.tiles.len(), 2);
        // Left tile holds the block, right tile is flat
        assert_eq!(res.textured_tiles(), 1);
        assert_eq!(res.mask_normal.count_pixels(), 200);
        assert_eq!(res.mask_inverted.count_pixels(), 32 * 32 - 200);
        for y in 0..32 {
            for x in 0..64 {
                let n = res.mask_normal.get_pixel(x, y).unwrap();
                let i = res.mask_inverted.get_pixel(x, y).unwrap();
                if x < 32 {
                    assert_eq!(n + i, 1);
                } else {
                    assert_eq!(n + i, 0);
                }
            }
        }
    }

    #[test]
    fn test_rejects_small_tiles_and_wrong_depth() {
        let pix = uniform_page(64, 64, 255).unwrap();
        assert!(matches!(
            fisher_adaptive_threshold(&pix, 7, 32, 0.01, 3.5),
            Err(RecogError::InvalidInput(_))
        ));
        let bin = Pix::new(64, 64, PixelDepth::Bit1).unwrap();
        assert!(matches!(
            fisher_adaptive_threshold(&bin, 32, 32, 0.01, 3.5),
            Err(RecogError::InvalidInput(_))
        ));
    }
}
