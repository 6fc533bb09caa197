//! Histogram generation for Pix images
//!
//! Functions to compute pixel value distributions from images.

use super::access::get_pixel_from_line;
use super::{Pix, PixelDepth};
use crate::Box;
use crate::error::{Error, Result};
use crate::numa::Numa;

impl Pix {
    /// Get the grayscale histogram of the image
    ///
    /// Counts the occurrence of each pixel value in the image.
    /// The histogram size depends on the image depth:
    /// - 1-bit: 2 bins (0 and 1)
    /// - 2-bit: 4 bins (0-3)
    /// - 4-bit: 16 bins (0-15)
    /// - 8-bit: 256 bins (0-255)
    /// - 16-bit: 65536 bins (0-65535)
    ///
    /// # Arguments
    ///
    /// * `factor` - Subsampling factor. Use 1 to count all pixels,
    ///   2 to count every other pixel on each axis, etc.
    ///
    /// # Returns
    ///
    /// A `Numa` whose bin `i` counts the pixels with value `i`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The image depth is 32-bit
    /// - The factor is 0
    ///
    /// # Example
    ///
    /// ```
    /// use textdetect_core::{Pix, PixelDepth};
    ///
    /// let pix = Pix::new(100, 100, PixelDepth::Bit8).unwrap();
    /// let hist = pix.gray_histogram(1).unwrap();
    /// assert_eq!(hist.len(), 256);
    /// assert_eq!(hist[0], 10000.0);
    /// ```
    pub fn gray_histogram(&self, factor: u32) -> Result<Numa> {
        let full = Box::new_unchecked(0, 0, self.width() as i32, self.height() as i32);
        self.histogram_over(&full, factor)
    }

    fn histogram_over(&self, rect: &Box, factor: u32) -> Result<Numa> {
        if factor == 0 {
            return Err(Error::InvalidParameter("factor must be >= 1".to_string()));
        }
        let depth = self.depth();
        if depth == PixelDepth::Bit32 {
            return Err(Error::IncompatibleDepths(32, 8));
        }

        let size = 1usize << depth.bits();
        let mut histogram = vec![0.0f32; size];

        let step = factor as usize;
        for y in (rect.y as u32..rect.bottom() as u32).step_by(step) {
            let line = self.row_data(y);
            for x in (rect.x as u32..rect.right() as u32).step_by(step) {
                histogram[get_pixel_from_line(line, x, depth) as usize] += 1.0;
            }
        }

        Ok(Numa::from_vec(histogram))
    }

    /// Count the foreground (ON) pixels of a 1 bpp image.
    ///
    /// Returns 0 for other depths.
    pub fn count_pixels(&self) -> u64 {
        if self.depth() != PixelDepth::Bit1 {
            return 0;
        }
        self.data().iter().map(|w| u64::from(w.count_ones())).sum()
    }
}
