//! Rectangle extraction

use super::{Pix, PixelDepth};
use crate::Box;
use crate::error::{Error, Result};

impl Pix {
    /// Extract a rectangular sub-region into a new image of the same depth.
    ///
    /// The region is clipped to the image bounds, so a box extending past
    /// the right or bottom edge yields a smaller image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the region is empty or lies
    /// entirely outside the image.
    ///
    /// # Examples
    ///
    /// ```
    /// use textdetect_core::{Box, Pix, PixelDepth};
    ///
    /// let pix = Pix::new(100, 80, PixelDepth::Bit8).unwrap();
    /// let clipped = pix.clip_rectangle(&Box::new_unchecked(80, 60, 50, 50)).unwrap();
    /// assert_eq!(clipped.width(), 20);
    /// assert_eq!(clipped.height(), 20);
    /// ```
    pub fn clip_rectangle(&self, region: &Box) -> Result<Pix> {
        let clipped = region
            .clip(self.width() as i32, self.height() as i32)
            .ok_or_else(|| {
                Error::InvalidParameter(format!(
                    "clip rectangle {:?} is outside image bounds ({}x{})",
                    region,
                    self.width(),
                    self.height()
                ))
            })?;

        let (x, y) = (clipped.x as u32, clipped.y as u32);
        let (w, h) = (clipped.w as u32, clipped.h as u32);
        let depth = self.depth();
        let mut pixd = Pix::new(w, h, depth)?.to_mut();
        if depth == PixelDepth::Bit32 {
            pixd.set_spp(self.spp());
        }

        for dy in 0..h {
            for dx in 0..w {
                let val = self.get_pixel_unchecked(x + dx, y + dy);
                pixd.set_pixel_unchecked(dx, dy, val);
            }
        }

        Ok(pixd.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_copies_pixels() {
        let bytes: Vec<u8> = (0..64).collect();
        let pix = Pix::from_gray_bytes(8, 8, &bytes).unwrap();
        let sub = pix.clip_rectangle(&Box::new_unchecked(2, 3, 3, 2)).unwrap();
        assert_eq!((sub.width(), sub.height()), (3, 2));
        assert_eq!(sub.get_pixel(0, 0), Some(26));
        assert_eq!(sub.get_pixel(2, 1), Some(36));
    }

    #[test]
    fn test_clip_binary_across_word_boundary() {
        let mut pm = Pix::new(70, 3, PixelDepth::Bit1).unwrap().to_mut();
        pm.set_pixel(31, 1, 1).unwrap();
        pm.set_pixel(33, 1, 1).unwrap();
        let pix: Pix = pm.into();
        let sub = pix.clip_rectangle(&Box::new_unchecked(30, 0, 5, 3)).unwrap();
        assert_eq!(sub.count_pixels(), 2);
        assert_eq!(sub.get_pixel(1, 1), Some(1));
        assert_eq!(sub.get_pixel(3, 1), Some(1));
    }

    #[test]
    fn test_clip_outside_fails() {
        let pix = Pix::new(10, 10, PixelDepth::Bit8).unwrap();
        assert!(pix.clip_rectangle(&Box::new_unchecked(10, 0, 4, 4)).is_err());
        assert!(pix.clip_rectangle(&Box::new_unchecked(0, 0, 0, 4)).is_err());
    }
}
