//! PIX - The main image container
//!
//! `Pix` holds both the grayscale input of the detector (8 bpp) and the
//! binary masks it produces (1 bpp). Other depths can be represented so
//! that callers passing the wrong kind of image get a clean error instead
//! of a misread buffer.
//!
//! # Pixel layout
//!
//! - Image data is stored in 32-bit words
//! - Every row starts on a 32-bit boundary
//! - Pixels are packed MSB to LSB within each word
//! - For 32-bit images, color order is RGBA (red in MSB)
//!
//! # Ownership model
//!
//! `Pix` uses `Arc` for efficient cloning (shared ownership).
//! To modify pixel data, copy it into a `PixMut` with [`Pix::to_mut`],
//! then convert back with `Into<Pix>`. Shared data is
//! therefore never mutated behind a caller's back.

mod access;
mod clip;
mod histogram;
pub mod rop;
pub mod tiling;

pub use access::*;
pub use rop::RopOp;
pub use tiling::PixTiling;

use crate::error::{Error, Result};
use std::sync::Arc;

/// Pixel depth (bits per pixel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PixelDepth {
    /// 1-bit binary image
    Bit1 = 1,
    /// 2-bit image (4 levels)
    Bit2 = 2,
    /// 4-bit image (16 levels)
    Bit4 = 4,
    /// 8-bit grayscale
    Bit8 = 8,
    /// 16-bit grayscale
    Bit16 = 16,
    /// 32-bit RGB or RGBA
    Bit32 = 32,
}

impl PixelDepth {
    /// Get the number of bits per pixel.
    pub fn bits(self) -> u32 {
        self as u32
    }
}

/// Internal PIX data
#[derive(Debug, Clone, PartialEq, Eq)]
struct PixData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Depth in bits per pixel
    depth: PixelDepth,
    /// Samples per pixel (1 for grayscale, 3 for RGB, 4 for RGBA)
    spp: u32,
    /// 32-bit words per line
    wpl: u32,
    /// The image data (packed 32-bit words)
    data: Vec<u32>,
}

/// PIX - Main image container
///
/// # Examples
///
/// ```
/// use textdetect_core::{Pix, PixelDepth};
///
/// // Create a new 8-bit grayscale image
/// let pix = Pix::new(640, 480, PixelDepth::Bit8).unwrap();
/// assert_eq!(pix.width(), 640);
/// assert_eq!(pix.height(), 480);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pix {
    inner: Arc<PixData>,
}

impl Pix {
    /// Create a new PIX with the specified dimensions and depth.
    ///
    /// The image data is initialized to zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0, and
    /// [`Error::AllocationFailed`] if the pixel buffer cannot be allocated.
    pub fn new(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let wpl = Self::compute_wpl(width, depth)?;
        let data_size = (wpl as usize)
            .checked_mul(height as usize)
            .ok_or(Error::AllocationFailed)?;
        let mut data = Vec::new();
        data.try_reserve_exact(data_size)
            .map_err(|_| Error::AllocationFailed)?;
        data.resize(data_size, 0u32);

        let spp = match depth {
            PixelDepth::Bit32 => 3,
            _ => 1,
        };

        Ok(Pix {
            inner: Arc::new(PixData {
                width,
                height,
                depth,
                spp,
                wpl,
                data,
            }),
        })
    }

    /// Create an 8 bpp image from row-major grayscale bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `bytes.len() != width * height`.
    pub fn from_gray_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize;
        if bytes.len() != expected {
            return Err(Error::InvalidParameter(format!(
                "expected {} bytes for {}x{} image, got {}",
                expected,
                width,
                height,
                bytes.len()
            )));
        }
        let mut pm = Pix::new(width, height, PixelDepth::Bit8)?.to_mut();
        for (y, row) in bytes.chunks_exact(width as usize).enumerate() {
            let line = pm.row_data_mut(y as u32);
            for (x, &v) in row.iter().enumerate() {
                set_data_byte(line, x as u32, v as u32);
            }
        }
        Ok(pm.into())
    }

    /// Compute words per line for given width and depth.
    #[inline]
    fn compute_wpl(width: u32, depth: PixelDepth) -> Result<u32> {
        let bits_per_line = u64::from(width) * u64::from(depth.bits());
        u32::try_from(bits_per_line.div_ceil(32)).map_err(|_| Error::AllocationFailed)
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel depth.
    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    /// Get the samples per pixel.
    #[inline]
    pub fn spp(&self) -> u32 {
        self.inner.spp
    }

    /// Get the words per line.
    #[inline]
    pub fn wpl(&self) -> u32 {
        self.inner.wpl
    }

    /// Get raw access to image data.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Get the data for a specific row.
    #[inline]
    pub fn row_data(&self, y: u32) -> &[u32] {
        let wpl = self.inner.wpl as usize;
        let start = y as usize * wpl;
        &self.inner.data[start..start + wpl]
    }

    /// Check whether two images have the same width and height.
    pub fn sizes_equal(&self, other: &Pix) -> bool {
        self.width() == other.width() && self.height() == other.height()
    }

    /// Get a mutable copy of the image.
    pub fn to_mut(&self) -> PixMut {
        PixMut {
            inner: (*self.inner).clone(),
        }
    }
}

/// Mutable PIX
///
/// Holds the image data exclusively; convert back with `Pix::from`.
#[derive(Debug)]
pub struct PixMut {
    inner: PixData,
}

impl PixMut {
    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel depth.
    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    /// Get the samples per pixel.
    #[inline]
    pub fn spp(&self) -> u32 {
        self.inner.spp
    }

    /// Set the samples per pixel.
    pub fn set_spp(&mut self, spp: u32) {
        self.inner.spp = spp;
    }

    /// Get the words per line.
    #[inline]
    pub fn wpl(&self) -> u32 {
        self.inner.wpl
    }

    /// Get raw access to image data.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Get mutable access to the raw image data.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u32] {
        &mut self.inner.data
    }

    /// Get the data for a specific row.
    #[inline]
    pub fn row_data(&self, y: u32) -> &[u32] {
        let wpl = self.inner.wpl as usize;
        let start = y as usize * wpl;
        &self.inner.data[start..start + wpl]
    }

    /// Get mutable data for a specific row.
    #[inline]
    pub fn row_data_mut(&mut self, y: u32) -> &mut [u32] {
        let wpl = self.inner.wpl as usize;
        let start = y as usize * wpl;
        &mut self.inner.data[start..start + wpl]
    }

    /// Set all pixels to the maximum value for the depth.
    pub fn set_all(&mut self) {
        self.inner.data.fill(u32::MAX);
        self.clear_pad_bits();
    }

    /// Zero the bits past the last pixel of every row.
    ///
    /// Word-level operations (fill, invert) set them; pixel counting relies
    /// on them being clear.
    pub(crate) fn clear_pad_bits(&mut self) {
        let used_bits = (u64::from(self.width()) * u64::from(self.depth().bits()) % 32) as u32;
        if used_bits == 0 {
            return;
        }
        let mask = !(u32::MAX >> used_bits);
        for y in 0..self.height() {
            if let Some(last) = self.row_data_mut(y).last_mut() {
                *last &= mask;
            }
        }
    }
}

impl From<PixMut> for Pix {
    fn from(pm: PixMut) -> Self {
        Pix {
            inner: Arc::new(pm.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pix_creation() {
        let pix = Pix::new(100, 50, PixelDepth::Bit8).unwrap();
        assert_eq!(pix.width(), 100);
        assert_eq!(pix.height(), 50);
        assert_eq!(pix.depth(), PixelDepth::Bit8);
        assert_eq!(pix.spp(), 1);
        assert_eq!(pix.wpl(), 25);
    }

    #[test]
    fn test_pix_invalid_dimensions() {
        assert!(matches!(
            Pix::new(0, 10, PixelDepth::Bit8),
            Err(Error::InvalidDimension { width: 0, height: 10 })
        ));
        assert!(Pix::new(10, 0, PixelDepth::Bit1).is_err());
    }

    #[test]
    fn test_wpl_binary() {
        assert_eq!(Pix::new(1, 1, PixelDepth::Bit1).unwrap().wpl(), 1);
        assert_eq!(Pix::new(32, 1, PixelDepth::Bit1).unwrap().wpl(), 1);
        assert_eq!(Pix::new(33, 1, PixelDepth::Bit1).unwrap().wpl(), 2);
    }

    #[test]
    fn test_from_gray_bytes() {
        let bytes: Vec<u8> = (0..12).collect();
        let pix = Pix::from_gray_bytes(4, 3, &bytes).unwrap();
        assert_eq!(pix.get_pixel(0, 0), Some(0));
        assert_eq!(pix.get_pixel(3, 2), Some(11));
        assert!(Pix::from_gray_bytes(4, 4, &bytes).is_err());
    }

    #[test]
    fn test_clone_shares_and_to_mut_copies() {
        let pix = Pix::new(4, 4, PixelDepth::Bit8).unwrap();
        let shared = pix.clone();
        let mut pm = shared.to_mut();
        pm.set_pixel(1, 1, 200).unwrap();
        let modified: Pix = pm.into();
        assert_eq!(pix.get_pixel(1, 1), Some(0));
        assert_eq!(modified.get_pixel(1, 1), Some(200));
    }

    #[test]
    fn test_set_all_leaves_pad_bits_clear() {
        let mut pm = Pix::new(33, 2, PixelDepth::Bit1).unwrap().to_mut();
        pm.set_all();
        assert_eq!(pm.row_data(0)[1], 0x8000_0000);
        let pix: Pix = pm.into();
        assert_eq!(pix.count_pixels(), 66);
    }
}
