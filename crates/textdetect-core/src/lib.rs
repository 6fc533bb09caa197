//! textdetect core - Basic data structures for text-region detection
//!
//! - [`Pix`] / [`PixMut`] - Packed image container (immutable / mutable)
//! - [`Box`] / [`Boxa`] - Rectangle regions
//! - [`Numa`] - Numeric arrays, used for intensity histograms
//! - [`Pixa`] - Arrays of images with placement boxes
//! - [`PixTiling`] - Regular tile grid over an image

pub mod box_;
pub mod error;
pub mod numa;
pub mod pix;
pub mod pixa;

pub use box_::{Box, Boxa};
pub use error::{Error, Result};
pub use numa::{HistogramStats, Numa, SplitDistribution};
pub use pix::{Pix, PixMut, PixTiling, PixelDepth, RopOp};
pub use pixa::Pixa;

/// Helpers for 32-bit RGBA pixels.
///
/// 32-bit pixels are stored as `0xRRGGBBAA` (red in MSB, alpha in LSB).
pub mod color {
    /// Shift amounts for extracting color channels
    pub const RED_SHIFT: u32 = 24;
    pub const GREEN_SHIFT: u32 = 16;
    pub const BLUE_SHIFT: u32 = 8;
    pub const ALPHA_SHIFT: u32 = 0;

    /// Compose an opaque RGBA pixel from RGB components.
    #[inline]
    pub fn compose_rgb(r: u8, g: u8, b: u8) -> u32 {
        ((r as u32) << RED_SHIFT) | ((g as u32) << GREEN_SHIFT) | ((b as u32) << BLUE_SHIFT) | 0xff
    }

    /// Extract RGB components from a 32-bit pixel.
    #[inline]
    pub fn extract_rgb(pixel: u32) -> (u8, u8, u8) {
        (
            ((pixel >> RED_SHIFT) & 0xff) as u8,
            ((pixel >> GREEN_SHIFT) & 0xff) as u8,
            ((pixel >> BLUE_SHIFT) & 0xff) as u8,
        )
    }

    /// Extract the alpha component from a 32-bit pixel.
    #[inline]
    pub fn alpha(pixel: u32) -> u8 {
        ((pixel >> ALPHA_SHIFT) & 0xff) as u8
    }

}
