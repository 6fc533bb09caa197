//! Raster operations
//!
//! Combining a rectangle of one image into another, used to composite
//! component masks into a cluster mask and to paint binarized tiles into
//! full-page masks.

use super::{Pix, PixMut};
use crate::error::{Error, Result};

/// Raster operation applied per pixel as `dst = op(dst, src)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RopOp {
    /// Copy the source
    Src,
    /// OR: foreground in either image
    Paint,
}

impl RopOp {
    #[inline]
    fn apply(self, d: u32, s: u32) -> u32 {
        match self {
            RopOp::Src => s,
            RopOp::Paint => d | s,
        }
    }
}

impl PixMut {
    /// Combine a `w`×`h` rectangle of `src` at (`sx`, `sy`) into this image
    /// at (`dx`, `dy`).
    ///
    /// The rectangle is clipped against both images; pixels falling
    /// outside either one are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleDepths`] if the depths differ.
    #[allow(clippy::too_many_arguments)]
    pub fn rasterop(
        &mut self,
        dx: i32,
        dy: i32,
        w: i32,
        h: i32,
        op: RopOp,
        src: &Pix,
        sx: i32,
        sy: i32,
    ) -> Result<()> {
        if self.depth() != src.depth() {
            return Err(Error::IncompatibleDepths(
                self.depth().bits(),
                src.depth().bits(),
            ));
        }
        // Clip the rectangle so that both source and destination stay inside
        let i0 = 0.max(-dx).max(-sx);
        let j0 = 0.max(-dy).max(-sy);
        let i1 = w
            .min(self.width() as i32 - dx)
            .min(src.width() as i32 - sx);
        let j1 = h
            .min(self.height() as i32 - dy)
            .min(src.height() as i32 - sy);

        for j in j0..j1 {
            for i in i0..i1 {
                let s = src.get_pixel_unchecked((sx + i) as u32, (sy + j) as u32);
                let (x, y) = ((dx + i) as u32, (dy + j) as u32);
                let d = super::access::get_pixel_from_line(self.row_data(y), x, self.depth());
                self.set_pixel_unchecked(x, y, op.apply(d, s));
            }
        }
        Ok(())
    }

    /// Paint all of `src` into this image with its origin at (`dx`, `dy`).
    pub fn paint(&mut self, dx: i32, dy: i32, src: &Pix) -> Result<()> {
        self.rasterop(
            dx,
            dy,
            src.width() as i32,
            src.height() as i32,
            RopOp::Paint,
            src,
            0,
            0,
        )
    }
}

impl Pix {
    /// Photometric inversion: every pixel `v` becomes `max - v`.
    ///
    /// For an 8 bpp image this is `255 - v`; for a binary mask it swaps
    /// foreground and background.
    pub fn invert(&self) -> Pix {
        let mut pm = self.to_mut();
        for word in pm.data_mut() {
            *word = !*word;
        }
        pm.clear_pad_bits();
        pm.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PixelDepth;

    fn binary_with(width: u32, height: u32, on: &[(u32, u32)]) -> Pix {
        let mut pm = Pix::new(width, height, PixelDepth::Bit1).unwrap().to_mut();
        for &(x, y) in on {
            pm.set_pixel(x, y, 1).unwrap();
        }
        pm.into()
    }

    #[test]
    fn test_paint_ors_at_offset() {
        let src = binary_with(2, 2, &[(0, 0), (1, 1)]);
        let mut dst = binary_with(5, 5, &[(4, 4)]).to_mut();
        dst.paint(2, 3, &src).unwrap();
        let dst: Pix = dst.into();
        assert_eq!(dst.get_pixel(2, 3), Some(1));
        assert_eq!(dst.get_pixel(3, 4), Some(1));
        assert_eq!(dst.get_pixel(4, 4), Some(1));
        assert_eq!(dst.count_pixels(), 3);
    }

    #[test]
    fn test_rasterop_clips() {
        let src = binary_with(4, 4, &[(0, 0), (3, 3)]);
        let mut dst = Pix::new(3, 3, PixelDepth::Bit1).unwrap().to_mut();
        dst.paint(-1, -1, &src).unwrap();
        let dst: Pix = dst.into();
        // (0,0) of src falls outside; (3,3) lands at (2,2)
        assert_eq!(dst.count_pixels(), 1);
        assert_eq!(dst.get_pixel(2, 2), Some(1));
    }

    #[test]
    fn test_rasterop_ops() {
        let a = binary_with(2, 1, &[(0, 0), (1, 0)]);
        let b = binary_with(2, 1, &[(1, 0)]);

        let mut p = b.to_mut();
        p.rasterop(0, 0, 2, 1, RopOp::Paint, &a, 0, 0).unwrap();
        assert_eq!(Pix::from(p), a);

        let mut c = a.to_mut();
        c.rasterop(0, 0, 2, 1, RopOp::Src, &b, 0, 0).unwrap();
        let c: Pix = c.into();
        assert_eq!(c, b);
    }

    #[test]
    fn test_rasterop_depth_mismatch() {
        let gray = Pix::new(2, 2, PixelDepth::Bit8).unwrap();
        let mut bin = Pix::new(2, 2, PixelDepth::Bit1).unwrap().to_mut();
        assert!(bin.paint(0, 0, &gray).is_err());
    }

    #[test]
    fn test_invert_gray_and_binary() {
        let gray = Pix::from_gray_bytes(3, 1, &[0, 100, 255]).unwrap();
        let inv = gray.invert();
        assert_eq!(inv.get_pixel(0, 0), Some(255));
        assert_eq!(inv.get_pixel(1, 0), Some(155));
        assert_eq!(inv.get_pixel(2, 0), Some(0));

        let bin = binary_with(35, 1, &[(3, 0)]);
        assert_eq!(bin.invert().count_pixels(), 34);
        assert_eq!(bin.invert().invert(), bin);
    }
}
