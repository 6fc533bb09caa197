//! Tiling of an image into a regular grid
//!
//! The grid has `nx = max(1, width / sx)` columns and
//! `ny = max(1, height / sy)` rows. Every tile is `width / nx` by
//! `height / ny` pixels, except that the last column and the last row
//! absorb the remainder, so the tiles cover the image exactly once.

use super::{Pix, PixMut};
use crate::Box;
use crate::error::{Error, Result};

/// A regular grid of tiles over an image of known size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixTiling {
    width: u32,
    height: u32,
    nx: u32,
    ny: u32,
    tile_w: u32,
    tile_h: u32,
}

impl PixTiling {
    /// Build the tiling of a `width`×`height` image for a nominal tile size
    /// of `sx`×`sy`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] for an empty image and
    /// [`Error::InvalidParameter`] for a zero tile size.
    pub fn new(width: u32, height: u32, sx: u32, sy: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        if sx == 0 || sy == 0 {
            return Err(Error::InvalidParameter(format!(
                "tile size must be >= 1, got {}x{}",
                sx, sy
            )));
        }
        let nx = (width / sx).max(1);
        let ny = (height / sy).max(1);
        Ok(Self {
            width,
            height,
            nx,
            ny,
            tile_w: width / nx,
            tile_h: height / ny,
        })
    }

    /// Tiling for the size of `pix`.
    pub fn for_pix(pix: &Pix, sx: u32, sy: u32) -> Result<Self> {
        Self::new(pix.width(), pix.height(), sx, sy)
    }

    /// Number of tile columns
    #[inline]
    pub fn nx(&self) -> u32 {
        self.nx
    }

    /// Number of tile rows
    #[inline]
    pub fn ny(&self) -> u32 {
        self.ny
    }

    /// Total number of tiles
    #[inline]
    pub fn count(&self) -> usize {
        self.nx as usize * self.ny as usize
    }

    /// Rectangle covered by tile (`ix`, `iy`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if the tile does not exist.
    pub fn tile_box(&self, ix: u32, iy: u32) -> Result<Box> {
        if ix >= self.nx {
            return Err(Error::IndexOutOfBounds {
                index: ix as usize,
                len: self.nx as usize,
            });
        }
        if iy >= self.ny {
            return Err(Error::IndexOutOfBounds {
                index: iy as usize,
                len: self.ny as usize,
            });
        }
        let x = ix * self.tile_w;
        let y = iy * self.tile_h;
        let w = if ix == self.nx - 1 {
            self.width - x
        } else {
            self.tile_w
        };
        let h = if iy == self.ny - 1 {
            self.height - y
        } else {
            self.tile_h
        };
        Ok(Box::new_unchecked(x as i32, y as i32, w as i32, h as i32))
    }

    /// Iterate over all tiles in row-major order as `(ix, iy, box)`.
    pub fn tiles(&self) -> impl Iterator<Item = (u32, u32, Box)> + '_ {
        (0..self.ny).flat_map(move |iy| {
            (0..self.nx).filter_map(move |ix| self.tile_box(ix, iy).ok().map(|b| (ix, iy, b)))
        })
    }

    /// Copy tile (`ix`, `iy`) out of `pix`.
    pub fn get_tile(&self, pix: &Pix, ix: u32, iy: u32) -> Result<Pix> {
        self.check_size(pix.width(), pix.height())?;
        pix.clip_rectangle(&self.tile_box(ix, iy)?)
    }

    /// Write `tile` into `dest` at the position of tile (`ix`, `iy`).
    ///
    /// The tile replaces whatever the destination held there.
    pub fn paint_tile(&self, dest: &mut PixMut, ix: u32, iy: u32, tile: &Pix) -> Result<()> {
        self.check_size(dest.width(), dest.height())?;
        let b = self.tile_box(ix, iy)?;
        if tile.width() != b.w as u32 || tile.height() != b.h as u32 {
            return Err(Error::DimensionMismatch {
                expected: (b.w as u32, b.h as u32),
                actual: (tile.width(), tile.height()),
            });
        }
        dest.rasterop(b.x, b.y, b.w, b.h, super::RopOp::Src, tile, 0, 0)
    }

    fn check_size(&self, width: u32, height: u32) -> Result<()> {
        if width != self.width || height != self.height {
            return Err(Error::DimensionMismatch {
                expected: (self.width, self.height),
                actual: (width, height),
            });
        }
        Ok(())
    }
}
