//! Synthetic test pages
//!
//! The detector's behavior is easiest to pin down on hand-built pages:
//! flat backgrounds with solid rectangular "glyphs" at known positions.

use crate::error::TestResult;
use textdetect_core::{Box, Pix, PixMut, PixelDepth};

/// An 8 bpp page filled with a single gray value.
pub fn uniform_page(width: u32, height: u32, val: u8) -> TestResult<Pix> {
    let mut pm = Pix::new(width, height, PixelDepth::Bit8)?.to_mut();
    if val != 0 {
        for y in 0..height {
            for x in 0..width {
                pm.set_pixel_unchecked(x, y, val as u32);
            }
        }
    }
    Ok(pm.into())
}

/// Fill a rectangle with `val`, clipped to the image.
pub fn draw_block(pm: &mut PixMut, b: &Box, val: u32) {
    let Some(b) = b.clip(pm.width() as i32, pm.height() as i32) else {
        return;
    };
    for y in b.y..b.bottom() {
        for x in b.x..b.right() {
            pm.set_pixel_unchecked(x as u32, y as u32, val);
        }
    }
}

/// A page of `background` with every block painted in `foreground`.
pub fn page_with_blocks(
    width: u32,
    height: u32,
    background: u8,
    foreground: u8,
    blocks: &[Box],
) -> TestResult<Pix> {
    let mut pm = uniform_page(width, height, background)?.to_mut();
    for b in blocks {
        draw_block(&mut pm, b, foreground as u32);
    }
    Ok(pm.into())
}

/// `count` blocks of `w`×`h` along one row, starting at (`x0`, `y`) and
/// spaced `pitch` pixels apart (left edge to left edge).
pub fn blob_row(x0: i32, y: i32, w: i32, h: i32, pitch: i32, count: usize) -> Vec<Box> {
    (0..count as i32)
        .map(|i| Box::new_unchecked(x0 + i * pitch, y, w, h))
        .collect()
}

/// Photometric complement of an 8 bpp page.
pub fn complement(pix: &Pix) -> Pix {
    pix.invert()
}
