//! Pixa - Arrays of Pix images
//!
//! A `Pixa` pairs every image with the box that places it in a larger
//! image. The detector uses it for connected components (a cropped 1 bpp
//! mask per component, positioned in page coordinates) and for clusters.

use crate::box_::{Box, Boxa};
use crate::error::{Error, Result};
use crate::pix::Pix;

/// Array of Pix images with one placement box per image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pixa {
    pix: Vec<Pix>,
    boxa: Boxa,
}

impl Pixa {
    /// Create a new empty Pixa
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a Pixa with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pix: Vec::with_capacity(capacity),
            boxa: Boxa::with_capacity(capacity),
        }
    }

    /// Get the number of Pix images
    #[inline]
    pub fn len(&self) -> usize {
        self.pix.len()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pix.is_empty()
    }

    /// Get a reference to a Pix by index
    pub fn get(&self, index: usize) -> Option<&Pix> {
        self.pix.get(index)
    }

    /// Get the placement box of a Pix by index
    pub fn get_box(&self, index: usize) -> Option<&Box> {
        self.boxa.get(index)
    }

    /// Add a Pix with its placement box
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the box size differs from
    /// the image size.
    pub fn push_with_box(&mut self, pix: Pix, b: Box) -> Result<()> {
        if b.w as u32 != pix.width() || b.h as u32 != pix.height() {
            return Err(Error::DimensionMismatch {
                expected: (pix.width(), pix.height()),
                actual: (b.w.max(0) as u32, b.h.max(0) as u32),
            });
        }
        self.pix.push(pix);
        self.boxa.push(b);
        Ok(())
    }

    /// All images as a slice
    pub fn pix_slice(&self) -> &[Pix] {
        &self.pix
    }

    /// All placement boxes
    pub fn boxa(&self) -> &Boxa {
        &self.boxa
    }

    /// Iterate over `(pix, box)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&Pix, &Box)> {
        self.pix.iter().zip(self.boxa.iter())
    }

    /// Keep only the entries whose flag is `true`, preserving order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `keep` has a different
    /// length than the array.
    pub fn select(&self, keep: &[bool]) -> Result<Pixa> {
        if keep.len() != self.len() {
            return Err(Error::DimensionMismatch {
                expected: (self.len() as u32, 1),
                actual: (keep.len() as u32, 1),
            });
        }
        let mut out = Pixa::with_capacity(keep.iter().filter(|&&k| k).count());
        for ((pix, b), _) in self.iter().zip(keep).filter(|(_, k)| **k) {
            out.pix.push(pix.clone());
            out.boxa.push(*b);
        }
        Ok(out)
    }

    /// Append all entries of `other`.
    pub fn join(&mut self, other: &Pixa) {
        for (pix, b) in other.iter() {
            self.pix.push(pix.clone());
            self.boxa.push(*b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PixelDepth;

    fn entry(x: i32, w: u32) -> (Pix, Box) {
        (
            Pix::new(w, 2, PixelDepth::Bit1).unwrap(),
            Box::new_unchecked(x, 0, w as i32, 2),
        )
    }

    #[test]
    fn test_push_and_get() {
        let mut pixa = Pixa::new();
        let (p, b) = entry(3, 4);
        pixa.push_with_box(p, b).unwrap();
        assert_eq!(pixa.len(), 1);
        assert_eq!(pixa.get_box(0), Some(&b));
        assert_eq!(pixa.get(0).map(|p| p.width()), Some(4));
        assert!(pixa.get(1).is_none());
    }

    #[test]
    fn test_push_rejects_mismatched_box() {
        let mut pixa = Pixa::new();
        let pix = Pix::new(4, 2, PixelDepth::Bit1).unwrap();
        assert!(pixa.push_with_box(pix, Box::new_unchecked(0, 0, 5, 2)).is_err());
        assert!(pixa.is_empty());
    }

    #[test]
    fn test_select_preserves_order() {
        let mut pixa = Pixa::new();
        for x in 0..4 {
            let (p, b) = entry(x * 10, 3);
            pixa.push_with_box(p, b).unwrap();
        }
        let kept = pixa.select(&[true, false, true, false]).unwrap();
        let xs: Vec<i32> = kept.boxa().iter().map(|b| b.x).collect();
        assert_eq!(xs, vec![0, 20]);
        assert!(pixa.select(&[true]).is_err());
    }

    #[test]
    fn test_join() {
        let mut a = Pixa::new();
        let mut b = Pixa::new();
        let (p, bx) = entry(0, 2);
        a.push_with_box(p, bx).unwrap();
        let (p, bx) = entry(5, 2);
        b.push_with_box(p, bx).unwrap();
        a.join(&b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.get_box(1).map(|b| b.x), Some(5));
    }
}
