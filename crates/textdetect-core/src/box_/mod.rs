//! Box, Boxa - Rectangle regions
//!
//! These structures represent rectangular regions in an image: tile
//! descriptors, component bounding boxes and cluster unions.

use crate::error::{Error, Result};

/// A rectangle region
///
/// A small `Copy` type; coordinates are signed so that gap and offset
/// arithmetic between boxes never needs casts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Box {
    /// Left x coordinate
    pub x: i32,
    /// Top y coordinate
    pub y: i32,
    /// Width
    pub w: i32,
    /// Height
    pub h: i32,
}

impl Box {
    /// Create a new box
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is negative.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Result<Self> {
        if w < 0 || h < 0 {
            return Err(Error::InvalidParameter(format!(
                "box dimensions must be non-negative: w={}, h={}",
                w, h
            )));
        }
        Ok(Self { x, y, w, h })
    }

    /// Create a box without validation
    pub const fn new_unchecked(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Get the right x coordinate (exclusive)
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Get the bottom y coordinate (exclusive)
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Get the center x coordinate (integer, rounded toward the left edge)
    #[inline]
    pub fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }

    /// Get the center y coordinate (integer, rounded toward the top edge)
    #[inline]
    pub fn center_y(&self) -> i32 {
        self.y + self.h / 2
    }

    /// Get the area
    #[inline]
    pub fn area(&self) -> i64 {
        self.w as i64 * self.h as i64
    }

    /// Check if the box is empty (zero area)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Check if this box contains another box
    pub fn contains_box(&self, other: &Box) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &Box) -> Box {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Box::new_unchecked(x, y, right - x, bottom - y)
    }

    /// Clip the box to an image of the given size.
    ///
    /// Returns `None` if nothing of the box remains inside the image.
    pub fn clip(&self, width: i32, height: i32) -> Option<Box> {
        let x = self.x.max(0);
        let y = self.y.max(0);
        let right = self.right().min(width);
        let bottom = self.bottom().min(height);
        if right <= x || bottom <= y {
            return None;
        }
        Some(Box::new_unchecked(x, y, right - x, bottom - y))
    }
}

/// Array of boxes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Boxa {
    boxes: Vec<Box>,
}

impl Boxa {
    /// Create an empty Boxa
    pub fn new() -> Self {
        Self { boxes: Vec::new() }
    }

    /// Create a Boxa with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            boxes: Vec::with_capacity(capacity),
        }
    }

    /// Number of boxes
    #[inline]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Get a box by index
    pub fn get(&self, index: usize) -> Option<&Box> {
        self.boxes.get(index)
    }

    /// Append a box
    pub fn push(&mut self, b: Box) {
        self.boxes.push(b);
    }

    /// All boxes as a slice
    pub fn boxes(&self) -> &[Box] {
        &self.boxes
    }

    /// Iterate over the boxes
    pub fn iter(&self) -> impl Iterator<Item = &Box> {
        self.boxes.iter()
    }
}

impl FromIterator<Box> for Boxa {
    fn from_iter<I: IntoIterator<Item = Box>>(iter: I) -> Self {
        Self {
            boxes: iter.into_iter().collect(),
        }
    }
}
