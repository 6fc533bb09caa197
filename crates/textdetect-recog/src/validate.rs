//! Component validation
//!
//! Two passes over the connected components of a threshold mask:
//!
//! 1. Shape: drop components that are too wide, too tall or too small to
//!    be a glyph.
//! 2. Neighbors: drop components that have no similar-sized neighbor close
//!    by on roughly the same line. Text comes in runs; isolated blobs are
//!    usually noise or graphics.
//!
//! All arithmetic is on integers. The neighbor pass considers only the
//! survivors of the shape pass, and its own removals do not influence
//! other components within the pass. It compares every pair, so it is
//! quadratic in the number of components.

use crate::error::RecogResult;
use crate::options::ValidateOptions;
use textdetect_core::{Box, Pixa};

/// Shape pass. Returns one "removed" flag per component.
pub fn shape_filter(components: &Pixa, options: &ValidateOptions) -> Vec<bool> {
    components
        .boxa()
        .iter()
        .map(|b| {
            if b.h <= 0 {
                return true;
            }
            let r = 10 * b.w / b.h;
            r > options.max_aspect_x10 || r < options.min_aspect_x10 || b.area() < options.min_blob_area
        })
        .collect()
}

/// Whether `j` is a plausible neighbor glyph of `i`.
fn is_compatible_neighbor(bi: &Box, bj: &Box) -> bool {
    if bj.h <= 0 {
        return false;
    }
    let ratio_h = 2 * bi.h / bj.h;
    if !(1..=4).contains(&ratio_h) {
        return false;
    }
    let dx = (bi.center_x() - bj.center_x()).abs();
    if dx > 2 * bi.w.max(bj.w) {
        return false;
    }
    let dy = 2 * (bi.center_y() - bj.center_y()).abs();
    dy <= bi.h.max(bj.h)
}

/// Neighbor pass on top of the shape pass result.
///
/// Returns the combined "removed" flags: everything `removed` already
/// marks, plus every survivor without a compatible neighbor among the
/// other survivors.
pub fn neighbor_filter(components: &Pixa, removed: &[bool]) -> Vec<bool> {
    let boxes = components.boxa().boxes();
    let n = boxes.len().min(removed.len());
    let mut out = removed.to_vec();
    for i in 0..n {
        if removed[i] {
            continue;
        }
        let has_neighbor = (0..n)
            .filter(|&j| j != i && !removed[j])
            .any(|j| is_compatible_neighbor(&boxes[i], &boxes[j]));
        if !has_neighbor {
            out[i] = true;
        }
    }
    out
}

/// Run both passes. Returns one "removed" flag per component; nothing is
/// deleted from `components`.
pub fn validate_components(components: &Pixa, options: &ValidateOptions) -> Vec<bool> {
    let removed = shape_filter(components, options);
    neighbor_filter(components, &removed)
}

/// The components not flagged as removed, in their original order.
pub fn select_valid(components: &Pixa, removed: &[bool]) -> RecogResult<Pixa> {
    let keep: Vec<bool> = removed.iter().map(|&r| !r).collect();
    Ok(components.select(&keep)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use textdetect_core::{Pix, PixelDepth};

    fn pixa_of(boxes: &[(i32, i32, i32, i32)]) -> Pixa {
        let mut pixa = Pixa::new();
        for &(x, y, w, h) in boxes {
            let pix = Pix::new(w as u32, h as u32, PixelDepth::Bit1).unwrap();
            pixa.push_with_box(pix, Box::new_unchecked(x, y, w, h)).unwrap();
        }
        pixa
    }

    #[test]
    fn test_shape_filter_aspect_and_area() {
        let pixa = pixa_of(&[
            (0, 0, 8, 12),  // r = 6, kept
            (0, 0, 30, 10), // r = 30, too wide
            (0, 0, 1, 20),  // r = 0, too tall
            (0, 0, 4, 4),   // area 16, too small
            (0, 0, 20, 10), // r = 20, kept at the bound
        ]);
        let removed = shape_filter(&pixa, &ValidateOptions::default());
        assert_eq!(removed, vec![false, true, true, true, false]);
    }

    #[test]
    fn test_isolated_component_is_removed() {
        let pixa = pixa_of(&[(10, 10, 10, 10)]);
        assert_eq!(validate_components(&pixa, &ValidateOptions::default()), vec![true]);
    }

    #[test]
    fn test_neighbors_on_a_line_survive() {
        let pixa = pixa_of(&[(10, 10, 8, 12), (22, 10, 8, 12), (200, 10, 8, 12)]);
        let removed = validate_components(&pixa, &ValidateOptions::default());
        assert_eq!(removed, vec![false, false, true]);
    }

    #[test]
    fn test_neighbor_rules() {
        let a = Box::new_unchecked(0, 0, 8, 12);
        // Height ratio 2*12/30 = 0 fails
        assert!(!is_compatible_neighbor(&a, &Box::new_unchecked(10, 0, 8, 30)));
        // Centers 16 apart, 2*max(w) = 16 passes; 17 fails
        assert!(is_compatible_neighbor(&a, &Box::new_unchecked(16, 0, 8, 12)));
        assert!(!is_compatible_neighbor(&a, &Box::new_unchecked(17, 0, 8, 12)));
        // Vertical offset 6: 2*6 = 12 <= 12 passes; 7 fails
        assert!(is_compatible_neighbor(&a, &Box::new_unchecked(10, 6, 8, 12)));
        assert!(!is_compatible_neighbor(&a, &Box::new_unchecked(10, 7, 8, 12)));
    }

    #[test]
    fn test_shape_rejects_are_not_neighbors() {
        // The wide bar would be a neighbor by position, but the shape pass
        // removed it first.
        let pixa = pixa_of(&[(10, 10, 8, 12), (14, 10, 40, 12)]);
        let removed = validate_components(&pixa, &ValidateOptions::default());
        assert_eq!(removed, vec![true, true]);
    }

    #[test]
    fn test_neighbor_pass_is_not_iterated() {
        // The height rule is one-sided: the tall glyph accepts the short one
        // (2*12/5 = 4) but not the other way round (2*5/12 = 0). The short
        // one is removed, and the tall one still counts it as its neighbor.
        let pixa = pixa_of(&[(0, 0, 8, 12), (8, 3, 5, 5)]);
        let removed = validate_components(&pixa, &ValidateOptions::default());
        assert_eq!(removed, vec![false, true]);
    }

    #[test]
    fn test_select_valid_keeps_order() {
        let pixa = pixa_of(&[(0, 0, 8, 12), (12, 0, 8, 12), (100, 0, 8, 12)]);
        let removed = validate_components(&pixa, &ValidateOptions::default());
        assert_eq!(removed, vec![false, false, true]);
        let kept = select_valid(&pixa, &removed).unwrap();
        assert_eq!(kept.len(), 2);
        assert_eq!(kept.get_box(1).map(|b| b.x), Some(12));
    }
}
