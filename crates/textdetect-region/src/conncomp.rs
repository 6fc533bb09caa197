//! Connected component analysis
//!
//! Components are found with a two-pass union-find labeling. The first
//! pass assigns provisional labels and records equivalences between
//! touching runs; the second resolves every pixel to its root and numbers
//! components in the raster order of their first (topmost, then leftmost)
//! pixel. All outputs of this module follow that order.

use crate::error::{RegionError, RegionResult};
use textdetect_core::pix::{get_data_bit, set_data_bit_val};
use textdetect_core::{Box, Boxa, Pix, PixelDepth, Pixa};

/// Connectivity type for component analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityType {
    /// 4-way connectivity (up, down, left, right)
    #[default]
    FourWay,
    /// 8-way connectivity (includes diagonals)
    EightWay,
}

/// A connected component in an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedComponent {
    /// Label, counting from 1 in raster order of the first pixel
    pub label: u32,
    /// Number of pixels in this component
    pub pixel_count: u32,
    /// Bounding box of this component
    pub bounds: Box,
}

impl ConnectedComponent {
    /// Create a new connected component
    pub fn new(label: u32, pixel_count: u32, bounds: Box) -> Self {
        Self {
            label,
            pixel_count,
            bounds,
        }
    }
}

/// Disjoint-set forest over provisional labels.
///
/// Roots are always the smallest label of their set, so resolution does
/// not depend on the order unions were made in.
struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn new() -> Self {
        // Label 0 is background
        Self { parent: vec![0] }
    }

    fn make_set(&mut self) -> u32 {
        let label = self.parent.len() as u32;
        self.parent.push(label);
        label
    }

    fn find(&mut self, mut x: u32) -> u32 {
        while self.parent[x as usize] != x {
            let grand = self.parent[self.parent[x as usize] as usize];
            self.parent[x as usize] = grand;
            x = grand;
        }
        x
    }

    fn union(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra < rb {
            self.parent[rb as usize] = ra;
        } else if rb < ra {
            self.parent[ra as usize] = rb;
        }
    }
}

/// Per-pixel component indices (0 = background, `k` = k-th component)
/// together with the component summaries.
struct Labeling {
    width: u32,
    labels: Vec<u32>,
    components: Vec<ConnectedComponent>,
}

fn check_binary(pix: &Pix) -> RegionResult<()> {
    if pix.depth() != PixelDepth::Bit1 {
        return Err(RegionError::UnsupportedDepth {
            expected: "1 bpp",
            actual: pix.depth().bits(),
        });
    }
    Ok(())
}

fn label_pixels(pix: &Pix, connectivity: ConnectivityType) -> RegionResult<Labeling> {
    check_binary(pix)?;
    let w = pix.width() as usize;
    let h = pix.height() as usize;
    let eight = connectivity == ConnectivityType::EightWay;

    let mut labels = vec![0u32; w * h];
    let mut uf = UnionFind::new();

    for y in 0..h {
        let line = pix.row_data(y as u32);
        for x in 0..w {
            if get_data_bit(line, x as u32) == 0 {
                continue;
            }
            let idx = y * w + x;
            let mut neighbors = [0u32; 4];
            neighbors[0] = if x > 0 { labels[idx - 1] } else { 0 };
            if y > 0 {
                let up = idx - w;
                neighbors[1] = labels[up];
                if eight {
                    neighbors[2] = if x > 0 { labels[up - 1] } else { 0 };
                    neighbors[3] = if x + 1 < w { labels[up + 1] } else { 0 };
                }
            }

            let mut label = 0;
            for &n in neighbors.iter().filter(|&&n| n != 0) {
                if label == 0 {
                    label = n;
                } else {
                    uf.union(label, n);
                }
            }
            labels[idx] = if label == 0 { uf.make_set() } else { label };
        }
    }

    // Resolve roots; number components by first appearance in raster order
    let mut index_of_root = vec![0u32; uf.parent.len()];
    let mut extents: Vec<(u32, i32, i32, i32, i32)> = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            if labels[idx] == 0 {
                continue;
            }
            let root = uf.find(labels[idx]) as usize;
            if index_of_root[root] == 0 {
                extents.push((0, x as i32, y as i32, x as i32, y as i32));
                index_of_root[root] = extents.len() as u32;
            }
            let k = index_of_root[root];
            labels[idx] = k;
            let e = &mut extents[k as usize - 1];
            e.0 += 1;
            e.1 = e.1.min(x as i32);
            e.3 = e.3.max(x as i32);
            e.4 = y as i32;
        }
    }

    let components = extents
        .into_iter()
        .enumerate()
        .map(|(i, (count, x0, y0, x1, y1))| {
            ConnectedComponent::new(
                i as u32 + 1,
                count,
                Box::new_unchecked(x0, y0, x1 - x0 + 1, y1 - y0 + 1),
            )
        })
        .collect();

    Ok(Labeling {
        width: pix.width(),
        labels,
        components,
    })
}

/// Find all connected components in a binary image
///
/// Returns one entry per component, with label, pixel count and bounding
/// box, in raster order of each component's first pixel.
///
/// # Errors
///
/// Returns [`RegionError::UnsupportedDepth`] if the image is not 1 bpp.
pub fn find_connected_components(
    pix: &Pix,
    connectivity: ConnectivityType,
) -> RegionResult<Vec<ConnectedComponent>> {
    Ok(label_pixels(pix, connectivity)?.components)
}

/// Count the connected components in a binary image
pub fn count_connected_components(
    pix: &Pix,
    connectivity: ConnectivityType,
) -> RegionResult<usize> {
    Ok(label_pixels(pix, connectivity)?.components.len())
}

/// Extract every connected component as a bounding box plus a cropped
/// 1 bpp mask.
///
/// Each mask has the size of its box and holds only the pixels of its own
/// component, even where another component's pixels fall inside the box.
/// The returned `Boxa` is the same as the `Pixa`'s boxes.
///
/// # Errors
///
/// Returns [`RegionError::UnsupportedDepth`] if the image is not 1 bpp.
pub fn conncomp_pixa(pix: &Pix, connectivity: ConnectivityType) -> RegionResult<(Boxa, Pixa)> {
    let Labeling {
        width,
        labels,
        components,
    } = label_pixels(pix, connectivity)?;

    let mut masks = components
        .iter()
        .map(|c| Ok(Pix::new(c.bounds.w as u32, c.bounds.h as u32, PixelDepth::Bit1)?.to_mut()))
        .collect::<RegionResult<Vec<_>>>()?;

    let w = width as usize;
    for (idx, &k) in labels.iter().enumerate() {
        if k == 0 {
            continue;
        }
        let b = &components[k as usize - 1].bounds;
        let (x, y) = ((idx % w) as i32, (idx / w) as i32);
        let mask = &mut masks[k as usize - 1];
        set_data_bit_val(mask.row_data_mut((y - b.y) as u32), (x - b.x) as u32);
    }

    let boxa: Boxa = components.iter().map(|c| c.bounds).collect();
    let mut pixa = Pixa::with_capacity(components.len());
    for (mask, c) in masks.into_iter().zip(&components) {
        pixa.push_with_box(mask.into(), c.bounds)?;
    }
    Ok((boxa, pixa))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary(width: u32, height: u32, on: &[(u32, u32)]) -> Pix {
        let mut pm = Pix::new(width, height, PixelDepth::Bit1).unwrap().to_mut();
        for &(x, y) in on {
            pm.set_pixel(x, y, 1).unwrap();
        }
        pm.into()
    }

    #[test]
    fn test_diagonal_pixels_depend_on_connectivity() {
        let pix = binary(4, 4, &[(0, 0), (1, 1), (2, 2)]);
        assert_eq!(
            count_connected_components(&pix, ConnectivityType::FourWay).unwrap(),
            3
        );
        assert_eq!(
            count_connected_components(&pix, ConnectivityType::EightWay).unwrap(),
            1
        );
    }

    #[test]
    fn test_u_shape_merges_into_one() {
        // Two arms that only join at the bottom row
        let pix = binary(
            3,
            3,
            &[(0, 0), (2, 0), (0, 1), (2, 1), (0, 2), (1, 2), (2, 2)],
        );
        let comps = find_connected_components(&pix, ConnectivityType::FourWay).unwrap();
        assert_eq!(comps.len(), 1);
        assert_eq!(comps[0].pixel_count, 7);
        assert_eq!(comps[0].bounds, Box::new_unchecked(0, 0, 3, 3));
    }

    #[test]
    fn test_raster_order_of_first_pixel() {
        // The component whose first pixel is topmost comes first even though
        // the other one extends further left.
        let pix = binary(6, 4, &[(4, 0), (4, 1), (0, 2), (1, 2)]);
        let comps = find_connected_components(&pix, ConnectivityType::FourWay).unwrap();
        assert_eq!(comps.len(), 2);
        assert_eq!(comps[0].bounds, Box::new_unchecked(4, 0, 1, 2));
        assert_eq!(comps[1].bounds, Box::new_unchecked(0, 2, 2, 1));
        assert_eq!(comps[1].label, 2);
    }

    #[test]
    fn test_cropped_mask_excludes_neighbors() {
        // An L whose box also contains an unrelated pixel
        let pix = binary(5, 5, &[(0, 0), (0, 1), (0, 2), (1, 2), (2, 2), (2, 0)]);
        let (boxa, pixa) = conncomp_pixa(&pix, ConnectivityType::FourWay).unwrap();
        assert_eq!(boxa.len(), 2);
        assert_eq!(pixa.len(), 2);
        assert_eq!(boxa.get(0), Some(&Box::new_unchecked(0, 0, 3, 3)));
        let l_mask = pixa.get(0).unwrap();
        assert_eq!(l_mask.count_pixels(), 5);
        assert_eq!(l_mask.get_pixel(2, 0), Some(0));
        assert_eq!(pixa.get(1).unwrap().count_pixels(), 1);
    }

    #[test]
    fn test_empty_mask_has_no_components() {
        let pix = binary(10, 10, &[]);
        let (boxa, pixa) = conncomp_pixa(&pix, ConnectivityType::FourWay).unwrap();
        assert!(boxa.is_empty());
        assert!(pixa.is_empty());
    }

    #[test]
    fn test_rejects_gray_input() {
        let pix = Pix::new(4, 4, PixelDepth::Bit8).unwrap();
        assert!(matches!(
            find_connected_components(&pix, ConnectivityType::FourWay),
            Err(RegionError::UnsupportedDepth { actual: 8, .. })
        ));
    }
}
