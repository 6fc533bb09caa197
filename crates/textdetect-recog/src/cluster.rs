//! Component clustering
//!
//! Validated components are chained left to right into text lines. Each
//! component links to its nearest compatible neighbor on the right; a
//! component can be the right neighbor of at most one other component, the
//! last one to claim it. Every maximal chain is then merged into one region
//! whose mask is the union of the member masks.

use crate::error::{RecogError, RecogResult};
use crate::options::ClusterOptions;
use textdetect_core::{Box, Pix, PixelDepth, Pixa};

/// Integer ratio of the larger to the smaller of two extents.
fn size_ratio(a: i32, b: i32) -> i32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if lo <= 0 { i32::MAX } else { hi / lo }
}

/// Whether `bj` may follow `bi` on the same text line.
fn is_right_candidate(bi: &Box, bj: &Box, max_size_ratio: i32) -> bool {
    if bj.x < bi.x {
        return false;
    }
    // Vertical overlap of at least half a height in either direction
    if bj.y + bj.h / 2 < bi.y || bi.y + bi.h / 2 < bj.y {
        return false;
    }
    if size_ratio(bi.w, bj.w) > max_size_ratio || size_ratio(bi.h, bj.h) > max_size_ratio {
        return false;
    }
    bj.x - bi.right() <= 2 * bi.w.max(bj.w)
}

/// Left and right neighbor links, kept mutually consistent:
/// `right[a] == Some(b)` exactly when `left[b] == Some(a)`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Links {
    left: Vec<Option<usize>>,
    right: Vec<Option<usize>>,
}

fn link_components(boxes: &[Box], removed: &[bool], options: &ClusterOptions) -> Links {
    let n = boxes.len();
    let mut links = Links {
        left: vec![None; n],
        right: vec![None; n],
    };

    for i in 0..n {
        if removed[i] {
            continue;
        }
        let bi = &boxes[i];
        let mut best: Option<(usize, i64)> = None;
        for j in 0..n {
            if j == i || removed[j] {
                continue;
            }
            let bj = &boxes[j];
            if !is_right_candidate(bi, bj, options.max_size_ratio) {
                continue;
            }
            let dx = i64::from(bj.x - bi.right());
            let dy = i64::from(bj.y - bi.bottom());
            let dist = dx * dx + dy * dy;
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((j, dist));
            }
        }

        if let Some((j, _)) = best {
            if let Some(prev) = links.left[j] {
                links.right[prev] = None;
            }
            links.right[i] = Some(j);
            links.left[j] = Some(i);
        }
    }
    links
}

/// Members of every chain, each chain listed once, in order of its first
/// visited member.
fn walk_chains(links: &Links, removed: &[bool]) -> Vec<Vec<usize>> {
    let n = links.left.len();
    let mut visited = vec![false; n];
    let mut chains = Vec::new();

    for start in 0..n {
        if removed[start] || visited[start] {
            continue;
        }
        if links.left[start].is_none() && links.right[start].is_none() {
            continue;
        }

        let mut head = start;
        let mut steps = 0;
        while let Some(prev) = links.left[head] {
            if prev == start || steps >= n {
                break;
            }
            head = prev;
            steps += 1;
        }

        let mut members = Vec::new();
        let mut cur = Some(head);
        while let Some(k) = cur {
            if visited[k] {
                break;
            }
            visited[k] = true;
            members.push(k);
            cur = links.right[k];
        }
        chains.push(members);
    }
    chains
}

/// Merge chained components into text regions.
///
/// `removed` flags components to ignore, as returned by
/// [`validate_components`](crate::validate_components). A chain becomes a
/// region when it has at least `options.min_blobs` members and its union
/// box satisfies `2*w/h > 3`. Each region carries the union box and a 1 bpp
/// mask of that size holding every member's pixels.
///
/// # Errors
///
/// Returns [`RecogError::InvalidInput`] if `removed` does not have one
/// entry per component.
pub fn cluster_components(
    components: &Pixa,
    removed: &[bool],
    options: &ClusterOptions,
) -> RecogResult<Pixa> {
    let boxes = components.boxa().boxes();
    if removed.len() != boxes.len() {
        return Err(RecogError::InvalidInput(format!(
            "expected {} removal flags, got {}",
            boxes.len(),
            removed.len()
        )));
    }

    let links = link_components(boxes, removed, options);
    let mut clusters = Pixa::new();
    for members in walk_chains(&links, removed) {
        let Some(union) = members
            .iter()
            .map(|&k| boxes[k])
            .reduce(|a, b| a.union(&b))
        else {
            continue;
        };
        let wide_enough = union.h > 0 && 2 * union.w / union.h > 3;
        tracing::trace!(
            members = members.len(),
            x = union.x,
            y = union.y,
            w = union.w,
            h = union.h,
            wide_enough,
            "chain"
        );
        if !wide_enough || members.len() < options.min_blobs {
            continue;
        }

        let mut mask = Pix::new(union.w as u32, union.h as u32, PixelDepth::Bit1)?.to_mut();
        for &k in &members {
            let (pix, b) = (&components.pix_slice()[k], &boxes[k]);
            mask.paint(b.x - union.x, b.y - union.y, pix)?;
        }
        clusters.push_with_box(mask.into(), union)?;
    }
    Ok(clusters)
}
