//! Debug artifacts
//!
//! With debugging on, the detector hands its intermediate images to a
//! [`DebugSink`]: the input, both threshold masks, a component overlay per
//! polarity before and after validation, and the final region overlay.
//! Every artifact of one detection carries the same run id (seconds since
//! the Unix epoch when the run started).

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::RecogResult;
use textdetect_core::color::compose_rgb;
use textdetect_core::pix::get_data_bit;
use textdetect_core::{Pix, PixelDepth, Pixa};
use textdetect_io::IoResult;

/// Receiver of intermediate images
pub trait DebugSink: Send + Sync {
    /// Store one artifact.
    fn write_pix(&self, run_id: u64, tag: &str, pix: &Pix) -> IoResult<()>;
}

impl<T: DebugSink + ?Sized> DebugSink for Arc<T> {
    fn write_pix(&self, run_id: u64, tag: &str, pix: &Pix) -> IoResult<()> {
        (**self).write_pix(run_id, tag, pix)
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DebugSink for NullSink {
    fn write_pix(&self, _run_id: u64, _tag: &str, _pix: &Pix) -> IoResult<()> {
        Ok(())
    }
}

/// Writes each artifact as `<dir>/<run>_<tag>.png`
#[derive(Debug, Clone)]
pub struct PngDirSink {
    dir: PathBuf,
}

impl PngDirSink {
    /// Sink writing into `dir`, which is created on first use.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Target directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path an artifact is written to
    pub fn artifact_path(&self, run_id: u64, tag: &str) -> PathBuf {
        self.dir.join(format!("{}_{}.png", run_id, tag))
    }
}

impl DebugSink for PngDirSink {
    fn write_pix(&self, run_id: u64, tag: &str, pix: &Pix) -> IoResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        textdetect_io::write_image(pix, self.artifact_path(run_id, tag))
    }
}

/// Keeps artifacts in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: Mutex<Vec<(u64, String, Pix)>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored artifacts
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True if nothing has been stored
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Tags in the order they were written
    pub fn tags(&self) -> Vec<String> {
        self.lock().iter().map(|(_, tag, _)| tag.clone()).collect()
    }

    /// Distinct run ids in the order they first appeared
    pub fn run_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = Vec::new();
        for (id, _, _) in self.lock().iter() {
            if !ids.contains(id) {
                ids.push(*id);
            }
        }
        ids
    }

    /// The most recent artifact stored under `tag`
    pub fn get(&self, tag: &str) -> Option<Pix> {
        self.lock()
            .iter()
            .rev()
            .find(|(_, t, _)| t == tag)
            .map(|(_, _, pix)| pix.clone())
    }

    /// Remove and return everything stored so far
    pub fn take(&self) -> Vec<(u64, String, Pix)> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(u64, String, Pix)>> {
        self.artifacts.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DebugSink for MemorySink {
    fn write_pix(&self, run_id: u64, tag: &str, pix: &Pix) -> IoResult<()> {
        self.lock().push((run_id, tag.to_string(), pix.clone()));
        Ok(())
    }
}

/// Run id for a new detection
pub fn new_run_id() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

const PALETTE: [(u8, u8, u8); 8] = [
    (230, 25, 75),
    (60, 180, 75),
    (0, 130, 200),
    (245, 130, 48),
    (145, 30, 180),
    (70, 240, 240),
    (240, 50, 230),
    (128, 128, 0),
];

/// Paint every component's pixels at its box onto a white 32 bpp page of
/// `width` x `height`, cycling through a fixed palette.
pub fn render_components(components: &Pixa, width: u32, height: u32) -> RecogResult<Pix> {
    let mut page = Pix::new(width, height, PixelDepth::Bit32)?.to_mut();
    let white = compose_rgb(255, 255, 255);
    for y in 0..height {
        for x in 0..width {
            page.set_pixel_unchecked(x, y, white);
        }
    }

    for (i, (mask, b)) in components.iter().enumerate() {
        let (r, g, bl) = PALETTE[i % PALETTE.len()];
        let color = compose_rgb(r, g, bl);
        for my in 0..mask.height() {
            let line = mask.row_data(my);
            let py = b.y + my as i32;
            if py < 0 || py >= height as i32 {
                continue;
            }
            for mx in 0..mask.width() {
                let px = b.x + mx as i32;
                if px < 0 || px >= width as i32 || get_data_bit(line, mx) == 0 {
                    continue;
                }
                page.set_pixel_unchecked(px as u32, py as u32, color);
            }
        }
    }
    Ok(page.into())
}
