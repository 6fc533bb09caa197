//! textdetect io - Image file I/O
//!
//! PNG is the only format: it carries the 8 bpp grayscale pages the
//! detector reads, the 1 bpp masks it produces and the 32 bpp overlays
//! written for inspection.

pub mod error;
pub mod png;

pub use error::{IoError, IoResult};
pub use png::{read_png, write_png};

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use textdetect_core::Pix;

/// Read a PNG image from a file path.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Pix> {
    let file = File::open(path)?;
    read_png(BufReader::new(file))
}

/// Write an image to a file path as PNG.
pub fn write_image<P: AsRef<Path>>(pix: &Pix, path: P) -> IoResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_png(pix, &mut writer)?;
    writer.flush()?;
    Ok(())
}
