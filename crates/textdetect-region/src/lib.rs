//! textdetect-region - Connected component extraction
//!
//! Splits a binary mask into its connected foreground regions, each
//! returned as a bounding box plus a cropped mask holding only that
//! region's pixels.
//!
//! # Examples
//!
//! ```
//! use textdetect_region::{find_connected_components, ConnectivityType};
//! use textdetect_core::{Pix, PixelDepth};
//!
//! let mut pix_mut = Pix::new(100, 100, PixelDepth::Bit1).unwrap().to_mut();
//! pix_mut.set_pixel(10, 10, 1).unwrap();
//! pix_mut.set_pixel(11, 10, 1).unwrap();
//! pix_mut.set_pixel(50, 50, 1).unwrap();
//! let pix: Pix = pix_mut.into();
//!
//! let components = find_connected_components(&pix, ConnectivityType::FourWay).unwrap();
//! assert_eq!(components.len(), 2);
//! ```

pub mod conncomp;
pub mod error;

pub use conncomp::{
    ConnectedComponent, ConnectivityType, conncomp_pixa, count_connected_components,
    find_connected_components,
};
pub use error::{RegionError, RegionResult};
