//! GeoTIFF single-band raster loading
//!
//! This module provides structures and functions for reading the pixel
//! grid, affine transform, no-data sentinel and CRS code out of
//! georeferenced TIFF and BigTIFF files.

pub mod errors;
pub mod ifd;
pub(crate) mod types;
pub mod reader;
pub mod grid;
pub mod geo;
pub mod geotags;
mod band;
pub(crate) mod constants;
pub(crate) mod compression;
mod tests;

pub use errors::{HotspotError, HotspotResult};
pub use grid::RasterGrid;
pub use ifd::{Ifd, IfdEntry};
pub use reader::RasterReader;
pub use types::RasterFile;
pub use self::geo::{GeoKeyEntry, GeoParser};
pub use geotags::{get_crs_description, get_key_name, get_tag_name};
