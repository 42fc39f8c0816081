//! Region-of-interest handling
//!
//! A region restricts the analysis to the part of the raster inside a
//! polygon boundary. The boundary is a closed ring of (lon, lat)
//! vertices in the raster's coordinate reference system.

mod boundary;
mod clipper;

pub use boundary::RegionBoundary;
pub use clipper::clip_to_region;
