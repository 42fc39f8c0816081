//! Hotspot extraction
//!
//! Scans the grid for cells whose value exceeds the threshold and
//! converts each qualifying cell index to a geographic coordinate.

use log::debug;

use crate::raster::grid::RasterGrid;

/// One detected hotspot: the geographic coordinate of a grid cell
/// whose value exceeds the threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hotspot {
    /// Latitude (transform y axis)
    pub lat: f64,
    /// Longitude (transform x axis)
    pub lon: f64,
}

/// Extract the hotspots of a grid for a given threshold
///
/// A cell qualifies when its value is valid (not the sentinel, finite)
/// and strictly greater than the threshold; a cell exactly equal to the
/// threshold is excluded, which keeps a flood of threshold-valued cells
/// out of the result. Coordinates are taken at the cell center; the
/// transform yields (x=lon, y=lat) and the output swaps to (lat, lon).
///
/// Output ordering is row-major ascending with ties broken by ascending
/// column, so identical inputs always produce identical output.
pub fn extract_hotspots(grid: &RasterGrid, threshold: f64) -> Vec<Hotspot> {
    let mut hotspots = Vec::new();

    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let value = grid.get(row, col);
            if !grid.is_valid(value) || value <= threshold {
                continue;
            }

            let (x, y) = grid.transform.pixel_to_geo(row, col);
            hotspots.push(Hotspot { lat: y, lon: x });
        }
    }

    debug!("Extracted {} hotspots above threshold {}", hotspots.len(), threshold);
    hotspots
}
