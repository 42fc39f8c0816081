//! Hotspot mask rendering
//!
//! Renders the detection result as a grayscale image: no-data cells are
//! black, valid cells dark gray, hotspot cells white. A quick visual
//! stand-in for the interactive heat layer the map front-end draws.

use image::{GrayImage, Luma};
use log::info;

use crate::raster::errors::{HotspotError, HotspotResult};
use crate::raster::grid::RasterGrid;

/// Gray level for valid, non-hotspot cells
const VALID_LEVEL: u8 = 64;
/// Gray level for hotspot cells
const HOTSPOT_LEVEL: u8 = 255;

/// Render the hotspot mask for a grid and threshold
///
/// A `None` threshold (no valid data) produces an all-black mask.
pub fn render_hotspot_mask(grid: &RasterGrid, threshold: Option<f64>) -> GrayImage {
    let mut mask = GrayImage::new(grid.cols as u32, grid.rows as u32);

    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let value = grid.get(row, col);
            let level = if !grid.is_valid(value) {
                0
            } else {
                match threshold {
                    Some(t) if value > t => HOTSPOT_LEVEL,
                    _ => VALID_LEVEL,
                }
            };
            mask.put_pixel(col as u32, row as u32, Luma([level]));
        }
    }

    mask
}

/// Render and save the hotspot mask as an image file
pub fn save_hotspot_mask(path: &str, grid: &RasterGrid, threshold: Option<f64>) -> HotspotResult<()> {
    let mask = render_hotspot_mask(grid, threshold);
    mask.save(path)
        .map_err(|e| HotspotError::GenericError(format!("Failed to save mask image: {}", e)))?;

    info!("Wrote hotspot mask to {}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::GeoTransform;

    #[test]
    fn test_mask_levels() {
        let data = vec![1.0, 2.0, -9999.0, 100.0];
        let grid = RasterGrid::from_data(2, 2, data, GeoTransform::default(), -9999.0);

        let mask = render_hotspot_mask(&grid, Some(27.25));
        assert_eq!(mask.get_pixel(0, 0)[0], VALID_LEVEL);
        assert_eq!(mask.get_pixel(0, 1)[0], 0);           // nodata cell (row 1, col 0)
        assert_eq!(mask.get_pixel(1, 1)[0], HOTSPOT_LEVEL);
    }

    #[test]
    fn test_mask_without_threshold() {
        let data = vec![5.0; 4];
        let grid = RasterGrid::from_data(2, 2, data, GeoTransform::default(), -9999.0);

        let mask = render_hotspot_mask(&grid, None);
        assert!(mask.pixels().all(|p| p[0] == VALID_LEVEL));
    }
}
