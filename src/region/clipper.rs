//! Raster clipping against a region boundary
//!
//! Produces a sub-grid restricted to the boundary's bounding box with a
//! transform consistent with the sub-grid origin. Cells inside the box
//! but outside the polygon itself are set to the no-data sentinel, so
//! downstream statistics see only the region's samples.

use log::{debug, info};

use crate::raster::errors::{HotspotError, HotspotResult};
use crate::raster::grid::RasterGrid;

use super::boundary::RegionBoundary;

/// Clip a grid to the cells covered by a region boundary
///
/// The pixel window is derived by projecting the boundary's bounding
/// box corners through the inverse transform (floor/ceil, clamped to
/// the grid). Fails with `RegionDisjoint` when the boundary does not
/// intersect the raster extent.
///
/// # Arguments
/// * `grid` - The source grid
/// * `boundary` - The region boundary, in the raster's CRS
///
/// # Returns
/// A new grid covering the boundary's bounding box
pub fn clip_to_region(grid: &RasterGrid, boundary: &RegionBoundary) -> HotspotResult<RasterGrid> {
    let extent = grid.extent();
    let bbox = boundary.bounding_box();

    if !extent.intersects(&bbox) {
        return Err(HotspotError::RegionDisjoint);
    }

    // Project all four bounding box corners to pixel space; min/max over
    // the corners keeps this correct for rotated transforms too.
    let corners = [
        grid.transform.geo_to_pixel(bbox.min_x, bbox.min_y),
        grid.transform.geo_to_pixel(bbox.min_x, bbox.max_y),
        grid.transform.geo_to_pixel(bbox.max_x, bbox.min_y),
        grid.transform.geo_to_pixel(bbox.max_x, bbox.max_y),
    ];

    let mut col_min = f64::INFINITY;
    let mut col_max = f64::NEG_INFINITY;
    let mut row_min = f64::INFINITY;
    let mut row_max = f64::NEG_INFINITY;
    for (col, row) in corners {
        if col.is_nan() || row.is_nan() {
            return Err(HotspotError::GenericError("Degenerate transform, cannot clip".to_string()));
        }
        col_min = col_min.min(col);
        col_max = col_max.max(col);
        row_min = row_min.min(row);
        row_max = row_max.max(row);
    }

    let start_col = col_min.floor().max(0.0) as usize;
    let start_row = row_min.floor().max(0.0) as usize;
    let end_col = (col_max.ceil() as i64).min(grid.cols as i64).max(0) as usize;
    let end_row = (row_max.ceil() as i64).min(grid.rows as i64).max(0) as usize;

    if start_col >= end_col || start_row >= end_row {
        return Err(HotspotError::RegionDisjoint);
    }

    let sub_rows = end_row - start_row;
    let sub_cols = end_col - start_col;
    let sub_transform = grid.transform.for_subgrid(start_row, start_col);

    debug!("Clip window: rows {}..{}, cols {}..{}", start_row, end_row, start_col, end_col);

    let mut clipped = RasterGrid::filled_nodata(sub_rows, sub_cols, sub_transform, grid.nodata);
    clipped.epsg = grid.epsg;

    let mut kept = 0usize;
    for row in 0..sub_rows {
        for col in 0..sub_cols {
            // Containment is tested at the cell center, matching how the
            // extractor georeferences cells
            let (x, y) = sub_transform.pixel_to_geo(row, col);
            if boundary.contains(x, y) {
                let value = grid.get(start_row + row, start_col + col);
                clipped.set(row, col, value);
                kept += 1;
            }
        }
    }

    info!("Clipped {}x{} grid to {}x{} window, {} cells inside boundary",
          grid.rows, grid.cols, sub_rows, sub_cols, kept);

    Ok(clipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::GeoTransform;
    use crate::region::RegionBoundary;

    fn test_grid() -> RasterGrid {
        // 4x4 grid over x in [0,4], y in [0,4], values 0..16
        let data = (0..16).map(|v| v as f64).collect();
        RasterGrid::from_data(4, 4, data, GeoTransform::new(0.0, 4.0, 1.0, -1.0), -9999.0)
    }

    #[test]
    fn test_clip_inner_square() {
        let grid = test_grid();
        let boundary = RegionBoundary::from_ring(
            vec![(1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0), (1.0, 1.0)]).unwrap();

        let clipped = clip_to_region(&grid, &boundary).unwrap();
        assert_eq!(clipped.rows, 2);
        assert_eq!(clipped.cols, 2);

        // Sub-grid origin sits at world (1.0, 3.0)
        assert!((clipped.transform.origin_x - 1.0).abs() < 1e-10);
        assert!((clipped.transform.origin_y - 3.0).abs() < 1e-10);

        // Cell centers of the window all fall inside the square
        assert_eq!(clipped.valid_count(), 4);
        // Parent cell (1,1) is the window's top-left cell
        assert_eq!(clipped.get(0, 0), grid.get(1, 1));
    }

    #[test]
    fn test_clip_masks_outside_polygon() {
        let grid = test_grid();
        // Triangle covering roughly the lower-left half of the grid
        let boundary = RegionBoundary::from_ring(
            vec![(0.0, 0.0), (4.0, 0.0), (0.0, 4.0), (0.0, 0.0)]).unwrap();

        let clipped = clip_to_region(&grid, &boundary).unwrap();
        assert_eq!(clipped.rows, 4);
        assert_eq!(clipped.cols, 4);

        // Cells beyond the hypotenuse are sentinel-masked
        assert!(clipped.valid_count() < clipped.total_count());
        assert_eq!(clipped.get(0, 3), -9999.0);
    }

    #[test]
    fn test_clip_disjoint_region() {
        let grid = test_grid();
        let boundary = RegionBoundary::from_ring(
            vec![(10.0, 10.0), (12.0, 10.0), (12.0, 12.0), (10.0, 10.0)]).unwrap();

        match clip_to_region(&grid, &boundary) {
            Err(HotspotError::RegionDisjoint) => {}
            other => panic!("expected RegionDisjoint, got {:?}", other.map(|g| (g.rows, g.cols))),
        }
    }
}
