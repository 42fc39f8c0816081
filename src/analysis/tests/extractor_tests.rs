//! Tests for the hotspot extractor

extern crate std;

use crate::analysis::extractor::extract_hotspots;
use crate::coordinate::GeoTransform;
use crate::raster::grid::RasterGrid;

fn scenario_grid() -> RasterGrid {
    // [[1, 2], [3, 100]] over a simple unit transform
    let data = vec![1.0, 2.0, 3.0, 100.0];
    RasterGrid::from_data(2, 2, data, GeoTransform::new(0.0, 2.0, 1.0, -1.0), -9999.0)
}

#[test]
fn test_strictly_greater_comparison() {
    let grid = scenario_grid();

    // Threshold exactly at the maximum excludes the equal cell
    std::assert!(extract_hotspots(&grid, 100.0).is_empty());

    // Just below the maximum includes only that cell
    let hotspots = extract_hotspots(&grid, 99.9999);
    std::assert_eq!(hotspots.len(), 1);
}

#[test]
fn test_scenario_single_hotspot() {
    let grid = scenario_grid();
    let hotspots = extract_hotspots(&grid, 27.25);

    std::assert_eq!(hotspots.len(), 1);
    // Cell (1, 1) center: x = 1.5, y = 0.5
    std::assert!((hotspots[0].lon - 1.5).abs() < 1e-6);
    std::assert!((hotspots[0].lat - 0.5).abs() < 1e-6);
}

#[test]
fn test_cell_center_round_trip() {
    // Affine (a, b, c, d, e, f) with x = a*col + b*row + c and
    // y = d*col + e*row + f; cell (0, 0) center maps to
    // x = c + 0.5a + 0.5b, y = f + 0.5d + 0.5e
    let (a, b, c, d, e, f) = (0.5, 0.01, 10.0, 0.02, -0.5, 20.0);
    let transform = GeoTransform {
        origin_x: c,
        pixel_width: a,
        row_rotation: b,
        origin_y: f,
        col_rotation: d,
        pixel_height: e,
    };

    let grid = RasterGrid::from_data(1, 1, vec![42.0], transform, -9999.0);
    let hotspots = extract_hotspots(&grid, 0.0);

    std::assert_eq!(hotspots.len(), 1);
    let expected_x = c + a * 0.5 + b * 0.5;
    let expected_y = f + d * 0.5 + e * 0.5;
    std::assert!((hotspots[0].lon - expected_x).abs() < 1e-6);
    std::assert!((hotspots[0].lat - expected_y).abs() < 1e-6);
}

#[test]
fn test_nodata_never_emitted() {
    // A sentinel cell larger than the threshold must not appear
    let data = vec![1.0, 9999.0, 2.0, 3.0];
    let mut grid = RasterGrid::from_data(2, 2, data, GeoTransform::new(0.0, 2.0, 1.0, -1.0), -9999.0);
    grid.set_nodata(9999.0);

    let hotspots = extract_hotspots(&grid, 0.5);
    std::assert_eq!(hotspots.len(), 3);
    for hotspot in &hotspots {
        // Cell (0, 1) center is (1.5, 1.5); it must be absent
        std::assert!(!((hotspot.lon - 1.5).abs() < 1e-9 && (hotspot.lat - 1.5).abs() < 1e-9));
    }
}

#[test]
fn test_row_major_ordering() {
    let data = vec![10.0, 10.0, 10.0, 10.0, 10.0, 10.0];
    let grid = RasterGrid::from_data(2, 3, data, GeoTransform::new(0.0, 2.0, 1.0, -1.0), -9999.0);

    let hotspots = extract_hotspots(&grid, 0.0);
    std::assert_eq!(hotspots.len(), 6);

    // Row-major: latitude descends between rows, longitude ascends
    // within a row
    for pair in hotspots.chunks(3) {
        std::assert!(pair[0].lon < pair[1].lon && pair[1].lon < pair[2].lon);
    }
    std::assert!(hotspots[0].lat > hotspots[3].lat);
}
