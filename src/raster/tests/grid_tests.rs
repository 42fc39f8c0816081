//! Tests for the raster grid type

extern crate std;

use crate::coordinate::GeoTransform;
use crate::raster::grid::RasterGrid;

#[test]
fn test_valid_sample_accounting() {
    let data = vec![1.0, -9999.0, 3.0, f64::NAN, 5.0, -9999.0];
    let grid = RasterGrid::from_data(2, 3, data, GeoTransform::default(), -9999.0);

    std::assert_eq!(grid.total_count(), 6);
    std::assert_eq!(grid.valid_count(), 3);
    std::assert_eq!(grid.valid_values(), vec![1.0, 3.0, 5.0]);
}

#[test]
fn test_sentinel_comparison_is_exact() {
    // A value close to the sentinel is still a valid measurement
    let data = vec![-9999.0, -9998.999999, 0.0, 42.0];
    let grid = RasterGrid::from_data(2, 2, data, GeoTransform::default(), -9999.0);

    std::assert_eq!(grid.valid_count(), 3);
    std::assert!(grid.is_valid(-9998.999999));
    std::assert!(!grid.is_valid(-9999.0));
}

#[test]
fn test_nodata_override() {
    let data = vec![0.0, 1.0, 2.0, 3.0];
    let mut grid = RasterGrid::from_data(2, 2, data, GeoTransform::default(), -9999.0);
    std::assert_eq!(grid.valid_count(), 4);

    grid.set_nodata(0.0);
    std::assert_eq!(grid.valid_count(), 3);
}

#[test]
fn test_extent_follows_transform() {
    let grid = RasterGrid::filled_nodata(10, 20, GeoTransform::new(100.0, 50.0, 0.5, -0.5), -9999.0);
    let extent = grid.extent();

    std::assert!((extent.min_x - 100.0).abs() < 1e-10);
    std::assert!((extent.max_x - 110.0).abs() < 1e-10);
    std::assert!((extent.max_y - 50.0).abs() < 1e-10);
    std::assert!((extent.min_y - 45.0).abs() < 1e-10);
}
