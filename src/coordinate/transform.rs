//! Affine geotransformation for rasters
//!
//! Maps between pixel coordinates (row, col) and world coordinates
//! (x, y) using the six GDAL-style coefficients:
//!
//! ```text
//! x = origin_x + col * pixel_width  + row * row_rotation
//! y = origin_y + col * col_rotation + row * pixel_height
//! ```
//!
//! For north-up images the rotation terms are 0 and `pixel_height` is
//! negative. All math is double precision; pixel-to-world conversions
//! are evaluated at the cell center (+0.5 in both axes).

use super::bbox::BoundingBox;

/// Affine transformation coefficients for georeferencing rasters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner
    pub origin_x: f64,
    /// Y coordinate of the upper-left corner
    pub origin_y: f64,
    /// Pixel width (cell size in X direction)
    pub pixel_width: f64,
    /// Pixel height (cell size in Y direction, usually negative)
    pub pixel_height: f64,
    /// Row rotation term (usually 0)
    pub row_rotation: f64,
    /// Column rotation term (usually 0)
    pub col_rotation: f64,
}

impl GeoTransform {
    /// Create a new GeoTransform with no rotation (north-up image)
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
            row_rotation: 0.0,
            col_rotation: 0.0,
        }
    }

    /// Create from a GDAL-style array
    /// [origin_x, pixel_width, row_rotation, origin_y, col_rotation, pixel_height]
    pub fn from_gdal(coeffs: [f64; 6]) -> Self {
        Self {
            origin_x: coeffs[0],
            pixel_width: coeffs[1],
            row_rotation: coeffs[2],
            origin_y: coeffs[3],
            col_rotation: coeffs[4],
            pixel_height: coeffs[5],
        }
    }

    /// Convert to a GDAL-style array
    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            self.row_rotation,
            self.origin_y,
            self.col_rotation,
            self.pixel_height,
        ]
    }

    /// Convert pixel indices to world coordinates at the cell center
    ///
    /// The +0.5 offset follows the "pixel is area, not point" convention
    /// and avoids a systematic half-pixel coordinate bias.
    pub fn pixel_to_geo(&self, row: usize, col: usize) -> (f64, f64) {
        let col_f = col as f64 + 0.5;
        let row_f = row as f64 + 0.5;

        let x = self.origin_x + col_f * self.pixel_width + row_f * self.row_rotation;
        let y = self.origin_y + col_f * self.col_rotation + row_f * self.pixel_height;

        (x, y)
    }

    /// Convert pixel indices to world coordinates (top-left corner)
    pub fn pixel_to_geo_corner(&self, row: usize, col: usize) -> (f64, f64) {
        let col_f = col as f64;
        let row_f = row as f64;

        let x = self.origin_x + col_f * self.pixel_width + row_f * self.row_rotation;
        let y = self.origin_y + col_f * self.col_rotation + row_f * self.pixel_height;

        (x, y)
    }

    /// Convert world coordinates to fractional pixel coordinates
    ///
    /// Returns (col, row); use `.floor()` to get integer indices.
    /// Degenerate transforms yield NaN.
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let det = self.pixel_width * self.pixel_height - self.row_rotation * self.col_rotation;

        if det.abs() < 1e-10 {
            return (f64::NAN, f64::NAN);
        }

        let dx = x - self.origin_x;
        let dy = y - self.origin_y;

        let col = (self.pixel_height * dx - self.row_rotation * dy) / det;
        let row = (-self.col_rotation * dx + self.pixel_width * dy) / det;

        (col, row)
    }

    /// Derive the transform of a sub-grid whose origin is at pixel
    /// (start_row, start_col) of this grid
    pub fn for_subgrid(&self, start_row: usize, start_col: usize) -> Self {
        let (origin_x, origin_y) = self.pixel_to_geo_corner(start_row, start_col);
        Self {
            origin_x,
            origin_y,
            ..*self
        }
    }

    /// Calculate the bounding box for a raster of given dimensions
    pub fn bounds(&self, rows: usize, cols: usize) -> BoundingBox {
        let (x0, y0) = self.pixel_to_geo_corner(0, 0);
        let (x1, y1) = self.pixel_to_geo_corner(0, cols);
        let (x2, y2) = self.pixel_to_geo_corner(rows, 0);
        let (x3, y3) = self.pixel_to_geo_corner(rows, cols);

        BoundingBox::new(
            x0.min(x1).min(x2).min(x3),
            y0.min(y1).min(y2).min(y3),
            x0.max(x1).max(x2).max(x3),
            y0.max(y1).max(y2).max(y3),
        )
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_to_geo_center_offset() {
        let gt = GeoTransform::from_gdal([100.0, 10.0, 0.0, 200.0, 0.0, -10.0]);

        let (x, y) = gt.pixel_to_geo(0, 0);
        assert!((x - 105.0).abs() < 1e-10);
        assert!((y - 195.0).abs() < 1e-10);
    }

    #[test]
    fn test_pixel_to_geo_roundtrip() {
        let gt = GeoTransform::new(100.0, 200.0, 10.0, -10.0);

        let (x, y) = gt.pixel_to_geo(10, 5);
        let (col, row) = gt.geo_to_pixel(x, y);

        assert!((col - 5.5).abs() < 1e-10);
        assert!((row - 10.5).abs() < 1e-10);
    }

    #[test]
    fn test_rotated_transform_roundtrip() {
        let gt = GeoTransform {
            origin_x: 10.0,
            origin_y: 50.0,
            pixel_width: 0.5,
            pixel_height: -0.5,
            row_rotation: 0.05,
            col_rotation: -0.02,
        };

        let (x, y) = gt.pixel_to_geo(7, 3);
        let (col, row) = gt.geo_to_pixel(x, y);

        assert!((col - 3.5).abs() < 1e-9);
        assert!((row - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_subgrid_transform() {
        let gt = GeoTransform::new(0.0, 100.0, 1.0, -1.0);
        let sub = gt.for_subgrid(10, 20);

        assert!((sub.origin_x - 20.0).abs() < 1e-10);
        assert!((sub.origin_y - 90.0).abs() < 1e-10);

        // Cell (0,0) of the sub-grid is cell (10,20) of the parent
        let (x_sub, y_sub) = sub.pixel_to_geo(0, 0);
        let (x_parent, y_parent) = gt.pixel_to_geo(10, 20);
        assert!((x_sub - x_parent).abs() < 1e-10);
        assert!((y_sub - y_parent).abs() < 1e-10);
    }

    #[test]
    fn test_bounds() {
        let gt = GeoTransform::new(0.0, 100.0, 1.0, -1.0);
        let bounds = gt.bounds(100, 100);

        assert!((bounds.min_x - 0.0).abs() < 1e-10);
        assert!((bounds.min_y - 0.0).abs() < 1e-10);
        assert!((bounds.max_x - 100.0).abs() < 1e-10);
        assert!((bounds.max_y - 100.0).abs() < 1e-10);
    }
}
