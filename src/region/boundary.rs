//! Region boundary polygon
//!
//! A `RegionBoundary` is a simple polygon given as an ordered closed
//! ring of (lon, lat) vertices. The CLI layer reads it from a WKT
//! `POLYGON` text file; the clipper queries it for containment and its
//! bounding box.

use std::fs;
use std::path::Path;

use geo::{BoundingRect, Contains};
use geo_types::{LineString, Point as GeoPoint, Polygon};
use lazy_static::lazy_static;
use log::{info, warn};
use regex::Regex;

use crate::coordinate::BoundingBox;
use crate::raster::errors::{HotspotError, HotspotResult};

lazy_static! {
    // Captures the outer ring of a WKT POLYGON; inner rings are ignored
    static ref WKT_POLYGON_RE: Regex =
        Regex::new(r"(?is)^\s*POLYGON\s*\(\s*\(\s*([^)]+?)\s*\)").unwrap();
}

/// A simple polygon restricting analysis to a sub-area of the raster
#[derive(Debug, Clone)]
pub struct RegionBoundary {
    polygon: Polygon<f64>,
}

impl RegionBoundary {
    /// Build a boundary from a ring of (lon, lat) vertices
    ///
    /// The ring must have at least three distinct vertices and its
    /// first and last vertex must coincide; open rings are closed
    /// automatically with a warning.
    pub fn from_ring(mut ring: Vec<(f64, f64)>) -> HotspotResult<Self> {
        if ring.len() < 3 {
            return Err(HotspotError::InvalidParameter {
                name: "region",
                reason: format!("boundary ring has {} vertices, need at least 3", ring.len()),
            });
        }

        if ring.first() != ring.last() {
            warn!("Boundary ring is not closed, closing it automatically");
            let first = ring[0];
            ring.push(first);
        }

        let polygon = Polygon::new(LineString::from(ring), vec![]);
        Ok(RegionBoundary { polygon })
    }

    /// Parse a boundary from WKT POLYGON text
    pub fn from_wkt(wkt: &str) -> HotspotResult<Self> {
        let captures = WKT_POLYGON_RE.captures(wkt)
            .ok_or_else(|| HotspotError::InvalidParameter {
                name: "region",
                reason: "expected WKT POLYGON ((lon lat, ...))".to_string(),
            })?;

        let mut ring = Vec::new();
        for pair in captures[1].split(',') {
            let mut parts = pair.split_whitespace();
            let lon = parts.next().and_then(|v| v.parse::<f64>().ok());
            let lat = parts.next().and_then(|v| v.parse::<f64>().ok());

            match (lon, lat) {
                (Some(lon), Some(lat)) => ring.push((lon, lat)),
                _ => {
                    return Err(HotspotError::InvalidParameter {
                        name: "region",
                        reason: format!("unparseable vertex '{}'", pair.trim()),
                    })
                }
            }
        }

        Self::from_ring(ring)
    }

    /// Load a boundary from a WKT file
    pub fn from_file(path: &str) -> HotspotResult<Self> {
        let content = fs::read_to_string(Path::new(path))?;
        let boundary = Self::from_wkt(&content)?;
        info!("Loaded region boundary with {} vertices from {}",
              boundary.vertex_count(), path);
        Ok(boundary)
    }

    /// Number of ring vertices (including the closing vertex)
    pub fn vertex_count(&self) -> usize {
        self.polygon.exterior().0.len()
    }

    /// Whether the point (x, y) lies inside the polygon
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.polygon.contains(&GeoPoint::new(x, y))
    }

    /// Axis-aligned bounding box of the ring
    pub fn bounding_box(&self) -> BoundingBox {
        // A ring with >= 3 vertices always has a bounding rect
        let rect = self.polygon.bounding_rect()
            .expect("non-empty ring has a bounding rect");
        BoundingBox::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wkt_ring() {
        let boundary = RegionBoundary::from_wkt(
            "POLYGON ((43.0 36.0, 44.0 36.0, 44.0 37.0, 43.0 37.0, 43.0 36.0))").unwrap();

        assert_eq!(boundary.vertex_count(), 5);
        assert!(boundary.contains(43.5, 36.5));
        assert!(!boundary.contains(42.0, 36.5));
    }

    #[test]
    fn test_open_ring_is_closed() {
        let boundary = RegionBoundary::from_wkt(
            "POLYGON((0 0, 4 0, 4 4, 0 4))").unwrap();

        assert_eq!(boundary.vertex_count(), 5);
        assert!(boundary.contains(2.0, 2.0));
    }

    #[test]
    fn test_bounding_box() {
        let boundary = RegionBoundary::from_ring(
            vec![(1.0, 2.0), (5.0, 2.0), (3.0, 6.0), (1.0, 2.0)]).unwrap();

        let bbox = boundary.bounding_box();
        assert_eq!(bbox.min_x, 1.0);
        assert_eq!(bbox.min_y, 2.0);
        assert_eq!(bbox.max_x, 5.0);
        assert_eq!(bbox.max_y, 6.0);
    }

    #[test]
    fn test_rejects_degenerate_ring() {
        assert!(RegionBoundary::from_ring(vec![(0.0, 0.0), (1.0, 1.0)]).is_err());
        assert!(RegionBoundary::from_wkt("LINESTRING (0 0, 1 1)").is_err());
    }
}
