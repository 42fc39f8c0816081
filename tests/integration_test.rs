//! Integration tests for the hotspot detection pipeline
//!
//! These tests assemble complete single-band GeoTIFF files byte by
//! byte, write them to the temp directory and drive the full pipeline
//! through the public API.

extern crate std;

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use hotspotkit::analysis::{AnalysisConfig, DetectionMode};
use hotspotkit::raster::RasterReader;
use hotspotkit::utils::logger::Logger;
use hotspotkit::HotspotKit;

/// Field type constants used by the builder below
const SHORT: u16 = 3;
const LONG: u16 = 4;
const ASCII: u16 = 2;
const DOUBLE: u16 = 12;

struct TiffBuilder {
    entries: Vec<(u16, u16, u32, u32)>,
    tail: Vec<u8>,
    tail_base: u32,
}

/// Minimal little-endian classic-TIFF writer for test fixtures
impl TiffBuilder {
    fn new(entry_count: usize) -> Self {
        // Header (8) + entry count (2) + entries (12 each) + next IFD offset (4)
        let tail_base = 8 + 2 + entry_count as u32 * 12 + 4;
        TiffBuilder {
            entries: Vec::with_capacity(entry_count),
            tail: Vec::new(),
            tail_base,
        }
    }

    fn add_inline(&mut self, tag: u16, field_type: u16, count: u32, value: u32) {
        self.entries.push((tag, field_type, count, value));
    }

    /// Add an entry whose values live in the data area after the IFD
    fn add_data(&mut self, tag: u16, field_type: u16, count: u32, bytes: &[u8]) {
        let offset = self.tail_base + self.tail.len() as u32;
        self.tail.extend_from_slice(bytes);
        self.entries.push((tag, field_type, count, offset));
    }

    fn build(mut self) -> Vec<u8> {
        self.entries.sort_by_key(|e| e.0);

        let mut buffer = Vec::new();
        buffer.extend_from_slice(&[0x49, 0x49]); // "II" little-endian
        buffer.extend_from_slice(&42u16.to_le_bytes());
        buffer.extend_from_slice(&8u32.to_le_bytes()); // first IFD offset

        buffer.extend_from_slice(&(self.entries.len() as u16).to_le_bytes());
        for (tag, field_type, count, value) in &self.entries {
            buffer.extend_from_slice(&tag.to_le_bytes());
            buffer.extend_from_slice(&field_type.to_le_bytes());
            buffer.extend_from_slice(&count.to_le_bytes());
            buffer.extend_from_slice(&value.to_le_bytes());
        }
        buffer.extend_from_slice(&0u32.to_le_bytes()); // no next IFD

        assert_eq!(buffer.len() as u32, self.tail_base);
        buffer.extend_from_slice(&self.tail);
        buffer
    }
}

fn f64_bytes(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Build a 2x2 float32 GeoTIFF holding the grid [[1, 2], [3, 100]]
/// at origin (43, 37) with 0.01-degree pixels
fn scenario_tiff(compression: u16, pixel_bytes: Vec<u8>) -> Vec<u8> {
    let mut builder = TiffBuilder::new(14);

    builder.add_inline(256, LONG, 1, 2);  // ImageWidth
    builder.add_inline(257, LONG, 1, 2);  // ImageLength
    builder.add_inline(258, SHORT, 1, 32); // BitsPerSample
    builder.add_inline(259, SHORT, 1, compression as u32);
    builder.add_inline(262, SHORT, 1, 1); // PhotometricInterpretation
    builder.add_inline(277, SHORT, 1, 1); // SamplesPerPixel
    builder.add_inline(278, LONG, 1, 2);  // RowsPerStrip
    builder.add_inline(339, SHORT, 1, 3); // SampleFormat = IEEE float

    builder.add_inline(279, LONG, 1, pixel_bytes.len() as u32); // StripByteCounts
    builder.add_data(273, LONG, 1, &pixel_bytes); // StripOffsets

    // ModelPixelScale + ModelTiepoint: 0.01-degree pixels anchored at
    // the (43 E, 37 N) upper-left corner
    builder.add_data(33550, DOUBLE, 3, &f64_bytes(&[0.01, 0.01, 0.0]));
    builder.add_data(33922, DOUBLE, 6, &f64_bytes(&[0.0, 0.0, 0.0, 43.0, 37.0, 0.0]));

    // GeoKey directory: geographic model, pixel-is-area, WGS84
    let geo_keys: Vec<u8> = [
        1u16, 1, 0, 3,
        1024, 0, 1, 2,
        1025, 0, 1, 1,
        2048, 0, 1, 4326,
    ].iter().flat_map(|v| v.to_le_bytes()).collect();
    builder.add_data(34735, SHORT, 16, &geo_keys);

    builder.add_data(42113, ASCII, 6, b"-9999\0"); // GDAL_NODATA

    builder.build()
}

fn write_temp(name: &str, bytes: &[u8]) -> String {
    let path = std::env::temp_dir().join(name);
    std::fs::write(&path, bytes).unwrap();
    path.to_str().unwrap().to_string()
}

fn temp_logger() -> Logger {
    let path = std::env::temp_dir().join("hotspotkit_integration.log");
    Logger::new(path.to_str().unwrap()).unwrap()
}

#[test]
fn test_load_scenario_grid() {
    let tiff = scenario_tiff(1, f32_bytes(&[1.0, 2.0, 3.0, 100.0]));
    let path = write_temp("hotspotkit_scenario.tif", &tiff);

    let logger = temp_logger();
    let mut reader = RasterReader::new(&logger);
    let grid = reader.load(&path).unwrap();

    assert_eq!(grid.rows, 2);
    assert_eq!(grid.cols, 2);
    assert_eq!(grid.nodata, -9999.0);
    assert_eq!(grid.epsg, Some(4326));
    assert_eq!(grid.get(1, 1), 100.0);
    assert!((grid.transform.origin_x - 43.0).abs() < 1e-12);
    assert!((grid.transform.origin_y - 37.0).abs() < 1e-12);
    assert!((grid.transform.pixel_height + 0.01).abs() < 1e-12);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_detect_scenario_hotspot() {
    let tiff = scenario_tiff(1, f32_bytes(&[1.0, 2.0, 3.0, 100.0]));
    let path = write_temp("hotspotkit_detect.tif", &tiff);

    let log_path = std::env::temp_dir().join("hotspotkit_detect.log");
    let kit = HotspotKit::new(log_path.to_str()).unwrap();

    let config = AnalysisConfig {
        mode: DetectionMode::Percentile,
        percentile: 75.0,
        ..AnalysisConfig::default()
    };
    let report = kit.detect(&path, &config).unwrap();

    assert!((report.threshold.unwrap() - 27.25).abs() < 1e-6);
    assert_eq!(report.hotspots.len(), 1);
    assert_eq!(report.valid_count, 4);

    // Cell (1, 1) center: lon = 43 + 1.5 * 0.01, lat = 37 - 1.5 * 0.01
    assert!((report.hotspots[0].lon - 43.015).abs() < 1e-6);
    assert!((report.hotspots[0].lat - 36.985).abs() < 1e-6);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_detect_with_deflate_strips() {
    let raw = f32_bytes(&[1.0, 2.0, 3.0, 100.0]);
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raw).unwrap();
    let compressed = encoder.finish().unwrap();

    let tiff = scenario_tiff(8, compressed);
    let path = write_temp("hotspotkit_deflate.tif", &tiff);

    let logger = temp_logger();
    let mut reader = RasterReader::new(&logger);
    let grid = reader.load(&path).unwrap();

    assert_eq!(grid.get(0, 0), 1.0);
    assert_eq!(grid.get(1, 1), 100.0);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_sentinel_cells_report_no_data() {
    let tiff = scenario_tiff(1, f32_bytes(&[-9999.0, -9999.0, -9999.0, -9999.0]));
    let path = write_temp("hotspotkit_all_nodata.tif", &tiff);

    let log_path = std::env::temp_dir().join("hotspotkit_all_nodata.log");
    let kit = HotspotKit::new(log_path.to_str()).unwrap();

    let report = kit.detect(&path, &AnalysisConfig::default()).unwrap();
    assert!(report.threshold.is_none());
    assert!(report.hotspots.is_empty());
    assert_eq!(report.valid_count, 0);
    assert_eq!(report.total_count, 4);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_missing_file_is_fatal() {
    let log_path = std::env::temp_dir().join("hotspotkit_missing.log");
    let kit = HotspotKit::new(log_path.to_str()).unwrap();

    let result = kit.detect("/nonexistent/path/raster.tif", &AnalysisConfig::default());
    assert!(result.is_err());
}

#[test]
fn test_invalid_container_is_fatal() {
    let path = write_temp("hotspotkit_garbage.tif", b"this is not a tiff file");

    let log_path = std::env::temp_dir().join("hotspotkit_garbage.log");
    let kit = HotspotKit::new(log_path.to_str()).unwrap();

    let result = kit.detect(&path, &AnalysisConfig::default());
    assert!(result.is_err());

    let _ = std::fs::remove_file(&path);
}
