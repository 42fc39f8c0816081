//! Hotspot report output writers
//!
//! Writes the detection result to CSV or JSON for the downstream map
//! layer. Coordinates are rounded to 6 decimals on output, matching
//! the precision the map consumer expects; the in-memory report keeps
//! full precision.

use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};

use crate::analysis::HotspotReport;
use crate::raster::errors::HotspotResult;

/// Save the report's hotspots as CSV ("lat,lon" header plus one row
/// per hotspot)
pub fn save_hotspots_csv(path: &str, report: &HotspotReport) -> HotspotResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "lat,lon")?;
    for hotspot in &report.hotspots {
        writeln!(writer, "{:.6},{:.6}", hotspot.lat, hotspot.lon)?;
    }

    writer.flush()?;
    info!("Wrote {} hotspots to {} (csv)", report.hotspots.len(), path);
    Ok(())
}

/// Save the full report as JSON
///
/// The document carries the threshold (null when undefined), the
/// sample counts, the coverage percentage, the CRS code when known and
/// the hotspot list as [lat, lon] pairs.
pub fn save_report_json(path: &str, report: &HotspotReport, epsg: Option<u32>) -> HotspotResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{{")?;
    match report.threshold {
        Some(t) => writeln!(writer, "  \"threshold\": {},", t)?,
        None => writeln!(writer, "  \"threshold\": null,")?,
    }
    writeln!(writer, "  \"valid_count\": {},", report.valid_count)?;
    writeln!(writer, "  \"total_count\": {},", report.total_count)?;
    writeln!(writer, "  \"coverage_percent\": {:.1},", report.coverage_percent())?;
    match epsg {
        Some(code) => writeln!(writer, "  \"epsg\": {},", code)?,
        None => writeln!(writer, "  \"epsg\": null,")?,
    }

    writeln!(writer, "  \"hotspots\": [")?;
    for (i, hotspot) in report.hotspots.iter().enumerate() {
        let separator = if i + 1 < report.hotspots.len() { "," } else { "" };
        writeln!(writer, "    [{:.6}, {:.6}]{}", hotspot.lat, hotspot.lon, separator)?;
    }
    writeln!(writer, "  ]")?;
    writeln!(writer, "}}")?;

    writer.flush()?;
    info!("Wrote report with {} hotspots to {} (json)", report.hotspots.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Hotspot;

    fn sample_report() -> HotspotReport {
        HotspotReport {
            hotspots: vec![
                Hotspot { lat: 36.2123456, lon: 43.9654321 },
                Hotspot { lat: 36.25, lon: 43.75 },
            ],
            threshold: Some(41.5),
            valid_count: 90,
            total_count: 100,
        }
    }

    #[test]
    fn test_csv_round_trip() {
        let path = std::env::temp_dir().join("hotspotkit_test_out.csv");
        let path = path.to_str().unwrap();

        save_hotspots_csv(path, &sample_report()).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines[0], "lat,lon");
        assert_eq!(lines[1], "36.212346,43.965432");
        assert_eq!(lines.len(), 3);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_json_undefined_threshold() {
        let path = std::env::temp_dir().join("hotspotkit_test_out.json");
        let path = path.to_str().unwrap();

        let report = HotspotReport {
            hotspots: Vec::new(),
            threshold: None,
            valid_count: 0,
            total_count: 100,
        };
        save_report_json(path, &report, Some(4326)).unwrap();
        let content = std::fs::read_to_string(path).unwrap();

        assert!(content.contains("\"threshold\": null"));
        assert!(content.contains("\"epsg\": 4326"));

        let _ = std::fs::remove_file(path);
    }
}
