//! Hotspot detection command
//!
//! Runs the analysis pipeline against a raster file, prints the summary
//! metrics (threshold, hotspot count, data coverage) and optionally
//! writes the hotspot list to CSV/JSON and a mask image.

use clap::ArgMatches;
use log::info;

use crate::analysis::{analyze_grid, AnalysisConfig, DetectionMode};
use crate::raster::errors::{HotspotError, HotspotResult};
use crate::raster::reader::RasterReader;
use crate::region::RegionBoundary;
use crate::utils::logger::Logger;
use crate::utils::{mask_utils, output_utils};

use super::command_traits::Command;

/// Command for running hotspot detection
pub struct DetectCommand<'a> {
    input_path: String,
    output_path: Option<String>,
    output_format: String,
    mask_path: Option<String>,
    config: AnalysisConfig,
    logger: &'a Logger,
}

impl<'a> DetectCommand<'a> {
    /// Create a new detect command from CLI arguments
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> HotspotResult<Self> {
        let input_path = args.get_one::<String>("input")
            .ok_or_else(|| HotspotError::GenericError("Missing input file".to_string()))?
            .clone();

        let mode = match args.get_one::<String>("mode").map(|s| s.as_str()) {
            Some("iqr") => DetectionMode::IqrOutlier,
            _ => DetectionMode::Percentile,
        };

        let percentile = parse_f64_arg(args, "percentile", 97.0)?;
        let iqr_multiplier = parse_f64_arg(args, "iqr-multiplier", 1.5)?;

        let boundary = match args.get_one::<String>("region") {
            Some(path) => Some(RegionBoundary::from_file(path)?),
            None => None,
        };

        let nodata_override = match args.get_one::<String>("nodata") {
            Some(value) => Some(value.parse::<f64>().map_err(|_| {
                HotspotError::InvalidParameter {
                    name: "nodata",
                    reason: format!("'{}' is not a number", value),
                }
            })?),
            None => None,
        };

        let config = AnalysisConfig {
            mode,
            percentile,
            iqr_multiplier,
            boundary,
            nodata_override,
        };
        config.validate()?;

        Ok(DetectCommand {
            input_path,
            output_path: args.get_one::<String>("output").cloned(),
            output_format: args.get_one::<String>("format")
                .cloned()
                .unwrap_or_else(|| "csv".to_string()),
            mask_path: args.get_one::<String>("mask").cloned(),
            config,
            logger,
        })
    }
}

impl<'a> Command for DetectCommand<'a> {
    fn execute(&self) -> HotspotResult<()> {
        info!("Running hotspot detection on {}", self.input_path);

        let mut reader = RasterReader::new(self.logger);
        let grid = reader.load(&self.input_path)?;

        let report = analyze_grid(&grid, &self.config)?;

        println!("Hotspot Detection Results:");
        match report.threshold {
            Some(threshold) => {
                println!("  Upper threshold value: {:.2}", threshold);
                println!("  Identified hotspots:   {}", report.hotspots.len());
                println!("  Data coverage:         {:.1}% ({} of {} samples)",
                         report.coverage_percent(), report.valid_count, report.total_count);
            }
            None => {
                println!("  No data available: no valid samples with the current parameters");
            }
        }

        if let Some(path) = &self.output_path {
            match self.output_format.as_str() {
                "csv" => output_utils::save_hotspots_csv(path, &report)?,
                "json" => output_utils::save_report_json(path, &report, grid.epsg)?,
                other => {
                    return Err(HotspotError::GenericError(
                        format!("Unsupported output format: {}", other)))
                }
            }
            println!("  Hotspots written to:   {}", path);
        }

        if let Some(path) = &self.mask_path {
            // The mask is rendered over the clipped view when a region
            // is configured, so it shows what the statistics saw
            match &self.config.boundary {
                Some(boundary) => {
                    let clipped = crate::region::clip_to_region(&grid, boundary);
                    match clipped {
                        Ok(clipped) => mask_utils::save_hotspot_mask(path, &clipped, report.threshold)?,
                        Err(HotspotError::RegionDisjoint) =>
                            mask_utils::save_hotspot_mask(path, &grid, None)?,
                        Err(e) => return Err(e),
                    }
                }
                None => mask_utils::save_hotspot_mask(path, &grid, report.threshold)?,
            }
            println!("  Mask written to:       {}", path);
        }

        Ok(())
    }
}

/// Parse an optional float argument with a default
fn parse_f64_arg(args: &ArgMatches, name: &str, default: f64) -> HotspotResult<f64> {
    match args.get_one::<String>(name) {
        Some(value) => value.parse::<f64>().map_err(|_| HotspotError::GenericError(
            format!("Invalid value for --{}: '{}'", name, value))),
        None => Ok(default),
    }
}
