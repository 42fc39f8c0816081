//! Raster structure analysis command
//!
//! Prints the container structure, georeferencing and metadata of a
//! raster file: dimensions, tag listing with display names, the affine
//! transform, the no-data sentinel, the CRS and any GDAL metadata
//! items. This is the first stop when a file refuses to analyze.

use clap::ArgMatches;
use log::info;
use std::fs::File;
use std::io::BufReader;

use crate::raster::errors::{HotspotError, HotspotResult};
use crate::raster::geo::GeoParser;
use crate::raster::geotags::{get_crs_description, get_tag_name};
use crate::raster::reader::RasterReader;
use crate::utils::logger::Logger;
use crate::utils::xml_utils;

use super::command_traits::Command;

/// Command for analyzing raster file structure
pub struct AnalyzeCommand<'a> {
    input_path: String,
    logger: &'a Logger,
}

impl<'a> AnalyzeCommand<'a> {
    /// Create a new analyze command from CLI arguments
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> HotspotResult<Self> {
        let input_path = args.get_one::<String>("input")
            .ok_or_else(|| HotspotError::GenericError("Missing input file".to_string()))?
            .clone();

        Ok(AnalyzeCommand { input_path, logger })
    }

    /// Format the structure report for the file
    fn build_report(&self) -> HotspotResult<String> {
        let mut reader = RasterReader::new(self.logger);
        let structure = reader.load_structure(&self.input_path)?;

        let file = File::open(&self.input_path)?;
        let mut handle = BufReader::new(file);

        let mut report = String::new();
        report.push_str("Raster Analysis Results:\n");
        report.push_str(&format!("  Format: {}\n",
                                 if structure.is_big_tiff { "BigTIFF" } else { "TIFF" }));
        report.push_str(&format!("  Number of IFDs: {}\n", structure.ifd_count()));

        let ifd = match structure.primary_ifd() {
            Some(ifd) => ifd,
            None => return Ok(report),
        };

        if let Some((width, height)) = ifd.dimensions() {
            report.push_str(&format!("  Dimensions: {}x{}\n", width, height));
        }
        report.push_str(&format!("  Samples per pixel: {}\n", ifd.samples_per_pixel()));
        report.push_str(&format!("  Data organization: {}\n",
                                 if ifd.is_tiled() { "tiled" } else { "stripped" }));

        report.push_str("  Tags:\n");
        for entry in &ifd.entries {
            report.push_str(&format!("    {} ({}): count={}, value/offset={}\n",
                                     entry.tag, get_tag_name(entry.tag),
                                     entry.count, entry.value_offset));
        }

        match GeoParser::read_transform(&reader, &mut handle, ifd) {
            Ok(transform) => {
                report.push_str(&format!("  Origin: ({}, {})\n",
                                         transform.origin_x, transform.origin_y));
                report.push_str(&format!("  Pixel size: ({}, {})\n",
                                         transform.pixel_width, transform.pixel_height));
            }
            Err(_) => report.push_str("  No georeferencing information\n"),
        }

        match GeoParser::read_nodata(&reader, &mut handle, ifd) {
            Some(nodata) => report.push_str(&format!("  NoData value: {}\n", nodata)),
            None => report.push_str("  NoData value: not declared (default -9999)\n"),
        }

        if let Some(code) = GeoParser::read_epsg(&reader, &mut handle, ifd) {
            report.push_str(&format!("  CRS: {}\n", get_crs_description(code)));
        }

        if let Some(xml) = GeoParser::read_gdal_metadata(&reader, &mut handle, ifd) {
            let items = xml_utils::parse_gdal_metadata(&xml);
            if !items.is_empty() {
                report.push_str("  GDAL metadata:\n");
                for (name, value) in items {
                    report.push_str(&format!("    {}: {}\n", name, value));
                }
            }
        }

        Ok(report)
    }
}

impl<'a> Command for AnalyzeCommand<'a> {
    fn execute(&self) -> HotspotResult<()> {
        info!("Analyzing raster structure: {}", self.input_path);

        let report = self.build_report()?;
        println!("{}", report);

        Ok(())
    }
}
