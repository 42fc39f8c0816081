//! Library facade for hotspot detection

use log::info;

use crate::analysis::{run_analysis, AnalysisConfig, HotspotReport};
use crate::raster::errors::HotspotResult;
use crate::raster::grid::RasterGrid;
use crate::raster::reader::RasterReader;
use crate::utils::logger::Logger;

/// Main interface to the hotspotkit library
pub struct HotspotKit {
    logger: Logger,
}

impl HotspotKit {
    /// Create a new HotspotKit instance
    ///
    /// # Arguments
    /// * `log_file` - Optional path to log file, defaults to "hotspotkit.log"
    ///
    /// # Returns
    /// A HotspotKit instance or an error if initialization fails
    pub fn new(log_file: Option<&str>) -> HotspotResult<Self> {
        let log_path = log_file.unwrap_or("hotspotkit.log");
        let logger = Logger::new(log_path)?;
        Ok(HotspotKit { logger })
    }

    /// Load the single-band grid of a raster file
    ///
    /// # Arguments
    /// * `input_path` - Path to the GeoTIFF file
    ///
    /// # Returns
    /// The decoded grid with transform, no-data sentinel and CRS code
    pub fn load(&self, input_path: &str) -> HotspotResult<RasterGrid> {
        let mut reader = RasterReader::new(&self.logger);
        reader.load(input_path)
    }

    /// Run hotspot detection against a raster file
    ///
    /// Each call is an independent run: the raster is loaded fresh and
    /// nothing is cached between invocations.
    ///
    /// # Arguments
    /// * `input_path` - Path to the single-band GeoTIFF
    /// * `config` - Analysis configuration for this run
    ///
    /// # Returns
    /// The hotspot report, or a fatal loader/configuration error
    pub fn detect(&self, input_path: &str, config: &AnalysisConfig) -> HotspotResult<HotspotReport> {
        info!("Detecting hotspots in {}", input_path);
        run_analysis(input_path, config, &self.logger)
    }
}
