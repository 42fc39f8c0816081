//! Analysis pipeline orchestration
//!
//! One invocation is one sequential pass: load, optionally clip,
//! estimate the threshold, extract hotspots. The configuration is an
//! immutable value passed in per run; the pipeline holds no state
//! between calls and persists nothing.

use log::{info, warn};

use crate::raster::errors::{HotspotError, HotspotResult};
use crate::raster::grid::RasterGrid;
use crate::raster::reader::RasterReader;
use crate::region::{clip_to_region, RegionBoundary};
use crate::utils::logger::Logger;

use super::extractor::{extract_hotspots, Hotspot};
use super::threshold::ThresholdPolicy;

/// Detection mode selected by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMode {
    /// Upper-percentile threshold
    Percentile,
    /// IQR outlier bound threshold
    IqrOutlier,
}

/// Immutable configuration for one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Which threshold policy to apply
    pub mode: DetectionMode,
    /// Percentile parameter for `DetectionMode::Percentile`, in [0, 100]
    pub percentile: f64,
    /// Multiplier for `DetectionMode::IqrOutlier`, >= 0
    pub iqr_multiplier: f64,
    /// Optional region of interest, in the raster's CRS
    pub boundary: Option<RegionBoundary>,
    /// Optional override of the raster's declared no-data sentinel
    pub nodata_override: Option<f64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            mode: DetectionMode::Percentile,
            percentile: 97.0,
            iqr_multiplier: 1.5,
            boundary: None,
            nodata_override: None,
        }
    }
}

impl AnalysisConfig {
    /// The threshold policy this configuration selects
    pub fn policy(&self) -> ThresholdPolicy {
        match self.mode {
            DetectionMode::Percentile => ThresholdPolicy::Percentile(self.percentile),
            DetectionMode::IqrOutlier => ThresholdPolicy::IqrOutlier(self.iqr_multiplier),
        }
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> HotspotResult<()> {
        self.policy().validate()
    }
}

/// Result of one analysis run
#[derive(Debug, Clone)]
pub struct HotspotReport {
    /// Detected hotspots, row-major cell order
    pub hotspots: Vec<Hotspot>,
    /// Threshold applied; None means undefined (no valid samples)
    pub threshold: Option<f64>,
    /// Number of valid samples the threshold was estimated over
    pub valid_count: usize,
    /// Total number of samples in the (possibly clipped) grid
    pub total_count: usize,
}

impl HotspotReport {
    /// An empty report for runs with no usable data
    fn empty(total_count: usize) -> Self {
        HotspotReport {
            hotspots: Vec::new(),
            threshold: None,
            valid_count: 0,
            total_count,
        }
    }

    /// Fraction of cells carrying a valid measurement, as a percentage
    pub fn coverage_percent(&self) -> f64 {
        if self.total_count == 0 {
            return 0.0;
        }
        self.valid_count as f64 / self.total_count as f64 * 100.0
    }

    /// Whether the run found any usable data at all
    pub fn has_data(&self) -> bool {
        self.threshold.is_some()
    }
}

/// Run the full pipeline against a raster file
///
/// # Arguments
/// * `path` - Path to the single-band GeoTIFF
/// * `config` - Immutable analysis configuration
/// * `logger` - Logger for the loading stage
///
/// # Returns
/// The hotspot report, or a fatal loader/configuration error
pub fn run_analysis(path: &str, config: &AnalysisConfig, logger: &Logger) -> HotspotResult<HotspotReport> {
    config.validate()?;

    let mut reader = RasterReader::new(logger);
    let grid = reader.load(path)?;

    analyze_grid(&grid, config)
}

/// Run threshold estimation and extraction against a loaded grid
///
/// `EmptyValidData` and `RegionDisjoint` conditions complete the run
/// with an empty report (threshold undefined) rather than failing it;
/// callers should render "no data available" for such reports.
pub fn analyze_grid(grid: &RasterGrid, config: &AnalysisConfig) -> HotspotResult<HotspotReport> {
    config.validate()?;

    let mut working;
    let grid = if let Some(nodata) = config.nodata_override {
        working = grid.clone();
        working.set_nodata(nodata);
        &working
    } else {
        grid
    };

    let clipped;
    let grid = match &config.boundary {
        Some(boundary) => match clip_to_region(grid, boundary) {
            Ok(sub) => {
                clipped = sub;
                &clipped
            }
            Err(HotspotError::RegionDisjoint) => {
                warn!("Region boundary does not intersect the raster, reporting no data");
                return Ok(HotspotReport::empty(grid.total_count()));
            }
            Err(e) => return Err(e),
        },
        None => grid,
    };

    let valid = grid.valid_values();
    if valid.is_empty() {
        warn!("No valid samples after masking, reporting no data");
        return Ok(HotspotReport::empty(grid.total_count()));
    }

    let threshold = match config.policy().estimate(&valid) {
        Ok(t) => t,
        Err(HotspotError::EmptyValidData) => {
            return Ok(HotspotReport::empty(grid.total_count()));
        }
        Err(e) => return Err(e),
    };

    let hotspots = extract_hotspots(grid, threshold);
    info!("Analysis complete: threshold={}, {} hotspots, {}/{} valid samples",
          threshold, hotspots.len(), valid.len(), grid.total_count());

    Ok(HotspotReport {
        hotspots,
        threshold: Some(threshold),
        valid_count: valid.len(),
        total_count: grid.total_count(),
    })
}
