//! Hotspot analysis pipeline
//!
//! Statistical threshold estimation, hotspot extraction and the
//! orchestration tying them together with loading and clipping.

pub mod threshold;
pub mod extractor;
pub mod pipeline;
mod tests;

pub use extractor::{extract_hotspots, Hotspot};
pub use pipeline::{analyze_grid, run_analysis, AnalysisConfig, DetectionMode, HotspotReport};
pub use threshold::ThresholdPolicy;
