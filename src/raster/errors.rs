//! Custom error types for raster loading and hotspot analysis

use std::fmt;
use std::io;

/// Error kinds produced by the loader, clipper and analysis pipeline
#[derive(Debug)]
pub enum HotspotError {
    /// I/O error (missing file, permission denied, truncated container)
    IoError(io::Error),
    /// Invalid TIFF header
    InvalidHeader,
    /// Invalid byte order marker
    InvalidByteOrder(u16),
    /// Unsupported TIFF version
    UnsupportedVersion(u16),
    /// Tag not found
    TagNotFound(u16),
    /// Unsupported field type
    UnsupportedFieldType(u16),
    /// Unsupported compression method
    UnsupportedCompression(u64),
    /// Unsupported sample format / bit depth combination
    UnsupportedSampleFormat { format: u64, bits: u64 },
    /// Image dimensions not found
    MissingDimensions,
    /// The raster has more than one sample per pixel
    NotSingleBand(u64),
    /// No usable georeferencing tags in the file
    MissingGeoreference,
    /// No valid samples remain after masking and clipping
    EmptyValidData,
    /// Region boundary does not intersect the raster extent
    RegionDisjoint,
    /// A configuration parameter is out of its accepted range
    InvalidParameter { name: &'static str, reason: String },
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for HotspotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HotspotError::IoError(e) => write!(f, "I/O error: {}", e),
            HotspotError::InvalidHeader => write!(f, "Invalid TIFF header"),
            HotspotError::InvalidByteOrder(v) => write!(f, "Invalid byte order marker: {:#06x}", v),
            HotspotError::UnsupportedVersion(v) => write!(f, "Unsupported TIFF version: {}", v),
            HotspotError::TagNotFound(tag) => write!(f, "Tag not found: {}", tag),
            HotspotError::UnsupportedFieldType(ft) => write!(f, "Unsupported field type: {}", ft),
            HotspotError::UnsupportedCompression(c) => write!(f, "Unsupported compression method: {}", c),
            HotspotError::UnsupportedSampleFormat { format, bits } =>
                write!(f, "Unsupported sample format {} with {} bits per sample", format, bits),
            HotspotError::MissingDimensions => write!(f, "Image dimensions not found"),
            HotspotError::NotSingleBand(samples) =>
                write!(f, "Expected a single-band raster, found {} samples per pixel", samples),
            HotspotError::MissingGeoreference =>
                write!(f, "No georeferencing information (pixel scale/tiepoint or transformation matrix)"),
            HotspotError::EmptyValidData => write!(f, "No valid samples after masking no-data values"),
            HotspotError::RegionDisjoint => write!(f, "Region boundary does not intersect the raster extent"),
            HotspotError::InvalidParameter { name, reason } =>
                write!(f, "Invalid parameter '{}': {}", name, reason),
            HotspotError::GenericError(msg) => write!(f, "Raster error: {}", msg),
        }
    }
}

impl std::error::Error for HotspotError {}

impl From<io::Error> for HotspotError {
    fn from(error: io::Error) -> Self {
        HotspotError::IoError(error)
    }
}

/// Result type for raster and analysis operations
pub type HotspotResult<T> = Result<T, HotspotError>;

impl From<String> for HotspotError {
    fn from(msg: String) -> Self {
        HotspotError::GenericError(msg)
    }
}
