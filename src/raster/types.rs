//! Core raster file structures

use std::fmt;

use crate::raster::ifd::Ifd;

/// Represents a parsed TIFF container with its Image File Directories
#[derive(Debug)]
pub struct RasterFile {
    /// Image File Directories in the file
    pub ifds: Vec<Ifd>,
    /// Whether this is a BigTIFF format
    pub is_big_tiff: bool,
}

impl RasterFile {
    /// Creates a new empty raster file structure
    pub fn new(is_big_tiff: bool) -> Self {
        RasterFile {
            ifds: Vec::new(),
            is_big_tiff,
        }
    }

    /// Returns the first full-resolution IFD
    ///
    /// GeoTIFFs may carry reduced-resolution overview IFDs after the
    /// main image; those are skipped when picking the band to analyze.
    pub fn primary_ifd(&self) -> Option<&Ifd> {
        self.ifds.iter().find(|ifd| !ifd.is_overview())
            .or_else(|| self.ifds.first())
    }

    /// Returns the number of IFDs in the file
    pub fn ifd_count(&self) -> usize {
        self.ifds.len()
    }
}

impl fmt::Display for RasterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Raster file:")?;
        writeln!(f, "  Format: {}", if self.is_big_tiff { "BigTIFF" } else { "TIFF" })?;
        writeln!(f, "  Number of IFDs: {}", self.ifds.len())?;

        if let Some(ifd) = self.primary_ifd() {
            write!(f, "{}", ifd)?;
        }

        Ok(())
    }
}
