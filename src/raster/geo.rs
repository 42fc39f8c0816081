//! GeoTIFF georeferencing and metadata parsing
//!
//! Utilities for interpreting the geographic metadata stored in a TIFF
//! file according to the GeoTIFF standard: the affine transform tags,
//! the GeoKey directory, the GDAL no-data marker and the GDAL XML
//! metadata block. All reads go through the already-open reader handle.

use log::{debug, warn};

use crate::coordinate::GeoTransform;
use crate::io::seekable::SeekableReader;
use crate::raster::constants::{geo_keys, tags};
use crate::raster::errors::{HotspotError, HotspotResult};
use crate::raster::geotags::get_key_name;
use crate::raster::ifd::Ifd;
use crate::raster::reader::RasterReader;

/// Represents a GeoKey entry in a GeoKey directory
#[derive(Debug, Clone)]
pub struct GeoKeyEntry {
    pub key_id: u16,
    pub tiff_tag_location: u16,
    pub count: u16,
    pub value_offset: u16,
}

impl GeoKeyEntry {
    /// Get the name of this key
    pub fn name(&self) -> String {
        get_key_name(self.key_id)
    }
}

/// Parser for GeoTIFF geographic metadata
pub struct GeoParser;

impl GeoParser {
    /// Derive the affine transform from the georeferencing tags
    ///
    /// ModelPixelScale + ModelTiepoint is the common encoding; a full
    /// ModelTransformation matrix is used as fallback. Files carrying
    /// neither cannot place pixels in the world and are rejected.
    ///
    /// # Arguments
    /// * `rr` - The raster reader holding the byte order state
    /// * `reader` - The open reader for the file
    /// * `ifd` - The IFD containing the georeferencing tags
    ///
    /// # Returns
    /// The affine transform, or `MissingGeoreference`
    pub fn read_transform(
        rr: &RasterReader,
        reader: &mut dyn SeekableReader,
        ifd: &Ifd,
    ) -> HotspotResult<GeoTransform> {
        if ifd.has_tag(tags::MODEL_PIXEL_SCALE_TAG) && ifd.has_tag(tags::MODEL_TIEPOINT_TAG) {
            let scale = rr.read_tag_f64s(reader, ifd, tags::MODEL_PIXEL_SCALE_TAG)?;
            let tiepoint = rr.read_tag_f64s(reader, ifd, tags::MODEL_TIEPOINT_TAG)?;

            if scale.len() >= 2 && tiepoint.len() >= 6 {
                // Tiepoint maps raster (i, j) to world (x, y); shift the
                // origin back to pixel (0, 0). TIFF rows grow downward,
                // hence the sign difference on y.
                let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
                let origin_y = tiepoint[4] + tiepoint[1] * scale[1];

                return Ok(GeoTransform::new(origin_x, origin_y, scale[0], -scale[1]));
            }
            warn!("Malformed pixel scale ({} values) or tiepoint ({} values)",
                  scale.len(), tiepoint.len());
        }

        if ifd.has_tag(tags::MODEL_TRANSFORMATION_TAG) {
            let matrix = rr.read_tag_f64s(reader, ifd, tags::MODEL_TRANSFORMATION_TAG)?;
            if matrix.len() >= 8 {
                // Row-major 4x4 matrix; only the 2D terms are used
                return Ok(GeoTransform::from_gdal([
                    matrix[3], matrix[0], matrix[1],
                    matrix[7], matrix[4], matrix[5],
                ]));
            }
            warn!("Malformed transformation matrix ({} values)", matrix.len());
        }

        Err(HotspotError::MissingGeoreference)
    }

    /// Read the GDAL no-data marker, if declared
    ///
    /// GDAL_NODATA (42113) is an ASCII tag holding the sentinel as text.
    pub fn read_nodata(
        rr: &RasterReader,
        reader: &mut dyn SeekableReader,
        ifd: &Ifd,
    ) -> Option<f64> {
        if !ifd.has_tag(tags::GDAL_NODATA) {
            return None;
        }

        match rr.read_tag_ascii(reader, ifd, tags::GDAL_NODATA) {
            Ok(text) => match text.trim().parse::<f64>() {
                Ok(value) => {
                    debug!("Declared no-data value: {}", value);
                    Some(value)
                }
                Err(_) => {
                    warn!("Unparseable GDAL_NODATA value: '{}'", text.trim());
                    None
                }
            },
            Err(e) => {
                warn!("Failed to read GDAL_NODATA tag: {}", e);
                None
            }
        }
    }

    /// Parse the GeoKey directory from an IFD
    ///
    /// GeoKeys are stored as a SHORT array: a 4-value header
    /// (version, revision, minor revision, key count) followed by
    /// 4-value entries (key id, tag location, count, value/offset).
    pub fn parse_geo_keys(
        rr: &RasterReader,
        reader: &mut dyn SeekableReader,
        ifd: &Ifd,
    ) -> HotspotResult<Vec<GeoKeyEntry>> {
        if !ifd.has_tag(tags::GEO_KEY_DIRECTORY_TAG) {
            return Ok(Vec::new()); // No GeoKey directory
        }

        let values = rr.read_tag_u64s(reader, ifd, tags::GEO_KEY_DIRECTORY_TAG)?;
        if values.len() < 4 {
            return Err(HotspotError::GenericError("Invalid GeoKey directory header".to_string()));
        }

        let num_keys = values[3] as usize;
        debug!("GeoKey directory: version={}, revision={}.{}, keys={}",
               values[0], values[1], values[2], num_keys);

        let mut keys = Vec::with_capacity(num_keys);
        for i in 0..num_keys {
            let base = 4 + i * 4;
            if base + 3 >= values.len() {
                warn!("GeoKey directory truncated at entry {}", i);
                break;
            }

            let entry = GeoKeyEntry {
                key_id: values[base] as u16,
                tiff_tag_location: values[base + 1] as u16,
                count: values[base + 2] as u16,
                value_offset: values[base + 3] as u16,
            };
            debug!("GeoKey: id={} ({}), location={}, count={}, value={}",
                   entry.key_id, entry.name(), entry.tiff_tag_location,
                   entry.count, entry.value_offset);
            keys.push(entry);
        }

        Ok(keys)
    }

    /// Determine the EPSG code the GeoKeys imply, if any
    ///
    /// Prefers ProjectedCSType over GeographicType; only inline SHORT
    /// values are meaningful for these keys.
    pub fn read_epsg(
        rr: &RasterReader,
        reader: &mut dyn SeekableReader,
        ifd: &Ifd,
    ) -> Option<u32> {
        let keys = match Self::parse_geo_keys(rr, reader, ifd) {
            Ok(keys) => keys,
            Err(e) => {
                warn!("Failed to parse GeoKey directory: {}", e);
                return None;
            }
        };

        let mut geographic = None;
        for key in &keys {
            if key.tiff_tag_location != 0 {
                continue;
            }
            match key.key_id {
                geo_keys::PROJECTED_CS_TYPE => return Some(key.value_offset as u32),
                geo_keys::GEOGRAPHIC_TYPE => geographic = Some(key.value_offset as u32),
                _ => {}
            }
        }

        geographic
    }

    /// Read the GDAL XML metadata block, if present
    pub fn read_gdal_metadata(
        rr: &RasterReader,
        reader: &mut dyn SeekableReader,
        ifd: &Ifd,
    ) -> Option<String> {
        if !ifd.has_tag(tags::GDAL_METADATA) {
            return None;
        }

        rr.read_tag_ascii(reader, ifd, tags::GDAL_METADATA).ok()
    }
}
