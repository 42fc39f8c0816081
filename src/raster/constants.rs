//! TIFF format constants
//!
//! Constants used throughout the raster loading code, replacing magic
//! numbers with descriptive names. Only the subset of the TIFF/GeoTIFF
//! vocabulary needed for single-band georeferenced rasters is kept.

/// TIFF header constants
pub mod header {
    /// Standard TIFF version number (42)
    pub const TIFF_VERSION: u16 = 42;

    /// BigTIFF version number (43)
    pub const BIG_TIFF_VERSION: u16 = 43;

    /// BigTIFF offset size (8 bytes)
    pub const BIGTIFF_OFFSET_SIZE: u16 = 8;
}

/// Field types as defined in the TIFF spec
pub mod field_types {
    pub const BYTE: u16 = 1;       // 8-bit unsigned integer
    pub const ASCII: u16 = 2;      // 8-bit byte containing ASCII character
    pub const SHORT: u16 = 3;      // 16-bit unsigned integer
    pub const LONG: u16 = 4;       // 32-bit unsigned integer
    pub const RATIONAL: u16 = 5;   // Two LONGs: numerator and denominator
    pub const SBYTE: u16 = 6;      // 8-bit signed integer
    pub const UNDEFINED: u16 = 7;  // 8-bit byte with unspecified format
    pub const SSHORT: u16 = 8;     // 16-bit signed integer
    pub const SLONG: u16 = 9;      // 32-bit signed integer
    pub const SRATIONAL: u16 = 10; // Two SLONGs: numerator and denominator
    pub const FLOAT: u16 = 11;     // Single precision IEEE floating point
    pub const DOUBLE: u16 = 12;    // Double precision IEEE floating point
    pub const LONG8: u16 = 16;     // BigTIFF 64-bit unsigned integer
    pub const SLONG8: u16 = 17;    // BigTIFF 64-bit signed integer
    pub const IFD8: u16 = 18;      // BigTIFF 64-bit IFD offset
}

/// Standard TIFF tags
pub mod tags {
    // Basic image structure tags
    pub const NEW_SUBFILE_TYPE: u16 = 254;           // Subfile data descriptor
    pub const IMAGE_WIDTH: u16 = 256;                // Width of the image in pixels
    pub const IMAGE_LENGTH: u16 = 257;               // Height of the image in pixels
    pub const BITS_PER_SAMPLE: u16 = 258;            // Bits per component
    pub const COMPRESSION: u16 = 259;                // Compression scheme
    pub const PHOTOMETRIC_INTERPRETATION: u16 = 262; // Color space of image data
    pub const STRIP_OFFSETS: u16 = 273;              // Offsets to the data strips
    pub const SAMPLES_PER_PIXEL: u16 = 277;          // Number of components per pixel
    pub const ROWS_PER_STRIP: u16 = 278;             // Rows per strip of data
    pub const STRIP_BYTE_COUNTS: u16 = 279;          // Byte counts for strips
    pub const PLANAR_CONFIGURATION: u16 = 284;       // How components are stored
    pub const PREDICTOR: u16 = 317;                  // Prediction scheme used on image data
    pub const TILE_WIDTH: u16 = 322;                 // Width of a tile
    pub const TILE_LENGTH: u16 = 323;                // Length of a tile
    pub const TILE_OFFSETS: u16 = 324;               // Offsets to the data tiles
    pub const TILE_BYTE_COUNTS: u16 = 325;           // Byte counts for tiles
    pub const SAMPLE_FORMAT: u16 = 339;              // Interpretation of sample data

    // GeoTIFF tags
    pub const MODEL_PIXEL_SCALE_TAG: u16 = 33550;    // Pixel size in map units
    pub const MODEL_TIEPOINT_TAG: u16 = 33922;       // Links raster to world coordinates
    pub const MODEL_TRANSFORMATION_TAG: u16 = 34264; // Full 4x4 transformation matrix
    pub const GEO_KEY_DIRECTORY_TAG: u16 = 34735;    // GeoTIFF keys structure
    pub const GEO_DOUBLE_PARAMS_TAG: u16 = 34736;    // GeoTIFF double parameters
    pub const GEO_ASCII_PARAMS_TAG: u16 = 34737;     // GeoTIFF ASCII parameters

    // GDAL specific tags
    pub const GDAL_METADATA: u16 = 42112;            // XML metadata
    pub const GDAL_NODATA: u16 = 42113;              // NoData marker value
}

/// Compression types
pub mod compression {
    pub const NONE: u64 = 1;     // No compression
    pub const DEFLATE: u64 = 8;  // Adobe Deflate (zlib)
    pub const ZSTD: u64 = 14;    // Zstandard compression
}

/// Sample format values
pub mod sample_format {
    pub const UNSIGNED: u64 = 1; // Unsigned integer data
    pub const SIGNED: u64 = 2;   // Signed integer data
    pub const IEEEFP: u64 = 3;   // IEEE floating point data
}

/// Planar configuration values
pub mod planar_config {
    pub const CHUNKY: u64 = 1;   // Components stored interleaved
}

/// Predictor values
pub mod predictor {
    pub const NONE: u64 = 1;                    // No prediction scheme
    pub const HORIZONTAL_DIFFERENCING: u64 = 2; // Horizontal differencing
    pub const FLOATING_POINT: u64 = 3;          // Floating point predictor
}

/// Subfile type bit flags
pub mod new_subfile_type {
    pub const REDUCED_RESOLUTION: u64 = 1; // Reduced resolution version of another image
}

/// GeoTIFF Key ID constants
pub mod geo_keys {
    pub const MODEL_TYPE: u16 = 1024;        // GTModelTypeGeoKey
    pub const RASTER_TYPE: u16 = 1025;       // GTRasterTypeGeoKey
    pub const GEOGRAPHIC_TYPE: u16 = 2048;   // GeographicTypeGeoKey
    pub const PROJECTED_CS_TYPE: u16 = 3072; // ProjectedCSTypeGeoKey
}

/// EPSG code constants for common coordinate systems
pub mod epsg {
    pub const WGS84: u32 = 4326;              // WGS84 geographic
    pub const WGS84_WEB_MERCATOR: u32 = 3857; // Web Mercator
}

/// Default no-data sentinel when the source declares none
pub const DEFAULT_NODATA: f64 = -9999.0;
