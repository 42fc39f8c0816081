//! Decompression handlers for strip and tile data
//!
//! GeoTIFF band data arrives uncompressed, Deflate-compressed or
//! Zstandard-compressed; a small Strategy-pattern factory picks the
//! right decoder per the COMPRESSION tag.

use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::raster::constants::compression;
use crate::raster::errors::{HotspotError, HotspotResult};

/// Strategy trait for decompressing band data
pub trait CompressionHandler: Send + Sync {
    /// Decompress the data
    fn decompress(&self, data: &[u8]) -> HotspotResult<Vec<u8>>;

    /// Get the name of this compression method
    fn name(&self) -> &'static str;
}

/// Pass-through handler for uncompressed data (compression code 1)
pub struct UncompressedHandler;

impl CompressionHandler for UncompressedHandler {
    fn decompress(&self, data: &[u8]) -> HotspotResult<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn name(&self) -> &'static str {
        "Uncompressed"
    }
}

/// Adobe Deflate (Zlib) handler (compression code 8)
pub struct AdobeDeflateHandler;

impl CompressionHandler for AdobeDeflateHandler {
    fn decompress(&self, data: &[u8]) -> HotspotResult<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(data);
        let mut decompressed = Vec::new();
        match decoder.read_to_end(&mut decompressed) {
            Ok(_) => Ok(decompressed),
            Err(e) => Err(HotspotError::IoError(e)),
        }
    }

    fn name(&self) -> &'static str {
        "Adobe Deflate"
    }
}

/// Zstandard handler (compression code 14)
pub struct ZstdHandler;

impl CompressionHandler for ZstdHandler {
    fn decompress(&self, data: &[u8]) -> HotspotResult<Vec<u8>> {
        zstd::stream::decode_all(data).map_err(HotspotError::IoError)
    }

    fn name(&self) -> &'static str {
        "Zstandard"
    }
}

/// Factory for creating compression handlers
pub struct CompressionFactory;

impl CompressionFactory {
    /// Create a handler for the given compression code
    pub fn create_handler(code: u64) -> HotspotResult<Box<dyn CompressionHandler>> {
        match code {
            compression::NONE => Ok(Box::new(UncompressedHandler)),
            compression::DEFLATE => Ok(Box::new(AdobeDeflateHandler)),
            compression::ZSTD => Ok(Box::new(ZstdHandler)),
            _ => Err(HotspotError::UnsupportedCompression(code)),
        }
    }
}
