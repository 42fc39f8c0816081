//! Seekable reader trait and implementations
//!
//! A unified trait for readers that support both reading and seeking,
//! used by the raster loader for files and in-memory buffers alike.

use std::io::{Read, Seek};

/// Trait for readers that can both read and seek
pub trait SeekableReader: Read + Seek + Send + Sync {}

// Blanket implementation for any type that implements the required traits
impl<T: Read + Seek + Send + Sync> SeekableReader for T {}
