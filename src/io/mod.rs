//! I/O utilities for raster file handling
//!
//! This module provides traits and implementations for reading
//! binary raster data in either byte order.

pub mod seekable;
pub mod byte_order;
