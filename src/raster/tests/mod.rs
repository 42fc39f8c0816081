//! Unit tests for the raster module

#[cfg(test)]
mod ifd_tests;
#[cfg(test)]
mod grid_tests;
