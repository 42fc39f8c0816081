//! Single-band pixel data decoding
//!
//! Reads the sample grid out of stripped or tiled TIFF data, applying
//! decompression and the horizontal predictor where declared, and
//! converting every supported sample type to `f64`.

use log::{debug, info};
use std::io::{Cursor, Read, Seek, SeekFrom};

use byteorder::{BigEndian, ByteOrder as ByteOrderExt, LittleEndian};

use crate::io::byte_order::ByteOrder;
use crate::io::seekable::SeekableReader;
use crate::raster::compression::{CompressionFactory, CompressionHandler};
use crate::raster::constants::{predictor, sample_format, tags};
use crate::raster::errors::{HotspotError, HotspotResult};
use crate::raster::ifd::Ifd;
use crate::raster::reader::RasterReader;
use crate::utils::progress::ProgressTracker;

/// Show a progress bar when at least this many chunks are decoded
const PROGRESS_CHUNK_THRESHOLD: usize = 16;

/// Numeric type of the band samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    U8,
    U16,
    U32,
    I16,
    I32,
    F32,
    F64,
}

impl SampleType {
    /// Resolve the sample type from the SAMPLE_FORMAT and
    /// BITS_PER_SAMPLE tag values
    pub fn from_format(format: u64, bits: u64) -> HotspotResult<Self> {
        match (format, bits) {
            (sample_format::UNSIGNED, 8) => Ok(SampleType::U8),
            (sample_format::UNSIGNED, 16) => Ok(SampleType::U16),
            (sample_format::UNSIGNED, 32) => Ok(SampleType::U32),
            (sample_format::SIGNED, 16) => Ok(SampleType::I16),
            (sample_format::SIGNED, 32) => Ok(SampleType::I32),
            (sample_format::IEEEFP, 32) => Ok(SampleType::F32),
            (sample_format::IEEEFP, 64) => Ok(SampleType::F64),
            _ => Err(HotspotError::UnsupportedSampleFormat { format, bits }),
        }
    }

    /// Size of one sample in bytes
    pub fn byte_size(&self) -> usize {
        match self {
            SampleType::U8 => 1,
            SampleType::U16 | SampleType::I16 => 2,
            SampleType::U32 | SampleType::I32 | SampleType::F32 => 4,
            SampleType::F64 => 8,
        }
    }

    /// Whether the type is an integer format (predictor-eligible)
    pub fn is_integer(&self) -> bool {
        !matches!(self, SampleType::F32 | SampleType::F64)
    }
}

/// Decodes the band of one IFD into an `f64` sample vector
pub struct BandDecoder<'r> {
    rr: &'r RasterReader<'r>,
    ifd: &'r Ifd,
    width: usize,
    height: usize,
    sample_type: SampleType,
    compression: u64,
    predictor: u64,
}

impl<'r> BandDecoder<'r> {
    /// Validate the IFD's sample layout and build a decoder for it
    pub fn new(rr: &'r RasterReader<'r>, ifd: &'r Ifd) -> HotspotResult<Self> {
        let (width, height) = ifd.dimensions()
            .ok_or(HotspotError::MissingDimensions)?;

        let bits = ifd.get_tag_value(tags::BITS_PER_SAMPLE).unwrap_or(8);
        let format = ifd.get_tag_value(tags::SAMPLE_FORMAT).unwrap_or(sample_format::UNSIGNED);
        let sample_type = SampleType::from_format(format, bits)?;

        let compression = ifd.get_tag_value(tags::COMPRESSION).unwrap_or(1);
        let predictor_value = ifd.get_tag_value(tags::PREDICTOR).unwrap_or(predictor::NONE);

        match predictor_value {
            predictor::NONE => {}
            predictor::HORIZONTAL_DIFFERENCING => {
                if !sample_type.is_integer() {
                    return Err(HotspotError::GenericError(
                        "Horizontal predictor declared on floating point samples".to_string()));
                }
            }
            other => {
                return Err(HotspotError::GenericError(
                    format!("Unsupported predictor: {}", other)));
            }
        }

        Ok(BandDecoder {
            rr,
            ifd,
            width: width as usize,
            height: height as usize,
            sample_type,
            compression,
            predictor: predictor_value,
        })
    }

    /// Read the whole band, filling cells not covered by the data
    /// (short final strips) with the given value
    pub fn read_band(&self, reader: &mut dyn SeekableReader, fill: f64) -> HotspotResult<Vec<f64>> {
        let handler = CompressionFactory::create_handler(self.compression)?;
        info!("Decoding {}x{} band, {:?} samples, compression: {}",
              self.width, self.height, self.sample_type, handler.name());

        let mut data = vec![fill; self.width * self.height];

        if self.ifd.is_tiled() {
            self.read_tiles(reader, handler.as_ref(), &mut data)?;
        } else {
            self.read_strips(reader, handler.as_ref(), &mut data)?;
        }

        Ok(data)
    }

    /// Decode strip-organized band data
    fn read_strips(
        &self,
        reader: &mut dyn SeekableReader,
        handler: &dyn CompressionHandler,
        data: &mut [f64],
    ) -> HotspotResult<()> {
        let rows_per_strip = self.ifd.get_tag_value(tags::ROWS_PER_STRIP)
            .unwrap_or(self.height as u64) as usize;
        if rows_per_strip == 0 {
            return Err(HotspotError::GenericError("RowsPerStrip is zero".to_string()));
        }

        let offsets = self.rr.read_tag_u64s(reader, self.ifd, tags::STRIP_OFFSETS)?;
        let byte_counts = self.rr.read_tag_u64s(reader, self.ifd, tags::STRIP_BYTE_COUNTS)?;

        let strip_count = (self.height + rows_per_strip - 1) / rows_per_strip;
        if offsets.len() < strip_count || byte_counts.len() < strip_count {
            return Err(HotspotError::GenericError(format!(
                "Expected {} strips, found {} offsets and {} byte counts",
                strip_count, offsets.len(), byte_counts.len())));
        }

        debug!("Rows per strip: {}, total strips: {}", rows_per_strip, strip_count);
        let progress = (strip_count >= PROGRESS_CHUNK_THRESHOLD)
            .then(|| ProgressTracker::new(strip_count as u64, "Reading strips"));

        for strip_idx in 0..strip_count {
            let strip_start_row = strip_idx * rows_per_strip;
            let rows_in_strip = rows_per_strip.min(self.height - strip_start_row);

            let raw = self.read_chunk(reader, offsets[strip_idx], byte_counts[strip_idx],
                                      handler, self.width, rows_in_strip)?;
            let samples = self.decode_samples(&raw, self.width * rows_in_strip)?;

            let base = strip_start_row * self.width;
            data[base..base + samples.len()].copy_from_slice(&samples);

            if let Some(p) = &progress {
                p.increment(1);
            }
        }

        if let Some(p) = &progress {
            p.finish();
        }

        Ok(())
    }

    /// Decode tile-organized band data
    fn read_tiles(
        &self,
        reader: &mut dyn SeekableReader,
        handler: &dyn CompressionHandler,
        data: &mut [f64],
    ) -> HotspotResult<()> {
        let tile_width = self.ifd.get_tag_value(tags::TILE_WIDTH)
            .ok_or(HotspotError::TagNotFound(tags::TILE_WIDTH))? as usize;
        let tile_length = self.ifd.get_tag_value(tags::TILE_LENGTH)
            .ok_or(HotspotError::TagNotFound(tags::TILE_LENGTH))? as usize;
        if tile_width == 0 || tile_length == 0 {
            return Err(HotspotError::GenericError("Tile dimensions are zero".to_string()));
        }

        let offsets = self.rr.read_tag_u64s(reader, self.ifd, tags::TILE_OFFSETS)?;
        let byte_counts = self.rr.read_tag_u64s(reader, self.ifd, tags::TILE_BYTE_COUNTS)?;

        let tiles_across = (self.width + tile_width - 1) / tile_width;
        let tiles_down = (self.height + tile_length - 1) / tile_length;
        let tile_count = tiles_across * tiles_down;
        if offsets.len() < tile_count || byte_counts.len() < tile_count {
            return Err(HotspotError::GenericError(format!(
                "Expected {} tiles, found {} offsets and {} byte counts",
                tile_count, offsets.len(), byte_counts.len())));
        }

        debug!("Tiles: {}x{} pixels, {} across, {} down", tile_width, tile_length,
               tiles_across, tiles_down);
        let progress = (tile_count >= PROGRESS_CHUNK_THRESHOLD)
            .then(|| ProgressTracker::new(tile_count as u64, "Reading tiles"));

        for tile_y in 0..tiles_down {
            for tile_x in 0..tiles_across {
                let tile_idx = tile_y * tiles_across + tile_x;
                let raw = self.read_chunk(reader, offsets[tile_idx], byte_counts[tile_idx],
                                          handler, tile_width, tile_length)?;
                // Tiles are always padded to full size
                let samples = self.decode_samples(&raw, tile_width * tile_length)?;

                let origin_row = tile_y * tile_length;
                let origin_col = tile_x * tile_width;
                let copy_rows = tile_length.min(self.height - origin_row);
                let copy_cols = tile_width.min(self.width - origin_col);

                for row in 0..copy_rows {
                    let src = row * tile_width;
                    let dst = (origin_row + row) * self.width + origin_col;
                    data[dst..dst + copy_cols].copy_from_slice(&samples[src..src + copy_cols]);
                }

                if let Some(p) = &progress {
                    p.increment(1);
                }
            }
        }

        if let Some(p) = &progress {
            p.finish();
        }

        Ok(())
    }

    /// Read one strip/tile, decompress it and undo the predictor
    fn read_chunk(
        &self,
        reader: &mut dyn SeekableReader,
        offset: u64,
        byte_count: u64,
        handler: &dyn CompressionHandler,
        row_samples: usize,
        rows: usize,
    ) -> HotspotResult<Vec<u8>> {
        reader.seek(SeekFrom::Start(offset))?;
        let mut compressed = vec![0u8; byte_count as usize];
        reader.read_exact(&mut compressed)?;

        let mut chunk = handler.decompress(&compressed)?;

        let needed = row_samples * rows * self.sample_type.byte_size();
        if chunk.len() < needed {
            return Err(HotspotError::GenericError(format!(
                "Chunk at offset {} too short: {} bytes, expected {}",
                offset, chunk.len(), needed)));
        }

        if self.predictor == predictor::HORIZONTAL_DIFFERENCING {
            let order = self.rr.byte_order()
                .ok_or_else(|| HotspotError::GenericError("Byte order not yet determined".to_string()))?;
            apply_horizontal_predictor(&mut chunk, row_samples, rows,
                                       self.sample_type.byte_size(), order);
        }

        Ok(chunk)
    }

    /// Convert raw chunk bytes into f64 samples
    fn decode_samples(&self, bytes: &[u8], count: usize) -> HotspotResult<Vec<f64>> {
        let handler = self.rr.handler()?;
        let mut cursor = Cursor::new(bytes);
        let mut samples = Vec::with_capacity(count);

        for _ in 0..count {
            let value = match self.sample_type {
                SampleType::U8 => {
                    let mut b = [0u8; 1];
                    cursor.read_exact(&mut b)?;
                    b[0] as f64
                }
                SampleType::U16 => handler.read_u16(&mut cursor)? as f64,
                SampleType::U32 => handler.read_u32(&mut cursor)? as f64,
                SampleType::I16 => handler.read_i16(&mut cursor)? as f64,
                SampleType::I32 => handler.read_i32(&mut cursor)? as f64,
                SampleType::F32 => handler.read_f32(&mut cursor)? as f64,
                SampleType::F64 => handler.read_f64(&mut cursor)?,
            };
            samples.push(value);
        }

        Ok(samples)
    }
}

/// Undo TIFF horizontal differencing in place
///
/// Operates on the raw bytes of integer samples, row by row, honoring
/// the file byte order for multi-byte sample widths.
fn apply_horizontal_predictor(
    data: &mut [u8],
    row_samples: usize,
    rows: usize,
    bytes_per_sample: usize,
    order: ByteOrder,
) {
    for row in 0..rows {
        let row_start = row * row_samples * bytes_per_sample;
        for i in 1..row_samples {
            let prev = row_start + (i - 1) * bytes_per_sample;
            let cur = row_start + i * bytes_per_sample;
            match bytes_per_sample {
                1 => {
                    data[cur] = data[cur].wrapping_add(data[prev]);
                }
                2 => {
                    let (p, c) = match order {
                        ByteOrder::LittleEndian => (
                            LittleEndian::read_u16(&data[prev..prev + 2]),
                            LittleEndian::read_u16(&data[cur..cur + 2]),
                        ),
                        ByteOrder::BigEndian => (
                            BigEndian::read_u16(&data[prev..prev + 2]),
                            BigEndian::read_u16(&data[cur..cur + 2]),
                        ),
                    };
                    let sum = c.wrapping_add(p);
                    match order {
                        ByteOrder::LittleEndian => LittleEndian::write_u16(&mut data[cur..cur + 2], sum),
                        ByteOrder::BigEndian => BigEndian::write_u16(&mut data[cur..cur + 2], sum),
                    }
                }
                4 => {
                    let (p, c) = match order {
                        ByteOrder::LittleEndian => (
                            LittleEndian::read_u32(&data[prev..prev + 4]),
                            LittleEndian::read_u32(&data[cur..cur + 4]),
                        ),
                        ByteOrder::BigEndian => (
                            BigEndian::read_u32(&data[prev..prev + 4]),
                            BigEndian::read_u32(&data[cur..cur + 4]),
                        ),
                    };
                    let sum = c.wrapping_add(p);
                    match order {
                        ByteOrder::LittleEndian => LittleEndian::write_u32(&mut data[cur..cur + 4], sum),
                        ByteOrder::BigEndian => BigEndian::write_u32(&mut data[cur..cur + 4], sum),
                    }
                }
                _ => {}
            }
        }
    }
}
