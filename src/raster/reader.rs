//! GeoTIFF file reader implementation
//!
//! This module implements the TIFF/BigTIFF container reader used by the
//! hotspot pipeline. It parses the header and IFD chain, exposes typed
//! tag-value access through the already-open reader handle, and
//! assembles the single-band [`RasterGrid`] the analysis stages consume.

use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableReader;
use crate::raster::band::BandDecoder;
use crate::raster::constants::{field_types, header, DEFAULT_NODATA};
use crate::raster::errors::{HotspotError, HotspotResult};
use crate::raster::geo::GeoParser;
use crate::raster::grid::RasterGrid;
use crate::raster::ifd::{Ifd, IfdEntry};
use crate::raster::types::RasterFile;
use crate::utils::logger::Logger;

/// Upper bound on the IFD chain length, guards against cyclic offsets
const MAX_IFDS: usize = 32;

/// Reader for single-band georeferenced TIFF and BigTIFF files
pub struct RasterReader<'a> {
    /// Current byte order handler
    pub(crate) byte_order_handler: Option<Box<dyn ByteOrderHandler>>,
    /// Detected byte order
    pub(crate) byte_order: Option<ByteOrder>,
    /// Logger instance
    #[allow(dead_code)]
    logger: &'a Logger,
    /// Current file path
    current_file: Option<String>,
    /// Whether currently reading BigTIFF format
    pub(crate) is_big_tiff: bool,
}

impl<'a> RasterReader<'a> {
    /// Creates a new raster reader
    pub fn new(logger: &'a Logger) -> Self {
        RasterReader {
            byte_order_handler: None,
            byte_order: None,
            logger,
            current_file: None,
            is_big_tiff: false,
        }
    }

    /// Returns the byte order handler, with proper error handling for None case
    pub(crate) fn handler(&self) -> HotspotResult<&dyn ByteOrderHandler> {
        self.byte_order_handler.as_deref()
            .ok_or_else(|| HotspotError::GenericError("Byte order not yet determined".to_string()))
    }

    /// Loads the single-band grid from a GeoTIFF file
    ///
    /// This is the main entry point of the loader. Opens the file,
    /// parses the container and decodes the primary band together with
    /// its georeferencing.
    ///
    /// # Arguments
    /// * `filepath` - Path to the GeoTIFF file to load
    ///
    /// # Returns
    /// The decoded grid, or an error for unreadable/unsupported files
    pub fn load(&mut self, filepath: &str) -> HotspotResult<RasterGrid> {
        info!("Loading raster file: {}", filepath);
        self.current_file = Some(filepath.to_string());

        let path = Path::new(filepath);
        let file = File::open(path)?;
        let mut reader = BufReader::with_capacity(1024 * 1024, file); // 1MB buffer

        self.read_grid(&mut reader)
    }

    /// Loads only the container structure of a file (for inspection)
    pub fn load_structure(&mut self, filepath: &str) -> HotspotResult<RasterFile> {
        info!("Loading raster structure: {}", filepath);
        self.current_file = Some(filepath.to_string());

        let path = Path::new(filepath);
        let file = File::open(path)?;
        let mut reader = BufReader::with_capacity(1024 * 1024, file);

        self.read_structure(&mut reader)
    }

    /// Reads the container structure from the given reader
    ///
    /// 1. Detect byte order (little/big endian)
    /// 2. Check for TIFF or BigTIFF format
    /// 3. Read the IFD chain
    pub fn read_structure(&mut self, reader: &mut dyn SeekableReader) -> HotspotResult<RasterFile> {
        debug!("RasterReader::read_structure starting");

        reader.seek(SeekFrom::Start(0))?;
        let byte_order = ByteOrder::detect(reader)?;
        self.byte_order = Some(byte_order);
        self.byte_order_handler = Some(byte_order.create_handler());
        debug!("Byte order: {}", byte_order.name());

        let first_ifd_offset = self.read_header(reader)?;
        debug!("First IFD offset: {}", first_ifd_offset);

        let mut file = RasterFile::new(self.is_big_tiff);
        file.ifds = self.read_ifd_chain(reader, first_ifd_offset)?;

        info!("Read {} IFDs from raster file", file.ifds.len());
        Ok(file)
    }

    /// Reads the full grid (structure, georeferencing and band data)
    /// from the given reader
    pub fn read_grid(&mut self, reader: &mut dyn SeekableReader) -> HotspotResult<RasterGrid> {
        let file = self.read_structure(reader)?;

        let ifd = file.primary_ifd()
            .ok_or_else(|| HotspotError::GenericError("File contains no IFDs".to_string()))?;

        let (width, height) = ifd.dimensions()
            .ok_or(HotspotError::MissingDimensions)?;
        let samples = ifd.samples_per_pixel();
        if samples != 1 {
            return Err(HotspotError::NotSingleBand(samples));
        }

        let transform = GeoParser::read_transform(self, reader, ifd)?;
        let nodata = GeoParser::read_nodata(self, reader, ifd).unwrap_or(DEFAULT_NODATA);
        let epsg = GeoParser::read_epsg(self, reader, ifd);

        debug!("Georeferencing: origin=({}, {}), pixel=({}, {}), nodata={}",
               transform.origin_x, transform.origin_y,
               transform.pixel_width, transform.pixel_height, nodata);

        let decoder = BandDecoder::new(self, ifd)?;
        let data = decoder.read_band(reader, nodata)?;

        let mut grid = RasterGrid::from_data(
            height as usize,
            width as usize,
            data,
            transform,
            nodata,
        );
        grid.epsg = epsg;

        info!("Loaded {}x{} grid, {} valid of {} samples",
              grid.cols, grid.rows, grid.valid_count(), grid.total_count());

        Ok(grid)
    }

    /// Validates the version word and reads the first IFD offset
    fn read_header(&mut self, reader: &mut dyn SeekableReader) -> HotspotResult<u64> {
        let handler = self.handler()?;
        let version = handler.read_u16(reader)?;

        match version {
            header::TIFF_VERSION => {
                self.is_big_tiff = false;
                let handler = self.handler()?;
                Ok(handler.read_u32(reader)? as u64)
            }
            header::BIG_TIFF_VERSION => {
                self.is_big_tiff = true;
                let handler = self.handler()?;
                let offset_size = handler.read_u16(reader)?;
                let reserved = handler.read_u16(reader)?;
                if offset_size != header::BIGTIFF_OFFSET_SIZE || reserved != 0 {
                    return Err(HotspotError::InvalidHeader);
                }
                let handler = self.handler()?;
                Ok(handler.read_u64(reader)?)
            }
            other => Err(HotspotError::UnsupportedVersion(other)),
        }
    }

    /// Reads a chain of IFDs starting from the given offset
    ///
    /// The chain is read sequentially; each IFD's trailing next-offset
    /// word follows its entries, so no position recalculation is needed.
    fn read_ifd_chain(&self, reader: &mut dyn SeekableReader, first_ifd_offset: u64) -> HotspotResult<Vec<Ifd>> {
        let mut ifds = Vec::new();
        let mut ifd_offset = first_ifd_offset;

        while ifd_offset != 0 && ifds.len() < MAX_IFDS {
            if ifd_offset < 8 {
                warn!("Suspicious IFD offset {}, stopping IFD chain", ifd_offset);
                break;
            }

            debug!("Reading IFD at offset: {}", ifd_offset);
            let (ifd, next_offset) = self.read_ifd(reader, ifd_offset, ifds.len())?;
            debug!("Read IFD with {} entries, next offset {}", ifd.entry_count(), next_offset);

            ifds.push(ifd);
            ifd_offset = next_offset;
        }

        Ok(ifds)
    }

    /// Reads an IFD and the offset of its successor
    fn read_ifd(&self, reader: &mut dyn SeekableReader, offset: u64, number: usize) -> HotspotResult<(Ifd, u64)> {
        reader.seek(SeekFrom::Start(offset))?;

        let handler = self.handler()?;
        let entry_count = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u16(reader)? as u64
        };

        let mut ifd = Ifd::new(number, offset);

        for _ in 0..entry_count {
            let entry = self.read_ifd_entry(reader)?;
            ifd.add_entry(entry);
        }

        let handler = self.handler()?;
        let next_offset = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u32(reader)? as u64
        };

        Ok((ifd, next_offset))
    }

    /// Reads a single IFD entry, keeping the raw value-field bytes so
    /// inline multi-value tags can be decoded later
    fn read_ifd_entry(&self, reader: &mut dyn SeekableReader) -> HotspotResult<IfdEntry> {
        let handler = self.handler()?;

        let tag = handler.read_u16(reader)?;
        let field_type = handler.read_u16(reader)?;
        let count = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u32(reader)? as u64
        };

        let value_len = if self.is_big_tiff { 8 } else { 4 };
        let mut value_bytes = [0u8; 8];
        reader.read_exact(&mut value_bytes[..value_len])?;

        // Inline values occupy the leading bytes of the value field, so
        // a single SHORT/LONG must be decoded at its own width rather
        // than as a whole offset word (which would misread big-endian
        // files)
        let inline = crate::raster::ifd::field_type_size(field_type) * count as usize <= value_len;
        let mut cursor = Cursor::new(value_bytes);
        let handler = self.handler()?;
        let value_offset = if inline && count == 1 {
            match field_type {
                field_types::BYTE => value_bytes[0] as u64,
                field_types::SHORT => handler.read_u16(&mut cursor)? as u64,
                field_types::LONG => handler.read_u32(&mut cursor)? as u64,
                field_types::LONG8 | field_types::IFD8 => handler.read_u64(&mut cursor)?,
                _ if self.is_big_tiff => handler.read_u64(&mut cursor)?,
                _ => handler.read_u32(&mut cursor)? as u64,
            }
        } else if self.is_big_tiff {
            handler.read_u64(&mut cursor)?
        } else {
            handler.read_u32(&mut cursor)? as u64
        };

        Ok(IfdEntry::new(tag, field_type, count, value_offset, value_bytes))
    }

    /// Reads a tag's values as unsigned integers
    ///
    /// Handles BYTE/SHORT/LONG/LONG8 field types and both inline and
    /// offset-stored values.
    pub fn read_tag_u64s(&self, reader: &mut dyn SeekableReader, ifd: &Ifd, tag: u16) -> HotspotResult<Vec<u64>> {
        let entry = ifd.get_entry(tag)
            .ok_or(HotspotError::TagNotFound(tag))?;

        if entry.is_value_inline(self.is_big_tiff) {
            let mut cursor = Cursor::new(entry.value_bytes);
            self.read_u64_values(&mut cursor, entry)
        } else {
            reader.seek(SeekFrom::Start(entry.value_offset))?;
            self.read_u64_values(reader, entry)
        }
    }

    fn read_u64_values(&self, reader: &mut dyn SeekableReader, entry: &IfdEntry) -> HotspotResult<Vec<u64>> {
        let handler = self.handler()?;
        let mut values = Vec::with_capacity(entry.count as usize);

        for _ in 0..entry.count {
            let value = match entry.field_type {
                field_types::BYTE => {
                    let mut b = [0u8; 1];
                    reader.read_exact(&mut b)?;
                    b[0] as u64
                }
                field_types::SHORT => handler.read_u16(reader)? as u64,
                field_types::LONG => handler.read_u32(reader)? as u64,
                field_types::LONG8 | field_types::IFD8 => handler.read_u64(reader)?,
                other => return Err(HotspotError::UnsupportedFieldType(other)),
            };
            values.push(value);
        }

        Ok(values)
    }

    /// Reads a tag's values as doubles (FLOAT or DOUBLE field types)
    pub fn read_tag_f64s(&self, reader: &mut dyn SeekableReader, ifd: &Ifd, tag: u16) -> HotspotResult<Vec<f64>> {
        let entry = ifd.get_entry(tag)
            .ok_or(HotspotError::TagNotFound(tag))?;

        if entry.is_value_inline(self.is_big_tiff) {
            let mut cursor = Cursor::new(entry.value_bytes);
            self.read_f64_values(&mut cursor, entry)
        } else {
            reader.seek(SeekFrom::Start(entry.value_offset))?;
            self.read_f64_values(reader, entry)
        }
    }

    fn read_f64_values(&self, reader: &mut dyn SeekableReader, entry: &IfdEntry) -> HotspotResult<Vec<f64>> {
        let handler = self.handler()?;
        let mut values = Vec::with_capacity(entry.count as usize);

        for _ in 0..entry.count {
            let value = match entry.field_type {
                field_types::FLOAT => handler.read_f32(reader)? as f64,
                field_types::DOUBLE => handler.read_f64(reader)?,
                other => return Err(HotspotError::UnsupportedFieldType(other)),
            };
            values.push(value);
        }

        Ok(values)
    }

    /// Reads an ASCII tag value, trimming trailing nulls
    pub fn read_tag_ascii(&self, reader: &mut dyn SeekableReader, ifd: &Ifd, tag: u16) -> HotspotResult<String> {
        let entry = ifd.get_entry(tag)
            .ok_or(HotspotError::TagNotFound(tag))?;

        if entry.field_type != field_types::ASCII {
            return Err(HotspotError::UnsupportedFieldType(entry.field_type));
        }

        let mut buffer = vec![0u8; entry.count as usize];
        if entry.is_value_inline(self.is_big_tiff) {
            let len = buffer.len();
            buffer.copy_from_slice(&entry.value_bytes[..len]);
        } else {
            reader.seek(SeekFrom::Start(entry.value_offset))?;
            reader.read_exact(&mut buffer)?;
        }

        crate::utils::string_utils::trim_trailing_nulls(&mut buffer);

        match String::from_utf8(buffer) {
            Ok(s) => Ok(s),
            Err(e) => Err(HotspotError::GenericError(format!("Invalid UTF-8 string: {}", e))),
        }
    }

    /// Gets the file path if available
    pub fn file_path(&self) -> Option<&str> {
        self.current_file.as_deref()
    }

    /// Returns whether the current file is a BigTIFF
    pub fn is_big_tiff(&self) -> bool {
        self.is_big_tiff
    }

    /// Detected byte order, if the header has been read
    pub fn byte_order(&self) -> Option<ByteOrder> {
        self.byte_order
    }
}
