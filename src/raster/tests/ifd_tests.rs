//! Tests for the IFD structures

extern crate std;

use crate::raster::constants::{field_types, tags};
use crate::raster::ifd::{Ifd, IfdEntry};
use crate::raster::types::RasterFile;

fn entry(tag: u16, field_type: u16, count: u64, value: u64) -> IfdEntry {
    IfdEntry::new(tag, field_type, count, value, [0u8; 8])
}

#[test]
fn test_ifd_dimensions() {
    let mut ifd = Ifd::new(0, 8);
    ifd.add_entry(entry(tags::IMAGE_WIDTH, field_types::LONG, 1, 1024));
    ifd.add_entry(entry(tags::IMAGE_LENGTH, field_types::LONG, 1, 768));

    std::assert_eq!(ifd.dimensions(), Some((1024, 768)));
    std::assert_eq!(ifd.samples_per_pixel(), 1);
    std::assert!(!ifd.is_tiled());
    std::assert!(!ifd.is_overview());
}

#[test]
fn test_inline_value_detection() {
    // 3 doubles never fit inline; 1 short always does
    let scale = entry(tags::MODEL_PIXEL_SCALE_TAG, field_types::DOUBLE, 3, 1000);
    std::assert!(!scale.is_value_inline(false));
    std::assert!(!scale.is_value_inline(true));

    let bits = entry(tags::BITS_PER_SAMPLE, field_types::SHORT, 1, 32);
    std::assert!(bits.is_value_inline(false));

    // 2 longs fit only in the BigTIFF value field
    let offsets = entry(tags::STRIP_OFFSETS, field_types::LONG, 2, 0);
    std::assert!(!offsets.is_value_inline(false));
    std::assert!(offsets.is_value_inline(true));
}

#[test]
fn test_primary_ifd_skips_overviews() {
    let mut file = RasterFile::new(false);

    // Overview IFD first (reduced resolution subfile)
    let mut overview = Ifd::new(0, 8);
    overview.add_entry(entry(tags::NEW_SUBFILE_TYPE, field_types::LONG, 1, 1));
    overview.add_entry(entry(tags::IMAGE_WIDTH, field_types::LONG, 1, 512));
    file.ifds.push(overview);

    let mut main = Ifd::new(1, 100);
    main.add_entry(entry(tags::IMAGE_WIDTH, field_types::LONG, 1, 1024));
    main.add_entry(entry(tags::IMAGE_LENGTH, field_types::LONG, 1, 768));
    file.ifds.push(main);

    std::assert_eq!(file.ifd_count(), 2);
    let primary = file.primary_ifd().unwrap();
    std::assert_eq!(primary.dimensions(), Some((1024, 768)));
}
