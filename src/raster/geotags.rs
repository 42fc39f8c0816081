//! GeoTIFF tag name registry
//!
//! Display names for TIFF tags, GeoKeys and CRS codes, loaded from an
//! embedded TOML table. Used by the analyze command when printing the
//! raster structure.

use std::collections::HashMap;
use lazy_static::lazy_static;
use crate::raster::constants::epsg;
use crate::raster::errors::{HotspotError, HotspotResult};

lazy_static! {
    // Parse the TOML table at startup
    static ref TAG_DEFINITIONS: TagDefinitions = {
        let content = include_str!("../../geotiff_tags.toml");
        TagDefinitions::from_str(content).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to parse GeoTIFF tag definitions: {}", e);
            TagDefinitions::default()
        })
    };
}

/// Container for tag and key display names
#[derive(Debug, Default)]
pub struct TagDefinitions {
    // Maps tag IDs to tag names
    pub tag_names: HashMap<u16, String>,
    // Maps GeoKey IDs to key names
    pub key_names: HashMap<u16, String>,
    // Maps geographic CS codes to names
    pub geographic_cs_names: HashMap<u32, String>,
    // Maps projected CS codes to names
    pub projected_cs_names: HashMap<u32, String>,
}

impl TagDefinitions {
    /// Parse definitions from a TOML string
    pub fn from_str(content: &str) -> HotspotResult<Self> {
        let toml_value: toml::Value = match content.parse() {
            Ok(value) => value,
            Err(e) => return Err(HotspotError::GenericError(format!("Failed to parse TOML: {}", e))),
        };

        let mut defs = TagDefinitions::default();

        Self::parse_table_u16(&toml_value, "tag_ids", &mut defs.tag_names);
        Self::parse_table_u16(&toml_value, "key_ids", &mut defs.key_names);
        Self::parse_table_u32(&toml_value, "geographic_cs_codes", &mut defs.geographic_cs_names);
        Self::parse_table_u32(&toml_value, "projected_cs_codes", &mut defs.projected_cs_names);

        Ok(defs)
    }

    /// Helper to parse a u16-keyed name table from TOML
    fn parse_table_u16(toml_value: &toml::Value, table_name: &str, target: &mut HashMap<u16, String>) {
        if let Some(table) = toml_value.get(table_name).and_then(|v| v.as_table()) {
            for (k, v) in table {
                if let (Ok(id), Some(name)) = (k.parse::<u16>(), v.as_str()) {
                    target.insert(id, name.to_string());
                }
            }
        }
    }

    /// Helper to parse a u32-keyed name table from TOML
    fn parse_table_u32(toml_value: &toml::Value, table_name: &str, target: &mut HashMap<u32, String>) {
        if let Some(table) = toml_value.get(table_name).and_then(|v| v.as_table()) {
            for (k, v) in table {
                if let (Ok(id), Some(name)) = (k.parse::<u32>(), v.as_str()) {
                    target.insert(id, name.to_string());
                }
            }
        }
    }

    /// Get a tag name by ID
    pub fn tag_name(&self, tag_id: u16) -> String {
        self.tag_names.get(&tag_id)
            .cloned()
            .unwrap_or_else(|| format!("Unknown-{}", tag_id))
    }

    /// Get a GeoKey name by ID
    pub fn key_name(&self, key_id: u16) -> String {
        self.key_names.get(&key_id)
            .cloned()
            .unwrap_or_else(|| format!("Unknown-{}", key_id))
    }

    /// Get a human-readable CRS description for an EPSG code
    pub fn crs_description(&self, code: u32) -> String {
        match code {
            epsg::WGS84 => "WGS 84 (EPSG:4326, standard latitude/longitude)".to_string(),
            epsg::WGS84_WEB_MERCATOR => "WGS 84 / Web Mercator (EPSG:3857)".to_string(),
            32600..=32660 => format!("WGS 84 / UTM Northern Hemisphere zone {}", code - 32600),
            32700..=32760 => format!("WGS 84 / UTM Southern Hemisphere zone {}", code - 32700),
            _ => self.geographic_cs_names.get(&code)
                .or_else(|| self.projected_cs_names.get(&code))
                .cloned()
                .unwrap_or_else(|| format!("EPSG:{}", code)),
        }
    }
}

/// Get a TIFF tag name
pub fn get_tag_name(tag: u16) -> String {
    TAG_DEFINITIONS.tag_name(tag)
}

/// Get a GeoKey name
pub fn get_key_name(key: u16) -> String {
    TAG_DEFINITIONS.key_name(key)
}

/// Get a CRS description for an EPSG code
pub fn get_crs_description(code: u32) -> String {
    TAG_DEFINITIONS.crs_description(code)
}
