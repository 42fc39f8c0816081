//! GDAL metadata XML parsing
//!
//! The GDAL_METADATA TIFF tag holds an XML document of the form
//! `<GDALMetadata><Item name="...">value</Item>...</GDALMetadata>`.
//! The analyze command shows these items next to the raster structure.

use quick_xml::events::Event;
use quick_xml::Reader;

/// Parse GDAL metadata items into (name, value) pairs
///
/// Malformed documents yield the items parsed up to the error; this is
/// display-only data and never fails the run.
pub fn parse_gdal_metadata(xml: &str) -> Vec<(String, String)> {
    let mut reader = Reader::from_str(xml);
    let mut items = Vec::new();
    let mut current_name: Option<String> = None;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"Item" => {
                current_name = e.attributes()
                    .filter_map(|a| a.ok())
                    .find(|a| a.key.as_ref() == b"name")
                    .and_then(|a| String::from_utf8(a.value.to_vec()).ok());
                text.clear();
            }
            Ok(Event::Text(t)) => {
                if current_name.is_some() {
                    if let Ok(unescaped) = t.unescape() {
                        text.push_str(&unescaped);
                    }
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"Item" => {
                if let Some(name) = current_name.take() {
                    items.push((name, text.trim().to_string()));
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_items() {
        let xml = r#"<GDALMetadata>
  <Item name="UNITS">Celsius</Item>
  <Item name="DESCRIPTION">LST winter composite</Item>
</GDALMetadata>"#;

        let items = parse_gdal_metadata(xml);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], ("UNITS".to_string(), "Celsius".to_string()));
        assert_eq!(items[1].1, "LST winter composite");
    }

    #[test]
    fn test_malformed_document() {
        let items = parse_gdal_metadata("<GDALMetadata><Item name=");
        assert!(items.is_empty());
    }
}
