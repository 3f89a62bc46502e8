//! `[Content_Types].xml` handling
//!
//! Every part in a package needs a content type, either through a `Default`
//! entry keyed by extension or an `Override` keyed by part name.

use crate::error::Result;
use crate::xml::XmlElement;

/// Path of the content types part inside the archive
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// OPC namespace for content types
pub const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

/// Content type of a PresentationML slide part
pub const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";

/// Parsed content types
#[derive(Debug, Clone)]
pub struct ContentTypes {
    root: XmlElement,
}

impl Default for ContentTypes {
    fn default() -> Self {
        Self {
            root: XmlElement::new("Types").with_attribute("xmlns", CONTENT_TYPES_NS),
        }
    }
}

impl ContentTypes {
    /// Parse `[Content_Types].xml`
    pub fn parse(xml: &[u8]) -> Result<Self> {
        Ok(Self {
            root: XmlElement::parse(xml)?,
        })
    }

    /// Serialize back to XML
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        self.root.to_xml()
    }

    /// Content type registered for a part, checking overrides then defaults
    pub fn content_type_of(&self, part: &str) -> Option<&str> {
        let part_name = format!("/{}", part.trim_start_matches('/'));
        let by_override = self
            .root
            .children_named("Override")
            .find(|e| e.attribute("PartName") == Some(part_name.as_str()))
            .and_then(|e| e.attribute("ContentType"));

        by_override.or_else(|| {
            let extension = part.rsplit_once('.')?.1;
            self.root
                .children_named("Default")
                .find(|e| {
                    e.attribute("Extension")
                        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
                })
                .and_then(|e| e.attribute("ContentType"))
        })
    }

    /// Register an override for a part, replacing an existing one
    pub fn set_override(&mut self, part: &str, content_type: &str) {
        self.remove_override(part);
        let part_name = format!("/{}", part.trim_start_matches('/'));
        self.root.push(
            XmlElement::new("Override")
                .with_attribute("PartName", part_name)
                .with_attribute("ContentType", content_type),
        );
    }

    /// Drop the override for a part; returns whether one existed
    pub fn remove_override(&mut self, part: &str) -> bool {
        let part_name = format!("/{}", part.trim_start_matches('/'));
        self.root.remove_elements(|e| {
            e.is("Override") && e.attribute("PartName") == Some(part_name.as_str())
        }) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TYPES: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="PNG" ContentType="image/png"/>
  <Override PartName="/ppt/slides/slide1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>
</Types>"#;

    #[test]
    fn test_lookup() {
        let types = ContentTypes::parse(TYPES).unwrap();

        assert_eq!(types.content_type_of("ppt/slides/slide1.xml"), Some(CT_SLIDE));
        assert_eq!(
            types.content_type_of("ppt/media/image1.png"),
            Some("image/png")
        );
        assert_eq!(types.content_type_of("ppt/slides/slide2.xml"), None);
    }

    #[test]
    fn test_set_and_remove_override() {
        let mut types = ContentTypes::parse(TYPES).unwrap();

        types.set_override("ppt/slides/slide2.xml", CT_SLIDE);
        assert_eq!(types.content_type_of("ppt/slides/slide2.xml"), Some(CT_SLIDE));

        assert!(types.remove_override("ppt/slides/slide1.xml"));
        assert!(!types.remove_override("ppt/slides/slide1.xml"));
        assert_eq!(types.content_type_of("ppt/slides/slide1.xml"), None);

        let xml = String::from_utf8(types.to_xml().unwrap()).unwrap();
        assert!(xml.contains(r#"PartName="/ppt/slides/slide2.xml""#));
        assert!(!xml.contains(r#"PartName="/ppt/slides/slide1.xml""#));
    }

    #[test]
    fn test_default_is_empty_types() {
        let mut types = ContentTypes::default();
        types.set_override("/ppt/presentation.xml", "application/xml");
        assert_eq!(
            types.content_type_of("ppt/presentation.xml"),
            Some("application/xml")
        );
    }
}
