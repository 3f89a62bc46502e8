//! Slide layouts and blank-layout recognition.
//!
//! Generated slides are always built on a blank layout, so templates are
//! checked against a small set of known blank layout names.

use capslide_ooxml::XmlElement;

/// Layout names treated as "Blank" (compared case-insensitively)
pub const BLANK_LAYOUT_NAMES: &[&str] = &["Blank", "空白"];

/// A slide layout part of the presentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideLayout {
    /// Part name, e.g. `ppt/slideLayouts/slideLayout7.xml`
    pub part: String,

    /// Display name from `p:cSld/@name`
    pub name: String,

    /// `p:sldLayout/@type` (e.g. "blank", "title"), if present
    pub layout_type: Option<String>,

    /// Owning slide master part, if reachable from one
    pub master: Option<String>,
}

impl SlideLayout {
    /// Read a layout from its part XML
    pub fn from_xml(part: impl Into<String>, root: &XmlElement, master: Option<String>) -> Self {
        let name = root
            .child("cSld")
            .and_then(|c| c.attribute("name"))
            .unwrap_or_default()
            .to_string();

        Self {
            part: part.into(),
            name,
            layout_type: root.attribute("type").map(str::to_string),
            master,
        }
    }

    /// Whether this layout counts as blank by name
    pub fn is_blank(&self) -> bool {
        is_blank_layout_name(&self.name)
    }
}

/// Whether a layout name is one of the recognized blank layout names
pub fn is_blank_layout_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    BLANK_LAYOUT_NAMES
        .iter()
        .any(|blank| blank.to_lowercase() == lower)
}
