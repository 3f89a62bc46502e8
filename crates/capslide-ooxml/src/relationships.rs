//! Relationships parsing and modification for OPC parts
//!
//! Every part that references other parts carries a `_rels/*.rels` file mapping
//! relationship IDs to targets. Presentations use them to find slides, slides
//! use them to find their layout, images and notes.
//!
//! # Example
//!
//! ```
//! use capslide_ooxml::Relationships;
//!
//! let mut rels = Relationships::new();
//! let id = rels.add("../slideLayouts/slideLayout7.xml", Relationships::TYPE_SLIDE_LAYOUT);
//! assert_eq!(id, "rId1");
//! assert_eq!(rels.first_of_type(Relationships::TYPE_SLIDE_LAYOUT), Some(("rId1", "../slideLayouts/slideLayout7.xml")));
//! ```

use crate::error::{OoxmlError, Result};
use crate::xml::XmlElement;

/// OPC namespace for relationships
pub const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const REL_TYPE_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Relationship type URIs used by presentations
impl Relationships {
    /// Office document (package root -> presentation.xml)
    pub const TYPE_OFFICE_DOCUMENT: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const TYPE_SLIDE: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const TYPE_SLIDE_LAYOUT: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    pub const TYPE_SLIDE_MASTER: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
    pub const TYPE_NOTES_SLIDE: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";
    pub const TYPE_IMAGE: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const TYPE_HYPERLINK: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
}

/// A single relationship entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Target path (relative to the source part) or URL
    pub target: String,
    /// Relationship type URI
    pub rel_type: String,
    /// `External` for URLs, `None` for parts inside the package
    pub target_mode: Option<String>,
}

impl Relationship {
    /// Internal relationship to another part
    pub fn internal(target: impl Into<String>, rel_type: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            rel_type: rel_type.into(),
            target_mode: None,
        }
    }

    /// Whether the target lives outside the package
    pub fn is_external(&self) -> bool {
        self.target_mode.as_deref() == Some("External")
    }

    /// Last path segment of the type URI, e.g. `slideLayout`
    pub fn short_type(&self) -> &str {
        self.rel_type
            .strip_prefix(REL_TYPE_BASE)
            .map(|rest| rest.trim_start_matches('/'))
            .unwrap_or(&self.rel_type)
    }
}

/// The relationships of one part, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationships {
    entries: Vec<(String, Relationship)>,
}

impl Relationships {
    /// Create an empty relationships map
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `.rels` part
    ///
    /// Entries missing an `Id` or `Target` are skipped.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let root = XmlElement::parse(xml)?;
        if !root.is("Relationships") {
            return Err(OoxmlError::InvalidStructure(format!(
                "expected <Relationships>, found <{}>",
                root.name
            )));
        }

        let mut rels = Self::new();
        for entry in root.children_named("Relationship") {
            let (Some(id), Some(target)) = (entry.attribute("Id"), entry.attribute("Target"))
            else {
                continue;
            };
            rels.insert(
                id,
                Relationship {
                    target: target.to_string(),
                    rel_type: entry.attribute("Type").unwrap_or_default().to_string(),
                    target_mode: entry.attribute("TargetMode").map(str::to_string),
                },
            );
        }
        Ok(rels)
    }

    /// Serialize to a `.rels` part
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut root = XmlElement::new("Relationships").with_attribute("xmlns", RELATIONSHIPS_NS);
        for (id, rel) in &self.entries {
            let mut entry = XmlElement::new("Relationship")
                .with_attribute("Id", id.as_str())
                .with_attribute("Type", rel.rel_type.as_str())
                .with_attribute("Target", rel.target.as_str());
            if let Some(mode) = &rel.target_mode {
                entry.set_attribute("TargetMode", mode.as_str());
            }
            root.push(entry);
        }
        root.to_xml()
    }

    /// Add an internal relationship under the next free `rIdN`; returns the ID
    pub fn add(&mut self, target: impl Into<String>, rel_type: impl Into<String>) -> String {
        let id = self.peek_next_id();
        self.insert(id.clone(), Relationship::internal(target, rel_type));
        id
    }

    /// Insert a relationship under an explicit ID, replacing any previous entry
    ///
    /// Used when copying a part so that `r:id` references inside its XML keep
    /// pointing at the same targets.
    pub fn insert(&mut self, id: impl Into<String>, relationship: Relationship) {
        let id = id.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some(slot) => slot.1 = relationship,
            None => self.entries.push((id, relationship)),
        }
    }

    /// Remove a relationship by ID
    pub fn remove(&mut self, id: &str) -> Option<Relationship> {
        let index = self.entries.iter().position(|(existing, _)| existing == id)?;
        Some(self.entries.remove(index).1)
    }

    /// Target of a relationship ID
    pub fn get(&self, id: &str) -> Option<&str> {
        self.get_relationship(id).map(|rel| rel.target.as_str())
    }

    /// Full relationship for an ID
    pub fn get_relationship(&self, id: &str) -> Option<&Relationship> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, rel)| rel)
    }

    /// `(id, target)` of every relationship of one type
    pub fn of_type<'a>(&'a self, rel_type: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.iter()
            .filter(move |(_, rel)| rel.rel_type == rel_type)
            .map(|(id, rel)| (id, rel.target.as_str()))
    }

    /// First relationship of a type as `(id, target)`
    pub fn first_of_type(&self, rel_type: &str) -> Option<(&str, &str)> {
        self.iter()
            .find(|(_, rel)| rel.rel_type == rel_type)
            .map(|(id, rel)| (id, rel.target.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(id, relationship)` in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Relationship)> {
        self.entries.iter().map(|(id, rel)| (id.as_str(), rel))
    }

    /// The ID [`add`](Self::add) would use next: one past the highest `rIdN`
    pub fn peek_next_id(&self) -> String {
        let highest = self
            .entries
            .iter()
            .filter_map(|(id, _)| id_number(id))
            .max()
            .unwrap_or(0);
        format!("rId{}", highest + 1)
    }
}

/// Numeric suffix of an `rIdN` style ID
fn id_number(id: &str) -> Option<u32> {
    let digits = id.get(..3)?.eq_ignore_ascii_case("rid").then(|| &id[3..])?;
    digits.parse().ok()
}
