//! # capslide-ooxml
//!
//! OPC (Open Packaging Conventions) plumbing for capslide.
//!
//! This crate provides functionality to:
//! - Unpack and repack PPTX/POTX ZIP archives
//! - Read and edit `.rels` relationship parts and `[Content_Types].xml`
//! - Load XML parts into an owned element tree, edit it, and write it back
//!
//! ## Example: Reading a Part
//!
//! ```no_run
//! use capslide_ooxml::{OoxmlArchive, XmlElement};
//!
//! let archive = OoxmlArchive::open("deck.pptx")?;
//! let presentation = XmlElement::parse(archive.get_required("ppt/presentation.xml")?)?;
//!
//! for slide_id in presentation.descendant(&["sldIdLst"]).into_iter().flat_map(|l| l.elements()) {
//!     println!("{:?}", slide_id.attribute("r:id"));
//! }
//! # Ok::<(), capslide_ooxml::OoxmlError>(())
//! ```

pub mod archive;
pub mod content_types;
pub mod error;
pub mod partname;
pub mod relationships;
pub mod xml;

pub use archive::OoxmlArchive;
pub use content_types::ContentTypes;
pub use error::{OoxmlError, Result};
pub use relationships::{Relationship, Relationships};
pub use xml::{XmlElement, XmlNode};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
