//! In-memory presentation document.
//!
//! Loads a PPTX/POTX package, exposes its slides in `p:sldIdLst` order and
//! the layouts of its slide masters, and supports the edits needed to clone
//! slides: adding a slide on a layout, importing shapes from another slide,
//! and removing a slide. Everything is written back on [`Presentation::save`].

use std::collections::HashMap;
use std::path::Path;

use capslide_ooxml::content_types::{CONTENT_TYPES_PART, CT_SLIDE};
use capslide_ooxml::{partname, ContentTypes, OoxmlArchive, Relationships, XmlElement};
use tracing::debug;

use crate::constants::{NS_DRAWING, NS_PRESENTATION, NS_RELATIONSHIPS};
use crate::error::{PptxError, Result};
use crate::layout::SlideLayout;
use crate::slide::{is_shape, Slide};

/// Default location of the main presentation part
const DEFAULT_PRESENTATION_PART: &str = "ppt/presentation.xml";

/// Smallest slide id PowerPoint accepts
const MIN_SLIDE_ID: u32 = 256;

/// A loaded presentation package
#[derive(Debug, Clone)]
pub struct Presentation {
    archive: OoxmlArchive,
    content_types: ContentTypes,
    part: String,
    root: XmlElement,
    rels: Relationships,
    slides: Vec<Slide>,
    layouts: Vec<SlideLayout>,
}

impl Presentation {
    /// Load a presentation from a file path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let archive = OoxmlArchive::open(path)?;
        Self::from_archive(archive)
    }

    /// Load a presentation from bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_archive(OoxmlArchive::from_bytes(data)?)
    }

    /// Load a presentation from an unpacked archive
    pub fn from_archive(archive: OoxmlArchive) -> Result<Self> {
        let content_types = ContentTypes::parse(archive.get_required(CONTENT_TYPES_PART)?)?;

        let part = match archive.get(&partname::rels_part("")) {
            Some(xml) => Relationships::parse(xml)?
                .first_of_type(Relationships::TYPE_OFFICE_DOCUMENT)
                .map(|(_, target)| partname::resolve("", target))
                .unwrap_or_else(|| DEFAULT_PRESENTATION_PART.to_string()),
            None => DEFAULT_PRESENTATION_PART.to_string(),
        };

        let root = XmlElement::parse(archive.get_required(&part)?)?;
        if !root.is("presentation") {
            return Err(PptxError::invalid_presentation(format!(
                "{} is not a presentation part (root <{}>)",
                part, root.name
            )));
        }
        let rels = load_rels(&archive, &part)?;

        let mut slides = Vec::new();
        if let Some(list) = root.child("sldIdLst") {
            for slide_id in list.children_named("sldId") {
                let rel_id = relationship_id(slide_id).ok_or_else(|| {
                    PptxError::invalid_presentation("slide id entry without relationship id")
                })?;
                let target = rels.get(rel_id).ok_or_else(|| {
                    PptxError::invalid_presentation(format!(
                        "slide relationship {} is missing",
                        rel_id
                    ))
                })?;
                let slide_part = partname::resolve(&part, target);
                slides.push(load_slide(&archive, slide_part)?);
            }
        }

        let layouts = load_layouts(&archive, &part, &root, &rels, &slides)?;

        debug!(
            part = %part,
            slides = slides.len(),
            layouts = layouts.len(),
            "Loaded presentation"
        );

        Ok(Self {
            archive,
            content_types,
            part,
            root,
            rels,
            slides,
            layouts,
        })
    }

    /// Number of slides
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// All slides in presentation order
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Get a slide by 1-based number
    pub fn slide(&self, number: usize) -> Option<&Slide> {
        number.checked_sub(1).and_then(|i| self.slides.get(i))
    }

    /// Get a slide by 1-based number, mutably
    pub fn slide_mut(&mut self, number: usize) -> Option<&mut Slide> {
        number.checked_sub(1).and_then(|i| self.slides.get_mut(i))
    }

    /// Layouts of all slide masters, in master then layout order
    pub fn layouts(&self) -> &[SlideLayout] {
        &self.layouts
    }

    /// The layout a slide is based on
    pub fn layout_of(&self, slide: &Slide) -> Option<&SlideLayout> {
        let part = slide.layout_part()?;
        self.layouts.iter().find(|l| l.part == part)
    }

    /// First layout whose name matches one of `names`, trying names in order
    pub fn layout_by_name(&self, names: &[&str]) -> Option<&SlideLayout> {
        names.iter().find_map(|name| {
            let wanted = name.to_lowercase();
            self.layouts
                .iter()
                .find(|l| l.name.to_lowercase() == wanted)
        })
    }

    /// Append an empty slide based on a layout; returns its 1-based number
    ///
    /// Namespace declarations are taken from `namespaces_from` when given so
    /// that shapes copied from that slide stay well-formed.
    pub fn add_slide(
        &mut self,
        layout_part: &str,
        namespaces_from: Option<usize>,
    ) -> Result<usize> {
        if !self.layouts.iter().any(|l| l.part == layout_part) {
            return Err(PptxError::invalid_presentation(format!(
                "unknown slide layout {}",
                layout_part
            )));
        }

        let slide_part = self.next_slide_part();

        let mut root = XmlElement::new("p:sld")
            .with_attribute("xmlns:a", NS_DRAWING)
            .with_attribute("xmlns:r", NS_RELATIONSHIPS)
            .with_attribute("xmlns:p", NS_PRESENTATION);
        if let Some(source) = namespaces_from.and_then(|n| self.slide(n)) {
            for (key, value) in &source.root().attributes {
                if key.starts_with("xmlns") || key == "mc:Ignorable" {
                    root.set_attribute(key.clone(), value.clone());
                }
            }
        }
        let root = root
            .with_child(XmlElement::new("p:cSld").with_child(empty_shape_tree()))
            .with_child(
                XmlElement::new("p:clrMapOvr").with_child(XmlElement::new("a:masterClrMapping")),
            );

        let mut slide_rels = Relationships::new();
        slide_rels.add(
            partname::relative(&slide_part, layout_part),
            Relationships::TYPE_SLIDE_LAYOUT,
        );

        let rel_id = self.rels.add(
            partname::relative(&self.part, &slide_part),
            Relationships::TYPE_SLIDE,
        );
        let slide_id = self.next_slide_id();
        self.slide_id_list_mut().push(
            XmlElement::new("p:sldId")
                .with_attribute("id", slide_id.to_string())
                .with_attribute("r:id", rel_id),
        );
        self.content_types.set_override(&slide_part, CT_SLIDE);

        debug!(part = %slide_part, layout = %layout_part, "Added slide");

        self.slides.push(Slide::new(
            slide_part,
            root,
            slide_rels,
            Some(layout_part.to_string()),
        ));
        Ok(self.slides.len())
    }

    /// Deep-copy every shape of slide `source` into slide `target`
    ///
    /// Relationships used by the copied shapes (images, hyperlinks, media)
    /// are carried over. IDs that clash with the target's own relationships
    /// are renumbered and the copied `r:*` attributes rewritten to match.
    /// Returns the number of shapes copied.
    pub fn import_shapes(&mut self, source: usize, target: usize) -> Result<usize> {
        let source_slide = self
            .slide(source)
            .ok_or_else(|| PptxError::invalid_presentation(format!("no slide {}", source)))?;
        let mut shapes: Vec<XmlElement> = source_slide
            .shape_tree()
            .into_iter()
            .flat_map(|tree| tree.elements())
            .filter(|e| is_shape(e))
            .cloned()
            .collect();
        let source_part = source_slide.part_name().to_string();
        let carried: Vec<(String, capslide_ooxml::Relationship)> = source_slide
            .relationships()
            .iter()
            .filter(|(_, rel)| {
                rel.rel_type != Relationships::TYPE_SLIDE_LAYOUT
                    && rel.rel_type != Relationships::TYPE_NOTES_SLIDE
            })
            .map(|(id, rel)| (id.to_string(), rel.clone()))
            .collect();

        let target_slide = self
            .slide_mut(target)
            .ok_or_else(|| PptxError::invalid_presentation(format!("no slide {}", target)))?;
        let target_part = target_slide.part_name().to_string();

        let mut renamed = HashMap::new();
        for (id, mut rel) in carried {
            debug!(id = %id, kind = rel.short_type(), "Carrying relationship");
            if !rel.is_external() {
                let absolute = partname::resolve(&source_part, &rel.target);
                rel.target = partname::relative(&target_part, &absolute);
            }
            let rels = target_slide.relationships_mut();
            if rels.get(&id).is_some() {
                let new_id = rels.peek_next_id();
                rels.insert(new_id.clone(), rel);
                renamed.insert(id, new_id);
            } else {
                rels.insert(id, rel);
            }
        }

        if !renamed.is_empty() {
            for shape in &mut shapes {
                rewrite_relationship_ids(shape, &renamed);
            }
        }

        let count = shapes.len();
        let tree = target_slide.shape_tree_mut().ok_or_else(|| {
            PptxError::invalid_presentation(format!("{} has no shape tree", target_part))
        })?;
        for shape in shapes {
            tree.insert_before(shape, "extLst");
        }
        Ok(count)
    }

    /// Remove a slide by 1-based number, dropping its part, relationships,
    /// content type and notes slide
    pub fn remove_slide(&mut self, number: usize) -> Result<Slide> {
        if number == 0 || number > self.slides.len() {
            return Err(PptxError::invalid_presentation(format!(
                "cannot remove slide {} of {}",
                number,
                self.slides.len()
            )));
        }
        let slide = self.slides.remove(number - 1);
        let slide_part = slide.part_name().to_string();

        let rel_id = self
            .rels
            .of_type(Relationships::TYPE_SLIDE)
            .find(|(_, target)| partname::resolve(&self.part, target) == slide_part)
            .map(|(id, _)| id.to_string());
        if let Some(rel_id) = rel_id {
            self.slide_id_list_mut()
                .remove_elements(|e| relationship_id(e) == Some(rel_id.as_str()));
            self.rels.remove(&rel_id);
        }

        self.drop_part(&slide_part);
        if let Some((_, notes)) = slide.relationships().first_of_type(Relationships::TYPE_NOTES_SLIDE)
        {
            let notes_part = partname::resolve(&slide_part, notes);
            self.drop_part(&notes_part);
        }

        debug!(part = %slide_part, "Removed slide");
        Ok(slide)
    }

    /// Serialize the whole package
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.flush()?;
        Ok(self.archive.to_bytes()?)
    }

    /// Write the package to a file
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.flush()?;
        self.archive.write_to_file(path)?;
        Ok(())
    }

    /// Push every in-memory part back into the archive
    fn flush(&mut self) -> Result<()> {
        self.archive.set(self.part.clone(), self.root.to_xml()?);
        self.archive
            .set(partname::rels_part(&self.part), self.rels.to_xml()?);
        for slide in &self.slides {
            self.archive
                .set(slide.part_name().to_string(), slide.root().to_xml()?);
            self.archive.set(
                partname::rels_part(slide.part_name()),
                slide.relationships().to_xml()?,
            );
        }
        self.archive
            .set(CONTENT_TYPES_PART.to_string(), self.content_types.to_xml()?);
        Ok(())
    }

    fn drop_part(&mut self, part: &str) {
        self.archive.remove(part);
        self.archive.remove(&partname::rels_part(part));
        self.content_types.remove_override(part);
    }

    fn next_slide_part(&self) -> String {
        let dir = self
            .slides
            .first()
            .map(|s| partname::directory(s.part_name()).to_string())
            .unwrap_or_else(|| format!("{}/slides", partname::directory(&self.part)));

        let highest = self
            .archive
            .part_names()
            .chain(self.slides.iter().map(|s| s.part_name()))
            .filter(|p| partname::directory(p) == dir)
            .filter_map(|p| partname::index_of(p, "slide"))
            .max()
            .unwrap_or(0);

        format!("{}/slide{}.xml", dir, highest + 1)
    }

    fn next_slide_id(&self) -> u32 {
        self.root
            .child("sldIdLst")
            .into_iter()
            .flat_map(|list| list.children_named("sldId"))
            .filter_map(|e| e.attribute("id")?.parse::<u32>().ok())
            .map(|id| id + 1)
            .max()
            .unwrap_or(MIN_SLIDE_ID)
            .max(MIN_SLIDE_ID)
    }

    fn slide_id_list_mut(&mut self) -> &mut XmlElement {
        if self.root.child("sldIdLst").is_none() {
            // sldIdLst precedes sldSz in CT_Presentation
            self.root
                .insert_before(XmlElement::new("p:sldIdLst"), "sldSz");
        }
        self.root
            .child_mut("sldIdLst")
            .expect("sldIdLst inserted above")
    }
}

fn empty_shape_tree() -> XmlElement {
    XmlElement::new("p:spTree")
        .with_child(
            XmlElement::new("p:nvGrpSpPr")
                .with_child(
                    XmlElement::new("p:cNvPr")
                        .with_attribute("id", "1")
                        .with_attribute("name", ""),
                )
                .with_child(XmlElement::new("p:cNvGrpSpPr"))
                .with_child(XmlElement::new("p:nvPr")),
        )
        .with_child(
            XmlElement::new("p:grpSpPr").with_child(
                XmlElement::new("a:xfrm")
                    .with_child(offset("a:off"))
                    .with_child(extent("a:ext"))
                    .with_child(offset("a:chOff"))
                    .with_child(extent("a:chExt")),
            ),
        )
}

fn offset(name: &str) -> XmlElement {
    XmlElement::new(name)
        .with_attribute("x", "0")
        .with_attribute("y", "0")
}

fn extent(name: &str) -> XmlElement {
    XmlElement::new(name)
        .with_attribute("cx", "0")
        .with_attribute("cy", "0")
}

/// The `r:id` attribute of an element, whatever prefix maps the namespace
fn relationship_id(element: &XmlElement) -> Option<&str> {
    element
        .attributes
        .iter()
        .find(|(key, _)| {
            key.rsplit_once(':')
                .is_some_and(|(prefix, local)| local == "id" && prefix != "xml" && prefix != "xmlns")
        })
        .map(|(_, value)| value.as_str())
}

fn rewrite_relationship_ids(element: &mut XmlElement, renamed: &HashMap<String, String>) {
    for (key, value) in element.attributes.iter_mut() {
        if key.starts_with("r:") {
            if let Some(new_id) = renamed.get(value.as_str()) {
                *value = new_id.clone();
            }
        }
    }
    for child in element.elements_mut() {
        rewrite_relationship_ids(child, renamed);
    }
}

fn load_rels(archive: &OoxmlArchive, part: &str) -> Result<Relationships> {
    match archive.get(&partname::rels_part(part)) {
        Some(xml) => Ok(Relationships::parse(xml)?),
        None => Ok(Relationships::new()),
    }
}

fn load_slide(archive: &OoxmlArchive, part: String) -> Result<Slide> {
    let root = XmlElement::parse(archive.get_required(&part)?)?;
    let rels = load_rels(archive, &part)?;
    let layout_part = rels
        .first_of_type(Relationships::TYPE_SLIDE_LAYOUT)
        .map(|(_, target)| partname::resolve(&part, target));
    Ok(Slide::new(part, root, rels, layout_part))
}

fn load_layouts(
    archive: &OoxmlArchive,
    part: &str,
    root: &XmlElement,
    rels: &Relationships,
    slides: &[Slide],
) -> Result<Vec<SlideLayout>> {
    let mut layouts: Vec<SlideLayout> = Vec::new();

    let master_parts: Vec<String> = match root.child("sldMasterIdLst") {
        Some(list) => list
            .children_named("sldMasterId")
            .filter_map(relationship_id)
            .filter_map(|id| rels.get(id))
            .map(|target| partname::resolve(part, target))
            .collect(),
        None => rels
            .of_type(Relationships::TYPE_SLIDE_MASTER)
            .map(|(_, target)| partname::resolve(part, target))
            .collect(),
    };

    for master_part in master_parts {
        let Some(master_xml) = archive.get(&master_part) else {
            continue;
        };
        let master = XmlElement::parse(master_xml)?;
        let master_rels = load_rels(archive, &master_part)?;

        let layout_targets: Vec<&str> = match master.child("sldLayoutIdLst") {
            Some(list) => list
                .children_named("sldLayoutId")
                .filter_map(relationship_id)
                .filter_map(|id| master_rels.get(id))
                .collect(),
            None => master_rels
                .of_type(Relationships::TYPE_SLIDE_LAYOUT)
                .map(|(_, target)| target)
                .collect(),
        };

        for target in layout_targets {
            let layout_part = partname::resolve(&master_part, target);
            if layouts.iter().any(|l| l.part == layout_part) {
                continue;
            }
            let layout_root = XmlElement::parse(archive.get_required(&layout_part)?)?;
            layouts.push(SlideLayout::from_xml(
                layout_part,
                &layout_root,
                Some(master_part.clone()),
            ));
        }
    }

    // Layouts used by slides but not listed by any master
    for layout_part in slides.iter().filter_map(|s| s.layout_part()) {
        if layouts.iter().any(|l| l.part == layout_part) {
            continue;
        }
        if let Some(xml) = archive.get(layout_part) {
            let layout_root = XmlElement::parse(xml)?;
            layouts.push(SlideLayout::from_xml(layout_part, &layout_root, None));
        }
    }

    Ok(layouts)
}
