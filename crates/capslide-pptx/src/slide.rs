//! Slide parts and their shape trees.
//!
//! A slide is held as an owned XML tree. Text lives in text bodies
//! (`p:txBody` on autoshapes, `a:txBody` in table cells), split into
//! paragraphs (`a:p`) and runs (`a:r`) whose `a:t` holds the characters.

use capslide_ooxml::{Relationships, XmlElement};

/// Local names of elements that are shapes inside `p:spTree`
pub const SHAPE_ELEMENTS: &[&str] = &["sp", "grpSp", "graphicFrame", "cxnSp", "pic", "contentPart"];

/// A slide part loaded from the package
#[derive(Debug, Clone)]
pub struct Slide {
    part: String,
    root: XmlElement,
    rels: Relationships,
    layout_part: Option<String>,
}

impl Slide {
    pub(crate) fn new(
        part: String,
        root: XmlElement,
        rels: Relationships,
        layout_part: Option<String>,
    ) -> Self {
        Self {
            part,
            root,
            rels,
            layout_part,
        }
    }

    /// Part name, e.g. `ppt/slides/slide3.xml`
    pub fn part_name(&self) -> &str {
        &self.part
    }

    /// Root `p:sld` element
    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// Part name of the layout this slide is based on
    pub fn layout_part(&self) -> Option<&str> {
        self.layout_part.as_deref()
    }

    /// The slide's own relationships
    pub fn relationships(&self) -> &Relationships {
        &self.rels
    }

    pub(crate) fn relationships_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }

    pub(crate) fn root_mut(&mut self) -> &mut XmlElement {
        &mut self.root
    }

    /// The `p:spTree` element
    pub fn shape_tree(&self) -> Option<&XmlElement> {
        self.root.descendant(&["cSld", "spTree"])
    }

    pub(crate) fn shape_tree_mut(&mut self) -> Option<&mut XmlElement> {
        self.root.descendant_mut(&["cSld", "spTree"])
    }

    /// Top-level shapes, in z-order
    pub fn shapes(&self) -> impl Iterator<Item = &XmlElement> {
        self.shape_tree()
            .into_iter()
            .flat_map(|tree| tree.elements())
            .filter(|e| is_shape(e))
    }

    /// Every text body on the slide: autoshape text frames and table cells
    pub fn text_bodies(&self) -> Vec<&XmlElement> {
        let mut bodies = Vec::new();
        for shape in self.shapes() {
            collect_text_bodies(shape, &mut bodies);
        }
        bodies
    }

    /// Apply `f` to every text body on the slide
    pub fn for_each_text_body_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut XmlElement),
    {
        let Some(tree) = self.shape_tree_mut() else {
            return;
        };
        for shape in tree.elements_mut().filter(|e| is_shape(e)) {
            visit_text_bodies_mut(shape, &mut f);
        }
    }

    /// Text of every run on the slide, in document order
    pub fn run_texts(&self) -> Vec<String> {
        self.text_bodies()
            .into_iter()
            .flat_map(runs)
            .map(|run| run_text(run).to_string())
            .collect()
    }
}

/// Whether an element is a shape (as opposed to group properties or extensions)
pub fn is_shape(element: &XmlElement) -> bool {
    SHAPE_ELEMENTS.contains(&element.local_name())
}

fn collect_text_bodies<'a>(shape: &'a XmlElement, bodies: &mut Vec<&'a XmlElement>) {
    if shape.is("sp") {
        if let Some(body) = shape.child("txBody") {
            bodies.push(body);
        }
    } else if shape.is("graphicFrame") {
        if let Some(table) = shape.descendant(&["graphic", "graphicData", "tbl"]) {
            for row in table.children_named("tr") {
                for cell in row.children_named("tc") {
                    if let Some(body) = cell.child("txBody") {
                        bodies.push(body);
                    }
                }
            }
        }
    }
}

fn visit_text_bodies_mut<F>(shape: &mut XmlElement, f: &mut F)
where
    F: FnMut(&mut XmlElement),
{
    if shape.is("sp") {
        if let Some(body) = shape.child_mut("txBody") {
            f(body);
        }
    } else if shape.is("graphicFrame") {
        if let Some(table) = shape.descendant_mut(&["graphic", "graphicData", "tbl"]) {
            for row in table.children_named_mut("tr") {
                for cell in row.children_named_mut("tc") {
                    if let Some(body) = cell.child_mut("txBody") {
                        f(body);
                    }
                }
            }
        }
    }
}

/// Runs of a text body, paragraph by paragraph
pub fn runs(text_body: &XmlElement) -> impl Iterator<Item = &XmlElement> {
    text_body
        .children_named("p")
        .flat_map(|paragraph| paragraph.children_named("r"))
}

/// Text of a single run (`a:r/a:t`)
pub fn run_text(run: &XmlElement) -> std::borrow::Cow<'_, str> {
    run.child("t")
        .map(|t| t.text())
        .unwrap_or(std::borrow::Cow::Borrowed(""))
}
