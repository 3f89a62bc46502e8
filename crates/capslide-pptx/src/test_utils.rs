//! Shared test utilities for capslide-pptx
//!
//! Builds small but complete PPTX packages in memory so tests do not depend
//! on binary fixtures.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::CompressionMethod;
use zip::ZipWriter;

const NS_DECLS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

const RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const CT_BASE: &str = "application/vnd.openxmlformats-officedocument.presentationml";

/// A 1x1 transparent PNG
pub const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

#[derive(Debug, Clone)]
struct FixtureSlide {
    layout: String,
    shapes: Vec<String>,
    image: Option<String>,
    notes: Option<String>,
}

/// Builder for an in-memory presentation package
///
/// Layouts live under a single master at `ppt/slideMasters/slideMaster1.xml`
/// and are numbered in the order given. The defaults are "Title Slide"
/// (`slideLayout1.xml`) and "Blank" (`slideLayout2.xml`).
///
/// # Example
/// ```ignore
/// use capslide_pptx::test_utils::{text_box, PresentationFixture};
/// let bytes = PresentationFixture::new()
///     .slide("Blank", &[text_box(2, &["#subtitle#"])])
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct PresentationFixture {
    layouts: Vec<String>,
    slides: Vec<FixtureSlide>,
}

impl Default for PresentationFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl PresentationFixture {
    /// Fixture with the default "Title Slide" and "Blank" layouts
    pub fn new() -> Self {
        Self {
            layouts: vec!["Title Slide".to_string(), "Blank".to_string()],
            slides: Vec::new(),
        }
    }

    /// Replace the layout names of the slide master
    pub fn layouts(mut self, names: &[&str]) -> Self {
        self.layouts = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Append a slide on the named layout with the given shape XML
    ///
    /// Panics if no layout has that name.
    pub fn slide(mut self, layout: &str, shapes: &[String]) -> Self {
        assert!(
            self.layouts.iter().any(|l| l == layout),
            "fixture has no layout named {layout}"
        );
        self.slides.push(FixtureSlide {
            layout: layout.to_string(),
            shapes: shapes.to_vec(),
            image: None,
            notes: None,
        });
        self
    }

    /// Attach an image relationship with id `rel_id` to the last slide
    ///
    /// The layout relationship is `rId1`, or `rId2` when the image takes `rId1`.
    pub fn image(mut self, rel_id: &str) -> Self {
        if let Some(slide) = self.slides.last_mut() {
            slide.image = Some(rel_id.to_string());
        }
        self
    }

    /// Attach a notes slide with the given text to the last slide
    pub fn notes(mut self, text: &str) -> Self {
        if let Some(slide) = self.slides.last_mut() {
            slide.notes = Some(text.to_string());
        }
        self
    }

    /// Build the package bytes
    pub fn build(&self) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(&mut buffer);
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut add = |name: &str, data: &[u8]| {
            zip.start_file(name, options).unwrap();
            zip.write_all(data).unwrap();
        };

        add("[Content_Types].xml", self.content_types().as_bytes());
        add(
            "_rels/.rels",
            rels(&[(
                "rId1",
                "officeDocument",
                "ppt/presentation.xml".to_string(),
            )])
            .as_bytes(),
        );
        add("ppt/presentation.xml", self.presentation_xml().as_bytes());
        add(
            "ppt/_rels/presentation.xml.rels",
            self.presentation_rels().as_bytes(),
        );

        // Master and layouts
        add(
            "ppt/slideMasters/slideMaster1.xml",
            self.master_xml().as_bytes(),
        );
        let master_rels: Vec<(String, &str, String)> = (1..=self.layouts.len())
            .map(|n| {
                (
                    format!("rId{n}"),
                    "slideLayout",
                    format!("../slideLayouts/slideLayout{n}.xml"),
                )
            })
            .collect();
        add(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            rels_owned(&master_rels).as_bytes(),
        );
        for (i, name) in self.layouts.iter().enumerate() {
            let n = i + 1;
            add(
                &format!("ppt/slideLayouts/slideLayout{n}.xml"),
                layout_xml(name).as_bytes(),
            );
            add(
                &format!("ppt/slideLayouts/_rels/slideLayout{n}.xml.rels"),
                rels(&[(
                    "rId1",
                    "slideMaster",
                    "../slideMasters/slideMaster1.xml".to_string(),
                )])
                .as_bytes(),
            );
        }

        // Slides
        for (i, slide) in self.slides.iter().enumerate() {
            let n = i + 1;
            let layout_number = self.layout_number(&slide.layout);
            let layout_rel = match slide.image.as_deref() {
                Some("rId1") => "rId2",
                _ => "rId1",
            };
            let mut slide_rels = vec![(
                layout_rel.to_string(),
                "slideLayout",
                format!("../slideLayouts/slideLayout{layout_number}.xml"),
            )];
            if let Some(rel_id) = &slide.image {
                slide_rels.push((rel_id.clone(), "image", format!("../media/image{n}.png")));
                add(&format!("ppt/media/image{n}.png"), TINY_PNG);
            }
            if let Some(text) = &slide.notes {
                slide_rels.push((
                    "rIdNotes".to_string(),
                    "notesSlide",
                    format!("../notesSlides/notesSlide{n}.xml"),
                ));
                add(
                    &format!("ppt/notesSlides/notesSlide{n}.xml"),
                    notes_xml(text).as_bytes(),
                );
                add(
                    &format!("ppt/notesSlides/_rels/notesSlide{n}.xml.rels"),
                    rels(&[("rId1", "slide", format!("../slides/slide{n}.xml"))]).as_bytes(),
                );
            }

            add(
                &format!("ppt/slides/slide{n}.xml"),
                slide_xml(&slide.shapes).as_bytes(),
            );
            add(
                &format!("ppt/slides/_rels/slide{n}.xml.rels"),
                rels_owned(&slide_rels).as_bytes(),
            );
        }
        zip.finish().unwrap();
        buffer.into_inner()
    }

    fn layout_number(&self, name: &str) -> usize {
        self.layouts
            .iter()
            .position(|l| l == name)
            .map(|i| i + 1)
            .unwrap_or(1)
    }

    fn content_types(&self) -> String {
        let mut overrides = vec![
            format!(r#"<Override PartName="/ppt/presentation.xml" ContentType="{CT_BASE}.presentation.main+xml"/>"#),
            format!(r#"<Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="{CT_BASE}.slideMaster+xml"/>"#),
        ];
        for n in 1..=self.layouts.len() {
            overrides.push(format!(
                r#"<Override PartName="/ppt/slideLayouts/slideLayout{n}.xml" ContentType="{CT_BASE}.slideLayout+xml"/>"#
            ));
        }
        for (i, slide) in self.slides.iter().enumerate() {
            let n = i + 1;
            overrides.push(format!(
                r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="{CT_BASE}.slide+xml"/>"#
            ));
            if slide.notes.is_some() {
                overrides.push(format!(
                    r#"<Override PartName="/ppt/notesSlides/notesSlide{n}.xml" ContentType="{CT_BASE}.notesSlide+xml"/>"#
                ));
            }
        }

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Default Extension="png" ContentType="image/png"/>
{}
</Types>"#,
            overrides.join("\n")
        )
    }

    fn presentation_xml(&self) -> String {
        let slide_ids: String = (0..self.slides.len())
            .map(|i| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, i + 2))
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation {NS_DECLS} saveSubsetFonts="1">
<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>
<p:sldIdLst>{slide_ids}</p:sldIdLst>
<p:sldSz cx="12192000" cy="6858000"/>
<p:notesSz cx="6858000" cy="9144000"/>
</p:presentation>"#
        )
    }

    fn presentation_rels(&self) -> String {
        let mut entries = vec![(
            "rId1".to_string(),
            "slideMaster",
            "slideMasters/slideMaster1.xml".to_string(),
        )];
        for i in 0..self.slides.len() {
            entries.push((
                format!("rId{}", i + 2),
                "slide",
                format!("slides/slide{}.xml", i + 1),
            ));
        }
        rels_owned(&entries)
    }

    fn master_xml(&self) -> String {
        let layout_ids: String = (0..self.layouts.len())
            .map(|i| {
                format!(
                    r#"<p:sldLayoutId id="{}" r:id="rId{}"/>"#,
                    2147483649u32 + i as u32,
                    i + 1
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster {NS_DECLS}>
<p:cSld><p:spTree>{}</p:spTree></p:cSld>
<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>
<p:sldLayoutIdLst>{layout_ids}</p:sldLayoutIdLst>
</p:sldMaster>"#,
            GROUP_PROPERTIES
        )
    }
}

const GROUP_PROPERTIES: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#;

fn rels(entries: &[(&str, &str, String)]) -> String {
    let owned: Vec<(String, &str, String)> = entries
        .iter()
        .map(|(id, kind, target)| (id.to_string(), *kind, target.clone()))
        .collect();
    rels_owned(&owned)
}

fn rels_owned(entries: &[(String, &str, String)]) -> String {
    let body: String = entries
        .iter()
        .map(|(id, kind, target)| {
            format!(r#"<Relationship Id="{id}" Type="{REL_BASE}/{kind}" Target="{target}"/>"#)
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{RELS_NS}">{body}</Relationships>"#
    )
}

fn layout_xml(name: &str) -> String {
    let kind = if name.eq_ignore_ascii_case("blank") {
        "blank"
    } else {
        "title"
    };
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout {NS_DECLS} type="{kind}" preserve="1">
<p:cSld name="{}"><p:spTree>{GROUP_PROPERTIES}</p:spTree></p:cSld>
<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>
</p:sldLayout>"#,
        escape(name)
    )
}

fn slide_xml(shapes: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld {NS_DECLS}>
<p:cSld><p:spTree>{GROUP_PROPERTIES}{}</p:spTree></p:cSld>
<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>
</p:sld>"#,
        shapes.concat()
    )
}

fn notes_xml(text: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:notes {NS_DECLS}>
<p:cSld><p:spTree>{GROUP_PROPERTIES}{}</p:spTree></p:cSld>
</p:notes>"#,
        text_box(2, &[text])
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn run(text: &str) -> String {
    format!(
        r#"<a:r><a:rPr lang="zh-CN" altLang="en-US" sz="2800" b="1"><a:solidFill><a:srgbClr val="FF0000"/></a:solidFill></a:rPr><a:t>{}</a:t></a:r>"#,
        escape(text)
    )
}

/// A text box shape whose single paragraph holds one run per entry
pub fn text_box(id: u32, runs: &[&str]) -> String {
    let runs: String = runs.iter().map(|t| run(t)).collect();
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="TextBox {id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="914400" y="914400"/><a:ext cx="7315200" cy="914400"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr><p:txBody><a:bodyPr wrap="square"/><a:lstStyle/><a:p>{runs}</a:p></p:txBody></p:sp>"#
    )
}

/// A table shape; each cell holds one run with the given text
pub fn table(id: u32, rows: &[&[&str]]) -> String {
    let columns = rows.first().map(|r| r.len()).unwrap_or(0);
    let grid: String = (0..columns)
        .map(|_| r#"<a:gridCol w="2438400"/>"#)
        .collect();
    let body: String = rows
        .iter()
        .map(|cells| {
            let cells: String = cells
                .iter()
                .map(|text| {
                    format!(
                        r#"<a:tc><a:txBody><a:bodyPr/><a:lstStyle/><a:p>{}</a:p></a:txBody><a:tcPr/></a:tc>"#,
                        run(text)
                    )
                })
                .collect();
            format!(r#"<a:tr h="370840">{cells}</a:tr>"#)
        })
        .collect();
    format!(
        r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="{id}" name="Table {id}"/><p:cNvGraphicFramePr><a:graphicFrameLocks noGrp="1"/></p:cNvGraphicFramePr><p:nvPr/></p:nvGraphicFramePr><p:xfrm><a:off x="914400" y="2743200"/><a:ext cx="7315200" cy="741680"/></p:xfrm><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table"><a:tbl><a:tblPr firstRow="1" bandRow="1"/><a:tblGrid>{grid}</a:tblGrid>{body}</a:tbl></a:graphicData></a:graphic></p:graphicFrame>"#
    )
}

/// A picture shape referencing an image relationship
pub fn picture(id: u32, rel_id: &str) -> String {
    format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Picture {id}"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="{rel_id}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="914400" cy="914400"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#
    )
}

/// The seven-slide template used across processor tests
///
/// 1. Title layout with `#subtitle#` (wrong layout)
/// 2. Blank layout without any token
/// 3. `#Chinese#` and `#English#`
/// 4. `#A#`, `#B#`, `#C#` in one text box
/// 5. A 2x2 table with four tokens
/// 6. `#subtitle#` in two text boxes
/// 7. `#A#`, `#B#`, `#C#` spread so every A/B/C row matches five runs,
///    one of them in a table cell, plus a picture
pub fn sample_template() -> Vec<u8> {
    PresentationFixture::new()
        .slide("Title Slide", &[text_box(2, &["#subtitle#"])])
        .slide("Blank", &[text_box(2, &["No tokens here"])])
        .slide(
            "Blank",
            &[
                text_box(2, &["中文：#Chinese#"]),
                text_box(3, &["English: #English#"]),
            ],
        )
        .slide("Blank", &[text_box(2, &["#A#", " / ", "#B#", " / ", "#C#"])])
        .slide(
            "Blank",
            &[table(2, &[&["#A#", "#B#"], &["#C#", "#D#"]])],
        )
        .slide(
            "Blank",
            &[
                text_box(2, &["#subtitle#"]),
                text_box(3, &["Caption: #subtitle#"]),
            ],
        )
        .notes("Speaker notes for the subtitle slide")
        .slide(
            "Blank",
            &[
                text_box(2, &["#A#", "#B#"]),
                text_box(3, &["#A# and #C#"]),
                table(4, &[&["#B#", "fixed"]]),
                picture(5, "rId2"),
            ],
        )
        .image("rId2")
        .build()
}
