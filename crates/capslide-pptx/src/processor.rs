//! Subtitle slide generation.
//!
//! [`SubtitlesProcessor`] validates a template presentation, then appends one
//! slide per subtitle row by cloning the template slide and substituting its
//! `#placeholder#` tokens. The template slide itself is dropped on save.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::ProcessorOptions;
use crate::constants::SUMMARY_SEPARATOR;
use crate::error::{PptxError, Result};
use crate::layout::{is_blank_layout_name, BLANK_LAYOUT_NAMES};
use crate::placeholder::{self, PUNCTUATION_MARKS};
use crate::presentation::Presentation;
use crate::row::{rows_from_json, rows_from_text, Row, SubtitleFormat};
use crate::slide::Slide;

/// Outcome of appending a batch of rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppendSummary {
    /// Placeholder runs replaced across all slides
    pub matched: usize,

    /// Rows that replaced at least one placeholder
    pub slides: usize,

    /// Rows read from the input
    pub rows: usize,
}

/// Generates subtitle slides from a validated template
#[derive(Debug)]
pub struct SubtitlesProcessor {
    options: ProcessorOptions,
    presentation: Presentation,
    template_slide: usize,
}

impl SubtitlesProcessor {
    /// Load and validate the template named in `options`
    ///
    /// Checks, in order: the template exists, the template slide number is
    /// within the deck, the slide is built on a blank layout, and it carries
    /// at least one `#placeholder#` token.
    pub fn new(options: ProcessorOptions) -> Result<Self> {
        if !options.template.exists() {
            return Err(PptxError::template_not_found(&options.template));
        }
        let presentation = Presentation::open(&options.template)?;

        let slide_count = presentation.slide_count();
        let index = match options.template_slide {
            0 => slide_count as i64,
            n => n,
        };
        if index < 1 || index > slide_count as i64 {
            return Err(PptxError::slide_index(index, slide_count));
        }
        let template_slide = index as usize;

        let slide = presentation
            .slide(template_slide)
            .ok_or_else(|| PptxError::slide_index(index, slide_count))?;
        let layout_name = presentation
            .layout_of(slide)
            .map(|layout| layout.name.clone())
            .unwrap_or_default();
        if !is_blank_layout_name(&layout_name) {
            return Err(PptxError::layout_mismatch(layout_name));
        }

        let found = placeholder::count_placeholders(slide, None);
        if found == 0 {
            return Err(PptxError::NoPlaceholders {
                index: template_slide,
            });
        }

        info!(
            "Found {} placeholders in slide index {} of template {}.",
            found,
            template_slide,
            options.template.display()
        );

        Ok(Self {
            options,
            presentation,
            template_slide,
        })
    }

    /// The options this processor was built with
    pub fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    /// The working presentation
    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    /// 1-based number of the template slide
    pub fn template_slide_number(&self) -> usize {
        self.template_slide
    }

    /// The template slide
    pub fn template_slide(&self) -> &Slide {
        &self.presentation.slides()[self.template_slide - 1]
    }

    /// Get a slide by 1-based number
    pub fn slide(&self, number: usize) -> Option<&Slide> {
        self.presentation.slide(number)
    }

    /// Number of slides currently in the deck, template included
    pub fn slide_count(&self) -> usize {
        self.presentation.slide_count()
    }

    /// Count placeholder tokens on a slide
    ///
    /// `None` counts every `#word#` token; `Some(name)` only `#name#`.
    pub fn placeholder_count(&self, slide: &Slide, placeholder: Option<&str>) -> usize {
        placeholder::count_placeholders(slide, placeholder)
    }

    /// Append a copy of slide `source` built on the blank layout
    ///
    /// Returns the new slide's number.
    pub fn duplicate_slide(&mut self, source: usize) -> Result<usize> {
        let blank = self
            .presentation
            .layout_by_name(BLANK_LAYOUT_NAMES)
            .ok_or(PptxError::BlankLayoutMissing)?
            .part
            .clone();

        let number = self.presentation.add_slide(&blank, Some(source))?;
        let shapes = self.presentation.import_shapes(source, number)?;
        debug!(source, number, shapes, "Duplicated slide");
        Ok(number)
    }

    /// Replace `#placeholder#` with `text` on one slide
    ///
    /// Returns the number of runs that contained the token.
    pub fn replace_placeholder_of_slide(
        &mut self,
        number: usize,
        placeholder: &str,
        text: &str,
    ) -> Result<usize> {
        let text = if self.options.ignore_marks {
            placeholder::strip_marks(text, PUNCTUATION_MARKS)
        } else {
            text.to_string()
        };
        let slide_count = self.presentation.slide_count();
        let slide = self
            .presentation
            .slide_mut(number)
            .ok_or_else(|| PptxError::slide_index(number as i64, slide_count))?;

        let matched = placeholder::replace_placeholder_of_slide(slide, placeholder, &text);
        debug!(slide = number, placeholder, matched, "Replaced placeholder");
        Ok(matched)
    }

    /// Append one slide for a row; returns the number of runs replaced
    pub fn append_slide_with_row(&mut self, row: &Row) -> Result<usize> {
        let number = self.duplicate_slide(self.template_slide)?;
        let mut matched = 0;
        for (placeholder, text) in row.iter() {
            matched += self.replace_placeholder_of_slide(number, placeholder, text)?;
        }
        Ok(matched)
    }

    /// Append one slide per row, in order
    ///
    /// Rows that match nothing still produce a slide but are not counted.
    pub fn append_slides_with_rows(&mut self, rows: &[Row]) -> Result<AppendSummary> {
        let mut summary = AppendSummary {
            rows: rows.len(),
            ..Default::default()
        };

        for (i, row) in rows.iter().enumerate() {
            let matched = self.append_slide_with_row(row)?;
            if matched > 0 {
                summary.slides += 1;
                summary.matched += matched;
                info!(
                    "Successfully added page {}! {} subtitle(s) inserted.",
                    summary.slides, matched
                );
            } else if self.options.verbose {
                warn!(row = i + 1, "No placeholders matched, slide left unfilled");
            }
        }

        Ok(summary)
    }

    /// Append slides from a JSON array of objects
    pub fn append_slides_from_json_file(&mut self, path: impl AsRef<Path>) -> Result<AppendSummary> {
        let path = path.as_ref();
        let content = read_subtitle_file(path)?;
        let rows = rows_from_json(&content, path)?;
        self.append_and_report(&rows)
    }

    /// Append slides from a text file, one subtitle per non-blank line
    ///
    /// Each line fills the configured default placeholder.
    pub fn append_slides_from_text_file(&mut self, path: impl AsRef<Path>) -> Result<AppendSummary> {
        let path = path.as_ref();
        let content = read_subtitle_file(path)?;
        let rows = rows_from_text(&content, &self.options.placeholder);
        self.append_and_report(&rows)
    }

    /// Append slides from a `.json` or `.txt` file, chosen by extension
    pub fn append_slides_from_file(&mut self, path: impl AsRef<Path>) -> Result<AppendSummary> {
        let path = path.as_ref();
        match SubtitleFormat::from_path(path) {
            Some(SubtitleFormat::Json) => self.append_slides_from_json_file(path),
            Some(SubtitleFormat::Text) => self.append_slides_from_text_file(path),
            None => Err(PptxError::unsupported_file_type(path)),
        }
    }

    /// Drop the template slide and write the result; returns the output path
    pub fn save(mut self) -> Result<PathBuf> {
        self.presentation.remove_slide(self.template_slide)?;
        self.presentation.save(&self.options.output)?;

        info!("");
        info!(
            "Processing complete! File saved to {}",
            self.options.output.display()
        );
        Ok(self.options.output)
    }

    fn append_and_report(&mut self, rows: &[Row]) -> Result<AppendSummary> {
        let summary = self.append_slides_with_rows(rows)?;
        info!("{}", SUMMARY_SEPARATOR);
        info!(
            "Added {} of {} slides successfully! Total subtitles added: {}.",
            summary.slides, summary.rows, summary.matched
        );
        Ok(summary)
    }
}

fn read_subtitle_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(PptxError::subtitle_file_not_found(path));
    }
    Ok(std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sample_template, text_box, PresentationFixture};
    use tempfile::TempDir;

    fn options(dir: &TempDir, template_slide: i64) -> ProcessorOptions {
        let template = dir.path().join("sample.pptx");
        std::fs::write(&template, sample_template()).unwrap();
        ProcessorOptions::new(template)
            .with_output(dir.path().join("dest.pptx"))
            .with_template_slide(template_slide)
    }

    fn processor(dir: &TempDir, template_slide: i64) -> SubtitlesProcessor {
        SubtitlesProcessor::new(options(dir, template_slide)).unwrap()
    }

    #[test]
    fn test_missing_template() {
        let dir = TempDir::new().unwrap();
        let options = ProcessorOptions::new(dir.path().join("non_existent_template.pptx"));
        assert!(matches!(
            SubtitlesProcessor::new(options),
            Err(PptxError::TemplateNotFound { .. })
        ));
    }

    #[test]
    fn test_slide_index_out_of_range() {
        let dir = TempDir::new().unwrap();
        for index in [100, 8, -1] {
            let err = SubtitlesProcessor::new(options(&dir, index)).unwrap_err();
            assert!(
                matches!(err, PptxError::SlideIndexOutOfRange { .. }),
                "index {index}: {err}"
            );
        }
    }

    #[test]
    fn test_template_slide_must_be_blank() {
        let dir = TempDir::new().unwrap();
        let err = SubtitlesProcessor::new(options(&dir, 1)).unwrap_err();
        assert!(matches!(
            err,
            PptxError::SlideLayoutMismatch { ref layout } if layout == "Title Slide"
        ));
    }

    #[test]
    fn test_template_slide_needs_placeholders() {
        let dir = TempDir::new().unwrap();
        let err = SubtitlesProcessor::new(options(&dir, 2)).unwrap_err();
        assert!(matches!(err, PptxError::NoPlaceholders { index: 2 }));
    }

    #[test]
    fn test_zero_selects_last_slide() {
        let dir = TempDir::new().unwrap();
        let processor = processor(&dir, 0);
        assert_eq!(processor.template_slide_number(), 7);
        assert_eq!(processor.slide_count(), 7);
    }

    #[test]
    fn test_chinese_blank_layout_name() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("zh.pptx");
        let bytes = PresentationFixture::new()
            .layouts(&["标题幻灯片", "空白"])
            .slide("空白", &[text_box(2, &["#subtitle#"])])
            .build();
        std::fs::write(&template, bytes).unwrap();

        let mut processor = SubtitlesProcessor::new(ProcessorOptions::new(&template)).unwrap();
        let number = processor.duplicate_slide(1).unwrap();
        let layout = processor
            .presentation()
            .layout_of(processor.slide(number).unwrap())
            .unwrap();
        assert_eq!(layout.name, "空白");
    }

    #[test]
    fn test_count_duplicate_and_replace() {
        let dir = TempDir::new().unwrap();
        let mut processor = processor(&dir, 3);

        let template = processor.template_slide();
        assert_eq!(processor.placeholder_count(template, Some("Chinese")), 1);
        assert_eq!(processor.placeholder_count(processor.slide(4).unwrap(), None), 3);
        assert_eq!(processor.placeholder_count(processor.slide(5).unwrap(), None), 4);

        let number = processor.duplicate_slide(processor.template_slide_number()).unwrap();
        assert_eq!(number, 8);
        let new_slide = processor.slide(number).unwrap();
        assert_eq!(processor.placeholder_count(new_slide, Some("Chinese")), 1);

        let count = processor
            .replace_placeholder_of_slide(number, "Chinese", "测试文本")
            .unwrap();
        assert_eq!(count, 1);
        let new_slide = processor.slide(number).unwrap();
        assert_eq!(processor.placeholder_count(new_slide, Some("Chinese")), 0);
        assert!(new_slide.run_texts().contains(&"中文：测试文本".to_string()));

        // Template keeps its token
        assert_eq!(
            processor.placeholder_count(processor.template_slide(), Some("Chinese")),
            1
        );

        processor.save().unwrap();
    }

    #[test]
    fn test_append_slide_with_row() {
        let dir = TempDir::new().unwrap();
        let mut processor = processor(&dir, 4);

        let row = Row::from([("A", "这是字幕1"), ("B", "这是字幕2"), ("C", "这是字幕3")]);
        assert_eq!(processor.append_slide_with_row(&row).unwrap(), 3);
        assert_eq!(
            processor.slide(8).unwrap().run_texts(),
            vec!["这是字幕1", " / ", "这是字幕2", " / ", "这是字幕3"]
        );
    }

    #[test]
    fn test_append_slides_with_rows() {
        let dir = TempDir::new().unwrap();
        let mut processor = processor(&dir, 7);

        let rows = vec![
            Row::from([("A", "这是字幕1"), ("B", "这是字幕2"), ("C", "这是字幕3")]),
            Row::from([("A", "这是字幕4"), ("B", "这是字幕5"), ("C", "这是字幕6")]),
            Row::from([("A", "这是字幕7"), ("B", "这是字幕8"), ("C", "这是字幕9")]),
        ];
        let summary = processor.append_slides_with_rows(&rows).unwrap();

        assert_eq!(summary.matched, 15);
        assert_eq!(summary.slides, 3);
        assert_eq!(summary.rows, 3);
        assert_eq!(processor.slide_count(), 10);
    }

    #[test]
    fn test_unmatched_row_keeps_slide_but_is_not_counted() {
        let dir = TempDir::new().unwrap();
        let mut processor = processor(&dir, 7);

        let rows = vec![Row::single("Missing", "x"), Row::single("A", "y")];
        let summary = processor.append_slides_with_rows(&rows).unwrap();

        assert_eq!(summary.slides, 1);
        assert_eq!(summary.matched, 2);
        assert_eq!(summary.rows, 2);
        assert_eq!(processor.slide_count(), 9);
    }

    #[test]
    fn test_ignore_marks() {
        let dir = TempDir::new().unwrap();
        let options = options(&dir, 6).with_ignore_marks(true);
        let mut processor = SubtitlesProcessor::new(options).unwrap();

        processor
            .append_slide_with_row(&Row::single("subtitle", "hello, world!"))
            .unwrap();
        assert_eq!(
            processor.slide(8).unwrap().run_texts(),
            vec!["hello world", "Caption: hello world"]
        );
    }

    #[test]
    fn test_json_file() {
        let dir = TempDir::new().unwrap();
        let mut processor = processor(&dir, 0);
        let json_path = dir.path().join("sample1.json");
        std::fs::write(
            &json_path,
            r#"[
  {"A": "这是字幕1", "B": "这是字幕2", "C": "这是字幕3"},
  {"A": "这是字幕4", "B": "这是字幕5", "C": "这是字幕6"},
  {"A": "这是字幕7", "B": "这是字幕8", "C": "这是字幕9"}
]"#,
        )
        .unwrap();

        let summary = processor.append_slides_from_json_file(&json_path).unwrap();
        assert_eq!((summary.matched, summary.slides), (15, 3));
        processor.save().unwrap();
    }

    #[test]
    fn test_text_file() {
        let dir = TempDir::new().unwrap();
        let mut processor = processor(&dir, 6);
        let text_path = dir.path().join("sample2.txt");
        std::fs::write(&text_path, "第一行字幕\n\n  second line  \nthird line\n").unwrap();

        let summary = processor.append_slides_from_text_file(&text_path).unwrap();
        assert_eq!((summary.matched, summary.slides), (6, 3));
        assert_eq!(
            processor.slide(9).unwrap().run_texts(),
            vec!["second line", "Caption: second line"]
        );
    }

    #[test]
    fn test_file_dispatch() {
        let dir = TempDir::new().unwrap();
        let mut processor = processor(&dir, 6);

        let text_path = dir.path().join("lines.TXT");
        std::fs::write(&text_path, "one\ntwo\n").unwrap();
        let summary = processor.append_slides_from_file(&text_path).unwrap();
        assert_eq!((summary.matched, summary.slides), (4, 2));

        let srt_path = dir.path().join("subs.srt");
        std::fs::write(&srt_path, "1\n00:00:01,000 --> 00:00:02,000\nhi\n").unwrap();
        assert!(matches!(
            processor.append_slides_from_file(&srt_path),
            Err(PptxError::UnsupportedFileType { .. })
        ));

        assert!(matches!(
            processor.append_slides_from_file(dir.path().join("missing.json")),
            Err(PptxError::SubtitleFileNotFound { .. })
        ));
    }

    #[test]
    fn test_save_removes_template_slide() {
        let dir = TempDir::new().unwrap();
        let mut processor = processor(&dir, 6);
        processor
            .append_slides_with_rows(&[Row::single("subtitle", "first"), Row::single("subtitle", "second")])
            .unwrap();

        let output = processor.save().unwrap();
        assert_eq!(output, dir.path().join("dest.pptx"));

        let saved = Presentation::open(&output).unwrap();
        assert_eq!(saved.slide_count(), 8);
        let last_two: Vec<Vec<String>> = saved.slides()[6..]
            .iter()
            .map(|s| s.run_texts())
            .collect();
        assert_eq!(
            last_two,
            vec![
                vec!["first".to_string(), "Caption: first".to_string()],
                vec!["second".to_string(), "Caption: second".to_string()],
            ]
        );
        assert!(saved
            .slides()
            .iter()
            .all(|s| s.part_name() != "ppt/slides/slide6.xml"));

        let archive = capslide_ooxml::OoxmlArchive::open(&output).unwrap();
        assert!(!archive.contains("ppt/notesSlides/notesSlide6.xml"));
        assert!(archive.contains("ppt/media/image7.png"));
    }
}
