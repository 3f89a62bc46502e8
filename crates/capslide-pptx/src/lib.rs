//! # capslide-pptx
//!
//! Subtitle slide generation for PowerPoint (PPTX) templates.
//!
//! A template deck carries one styled slide, built on a blank layout, whose
//! text runs and table cells hold `#placeholder#` tokens. For every subtitle
//! row the slide is cloned and each token replaced with the row's text; the
//! run formatting is left alone.
//!
//! ## Features
//!
//! - **Template Validation**: slide index, blank layout and token checks up front
//! - **Row Sources**: JSON arrays of objects or plain text, one subtitle per line
//! - **Table Support**: tokens inside table cells are replaced too
//! - **Punctuation Stripping**: optional removal of `，。？！：；、…,.?!:;~`
//! - **Configuration**: `capslide.toml` with a `[processor]` table
//!
//! ## Example
//!
//! ```no_run
//! use capslide_pptx::{ProcessorOptions, SubtitlesProcessor};
//!
//! let options = ProcessorOptions::new("template.pptx")
//!     .with_output("episode1.pptx")
//!     .with_template_slide(0);
//! let mut processor = SubtitlesProcessor::new(options)?;
//!
//! let summary = processor.append_slides_from_file("episode1.txt")?;
//! println!("{} slides, {} subtitles", summary.slides, summary.matched);
//! processor.save()?;
//! # Ok::<(), capslide_pptx::PptxError>(())
//! ```

pub mod config;
pub mod error;
pub mod layout;
pub mod placeholder;
pub mod presentation;
pub mod processor;
pub mod row;
pub mod slide;

#[cfg(any(test, feature = "test-utils"))]
#[doc(hidden)]
pub mod test_utils;

// Re-exports
pub use config::{ConfigFile, ProcessorOptions, ProcessorSection, CONFIG_FILE_NAME};
pub use error::{PptxError, Result};
pub use layout::{SlideLayout, BLANK_LAYOUT_NAMES};
pub use placeholder::PUNCTUATION_MARKS;
pub use presentation::Presentation;
pub use processor::{AppendSummary, SubtitlesProcessor};
pub use row::{Row, SubtitleFormat};
pub use slide::Slide;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// PPTX-related constants
pub mod constants {
    /// Placeholder filled by plain text subtitle files
    pub const DEFAULT_PLACEHOLDER: &str = "subtitle";

    /// Output file used when none is configured
    pub const DEFAULT_OUTPUT: &str = "output.pptx";

    /// Line printed before the batch summary
    pub const SUMMARY_SEPARATOR: &str = "****************************************";

    /// PresentationML namespace
    pub const NS_PRESENTATION: &str =
        "http://schemas.openxmlformats.org/presentationml/2006/main";

    /// DrawingML namespace
    pub const NS_DRAWING: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

    /// Relationships namespace
    pub const NS_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
}
