//! Error types for subtitle slide generation.

use std::path::{Path, PathBuf};

use capslide_ooxml::OoxmlError;
use thiserror::Error;

/// Result type for PPTX operations
pub type Result<T> = std::result::Result<T, PptxError>;

/// Errors that can occur while validating a template or generating slides
#[derive(Error, Debug)]
pub enum PptxError {
    /// Template file not found or inaccessible
    #[error("Template file {} does not exist", .path.display())]
    TemplateNotFound { path: PathBuf },

    /// Requested template slide is outside the deck
    #[error("{}", slide_index_message(.index, .slide_count))]
    SlideIndexOutOfRange { index: i64, slide_count: usize },

    /// Template slide is not based on a blank layout
    #[error("Template slide must be based on a Blank layout instead of {layout}!")]
    SlideLayoutMismatch { layout: String },

    /// Template slide carries no `#placeholder#` tokens
    #[error("No placeholders found in slide {index}, please ensure you use the #placeholder# format!")]
    NoPlaceholders { index: usize },

    /// Subtitle input file not found
    #[error("Subtitle file {} does not exist!", .path.display())]
    SubtitleFileNotFound { path: PathBuf },

    /// Subtitle input file has an extension other than .json or .txt
    #[error("Unsupported subtitle file type: {}", .path.display())]
    UnsupportedFileType { path: PathBuf },

    /// Subtitle input file could not be turned into rows
    #[error("Invalid subtitle file {}: {reason}", .path.display())]
    InvalidSubtitleFile { path: PathBuf, reason: String },

    /// The document has no blank layout to build new slides on
    #[error("Could not find a blank slide layout")]
    BlankLayoutMissing,

    /// Presentation package is structurally broken
    #[error("Invalid presentation: {reason}")]
    InvalidPresentation { reason: String },

    /// Configuration file or option error
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// Package-level error
    #[error("Package error: {0}")]
    Ooxml(#[from] OoxmlError),

    /// JSON parsing error (subtitle files)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error (configuration)
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn slide_index_message(index: &i64, slide_count: &usize) -> String {
    if *index < 1 {
        format!("Slide index in template must be >= 1, current value: {index}!")
    } else {
        format!(
            "Insufficient slides in template ({slide_count}), could not find slide at index {index}!"
        )
    }
}

impl PptxError {
    /// Create a template not found error
    pub fn template_not_found(path: impl AsRef<Path>) -> Self {
        Self::TemplateNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a slide index error
    pub fn slide_index(index: i64, slide_count: usize) -> Self {
        Self::SlideIndexOutOfRange { index, slide_count }
    }

    /// Create a layout mismatch error
    pub fn layout_mismatch(layout: impl Into<String>) -> Self {
        Self::SlideLayoutMismatch {
            layout: layout.into(),
        }
    }

    /// Create a subtitle file not found error
    pub fn subtitle_file_not_found(path: impl AsRef<Path>) -> Self {
        Self::SubtitleFileNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create an unsupported file type error
    pub fn unsupported_file_type(path: impl AsRef<Path>) -> Self {
        Self::UnsupportedFileType {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create an invalid subtitle file error
    pub fn invalid_subtitle_file(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::InvalidSubtitleFile {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create an invalid presentation error
    pub fn invalid_presentation(reason: impl Into<String>) -> Self {
        Self::InvalidPresentation {
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Whether the error comes from template validation
    pub fn is_template_error(&self) -> bool {
        matches!(
            self,
            Self::TemplateNotFound { .. }
                | Self::SlideIndexOutOfRange { .. }
                | Self::SlideLayoutMismatch { .. }
                | Self::NoPlaceholders { .. }
        )
    }

    /// Get the error code for diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            Self::TemplateNotFound { .. } => "CAP001",
            Self::SlideIndexOutOfRange { .. } => "CAP002",
            Self::SlideLayoutMismatch { .. } => "CAP003",
            Self::NoPlaceholders { .. } => "CAP004",
            Self::SubtitleFileNotFound { .. } => "CAP005",
            Self::UnsupportedFileType { .. } => "CAP006",
            Self::InvalidSubtitleFile { .. } => "CAP007",
            Self::BlankLayoutMissing => "CAP008",
            Self::InvalidPresentation { .. } => "CAP009",
            Self::Config { .. } => "CAP010",
            Self::Ooxml(_) => "CAP011",
            Self::Json(_) => "CAP012",
            Self::Toml(_) => "CAP013",
            Self::Io(_) => "CAP014",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = PptxError::template_not_found("missing.pptx");
        assert_eq!(err.code(), "CAP001");
        assert!(err.to_string().contains("missing.pptx"));

        assert_eq!(PptxError::BlankLayoutMissing.code(), "CAP008");
    }

    #[test]
    fn test_slide_index_messages() {
        let below = PptxError::slide_index(-1, 7);
        assert!(below.to_string().contains("must be >= 1"));
        assert!(below.to_string().contains("-1"));

        let beyond = PptxError::slide_index(100, 7);
        assert!(beyond.to_string().contains("could not find slide at index 100"));
    }

    #[test]
    fn test_error_display() {
        let err = PptxError::layout_mismatch("Title Slide");
        assert_eq!(
            err.to_string(),
            "Template slide must be based on a Blank layout instead of Title Slide!"
        );

        let err = PptxError::NoPlaceholders { index: 2 };
        assert!(err.to_string().contains("slide 2"));

        let err = PptxError::unsupported_file_type("subs.srt");
        assert!(err.to_string().contains("subs.srt"));
    }

    #[test]
    fn test_template_error_classification() {
        assert!(PptxError::NoPlaceholders { index: 1 }.is_template_error());
        assert!(PptxError::slide_index(0, 0).is_template_error());
        assert!(!PptxError::BlankLayoutMissing.is_template_error());
        assert!(!PptxError::subtitle_file_not_found("a.txt").is_template_error());
    }
}
