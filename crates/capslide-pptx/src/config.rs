//! Processor options and the `capslide.toml` configuration file.
//!
//! ```toml
//! [processor]
//! template = "templates/subtitles.pptx"
//! output = "out/episode1.pptx"
//! placeholder = "subtitle"
//! template_slide = 0
//! ignore_marks = true
//! verbose = false
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_OUTPUT, DEFAULT_PLACEHOLDER};
use crate::error::{PptxError, Result};

/// Default configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "capslide.toml";

/// Resolved settings for a [`SubtitlesProcessor`](crate::SubtitlesProcessor)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorOptions {
    /// Where the generated presentation is written
    pub output: PathBuf,

    /// Template presentation
    pub template: PathBuf,

    /// Placeholder name used for plain text subtitle files
    pub placeholder: String,

    /// 1-based template slide number; 0 selects the last slide
    pub template_slide: i64,

    /// Strip punctuation from replacement text
    pub ignore_marks: bool,

    /// Report per-row detail
    pub verbose: bool,
}

impl ProcessorOptions {
    /// Options for a template with every other setting at its default
    pub fn new(template: impl Into<PathBuf>) -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            template: template.into(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            template_slide: 0,
            ignore_marks: false,
            verbose: false,
        }
    }

    /// Builder: set the output path
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Builder: set the default placeholder name
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Builder: set the template slide number (0 = last)
    pub fn with_template_slide(mut self, template_slide: i64) -> Self {
        self.template_slide = template_slide;
        self
    }

    /// Builder: strip punctuation from replacement text
    pub fn with_ignore_marks(mut self, ignore_marks: bool) -> Self {
        self.ignore_marks = ignore_marks;
        self
    }

    /// Builder: enable verbose reporting
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Contents of a `capslide.toml` file
///
/// Every key is optional so the file can be layered under command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub processor: ProcessorSection,
}

/// The `[processor]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessorSection {
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub template: Option<PathBuf>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub template_slide: Option<i64>,
    #[serde(default)]
    pub ignore_marks: Option<bool>,
    #[serde(default)]
    pub verbose: Option<bool>,
}

impl ConfigFile {
    /// Load a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(toml_content: &str) -> Result<Self> {
        let config: ConfigFile = toml::from_str(toml_content)?;
        Ok(config)
    }

    /// Load `path` if given, else `capslide.toml` in `dir` when it exists
    pub fn discover(path: Option<&Path>, dir: &Path) -> Result<Option<Self>> {
        match path {
            Some(path) => Self::from_file(path).map(Some),
            None => {
                let candidate = dir.join(CONFIG_FILE_NAME);
                if candidate.is_file() {
                    Self::from_file(candidate).map(Some)
                } else {
                    Ok(None)
                }
            }
        }
    }

    /// Overlay values onto this file's settings and resolve defaults
    ///
    /// `overrides` wins wherever it sets a value. Fails if neither side names
    /// a template.
    pub fn resolve(&self, overrides: &ProcessorSection) -> Result<ProcessorOptions> {
        let file = &self.processor;
        let template = overrides
            .template
            .clone()
            .or_else(|| file.template.clone())
            .ok_or_else(|| PptxError::config(
                "no template presentation given: pass --template or set it in capslide.toml",
            ))?;

        let mut options = ProcessorOptions::new(template);
        if let Some(output) = overrides.output.clone().or_else(|| file.output.clone()) {
            options.output = output;
        }
        if let Some(placeholder) = overrides
            .placeholder
            .clone()
            .or_else(|| file.placeholder.clone())
        {
            if placeholder.is_empty() {
                return Err(PptxError::config("placeholder name must not be empty"));
            }
            options.placeholder = placeholder;
        }
        if let Some(n) = overrides.template_slide.or(file.template_slide) {
            options.template_slide = n;
        }
        options.ignore_marks = overrides
            .ignore_marks
            .or(file.ignore_marks)
            .unwrap_or(false);
        options.verbose = overrides.verbose.or(file.verbose).unwrap_or(false);
        Ok(options)
    }
}
