//! Subtitle rows and the file formats they are read from.
//!
//! A row maps placeholder names to replacement text and becomes one slide.
//! Rows come from a JSON array of objects or from a plain text file with one
//! subtitle per non-blank line.

use std::path::Path;

use serde_json::Value;

use crate::error::{PptxError, Result};

/// One slide's worth of placeholder substitutions, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    entries: Vec<(String, String)>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Row with a single placeholder
    pub fn single(placeholder: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new().with(placeholder, text)
    }

    /// Builder: set a placeholder's text
    pub fn with(mut self, placeholder: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(placeholder, text);
        self
    }

    /// Set a placeholder's text, replacing an earlier value in place
    pub fn insert(&mut self, placeholder: impl Into<String>, text: impl Into<String>) {
        let placeholder = placeholder.into();
        let text = text.into();
        match self.entries.iter_mut().find(|(name, _)| *name == placeholder) {
            Some(entry) => entry.1 = text,
            None => self.entries.push((placeholder, text)),
        }
    }

    /// Text for a placeholder
    pub fn get(&self, placeholder: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == placeholder)
            .map(|(_, text)| text.as_str())
    }

    /// Iterate `(placeholder, text)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, text)| (name.as_str(), text.as_str()))
    }

    /// Number of placeholders in the row
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the row has no placeholders
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (placeholder, text) in iter {
            row.insert(placeholder, text);
        }
        row
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Kind of subtitle file, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    /// JSON array of objects
    Json,
    /// One subtitle per non-blank line
    Text,
}

impl SubtitleFormat {
    /// Detect the format from a path's extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "txt" => Some(Self::Text),
            _ => None,
        }
    }
}

/// Parse rows from JSON text: an array whose items are objects
///
/// String values are used as-is; numbers and booleans use their JSON text.
/// `path` is only used for error messages.
pub fn rows_from_json(json: &str, path: &Path) -> Result<Vec<Row>> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        return Err(PptxError::invalid_subtitle_file(
            path,
            "expected a JSON array of objects",
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let Value::Object(object) = item else {
                return Err(PptxError::invalid_subtitle_file(
                    path,
                    format!("item {} is not an object", index),
                ));
            };
            object
                .into_iter()
                .map(|(placeholder, value)| {
                    let text = match value {
                        Value::String(text) => text,
                        Value::Number(n) => n.to_string(),
                        Value::Bool(b) => b.to_string(),
                        other => {
                            return Err(PptxError::invalid_subtitle_file(
                                path,
                                format!(
                                    "item {} has a non-text value for \"{}\": {}",
                                    index, placeholder, other
                                ),
                            ))
                        }
                    };
                    Ok((placeholder, text))
                })
                .collect::<Result<Row>>()
        })
        .collect()
}

/// Parse rows from plain text: trimmed non-blank lines, each mapped to `placeholder`
pub fn rows_from_text(text: &str, placeholder: &str) -> Vec<Row> {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| Row::single(placeholder, line))
        .collect()
}
