//! Error types for OOXML package operations

use thiserror::Error;

/// Errors that can occur while reading or writing an OPC package
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// Error reading or writing the ZIP archive
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Error reading or writing files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing XML content
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed attribute inside an XML start tag
    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    /// Required part not found in the package
    #[error("Required part not found: {0}")]
    MissingPart(String),

    /// Invalid package or part structure
    #[error("Invalid structure: {0}")]
    InvalidStructure(String),
}

/// Result type for OOXML operations
pub type Result<T> = std::result::Result<T, OoxmlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OoxmlError::MissingPart("ppt/presentation.xml".to_string());
        assert_eq!(
            err.to_string(),
            "Required part not found: ppt/presentation.xml"
        );

        let err = OoxmlError::InvalidStructure("empty document".to_string());
        assert!(err.to_string().contains("empty document"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: OoxmlError = io.into();
        assert!(matches!(err, OoxmlError::Io(_)));
    }
}
