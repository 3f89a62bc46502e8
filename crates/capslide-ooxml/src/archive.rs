//! Archive handling for OPC packages (PPTX/POTX)
//!
//! A package is a ZIP archive of XML parts and binary resources. The whole
//! archive is unpacked into memory; parts are edited and the archive is
//! written back in one pass.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use zip::read::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::content_types::CONTENT_TYPES_PART;
use crate::error::{OoxmlError, Result};

/// An unpacked OPC package
#[derive(Debug, Default, Clone)]
pub struct OoxmlArchive {
    /// Part name (ZIP entry name, no leading slash) to contents
    parts: BTreeMap<String, Vec<u8>>,
}

impl OoxmlArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open and unpack a package file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::read_package(File::open(path)?)
    }

    /// Unpack a package held in memory
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::read_package(Cursor::new(data))
    }

    fn read_package<R: Read + Seek>(source: R) -> Result<Self> {
        let mut zip = ZipArchive::new(source)?;
        let mut parts = BTreeMap::new();

        for index in 0..zip.len() {
            let mut entry = zip.by_index(index)?;
            if entry.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;
            parts.insert(entry.name().to_string(), data);
        }

        Ok(Self { parts })
    }

    pub fn get(&self, part: &str) -> Option<&[u8]> {
        self.parts.get(part).map(Vec::as_slice)
    }

    /// Contents of a part the package cannot do without
    pub fn get_required(&self, part: &str) -> Result<&[u8]> {
        self.get(part)
            .ok_or_else(|| OoxmlError::MissingPart(part.to_string()))
    }

    pub fn contains(&self, part: &str) -> bool {
        self.parts.contains_key(part)
    }

    /// Part names in sorted order
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(String::as_str)
    }

    /// Add or replace a part
    pub fn set(&mut self, part: impl Into<String>, data: Vec<u8>) {
        self.parts.insert(part.into(), data);
    }

    pub fn remove(&mut self, part: &str) -> Option<Vec<u8>> {
        self.parts.remove(part)
    }

    /// Write the package to `path`, replacing any existing file
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.write_package(File::create(path)?)
    }

    /// Serialize the package into a byte buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.write_package(&mut buffer)?;
        Ok(buffer.into_inner())
    }

    // `[Content_Types].xml` goes first, then the remaining parts by name.
    fn write_package<W: Write + Seek>(&self, sink: W) -> Result<()> {
        let mut zip = ZipWriter::new(sink);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let content_types = self.parts.get_key_value(CONTENT_TYPES_PART);
        let rest = self
            .parts
            .iter()
            .filter(|(name, _)| name.as_str() != CONTENT_TYPES_PART);

        for (name, data) in content_types.into_iter().chain(rest) {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(data)?;
        }

        zip.finish()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_operations() {
        let mut archive = OoxmlArchive::new();

        archive.set("ppt/presentation.xml", b"<p:presentation/>".to_vec());
        assert!(archive.contains("ppt/presentation.xml"));
        assert_eq!(
            archive.get("ppt/presentation.xml"),
            Some(&b"<p:presentation/>"[..])
        );

        archive.remove("ppt/presentation.xml");
        assert!(!archive.contains("ppt/presentation.xml"));
        assert!(matches!(
            archive.get_required("ppt/presentation.xml"),
            Err(OoxmlError::MissingPart(_))
        ));
    }

    #[test]
    fn test_roundtrip_through_bytes() {
        let mut archive = OoxmlArchive::new();
        archive.set("ppt/slides/slide1.xml", b"<p:sld/>".to_vec());
        archive.set(CONTENT_TYPES_PART, b"<Types/>".to_vec());
        archive.set("ppt/media/image1.png", vec![0x89, 0x50, 0x4e, 0x47]);

        let bytes = archive.to_bytes().unwrap();
        let restored = OoxmlArchive::from_bytes(&bytes).unwrap();

        assert_eq!(
            restored.part_names().collect::<Vec<_>>(),
            vec![CONTENT_TYPES_PART, "ppt/media/image1.png", "ppt/slides/slide1.xml"]
        );
        assert_eq!(
            restored.get("ppt/media/image1.png"),
            Some(&[0x89, 0x50, 0x4e, 0x47][..])
        );

        let mut zip = ZipArchive::new(Cursor::new(&bytes)).unwrap();
        assert_eq!(zip.by_index(0).unwrap().name(), CONTENT_TYPES_PART);
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");

        let mut archive = OoxmlArchive::new();
        archive.set("a.xml", b"<a/>".to_vec());
        archive.write_to_file(&path).unwrap();

        let reopened = OoxmlArchive::open(&path).unwrap();
        assert!(reopened.contains("a.xml"));
    }

    #[test]
    fn test_open_rejects_non_zip() {
        assert!(OoxmlArchive::from_bytes(b"not a zip").is_err());
    }
}
