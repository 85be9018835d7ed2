//! Archive handling for HWPX packages
//!
//! An HWPX file is a ZIP archive holding XML parts and binary resources.
//! Unlike a plain key/value view, entry order and per-entry compression are
//! kept: the `mimetype` entry must stay first and uncompressed.

use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use zip::read::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::error::{HwpxError, Result};

/// A single archive entry
#[derive(Debug, Clone)]
struct Entry {
    name: String,
    data: Vec<u8>,
    compression: CompressionMethod,
}

/// Represents an unpacked HWPX package
#[derive(Debug, Clone, Default)]
pub struct HwpxArchive {
    /// Entries in archive order
    entries: Vec<Entry>,
}

impl HwpxArchive {
    /// Create an empty archive
    pub fn new() -> Self {
        Self::default()
    }

    /// Open and unpack an HWPX file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Create from any reader that implements Read + Seek
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut entries = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();

            // Skip directories
            if name.ends_with('/') {
                continue;
            }

            let compression = file.compression();
            let mut data = Vec::new();
            file.read_to_end(&mut data)?;
            entries.push(Entry {
                name,
                data,
                compression,
            });
        }

        Ok(Self { entries })
    }

    /// Get an entry's contents by name
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.data.as_slice())
    }

    /// Get an entry's contents as a string
    pub fn get_string(&self, name: &str) -> Option<String> {
        self.get(name)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Get a required entry as a string
    pub fn require_string(&self, name: &str) -> Result<String> {
        self.get_string(name)
            .ok_or_else(|| HwpxError::MissingFile(name.to_string()))
    }

    /// Check if an entry exists
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// List entry names in archive order
    pub fn file_list(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the archive has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Set an entry's contents
    ///
    /// An existing entry keeps its position and compression method; a new
    /// entry is appended and deflated.
    pub fn set(&mut self, name: impl Into<String>, data: Vec<u8>) {
        let name = name.into();
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.data = data,
            None => self.entries.push(Entry {
                name,
                data,
                compression: CompressionMethod::Deflated,
            }),
        }
    }

    /// Set an entry's contents from a string
    pub fn set_string(&mut self, name: impl Into<String>, contents: impl Into<String>) {
        self.set(name, contents.into().into_bytes());
    }

    /// Append a new entry stored without compression
    pub fn add_stored(&mut self, name: impl Into<String>, data: Vec<u8>) {
        let name = name.into();
        self.entries.retain(|e| e.name != name);
        self.entries.push(Entry {
            name,
            data,
            compression: CompressionMethod::Stored,
        });
    }

    /// Remove an entry
    pub fn remove(&mut self, name: &str) -> Option<Vec<u8>> {
        let index = self.entries.iter().position(|e| e.name == name)?;
        Some(self.entries.remove(index).data)
    }

    /// Write the archive to any writer
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);

        for entry in &self.entries {
            let options = SimpleFileOptions::default().compression_method(entry.compression);
            zip.start_file(entry.name.as_str(), options)?;
            zip.write_all(&entry.data)?;
        }

        zip.finish()?;
        Ok(())
    }

    /// Serialize the archive into memory
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = std::io::Cursor::new(Vec::new());
        self.write_to(&mut buffer)?;
        Ok(buffer.into_inner())
    }

    /// Write the archive to a file
    ///
    /// The archive is written to a temporary file next to `path` and moved
    /// into place only once complete; on failure the temporary file is
    /// removed and any existing file at `path` is left untouched.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        self.write_to(tmp.as_file_mut())?;
        tmp.as_file_mut().flush()?;
        tmp.persist(path).map_err(|e| HwpxError::Io(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_file_operations() {
        let mut archive = HwpxArchive::new();

        archive.set_string("test.xml", "<root/>");
        assert!(archive.contains("test.xml"));
        assert_eq!(archive.get_string("test.xml"), Some("<root/>".to_string()));

        archive.remove("test.xml");
        assert!(!archive.contains("test.xml"));
        assert!(archive.require_string("test.xml").is_err());
    }

    #[test]
    fn test_order_and_compression_preserved() {
        let mut archive = HwpxArchive::new();
        archive.add_stored("mimetype", b"application/hwp+zip".to_vec());
        archive.set_string("Contents/header.xml", "<a/>");
        archive.set_string("Contents/section0.xml", "<b/>");

        let bytes = archive.to_bytes().unwrap();
        let mut zip = ZipArchive::new(Cursor::new(bytes.clone())).unwrap();
        let first = zip.by_index(0).unwrap();
        assert_eq!(first.name(), "mimetype");
        assert_eq!(first.compression(), CompressionMethod::Stored);
        drop(first);

        let mut reread = HwpxArchive::from_reader(Cursor::new(bytes)).unwrap();
        let names: Vec<_> = reread.file_list().collect();
        assert_eq!(
            names,
            vec!["mimetype", "Contents/header.xml", "Contents/section0.xml"]
        );

        // Replacing keeps position and stored compression
        reread.set("mimetype", b"application/hwp+zip".to_vec());
        let mut zip = ZipArchive::new(Cursor::new(reread.to_bytes().unwrap())).unwrap();
        assert_eq!(
            zip.by_index(0).unwrap().compression(),
            CompressionMethod::Stored
        );
    }

    #[test]
    fn test_write_to_file_replaces_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.hwpx");
        std::fs::write(&path, b"old").unwrap();

        let mut archive = HwpxArchive::new();
        archive.add_stored("mimetype", b"application/hwp+zip".to_vec());
        archive.write_to_file(&path).unwrap();

        let reread = HwpxArchive::open(&path).unwrap();
        assert_eq!(reread.len(), 1);
        // No stray temporary files remain
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.hwpx");
        let archive = HwpxArchive::new();
        assert!(archive.write_to_file(&path).is_err());
        assert!(!path.exists());
    }
}
