//! Source package for a conversion
//!
//! A conversion starts from either a reference `.hwpx` document, whose
//! styles, page setup and unrelated parts are carried over, or the built-in
//! skeleton.
//!
//! # Example
//!
//! ```ignore
//! use hwpx_writer::Template;
//!
//! let layout = LayoutConfig::default();
//! let template = Template::load_or_builtin(Some(Path::new("reference.hwpx")), &layout)?;
//! let header = template.header_xml()?;
//! ```

use std::path::Path;

use log::warn;

use crate::archive::HwpxArchive;
use crate::config::LayoutConfig;
use crate::error::{HwpxError, Result};
use crate::manifest::CONTENT_HPF_PATH;
use crate::section::SECTION_PATH;
use crate::skeleton::{builtin_archive, HEADER_PATH};

/// Parts every source package must provide
const REQUIRED_PARTS: [&str; 3] = [HEADER_PATH, SECTION_PATH, CONTENT_HPF_PATH];

/// The package a conversion is built from
#[derive(Debug)]
pub struct Template {
    archive: HwpxArchive,
    /// Whether the package came from a reference document
    reference: bool,
}

impl Template {
    /// The built-in skeleton
    pub fn builtin(layout: &LayoutConfig) -> Result<Self> {
        Ok(Self {
            archive: builtin_archive(layout)?,
            reference: false,
        })
    }

    /// Load a reference document from a file path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_archive(HwpxArchive::open(path)?)
    }

    /// Load a reference document from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let cursor = std::io::Cursor::new(bytes);
        Self::from_archive(HwpxArchive::from_reader(cursor)?)
    }

    fn from_archive(archive: HwpxArchive) -> Result<Self> {
        for part in REQUIRED_PARTS {
            if !archive.contains(part) {
                return Err(HwpxError::MissingFile(part.to_string()));
            }
        }
        Ok(Self {
            archive,
            reference: true,
        })
    }

    /// Load the reference document if one is given and usable
    ///
    /// A missing or unreadable reference is logged and replaced by the
    /// built-in skeleton.
    pub fn load_or_builtin(path: Option<&Path>, layout: &LayoutConfig) -> Result<Self> {
        if let Some(path) = path {
            match Self::load(path) {
                Ok(template) => return Ok(template),
                Err(e) => warn!(
                    "Reference document {} unusable ({}), using built-in template",
                    path.display(),
                    e
                ),
            }
        }
        Self::builtin(layout)
    }

    /// Whether this is a reference document rather than the skeleton
    pub fn is_reference(&self) -> bool {
        self.reference
    }

    /// The style header
    pub fn header_xml(&self) -> Result<String> {
        self.archive.require_string(HEADER_PATH)
    }

    /// The first body section
    pub fn section_xml(&self) -> Result<String> {
        self.archive.require_string(SECTION_PATH)
    }

    /// The package manifest
    pub fn content_hpf(&self) -> Result<String> {
        self.archive.require_string(CONTENT_HPF_PATH)
    }

    /// Get a reference to the underlying archive
    pub fn archive(&self) -> &HwpxArchive {
        &self.archive
    }

    /// Consume the template and return the underlying archive
    pub fn into_archive(self) -> HwpxArchive {
        self.archive
    }
}
