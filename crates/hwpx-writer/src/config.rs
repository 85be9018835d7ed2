//! Layout configuration
//!
//! Page geometry and sizing constants used by the writer. Every field has a
//! default matching an A4 page with 30 mm side margins, so an empty TOML
//! file (or no file at all) yields the standard layout.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// HWPUNIT per millimetre
pub const HWPUNIT_PER_MM: f64 = 283.465;

/// Layout constants for one conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width of the text area in HWPUNIT
    pub page_text_width: u32,
    /// Normal character height in HWPUNIT (1000 = 10pt)
    pub char_height: u32,
    /// Line spacing in percent of the character height
    pub line_spacing_percent: u32,
    /// Page width in millimetres that `%` image widths refer to
    pub percent_basis_mm: f64,
    /// Image width and height when nothing else is known
    pub default_image_size: u32,
    /// Fixed table row height
    pub table_row_height: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_text_width: 42520,
            char_height: 1000,
            line_spacing_percent: 160,
            percent_basis_mm: 150.0,
            default_image_size: 8504,
            table_row_height: 1800,
        }
    }
}

impl LayoutConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
