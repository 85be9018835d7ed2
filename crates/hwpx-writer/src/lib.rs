//! # hwpx-writer
//!
//! HWPX package generation for pandoc documents.
//!
//! This crate provides functionality to:
//! - Turn a [`hwpx_ast::Document`] into the paragraphs of an HWPX section
//! - Derive character, paragraph and numbering shapes on demand
//! - Reuse the styles and page setup of a reference `.hwpx` file
//! - Embed pictures and write the final ZIP package
//!
//! ## Example
//!
//! ```no_run
//! use hwpx_ast::Document;
//! use hwpx_writer::{HwpxWriter, Template};
//!
//! let json = std::fs::read_to_string("doc.json")?;
//! let doc = Document::from_json(&json)?;
//! let template = Template::load("reference.hwpx")?;
//!
//! let mut writer = HwpxWriter::new();
//! writer.set_toc(true);
//! writer.write_to_file(&doc, template, "out.hwpx")?;
//! # Ok::<(), hwpx_writer::HwpxError>(())
//! ```

pub mod archive;
pub mod config;
pub mod equation;
pub mod error;
pub mod header;
pub mod ids;
pub mod image;
pub mod lineseg;
pub mod manifest;
pub mod package;
pub mod registry;
pub mod section;
pub mod skeleton;
pub mod styles;
pub mod table;
pub mod template;
pub mod writer;
pub mod xml;

#[cfg(test)]
pub(crate) mod test_utils;

pub use archive::HwpxArchive;
pub use config::LayoutConfig;
pub use error::{HwpxError, Result};
pub use ids::IdGenerator;
pub use image::{DecoderMetrics, ImageMetrics, ImageRef};
pub use lineseg::{compute_line_breaks, LineSegment};
pub use registry::{StyleMode, StyleRegistry, StyleTriple};
pub use styles::{FormatSet, ListKind};
pub use table::{CellPlacement, TableLayout};
pub use template::Template;
pub use writer::HwpxWriter;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
