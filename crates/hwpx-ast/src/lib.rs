//! hwpx-ast - Document tree definitions
//!
//! This crate provides the typed document tree consumed by the HWPX writer.
//! The shape follows the Pandoc JSON AST: every block and inline is a tagged
//! variant of the form `{"t": kind, "c": payload}`, so a tree produced by
//! `pandoc -t json` deserializes directly into [`Document`].
//!
//! ```
//! use hwpx_ast::{Block, Document};
//!
//! let json = r#"{"pandoc-api-version":[1,23,1],"meta":{},
//!     "blocks":[{"t":"Para","c":[{"t":"Str","c":"Hello"}]}]}"#;
//! let doc = Document::from_json(json).unwrap();
//! assert!(matches!(doc.blocks[0], Block::Para(_)));
//! ```

pub mod block;
pub mod document;
pub mod inline;

pub use block::{
    Alignment, Block, Caption, Cell, ColSpec, ColWidth, Figure, ListAttributes, ListNumberDelim,
    ListNumberStyle, Row, Table, TableBody, TableFoot, TableHead,
};
pub use document::{collect_headings, Document, HeadingEntry, MetaValue};
pub use inline::{stringify, Attr, Inline, MathType, QuoteType, Target};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
