//! Document root and metadata definitions
//!
//! This module defines the top-level document structure: the API version,
//! the metadata map and the content blocks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::inline::{stringify, Inline};

/// A complete document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    /// Producer API version, e.g. `[1, 23, 1]`
    #[serde(rename = "pandoc-api-version", default)]
    pub api_version: Vec<u32>,
    /// Document metadata (title, author, date, ...)
    #[serde(default)]
    pub meta: BTreeMap<String, MetaValue>,
    /// Document content blocks
    pub blocks: Vec<Block>,
}

/// A metadata value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum MetaValue {
    MetaMap(BTreeMap<String, MetaValue>),
    MetaList(Vec<MetaValue>),
    MetaBool(bool),
    MetaString(String),
    MetaInlines(Vec<Inline>),
    MetaBlocks(Vec<Block>),
}

impl MetaValue {
    /// Plain text of a metadata value
    ///
    /// Lists are joined with `", "`, skipping empty entries. Maps, booleans
    /// and block values have no plain text.
    pub fn plain_text(&self) -> String {
        match self {
            MetaValue::MetaString(s) => s.clone(),
            MetaValue::MetaInlines(inlines) => stringify(inlines),
            MetaValue::MetaList(items) => items
                .iter()
                .map(MetaValue::plain_text)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            MetaValue::MetaMap(_) | MetaValue::MetaBool(_) | MetaValue::MetaBlocks(_) => {
                String::new()
            }
        }
    }
}

/// A heading found while scanning the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingEntry {
    /// Heading level (1-based)
    pub level: i32,
    /// Heading identifier
    pub id: String,
    /// Plain text of the heading
    pub text: String,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from blocks
    pub fn with_blocks(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            ..Self::default()
        }
    }

    /// Parse a document from its JSON form
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Set a plain string metadata field
    pub fn set_meta_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.meta
            .insert(key.into(), MetaValue::MetaString(value.into()));
    }

    /// Plain text of a metadata field, empty when absent
    pub fn meta_text(&self, key: &str) -> String {
        self.meta
            .get(key)
            .map(MetaValue::plain_text)
            .unwrap_or_default()
    }

    /// Check if the document is empty (no blocks)
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Collect all headings in document order
///
/// Descends into `Div` containers only; headings nested in lists, quotes or
/// tables are not part of the outline.
pub fn collect_headings(blocks: &[Block]) -> Vec<HeadingEntry> {
    let mut headings = Vec::new();
    for block in blocks {
        match block {
            Block::Header(level, attr, inlines) => headings.push(HeadingEntry {
                level: *level,
                id: attr.id().to_string(),
                text: stringify(inlines),
            }),
            Block::Div(_, children) => headings.extend(collect_headings(children)),
            _ => {}
        }
    }
    headings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::Attr;
    use serde_json::json;

    #[test]
    fn test_empty_document() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.meta_text("title"), "");
    }

    #[test]
    fn test_parse_full_document() {
        let doc: Document = serde_json::from_value(json!({
            "pandoc-api-version": [1, 23, 1],
            "meta": {
                "title": {"t": "MetaInlines", "c": [
                    {"t": "Str", "c": "My"}, {"t": "Space"}, {"t": "Str", "c": "Doc"}]},
                "author": {"t": "MetaList", "c": [
                    {"t": "MetaInlines", "c": [{"t": "Str", "c": "Kim"}]},
                    {"t": "MetaString", "c": ""},
                    {"t": "MetaString", "c": "Lee"}]},
                "draft": {"t": "MetaBool", "c": true}
            },
            "blocks": [{"t": "Para", "c": [{"t": "Str", "c": "x"}]}]
        }))
        .unwrap();
        assert_eq!(doc.api_version, vec![1, 23, 1]);
        assert_eq!(doc.meta_text("title"), "My Doc");
        assert_eq!(doc.meta_text("author"), "Kim, Lee");
        assert_eq!(doc.meta_text("draft"), "");
        assert_eq!(doc.blocks.len(), 1);
    }

    #[test]
    fn test_invalid_kind_is_rejected() {
        let result = Document::from_json(r#"{"blocks":[{"t":"Bogus","c":[]}]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_collect_headings_through_divs() {
        let blocks = vec![
            Block::Header(2, Attr::default(), vec![Inline::Str("A".to_string())]),
            Block::Div(
                Attr::default(),
                vec![Block::Header(
                    3,
                    Attr("b".to_string(), vec![], vec![]),
                    vec![Inline::Str("B".to_string())],
                )],
            ),
            Block::BlockQuote(vec![Block::Header(
                1,
                Attr::default(),
                vec![Inline::Str("hidden".to_string())],
            )]),
        ];
        let headings = collect_headings(&blocks);
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].level, 2);
        assert_eq!(headings[1].id, "b");
        assert_eq!(headings[1].text, "B");
    }

    #[test]
    fn test_set_meta_string() {
        let mut doc = Document::new();
        doc.set_meta_string("title", "Report");
        assert_eq!(doc.meta_text("title"), "Report");
    }
}
