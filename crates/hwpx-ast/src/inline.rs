//! Inline elements for document content
//!
//! This module defines inline-level elements that appear within blocks,
//! such as text runs, emphasis, links, images, math and footnotes.

use serde::{Deserialize, Serialize};

use crate::block::Block;

/// Element attributes: identifier, classes and key/value pairs
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Attr(pub String, pub Vec<String>, pub Vec<(String, String)>);

impl Attr {
    /// Element identifier (may be empty)
    pub fn id(&self) -> &str {
        &self.0
    }

    /// Element classes
    pub fn classes(&self) -> &[String] {
        &self.1
    }

    /// Check for a class
    pub fn has_class(&self, class: &str) -> bool {
        self.1.iter().any(|c| c == class)
    }

    /// Look up a key/value attribute
    pub fn get(&self, key: &str) -> Option<&str> {
        self.2
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Link or image target: URL and title
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Target(pub String, pub String);

impl Target {
    /// Target URL or path
    pub fn url(&self) -> &str {
        &self.0
    }

    /// Target title
    pub fn title(&self) -> &str {
        &self.1
    }
}

/// Quotation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum QuoteType {
    SingleQuote,
    DoubleQuote,
}

impl QuoteType {
    /// Opening and closing quotation glyphs
    pub fn glyphs(self) -> (char, char) {
        match self {
            QuoteType::DoubleQuote => ('\u{201c}', '\u{201d}'),
            QuoteType::SingleQuote => ('\u{2018}', '\u{2019}'),
        }
    }
}

/// Math rendering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum MathType {
    DisplayMath,
    InlineMath,
}

/// Inline-level content element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum Inline {
    /// Plain text run
    Str(String),
    Emph(Vec<Inline>),
    Underline(Vec<Inline>),
    Strong(Vec<Inline>),
    Strikeout(Vec<Inline>),
    Superscript(Vec<Inline>),
    Subscript(Vec<Inline>),
    SmallCaps(Vec<Inline>),
    /// Quoted text; the quotation marks are not part of the content
    Quoted(QuoteType, Vec<Inline>),
    /// Citation; the citation records themselves are not interpreted
    Cite(Vec<serde_json::Value>, Vec<Inline>),
    /// Inline code span
    Code(Attr, String),
    Space,
    SoftBreak,
    LineBreak,
    /// TeX math source
    Math(MathType, String),
    /// Raw markup in a foreign format
    RawInline(String, String),
    Link(Attr, Vec<Inline>, Target),
    Image(Attr, Vec<Inline>, Target),
    /// Footnote with block content
    Note(Vec<Block>),
    Span(Attr, Vec<Inline>),
}

/// Render inlines as plain text
///
/// Formatting is discarded, quotes become curly quotation glyphs, math keeps
/// its source text. Footnotes and raw markup contribute nothing.
pub fn stringify(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        push_plain(inline, &mut out);
    }
    out
}

fn push_plain(inline: &Inline, out: &mut String) {
    match inline {
        Inline::Str(text) => out.push_str(text),
        Inline::Space | Inline::SoftBreak => out.push(' '),
        Inline::LineBreak => out.push('\n'),
        Inline::Emph(inner)
        | Inline::Underline(inner)
        | Inline::Strong(inner)
        | Inline::Strikeout(inner)
        | Inline::Superscript(inner)
        | Inline::Subscript(inner)
        | Inline::SmallCaps(inner)
        | Inline::Cite(_, inner)
        | Inline::Link(_, inner, _)
        | Inline::Image(_, inner, _)
        | Inline::Span(_, inner) => {
            for child in inner {
                push_plain(child, out);
            }
        }
        Inline::Quoted(kind, inner) => {
            let (open, close) = kind.glyphs();
            out.push(open);
            for child in inner {
                push_plain(child, out);
            }
            out.push(close);
        }
        Inline::Code(_, text) | Inline::Math(_, text) => out.push_str(text),
        Inline::RawInline(..) | Inline::Note(_) => {}
    }
}
