//! Block-level elements for document structure
//!
//! This module defines block-level elements that form the document structure,
//! such as paragraphs, headings, lists, tables and divs.

use serde::{Deserialize, Serialize};

use crate::inline::{stringify, Attr, Inline};

/// Block-level content element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum Block {
    /// Inlines without paragraph semantics (tight list items, table cells)
    Plain(Vec<Inline>),
    /// A paragraph of text
    Para(Vec<Inline>),
    /// Lines with significant breaks (poetry, addresses)
    LineBlock(Vec<Vec<Inline>>),
    /// A literal/code block
    CodeBlock(Attr, String),
    /// Raw markup in a foreign format
    RawBlock(String, String),
    BlockQuote(Vec<Block>),
    /// Ordered list: attributes and items
    OrderedList(ListAttributes, Vec<Vec<Block>>),
    BulletList(Vec<Vec<Block>>),
    /// Terms with one or more definitions each
    DefinitionList(Vec<(Vec<Inline>, Vec<Vec<Block>>)>),
    /// A section heading: level (1-based), attributes, text
    Header(i32, Attr, Vec<Inline>),
    HorizontalRule,
    Table(Table),
    Figure(Figure),
    /// Generic container with attributes
    Div(Attr, Vec<Block>),
}

/// Ordered list attributes: start number, number style, delimiter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListAttributes(pub i32, pub ListNumberStyle, pub ListNumberDelim);

impl ListAttributes {
    /// First item number
    pub fn start(&self) -> i32 {
        self.0
    }
}

impl Default for ListAttributes {
    fn default() -> Self {
        Self(1, ListNumberStyle::DefaultStyle, ListNumberDelim::DefaultDelim)
    }
}

/// Ordered list number style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum ListNumberStyle {
    DefaultStyle,
    Example,
    Decimal,
    LowerRoman,
    UpperRoman,
    LowerAlpha,
    UpperAlpha,
}

/// Ordered list number delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum ListNumberDelim {
    DefaultDelim,
    Period,
    OneParen,
    TwoParens,
}

/// Caption: optional short caption and the caption blocks
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Caption(pub Option<Vec<Inline>>, pub Vec<Block>);

impl Caption {
    /// Plain text of the caption's paragraphs
    pub fn plain_text(&self) -> String {
        self.1
            .iter()
            .filter_map(|block| match block {
                Block::Para(inlines) | Block::Plain(inlines) => Some(stringify(inlines)),
                _ => None,
            })
            .collect()
    }
}

/// Horizontal alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum Alignment {
    AlignLeft,
    AlignRight,
    AlignCenter,
    AlignDefault,
}

/// Column width: a fraction of the text width, or unspecified
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum ColWidth {
    ColWidth(f64),
    ColWidthDefault,
}

/// Column specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColSpec(pub Alignment, pub ColWidth);

/// A table: attributes, caption, columns, head, bodies, foot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table(
    pub Attr,
    pub Caption,
    pub Vec<ColSpec>,
    pub TableHead,
    pub Vec<TableBody>,
    pub TableFoot,
);

/// Table head rows
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableHead(pub Attr, pub Vec<Row>);

/// Table body: attributes, row-head column count, intermediate head rows, rows
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableBody(pub Attr, pub i32, pub Vec<Row>, pub Vec<Row>);

/// Table foot rows
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableFoot(pub Attr, pub Vec<Row>);

/// A table row
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row(pub Attr, pub Vec<Cell>);

impl Row {
    /// Cells in this row
    pub fn cells(&self) -> &[Cell] {
        &self.1
    }
}

/// A table cell: attributes, alignment, row span, column span, content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell(pub Attr, pub Alignment, pub i32, pub i32, pub Vec<Block>);

impl Cell {
    /// Create a 1x1 cell
    pub fn new(blocks: Vec<Block>) -> Self {
        Self(Attr::default(), Alignment::AlignDefault, 1, 1, blocks)
    }

    /// Create a cell with explicit spans
    pub fn spanning(row_span: i32, col_span: i32, blocks: Vec<Block>) -> Self {
        Self(Attr::default(), Alignment::AlignDefault, row_span, col_span, blocks)
    }

    /// Row span, at least 1
    pub fn row_span(&self) -> usize {
        self.2.max(1) as usize
    }

    /// Column span, at least 1
    pub fn col_span(&self) -> usize {
        self.3.max(1) as usize
    }

    /// Cell content
    pub fn blocks(&self) -> &[Block] {
        &self.4
    }
}

impl Table {
    /// Table caption
    pub fn caption(&self) -> &Caption {
        &self.1
    }

    /// Column specifications
    pub fn col_specs(&self) -> &[ColSpec] {
        &self.2
    }

    /// All rows in display order, flagged when they belong to the head
    ///
    /// Order: head rows, then per body its intermediate head rows followed
    /// by its main rows, then foot rows.
    pub fn rows(&self) -> Vec<(&Row, bool)> {
        let mut rows = Vec::new();
        for row in &self.3 .1 {
            rows.push((row, true));
        }
        for body in &self.4 {
            for row in &body.2 {
                rows.push((row, false));
            }
            for row in &body.3 {
                rows.push((row, false));
            }
        }
        for row in &self.5 .1 {
            rows.push((row, false));
        }
        rows
    }
}

/// A figure: attributes, caption, content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure(pub Attr, pub Caption, pub Vec<Block>);
