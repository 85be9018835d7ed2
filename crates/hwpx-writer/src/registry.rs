//! Style registry
//!
//! Resolves the style, paragraph shape and character shape IDs that
//! emitted paragraphs and runs refer to. Formatted runs get derived
//! character shapes, created on first use and cached by
//! `(base shape, formats)`; list items get derived paragraph shapes cached by
//! `(numbering, level)`. All derived records are appended to the header
//! document, which is serialized once by [`StyleRegistry::finalize`].

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};

use crate::config::LayoutConfig;
use crate::error::{HwpxError, Result};
use crate::header::{HeaderDocument, CHAR_CODE, TABLE_BORDER_FILL};
use crate::styles::{
    BorderFill, BorderKind, FormatSet, HeadingKind, ListKind, Numbering, ParaHeading,
};

/// Where the style tables came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleMode {
    /// The built-in header
    BuiltIn,
    /// A reference document's header
    Template,
}

/// Style, paragraph shape and character shape IDs used together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleTriple {
    pub style_id: u32,
    pub para_pr_id: u32,
    pub char_pr_id: u32,
}

/// Heading table of the built-in header: level → (style, paraPr, charPr)
const BUILTIN_HEADINGS: [StyleTriple; 6] = [
    StyleTriple { style_id: 2, para_pr_id: 2, char_pr_id: 7 },
    StyleTriple { style_id: 3, para_pr_id: 3, char_pr_id: 8 },
    StyleTriple { style_id: 4, para_pr_id: 4, char_pr_id: 9 },
    StyleTriple { style_id: 5, para_pr_id: 5, char_pr_id: 0 },
    StyleTriple { style_id: 6, para_pr_id: 6, char_pr_id: 0 },
    StyleTriple { style_id: 7, para_pr_id: 7, char_pr_id: 0 },
];

/// Deepest list level with its own paragraph shape
const MAX_LIST_LEVEL: usize = 6;
/// Body indent per list level
const LIST_INDENT_STEP: i32 = 2000;

/// Style registry for one conversion
#[derive(Debug)]
pub struct StyleRegistry {
    mode: StyleMode,
    header: HeaderDocument,
    char_cache: HashMap<(u32, FormatSet), u32>,
    list_para_cache: HashMap<(u32, usize), u32>,
    normal: StyleTriple,
    /// Heading styles discovered in a template, by zero-based outline level
    outline: BTreeMap<u8, StyleTriple>,
    code_char_pr: u32,
    table_border_fill: u32,
}

impl StyleRegistry {
    /// Registry over the built-in header
    pub fn builtin(layout: &LayoutConfig) -> Self {
        Self {
            mode: StyleMode::BuiltIn,
            header: HeaderDocument::builtin(layout),
            char_cache: HashMap::new(),
            list_para_cache: HashMap::new(),
            normal: StyleTriple {
                style_id: 0,
                para_pr_id: 0,
                char_pr_id: 0,
            },
            outline: BTreeMap::new(),
            code_char_pr: CHAR_CODE,
            table_border_fill: TABLE_BORDER_FILL,
        }
    }

    /// Registry over a reference document's header
    ///
    /// Each outline level maps to the first paragraph shape declared at
    /// that level, provided some style refers to it. A solid border fill is
    /// added for table cells.
    pub fn from_template_header(xml: &str) -> Result<Self> {
        let mut header = HeaderDocument::parse(xml)?;

        let normal_style = header
            .style(0)
            .or_else(|| header.styles.first())
            .cloned()
            .ok_or_else(|| HwpxError::InvalidStructure("header has no styles".to_string()))?;
        let normal = StyleTriple {
            style_id: normal_style.id,
            para_pr_id: normal_style.para_pr_ref,
            char_pr_id: normal_style.char_pr_ref,
        };

        // Only the first declared paraPr of a level counts
        let mut level_para: BTreeMap<u8, u32> = BTreeMap::new();
        for shape in header.declared_para_shapes() {
            if let Some(level) = shape.outline_level() {
                level_para.entry(level).or_insert(shape.id);
            }
        }
        let mut outline = BTreeMap::new();
        for (level, para_pr_id) in level_para {
            if let Some(style) = header.styles.iter().find(|s| s.para_pr_ref == para_pr_id) {
                outline.insert(
                    level,
                    StyleTriple {
                        style_id: style.id,
                        para_pr_id,
                        char_pr_id: style.char_pr_ref,
                    },
                );
            }
        }

        let border_id = header.border_fills.keys().next_back().map_or(1, |id| id + 1);
        header
            .border_fills
            .insert(border_id, BorderFill::generated(border_id, BorderKind::Solid));

        debug!(
            "Template header: {} char shapes, {} para shapes, {} outline levels",
            header.char_shapes.len(),
            header.para_shapes.len(),
            outline.len()
        );

        Ok(Self {
            mode: StyleMode::Template,
            header,
            char_cache: HashMap::new(),
            list_para_cache: HashMap::new(),
            normal,
            outline,
            code_char_pr: normal.char_pr_id,
            table_border_fill: border_id,
        })
    }

    /// Template registry, or the built-in one if the header is unusable
    pub fn for_template(xml: &str, layout: &LayoutConfig) -> Self {
        match Self::from_template_header(xml) {
            Ok(registry) => registry,
            Err(e) => {
                warn!("Reference header unusable ({}), using built-in styles", e);
                Self::builtin(layout)
            }
        }
    }

    pub fn mode(&self) -> StyleMode {
        self.mode
    }

    /// The body text style
    pub fn normal(&self) -> StyleTriple {
        self.normal
    }

    /// Character shape for inline and block code
    pub fn code_char_style(&self) -> u32 {
        self.code_char_pr
    }

    /// Border fill referenced by table cells
    pub fn table_border_fill_id(&self) -> u32 {
        self.table_border_fill
    }

    /// Height of a character shape, if it exists
    pub fn char_height(&self, id: u32) -> Option<u32> {
        self.header.char_shapes.get(&id).map(|c| c.height)
    }

    /// Number of derived character shapes created so far
    pub fn cache_len(&self) -> usize {
        self.char_cache.len()
    }

    /// Read access to the header being built
    pub fn header(&self) -> &HeaderDocument {
        &self.header
    }

    /// Style triple for a 1-based heading level
    ///
    /// A template outline level always wins. Otherwise levels outside 1..=6
    /// use the normal style.
    pub fn heading(&self, level: u32) -> StyleTriple {
        let outline_level = level.checked_sub(1).and_then(|l| u8::try_from(l).ok());
        if let Some(found) = outline_level.and_then(|l| self.outline.get(&l)) {
            return *found;
        }
        if !(1..=6).contains(&level) {
            return self.normal;
        }

        let fixed = BUILTIN_HEADINGS[(level - 1) as usize];
        if self.mode == StyleMode::BuiltIn {
            return fixed;
        }

        // Template without this outline level: keep whatever exists
        let header = &self.header;
        StyleTriple {
            style_id: if header.style(fixed.style_id).is_some() {
                fixed.style_id
            } else {
                self.normal.style_id
            },
            para_pr_id: if header.para_shapes.contains_key(&fixed.para_pr_id) {
                fixed.para_pr_id
            } else {
                self.normal.para_pr_id
            },
            char_pr_id: if header.char_shapes.contains_key(&fixed.char_pr_id) {
                fixed.char_pr_id
            } else {
                self.normal.char_pr_id
            },
        }
    }

    /// Character shape for `base` with `formats` applied
    ///
    /// Returns `base` for an empty set. The same inputs always give the same
    /// ID, and distinct format sets on one base give distinct IDs.
    pub fn resolve_char_style(&mut self, base: u32, formats: FormatSet) -> u32 {
        if formats.is_empty() {
            return base;
        }
        if let Some(id) = self.char_cache.get(&(base, formats)) {
            return *id;
        }

        let source = self
            .header
            .char_shapes
            .get(&base)
            .or_else(|| self.header.char_shapes.get(&0));
        let Some(source) = source else {
            warn!("Character shape {} not found; formatting dropped", base);
            return base;
        };

        let mut shape = source.clone();
        shape.apply_formats(formats);
        let id = self
            .header
            .char_shapes
            .keys()
            .next_back()
            .map_or(0, |max| max + 1);
        shape.id = id;
        self.header.char_shapes.insert(id, shape);
        self.char_cache.insert((base, formats), id);
        debug!(
            "Created char shape {} from {} with formats {:#09b}",
            id,
            base,
            formats.bits()
        );
        id
    }

    /// Register a new list numbering definition
    pub fn create_numbering(&mut self, kind: ListKind, start: i32) -> u32 {
        let id = self
            .header
            .numberings
            .keys()
            .next_back()
            .map_or(1, |max| max + 1);
        self.header
            .numberings
            .insert(id, Numbering::list(id, kind, start));
        debug!("Created numbering {} ({:?}, start {})", id, kind, start);
        id
    }

    /// Paragraph shape for a list item at a zero-based nesting level
    pub fn list_para_style(&mut self, numbering_id: u32, level: usize) -> u32 {
        let level = level.min(MAX_LIST_LEVEL);
        if let Some(id) = self.list_para_cache.get(&(numbering_id, level)) {
            return *id;
        }

        let source = self
            .header
            .para_shapes
            .get(&self.normal.para_pr_id)
            .or_else(|| self.header.para_shapes.values().next());
        let Some(source) = source else {
            return self.normal.para_pr_id;
        };

        let kind = match self
            .header
            .numberings
            .get(&numbering_id)
            .and_then(Numbering::list_kind)
        {
            Some(ListKind::Bullet) => HeadingKind::Bullet,
            _ => HeadingKind::Number,
        };

        let mut shape = source.clone();
        let id = self
            .header
            .para_shapes
            .keys()
            .next_back()
            .map_or(0, |max| max + 1);
        shape.id = id;
        shape.heading = Some(ParaHeading {
            kind,
            id_ref: numbering_id,
            level: level as u8,
        });
        shape.margin.left = Some((level as i32 + 1) * LIST_INDENT_STEP);
        shape.margin.first_line = Some(-LIST_INDENT_STEP);
        self.header.para_shapes.insert(id, shape);
        self.list_para_cache.insert((numbering_id, level), id);
        id
    }

    /// Serialize the final header
    pub fn finalize(&self) -> Result<String> {
        self.header.to_xml()
    }
}
