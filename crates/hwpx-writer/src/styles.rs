//! Typed style records (Contents/header.xml)
//!
//! Character shapes and paragraph shapes are modelled field by field where
//! the writer needs to change them; everything else in a record is carried
//! as verbatim XML so that template styles survive a round trip.

use std::ops::BitOr;

use crate::error::{HwpxError, Result};
use crate::xml::{escape_xml, parse_element, rewrite_attributes, start_tag, RawElement};

/// Character format modifiers requested for a run
///
/// `SUPERSCRIPT` and `SUBSCRIPT` never coexist in a set: [`FormatSet::with`]
/// keeps whichever was added last, and a set built with both at once keeps
/// `SUPERSCRIPT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct FormatSet(u8);

impl FormatSet {
    pub const BOLD: FormatSet = FormatSet(1);
    pub const ITALIC: FormatSet = FormatSet(1 << 1);
    pub const UNDERLINE: FormatSet = FormatSet(1 << 2);
    pub const STRIKEOUT: FormatSet = FormatSet(1 << 3);
    /// Hyperlink text colour
    pub const LINK_COLOR: FormatSet = FormatSet(1 << 4);
    pub const SUPERSCRIPT: FormatSet = FormatSet(1 << 5);
    pub const SUBSCRIPT: FormatSet = FormatSet(1 << 6);

    /// The empty set
    pub const fn empty() -> Self {
        FormatSet(0)
    }

    /// Raw bit representation
    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check whether every flag of `other` is set
    pub fn contains(self, other: FormatSet) -> bool {
        self.0 & other.0 == other.0
    }

    /// Union of two sets
    pub fn with(self, other: FormatSet) -> Self {
        let mut bits = self.0;
        if other.contains(Self::SUPERSCRIPT) {
            bits &= !Self::SUBSCRIPT.0;
        }
        if other.contains(Self::SUBSCRIPT) {
            bits &= !Self::SUPERSCRIPT.0;
        }
        bits |= other.0;
        if bits & Self::SUPERSCRIPT.0 != 0 {
            bits &= !Self::SUBSCRIPT.0;
        }
        FormatSet(bits)
    }
}

impl BitOr for FormatSet {
    type Output = FormatSet;

    fn bitor(self, rhs: FormatSet) -> FormatSet {
        self.with(rhs)
    }
}

/// Vertical script position of a character shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Script {
    #[default]
    Normal,
    Superscript,
    Subscript,
}

/// Underline decoration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Underline {
    /// `NONE`, `BOTTOM`, `CENTER` or `TOP`
    pub kind: String,
    pub shape: String,
    pub color: String,
}

/// Strikeout decoration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strikeout {
    /// `NONE` or a line shape such as `SOLID`
    pub shape: String,
    pub color: String,
}

/// Child element order required by the character shape schema
fn char_child_rank(name: &str) -> u8 {
    match name {
        "fontRef" => 0,
        "ratio" => 1,
        "spacing" => 2,
        "relSz" => 3,
        "offset" => 4,
        "italic" => 5,
        "bold" => 6,
        "underline" => 7,
        "strikeout" => 8,
        "outline" => 9,
        "shadow" => 10,
        "emboss" => 11,
        "engrave" => 12,
        "supscript" => 13,
        "subscript" => 14,
        _ => 15,
    }
}

/// A character shape (`hh:charPr`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharShape {
    pub id: u32,
    /// Size in HWPUNIT (1000 = 10pt)
    pub height: u32,
    pub text_color: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: Option<Underline>,
    pub strikeout: Option<Strikeout>,
    pub script: Script,
    /// Other attributes of the record, in source order
    attrs: Vec<(String, String)>,
    /// Unmodelled child elements, verbatim
    children: Vec<RawElement>,
}

impl CharShape {
    /// A plain built-in shape using font `font_ref` for every script
    pub fn builtin(id: u32, height: u32, font_ref: u32) -> Self {
        let attrs = [
            ("shadeColor", "none"),
            ("useFontSpace", "0"),
            ("useKerning", "0"),
            ("symMark", "NONE"),
            ("borderFillIDRef", "2"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let children = [
            (
                "fontRef",
                format!(
                    "<hh:fontRef hangul=\"{0}\" latin=\"{0}\" hanja=\"{0}\" japanese=\"{0}\" \
                     other=\"{0}\" symbol=\"{0}\" user=\"{0}\"/>",
                    font_ref
                ),
            ),
            ("ratio", lang_attrs_element("ratio", 100)),
            ("spacing", lang_attrs_element("spacing", 0)),
            ("relSz", lang_attrs_element("relSz", 100)),
            ("offset", lang_attrs_element("offset", 0)),
            ("outline", "<hh:outline type=\"NONE\"/>".to_string()),
            (
                "shadow",
                "<hh:shadow type=\"NONE\" color=\"#C0C0C0\" offsetX=\"10\" offsetY=\"10\"/>"
                    .to_string(),
            ),
        ]
        .into_iter()
        .map(|(name, xml)| RawElement {
            name: name.to_string(),
            xml,
        })
        .collect();

        Self {
            id,
            height,
            text_color: "#000000".to_string(),
            bold: false,
            italic: false,
            underline: Some(Underline {
                kind: "NONE".to_string(),
                shape: "SOLID".to_string(),
                color: "#000000".to_string(),
            }),
            strikeout: Some(Strikeout {
                shape: "NONE".to_string(),
                color: "#000000".to_string(),
            }),
            script: Script::Normal,
            attrs,
            children,
        }
    }

    /// Parse a `hh:charPr` element
    pub fn parse(xml: &str) -> Result<Self> {
        let mut parts = parse_element(xml)?;
        let id = parse_id(parts.take_attr("id"), "charPr")?;
        let height = parts
            .take_attr("height")
            .and_then(|h| h.parse().ok())
            .unwrap_or(1000);
        let text_color = parts
            .take_attr("textColor")
            .unwrap_or_else(|| "#000000".to_string());
        // Older writers emit bold/italic as attributes
        let mut bold = parts.take_attr("bold").as_deref() == Some("1");
        let mut italic = parts.take_attr("italic").as_deref() == Some("1");

        let mut underline = None;
        let mut strikeout = None;
        let mut script = Script::Normal;
        let mut children = Vec::new();
        for child in parts.children {
            match child.name.as_str() {
                "bold" => bold = true,
                "italic" => italic = true,
                "supscript" => script = Script::Superscript,
                "subscript" => script = Script::Subscript,
                "underline" => {
                    let p = parse_element(&child.xml)?;
                    underline = Some(Underline {
                        kind: p.attr("type").unwrap_or("NONE").to_string(),
                        shape: p.attr("shape").unwrap_or("SOLID").to_string(),
                        color: p.attr("color").unwrap_or("#000000").to_string(),
                    });
                }
                "strikeout" => {
                    let p = parse_element(&child.xml)?;
                    strikeout = Some(Strikeout {
                        shape: p.attr("shape").unwrap_or("NONE").to_string(),
                        color: p.attr("color").unwrap_or("#000000").to_string(),
                    });
                }
                _ => children.push(child),
            }
        }

        Ok(Self {
            id,
            height,
            text_color,
            bold,
            italic,
            underline,
            strikeout,
            script,
            attrs: parts.attrs,
            children,
        })
    }

    /// Apply format modifiers to this shape
    pub fn apply_formats(&mut self, formats: FormatSet) {
        if formats.contains(FormatSet::BOLD) {
            self.bold = true;
        }
        if formats.contains(FormatSet::ITALIC) {
            self.italic = true;
        }
        if formats.contains(FormatSet::UNDERLINE) {
            self.underline = Some(Underline {
                kind: "BOTTOM".to_string(),
                shape: "SOLID".to_string(),
                color: "#000000".to_string(),
            });
        }
        if formats.contains(FormatSet::STRIKEOUT) {
            self.strikeout = Some(Strikeout {
                shape: "SOLID".to_string(),
                color: "#000000".to_string(),
            });
        }
        if formats.contains(FormatSet::LINK_COLOR) {
            self.text_color = "#0000FF".to_string();
            if let Some(underline) = self.underline.as_mut() {
                underline.color = "#0000FF".to_string();
            }
        }
        if formats.contains(FormatSet::SUPERSCRIPT) {
            self.script = Script::Superscript;
        } else if formats.contains(FormatSet::SUBSCRIPT) {
            self.script = Script::Subscript;
        }
    }

    /// Serialize as a `hh:charPr` element
    pub fn to_xml(&self) -> String {
        let mut attrs = vec![
            ("id".to_string(), self.id.to_string()),
            ("height".to_string(), self.height.to_string()),
            ("textColor".to_string(), self.text_color.clone()),
        ];
        attrs.extend(self.attrs.iter().cloned());

        let mut children: Vec<(u8, String)> = self
            .children
            .iter()
            .map(|c| (char_child_rank(&c.name), c.xml.clone()))
            .collect();
        if self.italic {
            children.push((char_child_rank("italic"), "<hh:italic/>".to_string()));
        }
        if self.bold {
            children.push((char_child_rank("bold"), "<hh:bold/>".to_string()));
        }
        if let Some(u) = &self.underline {
            children.push((
                char_child_rank("underline"),
                format!(
                    "<hh:underline type=\"{}\" shape=\"{}\" color=\"{}\"/>",
                    u.kind, u.shape, u.color
                ),
            ));
        }
        if let Some(s) = &self.strikeout {
            children.push((
                char_child_rank("strikeout"),
                format!("<hh:strikeout shape=\"{}\" color=\"{}\"/>", s.shape, s.color),
            ));
        }
        match self.script {
            Script::Superscript => {
                children.push((char_child_rank("supscript"), "<hh:supscript/>".to_string()))
            }
            Script::Subscript => {
                children.push((char_child_rank("subscript"), "<hh:subscript/>".to_string()))
            }
            Script::Normal => {}
        }
        children.sort_by_key(|(rank, _)| *rank);

        let mut xml = start_tag("hh:charPr", &attrs, false);
        for (_, child) in children {
            xml.push_str(&child);
        }
        xml.push_str("</hh:charPr>");
        xml
    }
}

fn lang_attrs_element(name: &str, value: i32) -> String {
    format!(
        "<hh:{0} hangul=\"{1}\" latin=\"{1}\" hanja=\"{1}\" japanese=\"{1}\" other=\"{1}\" \
         symbol=\"{1}\" user=\"{1}\"/>",
        name, value
    )
}

fn parse_id(value: Option<String>, record: &str) -> Result<u32> {
    value
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| HwpxError::InvalidStructure(format!("{} without a numeric id", record)))
}

/// Kind of paragraph heading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingKind {
    None,
    /// Outline level (document headings)
    Outline,
    /// Numbered list item
    Number,
    Bullet,
}

impl HeadingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            HeadingKind::None => "NONE",
            HeadingKind::Outline => "OUTLINE",
            HeadingKind::Number => "NUMBER",
            HeadingKind::Bullet => "BULLET",
        }
    }

    fn parse(value: &str) -> Self {
        match value {
            "OUTLINE" => HeadingKind::Outline,
            "NUMBER" => HeadingKind::Number,
            "BULLET" => HeadingKind::Bullet,
            _ => HeadingKind::None,
        }
    }
}

/// The `hh:heading` reference of a paragraph shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParaHeading {
    pub kind: HeadingKind,
    /// Numbering (or bullet) definition ID
    pub id_ref: u32,
    /// Zero-based level
    pub level: u8,
}

impl ParaHeading {
    fn to_xml(self) -> String {
        format!(
            "<hh:heading type=\"{}\" idRef=\"{}\" level=\"{}\"/>",
            self.kind.as_str(),
            self.id_ref,
            self.level
        )
    }
}

/// Margin overrides applied when a paragraph shape is serialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MarginOverride {
    /// Body (left) indent
    pub left: Option<i32>,
    /// First-line indent, relative to the body indent
    pub first_line: Option<i32>,
    /// Space before the paragraph
    pub space_before: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ParaChild {
    Heading,
    Raw(RawElement),
}

/// A paragraph shape (`hh:paraPr`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParaShape {
    pub id: u32,
    pub heading: Option<ParaHeading>,
    pub margin: MarginOverride,
    attrs: Vec<(String, String)>,
    children: Vec<ParaChild>,
}

impl ParaShape {
    /// A built-in left-aligned shape
    pub fn builtin(id: u32, heading: ParaHeading, space_before: i32, line_spacing: u32) -> Self {
        let attrs = [
            ("tabPrIDRef", "0"),
            ("condense", "0"),
            ("fontLineHeight", "0"),
            ("snapToGrid", "1"),
            ("suppressLineNumbers", "0"),
            ("checked", "0"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let raw = |name: &str, xml: String| {
            ParaChild::Raw(RawElement {
                name: name.to_string(),
                xml,
            })
        };
        let children = vec![
            raw(
                "align",
                "<hh:align horizontal=\"JUSTIFY\" vertical=\"BASELINE\"/>".to_string(),
            ),
            ParaChild::Heading,
            raw(
                "breakSetting",
                "<hh:breakSetting breakLatinWord=\"KEEP_WORD\" breakNonLatinWord=\"KEEP_WORD\" \
                 widowOrphan=\"0\" keepWithNext=\"0\" keepLines=\"0\" pageBreakBefore=\"0\" \
                 lineWrap=\"BREAK\"/>"
                    .to_string(),
            ),
            raw(
                "autoSpacing",
                "<hh:autoSpacing eAsianEng=\"0\" eAsianNum=\"0\"/>".to_string(),
            ),
            raw(
                "margin",
                format!(
                    "<hh:margin><hc:intent value=\"0\" unit=\"HWPUNIT\"/>\
                     <hc:left value=\"0\" unit=\"HWPUNIT\"/>\
                     <hc:right value=\"0\" unit=\"HWPUNIT\"/>\
                     <hc:prev value=\"{}\" unit=\"HWPUNIT\"/>\
                     <hc:next value=\"0\" unit=\"HWPUNIT\"/></hh:margin>",
                    space_before
                ),
            ),
            raw(
                "lineSpacing",
                format!(
                    "<hh:lineSpacing type=\"PERCENT\" value=\"{}\" unit=\"HWPUNIT\"/>",
                    line_spacing
                ),
            ),
            raw(
                "border",
                "<hh:border borderFillIDRef=\"2\" offsetLeft=\"0\" offsetRight=\"0\" \
                 offsetTop=\"0\" offsetBottom=\"0\" connect=\"0\" ignoreMargin=\"0\"/>"
                    .to_string(),
            ),
        ];

        Self {
            id,
            heading: Some(heading),
            margin: MarginOverride::default(),
            attrs,
            children,
        }
    }

    /// Parse a `hh:paraPr` element
    pub fn parse(xml: &str) -> Result<Self> {
        let mut parts = parse_element(xml)?;
        let id = parse_id(parts.take_attr("id"), "paraPr")?;

        let mut heading = None;
        let mut children = Vec::new();
        for child in parts.children {
            if child.name == "heading" && heading.is_none() {
                let p = parse_element(&child.xml)?;
                heading = Some(ParaHeading {
                    kind: HeadingKind::parse(p.attr("type").unwrap_or("NONE")),
                    id_ref: p.attr("idRef").and_then(|v| v.parse().ok()).unwrap_or(0),
                    level: p.attr("level").and_then(|v| v.parse().ok()).unwrap_or(0),
                });
                children.push(ParaChild::Heading);
            } else {
                children.push(ParaChild::Raw(child));
            }
        }

        Ok(Self {
            id,
            heading,
            margin: MarginOverride::default(),
            attrs: parts.attrs,
            children,
        })
    }

    /// Outline level if this shape is a heading paragraph
    pub fn outline_level(&self) -> Option<u8> {
        self.heading
            .filter(|h| h.kind == HeadingKind::Outline)
            .map(|h| h.level)
    }

    /// Serialize as a `hh:paraPr` element
    pub fn to_xml(&self) -> Result<String> {
        let mut attrs = vec![("id".to_string(), self.id.to_string())];
        attrs.extend(self.attrs.iter().cloned());

        let mut rules = Vec::new();
        if let Some(left) = self.margin.left {
            rules.push(("left", "value", left.to_string()));
        }
        if let Some(first_line) = self.margin.first_line {
            rules.push(("intent", "value", first_line.to_string()));
        }
        if let Some(prev) = self.margin.space_before {
            rules.push(("prev", "value", prev.to_string()));
        }

        let mut children = self.children.clone();
        if self.heading.is_some() && !children.contains(&ParaChild::Heading) {
            let at = children
                .iter()
                .position(|c| matches!(c, ParaChild::Raw(r) if r.name == "align"))
                .map(|i| i + 1)
                .unwrap_or(0);
            children.insert(at, ParaChild::Heading);
        }

        let mut xml = start_tag("hh:paraPr", &attrs, false);
        for child in &children {
            match child {
                ParaChild::Heading => {
                    if let Some(heading) = self.heading {
                        xml.push_str(&heading.to_xml());
                    }
                }
                ParaChild::Raw(raw) if !rules.is_empty() && is_margin_holder(&raw.name) => {
                    xml.push_str(&rewrite_attributes(&raw.xml, &rules)?);
                }
                ParaChild::Raw(raw) => xml.push_str(&raw.xml),
            }
        }
        xml.push_str("</hh:paraPr>");
        Ok(xml)
    }
}

/// Children that may contain margin values (directly or in switch branches)
fn is_margin_holder(name: &str) -> bool {
    matches!(name, "margin" | "switch")
}

/// List flavour of a numbering definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    /// Arabic numerals followed by a period
    Ordered,
    /// A fixed bullet glyph
    Bullet,
}

/// Bullet glyph for unordered lists
pub const BULLET_GLYPH: char = '\u{25CF}';

/// Number of levels written into generated numbering definitions
const NUMBERING_LEVELS: u8 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
enum NumberingSource {
    Template(String),
    List { kind: ListKind, start: i32 },
    /// Heading numbering without visible numbers
    Outline,
}

/// A numbering definition (`hh:numbering`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Numbering {
    pub id: u32,
    source: NumberingSource,
}

impl Numbering {
    /// A list numbering definition
    pub fn list(id: u32, kind: ListKind, start: i32) -> Self {
        Self {
            id,
            source: NumberingSource::List { kind, start },
        }
    }

    /// The outline numbering used by heading paragraphs
    pub fn outline(id: u32) -> Self {
        Self {
            id,
            source: NumberingSource::Outline,
        }
    }

    /// Keep a template definition verbatim
    pub fn parse(xml: &str) -> Result<Self> {
        let mut parts = parse_element(xml)?;
        let id = parse_id(parts.take_attr("id"), "numbering")?;
        Ok(Self {
            id,
            source: NumberingSource::Template(xml.to_string()),
        })
    }

    /// List kind, for generated list definitions
    pub fn list_kind(&self) -> Option<ListKind> {
        match self.source {
            NumberingSource::List { kind, .. } => Some(kind),
            _ => None,
        }
    }

    pub fn to_xml(&self) -> String {
        let start = match &self.source {
            NumberingSource::Template(xml) => return xml.clone(),
            NumberingSource::List {
                kind: ListKind::Ordered,
                start,
            } => *start,
            _ => 1,
        };

        let mut xml = format!("<hh:numbering id=\"{}\" start=\"{}\">", self.id, start);
        for level in 1..=NUMBERING_LEVELS {
            let text = match &self.source {
                NumberingSource::List {
                    kind: ListKind::Ordered,
                    ..
                } => format!("^{}.", level),
                NumberingSource::List {
                    kind: ListKind::Bullet,
                    ..
                } => BULLET_GLYPH.to_string(),
                _ => String::new(),
            };
            xml.push_str(&format!(
                "<hh:paraHead start=\"{}\" level=\"{}\" align=\"LEFT\" useInstWidth=\"1\" \
                 autoIndent=\"0\" widthAdjust=\"0\" textOffsetType=\"PERCENT\" textOffset=\"50\" \
                 numFormat=\"DIGIT\" charPrIDRef=\"4294967295\" checkable=\"0\">{}</hh:paraHead>",
                start, level, text
            ));
        }
        xml.push_str("</hh:numbering>");
        xml
    }
}

/// Line style of a generated border fill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderKind {
    /// No visible border
    None,
    /// No border, transparent character background
    CharBackground,
    /// Thin solid black border on all four sides
    Solid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum BorderFillSource {
    Template(String),
    Generated(BorderKind),
}

/// A border/fill definition (`hh:borderFill`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorderFill {
    pub id: u32,
    source: BorderFillSource,
}

impl BorderFill {
    pub fn generated(id: u32, kind: BorderKind) -> Self {
        Self {
            id,
            source: BorderFillSource::Generated(kind),
        }
    }

    /// Keep a template definition verbatim
    pub fn parse(xml: &str) -> Result<Self> {
        let mut parts = parse_element(xml)?;
        let id = parse_id(parts.take_attr("id"), "borderFill")?;
        Ok(Self {
            id,
            source: BorderFillSource::Template(xml.to_string()),
        })
    }

    pub fn to_xml(&self) -> String {
        let kind = match &self.source {
            BorderFillSource::Template(xml) => return xml.clone(),
            BorderFillSource::Generated(kind) => *kind,
        };
        let (line, width) = match kind {
            BorderKind::Solid => ("SOLID", "0.12 mm"),
            BorderKind::None | BorderKind::CharBackground => ("NONE", "0.1 mm"),
        };

        let mut xml = format!(
            "<hh:borderFill id=\"{}\" threeD=\"0\" shadow=\"0\" centerLine=\"NONE\" \
             breakCellSeparateLine=\"0\">\
             <hh:slash type=\"NONE\" Crooked=\"0\" isCounter=\"0\"/>\
             <hh:backSlash type=\"NONE\" Crooked=\"0\" isCounter=\"0\"/>",
            self.id
        );
        for side in ["leftBorder", "rightBorder", "topBorder", "bottomBorder"] {
            xml.push_str(&format!(
                "<hh:{} type=\"{}\" width=\"{}\" color=\"#000000\"/>",
                side, line, width
            ));
        }
        xml.push_str("<hh:diagonal type=\"NONE\" width=\"0.1 mm\" color=\"#000000\"/>");
        if kind == BorderKind::CharBackground {
            xml.push_str(
                "<hc:fillBrush><hc:winBrush faceColor=\"none\" hatchColor=\"#999999\" \
                 alpha=\"0\"/></hc:fillBrush>",
            );
        }
        xml.push_str("</hh:borderFill>");
        xml
    }
}

/// A style entry (`hh:style`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleEntry {
    pub id: u32,
    /// `PARA` or `CHAR`
    pub kind: String,
    pub name: String,
    pub eng_name: String,
    pub para_pr_ref: u32,
    pub char_pr_ref: u32,
    pub next_style_ref: u32,
}

impl StyleEntry {
    pub fn to_xml(&self) -> String {
        format!(
            "<hh:style id=\"{}\" type=\"{}\" name=\"{}\" engName=\"{}\" paraPrIDRef=\"{}\" \
             charPrIDRef=\"{}\" nextStyleIDRef=\"{}\" langID=\"1042\" lockForm=\"0\"/>",
            self.id,
            self.kind,
            escape_xml(&self.name),
            escape_xml(&self.eng_name),
            self.para_pr_ref,
            self.char_pr_ref,
            self.next_style_ref
        )
    }
}
