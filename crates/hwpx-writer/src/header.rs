//! Header document (Contents/header.xml)
//!
//! The header is kept as a sequence of segments: verbatim text, and the four
//! tables the writer manages (border fills, character shapes, numberings and
//! paragraph shapes). Managed tables are serialized from their typed records
//! with a fresh `itemCnt`; every other byte of a template header is written
//! back unchanged.

use std::collections::BTreeMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::config::LayoutConfig;
use crate::error::{HwpxError, Result};
use crate::styles::{
    BorderFill, BorderKind, CharShape, HeadingKind, Numbering, ParaHeading, ParaShape, StyleEntry,
};
use crate::xml::{escape_xml, get_attr, local_name, parse_element, start_tag};

/// Namespace declarations shared by header and section roots
pub const HWPML_NAMESPACES: &str = concat!(
    r#"xmlns:ha="http://www.hancom.co.kr/hwpml/2011/app" "#,
    r#"xmlns:hp="http://www.hancom.co.kr/hwpml/2011/paragraph" "#,
    r#"xmlns:hp10="http://www.hancom.co.kr/hwpml/2016/paragraph" "#,
    r#"xmlns:hs="http://www.hancom.co.kr/hwpml/2011/section" "#,
    r#"xmlns:hc="http://www.hancom.co.kr/hwpml/2011/core" "#,
    r#"xmlns:hh="http://www.hancom.co.kr/hwpml/2011/head" "#,
    r#"xmlns:hhs="http://www.hancom.co.kr/hwpml/2011/history" "#,
    r#"xmlns:hm="http://www.hancom.co.kr/hwpml/2011/master-page" "#,
    r#"xmlns:hpf="http://www.hancom.co.kr/schema/2011/hpf" "#,
    r#"xmlns:dc="http://purl.org/dc/elements/1.1/" "#,
    r#"xmlns:opf="http://www.idpf.org/2007/opf/" "#,
    r#"xmlns:ooxmlchart="http://www.hancom.co.kr/hwpml/2016/ooxmlchart" "#,
    r#"xmlns:hwpunitchar="http://www.hancom.co.kr/hwpml/2016/HwpUnitChar" "#,
    r#"xmlns:epub="http://www.idpf.org/2007/ops" "#,
    r#"xmlns:config="urn:oasis:names:tc:opendocument:xmlns:config:1.0""#,
);

/// Font face languages in header order, with the primary font of each
pub const FONT_TABLE: &[(&str, &str)] = &[
    ("HANGUL", "NanumSquareOTF"),
    ("LATIN", "NimbusSanL"),
    ("HANJA", "Noto Sans CJK KR"),
    ("JAPANESE", "Noto Sans CJK KR"),
    ("OTHER", "NimbusSanL"),
    ("SYMBOL", "STIX Two Text"),
    ("USER", "NimbusSanL"),
];

/// Fixed-width font registered as font 2 of every language
pub const CODE_FONT: &str = "D2Coding";
/// Font reference of the fixed-width font
pub const CODE_FONT_REF: u32 = 2;

/// Built-in character shape IDs
pub const CHAR_NORMAL: u32 = 0;
pub const CHAR_TITLE: u32 = 7;
pub const CHAR_SUBTITLE: u32 = 8;
pub const CHAR_HEADING3: u32 = 9;
pub const CHAR_CODE: u32 = 10;

/// Built-in border fill used for table cells
pub const TABLE_BORDER_FILL: u32 = 3;

/// Built-in outline numbering referenced by heading paragraphs
const OUTLINE_NUMBERING: u32 = 1;

/// Tables managed by the writer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    BorderFills,
    CharProperties,
    Numberings,
    ParaProperties,
}

impl TableKind {
    fn from_container(name: &str) -> Option<Self> {
        match name {
            "borderFills" => Some(TableKind::BorderFills),
            "charProperties" => Some(TableKind::CharProperties),
            "numberings" => Some(TableKind::Numberings),
            "paraProperties" => Some(TableKind::ParaProperties),
            _ => None,
        }
    }

    fn record_name(self) -> &'static str {
        match self {
            TableKind::BorderFills => "borderFill",
            TableKind::CharProperties => "charPr",
            TableKind::Numberings => "numbering",
            TableKind::ParaProperties => "paraPr",
        }
    }

    fn container_qname(self) -> &'static str {
        match self {
            TableKind::BorderFills => "hh:borderFills",
            TableKind::CharProperties => "hh:charProperties",
            TableKind::Numberings => "hh:numberings",
            TableKind::ParaProperties => "hh:paraProperties",
        }
    }
}

#[derive(Debug, Clone)]
enum Segment {
    Text(String),
    Table {
        kind: TableKind,
        qname: String,
        /// Container attributes other than `itemCnt`
        attrs: Vec<(String, String)>,
    },
}

/// A header document with typed style tables
#[derive(Debug, Clone)]
pub struct HeaderDocument {
    segments: Vec<Segment>,
    pub char_shapes: BTreeMap<u32, CharShape>,
    pub para_shapes: BTreeMap<u32, ParaShape>,
    pub numberings: BTreeMap<u32, Numbering>,
    pub border_fills: BTreeMap<u32, BorderFill>,
    /// Style entries in document order (not rewritten)
    pub styles: Vec<StyleEntry>,
    /// Paragraph shape IDs in the order the header declares them
    para_order: Vec<u32>,
}

impl HeaderDocument {
    /// Parse a template header
    ///
    /// Fails if the character shape, paragraph shape or border fill tables
    /// are missing. A missing numbering table is created in front of the
    /// paragraph shapes.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut doc = HeaderDocument {
            segments: Vec::new(),
            char_shapes: BTreeMap::new(),
            para_shapes: BTreeMap::new(),
            numberings: BTreeMap::new(),
            border_fills: BTreeMap::new(),
            styles: Vec::new(),
            para_order: Vec::new(),
        };
        let mut copied = 0usize;

        loop {
            let before = reader.buffer_position() as usize;
            let event = reader.read_event()?;
            let (kind, empty) = match event {
                Event::Start(ref e) => match TableKind::from_container(&local_name(e)) {
                    Some(kind) => (kind, false),
                    None => continue,
                },
                Event::Empty(ref e) => match TableKind::from_container(&local_name(e)) {
                    Some(kind) => (kind, true),
                    None => {
                        if local_name(e) == "style" {
                            doc.styles.push(parse_style(e)?);
                        }
                        continue;
                    }
                },
                Event::Eof => break,
                _ => continue,
            };

            if !empty {
                let mut depth = 1usize;
                while depth > 0 {
                    match reader.read_event()? {
                        Event::Start(_) => depth += 1,
                        Event::End(_) => depth -= 1,
                        Event::Eof => {
                            return Err(HwpxError::InvalidStructure(format!(
                                "unterminated {}",
                                kind.container_qname()
                            )))
                        }
                        _ => {}
                    }
                }
            }
            let end = reader.buffer_position() as usize;

            let parts = parse_element(&xml[before..end])?;
            doc.segments.push(Segment::Text(xml[copied..before].to_string()));
            copied = end;

            for record in parts
                .children
                .iter()
                .filter(|c| c.name == kind.record_name())
            {
                doc.insert_record(kind, &record.xml)?;
            }
            doc.segments.push(Segment::Table {
                kind,
                qname: parts.qname.clone(),
                attrs: parts
                    .attrs
                    .into_iter()
                    .filter(|(k, _)| k != "itemCnt")
                    .collect(),
            });
        }
        doc.segments.push(Segment::Text(xml[copied..].to_string()));

        // Styles sit after the managed tables, so scan them separately
        if doc.styles.is_empty() {
            doc.styles = scan_styles(xml)?;
        }

        for required in [
            TableKind::CharProperties,
            TableKind::ParaProperties,
            TableKind::BorderFills,
        ] {
            if !doc.has_table(required) {
                return Err(HwpxError::InvalidStructure(format!(
                    "header has no {}",
                    required.container_qname()
                )));
            }
        }
        if !doc.has_table(TableKind::Numberings) {
            let at = doc
                .segments
                .iter()
                .position(|s| {
                    matches!(s, Segment::Table { kind: TableKind::ParaProperties, .. })
                })
                .unwrap_or(doc.segments.len());
            doc.segments.insert(
                at,
                Segment::Table {
                    kind: TableKind::Numberings,
                    qname: TableKind::Numberings.container_qname().to_string(),
                    attrs: Vec::new(),
                },
            );
        }

        Ok(doc)
    }

    /// The header used when no template is given
    ///
    /// Heading shapes keep their 22/16/13 proportion to the normal
    /// character height of `layout`.
    pub fn builtin(layout: &LayoutConfig) -> Self {
        let line_spacing_percent = layout.line_spacing_percent;
        let base = layout.char_height;
        let scaled = |height: u64| {
            u32::try_from(height * u64::from(base) / 1000).unwrap_or(u32::MAX)
        };

        let mut char_shapes = BTreeMap::new();
        for id in 0..CHAR_TITLE {
            char_shapes.insert(id, CharShape::builtin(id, base, 0));
        }
        for (id, height, bold) in [
            (CHAR_TITLE, 2200, true),
            (CHAR_SUBTITLE, 1600, true),
            (CHAR_HEADING3, 1300, false),
        ] {
            let mut shape = CharShape::builtin(id, scaled(height), 0);
            shape.bold = bold;
            char_shapes.insert(id, shape);
        }
        char_shapes.insert(CHAR_CODE, CharShape::builtin(CHAR_CODE, base, CODE_FONT_REF));

        let mut para_shapes = BTreeMap::new();
        let plain = ParaHeading {
            kind: HeadingKind::None,
            id_ref: 0,
            level: 0,
        };
        for id in 0..2 {
            para_shapes.insert(id, ParaShape::builtin(id, plain, 0, line_spacing_percent));
        }
        for level in 0..6u8 {
            let id = u32::from(level) + 2;
            let space_before = match id {
                2 => 800,
                3 => 600,
                4 => 400,
                _ => 0,
            };
            let heading = ParaHeading {
                kind: HeadingKind::Outline,
                id_ref: OUTLINE_NUMBERING,
                level,
            };
            para_shapes.insert(
                id,
                ParaShape::builtin(id, heading, space_before, line_spacing_percent),
            );
        }

        let mut numberings = BTreeMap::new();
        numberings.insert(OUTLINE_NUMBERING, Numbering::outline(OUTLINE_NUMBERING));

        let mut border_fills = BTreeMap::new();
        border_fills.insert(1, BorderFill::generated(1, BorderKind::None));
        border_fills.insert(2, BorderFill::generated(2, BorderKind::CharBackground));
        border_fills.insert(
            TABLE_BORDER_FILL,
            BorderFill::generated(TABLE_BORDER_FILL, BorderKind::Solid),
        );

        let mut styles = vec![
            builtin_style(0, "바탕글", "Normal", 0, CHAR_NORMAL),
            builtin_style(1, "본문", "Body", 1, CHAR_NORMAL),
        ];
        let heading_chars = [CHAR_TITLE, CHAR_SUBTITLE, CHAR_HEADING3, 0, 0, 0];
        for (index, char_pr) in heading_chars.iter().enumerate() {
            let id = index as u32 + 2;
            styles.push(builtin_style(
                id,
                &format!("개요 {}", index + 1),
                &format!("Outline {}", index + 1),
                id,
                *char_pr,
            ));
        }

        let prefix = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\" ?>\
             <hh:head {} version=\"1.4\" secCnt=\"1\">\
             <hh:beginNum page=\"1\" footnote=\"1\" endnote=\"1\" pic=\"1\" tbl=\"1\" \
             equation=\"1\"/><hh:refList>{}",
            HWPML_NAMESPACES,
            fontfaces_xml()
        );
        let tab_properties = "<hh:tabProperties itemCnt=\"1\">\
             <hh:tabPr id=\"0\" autoTabLeft=\"0\" autoTabRight=\"0\"/></hh:tabProperties>";
        let mut suffix = format!("<hh:styles itemCnt=\"{}\">", styles.len());
        for style in &styles {
            suffix.push_str(&style.to_xml());
        }
        suffix.push_str(
            "</hh:styles></hh:refList>\
             <hh:compatibleDocument targetProgram=\"HWP201X\"><hh:layoutCompatibility/>\
             </hh:compatibleDocument>\
             <hh:docOption><hh:linkinfo path=\"\" pageInherit=\"0\" footnoteInherit=\"0\"/>\
             </hh:docOption><hh:trackchageConfig flags=\"56\"/></hh:head>",
        );

        let table = |kind: TableKind| Segment::Table {
            kind,
            qname: kind.container_qname().to_string(),
            attrs: Vec::new(),
        };
        let segments = vec![
            Segment::Text(prefix),
            table(TableKind::BorderFills),
            table(TableKind::CharProperties),
            Segment::Text(tab_properties.to_string()),
            table(TableKind::Numberings),
            table(TableKind::ParaProperties),
            Segment::Text(suffix),
        ];

        let para_order = para_shapes.keys().copied().collect();
        Self {
            segments,
            char_shapes,
            para_shapes,
            numberings,
            border_fills,
            styles,
            para_order,
        }
    }

    /// Paragraph shapes read from the header, in declaration order
    pub fn declared_para_shapes(&self) -> impl Iterator<Item = &ParaShape> {
        self.para_order
            .iter()
            .filter_map(|id| self.para_shapes.get(id))
    }

    fn has_table(&self, kind: TableKind) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Table { kind: k, .. } if *k == kind))
    }

    fn insert_record(&mut self, kind: TableKind, xml: &str) -> Result<()> {
        match kind {
            TableKind::CharProperties => {
                let shape = CharShape::parse(xml)?;
                self.char_shapes.insert(shape.id, shape);
            }
            TableKind::ParaProperties => {
                let shape = ParaShape::parse(xml)?;
                if !self.para_shapes.contains_key(&shape.id) {
                    self.para_order.push(shape.id);
                }
                self.para_shapes.insert(shape.id, shape);
            }
            TableKind::Numberings => {
                let numbering = Numbering::parse(xml)?;
                self.numberings.insert(numbering.id, numbering);
            }
            TableKind::BorderFills => {
                let fill = BorderFill::parse(xml)?;
                self.border_fills.insert(fill.id, fill);
            }
        }
        Ok(())
    }

    /// Look up a style entry by ID
    pub fn style(&self, id: u32) -> Option<&StyleEntry> {
        self.styles.iter().find(|s| s.id == id)
    }

    /// Serialize the header, refreshing every managed table's item count
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => xml.push_str(text),
                Segment::Table { kind, qname, attrs } => {
                    let (count, body) = self.table_body(*kind)?;
                    let mut all_attrs = vec![("itemCnt".to_string(), count.to_string())];
                    all_attrs.extend(attrs.iter().cloned());
                    xml.push_str(&start_tag(qname, &all_attrs, false));
                    xml.push_str(&body);
                    xml.push_str(&format!("</{}>", qname));
                }
            }
        }
        Ok(xml)
    }

    fn table_body(&self, kind: TableKind) -> Result<(usize, String)> {
        let mut body = String::new();
        let count = match kind {
            TableKind::CharProperties => {
                for shape in self.char_shapes.values() {
                    body.push_str(&shape.to_xml());
                }
                self.char_shapes.len()
            }
            TableKind::ParaProperties => {
                for shape in self.para_shapes.values() {
                    body.push_str(&shape.to_xml()?);
                }
                self.para_shapes.len()
            }
            TableKind::Numberings => {
                for numbering in self.numberings.values() {
                    body.push_str(&numbering.to_xml());
                }
                self.numberings.len()
            }
            TableKind::BorderFills => {
                for fill in self.border_fills.values() {
                    body.push_str(&fill.to_xml());
                }
                self.border_fills.len()
            }
        };
        Ok((count, body))
    }
}

fn builtin_style(id: u32, name: &str, eng_name: &str, para_pr: u32, char_pr: u32) -> StyleEntry {
    StyleEntry {
        id,
        kind: "PARA".to_string(),
        name: name.to_string(),
        eng_name: eng_name.to_string(),
        para_pr_ref: para_pr,
        char_pr_ref: char_pr,
        next_style_ref: id,
    }
}

fn parse_style(e: &quick_xml::events::BytesStart) -> Result<StyleEntry> {
    let number = |key: &[u8]| get_attr(e, key).and_then(|v| v.parse::<u32>().ok());
    let id = number(b"id")
        .ok_or_else(|| HwpxError::InvalidStructure("style without a numeric id".to_string()))?;
    Ok(StyleEntry {
        id,
        kind: get_attr(e, b"type").unwrap_or_else(|| "PARA".to_string()),
        name: get_attr(e, b"name").unwrap_or_default(),
        eng_name: get_attr(e, b"engName").unwrap_or_default(),
        para_pr_ref: number(b"paraPrIDRef").unwrap_or(0),
        char_pr_ref: number(b"charPrIDRef").unwrap_or(0),
        next_style_ref: number(b"nextStyleIDRef").unwrap_or(id),
    })
}

/// Collect every `hh:style` entry of a header
fn scan_styles(xml: &str) -> Result<Vec<StyleEntry>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut styles = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(ref e) | Event::Empty(ref e) if e.local_name().as_ref() == b"style" => {
                styles.push(parse_style(e)?);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(styles)
}

/// Font faces of the built-in header
fn fontfaces_xml() -> String {
    let mut xml = format!("<hh:fontfaces itemCnt=\"{}\">", FONT_TABLE.len());
    for (lang, primary) in FONT_TABLE {
        xml.push_str(&format!("<hh:fontface lang=\"{}\" fontCnt=\"3\">", lang));
        for (id, face) in [primary, primary, &CODE_FONT].iter().enumerate() {
            xml.push_str(&font_xml(id, face));
        }
        xml.push_str("</hh:fontface>");
    }
    xml.push_str("</hh:fontfaces>");
    xml
}

fn font_xml(id: usize, face: &str) -> String {
    format!(
        "<hh:font id=\"{}\" face=\"{}\" type=\"TTF\" isEmbedded=\"0\">\
         <hh:typeInfo familyType=\"FCAT_GOTHIC\" weight=\"6\" proportion=\"4\" contrast=\"0\" \
         strokeVariation=\"1\" armStyle=\"1\" letterform=\"1\" midline=\"1\" xHeight=\"1\"/>\
         </hh:font>",
        id,
        escape_xml(face)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::minimal_header_xml;

    #[test]
    fn test_builtin_heights_follow_layout() {
        let layout = LayoutConfig {
            char_height: 1500,
            ..LayoutConfig::default()
        };
        let header = HeaderDocument::builtin(&layout);
        assert_eq!(header.char_shapes[&CHAR_NORMAL].height, 1500);
        assert_eq!(header.char_shapes[&CHAR_TITLE].height, 3300);
        assert_eq!(header.char_shapes[&CHAR_SUBTITLE].height, 2400);
        assert_eq!(header.char_shapes[&CHAR_HEADING3].height, 1950);
        assert_eq!(header.char_shapes[&CHAR_CODE].height, 1500);
    }

    #[test]
    fn test_builtin_header_tables() {
        let header = HeaderDocument::builtin(&LayoutConfig::default());
        assert_eq!(header.char_shapes.len(), 11);
        assert_eq!(header.para_shapes.len(), 8);
        assert_eq!(header.char_shapes[&CHAR_TITLE].height, 2200);
        assert!(header.char_shapes[&CHAR_TITLE].bold);
        assert!(!header.char_shapes[&CHAR_HEADING3].bold);
        assert_eq!(header.para_shapes[&2].outline_level(), Some(0));
        assert_eq!(header.para_shapes[&7].outline_level(), Some(5));
        assert_eq!(header.style(4).map(|s| s.char_pr_ref), Some(CHAR_HEADING3));

        let xml = header.to_xml().unwrap();
        assert!(xml.contains(r#"<hh:charProperties itemCnt="11">"#));
        assert!(xml.contains(r#"<hh:paraProperties itemCnt="8">"#));
        assert!(xml.contains(r#"<hh:borderFills itemCnt="3">"#));
        assert!(xml.contains(r#"<hh:fontface lang="SYMBOL" fontCnt="3">"#));
        assert!(xml.contains(r#"face="D2Coding""#));
        assert!(xml.ends_with("</hh:head>"));
        // The generated header must itself be parseable
        let reparsed = HeaderDocument::parse(&xml).unwrap();
        assert_eq!(reparsed.char_shapes.len(), 11);
        assert_eq!(reparsed.styles.len(), 8);
    }

    #[test]
    fn test_parse_preserves_outside_text() {
        let xml = minimal_header_xml();
        let header = HeaderDocument::parse(&xml).unwrap();
        assert_eq!(header.char_shapes.len(), 2);
        assert_eq!(header.para_shapes.len(), 1);
        assert_eq!(header.styles.len(), 1);

        let out = header.to_xml().unwrap();
        assert!(out.contains(r#"<hh:fontfaces itemCnt="1"><hh:fontface lang="HANGUL" fontCnt="1">"#));
        assert!(out.contains(r#"<hh:tabProperties itemCnt="1"><hh:tabPr id="0"/></hh:tabProperties>"#));
        // A numbering table is created in front of the paragraph shapes
        let numberings = out.find(r#"<hh:numberings itemCnt="0">"#).unwrap();
        let para = out.find("<hh:paraProperties").unwrap();
        assert!(numberings < para);
    }

    #[test]
    fn test_parse_counts_follow_records() {
        let mut header = HeaderDocument::parse(&minimal_header_xml()).unwrap();
        let mut clone = header.char_shapes[&0].clone();
        clone.id = 2;
        header.char_shapes.insert(2, clone);
        let out = header.to_xml().unwrap();
        assert!(out.contains(r#"<hh:charProperties itemCnt="3">"#));
    }

    #[test]
    fn test_parse_rejects_missing_tables() {
        let xml = r#"<hh:head xmlns:hh="http://www.hancom.co.kr/hwpml/2011/head"><hh:refList/></hh:head>"#;
        assert!(HeaderDocument::parse(xml).is_err());
        assert!(HeaderDocument::parse("<hh:head><hh:charProperties>").is_err());
    }
}
