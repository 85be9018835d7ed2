//! Small XML helpers shared by the header and section code
//!
//! Records taken from a template are kept as source text wherever they are
//! not modelled, so these helpers work on byte positions in the original
//! string rather than re-serializing events.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{HwpxError, Result};

/// An element captured verbatim from a source document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawElement {
    /// Local name (without namespace prefix)
    pub name: String,
    /// Complete source text of the element
    pub xml: String,
}

/// Root element of a fragment split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementParts {
    /// Qualified name, e.g. `hh:charPr`
    pub qname: String,
    /// Attributes in source order; values are kept escaped
    pub attrs: Vec<(String, String)>,
    /// Direct child elements; text between them is dropped
    pub children: Vec<RawElement>,
}

impl ElementParts {
    /// Look up an attribute value
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Remove and return an attribute value
    pub fn take_attr(&mut self, key: &str) -> Option<String> {
        let index = self.attrs.iter().position(|(k, _)| k == key)?;
        Some(self.attrs.remove(index).1)
    }
}

/// Escape special XML characters
pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Get an attribute value as string (raw, still escaped)
pub fn get_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| String::from_utf8(a.value.to_vec()).ok())
}

/// All attributes of a start tag, in order
pub fn attributes(e: &BytesStart) -> Result<Vec<(String, String)>> {
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        attrs.push((
            String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            String::from_utf8_lossy(&attr.value).into_owned(),
        ));
    }
    Ok(attrs)
}

/// Local name of a start tag as an owned string
pub fn local_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

/// Qualified name of a start tag as an owned string
pub fn qualified_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// Format a start tag (or an empty element when `empty` is set)
pub fn start_tag(qname: &str, attrs: &[(String, String)], empty: bool) -> String {
    let mut tag = format!("<{}", qname);
    for (key, value) in attrs {
        tag.push_str(&format!(" {}=\"{}\"", key, value));
    }
    tag.push_str(if empty { "/>" } else { ">" });
    tag
}

/// Split a single-element fragment into its name, attributes and children
pub fn parse_element(xml: &str) -> Result<ElementParts> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut root: Option<(String, Vec<(String, String)>)> = None;
    let mut children = Vec::new();
    let mut depth = 0usize;
    let mut child_start = 0usize;
    let mut child_name = String::new();

    loop {
        let before = reader.buffer_position() as usize;
        let event = reader.read_event()?;
        let after = reader.buffer_position() as usize;
        match event {
            Event::Start(ref e) => {
                if root.is_none() {
                    root = Some((qualified_name(e), attributes(e)?));
                } else if depth == 1 {
                    child_start = before;
                    child_name = local_name(e);
                }
                depth += 1;
            }
            Event::Empty(ref e) => {
                if root.is_none() {
                    root = Some((qualified_name(e), attributes(e)?));
                    break;
                } else if depth == 1 {
                    children.push(RawElement {
                        name: local_name(e),
                        xml: xml[before..after].to_string(),
                    });
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 1 {
                    children.push(RawElement {
                        name: std::mem::take(&mut child_name),
                        xml: xml[child_start..after].to_string(),
                    });
                }
                if depth == 0 {
                    break;
                }
            }
            Event::Eof => {
                return Err(HwpxError::InvalidStructure(
                    "unterminated element".to_string(),
                ))
            }
            _ => {}
        }
    }

    let (qname, attrs) =
        root.ok_or_else(|| HwpxError::InvalidStructure("no root element".to_string()))?;
    Ok(ElementParts {
        qname,
        attrs,
        children,
    })
}

/// Byte range of the first element named `name` (local name)
pub fn find_element(xml: &str, name: &str) -> Result<Option<std::ops::Range<usize>>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut start = None;
    let mut depth = 0usize;
    loop {
        let before = reader.buffer_position() as usize;
        let event = reader.read_event()?;
        let after = reader.buffer_position() as usize;
        match event {
            Event::Start(ref e) => {
                if start.is_none() && e.local_name().as_ref() == name.as_bytes() {
                    start = Some(before);
                    depth = 0;
                }
                if start.is_some() {
                    depth += 1;
                }
            }
            Event::Empty(ref e) => {
                if start.is_none() && e.local_name().as_ref() == name.as_bytes() {
                    return Ok(Some(before..after));
                }
            }
            Event::End(_) => {
                if let Some(s) = start {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(Some(s..after));
                    }
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Byte range of the start tag of the first element named `name`
pub fn find_start_tag(xml: &str, name: &str) -> Result<Option<std::ops::Range<usize>>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    loop {
        let before = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(ref e) if e.local_name().as_ref() == name.as_bytes() => {
                return Ok(Some(before..reader.buffer_position() as usize));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Rewrite attribute values on elements anywhere inside a fragment
///
/// Each rule is `(element local name, attribute, new value)`. Elements are
/// matched at any depth; everything else is copied unchanged.
pub fn rewrite_attributes(xml: &str, rules: &[(&str, &str, String)]) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut out = String::with_capacity(xml.len());
    let mut copied = 0usize;
    loop {
        let before = reader.buffer_position() as usize;
        let event = reader.read_event()?;
        let after = reader.buffer_position() as usize;
        let (e, empty) = match event {
            Event::Start(ref e) => (e, false),
            Event::Empty(ref e) => (e, true),
            Event::Eof => break,
            _ => continue,
        };

        let name = local_name(e);
        let matching: Vec<_> = rules.iter().filter(|(el, _, _)| *el == name).collect();
        if matching.is_empty() {
            continue;
        }

        let mut attrs = attributes(e)?;
        for (key, value) in attrs.iter_mut() {
            if let Some((_, _, new_value)) = matching.iter().find(|(_, a, _)| a == key) {
                *value = new_value.clone();
            }
        }
        out.push_str(&xml[copied..before]);
        out.push_str(&start_tag(&qualified_name(e), &attrs, empty));
        copied = after;
    }
    out.push_str(&xml[copied..]);
    Ok(out)
}
