//! Section document (Contents/section0.xml)

use crate::error::{HwpxError, Result};
use crate::xml::{find_element, find_start_tag};

/// The body section path within the package
pub const SECTION_PATH: &str = "Contents/section0.xml";

/// Build a section from a source section and generated paragraphs
///
/// Keeps the source up to and including the `hs:sec` start tag, then its
/// first paragraph (which carries the page setup), then `body`.
pub fn build_section_xml(source: &str, body: &str) -> Result<String> {
    let sec = find_start_tag(source, "sec")?
        .ok_or_else(|| HwpxError::InvalidStructure("section has no hs:sec element".to_string()))?;
    let rest = &source[sec.end..];
    let first = find_element(rest, "p")?.ok_or_else(|| {
        HwpxError::InvalidStructure("section has no page setup paragraph".to_string())
    })?;

    let mut xml = String::with_capacity(sec.end + first.len() + body.len() + 16);
    xml.push_str(&source[..sec.end]);
    xml.push_str(&rest[first]);
    xml.push('\n');
    xml.push_str(body);
    xml.push_str("\n</hs:sec>");
    Ok(xml)
}
