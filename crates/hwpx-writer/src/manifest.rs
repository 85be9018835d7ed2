//! Package manifest (Contents/content.hpf)
//!
//! The OPF manifest carries document metadata and one `opf:item` per part.
//! Metadata is written into the placeholders the source package already
//! has; items for embedded pictures are appended to the manifest list.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::{Captures, Regex};

use crate::image::ImageRef;
use crate::xml::escape_xml;

/// The manifest path within the package
pub const CONTENT_HPF_PATH: &str = "Contents/content.hpf";

/// Timestamp format used by `ModifiedDate`
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Document metadata written into the manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentInfo {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub date: String,
}

impl DocumentInfo {
    /// Extract metadata from a document's `meta` map
    pub fn from_document(doc: &hwpx_ast::Document) -> Self {
        Self {
            title: doc.meta_text("title"),
            subtitle: doc.meta_text("subtitle"),
            author: doc.meta_text("author"),
            date: doc.meta_text("date"),
        }
    }
}

/// Fill manifest metadata and register embedded pictures
///
/// Title, creator, last-saved-by and date are only replaced when a value
/// is known; the modification time is always refreshed. Both the empty
/// (`<opf:title/>`) and the filled form of each placeholder are accepted.
pub fn update_content_hpf(
    hpf: &str,
    info: &DocumentInfo,
    images: &[ImageRef],
    now: DateTime<Utc>,
) -> String {
    static TITLE_RE: OnceLock<Regex> = OnceLock::new();
    static META_RE: OnceLock<Regex> = OnceLock::new();

    let title_re = TITLE_RE
        .get_or_init(|| Regex::new(r"(?s)(<opf:title)(?:/>|>(.*?)</opf:title>)").unwrap());
    let meta_re = META_RE.get_or_init(|| {
        Regex::new(
            r#"(?s)(<opf:meta name="(creator|lastsaveby|ModifiedDate|date)" content="text")(?:/>|>(.*?)</opf:meta>)"#,
        )
        .unwrap()
    });

    let mut xml = hpf.to_string();
    if !info.title.is_empty() {
        let title = escape_xml(&info.title);
        xml = title_re
            .replace_all(&xml, |caps: &Captures| {
                format!("{}>{}</opf:title>", &caps[1], title)
            })
            .into_owned();
    }

    let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
    let author = escape_xml(&info.author);
    let date = escape_xml(&info.date);
    xml = meta_re
        .replace_all(&xml, |caps: &Captures| {
            let value = match &caps[2] {
                "creator" | "lastsaveby" => author.as_str(),
                "ModifiedDate" => timestamp.as_str(),
                _ => date.as_str(),
            };
            if value.is_empty() {
                caps[0].to_string()
            } else {
                format!("{}>{}</opf:meta>", &caps[1], value)
            }
        })
        .into_owned();

    if !images.is_empty() {
        if let Some(at) = xml.find("</opf:manifest>") {
            let mut items = String::new();
            for image in images {
                items.push_str(&format!(
                    "<opf:item id=\"{}\" href=\"{}\" media-type=\"{}\" isEmbeded=\"1\"/>\n",
                    image.id,
                    image.archive_path(),
                    image.media_type()
                ));
            }
            xml.insert_str(at, &items);
        }
    }

    xml
}
