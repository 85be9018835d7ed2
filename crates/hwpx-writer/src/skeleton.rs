//! Built-in package skeleton
//!
//! A minimal HWPX package generated in memory, used when no reference
//! document is supplied. `Contents/header.xml` is regenerated from the
//! style registry at finalize time; the copy written here only keeps the
//! entry in its place in the package order.

use crate::archive::HwpxArchive;
use crate::config::LayoutConfig;
use crate::error::Result;
use crate::header::{HeaderDocument, HWPML_NAMESPACES};
use crate::manifest::CONTENT_HPF_PATH;
use crate::section::SECTION_PATH;

/// Package MIME type, stored uncompressed as the first entry
pub const MIMETYPE: &str = "application/hwp+zip";

/// The style header path within the package
pub const HEADER_PATH: &str = "Contents/header.xml";

/// A4 page width and height in HWPUNIT
const PAGE_WIDTH: u32 = 59528;
const PAGE_HEIGHT: u32 = 84186;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?>"#;

/// Build the built-in package
pub fn builtin_archive(layout: &LayoutConfig) -> Result<HwpxArchive> {
    let mut archive = HwpxArchive::new();
    archive.add_stored("mimetype", MIMETYPE.as_bytes().to_vec());
    archive.set_string("version.xml", version_xml());
    archive.set_string(HEADER_PATH, HeaderDocument::builtin(layout).to_xml()?);
    archive.set_string(SECTION_PATH, builtin_section_xml());
    archive.set_string("settings.xml", settings_xml());
    archive.set_string("Preview/PrvText.txt", "");
    archive.set_string("META-INF/container.xml", container_xml());
    archive.set_string(CONTENT_HPF_PATH, content_hpf_xml());
    archive.set_string("META-INF/manifest.xml", manifest_xml());
    Ok(archive)
}

fn version_xml() -> String {
    format!(
        "{}<hv:HCFVersion xmlns:hv=\"http://www.hancom.co.kr/hwpml/2011/version\" \
         tagetApplication=\"WORDPROCESSOR\" major=\"5\" minor=\"1\" micro=\"1\" \
         buildNumber=\"0\" os=\"1\" xmlVersion=\"1.4\" application=\"Hancom Office Hangul\" \
         appVersion=\"12, 0, 0, 0\"/>",
        XML_DECL
    )
}

fn settings_xml() -> String {
    format!(
        "{}<ha:HWPApplicationSetting xmlns:ha=\"http://www.hancom.co.kr/hwpml/2011/app\" \
         xmlns:config=\"urn:oasis:names:tc:opendocument:xmlns:config:1.0\">\
         <ha:CaretPosition listIDRef=\"0\" paraIDRef=\"0\" pos=\"0\"/></ha:HWPApplicationSetting>",
        XML_DECL
    )
}

fn container_xml() -> String {
    format!(
        "{}<ocf:container xmlns:ocf=\"urn:oasis:names:tc:opendocument:xmlns:container\" \
         xmlns:hpf=\"http://www.hancom.co.kr/schema/2011/hpf\"><ocf:rootfiles>\
         <ocf:rootfile full-path=\"{}\" media-type=\"application/hwpml-package+xml\"/>\
         <ocf:rootfile full-path=\"Preview/PrvText.txt\" media-type=\"text/plain\"/>\
         </ocf:rootfiles></ocf:container>",
        XML_DECL, CONTENT_HPF_PATH
    )
}

fn manifest_xml() -> String {
    format!(
        "{}<odf:manifest xmlns:odf=\"urn:oasis:names:tc:opendocument:xmlns:manifest:1.0\"/>",
        XML_DECL
    )
}

fn content_hpf_xml() -> String {
    format!(
        "{}<opf:package {} version=\"\" unique-identifier=\"\" id=\"\"><opf:metadata>\
         <opf:title/><opf:language>ko</opf:language>\
         <opf:meta name=\"creator\" content=\"text\"/>\
         <opf:meta name=\"subject\" content=\"text\"/>\
         <opf:meta name=\"description\" content=\"text\"/>\
         <opf:meta name=\"lastsaveby\" content=\"text\"/>\
         <opf:meta name=\"CreatedDate\" content=\"text\"/>\
         <opf:meta name=\"ModifiedDate\" content=\"text\"/>\
         <opf:meta name=\"date\" content=\"text\"/>\
         <opf:meta name=\"keyword\" content=\"text\"/>\
         </opf:metadata><opf:manifest>\
         <opf:item id=\"header\" href=\"{}\" media-type=\"application/xml\"/>\
         <opf:item id=\"section0\" href=\"{}\" media-type=\"application/xml\"/>\
         <opf:item id=\"settings\" href=\"settings.xml\" media-type=\"application/xml\"/>\
         </opf:manifest><opf:spine><opf:itemref idref=\"header\" linear=\"yes\"/>\
         <opf:itemref idref=\"section0\" linear=\"yes\"/></opf:spine></opf:package>",
        XML_DECL, HWPML_NAMESPACES, HEADER_PATH, SECTION_PATH
    )
}

/// Section with a single page setup paragraph
pub fn builtin_section_xml() -> String {
    format!(
        "{}<hs:sec {}><hp:p id=\"0\" paraPrIDRef=\"0\" styleIDRef=\"0\" pageBreak=\"0\" \
         columnBreak=\"0\" merged=\"0\"><hp:run charPrIDRef=\"0\">\
         <hp:secPr id=\"\" textDirection=\"HORIZONTAL\" spaceColumns=\"1134\" tabStop=\"8000\" \
         tabStopVal=\"4000\" tabStopUnit=\"HWPUNIT\" outlineShapeIDRef=\"1\" memoShapeIDRef=\"0\" \
         textVerticalWidthHead=\"0\" masterPageCnt=\"0\">\
         <hp:grid lineGrid=\"0\" charGrid=\"0\" wonggojiFormat=\"0\"/>\
         <hp:startNum pageStartsOn=\"BOTH\" page=\"0\" pic=\"0\" tbl=\"0\" equation=\"0\"/>\
         <hp:visibility hideFirstHeader=\"0\" hideFirstFooter=\"0\" hideFirstMasterPage=\"0\" \
         border=\"SHOW_ALL\" fill=\"SHOW_ALL\" hideFirstPageNum=\"0\" hideFirstEmptyLine=\"0\" \
         showLineNumber=\"0\"/>\
         <hp:lineNumberShape restartType=\"0\" countBy=\"0\" distance=\"0\" startNumber=\"0\"/>\
         <hp:pagePr landscape=\"WIDELY\" width=\"{}\" height=\"{}\" gutterType=\"LEFT_ONLY\">\
         <hp:margin header=\"4252\" footer=\"4252\" gutter=\"0\" left=\"8504\" right=\"8504\" \
         top=\"5668\" bottom=\"4252\"/></hp:pagePr>\
         <hp:footNotePr><hp:autoNumFormat type=\"DIGIT\" userChar=\"\" prefixChar=\"\" \
         suffixChar=\")\" supscript=\"0\"/><hp:noteLine length=\"-1\" type=\"SOLID\" \
         width=\"0.12 mm\" color=\"#000000\"/><hp:noteSpacing betweenNotes=\"283\" \
         belowLine=\"567\" aboveLine=\"850\"/><hp:numbering type=\"CONTINUOUS\" newNum=\"1\"/>\
         <hp:placement place=\"EACH_COLUMN\" beneathText=\"0\"/></hp:footNotePr>\
         </hp:secPr><hp:ctrl><hp:colPr id=\"\" type=\"NEWSPAPER\" layout=\"LEFT\" colCount=\"1\" \
         sameSz=\"1\" sameGap=\"0\"/></hp:ctrl></hp:run><hp:run charPrIDRef=\"0\"><hp:t/></hp:run>\
         <hp:linesegarray><hp:lineseg textpos=\"0\" vertpos=\"0\" vertsize=\"1000\" \
         textheight=\"1000\" baseline=\"850\" spacing=\"600\" horzpos=\"0\" horzsize=\"42520\" \
         flags=\"393216\"/></hp:linesegarray></hp:p></hs:sec>",
        XML_DECL, HWPML_NAMESPACES, PAGE_WIDTH, PAGE_HEIGHT
    )
}
