//! Shared test fixtures for hwpx-writer
//!
//! Small but structurally complete header documents and a reference
//! package built in memory.

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;
use zip::ZipWriter;

const HEAD_START: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?><hh:head xmlns:hh="http://www.hancom.co.kr/hwpml/2011/head" xmlns:hc="http://www.hancom.co.kr/hwpml/2011/core" version="1.4" secCnt="1"><hh:beginNum page="1" footnote="1" endnote="1" pic="1" tbl="1" equation="1"/><hh:refList>"#;

const FONTFACES: &str = r#"<hh:fontfaces itemCnt="1"><hh:fontface lang="HANGUL" fontCnt="1"><hh:font id="0" face="Batang" type="TTF" isEmbedded="0"/></hh:fontface></hh:fontfaces>"#;

const BORDER_FILLS: &str = r#"<hh:borderFills itemCnt="1"><hh:borderFill id="1" threeD="0" shadow="0" centerLine="NONE" breakCellSeparateLine="0"><hh:slash type="NONE" Crooked="0" isCounter="0"/><hh:backSlash type="NONE" Crooked="0" isCounter="0"/></hh:borderFill></hh:borderFills>"#;

const CHAR_PROPERTIES: &str = r##"<hh:charProperties itemCnt="2"><hh:charPr id="0" height="1000" textColor="#000000" shadeColor="none" useFontSpace="0" useKerning="0" symMark="NONE" borderFillIDRef="1"><hh:fontRef hangul="0" latin="0" hanja="0" japanese="0" other="0" symbol="0" user="0"/><hh:underline type="NONE" shape="SOLID" color="#000000"/></hh:charPr><hh:charPr id="1" height="1600" textColor="#1F3864" shadeColor="none" useFontSpace="0" useKerning="0" symMark="NONE" borderFillIDRef="1"><hh:fontRef hangul="0" latin="0" hanja="0" japanese="0" other="0" symbol="0" user="0"/><hh:bold/></hh:charPr></hh:charProperties>"##;

const TAB_PROPERTIES: &str = r#"<hh:tabProperties itemCnt="1"><hh:tabPr id="0"/></hh:tabProperties>"#;

const HEAD_END: &str = "</hh:refList></hh:head>";

fn para_pr(id: u32, heading: &str) -> String {
    format!(
        "<hh:paraPr id=\"{}\" tabPrIDRef=\"0\" condense=\"0\"><hh:align horizontal=\"JUSTIFY\" vertical=\"BASELINE\"/>{}<hh:margin><hc:intent value=\"0\" unit=\"HWPUNIT\"/><hc:left value=\"0\" unit=\"HWPUNIT\"/><hc:right value=\"0\" unit=\"HWPUNIT\"/><hc:prev value=\"0\" unit=\"HWPUNIT\"/><hc:next value=\"0\" unit=\"HWPUNIT\"/></hh:margin><hh:lineSpacing type=\"PERCENT\" value=\"160\" unit=\"HWPUNIT\"/></hh:paraPr>",
        id, heading
    )
}

fn style(id: u32, name: &str, para_pr: u32, char_pr: u32) -> String {
    format!(
        "<hh:style id=\"{0}\" type=\"PARA\" name=\"{1}\" engName=\"{1}\" paraPrIDRef=\"{2}\" charPrIDRef=\"{3}\" nextStyleIDRef=\"0\" langID=\"1042\" lockForm=\"0\"/>",
        id, name, para_pr, char_pr
    )
}

fn header_xml(para_shapes: &[String], styles: &[String]) -> String {
    format!(
        "{}{}{}{}{}<hh:paraProperties itemCnt=\"{}\">{}</hh:paraProperties><hh:styles itemCnt=\"{}\">{}</hh:styles>{}",
        HEAD_START,
        FONTFACES,
        BORDER_FILLS,
        CHAR_PROPERTIES,
        TAB_PROPERTIES,
        para_shapes.len(),
        para_shapes.concat(),
        styles.len(),
        styles.concat(),
        HEAD_END
    )
}

/// A header with two character shapes, one plain paragraph shape and one
/// style, without numberings or outline levels
pub fn minimal_header_xml() -> String {
    header_xml(
        &[para_pr(0, r#"<hh:heading type="NONE" idRef="0" level="0"/>"#)],
        &[style(0, "Normal", 0, 0)],
    )
}

/// Like [`minimal_header_xml`], plus an outline level 0 paragraph shape (1)
/// used by style 1 with character shape 1
pub fn outline_header_xml() -> String {
    header_xml(
        &[
            para_pr(0, r#"<hh:heading type="NONE" idRef="0" level="0"/>"#),
            para_pr(1, r#"<hh:heading type="OUTLINE" idRef="0" level="0"/>"#),
        ],
        &[style(0, "Normal", 0, 0), style(1, "Heading", 1, 1)],
    )
}

/// Outline level 0 is declared first by paraPr 5, which no style uses, and
/// then by paraPr 3 (style 1). Level 1 is paraPr 4, used by style 3.
pub fn shadowed_outline_header_xml() -> String {
    header_xml(
        &[
            para_pr(0, r#"<hh:heading type="NONE" idRef="0" level="0"/>"#),
            para_pr(5, r#"<hh:heading type="OUTLINE" idRef="0" level="0"/>"#),
            para_pr(3, r#"<hh:heading type="OUTLINE" idRef="0" level="0"/>"#),
            para_pr(4, r#"<hh:heading type="OUTLINE" idRef="0" level="1"/>"#),
        ],
        &[
            style(0, "Normal", 0, 0),
            style(1, "Heading 1", 3, 1),
            style(3, "Heading 2", 4, 1),
        ],
    )
}

/// Section of the reference package: page setup plus one stale paragraph
pub fn reference_section_xml() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?><hs:sec xmlns:hs="http://www.hancom.co.kr/hwpml/2011/section" xmlns:hp="http://www.hancom.co.kr/hwpml/2011/paragraph"><hp:p id="0" paraPrIDRef="0" styleIDRef="0" pageBreak="0" columnBreak="0" merged="0"><hp:run charPrIDRef="0"><hp:secPr id="" textDirection="HORIZONTAL"><hp:pagePr landscape="WIDELY" width="59528" height="84186" gutterType="LEFT_ONLY"/></hp:secPr></hp:run></hp:p><hp:p id="1" paraPrIDRef="0" styleIDRef="0" pageBreak="0" columnBreak="0" merged="0"><hp:run charPrIDRef="0"><hp:t>Reference body text</hp:t></hp:run></hp:p></hs:sec>"#.to_string()
}

/// Manifest of the reference package
pub fn reference_content_hpf() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?><opf:package xmlns:opf="http://www.idpf.org/2007/opf/" version="" unique-identifier="" id=""><opf:metadata><opf:title/><opf:language>ko</opf:language><opf:meta name="creator" content="text">Template Author</opf:meta><opf:meta name="lastsaveby" content="text"/><opf:meta name="ModifiedDate" content="text"/><opf:meta name="date" content="text"/></opf:metadata><opf:manifest><opf:item id="header" href="Contents/header.xml" media-type="application/xml"/><opf:item id="section0" href="Contents/section0.xml" media-type="application/xml"/></opf:manifest><opf:spine><opf:itemref idref="section0" linear="yes"/></opf:spine></opf:package>"#.to_string()
}

/// Create a reference `.hwpx` package
///
/// Contains `mimetype`, `version.xml`, the outline header, the reference
/// section and manifest, and a preview text entry.
pub fn create_reference_package() -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    let mut zip = ZipWriter::new(&mut buffer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    zip.start_file("mimetype", options).unwrap();
    zip.write_all(b"application/hwp+zip").unwrap();

    zip.start_file("version.xml", options).unwrap();
    zip.write_all(br#"<?xml version="1.0" encoding="UTF-8"?><hv:HCFVersion xmlns:hv="http://www.hancom.co.kr/hwpml/2011/version" major="5" minor="1"/>"#)
        .unwrap();

    zip.start_file("Contents/header.xml", options).unwrap();
    zip.write_all(outline_header_xml().as_bytes()).unwrap();

    zip.start_file("Contents/section0.xml", options).unwrap();
    zip.write_all(reference_section_xml().as_bytes()).unwrap();

    zip.start_file("Contents/content.hpf", options).unwrap();
    zip.write_all(reference_content_hpf().as_bytes()).unwrap();

    zip.start_file("Preview/PrvText.txt", options).unwrap();
    zip.write_all("reference preview".as_bytes()).unwrap();

    zip.finish().unwrap();
    buffer.into_inner()
}
