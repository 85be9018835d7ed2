//! End-to-end package tests
//!
//! Documents are converted through `HwpxWriter` and the resulting archive is
//! inspected part by part.

use std::io::{Cursor, Write};

use hwpx_ast::{Attr, Block, Cell, Document, Inline, Row, Target};
use hwpx_writer::{HwpxArchive, HwpxWriter, LayoutConfig, Template};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const SECTION: &str = "Contents/section0.xml";
const HEADER: &str = "Contents/header.xml";
const HPF: &str = "Contents/content.hpf";

// =============================================================================
// Fixtures
// =============================================================================

fn str_(text: &str) -> Inline {
    Inline::Str(text.to_string())
}

fn para(text: &str) -> Block {
    Block::Para(vec![str_(text)])
}

fn convert(doc: &Document) -> HwpxArchive {
    let template = Template::builtin(&LayoutConfig::default()).unwrap();
    HwpxWriter::new().build_archive(doc, template).unwrap()
}

fn convert_with(config: LayoutConfig, doc: &Document) -> HwpxArchive {
    let template = Template::builtin(&config).unwrap();
    HwpxWriter::with_config(config)
        .build_archive(doc, template)
        .unwrap()
}

fn section_of(archive: &HwpxArchive) -> String {
    archive.get_string(SECTION).unwrap()
}

/// Header with one paragraph shape, one style and no outline levels
fn plain_header() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?>"#,
        r#"<hh:head xmlns:hh="http://www.hancom.co.kr/hwpml/2011/head" xmlns:hc="http://www.hancom.co.kr/hwpml/2011/core" version="1.4" secCnt="1"><hh:refList>"#,
        r#"<hh:borderFills itemCnt="1"><hh:borderFill id="1" threeD="0" shadow="0" centerLine="NONE" breakCellSeparateLine="0"/></hh:borderFills>"#,
        r##"<hh:charProperties itemCnt="1"><hh:charPr id="0" height="1100" textColor="#000000" shadeColor="none" useFontSpace="0" useKerning="0" symMark="NONE" borderFillIDRef="1"><hh:fontRef hangul="0" latin="0" hanja="0" japanese="0" other="0" symbol="0" user="0"/></hh:charPr></hh:charProperties>"##,
        r#"<hh:paraProperties itemCnt="1"><hh:paraPr id="0" tabPrIDRef="0" condense="0"><hh:align horizontal="LEFT" vertical="BASELINE"/><hh:heading type="NONE" idRef="0" level="0"/><hh:lineSpacing type="PERCENT" value="160" unit="HWPUNIT"/></hh:paraPr></hh:paraProperties>"#,
        r#"<hh:styles itemCnt="1"><hh:style id="0" type="PARA" name="Normal" engName="Normal" paraPrIDRef="0" charPrIDRef="0" nextStyleIDRef="0" langID="1042" lockForm="0"/></hh:styles>"#,
        r#"</hh:refList></hh:head>"#
    )
    .to_string()
}

fn plain_section() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?>"#,
        r#"<hs:sec xmlns:hs="http://www.hancom.co.kr/hwpml/2011/section" xmlns:hp="http://www.hancom.co.kr/hwpml/2011/paragraph">"#,
        r#"<hp:p id="0" paraPrIDRef="0" styleIDRef="0" pageBreak="0" columnBreak="0" merged="0"><hp:run charPrIDRef="0"><hp:secPr id="" textDirection="HORIZONTAL"/></hp:run></hp:p>"#,
        r#"<hp:p id="1" paraPrIDRef="0" styleIDRef="0" pageBreak="0" columnBreak="0" merged="0"><hp:run charPrIDRef="0"><hp:t>stale</hp:t></hp:run></hp:p>"#,
        r#"</hs:sec>"#
    )
    .to_string()
}

fn plain_hpf() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?>"#,
        r#"<opf:package xmlns:opf="http://www.idpf.org/2007/opf/"><opf:metadata><opf:title/>"#,
        r#"<opf:meta name="creator" content="text"/><opf:meta name="ModifiedDate" content="text"/></opf:metadata>"#,
        r#"<opf:manifest><opf:item id="header" href="Contents/header.xml" media-type="application/xml"/></opf:manifest></opf:package>"#
    )
    .to_string()
}

/// A reference package with a plain header and an extra settings entry
fn create_plain_reference() -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    let mut zip = ZipWriter::new(&mut buffer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    zip.start_file("mimetype", options).unwrap();
    zip.write_all(b"application/hwp+zip").unwrap();
    zip.start_file(HEADER, options).unwrap();
    zip.write_all(plain_header().as_bytes()).unwrap();
    zip.start_file(SECTION, options).unwrap();
    zip.write_all(plain_section().as_bytes()).unwrap();
    zip.start_file(HPF, options).unwrap();
    zip.write_all(plain_hpf().as_bytes()).unwrap();
    zip.start_file("settings.xml", options).unwrap();
    zip.write_all(b"<settings keep=\"yes\"/>").unwrap();

    zip.finish().unwrap();
    buffer.into_inner()
}

// =============================================================================
// Package structure
// =============================================================================

#[test]
fn test_mimetype_first_and_stored() {
    let bytes = HwpxWriter::new()
        .generate(&Document::with_blocks(vec![para("x")]))
        .unwrap();
    let mut zip = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let first = zip.by_index(0).unwrap();
    assert_eq!(first.name(), "mimetype");
    assert_eq!(first.compression(), CompressionMethod::Stored);
}

#[test]
fn test_empty_document_has_one_body_paragraph() {
    let archive = convert(&Document::new());
    let section = section_of(&archive);
    // Page setup paragraph plus one empty body paragraph
    assert_eq!(section.matches("<hp:p ").count(), 2);
    assert!(section.ends_with("</hs:sec>"));
}

#[test]
fn test_write_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.hwpx");
    let template = Template::builtin(&LayoutConfig::default()).unwrap();
    HwpxWriter::new()
        .write_to_file(&Document::with_blocks(vec![para("saved")]), template, &path)
        .unwrap();

    let archive = HwpxArchive::open(&path).unwrap();
    assert!(section_of(&archive).contains("<hp:t>saved</hp:t>"));
}

// =============================================================================
// Styles
// =============================================================================

#[test]
fn test_bold_and_bold_italic_are_distinct_shapes() {
    let doc = Document::with_blocks(vec![Block::Para(vec![
        Inline::Strong(vec![str_("b")]),
        Inline::Space,
        Inline::Strong(vec![Inline::Emph(vec![str_("bi")])]),
    ])]);
    let archive = convert(&doc);
    let section = section_of(&archive);
    let header = archive.get_string(HEADER).unwrap();

    let bold_id = char_ref_of(&section, "b");
    let bold_italic_id = char_ref_of(&section, "bi");
    assert_ne!(bold_id, bold_italic_id);
    assert!(header.contains(&format!("<hh:charPr id=\"{}\"", bold_id)));
    assert!(header.contains(&format!("<hh:charPr id=\"{}\"", bold_italic_id)));
}

/// charPrIDRef of the run holding exactly `text`
fn char_ref_of(section: &str, text: &str) -> String {
    let needle = format!("\"><hp:t>{}</hp:t>", text);
    let end = section.find(&needle).unwrap();
    let start = section[..end].rfind("charPrIDRef=\"").unwrap() + "charPrIDRef=\"".len();
    section[start..end].to_string()
}

#[test]
fn test_template_without_outline_levels() {
    let template = Template::from_bytes(&create_plain_reference()).unwrap();
    let doc = Document::with_blocks(vec![
        Block::Header(1, Attr::default(), vec![str_("Title")]),
        Block::CodeBlock(Attr::default(), "let x = 1;".to_string()),
    ]);
    let archive = HwpxWriter::new().build_archive(&doc, template).unwrap();
    let section = section_of(&archive);

    // Heading and code fall back to the normal style of the template
    assert!(section.contains("<hp:run charPrIDRef=\"0\"><hp:t>Title</hp:t></hp:run>"));
    assert!(section.contains("<hp:run charPrIDRef=\"0\"><hp:t>let x = 1;</hp:t></hp:run>"));
    assert!(!section.contains("paraPrIDRef=\"2\""));
    assert!(!section.contains("stale"));
    // 11pt template text
    assert!(section.contains("vertsize=\"1100\""));

    assert_eq!(
        archive.get_string("settings.xml").unwrap(),
        "<settings keep=\"yes\"/>"
    );
    let names: Vec<&str> = archive.file_list().collect();
    assert_eq!(names, vec!["mimetype", HEADER, SECTION, HPF, "settings.xml"]);
}

// =============================================================================
// Layout
// =============================================================================

#[test]
fn test_line_segments_cover_long_paragraph() {
    let text = "가".repeat(200);
    let archive = convert(&Document::with_blocks(vec![para(&text)]));
    let section = section_of(&archive);

    let body = &section[section.find(&text).unwrap()..];
    let array = &body[..body.find("</hp:linesegarray>").unwrap()];
    let positions: Vec<usize> = array
        .split("textpos=\"")
        .skip(1)
        .map(|s| s[..s.find('"').unwrap()].parse().unwrap())
        .collect();

    assert!(positions.len() > 1);
    assert_eq!(positions[0], 0);
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(positions.iter().all(|p| *p < 200));
    // Only the first line is flagged first, only the last is flagged last
    assert_eq!(array.matches("flags=\"393216\"").count(), 0);
    assert!(array.contains("flags=\"131072\""));
    assert!(array.ends_with("flags=\"262144\"/>"));
}

#[test]
fn test_table_column_span_layout() {
    let table = hwpx_ast::Table(
        Attr::default(),
        Default::default(),
        vec![],
        Default::default(),
        vec![hwpx_ast::TableBody(
            Attr::default(),
            0,
            vec![],
            vec![
                Row(
                    Attr::default(),
                    vec![
                        Cell::spanning(1, 2, vec![para("wide")]),
                        Cell::new(vec![para("c")]),
                    ],
                ),
                Row(
                    Attr::default(),
                    vec![
                        Cell::new(vec![para("x")]),
                        Cell::new(vec![para("y")]),
                        Cell::new(vec![para("z")]),
                    ],
                ),
            ],
        )],
        Default::default(),
    );
    let archive = convert(&Document::with_blocks(vec![Block::Table(table)]));
    let section = section_of(&archive);

    // Column count comes from the first row; the overflow cell still gets a slot
    assert!(section.contains("rowCnt=\"2\" colCnt=\"2\""));
    assert!(section.contains("<hp:cellAddr colAddr=\"2\" rowAddr=\"0\"/>"));
    assert!(section.contains("<hp:cellAddr colAddr=\"0\" rowAddr=\"1\"/>"));
    assert!(section.contains("<hp:cellAddr colAddr=\"2\" rowAddr=\"1\"/>"));
    assert!(section.contains("<hp:cellSpan colSpan=\"2\" rowSpan=\"1\"/><hp:cellSz width=\"42520\""));
}

#[test]
fn test_row_span_shifts_next_row() {
    let table = hwpx_ast::Table(
        Attr::default(),
        Default::default(),
        vec![
            hwpx_ast::ColSpec(hwpx_ast::Alignment::AlignDefault, hwpx_ast::ColWidth::ColWidthDefault),
            hwpx_ast::ColSpec(hwpx_ast::Alignment::AlignDefault, hwpx_ast::ColWidth::ColWidthDefault),
        ],
        Default::default(),
        vec![hwpx_ast::TableBody(
            Attr::default(),
            0,
            vec![],
            vec![
                Row(
                    Attr::default(),
                    vec![
                        Cell::spanning(2, 1, vec![para("tall")]),
                        Cell::new(vec![para("a")]),
                    ],
                ),
                Row(Attr::default(), vec![Cell::new(vec![para("b")])]),
            ],
        )],
        Default::default(),
    );
    let section = section_of(&convert(&Document::with_blocks(vec![Block::Table(table)])));
    assert!(section.contains("<hp:cellAddr colAddr=\"0\" rowAddr=\"0\"/><hp:cellSpan colSpan=\"1\" rowSpan=\"2\"/>"));
    // "b" sits beside the spanning cell
    let b = section.find("<hp:t>b</hp:t>").unwrap();
    let addr = &section[b..];
    assert!(addr.contains("<hp:cellAddr colAddr=\"1\" rowAddr=\"1\"/>"));
    assert!(!section.contains("<hp:cellAddr colAddr=\"0\" rowAddr=\"1\"/>"));
}

// =============================================================================
// Images
// =============================================================================

fn image_para(source: &str, width: Option<&str>) -> Block {
    let attrs = width
        .map(|w| vec![("width".to_string(), w.to_string())])
        .unwrap_or_default();
    Block::Para(vec![Inline::Image(
        Attr(String::new(), vec![], attrs),
        vec![],
        Target(source.to_string(), String::new()),
    )])
}

#[test]
fn test_missing_image_has_object_but_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = HwpxWriter::new();
    writer.set_input_dir(dir.path());
    let archive = writer
        .build_archive(
            &Document::with_blocks(vec![image_para("nowhere.png", None)]),
            Template::builtin(&LayoutConfig::default()).unwrap(),
        )
        .unwrap();

    assert!(section_of(&archive).contains("binaryItemIDRef=\"image1\""));
    assert!(archive.file_list().all(|name| !name.starts_with("BinData/")));
    assert!(!archive.get_string(HPF).unwrap().contains("isEmbeded"));
}

#[test]
fn test_image_embedded_with_aspect_ratio() {
    let dir = tempfile::tempdir().unwrap();
    image::RgbImage::new(40, 20)
        .save(dir.path().join("chart.png"))
        .unwrap();

    let mut writer = HwpxWriter::new();
    writer.set_input_dir(dir.path());
    let archive = writer
        .build_archive(
            &Document::with_blocks(vec![image_para("chart.png", Some("50%"))]),
            Template::builtin(&LayoutConfig::default()).unwrap(),
        )
        .unwrap();

    // 50% of 150 mm
    let width = (75.0 * 283.465) as u32;
    let height = width / 2;
    let section = section_of(&archive);
    assert!(section.contains(&format!(
        "<hp:sz width=\"{}\" widthRelTo=\"ABSOLUTE\" height=\"{}\"",
        width, height
    )));
    assert!(archive.contains("BinData/image1.png"));
    assert!(archive
        .get_string(HPF)
        .unwrap()
        .contains("<opf:item id=\"image1\" href=\"BinData/image1.png\" media-type=\"image/png\" isEmbeded=\"1\"/>"));
}

#[test]
fn test_image_width_clamped_to_page() {
    let config = LayoutConfig {
        percent_basis_mm: 400.0,
        ..LayoutConfig::default()
    };
    let archive = HwpxWriter::with_config(config)
        .build_archive(
            &Document::with_blocks(vec![image_para("missing.png", Some("100%"))]),
            Template::builtin(&LayoutConfig::default()).unwrap(),
        )
        .unwrap();
    assert!(section_of(&archive).contains("<hp:sz width=\"42520\" widthRelTo=\"ABSOLUTE\""));
}

// =============================================================================
// Layout configuration
// =============================================================================

fn single_cell_table(text: &str) -> Block {
    Block::Table(hwpx_ast::Table(
        Attr::default(),
        Default::default(),
        vec![hwpx_ast::ColSpec(
            hwpx_ast::Alignment::AlignDefault,
            hwpx_ast::ColWidth::ColWidthDefault,
        )],
        Default::default(),
        vec![hwpx_ast::TableBody(
            Attr::default(),
            0,
            vec![],
            vec![Row(Attr::default(), vec![Cell::new(vec![para(text)])])],
        )],
        Default::default(),
    ))
}

#[test]
fn test_char_height_scales_header_and_line_segments() {
    let config = LayoutConfig {
        char_height: 2000,
        ..LayoutConfig::default()
    };
    let doc = Document::with_blocks(vec![
        Block::Header(1, Attr::default(), vec![str_("Title")]),
        para("hello"),
    ]);
    let archive = convert_with(config, &doc);

    let header = archive.get_string(HEADER).unwrap();
    assert!(header.contains(r#"<hh:charPr id="0" height="2000""#));
    assert!(header.contains(r#"<hh:charPr id="7" height="4400""#));
    assert!(header.contains(r#"<hh:charPr id="10" height="2000""#));

    let section = section_of(&archive);
    let body = &section[section.find("<hp:t>hello</hp:t>").unwrap()..];
    assert!(body.contains(
        r#"vertsize="2000" textheight="2000" baseline="1700" spacing="1200""#
    ));
    let heading = &section[section.find("<hp:t>Title</hp:t>").unwrap()..];
    assert!(heading.contains(r#"vertsize="4400" textheight="4400""#));
}

#[test]
fn test_page_text_width_moves_breaks_and_table_width() {
    let config = LayoutConfig {
        page_text_width: 10_000,
        ..LayoutConfig::default()
    };
    let text = "a".repeat(45);
    let doc = Document::with_blocks(vec![para(&text), single_cell_table("cell")]);
    let section = section_of(&convert_with(config, &doc));

    // 500 per ASCII char: the 21st overflows 10 000
    let body = &section[section.find(&text).unwrap()..];
    let array = &body[..body.find("</hp:linesegarray>").unwrap()];
    assert_eq!(array.matches("<hp:lineseg ").count(), 3);
    assert!(array.contains(r#"textpos="21""#));
    assert!(array.contains(r#"horzsize="10000""#));
    assert!(section.contains(r#"<hp:cellSz width="10000" height="1800"/>"#));
}

#[test]
fn test_table_row_height_sets_cell_size() {
    let config = LayoutConfig {
        table_row_height: 3000,
        ..LayoutConfig::default()
    };
    let doc = Document::with_blocks(vec![single_cell_table("cell")]);
    let section = section_of(&convert_with(config, &doc));
    assert!(section.contains(r#"<hp:cellSz width="42520" height="3000"/>"#));
}

#[test]
fn test_default_image_size_for_unknown_image() {
    let config = LayoutConfig {
        default_image_size: 5000,
        ..LayoutConfig::default()
    };
    let dir = tempfile::tempdir().unwrap();
    let template = Template::builtin(&config).unwrap();
    let mut writer = HwpxWriter::with_config(config);
    writer.set_input_dir(dir.path());
    let archive = writer
        .build_archive(
            &Document::with_blocks(vec![image_para("absent.png", None)]),
            template,
        )
        .unwrap();

    assert!(section_of(&archive)
        .contains(r#"<hp:sz width="5000" widthRelTo="ABSOLUTE" height="5000""#));
}

#[test]
fn test_line_spacing_percent_in_header_and_segments() {
    let config = LayoutConfig {
        line_spacing_percent: 200,
        page_text_width: 10_000,
        ..LayoutConfig::default()
    };
    let text = "a".repeat(30);
    let archive = convert_with(config, &Document::with_blocks(vec![para(&text)]));

    let header = archive.get_string(HEADER).unwrap();
    assert!(header.contains(r#"<hh:lineSpacing type="PERCENT" value="200" unit="HWPUNIT"/>"#));

    let section = section_of(&archive);
    let body = &section[section.find(&text).unwrap()..];
    assert!(body.contains(r#"spacing="1000""#));
    // Second line starts one character height plus spacing down
    assert!(body.contains(r#"textpos="21" vertpos="2000""#));
}
