//! HWPX writer
//!
//! Walks a document tree and emits the paragraphs of `Contents/section0.xml`,
//! registering derived styles, numberings and pictures on the way. The
//! finished section, header and manifest are then packaged over a
//! [`Template`].
//!
//! # Example
//!
//! ```ignore
//! use hwpx_writer::{HwpxWriter, Template};
//!
//! let doc = hwpx_ast::Document::from_json(&json)?;
//! let template = Template::load_or_builtin(None, &LayoutConfig::default())?;
//!
//! let mut writer = HwpxWriter::new();
//! writer.set_input_dir("docs");
//! writer.set_toc(true);
//! writer.write_to_file(&doc, template, "out.hwpx")?;
//! ```

use std::path::{Path, PathBuf};

use chrono::Utc;
use hwpx_ast::{
    collect_headings, stringify, Attr, Block, Document, Figure, Inline, MathType, Table,
};
use log::{debug, info, warn};

use crate::archive::HwpxArchive;
use crate::config::LayoutConfig;
use crate::equation::equation_xml;
use crate::error::Result;
use crate::header::{CHAR_SUBTITLE, CHAR_TITLE};
use crate::ids::IdGenerator;
use crate::image::{
    compute_image_size, image_extension, parse_dimension, resolve_image_path, DecoderMetrics,
    ImageMetrics, ImageRef,
};
use crate::lineseg::{compute_line_breaks, lineseg_xml, LineSegment};
use crate::manifest::{update_content_hpf, DocumentInfo};
use crate::package::{assemble, load_images, PackageParts};
use crate::registry::{StyleMode, StyleRegistry};
use crate::section::build_section_xml;
use crate::skeleton::builtin_section_xml;
use crate::styles::{FormatSet, ListKind};
use crate::table::TableLayout;
use crate::template::Template;
use crate::xml::escape_xml;

/// Title of the generated table of contents
const TOC_TITLE: &str = "목  차";

/// Ideographic space, one per indent level
const INDENT_CHAR: char = '\u{3000}';

/// Horizontal rule: a run of heavy box-drawing lines
const RULE_CHAR: char = '\u{2501}';
const RULE_LEN: usize = 30;

/// Fixed line metrics of an equation paragraph
const EQUATION_LINE_HEIGHT: u32 = 1600;
const EQUATION_BASELINE: u32 = 1360;
const EQUATION_SPACING: u32 = 400;

/// Margin around table cells and above/below the table
const TABLE_MARGIN: u32 = 141;

/// Runs of one paragraph together with their plain text
#[derive(Debug, Default)]
struct Runs {
    xml: String,
    /// Text as measured for line segments
    text: String,
}

impl Runs {
    fn push_text(&mut self, char_pr: u32, text: &str) {
        self.xml.push_str(&text_run(char_pr, text));
        self.text.push_str(text);
    }
}

fn text_run(char_pr: u32, text: &str) -> String {
    format!(
        "<hp:run charPrIDRef=\"{}\"><hp:t>{}</hp:t></hp:run>",
        char_pr,
        escape_xml(text)
    )
}

fn indent_prefix(level: usize) -> String {
    std::iter::repeat(INDENT_CHAR).take(level).collect()
}

fn rule_text() -> String {
    std::iter::repeat(RULE_CHAR).take(RULE_LEN).collect()
}

/// HWPX document writer
///
/// A writer holds the state of exactly one conversion (ID counters, style
/// cache, pictures) and is consumed by generation.
pub struct HwpxWriter {
    /// Page geometry and sizing constants
    config: LayoutConfig,
    /// Directory relative image paths are resolved against
    input_dir: PathBuf,
    /// Emit a table of contents before the body
    toc: bool,
    /// Source of image pixel dimensions
    metrics: Box<dyn ImageMetrics>,
    /// Style tables, selected when the template is known
    registry: StyleRegistry,
    ids: IdGenerator,
    /// Pictures referenced so far, in document order
    images: Vec<ImageRef>,
}

impl Default for HwpxWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl HwpxWriter {
    /// Create a writer with the default layout
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default())
    }

    /// Create a writer with a specific layout
    pub fn with_config(config: LayoutConfig) -> Self {
        let registry = StyleRegistry::builtin(&config);
        Self {
            config,
            input_dir: PathBuf::from("."),
            toc: false,
            metrics: Box::new(DecoderMetrics),
            registry,
            ids: IdGenerator::new(),
            images: Vec::new(),
        }
    }

    /// Set the directory relative image paths are resolved against
    pub fn set_input_dir(&mut self, dir: impl Into<PathBuf>) {
        self.input_dir = dir.into();
    }

    /// Enable or disable the table of contents
    pub fn set_toc(&mut self, toc: bool) {
        self.toc = toc;
    }

    /// Replace the image dimension reader
    pub fn set_metrics(&mut self, metrics: Box<dyn ImageMetrics>) {
        self.metrics = metrics;
    }

    /// Generate an HWPX file over the built-in template
    pub fn generate(self, doc: &Document) -> Result<Vec<u8>> {
        let template = Template::builtin(&self.config)?;
        self.generate_with_template(doc, template)
    }

    /// Generate an HWPX file over a template
    pub fn generate_with_template(self, doc: &Document, template: Template) -> Result<Vec<u8>> {
        self.build_archive(doc, template)?.to_bytes()
    }

    /// Generate and write an HWPX file
    ///
    /// The destination is replaced only once the whole archive is written.
    pub fn write_to_file<P: AsRef<Path>>(
        self,
        doc: &Document,
        template: Template,
        path: P,
    ) -> Result<()> {
        let path = path.as_ref();
        let archive = self.build_archive(doc, template)?;
        archive.write_to_file(path)?;
        info!("HWPX written to {}", path.display());
        Ok(())
    }

    /// Build the output package
    pub fn build_archive(mut self, doc: &Document, template: Template) -> Result<HwpxArchive> {
        self.registry = if template.is_reference() {
            StyleRegistry::for_template(&template.header_xml()?, &self.config)
        } else {
            StyleRegistry::builtin(&self.config)
        };

        let body = self.generate_body(doc);
        let section = match build_section_xml(&template.section_xml()?, &body) {
            Ok(xml) => xml,
            Err(e) => {
                warn!("Reference section unusable ({}), using built-in page setup", e);
                build_section_xml(&builtin_section_xml(), &body)?
            }
        };
        let header = self.registry.finalize()?;

        let embedded = load_images(&self.images);
        let loaded: Vec<ImageRef> = embedded.iter().map(|e| e.image.clone()).collect();
        let content_hpf = update_content_hpf(
            &template.content_hpf()?,
            &DocumentInfo::from_document(doc),
            &loaded,
            Utc::now(),
        );
        debug!(
            "Assembling package: {} bytes of section, {} of {} images embedded",
            section.len(),
            loaded.len(),
            self.images.len()
        );

        Ok(assemble(
            template.into_archive(),
            PackageParts {
                header,
                section,
                content_hpf,
            },
            embedded,
        ))
    }

    /// Generate the body paragraphs of the section
    fn generate_body(&mut self, doc: &Document) -> String {
        let mut parts = self.title_block(&DocumentInfo::from_document(doc));
        if self.toc {
            let toc = self.toc_block(&doc.blocks);
            parts.extend(toc);
        }
        self.process_blocks(&doc.blocks, 0, &mut parts);

        if parts.is_empty() {
            let normal = self.registry.normal().char_pr_id;
            parts.push(self.text_paragraph("", normal));
        }
        parts.join("\n")
    }

    // ── Paragraph builders ─────────────────────────────────────────────

    fn paragraph(&mut self, para_pr: u32, style: u32, runs: &str, lineseg: &str) -> String {
        format!(
            "<hp:p id=\"{}\" paraPrIDRef=\"{}\" styleIDRef=\"{}\" pageBreak=\"0\" \
             columnBreak=\"0\" merged=\"0\">{}{}</hp:p>",
            self.ids.next_para_id(),
            para_pr,
            style,
            runs,
            lineseg
        )
    }

    /// A normal-style paragraph holding one run of plain text
    fn text_paragraph(&mut self, text: &str, char_pr: u32) -> String {
        let normal = self.registry.normal();
        let lineseg = self.lineseg(text, self.char_height(char_pr), self.config.page_text_width);
        self.paragraph(
            normal.para_pr_id,
            normal.style_id,
            &text_run(char_pr, text),
            &lineseg,
        )
    }

    fn lineseg(&self, text: &str, char_height: u32, width: u32) -> String {
        lineseg_xml(&compute_line_breaks(
            text,
            char_height,
            self.config.line_spacing_percent,
            width,
        ))
    }

    fn char_height(&self, char_pr: u32) -> u32 {
        self.registry
            .char_height(char_pr)
            .unwrap_or(self.config.char_height)
    }

    // ── Front matter ───────────────────────────────────────────────────

    fn title_char(&mut self, builtin: u32) -> u32 {
        match self.registry.mode() {
            StyleMode::BuiltIn => builtin,
            StyleMode::Template => {
                let normal = self.registry.normal().char_pr_id;
                self.registry.resolve_char_style(normal, FormatSet::BOLD)
            }
        }
    }

    fn title_block(&mut self, info: &DocumentInfo) -> Vec<String> {
        let normal = self.registry.normal().char_pr_id;
        let mut parts = Vec::new();
        if !info.title.is_empty() {
            let char_pr = self.title_char(CHAR_TITLE);
            parts.push(self.text_paragraph(&info.title, char_pr));
        }
        if !info.subtitle.is_empty() {
            let char_pr = self.title_char(CHAR_SUBTITLE);
            parts.push(self.text_paragraph(&info.subtitle, char_pr));
        }
        let byline: Vec<&str> = [info.author.as_str(), info.date.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        if !byline.is_empty() {
            parts.push(self.text_paragraph(&byline.join(" | "), normal));
        }
        if !parts.is_empty() {
            parts.push(self.text_paragraph("", normal));
        }
        parts
    }

    fn toc_block(&mut self, blocks: &[Block]) -> Vec<String> {
        let headings = collect_headings(blocks);
        let Some(min_level) = headings.iter().map(|h| h.level).min() else {
            return Vec::new();
        };

        let normal = self.registry.normal().char_pr_id;
        let title_char = self.registry.heading(2).char_pr_id;
        let mut parts = vec![
            self.text_paragraph(TOC_TITLE, title_char),
            self.text_paragraph("", normal),
        ];
        for heading in &headings {
            let relative = (heading.level - min_level) as usize;
            let char_pr = if relative == 0 {
                self.registry.resolve_char_style(normal, FormatSet::BOLD)
            } else {
                normal
            };
            let text = format!("{}{}", indent_prefix(relative), heading.text);
            parts.push(self.text_paragraph(&text, char_pr));
        }
        parts.push(self.text_paragraph("", normal));
        parts.push(self.text_paragraph(&rule_text(), normal));
        parts.push(self.text_paragraph("", normal));
        parts
    }

    // ── Blocks ─────────────────────────────────────────────────────────

    fn process_blocks(&mut self, blocks: &[Block], level: usize, out: &mut Vec<String>) {
        let prefix = indent_prefix(level);
        let normal = self.registry.normal().char_pr_id;

        for block in blocks {
            match block {
                Block::Para(inlines) | Block::Plain(inlines) => {
                    let para = self.paragraph_block(inlines, &prefix);
                    out.push(para);
                }
                Block::Header(heading_level, _, inlines) => {
                    let para = self.heading(*heading_level, inlines);
                    out.push(para);
                }
                Block::CodeBlock(_, code) => {
                    let code_char = self.registry.code_char_style();
                    for line in code.split('\n') {
                        let para = self.text_paragraph(&format!("{}{}", prefix, line), code_char);
                        out.push(para);
                    }
                }
                Block::BulletList(items) => self.list(ListKind::Bullet, 1, items, level, out),
                Block::OrderedList(attrs, items) => {
                    self.list(ListKind::Ordered, attrs.start(), items, level, out)
                }
                Block::BlockQuote(children) => self.process_blocks(children, level + 1, out),
                Block::Table(table) => self.table(table, out),
                Block::HorizontalRule => {
                    let para = self.text_paragraph(&rule_text(), normal);
                    out.push(para);
                }
                Block::Div(_, children) => self.process_blocks(children, level, out),
                Block::DefinitionList(items) => {
                    for (term, definitions) in items {
                        let text = format!("{}{}", prefix, stringify(term));
                        let para = self.text_paragraph(&text, normal);
                        out.push(para);
                        for definition in definitions {
                            self.process_blocks(definition, level + 1, out);
                        }
                    }
                }
                Block::LineBlock(lines) => {
                    for line in lines {
                        let text = format!("{}{}", prefix, stringify(line));
                        let para = self.text_paragraph(&text, normal);
                        out.push(para);
                    }
                }
                Block::Figure(Figure(_, caption, children)) => {
                    let caption = caption.plain_text();
                    if !caption.is_empty() {
                        let para = self.text_paragraph(&caption, normal);
                        out.push(para);
                    }
                    self.process_blocks(children, level, out);
                }
                Block::RawBlock(..) => {}
            }
        }
    }

    /// A `Para` or `Plain` block
    ///
    /// Display math or a picture as the only content gets a paragraph of
    /// its own shape; anything else is a normal paragraph.
    fn paragraph_block(&mut self, inlines: &[Inline], prefix: &str) -> String {
        let normal = self.registry.normal();
        match inlines {
            [Inline::Math(MathType::DisplayMath, latex)] => return self.equation_paragraph(latex),
            [Inline::Image(attr, _, target)] => {
                let pic = self.image_object(attr, target.url());
                let runs = format!(
                    "<hp:run charPrIDRef=\"{}\">{}</hp:run>",
                    normal.char_pr_id, pic
                );
                let lineseg = self.lineseg(
                    "",
                    self.char_height(normal.char_pr_id),
                    self.config.page_text_width,
                );
                return self.paragraph(normal.para_pr_id, normal.style_id, &runs, &lineseg);
            }
            _ => {}
        }

        let mut runs = Runs::default();
        if !prefix.is_empty() {
            runs.push_text(normal.char_pr_id, prefix);
        }
        self.process_inlines(inlines, normal.char_pr_id, FormatSet::empty(), &mut runs);
        let lineseg = self.lineseg(
            &runs.text,
            self.char_height(normal.char_pr_id),
            self.config.page_text_width,
        );
        self.paragraph(normal.para_pr_id, normal.style_id, &runs.xml, &lineseg)
    }

    fn equation_paragraph(&mut self, latex: &str) -> String {
        let normal = self.registry.normal();
        let runs = format!(
            "<hp:run charPrIDRef=\"{}\">{}</hp:run>",
            normal.char_pr_id,
            equation_xml(latex)
        );
        let lineseg = lineseg_xml(&[LineSegment::single(
            EQUATION_LINE_HEIGHT,
            EQUATION_BASELINE,
            EQUATION_SPACING,
            self.config.page_text_width,
        )]);
        self.paragraph(normal.para_pr_id, normal.style_id, &runs, &lineseg)
    }

    fn heading(&mut self, level: i32, inlines: &[Inline]) -> String {
        let triple = self.registry.heading(u32::try_from(level).unwrap_or(0));
        let mut runs = Runs::default();
        self.process_inlines(inlines, triple.char_pr_id, FormatSet::empty(), &mut runs);
        let lineseg = self.lineseg(
            &runs.text,
            self.char_height(triple.char_pr_id),
            self.config.page_text_width,
        );
        self.paragraph(triple.para_pr_id, triple.style_id, &runs.xml, &lineseg)
    }

    /// A list with one numbering definition for all of its items
    fn list(
        &mut self,
        kind: ListKind,
        start: i32,
        items: &[Vec<Block>],
        level: usize,
        out: &mut Vec<String>,
    ) {
        let numbering = self.registry.create_numbering(kind, start);
        let normal = self.registry.normal();

        for item in items {
            for block in item {
                match block {
                    Block::Para(inlines) | Block::Plain(inlines) => {
                        let para_pr = self.registry.list_para_style(numbering, level);
                        let mut runs = Runs::default();
                        self.process_inlines(
                            inlines,
                            normal.char_pr_id,
                            FormatSet::empty(),
                            &mut runs,
                        );
                        let lineseg = self.lineseg(
                            &runs.text,
                            self.char_height(normal.char_pr_id),
                            self.config.page_text_width,
                        );
                        let para = self.paragraph(para_pr, normal.style_id, &runs.xml, &lineseg);
                        out.push(para);
                    }
                    Block::BulletList(nested) => {
                        self.list(ListKind::Bullet, 1, nested, level + 1, out)
                    }
                    Block::OrderedList(attrs, nested) => {
                        self.list(ListKind::Ordered, attrs.start(), nested, level + 1, out)
                    }
                    other => self.process_blocks(std::slice::from_ref(other), level, out),
                }
            }
        }
    }

    /// A table: optional caption paragraph, then a paragraph holding the grid
    fn table(&mut self, table: &Table, out: &mut Vec<String>) {
        let rows = table.rows();
        let Some((first, _)) = rows.first() else {
            return;
        };
        let cols = if table.col_specs().is_empty() {
            first.cells().len()
        } else {
            table.col_specs().len()
        };
        if cols == 0 {
            return;
        }

        let normal = self.registry.normal();
        let caption = table.caption().plain_text();
        if !caption.is_empty() {
            let para = self.text_paragraph(&caption, normal.char_pr_id);
            out.push(para);
        }

        let width = self.config.page_text_width;
        let row_height = self.config.table_row_height;
        let border_fill = self.registry.table_border_fill_id();
        let para_id = self.ids.next_para_id();
        let table_id = self.ids.next_object_id();

        let mut parts = vec![format!(
            "<hp:p id=\"{}\" paraPrIDRef=\"{}\" styleIDRef=\"{}\" pageBreak=\"0\" \
             columnBreak=\"0\" merged=\"0\"><hp:run charPrIDRef=\"{}\">\
             <hp:tbl id=\"{}\" zOrder=\"0\" numberingType=\"TABLE\" textWrap=\"TOP_AND_BOTTOM\" \
             textFlow=\"BOTH_SIDES\" lock=\"0\" dropcapstyle=\"None\" pageBreak=\"CELL\" \
             repeatHeader=\"1\" rowCnt=\"{}\" colCnt=\"{}\" cellSpacing=\"0\" \
             borderFillIDRef=\"{}\" noAdjust=\"0\">\
             <hp:sz width=\"{}\" widthRelTo=\"ABSOLUTE\" height=\"{}\" heightRelTo=\"ABSOLUTE\" \
             protect=\"0\"/><hp:pos treatAsChar=\"1\" affectLSpacing=\"0\" flowWithText=\"1\" \
             allowOverlap=\"0\" holdAnchorAndSO=\"0\" vertRelTo=\"PARA\" horzRelTo=\"COLUMN\" \
             vertAlign=\"TOP\" horzAlign=\"CENTER\" vertOffset=\"0\" horzOffset=\"0\"/>\
             <hp:outMargin left=\"0\" right=\"0\" top=\"{m}\" bottom=\"{m}\"/>\
             <hp:inMargin left=\"0\" right=\"0\" top=\"0\" bottom=\"0\"/>",
            para_id,
            normal.para_pr_id,
            normal.style_id,
            normal.char_pr_id,
            table_id,
            rows.len(),
            cols,
            border_fill,
            width,
            row_height * rows.len() as u32,
            m = TABLE_MARGIN
        )];

        let mut layout = TableLayout::new(width, cols);
        for (row_index, (row, head)) in rows.iter().enumerate() {
            parts.push("<hp:tr>".to_string());
            let spans: Vec<(usize, usize)> = row
                .cells()
                .iter()
                .map(|cell| (cell.row_span(), cell.col_span()))
                .collect();
            let placements = layout.place_row(row_index, &spans);

            for (cell, place) in row.cells().iter().zip(placements) {
                let content = self.cell_content(cell.blocks(), place.width);
                let sublist_id = self.ids.next_object_id();
                parts.push(format!(
                    "<hp:tc name=\"\" header=\"{}\" hasMargin=\"0\" protect=\"0\" editable=\"0\" \
                     dirty=\"0\" borderFillIDRef=\"{}\"><hp:subList id=\"{}\" \
                     textDirection=\"HORIZONTAL\" lineWrap=\"BREAK\" vertAlign=\"CENTER\" \
                     linkListIDRef=\"0\" linkListNextIDRef=\"0\" textWidth=\"0\" textHeight=\"0\" \
                     hasTextRef=\"0\" hasNumRef=\"0\">{}</hp:subList>\
                     <hp:cellAddr colAddr=\"{}\" rowAddr=\"{}\"/>\
                     <hp:cellSpan colSpan=\"{}\" rowSpan=\"{}\"/>\
                     <hp:cellSz width=\"{}\" height=\"{}\"/>\
                     <hp:cellMargin left=\"{m}\" right=\"{m}\" top=\"{m}\" bottom=\"{m}\"/></hp:tc>",
                    u8::from(*head),
                    border_fill,
                    sublist_id,
                    content,
                    place.col,
                    place.row,
                    place.col_span,
                    place.row_span,
                    place.width,
                    row_height,
                    m = TABLE_MARGIN
                ));
            }
            parts.push("</hp:tr>".to_string());
        }
        parts.push("</hp:tbl>".to_string());
        parts.push("<hp:t></hp:t></hp:run></hp:p>".to_string());
        out.push(parts.join("\n"));
    }

    /// Paragraphs of one table cell, measured against the cell width
    fn cell_content(&mut self, blocks: &[Block], width: u32) -> String {
        let normal = self.registry.normal();
        let mut parts = Vec::new();
        for block in blocks {
            match block {
                Block::Para(inlines) | Block::Plain(inlines) => {
                    let mut runs = Runs::default();
                    self.process_inlines(
                        inlines,
                        normal.char_pr_id,
                        FormatSet::empty(),
                        &mut runs,
                    );
                    let lineseg =
                        self.lineseg(&runs.text, self.char_height(normal.char_pr_id), width);
                    let para = self.paragraph(normal.para_pr_id, normal.style_id, &runs.xml, &lineseg);
                    parts.push(para);
                }
                other => self.process_blocks(std::slice::from_ref(other), 0, &mut parts),
            }
        }
        if parts.is_empty() {
            parts.push(self.text_paragraph("", normal.char_pr_id));
        }
        parts.join("\n")
    }

    // ── Inlines ────────────────────────────────────────────────────────

    /// Emit runs for `inlines` on top of `base` with `formats` active
    fn process_inlines(
        &mut self,
        inlines: &[Inline],
        base: u32,
        formats: FormatSet,
        runs: &mut Runs,
    ) {
        for inline in inlines {
            match inline {
                Inline::Str(text) => {
                    let char_pr = self.registry.resolve_char_style(base, formats);
                    runs.push_text(char_pr, text);
                }
                Inline::Space | Inline::SoftBreak => {
                    let char_pr = self.registry.resolve_char_style(base, formats);
                    runs.push_text(char_pr, " ");
                }
                Inline::LineBreak => {
                    let char_pr = self.registry.resolve_char_style(base, formats);
                    runs.xml.push_str(&format!(
                        "<hp:run charPrIDRef=\"{}\"><hp:t><hp:lineBreak/></hp:t></hp:run>",
                        char_pr
                    ));
                    runs.text.push('\n');
                }
                Inline::Strong(content) => {
                    self.process_inlines(content, base, formats | FormatSet::BOLD, runs)
                }
                Inline::Emph(content) => {
                    self.process_inlines(content, base, formats | FormatSet::ITALIC, runs)
                }
                Inline::Underline(content) => {
                    self.process_inlines(content, base, formats | FormatSet::UNDERLINE, runs)
                }
                Inline::Strikeout(content) => {
                    self.process_inlines(content, base, formats | FormatSet::STRIKEOUT, runs)
                }
                Inline::Superscript(content) => {
                    self.process_inlines(content, base, formats | FormatSet::SUPERSCRIPT, runs)
                }
                Inline::Subscript(content) => {
                    self.process_inlines(content, base, formats | FormatSet::SUBSCRIPT, runs)
                }
                Inline::SmallCaps(content)
                | Inline::Span(_, content)
                | Inline::Cite(_, content) => self.process_inlines(content, base, formats, runs),
                Inline::Code(_, code) => {
                    let code_char = self.registry.code_char_style();
                    runs.push_text(code_char, code);
                }
                Inline::Link(_, content, target) => {
                    let field_id = self.ids.next_object_id();
                    runs.xml.push_str(&self.field_begin(field_id, target.url()));
                    self.process_inlines(
                        content,
                        base,
                        formats | FormatSet::UNDERLINE | FormatSet::LINK_COLOR,
                        runs,
                    );
                    runs.xml.push_str(&self.field_end(field_id));
                }
                Inline::Image(attr, _, target) => {
                    let char_pr = self.registry.resolve_char_style(base, formats);
                    let pic = self.image_object(attr, target.url());
                    runs.xml.push_str(&format!(
                        "<hp:run charPrIDRef=\"{}\">{}</hp:run>",
                        char_pr, pic
                    ));
                    runs.text.push_str("[image]");
                }
                Inline::Note(blocks) => {
                    let note = self.footnote(blocks);
                    runs.xml.push_str(&note);
                }
                Inline::Math(_, latex) => {
                    let char_pr = self.registry.resolve_char_style(base, formats);
                    runs.xml.push_str(&format!(
                        "<hp:run charPrIDRef=\"{}\">{}</hp:run>",
                        char_pr,
                        equation_xml(latex)
                    ));
                    runs.text.push_str(latex);
                }
                Inline::Quoted(quote, content) => {
                    let char_pr = self.registry.resolve_char_style(base, formats);
                    let (open, close) = quote.glyphs();
                    runs.push_text(char_pr, &open.to_string());
                    self.process_inlines(content, base, formats, runs);
                    runs.push_text(char_pr, &close.to_string());
                }
                Inline::RawInline(..) => {}
            }
        }
    }

    /// Hyperlink field start; `field_id` pairs it with [`Self::field_end`]
    fn field_begin(&self, field_id: u64, url: &str) -> String {
        let command = url.replace(':', r"\:").replace('?', r"\?");
        format!(
            "<hp:run charPrIDRef=\"{}\"><hp:ctrl><hp:fieldBegin id=\"{id}\" type=\"HYPERLINK\" \
             name=\"\" editable=\"0\" dirty=\"1\" zorder=\"-1\" fieldid=\"{id}\" metaTag=\"\">\
             <hp:parameters cnt=\"6\" name=\"\">\
             <hp:integerParam name=\"Prop\">0</hp:integerParam>\
             <hp:stringParam name=\"Command\">{};1;5;-1;</hp:stringParam>\
             <hp:stringParam name=\"Path\">{}</hp:stringParam>\
             <hp:stringParam name=\"Category\">HWPHYPERLINK_TYPE_URL</hp:stringParam>\
             <hp:stringParam name=\"TargetType\">HWPHYPERLINK_TARGET_HYPERLINK</hp:stringParam>\
             <hp:stringParam name=\"DocOpenType\">HWPHYPERLINK_JUMP_DONTCARE</hp:stringParam>\
             </hp:parameters></hp:fieldBegin></hp:ctrl></hp:run>",
            self.registry.normal().char_pr_id,
            escape_xml(&command),
            escape_xml(url),
            id = field_id
        )
    }

    fn field_end(&self, field_id: u64) -> String {
        format!(
            "<hp:run charPrIDRef=\"{}\"><hp:ctrl><hp:fieldEnd beginIDRef=\"{id}\" \
             fieldid=\"{id}\"/></hp:ctrl></hp:run>",
            self.registry.normal().char_pr_id,
            id = field_id
        )
    }

    /// A footnote whose body is rendered by the block walker
    fn footnote(&mut self, blocks: &[Block]) -> String {
        let normal = self.registry.normal().char_pr_id;
        let mut parts = Vec::new();
        self.process_blocks(blocks, 0, &mut parts);
        if parts.is_empty() {
            parts.push(self.text_paragraph("", normal));
        }
        let inst_id = self.ids.next_object_id();
        format!(
            "<hp:run charPrIDRef=\"{}\"><hp:ctrl><hp:footNote number=\"0\" instId=\"{id}\">\
             <hp:autoNum num=\"0\" numType=\"FOOTNOTE\"/><hp:subList id=\"{id}\" \
             textDirection=\"HORIZONTAL\" lineWrap=\"BREAK\" vertAlign=\"TOP\" \
             linkListIDRef=\"0\" linkListNextIDRef=\"0\" textWidth=\"0\" textHeight=\"0\" \
             hasTextRef=\"0\" hasNumRef=\"0\">{}</hp:subList></hp:footNote></hp:ctrl></hp:run>",
            normal,
            parts.join("\n"),
            id = inst_id
        )
    }

    /// Register a picture and build its `hp:pic` object
    ///
    /// A source that cannot be found or measured still yields a picture
    /// with the requested or default size; its bytes are simply not
    /// embedded later.
    fn image_object(&mut self, attr: &Attr, source: &str) -> String {
        let basis = self.config.percent_basis_mm;
        let requested_width = attr.get("width").and_then(|v| parse_dimension(v, basis));
        let requested_height = attr.get("height").and_then(|v| parse_dimension(v, basis));

        let resolved = resolve_image_path(source, &self.input_dir);
        let pixels = match &resolved {
            Some(path) => match self.metrics.dimensions(path) {
                Ok(dimensions) => Some(dimensions),
                Err(e) => {
                    warn!("Cannot read image size of {}: {}", path.display(), e);
                    None
                }
            },
            None => {
                warn!("Image not found: {}", source);
                None
            }
        };
        let (width, height) =
            compute_image_size(requested_width, requested_height, pixels, &self.config);

        let image = ImageRef {
            id: self.ids.next_image_id(),
            source: source.to_string(),
            resolved,
            width,
            height,
            extension: image_extension(source),
        };
        let pic_id = self.ids.next_object_id();
        let inst_id = self.ids.next_object_id();
        let xml = pic_xml(pic_id, inst_id, &image.id, width, height);
        self.images.push(image);
        xml
    }
}

fn pic_xml(pic_id: u64, inst_id: u64, binary_id: &str, w: u32, h: u32) -> String {
    let identity = "e1=\"1\" e2=\"0\" e3=\"0\" e4=\"0\" e5=\"1\" e6=\"0\"";
    format!(
        "<hp:pic id=\"{pic_id}\" zOrder=\"0\" numberingType=\"NONE\" textWrap=\"TOP_AND_BOTTOM\" \
         textFlow=\"BOTH_SIDES\" lock=\"0\" dropcapstyle=\"None\" href=\"\" groupLevel=\"0\" \
         instid=\"{inst_id}\" reverse=\"0\"><hp:offset x=\"0\" y=\"0\"/>\
         <hp:orgSz width=\"{w}\" height=\"{h}\"/><hp:curSz width=\"{w}\" height=\"{h}\"/>\
         <hp:flip horizontal=\"0\" vertical=\"0\"/>\
         <hp:rotationInfo angle=\"0\" centerX=\"0\" centerY=\"0\" rotateimage=\"1\"/>\
         <hp:renderingInfo><hc:transMatrix {m}/><hc:scaMatrix {m}/><hc:rotMatrix {m}/>\
         </hp:renderingInfo><hc:img binaryItemIDRef=\"{binary_id}\" bright=\"0\" contrast=\"0\" \
         effect=\"REAL_PIC\" alpha=\"0\"/><hp:imgRect><hc:pt0 x=\"0\" y=\"0\"/>\
         <hc:pt1 x=\"{w}\" y=\"0\"/><hc:pt2 x=\"{w}\" y=\"{h}\"/><hc:pt3 x=\"0\" y=\"{h}\"/>\
         </hp:imgRect><hp:imgClip left=\"0\" right=\"0\" top=\"0\" bottom=\"0\"/>\
         <hp:inMargin left=\"0\" right=\"0\" top=\"0\" bottom=\"0\"/>\
         <hp:imgDim dimwidth=\"0\" dimheight=\"0\"/><hp:effects/>\
         <hp:sz width=\"{w}\" widthRelTo=\"ABSOLUTE\" height=\"{h}\" heightRelTo=\"ABSOLUTE\" \
         protect=\"0\"/><hp:pos treatAsChar=\"1\" affectLSpacing=\"0\" flowWithText=\"1\" \
         allowOverlap=\"1\" holdAnchorAndSO=\"0\" vertRelTo=\"PARA\" horzRelTo=\"COLUMN\" \
         vertAlign=\"TOP\" horzAlign=\"LEFT\" vertOffset=\"0\" horzOffset=\"0\"/>\
         <hp:outMargin left=\"0\" right=\"0\" top=\"0\" bottom=\"0\"/><hp:shapeComment/></hp:pic>",
        m = identity
    )
}
