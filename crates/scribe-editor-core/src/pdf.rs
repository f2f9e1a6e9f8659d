//! Text-only PDF rendering for native exports.
//!
//! The composition is laid out as a flat list of lines using the standard
//! Helvetica faces (no embedded fonts), wrapped with an average glyph width
//! estimate and paginated onto fixed-size pages. Images become
//! `[image: src]` placeholders and table rows are joined with `|`.

use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::config::PdfConfig;
use crate::dom::{Element, HtmlTree, NodeId, NodeKind, parse_fragment};
use crate::error::ExportError;
use crate::export::{Artifact, ArtifactSink, Composition, ExportFormat, PdfRenderer};

const REGULAR: Name<'static> = Name(b"F1");
const BOLD: Name<'static> = Name(b"F2");

/// Average advance of a Helvetica glyph, in em.
const REGULAR_ADVANCE: f32 = 0.5;
const BOLD_ADVANCE: f32 = 0.55;
const LINE_SPACING: f32 = 1.4;
const INDENT_STEP: f32 = 18.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockStyle {
    Heading(u8),
    Paragraph { indent: u8 },
    Rule,
}

#[derive(Debug, Clone)]
struct Block {
    style: BlockStyle,
    spans: Vec<Span>,
}

/// One laid-out line.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Text {
        spans: Vec<Span>,
        size: f32,
        indent: f32,
    },
    Rule,
    /// Vertical space between blocks.
    Gap(f32),
}

impl Line {
    fn height(&self) -> f32 {
        match self {
            Line::Text { size, .. } => size * LINE_SPACING,
            Line::Rule => 12.0,
            Line::Gap(h) => *h,
        }
    }

    /// Plain text of a text line.
    pub fn text(&self) -> Option<String> {
        match self {
            Line::Text { spans, .. } => Some(spans.iter().map(|s| s.text.as_str()).collect()),
            _ => None,
        }
    }
}

/// Renders compositions to PDF bytes and delivers them to the sink.
#[derive(Debug, Clone, Default)]
pub struct TextPdfRenderer {
    config: PdfConfig,
}

impl TextPdfRenderer {
    pub fn new(config: PdfConfig) -> Self {
        Self { config }
    }

    /// Lay the composition out into lines.
    pub fn layout(&self, composition: &Composition<'_>) -> Vec<Line> {
        let mut tree = HtmlTree::new();
        let root = tree.create_element(Element::new("body"));
        for node in parse_fragment(&mut tree, &composition.to_html()) {
            tree.append(root, node);
        }

        let mut collector = BlockCollector {
            tree: &tree,
            blocks: Vec::new(),
            spans: Vec::new(),
        };
        collector.walk(root, false, 0);
        collector.flush(BlockStyle::Paragraph { indent: 0 });

        let mut lines = Vec::new();
        for block in collector.blocks {
            self.wrap_block(&block, &mut lines);
        }
        lines
    }

    /// Split lines into pages.
    pub fn paginate(&self, lines: Vec<Line>) -> Vec<Vec<Line>> {
        let usable = self.config.page_height - 2.0 * self.config.margin;
        let mut pages = vec![Vec::new()];
        let mut used = 0.0;
        for line in lines {
            let height = line.height();
            if used + height > usable && used > 0.0 {
                // Spacing never starts a page.
                if matches!(line, Line::Gap(_)) {
                    continue;
                }
                pages.push(Vec::new());
                used = 0.0;
            }
            used += height;
            if let Some(page) = pages.last_mut() {
                page.push(line);
            }
        }
        pages
    }

    /// Render a composition to PDF bytes.
    pub fn render_bytes(&self, composition: &Composition<'_>) -> Vec<u8> {
        let pages = self.paginate(self.layout(composition));
        let cfg = &self.config;

        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        let info_id = Ref::new(3);
        let regular_id = Ref::new(4);
        let bold_id = Ref::new(5);
        let page_ids: Vec<(Ref, Ref)> = (0..pages.len() as i32)
            .map(|i| (Ref::new(6 + 2 * i), Ref::new(7 + 2 * i)))
            .collect();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id)
            .kids(page_ids.iter().map(|(page, _)| *page))
            .count(page_ids.len() as i32);

        let mut info = pdf.document_info(info_id);
        if !composition.title.is_empty() {
            info.title(TextStr(composition.title));
        }
        if !composition.author.is_empty() {
            info.author(TextStr(composition.author));
        }
        info.producer(TextStr("scribe"));
        drop(info);

        pdf.type1_font(regular_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        pdf.type1_font(bold_id)
            .base_font(Name(b"Helvetica-Bold"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        for (lines, &(page_id, content_id)) in pages.iter().zip(&page_ids) {
            let mut page = pdf.page(page_id);
            page.media_box(Rect::new(0.0, 0.0, cfg.page_width, cfg.page_height));
            page.parent(page_tree_id);
            page.contents(content_id);
            let mut resources = page.resources();
            let mut fonts = resources.fonts();
            fonts.pair(REGULAR, regular_id);
            fonts.pair(BOLD, bold_id);
            drop(fonts);
            drop(resources);
            drop(page);

            let content = self.page_content(lines);
            pdf.stream(content_id, &content.finish());
        }

        pdf.finish()
    }

    fn page_content(&self, lines: &[Line]) -> Content {
        let cfg = &self.config;
        let mut content = Content::new();
        let mut top = cfg.page_height - cfg.margin;

        for line in lines {
            let height = line.height();
            match line {
                Line::Text {
                    spans,
                    size,
                    indent,
                } => {
                    let baseline = top - size;
                    content.begin_text();
                    content.next_line(cfg.margin + indent, baseline);
                    for span in spans {
                        let font = if span.bold { BOLD } else { REGULAR };
                        content.set_font(font, *size);
                        content.show(Str(&win_ansi(&span.text)));
                    }
                    content.end_text();
                }
                Line::Rule => {
                    let y = top - height / 2.0;
                    content.set_line_width(0.5);
                    content.move_to(cfg.margin, y);
                    content.line_to(cfg.page_width - cfg.margin, y);
                    content.stroke();
                }
                Line::Gap(_) => {}
            }
            top -= height;
        }
        content
    }

    fn wrap_block(&self, block: &Block, out: &mut Vec<Line>) {
        let cfg = &self.config;
        let (size, indent) = match block.style {
            BlockStyle::Rule => {
                out.push(Line::Rule);
                return;
            }
            BlockStyle::Heading(level) => {
                let size = cfg.heading_size - 2.0 * f32::from(level.saturating_sub(1));
                (size.max(cfg.font_size), 0.0)
            }
            BlockStyle::Paragraph { indent } => (cfg.font_size, INDENT_STEP * f32::from(indent)),
        };
        let max_width = (cfg.page_width - 2.0 * cfg.margin - indent).max(size);

        let mut line: Vec<Span> = Vec::new();
        let mut width = 0.0;
        for word in words(&block.spans) {
            let word_width: f32 = word.iter().map(|s| text_width(s, size)).sum();
            let space = if line.is_empty() {
                0.0
            } else {
                size * REGULAR_ADVANCE
            };
            if !line.is_empty() && width + space + word_width > max_width {
                out.push(Line::Text {
                    spans: std::mem::take(&mut line),
                    size,
                    indent,
                });
                width = 0.0;
            } else if !line.is_empty() {
                push_span(&mut line, " ", false);
                width += space;
            }
            for span in word {
                push_span(&mut line, &span.text, span.bold);
            }
            width += word_width;
        }
        if !line.is_empty() {
            out.push(Line::Text {
                spans: line,
                size,
                indent,
            });
        }
        out.push(Line::Gap(size * 0.4));
    }
}

impl PdfRenderer for TextPdfRenderer {
    fn render(
        &mut self,
        composition: &Composition<'_>,
        file_name: &str,
        sink: &mut dyn ArtifactSink,
    ) -> Result<(), ExportError> {
        let bytes = self.render_bytes(composition);
        tracing::debug!(file_name, bytes = bytes.len(), "rendered text pdf");
        sink.deliver(Artifact {
            file_name: file_name.to_string(),
            mime: ExportFormat::Pdf.mime(),
            bytes,
        })
    }
}

/// Flattens the HTML tree into styled blocks.
struct BlockCollector<'t> {
    tree: &'t HtmlTree,
    blocks: Vec<Block>,
    spans: Vec<Span>,
}

impl BlockCollector<'_> {
    fn text(&mut self, text: &str, bold: bool) {
        push_span(&mut self.spans, text, bold);
    }

    /// End the current block, giving pending text `style`.
    fn flush(&mut self, style: BlockStyle) {
        let spans = std::mem::take(&mut self.spans);
        if spans.iter().all(|s| s.text.trim().is_empty()) {
            return;
        }
        self.blocks.push(Block { style, spans });
    }

    fn walk(&mut self, node: NodeId, bold: bool, indent: u8) {
        let tree = self.tree;
        let el = match tree.kind(node) {
            NodeKind::Text(text) => {
                self.text(text, bold);
                return;
            }
            NodeKind::Element(el) => el,
        };
        let plain = BlockStyle::Paragraph { indent };
        let tag = el.tag.as_str();

        match tag {
            "script" | "style" => {}
            "b" | "strong" | "th" => self.children(node, true, indent),
            "br" => self.flush(plain),
            "img" => {
                let src = el.attr("src").unwrap_or_default();
                self.text(&format!(" [image: {src}] "), false);
            }
            "hr" => {
                self.flush(plain);
                self.blocks.push(Block {
                    style: BlockStyle::Rule,
                    spans: Vec::new(),
                });
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.flush(plain);
                let level = tag[1..].parse().unwrap_or(1);
                self.children(node, true, indent);
                self.flush(BlockStyle::Heading(level));
            }
            "ul" | "ol" => {
                self.flush(plain);
                let items = tree
                    .children(node)
                    .iter()
                    .copied()
                    .filter(|&c| tree.is_tag(c, "li"));
                for (i, item) in items.enumerate() {
                    let marker = if tag == "ol" {
                        format!("{}. ", i + 1)
                    } else {
                        "\u{2022} ".to_string()
                    };
                    self.text(&marker, bold);
                    self.children(item, bold, indent + 1);
                    self.flush(BlockStyle::Paragraph { indent: indent + 1 });
                }
            }
            "table" => {
                self.flush(plain);
                for row in tree.descendants(node) {
                    if !tree.is_tag(row, "tr") {
                        continue;
                    }
                    let cells: Vec<String> = tree
                        .children(row)
                        .iter()
                        .filter(|&&c| tree.is_tag(c, "td") || tree.is_tag(c, "th"))
                        .map(|&c| collapse_whitespace(&tree.text_content(c)).trim().to_string())
                        .collect();
                    self.text(&cells.join(" | "), bold);
                    self.flush(plain);
                }
            }
            "blockquote" => {
                self.flush(plain);
                self.children(node, bold, indent + 1);
                self.flush(BlockStyle::Paragraph { indent: indent + 1 });
            }
            _ if el.is_block() => {
                self.flush(plain);
                self.children(node, bold, indent);
                self.flush(plain);
            }
            _ => self.children(node, bold, indent),
        }
    }

    fn children(&mut self, node: NodeId, bold: bool, indent: u8) {
        let tree = self.tree;
        for &child in tree.children(node) {
            self.walk(child, bold, indent);
        }
    }
}

/// Append text to a span list, merging with the last span when the weight
/// matches. Whitespace runs collapse to one space.
fn push_span(spans: &mut Vec<Span>, text: &str, bold: bool) {
    let text = collapse_whitespace(text);
    if text.is_empty() {
        return;
    }
    match spans.last_mut() {
        Some(last) if last.bold == bold => {
            if last.text.ends_with(' ') && text.starts_with(' ') {
                last.text.push_str(&text[1..]);
            } else {
                last.text.push_str(&text);
            }
        }
        _ => spans.push(Span {
            text: text.into_owned(),
            bold,
        }),
    }
}

fn collapse_whitespace(text: &str) -> std::borrow::Cow<'_, str> {
    if !text.chars().any(char::is_whitespace) {
        return text.into();
    }
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out.into()
}

/// Split spans into words. A word may straddle spans with different weights.
fn words(spans: &[Span]) -> Vec<Vec<Span>> {
    let mut words = Vec::new();
    let mut current: Vec<Span> = Vec::new();
    for span in spans {
        for c in span.text.chars() {
            if c.is_whitespace() {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                continue;
            }
            match current.last_mut() {
                Some(last) if last.bold == span.bold => last.text.push(c),
                _ => current.push(Span {
                    text: c.to_string(),
                    bold: span.bold,
                }),
            }
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn text_width(span: &Span, size: f32) -> f32 {
    let advance = if span.bold {
        BOLD_ADVANCE
    } else {
        REGULAR_ADVANCE
    };
    span.text.chars().count() as f32 * size * advance
}

/// Encode text for the standard fonts' WinAnsiEncoding. Characters outside
/// it become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u8,
            '\u{20ac}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2122}' => 0x99,
            _ => b'?',
        })
        .collect()
}
