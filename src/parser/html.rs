// src/parser/html.rs
//! HTML to block conversion.
//!
//! The walk is depth-first over an [`Element`] tree. Each tag is looked up in
//! the rule table and rendered into a [`Target`]: the top-level block list,
//! a block under construction, or a table cell. Inline style travels down
//! the walk as a [`StyleState`] value.

use super::element::Element;
use super::error::{ParseError, StructureError};
use super::rules::{rule_for, ListKind, Rule};
use super::text::{condense_text, is_visible, normalize_text, trim_runs, StyleState};
use super::{DocumentParser, ParsedDocument};
use crate::constants::HTML_MAX_NESTING_DEPTH;
use crate::model::{Block, TableBlock};
use crate::types::RichTextItem;
use indexmap::IndexMap;
use std::io::Read;

/// Converts HTML documents into Notion blocks.
#[derive(Debug, Clone)]
pub struct HtmlParser {
    base_url: Option<String>,
    max_depth: usize,
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self {
            base_url: None,
            max_depth: HTML_MAX_NESTING_DEPTH,
        }
    }
}

impl HtmlParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base URL recorded on every document unless the document sets its own.
    pub fn with_base(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Maximum element nesting accepted before failing.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Convert an already built element tree.
    pub fn parse_element(&self, root: &Element) -> Result<ParsedDocument, ParseError> {
        let mut renderer = Renderer::new(self);
        let mut content = Vec::new();

        renderer.render(
            root,
            Target::Blocks(&mut content),
            &StyleState::default(),
            1,
        )?;

        log::debug!("Parsed {} top-level block(s)", content.len());

        Ok(ParsedDocument {
            title: renderer.title,
            metadata: renderer.metadata,
            base_url: renderer.base_url,
            content,
        })
    }

    /// Parse UTF-8 encoded HTML from a byte stream.
    pub fn parse_reader(&self, reader: impl Read) -> Result<ParsedDocument, ParseError> {
        let root = Element::read_html(reader, self.max_depth)?;
        self.parse_element(&root)
    }
}

impl DocumentParser for HtmlParser {
    type Output = ParsedDocument;

    fn parse_named(&self, data: &str, name: Option<&str>) -> Result<ParsedDocument, ParseError> {
        let root = Element::parse_html(data, self.max_depth)?;
        let mut document = self.parse_element(&root)?;
        if document.title.is_none() {
            document.title = name.map(str::to_string);
        }
        Ok(document)
    }
}

/// Where rendered output goes.
enum Target<'a> {
    /// The document's top-level block list
    Blocks(&'a mut Vec<Block>),
    /// A block under construction
    Block(&'a mut Block),
    /// The runs of a single table cell
    Cell(&'a mut CellText),
}

/// Text of a table cell being filled.
#[derive(Default)]
struct CellText {
    runs: Vec<RichTextItem>,
    /// The last thing appended was a nested block
    after_block: bool,
}

impl CellText {
    fn push_run(&mut self, run: RichTextItem) {
        if std::mem::take(&mut self.after_block) {
            self.break_line();
        }
        self.runs.push(run);
    }

    fn push_block_runs(&mut self, runs: &mut Vec<RichTextItem>) {
        if runs.is_empty() {
            return;
        }
        self.break_line();
        self.runs.append(runs);
        self.after_block = true;
    }

    fn break_line(&mut self) {
        if let Some(last) = self.runs.last_mut() {
            last.push_str("\n");
        }
    }
}

impl Target<'_> {
    fn reborrow(&mut self) -> Target<'_> {
        match self {
            Target::Blocks(blocks) => Target::Blocks(&mut **blocks),
            Target::Block(block) => Target::Block(&mut **block),
            Target::Cell(cell) => Target::Cell(&mut **cell),
        }
    }

    fn accepts_text(&self) -> bool {
        match self {
            Target::Blocks(_) => false,
            Target::Block(block) => block.accepts_text() || block.is_table_row(),
            Target::Cell(_) => true,
        }
    }

    fn preserves_whitespace(&self) -> bool {
        matches!(self, Target::Block(block) if block.preserves_whitespace())
    }

    fn is_table(&self) -> bool {
        matches!(self, Target::Block(block) if block.is_table())
    }

    fn table_mut(&mut self) -> Option<&mut TableBlock> {
        match self {
            Target::Block(block) => block.as_table_mut(),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        match self {
            Target::Blocks(_) => "document".to_string(),
            Target::Block(block) => block.block_type().to_string(),
            Target::Cell(_) => "table cell".to_string(),
        }
    }

    fn invalid_parent(&self, tag: &str, expected: &'static str) -> ParseError {
        StructureError::InvalidParent {
            tag: tag.to_string(),
            expected,
            found: self.describe(),
        }
        .into()
    }
}

/// Per-document walk state.
struct Renderer {
    max_depth: usize,
    title: Option<String>,
    metadata: IndexMap<String, String>,
    base_url: Option<String>,
}

impl Renderer {
    fn new(parser: &HtmlParser) -> Self {
        Self {
            max_depth: parser.max_depth,
            title: None,
            metadata: IndexMap::new(),
            base_url: parser.base_url.clone(),
        }
    }

    fn render(
        &mut self,
        element: &Element,
        mut target: Target<'_>,
        style: &StyleState,
        depth: usize,
    ) -> Result<(), ParseError> {
        if depth > self.max_depth {
            return Err(StructureError::DepthExceeded {
                limit: self.max_depth,
            }
            .into());
        }

        let rule = rule_for(&element.tag);
        log::debug!("Rendering <{}> into {} as {:?}", element.tag, target.describe(), rule);

        match rule {
            Rule::Style(flag) => {
                self.process_contents(element, target, &style.with_flag(flag), depth)
            }
            Rule::Link => {
                self.process_contents(element, target, &style.with_href(element.attr("href")), depth)
            }
            Rule::Base => {
                if let Some(href) = element.attr("href") {
                    self.base_url = Some(href.to_string());
                }
                Ok(())
            }
            Rule::Heading(level) => self.render_block(element, target, style, depth, Block::heading(level)),
            Rule::Paragraph | Rule::DefinitionList => {
                self.render_block(element, target, style, depth, Block::paragraph())
            }
            Rule::Quote => self.render_block(element, target, style, depth, Block::quote()),
            Rule::Code => self.render_block(element, target, style, depth, Block::code()),
            Rule::Transparent => self.process_contents(element, target, style, depth),
            Rule::LineBreak => {
                append_line_break(&mut target, style);
                Ok(())
            }
            Rule::Divider => {
                append_block(target, Block::divider());
                Ok(())
            }
            Rule::List(kind) => self.render_list(element, target, style, depth, kind),
            Rule::Table => self.render_table(element, target, style, depth),
            Rule::TableHead => {
                match target.table_mut() {
                    Some(table) => table.has_column_header = true,
                    None => return Err(target.invalid_parent(&element.tag, "table")),
                }
                self.process_contents(element, target, style, depth)
            }
            Rule::TableRow => self.render_row(element, target, style, depth),
            Rule::TableCell => self.render_cell(element, target, style, depth),
            Rule::Image => {
                if let Some(src) = element.attr("src") {
                    append_block(target, Block::image(src));
                }
                Ok(())
            }
            Rule::Embed => {
                if let Some(src) = element.attr("src") {
                    append_block(target, Block::embed(src));
                }
                Ok(())
            }
            Rule::Meta => {
                if let (Some(name), Some(content)) = (element.attr("name"), element.attr("content")) {
                    if !name.is_empty() && !content.is_empty() {
                        self.metadata.insert(name.to_string(), content.to_string());
                    }
                }
                Ok(())
            }
            Rule::Title => {
                self.title = normalize_text(&element.text_content());
                Ok(())
            }
        }
    }

    /// Render the element's contents into a fresh block, then append it.
    fn render_block(
        &mut self,
        element: &Element,
        target: Target<'_>,
        style: &StyleState,
        depth: usize,
        mut block: Block,
    ) -> Result<(), ParseError> {
        self.process_contents(element, Target::Block(&mut block), style, depth)?;
        append_block(target, block);
        Ok(())
    }

    /// Render direct text, children and their tails in document order.
    ///
    /// Text that lands where no text is accepted gets wrapped in a new
    /// paragraph along with the rest of the element's contents.
    fn process_contents(
        &mut self,
        element: &Element,
        mut target: Target<'_>,
        style: &StyleState,
        depth: usize,
    ) -> Result<(), ParseError> {
        if !has_direct_text(element) {
            for child in &element.children {
                self.render(child, target.reborrow(), style, depth + 1)?;
            }
            return Ok(());
        }

        if target.accepts_text() {
            return self.process_text(element, target, style, depth);
        }

        let mut paragraph = Block::paragraph();
        self.process_text(element, Target::Block(&mut paragraph), style, depth)?;
        append_block(target, paragraph);
        Ok(())
    }

    fn process_text(
        &mut self,
        element: &Element,
        mut target: Target<'_>,
        style: &StyleState,
        depth: usize,
    ) -> Result<(), ParseError> {
        append_text(&mut target, element.text.as_deref(), style);
        for child in &element.children {
            self.render(child, target.reborrow(), style, depth + 1)?;
            append_text(&mut target, child.tail.as_deref(), style);
        }
        Ok(())
    }

    /// One list item per `<li>`; anything else attaches to the latest item.
    fn render_list(
        &mut self,
        element: &Element,
        mut target: Target<'_>,
        style: &StyleState,
        depth: usize,
        kind: ListKind,
    ) -> Result<(), ParseError> {
        let mut current: Option<Block> = None;

        for child in &element.children {
            if child.tag == "li" {
                if let Some(item) = current.take() {
                    append_block(target.reborrow(), item);
                }
                let mut item = match kind {
                    ListKind::Bulleted => Block::bulleted_list_item(),
                    ListKind::Numbered => Block::numbered_list_item(),
                };
                self.render(child, Target::Block(&mut item), style, depth + 1)?;
                current = Some(item);
            } else {
                match current.as_mut() {
                    Some(item) => self.render(child, Target::Block(item), style, depth + 1)?,
                    None => self.render(child, target.reborrow(), style, depth + 1)?,
                }
            }
        }

        if let Some(item) = current {
            append_block(target, item);
        }
        Ok(())
    }

    fn render_table(
        &mut self,
        element: &Element,
        target: Target<'_>,
        style: &StyleState,
        depth: usize,
    ) -> Result<(), ParseError> {
        let mut table = Block::table();
        self.process_contents(element, Target::Block(&mut table), style, depth)?;

        let width = table.as_table_mut().map(TableBlock::update_width).unwrap_or(0);
        if width > 0 {
            append_block(target, table);
        } else {
            log::debug!("Dropping table without cells");
        }
        Ok(())
    }

    fn render_row(
        &mut self,
        element: &Element,
        target: Target<'_>,
        style: &StyleState,
        depth: usize,
    ) -> Result<(), ParseError> {
        if !target.is_table() {
            return Err(target.invalid_parent(&element.tag, "table"));
        }

        let mut row = Block::table_row();
        for cell in element
            .children
            .iter()
            .filter(|child| child.tag == "td")
        {
            self.render(cell, Target::Block(&mut row), style, depth + 1)?;
        }

        append_block(target, row);
        Ok(())
    }

    fn render_cell(
        &mut self,
        element: &Element,
        mut target: Target<'_>,
        style: &StyleState,
        depth: usize,
    ) -> Result<(), ParseError> {
        let Target::Block(Block::TableRow(row)) = &mut target else {
            return Err(target.invalid_parent(&element.tag, "table_row"));
        };

        let mut text = CellText::default();
        if has_visible_text(element) {
            self.process_contents(element, Target::Cell(&mut text), style, depth)?;
        }
        let mut cell = text.runs;
        trim_runs(&mut cell);
        if cell.is_empty() {
            cell.push(style.run(""));
        }

        row.cells.push(cell);
        Ok(())
    }
}

/// Add a finished block to the target, trimming its text edges first.
///
/// Tables only take rows; rows and cells only take the text of text blocks.
/// Anything else is dropped.
fn append_block(target: Target<'_>, mut block: Block) {
    if !block.preserves_whitespace() {
        if let Some(runs) = block.rich_text_mut() {
            trim_runs(runs);
        }
    }

    match target {
        Target::Blocks(blocks) => blocks.push(block),
        Target::Cell(cell) => match block.rich_text_mut() {
            Some(runs) => cell.push_block_runs(runs),
            None => log::debug!("Dropping {} inside a table cell", block.block_type()),
        },
        Target::Block(parent) => {
            if parent.is_table() {
                if block.is_table_row() {
                    parent.push_child(block);
                } else {
                    log::debug!("Dropping {} inside a table", block.block_type());
                }
            } else if let Some(row) = parent.as_table_row_mut() {
                match block.rich_text_mut() {
                    Some(runs) => row.cells.push(std::mem::take(runs)),
                    None => log::debug!("Dropping {} inside a table row", block.block_type()),
                }
            } else if parent.accepts_children() {
                parent.push_child(block);
            } else {
                log::debug!(
                    "Dropping {} inside {}",
                    block.block_type(),
                    parent.block_type()
                );
            }
        }
    }
}

/// Add a span of text in the given style.
fn append_text(target: &mut Target<'_>, text: Option<&str>, style: &StyleState) {
    let text = if target.preserves_whitespace() {
        text.filter(|text| !text.is_empty()).map(str::to_string)
    } else {
        condense_text(text)
    };
    let Some(text) = text else {
        return;
    };

    log::debug!("Appending text to {}: {:?}", target.describe(), text);
    let run = style.run(&text);

    match target {
        Target::Cell(cell) => cell.push_run(run),
        Target::Block(block) => {
            if let Some(row) = block.as_table_row_mut() {
                row.cells.push(vec![run]);
            } else if let Some(runs) = block.rich_text_mut() {
                runs.push(run);
            }
        }
        Target::Blocks(_) => log::debug!("Ignoring text outside of any block"),
    }
}

fn append_line_break(target: &mut Target<'_>, style: &StyleState) {
    let runs = match target {
        Target::Cell(cell) => {
            cell.after_block = false;
            &mut cell.runs
        }
        Target::Block(block) => match block.rich_text_mut() {
            Some(runs) => runs,
            None => return,
        },
        Target::Blocks(_) => return,
    };

    match runs.last_mut() {
        Some(last) => last.push_str("\n"),
        None => runs.push(style.run("\n")),
    }
}

/// Text directly inside the element or trailing one of its children.
fn has_direct_text(element: &Element) -> bool {
    is_visible(element.text.as_deref())
        || element
            .children
            .iter()
            .any(|child| is_visible(child.tail.as_deref()))
}

/// Text anywhere in the element's subtree.
fn has_visible_text(element: &Element) -> bool {
    is_visible(element.text.as_deref())
        || element
            .children
            .iter()
            .any(|child| has_visible_text(child) || is_visible(child.tail.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::plain_text_of;
    use pretty_assertions::assert_eq;

    fn parse(html: &str) -> ParsedDocument {
        HtmlParser::new().parse(html).unwrap()
    }

    #[test]
    fn test_inline_spans_keep_their_spacing() {
        let doc = parse("<p>Hello <b>bold</b> world</p>");
        let runs = doc.content[0].rich_text().unwrap();
        assert_eq!(runs.len(), 3);
        assert_eq!(plain_text_of(runs), "Hello bold world");
        assert!(runs[1].annotations.bold);
        assert!(!runs[2].annotations.bold);
    }

    #[test]
    fn test_loose_text_is_wrapped_in_a_paragraph() {
        let doc = parse("<body>Loose <i>text</i></body>");
        assert_eq!(doc.content.len(), 1);
        assert_eq!(doc.content[0].block_type(), "paragraph");
        assert_eq!(doc.content[0].plain_text(), "Loose text");
    }

    #[test]
    fn test_divs_and_spans_are_transparent() {
        let doc = parse("<div><div><p>A</p></div><span><p>B</p></span></div>");
        let types: Vec<_> = doc.content.iter().map(Block::block_type).collect();
        assert_eq!(types, vec!["paragraph", "paragraph"]);
    }

    #[test]
    fn test_line_breaks_extend_the_current_run() {
        let doc = parse("<p>one<br>two</p>");
        assert_eq!(doc.content[0].plain_text(), "one\ntwo");
    }

    #[test]
    fn test_deep_headings_collapse() {
        let doc = parse("<h1>A</h1><h2>B</h2><h5>C</h5>");
        let types: Vec<_> = doc.content.iter().map(Block::block_type).collect();
        assert_eq!(types, vec!["heading_1", "heading_2", "heading_3"]);
    }

    #[test]
    fn test_leaf_blocks_require_sources() {
        let doc = parse(
            r#"<img src="https://example.com/a.png"><img><iframe src="https://example.com/v"></iframe><hr>"#,
        );
        let types: Vec<_> = doc.content.iter().map(Block::block_type).collect();
        assert_eq!(types, vec!["image", "embed", "divider"]);
        assert_eq!(doc.content[0].plain_text(), "https://example.com/a.png");
    }

    #[test]
    fn test_meta_and_base_are_recorded() {
        let doc = parse(
            r#"<head><meta name="author" content="Ada"><meta charset="utf-8"><base href="https://example.com/"></head>"#,
        );
        assert_eq!(doc.metadata.get("author").map(String::as_str), Some("Ada"));
        assert_eq!(doc.metadata.len(), 1);
        assert_eq!(doc.base_url.as_deref(), Some("https://example.com/"));
    }

    #[test]
    fn test_depth_guard() {
        let mut element = Element::new("span").with_text("deep");
        for _ in 0..10 {
            element = Element::new("div").with_child(element);
        }
        let err = HtmlParser::new()
            .with_max_depth(5)
            .parse_element(&element)
            .unwrap_err();
        assert!(matches!(
            err,
            ParseError::Structure(StructureError::DepthExceeded { limit: 5 })
        ));
    }

    #[test]
    fn test_cells_keep_inline_styles_together() {
        let doc = parse("<table><tr><td>Hello <b>World</b></td><td>X</td></tr></table>");
        let table = doc.content[0].as_table().unwrap();
        let row = table.rows().next().unwrap();
        assert_eq!(row.cells.len(), 2);
        assert_eq!(plain_text_of(&row.cells[0]), "Hello World");
        assert!(row.cells[0][1].annotations.bold);
        assert_eq!(table.table_width, 2);
    }

    #[test]
    fn test_rows_only_read_td_cells() {
        let doc = parse("<table><tr><th>H</th><td>A</td></tr></table>");
        let table = doc.content[0].as_table().unwrap();
        let row = table.rows().next().unwrap();
        assert_eq!(table.table_width, 1);
        assert_eq!(plain_text_of(&row.cells[0]), "A");
    }

    #[test]
    fn test_blocks_in_cells_are_separated_from_text() {
        let cell_text = |html: &str| {
            let doc = parse(html);
            let table = doc.content[0].as_table().unwrap();
            let text = plain_text_of(&table.rows().next().unwrap().cells[0]);
            text
        };
        assert_eq!(cell_text("<table><tr><td><p>A</p>B</td></tr></table>"), "A\nB");
        assert_eq!(cell_text("<table><tr><td>A<p>B</p>C</td></tr></table>"), "A\nB\nC");
        assert_eq!(cell_text("<table><tr><td><p>A</p></td></tr></table>"), "A");
    }

    #[test]
    fn test_deep_html_fails_before_rendering() {
        let err = HtmlParser::new()
            .parse(&"<div>".repeat(1_000))
            .unwrap_err();
        assert!(matches!(
            err,
            ParseError::Structure(StructureError::DepthExceeded {
                limit: HTML_MAX_NESTING_DEPTH
            })
        ));
    }

    #[test]
    fn test_rows_are_padded_to_width() {
        let doc = parse("<table><tr><td>A</td><td>B</td></tr><tr><td>C</td></tr></table>");
        let table = doc.content[0].as_table().unwrap();
        assert_eq!(table.table_width, 2);
        assert!(table.rows().all(|row| row.cells.len() == 2));
    }

    #[test]
    fn test_thead_marks_column_header() {
        let doc = parse(
            "<table><thead><tr><td>Name</td></tr></thead><tbody><tr><td>Ada</td></tr></tbody></table>",
        );
        let table = doc.content[0].as_table().unwrap();
        assert!(table.has_column_header);
        assert_eq!(table.rows().count(), 2);
    }
}
