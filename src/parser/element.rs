// src/parser/element.rs
//! A read-only HTML element tree using the text/tail model.
//!
//! Every element carries the text before its first child (`text`) and the
//! text that follows its own closing tag (`tail`), so inline markup and the
//! text around it can be replayed in document order.

use super::error::{ParseError, StructureError};
use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use indexmap::IndexMap;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::io::Read;

/// Elements whose content never becomes document text.
const DROPPED_TAGS: &[&str] = &["script", "style", "template", "noscript"];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub tag: String,
    pub attributes: IndexMap<String, String>,
    pub text: Option<String>,
    pub tail: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn with_tail(mut self, tail: &str) -> Self {
        self.tail = Some(tail.to_string());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// All text in this subtree, excluding this element's own tail.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
            if let Some(tail) = &child.tail {
                out.push_str(tail);
            }
        }
    }

    /// Number of element levels in this subtree, counting this one.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Element::depth).max().unwrap_or(0)
    }

    /// Parse an HTML document from a string.
    ///
    /// Fails once elements nest deeper than `max_depth`, counting `<html>`
    /// as level one.
    pub fn parse_html(html: &str, max_depth: usize) -> Result<Self, StructureError> {
        let dom = parse_document(RcDom::default(), parse_options()).one(html);
        Self::from_dom(&dom, max_depth)
    }

    /// Parse an HTML document from a UTF-8 byte stream.
    pub fn read_html(mut reader: impl Read, max_depth: usize) -> Result<Self, ParseError> {
        let dom = parse_document(RcDom::default(), parse_options())
            .from_utf8()
            .read_from(&mut reader)?;
        Ok(Self::from_dom(&dom, max_depth)?)
    }

    /// Convert a parsed DOM into an element tree rooted at `<html>`.
    ///
    /// A document without a root element yields an empty `html` element.
    pub fn from_dom(dom: &RcDom, max_depth: usize) -> Result<Self, StructureError> {
        for child in dom.document.children.borrow().iter() {
            if let Some(root) = convert_node(child, 1, max_depth)? {
                return Ok(root);
            }
        }
        Ok(Element::new("html"))
    }
}

fn parse_options() -> ParseOpts {
    ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: true,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Convert one DOM element; text, comment and doctype nodes yield `None`.
fn convert_node(
    handle: &Handle,
    depth: usize,
    max_depth: usize,
) -> Result<Option<Element>, StructureError> {
    let NodeData::Element {
        ref name,
        ref attrs,
        ..
    } = handle.data
    else {
        return Ok(None);
    };

    let tag = name.local.as_ref().to_ascii_lowercase();
    if DROPPED_TAGS.contains(&tag.as_str()) {
        return Ok(None);
    }
    if depth > max_depth {
        return Err(StructureError::DepthExceeded { limit: max_depth });
    }

    let mut element = Element::new(&tag);
    for attr in attrs.borrow().iter() {
        element
            .attributes
            .insert(attr.name.local.as_ref().to_string(), attr.value.to_string());
    }

    for child in handle.children.borrow().iter() {
        match child.data {
            NodeData::Text { ref contents } => {
                let contents = contents.borrow();
                // Text lands after the last kept child, or before the first.
                let slot = match element.children.last_mut() {
                    Some(last) => &mut last.tail,
                    None => &mut element.text,
                };
                slot.get_or_insert_with(String::new).push_str(&contents);
            }
            NodeData::Element { .. } => {
                if let Some(converted) = convert_node(child, depth + 1, max_depth)? {
                    element.children.push(converted);
                }
            }
            _ => {}
        }
    }

    Ok(Some(element))
}
