// src/parser/mod.rs
//! Document parsers that turn outside formats into Notion content.

mod csv;
mod element;
mod error;
mod html;
mod rules;
mod text;

pub use self::csv::{CsvDocument, CsvParser};
pub use element::Element;
pub use error::{ParseError, StructureError};
pub use html::HtmlParser;
pub use rules::{rule_for, supported_tags, ListKind, Rule};
pub use text::{condense_text, normalize_text, StyleFlag, StyleState};

use crate::model::Block;
use indexmap::IndexMap;
use serde::Serialize;
use std::path::Path;

/// The result of parsing an HTML document.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ParsedDocument {
    pub title: Option<String>,
    pub metadata: IndexMap<String, String>,
    pub base_url: Option<String>,
    pub content: Vec<Block>,
}

/// Something that converts a whole document into structured output.
pub trait DocumentParser {
    type Output;

    /// Parse a document; `name` is used as the title when the document
    /// does not carry one.
    fn parse_named(&self, data: &str, name: Option<&str>) -> Result<Self::Output, ParseError>;

    fn parse(&self, data: &str) -> Result<Self::Output, ParseError> {
        self.parse_named(data, None)
    }

    /// Read and parse a UTF-8 file, falling back to its file name as title.
    fn parse_file(&self, path: &Path) -> Result<Self::Output, ParseError> {
        let bytes = std::fs::read(path)?;
        let data = String::from_utf8(bytes)
            .map_err(|e| ParseError::Encoding(format!("{}: {}", path.display(), e)))?;
        let name = path.file_name().map(|name| name.to_string_lossy());
        self.parse_named(&data, name.as_deref())
    }
}
