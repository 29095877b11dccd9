use super::common::BlockCommon;
use crate::types::{Color, RichTextItem};
use serde::{Deserialize, Serialize};

/// Text content shared by every text-bearing block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TextBlockContent {
    #[serde(default)]
    pub rich_text: Vec<RichTextItem>,
    #[serde(default)]
    pub color: Color,
}

/// Paragraphs, headings, list items, toggles and quotes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// To-do block
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToDoBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
    pub checked: bool,
}

/// Callout block
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CalloutBlock {
    pub common: BlockCommon,
    pub icon: Option<Icon>,
    pub content: TextBlockContent,
}

/// Icon types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Icon {
    #[serde(rename = "emoji")]
    Emoji { emoji: String },
    #[serde(rename = "external")]
    External { external: ExternalFile },
    #[serde(rename = "file")]
    File { file: NotionFile },
}

/// Language used for code blocks that carry no language hint.
pub const PLAIN_TEXT_LANGUAGE: &str = "plain text";

/// Code block
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub common: BlockCommon,
    pub language: String,
    pub caption: Vec<RichTextItem>,
    pub content: TextBlockContent,
}

impl Default for CodeBlock {
    fn default() -> Self {
        Self {
            common: BlockCommon::default(),
            language: PLAIN_TEXT_LANGUAGE.to_string(),
            caption: Vec::new(),
            content: TextBlockContent::default(),
        }
    }
}

/// Divider block
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DividerBlock {
    pub common: BlockCommon,
}

/// Image block
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlock {
    pub common: BlockCommon,
    pub image: FileObject,
    pub caption: Vec<RichTextItem>,
}

/// Embed block
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedBlock {
    pub common: BlockCommon,
    pub url: String,
}

/// Bookmark block
#[derive(Debug, Clone, PartialEq)]
pub struct BookmarkBlock {
    pub common: BlockCommon,
    pub url: String,
    pub caption: Vec<RichTextItem>,
}

/// Child page block
#[derive(Debug, Clone, PartialEq)]
pub struct ChildPageBlock {
    pub common: BlockCommon,
    pub title: String,
}

/// Table block. Its rows live in `common.children`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableBlock {
    pub common: BlockCommon,
    pub table_width: usize,
    pub has_column_header: bool,
    pub has_row_header: bool,
}

impl TableBlock {
    /// Iterate over the rows of this table.
    pub fn rows(&self) -> impl Iterator<Item = &TableRowBlock> {
        self.common.children.iter().filter_map(|child| match child {
            super::Block::TableRow(row) => Some(row),
            _ => None,
        })
    }

    /// Recompute `table_width` as the widest row.
    ///
    /// Shorter rows are padded with empty cells on the way out so every row
    /// matches the declared width.
    pub fn update_width(&mut self) -> usize {
        self.table_width = self.rows().map(|row| row.cells.len()).max().unwrap_or(0);
        let width = self.table_width;
        for child in &mut self.common.children {
            if let super::Block::TableRow(row) = child {
                while row.cells.len() < width {
                    row.cells.push(Vec::new());
                }
            }
        }
        width
    }
}

/// Table row block
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableRowBlock {
    pub common: BlockCommon,
    pub cells: Vec<Vec<RichTextItem>>,
}

/// A block type this crate does not model; its payload is kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct UnsupportedBlock {
    pub common: BlockCommon,
    pub block_type: String,
    pub payload: serde_json::Value,
}

/// File object types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FileObject {
    #[serde(rename = "external")]
    External { external: ExternalFile },
    #[serde(rename = "file")]
    File { file: NotionFile },
}

impl FileObject {
    /// Reference a file hosted outside of Notion.
    pub fn external(url: impl Into<String>) -> Self {
        Self::External {
            external: ExternalFile { url: url.into() },
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::External { external } => &external.url,
            Self::File { file } => &file.url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalFile {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotionFile {
    pub url: String,
    pub expiry_time: Option<chrono::DateTime<chrono::Utc>>,
}
