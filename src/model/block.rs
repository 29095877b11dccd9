use super::blocks::*;
use super::common::BlockCommon;
use crate::types::{plain_text_of, BlockId, RichTextItem};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

/// Macro to reduce boilerplate in Block enum methods
macro_rules! match_all_blocks {
    ($self:expr, $pattern:pat => $result:expr) => {
        match $self {
            Block::Paragraph($pattern) => $result,
            Block::Heading1($pattern) => $result,
            Block::Heading2($pattern) => $result,
            Block::Heading3($pattern) => $result,
            Block::BulletedListItem($pattern) => $result,
            Block::NumberedListItem($pattern) => $result,
            Block::Toggle($pattern) => $result,
            Block::Quote($pattern) => $result,
            Block::ToDo($pattern) => $result,
            Block::Callout($pattern) => $result,
            Block::Code($pattern) => $result,
            Block::Divider($pattern) => $result,
            Block::Image($pattern) => $result,
            Block::Embed($pattern) => $result,
            Block::Bookmark($pattern) => $result,
            Block::ChildPage($pattern) => $result,
            Block::Table($pattern) => $result,
            Block::TableRow($pattern) => $result,
            Block::Unsupported($pattern) => $result,
        }
    };
}

/// Block represents the Notion block types this crate reads and writes.
///
/// Three families matter to callers:
/// - text blocks own rich text and may nest child blocks
/// - tables own rows, rows own cells of rich text
/// - leaf blocks (divider, image, embed, bookmark) own neither
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(TextBlock),
    Heading1(TextBlock),
    Heading2(TextBlock),
    Heading3(TextBlock),
    BulletedListItem(TextBlock),
    NumberedListItem(TextBlock),
    Toggle(TextBlock),
    Quote(TextBlock),
    ToDo(ToDoBlock),
    Callout(CalloutBlock),
    Code(CodeBlock),
    Divider(DividerBlock),
    Image(ImageBlock),
    Embed(EmbedBlock),
    Bookmark(BookmarkBlock),
    ChildPage(ChildPageBlock),
    Table(TableBlock),
    TableRow(TableRowBlock),
    Unsupported(UnsupportedBlock),
}

// --- Constructors ---

impl Block {
    pub fn paragraph() -> Self {
        Block::Paragraph(TextBlock::default())
    }

    /// Headings past level 3 collapse into `heading_3`, the deepest Notion supports.
    pub fn heading(level: u8) -> Self {
        match level {
            0 | 1 => Block::Heading1(TextBlock::default()),
            2 => Block::Heading2(TextBlock::default()),
            _ => Block::Heading3(TextBlock::default()),
        }
    }

    pub fn bulleted_list_item() -> Self {
        Block::BulletedListItem(TextBlock::default())
    }

    pub fn numbered_list_item() -> Self {
        Block::NumberedListItem(TextBlock::default())
    }

    pub fn toggle() -> Self {
        Block::Toggle(TextBlock::default())
    }

    pub fn quote() -> Self {
        Block::Quote(TextBlock::default())
    }

    pub fn to_do(checked: bool) -> Self {
        Block::ToDo(ToDoBlock {
            checked,
            ..Default::default()
        })
    }

    pub fn callout(icon: Option<Icon>) -> Self {
        Block::Callout(CalloutBlock {
            icon,
            ..Default::default()
        })
    }

    pub fn code() -> Self {
        Block::Code(CodeBlock::default())
    }

    pub fn divider() -> Self {
        Block::Divider(DividerBlock::default())
    }

    /// An image referencing an externally hosted file.
    pub fn image(url: impl Into<String>) -> Self {
        Block::Image(ImageBlock {
            common: BlockCommon::default(),
            image: FileObject::external(url),
            caption: Vec::new(),
        })
    }

    pub fn embed(url: impl Into<String>) -> Self {
        Block::Embed(EmbedBlock {
            common: BlockCommon::default(),
            url: url.into(),
        })
    }

    pub fn bookmark(url: impl Into<String>) -> Self {
        Block::Bookmark(BookmarkBlock {
            common: BlockCommon::default(),
            url: url.into(),
            caption: Vec::new(),
        })
    }

    pub fn table() -> Self {
        Block::Table(TableBlock::default())
    }

    pub fn table_row() -> Self {
        Block::TableRow(TableRowBlock::default())
    }

    /// Append a plain text run; a no-op for blocks that do not hold text.
    pub fn with_text(mut self, text: &str) -> Self {
        if let Some(rich_text) = self.rich_text_mut() {
            rich_text.push(RichTextItem::plain_text(text));
        }
        self
    }

    /// Append a nested child block.
    pub fn with_child(mut self, child: Block) -> Self {
        self.push_child(child);
        self
    }
}

// --- Accessors and capability queries ---

impl Block {
    /// The server-assigned ID, if this block came from Notion
    pub fn id(&self) -> Option<&BlockId> {
        match_all_blocks!(self, b => b.common.id.as_ref())
    }

    pub fn children(&self) -> &[Block] {
        match_all_blocks!(self, b => &b.common.children)
    }

    pub fn children_mut(&mut self) -> &mut Vec<Block> {
        match_all_blocks!(self, b => &mut b.common.children)
    }

    pub fn has_children(&self) -> bool {
        self.common().has_children
    }

    pub fn common(&self) -> &BlockCommon {
        match_all_blocks!(self, b => &b.common)
    }

    pub fn common_mut(&mut self) -> &mut BlockCommon {
        match_all_blocks!(self, b => &mut b.common)
    }

    pub fn set_children(&mut self, children: Vec<Block>) {
        let common = self.common_mut();
        common.has_children = !children.is_empty();
        common.children = children;
    }

    pub fn push_child(&mut self, child: Block) {
        self.common_mut().push_child(child);
    }

    /// The API type name of this block
    pub fn block_type(&self) -> &str {
        match self {
            Block::Paragraph(_) => "paragraph",
            Block::Heading1(_) => "heading_1",
            Block::Heading2(_) => "heading_2",
            Block::Heading3(_) => "heading_3",
            Block::BulletedListItem(_) => "bulleted_list_item",
            Block::NumberedListItem(_) => "numbered_list_item",
            Block::Toggle(_) => "toggle",
            Block::Quote(_) => "quote",
            Block::ToDo(_) => "to_do",
            Block::Callout(_) => "callout",
            Block::Code(_) => "code",
            Block::Divider(_) => "divider",
            Block::Image(_) => "image",
            Block::Embed(_) => "embed",
            Block::Bookmark(_) => "bookmark",
            Block::ChildPage(_) => "child_page",
            Block::Table(_) => "table",
            Block::TableRow(_) => "table_row",
            Block::Unsupported(b) => &b.block_type,
        }
    }

    fn text_content(&self) -> Option<&TextBlockContent> {
        match self {
            Block::Paragraph(b)
            | Block::Heading1(b)
            | Block::Heading2(b)
            | Block::Heading3(b)
            | Block::BulletedListItem(b)
            | Block::NumberedListItem(b)
            | Block::Toggle(b)
            | Block::Quote(b) => Some(&b.content),
            Block::ToDo(b) => Some(&b.content),
            Block::Callout(b) => Some(&b.content),
            Block::Code(b) => Some(&b.content),
            _ => None,
        }
    }

    fn text_content_mut(&mut self) -> Option<&mut TextBlockContent> {
        match self {
            Block::Paragraph(b)
            | Block::Heading1(b)
            | Block::Heading2(b)
            | Block::Heading3(b)
            | Block::BulletedListItem(b)
            | Block::NumberedListItem(b)
            | Block::Toggle(b)
            | Block::Quote(b) => Some(&mut b.content),
            Block::ToDo(b) => Some(&mut b.content),
            Block::Callout(b) => Some(&mut b.content),
            Block::Code(b) => Some(&mut b.content),
            _ => None,
        }
    }

    /// Rich text runs of a text block
    pub fn rich_text(&self) -> Option<&[RichTextItem]> {
        self.text_content().map(|content| content.rich_text.as_slice())
    }

    pub fn rich_text_mut(&mut self) -> Option<&mut Vec<RichTextItem>> {
        self.text_content_mut().map(|content| &mut content.rich_text)
    }

    /// Whether inline text can be appended to this block directly.
    pub fn accepts_text(&self) -> bool {
        self.text_content().is_some()
    }

    /// Whether arbitrary child blocks may be nested under this block.
    ///
    /// Tables accept rows only; see [`Block::is_table`].
    pub fn accepts_children(&self) -> bool {
        self.accepts_text() && !self.preserves_whitespace()
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Block::Table(_))
    }

    pub fn is_table_row(&self) -> bool {
        matches!(self, Block::TableRow(_))
    }

    /// Code blocks keep their text verbatim.
    pub fn preserves_whitespace(&self) -> bool {
        matches!(self, Block::Code(_))
    }

    pub fn as_table(&self) -> Option<&TableBlock> {
        match self {
            Block::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut TableBlock> {
        match self {
            Block::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_table_row(&self) -> Option<&TableRowBlock> {
        match self {
            Block::TableRow(row) => Some(row),
            _ => None,
        }
    }

    pub fn as_table_row_mut(&mut self) -> Option<&mut TableRowBlock> {
        match self {
            Block::TableRow(row) => Some(row),
            _ => None,
        }
    }

    /// The visible text of this block, without nested children.
    pub fn plain_text(&self) -> String {
        match self {
            Block::TableRow(row) => row
                .cells
                .iter()
                .map(|cell| plain_text_of(cell))
                .collect::<Vec<_>>()
                .join(" | "),
            Block::Embed(b) => b.url.clone(),
            Block::Bookmark(b) => b.url.clone(),
            Block::Image(b) => b.image.url().to_string(),
            Block::ChildPage(b) => b.title.clone(),
            _ => self.rich_text().map(plain_text_of).unwrap_or_default(),
        }
    }
}

// --- Wire format ---

impl Block {
    /// Serialize to the JSON object the Notion API expects.
    ///
    /// Children are nested inside the type payload, which is how the API
    /// accepts whole block trees in a single request.
    pub fn to_wire(&self) -> Result<Value, serde_json::Error> {
        let mut payload = self.payload()?;

        if !self.children().is_empty() {
            let children = self
                .children()
                .iter()
                .map(Block::to_wire)
                .collect::<Result<Vec<_>, _>>()?;
            if let Some(object) = payload.as_object_mut() {
                object.insert("children".to_string(), Value::Array(children));
            }
        }

        let mut object = Map::new();
        object.insert("object".to_string(), json!("block"));
        if let Some(id) = self.id() {
            object.insert("id".to_string(), serde_json::to_value(id)?);
            object.insert("has_children".to_string(), json!(self.has_children()));
            object.insert("archived".to_string(), json!(self.common().archived));
        }
        object.insert("type".to_string(), json!(self.block_type()));
        object.insert(self.block_type().to_string(), payload);

        Ok(Value::Object(object))
    }

    fn payload(&self) -> Result<Value, serde_json::Error> {
        let payload = match self {
            Block::Paragraph(b)
            | Block::Heading1(b)
            | Block::Heading2(b)
            | Block::Heading3(b)
            | Block::BulletedListItem(b)
            | Block::NumberedListItem(b)
            | Block::Toggle(b)
            | Block::Quote(b) => serde_json::to_value(&b.content)?,
            Block::ToDo(b) => {
                let mut payload = serde_json::to_value(&b.content)?;
                payload["checked"] = json!(b.checked);
                payload
            }
            Block::Callout(b) => {
                let mut payload = serde_json::to_value(&b.content)?;
                if let Some(icon) = &b.icon {
                    payload["icon"] = serde_json::to_value(icon)?;
                }
                payload
            }
            Block::Code(b) => json!({
                "rich_text": b.content.rich_text,
                "caption": b.caption,
                "language": b.language,
            }),
            Block::Divider(_) => json!({}),
            Block::Image(b) => {
                let mut payload = serde_json::to_value(&b.image)?;
                payload["caption"] = serde_json::to_value(&b.caption)?;
                payload
            }
            Block::Embed(b) => json!({ "url": b.url }),
            Block::Bookmark(b) => json!({ "url": b.url, "caption": b.caption }),
            Block::ChildPage(b) => json!({ "title": b.title }),
            Block::Table(b) => json!({
                "table_width": b.table_width,
                "has_column_header": b.has_column_header,
                "has_row_header": b.has_row_header,
            }),
            Block::TableRow(b) => json!({ "cells": b.cells }),
            Block::Unsupported(b) => b.payload.clone(),
        };
        Ok(payload)
    }

    /// Build a block from an API block object.
    ///
    /// Unknown types become [`Block::Unsupported`] rather than errors.
    pub fn from_wire(value: &Value) -> Result<Self, serde_json::Error> {
        use serde::de::Error;

        let block_type = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| serde_json::Error::custom("block object is missing its type"))?;
        let payload = value.get(block_type).cloned().unwrap_or_else(|| json!({}));

        let mut common = BlockCommon {
            id: match value.get("id") {
                Some(id) => Some(serde_json::from_value(id.clone())?),
                None => None,
            },
            children: Vec::new(),
            has_children: value
                .get("has_children")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            archived: value
                .get("archived")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        };
        if let Some(children) = payload.get("children").and_then(Value::as_array) {
            common.children = children
                .iter()
                .map(Block::from_wire)
                .collect::<Result<_, _>>()?;
            common.has_children |= !common.children.is_empty();
        }

        let text = || serde_json::from_value::<TextBlockContent>(payload.clone());
        let caption = || -> Result<Vec<RichTextItem>, serde_json::Error> {
            match payload.get("caption") {
                Some(caption) => serde_json::from_value(caption.clone()),
                None => Ok(Vec::new()),
            }
        };
        let string_field = |key: &str| {
            payload
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let block = match block_type {
            "paragraph" => Block::Paragraph(TextBlock { common, content: text()? }),
            "heading_1" => Block::Heading1(TextBlock { common, content: text()? }),
            "heading_2" => Block::Heading2(TextBlock { common, content: text()? }),
            "heading_3" => Block::Heading3(TextBlock { common, content: text()? }),
            "bulleted_list_item" => Block::BulletedListItem(TextBlock { common, content: text()? }),
            "numbered_list_item" => Block::NumberedListItem(TextBlock { common, content: text()? }),
            "toggle" => Block::Toggle(TextBlock { common, content: text()? }),
            "quote" => Block::Quote(TextBlock { common, content: text()? }),
            "to_do" => Block::ToDo(ToDoBlock {
                common,
                content: text()?,
                checked: payload
                    .get("checked")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            }),
            "callout" => Block::Callout(CalloutBlock {
                common,
                icon: match payload.get("icon") {
                    Some(icon) if !icon.is_null() => Some(serde_json::from_value(icon.clone())?),
                    _ => None,
                },
                content: text()?,
            }),
            "code" => Block::Code(CodeBlock {
                common,
                language: payload
                    .get("language")
                    .and_then(Value::as_str)
                    .unwrap_or(PLAIN_TEXT_LANGUAGE)
                    .to_string(),
                caption: caption()?,
                content: text()?,
            }),
            "divider" => Block::Divider(DividerBlock { common }),
            "image" => Block::Image(ImageBlock {
                common,
                image: serde_json::from_value(payload.clone())?,
                caption: caption()?,
            }),
            "embed" => Block::Embed(EmbedBlock {
                common,
                url: string_field("url"),
            }),
            "bookmark" => Block::Bookmark(BookmarkBlock {
                common,
                url: string_field("url"),
                caption: caption()?,
            }),
            "child_page" => Block::ChildPage(ChildPageBlock {
                common,
                title: string_field("title"),
            }),
            "table" => Block::Table(TableBlock {
                common,
                table_width: payload
                    .get("table_width")
                    .and_then(Value::as_u64)
                    .unwrap_or(0) as usize,
                has_column_header: payload
                    .get("has_column_header")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                has_row_header: payload
                    .get("has_row_header")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            }),
            "table_row" => Block::TableRow(TableRowBlock {
                common,
                cells: match payload.get("cells") {
                    Some(cells) => serde_json::from_value(cells.clone())?,
                    None => Vec::new(),
                },
            }),
            other => {
                log::debug!("Keeping unsupported block type '{}' verbatim", other);
                Block::Unsupported(UnsupportedBlock {
                    common,
                    block_type: other.to_string(),
                    payload,
                })
            }
        };

        Ok(block)
    }
}

impl Serialize for Block {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_wire()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Block::from_wire(&value).map_err(serde::de::Error::custom)
    }
}
