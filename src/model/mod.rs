mod block;
pub mod blocks;
pub mod common;

pub use block::Block;
pub use blocks::*;
pub use common::*;

use crate::types::{plain_text_of, BlockId, DatabaseId, PageId, RichTextItem, UserId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parent reference with typed IDs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Parent {
    #[serde(rename = "page_id")]
    Page { page_id: PageId },
    #[serde(rename = "database_id")]
    Database { database_id: DatabaseId },
    #[serde(rename = "block_id")]
    Block { block_id: BlockId },
    #[serde(rename = "workspace")]
    Workspace { workspace: bool },
}

impl Parent {
    pub fn page(page_id: PageId) -> Self {
        Parent::Page { page_id }
    }

    pub fn database(database_id: DatabaseId) -> Self {
        Parent::Database { database_id }
    }
}

/// A Notion page as returned by the pages endpoint.
///
/// Property values stay as raw JSON; the set of property types is open-ended
/// and only titles are interpreted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    #[serde(default)]
    pub url: String,
    pub parent: Parent,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub created_time: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub last_edited_time: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub icon: Option<Icon>,
    #[serde(default)]
    pub cover: Option<FileObject>,
    #[serde(default)]
    pub properties: IndexMap<String, Value>,
}

impl Page {
    /// The page title, read from whichever property has type `title`.
    pub fn title(&self) -> String {
        self.properties
            .values()
            .find(|value| value.get("type").and_then(Value::as_str) == Some("title"))
            .and_then(|value| value.get("title"))
            .and_then(|title| serde_json::from_value::<Vec<RichTextItem>>(title.clone()).ok())
            .map(|items| plain_text_of(&items))
            .unwrap_or_default()
    }
}

/// A Notion database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub id: DatabaseId,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: Vec<RichTextItem>,
    pub parent: Parent,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub properties: IndexMap<String, Value>,
}

impl Database {
    pub fn title(&self) -> String {
        plain_text_of(&self.title)
    }
}

/// A workspace member or integration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(flatten)]
    pub kind: Option<UserKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserKind {
    Person { person: Value },
    Bot { bot: Value },
}

impl User {
    pub fn is_bot(&self) -> bool {
        matches!(self.kind, Some(UserKind::Bot { .. }))
    }

    /// Email address, for people who shared one with the integration.
    pub fn email(&self) -> Option<&str> {
        match &self.kind {
            Some(UserKind::Person { person }) => person.get("email").and_then(Value::as_str),
            _ => None,
        }
    }
}

/// Any object returned by an endpoint that mixes object types, such as search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "object", rename_all = "snake_case")]
pub enum Record {
    Page(Page),
    Database(Database),
    Block(Value),
    User(User),
}

impl Record {
    pub fn object_type(&self) -> &str {
        match self {
            Record::Page(_) => "page",
            Record::Database(_) => "database",
            Record::Block(_) => "block",
            Record::User(_) => "user",
        }
    }
}

/// Column definition for a database created from tabular data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertySchema {
    Title {},
    RichText {},
}

/// A single cell of a database row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    Title(Vec<RichTextItem>),
    RichText(Vec<RichTextItem>),
}

impl PropertyValue {
    pub fn title(text: &str) -> Self {
        PropertyValue::Title(Self::runs(text))
    }

    pub fn rich_text(text: &str) -> Self {
        PropertyValue::RichText(Self::runs(text))
    }

    fn runs(text: &str) -> Vec<RichTextItem> {
        if text.is_empty() {
            Vec::new()
        } else {
            vec![RichTextItem::plain_text(text)]
        }
    }

    pub fn plain_text(&self) -> String {
        match self {
            PropertyValue::Title(items) | PropertyValue::RichText(items) => plain_text_of(items),
        }
    }
}
