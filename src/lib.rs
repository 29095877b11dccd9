// src/lib.rs
//! notional library: a typed Notion API client with an HTML and CSV importer.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `ParseError`, `ValidationError`
//! - **Configuration**: `ImportConfig`, `CommandLineInput`
//! - **Domain model**: `Block`, `Page`, `Database`, `User`, etc.
//! - **Domain types**: `PageId`, `ApiKey`, `RichTextItem`, etc.
//! - **Parsing**: `HtmlParser`, `CsvParser`, `Element`
//! - **API client**: `Session` and its endpoints, `NotionTransport`

pub mod api;
mod config;
mod constants;
mod error;
mod error_recovery;
pub mod model;
pub mod parser;
mod pipeline;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, NotionErrorCode};
pub use crate::error_recovery::{retry_with_backoff, RetryPolicy};
pub use crate::parser::{ParseError, StructureError};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, ImportConfig, InputFormat, UploadTarget};
pub use crate::constants::{
    HTML_MAX_NESTING_DEPTH, NOTION_API_BASE_URL, NOTION_API_KEY_ENV, NOTION_API_VERSION,
};

// --- Domain Model ---
pub use crate::model::{
    Block, BlockCommon, BookmarkBlock, CalloutBlock, ChildPageBlock, CodeBlock, Database,
    DividerBlock, EmbedBlock, ExternalFile, FileObject, Icon, ImageBlock, NotionFile, Page,
    Parent, PropertySchema, PropertyValue, Record, TableBlock, TableRowBlock, TextBlock,
    TextBlockContent, ToDoBlock, UnsupportedBlock, User, UserKind,
};

// --- Domain Types ---
pub use crate::types::{
    Annotations, ApiKey, BlockId, Color, DatabaseId, Id, PageId, RichTextItem, UserId,
    ValidatedUrl,
};

// --- Parsing ---
pub use crate::parser::{
    CsvDocument, CsvParser, DocumentParser, Element, HtmlParser, ParsedDocument,
};

// --- API Client ---
pub use crate::api::{
    ApiRequest, ApiResponse, DatabaseQuery, NotionHttpClient, NotionTransport, Session,
};

// --- Pipeline ---
pub use crate::pipeline::{ContentDelivery, ContentSource, ImportedContent, UploadReport};
