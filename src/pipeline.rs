// src/pipeline.rs
//! Import pipeline stages: load a local file as Notion content, then deliver
//! it to a parent page.
//!
//! Each trait describes one capability so either stage can be swapped out
//! in tests.

use crate::api::Session;
use crate::config::{ImportConfig, InputFormat};
use crate::error::AppError;
use crate::model::Parent;
use crate::parser::{CsvDocument, CsvParser, DocumentParser, HtmlParser, ParsedDocument};
use crate::types::{DatabaseId, PageId};
use serde::Serialize;

const UNTITLED: &str = "Untitled";

/// Content read from a local file, not yet uploaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ImportedContent {
    /// An HTML document, uploaded as a page
    Document(ParsedDocument),
    /// CSV rows, uploaded as a database
    Table(CsvDocument),
}

impl ImportedContent {
    pub fn title(&self) -> Option<&str> {
        match self {
            ImportedContent::Document(document) => document.title.as_deref(),
            ImportedContent::Table(table) => table.title.as_deref(),
        }
    }

    /// Pretty-printed JSON in the API's wire format.
    pub fn to_json(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// What an upload created.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadReport {
    Page {
        page_id: PageId,
        url: String,
        blocks: usize,
    },
    Database {
        database_id: DatabaseId,
        url: String,
        rows: usize,
    },
}

impl UploadReport {
    pub fn url(&self) -> &str {
        match self {
            UploadReport::Page { url, .. } | UploadReport::Database { url, .. } => url,
        }
    }
}

/// Produces content to import.
pub trait ContentSource {
    fn load(&self) -> Result<ImportedContent, AppError>;
}

/// Sends imported content somewhere.
#[async_trait::async_trait]
pub trait ContentDelivery {
    async fn deliver(
        &self,
        parent: &PageId,
        content: &ImportedContent,
    ) -> Result<UploadReport, AppError>;
}

impl ContentSource for ImportConfig {
    fn load(&self) -> Result<ImportedContent, AppError> {
        log::info!("Reading {}", self.input.display());

        let content = match self.format {
            InputFormat::Html => {
                let mut parser = HtmlParser::new().with_max_depth(self.max_depth);
                if let Some(base) = &self.base_url {
                    parser = parser.with_base(base.as_str());
                }
                ImportedContent::Document(parser.parse_file(&self.input)?)
            }
            InputFormat::Csv => {
                let parser = CsvParser::new()
                    .with_header_row(self.header_row)
                    .with_title_column(self.title_column);
                ImportedContent::Table(parser.parse_file(&self.input)?)
            }
        };

        Ok(content)
    }
}

#[async_trait::async_trait]
impl ContentDelivery for Session {
    async fn deliver(
        &self,
        parent: &PageId,
        content: &ImportedContent,
    ) -> Result<UploadReport, AppError> {
        match content {
            ImportedContent::Document(document) => {
                let page = self
                    .pages()
                    .create_document(&Parent::page(parent.clone()), document)
                    .await?;
                Ok(UploadReport::Page {
                    page_id: page.id,
                    url: page.url,
                    blocks: document.content.len(),
                })
            }
            ImportedContent::Table(table) => {
                let title = table.title.as_deref().unwrap_or(UNTITLED);
                log::info!(
                    "Creating database '{}' with {} row(s)",
                    title,
                    table.records.len()
                );

                let database = self
                    .databases()
                    .create(parent, title, &table.schema)
                    .await?;
                for record in &table.records {
                    self.pages().create_row(&database.id, record).await?;
                }

                Ok(UploadReport::Database {
                    database_id: database.id,
                    url: database.url,
                    rows: table.records.len(),
                })
            }
        }
    }
}
