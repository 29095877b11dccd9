// src/api/mod.rs
//! Notion API interaction: sessions, endpoints and pagination.
//!
//! Endpoints build [`ApiRequest`] values and hand them to a
//! [`NotionTransport`]; the transport only moves bytes. Response parsing and
//! retries live between the two, in [`Session`].

pub mod client;
mod endpoints;
mod pagination;
pub mod parser;
mod responses;
mod session;

pub use client::{ApiResponse, NotionHttpClient};
pub use endpoints::{
    BlockChildrenEndpoint, BlocksEndpoint, DatabaseQuery, DatabasesEndpoint, PagesEndpoint,
    UsersEndpoint,
};
pub use pagination::{fetch_all_pages, paginate, PaginationResult};
pub use responses::{ErrorResponse, PaginatedResponse};
pub use session::Session;

use crate::error::AppError;
use reqwest::Method;
use serde_json::{json, Value};

/// One call against the REST API, relative to the API root.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub endpoint: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, endpoint).with_body(body)
    }

    pub fn patch(endpoint: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PATCH, endpoint).with_body(body)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query.push((name.to_string(), value.into()));
        self
    }

    /// Add cursor parameters: query string for GET, body fields otherwise.
    pub fn with_page(mut self, page_size: u32, start_cursor: Option<String>) -> Self {
        if self.method == Method::GET {
            self = self.with_query("page_size", page_size.to_string());
            if let Some(cursor) = start_cursor {
                self = self.with_query("start_cursor", cursor);
            }
            return self;
        }

        let body = self.body.get_or_insert_with(|| json!({}));
        if let Some(fields) = body.as_object_mut() {
            fields.insert("page_size".to_string(), json!(page_size));
            if let Some(cursor) = start_cursor {
                fields.insert("start_cursor".to_string(), json!(cursor));
            }
        }
        self
    }
}

/// Sends requests to Notion and returns the raw response.
///
/// Implemented over HTTP by [`NotionHttpClient`]; tests substitute their own.
#[async_trait::async_trait]
pub trait NotionTransport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse<String>, AppError>;
}
