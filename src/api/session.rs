// src/api/session.rs
//! An authenticated connection to the Notion API.

use super::endpoints::{BlocksEndpoint, DatabasesEndpoint, PagesEndpoint, UsersEndpoint};
use super::pagination::fetch_all_pages;
use super::parser::parse_api_response;
use super::responses::PaginatedResponse;
use super::{ApiRequest, NotionHttpClient, NotionTransport};
use crate::error::AppError;
use crate::error_recovery::{retry_with_backoff, RetryPolicy};
use crate::model::Record;
use crate::types::ApiKey;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;

/// Entry point to every endpoint.
///
/// Cloning is cheap; clones share the underlying transport.
#[derive(Clone)]
pub struct Session {
    transport: Arc<dyn NotionTransport>,
    retry: RetryPolicy,
}

impl Session {
    /// Connect over HTTPS with an integration token.
    pub fn connect(api_key: &ApiKey) -> Result<Self, AppError> {
        log::debug!("Connecting to Notion with key {}", api_key);
        Ok(Self::with_transport(Arc::new(NotionHttpClient::new(api_key)?)))
    }

    pub fn with_transport(transport: Arc<dyn NotionTransport>) -> Self {
        Self {
            transport,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Send a request, retrying transient failures, and parse the reply.
    pub async fn request<T>(&self, request: ApiRequest) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let transport = &self.transport;
        let request = &request;

        retry_with_backoff(
            move || async move {
                let response = transport.send(request).await?;
                parse_api_response(response)
            },
            self.retry,
        )
        .await
    }

    pub fn blocks(&self) -> BlocksEndpoint<'_> {
        BlocksEndpoint::new(self)
    }

    pub fn pages(&self) -> PagesEndpoint<'_> {
        PagesEndpoint::new(self)
    }

    pub fn databases(&self) -> DatabasesEndpoint<'_> {
        DatabasesEndpoint::new(self)
    }

    pub fn users(&self) -> UsersEndpoint<'_> {
        UsersEndpoint::new(self)
    }

    /// Search pages and databases shared with the integration.
    pub async fn search(&self, query: Option<&str>) -> Result<Vec<Record>, AppError> {
        let body = match query {
            Some(query) => json!({ "query": query }),
            None => json!({}),
        };

        let result = fetch_all_pages(
            move |page_size, cursor| {
                let request = ApiRequest::post("search", body.clone()).with_page(page_size, cursor);
                self.request::<PaginatedResponse<Record>>(request)
            },
            None,
        )
        .await?;

        Ok(result.items)
    }

    /// Whether the session can reach the API with its credentials.
    pub async fn ping(&self) -> bool {
        match self.users().me().await {
            Ok(me) => {
                log::info!("Connected as {}", me.name.as_deref().unwrap_or("unnamed user"));
                true
            }
            Err(e) => {
                log::warn!("Ping failed: {}", e);
                false
            }
        }
    }
}
