// src/api/endpoints.rs
//! Typed wrappers over the blocks, pages, databases and users endpoints.

use super::pagination::{fetch_all_pages, paginate};
use super::responses::PaginatedResponse;
use super::session::Session;
use super::ApiRequest;
use crate::constants::NOTION_APPEND_BATCH_SIZE;
use crate::error::AppError;
use crate::model::{
    Block, Database, FileObject, Icon, Page, Parent, PropertySchema, PropertyValue, User,
};
use crate::parser::ParsedDocument;
use crate::types::{BlockId, DatabaseId, PageId, RichTextItem, UserId, ValidationError};
use futures::Stream;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Title used for documents that never declared one.
const UNTITLED: &str = "Untitled";

fn title_runs(title: &str) -> Vec<RichTextItem> {
    vec![RichTextItem::plain_text(title)]
}

fn wire_blocks(blocks: &[Block]) -> Result<Vec<Value>, AppError> {
    Ok(blocks
        .iter()
        .map(Block::to_wire)
        .collect::<Result<Vec<_>, _>>()?)
}

// --- Blocks ---

pub struct BlocksEndpoint<'a> {
    session: &'a Session,
}

impl<'a> BlocksEndpoint<'a> {
    pub(super) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub fn children(&self) -> BlockChildrenEndpoint<'a> {
        BlockChildrenEndpoint {
            session: self.session,
        }
    }

    pub async fn retrieve(&self, block_id: &BlockId) -> Result<Block, AppError> {
        let request = ApiRequest::get(format!("blocks/{}", block_id.to_dashed()));
        self.session.request(request).await
    }

    /// Push the block's current content back to Notion.
    ///
    /// Children are not part of an update; use [`BlockChildrenEndpoint::append`].
    pub async fn update(&self, block: &Block) -> Result<Block, AppError> {
        let block_id = block
            .id()
            .ok_or(ValidationError::EmptyField("block id"))?;

        let mut wire = block.to_wire()?;
        let block_type = block.block_type().to_string();
        let mut payload = wire
            .get_mut(&block_type)
            .map(Value::take)
            .unwrap_or_else(|| json!({}));
        if let Some(fields) = payload.as_object_mut() {
            fields.remove("children");
        }

        let mut body = Map::new();
        body.insert(block_type, payload);

        let request = ApiRequest::patch(format!("blocks/{}", block_id.to_dashed()), Value::Object(body));
        self.session.request(request).await
    }

    /// Archive a block.
    pub async fn delete(&self, block_id: &BlockId) -> Result<Block, AppError> {
        let request = ApiRequest::delete(format!("blocks/{}", block_id.to_dashed()));
        self.session.request(request).await
    }

    /// Bring an archived block back.
    pub async fn restore(&self, block_id: &BlockId) -> Result<Block, AppError> {
        let request = ApiRequest::patch(
            format!("blocks/{}", block_id.to_dashed()),
            json!({ "archived": false }),
        );
        self.session.request(request).await
    }
}

pub struct BlockChildrenEndpoint<'a> {
    session: &'a Session,
}

impl<'a> BlockChildrenEndpoint<'a> {
    /// Every direct child of a block or page.
    pub async fn list(&self, parent: &BlockId) -> Result<Vec<Block>, AppError> {
        let session = self.session;
        let endpoint = format!("blocks/{}/children", parent.to_dashed());

        let result = fetch_all_pages(
            move |page_size, cursor| {
                let request = ApiRequest::get(endpoint.clone()).with_page(page_size, cursor);
                session.request::<PaginatedResponse<Block>>(request)
            },
            None,
        )
        .await?;

        Ok(result.items)
    }

    /// Direct children, loaded page by page as the stream is polled.
    pub fn stream(&self, parent: &BlockId) -> impl Stream<Item = Result<Block, AppError>> + 'a {
        let session = self.session;
        let endpoint = format!("blocks/{}/children", parent.to_dashed());

        paginate(move |page_size, cursor| {
            let request = ApiRequest::get(endpoint.clone()).with_page(page_size, cursor);
            session.request::<PaginatedResponse<Block>>(request)
        })
    }

    /// Append blocks under a parent, split into as many requests as needed.
    ///
    /// Returns the created top-level blocks with their new IDs.
    pub async fn append(&self, parent: &BlockId, blocks: &[Block]) -> Result<Vec<Block>, AppError> {
        let endpoint = format!("blocks/{}/children", parent.to_dashed());
        let mut created = Vec::with_capacity(blocks.len());

        for batch in blocks.chunks(NOTION_APPEND_BATCH_SIZE) {
            log::info!("Appending {} block(s) to {}", batch.len(), parent);
            let request = ApiRequest::patch(
                endpoint.clone(),
                json!({ "children": wire_blocks(batch)? }),
            );
            let response: PaginatedResponse<Block> = self.session.request(request).await?;
            created.extend(response.results);
        }

        Ok(created)
    }
}

// --- Pages ---

pub struct PagesEndpoint<'a> {
    session: &'a Session,
}

impl<'a> PagesEndpoint<'a> {
    pub(super) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Create a page with a title and initial content.
    ///
    /// Content beyond the first request's limit is appended afterwards.
    pub async fn create(
        &self,
        parent: &Parent,
        title: &str,
        children: &[Block],
    ) -> Result<Page, AppError> {
        let mut properties = IndexMap::new();
        properties.insert("title".to_string(), PropertyValue::title(title));
        self.create_with_properties(parent, &properties, children)
            .await
    }

    /// Create a page from a parsed HTML document.
    pub async fn create_document(
        &self,
        parent: &Parent,
        document: &ParsedDocument,
    ) -> Result<Page, AppError> {
        let title = document.title.as_deref().unwrap_or(UNTITLED);
        log::info!(
            "Creating page '{}' with {} block(s)",
            title,
            document.content.len()
        );
        self.create(parent, title, &document.content).await
    }

    /// Add a row to a database.
    pub async fn create_row(
        &self,
        database_id: &DatabaseId,
        properties: &IndexMap<String, PropertyValue>,
    ) -> Result<Page, AppError> {
        self.create_with_properties(&Parent::database(database_id.clone()), properties, &[])
            .await
    }

    async fn create_with_properties<P: Serialize>(
        &self,
        parent: &Parent,
        properties: &P,
        children: &[Block],
    ) -> Result<Page, AppError> {
        let split = children.len().min(NOTION_APPEND_BATCH_SIZE);
        let (first, rest) = children.split_at(split);

        let mut body = json!({
            "parent": parent,
            "properties": properties,
        });
        if !first.is_empty() {
            body["children"] = Value::Array(wire_blocks(first)?);
        }

        let page: Page = self.session.request(ApiRequest::post("pages", body)).await?;

        if !rest.is_empty() {
            self.session
                .blocks()
                .children()
                .append(&page.id.cast(), rest)
                .await?;
        }

        Ok(page)
    }

    pub async fn retrieve(&self, page_id: &PageId) -> Result<Page, AppError> {
        let request = ApiRequest::get(format!("pages/{}", page_id.to_dashed()));
        self.session.request(request).await
    }

    /// Archive a page.
    pub async fn delete(&self, page_id: &PageId) -> Result<Page, AppError> {
        self.patch(page_id, json!({ "archived": true })).await
    }

    /// Bring an archived page back.
    pub async fn restore(&self, page_id: &PageId) -> Result<Page, AppError> {
        self.patch(page_id, json!({ "archived": false })).await
    }

    /// Set or clear the page icon.
    pub async fn set_icon(&self, page_id: &PageId, icon: Option<&Icon>) -> Result<Page, AppError> {
        self.patch(page_id, json!({ "icon": icon })).await
    }

    /// Set or clear the page cover.
    pub async fn set_cover(
        &self,
        page_id: &PageId,
        cover: Option<&FileObject>,
    ) -> Result<Page, AppError> {
        self.patch(page_id, json!({ "cover": cover })).await
    }

    async fn patch(&self, page_id: &PageId, body: Value) -> Result<Page, AppError> {
        let request = ApiRequest::patch(format!("pages/{}", page_id.to_dashed()), body);
        self.session.request(request).await
    }
}

// --- Databases ---

/// Filter and sort options for a database query.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatabaseQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sorts: Vec<Value>,
}

impl DatabaseQuery {
    pub fn with_filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn sorted_by(mut self, property: &str, ascending: bool) -> Self {
        let direction = if ascending { "ascending" } else { "descending" };
        self.sorts
            .push(json!({ "property": property, "direction": direction }));
        self
    }
}

pub struct DatabasesEndpoint<'a> {
    session: &'a Session,
}

impl<'a> DatabasesEndpoint<'a> {
    pub(super) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub async fn retrieve(&self, database_id: &DatabaseId) -> Result<Database, AppError> {
        let request = ApiRequest::get(format!("databases/{}", database_id.to_dashed()));
        self.session.request(request).await
    }

    /// Create a database under a page.
    pub async fn create(
        &self,
        parent: &PageId,
        title: &str,
        schema: &IndexMap<String, PropertySchema>,
    ) -> Result<Database, AppError> {
        let body = json!({
            "parent": Parent::page(parent.clone()),
            "title": title_runs(title),
            "properties": schema,
        });
        self.session
            .request(ApiRequest::post("databases", body))
            .await
    }

    /// Every page in the database matching the query.
    pub async fn query(
        &self,
        database_id: &DatabaseId,
        query: &DatabaseQuery,
    ) -> Result<Vec<Page>, AppError> {
        let session = self.session;
        let endpoint = format!("databases/{}/query", database_id.to_dashed());
        let body = serde_json::to_value(query)?;

        let result = fetch_all_pages(
            move |page_size, cursor| {
                let request =
                    ApiRequest::post(endpoint.clone(), body.clone()).with_page(page_size, cursor);
                session.request::<PaginatedResponse<Page>>(request)
            },
            None,
        )
        .await?;

        Ok(result.items)
    }

    /// Matching pages, loaded page by page as the stream is polled.
    pub fn query_stream(
        &self,
        database_id: &DatabaseId,
        query: &DatabaseQuery,
    ) -> Result<impl Stream<Item = Result<Page, AppError>> + 'a, AppError> {
        let session = self.session;
        let endpoint = format!("databases/{}/query", database_id.to_dashed());
        let body = serde_json::to_value(query)?;

        Ok(paginate(move |page_size, cursor| {
            let request =
                ApiRequest::post(endpoint.clone(), body.clone()).with_page(page_size, cursor);
            session.request::<PaginatedResponse<Page>>(request)
        }))
    }
}

// --- Users ---

pub struct UsersEndpoint<'a> {
    session: &'a Session,
}

impl<'a> UsersEndpoint<'a> {
    pub(super) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Every user in the workspace.
    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        let session = self.session;
        let result = fetch_all_pages(
            move |page_size, cursor| {
                let request = ApiRequest::get("users").with_page(page_size, cursor);
                session.request::<PaginatedResponse<User>>(request)
            },
            None,
        )
        .await?;
        Ok(result.items)
    }

    pub async fn retrieve(&self, user_id: &UserId) -> Result<User, AppError> {
        let request = ApiRequest::get(format!("users/{}", user_id.to_dashed()));
        self.session.request(request).await
    }

    /// The bot user behind the current integration token.
    pub async fn me(&self) -> Result<User, AppError> {
        self.session.request(ApiRequest::get("users/me")).await
    }
}
