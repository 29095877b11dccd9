// tests/session_endpoints.rs
//! Endpoint behavior against a scripted transport.

use async_trait::async_trait;
use futures::TryStreamExt;
use notional::api::PaginatedResponse;
use notional::{
    ApiRequest, ApiResponse, AppError, Block, BlockId, ContentDelivery, CsvParser, DatabaseId,
    DatabaseQuery, DocumentParser, HtmlParser, ImportedContent, NotionErrorCode, NotionTransport,
    PageId, Parent, RetryPolicy, Session, UploadReport, ValidationError,
};
use pretty_assertions::assert_eq;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const PARENT: &str = "11111111-1111-1111-1111-111111111111";
const PAGE: &str = "22222222-2222-2222-2222-222222222222";
const DATABASE: &str = "33333333-3333-3333-3333-333333333333";

/// Replays canned responses in order and records every request.
#[derive(Default)]
struct ScriptedTransport {
    responses: Mutex<VecDeque<(StatusCode, Value)>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    fn new(responses: Vec<(StatusCode, Value)>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotionTransport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse<String>, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted response left");
        Ok(ApiResponse {
            data: body.to_string(),
            status,
            url: format!("https://api.test/v1/{}", request.endpoint),
        })
    }
}

fn session(transport: &Arc<ScriptedTransport>) -> Session {
    Session::with_transport(transport.clone()).with_retry_policy(RetryPolicy::none())
}

fn ok(body: Value) -> (StatusCode, Value) {
    (StatusCode::OK, body)
}

fn page_json(id: &str) -> Value {
    json!({
        "object": "page",
        "id": id,
        "url": format!("https://www.notion.so/{}", id.replace('-', "")),
        "parent": { "type": "page_id", "page_id": PARENT },
        "properties": {
            "title": { "id": "title", "type": "title", "title": [
                { "type": "text", "text": { "content": "Imported", "link": null }, "plain_text": "Imported" }
            ]}
        }
    })
}

fn list(results: Vec<Value>, next_cursor: Option<&str>) -> Value {
    json!({
        "object": "list",
        "results": results,
        "next_cursor": next_cursor,
        "has_more": next_cursor.is_some(),
    })
}

fn paragraph_json(text: &str) -> Value {
    json!({
        "object": "block",
        "id": "44444444-4444-4444-4444-444444444444",
        "type": "paragraph",
        "paragraph": {
            "rich_text": [{ "type": "text", "text": { "content": text, "link": null }, "plain_text": text }],
            "color": "default"
        }
    })
}

#[tokio::test]
async fn create_document_posts_page_with_children() {
    let transport = ScriptedTransport::new(vec![ok(page_json(PAGE))]);
    let doc = HtmlParser::new()
        .parse("<title>Imported</title><h1>Hello</h1><p>World</p>")
        .unwrap();

    let page = session(&transport)
        .pages()
        .create_document(&Parent::page(PageId::parse(PARENT).unwrap()), &doc)
        .await
        .unwrap();

    assert_eq!(page.title(), "Imported");

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(requests[0].endpoint, "pages");

    let body = requests[0].body.as_ref().unwrap();
    assert_eq!(body["parent"], json!({ "type": "page_id", "page_id": PARENT }));
    assert_eq!(body["properties"]["title"]["title"][0]["plain_text"], "Imported");
    let children = body["children"].as_array().unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0]["type"], "heading_1");
}

#[tokio::test]
async fn long_documents_are_appended_in_batches() {
    let transport = ScriptedTransport::new(vec![
        ok(page_json(PAGE)),
        ok(list(vec![], None)),
        ok(list(vec![], None)),
    ]);
    let html: String = (0..250).map(|n| format!("<p>{}</p>", n)).collect();
    let doc = HtmlParser::new().parse(&html).unwrap();

    session(&transport)
        .pages()
        .create_document(&Parent::page(PageId::parse(PARENT).unwrap()), &doc)
        .await
        .unwrap();

    let requests = transport.requests();
    let sizes: Vec<usize> = requests
        .iter()
        .map(|request| {
            request.body.as_ref().unwrap()["children"]
                .as_array()
                .unwrap()
                .len()
        })
        .collect();
    assert_eq!(sizes, vec![100, 100, 50]);

    assert_eq!(requests[1].method, Method::PATCH);
    assert_eq!(requests[1].endpoint, format!("blocks/{}/children", PAGE));
    assert_eq!(
        requests[2].body.as_ref().unwrap()["children"][0]["paragraph"]["rich_text"][0]["plain_text"],
        "200"
    );
}

#[tokio::test]
async fn children_list_follows_cursors() {
    let transport = ScriptedTransport::new(vec![
        ok(list(vec![paragraph_json("one")], Some("cursor-2"))),
        ok(list(vec![paragraph_json("two")], None)),
    ]);

    let blocks = session(&transport)
        .blocks()
        .children()
        .list(&BlockId::parse(PAGE).unwrap())
        .await
        .unwrap();

    let texts: Vec<String> = blocks.iter().map(Block::plain_text).collect();
    assert_eq!(texts, vec!["one", "two"]);

    let requests = transport.requests();
    assert_eq!(requests[0].method, Method::GET);
    assert!(requests[0]
        .query
        .iter()
        .all(|(name, _)| name != "start_cursor"));
    assert!(requests[1]
        .query
        .contains(&("start_cursor".to_string(), "cursor-2".to_string())));
}

#[tokio::test]
async fn query_stream_loads_lazily() {
    let transport = ScriptedTransport::new(vec![
        ok(list(vec![page_json(PAGE)], Some("next"))),
        ok(list(vec![page_json(PAGE)], None)),
    ]);
    let session = session(&transport);
    let query = DatabaseQuery::default().sorted_by("Name", true);

    let pages: Vec<_> = session
        .databases()
        .query_stream(&DatabaseId::parse(DATABASE).unwrap(), &query)
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(pages.len(), 2);
    let requests = transport.requests();
    assert_eq!(requests[0].endpoint, format!("databases/{}/query", DATABASE));
    assert_eq!(
        requests[0].body.as_ref().unwrap()["sorts"],
        json!([{ "property": "Name", "direction": "ascending" }])
    );
    assert_eq!(requests[1].body.as_ref().unwrap()["start_cursor"], "next");
}

#[tokio::test]
async fn api_errors_are_typed() {
    let transport = ScriptedTransport::new(vec![(
        StatusCode::NOT_FOUND,
        json!({
            "object": "error",
            "status": 404,
            "code": "object_not_found",
            "message": "Could not find page"
        }),
    )]);

    let err = session(&transport)
        .pages()
        .retrieve(&PageId::parse(PAGE).unwrap())
        .await
        .unwrap_err();

    assert_eq!(err.notion_code(), Some(&NotionErrorCode::ObjectNotFound));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn transient_failures_are_retried() {
    let transport = ScriptedTransport::new(vec![
        (
            StatusCode::SERVICE_UNAVAILABLE,
            json!({ "object": "error", "status": 503, "code": "service_unavailable", "message": "busy" }),
        ),
        ok(page_json(PAGE)),
    ]);
    let session = Session::with_transport(transport.clone()).with_retry_policy(RetryPolicy {
        max_attempts: 3,
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(2),
    });

    let page = session
        .pages()
        .retrieve(&PageId::parse(PAGE).unwrap())
        .await
        .unwrap();

    assert_eq!(page.id, PageId::parse(PAGE).unwrap());
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn archive_and_restore_patch_the_page() {
    let transport = ScriptedTransport::new(vec![ok(page_json(PAGE)), ok(page_json(PAGE))]);
    let session = session(&transport);
    let page_id = PageId::parse(PAGE).unwrap();

    session.pages().delete(&page_id).await.unwrap();
    session.pages().restore(&page_id).await.unwrap();

    let bodies: Vec<Value> = transport
        .requests()
        .into_iter()
        .map(|request| {
            assert_eq!(request.method, Method::PATCH);
            request.body.unwrap()
        })
        .collect();
    assert_eq!(bodies, vec![json!({ "archived": true }), json!({ "archived": false })]);
}

#[tokio::test]
async fn block_update_requires_an_id() {
    let transport = ScriptedTransport::new(vec![]);
    let err = session(&transport)
        .blocks()
        .update(&Block::paragraph().with_text("local"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::ValidationError(ValidationError::EmptyField(_))
    ));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn block_update_sends_only_the_payload() {
    let transport = ScriptedTransport::new(vec![ok(paragraph_json("changed"))]);
    let block: Block = serde_json::from_value(paragraph_json("changed")).unwrap();

    session(&transport).blocks().update(&block).await.unwrap();

    let request = &transport.requests()[0];
    assert_eq!(request.method, Method::PATCH);
    let body = request.body.as_ref().unwrap();
    assert_eq!(body.as_object().unwrap().len(), 1);
    assert_eq!(body["paragraph"]["rich_text"][0]["plain_text"], "changed");
}

#[tokio::test]
async fn csv_delivery_creates_database_and_rows() {
    let transport = ScriptedTransport::new(vec![
        ok(json!({
            "object": "database",
            "id": DATABASE,
            "url": "https://www.notion.so/db",
            "title": [],
            "parent": { "type": "page_id", "page_id": PARENT },
            "properties": {}
        })),
        ok(page_json(PAGE)),
        ok(page_json(PAGE)),
    ]);
    let table = CsvParser::new()
        .parse_named("Name,Role\nAda,Engineer\nGrace,Admiral\n", Some("crew.csv"))
        .unwrap();

    let report = session(&transport)
        .deliver(&PageId::parse(PARENT).unwrap(), &ImportedContent::Table(table))
        .await
        .unwrap();

    assert_eq!(
        report,
        UploadReport::Database {
            database_id: DatabaseId::parse(DATABASE).unwrap(),
            url: "https://www.notion.so/db".to_string(),
            rows: 2,
        }
    );

    let requests = transport.requests();
    assert_eq!(requests.len(), 3);
    let create = requests[0].body.as_ref().unwrap();
    assert_eq!(requests[0].endpoint, "databases");
    assert_eq!(create["title"][0]["plain_text"], "crew.csv");
    assert_eq!(
        create["properties"],
        json!({ "Name": { "title": {} }, "Role": { "rich_text": {} } })
    );

    let row = requests[2].body.as_ref().unwrap();
    assert_eq!(row["parent"], json!({ "type": "database_id", "database_id": DATABASE }));
    assert_eq!(row["properties"]["Name"]["title"][0]["plain_text"], "Grace");
    assert!(row.get("children").is_none());
}

#[tokio::test]
async fn users_and_ping() {
    let me = json!({
        "object": "user",
        "id": "55555555-5555-5555-5555-555555555555",
        "name": "Importer",
        "type": "bot",
        "bot": {}
    });
    let transport = ScriptedTransport::new(vec![
        ok(me.clone()),
        ok(list(vec![me.clone()], None)),
        (
            StatusCode::UNAUTHORIZED,
            json!({ "object": "error", "status": 401, "code": "unauthorized", "message": "bad token" }),
        ),
    ]);
    let session = session(&transport);

    assert!(session.ping().await);
    let users = session.users().list().await.unwrap();
    assert_eq!(users.len(), 1);
    assert!(users[0].is_bot());
    assert!(!session.ping().await);

    assert!(transport
        .requests()
        .iter()
        .all(|request| request.method == Method::GET));
}

#[tokio::test]
async fn search_mixes_object_types() {
    let transport = ScriptedTransport::new(vec![ok(list(
        vec![
            page_json(PAGE),
            json!({
                "object": "database",
                "id": DATABASE,
                "title": [],
                "parent": { "type": "page_id", "page_id": PARENT },
                "properties": {}
            }),
        ],
        None,
    ))]);

    let records = session(&transport).search(Some("roadmap")).await.unwrap();
    let kinds: Vec<&str> = records.iter().map(|record| record.object_type()).collect();
    assert_eq!(kinds, vec!["page", "database"]);

    let body = transport.requests()[0].body.clone().unwrap();
    assert_eq!(body["query"], "roadmap");
    assert_eq!(body["page_size"], 100);
}

#[test]
fn paginated_envelope_defaults() {
    let page: PaginatedResponse<Value> = serde_json::from_value(json!({ "results": [] })).unwrap();
    assert!(!page.has_more);
    assert!(page.next_cursor.is_none());
}
