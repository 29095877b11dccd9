// tests/block_wire_format.rs
//! Blocks as the Notion API reads and writes them.

use notional::{Block, BlockId, DocumentParser, HtmlParser};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn wire(html: &str) -> Vec<Value> {
    HtmlParser::new()
        .parse(html)
        .unwrap()
        .content
        .iter()
        .map(|block| block.to_wire().unwrap())
        .collect()
}

#[test]
fn parsed_blocks_have_no_identity() {
    let blocks = wire(r#"<h2>Hi <a href="https://x.test">there</a></h2>"#);
    let heading = &blocks[0];

    assert_eq!(heading["object"], "block");
    assert_eq!(heading["type"], "heading_2");
    assert!(heading.get("id").is_none());
    assert!(heading.get("has_children").is_none());

    let runs = heading["heading_2"]["rich_text"].as_array().unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0]["type"], "text");
    assert_eq!(runs[0]["text"]["content"], "Hi ");
    assert_eq!(runs[1]["text"]["link"]["url"], "https://x.test");
    assert_eq!(runs[1]["annotations"]["bold"], false);
    assert_eq!(runs[1]["annotations"]["color"], "default");
    assert_eq!(heading["heading_2"]["color"], "default");
}

#[test]
fn children_nest_inside_the_payload() {
    let blocks = wire("<ul><li>outer<ul><li>inner</li></ul></li></ul>");
    let children = blocks[0]["bulleted_list_item"]["children"]
        .as_array()
        .unwrap();

    assert_eq!(children.len(), 1);
    assert_eq!(children[0]["type"], "bulleted_list_item");
    assert_eq!(
        children[0]["bulleted_list_item"]["rich_text"][0]["plain_text"],
        "inner"
    );
}

#[test]
fn tables_carry_rows_as_children() {
    let blocks = wire("<table><thead><tr><td>A</td><td>B</td></tr></thead><tr><td>1</td></tr></table>");
    let table = &blocks[0]["table"];

    assert_eq!(table["table_width"], 2);
    assert_eq!(table["has_column_header"], true);
    assert_eq!(table["has_row_header"], false);

    let rows = table["children"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["type"], "table_row");
    assert_eq!(rows[0]["table_row"]["cells"][1][0]["plain_text"], "B");
    assert_eq!(rows[1]["table_row"]["cells"].as_array().unwrap().len(), 2);
}

#[test]
fn code_payload_has_language_and_no_color() {
    let blocks = wire("<pre>fn main() {}</pre>");
    let code = &blocks[0]["code"];

    assert_eq!(code["language"], "plain text");
    assert_eq!(code["caption"], json!([]));
    assert!(code.get("color").is_none());
    assert_eq!(code["rich_text"][0]["plain_text"], "fn main() {}");
}

#[test]
fn leaf_blocks() {
    let blocks = wire(r#"<img src="https://x.test/a.png"><iframe src="https://x.test/v"></iframe><hr>"#);

    assert_eq!(
        blocks[0]["image"],
        json!({
            "type": "external",
            "external": { "url": "https://x.test/a.png" },
            "caption": [],
        })
    );
    assert_eq!(blocks[1]["embed"], json!({ "url": "https://x.test/v" }));
    assert_eq!(blocks[2]["divider"], json!({}));
}

#[test]
fn api_blocks_keep_their_identity() {
    let value = json!({
        "object": "block",
        "id": "c02fc1d3-db8b-45c5-a222-27595b15aea7",
        "has_children": false,
        "archived": false,
        "type": "to_do",
        "to_do": {
            "rich_text": [{
                "type": "text",
                "text": { "content": "Ship it", "link": null },
                "annotations": {
                    "bold": false, "italic": false, "strikethrough": false,
                    "underline": false, "code": false, "color": "default"
                },
                "plain_text": "Ship it",
                "href": null
            }],
            "checked": true,
            "color": "default"
        }
    });

    let block: Block = serde_json::from_value(value).unwrap();
    assert_eq!(
        block.id(),
        Some(&BlockId::parse("c02fc1d3db8b45c5a22227595b15aea7").unwrap())
    );
    assert_eq!(block.plain_text(), "Ship it");

    let back = serde_json::to_value(&block).unwrap();
    assert_eq!(back["id"], "c02fc1d3-db8b-45c5-a222-27595b15aea7");
    assert_eq!(back["to_do"]["checked"], true);
}

#[test]
fn unknown_block_types_pass_through() {
    let value = json!({
        "object": "block",
        "id": "c02fc1d3-db8b-45c5-a222-27595b15aea7",
        "type": "synced_block",
        "synced_block": { "synced_from": null }
    });

    let block = Block::from_wire(&value).unwrap();
    assert_eq!(block.block_type(), "synced_block");
    assert_eq!(
        block.to_wire().unwrap()["synced_block"],
        json!({ "synced_from": null })
    );
}

#[test]
fn parsed_document_serializes_for_output() {
    let doc = HtmlParser::new()
        .parse(r#"<title>T</title><meta name="k" content="v"><p>x</p>"#)
        .unwrap();
    let value = serde_json::to_value(&doc).unwrap();

    assert_eq!(value["title"], "T");
    assert_eq!(value["metadata"], json!({ "k": "v" }));
    assert_eq!(value["content"][0]["type"], "paragraph");
}
