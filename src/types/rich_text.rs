use serde::{Deserialize, Serialize};

/// The kind of rich text content, tagged by `type` on the wire.
///
/// Each variant carries its specific data, so a "mention" without mention
/// data or an "equation" without an expression cannot be represented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RichTextContent {
    Text { text: TextContent },
    Mention { mention: serde_json::Value },
    Equation { equation: EquationData },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,
    #[serde(default)]
    pub link: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquationData {
    pub expression: String,
}

/// Styling flags carried by every rich text item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: crate::types::Color,
}

impl Annotations {
    /// True when no styling is applied at all.
    pub fn is_plain(&self) -> bool {
        self == &Self::default()
    }
}

/// A single run of rich text, in the shape the Notion API reads and writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextItem {
    #[serde(flatten)]
    pub content: RichTextContent,
    #[serde(default)]
    pub annotations: Annotations,
    #[serde(default)]
    pub plain_text: String,
    #[serde(default)]
    pub href: Option<String>,
}

impl RichTextItem {
    /// Create an unstyled text item.
    pub fn plain_text(text: &str) -> Self {
        Self::styled(text, Annotations::default(), None)
    }

    /// Create a text item with the given annotations and optional link target.
    pub fn styled(text: &str, annotations: Annotations, href: Option<&str>) -> Self {
        Self {
            content: RichTextContent::Text {
                text: TextContent {
                    content: text.to_string(),
                    link: href.map(|url| Link {
                        url: url.to_string(),
                    }),
                },
            },
            annotations,
            plain_text: text.to_string(),
            href: href.map(str::to_string),
        }
    }

    /// The displayed text of this item.
    pub fn text(&self) -> &str {
        &self.plain_text
    }

    /// Replace the text, keeping style and link.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if let RichTextContent::Text { text: content } = &mut self.content {
            content.content = text.clone();
        }
        self.plain_text = text;
    }

    /// Append to the text, keeping style and link.
    pub fn push_str(&mut self, suffix: &str) {
        let mut text = std::mem::take(&mut self.plain_text);
        text.push_str(suffix);
        self.set_text(text);
    }

    /// The link target, if this run is a hyperlink.
    pub fn link(&self) -> Option<&str> {
        match &self.content {
            RichTextContent::Text {
                text: TextContent {
                    link: Some(link), ..
                },
            } => Some(link.url.as_str()),
            _ => self.href.as_deref(),
        }
    }
}

/// Concatenate the displayed text of a run sequence.
pub fn plain_text_of(items: &[RichTextItem]) -> String {
    items.iter().map(RichTextItem::text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_styled_item_carries_link_in_both_places() {
        let item = RichTextItem::styled(
            "docs",
            Annotations {
                bold: true,
                ..Default::default()
            },
            Some("https://example.com"),
        );
        assert_eq!(item.link(), Some("https://example.com"));
        assert_eq!(item.href.as_deref(), Some("https://example.com"));
        assert!(item.annotations.bold);
    }

    #[test]
    fn test_set_text_keeps_content_in_sync() {
        let mut item = RichTextItem::plain_text("  padded ");
        item.set_text("padded");
        item.push_str("!");
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["text"]["content"], json!("padded!"));
        assert_eq!(value["plain_text"], json!("padded!"));
    }

    #[test]
    fn test_deserializes_api_shape() {
        let value = json!({
            "type": "text",
            "text": {"content": "Hello", "link": null},
            "annotations": {"bold": false, "italic": true, "strikethrough": false,
                            "underline": false, "code": false, "color": "red"},
            "plain_text": "Hello",
            "href": null
        });
        let item: RichTextItem = serde_json::from_value(value).unwrap();
        assert_eq!(item.text(), "Hello");
        assert!(item.annotations.italic);
        assert_eq!(item.annotations.color, crate::types::Color::Red);
    }

    #[test]
    fn test_deserializes_mentions() {
        let value = json!({
            "type": "mention",
            "mention": {"type": "user", "user": {"object": "user", "id": "abc"}},
            "plain_text": "@Someone",
            "href": null
        });
        let item: RichTextItem = serde_json::from_value(value).unwrap();
        assert!(matches!(item.content, RichTextContent::Mention { .. }));
        assert_eq!(item.text(), "@Someone");
    }
}
