// src/parser/rules.rs
//! Tag name to rule dispatch table.

use super::text::StyleFlag;
use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bulleted,
    Numbered,
}

/// What the parser does when it meets a tag.
///
/// Tags missing from the table are rendered as [`Rule::Transparent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Style(StyleFlag),
    Link,
    Base,
    Heading(u8),
    Paragraph,
    DefinitionList,
    Transparent,
    Quote,
    Code,
    LineBreak,
    Divider,
    List(ListKind),
    Table,
    TableHead,
    TableRow,
    TableCell,
    Image,
    Embed,
    Meta,
    Title,
}

static RULES: Lazy<HashMap<&'static str, Rule>> = Lazy::new(|| {
    use Rule::*;

    HashMap::from([
        ("b", Style(StyleFlag::Bold)),
        ("strong", Style(StyleFlag::Bold)),
        ("i", Style(StyleFlag::Italic)),
        ("em", Style(StyleFlag::Italic)),
        ("u", Style(StyleFlag::Underline)),
        ("ins", Style(StyleFlag::Underline)),
        ("del", Style(StyleFlag::Strikethrough)),
        ("s", Style(StyleFlag::Strikethrough)),
        ("strike", Style(StyleFlag::Strikethrough)),
        ("code", Style(StyleFlag::Code)),
        ("kbd", Style(StyleFlag::Code)),
        ("samp", Style(StyleFlag::Code)),
        ("var", Style(StyleFlag::Code)),
        ("a", Link),
        ("base", Base),
        ("h1", Heading(1)),
        ("h2", Heading(2)),
        ("h3", Heading(3)),
        ("h4", Heading(4)),
        ("h5", Heading(5)),
        ("h6", Heading(6)),
        ("p", Paragraph),
        ("dl", DefinitionList),
        ("div", Transparent),
        ("span", Transparent),
        ("object", Transparent),
        ("html", Transparent),
        ("head", Transparent),
        ("body", Transparent),
        ("hgroup", Transparent),
        ("dt", Transparent),
        ("dd", Transparent),
        ("tbody", Transparent),
        ("tfoot", Transparent),
        ("li", Transparent),
        ("blockquote", Quote),
        ("pre", Code),
        ("tt", Code),
        ("br", LineBreak),
        ("hr", Divider),
        ("ul", List(ListKind::Bulleted)),
        ("menu", List(ListKind::Bulleted)),
        ("ol", List(ListKind::Numbered)),
        ("table", Table),
        ("thead", TableHead),
        ("tr", TableRow),
        ("td", TableCell),
        ("th", TableCell),
        ("img", Image),
        ("iframe", Embed),
        ("meta", Meta),
        ("title", Title),
    ])
});

/// Look up the rule for a lowercase tag name.
pub fn rule_for(tag: &str) -> Rule {
    RULES.get(tag).copied().unwrap_or(Rule::Transparent)
}

/// Every tag with an explicit rule, sorted.
pub fn supported_tags() -> Vec<&'static str> {
    let mut tags: Vec<_> = RULES.keys().copied().collect();
    tags.sort_unstable();
    tags
}
