// src/parser/text.rs
//! Inline style tracking and whitespace normalization.

use crate::types::{Annotations, RichTextItem};
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

/// Inline style in effect for the subtree being visited.
///
/// Handlers derive a new value for their children and leave their own copy
/// untouched, so a style ends exactly where its element ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleState {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub code: bool,
    pub href: Option<String>,
}

/// One of the boolean style flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleFlag {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
}

impl StyleState {
    pub fn with_flag(&self, flag: StyleFlag) -> Self {
        let mut style = self.clone();
        match flag {
            StyleFlag::Bold => style.bold = true,
            StyleFlag::Italic => style.italic = true,
            StyleFlag::Underline => style.underline = true,
            StyleFlag::Strikethrough => style.strikethrough = true,
            StyleFlag::Code => style.code = true,
        }
        style
    }

    pub fn with_href(&self, href: Option<&str>) -> Self {
        Self {
            href: href.map(str::to_string),
            ..self.clone()
        }
    }

    pub fn annotations(&self) -> Annotations {
        Annotations {
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
            strikethrough: self.strikethrough,
            code: self.code,
            ..Default::default()
        }
    }

    /// Render a span of text in this style, exactly as given.
    pub fn run(&self, text: &str) -> RichTextItem {
        RichTextItem::styled(text, self.annotations(), self.href.as_deref())
    }
}

/// Collapse every whitespace run to a single space without trimming.
///
/// Returns `None` when nothing but whitespace remains. Edges are kept so
/// adjacent inline spans do not fuse together; block-level trimming is
/// done once the block is complete, see [`trim_runs`].
pub fn condense_text(text: Option<&str>) -> Option<String> {
    let text = text?;
    if text.trim().is_empty() {
        return None;
    }
    Some(WHITESPACE_RUN.replace_all(text, " ").into_owned())
}

/// Collapse whitespace runs and trim the result.
pub fn normalize_text(text: &str) -> Option<String> {
    let condensed = condense_text(Some(text))?;
    Some(condensed.trim().to_string())
}

/// True when the text holds something other than whitespace.
pub fn is_visible(text: Option<&str>) -> bool {
    text.is_some_and(|text| !text.trim().is_empty())
}

/// Strip leading whitespace from the first run and trailing whitespace from
/// the last, dropping runs left empty along the way.
pub fn trim_runs(runs: &mut Vec<RichTextItem>) {
    while let Some(first) = runs.first_mut() {
        let trimmed = first.text().trim_start();
        if trimmed.len() == first.text().len() {
            break;
        }
        if trimmed.is_empty() {
            runs.remove(0);
        } else {
            let trimmed = trimmed.to_string();
            first.set_text(trimmed);
            break;
        }
    }

    while let Some(last) = runs.last_mut() {
        let trimmed = last.text().trim_end();
        if trimmed.len() == last.text().len() {
            break;
        }
        if trimmed.is_empty() {
            runs.pop();
        } else {
            let trimmed = trimmed.to_string();
            last.set_text(trimmed);
            break;
        }
    }
}
