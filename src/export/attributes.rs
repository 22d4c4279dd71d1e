//! Attribute lists on headings and paragraphs
//!
//! A heading or paragraph whose text ends in `{#id .class key=value}` (or
//! the `{: ...}` form) has that list removed from its text and applied to
//! the element as HTML attributes:
//!
//! ```text
//! ## Installation {#install .wide data-level=2}
//! ```
//!
//! renders as `<h2 id="install" class="wide" data-level="2">Installation</h2>`.
//! A list that does not parse is left in the text untouched.

use super::dom::{add_classes, set_attribute};
use kuchikiki::NodeRef;
use log::debug;
use regex::Regex;
use std::sync::OnceLock;

const TARGET_SELECTOR: &str = "h1, h2, h3, h4, h5, h6, p";

/// A parsed `{...}` attribute list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeList {
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub pairs: Vec<(String, String)>,
}

impl AttributeList {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.classes.is_empty() && self.pairs.is_empty()
    }

    /// Apply to an element. `id` replaces any existing id; classes merge.
    pub fn apply(&self, node: &NodeRef) {
        if let Some(id) = &self.id {
            set_attribute(node, "id", id.clone());
        }
        add_classes(node, &self.classes);
        for (key, value) in &self.pairs {
            set_attribute(node, key, value.clone());
        }
    }
}

fn trailing_list() -> &'static Regex {
    static TRAILING: OnceLock<Regex> = OnceLock::new();
    TRAILING.get_or_init(|| {
        Regex::new(r"\{:?([^{}]*)\}\s*$").expect("static attribute list pattern is valid")
    })
}

fn attribute_name() -> &'static Regex {
    static NAME: OnceLock<Regex> = OnceLock::new();
    NAME.get_or_init(|| {
        Regex::new(r"^[A-Za-z_:][-A-Za-z0-9_:.]*$").expect("static attribute name pattern is valid")
    })
}

/// Parse the inside of an attribute list, e.g. `#id .a .b key="x y"`.
///
/// Returns `None` for an empty list or any token that is not an id, class,
/// or `key=value` pair.
pub fn parse_attribute_list(source: &str) -> Option<AttributeList> {
    let mut list = AttributeList::default();

    for token in tokenize(source)? {
        if let Some(id) = token.strip_prefix('#') {
            if id.is_empty() {
                return None;
            }
            list.id = Some(id.to_string());
        } else if let Some(class) = token.strip_prefix('.') {
            if class.is_empty() {
                return None;
            }
            list.classes.push(class.to_string());
        } else {
            let (key, value) = token.split_once('=')?;
            if !attribute_name().is_match(key) {
                return None;
            }
            let value = unquote(value);
            match key {
                "id" => list.id = Some(value),
                "class" => list
                    .classes
                    .extend(value.split_whitespace().map(str::to_string)),
                _ => list.pairs.push((key.to_string(), value)),
            }
        }
    }

    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}

/// Split `text` into the text before a trailing attribute list and the
/// parsed list. Trailing whitespace before the list is dropped.
pub fn split_trailing_attribute_list(text: &str) -> Option<(&str, AttributeList)> {
    let captures = trailing_list().captures(text)?;
    let whole = captures.get(0)?;
    let list = parse_attribute_list(captures.get(1)?.as_str())?;
    Some((text[..whole.start()].trim_end(), list))
}

/// Apply trailing attribute lists on every heading and paragraph.
///
/// Only the element's last child is inspected, and only when it is text, so
/// braces inside code spans or links are never touched. Returns the number
/// of elements changed.
pub fn apply_attribute_lists(document: &NodeRef) -> usize {
    let targets: Vec<NodeRef> = match document.select(TARGET_SELECTOR) {
        Ok(selection) => selection.map(|e| e.as_node().clone()).collect(),
        Err(()) => return 0,
    };

    let mut applied = 0;
    for element in targets {
        let Some(last) = element.last_child() else {
            continue;
        };
        let Some(text) = last.as_text() else {
            continue;
        };

        let split = {
            let current = text.borrow();
            split_trailing_attribute_list(&current)
                .map(|(kept, list)| (kept.to_string(), list))
        };
        if let Some((kept, list)) = split {
            *text.borrow_mut() = kept;
            list.apply(&element);
            applied += 1;
        }
    }

    if applied > 0 {
        debug!("Applied {} attribute list(s)", applied);
    }
    applied
}

/// Whitespace-separated tokens; quoted values may contain whitespace.
fn tokenize(source: &str) -> Option<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in source.chars() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote = None;
                }
            }
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None => {
                if (c == '"' || c == '\'') && current.ends_with('=') {
                    quote = Some(c);
                }
                current.push(c);
            }
        }
    }

    if quote.is_some() {
        return None;
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Some(tokens)
}

fn unquote(value: &str) -> String {
    for q in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(q) && value.ends_with(q) {
            return value[1..value.len() - 1].to_string();
        }
    }
    value.to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
