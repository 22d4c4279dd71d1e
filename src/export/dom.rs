//! HTML tree helpers over kuchikiki
//!
//! Every stage of the export pipeline that touches parsed HTML goes through
//! this module: parsing documents and fragments, reading and writing
//! attributes, and serializing back to text.
//!
//! # Leading whitespace
//!
//! The HTML parser drops a single newline directly after a `<pre>` start tag.
//! Highlighted code is therefore re-parsed through
//! [`parse_preformatted_fragment`], which feeds the parser a sacrificial
//! newline so the code's own first character always survives.

use crate::error::{Error, Result};
use kuchikiki::traits::*;
use kuchikiki::NodeRef;

// ─────────────────────────────────────────────────────────────────────────────
// Parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Parse a full document or a body fragment into a tree.
///
/// The parser always produces an `html`/`head`/`body` skeleton around
/// fragment input.
pub fn parse_document(html: &str) -> NodeRef {
    kuchikiki::parse_html().one(html)
}

/// Parse markup as the content of a `<pre>` element and return its children,
/// detached and in order.
///
/// The returned nodes reproduce `markup` exactly, including leading
/// newlines, spaces and tabs.
pub fn parse_preformatted_fragment(markup: &str) -> Result<Vec<NodeRef>> {
    let document = parse_document(&format!("<pre>\n{}</pre>", markup));
    let pre = document
        .select_first("pre")
        .map_err(|_| Error::Render("preformatted container vanished while parsing".to_string()))?;
    let children: Vec<NodeRef> = pre.as_node().children().collect();
    for child in &children {
        child.detach();
    }
    Ok(children)
}

/// Parse markup for a single element and return it, detached.
///
/// Used to build replacement nodes from literal HTML so element creation
/// goes through the same parser as everything else.
pub fn parse_element(markup: &str) -> Result<NodeRef> {
    let document = parse_document(markup);
    let body = document
        .select_first("body")
        .map_err(|_| Error::Render("parsed fragment has no body".to_string()))?;
    let element = body
        .as_node()
        .children()
        .find(|child| child.as_element().is_some())
        .ok_or_else(|| Error::Render(format!("no element in fragment '{}'", markup)))?;
    element.detach();
    Ok(element)
}

// ─────────────────────────────────────────────────────────────────────────────
// Attributes
// ─────────────────────────────────────────────────────────────────────────────

/// Lowercase tag name of an element node.
pub fn tag_name(node: &NodeRef) -> Option<String> {
    node.as_element()
        .map(|element| element.name.local.to_string().to_ascii_lowercase())
}

/// Value of an attribute, if the node is an element that carries it.
pub fn get_attribute(node: &NodeRef, name: &str) -> Option<String> {
    node.as_element()
        .and_then(|element| element.attributes.borrow().get(name).map(str::to_string))
}

/// Set an attribute on an element node. Text and comment nodes are ignored.
pub fn set_attribute(node: &NodeRef, name: &str, value: impl Into<String>) {
    if let Some(element) = node.as_element() {
        element.attributes.borrow_mut().insert(name, value.into());
    }
}

/// Whitespace-separated tokens of the `class` attribute.
pub fn class_tokens(node: &NodeRef) -> Vec<String> {
    get_attribute(node, "class")
        .map(|classes| classes.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Append classes to the `class` attribute, skipping ones already present.
pub fn add_classes<S: AsRef<str>>(node: &NodeRef, classes: &[S]) {
    let mut tokens = class_tokens(node);
    for class in classes {
        let class = class.as_ref();
        if !class.is_empty() && !tokens.iter().any(|t| t == class) {
            tokens.push(class.to_string());
        }
    }
    if !tokens.is_empty() {
        set_attribute(node, "class", tokens.join(" "));
    }
}

/// Heading level for `h1`..`h6`, `None` for anything else.
pub fn heading_level(node: &NodeRef) -> Option<usize> {
    let name = tag_name(node)?;
    let mut chars = name.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some('h'), Some(digit @ '1'..='6'), None) => digit.to_digit(10).map(|d| d as usize),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Serialization
// ─────────────────────────────────────────────────────────────────────────────

/// Serialize a node, including the node itself, to a string.
pub fn serialize_node(node: &NodeRef) -> Result<String> {
    let mut out = Vec::new();
    node.serialize(&mut out)?;
    String::from_utf8(out).map_err(|e| Error::Render(e.to_string()))
}

/// Serialize the children of `<body>`, without the `<body>` tags.
///
/// Nodes are serialized one by one as parsed, so nothing is re-indented.
pub fn body_inner_html(document: &NodeRef) -> Result<String> {
    let body = document
        .select_first("body")
        .map_err(|_| Error::Render("document has no body".to_string()))?;
    let mut html = String::new();
    for child in body.as_node().children() {
        html.push_str(&serialize_node(&child)?);
    }
    Ok(html)
}

/// Move nodes the parser kept outside `<body>` into it.
///
/// Comments before `<html>` go to the start of the body. Comments and
/// whitespace after `</body>` or `</html>` go to its end, in source order.
/// The doctype and `<head>` are left alone.
pub fn hoist_stray_nodes(document: &NodeRef) {
    let Ok(body) = document.select_first("body") else {
        return;
    };
    let body = body.as_node().clone();
    let Some(html) = document
        .children()
        .find(|child| tag_name(child).as_deref() == Some("html"))
    else {
        return;
    };

    let mut leading = Vec::new();
    let mut trailing = Vec::new();
    let mut after_body = false;
    for child in html.children() {
        if child == body {
            after_body = true;
        } else if after_body {
            trailing.push(child);
        }
    }
    let mut after_html = false;
    for child in document.children() {
        if child == html {
            after_html = true;
        } else if child.as_doctype().is_some() {
            continue;
        } else if after_html {
            trailing.push(child);
        } else {
            leading.push(child);
        }
    }

    let first = body.first_child();
    for node in leading {
        match &first {
            Some(first) => first.insert_before(node),
            None => body.append(node),
        }
    }
    for node in trailing {
        body.append(node);
    }
}

/// HTML-escape text for use in element content or a quoted attribute.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
