//! Heading identifiers and the table of contents
//!
//! Heading ids are assigned when the page is built, with the same slug rules
//! and collision policy as the page script's anchor generator. The script
//! keeps ids that are already present, so both sides always agree.

use super::dom::{escape_html, get_attribute, heading_level, parse_element, set_attribute};
use crate::error::Result;
use kuchikiki::NodeRef;
use log::debug;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Slug used when heading text has no ASCII letters or digits
pub const FALLBACK_SLUG: &str = "heading";

/// Paragraph text replaced by the table of contents
pub const TOC_MARKER: &str = "[TOC]";

/// Character runs collapsed to a single `-`; the page script uses the same
/// pattern
pub const SLUG_SEPARATOR_PATTERN: &str = "[^a-z0-9]+";

const HEADING_SELECTOR: &str = "h1, h2, h3, h4, h5, h6";

// ─────────────────────────────────────────────────────────────────────────────
// Slugs
// ─────────────────────────────────────────────────────────────────────────────

fn separator_runs() -> &'static Regex {
    static RUNS: OnceLock<Regex> = OnceLock::new();
    RUNS.get_or_init(|| Regex::new(SLUG_SEPARATOR_PATTERN).expect("static slug pattern is valid"))
}

/// Base slug for heading text.
///
/// Lowercased, every run of characters outside `[a-z0-9]` collapsed to one
/// `-`, leading and trailing `-` removed. Empty results become `heading`.
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let slug = separator_runs().replace_all(&lower, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// Hands out unique ids in first-seen order.
///
/// The first use of a base is the base itself; later uses get `-1`, `-2`, ...
/// skipping any id that is already taken.
#[derive(Debug, Default)]
pub struct SlugAllocator {
    counts: HashMap<String, usize>,
    used: HashSet<String>,
}

impl SlugAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, base: &str) -> String {
        let mut count = self.counts.get(base).copied().unwrap_or(0);
        let mut id = if count == 0 {
            base.to_string()
        } else {
            format!("{}-{}", base, count)
        };
        while self.used.contains(&id) {
            count += 1;
            id = format!("{}-{}", base, count);
        }
        self.counts.insert(base.to_string(), count + 1);
        self.used.insert(id.clone());
        id
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Document passes
// ─────────────────────────────────────────────────────────────────────────────

fn headings(document: &NodeRef) -> Vec<NodeRef> {
    match document.select(HEADING_SELECTOR) {
        Ok(selection) => selection.map(|h| h.as_node().clone()).collect(),
        Err(()) => Vec::new(),
    }
}

/// Give every heading a unique id, in document order.
///
/// Existing ids are used as the base instead of the text slug, so they are
/// kept unless an earlier heading already claimed them.
pub fn assign_heading_ids(document: &NodeRef) -> usize {
    let mut allocator = SlugAllocator::new();
    let mut count = 0;
    for heading in headings(document) {
        let base = get_attribute(&heading, "id")
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| slugify(&heading.text_contents()));
        let id = allocator.allocate(&base);
        set_attribute(&heading, "id", id);
        count += 1;
    }
    debug!("Assigned ids to {} headings", count);
    count
}

/// Replace every `[TOC]` paragraph with a nested list of heading links.
///
/// Headings must already carry ids. Returns the number of markers replaced.
pub fn expand_toc_markers(document: &NodeRef) -> Result<usize> {
    let markers: Vec<NodeRef> = match document.select("p") {
        Ok(selection) => selection
            .filter(|p| p.as_node().text_contents().trim() == TOC_MARKER)
            .map(|p| p.as_node().clone())
            .collect(),
        Err(()) => Vec::new(),
    };
    if markers.is_empty() {
        return Ok(0);
    }

    let entries: Vec<TocEntry> = headings(document)
        .iter()
        .filter_map(|heading| {
            Some(TocEntry {
                level: heading_level(heading)?,
                id: get_attribute(heading, "id")?,
                text: heading.text_contents().trim().to_string(),
            })
        })
        .collect();
    let markup = render_toc(&entries);

    for marker in &markers {
        let toc = parse_element(&markup)?;
        marker.insert_before(toc);
        marker.detach();
    }
    debug!(
        "Expanded {} table of contents marker(s) with {} entries",
        markers.len(),
        entries.len()
    );
    Ok(markers.len())
}

// ─────────────────────────────────────────────────────────────────────────────
// Table of contents rendering
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
struct TocEntry {
    level: usize,
    id: String,
    text: String,
}

/// Nested `<ul>` markup; deeper headings nest inside the previous item.
fn render_toc(entries: &[TocEntry]) -> String {
    let mut html = String::from("<div class=\"toc\">");
    // Heading level of each open <ul>
    let mut open: Vec<usize> = Vec::new();

    for entry in entries {
        match open.last().copied() {
            None => {
                html.push_str("<ul>");
                open.push(entry.level);
            }
            Some(current) if entry.level > current => {
                html.push_str("<ul>");
                open.push(entry.level);
            }
            Some(_) => {
                while open.len() > 1 && open.last().is_some_and(|&l| entry.level < l) {
                    html.push_str("</li></ul>");
                    open.pop();
                }
                match open.last().copied() {
                    Some(current) if entry.level > current => {
                        html.push_str("<ul>");
                        open.push(entry.level);
                    }
                    _ => html.push_str("</li>"),
                }
            }
        }
        html.push_str(&format!(
            "<li><a href=\"#{}\">{}</a>",
            escape_html(&entry.id),
            escape_html(&entry.text)
        ));
    }

    for _ in &open {
        html.push_str("</li></ul>");
    }
    html.push_str("</div>");
    html
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
