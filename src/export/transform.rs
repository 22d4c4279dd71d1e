//! Code block post-processing
//!
//! [`CodeBlockTransformer`] takes the raw HTML produced by the Markdown
//! renderer and rewrites it in one pass over a parsed tree:
//!
//! 1. trailing attribute lists are applied to headings and paragraphs
//! 2. headings get stable ids and `[TOC]` markers are expanded
//! 3. every `<pre>` holding a `<code>` is re-highlighted and replaced by a
//!    `code-header` plus a `<pre class="highlight">` block
//! 4. images get `loading="lazy"` and a placeholder `alt`
//!
//! An unknown fence language is never an error. It is highlighted as plain
//! text and labelled `text`.

use super::assets::COPY_ICON_SVG;
use super::attributes::apply_attribute_lists;
use super::css::HIGHLIGHT_CLASS;
use super::dom::{
    body_inner_html, class_tokens, escape_html, get_attribute, hoist_stray_nodes,
    parse_document, parse_element, parse_preformatted_fragment, set_attribute,
};
use super::headings::{assign_heading_ids, expand_toc_markers};
use crate::error::{Error, Result};
use crate::markdown::{get_highlighter, HighlightStyle, SyntaxHighlighter, PLAIN_TEXT_LANGUAGE};
use crate::theme::{Palettes, ThemeMode};
use kuchikiki::NodeRef;
use log::{debug, info, warn};
use syntect::highlighting::Theme;

/// Class prefix that declares a code block's language
pub const LANGUAGE_CLASS_PREFIX: &str = "language-";

/// Alt text given to images that have none
pub const PLACEHOLDER_ALT: &str = "Image";

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// What the transformer does besides rewriting code blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    /// Mode whose palette is used for inline-styled highlighting
    pub theme: ThemeMode,
    pub palettes: Palettes,
    pub style: HighlightStyle,
    /// Apply `{#id .class}` lists on headings and paragraphs
    pub attribute_lists: bool,
    /// Assign heading ids at build time
    pub heading_ids: bool,
    /// Expand `[TOC]` paragraphs. Implies heading ids.
    pub table_of_contents: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Light,
            palettes: Palettes::default(),
            style: HighlightStyle::Classes,
            attribute_lists: true,
            heading_ids: true,
            table_of_contents: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Code Blocks
// ─────────────────────────────────────────────────────────────────────────────

/// A `<pre>` element that holds a `<code>` element.
#[derive(Debug, Clone)]
pub struct CodeBlock {
    /// The `<pre>` element that gets replaced
    pub container: NodeRef,
    /// Declared language, or `text` when none is declared
    pub language: String,
    /// Full text of the code, including text inside nested markup
    pub text: String,
}

impl CodeBlock {
    /// All code blocks in document order. `<pre>` elements without a
    /// `<code>` descendant are not code blocks.
    pub fn locate(document: &NodeRef) -> Vec<CodeBlock> {
        let Ok(containers) = document.select("pre") else {
            return Vec::new();
        };

        containers
            .filter_map(|pre| {
                let code = pre.as_node().select_first("code").ok()?;
                Some(CodeBlock {
                    container: pre.as_node().clone(),
                    language: declared_language(code.as_node())
                        .unwrap_or_else(|| PLAIN_TEXT_LANGUAGE.to_string()),
                    text: code.as_node().text_contents(),
                })
            })
            .collect()
    }
}

/// First `language-<name>` class token of an element.
pub fn declared_language(code: &NodeRef) -> Option<String> {
    class_tokens(code).into_iter().find_map(|token| {
        token
            .strip_prefix(LANGUAGE_CLASS_PREFIX)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    })
}

fn code_header_markup(label: &str) -> String {
    format!(
        "<div class=\"code-header\">\
         <span class=\"language-label\">{label}</span>\
         <button class=\"copy-button\" type=\"button\" onclick=\"copyCode(this)\" \
         aria-label=\"Copy code to clipboard\">{icon}</button>\
         </div>",
        label = escape_html(label),
        icon = COPY_ICON_SVG.trim(),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Transformer
// ─────────────────────────────────────────────────────────────────────────────

/// Rewrites renderer output into the page body.
pub struct CodeBlockTransformer<'h> {
    highlighter: &'h SyntaxHighlighter,
    options: TransformOptions,
}

impl CodeBlockTransformer<'static> {
    /// Transformer backed by the shared global highlighter.
    pub fn new(options: TransformOptions) -> Self {
        Self::with_highlighter(get_highlighter(), options)
    }
}

impl<'h> CodeBlockTransformer<'h> {
    pub fn with_highlighter(highlighter: &'h SyntaxHighlighter, options: TransformOptions) -> Self {
        Self {
            highlighter,
            options,
        }
    }

    /// Parse `raw_html`, rewrite it and serialize it back.
    ///
    /// The result is the rewritten content of `<body>`, ready to be placed
    /// in a page as is.
    pub fn transform(&self, raw_html: &str) -> Result<String> {
        let document = parse_document(raw_html);
        self.transform_document(&document)?;
        body_inner_html(&document)
    }

    /// Rewrite a parsed document in place.
    pub fn transform_document(&self, document: &NodeRef) -> Result<()> {
        hoist_head_content(document);
        hoist_stray_nodes(document);
        if self.options.attribute_lists {
            apply_attribute_lists(document);
        }
        if self.options.heading_ids || self.options.table_of_contents {
            assign_heading_ids(document);
        }
        if self.options.table_of_contents {
            expand_toc_markers(document)?;
        }

        let blocks = CodeBlock::locate(document);
        if !blocks.is_empty() {
            let mode = self.options.theme;
            let theme = self
                .highlighter
                .theme_for_palette(self.options.palettes.for_mode(mode), mode)?;
            for block in &blocks {
                self.replace_code_block(block, theme)?;
            }
        }

        let images = decorate_images(document);
        info!(
            "Transformed {} code block(s) and {} image(s)",
            blocks.len(),
            images
        );
        Ok(())
    }

    /// Replace one block with its header and highlighted version.
    fn replace_code_block(&self, block: &CodeBlock, theme: &Theme) -> Result<()> {
        let lexer = self.highlighter.resolve_lexer(&block.language);
        let highlighted = self
            .highlighter
            .highlight(&block.text, &lexer, theme, self.options.style);
        let (label, markup) = match highlighted {
            Ok(markup) => (lexer.label_for(&block.language), markup),
            Err(err) => {
                warn!("{}; highlighting as plain text", err);
                let plain = self.highlighter.resolve_lexer(PLAIN_TEXT_LANGUAGE);
                let markup = self
                    .highlighter
                    .highlight(&block.text, &plain, theme, self.options.style)?;
                (PLAIN_TEXT_LANGUAGE.to_string(), markup)
            }
        };
        debug!(
            "Code block declared '{}' highlighted as '{}' ({})",
            block.language,
            label,
            lexer.syntax_name()
        );

        let replacement = parse_element(&format!(
            "<pre class=\"{}\"><code class=\"{}{}\"></code></pre>",
            HIGHLIGHT_CLASS,
            LANGUAGE_CLASS_PREFIX,
            escape_html(&label)
        ))?;
        let code = replacement
            .select_first("code")
            .map_err(|_| Error::Render("replacement block lost its code element".to_string()))?;
        for child in parse_preformatted_fragment(&markup)? {
            code.as_node().append(child);
        }

        let header = parse_element(&code_header_markup(&label))?;
        block.container.insert_before(header);
        block.container.insert_before(replacement);
        block.container.detach();
        Ok(())
    }
}

/// Move nodes the parser placed in `<head>` to the start of `<body>`.
///
/// Raw `<style>`, `<meta>` or `<link>` at the top of the Markdown source end
/// up in `<head>`, which the page body does not include.
fn hoist_head_content(document: &NodeRef) {
    let (Ok(head), Ok(body)) = (document.select_first("head"), document.select_first("body"))
    else {
        return;
    };
    let nodes: Vec<NodeRef> = head.as_node().children().collect();
    let first = body.as_node().first_child();
    for node in nodes {
        match &first {
            Some(first) => first.insert_before(node),
            None => body.as_node().append(node),
        }
    }
}

/// Mark every image lazy-loading and give it a placeholder `alt` when it has
/// none (or only whitespace). Returns the number of images visited.
pub fn decorate_images(document: &NodeRef) -> usize {
    let images: Vec<NodeRef> = match document.select("img") {
        Ok(selection) => selection.map(|img| img.as_node().clone()).collect(),
        Err(()) => return 0,
    };

    for img in &images {
        set_attribute(img, "loading", "lazy");
        let has_alt = get_attribute(img, "alt").is_some_and(|alt| !alt.trim().is_empty());
        if !has_alt {
            set_attribute(img, "alt", PLACEHOLDER_ALT);
        }
    }
    images.len()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
