//! Markdown rendering using comrak
//!
//! This module wraps comrak's HTML renderer. The output is the raw,
//! undecorated HTML that the export pipeline post-processes.

use comrak::{markdown_to_html, Options};
use log::debug;

// ─────────────────────────────────────────────────────────────────────────────
// Public Types
// ─────────────────────────────────────────────────────────────────────────────

/// Markdown extensions turned on for a conversion. CommonMark fenced code
/// is always available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// GFM pipe tables
    pub tables: bool,
    /// `~~struck~~`
    pub strikethrough: bool,
    /// Bare URLs and e-mail addresses become links
    pub autolink: bool,
    /// `- [ ]` / `- [x]` items
    pub tasklist: bool,
    /// `[^1]` references with a footnote section at the end
    pub footnotes: bool,
    /// `term` / `: definition` lists
    pub description_lists: bool,
    /// Pass raw HTML blocks and inline HTML through unchanged
    pub raw_html: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            autolink: true,
            tasklist: true,
            footnotes: true,
            description_lists: false,
            raw_html: true,
        }
    }
}

impl MarkdownOptions {
    /// Heading ids are left to the export pipeline so that they follow the
    /// same slug rules as the page script.
    fn to_comrak_options(&self) -> Options {
        let mut options = Options::default();
        options.extension.strikethrough = self.strikethrough;
        options.extension.table = self.tables;
        options.extension.autolink = self.autolink;
        options.extension.tasklist = self.tasklist;
        options.extension.footnotes = self.footnotes;
        options.extension.description_lists = self.description_lists;
        options.extension.header_ids = None;
        options.render.unsafe_ = self.raw_html;

        options
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

/// Render markdown to an HTML fragment with the default options.
pub fn render_to_html(markdown: &str) -> String {
    render_to_html_with_options(markdown, &MarkdownOptions::default())
}

/// Render markdown to an HTML fragment.
///
/// Fenced code blocks come out as `<pre><code class="language-x">`.
pub fn render_to_html_with_options(markdown: &str, options: &MarkdownOptions) -> String {
    let html = markdown_to_html(markdown, &options.to_comrak_options());
    debug!(
        "Rendered {} bytes of markdown into {} bytes of HTML",
        markdown.len(),
        html.len()
    );
    html
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
