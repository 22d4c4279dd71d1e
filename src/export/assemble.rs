//! Final HTML document assembly
//!
//! [`DocumentAssembler`] wraps a transformed body in a complete HTML5 page:
//! head metadata, one `<style>` block, the inline behavior script, the skip
//! link and theme toggle, and a single `<main>` region.
//!
//! The stylesheet is built in cascade order:
//!
//! 1. light palette highlighting rules, scoped under `.highlight`
//! 2. dark palette highlighting rules, additionally scoped under
//!    `[data-theme="dark"]`
//! 3. the caller's CSS, or the built-in page CSS when none is given
//!
//! The body is copied into the page as text. It is never re-parsed or
//! re-indented, so whitespace inside code blocks survives byte for byte.

use super::assets::{BEHAVIOR_JS, DEFAULT_CSS, THEME_TOGGLE_HTML};
use super::css::{scope_under_dark_theme, scope_under_highlight};
use super::dom::{body_inner_html, escape_html, hoist_stray_nodes, parse_document};
use crate::error::Result;
use crate::markdown::{get_highlighter, SyntaxHighlighter};
use crate::theme::{Palettes, ThemeMode, THEME_ATTRIBUTE};
use log::debug;
use std::borrow::Cow;

/// Title used when none is configured
pub const DEFAULT_TITLE: &str = "Converted Markdown";

/// Value of the generator meta tag
pub const GENERATOR: &str = concat!("md2html5 ", env!("CARGO_PKG_VERSION"));

/// Id of the main region, target of the skip link
pub const MAIN_CONTENT_ID: &str = "main-content";

// ─────────────────────────────────────────────────────────────────────────────
// Assembler
// ─────────────────────────────────────────────────────────────────────────────

/// Builds complete pages around transformed body HTML.
pub struct DocumentAssembler<'h> {
    highlighter: &'h SyntaxHighlighter,
    palettes: Palettes,
    title: String,
}

impl Default for DocumentAssembler<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentAssembler<'static> {
    /// Assembler backed by the shared global highlighter, with default
    /// palettes and title.
    pub fn new() -> Self {
        Self::with_highlighter(get_highlighter())
    }
}

impl<'h> DocumentAssembler<'h> {
    pub fn with_highlighter(highlighter: &'h SyntaxHighlighter) -> Self {
        Self {
            highlighter,
            palettes: Palettes::default(),
            title: DEFAULT_TITLE.to_string(),
        }
    }

    /// Set the palettes the highlighting CSS is generated from.
    pub fn with_palettes(mut self, palettes: Palettes) -> Self {
        self.palettes = palettes;
        self
    }

    /// Set the page title. Blank titles keep the default.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        if !title.trim().is_empty() {
            self.title = title;
        }
        self
    }

    /// The page stylesheet.
    ///
    /// `custom_css` replaces the built-in page CSS; an empty or
    /// whitespace-only value counts as absent.
    pub fn stylesheet(&self, custom_css: Option<&str>) -> Result<String> {
        let light = scope_under_highlight(
            &self
                .highlighter
                .css_for_palette(&self.palettes.light, ThemeMode::Light)?,
        );
        let dark = scope_under_dark_theme(&scope_under_highlight(
            &self
                .highlighter
                .css_for_palette(&self.palettes.dark, ThemeMode::Dark)?,
        ));
        let page = match custom_css {
            Some(css) if !css.trim().is_empty() => css,
            _ => DEFAULT_CSS,
        };

        let mut stylesheet = String::with_capacity(light.len() + dark.len() + page.len() + 128);
        stylesheet.push_str("/* Syntax highlighting (light) */\n");
        stylesheet.push_str(&light);
        stylesheet.push_str("\n/* Syntax highlighting (dark) */\n");
        stylesheet.push_str(&dark);
        stylesheet.push_str("\n/* Page styles */\n");
        stylesheet.push_str(page);
        Ok(stylesheet)
    }

    /// Wrap `body_html` in a complete page.
    ///
    /// `body_html` may be a full document, in which case the content of its
    /// `<body>` element is used, or a bare fragment. Either way the content
    /// is inserted exactly as given.
    pub fn assemble(
        &self,
        body_html: &str,
        custom_css: Option<&str>,
        theme: ThemeMode,
    ) -> Result<String> {
        let body = extract_body_content(body_html)?;
        let stylesheet = self.stylesheet(custom_css)?;

        let root_attributes = if theme.is_dark() {
            format!(" {}=\"{}\"", THEME_ATTRIBUTE, theme.name())
        } else {
            String::new()
        };

        let mut html = String::with_capacity(
            body.len() + stylesheet.len() + BEHAVIOR_JS.len() + THEME_TOGGLE_HTML.len() + 1024,
        );
        html.push_str("<!DOCTYPE html>\n");
        html.push_str(&format!("<html lang=\"en\"{}>\n", root_attributes));
        html.push_str("<head>\n");
        html.push_str("    <meta charset=\"UTF-8\">\n");
        html.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str(&format!(
            "    <meta name=\"generator\" content=\"{}\">\n",
            GENERATOR
        ));
        html.push_str(&format!("    <title>{}</title>\n", escape_html(&self.title)));
        html.push_str("    <style>\n");
        html.push_str(&stylesheet);
        html.push_str("\n    </style>\n");
        html.push_str("    <script>\n");
        html.push_str(BEHAVIOR_JS);
        html.push_str("    </script>\n");
        html.push_str("</head>\n");
        html.push_str("<body>\n");
        html.push_str(&format!(
            "    <a href=\"#{}\" class=\"skip-to-content\">Skip to main content</a>\n",
            MAIN_CONTENT_ID
        ));
        html.push_str("    ");
        html.push_str(THEME_TOGGLE_HTML.trim());
        html.push('\n');
        html.push_str(&format!("    <main id=\"{}\">\n", MAIN_CONTENT_ID));
        html.push_str(&body);
        html.push_str("\n    </main>\n");
        html.push_str("</body>\n");
        html.push_str("</html>\n");

        debug!(
            "Assembled {} page: {} bytes of body, {} bytes total",
            theme,
            body.len(),
            html.len()
        );
        Ok(html)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Body extraction
// ─────────────────────────────────────────────────────────────────────────────

/// Page body for `html`.
///
/// A fragment is returned untouched. A full document (one that opens with a
/// doctype or `<html>`, possibly after comments) is parsed, and the children
/// of its `<body>` are serialized as parsed. Comments the parser kept outside
/// the body are moved into it first.
pub fn extract_body_content(html: &str) -> Result<Cow<'_, str>> {
    if !is_full_document(html) {
        return Ok(Cow::Borrowed(html));
    }
    let document = parse_document(html);
    hoist_stray_nodes(&document);
    body_inner_html(&document).map(Cow::Owned)
}

fn is_full_document(html: &str) -> bool {
    let mut rest = html.trim_start();
    while let Some(comment) = rest.strip_prefix("<!--") {
        match comment.find("-->") {
            Some(end) => rest = comment[end + 3..].trim_start(),
            None => return false,
        }
    }
    let opening: String = rest.chars().take(9).collect::<String>().to_ascii_lowercase();
    if opening.starts_with("<!doctype") {
        return true;
    }
    opening.starts_with("<html")
        && matches!(rest.as_bytes().get(5), Some(c) if *c == b'>' || c.is_ascii_whitespace())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::headings::{FALLBACK_SLUG, SLUG_SEPARATOR_PATTERN};
    use crate::theme::DARK_THEME_SELECTOR;

    fn assemble(body: &str, css: Option<&str>, theme: ThemeMode) -> String {
        DocumentAssembler::new().assemble(body, css, theme).unwrap()
    }

    #[test]
    fn test_document_skeleton() {
        let html = assemble("<p>Hi</p>", None, ThemeMode::Light);
        assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">\n<head>"));
        assert!(html.contains("<meta charset=\"UTF-8\">"));
        assert!(html.contains("name=\"viewport\""));
        assert!(html.contains("<title>Converted Markdown</title>"));
        assert!(html.trim_end().ends_with("</main>\n</body>\n</html>"));
        assert_eq!(html.matches("<main").count(), 1);
        assert_eq!(html.matches("<body>").count(), 1);
    }

    #[test]
    fn test_body_is_inserted_byte_exact() {
        let body = "<pre class=\"highlight\"><code class=\"language-text\">  a\n\tb\n</code></pre>\n<p>x &amp; y</p>";
        let html = assemble(body, None, ThemeMode::Light);
        assert!(html.contains(&format!("<main id=\"main-content\">\n{}\n    </main>", body)));
    }

    #[test]
    fn test_body_is_extracted_from_full_document() {
        let doc = "<html><head></head><body><p>one</p>\n<pre><code>  x</code></pre></body></html>";
        let html = assemble(doc, None, ThemeMode::Light);
        assert!(html.contains("<main id=\"main-content\">\n<p>one</p>\n<pre><code>  x</code></pre>\n    </main>"));
        assert!(!html.contains("<html><head>"));
    }

    #[test]
    fn test_chrome_precedes_main() {
        let html = assemble("<p>x</p>", None, ThemeMode::Light);
        let skip = html.find("class=\"skip-to-content\"").unwrap();
        let toggle = html.find("class=\"theme-toggle\"").unwrap();
        let main = html.find("<main").unwrap();
        assert!(skip < toggle && toggle < main);
        assert!(html.contains("href=\"#main-content\""));
    }

    #[test]
    fn test_dark_mode_sets_root_attribute() {
        let dark = assemble("", None, ThemeMode::Dark);
        assert!(dark.contains("<html lang=\"en\" data-theme=\"dark\">"));
        let light = assemble("", None, ThemeMode::Light);
        assert!(light.contains("<html lang=\"en\">"));
    }

    #[test]
    fn test_script_is_inlined() {
        let html = assemble("", None, ThemeMode::Light);
        assert!(html.contains("function copyCode("));
        assert!(html.contains("mathjax@3"));
    }

    #[test]
    fn test_title_is_escaped() {
        let html = DocumentAssembler::new()
            .with_title("Q&A <notes>")
            .assemble("", None, ThemeMode::Light)
            .unwrap();
        assert!(html.contains("<title>Q&amp;A &lt;notes&gt;</title>"));
    }

    #[test]
    fn test_blank_title_keeps_default() {
        let html = DocumentAssembler::new()
            .with_title("  ")
            .assemble("", None, ThemeMode::Light)
            .unwrap();
        assert!(html.contains(&format!("<title>{}</title>", DEFAULT_TITLE)));
    }

    #[test]
    fn test_stylesheet_order() {
        let css = DocumentAssembler::new()
            .stylesheet(Some("body { color: purple; }"))
            .unwrap();
        let light = css.find("\n.highlight .").unwrap();
        let dark = css.find(DARK_THEME_SELECTOR).unwrap();
        let custom = css.find("body { color: purple; }").unwrap();
        assert!(light < dark && dark < custom);
        assert!(!css.contains(DEFAULT_CSS));
    }

    #[test]
    fn test_default_css_when_custom_is_blank() {
        let assembler = DocumentAssembler::new();
        assert!(assembler.stylesheet(None).unwrap().contains(DEFAULT_CSS));
        assert!(assembler.stylesheet(Some(" \n")).unwrap().contains(DEFAULT_CSS));
    }

    #[test]
    fn test_dark_rules_are_all_scoped() {
        let css = DocumentAssembler::new().stylesheet(Some("p {}")).unwrap();
        let start = css.find("/* Syntax highlighting (dark) */").unwrap();
        let end = css.find("/* Page styles */").unwrap();
        for line in css[start..end].lines() {
            assert!(!line.trim_start().starts_with(".highlight"), "{}", line);
        }
    }

    #[test]
    fn test_fragments_pass_through_untouched() {
        for fragment in [
            "<p>fragment</p>",
            "<bodyguard>x</bodyguard>",
            "<!-- <body> -->\n<h1 id=\"hi\">Hi</h1>",
            "<p>see <code>&lt;html&gt;</code></p>",
        ] {
            assert_eq!(extract_body_content(fragment).unwrap(), fragment);
        }
    }

    #[test]
    fn test_full_documents_are_parsed() {
        assert_eq!(
            extract_body_content("<HTML><BODY class=\"a\">\n y \n</BODY></HTML>").unwrap(),
            "\n y \n"
        );
        assert_eq!(
            extract_body_content("<!DOCTYPE html><html><body><p>x</p></body></html>").unwrap(),
            "<p>x</p>"
        );
    }

    #[test]
    fn test_comment_before_document_stays_inside_main() {
        let doc = "<!-- <body> --><html><head></head><body><h1>Hi</h1></body></html>";
        assert_eq!(
            extract_body_content(doc).unwrap(),
            "<!-- <body> --><h1>Hi</h1>"
        );

        let html = assemble(doc, None, ThemeMode::Light);
        assert!(html.contains("<main id=\"main-content\">\n<!-- <body> --><h1>Hi</h1>\n    </main>"));
        assert_eq!(html.matches("<html").count(), 1);
    }

    #[test]
    fn test_script_assigns_ids_like_slug_allocator() {
        // Same separator pattern and fallback as `slugify`
        assert!(BEHAVIOR_JS.contains(&format!(".replace(/{}/g, '-')", SLUG_SEPARATOR_PATTERN)));
        assert!(BEHAVIOR_JS.contains(&format!("return slug || '{}';", FALLBACK_SLUG)));
        // Same suffix policy as `SlugAllocator::allocate`
        assert!(BEHAVIOR_JS.contains("var id = count === 0 ? base : base + '-' + count;"));
        assert!(BEHAVIOR_JS.contains("while (used.has(id))"));
        assert!(BEHAVIOR_JS.contains("counts.set(base, count + 1);"));
    }

    #[test]
    fn test_script_collision_tables_have_no_prototype() {
        assert!(BEHAVIOR_JS.contains("var counts = new Map();"));
        assert!(BEHAVIOR_JS.contains("var used = new Set();"));
        for lookup in ["counts[", "used["] {
            assert!(!BEHAVIOR_JS.contains(lookup), "object lookup {}", lookup);
        }
    }
}
