//! Syntax Highlighting Module
//!
//! This module integrates syntect for highlighting fenced code blocks in
//! exported HTML.
//!
//! # Features
//! - Loads syntect's bundled grammars and palettes once per process
//! - Resolves fence language tags to lexers, never failing (plain text fallback)
//! - Emits class-named or inline-styled span markup without a wrapper element
//! - Generates class CSS for any bundled palette
//!
//! # Example
//! ```ignore
//! use md2html5::markdown::{get_highlighter, HighlightStyle};
//!
//! let highlighter = get_highlighter();
//! let lexer = highlighter.resolve_lexer("rust");
//! let theme = highlighter.theme_for_palette("InspiredGitHub", ThemeMode::Light)?;
//! let markup = highlighter.highlight("fn main() {}\n", &lexer, theme, HighlightStyle::Classes)?;
//! ```

use crate::error::{Error, Result};
use crate::theme::ThemeMode;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{
    css_for_theme_with_class_style, styled_line_to_highlighted_html, ClassStyle,
    ClassedHTMLGenerator, IncludeBackground,
};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Language label used for undeclared or unrecognized fence languages
pub const PLAIN_TEXT_LANGUAGE: &str = "text";

/// Class style shared by the span generator and the CSS generator
const CLASS_STYLE: ClassStyle = ClassStyle::Spaced;

// ─────────────────────────────────────────────────────────────────────────────
// Highlight Style
// ─────────────────────────────────────────────────────────────────────────────

/// How highlighted tokens carry their colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HighlightStyle {
    /// Class-named spans; colors come from the generated light/dark CSS
    #[default]
    Classes,
    /// Inline `style` attributes taken from the requested palette
    Inline,
}

// ─────────────────────────────────────────────────────────────────────────────
// Lexer
// ─────────────────────────────────────────────────────────────────────────────

/// A resolved syntax definition for a fence language tag.
///
/// Always valid: an unknown tag resolves to the plain-text syntax with
/// `recognized == false`.
#[derive(Debug, Clone, Copy)]
pub struct Lexer<'a> {
    syntax: &'a SyntaxReference,
    recognized: bool,
}

impl<'a> Lexer<'a> {
    /// The syntect syntax backing this lexer.
    pub fn syntax(&self) -> &'a SyntaxReference {
        self.syntax
    }

    /// Display name of the syntax, e.g. "Python" or "Plain Text".
    pub fn syntax_name(&self) -> &'a str {
        &self.syntax.name
    }

    /// Whether the requested language was found.
    pub fn is_recognized(&self) -> bool {
        self.recognized
    }

    /// Label for a code block declared as `language`: the tag itself when it
    /// resolved, otherwise `text`.
    pub fn label_for(&self, language: &str) -> String {
        if self.recognized && !language.is_empty() {
            language.to_string()
        } else {
            PLAIN_TEXT_LANGUAGE.to_string()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Syntax Highlighter
// ─────────────────────────────────────────────────────────────────────────────

/// syntect's bundled grammars and palettes, loaded once.
pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
    /// Palettes by name
    theme_set: ThemeSet,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter {
    /// Load the bundled sets. The HTML generators need the newline-terminated
    /// grammars.
    pub fn new() -> Self {
        debug!("Loading bundled grammars and palettes");
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let theme_set = ThemeSet::load_defaults();
        debug!(
            "{} grammars, {} palettes available",
            syntax_set.syntaxes().len(),
            theme_set.themes.len()
        );
        Self {
            syntax_set,
            theme_set,
        }
    }

    /// Look up a palette by name, falling back to the mode default.
    ///
    /// # Errors
    ///
    /// Fails only if neither the requested palette nor the built-in default
    /// for `mode` exists.
    pub fn theme_for_palette(&self, name: &str, mode: ThemeMode) -> Result<&Theme> {
        if let Some(theme) = self.theme_set.themes.get(name) {
            return Ok(theme);
        }
        warn!(
            "Palette '{}' not found, using '{}'",
            name,
            mode.default_palette()
        );
        self.theme_set
            .themes
            .get(mode.default_palette())
            .ok_or_else(|| Error::PaletteMissing(mode.default_palette().to_string()))
    }

    /// Resolve a fence language tag to a lexer.
    ///
    /// Never fails: unresolvable names yield the plain-text lexer.
    pub fn resolve_lexer(&self, language: &str) -> Lexer<'_> {
        match self.find_syntax_for_language(language) {
            Some(syntax) => Lexer {
                syntax,
                recognized: true,
            },
            None => {
                if !language.is_empty() {
                    debug!("No syntax found for language '{}', using plain text", language);
                }
                Lexer {
                    syntax: self.syntax_set.find_syntax_plain_text(),
                    recognized: false,
                }
            }
        }
    }

    /// Highlight `code` into span markup with no surrounding wrapper.
    ///
    /// The markup reproduces `code` exactly once tags are removed and
    /// entities decoded; no whitespace is trimmed.
    pub fn highlight(
        &self,
        code: &str,
        lexer: &Lexer<'_>,
        theme: &Theme,
        style: HighlightStyle,
    ) -> Result<String> {
        let to_error = |e: syntect::Error| Error::Highlight {
            language: lexer.syntax_name().to_string(),
            message: e.to_string(),
        };

        match style {
            HighlightStyle::Classes => {
                let mut generator = ClassedHTMLGenerator::new_with_class_style(
                    lexer.syntax(),
                    &self.syntax_set,
                    CLASS_STYLE,
                );
                for line in LinesWithEndings::from(code) {
                    generator
                        .parse_html_for_line_which_includes_newline(line)
                        .map_err(to_error)?;
                }
                Ok(generator.finalize())
            }
            HighlightStyle::Inline => {
                let mut highlighter = HighlightLines::new(lexer.syntax(), theme);
                let mut html = String::with_capacity(code.len() * 2);
                for line in LinesWithEndings::from(code) {
                    let regions = highlighter
                        .highlight_line(line, &self.syntax_set)
                        .map_err(to_error)?;
                    html.push_str(
                        &styled_line_to_highlighted_html(&regions, IncludeBackground::No)
                            .map_err(to_error)?,
                    );
                }
                Ok(html)
            }
        }
    }

    /// Class CSS for a palette, matching the spans produced by
    /// [`HighlightStyle::Classes`]. Selectors are not scoped.
    pub fn css_for_palette(&self, name: &str, mode: ThemeMode) -> Result<String> {
        let theme = self.theme_for_palette(name, mode)?;
        css_for_theme_with_class_style(theme, CLASS_STYLE).map_err(|e| Error::Highlight {
            language: PLAIN_TEXT_LANGUAGE.to_string(),
            message: format!("could not generate CSS for palette '{}': {}", name, e),
        })
    }

    /// Lookup order: alias table, file extension, exact syntax name, syntax
    /// name ignoring case.
    fn find_syntax_for_language(&self, language: &str) -> Option<&SyntaxReference> {
        if language.is_empty() {
            return None;
        }
        let wanted = language.to_lowercase();
        let extension = LANGUAGE_ALIASES
            .iter()
            .find(|(aliases, _)| aliases.contains(&wanted.as_str()))
            .map_or(wanted.as_str(), |(_, extension)| *extension);

        self.syntax_set
            .find_syntax_by_extension(extension)
            .or_else(|| self.syntax_set.find_syntax_by_name(language))
            .or_else(|| {
                self.syntax_set
                    .syntaxes()
                    .iter()
                    .find(|syntax| syntax.name.eq_ignore_ascii_case(&wanted))
            })
    }
}

/// Fence tags that syntect only knows by file extension.
const LANGUAGE_ALIASES: &[(&[&str], &str)] = &[
    (&["text", "plain", "plaintext", "txt", "none"], "txt"),
    (&["rust"], "rs"),
    (&["python", "python3", "py3"], "py"),
    (&["javascript", "node"], "js"),
    (&["c++", "cxx"], "cpp"),
    (&["csharp", "c#"], "cs"),
    (&["golang"], "go"),
    (&["ruby"], "rb"),
    (&["htm", "xhtml"], "html"),
    (&["yml"], "yaml"),
    (&["markdown"], "md"),
    (&["shell", "bash", "zsh", "console", "shell-session"], "sh"),
    (&["make", "makefile"], "Makefile"),
    (&["perl"], "pl"),
    (&["haskell"], "hs"),
    (&["erlang"], "erl"),
    (&["clojure"], "clj"),
    (&["patch", "udiff"], "diff"),
    (&["latex"], "tex"),
];

// ─────────────────────────────────────────────────────────────────────────────
// Global Highlighter Instance
// ─────────────────────────────────────────────────────────────────────────────

use std::sync::OnceLock;

/// Shared read-only by every conversion on every thread.
static HIGHLIGHTER: OnceLock<SyntaxHighlighter> = OnceLock::new();

/// The process-wide highlighter, loaded on first use.
pub fn get_highlighter() -> &'static SyntaxHighlighter {
    HIGHLIGHTER.get_or_init(SyntaxHighlighter::new)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{DEFAULT_DARK_PALETTE, DEFAULT_LIGHT_PALETTE};

    fn strip_tags(markup: &str) -> String {
        let mut text = String::new();
        let mut in_tag = false;
        for c in markup.chars() {
            match c {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ if !in_tag => text.push(c),
                _ => {}
            }
        }
        text.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&")
    }

    #[test]
    fn test_default_palettes_are_bundled() {
        let highlighter = get_highlighter();
        for mode in [ThemeMode::Light, ThemeMode::Dark] {
            let theme = highlighter
                .theme_for_palette(mode.default_palette(), mode)
                .unwrap();
            assert!(theme.name.is_some());
        }
    }

    #[test]
    fn test_resolve_known_language() {
        let lexer = get_highlighter().resolve_lexer("python");
        assert!(lexer.is_recognized());
        assert_eq!(lexer.syntax_name(), "Python");
        assert_eq!(lexer.label_for("python"), "python");
    }

    #[test]
    fn test_resolve_unknown_language_falls_back() {
        let lexer = get_highlighter().resolve_lexer("unknownlang123");
        assert!(!lexer.is_recognized());
        assert_eq!(lexer.syntax_name(), "Plain Text");
        assert_eq!(lexer.label_for("unknownlang123"), "text");
    }

    #[test]
    fn test_resolve_empty_language_falls_back() {
        let lexer = get_highlighter().resolve_lexer("");
        assert!(!lexer.is_recognized());
        assert_eq!(lexer.label_for(""), "text");
    }

    #[test]
    fn test_language_aliases() {
        let highlighter = get_highlighter();
        for (alias, canonical) in [("rs", "rust"), ("py", "python"), ("js", "javascript")] {
            let a = highlighter.resolve_lexer(alias);
            let b = highlighter.resolve_lexer(canonical);
            assert!(a.is_recognized(), "{} should resolve", alias);
            assert_eq!(a.syntax_name(), b.syntax_name());
        }
    }

    #[test]
    fn test_case_insensitive_name_lookup() {
        let lexer = get_highlighter().resolve_lexer("RUST");
        assert!(lexer.is_recognized());
        assert_eq!(lexer.syntax_name(), "Rust");
    }

    #[test]
    fn test_classed_highlight_preserves_text() {
        let highlighter = get_highlighter();
        let lexer = highlighter.resolve_lexer("python");
        let theme = highlighter
            .theme_for_palette(DEFAULT_LIGHT_PALETTE, ThemeMode::Light)
            .unwrap();
        let code = "  if a < b:\n\tprint(\"x & y\")\n";
        let html = highlighter
            .highlight(code, &lexer, theme, HighlightStyle::Classes)
            .unwrap();

        assert!(html.starts_with("<span class=\""));
        assert!(!html.contains("<pre"));
        assert_eq!(strip_tags(&html), code);
    }

    #[test]
    fn test_inline_highlight_uses_palette_colors() {
        let highlighter = get_highlighter();
        let lexer = highlighter.resolve_lexer("rust");
        let theme = highlighter
            .theme_for_palette(DEFAULT_DARK_PALETTE, ThemeMode::Dark)
            .unwrap();
        let code = "fn main() {}\n";
        let html = highlighter
            .highlight(code, &lexer, theme, HighlightStyle::Inline)
            .unwrap();

        assert!(html.contains("style=\"color:#"));
        assert_eq!(strip_tags(&html), code);
    }

    #[test]
    fn test_highlight_empty_code() {
        let highlighter = get_highlighter();
        let lexer = highlighter.resolve_lexer("rust");
        let theme = highlighter
            .theme_for_palette(DEFAULT_LIGHT_PALETTE, ThemeMode::Light)
            .unwrap();
        let html = highlighter
            .highlight("", &lexer, theme, HighlightStyle::Classes)
            .unwrap();
        assert_eq!(strip_tags(&html), "");
    }

    #[test]
    fn test_unknown_palette_falls_back_to_mode_default() {
        let highlighter = get_highlighter();
        let theme = highlighter
            .theme_for_palette("no-such-palette", ThemeMode::Dark)
            .unwrap();
        let expected = highlighter
            .theme_for_palette(DEFAULT_DARK_PALETTE, ThemeMode::Dark)
            .unwrap();
        assert_eq!(theme.name, expected.name);
    }

    #[test]
    fn test_css_for_palette_has_class_rules() {
        let css = get_highlighter()
            .css_for_palette(DEFAULT_LIGHT_PALETTE, ThemeMode::Light)
            .unwrap();
        assert!(css.contains(".code {"));
        assert!(css.contains(".comment"));
    }

    #[test]
    fn test_global_highlighter_is_shared() {
        let h1 = get_highlighter();
        let h2 = get_highlighter();
        assert!(std::ptr::eq(h1, h2));
    }
}
