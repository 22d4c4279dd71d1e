//! CSS selector scoping
//!
//! Generated highlighting CSS is emitted twice per page: once for light mode
//! and once for dark mode. Both copies are scoped under the `.highlight`
//! code container, and the dark copy is additionally scoped under the dark
//! theme attribute so it only applies while the page is toggled dark.
//!
//! Scoping works on whole rules rather than lines: a rule's prelude is split
//! into its comma-separated selectors and each selector gets the prefix.
//! Comments and whitespace between rules pass through untouched, and so does
//! every declaration block. `@media` and `@supports` blocks are scoped
//! recursively; any other at-rule is copied verbatim.

use crate::theme::DARK_THEME_SELECTOR;

/// Class of the replacement block every highlighted code sample lives in
pub const HIGHLIGHT_CLASS: &str = "highlight";

/// Base selector syntect emits for the code background rule
const BASE_CODE_SELECTOR: &str = ".code";

/// Scope the generated rules of a palette under `.highlight`.
///
/// syntect's `.code` base rule becomes the `.highlight` rule itself.
pub fn scope_under_highlight(css: &str) -> String {
    let container = format!(".{}", HIGHLIGHT_CLASS);
    scope_rules(css, &|selector: &str| {
        if selector == BASE_CODE_SELECTOR || selector == container {
            container.clone()
        } else if selector.starts_with(&format!("{} ", container)) {
            selector.to_string()
        } else {
            format!("{} {}", container, selector)
        }
    })
}

/// Scope every rule under the dark theme attribute selector.
///
/// `.highlight .kw { color: #f00; }` becomes
/// `[data-theme="dark"] .highlight .kw { color: #f00; }`.
pub fn scope_under_dark_theme(css: &str) -> String {
    scope_rules(css, &|selector: &str| {
        format!("{} {}", DARK_THEME_SELECTOR, selector)
    })
}

/// Rewrite every selector of every style rule in `css` through `scope`.
///
/// `scope` receives each selector with surrounding whitespace removed; the
/// whitespace is put back around its result.
pub fn scope_rules(css: &str, scope: &dyn Fn(&str) -> String) -> String {
    let bytes = css.as_bytes();
    let mut out = String::with_capacity(css.len() * 2);
    let mut i = 0;

    while i < bytes.len() {
        if css[i..].starts_with("/*") {
            let end = comment_end(css, i);
            out.push_str(&css[i..end]);
            i = end;
            continue;
        }
        if bytes[i].is_ascii_whitespace() {
            out.push(bytes[i] as char);
            i += 1;
            continue;
        }

        let Some((stop, delimiter)) = find_prelude_end(css, i) else {
            // Trailing garbage without a block
            out.push_str(&css[i..]);
            break;
        };

        if delimiter == b';' {
            // Statement at-rule such as @import or @charset
            out.push_str(&css[i..=stop]);
            i = stop + 1;
            continue;
        }

        let prelude = &css[i..stop];
        let Some(close) = find_block_end(css, stop) else {
            out.push_str(&css[i..]);
            break;
        };

        if prelude.starts_with('@') {
            if is_conditional_group(prelude) {
                out.push_str(prelude);
                out.push('{');
                out.push_str(&scope_rules(&css[stop + 1..close], scope));
                out.push('}');
            } else {
                out.push_str(&css[i..=close]);
            }
        } else {
            out.push_str(&scope_selector_list(prelude, scope));
            out.push_str(&css[stop..=close]);
        }
        i = close + 1;
    }

    out
}

/// Scope each comma-separated selector, keeping the whitespace around it.
fn scope_selector_list(prelude: &str, scope: &dyn Fn(&str) -> String) -> String {
    split_selectors(prelude)
        .into_iter()
        .map(|part| {
            let core = part.trim();
            if core.is_empty() {
                return part.to_string();
            }
            let lead = &part[..part.len() - part.trim_start().len()];
            let trail = &part[part.trim_end().len()..];
            format!("{}{}{}", lead, scope(core), trail)
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Split a selector list on top-level commas.
fn split_selectors(prelude: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, c) in prelude.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&prelude[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&prelude[start..]);
    parts
}

fn is_conditional_group(prelude: &str) -> bool {
    let name: String = prelude[1..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect::<String>()
        .to_ascii_lowercase();
    matches!(name.as_str(), "media" | "supports")
}

/// Index just past the comment starting at `start`, or the end of input.
fn comment_end(css: &str, start: usize) -> usize {
    css[start + 2..]
        .find("*/")
        .map(|pos| start + 2 + pos + 2)
        .unwrap_or(css.len())
}

/// Index just past the string literal starting at `start`.
fn string_end(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// First `{` or `;` at or after `start`, outside strings and comments.
fn find_prelude_end(css: &str, start: usize) -> Option<(usize, u8)> {
    let bytes = css.as_bytes();
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => i = string_end(bytes, i),
            b'/' if css[i..].starts_with("/*") => i = comment_end(css, i),
            c @ (b'{' | b';') => return Some((i, c)),
            _ => i += 1,
        }
    }
    None
}

/// Index of the `}` matching the `{` at `open`.
fn find_block_end(css: &str, open: usize) -> Option<usize> {
    let bytes = css.as_bytes();
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = string_end(bytes, i);
                continue;
            }
            b'/' if css[i..].starts_with("/*") => {
                i = comment_end(css, i);
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::get_highlighter;
    use crate::theme::{ThemeMode, DEFAULT_DARK_PALETTE};

    #[test]
    fn test_dark_scoping_single_rule() {
        assert_eq!(
            scope_under_dark_theme(".highlight .kw { color: #f00; }"),
            "[data-theme=\"dark\"] .highlight .kw { color: #f00; }"
        );
    }

    #[test]
    fn test_comments_and_blank_lines_pass_through() {
        let css = "/*\n * generated\n */\n\n.kw { color: red; }\n\n/* tail */\n";
        assert_eq!(
            scope_under_dark_theme(css),
            "/*\n * generated\n */\n\n[data-theme=\"dark\"] .kw { color: red; }\n\n/* tail */\n"
        );
    }

    #[test]
    fn test_every_selector_in_a_list_is_scoped() {
        let css = ".comment,\n.punctuation.definition.comment {\n color: #969896;\n}\n";
        assert_eq!(
            scope_under_dark_theme(css),
            "[data-theme=\"dark\"] .comment,\n[data-theme=\"dark\"] .punctuation.definition.comment {\n color: #969896;\n}\n"
        );
    }

    #[test]
    fn test_commas_inside_selector_functions_do_not_split() {
        let css = ":is(.a, .b) .c { x: y; }";
        assert_eq!(
            scope_under_dark_theme(css),
            "[data-theme=\"dark\"] :is(.a, .b) .c { x: y; }"
        );
    }

    #[test]
    fn test_media_blocks_are_scoped_recursively() {
        let css = "@media print { .kw { color: black; } }";
        assert_eq!(
            scope_under_dark_theme(css),
            "@media print { [data-theme=\"dark\"] .kw { color: black; } }"
        );
    }

    #[test]
    fn test_other_at_rules_are_verbatim() {
        let css = "@import url(\"x.css\");\n@font-face { font-family: \"A\"; }\n";
        assert_eq!(scope_under_dark_theme(css), css);
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let css = ".a::before { content: \"}{\"; }\n.b { x: y; }";
        assert_eq!(
            scope_under_dark_theme(css),
            "[data-theme=\"dark\"] .a::before { content: \"}{\"; }\n[data-theme=\"dark\"] .b { x: y; }"
        );
    }

    #[test]
    fn test_unterminated_input_is_kept() {
        assert_eq!(scope_under_dark_theme(".a { color: red;"), ".a { color: red;");
        assert_eq!(scope_under_dark_theme("stray"), "stray");
    }

    #[test]
    fn test_highlight_scoping_maps_base_rule() {
        let css = ".code {\n color: #000;\n}\n.keyword { color: #00f; }\n";
        assert_eq!(
            scope_under_highlight(css),
            ".highlight {\n color: #000;\n}\n.highlight .keyword { color: #00f; }\n"
        );
    }

    #[test]
    fn test_highlight_scoping_is_idempotent() {
        let once = scope_under_highlight(".keyword { color: #00f; }");
        assert_eq!(scope_under_highlight(&once), once);
    }

    #[test]
    fn test_generated_palette_css_is_fully_scoped() {
        let css = get_highlighter()
            .css_for_palette(DEFAULT_DARK_PALETTE, ThemeMode::Dark)
            .unwrap();
        let scoped = scope_under_dark_theme(&scope_under_highlight(&css));

        assert!(scoped.contains("[data-theme=\"dark\"] .highlight {"));
        assert!(scoped.contains("[data-theme=\"dark\"] .highlight .comment"));
        for line in scoped.lines() {
            let line = line.trim_start();
            if line.starts_with('.') {
                panic!("unscoped selector line: {}", line);
            }
        }
    }
}
