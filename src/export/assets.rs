//! Static page payloads
//!
//! The stylesheet, behavior script and icon markup live as plain files under
//! `assets/` and are compiled into the binary, so every exported page is
//! self-contained.

/// Built-in page stylesheet, used when no custom CSS is supplied.
pub const DEFAULT_CSS: &str = include_str!("../../assets/default.css");

/// Inline page script: copy buttons, theme toggle, heading anchors, MathJax loader.
pub const BEHAVIOR_JS: &str = include_str!("../../assets/behavior.js");

/// Icon shown inside every copy button.
pub const COPY_ICON_SVG: &str = include_str!("../../assets/copy-icon.svg");

/// Theme toggle button placed before the main region.
pub const THEME_TOGGLE_HTML: &str = include_str!("../../assets/theme-toggle.html");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_defines_page_handlers() {
        for name in [
            "function copyCode(",
            "function toggleTheme(",
            "function initTheme(",
            "function addHeadingAnchors(",
            "function loadMathJaxIfNeeded(",
        ] {
            assert!(BEHAVIOR_JS.contains(name), "missing {}", name);
        }
    }

    #[test]
    fn test_toggle_calls_script() {
        assert!(THEME_TOGGLE_HTML.contains("onclick=\"toggleTheme()\""));
        assert!(COPY_ICON_SVG.trim_start().starts_with("<svg"));
    }

    #[test]
    fn test_default_css_has_both_modes() {
        assert!(DEFAULT_CSS.contains("[data-theme=\"dark\"]"));
        assert!(DEFAULT_CSS.contains("@media print"));
    }
}
