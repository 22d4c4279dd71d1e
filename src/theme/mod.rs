//! Theme modes for exported documents
//!
//! A conversion runs in exactly one [`ThemeMode`]. The mode picks the syntect
//! palette used for inline-styled highlighting, the initial `data-theme`
//! attribute of the page, and which on-disk stylesheet the CLI looks for.
//! The emitted CSS always carries rules for both modes so the page can be
//! toggled client-side.
//!
//! # Palettes
//!
//! Palette names are syntect theme names. [`Palettes`] pairs one palette per
//! mode; unknown names fall back to the mode default at highlight time.

use serde::{Deserialize, Serialize};
use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Default light palette from syntect's built-in themes
pub const DEFAULT_LIGHT_PALETTE: &str = "InspiredGitHub";

/// Default dark palette from syntect's built-in themes
pub const DEFAULT_DARK_PALETTE: &str = "base16-ocean.dark";

/// Root attribute toggled by the page script
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Selector every dark-mode highlighting rule is scoped under
pub const DARK_THEME_SELECTOR: &str = "[data-theme=\"dark\"]";

// ─────────────────────────────────────────────────────────────────────────────
// Theme Mode
// ─────────────────────────────────────────────────────────────────────────────

/// Light or dark rendering of a converted document.
///
/// Deserialization is lenient: any value other than `dark` becomes `light`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    /// Parse a user-supplied mode name. Only `dark` (any case) selects dark mode.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("dark") {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        }
    }

    /// Lowercase name, as written to `data-theme` and config files.
    pub fn name(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }

    /// Built-in palette used when no palette is configured for this mode.
    pub fn default_palette(self) -> &'static str {
        match self {
            ThemeMode::Light => DEFAULT_LIGHT_PALETTE,
            ThemeMode::Dark => DEFAULT_DARK_PALETTE,
        }
    }

    /// Stylesheet the CLI picks up from the working directory for this mode.
    pub fn stylesheet_name(self) -> &'static str {
        match self {
            ThemeMode::Light => "style_light.css",
            ThemeMode::Dark => "style_dark.css",
        }
    }
}

impl From<String> for ThemeMode {
    fn from(name: String) -> Self {
        ThemeMode::from_name(&name)
    }
}

impl From<&str> for ThemeMode {
    fn from(name: &str) -> Self {
        ThemeMode::from_name(name)
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Palettes
// ─────────────────────────────────────────────────────────────────────────────

/// One highlighting palette per theme mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palettes {
    pub light: String,
    pub dark: String,
}

impl Default for Palettes {
    fn default() -> Self {
        Self {
            light: DEFAULT_LIGHT_PALETTE.to_string(),
            dark: DEFAULT_DARK_PALETTE.to_string(),
        }
    }
}

impl Palettes {
    pub fn new(light: impl Into<String>, dark: impl Into<String>) -> Self {
        Self {
            light: light.into(),
            dark: dark.into(),
        }
    }

    /// Palette name for the given mode.
    pub fn for_mode(&self, mode: ThemeMode) -> &str {
        match mode {
            ThemeMode::Light => &self.light,
            ThemeMode::Dark => &self.dark,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_only_dark_is_dark() {
        assert_eq!(ThemeMode::from_name("dark"), ThemeMode::Dark);
        assert_eq!(ThemeMode::from_name(" DARK "), ThemeMode::Dark);
        assert_eq!(ThemeMode::from_name("light"), ThemeMode::Light);
        assert_eq!(ThemeMode::from_name("sepia"), ThemeMode::Light);
        assert_eq!(ThemeMode::from_name(""), ThemeMode::Light);
    }

    #[test]
    fn test_theme_mode_serialization() {
        let json = serde_json::to_string(&ThemeMode::Dark).unwrap();
        assert_eq!(json, "\"dark\"");
    }

    #[test]
    fn test_theme_mode_lenient_deserialization() {
        let mode: ThemeMode = serde_json::from_str("\"dark\"").unwrap();
        assert_eq!(mode, ThemeMode::Dark);
        let mode: ThemeMode = serde_json::from_str("\"solarized\"").unwrap();
        assert_eq!(mode, ThemeMode::Light);
    }

    #[test]
    fn test_stylesheet_names() {
        assert_eq!(ThemeMode::Light.stylesheet_name(), "style_light.css");
        assert_eq!(ThemeMode::Dark.stylesheet_name(), "style_dark.css");
    }

    #[test]
    fn test_palettes_for_mode() {
        let palettes = Palettes::new("Solarized (light)", "Solarized (dark)");
        assert_eq!(palettes.for_mode(ThemeMode::Light), "Solarized (light)");
        assert_eq!(palettes.for_mode(ThemeMode::Dark), "Solarized (dark)");
        assert_eq!(
            Palettes::default().for_mode(ThemeMode::Dark),
            DEFAULT_DARK_PALETTE
        );
    }
}
