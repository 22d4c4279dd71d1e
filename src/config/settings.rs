//! Conversion settings
//!
//! This module defines the `Settings` struct that stores the user's default
//! conversion preferences. Every field has a default, so a config file only
//! needs the keys the user wants to change.

use crate::export::DEFAULT_TITLE;
use crate::markdown::HighlightStyle;
use crate::theme::{Palettes, ThemeMode, DEFAULT_DARK_PALETTE, DEFAULT_LIGHT_PALETTE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output file name used when none is configured
pub const DEFAULT_OUTPUT_FILE: &str = "output.html";

/// Defaults for every conversion, stored as `config.json`.
///
/// Missing keys take their `Default` value; unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Appearance
    // ─────────────────────────────────────────────────────────────────────────
    /// Initial page theme; anything other than `dark` means light
    pub theme: ThemeMode,

    /// syntect palette for light-mode highlighting
    pub light_palette: String,

    /// syntect palette for dark-mode highlighting
    pub dark_palette: String,

    /// Class-based (toggleable) or inline-styled highlighting
    pub highlight_style: HighlightStyle,

    /// Page `<title>`
    pub title: String,

    /// Stylesheet that replaces the built-in page CSS
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css_file: Option<PathBuf>,

    // ─────────────────────────────────────────────────────────────────────────
    // Output
    // ─────────────────────────────────────────────────────────────────────────
    /// Directory the output file is written to
    pub output_dir: PathBuf,

    /// Output file name
    pub output_file: String,

    /// Open the page in the default browser after writing it
    pub open_after_export: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Markdown extensions
    // ─────────────────────────────────────────────────────────────────────────
    /// Replace `[TOC]` paragraphs with a table of contents
    pub table_of_contents: bool,

    /// Assign heading ids when the page is built
    pub heading_ids: bool,

    /// Apply `{#id .class}` attribute lists
    pub attribute_lists: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Light,
            light_palette: DEFAULT_LIGHT_PALETTE.to_string(),
            dark_palette: DEFAULT_DARK_PALETTE.to_string(),
            highlight_style: HighlightStyle::Classes,
            title: DEFAULT_TITLE.to_string(),
            css_file: None,
            output_dir: PathBuf::from("."),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            open_after_export: false,
            table_of_contents: true,
            heading_ids: true,
            attribute_lists: true,
        }
    }
}

impl Settings {
    /// Trim string values and put defaults back where a hand-edited file
    /// left them blank.
    pub fn sanitize(&mut self) {
        let defaults = Settings::default();

        fn trimmed_or(value: &str, default: &str) -> String {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                default.to_string()
            } else {
                trimmed.to_string()
            }
        }

        self.light_palette = trimmed_or(&self.light_palette, &defaults.light_palette);
        self.dark_palette = trimmed_or(&self.dark_palette, &defaults.dark_palette);
        self.title = trimmed_or(&self.title, &defaults.title);
        self.output_file = trimmed_or(&self.output_file, &defaults.output_file);

        if self.output_dir.as_os_str().is_empty() {
            self.output_dir = defaults.output_dir;
        }
        if self
            .css_file
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            self.css_file = None;
        }
    }

    /// Deserialize, then [`sanitize`](Self::sanitize).
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Palettes for both modes.
    pub fn palettes(&self) -> Palettes {
        Palettes::new(self.light_palette.clone(), self.dark_palette.clone())
    }

    /// Where the page is written: `output_dir` joined with `output_file`.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
