//! Export Options
//!
//! This module defines the options one conversion runs with. They are
//! usually built from the persisted [`Settings`] and then adjusted by
//! command-line flags.

use super::assemble::DEFAULT_TITLE;
use super::transform::TransformOptions;
use crate::config::Settings;
use crate::markdown::{HighlightStyle, MarkdownOptions};
use crate::theme::{Palettes, ThemeMode};

/// Configuration options for one Markdown to HTML conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Initial page theme and the palette used for inline highlighting
    pub theme: ThemeMode,

    /// Highlighting palettes for both modes
    pub palettes: Palettes,

    /// Class-based or inline-styled highlighting
    pub highlight_style: HighlightStyle,

    /// Page title
    pub title: String,

    /// Page CSS replacing the built-in stylesheet (optional)
    pub custom_css: Option<String>,

    /// Markdown renderer extensions
    pub markdown: MarkdownOptions,

    /// Replace `[TOC]` paragraphs with a table of contents
    pub table_of_contents: bool,

    /// Assign heading ids at build time
    pub heading_ids: bool,

    /// Apply `{#id .class}` attribute lists
    pub attribute_lists: bool,

    /// Whether to open the exported file after export
    pub open_after_export: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            theme: ThemeMode::default(),
            palettes: Palettes::default(),
            highlight_style: HighlightStyle::default(),
            title: DEFAULT_TITLE.to_string(),
            custom_css: None,
            markdown: MarkdownOptions::default(),
            table_of_contents: true,
            heading_ids: true,
            attribute_lists: true,
            open_after_export: false,
        }
    }
}

impl From<&Settings> for ExportOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            theme: settings.theme,
            palettes: settings.palettes(),
            highlight_style: settings.highlight_style,
            title: settings.title.clone(),
            table_of_contents: settings.table_of_contents,
            heading_ids: settings.heading_ids,
            attribute_lists: settings.attribute_lists,
            open_after_export: settings.open_after_export,
            ..Default::default()
        }
    }
}

impl ExportOptions {
    /// Set the theme mode.
    pub fn with_theme(mut self, theme: ThemeMode) -> Self {
        self.theme = theme;
        self
    }

    /// Set the page title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the page CSS.
    pub fn with_custom_css(mut self, css: Option<String>) -> Self {
        self.custom_css = css;
        self
    }

    /// Set the highlighting style.
    pub fn with_highlight_style(mut self, style: HighlightStyle) -> Self {
        self.highlight_style = style;
        self
    }

    /// Options for the code block transformer.
    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            theme: self.theme,
            palettes: self.palettes.clone(),
            style: self.highlight_style,
            attribute_lists: self.attribute_lists,
            heading_ids: self.heading_ids,
            table_of_contents: self.table_of_contents,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
