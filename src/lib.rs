//! md2html5 - Markdown to standalone HTML5 pages
//!
//! Markdown is rendered with comrak, code blocks are re-highlighted with
//! syntect and given a copy button, and the result is wrapped in a page that
//! carries light and dark highlighting CSS plus a theme toggle.
//!
//! ```no_run
//! use md2html5::{convert_markdown, ExportOptions, ThemeMode};
//!
//! let options = ExportOptions::default().with_theme(ThemeMode::Dark);
//! let page = convert_markdown("# Hello\n", &options)?;
//! # Ok::<(), md2html5::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod markdown;
pub mod theme;

pub use error::{Error, Result};
pub use export::{
    convert_markdown, export_to_html_file, CodeBlockTransformer, DocumentAssembler, ExportOptions,
    TransformOptions,
};
pub use theme::ThemeMode;
