//! HTML Export Generation
//!
//! This module runs the whole pipeline: Markdown is rendered by comrak, the
//! resulting HTML is rewritten by the [`CodeBlockTransformer`], and the
//! [`DocumentAssembler`] wraps it in a standalone page.

use super::assemble::DocumentAssembler;
use super::options::ExportOptions;
use super::transform::CodeBlockTransformer;
use crate::error::{Error, Result};
use crate::markdown::render_to_html_with_options;
use log::{info, warn};
use std::fs;
use std::path::Path;

// ─────────────────────────────────────────────────────────────────────────────
// HTML Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Convert Markdown source into a finished HTML5 page.
///
/// # Errors
///
/// Fails only if the intermediate HTML cannot be serialized or the
/// highlighting engine breaks on input it already accepted. Unknown code
/// languages and palettes never fail.
pub fn convert_markdown(markdown: &str, options: &ExportOptions) -> Result<String> {
    let raw_html = render_to_html_with_options(markdown, &options.markdown);

    let body = CodeBlockTransformer::new(options.transform_options()).transform(&raw_html)?;

    DocumentAssembler::new()
        .with_palettes(options.palettes.clone())
        .with_title(options.title.as_str())
        .assemble(&body, options.custom_css.as_deref(), options.theme)
}

/// Convert the Markdown file at `source_path` and write the page to
/// `output_path`.
///
/// See [`write_html_file`] for how the page is written.
pub fn export_to_html_file(
    source_path: &Path,
    output_path: &Path,
    options: &ExportOptions,
) -> Result<()> {
    let markdown = fs::read_to_string(source_path).map_err(|e| Error::FileRead {
        path: source_path.to_path_buf(),
        source: e,
    })?;

    let html = convert_markdown(&markdown, options)?;
    write_html_file(output_path, &html, options.open_after_export)?;

    info!(
        "Exported {} to {}",
        source_path.display(),
        output_path.display()
    );
    Ok(())
}

/// Write a finished page, creating missing parent directories, and
/// optionally open it in the default browser.
///
/// Failing to open the page only logs a warning.
pub fn write_html_file(output_path: &Path, html: &str, open_after_export: bool) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| Error::FileWrite {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    fs::write(output_path, html).map_err(|e| Error::FileWrite {
        path: output_path.to_path_buf(),
        source: e,
    })?;

    if open_after_export {
        if let Err(e) = open::that(output_path) {
            warn!("Could not open {}: {}", output_path.display(), e);
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
