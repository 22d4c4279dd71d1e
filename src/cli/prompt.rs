//! Interactive conversion
//!
//! Asks for the Markdown file (re-asking until it can be read, `q` quits),
//! the theme mode and the output file name, then converts once.

use super::resolve_custom_css;
use crate::config::Settings;
use crate::error::Result;
use crate::export::{convert_markdown, write_html_file, ExportOptions};
use crate::theme::ThemeMode;
use log::debug;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Answer that ends the session at the file prompt
const QUIT: &str = "q";

/// Run one interactive conversion.
///
/// Returns the path written, or `None` when the user quit (or input ended)
/// before a file was chosen. Blank answers to the mode and output prompts
/// take the values from `settings`.
pub fn run_prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    settings: &Settings,
) -> Result<Option<PathBuf>> {
    let (source_path, markdown) = loop {
        let Some(answer) = ask(
            input,
            output,
            "Enter the path to your Markdown file (or 'q' to quit): ",
        )?
        else {
            writeln!(output)?;
            writeln!(output, "Goodbye!")?;
            return Ok(None);
        };

        if answer.eq_ignore_ascii_case(QUIT) {
            writeln!(output, "Goodbye!")?;
            return Ok(None);
        }

        match fs::read_to_string(&answer) {
            Ok(markdown) => break (PathBuf::from(answer), markdown),
            Err(e) => {
                writeln!(output, "Error: Could not read file '{}': {}", answer, e)?;
                writeln!(output, "Please check the path and try again.")?;
            }
        }
    };

    let theme = match ask(
        input,
        output,
        &format!("Choose mode (light/dark, default is {}): ", settings.theme),
    )? {
        Some(answer) if !answer.is_empty() => ThemeMode::from_name(&answer),
        _ => settings.theme,
    };

    let output_file = match ask(
        input,
        output,
        &format!(
            "Enter the name of the output HTML file (default: {}): ",
            settings.output_file
        ),
    )? {
        Some(answer) if !answer.is_empty() => answer,
        _ => settings.output_file.clone(),
    };
    let output_path = settings.output_dir.join(output_file);

    let css = resolve_custom_css(settings.css_file.as_deref(), theme, Path::new("."));
    writeln!(output, "{}", css.source.describe())?;

    let options = ExportOptions::from(settings)
        .with_theme(theme)
        .with_custom_css(css.css);
    debug!(
        "Converting {} to {} in {} mode",
        source_path.display(),
        output_path.display(),
        theme
    );
    let html = convert_markdown(&markdown, &options)?;
    write_html_file(&output_path, &html, options.open_after_export)?;

    writeln!(
        output,
        "Markdown converted to HTML successfully! Output saved to {}",
        output_path.display()
    )?;
    Ok(Some(output_path))
}

/// Print `question` and read one trimmed line. `None` at end of input.
fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<Option<String>> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
