//! Command-line front end
//!
//! Two ways to run a conversion:
//!
//! - argument based, when `--input_file` is given
//! - interactive, asking for the input file, mode and output name
//!
//! Both read the user config first and let flags override it.

mod args;
mod prompt;

pub use args::Args;
pub use prompt::run_prompt;

use crate::config::{load_config, save_config, Settings};
use crate::error::{Error, Result, ResultExt};
use crate::export::{export_to_html_file, ExportOptions};
use crate::theme::ThemeMode;
use log::{debug, info, warn};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Entry point
// ─────────────────────────────────────────────────────────────────────────────

/// Run the converter with parsed arguments.
pub fn run(args: Args) -> Result<()> {
    if !args.quiet {
        print_banner(&mut io::stdout())?;
    }

    let mut settings = load_config();
    args.apply_to(&mut settings);

    if args.init_config {
        let path = save_config(&settings)?;
        println!("Configuration written to {}", path.display());
        return Ok(());
    }

    match &args.input_file {
        Some(input) => {
            arg_based_conversion(input, &settings, args.quiet, &mut io::stdout()).map(|_| ())
        }
        None => {
            let stdin = io::stdin();
            run_prompt(&mut stdin.lock(), &mut io::stdout(), &settings).map(|_| ())
        }
    }
}

/// Short name and version banner.
pub fn print_banner<W: Write>(out: &mut W) -> io::Result<()> {
    let rule = "-".repeat(50);
    writeln!(out, "{}", rule)?;
    writeln!(
        out,
        "MD2HTML5 - Markdown to HTML Converter v{}",
        env!("CARGO_PKG_VERSION")
    )?;
    writeln!(out, "{}", rule)
}

/// Convert `input` using `settings` and write the page to
/// `settings.output_path()`. Returns the path written.
///
/// Status lines go to `out` unless `quiet` is set.
pub fn arg_based_conversion<W: Write>(
    input: &Path,
    settings: &Settings,
    quiet: bool,
    out: &mut W,
) -> Result<PathBuf> {
    let css = resolve_custom_css(settings.css_file.as_deref(), settings.theme, Path::new("."));
    if !quiet {
        writeln!(out, "{}", css.source.describe())?;
    }

    let options = ExportOptions::from(settings).with_custom_css(css.css);
    let output_path = settings.output_path();
    export_to_html_file(input, &output_path, &options)?;

    if !quiet {
        writeln!(
            out,
            "Markdown converted to HTML successfully! Output saved to {}",
            output_path.display()
        )?;
    }
    Ok(output_path)
}

// ─────────────────────────────────────────────────────────────────────────────
// CSS selection
// ─────────────────────────────────────────────────────────────────────────────

/// Where the page CSS came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssSource {
    /// The file named with `--css_file` or in the config
    Custom(PathBuf),
    /// `style_light.css` / `style_dark.css` next to the invocation
    ModeStylesheet(PathBuf),
    /// The stylesheet compiled into the binary
    BuiltIn,
}

impl CssSource {
    /// Status line printed before converting.
    pub fn describe(&self) -> String {
        match self {
            CssSource::Custom(path) => format!("Using custom CSS from: {}", path.display()),
            CssSource::ModeStylesheet(path) => format!("Using CSS from: {}", path.display()),
            CssSource::BuiltIn => "Using built-in CSS".to_string(),
        }
    }
}

/// Page CSS chosen for a conversion. `css` is `None` for the built-in CSS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCss {
    pub css: Option<String>,
    pub source: CssSource,
}

/// Pick the page CSS: the custom file, then the mode stylesheet in
/// `stylesheet_dir`, then the built-in CSS.
///
/// Unreadable or empty files are skipped.
pub fn resolve_custom_css(
    css_file: Option<&Path>,
    theme: ThemeMode,
    stylesheet_dir: &Path,
) -> ResolvedCss {
    if let Some(path) = css_file {
        if let Some(css) = load_css_file(path) {
            return ResolvedCss {
                css: Some(css),
                source: CssSource::Custom(path.to_path_buf()),
            };
        }
    }

    let mode_path = stylesheet_dir.join(theme.stylesheet_name());
    if mode_path.is_file() {
        if let Some(css) = load_css_file(&mode_path) {
            return ResolvedCss {
                css: Some(css),
                source: CssSource::ModeStylesheet(mode_path),
            };
        }
    } else {
        debug!("No {} found, using built-in CSS", mode_path.display());
    }

    ResolvedCss {
        css: None,
        source: CssSource::BuiltIn,
    }
}

/// Read a CSS file. Unreadable files log a warning; empty files are ignored.
pub fn load_css_file(path: &Path) -> Option<String> {
    let css = fs::read_to_string(path)
        .map(Some)
        .map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })
        .unwrap_or_warn_default(None, "Could not read CSS file")?;

    if css.trim().is_empty() {
        warn!("CSS file {} is empty, ignoring it", path.display());
        return None;
    }
    info!("Loaded {} bytes of CSS from {}", css.len(), path.display());
    Some(css)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_banner() {
        let mut out = Vec::new();
        print_banner(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("MD2HTML5 - Markdown to HTML Converter"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_custom_css_wins() {
        let dir = TempDir::new().unwrap();
        let custom = dir.path().join("custom.css");
        fs::write(&custom, "p { color: red; }").unwrap();
        fs::write(dir.path().join("style_light.css"), "p { color: blue; }").unwrap();

        let resolved = resolve_custom_css(Some(&custom), ThemeMode::Light, dir.path());
        assert_eq!(resolved.css.as_deref(), Some("p { color: red; }"));
        assert_eq!(resolved.source, CssSource::Custom(custom));
    }

    #[test]
    fn test_mode_stylesheet_is_used_by_mode() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("style_light.css"), "light").unwrap();
        fs::write(dir.path().join("style_dark.css"), "dark").unwrap();

        let light = resolve_custom_css(None, ThemeMode::Light, dir.path());
        assert_eq!(light.css.as_deref(), Some("light"));
        let dark = resolve_custom_css(None, ThemeMode::Dark, dir.path());
        assert_eq!(dark.css.as_deref(), Some("dark"));
        assert_eq!(
            dark.source,
            CssSource::ModeStylesheet(dir.path().join("style_dark.css"))
        );
    }

    #[test]
    fn test_unreadable_custom_css_falls_through() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("style_dark.css"), "dark").unwrap();

        let missing = dir.path().join("missing.css");
        let resolved = resolve_custom_css(Some(&missing), ThemeMode::Dark, dir.path());
        assert_eq!(resolved.css.as_deref(), Some("dark"));
    }

    #[test]
    fn test_built_in_when_nothing_found() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("style_light.css"), "  \n").unwrap();

        let resolved = resolve_custom_css(None, ThemeMode::Light, dir.path());
        assert_eq!(resolved.css, None);
        assert_eq!(resolved.source, CssSource::BuiltIn);
        assert_eq!(resolved.source.describe(), "Using built-in CSS");
    }

    #[test]
    fn test_arg_based_conversion_writes_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("notes.md");
        fs::write(&input, "# Notes\n\n```python\nprint(1)\n```\n").unwrap();

        let settings = Settings {
            output_dir: dir.path().join("site"),
            output_file: "notes.html".to_string(),
            theme: ThemeMode::Dark,
            ..Settings::default()
        };
        let mut out = Vec::new();
        let written = arg_based_conversion(&input, &settings, false, &mut out).unwrap();

        assert_eq!(written, dir.path().join("site").join("notes.html"));
        let status = String::from_utf8(out).unwrap();
        assert!(status.contains("converted to HTML successfully"));
        let html = fs::read_to_string(written).unwrap();
        assert!(html.contains("data-theme=\"dark\""));
        assert!(html.contains("code-header"));
    }

    #[test]
    fn test_arg_based_conversion_missing_input() {
        let dir = TempDir::new().unwrap();
        let settings = Settings {
            output_dir: dir.path().to_path_buf(),
            ..Settings::default()
        };
        let result =
            arg_based_conversion(&dir.path().join("nope.md"), &settings, false, &mut io::sink());
        assert!(matches!(result, Err(Error::FileRead { .. })));
    }

    #[test]
    fn test_quiet_conversion_prints_nothing() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("notes.md");
        fs::write(&input, "# Notes\n").unwrap();

        let settings = Settings {
            output_dir: dir.path().to_path_buf(),
            output_file: "notes.html".to_string(),
            ..Settings::default()
        };
        let mut out = Vec::new();
        let written = arg_based_conversion(&input, &settings, true, &mut out).unwrap();

        assert!(out.is_empty());
        assert!(written.is_file());
    }
}
