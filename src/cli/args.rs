//! Command-line interface definitions.

use crate::config::Settings;
use crate::markdown::HighlightStyle;
use crate::theme::ThemeMode;
use clap::Parser;
use std::path::PathBuf;

/// Convert Markdown files to styled, self-contained HTML5 pages.
///
/// Without `--input_file` the converter asks for the input file, theme and
/// output name interactively.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "md2html5", version, about, long_about = None)]
pub struct Args {
    /// Path to the input Markdown file
    #[arg(short = 'i', long = "input_file", visible_alias = "input-file", value_hint = clap::ValueHint::FilePath)]
    pub input_file: Option<PathBuf>,

    /// Name of the output HTML file [default: output.html]
    #[arg(short = 'o', long = "output_file", visible_alias = "output-file")]
    pub output_file: Option<String>,

    /// Directory where the output HTML file is saved [default: .]
    #[arg(short = 'd', long = "output_dir", visible_alias = "output-dir", value_hint = clap::ValueHint::DirPath)]
    pub output_dir: Option<PathBuf>,

    /// Path to a custom CSS file replacing the built-in page styles
    #[arg(short = 'c', long = "css_file", visible_alias = "css-file", value_hint = clap::ValueHint::FilePath)]
    pub css_file: Option<PathBuf>,

    /// Theme mode (light/dark); anything other than `dark` means light
    #[arg(short = 'm', long)]
    pub mode: Option<String>,

    /// Page title [default: Converted Markdown]
    #[arg(long)]
    pub title: Option<String>,

    /// Color code with inline styles from the selected palette instead of
    /// theme-switchable CSS classes
    #[arg(long)]
    pub inline_styles: bool,

    /// Open the page in the default browser after writing it
    #[arg(long)]
    pub open: bool,

    /// Print only warnings and errors
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Write the effective settings to the user config file and exit
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Override `settings` with every flag that was given.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(output_file) = &self.output_file {
            settings.output_file = output_file.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            settings.output_dir = output_dir.clone();
        }
        if let Some(css_file) = &self.css_file {
            settings.css_file = Some(css_file.clone());
        }
        if let Some(mode) = &self.mode {
            settings.theme = ThemeMode::from_name(mode);
        }
        if let Some(title) = &self.title {
            settings.title = title.clone();
        }
        if self.inline_styles {
            settings.highlight_style = HighlightStyle::Inline;
        }
        if self.open {
            settings.open_after_export = true;
        }
        settings.sanitize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_flags() {
        let args = Args::try_parse_from([
            "md2html5", "-i", "doc.md", "-o", "doc.html", "-d", "out", "-c", "a.css", "-m", "dark",
        ])
        .unwrap();
        assert_eq!(args.input_file, Some(PathBuf::from("doc.md")));
        assert_eq!(args.output_file.as_deref(), Some("doc.html"));
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
        assert_eq!(args.css_file, Some(PathBuf::from("a.css")));
        assert_eq!(args.mode.as_deref(), Some("dark"));
    }

    #[test]
    fn test_parse_long_flags_and_aliases() {
        let args = Args::try_parse_from([
            "md2html5",
            "--input_file",
            "a.md",
            "--output-dir",
            "site",
            "--inline-styles",
            "--quiet",
        ])
        .unwrap();
        assert_eq!(args.input_file, Some(PathBuf::from("a.md")));
        assert_eq!(args.output_dir, Some(PathBuf::from("site")));
        assert!(args.inline_styles);
        assert!(args.quiet);
    }

    #[test]
    fn test_no_arguments_is_valid() {
        let args = Args::try_parse_from(["md2html5"]).unwrap();
        assert!(args.input_file.is_none());
    }

    #[test]
    fn test_apply_overrides_settings() {
        let args = Args {
            output_file: Some("page.html".to_string()),
            mode: Some("sepia".to_string()),
            title: Some("Notes".to_string()),
            inline_styles: true,
            ..Args::default()
        };
        let mut settings = Settings {
            theme: ThemeMode::Dark,
            ..Settings::default()
        };
        args.apply_to(&mut settings);

        assert_eq!(settings.output_file, "page.html");
        assert_eq!(settings.theme, ThemeMode::Light);
        assert_eq!(settings.title, "Notes");
        assert_eq!(settings.highlight_style, HighlightStyle::Inline);
    }

    #[test]
    fn test_apply_keeps_settings_without_flags() {
        let mut settings = Settings {
            theme: ThemeMode::Dark,
            output_file: "custom.html".to_string(),
            ..Settings::default()
        };
        Args::default().apply_to(&mut settings);
        assert_eq!(settings.theme, ThemeMode::Dark);
        assert_eq!(settings.output_file, "custom.html");
    }
}
