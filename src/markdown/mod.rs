//! Markdown rendering and syntax highlighting
//!
//! This module provides the two engines the export pipeline is built on:
//! comrak, a CommonMark + GFM compatible renderer, and syntect for code
//! highlighting.
//!
//! # Example
//! ```ignore
//! use md2html5::markdown::{render_to_html, get_highlighter};
//!
//! let html = render_to_html("# Hello\n\n```rust\nfn main() {}\n```");
//! let lexer = get_highlighter().resolve_lexer("rust");
//! ```

mod parser;
pub mod syntax;

pub use parser::{render_to_html, render_to_html_with_options, MarkdownOptions};
pub use syntax::{get_highlighter, HighlightStyle, Lexer, SyntaxHighlighter, PLAIN_TEXT_LANGUAGE};
