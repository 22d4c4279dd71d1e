//! Export module for md2html5
//!
//! This module turns rendered Markdown into a standalone HTML5 page.
//!
//! - [`transform`]: code block rewriting, heading ids, image attributes
//! - [`assemble`]: the page shell, stylesheet and behavior script
//! - [`html`]: the whole pipeline, from Markdown text or file to page

mod assemble;
mod assets;
mod attributes;
mod css;
pub(crate) mod dom;
mod headings;
mod html;
mod options;
mod transform;

pub use assemble::{extract_body_content, DocumentAssembler, DEFAULT_TITLE, GENERATOR};
pub use assets::{BEHAVIOR_JS, DEFAULT_CSS};
pub use attributes::{apply_attribute_lists, parse_attribute_list, AttributeList};
pub use css::{scope_rules, scope_under_dark_theme, scope_under_highlight, HIGHLIGHT_CLASS};
pub use headings::{assign_heading_ids, expand_toc_markers, slugify, SlugAllocator};
pub use html::{convert_markdown, export_to_html_file, write_html_file};
pub use options::ExportOptions;
pub use transform::{
    decorate_images, CodeBlock, CodeBlockTransformer, TransformOptions, PLACEHOLDER_ALT,
};
