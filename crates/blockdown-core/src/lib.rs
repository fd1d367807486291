//! blockdown-core - block model and Markdown fragment rendering
//!
//! This crate provides the data structures and the per-kind renderer shared by
//! the `blockdown` traversal engine and the source adapters (such as
//! `blockdown-notion`).
//!
//! # Architecture
//!
//! ```text
//! Notion API ──adapter──▶ ┌──────────────┐
//!                         │              │
//!                         │  Block model │ ──render_block──▶ Markdown fragment
//! Test fixtures ─────────▶│              │
//!                         └──────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use blockdown_core::{render_block, Block, ExportOptions};
//!
//! let options = ExportOptions::default();
//! let heading = Block::heading(1, "h1", "Hello World");
//!
//! assert_eq!(render_block(&heading, &options), "\n## Hello World\n\n");
//! ```

mod model;
mod options;
mod render;
mod text;

pub use model::{Block, BlockKind, Icon, Media, RichText, TableRow};
pub use options::{ExportOptions, NameCollision, DEFAULT_SKIP_PHRASES};
pub use render::{
    attachment_link, broken_attachment_link, child_page_link, image_line, render_block,
    table_fragment,
};
pub use text::{extract_text, indent, indent_lines, normalize_language, sanitize_file_name};

/// A page scheduled for export as its own Markdown file.
///
/// Identity is the block identifier; `title` is written as the top-level
/// heading and `file_name` is relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDescriptor {
    pub id: String,
    pub title: String,
    pub file_name: String,
}

impl PageDescriptor {
    pub fn new(id: impl Into<String>, title: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            file_name: file_name.into(),
        }
    }

    /// Descriptor for the root page, always exported as `index.md`
    pub fn root(id: impl Into<String>) -> Self {
        Self::new(id, "index", "index.md")
    }
}
