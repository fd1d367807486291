//! # blockdown
//!
//! Export a tree of content blocks into a directory of linked Markdown files.
//!
//! ## Design
//!
//! blockdown does not talk to any particular service. It consumes a
//! [`BlockSource`] that lists the children of a block and a [`Materializer`]
//! that downloads binaries, so that:
//!
//! - **Adapters stay thin**: the Notion client in `blockdown-notion` only
//!   translates JSON into [`Block`]s
//! - **Traversal is testable**: the whole engine runs against in-memory sources
//! - **Each page is exported once**: child pages are queued, deduplicated by
//!   identifier, and written to their own files instead of being inlined
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use blockdown::{Block, BlockPage, BlockSource, Exporter, Materializer, SourceError};
//!
//! struct Fixed(Vec<Block>);
//!
//! impl BlockSource for Fixed {
//!     fn list_children(&self, id: &str, _cursor: Option<&str>) -> Result<BlockPage, SourceError> {
//!         let results = if id == "root" { self.0.clone() } else { Vec::new() };
//!         Ok(BlockPage { results, has_more: false, next_cursor: None })
//!     }
//! }
//!
//! struct NoDownloads;
//!
//! impl Materializer for NoDownloads {
//!     fn materialize(&self, _url: &str, _destination: &Path) -> bool {
//!         false
//!     }
//! }
//!
//! let source = Fixed(vec![Block::heading(1, "h", "Hello World")]);
//! let report = Exporter::new(source, NoDownloads).run("root").unwrap();
//! assert!(report.is_success());
//! ```

mod media;
mod names;
mod queue;
mod rules;
mod service;
mod source;
mod walk;

#[cfg(test)]
mod testing;

pub use blockdown_core::{
    Block, BlockKind, ExportOptions, Icon, Media, NameCollision, PageDescriptor, RichText,
    TableRow,
};
pub use media::Materializer;
pub use names::PageNames;
pub use queue::PageQueue;
pub use rules::{Filter, Matched, ReplacementFn, Rule, Rules};
pub use service::{ExportReport, ExportedPage, Exporter, FailedPage};
pub use source::{fetch_all_blocks, BlockPage, BlockSource};
pub use walk::{RenderedPage, TreeWalker};

use std::path::PathBuf;

/// Failure reported by a [`BlockSource`]
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Decode(String),
}

/// Error type for export operations
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Could not list blocks: {0}")]
    Source(#[from] SourceError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ExportError>;
