//! Content source abstraction and the paginating fetcher.

use blockdown_core::Block;
use tracing::debug;

use crate::SourceError;

/// One page of a "list children" response
#[derive(Debug, Clone, Default)]
pub struct BlockPage {
    pub results: Vec<Block>,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

/// A hierarchical block store that lists the children of a block.
///
/// Implementations report failures as [`SourceError`]; retries and
/// rate-limiting are their own concern.
pub trait BlockSource {
    /// List one page of the children of `block_id`, starting at `cursor`
    fn list_children(&self, block_id: &str, cursor: Option<&str>)
        -> Result<BlockPage, SourceError>;
}

impl<T: BlockSource + ?Sized> BlockSource for &T {
    fn list_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<BlockPage, SourceError> {
        (**self).list_children(block_id, cursor)
    }
}

/// Fetch every child of `block_id`, following continuation cursors.
///
/// Source ordering is preserved across pages.
pub fn fetch_all_blocks(
    source: &dyn BlockSource,
    block_id: &str,
) -> Result<Vec<Block>, SourceError> {
    let mut blocks = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = source.list_children(block_id, cursor.as_deref())?;
        blocks.extend(page.results);

        if !page.has_more {
            break;
        }
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => {
                debug!(block = %block_id, "source reported more results without a cursor");
                break;
            }
        }
    }

    debug!(block = %block_id, count = blocks.len(), "fetched children");
    Ok(blocks)
}
