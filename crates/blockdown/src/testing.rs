//! In-memory doubles for the source and materializer seams.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use blockdown_core::Block;

use crate::media::Materializer;
use crate::source::{BlockPage, BlockSource};
use crate::SourceError;

/// A block store backed by a map of parent id to children
pub struct MemorySource {
    children: HashMap<String, Vec<Block>>,
    failing: HashSet<String>,
    page_size: usize,
    calls: RefCell<HashMap<String, usize>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self {
            children: HashMap::new(),
            failing: HashSet::new(),
            page_size: 100,
            calls: RefCell::new(HashMap::new()),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_children(mut self, parent: &str, blocks: Vec<Block>) -> Self {
        self.children.insert(parent.to_string(), blocks);
        self
    }

    /// Make every listing of `parent` fail
    pub fn failing(mut self, parent: &str) -> Self {
        self.failing.insert(parent.to_string());
        self
    }

    pub fn calls_for(&self, parent: &str) -> usize {
        self.calls.borrow().get(parent).copied().unwrap_or(0)
    }
}

impl BlockSource for MemorySource {
    fn list_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<BlockPage, SourceError> {
        *self
            .calls
            .borrow_mut()
            .entry(block_id.to_string())
            .or_insert(0) += 1;

        if self.failing.contains(block_id) {
            return Err(SourceError::Api {
                status: 404,
                message: format!("Could not find block with ID: {}", block_id),
            });
        }

        let all = self.children.get(block_id).map(Vec::as_slice).unwrap_or(&[]);
        let start: usize = cursor.and_then(|c| c.parse().ok()).unwrap_or(0);
        let end = (start + self.page_size).min(all.len());
        let has_more = end < all.len();

        Ok(BlockPage {
            results: all[start.min(end)..end].to_vec(),
            has_more,
            next_cursor: has_more.then(|| end.to_string()),
        })
    }
}

/// Writes a placeholder file for every URL not listed as failing
pub struct RecordingMaterializer {
    failing: HashSet<String>,
    requests: RefCell<Vec<(String, PathBuf)>>,
}

impl RecordingMaterializer {
    pub fn new() -> Self {
        Self {
            failing: HashSet::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub fn requests(&self) -> Vec<(String, PathBuf)> {
        self.requests.borrow().clone()
    }
}

impl Materializer for RecordingMaterializer {
    fn materialize(&self, url: &str, destination: &Path) -> bool {
        self.requests
            .borrow_mut()
            .push((url.to_string(), destination.to_path_buf()));

        if self.failing.contains(url) {
            return false;
        }
        if let Some(parent) = destination.parent() {
            if fs::create_dir_all(parent).is_err() {
                return false;
            }
        }
        fs::write(destination, url.as_bytes()).is_ok()
    }
}
