//! Work queue of pages awaiting export.

use std::collections::{HashSet, VecDeque};

use blockdown_core::PageDescriptor;

/// FIFO of discovered pages plus the set of identifiers already dispatched.
///
/// A page is claimed (marked seen) when it is dequeued, so each identifier is
/// handed out at most once even if it was enqueued several times.
#[derive(Debug, Default)]
pub struct PageQueue {
    pending: VecDeque<PageDescriptor>,
    seen: HashSet<String>,
}

impl PageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page unless it has already been dispatched.
    ///
    /// Returns whether the page was queued.
    pub fn enqueue(&mut self, page: PageDescriptor) -> bool {
        if self.seen.contains(&page.id) {
            return false;
        }
        self.pending.push_back(page);
        true
    }

    /// Take the next page that has not been dispatched yet and claim it
    pub fn next_page(&mut self) -> Option<PageDescriptor> {
        while let Some(page) = self.pending.pop_front() {
            if self.seen.insert(page.id.clone()) {
                return Some(page);
            }
        }
        None
    }

    pub fn is_seen(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(id: &str) -> PageDescriptor {
        PageDescriptor::new(id, id, format!("{}.md", id))
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = PageQueue::new();
        queue.enqueue(page("a"));
        queue.enqueue(page("b"));
        assert_eq!(queue.next_page().map(|p| p.id), Some("a".to_string()));
        assert_eq!(queue.next_page().map(|p| p.id), Some("b".to_string()));
        assert!(queue.next_page().is_none());
    }

    #[test]
    fn test_duplicate_before_dispatch_is_dispatched_once() {
        let mut queue = PageQueue::new();
        assert!(queue.enqueue(page("a")));
        assert!(queue.enqueue(page("a")));
        assert_eq!(queue.len(), 2);

        assert!(queue.next_page().is_some());
        assert!(queue.next_page().is_none());
        assert!(queue.is_seen("a"));
    }

    #[test]
    fn test_enqueue_after_dispatch_is_ignored() {
        let mut queue = PageQueue::new();
        queue.enqueue(page("a"));
        queue.next_page();
        assert!(!queue.enqueue(page("a")));
        assert!(queue.is_empty());
    }
}
