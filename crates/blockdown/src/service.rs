//! Exporter - the main entry point for block tree to Markdown export.

use std::fs;
use std::path::{Path, PathBuf};

use blockdown_core::{ExportOptions, PageDescriptor};
use tracing::{error, info};

use crate::media::Materializer;
use crate::names::PageNames;
use crate::queue::PageQueue;
use crate::rules::{Filter, Rule, Rules};
use crate::source::{fetch_all_blocks, BlockSource};
use crate::walk::TreeWalker;
use crate::{ExportError, Result};

/// A page that was written to disk
#[derive(Debug, Clone)]
pub struct ExportedPage {
    pub page: PageDescriptor,
    pub path: PathBuf,
}

/// A page whose export was abandoned
#[derive(Debug)]
pub struct FailedPage {
    pub page: PageDescriptor,
    pub error: ExportError,
}

/// Outcome of one export run
#[derive(Debug, Default)]
pub struct ExportReport {
    pub exported: Vec<ExportedPage>,
    pub failed: Vec<FailedPage>,
}

impl ExportReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Exports a root page and every page reachable from it, one Markdown file
/// per page.
///
/// Pages are processed one at a time in discovery order; each page is fully
/// fetched, rendered and written before the next one is taken from the queue.
pub struct Exporter<S, M> {
    source: S,
    materializer: M,
    options: ExportOptions,
    rules: Rules,
}

impl<S: BlockSource, M: Materializer> Exporter<S, M> {
    /// Create an Exporter with default options
    pub fn new(source: S, materializer: M) -> Self {
        Self::with_options(source, materializer, ExportOptions::default())
    }

    /// Create an Exporter with custom options
    pub fn with_options(source: S, materializer: M, options: ExportOptions) -> Self {
        Self {
            source,
            materializer,
            options,
            rules: Rules::new(),
        }
    }

    /// Add a custom rule
    pub fn add_rule(&mut self, key: &str, rule: Rule) -> &mut Self {
        self.rules.add(key, rule);
        self
    }

    /// Drop blocks matching the filter, together with their children
    pub fn remove(&mut self, filter: Filter) -> &mut Self {
        self.rules.remove(filter);
        self
    }

    /// Apply a plugin
    pub fn use_plugin<F>(&mut self, plugin: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        plugin(self);
        self
    }

    /// Get the current options
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Export `root_id` as `index.md` and every page discovered beneath it.
    ///
    /// Only failure to create the output directories aborts the run; a page
    /// whose blocks cannot be fetched or whose file cannot be written is
    /// recorded in the report and the remaining queue is still processed.
    pub fn run(&self, root_id: &str) -> Result<ExportReport> {
        for dir in [
            self.options.output_dir.clone(),
            self.options.image_path(),
            self.options.file_path(),
        ] {
            fs::create_dir_all(&dir).map_err(|source| ExportError::Io {
                path: dir.clone(),
                source,
            })?;
        }
        info!(output = %self.options.output_dir.display(), "exporting");

        let mut queue = PageQueue::new();
        let mut names = PageNames::new(self.options.name_collision);
        let root = PageDescriptor::root(root_id);
        names.reserve(&root.id, &root.file_name);
        queue.enqueue(root);

        let walker = TreeWalker::new(&self.source, &self.materializer, &self.rules, &self.options);
        let mut report = ExportReport::default();

        while let Some(page) = queue.next_page() {
            info!(title = %page.title, id = %page.id, "processing page");

            match self.export_page(&walker, &page, &mut names) {
                Ok((path, child_pages)) => {
                    info!(path = %path.display(), "saved");
                    for child in child_pages {
                        queue.enqueue(child);
                    }
                    report.exported.push(ExportedPage { page, path });
                }
                Err(e) => {
                    error!(title = %page.title, id = %page.id, error = %e, "page export failed");
                    report.failed.push(FailedPage { page, error: e });
                }
            }
        }

        info!(
            exported = report.exported.len(),
            failed = report.failed.len(),
            "export finished"
        );
        Ok(report)
    }

    fn export_page(
        &self,
        walker: &TreeWalker<'_>,
        page: &PageDescriptor,
        names: &mut PageNames,
    ) -> Result<(PathBuf, Vec<PageDescriptor>)> {
        let blocks = fetch_all_blocks(&self.source, &page.id)?;
        let rendered = walker.render_page(&blocks, names);

        let path = self.options.output_dir.join(&page.file_name);
        write_page(&path, &page.title, &rendered.markdown)?;

        Ok((path, rendered.child_pages))
    }
}

fn write_page(path: &Path, title: &str, body: &str) -> Result<()> {
    let mut content = String::with_capacity(title.len() + body.len() + 4);
    content.push_str("# ");
    content.push_str(title);
    content.push_str("\n\n");
    content.push_str(body);

    fs::write(path, content).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
