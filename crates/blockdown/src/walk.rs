//! Recursive rendering of block sequences.
//!
//! A sequence is first grouped into units, some of which span several source
//! blocks (an image and the toggle that captions it). Each unit is then
//! rendered independently, passed through the custom rules, and indented as a
//! whole.

use blockdown_core::{
    child_page_link, extract_text, indent, indent_lines, render_block, table_fragment, Block,
    BlockKind, ExportOptions, Media, PageDescriptor, TableRow,
};
use tracing::warn;

use crate::media::{file_fragment, image_fragment, Materializer};
use crate::names::PageNames;
use crate::rules::Rules;
use crate::source::{fetch_all_blocks, BlockSource};

/// Markdown body of one page plus the child pages discovered while rendering it
#[derive(Debug, Clone, Default)]
pub struct RenderedPage {
    pub markdown: String,
    /// In discovery order; may contain the same page more than once
    pub child_pages: Vec<PageDescriptor>,
}

/// A renderable unit covering one or more consecutive sibling blocks
#[derive(Debug, Clone, Copy, PartialEq)]
enum Unit<'b> {
    ChildPage(&'b Block, &'b str),
    Image {
        image: &'b Block,
        media: &'b Media,
        caption: Option<&'b Block>,
    },
    Table(&'b Block, usize),
    File(&'b Block, &'b Media),
    Block(&'b Block),
}

impl<'b> Unit<'b> {
    /// The block that determines the unit's kind
    fn lead(&self) -> &'b Block {
        match *self {
            Unit::ChildPage(block, _)
            | Unit::Table(block, _)
            | Unit::File(block, _)
            | Unit::Block(block) => block,
            Unit::Image { image, .. } => image,
        }
    }
}

/// Group a sibling sequence into units. An image consumes an immediately
/// following toggle as its caption.
fn group_units(blocks: &[Block]) -> Vec<Unit<'_>> {
    let mut units = Vec::with_capacity(blocks.len());
    let mut iter = blocks.iter().peekable();

    while let Some(block) = iter.next() {
        let unit = match &block.kind {
            BlockKind::ChildPage { title } => Unit::ChildPage(block, title),
            BlockKind::Image(media) => Unit::Image {
                image: block,
                media,
                caption: iter.next_if(|next| next.is_toggle()),
            },
            BlockKind::Table { table_width, .. } => Unit::Table(block, *table_width),
            BlockKind::File(media) => Unit::File(block, media),
            _ => Unit::Block(block),
        };
        units.push(unit);
    }

    units
}

/// Pages discovered during one page render
struct Discovery<'n> {
    names: &'n mut PageNames,
    pages: Vec<PageDescriptor>,
}

/// Renders block trees, fetching nested content on demand
pub struct TreeWalker<'a> {
    source: &'a dyn BlockSource,
    materializer: &'a dyn Materializer,
    rules: &'a Rules,
    options: &'a ExportOptions,
}

impl<'a> TreeWalker<'a> {
    pub fn new(
        source: &'a dyn BlockSource,
        materializer: &'a dyn Materializer,
        rules: &'a Rules,
        options: &'a ExportOptions,
    ) -> Self {
        Self {
            source,
            materializer,
            rules,
            options,
        }
    }

    /// Render a page's top-level blocks at depth 0.
    ///
    /// Child pages are linked, named through `names`, and returned instead of
    /// being inlined.
    pub fn render_page(&self, blocks: &[Block], names: &mut PageNames) -> RenderedPage {
        let mut discovery = Discovery {
            names,
            pages: Vec::new(),
        };
        let markdown = self.render_blocks(blocks, 0, &mut discovery);

        RenderedPage {
            markdown,
            child_pages: discovery.pages,
        }
    }

    fn render_blocks(
        &self,
        blocks: &[Block],
        depth: usize,
        discovery: &mut Discovery<'_>,
    ) -> String {
        let prefix = indent(&self.options.indent_unit, depth);
        let mut out = String::new();

        for unit in group_units(blocks) {
            let lead = unit.lead();
            if self.rules.should_remove(lead) {
                continue;
            }

            let builtin = match unit {
                Unit::ChildPage(block, title) => self.child_page(block, title, discovery),
                Unit::Image {
                    image,
                    media,
                    caption,
                } => {
                    let alt = caption.map(|toggle| self.caption_text(toggle)).unwrap_or_default();
                    image_fragment(self.materializer, self.options, &image.id, media, &alt)
                }
                Unit::Table(block, width) => self.table(block, width),
                Unit::File(block, media) => {
                    file_fragment(self.materializer, self.options, &block.id, media)
                }
                Unit::Block(block) => render_block(block, self.options),
            };
            let fragment = self.rules.apply(lead, builtin, self.options);
            out.push_str(&indent_lines(&fragment, &prefix));

            if let Unit::Block(block) = unit {
                if block.has_children {
                    out.push_str(&self.children(block, depth + 1, discovery));
                }
            }
        }

        out
    }

    fn children(&self, block: &Block, depth: usize, discovery: &mut Discovery<'_>) -> String {
        match fetch_all_blocks(self.source, &block.id) {
            Ok(children) => self.render_blocks(&children, depth, discovery),
            Err(e) => {
                warn!(block = %block.id, error = %e, "could not fetch children, subtree skipped");
                String::new()
            }
        }
    }

    fn child_page(&self, block: &Block, title: &str, discovery: &mut Discovery<'_>) -> String {
        if title.trim().is_empty() {
            warn!(block = %block.id, "child page without a title skipped");
            return String::new();
        }

        let file_name = discovery.names.assign(&block.id, title);
        discovery
            .pages
            .push(PageDescriptor::new(block.id.clone(), title, file_name.clone()));
        child_page_link(self.options, title, &file_name)
    }

    fn table(&self, block: &Block, width: usize) -> String {
        match fetch_all_blocks(self.source, &block.id) {
            Ok(children) => {
                let rows: Vec<TableRow> = children
                    .into_iter()
                    .filter_map(|child| match child.kind {
                        BlockKind::TableRow(row) => Some(row),
                        _ => None,
                    })
                    .collect();
                table_fragment(&rows, width)
            }
            Err(e) => {
                warn!(block = %block.id, error = %e, "could not fetch table rows");
                String::new()
            }
        }
    }

    /// Text of every descendant of a caption toggle, on one line
    fn caption_text(&self, toggle: &Block) -> String {
        let mut texts = Vec::new();
        if toggle.has_children {
            self.collect_text(&toggle.id, &mut texts);
        }
        texts.join(" ").replace('\n', " ").trim().to_string()
    }

    fn collect_text(&self, parent_id: &str, texts: &mut Vec<String>) {
        let children = match fetch_all_blocks(self.source, parent_id) {
            Ok(children) => children,
            Err(e) => {
                warn!(block = %parent_id, error = %e, "could not fetch caption text");
                return;
            }
        };

        for child in &children {
            if let Some(spans) = child.rich_text() {
                let text = extract_text(spans);
                if !text.is_empty() {
                    texts.push(text);
                }
            }
            if child.has_children && !matches!(child.kind, BlockKind::ChildPage { .. }) {
                self.collect_text(&child.id, texts);
            }
        }
    }
}
