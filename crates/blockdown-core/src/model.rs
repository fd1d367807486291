//! Block model
//!
//! This module defines the immutable block snapshots rendered by blockdown.
//! Adapters convert their source representation into these types once per
//! fetch; nothing downstream mutates them.

/// A rich-text span reduced to its plain text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RichText {
    pub plain_text: String,
}

impl RichText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            plain_text: text.into(),
        }
    }
}

/// Callout icon
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Icon {
    Emoji(String),
    /// Uploaded or external icon images, which have no textual form
    Other,
}

/// A remotely hosted binary (image or file attachment)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Media {
    /// Download URL; hosted URLs usually expire after an hour
    pub url: Option<String>,
    pub caption: Vec<RichText>,
}

/// One table row: a list of cells, each a rich-text span list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableRow {
    pub cells: Vec<Vec<RichText>>,
}

/// Kind tag plus kind-specific payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Heading1(Vec<RichText>),
    Heading2(Vec<RichText>),
    Heading3(Vec<RichText>),
    Paragraph(Vec<RichText>),
    BulletedListItem(Vec<RichText>),
    NumberedListItem(Vec<RichText>),
    Toggle(Vec<RichText>),
    Callout {
        rich_text: Vec<RichText>,
        icon: Option<Icon>,
    },
    Divider,
    Code {
        rich_text: Vec<RichText>,
        language: Option<String>,
        caption: Vec<RichText>,
    },
    Table {
        table_width: usize,
        has_column_header: bool,
    },
    TableRow(TableRow),
    ColumnList,
    Column,
    Image(Media),
    File(Media),
    ChildPage {
        title: String,
    },
    /// Any kind this crate has no dedicated rendering for
    Unknown {
        kind: String,
        rich_text: Option<Vec<RichText>>,
    },
}

impl BlockKind {
    /// The source's kind tag (e.g. `heading_1`, `child_page`)
    pub fn name(&self) -> &str {
        match self {
            BlockKind::Heading1(_) => "heading_1",
            BlockKind::Heading2(_) => "heading_2",
            BlockKind::Heading3(_) => "heading_3",
            BlockKind::Paragraph(_) => "paragraph",
            BlockKind::BulletedListItem(_) => "bulleted_list_item",
            BlockKind::NumberedListItem(_) => "numbered_list_item",
            BlockKind::Toggle(_) => "toggle",
            BlockKind::Callout { .. } => "callout",
            BlockKind::Divider => "divider",
            BlockKind::Code { .. } => "code",
            BlockKind::Table { .. } => "table",
            BlockKind::TableRow(_) => "table_row",
            BlockKind::ColumnList => "column_list",
            BlockKind::Column => "column",
            BlockKind::Image(_) => "image",
            BlockKind::File(_) => "file",
            BlockKind::ChildPage { .. } => "child_page",
            BlockKind::Unknown { kind, .. } => kind,
        }
    }
}

/// A node in the source content tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: String,
    /// Whether the block owns child blocks that must be fetched separately
    pub has_children: bool,
    pub kind: BlockKind,
}

impl Block {
    /// Create a block without children
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            has_children: false,
            kind,
        }
    }

    /// Mark this block as owning child blocks
    pub fn with_children(mut self) -> Self {
        self.has_children = true;
        self
    }

    /// Create a heading block; levels above 3 are clamped to 3
    pub fn heading(level: u8, id: &str, text: &str) -> Self {
        let spans = vec![RichText::new(text)];
        let kind = match level {
            0 | 1 => BlockKind::Heading1(spans),
            2 => BlockKind::Heading2(spans),
            _ => BlockKind::Heading3(spans),
        };
        Self::new(id, kind)
    }

    pub fn paragraph(id: &str, text: &str) -> Self {
        Self::new(id, BlockKind::Paragraph(vec![RichText::new(text)]))
    }

    pub fn bulleted(id: &str, text: &str) -> Self {
        Self::new(id, BlockKind::BulletedListItem(vec![RichText::new(text)]))
    }

    pub fn numbered(id: &str, text: &str) -> Self {
        Self::new(id, BlockKind::NumberedListItem(vec![RichText::new(text)]))
    }

    pub fn toggle(id: &str, text: &str) -> Self {
        Self::new(id, BlockKind::Toggle(vec![RichText::new(text)]))
    }

    pub fn child_page(id: &str, title: &str) -> Self {
        Self::new(
            id,
            BlockKind::ChildPage {
                title: title.to_string(),
            },
        )
    }

    pub fn image(id: &str, url: &str) -> Self {
        Self::new(
            id,
            BlockKind::Image(Media {
                url: Some(url.to_string()),
                caption: Vec::new(),
            }),
        )
    }

    pub fn table(id: &str, table_width: usize) -> Self {
        Self::new(
            id,
            BlockKind::Table {
                table_width,
                has_column_header: false,
            },
        )
        .with_children()
    }

    pub fn table_row(id: &str, cells: &[&str]) -> Self {
        Self::new(
            id,
            BlockKind::TableRow(TableRow {
                cells: cells.iter().map(|c| vec![RichText::new(*c)]).collect(),
            }),
        )
    }

    /// The source's kind tag
    pub fn kind_name(&self) -> &str {
        self.kind.name()
    }

    /// The block's primary rich-text field, if its kind carries one
    pub fn rich_text(&self) -> Option<&[RichText]> {
        match &self.kind {
            BlockKind::Heading1(spans)
            | BlockKind::Heading2(spans)
            | BlockKind::Heading3(spans)
            | BlockKind::Paragraph(spans)
            | BlockKind::BulletedListItem(spans)
            | BlockKind::NumberedListItem(spans)
            | BlockKind::Toggle(spans) => Some(spans),
            BlockKind::Callout { rich_text, .. } | BlockKind::Code { rich_text, .. } => {
                Some(rich_text)
            }
            BlockKind::Unknown { rich_text, .. } => rich_text.as_deref(),
            _ => None,
        }
    }

    pub fn is_toggle(&self) -> bool {
        matches!(self.kind, BlockKind::Toggle(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(Block::heading(1, "a", "x").kind_name(), "heading_1");
        assert_eq!(Block::heading(3, "a", "x").kind_name(), "heading_3");
        assert_eq!(Block::child_page("a", "x").kind_name(), "child_page");

        let unknown = Block::new(
            "a",
            BlockKind::Unknown {
                kind: "quote".to_string(),
                rich_text: None,
            },
        );
        assert_eq!(unknown.kind_name(), "quote");
    }

    #[test]
    fn test_rich_text_access() {
        let p = Block::paragraph("a", "hello");
        assert_eq!(p.rich_text().map(|s| s.len()), Some(1));
        assert!(Block::new("b", BlockKind::Divider).rich_text().is_none());
    }

    #[test]
    fn test_table_owns_rows() {
        assert!(Block::table("t", 2).has_children);
        assert!(!Block::paragraph("p", "x").has_children);
    }
}
