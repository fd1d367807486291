//! Block rendering
//!
//! Converts single blocks into unindented Markdown fragments. Indentation is
//! applied by the caller, once per fragment, via [`crate::indent_lines`].

use std::borrow::Cow;

use tracing::{error, warn};

use crate::model::{Block, BlockKind, Icon, RichText, TableRow};
use crate::options::ExportOptions;
use crate::text::{extract_text, normalize_language};

/// Render one block to a Markdown fragment.
///
/// Total over every kind: blocks without a textual form render to an empty
/// string. Tables, images, files and child pages need I/O and are rendered by
/// the traversal engine with the fragment builders below; reaching them here
/// yields an empty fragment.
pub fn render_block(block: &Block, options: &ExportOptions) -> String {
    match &block.kind {
        BlockKind::Heading1(spans) => heading(2, spans),
        BlockKind::Heading2(spans) => heading(3, spans),
        BlockKind::Heading3(spans) => heading(4, spans),

        BlockKind::Paragraph(spans) => {
            let text = extract_text(spans);
            if options.is_boilerplate(&text) {
                String::new()
            } else {
                format!("{}\n\n", text)
            }
        }

        BlockKind::BulletedListItem(spans) => format!("* {}\n", extract_text(spans)),

        // Every item is "1."; Markdown renderers renumber the list
        BlockKind::NumberedListItem(spans) => format!("1. {}\n", extract_text(spans)),

        BlockKind::Toggle(spans) => format!("{}\n\n", extract_text(spans)),

        BlockKind::Callout { rich_text, icon } => {
            let icon = match icon {
                Some(Icon::Emoji(emoji)) if !emoji.is_empty() => emoji.as_str(),
                _ => options.default_callout_icon.as_str(),
            };
            format!("> {} {}\n", icon, extract_text(rich_text))
        }

        BlockKind::Divider => "---\n\n".to_string(),

        BlockKind::Code {
            rich_text,
            language,
            caption,
        } => code_block(rich_text, language.as_deref(), caption),

        BlockKind::ColumnList => String::new(),

        BlockKind::Column => "\n\n".to_string(),

        // Rows are only meaningful inside their table
        BlockKind::TableRow(_) => String::new(),

        BlockKind::Table { .. }
        | BlockKind::Image(_)
        | BlockKind::File(_)
        | BlockKind::ChildPage { .. } => String::new(),

        BlockKind::Unknown { kind, rich_text } => match rich_text {
            Some(spans) => {
                warn!(kind = %kind, block = %block.id, "unknown block type, text extracted anyway");
                format!("{}\n\n", extract_text(spans))
            }
            None => {
                error!(kind = %kind, block = %block.id, "unsupported block type skipped");
                String::new()
            }
        },
    }
}

fn heading(hashes: usize, spans: &[RichText]) -> String {
    format!("\n{} {}\n\n", "#".repeat(hashes), extract_text(spans))
}

fn code_block(rich_text: &[RichText], language: Option<&str>, caption: &[RichText]) -> String {
    let lang = normalize_language(language.unwrap_or("plain text"));
    let code = extract_text(rich_text);
    let caption = extract_text(caption);

    let mut out = String::with_capacity(code.len() + lang.len() + 16);
    out.push_str("```");
    out.push_str(&lang);
    out.push('\n');
    out.push_str(&code);
    out.push_str("\n```\n");
    if !caption.is_empty() {
        out.push_str("*caption: ");
        out.push_str(&caption);
        out.push_str("*\n");
    }
    out.push('\n');
    out
}

/// Render table rows; the first row is always the header.
///
/// Returns an empty string for a table without rows.
pub fn table_fragment(rows: &[TableRow], table_width: usize) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    for (i, row) in rows.iter().enumerate() {
        let cells: Vec<String> = row.cells.iter().map(|cell| extract_text(cell)).collect();
        out.push_str("| ");
        out.push_str(&cells.join(" | "));
        out.push_str(" |\n");

        if i == 0 {
            out.push_str("| ");
            out.push_str(&vec!["---"; table_width].join(" | "));
            out.push_str(" |\n");
        }
    }
    out.push('\n');
    out
}

fn destination<'t>(options: &ExportOptions, target: &'t str) -> Cow<'t, str> {
    if options.angle_bracket_links && target.contains(char::is_whitespace) {
        Cow::Owned(format!("<{}>", target))
    } else {
        Cow::Borrowed(target)
    }
}

/// Link line emitted where a child page was discovered
pub fn child_page_link(options: &ExportOptions, title: &str, file_name: &str) -> String {
    format!("### 📄 [{}]({})\n\n", title, destination(options, file_name))
}

pub fn image_line(options: &ExportOptions, alt: &str, target: &str) -> String {
    format!("![{}]({})\n", alt, destination(options, target))
}

/// Link to a downloaded attachment
pub fn attachment_link(options: &ExportOptions, display_name: &str, target: &str) -> String {
    format!(
        "[{}: {}]({})\n\n",
        options.attachment_label,
        display_name,
        destination(options, target)
    )
}

/// Link to the original URL of an attachment that could not be downloaded
pub fn broken_attachment_link(options: &ExportOptions, url: &str) -> String {
    format!(
        "[{}]({})\n\n",
        options.broken_attachment_label,
        destination(options, url)
    )
}
