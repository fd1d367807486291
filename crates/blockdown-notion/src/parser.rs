//! Notion block JSON to [`Block`] conversion.
//!
//! Each block object carries its kind in `type` and the kind's payload under a
//! key of the same name:
//!
//! ```json
//! { "id": "…", "type": "paragraph", "has_children": false,
//!   "paragraph": { "rich_text": [ { "plain_text": "Hello" } ] } }
//! ```

use blockdown::{Block, BlockKind, BlockPage, Icon, Media, RichText, SourceError, TableRow};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

/// Response of `GET /v1/blocks/{id}/children`
#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBlock {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    has_children: bool,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
struct Span {
    #[serde(default)]
    plain_text: String,
}

#[derive(Debug, Default, Deserialize)]
struct TextPayload {
    #[serde(default)]
    rich_text: Vec<Span>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RawIcon {
    Emoji {
        emoji: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Default, Deserialize)]
struct CalloutPayload {
    #[serde(default)]
    rich_text: Vec<Span>,
    #[serde(default)]
    icon: Option<RawIcon>,
}

#[derive(Debug, Default, Deserialize)]
struct CodePayload {
    #[serde(default)]
    rich_text: Vec<Span>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    caption: Vec<Span>,
}

#[derive(Debug, Default, Deserialize)]
struct TablePayload {
    #[serde(default)]
    table_width: usize,
    #[serde(default)]
    has_column_header: bool,
}

#[derive(Debug, Default, Deserialize)]
struct TableRowPayload {
    #[serde(default)]
    cells: Vec<Vec<Span>>,
}

#[derive(Debug, Default, Deserialize)]
struct UrlObject {
    #[serde(default)]
    url: String,
}

/// Image and file payloads: Notion-hosted (`file`) or `external`
#[derive(Debug, Default, Deserialize)]
struct MediaPayload {
    #[serde(default)]
    file: Option<UrlObject>,
    #[serde(default)]
    external: Option<UrlObject>,
    #[serde(default)]
    caption: Vec<Span>,
}

#[derive(Debug, Default, Deserialize)]
struct ChildPagePayload {
    #[serde(default)]
    title: String,
}

fn spans(raw: Vec<Span>) -> Vec<RichText> {
    raw.into_iter().map(|s| RichText::new(s.plain_text)).collect()
}

fn payload<T: DeserializeOwned + Default>(value: Option<&Value>) -> Result<T, serde_json::Error> {
    match value {
        Some(v) => T::deserialize(v),
        None => Ok(T::default()),
    }
}

fn text(value: Option<&Value>) -> Result<Vec<RichText>, serde_json::Error> {
    payload::<TextPayload>(value).map(|p| spans(p.rich_text))
}

fn media(value: Option<&Value>) -> Result<Media, serde_json::Error> {
    let p: MediaPayload = payload(value)?;
    let url = p
        .file
        .or(p.external)
        .map(|u| u.url)
        .filter(|url| !url.is_empty());
    Ok(Media {
        url,
        caption: spans(p.caption),
    })
}

fn known_kind(kind: &str, value: Option<&Value>) -> Option<Result<BlockKind, serde_json::Error>> {
    let parsed = match kind {
        "heading_1" => text(value).map(BlockKind::Heading1),
        "heading_2" => text(value).map(BlockKind::Heading2),
        "heading_3" => text(value).map(BlockKind::Heading3),
        "paragraph" => text(value).map(BlockKind::Paragraph),
        "bulleted_list_item" => text(value).map(BlockKind::BulletedListItem),
        "numbered_list_item" => text(value).map(BlockKind::NumberedListItem),
        "toggle" => text(value).map(BlockKind::Toggle),
        "callout" => payload::<CalloutPayload>(value).map(|p| BlockKind::Callout {
            rich_text: spans(p.rich_text),
            icon: p.icon.map(|icon| match icon {
                RawIcon::Emoji { emoji } => Icon::Emoji(emoji),
                RawIcon::Other => Icon::Other,
            }),
        }),
        "divider" => Ok(BlockKind::Divider),
        "code" => payload::<CodePayload>(value).map(|p| BlockKind::Code {
            rich_text: spans(p.rich_text),
            language: p.language,
            caption: spans(p.caption),
        }),
        "table" => payload::<TablePayload>(value).map(|p| BlockKind::Table {
            table_width: p.table_width,
            has_column_header: p.has_column_header,
        }),
        "table_row" => payload::<TableRowPayload>(value).map(|p| {
            BlockKind::TableRow(TableRow {
                cells: p.cells.into_iter().map(spans).collect(),
            })
        }),
        "column_list" => Ok(BlockKind::ColumnList),
        "column" => Ok(BlockKind::Column),
        "image" => media(value).map(BlockKind::Image),
        "file" => media(value).map(BlockKind::File),
        "child_page" => payload::<ChildPagePayload>(value).map(|p| BlockKind::ChildPage { title: p.title }),
        _ => return None,
    };
    Some(parsed)
}

fn unknown_kind(kind: &str, value: Option<&Value>) -> BlockKind {
    let rich_text = value
        .and_then(|v| v.get("rich_text"))
        .and_then(|rt| Vec::<Span>::deserialize(rt).ok())
        .map(spans);
    BlockKind::Unknown {
        kind: kind.to_string(),
        rich_text,
    }
}

/// Convert one block object.
///
/// A payload that does not match its kind degrades to an unknown block so
/// that rendering can still extract its text.
pub(crate) fn parse_block(value: Value) -> Result<Block, SourceError> {
    let raw: RawBlock =
        serde_json::from_value(value).map_err(|e| SourceError::Decode(e.to_string()))?;
    let body = raw.rest.get(&raw.kind);

    let kind = match known_kind(&raw.kind, body) {
        Some(Ok(kind)) => kind,
        Some(Err(e)) => {
            warn!(block = %raw.id, kind = %raw.kind, error = %e, "malformed block payload");
            unknown_kind(&raw.kind, body)
        }
        None => unknown_kind(&raw.kind, body),
    };

    Ok(Block {
        id: raw.id,
        has_children: raw.has_children,
        kind,
    })
}

/// Convert a children listing; block objects without an id or type are skipped
fn parse_list(response: ListResponse) -> BlockPage {
    let mut results = Vec::with_capacity(response.results.len());
    for value in response.results {
        match parse_block(value) {
            Ok(block) => results.push(block),
            Err(e) => warn!(error = %e, "skipping unreadable block"),
        }
    }

    BlockPage {
        results,
        has_more: response.has_more,
        next_cursor: response.next_cursor,
    }
}

/// Parse a raw `list children` response body
pub(crate) fn parse_blocks_pagination(body: &str) -> Result<BlockPage, SourceError> {
    let response: ListResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Decode(e.to_string()))?;
    Ok(parse_list(response))
}
