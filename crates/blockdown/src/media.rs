//! Media materialization: downloading images and attachments next to the
//! generated Markdown.

use std::path::Path;

use blockdown_core::{
    attachment_link, broken_attachment_link, extract_text, image_line, sanitize_file_name,
    ExportOptions, Media,
};
use tracing::{info, warn};

/// Stores a remote binary at a local path.
///
/// Returns `false` on any non-success status or I/O failure instead of an
/// error; callers degrade to a link that points at the remote URL. A failed
/// attempt may leave a partial file behind.
pub trait Materializer {
    fn materialize(&self, url: &str, destination: &Path) -> bool;
}

impl<T: Materializer + ?Sized> Materializer for &T {
    fn materialize(&self, url: &str, destination: &Path) -> bool {
        (**self).materialize(url, destination)
    }
}

/// Download an image block and return its `![alt](...)` line.
///
/// Images are stored as `<image_dir>/<block id>.png`. When the download fails
/// the line links to the original URL.
pub(crate) fn image_fragment(
    materializer: &dyn Materializer,
    options: &ExportOptions,
    block_id: &str,
    media: &Media,
    alt: &str,
) -> String {
    let Some(url) = media.url.as_deref() else {
        warn!(block = %block_id, "image block without a URL skipped");
        return String::new();
    };

    let file_name = format!("{}.png", block_id);
    let destination = options.image_path().join(&file_name);

    if materializer.materialize(url, &destination) {
        info!(path = %destination.display(), "image saved");
        image_line(options, alt, &format!("{}/{}", options.image_dir, file_name))
    } else {
        warn!(block = %block_id, "image download failed, linking the remote URL");
        image_line(options, alt, url)
    }
}

/// Download a file block and return its attachment link.
///
/// The display name is the caption, or the block id when there is none.
pub(crate) fn file_fragment(
    materializer: &dyn Materializer,
    options: &ExportOptions,
    block_id: &str,
    media: &Media,
) -> String {
    let Some(url) = media.url.as_deref() else {
        warn!(block = %block_id, "file block without a URL skipped");
        return String::new();
    };

    let caption = sanitize_file_name(&extract_text(&media.caption));
    let display_name = if caption.is_empty() {
        block_id.to_string()
    } else {
        caption
    };

    let file_name = format!("{}.pdf", display_name);
    let destination = options.file_path().join(&file_name);

    if materializer.materialize(url, &destination) {
        info!(path = %destination.display(), "attachment saved");
        attachment_link(
            options,
            &display_name,
            &format!("{}/{}", options.file_dir, file_name),
        )
    } else {
        warn!(block = %block_id, "attachment download failed");
        broken_attachment_link(options, url)
    }
}
