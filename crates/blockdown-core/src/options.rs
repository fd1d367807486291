//! Configuration options for export and rendering

use std::path::PathBuf;

/// Navigation boilerplate paragraphs that are dropped from the output
pub const DEFAULT_SKIP_PHRASES: &[&str] = &[
    "トップページに戻る",
    "トップページへ戻る",
    "TOPへ戻る",
    "目次へ戻る",
];

/// What to do when two pages sanitize to the same file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameCollision {
    /// Append a short block identifier to the later page's file name
    #[default]
    Disambiguate,
    /// Reuse the name; the later export overwrites the earlier file
    Overwrite,
}

/// Options for export
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Root of the generated Markdown tree
    pub output_dir: PathBuf,

    /// String repeated once per nesting level
    pub indent_unit: String,

    /// Subdirectory of `output_dir` for downloaded images
    pub image_dir: String,

    /// Subdirectory of `output_dir` for downloaded attachments
    pub file_dir: String,

    /// Paragraphs containing any of these are not rendered
    pub skip_phrases: Vec<String>,

    /// Callout icon used when the block has no emoji icon
    pub default_callout_icon: String,

    /// Link text prefix for downloaded attachments
    pub attachment_label: String,

    /// Link text for attachments that could not be downloaded
    pub broken_attachment_label: String,

    /// File name collision policy
    pub name_collision: NameCollision,

    /// Write link destinations containing spaces as `<dest>` so that
    /// CommonMark readers still see a link
    pub angle_bracket_links: bool,
}

impl ExportOptions {
    pub fn image_path(&self) -> PathBuf {
        self.output_dir.join(&self.image_dir)
    }

    pub fn file_path(&self) -> PathBuf {
        self.output_dir.join(&self.file_dir)
    }

    /// Check a paragraph's text against the skip phrases
    pub fn is_boilerplate(&self, text: &str) -> bool {
        self.skip_phrases
            .iter()
            .any(|phrase| !phrase.is_empty() && text.contains(phrase.as_str()))
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("docs"),
            indent_unit: "    ".to_string(),
            image_dir: "images".to_string(),
            file_dir: "files".to_string(),
            skip_phrases: DEFAULT_SKIP_PHRASES.iter().map(|s| s.to_string()).collect(),
            default_callout_icon: "💡".to_string(),
            attachment_label: "📎 添付PDF".to_string(),
            broken_attachment_label: "📎 添付PDF(リンク切れ)".to_string(),
            name_collision: NameCollision::Disambiguate,
            angle_bracket_links: false,
        }
    }
}
