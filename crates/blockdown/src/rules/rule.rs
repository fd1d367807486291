//! Block filters and replacement rules.

use blockdown_core::{extract_text, Block, ExportOptions};

/// A matched block as seen by a replacement
pub struct Matched<'a> {
    pub block: &'a Block,
    /// Plain text of the block; empty for kinds without text
    pub text: &'a str,
    /// What the built-in handling produced for this block, unindented.
    ///
    /// For child pages, images, tables and files this already reflects page
    /// discovery, downloads and row fetching.
    pub default: &'a str,
    pub options: &'a ExportOptions,
}

pub type ReplacementFn = Box<dyn Fn(&Matched<'_>) -> String + Send + Sync>;

/// Selects blocks for a rule or for removal
pub enum Filter {
    /// Kind names as reported by [`Block::kind_name`], e.g. `"child_page"`
    Kinds(Vec<String>),
    /// Blocks whose plain text contains the phrase
    TextContains(String),
    Predicate(Box<dyn Fn(&Block) -> bool + Send + Sync>),
}

impl Filter {
    pub fn kind(name: &str) -> Self {
        Filter::Kinds(vec![name.to_string()])
    }

    pub fn kinds(names: &[&str]) -> Self {
        Filter::Kinds(names.iter().map(|s| s.to_string()).collect())
    }

    pub fn text_contains(phrase: &str) -> Self {
        Filter::TextContains(phrase.to_string())
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Block) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate(Box::new(f))
    }

    pub fn matches(&self, block: &Block) -> bool {
        match self {
            Filter::Kinds(kinds) => kinds.iter().any(|k| k == block.kind_name()),
            Filter::TextContains(phrase) => block
                .rich_text()
                .is_some_and(|spans| extract_text(spans).contains(phrase.as_str())),
            Filter::Predicate(f) => f(block),
        }
    }
}

/// Replaces the output of every block its filter selects
pub struct Rule {
    pub filter: Filter,
    pub replacement: ReplacementFn,
}

impl Rule {
    pub fn new<F>(filter: Filter, replacement: F) -> Self
    where
        F: Fn(&Matched<'_>) -> String + Send + Sync + 'static,
    {
        Self {
            filter,
            replacement: Box::new(replacement),
        }
    }

    pub fn for_kinds<F>(kinds: &[&str], replacement: F) -> Self
    where
        F: Fn(&Matched<'_>) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::kinds(kinds), replacement)
    }

    /// Run the replacement over a block and its built-in output
    pub fn apply(&self, block: &Block, default: &str, options: &ExportOptions) -> String {
        let text = block.rich_text().map(extract_text).unwrap_or_default();
        (self.replacement)(&Matched {
            block,
            text: &text,
            default,
            options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockdown_core::BlockKind;

    #[test]
    fn test_kind_filter_matches_kind_name() {
        let filter = Filter::kinds(&["child_page", "table"]);
        assert!(filter.matches(&Block::child_page("1", "Sub")));
        assert!(filter.matches(&Block::table("t", 2)));
        assert!(!filter.matches(&Block::paragraph("p", "child_page")));
    }

    #[test]
    fn test_unknown_kinds_match_by_their_source_name() {
        let quote = Block::new(
            "q",
            BlockKind::Unknown {
                kind: "quote".to_string(),
                rich_text: None,
            },
        );
        assert!(Filter::kind("quote").matches(&quote));
    }

    #[test]
    fn test_text_contains_filter() {
        let filter = Filter::text_contains("Back to top");
        assert!(filter.matches(&Block::paragraph("p", "↑ Back to top")));
        assert!(filter.matches(&Block::bulleted("b", "Back to top")));
        assert!(!filter.matches(&Block::paragraph("p", "Top")));
        assert!(!filter.matches(&Block::new("d", BlockKind::Divider)));
    }

    #[test]
    fn test_apply_sees_text_and_default() {
        let rule = Rule::for_kinds(&["heading_1"], |m| {
            format!("{}|{}|{}", m.block.id, m.text, m.default.trim())
        });
        let block = Block::heading(1, "h", "Title");
        assert_eq!(
            rule.apply(&block, "## Title", &ExportOptions::default()),
            "h|Title|## Title"
        );
    }
}
