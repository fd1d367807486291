//! Text helpers shared by the renderer and the traversal engine.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::RichText;

/// Characters that are not allowed in generated file names
static ILLEGAL_PATH_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\\/*?:"<>|]"#).expect("valid regex"));

/// Concatenate the plain text of every span, in order
pub fn extract_text(spans: &[RichText]) -> String {
    spans.iter().map(|span| span.plain_text.as_str()).collect()
}

/// Replace path-hostile characters with `_` and trim the result
pub fn sanitize_file_name(title: &str) -> String {
    ILLEGAL_PATH_CHARS.replace_all(title, "_").trim().to_string()
}

/// Indentation string for a nesting depth
pub fn indent(unit: &str, depth: usize) -> String {
    unit.repeat(depth)
}

/// Prefix every line of a fragment, blank lines included
pub fn indent_lines(fragment: &str, indent: &str) -> String {
    if fragment.is_empty() {
        return String::new();
    }
    if indent.is_empty() && fragment.ends_with('\n') {
        return fragment.to_string();
    }

    let mut out = String::with_capacity(fragment.len() + indent.len() * 4);
    for line in fragment.lines() {
        out.push_str(indent);
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Lower-case a code language tag and strip its spaces (`Plain Text` -> `plaintext`)
pub fn normalize_language(language: &str) -> String {
    language
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text() {
        let spans = vec![RichText::new("Hello, "), RichText::new("World")];
        assert_eq!(extract_text(&spans), "Hello, World");
        assert_eq!(extract_text(&[]), "");
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("a/b:c"), "a_b_c");
        assert_eq!(sanitize_file_name(r#"\*?"<>|"#), "_______");
        assert_eq!(sanitize_file_name("  Notes  "), "Notes");
        assert_eq!(sanitize_file_name("議事録"), "議事録");
    }

    #[test]
    fn test_indent() {
        assert_eq!(indent("    ", 0), "");
        assert_eq!(indent("  ", 3), "      ");
    }

    #[test]
    fn test_indent_lines() {
        assert_eq!(indent_lines("* a\n", "  "), "  * a\n");
        assert_eq!(indent_lines("\n## H\n\n", ">"), ">\n>## H\n>\n");
        assert_eq!(indent_lines("", "  "), "");
    }

    #[test]
    fn test_indent_lines_terminates_last_line() {
        assert_eq!(indent_lines("text", ""), "text\n");
        assert_eq!(indent_lines("a\nb", "-"), "-a\n-b\n");
    }

    #[test]
    fn test_normalize_language() {
        assert_eq!(normalize_language("Plain Text"), "plaintext");
        assert_eq!(normalize_language("Rust"), "rust");
        assert_eq!(normalize_language("C ++"), "c++");
    }
}
