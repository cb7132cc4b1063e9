//! Structural rewrite applied before the link scan
//!
//! Notes are plain text. Paragraphs are separated by blank lines and lists are
//! written as:
//!
//! ```text
//! [list]
//! [*]first item
//! [*]second item
//! [/list]
//! ```
//!
//! Rewrites are plain substring replacements applied in table order. They run
//! before the link scan so list markers that share a glyph with a link marker
//! (`*`) are gone by the time the scanner sees the text.

/// Wraps the whole note
pub const PARAGRAPH_OPEN: &str = "<p>";
pub const PARAGRAPH_CLOSE: &str = "</p>";

/// Ordered substring rewrites. Earlier entries consume the newlines that
/// later entries would otherwise match.
pub const REWRITES: &[(&str, &str)] = &[
    ("[list]\n", "<ul>"),
    ("\n[/list]", "</li></ul>"),
    ("\n[*]", "</li><li>"),
    ("[*]", "<li>"),
    ("[/list]", "</ul>"),
    ("[list]", "<ul>"),
    ("\n\n", "</p><p>"),
];

/// List tokens removed by the rewrite, longest first
pub const LIST_TOKENS: &[&str] = &["[/list]", "[list]", "[*]"];

/// Length of the list token at the start of `rest`, if any
pub fn list_token_len(rest: &str) -> Option<usize> {
    LIST_TOKENS
        .iter()
        .find(|token| rest.starts_with(*token))
        .map(|token| token.len())
}

/// Apply paragraph and list rewrites once
pub fn rewrite(text: &str) -> String {
    let mut body = text.to_string();
    for (from, to) in REWRITES {
        if body.contains(from) {
            body = body.replace(from, to);
        }
    }

    let mut out = String::with_capacity(body.len() + PARAGRAPH_OPEN.len() + PARAGRAPH_CLOSE.len());
    out.push_str(PARAGRAPH_OPEN);
    out.push_str(&body);
    out.push_str(PARAGRAPH_CLOSE);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_wrapped() {
        assert_eq!(rewrite("hello"), "<p>hello</p>");
    }

    #[test]
    fn test_blank_line_splits_paragraphs() {
        assert_eq!(rewrite("one\n\ntwo"), "<p>one</p><p>two</p>");
    }

    #[test]
    fn test_single_newline_is_kept() {
        assert_eq!(rewrite("one\ntwo"), "<p>one\ntwo</p>");
    }

    #[test]
    fn test_list() {
        let text = "Loot:\n[list]\n[*]rope\n[*]torch\n[/list]";
        assert_eq!(
            rewrite(text),
            "<p>Loot:\n<ul><li>rope</li><li>torch</li></ul></p>"
        );
    }

    #[test]
    fn test_list_item_marker_does_not_survive() {
        let out = rewrite("[list]\n[*]a\n[/list]");
        assert!(!out.contains('*'));
    }

    #[test]
    fn test_inline_list_markers() {
        assert_eq!(rewrite("[list][*]a[/list]"), "<p><ul><li>a</ul></p>");
    }

    #[test]
    fn test_list_token_len() {
        assert_eq!(list_token_len("[*]rope"), Some(3));
        assert_eq!(list_token_len("[/list]"), Some(7));
        assert_eq!(list_token_len("[list]\n"), Some(6));
        assert_eq!(list_token_len("*rope"), None);
    }

    #[test]
    fn test_rewrite_is_single_pass() {
        let once = rewrite("a\n\nb");
        let twice = rewrite(&once);
        assert_eq!(once, "<p>a</p><p>b</p>");
        assert_eq!(twice, "<p><p>a</p><p>b</p></p>");
    }
}
