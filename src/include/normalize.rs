//! Fragment normalization before splicing.

use regex::Regex;
use std::sync::OnceLock;

/// Wrapper tags stripped from included fragments, wherever they appear.
const WRAPPER_TAGS: &[&str] = &["<html>", "</html>", "<head>", "</head>", "<body>", "</body>"];

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s\s+").unwrap())
}

/// Collapse whitespace runs to one space, then drop wrapper tag text.
///
/// This is textual: `<body class="x">` is left alone, and a `<head>` in the
/// middle of content is removed all the same.
pub fn normalize(fragment: &str) -> String {
    let collapsed = whitespace_run().replace_all(fragment, " ");

    WRAPPER_TAGS
        .iter()
        .fold(collapsed.into_owned(), |text, tag| text.replace(tag, ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_runs() {
        assert_eq!(normalize("a  b\t\tc \n d"), "a b c d");
    }

    #[test]
    fn test_single_whitespace_is_kept() {
        assert_eq!(normalize("a b\nc\td"), "a b\nc\td");
    }

    #[test]
    fn test_strips_wrappers() {
        assert_eq!(
            normalize("<html><head></head><body>Hello   World</body></html>"),
            "Hello World"
        );
    }

    #[test]
    fn test_strips_wrappers_mid_string() {
        assert_eq!(normalize("<p>a<body>b</body>c</p>"), "<p>abc</p>");
        assert_eq!(normalize("x<head>y<head>z"), "xyz");
    }

    #[test]
    fn test_head_content_survives() {
        // Only the tags go; their content stays.
        assert_eq!(normalize("<head><title>T</title></head>"), "<title>T</title>");
    }

    #[test]
    fn test_attributes_are_not_matched() {
        assert_eq!(normalize("<body class=\"x\">y</body>"), "<body class=\"x\">y");
    }

    #[test]
    fn test_empty() {
        assert_eq!(normalize(""), "");
    }
}
