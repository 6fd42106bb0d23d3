//! `@include` line parsing.

use crate::error::{BuildError, BuildResult};

/// Keyword that marks a line as an include directive.
pub const KEYWORD: &str = "@include";

/// Extension appended to a template name to locate its file.
pub const TEMPLATE_EXT: &str = "html";

/// A parsed `@include <name>` line.
///
/// The directive keeps the exact line text, which is the key used when
/// splicing the expansion back into the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive<'a> {
    pub line: &'a str,
    pub name: &'a str,
}

impl<'a> Directive<'a> {
    /// Parse a line. Returns `Ok(None)` for lines without the keyword.
    ///
    /// The name is the second whitespace-separated token of the trimmed line,
    /// so `<p>@include nav</p>` names `nav</p>`. Nothing is unquoted.
    pub fn parse(line: &'a str) -> BuildResult<Option<Self>> {
        if !line.contains(KEYWORD) {
            return Ok(None);
        }

        let name = line
            .split_whitespace()
            .nth(1)
            .ok_or_else(|| BuildError::MalformedDirective {
                line: line.to_owned(),
            })?;

        Ok(Some(Self { line, name }))
    }

    /// File name of the referenced template, e.g. `header.html`.
    pub fn file_name(&self) -> String {
        format!("{}.{TEMPLATE_EXT}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_line_is_not_directive() {
        assert_eq!(Directive::parse("<p>hello</p>").unwrap(), None);
        assert_eq!(Directive::parse("").unwrap(), None);
    }

    #[test]
    fn test_simple_directive() {
        let d = Directive::parse("@include header").unwrap().unwrap();
        assert_eq!(d.name, "header");
        assert_eq!(d.line, "@include header");
        assert_eq!(d.file_name(), "header.html");
    }

    #[test]
    fn test_indented_directive_keeps_exact_line() {
        let line = "    @include   nav   ";
        let d = Directive::parse(line).unwrap().unwrap();
        assert_eq!(d.name, "nav");
        assert_eq!(d.line, line);
    }

    #[test]
    fn test_tabs_and_crlf() {
        let d = Directive::parse("\t@include\tfooter\r").unwrap().unwrap();
        assert_eq!(d.name, "footer");
    }

    #[test]
    fn test_nested_path_name() {
        let d = Directive::parse("@include partials/card").unwrap().unwrap();
        assert_eq!(d.file_name(), "partials/card.html");
    }

    #[test]
    fn test_extra_tokens_are_ignored() {
        let d = Directive::parse("@include head extra stuff").unwrap().unwrap();
        assert_eq!(d.name, "head");
    }

    #[test]
    fn test_keyword_glued_to_markup() {
        // Second token is taken verbatim.
        let d = Directive::parse("<div>@include header</div>").unwrap().unwrap();
        assert_eq!(d.name, "header</div>");
    }

    #[test]
    fn test_missing_name_is_malformed() {
        let err = Directive::parse("  @include  ").unwrap_err();
        assert!(matches!(err, BuildError::MalformedDirective { ref line } if line == "  @include  "));
    }
}
