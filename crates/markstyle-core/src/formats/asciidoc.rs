// SPDX-License-Identifier: AGPL-3.0-or-later
//! AsciiDoc line parser
//!
//! Pass order: header (terminal), bold, code, italic, links. Only the
//! constrained single-line forms are recognised; list markers are left as
//! they are.

use regex::Regex;
use std::sync::LazyLock;

use crate::ast::{Format, LineResult, StyleKind};
use crate::resolve::{
    double_delimited, fenced, regex_matches, single_delimited, DelimiterRule, LineState,
    Substitution,
};
use crate::traits::LineParser;

/// Deepest header level reported; deeper `=` runs are clamped to it
const MAX_HEADER_LEVEL: usize = 6;

static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(=+)\s+(\S.*?)\s*$").expect("invalid header regex"));
static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:link:([^\s\[\]]+)|((?:https?|ftp|irc|file)://[^\s\[\]]+|mailto:[^\s\[\]]+))\[([^\]]*)\]",
    )
    .expect("invalid link regex")
});

/// AsciiDoc line parser
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AsciiDocParser;

impl AsciiDocParser {
    pub const fn new() -> Self {
        Self
    }
}

impl LineParser for AsciiDocParser {
    fn format(&self) -> Format {
        Format::AsciiDoc
    }

    fn parse_line(&self, line: &str) -> LineResult {
        if let Some(header) = parse_header(line) {
            return header;
        }

        LineState::new(line)
            .pass(bold)
            .pass(code)
            .pass(italic)
            .pass(links)
            .finish()
    }
}

fn parse_header(line: &str) -> Option<LineResult> {
    let caps = HEADER.captures(line)?;
    let level = caps.get(1)?.as_str().len().min(MAX_HEADER_LEVEL) as u8;
    Some(LineResult::header(level, caps.get(2)?.as_str()))
}

fn bold(text: &str) -> Vec<Substitution> {
    double_delimited(text, &['*'], &['*'], StyleKind::Bold)
}

/// Double-backtick code may hold single backticks; single-backtick code may not
fn code(text: &str) -> Vec<Substitution> {
    fenced(text, '`', &[1, 2], StyleKind::Code)
}

fn italic(text: &str) -> Vec<Substitution> {
    single_delimited(text, &['*'], DelimiterRule::Exclusive, StyleKind::Italic)
}

fn links(text: &str) -> Vec<Substitution> {
    regex_matches(&LINK, text, |caps| {
        let url = caps.get(1).or_else(|| caps.get(2))?.as_str().to_string();
        // An empty label shows the target itself
        let label = match caps.get(3).map(|m| m.as_str()) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => url.clone(),
        };
        Some((label, StyleKind::Link { url }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::StyleSpan;
    use pretty_assertions::assert_eq;

    fn parse(line: &str) -> LineResult {
        AsciiDocParser::new().parse_line(line)
    }

    fn link(start: usize, end: usize, url: &str) -> StyleSpan {
        StyleSpan::new(start, end, StyleKind::Link { url: url.to_string() })
    }

    #[test]
    fn test_parse_section_title() {
        let result = parse("== Section Title");
        assert_eq!(result.header_level, Some(2));
        assert_eq!(result.plain_text, "Section Title");
        assert!(result.spans.is_empty());
    }

    #[test]
    fn test_document_title_and_deep_levels() {
        assert_eq!(parse("= Title").header_level, Some(1));
        assert_eq!(parse("====== Six").header_level, Some(6));
        assert_eq!(parse("======== Eight").header_level, Some(6));
        assert_eq!(parse("==no space").header_level, None);
    }

    #[test]
    fn test_header_is_terminal() {
        let result = parse("=== About **this**");
        assert_eq!(result.plain_text, "About **this**");
        assert!(result.spans.is_empty());
    }

    #[test]
    fn test_double_asterisk_bold() {
        let result = parse("a **strong** word");
        assert_eq!(result.plain_text, "a strong word");
        assert_eq!(result.spans, vec![StyleSpan::new(2, 7, StyleKind::Bold)]);
    }

    #[test]
    fn test_single_asterisk_is_italic() {
        let result = parse("an *emphasised* word");
        assert_eq!(result.plain_text, "an emphasised word");
        assert_eq!(result.spans, vec![StyleSpan::new(3, 12, StyleKind::Italic)]);
    }

    #[test]
    fn test_underscore_is_not_styled() {
        let result = parse("keep _this_ as is");
        assert_eq!(result.plain_text, "keep _this_ as is");
        assert!(result.spans.is_empty());
    }

    #[test]
    fn test_code_forms() {
        let result = parse("use ``x`y`` or `z`");
        assert_eq!(result.plain_text, "use x`y or z");
        assert_eq!(
            result.spans,
            vec![
                StyleSpan::new(4, 6, StyleKind::Code),
                StyleSpan::new(11, 11, StyleKind::Code),
            ]
        );
    }

    #[test]
    fn test_delimiter_runs_are_not_split() {
        for line in ["```x```", "***a***", "****a****"] {
            let result = parse(line);
            assert_eq!(result.plain_text, line, "line {line:?}");
            assert!(result.spans.is_empty(), "line {line:?}");
        }
    }

    #[test]
    fn test_url_link() {
        let result = parse("Visit https://x.com[our site] today");
        assert_eq!(result.plain_text, "Visit our site today");
        assert_eq!(result.spans, vec![link(6, 13, "https://x.com")]);
    }

    #[test]
    fn test_link_macro_prefix_is_not_part_of_url() {
        let result = parse("see link:docs/index.html[the docs]");
        assert_eq!(result.plain_text, "see the docs");
        assert_eq!(result.spans, vec![link(4, 11, "docs/index.html")]);

        let result = parse("link:https://x.com[x]");
        assert_eq!(result.spans, vec![link(0, 0, "https://x.com")]);
    }

    #[test]
    fn test_empty_label_shows_url() {
        let result = parse("go https://x.com[]");
        assert_eq!(result.plain_text, "go https://x.com");
        assert_eq!(result.spans, vec![link(3, 15, "https://x.com")]);
    }

    #[test]
    fn test_bare_url_is_left_alone() {
        let result = parse("plain https://x.com here");
        assert_eq!(result.plain_text, "plain https://x.com here");
        assert!(result.spans.is_empty());
    }

    #[test]
    fn test_list_markers_are_kept() {
        assert_eq!(parse("* item").plain_text, "* item");
        assert_eq!(parse(". step").plain_text, ". step");
    }

    #[test]
    fn test_malformed_markup_passes_through() {
        for line in ["", "  ", "*", "**", "``", "link:[x]", "https://x.com[unclosed"] {
            let result = parse(line);
            assert_eq!(result.plain_text, line, "line {line:?}");
            assert!(result.spans.is_empty(), "line {line:?}");
        }
    }

    #[test]
    fn test_bold_before_link_keeps_both_spans() {
        let result = parse("**b** https://x.com[x]");
        assert_eq!(result.plain_text, "b x");
        assert_eq!(
            result.spans,
            vec![StyleSpan::new(0, 0, StyleKind::Bold), link(2, 2, "https://x.com")]
        );
    }

    #[test]
    fn test_link_before_bold_shifts_bold_span() {
        // Links run last and shorten text left of the bold span, which
        // ends up over "m" instead of "b".
        let result = parse("link:u[x] **b** and some long tail");
        assert_eq!(result.plain_text, "x b and some long tail");
        assert_eq!(
            result.spans,
            vec![StyleSpan::new(10, 10, StyleKind::Bold), link(0, 0, "u")]
        );
    }

    #[test]
    fn test_shifted_span_past_end_is_dropped() {
        let result = parse("https://x.com[x] **bold** tail");
        assert_eq!(result.plain_text, "x bold tail");
        assert_eq!(result.spans, vec![link(0, 0, "https://x.com")]);
    }
}
