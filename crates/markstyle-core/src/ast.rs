// SPDX-License-Identifier: AGPL-3.0-or-later
//! Styled-span model shared by the detector, the line parsers and hosts
//!
//! All offsets are plain character offsets (not bytes, not grapheme
//! clusters) into the markup-free text of a single line.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::traits::ConversionError;

/// Markup dialect of a block of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Markdown,
    AsciiDoc,
}

impl Format {
    /// File extension for this format
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::AsciiDoc => "adoc",
        }
    }

    /// Short display name
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Markdown => "MD",
            Self::AsciiDoc => "ADOC",
        }
    }

    pub const ALL: [Self; 2] = [Self::Markdown, Self::AsciiDoc];
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => f.write_str("markdown"),
            Self::AsciiDoc => f.write_str("asciidoc"),
        }
    }
}

impl FromStr for Format {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md" | "markdown" => Ok(Self::Markdown),
            "adoc" | "asciidoc" => Ok(Self::AsciiDoc),
            _ => Err(ConversionError::UnknownFormat(s.to_string())),
        }
    }
}

/// Kind of inline styling a span carries
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StyleKind {
    Bold,
    Italic,
    Code,
    Link { url: String },
}

impl StyleKind {
    pub fn is_link(&self) -> bool {
        matches!(self, Self::Link { .. })
    }
}

/// A styled character range; `end` is inclusive
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StyleSpan {
    pub start: usize,
    pub end: usize,
    pub kind: StyleKind,
}

impl StyleSpan {
    pub fn new(start: usize, end: usize, kind: StyleKind) -> Self {
        Self { start, end, kind }
    }

    /// Number of characters covered
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start) + 1
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// Whether the span lies inside a line of `char_len` characters
    pub fn fits(&self, char_len: usize) -> bool {
        self.start <= self.end && self.end < char_len
    }

    /// Same span moved right by `offset` characters
    pub fn shifted(&self, offset: usize) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
            kind: self.kind.clone(),
        }
    }
}

/// Parse result for a single input line
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LineResult {
    pub plain_text: String,
    /// Header level 1-6; when set, `spans` is always empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spans: Vec<StyleSpan>,
}

impl LineResult {
    /// A line passed through untouched
    pub fn unparsed(line: &str) -> Self {
        Self {
            plain_text: line.to_string(),
            header_level: None,
            spans: Vec::new(),
        }
    }

    pub fn header(level: u8, content: &str) -> Self {
        Self {
            plain_text: content.to_string(),
            header_level: Some(level),
            spans: Vec::new(),
        }
    }

    pub fn is_header(&self) -> bool {
        self.header_level.is_some()
    }

    /// Length of the plain text in characters
    pub fn char_len(&self) -> usize {
        self.plain_text.chars().count()
    }
}

/// Font size for a header level; anything outside 1-6 gets the body size
pub const fn header_size(level: Option<i64>) -> u8 {
    match level {
        Some(1) => 24,
        Some(2) => 20,
        Some(3) => 16,
        Some(4) => 14,
        Some(5) => 12,
        _ => 11,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_size_table() {
        assert_eq!(header_size(Some(1)), 24);
        assert_eq!(header_size(Some(2)), 20);
        assert_eq!(header_size(Some(3)), 16);
        assert_eq!(header_size(Some(4)), 14);
        assert_eq!(header_size(Some(5)), 12);
        assert_eq!(header_size(Some(6)), 11);
    }

    #[test]
    fn test_header_size_fallback() {
        assert_eq!(header_size(Some(0)), 11);
        assert_eq!(header_size(Some(7)), 11);
        assert_eq!(header_size(Some(-3)), 11);
        assert_eq!(header_size(None), 11);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("md".parse::<Format>().unwrap(), Format::Markdown);
        assert_eq!("AsciiDoc".parse::<Format>().unwrap(), Format::AsciiDoc);
        assert!(matches!(
            "rst".parse::<Format>(),
            Err(ConversionError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_span_bounds() {
        let span = StyleSpan::new(2, 4, StyleKind::Bold);
        assert_eq!(span.len(), 3);
        assert!(span.contains(4));
        assert!(!span.contains(5));
        assert!(span.fits(5));
        assert!(!span.fits(4));
        assert_eq!(span.shifted(10), StyleSpan::new(12, 14, StyleKind::Bold));
    }

    #[test]
    fn test_style_kind_serde_shape() {
        let json = serde_json::to_string(&StyleKind::Link {
            url: "https://x.com".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"link","url":"https://x.com"}"#);
    }
}
