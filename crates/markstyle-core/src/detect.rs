// SPDX-License-Identifier: AGPL-3.0-or-later
//! Markdown vs AsciiDoc detection by line-pattern scoring
//!
//! Each line is trimmed and scored on its own. AsciiDoc has to win a strict
//! majority; ties and text with no recognisable markers are Markdown.

use regex::Regex;
use std::sync::LazyLock;

use crate::ast::Format;

static ASCIIDOC_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^=+\s").expect("invalid asciidoc header regex"));
static ATTRIBUTE_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[.*\]$").expect("invalid attribute list regex"));
static BLOCK_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.{3,}").expect("invalid block title regex"));
static MARKDOWN_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6}\s").expect("invalid markdown header regex"));

/// Per-format line counts behind a detection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectionScores {
    pub asciidoc: usize,
    pub markdown: usize,
}

impl DetectionScores {
    /// Winning format; AsciiDoc needs a strict majority
    pub fn format(&self) -> Format {
        if self.asciidoc > self.markdown {
            Format::AsciiDoc
        } else {
            Format::Markdown
        }
    }
}

/// Count AsciiDoc-looking and Markdown-header lines in `text`
pub fn score(text: &str) -> DetectionScores {
    let mut scores = DetectionScores::default();
    for line in text.split('\n') {
        let line = line.trim();
        if is_asciidoc_line(line) {
            scores.asciidoc += 1;
        }
        if MARKDOWN_HEADER.is_match(line) {
            scores.markdown += 1;
        }
    }
    scores
}

/// Detect the markup format of a block of text
pub fn detect(text: &str) -> Format {
    let scores = score(text);
    let format = scores.format();
    tracing::debug!(
        asciidoc = scores.asciidoc,
        markdown = scores.markdown,
        %format,
        "detected markup format"
    );
    format
}

// Checked in order; a line counts once however many patterns it matches.
fn is_asciidoc_line(line: &str) -> bool {
    ASCIIDOC_HEADER.is_match(line)
        || ATTRIBUTE_LIST.is_match(line)
        || BLOCK_TITLE.is_match(line)
        || line.starts_with("[source")
}
