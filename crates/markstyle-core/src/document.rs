// SPDX-License-Identifier: AGPL-3.0-or-later
//! Whole-text conversion and application to a host document
//!
//! [`convert`] runs detection and the line parser over a selection, joins
//! the plain lines with `\n` and moves every line's spans into offsets of
//! the joined text. [`Conversion::apply`] then pushes the result into a
//! [`DocumentSink`]: replacing the text must succeed, styling is best
//! effort.

use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};

use crate::ast::{header_size, Format, LineResult, StyleKind};
use crate::detect::detect;
use crate::traits::{ConversionError, ConvertConfig, LineParser, Result};

/// Styling applied to a range of the joined text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeStyle {
    /// Whole header line: bold at the size for its level
    Header { level: u8, size: u8 },
    Inline(StyleKind),
}

/// A styled range of the joined text; `end` is inclusive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRange {
    pub start: usize,
    pub end: usize,
    pub style: RangeStyle,
}

/// Result of converting one selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversion {
    pub format: Format,
    /// Plain lines joined with `\n`
    pub text: String,
    pub lines: Vec<LineResult>,
    pub ranges: Vec<StyleRange>,
}

/// Counts from applying a conversion to a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyReport {
    pub applied: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// A live document the host lets us rewrite
pub trait DocumentSink {
    type Error: std::fmt::Display;

    /// Replace the selected text with `text`
    fn replace_text(&mut self, text: &str) -> std::result::Result<(), Self::Error>;

    /// Style characters `start..=end` of the replaced text
    fn apply_style(
        &mut self,
        start: usize,
        end: usize,
        style: &RangeStyle,
    ) -> std::result::Result<(), Self::Error>;
}

/// Convert a selection of Markdown or AsciiDoc text
pub fn convert(text: &str, config: &ConvertConfig) -> Conversion {
    let format = config.format.unwrap_or_else(|| detect(text));
    let parser = config.parser(format);

    let lines: Vec<LineResult> = text
        .split('\n')
        .map(|line| {
            if config.skip_blank_lines && line.trim().is_empty() {
                LineResult::unparsed(line)
            } else {
                parse_line_guarded(parser.as_ref(), line)
            }
        })
        .collect();

    let mut ranges = Vec::new();
    let mut line_start = 0;
    for line in &lines {
        let len = line.char_len();
        match line.header_level {
            Some(level) if len > 0 => ranges.push(StyleRange {
                start: line_start,
                end: line_start + len - 1,
                style: RangeStyle::Header {
                    level,
                    size: header_size(Some(i64::from(level))),
                },
            }),
            Some(_) => {}
            None => ranges.extend(line.spans.iter().map(|span| StyleRange {
                start: line_start + span.start,
                end: line_start + span.end,
                style: RangeStyle::Inline(span.kind.clone()),
            })),
        }
        line_start += len + 1;
    }

    let text = lines
        .iter()
        .map(|line| line.plain_text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    Conversion {
        format,
        text,
        lines,
        ranges,
    }
}

/// Convert raw bytes, rejecting anything that is not UTF-8
pub fn convert_bytes(bytes: &[u8], config: &ConvertConfig) -> Result<Conversion> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        tracing::error!(error = %e, "selection is not valid UTF-8");
        ConversionError::InvalidInput(format!("text is not valid UTF-8: {e}"))
    })?;
    Ok(convert(text, config))
}

/// Parse one line, falling back to the untouched line if the parser panics
fn parse_line_guarded(parser: &dyn LineParser, line: &str) -> LineResult {
    match panic::catch_unwind(AssertUnwindSafe(|| parser.parse_line(line))) {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(format = %parser.format(), line, "line parser failed, keeping line as-is");
            LineResult::unparsed(line)
        }
    }
}

/// Links need a target with no whitespace in it
fn is_usable_url(url: &str) -> bool {
    !url.is_empty() && !url.chars().any(char::is_whitespace)
}

impl Conversion {
    /// Write the conversion into `sink`.
    ///
    /// Failing to replace the text is an error. After that every range is
    /// tried on its own: unusable ranges are skipped and sink failures are
    /// counted, neither stops the remaining ranges.
    pub fn apply<S: DocumentSink>(&self, sink: &mut S) -> Result<ApplyReport> {
        sink.replace_text(&self.text).map_err(|e| {
            tracing::error!(error = %e, "replacing selection failed");
            ConversionError::Document(e.to_string())
        })?;

        let len = self.text.chars().count();
        let mut report = ApplyReport::default();
        for range in &self.ranges {
            if range.start > range.end || range.end >= len {
                tracing::debug!(start = range.start, end = range.end, len, "skipping out-of-bounds range");
                report.skipped += 1;
                continue;
            }
            if let RangeStyle::Inline(StyleKind::Link { url }) = &range.style {
                if !is_usable_url(url) {
                    tracing::debug!(url, "skipping link with unusable url");
                    report.skipped += 1;
                    continue;
                }
            }
            match sink.apply_style(range.start, range.end, &range.style) {
                Ok(()) => report.applied += 1,
                Err(e) => {
                    tracing::warn!(start = range.start, end = range.end, error = %e, "applying style failed");
                    report.failed += 1;
                }
            }
        }
        Ok(report)
    }
}
