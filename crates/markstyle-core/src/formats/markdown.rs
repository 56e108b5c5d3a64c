// SPDX-License-Identifier: AGPL-3.0-or-later
//! Markdown line parser
//!
//! Passes run in a fixed order: header (terminal), links, bold, code,
//! italic, then list-marker stripping. The order decides which spans stay
//! accurate when several kinds share a line, so it must not change.

use regex::Regex;
use std::sync::LazyLock;

use crate::ast::{Format, LineResult, StyleKind};
use crate::resolve::{
    double_delimited, fenced, regex_matches, single_delimited, DelimiterRule, LineState,
    Substitution,
};
use crate::traits::LineParser;

/// Characters that make up an emphasis run
const EMPHASIS: [char; 2] = ['*', '_'];

static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(\S.*?)\s*$").expect("invalid header regex"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("invalid link regex"));
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*+]\s+").expect("invalid list marker regex"));

/// Markdown line parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownParser {
    strip_list_markers: bool,
}

impl MarkdownParser {
    pub const fn new() -> Self {
        Self {
            strip_list_markers: true,
        }
    }

    /// Enable or disable bullet marker stripping
    pub const fn with_list_markers(mut self, strip: bool) -> Self {
        self.strip_list_markers = strip;
        self
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser for MarkdownParser {
    fn format(&self) -> Format {
        Format::Markdown
    }

    fn parse_line(&self, line: &str) -> LineResult {
        if let Some(header) = parse_header(line) {
            return header;
        }

        let state = LineState::new(line)
            .pass(links)
            .pass(bold)
            .pass(code)
            .pass(italic);

        if self.strip_list_markers {
            strip_list_marker(state).finish()
        } else {
            state.finish()
        }
    }
}

fn parse_header(line: &str) -> Option<LineResult> {
    let caps = HEADER.captures(line)?;
    let level = caps.get(1)?.as_str().len() as u8;
    Some(LineResult::header(level, caps.get(2)?.as_str()))
}

fn links(text: &str) -> Vec<Substitution> {
    regex_matches(&LINK, text, |caps| {
        let label = caps.get(1)?.as_str().to_string();
        let url = caps.get(2)?.as_str().trim().to_string();
        Some((label, StyleKind::Link { url }))
    })
}

fn bold(text: &str) -> Vec<Substitution> {
    double_delimited(text, &EMPHASIS, &EMPHASIS, StyleKind::Bold)
}

fn code(text: &str) -> Vec<Substitution> {
    fenced(text, '`', &[1], StyleKind::Code)
}

fn italic(text: &str) -> Vec<Substitution> {
    single_delimited(text, &EMPHASIS, DelimiterRule::Lazy, StyleKind::Italic)
}

/// Remove a leading bullet marker, moving recorded spans left with the text
fn strip_list_marker(state: LineState) -> LineState {
    let Some(marker) = LIST_MARKER.find(&state.text) else {
        return state;
    };
    let removed = marker.as_str().chars().count();
    let text = state.text[marker.end()..].to_string();
    let spans = state
        .spans
        .into_iter()
        .filter(|span| span.start >= removed)
        .map(|mut span| {
            span.start -= removed;
            span.end -= removed;
            span
        })
        .collect();
    LineState { text, spans }
}
