// SPDX-License-Identifier: AGPL-3.0-or-later
//! Span resolution shared by both line parsers
//!
//! A line is processed as a chain of passes, one per markup kind. Each pass
//! takes the current text, finds every non-overlapping occurrence of its
//! markup left to right, and produces a new text with the markup replaced
//! by its plain content. Spans are reported in the coordinates of the text
//! the pass produces.
//!
//! Spans recorded by an earlier pass are carried forward as-is. A later
//! pass that shortens text to their left leaves them pointing at shifted
//! characters; [`LineState::finish`] only drops spans that fall outside the
//! final text.

use regex::{Captures, Regex};

use crate::ast::{LineResult, StyleKind, StyleSpan};

/// One markup occurrence in the working text of a pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Substitution {
    /// Byte offset of the match in the working text
    pub start: usize,
    /// Byte offset one past the match
    pub end: usize,
    /// Plain text the match becomes
    pub replacement: String,
    pub kind: StyleKind,
}

/// Rewrite `text` with `subs` applied and report the span of each replacement.
///
/// `subs` must be sorted by `start` and non-overlapping. The result is the
/// same as applying the substitutions from the last to the first, which
/// keeps every earlier offset valid while later text changes length.
pub(crate) fn substitute(text: &str, subs: &[Substitution]) -> (String, Vec<StyleSpan>) {
    let mut out = String::with_capacity(text.len());
    let mut spans = Vec::with_capacity(subs.len());
    let mut cursor = 0;
    let mut out_chars = 0;

    for sub in subs {
        debug_assert!(sub.start >= cursor && sub.end >= sub.start);
        let before = &text[cursor..sub.start];
        out.push_str(before);
        out_chars += before.chars().count();

        let width = sub.replacement.chars().count();
        if width > 0 {
            spans.push(StyleSpan::new(
                out_chars,
                out_chars + width - 1,
                sub.kind.clone(),
            ));
        }
        out.push_str(&sub.replacement);
        out_chars += width;
        cursor = sub.end;
    }
    out.push_str(&text[cursor..]);

    (out, spans)
}

/// Collect one substitution per regex match.
///
/// `build` turns the captures into the replacement text and style; returning
/// `None` leaves that match in place.
pub(crate) fn regex_matches<F>(re: &Regex, text: &str, mut build: F) -> Vec<Substitution>
where
    F: FnMut(&Captures<'_>) -> Option<(String, StyleKind)>,
{
    re.captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let (replacement, kind) = build(&caps)?;
            Some(Substitution {
                start: whole.start(),
                end: whole.end(),
                replacement,
                kind,
            })
        })
        .collect()
}

/// How a single-character emphasis delimiter is allowed to pair up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DelimiterRule {
    /// Content may contain the delimiter; the closer is the first delimiter
    /// that is neither preceded nor followed by another delimiter.
    Lazy,
    /// Content never contains the delimiter; the first delimiter after the
    /// opener must close, and must not be followed by another delimiter.
    Exclusive,
}

/// Find `d text d` runs for any `d` in `delimiters`, skipping doubled
/// delimiters so that `**` or `__` never open or close a single-delimiter
/// span.
pub(crate) fn single_delimited(
    text: &str,
    delimiters: &[char],
    rule: DelimiterRule,
    kind: StyleKind,
) -> Vec<Substitution> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let at = |i: usize| chars.get(i).map(|&(_, c)| c);
    let byte_at = |i: usize| chars.get(i).map_or(text.len(), |&(b, _)| b);
    let lone = |i: usize, d: char| {
        at(i) == Some(d) && (i == 0 || at(i - 1) != Some(d)) && at(i + 1) != Some(d)
    };

    let mut subs = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let d = chars[i].1;
        if !delimiters.contains(&d) || !lone(i, d) {
            i += 1;
            continue;
        }

        let mut close = None;
        for j in i + 2..chars.len() {
            if at(j) != Some(d) {
                continue;
            }
            match rule {
                DelimiterRule::Lazy if lone(j, d) => {
                    close = Some(j);
                    break;
                }
                DelimiterRule::Lazy => {}
                DelimiterRule::Exclusive => {
                    if at(j + 1) != Some(d) {
                        close = Some(j);
                    }
                    break;
                }
            }
        }

        match close {
            Some(j) => {
                subs.push(Substitution {
                    start: byte_at(i),
                    end: byte_at(j + 1),
                    replacement: text[byte_at(i + 1)..byte_at(j)].to_string(),
                    kind: kind.clone(),
                });
                i = j + 1;
            }
            None => i += 1,
        }
    }
    subs
}

/// Find `dd text dd` pairs for any `d` in `delimiters`.
///
/// Each `dd` has to be a whole run: the characters just outside and just
/// inside the pair are never in `run_chars`. A `***` or `****` run is left
/// alone, so stripping a pair never uncovers another one.
pub(crate) fn double_delimited(
    text: &str,
    delimiters: &[char],
    run_chars: &[char],
    kind: StyleKind,
) -> Vec<Substitution> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let at = |i: usize| chars.get(i).map(|&(_, c)| c);
    let byte_at = |i: usize| chars.get(i).map_or(text.len(), |&(b, _)| b);
    let in_run = |c: Option<char>| c.is_some_and(|c| run_chars.contains(&c));
    let pair_at = |i: usize, d: char| at(i) == Some(d) && at(i + 1) == Some(d);

    let mut subs = Vec::new();
    let mut i = 0;
    while i + 1 < chars.len() {
        let d = chars[i].1;
        let opens = delimiters.contains(&d)
            && pair_at(i, d)
            && (i == 0 || !in_run(at(i - 1)))
            && !in_run(at(i + 2));
        if !opens {
            i += 1;
            continue;
        }

        let close = (i + 3..chars.len())
            .find(|&j| pair_at(j, d) && !in_run(at(j - 1)) && !in_run(at(j + 2)));
        match close {
            Some(j) => {
                subs.push(Substitution {
                    start: byte_at(i),
                    end: byte_at(j + 2),
                    replacement: text[byte_at(i + 2)..byte_at(j)].to_string(),
                    kind: kind.clone(),
                });
                i = j + 2;
            }
            None => i += 1,
        }
    }
    subs
}

/// Find code spans fenced by runs of `fence` whose length is in `widths`.
///
/// Runs are taken whole, so a fence never opens or closes inside a longer
/// run. A single-character fence closes at the very next run, which must
/// also be a single character. Wider fences close at the next run of the
/// same width and may contain runs of any other width.
pub(crate) fn fenced(
    text: &str,
    fence: char,
    widths: &[usize],
    kind: StyleKind,
) -> Vec<Substitution> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let byte_at = |i: usize| chars.get(i).map_or(text.len(), |&(b, _)| b);

    // (first char index, length) of every run of the fence character
    let mut runs = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i].1 != fence {
            i += 1;
            continue;
        }
        let start = i;
        while i < chars.len() && chars[i].1 == fence {
            i += 1;
        }
        runs.push((start, i - start));
    }

    let mut subs = Vec::new();
    let mut k = 0;
    while k < runs.len() {
        let (open, width) = runs[k];
        if !widths.contains(&width) {
            k += 1;
            continue;
        }
        let close = if width == 1 {
            Some(k + 1).filter(|&n| runs.get(n).is_some_and(|&(_, w)| w == 1))
        } else {
            (k + 1..runs.len()).find(|&n| runs[n].1 == width)
        };
        match close {
            Some(n) => {
                let (shut, _) = runs[n];
                subs.push(Substitution {
                    start: byte_at(open),
                    end: byte_at(shut + width),
                    replacement: text[byte_at(open + width)..byte_at(shut)].to_string(),
                    kind: kind.clone(),
                });
                k = n + 1;
            }
            None => k += 1,
        }
    }
    subs
}

/// Working state of one line as it moves through the passes
#[derive(Debug, Clone, Default)]
pub(crate) struct LineState {
    pub text: String,
    pub spans: Vec<StyleSpan>,
}

impl LineState {
    pub fn new(line: &str) -> Self {
        Self {
            text: line.to_string(),
            spans: Vec::new(),
        }
    }

    /// Run one markup pass over the current text
    pub fn pass<F>(self, find: F) -> Self
    where
        F: FnOnce(&str) -> Vec<Substitution>,
    {
        let subs = find(&self.text);
        if subs.is_empty() {
            return self;
        }
        let (text, new_spans) = substitute(&self.text, &subs);
        let mut spans = self.spans;
        spans.extend(new_spans);
        Self { text, spans }
    }

    /// Drop spans outside the final text and build the line result
    pub fn finish(self) -> LineResult {
        let len = self.text.chars().count();
        let mut spans = self.spans;
        spans.retain(|span| {
            let fits = span.fits(len);
            if !fits {
                tracing::debug!(
                    start = span.start,
                    end = span.end,
                    len,
                    "dropping span outside line text"
                );
            }
            fits
        });
        LineResult {
            plain_text: self.text,
            header_level: None,
            spans,
        }
    }
}
