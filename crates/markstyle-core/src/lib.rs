// SPDX-License-Identifier: AGPL-3.0-or-later
//! Markstyle Core - lightweight markup to styled spans
//!
//! This crate provides:
//! - Markdown vs AsciiDoc detection by line-pattern scoring
//! - Line parsers that strip markup and record bold, italic, code and link spans
//! - Whole-selection conversion with offsets into the joined plain text
//! - Best-effort application of the result to a host document
//! - C FFI exports for editor hosts

pub mod ast;
pub mod detect;
pub mod document;
pub mod formats;
mod resolve;
pub mod traits;

#[cfg(feature = "ffi")]
pub mod ffi;

pub use ast::{header_size, Format, LineResult, StyleKind, StyleSpan};
pub use detect::{detect, DetectionScores};
pub use document::{
    convert, convert_bytes, ApplyReport, Conversion, DocumentSink, RangeStyle, StyleRange,
};
pub use formats::{AsciiDocParser, MarkdownParser};
pub use traits::{parser_for, ConversionError, ConvertConfig, LineParser, Result};
