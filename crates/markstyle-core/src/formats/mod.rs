// SPDX-License-Identifier: AGPL-3.0-or-later
//! Line parsers for each supported markup format

pub mod asciidoc;
pub mod markdown;

pub use asciidoc::AsciiDocParser;
pub use markdown::MarkdownParser;
