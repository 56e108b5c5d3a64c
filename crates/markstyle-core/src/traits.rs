// SPDX-License-Identifier: AGPL-3.0-or-later
//! Line parser trait, conversion configuration and error type

use crate::ast::{Format, LineResult};
use crate::formats::{AsciiDocParser, MarkdownParser};
use serde::Deserialize;

/// Error type for conversion and document application
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown markup format: {0}")]
    UnknownFormat(String),

    #[error("Document update failed: {0}")]
    Document(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ConversionError {
    /// One-line message suitable for showing to an end user
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(_) => {
                "The selected text could not be read. Select plain text and try again.".to_string()
            }
            Self::UnknownFormat(name) => {
                format!("\"{name}\" is not a supported format. Use Markdown or AsciiDoc.")
            }
            Self::Document(_) => {
                "The document could not be updated. No formatting was applied.".to_string()
            }
            Self::Config(_) | Self::Io(_) | Self::Serialization(_) => {
                format!("Conversion failed: {self}")
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ConversionError>;

/// Configuration for a conversion request
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    /// Force a format instead of detecting one
    pub format: Option<Format>,
    /// Strip `-`, `*` and `+` bullet markers from Markdown lines
    pub strip_list_markers: bool,
    /// Pass whitespace-only lines through without parsing them
    pub skip_blank_lines: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            format: None,
            strip_list_markers: true,
            skip_blank_lines: false,
        }
    }
}

impl ConvertConfig {
    /// Build the line parser this configuration asks for
    pub fn parser(&self, format: Format) -> Box<dyn LineParser> {
        match format {
            Format::Markdown => {
                Box::new(MarkdownParser::new().with_list_markers(self.strip_list_markers))
            }
            Format::AsciiDoc => Box::new(AsciiDocParser::new()),
        }
    }
}

/// Line parser trait: strip markup from one line and record its styling
///
/// Implementations are pure; no state is carried between lines.
pub trait LineParser: Send + Sync {
    /// The markup format this parser handles
    fn format(&self) -> Format;

    /// Parse a single line (without its line terminator)
    fn parse_line(&self, line: &str) -> LineResult;
}

static MARKDOWN: MarkdownParser = MarkdownParser::new();
static ASCIIDOC: AsciiDocParser = AsciiDocParser::new();

/// Default-configured parser for a format
pub fn parser_for(format: Format) -> &'static dyn LineParser {
    match format {
        Format::Markdown => &MARKDOWN,
        Format::AsciiDoc => &ASCIIDOC,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_for_matches_format() {
        for format in Format::ALL {
            assert_eq!(parser_for(format).format(), format);
            assert_eq!(ConvertConfig::default().parser(format).format(), format);
        }
    }

    #[test]
    fn test_config_defaults_from_empty_toml_shape() {
        let config: ConvertConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ConvertConfig::default());
        assert!(config.strip_list_markers);
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        let result: std::result::Result<ConvertConfig, _> =
            serde_json::from_str(r#"{"formatt": "markdown"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_user_message_hides_internal_detail() {
        let err = ConversionError::Document("range 4..9 out of bounds".to_string());
        assert!(!err.user_message().contains("range"));
    }
}
