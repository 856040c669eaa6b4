// ABOUTME: Report format selector dispatching to the Markdown, HTML and JSON emitters
// ABOUTME: Carries file names and content types alongside the rendered text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Output format abstraction
//!
//! ```rust
//! use chain_tracker::reports::{format_report, ChainReport, ReportFormat};
//! use chrono::Utc;
//!
//! let report = ChainReport::from_chains(&[], Utc::now());
//! let output = format_report(&report, ReportFormat::Json).unwrap();
//! assert_eq!(output.content_type, "application/json");
//! ```

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

use super::html::render_html;
use super::markdown::render_markdown;
use super::view::ChainReport;
use crate::constants::defaults;
use crate::errors::{AppError, ErrorCode};

/// Rendered report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum ReportFormat {
    /// Markdown summary with one table per chain
    #[default]
    Markdown,
    /// Self-contained HTML page
    Html,
    /// Machine-readable JSON, diagnostics included
    Json,
}

impl ReportFormat {
    /// Formats written when none are requested
    pub const DEFAULTS: [Self; 2] = [Self::Markdown, Self::Html];

    /// Get the format name as a string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Html => "html",
            Self::Json => "json",
        }
    }

    /// Get the MIME content type for this format
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        match self {
            Self::Markdown => "text/markdown; charset=utf-8",
            Self::Html => "text/html; charset=utf-8",
            Self::Json => "application/json",
        }
    }

    /// Default output file name
    #[must_use]
    pub const fn file_name(&self) -> &'static str {
        match self {
            Self::Markdown => defaults::MARKDOWN_REPORT_FILE,
            Self::Html => defaults::HTML_REPORT_FILE,
            Self::Json => defaults::JSON_REPORT_FILE,
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            other => Err(FormatError {
                message: format!("unknown report format '{other}'"),
                format: None,
            }),
        }
    }
}

/// A rendered report with its metadata
#[derive(Debug, Clone)]
pub struct FormattedReport {
    /// Rendered document
    pub data: String,
    /// Format used
    pub format: ReportFormat,
    /// MIME content type
    pub content_type: &'static str,
}

/// Error type for formatting operations
#[derive(Debug, Clone)]
pub struct FormatError {
    /// What went wrong
    pub message: String,
    /// The format being produced, when known
    pub format: Option<ReportFormat>,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format {
            Some(format) => write!(f, "Format error ({format}): {}", self.message),
            None => write!(f, "Format error: {}", self.message),
        }
    }
}

impl std::error::Error for FormatError {}

impl From<FormatError> for AppError {
    fn from(error: FormatError) -> Self {
        let code = if error.format.is_some() {
            ErrorCode::SerializationError
        } else {
            ErrorCode::InvalidInput
        };
        Self::new(code, error.to_string())
    }
}

/// Render a report in the requested format
///
/// # Errors
///
/// Returns `FormatError` if JSON serialization fails.
pub fn format_report(
    report: &ChainReport,
    format: ReportFormat,
) -> Result<FormattedReport, FormatError> {
    let data = match format {
        ReportFormat::Markdown => render_markdown(report),
        ReportFormat::Html => render_html(report),
        ReportFormat::Json => serde_json::to_string_pretty(report).map_err(|e| FormatError {
            message: e.to_string(),
            format: Some(format),
        })?,
    };

    Ok(FormattedReport {
        data,
        format,
        content_type: format.content_type(),
    })
}
