// ABOUTME: Writes rendered reports into an output directory
// ABOUTME: Creates the directory on demand and reports each written path
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;

use super::formatters::{format_report, FormattedReport, ReportFormat};
use super::view::ChainReport;
use crate::errors::{AppError, AppResult};

/// Persists rendered reports under one directory
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    /// Writer targeting `output_dir`
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Directory reports are written to
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write one rendered report under its format's default file name
    ///
    /// # Errors
    ///
    /// Returns a storage error if the directory cannot be created or the file
    /// cannot be written.
    pub async fn write(&self, report: &FormattedReport) -> AppResult<PathBuf> {
        self.write_named(report, report.format.file_name()).await
    }

    /// Write one rendered report under an explicit file name
    ///
    /// # Errors
    ///
    /// Returns a storage error if the directory cannot be created or the file
    /// cannot be written.
    pub async fn write_named(&self, report: &FormattedReport, file_name: &str) -> AppResult<PathBuf> {
        fs::create_dir_all(&self.output_dir).await.map_err(|e| {
            AppError::storage(format!(
                "cannot create output directory {}: {e}",
                self.output_dir.display()
            ))
            .with_source(e)
        })?;

        let path = self.output_dir.join(file_name);
        fs::write(&path, report.data.as_bytes()).await.map_err(|e| {
            AppError::storage(format!("cannot write {}: {e}", path.display())).with_source(e)
        })?;

        info!(
            report.format = report.format.as_str(),
            report.path = %path.display(),
            report.bytes = report.data.len(),
            "Report written"
        );
        Ok(path)
    }

    /// Render and write the report in every requested format
    ///
    /// Duplicate formats are written once.
    ///
    /// # Errors
    ///
    /// Returns the first rendering or storage error encountered.
    pub async fn write_all(
        &self,
        report: &ChainReport,
        formats: &[ReportFormat],
    ) -> AppResult<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(formats.len());
        let mut seen: Vec<ReportFormat> = Vec::with_capacity(formats.len());
        for &format in formats {
            if seen.contains(&format) {
                continue;
            }
            seen.push(format);
            let rendered = format_report(report, format)?;
            written.push(self.write(&rendered).await?);
        }
        Ok(written)
    }
}
