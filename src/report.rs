//! JSON validation report.
//!
//! The report is what CI archives and comments on pull requests with, so its
//! field names are stable:
//!
//! ```json
//! {
//!   "status": "warning",
//!   "template_file": "docs/templates/user-manual-template.md",
//!   "sections_found": ["Overview", "Device Setup", "..."],
//!   "missing_sections": [],
//!   "format_issues": ["Header level jump from 1 to 3 at line 12"],
//!   "stats": { "lines": 210, "words": 1480, "bytes": 9876, "sections": 5, "placeholders": 6 },
//!   "template_sha256": "9f86d0…",
//!   "generator": "manual-gen 0.3.0",
//!   "generated_at": "2026-10-16T09:30:00Z"
//! }
//! ```

use crate::types::{Stats, Status};
use crate::validate::{FormatIssue, Validation};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Cannot write report to {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Serialized form of one validation run.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub status: Status,
    pub template_file: String,
    pub sections_found: Vec<String>,
    pub missing_sections: Vec<String>,
    pub format_issues: Vec<FormatIssue>,
    pub stats: Stats,
    pub template_sha256: String,
    pub generator: String,
    pub generated_at: DateTime<Utc>,
}

impl ValidationReport {
    /// Assemble a report from a validation result and run metadata.
    pub fn new(
        validation: &Validation,
        template_file: &Path,
        template_text: &str,
        generator: impl Into<String>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            status: validation.status(),
            template_file: template_file.display().to_string(),
            sections_found: validation.sections_found.clone(),
            missing_sections: validation.missing_sections.clone(),
            format_issues: validation.format_issues.clone(),
            stats: validation.stats,
            template_sha256: format!("{:x}", Sha256::digest(template_text.as_bytes())),
            generator: generator.into(),
            generated_at,
        }
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Write `contents` to `path`, creating missing parent directories.
pub fn write_file(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

/// Serialize the report and write it to `path`.
pub fn write_report(report: &ValidationReport, path: &Path) -> Result<(), ReportError> {
    let mut json = report.to_json()?;
    json.push('\n');
    write_file(path, &json).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}
