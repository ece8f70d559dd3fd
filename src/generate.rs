//! End-to-end run: load → validate → render → write.
//!
//! ```text
//! template.md ──► validate ──► (render) ──► user-manual.md
//!                     │
//!                     └──────────────────► validation-report.json
//! ```
//!
//! The rendered manual is written before the report, and both are written
//! whole. The manual is produced even when validation fails: the report and
//! the exit code carry the failure, the rendered file shows what the template
//! currently looks like. With `validate_only` nothing but the report is
//! written.

use crate::render::{self, Variables};
use crate::report::{self, ReportError, ValidationReport};
use crate::types::Status;
use crate::validate;
use chrono::Utc;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Template file not found: {0}")]
    TemplateNotFound(PathBuf),
    #[error("Cannot read template {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("Cannot write manual to {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Everything a run needs, already resolved from config and CLI flags.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub template: PathBuf,
    pub output: PathBuf,
    pub report: PathBuf,
    pub required_sections: Vec<String>,
    pub variables: Variables,
    pub validate_only: bool,
}

/// The rendered manual, when one was written.
#[derive(Debug, Clone)]
pub struct RenderedManual {
    pub path: PathBuf,
    pub substituted: usize,
    pub unresolved: Vec<String>,
}

/// What a successful (non-fatal) run produced.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub report: ValidationReport,
    pub report_path: PathBuf,
    pub manual: Option<RenderedManual>,
}

impl Outcome {
    pub fn status(&self) -> Status {
        self.report.status
    }

    /// `0` for pass and warning, `1` for fail.
    pub fn exit_code(&self) -> u8 {
        self.status().exit_code()
    }
}

/// Identifier stamped into reports: the crate version on release tags,
/// `dev@<hash>` otherwise.
pub fn generator_id() -> String {
    let on_tag = env!("MANUAL_GEN_ON_RELEASE_TAG") == "true";
    let hash = env!("MANUAL_GEN_GIT_HASH");
    if on_tag || hash.is_empty() {
        format!("manual-gen {}", env!("CARGO_PKG_VERSION"))
    } else {
        format!("manual-gen dev@{hash}")
    }
}

/// Read the template, mapping a missing file to [`GenerateError::TemplateNotFound`].
pub fn load_template(path: &Path) -> Result<String, GenerateError> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => GenerateError::TemplateNotFound(path.to_path_buf()),
        _ => GenerateError::Read {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Run the pipeline once.
///
/// Returns `Err` only for fatal conditions (unreadable template, unwritable
/// output). A failed validation is a successful run whose
/// [`Outcome::status`] is [`Status::Fail`].
pub fn generate(opts: &GenerateOptions) -> Result<Outcome, GenerateError> {
    debug!(template = %opts.template.display(), "loading template");
    let text = load_template(&opts.template)?;

    let validation = validate::validate(&text, &opts.required_sections);
    let status = validation.status();
    info!(
        %status,
        missing = validation.missing_sections.len(),
        issues = validation.format_issues.len(),
        "template validated"
    );

    // The report is written even when the manual write fails.
    let manual = if opts.validate_only {
        debug!("validate-only: skipping render");
        Ok(None)
    } else {
        let rendered = render::render(&text, &opts.variables);
        if !rendered.unresolved.is_empty() {
            warn!(unresolved = ?rendered.unresolved, "placeholders left unresolved");
        }
        match report::write_file(&opts.output, &rendered.text) {
            Ok(()) => {
                debug!(output = %opts.output.display(), substituted = rendered.substituted, "manual written");
                Ok(Some(RenderedManual {
                    path: opts.output.clone(),
                    substituted: rendered.substituted,
                    unresolved: rendered.unresolved,
                }))
            }
            Err(source) => Err(GenerateError::Write {
                path: opts.output.clone(),
                source,
            }),
        }
    };

    let report = ValidationReport::new(
        &validation,
        &opts.template,
        &text,
        generator_id(),
        Utc::now(),
    );
    let report_written = report::write_report(&report, &opts.report);
    let manual = manual?;
    report_written?;
    debug!(report = %opts.report.display(), "report written");

    Ok(Outcome {
        report,
        report_path: opts.report.clone(),
        manual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn complete_template_renders_and_passes() {
        let tmp = TempDir::new().unwrap();
        let opts = options_in(tmp.path(), &complete_template());

        let outcome = generate(&opts).unwrap();
        assert_eq!(outcome.status(), Status::Pass);
        assert_eq!(outcome.exit_code(), 0);

        let manual = fs::read_to_string(&opts.output).unwrap();
        assert!(manual.contains("Version 3.0.0"));
        assert!(!manual.contains("{{"));

        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&opts.report).unwrap()).unwrap();
        assert_eq!(report["status"], "pass");
        assert_eq!(report["missing_sections"], serde_json::json!([]));
    }

    #[test]
    fn missing_section_fails_but_still_renders() {
        let tmp = TempDir::new().unwrap();
        let opts = options_in(tmp.path(), &template_without("Troubleshooting"));

        let outcome = generate(&opts).unwrap();
        assert_eq!(outcome.status(), Status::Fail);
        assert_eq!(outcome.exit_code(), 1);
        assert_eq!(outcome.report.missing_sections, vec!["Troubleshooting"]);
        assert!(opts.output.exists());
        assert!(opts.report.exists());
    }

    #[test]
    fn validate_only_writes_report_only() {
        let tmp = TempDir::new().unwrap();
        let mut opts = options_in(tmp.path(), &complete_template());
        opts.validate_only = true;

        let outcome = generate(&opts).unwrap();
        assert!(outcome.manual.is_none());
        assert!(!opts.output.exists());
        assert!(opts.report.exists());
    }

    #[test]
    fn skipped_level_warns_with_exit_zero() {
        let tmp = TempDir::new().unwrap();
        let text = complete_template().replacen("## Overview", "## Overview\n\n#### Hub LEDs", 1);
        let opts = options_in(tmp.path(), &text);

        let outcome = generate(&opts).unwrap();
        assert_eq!(outcome.status(), Status::Warning);
        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(outcome.report.format_issues.len(), 1);
    }

    #[test]
    fn unresolved_placeholders_reported() {
        let tmp = TempDir::new().unwrap();
        let text = format!("{}\nContact: {{{{support_email}}}}\n", complete_template());
        let opts = options_in(tmp.path(), &text);

        let outcome = generate(&opts).unwrap();
        let manual = outcome.manual.unwrap();
        assert_eq!(manual.unresolved, vec!["support_email"]);
        let rendered = fs::read_to_string(&opts.output).unwrap();
        assert!(rendered.contains("Contact: {{support_email}}"));
    }

    #[test]
    fn missing_template_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let mut opts = options_in(tmp.path(), "");
        opts.template = tmp.path().join("does/not/exist.md");

        let result = generate(&opts);
        assert!(matches!(result, Err(GenerateError::TemplateNotFound(_))));
        assert!(!opts.report.exists());
    }

    #[test]
    fn unwritable_output_is_write_error() {
        let tmp = TempDir::new().unwrap();
        let mut opts = options_in(tmp.path(), &complete_template());
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "file").unwrap();
        opts.output = blocker.join("manual.md");

        let result = generate(&opts);
        assert!(matches!(result, Err(GenerateError::Write { .. })));
        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&opts.report).unwrap()).unwrap();
        assert_eq!(report["status"], "pass");
    }

    #[test]
    fn manual_write_error_wins_when_report_also_fails() {
        let tmp = TempDir::new().unwrap();
        let mut opts = options_in(tmp.path(), &complete_template());
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "file").unwrap();
        opts.output = blocker.join("manual.md");
        opts.report = blocker.join("report.json");

        let result = generate(&opts);
        assert!(matches!(result, Err(GenerateError::Write { .. })));
    }

    #[test]
    fn unwritable_report_is_report_error() {
        let tmp = TempDir::new().unwrap();
        let mut opts = options_in(tmp.path(), &complete_template());
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "file").unwrap();
        opts.report = blocker.join("report.json");

        let result = generate(&opts);
        assert!(matches!(
            result,
            Err(GenerateError::Report(ReportError::Write { .. }))
        ));
    }

    #[test]
    fn generator_id_names_the_tool() {
        assert!(generator_id().starts_with("manual-gen "));
    }
}
