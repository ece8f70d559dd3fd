//! Shared types used by the validator, the report writer and CLI output.
//!
//! These types end up in `validation-report.json`, so their serialized shape
//! is part of the contract with the CI workflow that consumes the report.

use serde::Serialize;
use std::fmt;

/// Overall validation outcome.
///
/// Serialized lowercase (`"pass"`, `"warning"`, `"fail"`). Only these three
/// severities exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// All required sections present, no formatting issues.
    Pass,
    /// All required sections present, at least one formatting issue.
    Warning,
    /// At least one required section missing.
    Fail,
}

impl Status {
    /// Process exit code for this status: warnings do not fail the run.
    pub fn exit_code(self) -> u8 {
        match self {
            Status::Pass | Status::Warning => 0,
            Status::Fail => 1,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Pass => "PASS",
            Status::Warning => "WARNING",
            Status::Fail => "FAIL",
        };
        f.write_str(label)
    }
}

/// Summary statistics computed over the raw template text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Number of `\n`-separated lines (a trailing newline counts an empty last line).
    pub lines: usize,
    /// Whitespace-separated words.
    pub words: usize,
    /// Size in bytes of the UTF-8 text.
    pub bytes: usize,
    /// Level-2 (`##`) headers.
    pub sections: usize,
    /// Well-formed `{{identifier}}` occurrences.
    pub placeholders: usize,
}
