//! CLI output formatting.
//!
//! Output leads with what the template *contains* (sections, issues, stats),
//! then where the results went. File paths are secondary context.
//!
//! ```text
//! Smart Home Control System - User Manual Generator
//! ============================================================
//! Template: docs/templates/user-manual-template.md
//!
//! Sections
//!     ✓ Overview
//!     ✓ Device Setup
//!     ✗ Troubleshooting (missing)
//!
//! Format issues
//!     Header level jump from 1 to 3 at line 12
//!
//! Stats
//!     214 lines, 1480 words, 9876 bytes, 5 sections, 6 placeholders
//!
//! Manual → docs/user-manual.md (6 substitutions)
//!     Unresolved: {{support_email}}
//! Report → reports/validation-report.json
//!
//! Status: FAIL
//! ```
//!
//! Each `format_*` function returns `Vec<String>` and does no I/O; the
//! `print_*` wrappers write to stdout.

use crate::generate::{Outcome, RenderedManual};
use crate::report::ValidationReport;
use crate::types::Stats;

const RULE_WIDTH: usize = 60;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Title line plus a `=` rule.
pub fn format_banner(system_name: &str) -> Vec<String> {
    vec![
        format!("{system_name} - User Manual Generator"),
        "=".repeat(RULE_WIDTH),
    ]
}

fn format_stats(stats: &Stats) -> String {
    format!(
        "{}, {}, {}, {}, {}",
        plural(stats.lines, "line"),
        plural(stats.words, "word"),
        plural(stats.bytes, "byte"),
        plural(stats.sections, "section"),
        plural(stats.placeholders, "placeholder"),
    )
}

/// Sections, issues and stats for a report.
///
/// Found and missing sections are listed in the order they were configured.
pub fn format_validation_output(report: &ValidationReport, required: &[String]) -> Vec<String> {
    let mut lines = vec![format!("Template: {}", report.template_file), String::new()];

    lines.push("Sections".to_string());
    for section in required {
        if report.missing_sections.contains(section) {
            lines.push(format!("{}✗ {} (missing)", indent(1), section));
        } else {
            lines.push(format!("{}✓ {}", indent(1), section));
        }
    }

    if !report.format_issues.is_empty() {
        lines.push(String::new());
        lines.push("Format issues".to_string());
        for issue in &report.format_issues {
            lines.push(format!("{}{}", indent(1), issue));
        }
    }

    lines.push(String::new());
    lines.push("Stats".to_string());
    lines.push(format!("{}{}", indent(1), format_stats(&report.stats)));
    lines
}

fn format_manual_line(manual: &RenderedManual) -> Vec<String> {
    let mut lines = vec![format!(
        "Manual → {} ({})",
        manual.path.display(),
        plural(manual.substituted, "substitution")
    )];
    if !manual.unresolved.is_empty() {
        let names: Vec<String> = manual
            .unresolved
            .iter()
            .map(|n| format!("{{{{{n}}}}}"))
            .collect();
        lines.push(format!("{}Unresolved: {}", indent(1), names.join(", ")));
    }
    lines
}

/// Full run summary: validation details, written files, final status.
pub fn format_outcome(outcome: &Outcome, required: &[String]) -> Vec<String> {
    let mut lines = format_validation_output(&outcome.report, required);
    lines.push(String::new());
    if let Some(manual) = &outcome.manual {
        lines.extend(format_manual_line(manual));
    }
    lines.push(format!("Report → {}", outcome.report_path.display()));
    lines.push(String::new());
    lines.push(format!("Status: {}", outcome.status()));
    lines
}

/// Print the banner to stdout.
pub fn print_banner(system_name: &str) {
    for line in format_banner(system_name) {
        println!("{}", line);
    }
}

/// Print the run summary to stdout.
pub fn print_outcome(outcome: &Outcome, required: &[String]) {
    for line in format_outcome(outcome, required) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
