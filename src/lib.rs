//! # manual-gen
//!
//! Generates the Smart Home Control System user manual from a Markdown
//! template, and validates the template's structure on the way.
//!
//! # Pipeline
//!
//! One synchronous pass, no state carried between runs:
//!
//! ```text
//! 1. Load       docs/templates/user-manual-template.md
//! 2. Validate   required sections, header levels, placeholder syntax, links
//! 3. Render     {{name}} → value              (skipped with --validate-only)
//! 4. Write      docs/user-manual.md + reports/validation-report.json
//! ```
//!
//! The exit code follows the validation status: `0` for pass or warning, `1`
//! for a missing required section, `2` for anything fatal (missing template,
//! unwritable output, bad config).
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`template`] | Header extraction and placeholder tokenizing |
//! | [`validate`] | Structural checks and the pass/warning/fail policy |
//! | [`render`] | Single-pass, fail-open placeholder substitution |
//! | [`report`] | JSON report assembly and writing |
//! | [`generate`] | Orchestrates one run, maps failures to [`generate::GenerateError`] |
//! | [`config`] | `manual.toml` loading, merging over stock defaults, validation |
//! | [`types`] | Status and stats shared by report and CLI output |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Fail Open on Unknown Placeholders
//!
//! A placeholder with no value is left in the rendered manual as
//! `{{name}}`. A blank would read as finished prose; the literal is easy to
//! spot in review and easy to grep for.
//!
//! ## Lossless Tokenizing
//!
//! The renderer and the validator share one tokenizer whose segments
//! reassemble to the exact input. Rendering is therefore the identity on any
//! template without placeholders, and malformed syntax survives untouched for
//! the author to fix.
//!
//! ## Missing Sections Dominate
//!
//! A missing required section is `fail` no matter what else is wrong. Header
//! jumps, malformed placeholders and empty links only ever produce `warning`.

pub mod config;
pub mod generate;
pub mod output;
pub mod render;
pub mod report;
pub mod template;
pub mod types;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;
