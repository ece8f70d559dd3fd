//! Shared test utilities for the manual-gen test suite.
//!
//! Template builders produce well-formed manuals (no header jumps, no broken
//! placeholders, no empty links) so each test can introduce exactly the
//! defect it is about:
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let text = template_without("Troubleshooting");
//! let v = validate(&text, &DEFAULT_REQUIRED_SECTIONS[..]);
//! assert_eq!(v.missing_sections, vec!["Troubleshooting"]);
//! ```

use std::fs;
use std::path::Path;

use crate::generate::GenerateOptions;
use crate::render::Variables;
use crate::validate::DEFAULT_REQUIRED_SECTIONS;

// =========================================================================
// Template builders
// =========================================================================

/// A manual containing exactly the given `##` sections, each with a short
/// body and a `###` subsection.
pub fn template_with_sections(sections: &[&str]) -> String {
    let mut text = String::from(
        "# {{system_name}} User Manual\n\nVersion {{version}}, published {{date}}.\n",
    );
    for section in sections {
        text.push_str(&format!(
            "\n## {section}\n\nThis chapter covers {section}.\n\n### Details\n\n- Applies to hub firmware {{{{version}}}}.\n",
        ));
    }
    text
}

/// A manual with all default required sections.
pub fn complete_template() -> String {
    template_with_sections(&DEFAULT_REQUIRED_SECTIONS)
}

/// A manual with all default required sections except `missing`.
pub fn template_without(missing: &str) -> String {
    let sections: Vec<&str> = DEFAULT_REQUIRED_SECTIONS
        .iter()
        .copied()
        .filter(|s| *s != missing)
        .collect();
    template_with_sections(&sections)
}

// =========================================================================
// Filesystem setup
// =========================================================================

/// Write `template` under `dir` and return options pointing all three paths
/// inside `dir`, with `version` set to `3.0.0`.
pub fn options_in(dir: &Path, template: &str) -> GenerateOptions {
    let template_path = dir.join("docs/templates/user-manual-template.md");
    fs::create_dir_all(template_path.parent().unwrap()).unwrap();
    fs::write(&template_path, template).unwrap();

    let variables: Variables = [
        ("system_name", "Smart Home Control System"),
        ("version", "3.0.0"),
        ("date", "2026-10-16"),
    ]
    .into_iter()
    .collect();

    GenerateOptions {
        template: template_path,
        output: dir.join("docs/user-manual.md"),
        report: dir.join("reports/validation-report.json"),
        required_sections: DEFAULT_REQUIRED_SECTIONS.iter().map(|s| s.to_string()).collect(),
        variables,
        validate_only: false,
    }
}
