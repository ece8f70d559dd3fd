//! Structural validation of a manual template.
//!
//! Three independent checks run over the raw template text:
//!
//! | Check | Severity | Source |
//! |-------|----------|--------|
//! | Required `##` sections present | missing ⇒ `fail` | [`template::parse_headers`] |
//! | Header hierarchy never skips a level | issue ⇒ `warning` | [`template::parse_headers`] |
//! | Placeholder syntax well-formed | issue ⇒ `warning` | [`template::tokenize`] |
//! | Links have a non-empty URL | issue ⇒ `warning` | `pulldown-cmark` |
//!
//! Missing sections always dominate: a template that is missing a section and
//! also has formatting issues is `fail`, never `warning`.
//!
//! Validation is a pure function of the text and the required section list.
//! Timestamps, file paths and digests are added later by [`crate::report`].

use crate::template::{self, Header, Malformed, Segment};
use crate::types::{Stats, Status};
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use serde::{Serialize, Serializer};
use std::fmt;

/// Sections every manual must contain as `## Name` headers, in report order.
pub const DEFAULT_REQUIRED_SECTIONS: [&str; 5] = [
    "Overview",
    "Device Setup",
    "Feature Guide",
    "Troubleshooting",
    "Safety Guidelines",
];

/// What kind of formatting problem was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// A header deeper than its predecessor by more than one level.
    SkippedHeaderLevel { from: usize, to: usize },
    /// `{{` with no matching `}}`.
    UnterminatedPlaceholder,
    /// `{{…}}` whose contents are not `[A-Za-z0-9_]+`.
    InvalidPlaceholderName { name: String },
    /// `[text]()`
    EmptyLinkUrl { text: String },
}

/// A non-fatal formatting problem at a specific line.
///
/// Serialized as its human-readable message so the JSON report stays a flat
/// list of strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatIssue {
    pub line: usize,
    pub kind: IssueKind,
}

impl fmt::Display for FormatIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::SkippedHeaderLevel { from, to } => write!(
                f,
                "Header level jump from {from} to {to} at line {}",
                self.line
            ),
            IssueKind::UnterminatedPlaceholder => {
                write!(f, "Unterminated placeholder '{{{{' at line {}", self.line)
            }
            IssueKind::InvalidPlaceholderName { name } => write!(
                f,
                "Invalid placeholder name '{name}' at line {} (allowed: letters, digits, underscore)",
                self.line
            ),
            IssueKind::EmptyLinkUrl { text } => {
                write!(f, "Empty link URL for '{text}' at line {}", self.line)
            }
        }
    }
}

impl Serialize for FormatIssue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Result of validating a template.
#[derive(Debug, Clone)]
pub struct Validation {
    /// Required sections that were found, in required-set order.
    pub sections_found: Vec<String>,
    /// Required sections that were not found, in required-set order.
    pub missing_sections: Vec<String>,
    /// Formatting issues sorted by line.
    pub format_issues: Vec<FormatIssue>,
    pub stats: Stats,
}

impl Validation {
    /// Missing sections ⇒ `Fail`; otherwise any issue ⇒ `Warning`; else `Pass`.
    pub fn status(&self) -> Status {
        if !self.missing_sections.is_empty() {
            Status::Fail
        } else if !self.format_issues.is_empty() {
            Status::Warning
        } else {
            Status::Pass
        }
    }
}

/// Validate template text against a required section list.
pub fn validate<S: AsRef<str>>(text: &str, required: &[S]) -> Validation {
    let headers = template::parse_headers(text);
    let segments = template::tokenize(text);

    let (sections_found, missing_sections) = check_sections(&headers, required);

    let mut format_issues = check_header_levels(&headers);
    format_issues.extend(check_placeholders(&segments));
    format_issues.extend(check_links(text));
    // Stable: issues on the same line keep check order.
    format_issues.sort_by_key(|issue| issue.line);

    let stats = compute_stats(text, &headers, &segments);

    Validation {
        sections_found,
        missing_sections,
        format_issues,
        stats,
    }
}

/// Partition the required list into (found, missing) against level-2 headers.
fn check_sections<S: AsRef<str>>(headers: &[Header], required: &[S]) -> (Vec<String>, Vec<String>) {
    let mut found = Vec::new();
    let mut missing = Vec::new();
    for section in required {
        let section = section.as_ref();
        let present = headers.iter().any(|h| h.level == 2 && h.text == section);
        if present {
            found.push(section.to_string());
        } else {
            missing.push(section.to_string());
        }
    }
    (found, missing)
}

fn check_header_levels(headers: &[Header]) -> Vec<FormatIssue> {
    headers
        .windows(2)
        .filter(|pair| pair[1].level > pair[0].level + 1)
        .map(|pair| FormatIssue {
            line: pair[1].line,
            kind: IssueKind::SkippedHeaderLevel {
                from: pair[0].level,
                to: pair[1].level,
            },
        })
        .collect()
}

fn check_placeholders(segments: &[Segment<'_>]) -> Vec<FormatIssue> {
    segments
        .iter()
        .filter_map(|segment| match segment {
            Segment::Malformed { line, reason, .. } => Some(FormatIssue {
                line: *line,
                kind: match reason {
                    Malformed::Unterminated => IssueKind::UnterminatedPlaceholder,
                    Malformed::InvalidName(name) => IssueKind::InvalidPlaceholderName {
                        name: name.clone(),
                    },
                },
            }),
            _ => None,
        })
        .collect()
}

/// Find links whose destination is empty or whitespace.
///
/// Uses a real CommonMark parser so that brackets inside code spans and fenced
/// blocks are not reported.
fn check_links(text: &str) -> Vec<FormatIssue> {
    let mut issues = Vec::new();
    // (start offset, accumulated link text) for the link currently being read
    let mut open_link: Option<(usize, String)> = None;

    for (event, range) in Parser::new(text).into_offset_iter() {
        match event {
            Event::Start(Tag::Link { dest_url, .. }) if dest_url.trim().is_empty() => {
                open_link = Some((range.start, String::new()));
            }
            Event::Text(t) | Event::Code(t) => {
                if let Some((_, label)) = open_link.as_mut() {
                    label.push_str(&t);
                }
            }
            Event::End(TagEnd::Link) => {
                if let Some((start, label)) = open_link.take() {
                    issues.push(FormatIssue {
                        line: line_at(text, start),
                        kind: IssueKind::EmptyLinkUrl { text: label },
                    });
                }
            }
            _ => {}
        }
    }
    issues
}

/// 1-based line number of a byte offset.
fn line_at(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}

fn compute_stats(text: &str, headers: &[Header], segments: &[Segment<'_>]) -> Stats {
    Stats {
        lines: text.split('\n').count(),
        words: text.split_whitespace().count(),
        bytes: text.len(),
        sections: headers.iter().filter(|h| h.level == 2).count(),
        placeholders: segments
            .iter()
            .filter(|s| matches!(s, Segment::Placeholder { .. }))
            .count(),
    }
}
