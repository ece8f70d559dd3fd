//! Placeholder substitution.
//!
//! Rendering walks the [`template::tokenize`] segments once and writes each
//! one to the output: literal text as-is, known placeholders as their value,
//! everything else as its original source text. Two consequences:
//!
//! - **Fail open**: an unknown `{{name}}` stays in the output verbatim, so a
//!   gap in the variable map is visible in the rendered manual instead of
//!   silently becoming an empty string.
//! - **No recursive expansion**: values are appended to the output and never
//!   rescanned, so a value containing `{{version}}` is emitted literally.

use crate::template::{self, Segment};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Format used for the default `date` variable.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Placeholder name → replacement text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    values: BTreeMap<String, String>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the run's variable map from configured values, filling in
    /// `date` from `today` when the configuration doesn't pin it.
    pub fn with_defaults(configured: &BTreeMap<String, String>, today: NaiveDate) -> Self {
        let mut vars = Self::new();
        vars.set("date", today.format(DATE_FORMAT).to_string());
        for (name, value) in configured {
            vars.set(name.clone(), value.clone());
        }
        vars
    }

    /// Insert or overwrite a value. Later calls win.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = Self::new();
        for (k, v) in iter {
            vars.set(k, v);
        }
        vars
    }
}

/// Output of [`render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    /// Placeholder occurrences replaced with a value.
    pub substituted: usize,
    /// Distinct placeholder names left literal because no value was supplied,
    /// in first-seen order.
    pub unresolved: Vec<String>,
}

/// Substitute every known `{{name}}` in `text` with its value.
pub fn render(text: &str, vars: &Variables) -> Rendered {
    let mut out = String::with_capacity(text.len());
    let mut substituted = 0;
    let mut unresolved: Vec<String> = Vec::new();

    for segment in template::tokenize(text) {
        match segment {
            Segment::Placeholder { name, raw, .. } => match vars.get(name) {
                Some(value) => {
                    out.push_str(value);
                    substituted += 1;
                }
                None => {
                    out.push_str(raw);
                    if !unresolved.iter().any(|n| n == name) {
                        unresolved.push(name.to_string());
                    }
                }
            },
            other => out.push_str(other.raw()),
        }
    }

    Rendered {
        text: out,
        substituted,
        unresolved,
    }
}
