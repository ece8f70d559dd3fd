//! Generator configuration.
//!
//! Handles loading, validating, and merging `manual.toml`. Every key is
//! optional: stock defaults are serialized to a TOML table, the user file is
//! merged on top of it key by key, and the merged table is deserialized with
//! unknown keys rejected. Command-line flags override the result.
//!
//! ## Config File Location
//!
//! `manual.toml` in the working directory is picked up automatically. Use
//! `--config <path>` to point at a different file; an explicit path that does
//! not exist is an error.
//!
//! ## Configuration Options
//!
//! ```toml
//! [paths]
//! template = "docs/templates/user-manual-template.md"
//! output = "docs/user-manual.md"
//! report = "reports/validation-report.json"
//!
//! [sections]
//! required = ["Overview", "Device Setup", "Feature Guide", "Troubleshooting", "Safety Guidelines"]
//!
//! [variables]
//! system_name = "Smart Home Control System"
//! version = "1.0.0"
//! # date defaults to today (YYYY-MM-DD) unless set here
//! ```
//!
//! Run `manual-gen --gen-config` for a fully commented copy.

use crate::template;
use crate::validate::DEFAULT_REQUIRED_SECTIONS;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "manual.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Generator configuration loaded from `manual.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManualConfig {
    /// Input and output locations.
    pub paths: PathsConfig,
    /// Required section headers.
    pub sections: SectionsConfig,
    /// Default placeholder values, overridable with `--var` and `--version`.
    pub variables: BTreeMap<String, String>,
}

impl ManualConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, path) in [
            ("paths.template", &self.paths.template),
            ("paths.output", &self.paths.output),
            ("paths.report", &self.paths.report),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }

        let mut seen = Vec::with_capacity(self.sections.required.len());
        for section in &self.sections.required {
            if section.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "sections.required entries must not be empty".into(),
                ));
            }
            if seen.contains(&section) {
                return Err(ConfigError::Validation(format!(
                    "sections.required lists '{section}' more than once"
                )));
            }
            seen.push(section);
        }

        for name in self.variables.keys() {
            if !template::is_identifier(name) {
                return Err(ConfigError::Validation(format!(
                    "variables.{name}: names may only contain letters, digits and underscores"
                )));
            }
        }
        Ok(())
    }
}

/// Where the template is read from and where outputs go.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub template: PathBuf,
    pub output: PathBuf,
    pub report: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            template: PathBuf::from("docs/templates/user-manual-template.md"),
            output: PathBuf::from("docs/user-manual.md"),
            report: PathBuf::from("reports/validation-report.json"),
        }
    }
}

/// Section headers a template must contain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SectionsConfig {
    /// Exact `## Name` header texts, in the order they are reported.
    pub required: Vec<String>,
}

impl Default for SectionsConfig {
    fn default() -> Self {
        Self {
            required: DEFAULT_REQUIRED_SECTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Variables that exist even with no config file.
///
/// `date` is not listed: it is computed at run time (see
/// [`crate::render::Variables::with_defaults`]).
pub fn default_variables() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("system_name".to_string(), "Smart Home Control System".to_string()),
        ("version".to_string(), "1.0.0".to_string()),
    ])
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// Base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    let stock = ManualConfig {
        variables: default_variables(),
        ..ManualConfig::default()
    };
    toml::Value::try_from(stock)
        .map_err(|e| ConfigError::Validation(format!("stock config does not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, so
///   `sections.required` is replaced, not appended to.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value. `Ok(None)` if it doesn't exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ManualConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ManualConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load configuration.
///
/// - `Some(path)`: the file must exist.
/// - `None`: [`CONFIG_FILE_NAME`] in `cwd` is used if present, stock defaults otherwise.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<ManualConfig, ConfigError> {
    let overlay = match explicit {
        Some(path) => match load_raw_config(path)? {
            Some(value) => Some(value),
            None => return Err(ConfigError::NotFound(path.to_path_buf())),
        },
        None => load_raw_config(&cwd.join(CONFIG_FILE_NAME))?,
    };
    resolve_config(stock_defaults_value()?, overlay)
}

/// Returns a fully-commented stock `manual.toml`.
///
/// Used by `--gen-config`.
pub fn stock_config_toml() -> &'static str {
    r###"# manual-gen configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.
#
# Command-line flags (--template, --output, --report, --version, --var)
# override anything set here.

# ---------------------------------------------------------------------------
# Paths
# ---------------------------------------------------------------------------
[paths]
# Markdown template with {{placeholders}}.
template = "docs/templates/user-manual-template.md"

# Rendered manual. Parent directories are created as needed.
output = "docs/user-manual.md"

# JSON validation report. Parent directories are created as needed.
report = "reports/validation-report.json"

# ---------------------------------------------------------------------------
# Structure
# ---------------------------------------------------------------------------
[sections]
# Level-2 headers ("## Name") the template must contain, matched exactly.
# A missing section fails validation. Setting this list replaces it entirely.
required = [
    "Overview",
    "Device Setup",
    "Feature Guide",
    "Troubleshooting",
    "Safety Guidelines",
]

# ---------------------------------------------------------------------------
# Placeholder values
# ---------------------------------------------------------------------------
[variables]
# Each key fills {{key}} in the template. Names: letters, digits, underscore.
# {{date}} defaults to today's date (YYYY-MM-DD) unless set here.
system_name = "Smart Home Control System"
version = "1.0.0"
"###
}
