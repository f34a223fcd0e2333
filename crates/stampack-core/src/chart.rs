//! Chart manifest preparation
//!
//! The chart manifest (`Chart.yaml`) is treated as text, not parsed YAML:
//! stamping is a literal substring replace and the follow-up fixes are
//! line-scoped, so the manifest round-trips byte-for-byte outside the
//! touched lines.

use crate::error::{CoreError, Result};
use crate::stamp::StampMap;

/// A chart manifest after stamping and version sanitization.
#[derive(Debug, Clone)]
pub struct ChartManifest {
    content: String,
    name: String,
}

impl ChartManifest {
    /// Stamp the manifest source, sanitize version lines, and extract the
    /// declared chart name.
    ///
    /// A manifest with no `name:` line is a fatal precondition violation:
    /// the packaging tool requires the staging directory to be named after
    /// the chart, so there is nothing sensible to stage without one.
    pub fn prepare(source: &str, stamps: &StampMap) -> Result<Self> {
        let stamped = stamps.apply(source);
        let content = sanitize_version_lines(&stamped);
        let name = chart_name(&content)?;
        Ok(Self { content, name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Unstamped builds leave `{PLACEHOLDER}` syntax in version fields, which
/// the packaging tool rejects. Strip the braces and map `_` to `-` on
/// lines starting with `version` or `appVersion` so those builds still
/// produce a syntactically valid version string. Other lines are left
/// untouched.
fn sanitize_version_lines(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for line in content.split_inclusive('\n') {
        if line.starts_with("version") || line.starts_with("appVersion") {
            for c in line.chars() {
                match c {
                    '{' | '}' => {}
                    '_' => out.push('-'),
                    other => out.push(other),
                }
            }
        } else {
            out.push_str(line);
        }
    }
    out
}

/// The value of the last line starting with `name:`, with surrounding
/// whitespace and quote characters trimmed.
fn chart_name(content: &str) -> Result<String> {
    let mut name = None;
    for line in content.lines() {
        if let Some(rest) = line.strip_prefix("name:") {
            let value = rest.trim_matches([' ', '"', '\'']);
            if !value.is_empty() {
                name = Some(value.to_string());
            }
        }
    }
    name.ok_or(CoreError::MissingChartName)
}
