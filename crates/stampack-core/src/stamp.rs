//! Stamp resolution and placeholder substitution
//!
//! Stamps come from two sources: build status files (`key value` pairs,
//! one per line) and image manifests describing container images produced
//! by the build. Both collapse into a single ordered mapping from
//! placeholder name to replacement string, which is then applied to chart
//! sources as a literal `{key}` substring replace.

use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};
use crate::files::read_to_string;

/// Descriptor tying a build-time label to a resolved container image.
///
/// The `digest` field is a path to a one-line file holding the literal
/// digest string, written by the image build step.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageManifest {
    pub label: String,
    pub registry: String,
    pub repository: String,
    pub digest: PathBuf,
}

impl ImageManifest {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// The canonical `registry/repository@digest` reference.
    pub fn reference(&self) -> Result<String> {
        let digest = read_to_string(&self.digest)?;
        Ok(format!(
            "{}/{}@{}",
            self.registry,
            self.repository,
            digest.trim()
        ))
    }
}

/// Ordered mapping from placeholder name to replacement value.
///
/// Image entries are inserted before status entries, and iteration during
/// substitution follows insertion order. A status key may overwrite an
/// image entry; the value is replaced in place.
#[derive(Debug, Clone, Default)]
pub struct StampMap {
    entries: IndexMap<String, String>,
}

impl StampMap {
    /// Resolve all stamps for one packager invocation.
    ///
    /// `status_files` are processed in the order given; the last file wins
    /// duplicate keys.
    pub fn resolve(
        image_manifests: &[PathBuf],
        workspace_name: &str,
        status_files: &[PathBuf],
    ) -> Result<Self> {
        let mut stamps = StampMap::default();
        for path in image_manifests {
            let manifest = ImageManifest::from_file(path)?;
            stamps.insert_image(&manifest, workspace_name)?;
        }
        for path in status_files {
            stamps.load_status_file(path)?;
        }
        Ok(stamps)
    }

    /// Register an image under its label, and under a workspace-qualified
    /// alias when the label is not already qualified. The alias lets chart
    /// sources reference the image whether or not they spell out the
    /// workspace.
    fn insert_image(&mut self, manifest: &ImageManifest, workspace_name: &str) -> Result<()> {
        let reference = manifest.reference()?;
        let label = manifest.label.trim();
        self.entries.insert(label.to_string(), reference.clone());
        if !label.starts_with('@') {
            self.entries
                .insert(format!("@{workspace_name}{label}"), reference);
        }
        Ok(())
    }

    /// Parse a status file: one `key value` pair per line, first space is
    /// the delimiter. Blank lines are skipped; a non-empty line without a
    /// space is malformed and fatal.
    fn load_status_file(&mut self, path: &Path) -> Result<()> {
        let content = read_to_string(path)?;
        for line in content.lines() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                continue;
            }
            let (key, value) = line
                .split_once(' ')
                .ok_or_else(|| CoreError::MalformedStatusLine {
                    file: path.to_path_buf(),
                    line: line.to_string(),
                })?;
            if self.entries.contains_key(key) {
                tracing::warn!(key = %key, "status entry overrides an earlier stamp");
            }
            self.entries
                .insert(key.to_string(), value.trim_end().to_string());
        }
        Ok(())
    }

    /// Replace every literal `{key}` occurrence in `content` with the
    /// mapped value, in mapping iteration order.
    ///
    /// This is a plain substring replace: no escaping, no recursion, and
    /// placeholders without a matching key are left verbatim.
    pub fn apply(&self, content: &str) -> String {
        let mut out = content.to_string();
        for (key, value) in &self.entries {
            out = out.replace(&format!("{{{key}}}"), value);
        }
        out
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_image_manifest(dir: &Path, stem: &str, label: &str, digest: &str) -> PathBuf {
        let digest_path = dir.join(format!("{stem}.digest"));
        fs::write(&digest_path, format!("{digest}\n")).unwrap();

        let manifest_path = dir.join(format!("{stem}.json"));
        let manifest = serde_json::json!({
            "label": label,
            "registry": "registry.example.com",
            "repository": "app/server",
            "digest": digest_path,
        });
        fs::write(&manifest_path, manifest.to_string()).unwrap();
        manifest_path
    }

    #[test]
    fn test_image_label_registers_workspace_alias() {
        let temp = TempDir::new().unwrap();
        let manifest =
            write_image_manifest(temp.path(), "server", "//images:server", "sha256:abc123");

        let stamps = StampMap::resolve(&[manifest], "acme", &[]).unwrap();

        let expected = "registry.example.com/app/server@sha256:abc123";
        assert_eq!(stamps.get("//images:server"), Some(expected));
        assert_eq!(stamps.get("@acme//images:server"), Some(expected));
    }

    #[test]
    fn test_qualified_image_label_has_no_alias() {
        let temp = TempDir::new().unwrap();
        let manifest =
            write_image_manifest(temp.path(), "server", "@acme//images:server", "sha256:abc123");

        let stamps = StampMap::resolve(&[manifest], "acme", &[]).unwrap();

        assert_eq!(stamps.len(), 1);
        assert!(stamps.get("@acme//images:server").is_some());
    }

    #[test]
    fn test_last_status_file_wins_duplicates() {
        let temp = TempDir::new().unwrap();
        let stable = temp.path().join("stable.txt");
        let volatile = temp.path().join("volatile.txt");
        fs::write(&stable, "BUILD_VERSION 1.0.0\nBUILD_USER alice\n").unwrap();
        fs::write(&volatile, "BUILD_VERSION 2.0.0\n").unwrap();

        let stamps = StampMap::resolve(&[], "acme", &[stable, volatile]).unwrap();

        assert_eq!(stamps.get("BUILD_VERSION"), Some("2.0.0"));
        assert_eq!(stamps.get("BUILD_USER"), Some("alice"));
    }

    #[test]
    fn test_status_value_keeps_spaces_after_first() {
        let temp = TempDir::new().unwrap();
        let status = temp.path().join("status.txt");
        fs::write(&status, "BUILD_LABEL release candidate 1\n").unwrap();

        let stamps = StampMap::resolve(&[], "acme", &[status]).unwrap();
        assert_eq!(stamps.get("BUILD_LABEL"), Some("release candidate 1"));
    }

    #[test]
    fn test_crlf_status_file() {
        let temp = TempDir::new().unwrap();
        let status = temp.path().join("status.txt");
        fs::write(&status, "BUILD_VERSION 1.0.0\r\nBUILD_USER bob\r\n").unwrap();

        let stamps = StampMap::resolve(&[], "acme", &[status]).unwrap();
        assert_eq!(stamps.get("BUILD_VERSION"), Some("1.0.0"));
        assert_eq!(stamps.get("BUILD_USER"), Some("bob"));
    }

    #[test]
    fn test_malformed_status_line_is_fatal() {
        let temp = TempDir::new().unwrap();
        let status = temp.path().join("status.txt");
        fs::write(&status, "BUILD_VERSION 1.0.0\nNOSPACE\n").unwrap();

        let err = StampMap::resolve(&[], "acme", &[status]).unwrap_err();
        assert!(matches!(err, CoreError::MalformedStatusLine { .. }));
        assert!(err.to_string().contains("NOSPACE"));
    }

    #[test]
    fn test_apply_replaces_all_occurrences() {
        let temp = TempDir::new().unwrap();
        let status = temp.path().join("status.txt");
        fs::write(&status, "BUILD_VERSION 1.2.3\n").unwrap();
        let stamps = StampMap::resolve(&[], "acme", &[status]).unwrap();

        let out = stamps.apply("version: {BUILD_VERSION}\nappVersion: {BUILD_VERSION}\n");
        assert_eq!(out, "version: 1.2.3\nappVersion: 1.2.3\n");
    }

    #[test]
    fn test_apply_leaves_unknown_placeholders() {
        let stamps = StampMap::default();
        let content = "image: {UNKNOWN_KEY}\n";
        assert_eq!(stamps.apply(content), content);
    }

    #[test]
    fn test_apply_is_idempotent_once_resolved() {
        let temp = TempDir::new().unwrap();
        let status = temp.path().join("status.txt");
        fs::write(&status, "BUILD_VERSION 1.2.3\n").unwrap();
        let stamps = StampMap::resolve(&[], "acme", &[status]).unwrap();

        let once = stamps.apply("version: {BUILD_VERSION}\n");
        let twice = stamps.apply(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_image_entries_apply_before_status_entries() {
        let temp = TempDir::new().unwrap();
        let manifest = write_image_manifest(temp.path(), "server", "//images:server", "sha256:abc");
        let status = temp.path().join("status.txt");
        fs::write(&status, "//images:server overridden\n").unwrap();

        let stamps = StampMap::resolve(&[manifest], "acme", &[status]).unwrap();

        // The status entry layered on top of the image entry.
        assert_eq!(stamps.get("//images:server"), Some("overridden"));
        assert_eq!(
            stamps.get("@acme//images:server"),
            Some("registry.example.com/app/server@sha256:abc")
        );
    }

    #[test]
    fn test_missing_digest_file_is_fatal() {
        let temp = TempDir::new().unwrap();
        let manifest_path = temp.path().join("img.json");
        let manifest = serde_json::json!({
            "label": "//images:server",
            "registry": "registry.example.com",
            "repository": "app/server",
            "digest": temp.path().join("missing.digest"),
        });
        fs::write(&manifest_path, manifest.to_string()).unwrap();

        let err = StampMap::resolve(&[manifest_path], "acme", &[]).unwrap_err();
        assert!(matches!(err, CoreError::ReadFile { .. }));
    }
}
