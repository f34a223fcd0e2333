//! Chart staging directory assembly
//!
//! The packaging tool is pointed at a directory shaped like a chart:
//! `Chart.yaml`, `values.yaml`, `templates/**` and `charts/*.tgz` for
//! dependencies. The directory itself must carry the chart's declared name.
//! Everything lives under a scratch directory that is removed when the
//! `StagedChart` is dropped, on success and error paths alike.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::chart::ChartManifest;
use crate::error::{CoreError, Result};
use crate::files::copy_file;

/// A staged chart directory ready for the packaging tool.
#[derive(Debug)]
pub struct StagedChart {
    scratch: TempDir,
    root: PathBuf,
}

impl StagedChart {
    /// Assemble the staging directory from processed chart sources.
    pub fn assemble(
        manifest: &ChartManifest,
        values: &str,
        templates: &[PathBuf],
        deps: &[PathBuf],
    ) -> Result<Self> {
        let scratch = TempDir::new()?;
        let root = scratch.path().join(manifest.name());
        fs::create_dir_all(&root)?;

        fs::write(root.join("Chart.yaml"), manifest.content())?;
        fs::write(root.join("values.yaml"), values)?;

        for template in templates {
            let rel = template_rel_path(template)?;
            copy_file(template, &root.join("templates").join(rel))?;
        }

        if !deps.is_empty() {
            let charts_dir = root.join("charts");
            // create_dir, not create_dir_all: a pre-existing charts/
            // directory means the staging area is not ours alone.
            fs::create_dir(&charts_dir)?;
            for dep in deps {
                let file_name = dep.file_name().ok_or_else(|| CoreError::Staging {
                    message: format!("dependency archive has no file name: {}", dep.display()),
                })?;
                copy_file(dep, &charts_dir.join(file_name))?;
            }
        }

        Ok(Self { scratch, root })
    }

    /// The chart directory the packaging tool runs in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The enclosing scratch directory, used for tool isolation state.
    pub fn scratch(&self) -> &Path {
        self.scratch.path()
    }

    /// Locate the single `.tgz` archive the packaging tool produced in the
    /// chart root. Zero or several matches means the tool did something
    /// unexpected and the build must not guess.
    pub fn find_archive(&self) -> Result<PathBuf> {
        let mut archives = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "tgz") {
                archives.push(path);
            }
        }
        match archives.as_slice() {
            [archive] => Ok(archive.clone()),
            _ => Err(CoreError::ArchiveCount {
                dir: self.root.clone(),
                found: archives.len(),
            }),
        }
    }
}

/// Path of `template` relative to its nearest ancestor directory literally
/// named `templates`, found by walking parent components toward the root.
fn template_rel_path(template: &Path) -> Result<&Path> {
    for ancestor in template.ancestors().skip(1) {
        if ancestor.file_name().is_some_and(|name| name == "templates") {
            return template
                .strip_prefix(ancestor)
                .map_err(|_| CoreError::TemplateOutsideTemplatesDir {
                    path: template.to_path_buf(),
                });
        }
    }
    Err(CoreError::TemplateOutsideTemplatesDir {
        path: template.to_path_buf(),
    })
}
