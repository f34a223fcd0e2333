//! Packaged chart extraction
//!
//! A packaged chart is a gzip-compressed tarball whose contents live under
//! a single top-level directory named after the chart.

use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tar::Archive;

use crate::error::{CoreError, Result};

/// Extract a packaged chart archive into `dest`, creating it as needed.
pub fn extract_archive(archive_path: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive_path).map_err(|source| CoreError::ReadFile {
        path: archive_path.to_path_buf(),
        source,
    })?;
    let decoder = GzDecoder::new(file);
    let mut archive = Archive::new(decoder);

    fs::create_dir_all(dest)?;
    archive.unpack(dest)?;

    Ok(())
}

/// The single top-level entry a well-formed chart archive extracts to.
///
/// Anything other than exactly one entry means the archive root is
/// ambiguous and linting would run against the wrong directory.
pub fn chart_root(extract_dir: &Path) -> Result<PathBuf> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(extract_dir)? {
        entries.push(entry?.path());
    }
    match entries.as_slice() {
        [root] => Ok(root.clone()),
        _ => Err(CoreError::ChartRootCount {
            found: entries.len(),
        }),
    }
}
