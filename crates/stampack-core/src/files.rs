//! Small filesystem helpers shared by the staging and packaging steps.

use std::fs;
use std::path::Path;

use crate::error::{CoreError, Result};

/// Read a file to a string, recording the offending path on failure.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| CoreError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Copy `src` to `dest`, creating parent directories of `dest` as needed.
pub fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dest)?;
    Ok(())
}

/// Move `src` to `dest`, creating parent directories of `dest` as needed.
///
/// A plain rename fails when `dest` lives on a different filesystem than
/// `src` (the staging directory is usually on tmpfs), so fall back to a
/// copy followed by removal of the source.
pub fn move_file(src: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(src, dest)?;
            fs::remove_file(src)?;
            Ok(())
        }
    }
}
