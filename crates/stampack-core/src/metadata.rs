//! Packaged chart metadata record
//!
//! The packaging tool names its output `<name>-<version>.tgz`. The build
//! system wants those two fields back as a structured record, so they are
//! recovered from the file name rather than by re-reading the archive.

use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::error::{CoreError, Result};

/// Name and version of a packaged chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartMetadata {
    pub name: String,
    pub version: String,
}

impl ChartMetadata {
    /// Parse an archive base name of the form `<name>-<version>.tgz`.
    ///
    /// The version starts with a digit and may contain digits, letters,
    /// underscores, hyphens and dots; the name is everything before the
    /// hyphen that introduces it. Chart names themselves may contain
    /// hyphens, which is why the version is anchored on its leading digit.
    pub fn from_archive_name(file_name: &str) -> Result<Self> {
        let pattern = Regex::new(r"^(.*)-(\d[\w.-]+)\.tgz$").expect("valid regex");
        let captures = pattern
            .captures(file_name)
            .ok_or_else(|| CoreError::MetadataParse {
                name: file_name.to_string(),
            })?;

        Ok(Self {
            name: captures[1].to_string(),
            version: captures[2].to_string(),
        })
    }

    /// Write the record as indented JSON.
    pub fn write(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }
}
