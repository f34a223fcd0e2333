//! Core error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("chart manifest has no `name:` entry")]
    MissingChartName,

    #[error("malformed status line in {file}: {line:?} (expected `key value`)")]
    MalformedStatusLine { file: PathBuf, line: String },

    #[error("template {path} has no ancestor directory named `templates`")]
    TemplateOutsideTemplatesDir { path: PathBuf },

    #[error("expected exactly one packaged archive in {dir}, found {found}")]
    ArchiveCount { dir: PathBuf, found: usize },

    #[error("expected the archive to extract to exactly one entry, found {found}")]
    ChartRootCount { found: usize },

    #[error("unable to parse chart name and version from {name:?}")]
    MetadataParse { name: String },

    #[error("{tool} exited with status {status}")]
    ToolFailure {
        tool: String,
        status: i32,
        stdout: String,
        stderr: String,
    },

    #[error("staging error: {message}")]
    Staging { message: String },

    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl CoreError {
    /// True for failures of declared preconditions, as opposed to
    /// environmental IO failures or external-tool exits.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            CoreError::MissingChartName
                | CoreError::MalformedStatusLine { .. }
                | CoreError::TemplateOutsideTemplatesDir { .. }
                | CoreError::ArchiveCount { .. }
                | CoreError::ChartRootCount { .. }
                | CoreError::MetadataParse { .. }
                | CoreError::Staging { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
