//! CLI error type with exit code handling
//!
//! Maps core errors onto process exit codes. External-tool failures carry
//! the tool's captured output so the binaries can surface it verbatim
//! before exiting with the tool's own status.

use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;
use stampack_core::CoreError;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// The external tool exited nonzero.
    #[error("{tool} exited with status {status}")]
    #[diagnostic(code(stampack::cli::tool))]
    Tool {
        tool: String,
        status: i32,
        /// Combined captured stdout and stderr.
        output: String,
    },

    /// Failure from the core library (precondition or IO).
    #[error(transparent)]
    #[diagnostic(code(stampack::cli::core))]
    Core(CoreError),

    /// Invalid arguments beyond what the parser can express.
    #[error("{message}")]
    #[diagnostic(code(stampack::cli::usage))]
    Usage { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Tool { status, .. } => *status,
            CliError::Core(err) if err.is_precondition() => exit_codes::PRECONDITION_ERROR,
            CliError::Core(_) => exit_codes::IO_ERROR,
            CliError::Usage { .. } => exit_codes::USAGE_ERROR,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ToolFailure {
                tool,
                status,
                stdout,
                stderr,
            } => CliError::Tool {
                tool,
                status,
                output: format!("{stdout}{stderr}"),
            },
            other => CliError::Core(other),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
