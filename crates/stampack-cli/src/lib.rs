//! Shared plumbing for the stampack binaries

pub mod error;
pub mod exit_codes;

pub use error::{CliError, Result};

/// Report `err` and terminate with its mapped exit code.
///
/// Captured external-tool output is surfaced verbatim on stderr before the
/// diagnostic, so the build log shows exactly what the tool printed.
pub fn fail(err: CliError) -> ! {
    let code = err.exit_code();
    if let CliError::Tool { output, .. } = &err {
        eprint!("{output}");
    }
    eprintln!("{:?}", miette::Report::new(err));
    std::process::exit(code)
}
