//! Process exit codes for the stampack binaries
//!
//! External-tool failures do not use these: the process mirrors the tool's
//! own exit code so the build system sees the original status.

/// Success - the action completed and all declared outputs were written.
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure.
pub const ERROR: i32 = 1;

/// Precondition violation - missing chart name, ambiguous archive output,
/// malformed status file, unparseable archive name.
pub const PRECONDITION_ERROR: i32 = 2;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// Usage error - invalid arguments (following sysexits.h convention).
pub const USAGE_ERROR: i32 = 64;
