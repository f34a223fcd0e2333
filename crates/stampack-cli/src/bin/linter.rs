//! Chart lint action
//!
//! Extracts a packaged chart into a scratch directory and runs the
//! external lint command against the chart root. The captured lint output
//! is persisted to `--output` on success as a marker for the build system.

use clap::Parser;
use std::fs;
use std::path::PathBuf;

use stampack::fail;
use stampack_core::{CoreError, ToolCommand, chart_root, extract_archive, files};

/// Environment variable naming a file of newline-separated arguments,
/// used as the argument source when the linter runs under a test harness.
const ARGS_FILE_ENV: &str = "STAMPACK_LINT_ARGS_FILE";

#[derive(Parser, Debug)]
#[command(name = "stampack-linter")]
#[command(version)]
#[command(about = "Lint a packaged chart with the external lint tool", long_about = None)]
struct LinterArgs {
    /// The path to the lint executable.
    #[arg(long)]
    helm: PathBuf,

    /// The packaged chart archive to lint.
    #[arg(long)]
    package: PathBuf,

    /// File to receive the lint output on success. Required unless
    /// `--test` is passed.
    #[arg(long, required_unless_present = "test")]
    output: Option<PathBuf>,

    /// Run as a test rather than a build action.
    #[arg(long)]
    test: bool,
}

fn parse_args() -> stampack::Result<LinterArgs> {
    match std::env::var(ARGS_FILE_ENV) {
        Ok(path) => {
            let content = files::read_to_string(&PathBuf::from(&path))?;
            let argv = std::iter::once("stampack-linter")
                .chain(content.lines().filter(|line| !line.is_empty()));
            Ok(LinterArgs::parse_from(argv))
        }
        Err(_) => Ok(LinterArgs::parse()),
    }
}

fn run(args: &LinterArgs) -> stampack::Result<()> {
    let scratch = tempfile::TempDir::new().map_err(CoreError::from)?;

    // Extract into a subdirectory so the tool isolation state written next
    // to it never competes with the single-chart-root check.
    let extract_dir = scratch.path().join("extracted");
    extract_archive(&args.package, &extract_dir)?;
    let root = chart_root(&extract_dir)?;

    let tool = ToolCommand::new(&args.helm, scratch.path(), None)?;
    let out = tool.run(&["lint", "."], &root)?;

    if let Some(output) = &args.output {
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(CoreError::from)?;
        }
        fs::write(output, &out.stdout).map_err(CoreError::from)?;
    }

    Ok(())
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(err) => fail(err),
    };
    if let Err(err) = run(&args) {
        fail(err);
    }
}
