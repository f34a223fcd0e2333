//! External chart-tool invocation
//!
//! The packaging and lint tools are opaque pre-built executables. They are
//! run with a hermetic environment: every tool home directory and the
//! kubeconfig point into the invocation's scratch directory, so the run
//! never observes (or mutates) host state.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{CoreError, Result};

/// Captured output of a successful tool run.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// A configured external tool, ready to run subcommands.
pub struct ToolCommand {
    program: PathBuf,
    env: Vec<(&'static str, PathBuf)>,
}

impl ToolCommand {
    /// Configure the tool at `program` (made absolute against the current
    /// directory, since every run changes its working directory) with
    /// isolation state rooted in `scratch`.
    pub fn new(program: &Path, scratch: &Path, plugins: Option<&Path>) -> Result<Self> {
        let program = absolutize(program)?;

        // An empty kubeconfig keeps the tool from picking up cluster
        // credentials from the host.
        let kubeconfig = scratch.join(".kubeconfig");
        fs::write(&kubeconfig, "")?;

        let mut env = vec![
            ("KUBECONFIG", kubeconfig),
            ("HELM_CACHE_HOME", scratch.join("cache")),
            ("HELM_CONFIG_HOME", scratch.join("config")),
            ("HELM_DATA_HOME", scratch.join("data")),
            ("HELM_REPOSITORY_CACHE", scratch.join("repository_cache")),
            ("HELM_REPOSITORY_CONFIG", scratch.join("repositories.yaml")),
            ("HELM_REGISTRY_CONFIG", scratch.join("config.json")),
        ];
        if let Some(plugins) = plugins {
            env.push(("HELM_PLUGINS", absolutize(plugins)?));
        }

        Ok(Self { program, env })
    }

    /// Run the tool with `args` in `cwd`, blocking until it exits.
    ///
    /// A nonzero exit becomes `CoreError::ToolFailure` carrying the
    /// captured output and the tool's own exit status, which callers
    /// surface verbatim and mirror as the process exit code.
    pub fn run(&self, args: &[&str], cwd: &Path) -> Result<ToolOutput> {
        let output = Command::new(&self.program)
            .args(args)
            .current_dir(cwd)
            .envs(self.env.iter().map(|(key, value)| (*key, value.as_path())))
            .output()?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(CoreError::ToolFailure {
                tool: self.program.display().to_string(),
                // A signal death has no code; report a plain failure.
                status: output.status.code().unwrap_or(1),
                stdout,
                stderr,
            });
        }

        Ok(ToolOutput { stdout, stderr })
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
