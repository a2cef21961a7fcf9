//! Builder for toolchain child processes
//!
//! Every toolchain invocation goes through [`ToolchainCommand`], which gives
//! consistent logging and maps failures onto the typed errors:
//!
//! - the executable cannot be spawned because it does not exist:
//!   [`AgenticcError::ToolchainNotFound`]
//! - the executable exists but cannot be spawned: [`AgenticcError::IoError`]
//! - the process exits unsuccessfully: [`AgenticcError::ToolchainStepFailed`]
//!   with the captured stderr (stdout when stderr is empty)
//!
//! Commands run to completion; no timeout is applied.
//!
//! # Examples
//!
//! ```rust,no_run
//! use agenticc::toolchain::{ToolchainCommand, ToolchainStep};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let output = ToolchainCommand::new("cargo", ToolchainStep::Compile)
//!     .args(["build", "--release"])
//!     .current_dir("/tmp/unit")
//!     .env("CARGO_TARGET_DIR", "/tmp/unit/target")
//!     .execute()
//!     .await?;
//! println!("{}", output.stderr);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::Command;

use crate::core::AgenticcError;
use crate::toolchain::ToolchainStep;

/// Fluent builder for one toolchain step.
#[derive(Debug, Clone)]
pub struct ToolchainCommand {
    /// Executable to run
    program: PathBuf,

    /// Step this command performs, used for error reporting
    step: ToolchainStep,

    args: Vec<String>,

    /// Working directory (defaults to the process directory)
    current_dir: Option<PathBuf>,

    env_vars: Vec<(String, String)>,
}

/// Captured output of a successful command.
#[derive(Debug, Clone, Default)]
pub struct ToolchainOutput {
    pub stdout: String,
    pub stderr: String,
}

impl ToolchainCommand {
    pub fn new(program: impl Into<PathBuf>, step: ToolchainStep) -> Self {
        Self {
            program: program.into(),
            step,
            args: Vec::new(),
            current_dir: None,
            env_vars: Vec::new(),
        }
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child only.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    #[must_use]
    pub const fn step(&self) -> ToolchainStep {
        self.step
    }

    /// Human-readable command line for logs.
    #[must_use]
    pub fn display_command(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Run the command and wait for it to exit.
    pub async fn execute(self) -> Result<ToolchainOutput> {
        let start = std::time::Instant::now();
        let command_line = self.display_command();
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
            tracing::debug!(
                target: "toolchain",
                "Executing command: {} (in {})",
                command_line,
                dir.display()
            );
        } else {
            tracing::debug!(target: "toolchain", "Executing command: {}", command_line);
        }

        for (key, value) in &self.env_vars {
            tracing::trace!(target: "toolchain", "Setting env var: {}={}", key, value);
            cmd.env(key, value);
        }

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = match cmd.output().await {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AgenticcError::ToolchainNotFound {
                    program: self.program.display().to_string(),
                }
                .into());
            }
            Err(e) => {
                return Err(AgenticcError::IoError(e))
                    .with_context(|| format!("Failed to execute {command_line}"));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!(
                target: "toolchain",
                "Command failed with exit code: {:?}",
                output.status.code()
            );
            let diagnostics = if stderr.trim().is_empty() {
                stdout
            } else {
                stderr
            };
            return Err(AgenticcError::ToolchainStepFailed {
                step: self.step,
                diagnostics,
            }
            .into());
        }

        for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
            tracing::trace!(target: "toolchain", "{}", line);
        }

        let elapsed = start.elapsed();
        tracing::debug!(
            target: "toolchain::perf",
            "{} completed in {:.2}s",
            self.step,
            elapsed.as_secs_f64()
        );

        Ok(ToolchainOutput {
            stdout,
            stderr,
        })
    }
}
