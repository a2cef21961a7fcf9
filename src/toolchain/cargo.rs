//! `cargo` as the toolchain for the bundled Rust template.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::constants::BUILD_UNIT_NAME;
use crate::core::AgenticcError;
use crate::toolchain::{DependencyPin, Toolchain, ToolchainCommand, ToolchainStep};
use crate::utils::platform::{executable_name, get_cargo_command};

/// Drives `cargo` through the four build steps.
///
/// Build output goes to `<unit>/target` through `CARGO_TARGET_DIR`, so an
/// enclosing workspace or a user-level target directory never leaks into the
/// build.
#[derive(Debug, Clone)]
pub struct CargoToolchain {
    program: PathBuf,
}

impl CargoToolchain {
    /// Locate `cargo`, either at `configured` or on `PATH`.
    pub fn locate(configured: Option<&Path>) -> Result<Self, AgenticcError> {
        let program = configured.map_or_else(|| PathBuf::from(get_cargo_command()), Path::to_path_buf);
        let resolved = which::which(&program).map_err(|e| {
            tracing::debug!(target: "toolchain", "Cannot locate {}: {}", program.display(), e);
            AgenticcError::ToolchainNotFound {
                program: program.display().to_string(),
            }
        })?;
        tracing::debug!(target: "toolchain", "Using cargo at {}", resolved.display());
        Ok(Self::with_program(resolved))
    }

    /// Use `program` as-is without checking that it exists.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, unit: &Path, step: ToolchainStep) -> ToolchainCommand {
        ToolchainCommand::new(&self.program, step)
            .current_dir(unit)
            .env("CARGO_TARGET_DIR", target_dir(unit).display().to_string())
    }

    fn init_command(&self, unit: &Path) -> ToolchainCommand {
        self.command(unit, ToolchainStep::InitUnit).args([
            "init",
            "--bin",
            "--vcs",
            "none",
            "--name",
            BUILD_UNIT_NAME,
            "--quiet",
        ])
    }

    fn add_command(&self, unit: &Path, pin: &DependencyPin) -> ToolchainCommand {
        let cmd = self
            .command(unit, ToolchainStep::ResolveDependency)
            .args(["add", "--quiet"])
            .arg(pin.spec());
        if pin.features.is_empty() {
            cmd
        } else {
            cmd.arg("--features").arg(pin.features.join(","))
        }
    }

    fn tidy_command(&self, unit: &Path) -> ToolchainCommand {
        self.command(unit, ToolchainStep::Tidy).args(["generate-lockfile", "--quiet"])
    }

    fn build_command(&self, unit: &Path) -> ToolchainCommand {
        self.command(unit, ToolchainStep::Compile).args(["build", "--release", "--quiet"])
    }
}

fn target_dir(unit: &Path) -> PathBuf {
    unit.join("target")
}

impl Toolchain for CargoToolchain {
    fn name(&self) -> &str {
        "cargo"
    }

    fn source_file(&self, unit: &Path) -> PathBuf {
        unit.join("src").join("main.rs")
    }

    async fn init_unit(&self, unit: &Path) -> Result<()> {
        self.init_command(unit).execute().await?;
        Ok(())
    }

    async fn resolve_dependency(&self, unit: &Path, pin: &DependencyPin) -> Result<()> {
        self.add_command(unit, pin).execute().await?;
        Ok(())
    }

    async fn tidy(&self, unit: &Path) -> Result<()> {
        self.tidy_command(unit).execute().await?;
        Ok(())
    }

    async fn compile(&self, unit: &Path) -> Result<PathBuf> {
        self.build_command(unit).execute().await?;

        let binary = target_dir(unit).join("release").join(executable_name(BUILD_UNIT_NAME));
        if !binary.is_file() {
            return Err(AgenticcError::ToolchainStepFailed {
                step: ToolchainStep::Compile,
                diagnostics: format!(
                    "cargo reported success but {} was not produced",
                    binary.display()
                ),
            }
            .into());
        }
        Ok(binary)
    }
}
