//! Build orchestration
//!
//! Turns specialized template source into a compiled binary by driving a
//! [`Toolchain`] through its steps inside an ephemeral [`Workspace`]:
//!
//! ```text
//! create workspace → write source → init unit → add pinned dependency → tidy → compile
//! ```
//!
//! Each step runs only after the previous one succeeded, and the first failure
//! aborts the build with the toolchain's diagnostics. The workspace is removed
//! when the build returns, whatever the outcome; the compiled binary survives
//! as a [`CompiledArtifact`] in its own temporary file.

pub mod workspace;

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::installer::CompiledArtifact;
use crate::toolchain::{DependencyPin, Toolchain, ToolchainStep};
use crate::utils::fs::ensure_dir;
use crate::utils::progress::StepSpinner;

pub use workspace::Workspace;

/// Builds specialized sources with one toolchain.
#[derive(Debug)]
pub struct BuildOrchestrator<T: Toolchain> {
    toolchain: T,
    pin: DependencyPin,
    workspace_parent: Option<PathBuf>,
    show_progress: bool,
}

impl<T: Toolchain> BuildOrchestrator<T> {
    pub fn new(toolchain: T) -> Self {
        Self {
            toolchain,
            pin: DependencyPin::TEMPLATE,
            workspace_parent: None,
            show_progress: false,
        }
    }

    #[must_use]
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Create workspaces under `parent` instead of the system temp dir.
    #[must_use]
    pub fn with_workspace_parent(mut self, parent: impl Into<PathBuf>) -> Self {
        self.workspace_parent = Some(parent.into());
        self
    }

    #[must_use]
    pub const fn toolchain(&self) -> &T {
        &self.toolchain
    }

    /// Compile `source` into a standalone executable.
    pub async fn build(&self, source: &str) -> Result<CompiledArtifact> {
        let workspace = match &self.workspace_parent {
            Some(parent) => Workspace::create_in(parent)?,
            None => Workspace::create()?,
        };
        let unit = workspace.path();
        let spinner = StepSpinner::new(self.show_progress);

        let source_file = self.toolchain.source_file(unit);
        if let Some(parent) = source_file.parent() {
            ensure_dir(parent)?;
        }
        std::fs::write(&source_file, source).with_context(|| {
            format!("Failed to write specialized source to {}", source_file.display())
        })?;
        tracing::debug!(
            target: "build",
            "Wrote {} bytes of specialized source to {}",
            source.len(),
            source_file.display()
        );

        let start = std::time::Instant::now();

        self.announce(&spinner, ToolchainStep::InitUnit);
        self.toolchain.init_unit(unit).await?;

        self.announce(&spinner, ToolchainStep::ResolveDependency);
        self.toolchain.resolve_dependency(unit, &self.pin).await?;

        self.announce(&spinner, ToolchainStep::Tidy);
        self.toolchain.tidy(unit).await?;

        self.announce(&spinner, ToolchainStep::Compile);
        let binary = self.toolchain.compile(unit).await?;

        let artifact = CompiledArtifact::capture(&binary)?;
        spinner.finish_and_clear();
        tracing::debug!(
            target: "build::perf",
            "Built with {} in {:.2}s",
            self.toolchain.name(),
            start.elapsed().as_secs_f64()
        );

        Ok(artifact)
    }

    fn announce(&self, spinner: &StepSpinner, step: ToolchainStep) {
        tracing::debug!(target: "build", "{} ({})", step.progress_message(), self.toolchain.name());
        spinner.set_message(step.progress_message());
    }
}
