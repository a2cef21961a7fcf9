//! The end-to-end pipeline for one build request
//!
//! Source strategy:
//!
//! ```text
//! resolve template → specialize slots → build → install
//! ```
//!
//! Binary strategy:
//!
//! ```text
//! base binary (--base-binary, or the unspecialized template built) → patch regions → install
//! ```
//!
//! The template is resolved before any workspace exists, and the output path
//! is written only after a complete binary is available.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::binary::BinaryPatcher;
use crate::build::BuildOrchestrator;
use crate::core::{AgenticcError, BuildRequest, Strategy};
use crate::installer::{ArtifactInstaller, InstalledArtifact};
use crate::template::{SlotPolicy, Template, TemplateResolver, specialize};
use crate::toolchain::Toolchain;

/// Settings that shape one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub strategy: Strategy,
    /// Prebuilt template binary for the binary strategy
    pub base_binary: Option<PathBuf>,
    pub slot_policy: SlotPolicy,
    /// Print the status lines on stdout
    pub print_status: bool,
}

/// Runs build requests against one template resolver and toolchain.
#[derive(Debug)]
pub struct Pipeline<T: Toolchain> {
    resolver: TemplateResolver,
    orchestrator: BuildOrchestrator<T>,
    patcher: BinaryPatcher,
    options: PipelineOptions,
}

impl<T: Toolchain> Pipeline<T> {
    pub fn new(
        resolver: TemplateResolver,
        orchestrator: BuildOrchestrator<T>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            resolver,
            orchestrator,
            patcher: BinaryPatcher::new(),
            options,
        }
    }

    #[must_use]
    pub const fn orchestrator(&self) -> &BuildOrchestrator<T> {
        &self.orchestrator
    }

    #[must_use]
    pub const fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Produce the executable described by `request`.
    pub async fn run(&self, request: &BuildRequest) -> Result<InstalledArtifact> {
        self.status(format!("🤖 Agentically compiling {}", request.input_path().display()));
        tracing::info!(
            target: "pipeline",
            "Building {} with {:?} strategy (model: {})",
            request.input_path().display(),
            self.options.strategy,
            request.label()
        );

        let installer = ArtifactInstaller::new(request.output_path());
        let installed = match self.options.strategy {
            Strategy::Source => self.run_source(request, &installer).await?,
            Strategy::Binary => self.run_binary(request, &installer).await?,
        };

        self.status(format!(
            "✅ Successfully agentically compiled {} — {}",
            request.input_path().display(),
            installed.path.display()
        ));
        Ok(installed)
    }

    async fn run_source(
        &self,
        request: &BuildRequest,
        installer: &ArtifactInstaller,
    ) -> Result<InstalledArtifact> {
        let template = self.resolve_template()?;
        let content = request.content_text()?;
        let source = specialize(&template, content, request.label(), self.options.slot_policy)?;
        if source.filled.all() {
            self.status("🔗 Linking agents...");
        } else {
            tracing::debug!(
                target: "pipeline",
                "Building partially specialized source (content: {}, label: {})",
                source.filled.content,
                source.filled.label
            );
        }

        let artifact = self
            .orchestrator
            .build(&source.text)
            .await
            .context("Failed to build specialized template")?;
        installer.install(artifact)
    }

    async fn run_binary(
        &self,
        request: &BuildRequest,
        installer: &ArtifactInstaller,
    ) -> Result<InstalledArtifact> {
        let base = match &self.options.base_binary {
            Some(path) => {
                tracing::debug!(target: "pipeline", "Using base binary {}", path.display());
                std::fs::read(path).map_err(|e| AgenticcError::FileSystemError {
                    operation: "read base binary".to_string(),
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?
            }
            None => {
                let template = self.resolve_template()?;
                tracing::debug!(
                    target: "pipeline",
                    "No base binary given, building unspecialized template from {}",
                    template.origin()
                );
                let artifact = self
                    .orchestrator
                    .build(template.text())
                    .await
                    .context("Failed to build base template binary")?;
                artifact.read()?
            }
        };

        self.status("🔗 Linking agents...");
        let patched = self.patcher.patch(&base, request.content(), request.label().as_bytes())?;
        installer.install_bytes(&patched.bytes)
    }

    fn resolve_template(&self) -> Result<Template> {
        let template = self.resolver.resolve()?;
        tracing::debug!(target: "pipeline", "Template resolved from {}", template.origin());
        Ok(template)
    }

    fn status(&self, line: impl AsRef<str>) {
        if self.options.print_status {
            println!("{}", line.as_ref());
        }
    }
}
