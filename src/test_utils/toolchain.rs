//! A toolchain double that never spawns a process.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::core::AgenticcError;
use crate::test_utils::template_binary;
use crate::toolchain::{DependencyPin, Toolchain, ToolchainStep};

/// Leading bytes of the image written by [`FakeToolchain::emitting_regions`].
pub const FAKE_IMAGE_HEADER: &[u8] = b"\x7fELF\x02\x01\x01\0";

#[derive(Debug, Default)]
struct Record {
    steps: Vec<ToolchainStep>,
    pins: Vec<DependencyPin>,
    units: Vec<PathBuf>,
    compiled_sources: Vec<String>,
}

/// Records every step it is asked to run.
///
/// `compile` copies the source it finds in the unit to `<unit>/agent`, so the
/// "compiled binary" is the specialized source itself. With
/// [`FakeToolchain::emitting_regions`] the output is instead
/// [`FAKE_IMAGE_HEADER`] followed by both reserved marker regions. Like a real
/// build, the markers appear only inside those regions; the source is still
/// recorded in [`FakeToolchain::compiled_sources`].
#[derive(Debug, Default)]
pub struct FakeToolchain {
    record: Mutex<Record>,
    failure: Option<(ToolchainStep, String)>,
    emit_regions: bool,
}

impl FakeToolchain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail `step` with `diagnostics`, as if the toolchain printed them.
    #[must_use]
    pub fn failing_at(mut self, step: ToolchainStep, diagnostics: impl Into<String>) -> Self {
        self.failure = Some((step, diagnostics.into()));
        self
    }

    #[must_use]
    pub fn emitting_regions(mut self) -> Self {
        self.emit_regions = true;
        self
    }

    pub fn steps(&self) -> Vec<ToolchainStep> {
        self.lock().steps.clone()
    }

    pub fn pins(&self) -> Vec<DependencyPin> {
        self.lock().pins.clone()
    }

    /// Build unit roots seen by `init_unit`.
    pub fn units(&self) -> Vec<PathBuf> {
        self.lock().units.clone()
    }

    pub fn compiled_sources(&self) -> Vec<String> {
        self.lock().compiled_sources.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Record> {
        self.record.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn run(&self, step: ToolchainStep) -> Result<()> {
        self.lock().steps.push(step);
        match &self.failure {
            Some((failing, diagnostics)) if *failing == step => {
                Err(AgenticcError::ToolchainStepFailed {
                    step,
                    diagnostics: diagnostics.clone(),
                }
                .into())
            }
            _ => Ok(()),
        }
    }
}

impl Toolchain for FakeToolchain {
    fn name(&self) -> &str {
        "fake"
    }

    fn source_file(&self, unit: &Path) -> PathBuf {
        unit.join("src").join("main.rs")
    }

    async fn init_unit(&self, unit: &Path) -> Result<()> {
        self.lock().units.push(unit.to_path_buf());
        self.run(ToolchainStep::InitUnit)
    }

    async fn resolve_dependency(&self, _unit: &Path, pin: &DependencyPin) -> Result<()> {
        self.lock().pins.push(*pin);
        self.run(ToolchainStep::ResolveDependency)
    }

    async fn tidy(&self, _unit: &Path) -> Result<()> {
        self.run(ToolchainStep::Tidy)
    }

    async fn compile(&self, unit: &Path) -> Result<PathBuf> {
        self.run(ToolchainStep::Compile)?;

        let source = std::fs::read_to_string(self.source_file(unit))?;
        let output = unit.join("agent");
        if self.emit_regions {
            std::fs::write(&output, template_binary(FAKE_IMAGE_HEADER))?;
        } else {
            std::fs::write(&output, &source)?;
        }
        self.lock().compiled_sources.push(source);
        Ok(output)
    }
}
