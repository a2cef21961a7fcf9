//! Toolchain abstraction used by the build orchestrator
//!
//! Building a specialized template takes four steps, always run in this order:
//!
//! 1. [`ToolchainStep::InitUnit`]: create an independent build unit
//! 2. [`ToolchainStep::ResolveDependency`]: add the template's single pinned dependency
//! 3. [`ToolchainStep::Tidy`]: settle the dependency graph
//! 4. [`ToolchainStep::Compile`]: produce the executable
//!
//! [`Toolchain`] is the seam between the orchestrator and the external
//! compiler. [`CargoToolchain`] drives `cargo`; tests substitute a fake that
//! never spawns a process.

pub mod cargo;
pub mod command_builder;

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;

pub use cargo::CargoToolchain;
pub use command_builder::{ToolchainCommand, ToolchainOutput};

/// One step of building the specialized template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolchainStep {
    InitUnit,
    ResolveDependency,
    Tidy,
    Compile,
}

impl ToolchainStep {
    /// All steps in execution order.
    pub const ALL: [Self; 4] = [Self::InitUnit, Self::ResolveDependency, Self::Tidy, Self::Compile];

    /// Progress message shown while the step runs.
    #[must_use]
    pub const fn progress_message(&self) -> &'static str {
        match self {
            Self::InitUnit => "Initializing build unit",
            Self::ResolveDependency => "Adding template dependency",
            Self::Tidy => "Resolving dependency graph",
            Self::Compile => "Compiling agent",
        }
    }
}

impl fmt::Display for ToolchainStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitUnit => write!(f, "Build unit initialization"),
            Self::ResolveDependency => write!(f, "Dependency resolution"),
            Self::Tidy => write!(f, "Dependency tidy"),
            Self::Compile => write!(f, "Compilation"),
        }
    }
}

/// An exact dependency requirement of the template program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyPin {
    pub name: &'static str,
    /// Exact version requirement, including the `=` operator
    pub version: &'static str,
    pub features: &'static [&'static str],
}

impl DependencyPin {
    /// The HTTP client the bundled template talks to the model API with.
    pub const TEMPLATE: Self = Self {
        name: "ureq",
        version: "=2.10.1",
        features: &["json"],
    };

    /// `name@version`, as understood by `cargo add`.
    #[must_use]
    pub fn spec(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

impl fmt::Display for DependencyPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)?;
        if !self.features.is_empty() {
            write!(f, " (features: {})", self.features.join(", "))?;
        }
        Ok(())
    }
}

/// An external compiler able to turn a single source file into an executable.
///
/// Every method receives the root of the build unit, which lives inside a
/// workspace owned by the caller. Failures should be reported as
/// [`AgenticcError::ToolchainStepFailed`](crate::core::AgenticcError::ToolchainStepFailed)
/// carrying the toolchain's diagnostics verbatim.
#[allow(async_fn_in_trait)]
pub trait Toolchain {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Where the specialized source must be written inside `unit`.
    fn source_file(&self, unit: &Path) -> PathBuf;

    async fn init_unit(&self, unit: &Path) -> Result<()>;

    async fn resolve_dependency(&self, unit: &Path, pin: &DependencyPin) -> Result<()>;

    async fn tidy(&self, unit: &Path) -> Result<()>;

    /// Compile the unit and return the path of the produced executable.
    async fn compile(&self, unit: &Path) -> Result<PathBuf>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_pin() {
        let pin = DependencyPin::TEMPLATE;
        assert_eq!(pin.spec(), "ureq@=2.10.1");
        assert_eq!(pin.to_string(), "ureq =2.10.1 (features: json)");
    }

    #[test]
    fn test_steps_in_order() {
        assert_eq!(ToolchainStep::ALL[0], ToolchainStep::InitUnit);
        assert_eq!(ToolchainStep::ALL[3], ToolchainStep::Compile);
        assert_eq!(ToolchainStep::Compile.to_string(), "Compilation");
    }
}
