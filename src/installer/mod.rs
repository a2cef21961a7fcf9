//! Installing compiled artifacts at the output path
//!
//! Both strategies end here: the source strategy hands over a
//! [`CompiledArtifact`] produced by the toolchain, the binary strategy hands
//! over the patched bytes directly. Installation:
//!
//! 1. Writes the bytes next to the output path and renames them into place,
//!    replacing any existing file without confirmation
//! 2. Marks the file executable (`0o755`) on Unix
//! 3. Records size and SHA-256 checksum of what was written
//!
//! The output path is never touched before a complete binary exists.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::constants::{BINARY_TEMP_PREFIX, EXECUTABLE_MODE};
use crate::core::AgenticcError;
use crate::utils::fs::{atomic_write, set_mode, sha256_hex};

/// A compiled binary held in a temporary file until it is installed.
///
/// The temporary file is deleted when the artifact is dropped.
#[derive(Debug)]
pub struct CompiledArtifact {
    file: NamedTempFile,
}

impl CompiledArtifact {
    /// Copy the toolchain's output at `binary` into a fresh temporary file.
    pub fn capture(binary: &Path) -> Result<Self> {
        let file = tempfile::Builder::new()
            .prefix(BINARY_TEMP_PREFIX)
            .tempfile()
            .context("Failed to allocate temporary file for compiled binary")?;
        std::fs::copy(binary, file.path()).with_context(|| {
            format!("Failed to copy compiled binary from {}", binary.display())
        })?;
        Ok(Self {
            file,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn read(&self) -> Result<Vec<u8>> {
        std::fs::read(self.path())
            .with_context(|| format!("Failed to read compiled binary {}", self.path().display()))
    }
}

/// What ended up at the output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledArtifact {
    pub path: PathBuf,
    pub size: u64,
    /// `sha256:<hex>`
    pub checksum: String,
}

/// Writes artifacts to one output path.
#[derive(Debug, Clone)]
pub struct ArtifactInstaller {
    output: PathBuf,
}

impl ArtifactInstaller {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
        }
    }

    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Install a compiled artifact and release its temporary file.
    pub fn install(&self, artifact: CompiledArtifact) -> Result<InstalledArtifact> {
        let bytes = artifact.read()?;
        let installed = self.install_bytes(&bytes)?;
        drop(artifact);
        Ok(installed)
    }

    /// Install an in-memory binary.
    pub fn install_bytes(&self, bytes: &[u8]) -> Result<InstalledArtifact> {
        let fs_error = |operation: &str, e: anyhow::Error| AgenticcError::FileSystemError {
            operation: operation.to_string(),
            path: self.output.display().to_string(),
            reason: format!("{e:#}"),
        };

        atomic_write(&self.output, bytes).map_err(|e| fs_error("write output binary", e))?;
        set_mode(&self.output, EXECUTABLE_MODE)
            .map_err(|e| fs_error("set executable permissions", e))?;

        let installed = InstalledArtifact {
            path: self.output.clone(),
            size: bytes.len() as u64,
            checksum: format!("sha256:{}", sha256_hex(bytes)),
        };
        tracing::debug!(
            target: "installer",
            "Installed {} ({} bytes, {})",
            installed.path.display(),
            installed.size,
            installed.checksum
        );
        Ok(installed)
    }
}
