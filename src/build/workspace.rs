//! Ephemeral build workspace with RAII cleanup.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::constants::WORKSPACE_PREFIX;

/// A uniquely named directory under the system temp dir, removed on drop.
///
/// Each build gets its own workspace, so concurrent invocations never share
/// build state. Removal happens whether the build succeeded or not; a failure
/// to remove is logged and otherwise ignored.
///
/// ```rust,no_run
/// use agenticc::build::Workspace;
///
/// # fn example() -> anyhow::Result<()> {
/// let path = {
///     let workspace = Workspace::create()?;
///     std::fs::write(workspace.path().join("main.rs"), "fn main() {}")?;
///     workspace.path().to_path_buf()
/// };
/// assert!(!path.exists());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
}

impl Workspace {
    /// Create a workspace in the system temp dir.
    pub fn create() -> Result<Self> {
        Self::create_in(&std::env::temp_dir())
    }

    /// Create a workspace inside `parent`.
    pub fn create_in(parent: &Path) -> Result<Self> {
        let unique_name = format!("agenticc_{}_{}", WORKSPACE_PREFIX, uuid::Uuid::new_v4());
        let path = parent.join(unique_name);
        std::fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create build workspace: {}", path.display()))?;
        tracing::debug!(target: "build", "Created workspace {}", path.display());
        Ok(Self {
            path,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => tracing::debug!(target: "build", "Removed workspace {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                target: "build",
                "Failed to remove workspace {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}
