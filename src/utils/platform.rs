//! Platform-specific helpers
//!
//! Small wrappers over the differences between Windows and Unix-like systems
//! that matter to agenticc: executable names, the home directory, and
//! expansion of user-supplied paths.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Checks if the current platform is Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Gets the home directory path for the current user.
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        let platform_help = if is_windows() {
            "On Windows: Check that the USERPROFILE environment variable is set"
        } else {
            "On Unix/Linux: Check that the HOME environment variable is set"
        };
        anyhow::anyhow!("Could not determine home directory.\n\n{platform_help}")
    })
}

/// Returns the cargo executable name for the current platform.
#[must_use]
pub const fn get_cargo_command() -> &'static str {
    if is_windows() {
        "cargo.exe"
    } else {
        "cargo"
    }
}

/// File name of an executable built from a package called `name`.
#[must_use]
pub fn executable_name(name: &str) -> String {
    format!("{name}{}", std::env::consts::EXE_SUFFIX)
}

/// Expand `~` and environment variables in a user-supplied path.
///
/// ```rust,no_run
/// use agenticc::utils::platform::resolve_path;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = resolve_path("~/.agenticc/config.toml")?;
/// let template = resolve_path("$HOME/templates/agent_main.rs")?;
/// # Ok(())
/// # }
/// ```
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path)
        .with_context(|| format!("Failed to expand path: {path}"))?;
    Ok(PathBuf::from(expanded.as_ref()))
}
