//! Shared helpers for the integration suite.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub use agenticc::test_utils::{FakeToolchain, init_test_logging, template_binary};

/// A scratch directory with an isolated agenticc environment.
pub struct TestProject {
    pub temp: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn write(&self, name: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// `agenticc` running in this directory, blind to the caller's settings.
    pub fn agenticc(&self) -> Command {
        let mut cmd = Command::cargo_bin("agenticc").unwrap();
        cmd.current_dir(self.path())
            .env("AGENTICC_CONFIG", self.path().join("no-config.toml"))
            .env("NO_COLOR", "1")
            .env_remove("AGENTICC_MODEL")
            .env_remove("AGENTICC_TEMPLATE")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Write a config file and return its path.
    pub fn config(&self, toml: &str) -> PathBuf {
        self.write("agenticc.toml", toml)
    }

    /// A shell script standing in for cargo.
    ///
    /// `build` copies the specialized source to where cargo would put the
    /// binary, so the "executable" is the source that was compiled. Every
    /// invocation is appended to `cargo.log`. With `fail_build`, `build`
    /// prints a compiler error and exits 101.
    #[cfg(unix)]
    pub fn fake_cargo(&self, fail_build: bool) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let log = self.path().join("cargo.log");
        let build = if fail_build {
            "echo 'error[E0308]: mismatched types' >&2; exit 101"
        } else {
            "mkdir -p \"$CARGO_TARGET_DIR/release\" && cp src/main.rs \"$CARGO_TARGET_DIR/release/agenticc-agent\""
        };
        let script = format!(
            "#!/bin/sh\n\
             echo \"$@\" >> '{log}'\n\
             case \"$1\" in\n\
             init) printf '[package]\\nname = \"agenticc-agent\"\\n' > Cargo.toml ;;\n\
             build) {build} ;;\n\
             esac\n",
            log = log.display(),
        );
        let path = self.write("bin/cargo", script);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    pub fn cargo_log(&self) -> Vec<String> {
        fs::read_to_string(self.path().join("cargo.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

/// Offset of the content region in a [`template_binary`] built from `prefix`.
pub fn content_offset(prefix: &[u8]) -> usize {
    prefix.len()
}
