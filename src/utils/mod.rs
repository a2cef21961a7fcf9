//! Utility modules shared by the pipeline stages.

pub mod fs;
pub mod platform;
pub mod progress;

pub use fs::{atomic_write, ensure_dir, set_mode, sha256_hex};
pub use platform::{get_cargo_command, get_home_dir, is_windows, resolve_path};
pub use progress::StepSpinner;
