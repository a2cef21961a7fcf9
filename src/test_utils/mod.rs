//! Test utilities shared by unit and integration tests
//!
//! Available to unit tests and, through the `test-utils` feature, to the
//! integration suite:
//!
//! - [`init_test_logging`] for opt-in tracing output in tests
//! - [`FakeToolchain`] to exercise the build orchestrator without cargo
//! - [`template_binary`] to fabricate a compiled-template image

pub mod toolchain;

pub use toolchain::{FAKE_IMAGE_HEADER, FakeToolchain};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::binary::MarkerRegion;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Logs only when `level` is given or `RUST_LOG` is set. Safe to call from
/// every test; only the first call has an effect.
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

/// Bytes shaped like a compiled template: `prefix`, then both reserved
/// regions with their template fill, then a short trailer.
pub fn template_binary(prefix: &[u8]) -> Vec<u8> {
    let mut bytes = prefix.to_vec();
    bytes.extend(MarkerRegion::CONTENT.reserved(b'X'));
    bytes.extend(b"\0rodata\0");
    bytes.extend(MarkerRegion::LABEL.reserved(b'Y'));
    bytes.extend(b"\0trailer");
    bytes
}
