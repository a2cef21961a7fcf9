//! Global constants used throughout the agenticc codebase.
//!
//! Region sizes and markers are part of the contract with the template program,
//! and the dependency pin is part of the contract with the toolchain. None of
//! these are user-configurable.

/// Size of the content region reserved in a compiled template (32 KiB).
pub const CONTENT_REGION_LEN: usize = 32 * 1024;

/// Size of the label region reserved in a compiled template.
pub const LABEL_REGION_LEN: usize = 128;

/// Marker that starts the content region of a compiled template.
pub const CONTENT_MARKER: &[u8] = b"AGENTICC_CODE_MARKER_START_";

/// Marker that starts the label region of a compiled template.
pub const LABEL_MARKER: &[u8] = b"AGENTICC_MODEL_MARKER_";

/// Slot protocol version understood by the placeholder locator.
pub const SLOT_PROTOCOL_VERSION: u32 = 1;

/// Model identifier used when none is given.
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Package name of the build unit created for each specialized template.
pub const BUILD_UNIT_NAME: &str = "agenticc-agent";

/// File name of the bundled template source.
pub const TEMPLATE_FILE_NAME: &str = "agent_main.rs";

/// Prefix of the per-build workspace directory.
pub const WORKSPACE_PREFIX: &str = "workspace";

/// Prefix of the temporary file holding a compiled binary.
pub const BINARY_TEMP_PREFIX: &str = "agenticc-binary-";

/// Mode given to installed artifacts.
pub const EXECUTABLE_MODE: u32 = 0o755;
