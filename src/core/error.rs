//! Error handling for agenticc
//!
//! This module provides the error types and user-friendly error reporting for the
//! agenticc pipeline. As elsewhere in the code base, the design rests on two pieces:
//! 1. **Strongly-typed errors** ([`AgenticcError`]) for precise handling in code
//! 2. **User-friendly messages** ([`ErrorContext`]) with suggestions for CLI users
//!
//! # Error Categories
//!
//! - **Resolution**: [`AgenticcError::TemplateNotFound`]
//! - **Slots**: [`AgenticcError::MissingSlot`], [`AgenticcError::UnsupportedSlotProtocol`],
//!   [`AgenticcError::InvalidContentEncoding`]
//! - **Markers**: [`AgenticcError::MarkerNotFound`], [`AgenticcError::RegionOverflow`]
//! - **Toolchain**: [`AgenticcError::ToolchainNotFound`], [`AgenticcError::ToolchainStepFailed`]
//! - **File System**: [`AgenticcError::FileSystemError`], [`AgenticcError::IoError`]
//! - **Configuration**: [`AgenticcError::ConfigError`]
//!
//! Slot and size-limit problems are warnings unless a stricter policy is requested;
//! everything else aborts the pipeline.
//!
//! # Examples
//!
//! ```rust,no_run
//! use agenticc::core::{AgenticcError, ErrorContext, user_friendly_error};
//!
//! let error = AgenticcError::ToolchainNotFound {
//!     program: "cargo".to_string(),
//! };
//! let context = user_friendly_error(anyhow::Error::from(error));
//! context.display(); // Shows colored error with suggestions
//!
//! let manual = ErrorContext::new(AgenticcError::Other {
//!     message: "something broke".to_string(),
//! })
//! .with_suggestion("Re-run with --verbose for more information");
//! println!("{manual}");
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::binary::RegionKind;
use crate::template::SlotKind;
use crate::toolchain::ToolchainStep;

/// The main error type for agenticc operations
///
/// Each variant describes one failure mode of the build pipeline and carries the
/// values needed to explain it to the user.
///
/// # Examples
///
/// ```rust,no_run
/// use agenticc::core::AgenticcError;
///
/// fn describe(error: &AgenticcError) -> &'static str {
///     match error {
///         AgenticcError::TemplateNotFound { .. } => "no template",
///         AgenticcError::ToolchainStepFailed { .. } => "build failed",
///         _ => "other",
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum AgenticcError {
    /// The template source could not be obtained from any location
    ///
    /// Raised only when the bundled copy is empty and every candidate path is
    /// unreadable, or when an explicit override path cannot be read.
    #[error("Template source not found (searched: {})", .searched.join(", "))]
    TemplateNotFound {
        /// Every location that was tried, in order
        searched: Vec<String>,
    },

    /// A template slot was not found while specializing the source
    ///
    /// Only returned under the strict slot policy; by default a missing slot
    /// is reported as a warning and the pipeline continues.
    #[error("Template {slot} slot not found")]
    MissingSlot {
        /// Which slot is missing
        slot: SlotKind,
    },

    /// The template declares a slot protocol this version does not understand
    #[error("Unsupported template slot protocol version: v{version}")]
    UnsupportedSlotProtocol {
        /// Version declared by the template header
        version: u32,
    },

    /// The input cannot be embedded as a string literal
    #[error("Input file '{path}' is not valid UTF-8")]
    InvalidContentEncoding {
        /// Path of the offending input file
        path: String,
    },

    /// A marker was not present in the base binary
    #[error("Could not find {region} marker in base binary")]
    MarkerNotFound {
        /// Region whose marker is missing
        region: RegionKind,
    },

    /// A marker region would extend beyond the end of the binary
    #[error(
        "{region} placeholder area extends beyond binary (offset {offset} + {region_len} > {buffer_len})"
    )]
    RegionOverflow {
        /// Region that overflows
        region: RegionKind,
        /// Offset of the marker
        offset: usize,
        /// Fixed size of the region
        region_len: usize,
        /// Size of the whole binary
        buffer_len: usize,
    },

    /// The toolchain executable could not be located
    #[error("Toolchain executable '{program}' not found in PATH")]
    ToolchainNotFound {
        /// Program that was looked up
        program: String,
    },

    /// A toolchain step exited unsuccessfully
    ///
    /// `diagnostics` holds the captured diagnostic stream verbatim.
    #[error("{step} failed:\n{diagnostics}")]
    ToolchainStepFailed {
        /// The step that failed
        step: ToolchainStep,
        /// Captured toolchain output
        diagnostics: String,
    },

    /// A filesystem operation failed
    #[error("File system error: {operation} '{path}': {reason}")]
    FileSystemError {
        /// What was being done (e.g. "read input", "write output")
        operation: String,
        /// Path involved
        path: String,
        /// Underlying reason
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic error with message
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for AgenticcError {
    fn clone(&self) -> Self {
        match self {
            Self::TemplateNotFound {
                searched,
            } => Self::TemplateNotFound {
                searched: searched.clone(),
            },
            Self::MissingSlot {
                slot,
            } => Self::MissingSlot {
                slot: *slot,
            },
            Self::UnsupportedSlotProtocol {
                version,
            } => Self::UnsupportedSlotProtocol {
                version: *version,
            },
            Self::InvalidContentEncoding {
                path,
            } => Self::InvalidContentEncoding {
                path: path.clone(),
            },
            Self::MarkerNotFound {
                region,
            } => Self::MarkerNotFound {
                region: *region,
            },
            Self::RegionOverflow {
                region,
                offset,
                region_len,
                buffer_len,
            } => Self::RegionOverflow {
                region: *region,
                offset: *offset,
                region_len: *region_len,
                buffer_len: *buffer_len,
            },
            Self::ToolchainNotFound {
                program,
            } => Self::ToolchainNotFound {
                program: program.clone(),
            },
            Self::ToolchainStepFailed {
                step,
                diagnostics,
            } => Self::ToolchainStepFailed {
                step: *step,
                diagnostics: diagnostics.clone(),
            },
            Self::FileSystemError {
                operation,
                path,
                reason,
            } => Self::FileSystemError {
                operation: operation.clone(),
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            // io::Error is not Clone; keep the kind and message
            Self::IoError(e) => Self::IoError(std::io::Error::new(e.kind(), e.to_string())),
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that adds user-friendly details and suggestions
///
/// Printed by the CLI on fatal errors: the error in red, details in yellow and
/// the suggestion in green.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: AgenticcError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: AgenticcError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`AgenticcError`] anywhere in the chain (so errors wrapped with
/// `anyhow::Context` keep their specific suggestions) and common
/// [`std::io::Error`] kinds. Anything else is reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(agenticc_error) = error.chain().find_map(|e| e.downcast_ref::<AgenticcError>()) {
        let mut context = create_error_context(agenticc_error.clone());
        let outer = error.to_string();
        if outer != agenticc_error.to_string() {
            context.details = Some(match context.details.take() {
                Some(details) => format!("{outer}\n{details}"),
                None => outer,
            });
        }
        return context;
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(AgenticcError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                    reason: io_error.to_string(),
                })
                .with_suggestion("Check file ownership and permissions of the input and output paths");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(AgenticcError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                    reason: io_error.to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(AgenticcError::Other {
        message,
    })
}

/// Map each [`AgenticcError`] variant to an [`ErrorContext`] with suggestions.
fn create_error_context(error: AgenticcError) -> ErrorContext {
    let (suggestion, details): (Option<String>, Option<&str>) = match &error {
        AgenticcError::TemplateNotFound { .. } => (
            Some("Pass --template <path> or set AGENTICC_TEMPLATE to a template source file".to_string()),
            Some("The bundled template is empty and none of the fallback locations could be read"),
        ),
        AgenticcError::MissingSlot { slot } => (
            Some(format!(
                "Make sure the template declares the {slot} slot, or drop --strict-slots to continue with a warning"
            )),
            Some("Slots are matched line by line: binding name, fill helper and placeholder token on one line"),
        ),
        AgenticcError::UnsupportedSlotProtocol { .. } => (
            Some("Use a template written for slot protocol v1, or upgrade agenticc".to_string()),
            None,
        ),
        AgenticcError::InvalidContentEncoding { .. } => (
            Some("Convert the input to UTF-8, or use --strategy binary which embeds raw bytes".to_string()),
            None,
        ),
        AgenticcError::MarkerNotFound { .. } => (
            Some("Use a base binary built from the agenticc template, or omit --base-binary to build one".to_string()),
            Some("The binary strategy needs the template's reserved marker regions to be present in the compiled file"),
        ),
        AgenticcError::RegionOverflow { .. } => (
            Some("Rebuild the base binary from the agenticc template so the full region is reserved".to_string()),
            Some("Patching would write past the end of the binary, so nothing was written"),
        ),
        AgenticcError::ToolchainNotFound { program } => (
            Some(format!(
                "Install the Rust toolchain from https://rustup.rs/ or point the `cargo` config key at a working '{program}'"
            )),
            Some("agenticc drives cargo to build the specialized template"),
        ),
        AgenticcError::ToolchainStepFailed { step, .. } => {
            let suggestion = match step {
                ToolchainStep::ResolveDependency | ToolchainStep::Tidy => {
                    "Check your network connection and crates.io access; the template's pinned dependency must be downloadable"
                }
                ToolchainStep::Compile => {
                    "Check the compiler output above; a missing template slot usually shows up here"
                }
                ToolchainStep::InitUnit => "Check that cargo works and the temp directory is writable",
            };
            (Some(suggestion.to_string()), None)
        }
        AgenticcError::FileSystemError { .. } | AgenticcError::IoError(_) => (
            Some("Check that the path exists and you have permission to read or write it".to_string()),
            None,
        ),
        AgenticcError::ConfigError { .. } => (
            Some("Check the TOML syntax of your agenticc config file (~/.agenticc/config.toml)".to_string()),
            None,
        ),
        AgenticcError::Other { .. } => (None, None),
    };

    let mut context = ErrorContext::new(error);
    context.suggestion = suggestion;
    context.details = details.map(str::to_string);
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_error_display() {
        let err = AgenticcError::TemplateNotFound {
            searched: vec!["bundled".to_string(), "templates/agent_main.rs".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Template source not found (searched: bundled, templates/agent_main.rs)"
        );

        let err = AgenticcError::MarkerNotFound {
            region: RegionKind::Content,
        };
        assert_eq!(err.to_string(), "Could not find content marker in base binary");
    }

    #[test]
    fn test_toolchain_failure_keeps_diagnostics_verbatim() {
        let err = AgenticcError::ToolchainStepFailed {
            step: ToolchainStep::Compile,
            diagnostics: "error[E0425]: cannot find value `x`\n  --> src/main.rs:3:5".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("error[E0425]: cannot find value `x`\n  --> src/main.rs:3:5"));
    }

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext::new(AgenticcError::ToolchainNotFound {
            program: "cargo".to_string(),
        })
        .with_details("details here")
        .with_suggestion("install it");

        let rendered = ctx.to_string();
        assert!(rendered.contains("Toolchain executable 'cargo' not found in PATH"));
        assert!(rendered.contains("Details: details here"));
        assert!(rendered.contains("Suggestion: install it"));
    }

    #[test]
    fn test_user_friendly_error_finds_wrapped_error() {
        let result: anyhow::Result<()> = Err(AgenticcError::MarkerNotFound {
            region: RegionKind::Label,
        })
        .context("Failed to patch base binary");

        let ctx = user_friendly_error(result.unwrap_err());
        assert!(matches!(
            ctx.error,
            AgenticcError::MarkerNotFound {
                region: RegionKind::Label
            }
        ));
        assert!(ctx.suggestion.is_some());
        assert!(ctx.details.unwrap().starts_with("Failed to patch base binary"));
    }

    #[test]
    fn test_user_friendly_error_generic_chain() {
        let err = anyhow::anyhow!("root cause").context("outer layer");
        let ctx = user_friendly_error(err);
        match ctx.error {
            AgenticcError::Other {
                message,
            } => {
                assert!(message.starts_with("outer layer"));
                assert!(message.contains("Caused by:"));
                assert!(message.contains("root cause"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_io_error_clone() {
        let err = AgenticcError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "gone",
        ));
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }
}
