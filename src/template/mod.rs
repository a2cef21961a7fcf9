//! Template handling: resolution, slot location and source specialization
//!
//! A template is the source of the host program that receives the injected
//! values. It declares two slots, one for the program content and one for the
//! model label:
//!
//! ```text
//! let embedded_code: &str = &"X".repeat(CODE_REGION_LEN);
//! let model_name: &str = &"Y".repeat(MODEL_REGION_LEN);
//! ```
//!
//! - [`resolver`] finds the template text (bundled copy first, then fallbacks)
//! - [`slots`] finds the two slot lines
//! - [`patcher`] rewrites them into string literal assignments

pub mod patcher;
pub mod resolver;
pub mod slots;

use std::fmt;
use std::path::PathBuf;

pub use patcher::{SlotFill, SlotPolicy, SpecializedSource, specialize, string_literal};
pub use resolver::TemplateResolver;
pub use slots::{SlotKind, SlotLocation, SlotMap, SlotRule, locate_slots};

/// Template source compiled into the agenticc binary.
pub const BUNDLED_TEMPLATE: &str = include_str!("../../templates/agent_main.rs");

/// Where a template's text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateOrigin {
    /// The copy compiled into this binary
    Bundled,
    /// An explicitly configured path
    Override(PathBuf),
    /// One of the fallback search paths
    Candidate(PathBuf),
}

impl fmt::Display for TemplateOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bundled => write!(f, "bundled template"),
            Self::Override(path) | Self::Candidate(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Immutable template source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    text: String,
    origin: TemplateOrigin,
}

impl Template {
    pub fn new(text: impl Into<String>, origin: TemplateOrigin) -> Self {
        Self {
            text: text.into(),
            origin,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn origin(&self) -> &TemplateOrigin {
        &self.origin
    }
}
