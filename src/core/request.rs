//! The immutable description of one build.

use std::path::{Path, PathBuf};

use crate::core::AgenticcError;

/// How the requested values reach the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Strategy {
    /// Patch the template source, then compile it
    #[default]
    Source,
    /// Patch the marker regions of an already compiled template
    Binary,
}

/// One build request: what to embed and where to put the result.
///
/// Constructed once from validated inputs; there are no setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    input_path: PathBuf,
    content: Vec<u8>,
    label: String,
    output_path: PathBuf,
}

impl BuildRequest {
    /// Create a request from already-read content.
    pub fn new(
        input_path: impl Into<PathBuf>,
        content: impl Into<Vec<u8>>,
        label: impl Into<String>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            content: content.into(),
            label: label.into(),
            output_path: output_path.into(),
        }
    }

    /// Read `input_path` fully into memory and build a request from it.
    pub fn from_input_file(
        input_path: &Path,
        label: impl Into<String>,
        output_path: impl Into<PathBuf>,
    ) -> Result<Self, AgenticcError> {
        let content = std::fs::read(input_path).map_err(|e| AgenticcError::FileSystemError {
            operation: "read input".to_string(),
            path: input_path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(input_path, content, label, output_path))
    }

    #[must_use]
    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    /// Raw content bytes, as read from the input.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Content as text, for embedding as a string literal.
    pub fn content_text(&self) -> Result<&str, AgenticcError> {
        std::str::from_utf8(&self.content).map_err(|_| AgenticcError::InvalidContentEncoding {
            path: self.input_path.display().to_string(),
        })
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

/// Derive the default output path from the input path.
///
/// A trailing `.c` is stripped (`prog.c` becomes `prog`). Any other input gets
/// `.out` appended so the input file is never overwritten.
#[must_use]
pub fn derive_output_path(input: &Path) -> PathBuf {
    if input.extension().is_some_and(|ext| ext == "c") {
        return input.with_extension("");
    }
    let mut output = input.as_os_str().to_os_string();
    output.push(".out");
    PathBuf::from(output)
}
