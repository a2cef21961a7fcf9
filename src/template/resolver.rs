//! Template source resolution.
//!
//! Lookup order:
//! 1. An explicit override path, if configured. Nothing else is tried then.
//! 2. The bundled copy, when it is not blank.
//! 3. Candidate paths in order; the first readable, non-blank file wins.

use std::path::{Path, PathBuf};

use crate::constants::TEMPLATE_FILE_NAME;
use crate::core::AgenticcError;
use crate::template::{BUNDLED_TEMPLATE, Template, TemplateOrigin};

/// Finds the template source text.
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    override_path: Option<PathBuf>,
    bundled: Option<&'static str>,
    candidates: Vec<PathBuf>,
}

impl Default for TemplateResolver {
    fn default() -> Self {
        Self {
            override_path: None,
            bundled: Some(BUNDLED_TEMPLATE),
            candidates: Self::default_candidates(),
        }
    }
}

impl TemplateResolver {
    /// Resolver with the bundled template and the default candidate paths.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the bundled copy (`None` behaves like an empty bundle).
    #[must_use]
    pub fn with_bundled(mut self, bundled: Option<&'static str>) -> Self {
        self.bundled = bundled;
        self
    }

    #[must_use]
    pub fn with_override(mut self, path: Option<PathBuf>) -> Self {
        self.override_path = path;
        self
    }

    /// Replace the candidate list.
    #[must_use]
    pub fn with_candidates(mut self, candidates: Vec<PathBuf>) -> Self {
        self.candidates = candidates;
        self
    }

    /// Search `paths` before the current candidates.
    #[must_use]
    pub fn with_leading_candidates(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut candidates: Vec<PathBuf> = paths.into_iter().collect();
        candidates.append(&mut self.candidates);
        self.candidates = candidates;
        self
    }

    #[must_use]
    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Fallback locations: the working directory, then next to the executable.
    #[must_use]
    pub fn default_candidates() -> Vec<PathBuf> {
        let mut candidates = vec![PathBuf::from("templates").join(TEMPLATE_FILE_NAME)];

        if let Some(exe_dir) =
            std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            candidates.push(exe_dir.join("..").join("templates").join(TEMPLATE_FILE_NAME));
            candidates.push(exe_dir.join("templates").join(TEMPLATE_FILE_NAME));
        }

        candidates
    }

    /// Return the full template text, or [`AgenticcError::TemplateNotFound`].
    pub fn resolve(&self) -> Result<Template, AgenticcError> {
        if let Some(path) = &self.override_path {
            return match read_template(path) {
                Some(text) => {
                    tracing::debug!(target: "template", "Using template override {}", path.display());
                    Ok(Template::new(text, TemplateOrigin::Override(path.clone())))
                }
                None => Err(AgenticcError::TemplateNotFound {
                    searched: vec![path.display().to_string()],
                }),
            };
        }

        if let Some(bundled) = self.bundled.filter(|text| !text.trim().is_empty()) {
            tracing::debug!(target: "template", "Using bundled template");
            return Ok(Template::new(bundled, TemplateOrigin::Bundled));
        }

        let mut searched = vec!["bundled template".to_string()];
        for path in &self.candidates {
            if let Some(text) = read_template(path) {
                tracing::debug!(target: "template", "Using template {}", path.display());
                return Ok(Template::new(text, TemplateOrigin::Candidate(path.clone())));
            }
            searched.push(path.display().to_string());
        }

        Err(AgenticcError::TemplateNotFound {
            searched,
        })
    }
}

fn read_template(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(text) if !text.trim().is_empty() => Some(text),
        Ok(_) => {
            tracing::debug!(target: "template", "Skipping empty template {}", path.display());
            None
        }
        Err(e) => {
            tracing::trace!(target: "template", "Cannot read {}: {}", path.display(), e);
            None
        }
    }
}
