//! Source specialization.
//!
//! Each located slot line is replaced, keeping its indentation, by an
//! assignment of the value as an escaped string literal. The template text is
//! never modified; a new [`SpecializedSource`] is produced instead.

use crate::core::AgenticcError;
use crate::template::slots::{SlotKind, SlotMap, SlotRule, locate_slots};
use crate::template::Template;

/// What to do when a slot cannot be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotPolicy {
    /// Warn and continue; the compiler reports the real problem later
    #[default]
    WarnAndContinue,
    /// Fail with [`AgenticcError::MissingSlot`]
    Strict,
}

/// Which slots received a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlotFill {
    pub content: bool,
    pub label: bool,
}

impl SlotFill {
    #[must_use]
    pub const fn all(&self) -> bool {
        self.content && self.label
    }
}

/// Template text with the slot values spliced in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecializedSource {
    pub text: String,
    pub filled: SlotFill,
}

/// Render `value` as a Rust string literal that evaluates to exactly `value`.
///
/// Quotes, backslashes and `\t`/`\r`/`\n` get their short escapes; every other
/// control or non-ASCII character becomes `\u{..}`.
#[must_use]
pub fn string_literal(value: &str) -> String {
    format!("\"{}\"", value.escape_default())
}

/// The line that replaces a slot declaration.
#[must_use]
pub fn slot_assignment(rule: &SlotRule, value: &str) -> String {
    format!("let {}: &str = {};", rule.binding, string_literal(value))
}

/// Splice `content` and `label` into the template's slots.
///
/// Missing slots are logged as warnings under [`SlotPolicy::WarnAndContinue`]
/// and the text is returned with whatever could be filled.
pub fn specialize(
    template: &Template,
    content: &str,
    label: &str,
    policy: SlotPolicy,
) -> Result<SpecializedSource, AgenticcError> {
    let slots = locate_slots(template.text())?;

    for kind in slots.missing() {
        match policy {
            SlotPolicy::Strict => {
                return Err(AgenticcError::MissingSlot {
                    slot: kind,
                });
            }
            SlotPolicy::WarnAndContinue => {
                tracing::warn!(
                    target: "template",
                    "Template {} slot not found in {}; continuing without it",
                    kind,
                    template.origin()
                );
            }
        }
    }

    Ok(apply(template.text(), &slots, content, label))
}

fn apply(text: &str, slots: &SlotMap, content: &str, label: &str) -> SpecializedSource {
    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    let mut filled = SlotFill::default();

    for (kind, value) in [(SlotKind::Content, content), (SlotKind::Label, label)] {
        let Some(location) = slots.get(kind) else {
            continue;
        };
        let line = &mut lines[location.line];
        // Keep CRLF templates consistent
        let line_ending = if line.ends_with('\r') { "\r" } else { "" };
        *line = format!(
            "{}{}{}",
            location.indent,
            slot_assignment(&SlotRule::for_kind(kind), value),
            line_ending
        );
        match kind {
            SlotKind::Content => filled.content = true,
            SlotKind::Label => filled.label = true,
        }
    }

    SpecializedSource {
        text: lines.join("\n"),
        filled,
    }
}
