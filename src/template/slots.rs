//! Placeholder location within template source.
//!
//! Slots are found line by line. A line belongs to a slot when its trimmed text
//! contains the slot's binding name, the fill helper and the placeholder token
//! together, which keeps unrelated mentions of any one of them from matching.
//! The first matching line wins; later matches are ignored.
//!
//! Templates may also declare the slot protocol they were written for with a
//! comment such as `// agenticc-slots: v1`.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::constants::SLOT_PROTOCOL_VERSION;
use crate::core::AgenticcError;

/// The two insertion points a template provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// The embedded program text
    Content,
    /// The model identifier
    Label,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Content => write!(f, "content"),
            Self::Label => write!(f, "label"),
        }
    }
}

/// Lexical rule identifying a slot declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRule {
    pub kind: SlotKind,
    /// Name the slot value is bound to
    pub binding: &'static str,
    /// Helper that produces the placeholder filler
    pub fill_helper: &'static str,
    /// Token used only by this slot's filler
    pub token: &'static str,
}

impl SlotRule {
    pub const CONTENT: Self = Self {
        kind: SlotKind::Content,
        binding: "embedded_code",
        fill_helper: ".repeat(",
        token: "\"X\"",
    };

    pub const LABEL: Self = Self {
        kind: SlotKind::Label,
        binding: "model_name",
        fill_helper: ".repeat(",
        token: "\"Y\"",
    };

    /// Rules in the order they are tried against each line.
    pub const ALL: [Self; 2] = [Self::CONTENT, Self::LABEL];

    #[must_use]
    pub const fn for_kind(kind: SlotKind) -> Self {
        match kind {
            SlotKind::Content => Self::CONTENT,
            SlotKind::Label => Self::LABEL,
        }
    }

    /// Whether an already trimmed line declares this slot.
    #[must_use]
    pub fn matches(&self, trimmed: &str) -> bool {
        trimmed.contains(self.binding)
            && trimmed.contains(self.fill_helper)
            && trimmed.contains(self.token)
    }
}

/// Where a slot was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotLocation {
    pub kind: SlotKind,
    /// Zero-based line index
    pub line: usize,
    /// Leading whitespace of the declaration line
    pub indent: String,
}

/// Result of scanning a template for slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotMap {
    /// Protocol version declared by the template, if any
    pub protocol: Option<u32>,
    pub content: Option<SlotLocation>,
    pub label: Option<SlotLocation>,
}

impl SlotMap {
    #[must_use]
    pub const fn get(&self, kind: SlotKind) -> Option<&SlotLocation> {
        match kind {
            SlotKind::Content => self.content.as_ref(),
            SlotKind::Label => self.label.as_ref(),
        }
    }

    /// Slots that were not found, in content-then-label order.
    #[must_use]
    pub fn missing(&self) -> Vec<SlotKind> {
        [SlotKind::Content, SlotKind::Label]
            .into_iter()
            .filter(|kind| self.get(*kind).is_none())
            .collect()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.content.is_some() && self.label.is_some()
    }
}

fn protocol_header() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| {
        Regex::new(r"^//[/!]?\s*agenticc-slots:\s*v(\d+)\s*$").expect("header regex is valid")
    })
}

/// Read the slot protocol version declared by a single trimmed line.
fn declared_protocol(trimmed: &str) -> Option<u32> {
    protocol_header().captures(trimmed).and_then(|caps| caps[1].parse().ok())
}

/// Scan template text for both slots.
///
/// Missing slots are not an error here; callers decide what a missing slot
/// means. A declared protocol version other than the supported one is.
pub fn locate_slots(text: &str) -> Result<SlotMap, AgenticcError> {
    let mut map = SlotMap::default();

    for (index, line) in text.split('\n').enumerate() {
        let trimmed = line.trim();

        if map.protocol.is_none() {
            if let Some(version) = declared_protocol(trimmed) {
                if version != SLOT_PROTOCOL_VERSION {
                    return Err(AgenticcError::UnsupportedSlotProtocol {
                        version,
                    });
                }
                map.protocol = Some(version);
                continue;
            }
        }

        // One line never fills both slots; content is tried first.
        let Some(rule) = SlotRule::ALL
            .iter()
            .find(|rule| map.get(rule.kind).is_none() && rule.matches(trimmed))
        else {
            continue;
        };

        let location = SlotLocation {
            kind: rule.kind,
            line: index,
            indent: line[..line.len() - line.trim_start().len()].to_string(),
        };
        tracing::debug!(
            target: "template",
            "Found {} slot on line {}",
            rule.kind,
            index + 1
        );
        match rule.kind {
            SlotKind::Content => map.content = Some(location),
            SlotKind::Label => map.label = Some(location),
        }

        if map.is_complete() && map.protocol.is_some() {
            break;
        }
    }

    Ok(map)
}
