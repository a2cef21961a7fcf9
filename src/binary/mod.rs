//! Binary marker patching
//!
//! The second injection strategy: rather than rebuilding the template, patch a
//! compiled copy of it. The template reserves two fixed-size regions in its
//! read-only data, each starting with a marker:
//!
//! | Region  | Marker                        | Length |
//! |---------|-------------------------------|--------|
//! | content | `AGENTICC_CODE_MARKER_START_` | 32768  |
//! | label   | `AGENTICC_MODEL_MARKER_`      | 128    |
//!
//! Patching finds the first occurrence of each marker and overwrites the region
//! starting at the marker with the payload, left-aligned and zero-padded.
//! Oversized payloads are truncated with a warning. A missing marker or a region
//! running past the end of the binary is fatal, and the content region is always
//! handled before the label region.
//!
//! The caller's buffer is never modified; on error nothing usable is returned.
//!
//! # Examples
//!
//! ```rust,no_run
//! use agenticc::binary::BinaryPatcher;
//!
//! # fn example(base: Vec<u8>) -> anyhow::Result<()> {
//! let patched = BinaryPatcher::new().patch(&base, b"int main(){return 0;}", b"gpt-4")?;
//! std::fs::write("prog", &patched.bytes)?;
//! # Ok(())
//! # }
//! ```

use std::fmt;

use crate::constants::{CONTENT_MARKER, CONTENT_REGION_LEN, LABEL_MARKER, LABEL_REGION_LEN};
use crate::core::AgenticcError;

/// The two patchable regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Content,
    Label,
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Content => write!(f, "content"),
            Self::Label => write!(f, "label"),
        }
    }
}

/// A fixed-layout record: a marker followed by a region of known size.
///
/// The region includes the marker bytes themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerRegion {
    pub kind: RegionKind,
    pub marker: &'static [u8],
    pub region_len: usize,
}

impl MarkerRegion {
    pub const CONTENT: Self = Self {
        kind: RegionKind::Content,
        marker: CONTENT_MARKER,
        region_len: CONTENT_REGION_LEN,
    };

    pub const LABEL: Self = Self {
        kind: RegionKind::Label,
        marker: LABEL_MARKER,
        region_len: LABEL_REGION_LEN,
    };

    /// Render `payload` into exactly `region_len` bytes.
    ///
    /// Returns the region and whether the payload had to be truncated.
    #[must_use]
    pub fn encode(&self, payload: &[u8]) -> (Vec<u8>, bool) {
        let truncated = payload.len() > self.region_len;
        let kept = &payload[..payload.len().min(self.region_len)];
        let mut region = vec![0u8; self.region_len];
        region[..kept.len()].copy_from_slice(kept);
        (region, truncated)
    }

    /// Unpatched region image: the marker followed by `fill` bytes.
    ///
    /// This is what the template reserves at compile time.
    #[must_use]
    pub fn reserved(&self, fill: u8) -> Vec<u8> {
        let mut region = vec![fill; self.region_len];
        region[..self.marker.len()].copy_from_slice(self.marker);
        region
    }

    /// Offset of the first occurrence of the marker.
    #[must_use]
    pub fn find(&self, haystack: &[u8]) -> Option<usize> {
        find_subslice(haystack, self.marker)
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}

/// What happened to one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionReport {
    pub kind: RegionKind,
    /// Marker offset in the binary
    pub offset: usize,
    /// Payload bytes written before zero padding
    pub written: usize,
    pub truncated: bool,
}

/// A patched copy of a base binary.
#[derive(Debug, Clone)]
pub struct PatchedBinary {
    pub bytes: Vec<u8>,
    pub regions: Vec<RegionReport>,
}

impl PatchedBinary {
    #[must_use]
    pub fn region(&self, kind: RegionKind) -> Option<&RegionReport> {
        self.regions.iter().find(|r| r.kind == kind)
    }
}

/// Patches content and label regions of a compiled template.
#[derive(Debug, Clone)]
pub struct BinaryPatcher {
    content: MarkerRegion,
    label: MarkerRegion,
}

impl Default for BinaryPatcher {
    fn default() -> Self {
        Self {
            content: MarkerRegion::CONTENT,
            label: MarkerRegion::LABEL,
        }
    }
}

impl BinaryPatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom region records, e.g. for templates with smaller regions.
    #[must_use]
    pub const fn with_regions(content: MarkerRegion, label: MarkerRegion) -> Self {
        Self {
            content,
            label,
        }
    }

    /// Return a copy of `binary` with both regions overwritten.
    pub fn patch(
        &self,
        binary: &[u8],
        content: &[u8],
        label: &[u8],
    ) -> Result<PatchedBinary, AgenticcError> {
        let mut bytes = binary.to_vec();
        let mut regions = Vec::with_capacity(2);

        for (region, payload) in [(&self.content, content), (&self.label, label)] {
            regions.push(patch_region(&mut bytes, region, payload)?);
        }

        Ok(PatchedBinary {
            bytes,
            regions,
        })
    }
}

fn patch_region(
    bytes: &mut [u8],
    region: &MarkerRegion,
    payload: &[u8],
) -> Result<RegionReport, AgenticcError> {
    let (encoded, truncated) = region.encode(payload);
    if truncated {
        tracing::warn!(
            target: "binary",
            "{} exceeds {} bytes, truncating",
            match region.kind {
                RegionKind::Content => "Program text",
                RegionKind::Label => "Model name",
            },
            region.region_len
        );
    }

    let offset = region.find(bytes).ok_or(AgenticcError::MarkerNotFound {
        region: region.kind,
    })?;

    let end = offset
        .checked_add(region.region_len)
        .filter(|end| *end <= bytes.len())
        .ok_or(AgenticcError::RegionOverflow {
            region: region.kind,
            offset,
            region_len: region.region_len,
            buffer_len: bytes.len(),
        })?;

    bytes[offset..end].copy_from_slice(&encoded);
    tracing::debug!(
        target: "binary",
        "Patched {} region at offset {:#x} ({} bytes)",
        region.kind,
        offset,
        region.region_len
    );

    Ok(RegionReport {
        kind: region.kind,
        offset,
        written: payload.len().min(region.region_len),
        truncated,
    })
}
