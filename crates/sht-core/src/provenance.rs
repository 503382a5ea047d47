//! Provenance trail helpers and schema descriptors for serialized series.

use serde::{Deserialize, Serialize};

/// Semantic version describing the schema of serialized payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version incremented for breaking changes.
    pub major: u32,
    /// Minor version incremented for additive changes.
    pub minor: u32,
    /// Patch version incremented for bug fixes and documentation updates.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// Appends a `key: value` line to a provenance trail.
///
/// The trail is an opaque, append-only log. A series without a trail (`None`)
/// stays without one: entries are only recorded when the caller opted into
/// provenance tracking by giving the series a name.
pub fn append_entry(trail: Option<&str>, key: &str, value: &str) -> Option<String> {
    trail.map(|existing| format!("{existing}{key}: {value}\n"))
}
