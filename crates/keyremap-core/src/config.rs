//! On-disk rules document schema.
//!
//! The rules file is a JSON document with two ordered lists, one per rule
//! namespace. All key fields use the textual `+`-joined combo form from
//! [`crate::combo::KeyCombo`], so a file written by hand with names like
//! `"CAPSLOCK"` or `"ctrl+shift+a"` loads the same as a saved one:
//!
//! ```json
//! {
//!     "mappings": [
//!         { "source": "CAPSLOCK", "target": "ESCAPE", "enabled": true, "description": "" }
//!     ],
//!     "blocked_keys": [
//!         { "key": "WIN+SHIFT+F23", "enabled": false, "description": "" }
//!     ]
//! }
//! ```
//!
//! Fields absent from an entry fall back to serde defaults (`enabled: true`,
//! empty description), so minimal hand-written entries stay valid.

use serde::{Deserialize, Serialize};

/// One persisted source→target mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Source chord in textual form (e.g. `"CAPSLOCK"`, `"CTRL+A"`).
    pub source: String,
    /// Target chord in textual form.
    pub target: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub description: String,
}

/// One persisted blocked key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedKeyEntry {
    /// Blocked chord in textual form.
    pub key: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub description: String,
}

/// Top-level rules document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemapConfig {
    #[serde(default)]
    pub mappings: Vec<MappingEntry>,
    #[serde(default)]
    pub blocked_keys: Vec<BlockedKeyEntry>,
}

impl RemapConfig {
    /// `true` when the document carries no rules at all.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty() && self.blocked_keys.is_empty()
    }
}

fn default_enabled() -> bool {
    true
}
