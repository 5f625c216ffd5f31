//! Shared rule registry: source→target mappings and blocked keys.
//!
//! The registry is read on every intercepted key event (dispatch thread) and
//! mutated by the control thread (CLI/GUI, config reload). Both tables live
//! behind a single mutex so a write can never tear a combo-then-single
//! lookup in half. The lock is held only for the duration of one lookup or
//! one mutation — in particular, never across synthetic input emission.
//!
//! All text-level operations re-validate their input through
//! [`KeyCombo::parse`]; a parse failure reports `Err`/`false` and leaves the
//! tables untouched.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;

use crate::combo::{KeyCombo, KeyParseError};
use crate::config::{BlockedKeyEntry, MappingEntry, RemapConfig};

/// A source→target rewrite rule, keyed by its canonical source chord.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub source: KeyCombo,
    pub target: KeyCombo,
    pub enabled: bool,
    pub description: String,
}

/// A suppression rule, keyed by its canonical chord.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRule {
    pub key: KeyCombo,
    pub enabled: bool,
    pub description: String,
}

#[derive(Debug, Default)]
struct RuleTables {
    mappings: HashMap<KeyCombo, Mapping>,
    blocked: HashMap<KeyCombo, BlockRule>,
}

/// Concurrent-safe store of mappings and block rules.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    tables: Mutex<RuleTables>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A poisoned lock means a panic happened inside another lock holder;
    /// the tables themselves are still structurally valid, so keep serving.
    fn lock(&self) -> MutexGuard<'_, RuleTables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Mapping CRUD ─────────────────────────────────────────────────────────

    /// Adds (or overwrites) a mapping keyed by the canonical form of
    /// `source`. Overwriting resets `enabled` to `true`, matching the
    /// config-reload path.
    ///
    /// An empty `description` defaults to `"<source> -> <target>"`.
    ///
    /// # Errors
    ///
    /// Returns the [`KeyParseError`] of whichever side failed to parse; the
    /// tables are not touched in that case.
    pub fn add_mapping(
        &self,
        source: &str,
        target: &str,
        description: &str,
    ) -> Result<(), KeyParseError> {
        let source_combo = KeyCombo::parse(source)?;
        let target_combo = KeyCombo::parse(target)?;

        let description = if description.is_empty() {
            format!("{source} -> {target}")
        } else {
            description.to_string()
        };

        let mapping = Mapping {
            source: source_combo.clone(),
            target: target_combo,
            enabled: true,
            description,
        };
        self.lock().mappings.insert(source_combo, mapping);
        Ok(())
    }

    /// Removes the mapping for `source`. Returns `true` iff an entry
    /// existed; unparseable text reports `false`.
    pub fn remove_mapping(&self, source: &str) -> bool {
        match KeyCombo::parse(source) {
            Ok(combo) => self.lock().mappings.remove(&combo).is_some(),
            Err(_) => false,
        }
    }

    /// Flips the `enabled` flag of the mapping for `source`. Returns `false`
    /// when no such entry exists (or the text does not parse).
    pub fn toggle_mapping(&self, source: &str) -> bool {
        let Ok(combo) = KeyCombo::parse(source) else {
            return false;
        };
        match self.lock().mappings.get_mut(&combo) {
            Some(mapping) => {
                mapping.enabled = !mapping.enabled;
                true
            }
            None => false,
        }
    }

    // ── Block-rule CRUD ──────────────────────────────────────────────────────

    /// Adds (or overwrites) a block rule for `key`. Overwriting resets
    /// `enabled` to `true`. An empty `description` defaults to
    /// `"Block <key>"`.
    ///
    /// # Errors
    ///
    /// Returns the [`KeyParseError`] when `key` does not parse.
    pub fn block_key(&self, key: &str, description: &str) -> Result<(), KeyParseError> {
        let combo = KeyCombo::parse(key)?;

        let description = if description.is_empty() {
            format!("Block {key}")
        } else {
            description.to_string()
        };

        let rule = BlockRule {
            key: combo.clone(),
            enabled: true,
            description,
        };
        self.lock().blocked.insert(combo, rule);
        Ok(())
    }

    /// Removes the block rule for `key`. Returns `true` iff one existed.
    pub fn unblock_key(&self, key: &str) -> bool {
        match KeyCombo::parse(key) {
            Ok(combo) => self.lock().blocked.remove(&combo).is_some(),
            Err(_) => false,
        }
    }

    /// Flips the `enabled` flag of the block rule for `key`.
    pub fn toggle_blocked_key(&self, key: &str) -> bool {
        let Ok(combo) = KeyCombo::parse(key) else {
            return false;
        };
        match self.lock().blocked.get_mut(&combo) {
            Some(rule) => {
                rule.enabled = !rule.enabled;
                true
            }
            None => false,
        }
    }

    // ── Snapshots ────────────────────────────────────────────────────────────

    /// Snapshot of all mappings in textual form. Order is stable only
    /// within one snapshot (the backing store is unordered by key).
    pub fn list_mappings(&self) -> Vec<MappingEntry> {
        self.lock()
            .mappings
            .values()
            .map(|m| MappingEntry {
                source: m.source.to_string(),
                target: m.target.to_string(),
                enabled: m.enabled,
                description: m.description.clone(),
            })
            .collect()
    }

    /// Snapshot of all block rules in textual form.
    pub fn list_blocked_keys(&self) -> Vec<BlockedKeyEntry> {
        self.lock()
            .blocked
            .values()
            .map(|b| BlockedKeyEntry {
                key: b.key.to_string(),
                enabled: b.enabled,
                description: b.description.clone(),
            })
            .collect()
    }

    /// `true` when neither table holds any rule (enabled or not).
    pub fn is_empty(&self) -> bool {
        let tables = self.lock();
        tables.mappings.is_empty() && tables.blocked.is_empty()
    }

    pub fn mapping_count(&self) -> usize {
        self.lock().mappings.len()
    }

    pub fn blocked_count(&self) -> usize {
        self.lock().blocked.len()
    }

    // ── Hot-path resolution (dispatch thread) ────────────────────────────────

    /// `true` if an enabled block rule matches the full chord or, failing
    /// that, the bare key. One short lock acquisition.
    pub fn blocked_match(&self, combo: &KeyCombo, single: &KeyCombo) -> bool {
        let tables = self.lock();
        if tables.blocked.get(combo).is_some_and(|b| b.enabled) {
            return true;
        }
        tables.blocked.get(single).is_some_and(|b| b.enabled)
    }

    /// The target of an enabled mapping matching the full chord or, failing
    /// that, the bare key. The target is cloned out so the caller emits
    /// without holding the lock.
    pub fn mapping_target(&self, combo: &KeyCombo, single: &KeyCombo) -> Option<KeyCombo> {
        let tables = self.lock();
        if let Some(m) = tables.mappings.get(combo) {
            if m.enabled {
                return Some(m.target.clone());
            }
        }
        tables.mappings.get(single).filter(|m| m.enabled).map(|m| m.target.clone())
    }

    // ── Persistence support ──────────────────────────────────────────────────

    /// Exports the current rules as a persistable document.
    pub fn export_config(&self) -> RemapConfig {
        RemapConfig {
            mappings: self.list_mappings(),
            blocked_keys: self.list_blocked_keys(),
        }
    }

    /// Replaces the entire registry with the rules in `config`.
    ///
    /// Entries run through the normal add path (re-validating their key
    /// text) into a staging table; an entry whose text no longer parses is
    /// skipped with a warning. The live tables are swapped in one lock
    /// acquisition, so concurrent readers see either the old rules or the
    /// new ones, never a mixture.
    pub fn apply_config(&self, config: &RemapConfig) {
        let staging = RuleRegistry::new();

        for entry in &config.mappings {
            match staging.add_mapping(&entry.source, &entry.target, &entry.description) {
                Ok(()) => {
                    if !entry.enabled {
                        staging.toggle_mapping(&entry.source);
                    }
                }
                Err(e) => {
                    warn!(source = %entry.source, target = %entry.target, "skipping mapping: {e}");
                }
            }
        }

        for entry in &config.blocked_keys {
            match staging.block_key(&entry.key, &entry.description) {
                Ok(()) => {
                    if !entry.enabled {
                        staging.toggle_blocked_key(&entry.key);
                    }
                }
                Err(e) => {
                    warn!(key = %entry.key, "skipping blocked key: {e}");
                }
            }
        }

        let staged = staging.tables.into_inner().unwrap_or_else(PoisonError::into_inner);
        *self.lock() = staged;
    }
}
