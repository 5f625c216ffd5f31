//! Rules file persistence.
//!
//! The rules document is JSON (see `keyremap_core::config`), stored by
//! default as `key_remap_config.json` beside the executable so the tool
//! stays portable — drop the binary and its rules file in one directory and
//! move them together.
//!
//! Loading is replace-or-nothing: the document is parsed in full before the
//! registry is touched, so a malformed file leaves the current rules
//! exactly as they were.

use std::path::{Path, PathBuf};

use keyremap_core::{RemapConfig, RuleRegistry};

use thiserror::Error;

/// File name of the default rules document, kept from earlier releases so
/// existing rules files keep loading.
pub const RULES_FILE_NAME: &str = "key_remap_config.json";

/// Error type for rules file operations.
#[derive(Debug, Error)]
pub enum RulesFileError {
    /// The executable's own location could not be determined.
    #[error("could not determine the default rules path: {0}")]
    NoDefaultPath(String),

    /// A file system I/O error occurred.
    #[error("I/O error accessing rules at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON (or not a rules document).
    #[error("failed to parse rules document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Resolves the default rules path: [`RULES_FILE_NAME`] beside the
/// executable.
///
/// # Errors
///
/// Returns [`RulesFileError::NoDefaultPath`] when `current_exe` fails.
pub fn default_rules_path() -> Result<PathBuf, RulesFileError> {
    let exe = std::env::current_exe().map_err(|e| RulesFileError::NoDefaultPath(e.to_string()))?;
    Ok(exe.with_file_name(RULES_FILE_NAME))
}

/// Writes the registry's current rules to `path` as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`RulesFileError::Io`] for file-system failures.
pub fn save_rules(path: &Path, registry: &RuleRegistry) -> Result<(), RulesFileError> {
    let document = registry.export_config();
    let content = serde_json::to_string_pretty(&document)?;
    std::fs::write(path, content).map_err(|source| RulesFileError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Replaces the registry's rules with the document at `path`.
///
/// The file is read and parsed completely before the registry is touched;
/// on any error the registry keeps its current rules. Individual entries
/// with unresolvable key names are skipped (with a warning) by the apply
/// path, not treated as document failures.
///
/// # Errors
///
/// [`RulesFileError::Io`] when the file cannot be read,
/// [`RulesFileError::Malformed`] when it does not parse.
pub fn load_rules(path: &Path, registry: &RuleRegistry) -> Result<(), RulesFileError> {
    let content = std::fs::read_to_string(path).map_err(|source| RulesFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document: RemapConfig = serde_json::from_str(&content)?;
    registry.apply_config(&document);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unique temp directory per test, cleaned up by the caller.
    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("keyremap_rules_{}_{tag}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn test_save_then_load_round_trips_the_registry() {
        let dir = temp_dir("roundtrip");
        let path = dir.join(RULES_FILE_NAME);

        let registry = RuleRegistry::new();
        registry.add_mapping("capslock", "escape", "").expect("add");
        registry.block_key("win+shift+f23", "").expect("block");
        registry.toggle_blocked_key("win+shift+f23");
        save_rules(&path, &registry).expect("save");

        let restored = RuleRegistry::new();
        load_rules(&path, &restored).expect("load");

        assert_eq!(restored.mapping_count(), 1);
        assert_eq!(restored.blocked_count(), 1);
        assert_eq!(registry.list_mappings(), restored.list_mappings());
        assert_eq!(registry.list_blocked_keys(), restored.list_blocked_keys());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_of_malformed_document_leaves_registry_untouched() {
        let dir = temp_dir("malformed");
        let path = dir.join(RULES_FILE_NAME);
        std::fs::write(&path, "{ not valid json !!").expect("write");

        let registry = RuleRegistry::new();
        registry.add_mapping("capslock", "escape", "keep me").expect("add");
        registry.block_key("f1", "").expect("block");

        let err = load_rules(&path, &registry).unwrap_err();
        assert!(matches!(err, RulesFileError::Malformed(_)));

        // Replace-or-nothing: the previous rules are intact.
        assert_eq!(registry.mapping_count(), 1);
        assert_eq!(registry.blocked_count(), 1);
        assert_eq!(registry.list_mappings()[0].description, "keep me");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_of_missing_file_is_an_io_error() {
        let path = PathBuf::from("/nonexistent/keyremap/no_such_rules.json");
        let registry = RuleRegistry::new();

        let err = load_rules(&path, &registry).unwrap_err();
        assert!(matches!(err, RulesFileError::Io { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_replaces_previous_rules_entirely() {
        let dir = temp_dir("replace");
        let path = dir.join(RULES_FILE_NAME);

        let source = RuleRegistry::new();
        source.add_mapping("f1", "f2", "").expect("add");
        save_rules(&path, &source).expect("save");

        let registry = RuleRegistry::new();
        registry.add_mapping("capslock", "escape", "").expect("add");
        registry.block_key("slash", "").expect("block");
        load_rules(&path, &registry).expect("load");

        assert_eq!(registry.mapping_count(), 1);
        assert_eq!(registry.blocked_count(), 0);
        assert_eq!(registry.list_mappings()[0].source, "F1");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_default_rules_path_uses_the_historical_file_name() {
        let path = default_rules_path().expect("default path");
        assert!(path.ends_with(RULES_FILE_NAME), "got {path:?}");
    }
}
