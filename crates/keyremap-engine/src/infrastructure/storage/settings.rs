//! TOML-based application settings.
//!
//! Settings are distinct from the rules document: rules say *what* to remap
//! and travel beside the executable; settings say *how the app behaves* and
//! live in the platform config directory:
//!
//! - Windows:  `%APPDATA%\KeyRemap\settings.toml`
//! - Linux:    `~/.config/keyremap/settings.toml`
//! - macOS:    `~/Library/Application Support/KeyRemap/settings.toml`
//!
//! Absent file or absent fields fall back to defaults, so the app works on
//! first run without any setup.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Application settings stored on disk.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AppSettings {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Overrides the default rules file location when set.
    #[serde(default)]
    pub rules_path: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            rules_path: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Resolves the full path to the settings file.
///
/// # Errors
///
/// Returns [`SettingsError::NoPlatformConfigDir`] if the base directory
/// cannot be determined from the environment.
pub fn settings_file_path() -> Result<PathBuf, SettingsError> {
    platform_config_dir()
        .map(|dir| dir.join("settings.toml"))
        .ok_or(SettingsError::NoPlatformConfigDir)
}

/// Loads settings from disk, returning `AppSettings::default()` if the file
/// does not yet exist.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] for file-system errors other than "not
/// found" and [`SettingsError::Parse`] if the TOML is malformed.
pub fn load_settings() -> Result<AppSettings, SettingsError> {
    let path = settings_file_path()?;

    match std::fs::read_to_string(&path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppSettings::default()),
        Err(e) => Err(SettingsError::Io { path, source: e }),
    }
}

/// Resolves the platform config base directory including the app folder.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("KeyRemap"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("keyremap"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("KeyRemap")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.rules_path, None);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let settings: AppSettings = toml::from_str("").expect("deserialize empty");
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn test_partial_toml_overrides_only_named_fields() {
        let settings: AppSettings = toml::from_str(r#"log_level = "debug""#).expect("deserialize");
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.rules_path, None);
    }

    #[test]
    fn test_rules_path_override_is_read() {
        let settings: AppSettings =
            toml::from_str(r#"rules_path = "/opt/keyremap/rules.json""#).expect("deserialize");
        assert_eq!(
            settings.rules_path,
            Some(PathBuf::from("/opt/keyremap/rules.json"))
        );
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let result: Result<AppSettings, toml::de::Error> = toml::from_str("[[[ not toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_file_path_ends_with_settings_toml() {
        if let Ok(path) = settings_file_path() {
            assert!(path.ends_with("settings.toml"), "got {path:?}");
        }
        // NoPlatformConfigDir in a stripped environment is also acceptable.
    }
}
