//! KeyRemap headless entry point.
//!
//! Wires the engine together: settings, rules file, tracing, elevation
//! warning, then runs until Ctrl-C. Rule authoring happens by editing the
//! rules file (or through a front-end built on [`keyremap_engine`]); this
//! binary only loads and applies it.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use keyremap_core::keycode;
use keyremap_engine::infrastructure::privileges;
use keyremap_engine::infrastructure::storage::settings::{self, AppSettings};
use keyremap_engine::RemapEngine;

#[derive(Debug, Parser)]
#[command(name = "keyremap", about = "Low-level Windows key remapper with gaming support")]
struct Args {
    /// Path to the rules file (default: key_remap_config.json beside the
    /// executable, or `rules_path` from settings.toml).
    #[arg(long, env = "KEYREMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Log level override (error, warn, info, debug, trace).
    #[arg(long)]
    log_level: Option<String>,

    /// Print all recognized key names and exit.
    #[arg(long)]
    list_keys: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.list_keys {
        print_available_keys();
        return Ok(());
    }

    // Settings are read before tracing comes up because they carry the
    // default log level; any settings problem is reported just after.
    let (app_settings, settings_error) = match settings::load_settings() {
        Ok(s) => (s, None),
        Err(e) => (AppSettings::default(), Some(e)),
    };

    let level = args.log_level.unwrap_or_else(|| app_settings.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    info!("KeyRemap starting");
    if let Some(e) = settings_error {
        warn!("settings file ignored: {e}");
    }
    if !privileges::is_elevated() {
        warn!("not running as Administrator; some applications may ignore remapped input");
    }

    let engine = RemapEngine::new();

    let rules_path = args.config.or(app_settings.rules_path);
    match engine.load_config(rules_path.as_deref()) {
        Ok(()) => info!(
            mappings = engine.list_mappings().len(),
            blocked = engine.list_blocked_keys().len(),
            "rules loaded"
        ),
        Err(e) => warn!("no rules loaded: {e}"),
    }

    engine.start().context("could not start interception")?;
    info!("interception active; press Ctrl-C to exit");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("shutdown signal received");

    engine.stop();
    info!("KeyRemap stopped");
    Ok(())
}

/// Prints the key-name catalog, grouped the way users look for keys.
fn print_available_keys() {
    println!("Available key names (combine with '+', e.g. ctrl+shift+a):\n");
    for (group, names) in keycode::KEY_NAME_GROUPS {
        println!("{group}:");
        println!("  {}", names.join(", "));
        println!();
    }
}
