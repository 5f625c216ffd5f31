//! The engine facade consumed by front-ends (CLI, GUI, tray).
//!
//! [`RemapEngine`] owns the shared rule registry, the injection backend,
//! and — while running — the live dispatch session. The control thread
//! calls everything here; the dispatch thread only ever sees the
//! `InterceptContext` handed to the hook at start.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use keyremap_core::{BlockedKeyEntry, KeyParseError, MappingEntry, RuleRegistry};
use tracing::info;

use crate::infrastructure::hook::{self, DispatchSession, HookError};
use crate::infrastructure::injection::{platform_injector, InputInjector};
use crate::infrastructure::storage::rules::{self, RulesFileError};

/// Error type for [`RemapEngine::start`].
#[derive(Debug, thiserror::Error)]
pub enum StartError {
    /// Neither a mapping nor a blocked key is configured.
    #[error("no mappings or blocked keys are configured")]
    NoRulesConfigured,

    /// A dispatch session is already live.
    #[error("the engine is already running")]
    AlreadyRunning,

    /// The OS declined to install the hook (commonly insufficient
    /// privilege) or the dispatch thread failed to come up.
    #[error("failed to install the keyboard hook: {0}")]
    HookInstall(String),

    /// No interception backend exists for this platform.
    #[error("keyboard interception is not supported on this platform")]
    UnsupportedPlatform,
}

impl From<HookError> for StartError {
    fn from(e: HookError) -> Self {
        match e {
            HookError::AlreadyActive => StartError::AlreadyRunning,
            HookError::InstallFailed(reason) => StartError::HookInstall(reason),
            HookError::ThreadSpawn(reason) => StartError::HookInstall(reason),
        }
    }
}

/// The key remapper engine.
///
/// Rules can be edited at any time, running or not; the dispatch thread
/// picks changes up on the next key event through the shared registry.
pub struct RemapEngine {
    registry: Arc<RuleRegistry>,
    #[cfg_attr(not(target_os = "windows"), allow(dead_code))]
    injector: Arc<dyn InputInjector>,
    session: Mutex<Option<DispatchSession>>,
}

impl RemapEngine {
    /// Creates an engine with the platform injection backend and an empty
    /// registry.
    pub fn new() -> Self {
        Self::with_injector(platform_injector())
    }

    /// Creates an engine with a custom injection backend (tests, headless
    /// platforms).
    pub fn with_injector(injector: Arc<dyn InputInjector>) -> Self {
        Self {
            registry: Arc::new(RuleRegistry::new()),
            injector,
            session: Mutex::new(None),
        }
    }

    /// The shared rule registry.
    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }

    // ── Rule CRUD (delegated to the registry) ────────────────────────────────

    pub fn add_mapping(
        &self,
        source: &str,
        target: &str,
        description: &str,
    ) -> Result<(), KeyParseError> {
        self.registry.add_mapping(source, target, description)
    }

    pub fn remove_mapping(&self, source: &str) -> bool {
        self.registry.remove_mapping(source)
    }

    pub fn toggle_mapping(&self, source: &str) -> bool {
        self.registry.toggle_mapping(source)
    }

    pub fn block_key(&self, key: &str, description: &str) -> Result<(), KeyParseError> {
        self.registry.block_key(key, description)
    }

    pub fn unblock_key(&self, key: &str) -> bool {
        self.registry.unblock_key(key)
    }

    pub fn toggle_blocked_key(&self, key: &str) -> bool {
        self.registry.toggle_blocked_key(key)
    }

    pub fn list_mappings(&self) -> Vec<MappingEntry> {
        self.registry.list_mappings()
    }

    pub fn list_blocked_keys(&self) -> Vec<BlockedKeyEntry> {
        self.registry.list_blocked_keys()
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// Starts interception. Returns once the hook handle is live.
    ///
    /// # Errors
    ///
    /// See [`StartError`]. The rules check runs first, so an empty registry
    /// reports [`StartError::NoRulesConfigured`] on every platform.
    pub fn start(&self) -> Result<(), StartError> {
        if self.registry.is_empty() {
            return Err(StartError::NoRulesConfigured);
        }

        let mut session = self.lock_session();
        if session.as_ref().is_some_and(|s| !s.thread_finished()) {
            return Err(StartError::AlreadyRunning);
        }
        // A session whose dispatch thread already died is torn down before
        // a fresh install.
        if let Some(stale) = session.take() {
            hook::shutdown(stale);
        }

        #[cfg(target_os = "windows")]
        {
            use crate::application::{InterceptContext, KeyEmitter};

            let emitter = KeyEmitter::new(Arc::clone(&self.injector));
            let context = Arc::new(InterceptContext::new(Arc::clone(&self.registry), emitter));
            *session = Some(hook::install(context)?);
            info!(
                mappings = self.registry.mapping_count(),
                blocked = self.registry.blocked_count(),
                "interception started"
            );
            Ok(())
        }

        #[cfg(not(target_os = "windows"))]
        {
            Err(StartError::UnsupportedPlatform)
        }
    }

    /// Stops interception. Idempotent; a never-started or already-stopped
    /// engine is a no-op.
    pub fn stop(&self) {
        let taken = self.lock_session().take();
        if let Some(session) = taken {
            hook::shutdown(session);
            info!("interception stopped");
        }
    }

    /// `true` while a dispatch session is live. A session whose dispatch
    /// thread has died (message loop lost) reads as not running.
    pub fn is_running(&self) -> bool {
        self.lock_session()
            .as_ref()
            .is_some_and(|s| !s.thread_finished())
    }

    // ── Persistence ──────────────────────────────────────────────────────────

    /// Saves the current rules to `path`, or to the default rules file
    /// beside the executable when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`RulesFileError`] on I/O or serialization failure.
    pub fn save_config(&self, path: Option<&Path>) -> Result<(), RulesFileError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => rules::default_rules_path()?,
        };
        rules::save_rules(&path, &self.registry)
    }

    /// Replaces the current rules with the document at `path` (default path
    /// when `None`). A malformed document leaves the rules untouched.
    ///
    /// # Errors
    ///
    /// Returns [`RulesFileError`] when the file is missing, unreadable, or
    /// malformed.
    pub fn load_config(&self, path: Option<&Path>) -> Result<(), RulesFileError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => rules::default_rules_path()?,
        };
        rules::load_rules(&path, &self.registry)
    }

    fn lock_session(&self) -> std::sync::MutexGuard<'_, Option<DispatchSession>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RemapEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RemapEngine {
    /// A live system-wide hook must not outlive the engine, even when the
    /// owner forgot to call [`stop`](Self::stop) before exiting.
    fn drop(&mut self) {
        self.stop();
    }
}
