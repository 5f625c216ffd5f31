//! Keyboard hook infrastructure.
//!
//! On Windows this installs a `WH_KEYBOARD_LL` hook on a dedicated Win32
//! message-loop thread; the hook callback resolves every raw key event
//! synchronously through the application layer. The OS gives the callback a
//! small time budget before silently detaching the hook, so the callback
//! does nothing but a short lock-protected registry lookup and, when a rule
//! matches, a `SendInput` call.
//!
//! Other platforms have no hook backend; the engine reports
//! `UnsupportedPlatform` at start instead.

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "windows")]
pub use windows::{install, shutdown, DispatchSession};

use thiserror::Error;

/// Error type for hook installation.
#[derive(Debug, Error)]
pub enum HookError {
    /// `SetWindowsHookExW` declined (commonly insufficient privilege).
    #[error("keyboard hook installation failed: {0}")]
    InstallFailed(String),

    /// Another interception session is live in this process.
    #[error("an interception session is already active in this process")]
    AlreadyActive,

    /// The dispatch thread could not be spawned.
    #[error("failed to spawn the dispatch thread: {0}")]
    ThreadSpawn(String),
}

/// Placeholder session type for platforms without a hook backend; never
/// constructed (the engine refuses to start), but keeps the lifecycle code
/// platform-independent.
#[cfg(not(target_os = "windows"))]
pub struct DispatchSession;

#[cfg(not(target_os = "windows"))]
impl DispatchSession {
    pub fn thread_finished(&self) -> bool {
        true
    }
}

#[cfg(not(target_os = "windows"))]
pub fn shutdown(_session: DispatchSession) {}
