//! Synthetic keyboard input infrastructure.
//!
//! The production implementation injects events through `SendInput`; tests
//! use [`mock::RecordingInjector`]. Every synthesized event carries
//! [`INJECTION_SENTINEL`] in the OS event's extra-info slot so the hook can
//! recognize its own output and let it pass (see the interception engine's
//! self-injection filter).

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

use std::sync::Arc;

/// Marker stored in `dwExtraInfo` of every injected event. The hook treats
/// any injected event carrying this value as its own output.
pub const INJECTION_SENTINEL: usize = 0xDEADBEEF;

/// Error type for synthetic input operations.
#[derive(Debug, thiserror::Error)]
pub enum InjectError {
    /// The OS rejected the synthesized event.
    #[error("SendInput rejected the event for VK 0x{vk:02X}")]
    SendFailed { vk: u8 },
    /// No injection backend exists for this platform.
    #[error("synthetic keyboard input is not supported on this platform")]
    UnsupportedPlatform,
}

/// Trait abstracting single-key event injection.
///
/// `key_up = false` presses the key, `key_up = true` releases it. Chord
/// ordering is the caller's concern (see the emitter in the application
/// layer); implementations deal with exactly one key event at a time.
#[cfg_attr(test, mockall::automock)]
pub trait InputInjector: Send + Sync {
    fn inject(&self, vk: u8, key_up: bool) -> Result<(), InjectError>;
}

/// Injector used when no platform backend is available. Every call fails
/// with [`InjectError::UnsupportedPlatform`]; the engine refuses to start on
/// such platforms, so this is only reachable through direct construction.
pub struct UnsupportedInjector;

impl InputInjector for UnsupportedInjector {
    fn inject(&self, _vk: u8, _key_up: bool) -> Result<(), InjectError> {
        Err(InjectError::UnsupportedPlatform)
    }
}

/// Returns the injection backend for the current platform.
pub fn platform_injector() -> Arc<dyn InputInjector> {
    #[cfg(target_os = "windows")]
    {
        Arc::new(windows::SendInputInjector::new())
    }
    #[cfg(not(target_os = "windows"))]
    {
        Arc::new(UnsupportedInjector)
    }
}
