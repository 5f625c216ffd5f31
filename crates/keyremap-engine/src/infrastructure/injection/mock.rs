//! Recording injector for unit and integration tests.
//!
//! Captures every injected `(vk, key_up)` pair instead of touching the OS,
//! so tests can assert on exact emission order without a display server or
//! elevated privileges.

use std::sync::{Arc, Mutex};

use super::{InjectError, InputInjector};

/// An [`InputInjector`] that records calls in memory.
#[derive(Default)]
pub struct RecordingInjector {
    events: Arc<Mutex<Vec<(u8, bool)>>>,
    fail_all: bool,
}

impl RecordingInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// A variant whose every call fails, for error-path tests.
    pub fn failing() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            fail_all: true,
        }
    }

    /// Snapshot of all recorded `(vk, key_up)` events, in injection order.
    pub fn recorded(&self) -> Vec<(u8, bool)> {
        self.events.lock().expect("lock poisoned").clone()
    }

    /// Clears the recording.
    pub fn reset(&self) {
        self.events.lock().expect("lock poisoned").clear();
    }
}

impl InputInjector for RecordingInjector {
    fn inject(&self, vk: u8, key_up: bool) -> Result<(), InjectError> {
        if self.fail_all {
            return Err(InjectError::SendFailed { vk });
        }
        self.events.lock().expect("lock poisoned").push((vk, key_up));
        Ok(())
    }
}
