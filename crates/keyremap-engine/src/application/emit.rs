//! Chord-level synthetic emission over the single-key injector.
//!
//! Pressing a chord sends key-downs in canonical order (modifiers first);
//! releasing sends key-ups in reverse order so modifiers are released last,
//! the way a human lets go of a shortcut.

use std::sync::Arc;

use keyremap_core::KeyCombo;

use crate::infrastructure::injection::{InjectError, InputInjector};

/// Emits whole key combinations through an [`InputInjector`].
#[derive(Clone)]
pub struct KeyEmitter {
    injector: Arc<dyn InputInjector>,
}

impl KeyEmitter {
    pub fn new(injector: Arc<dyn InputInjector>) -> Self {
        Self { injector }
    }

    /// Sends one key event per code in `combo`.
    ///
    /// `releasing = false` presses the chord front to back; `releasing =
    /// true` releases it back to front.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first injection failure.
    pub fn emit(&self, combo: &KeyCombo, releasing: bool) -> Result<(), InjectError> {
        if releasing {
            for vk in combo.codes().iter().rev() {
                self.injector.inject(*vk, true)?;
            }
        } else {
            for vk in combo.codes() {
                self.injector.inject(*vk, false)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::injection::mock::RecordingInjector;

    fn emitter_with_recorder() -> (KeyEmitter, Arc<RecordingInjector>) {
        let injector = Arc::new(RecordingInjector::new());
        (KeyEmitter::new(Arc::clone(&injector) as Arc<dyn InputInjector>), injector)
    }

    #[test]
    fn test_press_sends_key_downs_in_canonical_order() {
        let (emitter, recorder) = emitter_with_recorder();
        let combo = KeyCombo::parse("ctrl+shift+a").expect("combo");

        emitter.emit(&combo, false).expect("emit");

        // Canonical order: SHIFT (0x10), CTRL (0x11), A (0x41), all key-down.
        assert_eq!(
            recorder.recorded(),
            vec![(0x10, false), (0x11, false), (0x41, false)]
        );
    }

    #[test]
    fn test_release_sends_key_ups_in_reverse_order() {
        let (emitter, recorder) = emitter_with_recorder();
        let combo = KeyCombo::parse("ctrl+shift+a").expect("combo");

        emitter.emit(&combo, true).expect("emit");

        assert_eq!(
            recorder.recorded(),
            vec![(0x41, true), (0x11, true), (0x10, true)]
        );
    }

    #[test]
    fn test_single_key_press_and_release() {
        let (emitter, recorder) = emitter_with_recorder();
        let combo = KeyCombo::single(0x1B); // escape

        emitter.emit(&combo, false).expect("emit");
        emitter.emit(&combo, true).expect("emit");

        assert_eq!(recorder.recorded(), vec![(0x1B, false), (0x1B, true)]);
    }

    #[test]
    fn test_emit_propagates_injection_failure() {
        let injector = Arc::new(RecordingInjector::failing());
        let emitter = KeyEmitter::new(injector as Arc<dyn InputInjector>);
        let combo = KeyCombo::parse("ctrl+a").expect("combo");

        let err = emitter.emit(&combo, false).unwrap_err();
        assert!(matches!(err, InjectError::SendFailed { vk: 0x11 }));
    }
}
