//! Per-event interception state machine.
//!
//! This is the heart of the engine. The Windows hook delivers raw
//! key-down/key-up notifications; [`decide`] resolves each one against the
//! rule registry and the live modifier/suppression state into a
//! [`KeyDecision`], and [`apply_decision`] turns that decision into
//! synthetic output plus a handled/not-handled verdict for the hook.
//!
//! Keeping the logic here — away from the FFI boundary — makes every rule
//! of the state machine testable without installing a hook:
//!
//! 1. Events carrying the injection sentinel are never resolved at all
//!    (see [`is_own_injection`]); that check runs in the hook callback
//!    before this module is consulted.
//! 2. Modifier keys update `active_modifiers` on both edges, even when the
//!    event itself ends up suppressed, so chord detection for the next key
//!    stays accurate.
//! 3. The full chord is looked up before the bare key, and block rules win
//!    over mappings.
//! 4. A suppressed key-down records the key so its key-up is suppressed
//!    (and, for mappings, released) symmetrically — the user can still let
//!    go of a physical key whose press was rewritten.

use std::collections::{BTreeSet, HashSet};

use keyremap_core::{keycode, KeyCombo, RuleRegistry};
use tracing::warn;

use super::emit::KeyEmitter;
use crate::infrastructure::injection::INJECTION_SENTINEL;

/// Live state owned by the dispatch thread. Reset whenever the engine
/// stops (the dispatch thread, and with it this state, terminates).
#[derive(Debug, Default)]
pub struct InterceptState {
    /// Modifier keys currently held down.
    pub active_modifiers: BTreeSet<u8>,
    /// Keys whose key-down was intercepted; their key-up must be
    /// intercepted too.
    pub suppressed_keys: HashSet<u8>,
}

impl InterceptState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Outcome of resolving one raw key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyDecision {
    /// Forward the event to the OS unmodified.
    PassThrough,
    /// Swallow the event; nothing is emitted (blocked key).
    Suppress,
    /// Swallow the event and press the target chord.
    RemapPress(KeyCombo),
    /// Swallow the event and release the target chord.
    RemapRelease(KeyCombo),
}

/// `true` when a hook event is the engine's own injected output.
///
/// Both conditions are required: the OS marks the event as injected AND the
/// extra-info slot carries our sentinel. Injected events from other tools
/// (which fail the second check) are still resolved normally.
pub fn is_own_injection(os_injected_flag: bool, extra_info: usize) -> bool {
    os_injected_flag && extra_info == INJECTION_SENTINEL
}

/// Resolves one raw key event against the registry and live state.
///
/// Never blocks beyond the registry's short lock, and never injects —
/// callers apply the returned decision after the lookup completes.
pub fn decide(
    registry: &RuleRegistry,
    state: &mut InterceptState,
    vk: u8,
    is_down: bool,
) -> KeyDecision {
    // Modifier bookkeeping happens first, unconditionally.
    if keycode::is_modifier(vk) {
        if is_down {
            state.active_modifiers.insert(vk);
        } else {
            state.active_modifiers.remove(&vk);
        }
    }

    let chord = KeyCombo::from_event(state.active_modifiers.iter().copied(), vk);
    let single = KeyCombo::single(vk);

    // Block rules take precedence over mappings.
    if registry.blocked_match(&chord, &single) {
        if is_down {
            state.suppressed_keys.insert(vk);
            return KeyDecision::Suppress;
        }
        if state.suppressed_keys.remove(&vk) {
            return KeyDecision::Suppress;
        }
        // Key-up with no recorded key-down (hook installed mid-press):
        // fall through to the mapping check.
    }

    if let Some(target) = registry.mapping_target(&chord, &single) {
        if is_down {
            state.suppressed_keys.insert(vk);
            return KeyDecision::RemapPress(target);
        }
        if state.suppressed_keys.remove(&vk) {
            return KeyDecision::RemapRelease(target);
        }
    }

    KeyDecision::PassThrough
}

/// Executes a decision: emits synthetic output where required and reports
/// whether the original event was handled (and must be withheld from the
/// OS).
///
/// Emission failures are logged and do not change the verdict — the source
/// key was already committed as suppressed, and letting it through after a
/// partial emission would double-type.
pub fn apply_decision(decision: KeyDecision, emitter: &KeyEmitter) -> bool {
    match decision {
        KeyDecision::PassThrough => false,
        KeyDecision::Suppress => true,
        KeyDecision::RemapPress(target) => {
            if let Err(e) = emitter.emit(&target, false) {
                warn!("failed to press remap target {target}: {e}");
            }
            true
        }
        KeyDecision::RemapRelease(target) => {
            if let Err(e) = emitter.emit(&target, true) {
                warn!("failed to release remap target {target}: {e}");
            }
            true
        }
    }
}

/// Everything the hook callback needs to resolve events: the shared rule
/// registry and the emitter for rewrite output.
pub struct InterceptContext {
    registry: std::sync::Arc<RuleRegistry>,
    emitter: KeyEmitter,
}

impl InterceptContext {
    pub fn new(registry: std::sync::Arc<RuleRegistry>, emitter: KeyEmitter) -> Self {
        Self { registry, emitter }
    }

    /// Full per-event pipeline: decide, then apply. Returns `true` when the
    /// event was handled and must not reach the OS.
    pub fn handle_event(&self, state: &mut InterceptState, vk: u8, is_down: bool) -> bool {
        let decision = decide(&self.registry, state, vk, is_down);
        apply_decision(decision, &self.emitter)
    }
}
