//! # keyremap-engine
//!
//! Low-level Windows keyboard interception and rewrite engine.
//!
//! Every keyboard event in the system passes through a `WH_KEYBOARD_LL`
//! hook owned by this crate; each event is passed through, suppressed, or
//! rewritten into a different key sequence according to the rules in a
//! shared [`keyremap_core::RuleRegistry`]. Rewritten output re-enters the
//! OS input stream via `SendInput`, tagged so the hook ignores its own
//! events. Because the hook sits below the Win32 message layer, remapping
//! works in applications that read raw input, games included.
//!
//! Layering follows the usual core/app split:
//!
//! - **`application`** – the pure per-event state machine and chord
//!   emitter; no OS types, fully covered by host-side tests.
//! - **`infrastructure`** – the Windows hook and SendInput backends,
//!   rules/settings persistence, and the elevation probe.
//! - **`engine`** – the [`RemapEngine`] facade front-ends talk to.

pub mod application;
pub mod engine;
pub mod infrastructure;

pub use engine::{RemapEngine, StartError};
pub use infrastructure::injection::{InjectError, InputInjector};
pub use infrastructure::storage::rules::RulesFileError;
