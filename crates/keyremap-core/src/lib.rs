//! # keyremap-core
//!
//! Shared library for KeyRemap containing the key identity model, the rule
//! registry, and the on-disk rules schema.
//!
//! This crate is used by the engine and by any front-end authoring rules.
//! It has zero dependencies on OS APIs, UI frameworks, or the Windows hook
//! machinery, so all of it is exercised by plain host-side tests:
//!
//! - **`keycode`** – Windows Virtual Key code tables: name→code resolution,
//!   code→name rendering, modifier and extended-key classification.
//! - **`combo`** – the canonical [`KeyCombo`] chord value type that keys
//!   every rule table, plus its text round-trip.
//! - **`registry`** – the [`RuleRegistry`]: both rule tables behind a single
//!   lock, text-level CRUD, and the combo-first/block-first resolution
//!   queries the interception engine runs on every key event.
//! - **`config`** – the serde schema of the rules document.

pub mod combo;
pub mod config;
pub mod keycode;
pub mod registry;

pub use combo::{KeyCombo, KeyParseError};
pub use config::{BlockedKeyEntry, MappingEntry, RemapConfig};
pub use registry::{BlockRule, Mapping, RuleRegistry};
