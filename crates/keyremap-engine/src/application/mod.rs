//! Application layer of the interception engine.
//!
//! Pure, OS-free logic: the per-event decision state machine and the
//! chord-level emitter. Infrastructure (the actual hook and SendInput) is
//! injected behind traits, so everything here runs under plain `cargo test`
//! on any platform.

pub mod emit;
pub mod intercept;

pub use emit::KeyEmitter;
pub use intercept::{InterceptContext, InterceptState, KeyDecision};
