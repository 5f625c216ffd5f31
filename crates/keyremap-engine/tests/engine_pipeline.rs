//! Integration tests for the interception pipeline.
//!
//! These exercise the application layer of keyremap-engine end-to-end:
//! registry + decision state machine + emitter over the recording injector,
//! plus the engine facade's persistence path — everything except the
//! Windows hook itself, which only forwards raw events into this pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use keyremap_core::RuleRegistry;
use keyremap_engine::application::intercept::{self, InterceptContext, InterceptState};
use keyremap_engine::application::KeyEmitter;
use keyremap_engine::infrastructure::injection::mock::RecordingInjector;
use keyremap_engine::infrastructure::injection::{InputInjector, INJECTION_SENTINEL};
use keyremap_engine::RemapEngine;

const VK_SHIFT: u8 = 0x10;
const VK_CTRL: u8 = 0x11;
const VK_CAPS: u8 = 0x14;
const VK_ESC: u8 = 0x1B;
const VK_A: u8 = 0x41;

fn pipeline(registry: Arc<RuleRegistry>) -> (InterceptContext, Arc<RecordingInjector>) {
    let injector = Arc::new(RecordingInjector::new());
    let emitter = KeyEmitter::new(Arc::clone(&injector) as Arc<dyn InputInjector>);
    (InterceptContext::new(registry, emitter), injector)
}

#[test]
fn test_mapped_chord_press_and_release_emit_symmetric_target_events() {
    let registry = Arc::new(RuleRegistry::new());
    registry.add_mapping("capslock", "ctrl+shift+escape", "").expect("add");

    let (context, injector) = pipeline(Arc::clone(&registry));
    let mut state = InterceptState::new();

    assert!(context.handle_event(&mut state, VK_CAPS, true), "key-down handled");
    assert!(context.handle_event(&mut state, VK_CAPS, false), "key-up handled");

    // Target pressed front-to-back, released back-to-front.
    assert_eq!(
        injector.recorded(),
        vec![
            (VK_SHIFT, false),
            (VK_CTRL, false),
            (VK_ESC, false),
            (VK_ESC, true),
            (VK_CTRL, true),
            (VK_SHIFT, true),
        ]
    );
}

#[test]
fn test_block_rule_beats_mapping_and_emits_nothing() {
    let registry = Arc::new(RuleRegistry::new());
    registry.add_mapping("ctrl+a", "escape", "").expect("add");
    registry.block_key("ctrl+a", "").expect("block");

    let (context, injector) = pipeline(Arc::clone(&registry));
    let mut state = InterceptState::new();

    assert!(!context.handle_event(&mut state, VK_CTRL, true), "bare ctrl passes");
    assert!(context.handle_event(&mut state, VK_A, true), "chord suppressed");
    assert!(context.handle_event(&mut state, VK_A, false), "release suppressed");

    assert!(injector.recorded().is_empty(), "blocked chord must emit nothing");
}

#[test]
fn test_disabled_chord_rule_falls_back_to_bare_key_rule() {
    let registry = Arc::new(RuleRegistry::new());
    registry.add_mapping("a", "b", "").expect("add");
    registry.block_key("ctrl+a", "").expect("block");
    registry.toggle_blocked_key("ctrl+a");

    let (context, injector) = pipeline(Arc::clone(&registry));
    let mut state = InterceptState::new();

    context.handle_event(&mut state, VK_CTRL, true);
    assert!(context.handle_event(&mut state, VK_A, true));

    assert_eq!(injector.recorded(), vec![(0x42, false)], "the a→b mapping fires");
}

#[test]
fn test_unmapped_traffic_flows_through_without_emission() {
    let registry = Arc::new(RuleRegistry::new());
    registry.add_mapping("f13", "f14", "").expect("add");

    let (context, injector) = pipeline(Arc::clone(&registry));
    let mut state = InterceptState::new();

    for vk in [VK_A, 0x42, 0x20, VK_SHIFT] {
        assert!(!context.handle_event(&mut state, vk, true));
        assert!(!context.handle_event(&mut state, vk, false));
    }
    assert!(injector.recorded().is_empty());
}

#[test]
fn test_self_injection_filter_prevents_feedback_loops() {
    // A mapping whose target is also a configured source would loop forever
    // if the hook resolved its own output. The filter runs before
    // resolution, so a sentinel-tagged event is never matched.
    let registry = Arc::new(RuleRegistry::new());
    registry.add_mapping("a", "b", "").expect("add");
    registry.add_mapping("b", "a", "").expect("add");

    let (context, injector) = pipeline(Arc::clone(&registry));
    let mut state = InterceptState::new();

    // Hardware event for `a` rewrites to `b`.
    assert!(context.handle_event(&mut state, VK_A, true));
    assert_eq!(injector.recorded(), vec![(0x42, false)]);

    // The injected `b` re-enters the hook tagged with the sentinel; the
    // filter drops it before the pipeline is ever consulted, even though
    // `b` is itself a mapping source.
    assert!(intercept::is_own_injection(true, INJECTION_SENTINEL));
    assert_eq!(injector.recorded().len(), 1, "no further emission for own output");

    // An untagged `b` from real hardware, by contrast, resolves normally.
    assert!(!intercept::is_own_injection(false, 0));
    assert!(context.handle_event(&mut state, 0x42, true));
    assert_eq!(injector.recorded(), vec![(0x42, false), (VK_A, false)]);
}

#[test]
fn test_live_rule_edits_take_effect_mid_session() {
    let registry = Arc::new(RuleRegistry::new());
    registry.add_mapping("capslock", "escape", "").expect("add");

    let (context, injector) = pipeline(Arc::clone(&registry));
    let mut state = InterceptState::new();

    assert!(context.handle_event(&mut state, VK_CAPS, true));
    assert!(context.handle_event(&mut state, VK_CAPS, false));

    // Control thread disables the rule between events.
    registry.toggle_mapping("capslock");

    assert!(!context.handle_event(&mut state, VK_CAPS, true), "disabled rule passes through");
    assert_eq!(injector.recorded(), vec![(VK_ESC, false), (VK_ESC, true)]);
}

// ── Engine facade persistence ─────────────────────────────────────────────────

fn temp_rules_path(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("keyremap_engine_{}_{tag}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir.join("key_remap_config.json")
}

#[test]
fn test_engine_save_and_load_config_round_trip() {
    let path = temp_rules_path("roundtrip");

    let engine = RemapEngine::with_injector(Arc::new(RecordingInjector::new()));
    engine.add_mapping("capslock", "escape", "vim").expect("add");
    engine.block_key("win+shift+f23", "").expect("block");
    engine.toggle_blocked_key("win+shift+f23");
    engine.save_config(Some(&path)).expect("save");

    let restored = RemapEngine::with_injector(Arc::new(RecordingInjector::new()));
    restored.load_config(Some(&path)).expect("load");

    assert_eq!(engine.list_mappings(), restored.list_mappings());
    assert_eq!(engine.list_blocked_keys(), restored.list_blocked_keys());
    assert!(!restored.list_blocked_keys()[0].enabled);

    std::fs::remove_dir_all(path.parent().unwrap()).ok();
}

#[test]
fn test_engine_load_of_malformed_file_keeps_existing_rules() {
    let path = temp_rules_path("malformed");
    std::fs::write(&path, "not json at all").expect("write");

    let engine = RemapEngine::with_injector(Arc::new(RecordingInjector::new()));
    engine.add_mapping("capslock", "escape", "").expect("add");

    assert!(engine.load_config(Some(&path)).is_err());
    assert_eq!(engine.list_mappings().len(), 1, "registry untouched after bad load");

    std::fs::remove_dir_all(path.parent().unwrap()).ok();
}

#[test]
fn test_loaded_rules_drive_the_pipeline() {
    let path = temp_rules_path("pipeline");
    std::fs::write(
        &path,
        r#"{
            "mappings": [
                { "source": "ctrl+a", "target": "ctrl+c", "enabled": true, "description": "" }
            ],
            "blocked_keys": []
        }"#,
    )
    .expect("write");

    let engine = RemapEngine::with_injector(Arc::new(RecordingInjector::new()));
    engine.load_config(Some(&path)).expect("load");

    let (context, injector) = pipeline(Arc::clone(engine.registry()));
    let mut state = InterceptState::new();

    context.handle_event(&mut state, VK_CTRL, true);
    assert!(context.handle_event(&mut state, VK_A, true));

    // ctrl+c pressed in canonical order.
    assert_eq!(injector.recorded(), vec![(VK_CTRL, false), (0x43, false)]);

    std::fs::remove_dir_all(path.parent().unwrap()).ok();
}
