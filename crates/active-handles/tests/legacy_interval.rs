//! Legacy interval capture
//!
//! The capture hook is process-wide, so these tests live in their own binary.

use active_handles::{
    callback, enable_legacy_interval_capture, enumerate, shim, CaptureState, HandleKind,
    HostView, ProbeOptions, Runtime, UNKNOWN_FUNCTION_NAME,
};

const LEGACY_VERSION: &str = "v0.10.40";
const TIMEOUT: u64 = 20;

fn legacy_runtime() -> Runtime {
    // enabling is idempotent, so every test can ask for it
    let state = enable_legacy_interval_capture(LEGACY_VERSION);
    assert_ne!(state, CaptureState::NotNeeded);
    assert!(shim::is_enabled());
    Runtime::with_version(LEGACY_VERSION).unwrap()
}

fn timeout() {}

#[test]
fn test_enable_is_idempotent() {
    legacy_runtime();
    assert_eq!(
        enable_legacy_interval_capture(LEGACY_VERSION),
        CaptureState::AlreadyEnabled
    );
    assert_eq!(
        enable_legacy_interval_capture("v1.6"),
        CaptureState::AlreadyEnabled
    );
}

#[test]
fn test_anonymous_interval_found() {
    let mut rt = legacy_runtime();
    rt.set_interval(callback!(|| { /* name your callbacks */ }), TIMEOUT);

    let found = enumerate(&rt, &ProbeOptions::default());
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, HandleKind::RepeatingTimer);
    assert!(found[0].anonymous);
    assert_eq!(found[0].name, UNKNOWN_FUNCTION_NAME);
    assert_eq!(found[0].delay_millis, Some(TIMEOUT));
}

#[test]
fn test_named_interval_found() {
    let mut rt = legacy_runtime();
    let cb = callback!(timeout);
    let iv = rt.set_interval(cb.clone(), TIMEOUT);

    let node = rt.timer_node(iv.node()).unwrap();
    assert_eq!(node.wrapped_callback.as_ref(), Some(&cb));

    let found = enumerate(&rt, &ProbeOptions::default());
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "timeout");
    assert_eq!(found[0].callback, cb);
    assert_eq!(found[0].kind, HandleKind::RepeatingTimer);
}

#[test]
fn test_captured_interval_still_fires() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let mut rt = legacy_runtime();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    rt.set_interval(
        callback!(tick = move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
        TIMEOUT,
    );

    assert_eq!(rt.advance(TIMEOUT * 2), 2);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert_eq!(enumerate(&rt, &ProbeOptions::default()).len(), 1);
}

#[test]
fn test_timeouts_unaffected() {
    let mut rt = legacy_runtime();
    rt.set_timeout(callback!(timeout), TIMEOUT);

    let found = enumerate(&rt, &ProbeOptions::default());
    assert_eq!(found[0].kind, HandleKind::OneShotTimer);
}
