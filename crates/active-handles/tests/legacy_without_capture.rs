//! Legacy runtime without the capture hook
//!
//! Intervals are only visible through the runtime's internal wrapper.

use active_handles::{callback, enumerate, shim, HandleKind, ProbeOptions, Runtime};

#[test]
fn test_interval_reported_through_wrapper() {
    assert!(!shim::is_enabled());
    let mut rt = Runtime::with_version("v0.10.40").unwrap();
    rt.set_interval(callback!(tick = || {}), 20);

    let found = enumerate(&rt, &ProbeOptions::default());
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "wrapper");
    assert_eq!(found[0].kind, HandleKind::OneShotTimer);
    assert_eq!(found[0].delay_millis, Some(20));
}

#[test]
fn test_invalid_runtime_version() {
    assert!(Runtime::with_version("ancient").is_err());
}
