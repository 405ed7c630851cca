//! Reporter output

use active_handles::{callback, CallbackRef, Probe, ProbeOptions, Runtime};
use active_handles_report::{render, to_json, AnsiHighlighter};
use termcolor::NoColor;

fn timeout() {}

fn on_connection() {}

fn same_site() -> CallbackRef {
    callback!(|| {})
}

fn rendered(rt: &Runtime, highlight: bool) -> String {
    let highlighter = AnsiHighlighter::plain();
    let descriptors = Probe::new(rt)
        .with_highlighter(&highlighter)
        .enumerate(&ProbeOptions::default().with_source(false));
    let mut out = NoColor::new(Vec::new());
    render(&descriptors, highlight, &mut out).unwrap();
    String::from_utf8(out.into_inner()).unwrap()
}

#[test]
fn test_block_header() {
    let mut rt = Runtime::new();
    let line = line!() + 1;
    rt.set_timeout(callback!(timeout), 20);

    let out = rendered(&rt, false);
    let header = out.lines().nth(1).unwrap();
    assert!(header.starts_with("timeout: "));
    assert!(header.contains(&format!("report.rs:{}:", line)));
    assert!(header.ends_with("(setTimeout)"));
}

#[test]
fn test_socket_block_shows_descriptor() {
    let mut rt = Runtime::new();
    rt.listen(callback!(on_connection));

    let out = rendered(&rt, false);
    assert!(out.contains("(net connection, fd = 10)"));
}

#[test]
fn test_unknown_location() {
    let mut rt = Runtime::new();
    rt.set_timeout(CallbackRef::bare(|| {}), 20);

    let out = rendered(&rt, true);
    assert!(out.contains("__unknown_function_name__: Unknown location (setTimeout)"));
}

#[test]
fn test_repeated_location_is_counted() {
    let mut rt = Runtime::new();
    rt.set_timeout(same_site(), 20);
    rt.set_timeout(same_site(), 20);
    rt.set_timeout(same_site(), 20);

    let out = rendered(&rt, true);
    assert_eq!(out.matches("1: __unknown_function_name__ = ").count(), 1);
    assert!(out.contains("Count: 2. Source printed above"));
    assert!(out.contains("Count: 3. Source printed above"));
}

#[test]
fn test_no_source_without_highlight() {
    let mut rt = Runtime::new();
    rt.set_timeout(callback!(tick = || {}), 20);

    let out = rendered(&rt, false);
    assert!(!out.contains("tick = "));
}

#[test]
fn test_json_rendering() {
    let mut rt = Runtime::new();
    let cb = callback!(timeout);
    rt.set_timeout(cb.clone(), 20);

    let descriptors = Probe::new(&rt).enumerate(
        &ProbeOptions::default()
            .with_source(false)
            .with_highlighted(false),
    );
    let json: serde_json::Value = serde_json::from_str(&to_json(&descriptors).unwrap()).unwrap();
    let first = &json[0];
    assert_eq!(first["name"], "timeout");
    assert_eq!(first["kind"], "oneShotTimer");
    assert_eq!(first["delayMillis"], 20);
    assert_eq!(first["callback"], cb.id().as_u64());
    assert!(first.get("sourceText").is_none());
    assert!(first.get("fileDescriptor").is_none());
}
