//! Legacy interval capture
//!
//! Runtimes older than [`LEGACY_INTERVAL_THRESHOLD`] register intervals
//! through an internal wrapper, so the user callback is not reachable from
//! the timer node. Enabling capture installs a process-wide hook on interval
//! registration that keeps the original callback in the node's
//! `wrapped_callback` slot.
//!
//! The hook is installed at most once and is never removed.

use crate::callback::CallbackRef;
use crate::error::{ProbeError, ProbeResult};
use crate::handle::TimerNode;
use once_cell::sync::OnceCell;
use semver::Version;
use tracing::{debug, info};

/// First runtime version whose interval nodes expose their callback natively.
pub const LEGACY_INTERVAL_THRESHOLD: Version = Version::new(1, 6, 2);

/// Hook run on every interval registration
pub type IntervalHook = fn(&mut TimerNode, &CallbackRef);

static INTERVAL_HOOK: OnceCell<IntervalHook> = OnceCell::new();

/// Outcome of [`enable_legacy_interval_capture`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// Hook installed by this call
    Enabled,
    /// Hook was already installed
    AlreadyEnabled,
    /// Runtime exposes interval callbacks itself; nothing installed
    NotNeeded,
}

/// Install the interval capture hook if `host_version` needs it.
///
/// Idempotent: later calls never install a second hook.
pub fn enable_legacy_interval_capture(host_version: &str) -> CaptureState {
    if !needs_capture(host_version) {
        debug!(version = host_version, "interval callbacks exposed natively");
        return CaptureState::NotNeeded;
    }
    match INTERVAL_HOOK.set(retain_wrapped_callback) {
        Ok(()) => {
            info!(version = host_version, "legacy interval capture enabled");
            CaptureState::Enabled
        }
        Err(_) => CaptureState::AlreadyEnabled,
    }
}

/// Whether the capture hook is installed in this process
pub fn is_enabled() -> bool {
    INTERVAL_HOOK.get().is_some()
}

/// Whether a runtime of `version` hides interval callbacks.
///
/// Versions that cannot be parsed are treated as old.
pub fn needs_capture(version: &str) -> bool {
    match parse_runtime_version(version) {
        Ok(parsed) => parsed < LEGACY_INTERVAL_THRESHOLD,
        Err(err) => {
            debug!(error = %err, "assuming legacy runtime");
            true
        }
    }
}

/// Parse a runtime version such as `v1.6.2`
pub fn parse_runtime_version(version: &str) -> ProbeResult<Version> {
    let trimmed = version.trim();
    let bare = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(bare).map_err(|_| ProbeError::InvalidVersion(version.to_string()))
}

/// Interception point called by interval registration.
pub(crate) fn intercept_interval(node: &mut TimerNode, callback: &CallbackRef) {
    if let Some(hook) = INTERVAL_HOOK.get() {
        hook(node, callback);
    }
}

fn retain_wrapped_callback(node: &mut TimerNode, callback: &CallbackRef) {
    node.wrapped_callback = Some(callback.clone());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_runtime_version() {
        assert_eq!(
            parse_runtime_version("v0.10.40").unwrap(),
            Version::new(0, 10, 40)
        );
        assert_eq!(parse_runtime_version("1.6.2").unwrap(), Version::new(1, 6, 2));
        assert!(matches!(
            parse_runtime_version("v1.6"),
            Err(ProbeError::InvalidVersion(_))
        ));
    }

    #[test]
    fn test_threshold_gate() {
        assert!(needs_capture("v0.10.40"));
        assert!(needs_capture("v1.6.1"));
        assert!(!needs_capture("v1.6.2"));
        assert!(!needs_capture("v1.10.0"));
        assert!(!needs_capture("v4.2.0"));
    }

    #[test]
    fn test_unparsable_version_is_treated_as_legacy() {
        assert!(needs_capture("v1.6"));
        assert!(needs_capture("unknown"));
    }

    #[test]
    fn test_not_needed_on_new_runtime() {
        assert_eq!(
            enable_legacy_interval_capture("v4.2.0"),
            CaptureState::NotNeeded
        );
    }
}
