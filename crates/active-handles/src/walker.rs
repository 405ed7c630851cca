//! Timer-chain walker
//!
//! Timers sharing a duration live in one linked queue and a root handle only
//! exposes its head, so every sibling has to be found by following the links.

use crate::callback::CallbackRef;
use crate::descriptor::{Descriptor, HandleKind};
use crate::driver::Pass;
use crate::handle::{Handle, HostView, TimerNode};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

/// Callback a timer node effectively runs, with its classification.
///
/// Checked in order: repeat slot holding a callback, shim-retained wrapped
/// callback, one-shot timeout slot. Nodes with none of these (list heads) yield
/// `None`.
pub fn effective_callback(node: &TimerNode) -> Option<(&CallbackRef, HandleKind)> {
    if let Some(callback) = node.repeat.callback() {
        return Some((callback, HandleKind::RepeatingTimer));
    }
    if let Some(callback) = &node.wrapped_callback {
        return Some((callback, HandleKind::RepeatingTimer));
    }
    node.on_timeout
        .as_ref()
        .map(|callback| (callback, HandleKind::OneShotTimer))
}

/// Walk the timer chain reachable from `handle`.
///
/// Stops at the end of the chain, at the first node already visited (queues
/// are circular, and a corrupted one may loop anywhere), or at a node the host
/// freed while the walk was running.
pub fn walk<H>(host: &H, handle: &Handle, pass: &mut Pass<'_>) -> Vec<Descriptor>
where
    H: HostView + ?Sized,
{
    let mut descriptors = Vec::new();
    let mut visited = FxHashSet::default();
    let mut next = handle.idle_next;

    while let Some(id) = next {
        if !visited.insert(id) {
            trace!(handle = %handle.id, node = id.0, "timer chain closed");
            break;
        }
        let Some(node) = host.timer_node(id) else {
            debug!(handle = %handle.id, node = id.0, "timer node vanished during walk");
            break;
        };
        next = node.idle_next;

        let Some((callback, kind)) = effective_callback(node) else {
            continue;
        };
        if let Some(mut descriptor) = pass.describe(callback, handle) {
            descriptor.kind = kind;
            descriptor.delay_millis = Some(node.idle_timeout);
            descriptors.push(descriptor);
        }
    }

    descriptors
}
