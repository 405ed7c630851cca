//! Timer queues
//!
//! Timers with the same duration share one circular list threaded through a
//! sentinel head node. Each list is exposed as a single `Timer` handle whose
//! chain pointer is the sentinel, so siblings are only reachable by walking.

use super::Runtime;
use crate::callback::{CallbackRef, Origin, RegistrationMetadata};
use crate::handle::{HandleId, NodeId, RepeatSlot, TimerNode};
use crate::shim;
use rustc_hash::FxHashMap;
use tracing::trace;

/// Largest accepted delay; anything outside `1..=TIMEOUT_MAX` becomes 1.
pub const TIMEOUT_MAX: u64 = 2_147_483_647;

const TIMER_TYPE: &str = "Timer";

/// Returned by timer registration, used to cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(NodeId);

impl TimerId {
    /// Arena node backing this timer
    pub fn node(self) -> NodeId {
        self.0
    }
}

struct TimerList {
    head: NodeId,
    handle: HandleId,
}

/// Arena of timer nodes. Slots are never reused, so stale ids stay dead.
pub(crate) struct TimerQueue {
    nodes: Vec<Option<TimerNode>>,
    lists: FxHashMap<u64, TimerList>,
}

impl TimerQueue {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            lists: FxHashMap::default(),
        }
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&TimerNode> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut TimerNode> {
        self.nodes.get_mut(id.index()).and_then(Option::as_mut)
    }

    fn insert(&mut self, node: TimerNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(node));
        id
    }

    fn remove(&mut self, id: NodeId) -> Option<TimerNode> {
        self.nodes.get_mut(id.index()).and_then(Option::take)
    }

    fn new_list_head(&mut self, msecs: u64) -> NodeId {
        let id = self.insert(TimerNode::list_head(msecs));
        if let Some(head) = self.get_mut(id) {
            head.idle_next = Some(id);
            head.idle_prev = Some(id);
        }
        id
    }

    /// Link `id` at the tail of the list headed by `head`
    fn append(&mut self, head: NodeId, id: NodeId) {
        let tail = self.get(head).and_then(|h| h.idle_prev).unwrap_or(head);
        if let Some(node) = self.get_mut(id) {
            node.idle_prev = Some(tail);
            node.idle_next = Some(head);
        }
        if let Some(tail) = self.get_mut(tail) {
            tail.idle_next = Some(id);
        }
        if let Some(head) = self.get_mut(head) {
            head.idle_prev = Some(id);
        }
    }

    fn detach(&mut self, id: NodeId) {
        let Some((prev, next)) = self.get(id).map(|n| (n.idle_prev, n.idle_next)) else {
            return;
        };
        if let Some(prev_node) = prev.and_then(|p| self.get_mut(p)) {
            prev_node.idle_next = next;
        }
        if let Some(next_node) = next.and_then(|n| self.get_mut(n)) {
            next_node.idle_prev = prev;
        }
        if let Some(node) = self.get_mut(id) {
            node.idle_next = None;
            node.idle_prev = None;
        }
    }

    fn is_empty_list(&self, head: NodeId) -> bool {
        self.get(head).map_or(true, |h| h.idle_next == Some(head))
    }

    /// Earliest timer due at or before `deadline`
    fn next_due(&self, deadline: u64) -> Option<(u64, NodeId)> {
        let mut best: Option<(u64, NodeId)> = None;
        for list in self.lists.values() {
            let mut cursor = self.get(list.head).and_then(|h| h.idle_next);
            while let Some(id) = cursor {
                if id == list.head {
                    break;
                }
                let Some(node) = self.get(id) else {
                    break;
                };
                let due = node.idle_start.saturating_add(node.idle_timeout);
                if due <= deadline && best.map_or(true, |b| (due, id) < b) {
                    best = Some((due, id));
                }
                cursor = node.idle_next;
            }
        }
        best
    }

    fn timer_count(&self) -> usize {
        let live = self.nodes.iter().filter(|n| n.is_some()).count();
        live - self.lists.len()
    }
}

fn clamp_delay(msecs: u64) -> u64 {
    if (1..=TIMEOUT_MAX).contains(&msecs) {
        msecs
    } else {
        1
    }
}

/// Internal callback legacy runtimes store instead of the interval callback.
fn interval_wrapper(callback: &CallbackRef) -> CallbackRef {
    let inner = callback.clone();
    CallbackRef::new(
        move || inner.invoke(),
        RegistrationMetadata {
            declared_name: Some("wrapper".to_string()),
            inferred_name: None,
            origin: Some(Origin::here(file!(), line!(), column!())),
            source_text: Some("move || inner.invoke()".to_string()),
        },
    )
}

impl Runtime {
    /// Run `callback` once after `msecs`
    pub fn set_timeout(&mut self, callback: CallbackRef, msecs: u64) -> TimerId {
        let node = TimerNode {
            on_timeout: Some(callback),
            ..Default::default()
        };
        self.arm(node, msecs)
    }

    /// Run `callback` every `msecs`.
    ///
    /// Registration passes through the legacy capture hook, if one is installed.
    pub fn set_interval(&mut self, callback: CallbackRef, msecs: u64) -> TimerId {
        let msecs = clamp_delay(msecs);
        let mut node = if self.legacy_intervals {
            TimerNode {
                on_timeout: Some(interval_wrapper(&callback)),
                repeat: RepeatSlot::Millis(msecs),
                ..Default::default()
            }
        } else {
            TimerNode {
                on_timeout: Some(callback.clone()),
                repeat: RepeatSlot::Callback(callback.clone()),
                ..Default::default()
            }
        };
        shim::intercept_interval(&mut node, &callback);
        self.arm(node, msecs)
    }

    /// Cancel a timer. Returns false if it already fired or was cleared.
    pub fn clear_timeout(&mut self, timer: TimerId) -> bool {
        if !self.timers.get(timer.0).is_some_and(TimerNode::is_leaf) {
            return false;
        }
        self.release(timer.0);
        true
    }

    /// Cancel an interval
    pub fn clear_interval(&mut self, timer: TimerId) -> bool {
        self.clear_timeout(timer)
    }

    /// Move the clock forward, firing due timers in deadline order.
    ///
    /// One-shot timers are released after firing, intervals are re-armed at
    /// the tail of their list. Returns the number of callbacks run.
    pub fn advance(&mut self, elapsed: u64) -> usize {
        let deadline = self.clock.saturating_add(elapsed);
        let mut fired = 0;
        while let Some((due, id)) = self.timers.next_due(deadline) {
            self.clock = self.clock.max(due);
            self.fire(id);
            fired += 1;
        }
        self.clock = deadline;
        fired
    }

    /// Number of armed timers
    pub fn pending_timers(&self) -> usize {
        self.timers.timer_count()
    }

    fn arm(&mut self, mut node: TimerNode, msecs: u64) -> TimerId {
        let msecs = clamp_delay(msecs);
        node.idle_timeout = msecs;
        node.idle_start = self.clock;
        let head = self.list_head(msecs);
        let id = self.timers.insert(node);
        self.timers.append(head, id);
        trace!(node = id.0, msecs, "timer armed");
        TimerId(id)
    }

    fn list_head(&mut self, msecs: u64) -> NodeId {
        if let Some(list) = self.timers.lists.get(&msecs) {
            return list.head;
        }
        let head = self.timers.new_list_head(msecs);
        let handle = self.alloc_handle(TIMER_TYPE, Some(head), None);
        self.timers.lists.insert(msecs, TimerList { head, handle });
        head
    }

    fn fire(&mut self, id: NodeId) {
        let Some(node) = self.timers.get(id) else {
            return;
        };
        let callback = node.on_timeout.clone();
        let repeats = !matches!(node.repeat, RepeatSlot::None);
        let head = self.timers.lists.get(&node.idle_timeout).map(|l| l.head);

        match (repeats, head) {
            (true, Some(head)) => {
                self.timers.detach(id);
                let clock = self.clock;
                if let Some(node) = self.timers.get_mut(id) {
                    node.idle_start = clock;
                }
                self.timers.append(head, id);
            }
            _ => self.release(id),
        }

        if let Some(callback) = callback {
            callback.invoke();
        }
    }

    /// Unlink and free a timer node, dropping its list and handle when empty
    fn release(&mut self, id: NodeId) {
        let Some(msecs) = self.timers.get(id).map(|n| n.idle_timeout) else {
            return;
        };
        self.timers.detach(id);
        self.timers.remove(id);

        let Some(list) = self.timers.lists.get(&msecs) else {
            return;
        };
        let (head, handle) = (list.head, list.handle);
        if self.timers.is_empty_list(head) {
            self.timers.lists.remove(&msecs);
            self.timers.remove(head);
            self.handles.remove(&handle);
            trace!(msecs, %handle, "timer list dropped");
        }
    }
}
