//! Handle data model
//!
//! Handles and timer-queue nodes live in host-owned arenas and refer to each
//! other by stable integer ids. The probe only ever borrows them.

use crate::callback::CallbackRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable id of a live handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandleId(u64);

impl HandleId {
    /// Wrap a raw id
    pub const fn new(raw: u64) -> Self {
        HandleId(raw)
    }

    /// Raw numeric id
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle#{}", self.0)
    }
}

/// Index of a node in the host's timer arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Arena slot index
    pub fn index(self) -> usize {
        self.0
    }
}

/// Repeat slot of a timer node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RepeatSlot {
    /// One-shot timer
    #[default]
    None,
    /// Repeats after this many milliseconds; callback lives elsewhere
    Millis(u64),
    /// Repeats, and the slot references the user callback
    Callback(CallbackRef),
}

impl RepeatSlot {
    /// The callback held by the slot, if it holds one
    pub fn callback(&self) -> Option<&CallbackRef> {
        match self {
            RepeatSlot::Callback(cb) => Some(cb),
            _ => None,
        }
    }
}

/// One link of a timer queue. List heads are nodes without callbacks.
#[derive(Debug, Clone, Default)]
pub struct TimerNode {
    /// Next link in the queue
    pub idle_next: Option<NodeId>,
    /// Previous link in the queue
    pub idle_prev: Option<NodeId>,
    /// Configured delay or interval in milliseconds
    pub idle_timeout: u64,
    /// Clock value when the node was (re)armed
    pub idle_start: u64,
    /// Callback run when the timer fires
    pub on_timeout: Option<CallbackRef>,
    /// Repeat configuration
    pub repeat: RepeatSlot,
    /// Original interval callback retained by the legacy shim
    pub wrapped_callback: Option<CallbackRef>,
}

impl TimerNode {
    /// Sentinel head for a list of timers sharing `msecs`
    pub fn list_head(msecs: u64) -> Self {
        TimerNode {
            idle_timeout: msecs,
            ..Default::default()
        }
    }

    /// True if the node carries any callback slot
    pub fn is_leaf(&self) -> bool {
        self.repeat.callback().is_some()
            || self.wrapped_callback.is_some()
            || self.on_timeout.is_some()
    }
}

/// Value of one field of an I/O object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A callback
    Callback(CallbackRef),
    /// A boolean flag
    Flag(bool),
    /// A number
    Number(i64),
    /// Nothing
    Null,
}

/// Named field of an I/O object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoField {
    /// Field name, e.g. `onconnection` or `onread`
    pub name: String,
    /// Field value
    pub value: FieldValue,
}

impl IoField {
    /// Callback-bearing field
    pub fn callback(name: &str, callback: CallbackRef) -> Self {
        IoField {
            name: name.to_string(),
            value: FieldValue::Callback(callback),
        }
    }

    /// Field holding some other value
    pub fn value(name: &str, value: FieldValue) -> Self {
        IoField {
            name: name.to_string(),
            value,
        }
    }
}

/// Underlying I/O object of a socket handle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IoObject {
    /// Descriptor number; negative values mean closed
    pub fd: Option<i32>,
    /// Fields in declaration order
    pub fields: Vec<IoField>,
}

impl IoObject {
    /// Descriptor number if it refers to an open descriptor
    pub fn concrete_fd(&self) -> Option<i32> {
        self.fd.filter(|fd| *fd >= 0)
    }
}

/// An outstanding asynchronous operation owned by the host.
#[derive(Debug, Clone)]
pub struct Handle {
    /// Stable id
    pub id: HandleId,
    /// Host type name, e.g. `Timer` or `TCP`
    pub type_name: String,
    /// Head of the timer chain reachable from this handle
    pub idle_next: Option<NodeId>,
    /// Underlying I/O object for sockets
    pub io: Option<IoObject>,
}

/// Read-only view of a host runtime.
///
/// `Runtime` is the in-crate implementation; anything else that keeps handles
/// in id-addressed arenas can implement this too.
pub trait HostView {
    /// Every live handle, in creation order
    fn active_handles(&self) -> Vec<&Handle>;

    /// Look up a handle by id
    fn handle(&self, id: HandleId) -> Option<&Handle>;

    /// Look up a timer node; `None` if it was freed
    fn timer_node(&self, id: NodeId) -> Option<&TimerNode>;
}
