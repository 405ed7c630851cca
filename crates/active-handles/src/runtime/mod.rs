//! Single-threaded host runtime
//!
//! Models the event loop of a live process: timer queues grouped by duration
//! and socket handles with callback-bearing I/O objects. It is the handle
//! source the probe inspects, through [`HostView`].

mod net;
mod timers;

pub use timers::TimerId;

use crate::error::ProbeResult;
use crate::handle::{Handle, HandleId, HostView, IoObject, NodeId, TimerNode};
use crate::shim::{self, LEGACY_INTERVAL_THRESHOLD};
use semver::Version;
use std::collections::BTreeMap;
use timers::TimerQueue;

/// Version reported by [`Runtime::new`]
pub const RUNTIME_VERSION: Version = Version::new(4, 2, 0);

/// First descriptor number handed to sockets
pub const FIRST_SOCKET_FD: i32 = 10;

/// Event loop model owning every live handle.
pub struct Runtime {
    version: String,
    legacy_intervals: bool,
    clock: u64,
    next_handle: u64,
    next_fd: i32,
    handles: BTreeMap<HandleId, Handle>,
    timers: TimerQueue,
}

impl Runtime {
    /// Runtime at [`RUNTIME_VERSION`]
    pub fn new() -> Self {
        Self::build(format!("v{}", RUNTIME_VERSION), false)
    }

    /// Runtime reporting `version`, e.g. `v0.10.40`.
    ///
    /// Versions below the legacy threshold register intervals through an
    /// internal wrapper.
    pub fn with_version(version: &str) -> ProbeResult<Self> {
        let parsed = shim::parse_runtime_version(version)?;
        let legacy = parsed < LEGACY_INTERVAL_THRESHOLD;
        Ok(Self::build(version.to_string(), legacy))
    }

    fn build(version: String, legacy_intervals: bool) -> Self {
        Self {
            version,
            legacy_intervals,
            clock: 0,
            next_handle: 1,
            next_fd: FIRST_SOCKET_FD,
            handles: BTreeMap::new(),
            timers: TimerQueue::new(),
        }
    }

    /// Version string of this runtime
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Current loop time in milliseconds
    pub fn now(&self) -> u64 {
        self.clock
    }

    /// Number of live handles
    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }

    fn alloc_handle(&mut self, type_name: &str, idle_next: Option<NodeId>, io: Option<IoObject>) -> HandleId {
        let id = HandleId::new(self.next_handle);
        self.next_handle += 1;
        self.handles.insert(
            id,
            Handle {
                id,
                type_name: type_name.to_string(),
                idle_next,
                io,
            },
        );
        id
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl HostView for Runtime {
    fn active_handles(&self) -> Vec<&Handle> {
        self.handles.values().collect()
    }

    fn handle(&self, id: HandleId) -> Option<&Handle> {
        self.handles.get(&id)
    }

    fn timer_node(&self, id: NodeId) -> Option<&TimerNode> {
        self.timers.get(id)
    }
}
