//! Identity set of callbacks already resolved in one pass

use crate::callback::{CallbackId, CallbackRef};
use rustc_hash::FxHashSet;

/// Tracks which callbacks have been resolved during one enumeration pass.
///
/// Keyed by identity: distinct callbacks with identical source are separate
/// entries. A fresh registry is created for every pass.
#[derive(Debug, Default)]
pub struct DedupRegistry {
    seen: FxHashSet<CallbackId>,
}

impl DedupRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `callback` was already resolved this pass
    pub fn seen(&self, callback: &CallbackRef) -> bool {
        self.seen.contains(&callback.id())
    }

    /// Record `callback` as resolved
    pub fn mark_seen(&mut self, callback: &CallbackRef) {
        self.seen.insert(callback.id());
    }

    /// Number of distinct callbacks recorded
    pub(crate) fn len(&self) -> usize {
        self.seen.len()
    }
}
