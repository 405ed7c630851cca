//! Enumeration driver

use crate::callback::CallbackRef;
use crate::descriptor::Descriptor;
use crate::error::ProbeError;
use crate::handle::{Handle, HostView};
use crate::highlight::{Highlight, Passthrough};
use crate::inspector;
use crate::options::ProbeOptions;
use crate::reflect::{CapturedMetadata, Reflect};
use crate::registry::DedupRegistry;
use crate::resolver::Resolver;
use crate::walker;
use tracing::{debug, trace, warn};

/// State of one enumeration pass.
pub struct Pass<'a> {
    resolver: Resolver<'a>,
    registry: DedupRegistry,
    options: &'a ProbeOptions,
}

impl<'a> Pass<'a> {
    /// Start a pass with an empty dedup registry
    pub fn new(resolver: Resolver<'a>, options: &'a ProbeOptions) -> Self {
        Self {
            resolver,
            registry: DedupRegistry::new(),
            options,
        }
    }

    /// Resolve `callback` unless this pass already did.
    pub fn describe(&mut self, callback: &CallbackRef, handle: &Handle) -> Option<Descriptor> {
        if self.registry.seen(callback) {
            trace!(
                callback = %callback.id(),
                handle = %handle.id,
                handle_type = %handle.type_name,
                "callback already described"
            );
            return None;
        }
        self.registry.mark_seen(callback);

        let mut descriptor = self.resolver.resolve(callback, self.options);
        if self.options.attach_handle_ref {
            descriptor.handle_ref = Some(handle.id);
        }
        Some(descriptor)
    }
}

/// Enumerates the pending callbacks of a host.
pub struct Probe<'a, H: HostView + ?Sized> {
    host: &'a H,
    reflect: &'a dyn Reflect,
    highlighter: &'a dyn Highlight,
}

impl<'a, H: HostView + ?Sized> Probe<'a, H> {
    /// Probe `host` using captured registration metadata and no highlighting
    pub fn new(host: &'a H) -> Self {
        Self {
            host,
            reflect: &CapturedMetadata,
            highlighter: &Passthrough,
        }
    }

    /// Replace the reflection capability
    pub fn with_reflect(mut self, reflect: &'a dyn Reflect) -> Self {
        self.reflect = reflect;
        self
    }

    /// Replace the highlighter
    pub fn with_highlighter(mut self, highlighter: &'a dyn Highlight) -> Self {
        self.highlighter = highlighter;
        self
    }

    /// Describe every pending callback.
    ///
    /// Uses `options.handles` when given, otherwise every live handle of the
    /// host. Ids that are no longer live are skipped.
    pub fn enumerate(&self, options: &ProbeOptions) -> Vec<Descriptor> {
        let handles: Vec<&Handle> = match &options.handles {
            Some(ids) => ids
                .iter()
                .filter_map(|id| {
                    let handle = self.host.handle(*id);
                    if handle.is_none() {
                        warn!(error = %ProbeError::UnknownHandle(*id), "skipping handle");
                    }
                    handle
                })
                .collect(),
            None => self.host.active_handles(),
        };
        self.enumerate_handles(&handles, options)
    }

    /// Describe the pending callbacks of explicit handles.
    ///
    /// Results follow input order; per handle, timer-chain results come
    /// before socket results.
    pub fn enumerate_handles(&self, handles: &[&Handle], options: &ProbeOptions) -> Vec<Descriptor> {
        if handles.is_empty() {
            return Vec::new();
        }

        let mut pass = Pass::new(Resolver::new(self.reflect, self.highlighter), options);
        let mut descriptors = Vec::new();
        for handle in handles {
            descriptors.extend(walker::walk(self.host, handle, &mut pass));
            match inspector::inspect(handle, &mut pass) {
                Ok(found) => descriptors.extend(found),
                Err(err) => warn!(handle = %handle.id, error = %err, "skipping socket fields"),
            }
        }

        debug!(
            handles = handles.len(),
            callbacks = pass.registry.len(),
            descriptors = descriptors.len(),
            "enumeration pass complete"
        );
        descriptors
    }
}

/// Describe every pending callback of `host` with default collaborators.
pub fn enumerate<H: HostView + ?Sized>(host: &H, options: &ProbeOptions) -> Vec<Descriptor> {
    Probe::new(host).enumerate(options)
}
