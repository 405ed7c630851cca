//! Active Handles
//!
//! Answers "what is this process still waiting on?" by enumerating every
//! outstanding asynchronous operation of a runtime and describing the callback
//! behind each one:
//! - pending one-shot and repeating timers, found by walking timer queues
//! - listening and connected sockets, found through their I/O objects
//!
//! Each callback is resolved once per pass into a [`Descriptor`] carrying its
//! name, registration location, kind and, optionally, its source text.
//!
//! # Example
//!
//! ```ignore
//! use active_handles::{callback, enumerate, ProbeOptions, Runtime};
//!
//! let mut rt = Runtime::new();
//! rt.set_timeout(callback!(fn timeout() { println!("done") }), 20);
//!
//! for d in enumerate(&rt, &ProbeOptions::default()) {
//!     println!("{} ({}) after {:?}ms", d.name, d.kind, d.delay_millis);
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod callback;
pub mod descriptor;
pub mod driver;
pub mod error;
pub mod handle;
pub mod highlight;
pub mod inspector;
pub mod options;
pub mod reflect;
pub mod registry;
pub mod resolver;
pub mod runtime;
pub mod shim;
pub mod walker;

pub use callback::{CallbackId, CallbackRef, Origin, RegistrationMetadata};
pub use descriptor::{Descriptor, HandleKind, Location, UNKNOWN_FUNCTION_NAME};
pub use driver::{enumerate, Probe};
pub use error::{ProbeError, ProbeResult};
pub use handle::{
    FieldValue, Handle, HandleId, HostView, IoField, IoObject, NodeId, RepeatSlot, TimerNode,
};
pub use highlight::{Highlight, Passthrough};
pub use options::ProbeOptions;
pub use reflect::{CapturedMetadata, Reflect, Reflection};
pub use registry::DedupRegistry;
pub use runtime::{Runtime, TimerId};
pub use shim::{enable_legacy_interval_capture, CaptureState};
