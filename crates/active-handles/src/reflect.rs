//! Reflection over callbacks
//!
//! The probe never looks inside a callback body. It asks a [`Reflect`]
//! implementation for whatever the host knows about the callback.

use crate::callback::{CallbackRef, Origin};

/// What the host can tell about one callback. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reflection {
    /// Declared name (empty names count as absent)
    pub declared_name: Option<String>,
    /// Name inferred from the assignment context
    pub inferred_name: Option<String>,
    /// Registration coordinates, lines zero-based
    pub origin: Option<Origin>,
    /// Raw source text
    pub source: Option<String>,
}

impl Reflection {
    /// True when there is no name basis and no location at all
    pub fn is_empty(&self) -> bool {
        non_empty(&self.declared_name).is_none()
            && non_empty(&self.inferred_name).is_none()
            && self.origin.is_none()
    }
}

pub(crate) fn non_empty(name: &Option<String>) -> Option<&str> {
    name.as_deref().filter(|s| !s.is_empty())
}

/// Reflection capability supplied by the host.
pub trait Reflect {
    /// Describe a callback
    fn reflect(&self, callback: &CallbackRef) -> Reflection;
}

/// Reads the [`RegistrationMetadata`](crate::RegistrationMetadata) captured at
/// registration time.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapturedMetadata;

impl Reflect for CapturedMetadata {
    fn reflect(&self, callback: &CallbackRef) -> Reflection {
        let meta = callback.metadata();
        Reflection {
            declared_name: meta.declared_name.clone(),
            inferred_name: meta.inferred_name.clone(),
            origin: meta.origin.clone(),
            source: meta.source_text.clone(),
        }
    }
}
