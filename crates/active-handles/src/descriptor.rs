//! Resolved, user-facing records for pending callbacks

use crate::callback::CallbackRef;
use crate::handle::HandleId;
use serde::Serialize;
use std::fmt;

/// Name reported when nothing better can be inferred.
pub const UNKNOWN_FUNCTION_NAME: &str = "__unknown_function_name__";

/// What kind of pending operation a callback belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HandleKind {
    /// Fires once after a delay
    OneShotTimer,
    /// Fires every interval
    RepeatingTimer,
    /// Server socket accepting connections
    InboundConnectionAccept,
    /// Connected socket waiting for data
    InboundConnectionRead,
    /// Anything else
    Unclassified,
}

impl HandleKind {
    /// Short label used by reports
    pub fn label(self) -> &'static str {
        match self {
            HandleKind::OneShotTimer => "setTimeout",
            HandleKind::RepeatingTimer => "setInterval",
            HandleKind::InboundConnectionAccept => "net connection",
            HandleKind::InboundConnectionRead => "net client connection",
            HandleKind::Unclassified => "unknown type",
        }
    }

    /// True for both timer kinds
    pub fn is_timer(self) -> bool {
        matches!(self, HandleKind::OneShotTimer | HandleKind::RepeatingTimer)
    }
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a callback was registered. Lines are one-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Full path of the defining file
    pub file: String,
    /// One-based line
    pub line: u32,
    /// Column
    pub column: u32,
    /// Name used when the declaration is anonymous
    pub inferred_name: Option<String>,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Diagnostic record for one pending callback.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    /// The callback itself (serialized as its id)
    pub callback: CallbackRef,
    /// Never empty
    pub name: String,
    /// True when the callback has no declared name
    pub anonymous: bool,
    /// Registration location, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Raw source text, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
    /// Highlighted source text, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlighted: Option<String>,
    /// Classification
    pub kind: HandleKind,
    /// Configured delay, present for timer kinds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_millis: Option<u64>,
    /// Socket descriptor number, when one is open
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_descriptor: Option<i32>,
    /// Originating handle, only when asked for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle_ref: Option<HandleId>,
}
