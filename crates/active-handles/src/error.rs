//! Error types for the handle probe

use crate::callback::CallbackId;
use crate::handle::HandleId;

/// Result type for probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Probe error types.
///
/// Enumeration never fails as a whole: the driver turns these into skipped
/// handles or sentinel values and logs them. Only configuration parsing and
/// runtime construction hand them back to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// Reflection produced neither a name basis nor a location
    #[error("Unresolved callback: #{0}")]
    UnresolvedCallback(CallbackId),

    /// Handle has a shape the inspector cannot interpret
    #[error("Malformed {type_name} handle {handle}: {reason}")]
    MalformedHandle {
        /// Offending handle
        handle: HandleId,
        /// Host type name of the handle
        type_name: String,
        /// What was wrong with it
        reason: String,
    },

    /// Handle id requested by an override is not live
    #[error("Unknown handle: {0}")]
    UnknownHandle(HandleId),

    /// Runtime version string could not be parsed
    #[error("Invalid runtime version: {0}")]
    InvalidVersion(String),

    /// Options could not be decoded
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}
