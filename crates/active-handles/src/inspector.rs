//! Socket-handle inspector

use crate::descriptor::{Descriptor, HandleKind};
use crate::driver::Pass;
use crate::error::{ProbeError, ProbeResult};
use crate::handle::{FieldValue, Handle};
use rustc_hash::FxHashSet;

/// Field holding the accept callback of a listening socket
pub const ACCEPT_FIELD: &str = "onconnection";

/// Field holding the read callback of a connected socket
pub const READ_FIELD: &str = "onread";

/// Classify a callback-bearing field by name.
pub fn classify(field: &str) -> HandleKind {
    match field {
        ACCEPT_FIELD => HandleKind::InboundConnectionAccept,
        READ_FIELD => HandleKind::InboundConnectionRead,
        _ => HandleKind::Unclassified,
    }
}

/// Describe the callbacks stored on a handle's I/O object.
///
/// Kind and descriptor number are only attached when the I/O object has an
/// open descriptor. Handles without an I/O object yield nothing.
pub fn inspect(handle: &Handle, pass: &mut Pass<'_>) -> ProbeResult<Vec<Descriptor>> {
    let Some(io) = &handle.io else {
        return Ok(Vec::new());
    };

    let mut names = FxHashSet::default();
    for field in &io.fields {
        if field.name.is_empty() {
            return Err(ProbeError::MalformedHandle {
                handle: handle.id,
                type_name: handle.type_name.clone(),
                reason: "unnamed I/O field".to_string(),
            });
        }
        if !names.insert(field.name.as_str()) {
            return Err(ProbeError::MalformedHandle {
                handle: handle.id,
                type_name: handle.type_name.clone(),
                reason: format!("duplicate I/O field `{}`", field.name),
            });
        }
    }

    let fd = io.concrete_fd();
    let mut descriptors = Vec::new();
    for field in &io.fields {
        let FieldValue::Callback(callback) = &field.value else {
            continue;
        };
        let Some(mut descriptor) = pass.describe(callback, handle) else {
            continue;
        };
        if let Some(fd) = fd {
            descriptor.file_descriptor = Some(fd);
            descriptor.kind = classify(&field.name);
        }
        descriptors.push(descriptor);
    }

    Ok(descriptors)
}
