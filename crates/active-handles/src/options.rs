//! Probe configuration

use crate::error::ProbeResult;
use crate::handle::HandleId;
use serde::{Deserialize, Serialize};

/// Options for one enumeration pass.
///
/// Missing keys take their defaults, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProbeOptions {
    /// Attach raw source text
    pub include_source: bool,
    /// Attach highlighted source text
    pub include_highlighted: bool,
    /// Attach the id of the originating handle
    pub attach_handle_ref: bool,
    /// Inspect these handles instead of every live one
    pub handles: Option<Vec<HandleId>>,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            include_source: true,
            include_highlighted: true,
            attach_handle_ref: false,
            handles: None,
        }
    }
}

impl ProbeOptions {
    /// Decode options from JSON
    pub fn from_json(json: &str) -> ProbeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builder: toggle raw source text
    pub fn with_source(mut self, include: bool) -> Self {
        self.include_source = include;
        self
    }

    /// Builder: toggle highlighted source text
    pub fn with_highlighted(mut self, include: bool) -> Self {
        self.include_highlighted = include;
        self
    }

    /// Builder: toggle the handle back-reference
    pub fn with_handle_ref(mut self, attach: bool) -> Self {
        self.attach_handle_ref = attach;
        self
    }

    /// Builder: restrict the pass to explicit handles
    pub fn with_handles(mut self, handles: Vec<HandleId>) -> Self {
        self.handles = Some(handles);
        self
    }

    /// Whether the resolver needs source text at all
    pub(crate) fn wants_source(&self) -> bool {
        self.include_source || self.include_highlighted
    }
}
