//! Turns a callback reference into a [`Descriptor`]

use crate::callback::CallbackRef;
use crate::descriptor::{Descriptor, HandleKind, Location, UNKNOWN_FUNCTION_NAME};
use crate::error::ProbeError;
use crate::highlight::Highlight;
use crate::options::ProbeOptions;
use crate::reflect::{non_empty, Reflect};
use tracing::debug;

/// Resolves callbacks through a reflection capability and a highlighter.
///
/// Resolution never fails. Missing names become [`UNKNOWN_FUNCTION_NAME`],
/// missing locations are omitted.
pub struct Resolver<'a> {
    reflect: &'a dyn Reflect,
    highlighter: &'a dyn Highlight,
}

impl<'a> Resolver<'a> {
    /// Create a resolver
    pub fn new(reflect: &'a dyn Reflect, highlighter: &'a dyn Highlight) -> Self {
        Self {
            reflect,
            highlighter,
        }
    }

    /// Describe `callback`. Kind, delay and descriptor number are left for
    /// the caller to fill in.
    pub fn resolve(&self, callback: &CallbackRef, options: &ProbeOptions) -> Descriptor {
        let reflection = self.reflect.reflect(callback);
        if reflection.is_empty() {
            let err = ProbeError::UnresolvedCallback(callback.id());
            debug!(error = %err, "using unknown function name");
        }

        let inferred = non_empty(&reflection.inferred_name).map(str::to_string);
        let (name, anonymous) = match non_empty(&reflection.declared_name) {
            Some(declared) => (declared.to_string(), false),
            None => (
                inferred
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_FUNCTION_NAME.to_string()),
                true,
            ),
        };

        // reflection lines are zero-based
        let location = reflection.origin.map(|origin| Location {
            file: origin.file,
            line: origin.line.saturating_add(1),
            column: origin.column,
            inferred_name: inferred,
        });

        let source = if options.wants_source() {
            reflection.source
        } else {
            None
        };
        let highlighted = match (&source, options.include_highlighted) {
            (Some(src), true) => Some(
                self.highlighter
                    .highlight(&parsable_source(&name, anonymous, src)),
            ),
            _ => None,
        };
        let source_text = if options.include_source { source } else { None };

        Descriptor {
            callback: callback.clone(),
            name,
            anonymous,
            location,
            source_text,
            highlighted,
            kind: HandleKind::Unclassified,
            delay_millis: None,
            file_descriptor: None,
            handle_ref: None,
        }
    }
}

/// Source handed to the highlighter.
///
/// A bare anonymous function is not a statement on its own, `name = <fn>` is,
/// so anonymous sources are prefixed with their reported name.
pub fn parsable_source(name: &str, anonymous: bool, source: &str) -> String {
    if anonymous {
        format!("{} = {}", name, source)
    } else {
        source.to_string()
    }
}
