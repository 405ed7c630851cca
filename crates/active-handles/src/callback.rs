//! Callback references and the metadata captured where they are registered
//!
//! Rust closures carry no name or source location at runtime, so the
//! information a probe needs is recorded when the callback is created, usually
//! through the [`callback!`](crate::callback!) macro.

use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_CALLBACK_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a registered callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CallbackId(u64);

impl CallbackId {
    fn next() -> Self {
        CallbackId(NEXT_CALLBACK_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric id
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a callback was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    /// Source file path
    pub file: String,
    /// Zero-based line
    pub line: u32,
    /// Column as reported by the compiler
    pub column: u32,
}

impl Origin {
    /// Build an origin from `file!()`, `line!()` and `column!()`.
    ///
    /// `line!()` is one-based; origins store lines zero-based.
    pub fn here(file: &str, line: u32, column: u32) -> Self {
        Origin {
            file: file.to_string(),
            line: line.saturating_sub(1),
            column,
        }
    }
}

/// Registration-site metadata for a callback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationMetadata {
    /// Name the callback was declared with (named functions)
    pub declared_name: Option<String>,
    /// Name inferred from the binding or property it was assigned to
    pub inferred_name: Option<String>,
    /// Registration source coordinates
    pub origin: Option<Origin>,
    /// Source text of the callback expression
    pub source_text: Option<String>,
}

struct CallbackInner {
    id: CallbackId,
    body: Box<dyn Fn() + Send + Sync>,
    metadata: RegistrationMetadata,
}

/// Identity-comparable reference to a registered callback.
///
/// Clones alias the same identity. Two callbacks with identical source text
/// are still distinct.
#[derive(Clone)]
pub struct CallbackRef(Arc<CallbackInner>);

impl CallbackRef {
    /// Create a callback with explicit metadata
    pub fn new<F>(body: F, metadata: RegistrationMetadata) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        CallbackRef(Arc::new(CallbackInner {
            id: CallbackId::next(),
            body: Box::new(body),
            metadata,
        }))
    }

    /// Create a callback with no metadata at all
    pub fn bare<F>(body: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::new(body, RegistrationMetadata::default())
    }

    /// Identity of this callback
    pub fn id(&self) -> CallbackId {
        self.0.id
    }

    /// Metadata recorded at registration
    pub fn metadata(&self) -> &RegistrationMetadata {
        &self.0.metadata
    }

    /// Run the callback body
    pub fn invoke(&self) {
        (self.0.body)()
    }
}

impl PartialEq for CallbackRef {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for CallbackRef {}

impl Hash for CallbackRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for CallbackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRef")
            .field("id", &self.0.id)
            .field("metadata", &self.0.metadata)
            .finish()
    }
}

impl Serialize for CallbackRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.id.serialize(serializer)
    }
}

/// Name inferred for a callback assigned to a dotted path.
///
/// `prototype` segments are dropped, so `Me.prototype.timeout` reads `Me.timeout`.
#[doc(hidden)]
pub fn inferred_path(segments: &[&str]) -> String {
    segments
        .iter()
        .copied()
        .filter(|segment| *segment != "prototype")
        .collect::<Vec<_>>()
        .join(".")
}

/// Create a [`CallbackRef`] that remembers where and how it was written.
///
/// ```ignore
/// callback!(fn timeout() { tick() });         // declares `timeout`, keeps its source
/// callback!(timeout);                        // existing function, declared name only
/// callback!(assigned_timeout = || tick());   // anonymous, inferred name "assigned_timeout"
/// callback!(server.on_tick = || tick());     // anonymous, inferred name "server.on_tick"
/// callback!(|| tick());                      // anonymous, no name basis
/// ```
#[macro_export]
macro_rules! callback {
    (fn $name:ident () $body:block) => {{
        fn $name() $body
        $crate::CallbackRef::new(
            $name,
            $crate::RegistrationMetadata {
                declared_name: Some(stringify!($name).to_string()),
                inferred_name: None,
                origin: Some($crate::Origin::here(file!(), line!(), column!())),
                source_text: Some(stringify!(fn $name() $body).to_string()),
            },
        )
    }};
    ($($path:ident).+ = $body:expr) => {
        $crate::CallbackRef::new(
            $body,
            $crate::RegistrationMetadata {
                declared_name: None,
                inferred_name: Some($crate::callback::inferred_path(&[$(stringify!($path)),+])),
                origin: Some($crate::Origin::here(file!(), line!(), column!())),
                source_text: Some(stringify!($body).to_string()),
            },
        )
    };
    ($name:ident) => {
        $crate::CallbackRef::new(
            $name,
            $crate::RegistrationMetadata {
                declared_name: Some(stringify!($name).to_string()),
                inferred_name: None,
                origin: Some($crate::Origin::here(file!(), line!(), column!())),
                source_text: None,
            },
        )
    };
    ($body:expr) => {
        $crate::CallbackRef::new(
            $body,
            $crate::RegistrationMetadata {
                declared_name: None,
                inferred_name: None,
                origin: Some($crate::Origin::here(file!(), line!(), column!())),
                source_text: Some(stringify!($body).to_string()),
            },
        )
    };
}
